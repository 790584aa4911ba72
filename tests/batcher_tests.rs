// Host-side tests for scroll event coalescing.

use std::cell::RefCell;
use std::rc::Rc;

use scroll_scene::core::ScrollBatcher;

fn recorder(log: &Rc<RefCell<Vec<f32>>>) -> Box<dyn FnMut(f32) -> anyhow::Result<()>> {
    let log = log.clone();
    Box::new(move |offset: f32| {
        log.borrow_mut().push(offset);
        Ok(())
    })
}

#[test]
fn subscribe_delivers_current_offset_immediately() {
    let mut b = ScrollBatcher::new(320.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    b.subscribe(recorder(&seen));
    assert_eq!(*seen.borrow(), vec![320.0]);
    assert_eq!(b.len(), 1);
}

#[test]
fn burst_of_events_flushes_once_with_latest_offset() {
    let mut b = ScrollBatcher::new(0.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    b.subscribe(recorder(&seen));
    seen.borrow_mut().clear();

    let mut schedules = 0;
    for i in 1..=50 {
        if b.on_scroll(i as f32 * 10.0) {
            schedules += 1;
        }
    }
    assert_eq!(schedules, 1);
    assert!(b.is_pending());
    assert_eq!(b.flush(), 1);
    assert_eq!(*seen.borrow(), vec![500.0]);
    assert_eq!(b.flush_count(), 1);

    // Nothing pending: a second flush is a no-op.
    assert_eq!(b.flush(), 0);
    assert_eq!(seen.borrow().len(), 1);

    // The next event schedules again.
    assert!(b.on_scroll(510.0));
}

#[test]
fn every_subscriber_sees_the_same_offset() {
    let mut b = ScrollBatcher::new(0.0);
    let a = Rc::new(RefCell::new(Vec::new()));
    let c = Rc::new(RefCell::new(Vec::new()));
    b.subscribe(recorder(&a));
    b.subscribe(recorder(&c));
    b.on_scroll(42.0);
    b.on_scroll(84.0);
    assert_eq!(b.flush(), 2);
    assert_eq!(a.borrow().last(), Some(&84.0));
    assert_eq!(c.borrow().last(), Some(&84.0));
}

#[test]
fn unsubscribe_stops_delivery() {
    let mut b = ScrollBatcher::new(0.0);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let id = b.subscribe(recorder(&seen));
    assert!(b.unsubscribe(id));
    assert!(!b.unsubscribe(id));
    assert!(b.is_empty());
    b.on_scroll(10.0);
    assert_eq!(b.flush(), 0);
    assert_eq!(seen.borrow().len(), 1);
}

#[test]
fn failing_subscriber_does_not_block_others() {
    let mut b = ScrollBatcher::new(0.0);
    b.subscribe(Box::new(|_offset: f32| -> anyhow::Result<()> { anyhow::bail!("boom") }));
    let seen = Rc::new(RefCell::new(Vec::new()));
    b.subscribe(recorder(&seen));
    b.on_scroll(99.0);
    assert_eq!(b.flush(), 2);
    assert_eq!(seen.borrow().last(), Some(&99.0));
    assert_eq!(b.offset(), 99.0);
}
