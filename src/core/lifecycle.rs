use super::error::SceneError;

/// Lifecycle of an animated object.
///
/// `Uninitialized -> Loading -> Ready -> TornDown`. Any state may be torn
/// down. An object whose load failed simply stays in `Loading`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ObjectState {
    #[default]
    Uninitialized,
    Loading,
    Ready,
    TornDown,
}

#[derive(Clone, Debug, Default)]
pub struct Lifecycle {
    state: ObjectState,
    failure: Option<String>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> ObjectState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == ObjectState::Ready
    }

    /// Last recorded load failure, if the object is stuck in `Loading`.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn begin_loading(&mut self) -> Result<(), SceneError> {
        self.transition(ObjectState::Uninitialized, ObjectState::Loading)
    }

    pub fn mark_ready(&mut self) -> Result<(), SceneError> {
        self.transition(ObjectState::Loading, ObjectState::Ready)
    }

    /// Record a load failure; the object remains inert in `Loading`.
    pub fn mark_failed(&mut self, reason: impl Into<String>) {
        self.failure = Some(reason.into());
    }

    pub fn tear_down(&mut self) {
        self.state = ObjectState::TornDown;
    }

    fn transition(&mut self, from: ObjectState, to: ObjectState) -> Result<(), SceneError> {
        if self.state != from {
            return Err(SceneError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
