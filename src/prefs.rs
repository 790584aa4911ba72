//! Persisted viewer preferences in `localStorage`.
//!
//! Storage may be unavailable (private mode, sandboxed iframes); every read
//! then behaves as if nothing was stored and writes are logged and dropped.

use web_sys as web;

use crate::constants::{PERF_OVERLAY_KEY, QUALITY_OVERRIDE_KEY};
use crate::core::{parse_override, QualityTier};

fn storage() -> Option<web::Storage> {
    web::window().and_then(|w| w.local_storage().ok().flatten())
}

fn read(key: &str) -> Option<String> {
    storage().and_then(|s| s.get_item(key).ok().flatten())
}

fn write(key: &str, value: Option<&str>) {
    let Some(s) = storage() else {
        log::warn!("[prefs] storage unavailable; {} not saved", key);
        return;
    };
    let res = match value {
        Some(v) => s.set_item(key, v),
        None => s.remove_item(key),
    };
    if let Err(e) = res {
        log::warn!("[prefs] failed to write {}: {:?}", key, e);
    }
}

pub fn quality_override() -> Option<QualityTier> {
    parse_override(read(QUALITY_OVERRIDE_KEY).as_deref())
}

/// Persist the override without reloading. `None` clears it.
pub fn store_quality_override(tier: Option<QualityTier>) {
    write(QUALITY_OVERRIDE_KEY, tier.map(QualityTier::as_str));
}

/// Persist a new override and reload so every object is rebuilt under it.
pub fn set_quality_override(tier: Option<QualityTier>) {
    if quality_override() == tier {
        return;
    }
    store_quality_override(tier);
    log::info!(
        "[prefs] quality override -> {}; reloading",
        tier.map_or("auto", QualityTier::as_str)
    );
    if let Some(w) = web::window() {
        _ = w.location().reload();
    }
}

pub fn perf_overlay() -> bool {
    matches!(read(PERF_OVERLAY_KEY).as_deref(), Some("1"))
}

pub fn set_perf_overlay(on: bool) {
    write(PERF_OVERLAY_KEY, on.then_some("1"));
}
