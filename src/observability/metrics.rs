//! Metrics collection.
//!
//! # Metrics
//! - `minimotd_reloads_total` (counter): reload attempts by result
//! - `minimotd_icons_loaded` (gauge): icons in the last built cache
//! - `minimotd_icons_skipped_total` (counter): skipped icon files by reason
//! - `minimotd_snapshot_generation` (gauge): generation of the published snapshot
//!
//! # Design Decisions
//! - Emits through the `metrics` facade only; the host installs a recorder
//! - Without a recorder every call is a no-op

/// Record the outcome of a reload attempt.
pub fn record_reload(success: bool) {
    let result = if success { "success" } else { "failure" };
    ::metrics::counter!("minimotd_reloads_total", "result" => result).increment(1);
}

/// Record the size of a freshly built icon cache.
pub fn record_icons_loaded(count: usize) {
    ::metrics::gauge!("minimotd_icons_loaded").set(count as f64);
}

/// Record an icon file skipped during a scan.
pub fn record_icon_skipped(reason: &'static str) {
    ::metrics::counter!("minimotd_icons_skipped_total", "reason" => reason).increment(1);
}

/// Record the generation of the snapshot just published.
pub fn record_generation(generation: u64) {
    ::metrics::gauge!("minimotd_snapshot_generation").set(generation as f64);
}
