pub(crate) mod chassis;
pub(crate) mod config;
pub(crate) mod lookbooks;
pub(crate) mod videos;

/// Percentage of `part` in `total`, 0 when `total` is 0.
pub(crate) fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}
