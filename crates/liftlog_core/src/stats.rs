//! Derived statistics over a chronological record series.

use crate::record::Record;

/// Summary statistics for one exercise's progression.
///
/// Computed from a chronological (oldest-first) series, as returned by
/// [`crate::LogStore::get_by_name`]. Pure computation; the store is not
/// consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionStats {
    /// Number of entries in the series.
    pub entries: usize,
    /// Highest weight ever logged.
    pub max: f64,
    /// Weight of the most recent entry.
    pub latest: f64,
    /// Weight of the earliest entry.
    pub first: f64,
    /// Latest minus first.
    pub change: f64,
}

impl ProgressionStats {
    /// Computes stats from a chronological series.
    ///
    /// Returns `None` for an empty series.
    #[must_use]
    pub fn from_series(series: &[Record]) -> Option<Self> {
        let first = series.first()?.weight;
        let latest = series.last()?.weight;
        let max = series.iter().map(|r| r.weight).fold(f64::MIN, f64::max);

        Some(Self {
            entries: series.len(),
            max,
            latest,
            first,
            change: latest - first,
        })
    }
}
