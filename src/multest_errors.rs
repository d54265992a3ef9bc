use thiserror::Error;

/// Errors surfaced by the multest crate.
///
/// Per-track and per-event anomalies (unreadable track, missing or
/// unrecognized generator header) are deliberately **not** represented here:
/// those degrade to a log message and a skip, never aborting the event. The
/// variants below cover construction mistakes and the merge/finalize
/// contract, where continuing silently would corrupt the aggregates.
#[derive(Error, Debug, PartialEq)]
pub enum MultEstError {
    #[error("Invalid histogram axis: {0}")]
    InvalidAxis(String),

    #[error("Cannot merge histogram '{0}': binning mismatch")]
    BinningMismatch(String),

    #[error("Cannot merge outputs: {0}")]
    RegionSetMismatch(String),

    #[error("Merged output is missing or empty; final results cannot be derived")]
    MissingMergedOutput,
}
