//! Error types for the report pipeline.

use thiserror::Error;

use crate::domain::site::SiteId;

/// Result type alias using the tillroll error type.
pub type Result<T> = std::result::Result<T, TillrollError>;

/// Main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum TillrollError {
    /// No candidate endpoint for the site could be reached.
    #[error("no reachable endpoint for site {site_id}, tried: {}", .candidates.join(", "))]
    Connectivity {
        site_id: SiteId,
        /// Every host that was attempted before giving up.
        candidates: Vec<String>,
    },

    /// Query or fetch failure after a connection was established.
    #[error("data fetch failed: {0}")]
    DataFetch(anyhow::Error),

    /// A row from the data source did not match any known shape.
    ///
    /// Raised instead of an out-of-range access when a row carries an
    /// unrecognized kind tag.
    #[error("malformed row at index {index}: unknown kind tag {kind}")]
    MalformedRow { index: usize, kind: i16 },

    /// Archive packaging error
    #[error("archive packaging failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// I/O error while writing archive entries
    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error (e.g., malformed site id token, empty batch input)
    #[error("validation error: {0}")]
    Validation(String),

    /// The batch finished without a single successful report.
    ///
    /// Distinct from any individual per-site failure: those are recorded in
    /// the batch outcome's failure map.
    #[error("batch produced no successful reports")]
    NoSuccessfulReports,

    /// General error from anyhow
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
