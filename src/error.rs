//! Errors that abort a scan before it produces anything.
//!
//! Everything else (missing paths, unreadable subtrees, failed deletions) is
//! absorbed per item and never surfaces here.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("home directory could not be resolved")]
    HomeNotFound,

    #[error("invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}
