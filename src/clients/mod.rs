pub mod openmetadata;

use thiserror::Error;

pub use openmetadata::OpenMetadataRemote;

/// Failure talking to the metadata service.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("upstream status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid base url '{0}'")]
    InvalidBase(String),
}
