//! Error types for the upload pipeline.

use nowyouseeme_client::ClientError;
use thiserror::Error;

/// Errors surfaced by an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Form input failed local checks; the client was not contacted.
    #[error("{0}")]
    Validation(String),
    /// Another submission from the same form has not finished yet.
    #[error("an upload is already in progress")]
    InFlight,
    /// The selected file could not be read or encoded.
    #[error("encoding failed: {0}")]
    Encoding(String),
    /// The transfer client rejected or failed the create call.
    #[error(transparent)]
    Client(#[from] ClientError),
}
