use std::io;
use std::result;

use crossbeam_channel::SendError;
use thiserror::Error;

use super::span::SpanRecord;


/// Errors returned by tracing operations.
///
/// Argument and identifier errors are raised while values are constructed.
/// Sink errors are returned unchanged from `Logger::trace`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("the tracer was already traced")]
    AlreadyTraced,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error(transparent)]
    IoError(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("TracerInfo must be initialized first")]
    NotInitialized,

    #[error("failed to send spans: {0}")]
    SendError(#[from] SendError<Vec<SpanRecord>>),
}


/// Result alias for this crate's `Error`.
pub type Result<T> = result::Result<T, Error>;
