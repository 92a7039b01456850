//! Error types for the Sigil framework.

use thiserror::Error;

use sigil_core::ParamError;

/// Failures that happen after a command was selected.
///
/// These never leave the dispatcher: they are logged and turned into a generic
/// reply so the message loop keeps running.
#[derive(Debug, Clone, Error)]
pub enum HandlerError {
    /// A parameter that passed matching failed conversion to the handler's type.
    #[error("parameter conversion failed: {0}")]
    Param(#[from] ParamError),

    /// Fewer decoded values than the handler takes.
    #[error("handler expected more arguments than were decoded")]
    MissingArgument,

    /// The handler returned an error.
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    /// Creates a handler failure from any message.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::Failed(msg.into())
    }
}

/// Errors returned by a [`Responder`](crate::Responder).
#[derive(Debug, Clone, Error)]
pub enum ResponderError {
    /// The outgoing channel is gone.
    #[error("responder is closed")]
    Closed,

    /// Sending failed for another reason.
    #[error("failed to send reply: {0}")]
    SendFailed(String),
}

/// Result type for handler invocation.
pub type HandlerResult<T> = Result<T, HandlerError>;
