//! Runtime error types.

use thiserror::Error;

use crate::config::ConfigError;
use sigil_core::RegistrationError;
use sigil_framework::ResponderError;

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A module or command failed to register.
    #[error("Command registration failed: {0}")]
    Registration(#[from] RegistrationError),

    /// A reply could not be delivered.
    #[error(transparent)]
    Responder(#[from] ResponderError),

    /// Signal handling or console I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
