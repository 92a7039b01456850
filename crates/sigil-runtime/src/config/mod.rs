//! Configuration module for the Sigil runtime.
//!
//! Configuration is layered with figment: built-in defaults, then files, then
//! `SIGIL_*` environment variables. See [`loader`] for the exact order.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use loader::{ConfigLoader, Profile, load_config, load_config_from_file};
pub use schema::{
    DispatcherConfig, LogFormat, LogLevel, LogOutput, LoggingConfig, ModuleConfig, SigilConfig,
    SpanEventConfig,
};
pub use validation::validate_config;
