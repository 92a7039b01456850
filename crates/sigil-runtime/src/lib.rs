//! Sigil Runtime - Orchestration layer for the Sigil command dispatcher.
//!
//! This crate provides:
//! - Layered configuration (`sigil.toml`/`sigil.yaml`, profiles, `SIGIL_*`
//!   environment variables)
//! - Logging setup driven by that configuration
//! - The [`SigilRuntime`] worker loop, which feeds messages through the
//!   prefix layer and the dispatcher and renders the outcome as a reply
//! - A console transport for trying modules out locally
//!
//! ```ignore
//! use sigil_runtime::SigilRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = SigilRuntime::builder()
//!         .module(raid_module())
//!         .build()?;
//!
//!     // Run until Ctrl+C or end of input
//!     runtime.run_console().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Configuration Formats
//!
//! - `toml-config`: load `sigil.toml`
//! - `yaml-config`: load `sigil.yaml` / `sigil.yml`
//!
//! Environment variables are always read, e.g.
//! `SIGIL_DISPATCHER__PREFIX=?` or `SIGIL_LOGGING__LEVEL=debug`.

pub mod config;
pub mod console;
pub mod error;
pub mod logging;
pub mod runtime;

// Re-exports
pub use config::{
    ConfigError, ConfigLoader, ConfigResult, DispatcherConfig, LoggingConfig, ModuleConfig,
    SigilConfig,
};
pub use console::{ConsoleResponder, spawn_line_source, spawn_stdin_source};
pub use error::{RuntimeError, RuntimeResult};
pub use logging::{LoggingBuilder, SpanEvents};
pub use runtime::{RuntimeBuilder, SigilRuntime};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
///
/// This provides all the commonly used logging macros:
/// - `trace!`, `debug!`, `info!`, `warn!`, `error!`
/// - `span`, `event`
/// - `instrument` attribute
/// - `Level` for span creation
pub mod prelude {
    pub use tracing::{Level, debug, error, event, info, instrument, span, trace, warn};
}
