//! # Sigil
//!
//! Typed text-command matching and dispatch for chat bots.
//!
//! ## Overview
//!
//! A command is a template such as `raid create {}/{} {}:{} UTC{} {}` bound to
//! an async handler. The handler's argument types decide how each placeholder
//! is read, so `!raid create 24/12 20:00 UTC+1 Christmas raid` reaches the
//! handler as `(u8, u8, u8, u8, i8, String)`.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐     ┌─────────────┐     ┌────────────┐     ┌─────────────────────┐
//! │ Transport │────▶│ PrefixLayer │────▶│ Dispatcher │────▶│ Module "raid"       │
//! │ (console) │     │   ("!")     │     │ (scoring)  │────▶│ Module "music"      │
//! └───────────┘     └─────────────┘     └────────────┘     └─────────────────────┘
//!       ▲                                     │
//!       └──────── reply / suggestions ────────┘
//! ```
//!
//! - **Core**: templates, parameter kinds and the single-pass matcher
//! - **Framework**: handlers, commands, modules, the registry and dispatcher
//! - **Runtime**: configuration, logging and the message loop
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sigil::prelude::*;
//!
//! async fn volume(_ctx: CommandContext, level: u8) -> String {
//!     format!("Volume set to {level}")
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = SigilRuntime::builder()
//!         .module(
//!             Module::builder("music")
//!                 .command(Command::new("volume", "volume {level}").handler(volume)),
//!         )
//!         .build()?;
//!
//!     runtime.run_console().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: load `sigil.toml` (default)
//! - `yaml-config`: load `sigil.yaml`
//! - `json-log`: JSON log output

pub use sigil_core as core;
pub use sigil_framework as framework;
pub use sigil_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use sigil::prelude::*;
/// ```
pub mod prelude {
    // Runtime - main entry point
    pub use sigil_runtime::{ConsoleResponder, SigilConfig, SigilRuntime};

    // Registration
    pub use sigil_framework::{Command, Module, ModuleBuilder, Registry};

    // Handlers
    pub use sigil_framework::{CommandContext, Decimal, FromParam, IntoReply, Reply};

    // Dispatch
    pub use sigil_framework::{Dispatcher, Message, Outcome, Responder, ResponderError};

    // Errors
    pub use sigil_core::{ParamError, RegistrationError, TemplateError};
    pub use sigil_framework::HandlerError;
}
