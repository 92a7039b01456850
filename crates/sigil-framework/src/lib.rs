//! # Sigil Framework
//!
//! Typed command registration and dispatch on top of `sigil-core`.
//!
//! This layer provides:
//! - Axum-style handlers: plain async functions whose arguments decide the
//!   parameter kinds of a command
//! - The [`Command`] builder, which checks a template against its handler at
//!   registration time
//! - [`Module`]s and the immutable [`Registry`]
//! - The [`Dispatcher`], which ranks every candidate, invokes the winner and
//!   contains handler failures
//! - A tower [`PrefixLayer`] for command prefixes such as `!`
//!
//! ```rust,ignore
//! use sigil_framework::{Command, CommandContext, Dispatcher, Module, Registry};
//!
//! async fn volume(_ctx: CommandContext, level: u8) -> String {
//!     format!("volume set to {level}")
//! }
//!
//! let registry = Registry::builder()
//!     .module(Module::builder("music").command(Command::new("volume", "volume {level}").handler(volume)))
//!     .build()?;
//! let dispatcher = Dispatcher::new(Arc::new(registry), responder);
//! ```

pub mod command;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod extractor;
pub mod handler;
pub mod layer;
pub mod message;
pub mod module;
pub mod registry;
pub mod responder;

pub use command::{Command, CommandDescriptor};
pub use context::{CommandContext, ModuleState};
pub use dispatcher::{
    Candidate, DEFAULT_HANDLER_ERROR_MESSAGE, DispatchOptions, Dispatcher, Outcome, Selection,
};
pub use error::{HandlerError, HandlerResult, ResponderError};
pub use extractor::{Decimal, FromParam};
pub use handler::{BoxedHandler, Handler, IntoReply, Reply, into_handler};
pub use layer::{PrefixLayer, PrefixService};
pub use message::Message;
pub use module::{Module, ModuleBuilder};
pub use registry::{Registry, RegistryBuilder};
pub use responder::{NullResponder, Responder};
