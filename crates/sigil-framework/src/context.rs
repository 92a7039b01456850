//! The invocation context handed to every handler.
//!
//! The context is always a handler's first argument and is never parsed from
//! text. It carries the incoming [`Message`], the names of the module and
//! command that were selected, the module's shared state and a [`Responder`]
//! for handlers that reply on their own.

use std::any::Any;
use std::sync::Arc;

use crate::error::ResponderError;
use crate::message::Message;
use crate::responder::Responder;

/// Type-erased module state, shared by all of a module's handlers.
pub type ModuleState = Arc<dyn Any + Send + Sync>;

/// Context for a single handler invocation.
#[derive(Clone)]
pub struct CommandContext {
    message: Arc<Message>,
    module: Arc<str>,
    command: Arc<str>,
    state: Option<ModuleState>,
    responder: Arc<dyn Responder>,
}

impl CommandContext {
    /// Creates a new invocation context.
    pub fn new(
        message: Message,
        module: &str,
        command: &str,
        state: Option<ModuleState>,
        responder: Arc<dyn Responder>,
    ) -> Self {
        Self {
            message: Arc::new(message),
            module: Arc::from(module),
            command: Arc::from(command),
            state,
            responder,
        }
    }

    /// The message that triggered this invocation.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Sender of the message.
    pub fn author(&self) -> &str {
        &self.message.author
    }

    /// Channel of the message.
    pub fn channel(&self) -> &str {
        &self.message.channel
    }

    /// Name of the selected module.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Name of the selected command.
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the module's state if it was registered with type `T`.
    pub fn state<T>(&self) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        self.state.clone()?.downcast::<T>().ok()
    }

    /// Sends a reply to the message's channel.
    pub async fn reply(&self, text: &str) -> Result<(), ResponderError> {
        self.responder.send(&self.message.channel, text).await
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("message", &self.message)
            .field("module", &self.module)
            .field("command", &self.command)
            .field("has_state", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
