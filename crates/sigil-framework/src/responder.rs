//! Outgoing replies.
//!
//! The dispatcher does not know how messages leave the process. A
//! [`Responder`] is handed in by whoever owns the chat connection and is made
//! available to handlers that answer on their own instead of returning text.

use async_trait::async_trait;

use crate::error::ResponderError;

/// Sends text back to a channel.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Sends `text` to `channel`.
    async fn send(&self, channel: &str, text: &str) -> Result<(), ResponderError>;
}

/// A responder that drops everything it is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResponder;

#[async_trait]
impl Responder for NullResponder {
    async fn send(&self, _channel: &str, _text: &str) -> Result<(), ResponderError> {
        Ok(())
    }
}
