//! Incoming chat messages.

use serde::{Deserialize, Serialize};

/// One line of user text together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Channel the message was posted in; replies go back here.
    pub channel: String,
    /// Display name or identifier of the sender.
    pub author: String,
    /// Raw text.
    pub content: String,
}

impl Message {
    /// Creates a new message.
    pub fn new(
        channel: impl Into<String>,
        author: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            channel: channel.into(),
            author: author.into(),
            content: content.into(),
        }
    }
}
