//! A line-based console transport.
//!
//! Every non-empty line read from the input becomes a [`Message`] on the
//! `console` channel; replies are printed to stdout. Good enough for local
//! testing of modules without a chat connection.

use async_trait::async_trait;
use sigil_framework::{Message, Responder, ResponderError};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::sync::{Mutex, mpsc};
use tracing::{debug, error};

/// Channel name used for console messages.
pub const CONSOLE_CHANNEL: &str = "console";

/// Spawns a task that turns lines from `reader` into messages.
///
/// The returned receiver closes when the reader reaches end of input.
pub fn spawn_line_source<R>(
    reader: R,
    author: impl Into<String>,
    capacity: usize,
) -> mpsc::Receiver<Message>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let author = author.into();
    let (tx, rx) = mpsc::channel(capacity.max(1));

    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => {
                    if tx
                        .send(Message::new(CONSOLE_CHANNEL, author.as_str(), line))
                        .await
                        .is_err()
                    {
                        debug!("Message receiver dropped, stopping console input");
                        break;
                    }
                }
                Ok(None) => {
                    debug!("Console input closed");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to read console input");
                    break;
                }
            }
        }
    });

    rx
}

/// Reads commands from stdin.
pub fn spawn_stdin_source(author: impl Into<String>) -> mpsc::Receiver<Message> {
    spawn_line_source(tokio::io::stdin(), author, 16)
}

/// Prints replies to stdout, one per line.
#[derive(Debug)]
pub struct ConsoleResponder {
    out: Mutex<tokio::io::Stdout>,
}

impl ConsoleResponder {
    /// Creates a responder writing to stdout.
    pub fn new() -> Self {
        Self {
            out: Mutex::new(tokio::io::stdout()),
        }
    }
}

impl Default for ConsoleResponder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Responder for ConsoleResponder {
    async fn send(&self, _channel: &str, text: &str) -> Result<(), ResponderError> {
        let mut out = self.out.lock().await;
        let line = format!("{text}\n");
        out.write_all(line.as_bytes())
            .await
            .map_err(|e| ResponderError::SendFailed(e.to_string()))?;
        out.flush()
            .await
            .map_err(|e| ResponderError::SendFailed(e.to_string()))
    }
}
