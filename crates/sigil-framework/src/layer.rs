//! Command prefix filtering as a tower layer.
//!
//! Chat bots usually only react to messages that start with a marker such as
//! `!`. [`PrefixLayer`] drops everything else before it reaches the
//! dispatcher and strips the marker from the rest:
//!
//! ```rust,ignore
//! let service = ServiceBuilder::new()
//!     .layer(PrefixLayer::new("!"))
//!     .service(dispatcher);
//!
//! // "!play" reaches the dispatcher as "play"; "hello" yields Ok(None).
//! ```

use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tower::{Layer, Service, ServiceExt};
use tracing::trace;

use crate::dispatcher::Outcome;
use crate::message::Message;

/// A tower [`Layer`] that only forwards messages starting with a prefix.
///
/// An empty prefix forwards every message unchanged.
#[derive(Debug, Clone)]
pub struct PrefixLayer {
    prefix: Arc<str>,
}

impl PrefixLayer {
    /// Creates a layer for `prefix`.
    pub fn new(prefix: impl AsRef<str>) -> Self {
        Self {
            prefix: Arc::from(prefix.as_ref()),
        }
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Strips the prefix from `content`, or returns `None` if it is absent.
    pub fn strip<'a>(&self, content: &'a str) -> Option<&'a str> {
        strip(&self.prefix, content)
    }
}

fn strip<'a>(prefix: &str, content: &'a str) -> Option<&'a str> {
    content.trim_start().strip_prefix(prefix)
}

impl<S> Layer<S> for PrefixLayer {
    type Service = PrefixService<S>;

    fn layer(&self, inner: S) -> PrefixService<S> {
        PrefixService {
            prefix: Arc::clone(&self.prefix),
            inner,
        }
    }
}

/// The [`Service`] produced by [`PrefixLayer`].
///
/// Responds with `None` for messages without the prefix and with the inner
/// service's outcome otherwise.
#[derive(Debug, Clone)]
pub struct PrefixService<S> {
    prefix: Arc<str>,
    inner: S,
}

impl<S> Service<Message> for PrefixService<S>
where
    S: Service<Message, Response = Outcome> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Option<Outcome>;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Option<Outcome>, S::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, mut message: Message) -> Self::Future {
        let Some(stripped) = strip(&self.prefix, &message.content) else {
            trace!(channel = %message.channel, "Message without command prefix ignored");
            return futures::future::ready(Ok(None)).boxed();
        };
        message.content = stripped.to_owned();

        let inner = self.inner.clone();
        async move { inner.oneshot(message).await.map(Some) }.boxed()
    }
}
