//! Handler system for the Sigil framework.
//!
//! A handler is any async function whose first argument is a
//! [`CommandContext`] and whose remaining arguments implement
//! [`FromParam`]. The [`Handler`] trait is implemented for such functions via
//! blanket implementations for each arity, the same way Axum handlers work:
//!
//! ```rust,ignore
//! // Returns text that the dispatcher forwards verbatim.
//! async fn roll(ctx: CommandContext, count: u8, sides: u16) -> String {
//!     format!("{} rolled {count}d{sides}", ctx.author())
//! }
//!
//! // Replies on its own and returns nothing to forward.
//! async fn ping(ctx: CommandContext) -> Result<(), ResponderError> {
//!     ctx.reply("pong").await
//! }
//! ```
//!
//! The parameter types of the function decide which [`ParamType`]s the
//! command scans for, so a command's placeholders are checked against the
//! handler signature once, at registration.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use sigil_core::{ParamType, ParamValue};

use crate::context::CommandContext;
use crate::error::{HandlerError, HandlerResult};
use crate::extractor::FromParam;

// ============================================================================
// Reply - what a handler produced
// ============================================================================

/// The visible result of invoking a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Text to forward verbatim to where the command came from.
    Text(String),
    /// The handler already responded itself; nothing to forward.
    Handled,
    /// The handler failed; carries the generic user-facing message.
    Failed(String),
}

impl Reply {
    /// The text to send back, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::Failed(text) => Some(text),
            Self::Handled => None,
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text().unwrap_or_default())
    }
}

// ============================================================================
// IntoReply - handler return values
// ============================================================================

/// Types a handler may return.
pub trait IntoReply: Send {
    /// Converts the return value into a reply, or an error to be contained.
    fn into_reply(self) -> HandlerResult<Reply>;
}

impl IntoReply for () {
    fn into_reply(self) -> HandlerResult<Reply> {
        Ok(Reply::Handled)
    }
}

impl IntoReply for String {
    fn into_reply(self) -> HandlerResult<Reply> {
        Ok(Reply::Text(self))
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> HandlerResult<Reply> {
        Ok(Reply::Text(self.to_owned()))
    }
}

impl IntoReply for Reply {
    fn into_reply(self) -> HandlerResult<Reply> {
        Ok(self)
    }
}

/// `None` means the handler chose not to answer.
impl<T: IntoReply> IntoReply for Option<T> {
    fn into_reply(self) -> HandlerResult<Reply> {
        self.map_or(Ok(Reply::Handled), IntoReply::into_reply)
    }
}

/// `Err` is a handler failure; the dispatcher logs it and answers generically.
impl<T: IntoReply, E: fmt::Display + Send> IntoReply for Result<T, E> {
    fn into_reply(self) -> HandlerResult<Reply> {
        match self {
            Ok(t) => t.into_reply(),
            Err(e) => Err(HandlerError::failed(e.to_string())),
        }
    }
}

// ============================================================================
// Handler Trait
// ============================================================================

/// A command handler taking a context plus the arguments described by `T`.
#[async_trait]
pub trait Handler<T>: Clone + Send + Sync + 'static {
    /// Declared types of the parsed parameters, in order.
    fn param_types() -> Vec<ParamType>;

    /// Converts `values` into the handler's arguments and runs it.
    async fn call(self, ctx: CommandContext, values: Vec<ParamValue>) -> HandlerResult<Reply>;
}

/// A type-erased handler that can be stored in a command descriptor.
pub type BoxedHandler =
    Arc<dyn Fn(CommandContext, Vec<ParamValue>) -> BoxFuture<'static, HandlerResult<Reply>> + Send + Sync>;

/// Converts a handler function into a boxed handler.
pub fn into_handler<H, T>(handler: H) -> BoxedHandler
where
    H: Handler<T>,
    T: 'static,
{
    Arc::new(move |ctx, values| handler.clone().call(ctx, values))
}

macro_rules! impl_handler {
    (
        $($ty:ident),*
    ) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        #[async_trait]
        impl<F, Fut, Res, $($ty,)*> Handler<($($ty,)*)> for F
        where
            F: FnOnce(CommandContext, $($ty,)*) -> Fut + Clone + Send + Sync + 'static,
            Fut: Future<Output = Res> + Send + 'static,
            Res: IntoReply + 'static,
            $( $ty: FromParam, )*
        {
            fn param_types() -> Vec<ParamType> {
                vec![$(<$ty as FromParam>::PARAM_TYPE,)*]
            }

            async fn call(self, ctx: CommandContext, values: Vec<ParamValue>) -> HandlerResult<Reply> {
                let mut values = values.into_iter();
                $(
                    let $ty = <$ty as FromParam>::from_value(
                        values.next().ok_or(HandlerError::MissingArgument)?,
                    )?;
                )*

                (self)(ctx, $($ty,)*).await.into_reply()
            }
        }
    };
}

impl_handler!();
impl_handler!(T1);
impl_handler!(T1, T2);
impl_handler!(T1, T2, T3);
impl_handler!(T1, T2, T3, T4);
impl_handler!(T1, T2, T3, T4, T5);
impl_handler!(T1, T2, T3, T4, T5, T6);
impl_handler!(T1, T2, T3, T4, T5, T6, T7);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11);
impl_handler!(T1, T2, T3, T4, T5, T6, T7, T8, T9, T10, T11, T12);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Message;
    use crate::responder::NullResponder;

    fn ctx() -> CommandContext {
        CommandContext::new(
            Message::new("general", "ana", "roll 2d6"),
            "dice",
            "roll",
            None,
            Arc::new(NullResponder),
        )
    }

    async fn roll(_ctx: CommandContext, count: u8, sides: u16) -> String {
        format!("{count}d{sides}")
    }

    async fn fail(_ctx: CommandContext) -> Result<String, String> {
        Err("boom".to_owned())
    }

    #[test]
    fn test_param_types_follow_signature() {
        fn types<H: Handler<T>, T>(_: &H) -> Vec<ParamType> {
            H::param_types()
        }
        assert_eq!(types(&roll), vec![ParamType::U8, ParamType::U16]);
    }

    #[tokio::test]
    async fn test_call_converts_arguments() {
        let handler = into_handler(roll);
        let reply = handler(ctx(), vec![ParamValue::Unsigned(2), ParamValue::Unsigned(6)]).await;
        assert_eq!(reply.unwrap(), Reply::Text("2d6".to_owned()));
    }

    #[tokio::test]
    async fn test_call_rejects_wrong_values() {
        let handler = into_handler(roll);
        let reply = handler(ctx(), vec![ParamValue::Unsigned(2)]).await;
        assert!(matches!(reply, Err(HandlerError::MissingArgument)));

        let reply = handler(ctx(), vec![ParamValue::Unsigned(999), ParamValue::Unsigned(6)]).await;
        assert!(matches!(reply, Err(HandlerError::Param(_))));
    }

    #[tokio::test]
    async fn test_error_return_is_failure() {
        let handler = into_handler(fail);
        let reply = handler(ctx(), Vec::new()).await;
        assert!(matches!(reply, Err(HandlerError::Failed(msg)) if msg == "boom"));
    }

    #[test]
    fn test_reply_conversions() {
        assert_eq!(().into_reply().unwrap(), Reply::Handled);
        assert_eq!(None::<String>.into_reply().unwrap(), Reply::Handled);
        assert_eq!("hi".into_reply().unwrap().text(), Some("hi"));
    }
}
