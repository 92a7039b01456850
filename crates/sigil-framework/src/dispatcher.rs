//! Command dispatcher for the Sigil framework.
//!
//! The [`Dispatcher`] turns one line of text into exactly one [`Outcome`]:
//!
//! 1. Every command of every module is matched against the input
//! 2. Each module scores the deepest `template_consumed` among its commands
//! 3. The highest scoring module is selected; ties go to the module that was
//!    registered first
//! 4. Within that module:
//!    - a complete match is decoded and invoked
//!    - otherwise the deepest partial matches become suggestions
//!    - if nothing matched at all the input is unrecognized
//!
//! Selection ([`Dispatcher::select`]) is a pure function of the registry and
//! the input. Only the final invocation is asynchronous, and whatever the
//! handler does (returning an error or panicking) is contained here: it is
//! logged and answered with a generic message.
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(Arc::new(registry), responder);
//!
//! match dispatcher.dispatch(message).await {
//!     Outcome::Invoked(reply) => { /* forward reply.text() */ }
//!     Outcome::Suggestions(list) => { /* show "did you mean" */ }
//!     Outcome::Unrecognized => { /* fall back to help */ }
//! }
//! ```

use std::any::Any;
use std::convert::Infallible;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use sigil_core::MatchResult;
use tower::Service;
use tracing::{Instrument, debug, debug_span, error, trace};

use crate::command::CommandDescriptor;
use crate::context::CommandContext;
use crate::handler::Reply;
use crate::message::Message;
use crate::module::Module;
use crate::registry::Registry;
use crate::responder::Responder;

/// Default reply when a handler fails.
pub const DEFAULT_HANDLER_ERROR_MESSAGE: &str = "Something went wrong while running that command.";

// ============================================================================
// Options and outcomes
// ============================================================================

/// Tunables for a [`Dispatcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOptions {
    /// Maximum number of suggestions to return; `0` means no limit.
    pub max_suggestions: usize,
    /// Reply used when a handler fails.
    pub handler_error_message: String,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_suggestions: 5,
            handler_error_message: DEFAULT_HANDLER_ERROR_MESSAGE.to_owned(),
        }
    }
}

/// Result of dispatching one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A command was fully matched and its handler ran.
    Invoked(Reply),
    /// Commands matched partially; these continuations would complete them.
    Suggestions(Vec<String>),
    /// Nothing matched, not even a command name.
    Unrecognized,
}

/// One (module, command) pair evaluated against an input.
#[derive(Debug, Clone)]
pub struct Candidate<'r> {
    /// The module the command belongs to.
    pub module: &'r Module,
    /// The command.
    pub command: &'r CommandDescriptor,
    /// How far the command matched.
    pub result: MatchResult,
}

/// What [`Dispatcher::select`] decided for an input.
#[derive(Debug, Clone)]
pub enum Selection<'r> {
    /// A command matched completely and should be invoked.
    Full(Candidate<'r>),
    /// The best module only matched partially.
    Partial {
        /// The selected module.
        module: &'r Module,
        /// Rendered continuations, most specific first.
        suggestions: Vec<String>,
    },
    /// No template characters were consumed anywhere.
    None,
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Matches input against a [`Registry`] and invokes the selected handler.
///
/// Cloning is cheap; clones share the registry and the responder.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    responder: Arc<dyn Responder>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Creates a dispatcher with default options.
    pub fn new(registry: Arc<Registry>, responder: Arc<dyn Responder>) -> Self {
        Self {
            registry,
            responder,
            options: DispatchOptions::default(),
        }
    }

    /// Replaces the dispatch options.
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    /// The registry this dispatcher reads.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Current options.
    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Runs every command against `input` and picks the outcome.
    pub fn select<'r>(&'r self, input: &str) -> Selection<'r> {
        let mut best: Option<(&'r Module, Vec<(&'r CommandDescriptor, MatchResult)>, usize)> =
            None;

        for module in self.registry.modules() {
            let results: Vec<_> = module
                .commands()
                .iter()
                .map(|command| {
                    let result = command.matches(input);
                    trace!(
                        module = module.name(),
                        command = command.name(),
                        input_consumed = result.input_consumed,
                        template_consumed = result.template_consumed,
                        complete = result.complete,
                        "Candidate scored"
                    );
                    (command, result)
                })
                .collect();
            let score = results
                .iter()
                .map(|(_, r)| r.template_consumed)
                .max()
                .unwrap_or(0);

            if best.as_ref().is_none_or(|(_, _, top)| score > *top) {
                best = Some((module, results, score));
            }
        }

        let Some((module, results, score)) = best else {
            return Selection::None;
        };
        if score == 0 {
            return Selection::None;
        }

        let mut full: Option<(&'r CommandDescriptor, MatchResult)> = None;
        for (command, result) in &results {
            if !result.complete {
                continue;
            }
            let better = full.as_ref().is_none_or(|(_, current)| {
                (result.template_consumed, result.input_consumed)
                    > (current.template_consumed, current.input_consumed)
            });
            if better {
                full = Some((*command, result.clone()));
            }
        }

        if let Some((command, result)) = full {
            return Selection::Full(Candidate {
                module,
                command,
                result,
            });
        }

        let mut partial: Vec<_> = results
            .iter()
            .filter(|(_, r)| r.template_consumed == score)
            .collect();
        partial.sort_by(|(_, a), (_, b)| b.template_length.cmp(&a.template_length));

        let mut suggestions: Vec<String> = Vec::with_capacity(partial.len());
        for (command, result) in partial {
            let text = format!(
                "{}{}",
                &input[..result.input_consumed],
                command.render_from(result.segments_consumed)
            );
            if !suggestions.contains(&text) {
                suggestions.push(text);
            }
        }
        if self.options.max_suggestions > 0 {
            suggestions.truncate(self.options.max_suggestions);
        }

        Selection::Partial {
            module,
            suggestions,
        }
    }

    /// Dispatches one message.
    ///
    /// Never fails: handler errors and panics are logged and turned into
    /// [`Reply::Failed`].
    pub async fn dispatch(&self, message: Message) -> Outcome {
        let span = debug_span!(
            "dispatch",
            channel = %message.channel,
            author = %message.author
        );

        async move {
            match self.select(message.content.trim()) {
                Selection::Full(candidate) => {
                    Outcome::Invoked(self.invoke(candidate, message).await)
                }
                Selection::Partial {
                    module,
                    suggestions,
                } => {
                    debug!(
                        module = module.name(),
                        count = suggestions.len(),
                        "Partial match, suggesting"
                    );
                    Outcome::Suggestions(suggestions)
                }
                Selection::None => {
                    debug!("No command recognized");
                    Outcome::Unrecognized
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn invoke(&self, candidate: Candidate<'_>, message: Message) -> Reply {
        let Candidate {
            module,
            command,
            result,
        } = candidate;
        let failed = || Reply::Failed(self.options.handler_error_message.clone());

        let values = match command.decode(&result.extracted) {
            Ok(values) => values,
            Err(e) => {
                error!(
                    module = module.name(),
                    command = command.name(),
                    error = %e,
                    "Parameter conversion failed after a complete match"
                );
                return failed();
            }
        };

        debug!(
            module = module.name(),
            command = command.name(),
            "Invoking handler"
        );
        let ctx = CommandContext::new(
            message,
            module.name(),
            command.name(),
            module.state(),
            Arc::clone(&self.responder),
        );

        match AssertUnwindSafe(command.invoke(ctx, values))
            .catch_unwind()
            .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                error!(
                    module = module.name(),
                    command = command.name(),
                    error = %e,
                    "Handler failed"
                );
                failed()
            }
            Err(panic) => {
                error!(
                    module = module.name(),
                    command = command.name(),
                    panic = panic_message(panic.as_ref()),
                    "Handler panicked"
                );
                failed()
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("modules", &self.registry.modules().len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tower integration
// ============================================================================

impl Service<Message> for Dispatcher {
    type Response = Outcome;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Outcome, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, message: Message) -> Self::Future {
        let this = self.clone();
        async move { Ok(this.dispatch(message).await) }.boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::error::ResponderError;
    use crate::module::ModuleBuilder;
    use crate::responder::NullResponder;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use tower::ServiceExt;

    // ------------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingResponder {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl Responder for RecordingResponder {
        async fn send(&self, channel: &str, text: &str) -> Result<(), ResponderError> {
            self.sent.lock().push((channel.to_owned(), text.to_owned()));
            Ok(())
        }
    }

    async fn play(_ctx: CommandContext) -> &'static str {
        "play"
    }

    async fn playlist(_ctx: CommandContext, name: String) -> String {
        format!("playlist {name}")
    }

    async fn volume(_ctx: CommandContext, level: u8) -> String {
        format!("volume {level}")
    }

    async fn create(
        _ctx: CommandContext,
        day: u8,
        month: u8,
        hour: u8,
        minute: u8,
        offset: i8,
        title: String,
    ) -> String {
        format!("{day}/{month} {hour}:{minute} {offset} {title}")
    }

    async fn list(_ctx: CommandContext) -> &'static str {
        "no raids"
    }

    async fn broken(_ctx: CommandContext) -> Result<String, String> {
        Err("database unavailable".to_owned())
    }

    async fn explode(_ctx: CommandContext) -> String {
        panic!("handler blew up")
    }

    async fn announce(ctx: CommandContext) -> Result<(), ResponderError> {
        ctx.reply(&format!("hello {}", ctx.author())).await
    }

    fn music() -> ModuleBuilder {
        Module::builder("music")
            .command(Command::new("play", "play").handler(play))
            .command(
                Command::new("playlist", "playlist {name}")
                    .pattern(r"\S+")
                    .handler(playlist),
            )
            .command(Command::new("volume", "volume {level}").handler(volume))
    }

    fn raid() -> ModuleBuilder {
        Module::builder("raid")
            .command(
                Command::new("create", "raid create {day}/{month} {hour}:{minute} UTC{offset} {title}")
                    .pattern(r".+")
                    .handler(create),
            )
            .command(Command::new("list", "raid list").handler(list))
    }

    fn faulty() -> ModuleBuilder {
        Module::builder("faulty")
            .command(Command::new("broken", "broken").handler(broken))
            .command(Command::new("explode", "explode").handler(explode))
            .command(Command::new("announce", "announce").handler(announce))
    }

    fn dispatcher() -> Dispatcher {
        let registry = Registry::builder()
            .module(music())
            .module(raid())
            .module(faulty())
            .build()
            .unwrap();
        Dispatcher::new(Arc::new(registry), Arc::new(NullResponder))
    }

    fn msg(content: &str) -> Message {
        Message::new("general", "ana", content)
    }

    fn text(outcome: Outcome) -> String {
        match outcome {
            Outcome::Invoked(Reply::Text(text)) => text,
            other => panic!("expected a text reply, got {other:?}"),
        }
    }

    // ------------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_full_match_invokes_with_decoded_values() {
        let outcome = dispatcher()
            .dispatch(msg("raid create 01/01 20:00 UTC+1 Fun raid"))
            .await;
        assert_eq!(text(outcome), "1/1 20:0 1 Fun raid");
    }

    #[tokio::test]
    async fn test_longer_template_wins_over_literal_prefix() {
        let outcome = dispatcher().dispatch(msg("playlist abc")).await;
        assert_eq!(text(outcome), "playlist abc");

        let outcome = dispatcher().dispatch(msg("PLAY")).await;
        assert_eq!(text(outcome), "play");
    }

    #[tokio::test]
    async fn test_placeholder_name_does_not_change_routing() {
        async fn music_clear(_ctx: CommandContext, name: String) -> String {
            format!("music:{name}")
        }
        async fn admin_clear(_ctx: CommandContext) -> &'static str {
            "admin:clear"
        }

        for template in ["playlist {}", "playlist {name_of_the_playlist}"] {
            let registry = Registry::builder()
                .module(
                    Module::builder("music").command(
                        Command::new("playlist", template)
                            .pattern(r"\S+")
                            .handler(music_clear),
                    ),
                )
                .module(
                    Module::builder("admin")
                        .command(Command::new("clear", "playlist clear").handler(admin_clear)),
                )
                .build()
                .unwrap();
            let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(NullResponder));

            let outcome = dispatcher.dispatch(msg("playlist clear")).await;
            assert_eq!(text(outcome), "admin:clear", "template {template:?}");
            let outcome = dispatcher.dispatch(msg("playlist rock")).await;
            assert_eq!(text(outcome), "music:rock", "template {template:?}");
        }
    }

    #[test]
    fn test_partial_match_suggests_continuations() {
        let dispatcher = dispatcher();
        match dispatcher.select("raid") {
            Selection::Partial {
                module,
                suggestions,
            } => {
                assert_eq!(module.name(), "raid");
                assert_eq!(
                    suggestions,
                    vec![
                        "raid create <day>/<month> <hour>:<minute> UTC<offset> <title>",
                        "raid list",
                    ]
                );
            }
            other => panic!("expected partial selection, got {other:?}"),
        }
    }

    #[test]
    fn test_suggestions_are_capped() {
        let dispatcher = dispatcher().with_options(DispatchOptions {
            max_suggestions: 1,
            ..DispatchOptions::default()
        });
        match dispatcher.select("raid") {
            Selection::Partial { suggestions, .. } => assert_eq!(suggestions.len(), 1),
            other => panic!("expected partial selection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_out_of_range_parameter_is_not_invoked() {
        let outcome = dispatcher().dispatch(msg("volume 999")).await;
        assert_eq!(outcome, Outcome::Suggestions(vec!["volume <level>".to_owned()]));

        let outcome = dispatcher().dispatch(msg("volume -1")).await;
        assert!(matches!(outcome, Outcome::Suggestions(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_input() {
        assert_eq!(dispatcher().dispatch(msg("dance")).await, Outcome::Unrecognized);
        assert_eq!(dispatcher().dispatch(msg("")).await, Outcome::Unrecognized);
    }

    #[test]
    fn test_module_tie_goes_to_first_registered() {
        async fn first(_ctx: CommandContext) -> &'static str {
            "first"
        }
        async fn second(_ctx: CommandContext) -> &'static str {
            "second"
        }

        let registry = Registry::builder()
            .module(Module::builder("a").command(Command::new("stats", "stats").handler(first)))
            .module(Module::builder("b").command(Command::new("stats", "stats").handler(second)))
            .build()
            .unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(NullResponder));

        match dispatcher.select("stats") {
            Selection::Full(candidate) => assert_eq!(candidate.module.name(), "a"),
            other => panic!("expected full selection, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_registry_is_unrecognized() {
        let dispatcher = Dispatcher::new(Arc::new(Registry::default()), Arc::new(NullResponder));
        assert!(matches!(dispatcher.select("anything"), Selection::None));
    }

    // ------------------------------------------------------------------------
    // Invocation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_handler_error_is_contained() {
        let dispatcher = dispatcher();
        let outcome = dispatcher.dispatch(msg("broken")).await;
        assert_eq!(
            outcome,
            Outcome::Invoked(Reply::Failed(DEFAULT_HANDLER_ERROR_MESSAGE.to_owned()))
        );

        let outcome = dispatcher.dispatch(msg("volume 70")).await;
        assert_eq!(text(outcome), "volume 70");
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let dispatcher = dispatcher().with_options(DispatchOptions {
            handler_error_message: "oops".to_owned(),
            ..DispatchOptions::default()
        });
        let outcome = dispatcher.dispatch(msg("explode")).await;
        assert_eq!(outcome, Outcome::Invoked(Reply::Failed("oops".to_owned())));

        let outcome = dispatcher.dispatch(msg("playlist chill")).await;
        assert_eq!(text(outcome), "playlist chill");
    }

    #[tokio::test]
    async fn test_side_effecting_handler() {
        let responder = Arc::new(RecordingResponder::default());
        let registry = Registry::builder().module(faulty()).build().unwrap();
        let dispatcher = Dispatcher::new(Arc::new(registry), responder.clone());

        let outcome = dispatcher.dispatch(msg("announce")).await;
        assert_eq!(outcome, Outcome::Invoked(Reply::Handled));
        assert_eq!(
            *responder.sent.lock(),
            vec![("general".to_owned(), "hello ana".to_owned())]
        );
    }

    #[tokio::test]
    async fn test_tower_service() {
        let outcome = dispatcher().oneshot(msg("  volume   42  ")).await.unwrap();
        assert_eq!(text(outcome), "volume 42");
    }
}
