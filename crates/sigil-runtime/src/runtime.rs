//! Runtime orchestration: configuration, logging, registry and the worker loop.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sigil_runtime::SigilRuntime;
//!
//! let runtime = SigilRuntime::builder()
//!     .config_file("sigil.toml")
//!     .module(music_module())
//!     .module(raid_module())
//!     .build()?;
//!
//! // Read commands from stdin until Ctrl+C or end of input.
//! runtime.run_console().await?;
//! ```
//!
//! Any other transport feeds [`Message`]s through an `mpsc` channel and
//! supplies its own [`Responder`]:
//!
//! ```rust,ignore
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! runtime.run_with(rx, Arc::new(MyChatResponder::new())).await?;
//! ```
//!
//! Messages are handled one at a time, in arrival order.

use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use sigil_framework::{
    Dispatcher, Message, ModuleBuilder, Outcome, PrefixLayer, PrefixService, Registry, Responder,
};
use tokio::signal;
use tokio::sync::mpsc;
use tower::{Layer, ServiceExt};
use tracing::{debug, error, info, warn};

use crate::config::{ConfigLoader, SigilConfig, validate_config};
use crate::console::{ConsoleResponder, spawn_stdin_source};
use crate::error::RuntimeResult;
use crate::logging;

/// Author name given to console input.
const CONSOLE_AUTHOR: &str = "console";

/// A configured dispatcher with its modules, ready to process messages.
pub struct SigilRuntime {
    config: SigilConfig,
    registry: Arc<Registry>,
    prefix: PrefixLayer,
}

impl SigilRuntime {
    /// Creates a runtime builder.
    ///
    /// ```rust,ignore
    /// let runtime = SigilRuntime::builder()
    ///     .config_file("config/sigil.toml")
    ///     .profile("production")
    ///     .module(raid_module())
    ///     .build()?;
    /// ```
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Creates a runtime from an already loaded configuration and registry.
    ///
    /// Initializes logging from the configuration unless a subscriber is
    /// already installed.
    pub fn new(config: SigilConfig, registry: Registry) -> Self {
        logging::init_from_config(&config.logging);
        Self::assemble(config, registry)
    }

    fn assemble(config: SigilConfig, registry: Registry) -> Self {
        info!(
            modules = registry.modules().len(),
            commands = registry.command_count(),
            prefix = %config.dispatcher.prefix,
            "Runtime initialized"
        );

        let prefix = PrefixLayer::new(&config.dispatcher.prefix);
        Self {
            config,
            registry: Arc::new(registry),
            prefix,
        }
    }

    /// Returns a reference to the configuration.
    pub fn config(&self) -> &SigilConfig {
        &self.config
    }

    /// Returns the module registry.
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// A dispatcher over this runtime's registry, replying through `responder`.
    pub fn dispatcher(&self, responder: Arc<dyn Responder>) -> Dispatcher {
        Dispatcher::new(Arc::clone(&self.registry), responder)
            .with_options(self.config.dispatcher.dispatch_options())
    }

    /// The dispatcher wrapped in the configured command prefix.
    pub fn service(&self, responder: Arc<dyn Responder>) -> PrefixService<Dispatcher> {
        self.prefix.layer(self.dispatcher(responder))
    }

    /// Turns an outcome into the text sent back, if any.
    ///
    /// `input` is the command text without its prefix. It is used to offer
    /// module help when the first word names a module but nothing matched.
    pub fn render_outcome(&self, input: &str, outcome: &Outcome) -> Option<String> {
        let dispatcher = &self.config.dispatcher;
        match outcome {
            Outcome::Invoked(reply) => reply.text().map(str::to_owned),
            Outcome::Suggestions(suggestions) if suggestions.is_empty() => None,
            Outcome::Suggestions(suggestions) => {
                let mut text = dispatcher.suggestion_header.clone();
                for suggestion in suggestions {
                    let _ = write!(text, "\n  {}{}", dispatcher.prefix, suggestion);
                }
                Some(text)
            }
            Outcome::Unrecognized => self
                .registry
                .help_for(input)
                .or_else(|| dispatcher.unrecognized_reply.clone()),
        }
    }

    /// Dispatches one message and sends the rendered reply.
    ///
    /// Delivery failures are logged and otherwise ignored.
    pub async fn handle(
        &self,
        service: &PrefixService<Dispatcher>,
        responder: &dyn Responder,
        message: Message,
    ) {
        let Some(input) = self.prefix.strip(&message.content).map(str::to_owned) else {
            debug!(channel = %message.channel, "Ignoring message without command prefix");
            return;
        };
        let channel = message.channel.clone();

        let outcome = match service.clone().oneshot(message).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => return,
            Err(never) => match never {},
        };

        let Some(text) = self.render_outcome(&input, &outcome) else {
            return;
        };
        if let Err(e) = responder.send(&channel, &text).await {
            warn!(channel = %channel, error = %e, "Failed to deliver reply");
        }
    }

    /// Processes messages from `source` until it closes or the process
    /// receives Ctrl+C or SIGTERM.
    pub async fn run_with(
        &self,
        source: mpsc::Receiver<Message>,
        responder: Arc<dyn Responder>,
    ) -> RuntimeResult<()> {
        let shutdown = ShutdownSignal::register()?;
        info!("Press Ctrl+C to stop");
        self.run_until(source, responder, shutdown.recv()).await
    }

    /// Processes messages from `source` until it closes or `shutdown` resolves.
    pub async fn run_until<F>(
        &self,
        mut source: mpsc::Receiver<Message>,
        responder: Arc<dyn Responder>,
        shutdown: F,
    ) -> RuntimeResult<()>
    where
        F: Future<Output = ()>,
    {
        let service = self.service(Arc::clone(&responder));
        tokio::pin!(shutdown);

        info!("Sigil runtime is now running");

        loop {
            tokio::select! {
                biased;
                () = &mut shutdown => break,
                message = source.recv() => match message {
                    Some(message) => self.handle(&service, responder.as_ref(), message).await,
                    None => {
                        info!("Message source closed");
                        break;
                    }
                },
            }
        }

        info!("Runtime stopped");
        Ok(())
    }

    /// Reads commands from stdin and prints replies to stdout.
    pub async fn run_console(&self) -> RuntimeResult<()> {
        let source = spawn_stdin_source(CONSOLE_AUTHOR);
        self.run_with(source, Arc::new(ConsoleResponder::new()))
            .await
    }
}

// =============================================================================
// Shutdown
// =============================================================================

/// Ctrl+C and, on Unix, SIGTERM.
struct ShutdownSignal {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl ShutdownSignal {
    fn register() -> std::io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal::unix::signal(signal::unix::SignalKind::terminate())?,
        })
    }

    async fn recv(self) {
        #[cfg(unix)]
        {
            let mut terminate = self.terminate;
            tokio::select! {
                result = signal::ctrl_c() => log_ctrl_c(result),
                _ = terminate.recv() => info!("Received SIGTERM, shutting down"),
            }
        }

        #[cfg(not(unix))]
        log_ctrl_c(signal::ctrl_c().await);
    }
}

fn log_ctrl_c(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Received Ctrl+C, shutting down"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
    }
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Builder for a [`SigilRuntime`].
///
/// Modules switched off with `enabled = false` under `[modules.<name>]` are
/// skipped when the registry is built.
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    config: Option<SigilConfig>,
    modules: Vec<ModuleBuilder>,
}

impl RuntimeBuilder {
    /// Creates a builder that searches the current directory for configuration.
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new().with_current_dir(),
            config: None,
            modules: Vec::new(),
        }
    }

    /// Sets a specific configuration file to load.
    pub fn config_file<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g., "development", "production").
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<std::path::Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.config_loader = self.config_loader.with_env();
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Uses `config` as is instead of loading configuration.
    pub fn config(mut self, config: SigilConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Adds a module. Modules are matched in the order they are added.
    pub fn module(mut self, module: ModuleBuilder) -> Self {
        self.modules.push(module);
        self
    }

    /// Loads configuration, initializes logging and builds the registry.
    pub fn build(self) -> RuntimeResult<SigilRuntime> {
        let config = match self.config {
            Some(config) => {
                validate_config(&config)?;
                config
            }
            None => self.config_loader.load()?,
        };

        logging::init_from_config(&config.logging);

        let mut registry = Registry::builder();
        for module in self.modules {
            registry = registry.module(module);
        }
        for (name, module) in &config.modules {
            if !module.enabled {
                registry = registry.disable(name);
            }
        }
        let registry = registry.build()?;

        for (name, module) in &config.modules {
            if module.enabled && registry.module(name).is_none() {
                warn!(module = %name, "Configuration refers to an unknown module");
            }
        }

        Ok(SigilRuntime::assemble(config, registry))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
