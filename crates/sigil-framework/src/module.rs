//! Modules: named, ordered groups of commands.
//!
//! A module is assembled once at startup and never changes afterwards.
//! Registration errors from individual commands are collected while the
//! module is being built and reported by [`ModuleBuilder::build`], so a module
//! can be declared as one expression:
//!
//! ```rust,ignore
//! let music = Module::builder("music")
//!     .describe("Audio playback")
//!     .state(Playlist::default())
//!     .command(Command::new("play", "play").handler(play))
//!     .command(Command::new("playlist", "playlist {name}").pattern(r"\S+").handler(playlist))
//!     .build()?;
//! ```

use std::collections::HashSet;
use std::fmt::Write as _;
use std::sync::Arc;

use sigil_core::{RegistrationError, RegistrationResult};

use crate::command::CommandDescriptor;
use crate::context::ModuleState;

/// A named, immutable collection of commands.
#[derive(Clone)]
pub struct Module {
    name: String,
    description: Option<String>,
    commands: Vec<CommandDescriptor>,
    state: Option<ModuleState>,
}

impl Module {
    /// Starts building a module.
    pub fn builder(name: impl Into<String>) -> ModuleBuilder {
        ModuleBuilder::new(name)
    }

    /// Module name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional module description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Commands in registration order.
    pub fn commands(&self) -> &[CommandDescriptor] {
        &self.commands
    }

    /// Looks up a command by name (case-insensitive).
    pub fn command(&self, name: &str) -> Option<&CommandDescriptor> {
        self.commands
            .iter()
            .find(|cmd| cmd.name().eq_ignore_ascii_case(name))
    }

    /// Shared state handed to every handler of this module.
    pub fn state(&self) -> Option<ModuleState> {
        self.state.clone()
    }

    /// Renders the module's help: a header line and one usage line per command.
    pub fn help(&self) -> String {
        let mut out = match &self.description {
            Some(description) => format!("{} - {description}", self.name),
            None => self.name.clone(),
        };
        for command in &self.commands {
            let _ = write!(out, "\n  {}", command.usage());
            if let Some(description) = command.description() {
                let _ = write!(out, "  ({description})");
            }
        }
        out
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("commands", &self.commands.len())
            .field("has_state", &self.state.is_some())
            .finish()
    }
}

/// Builder for a [`Module`].
pub struct ModuleBuilder {
    name: String,
    description: Option<String>,
    commands: Vec<CommandDescriptor>,
    state: Option<ModuleState>,
    error: Option<RegistrationError>,
}

impl ModuleBuilder {
    /// Creates an empty builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            commands: Vec::new(),
            state: None,
            error: None,
        }
    }

    /// Name of the module being built.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sets the module description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the state shared by the module's handlers.
    pub fn state<T>(self, state: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.shared_state(Arc::new(state))
    }

    /// Sets state that is already behind an `Arc`.
    pub fn shared_state<T>(mut self, state: Arc<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.state = Some(state);
        self
    }

    /// Appends a command. Commands are tried in the order they are added.
    ///
    /// The first registration error is kept and returned by [`build`](Self::build).
    pub fn command(mut self, command: RegistrationResult<CommandDescriptor>) -> Self {
        match command {
            Ok(command) => self.commands.push(command),
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Finishes the module.
    pub fn build(self) -> RegistrationResult<Module> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let mut seen = HashSet::new();
        for command in &self.commands {
            if !seen.insert(command.name().to_ascii_lowercase()) {
                return Err(RegistrationError::DuplicateCommand {
                    module: self.name,
                    command: command.name().to_owned(),
                });
            }
        }

        Ok(Module {
            name: self.name,
            description: self.description,
            commands: self.commands,
            state: self.state,
        })
    }
}
