//! The command registry.
//!
//! A [`Registry`] is built once through [`RegistryBuilder`] and is read-only
//! from then on. The dispatcher receives it as an `Arc<Registry>`; nothing
//! about it lives in global state.
//!
//! Module order matters: when two modules score the same for an input, the one
//! registered first wins.

use std::collections::HashSet;
use std::fmt::Write as _;

use sigil_core::{RegistrationError, RegistrationResult};
use tracing::{debug, info};

use crate::command::CommandDescriptor;
use crate::module::{Module, ModuleBuilder};

/// Immutable, ordered set of modules.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules: Vec<Module>,
}

impl Registry {
    /// Starts building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Modules in registration order.
    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    /// Looks up a module by name (case-insensitive).
    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules
            .iter()
            .find(|module| module.name().eq_ignore_ascii_case(name))
    }

    /// Looks up a command by module and command name.
    pub fn command(&self, module: &str, command: &str) -> Option<&CommandDescriptor> {
        self.module(module)?.command(command)
    }

    /// Total number of commands across all modules.
    pub fn command_count(&self) -> usize {
        self.modules.iter().map(|m| m.commands().len()).sum()
    }

    /// Help for an input whose first word names a module.
    pub fn help_for(&self, text: &str) -> Option<String> {
        let first = text.split_whitespace().next()?;
        self.module(first).map(Module::help)
    }

    /// Lists every module and its commands.
    pub fn overview(&self) -> String {
        let mut out = String::new();
        for module in &self.modules {
            let _ = write!(out, "{}:", module.name());
            for command in module.commands() {
                let _ = write!(out, " {}", command.name());
            }
            out.push('\n');
        }
        out.truncate(out.trim_end().len());
        out
    }
}

/// Builder for a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    modules: Vec<RegistrationResult<Module>>,
    disabled: HashSet<String>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. Modules are ranked in the order they are added.
    pub fn module(mut self, module: ModuleBuilder) -> Self {
        self.modules.push(module.build());
        self
    }

    /// Adds an already built module.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(Ok(module));
        self
    }

    /// Leaves the named module out of the registry.
    pub fn disable(mut self, name: impl Into<String>) -> Self {
        self.disabled.insert(name.into().to_ascii_lowercase());
        self
    }

    /// Validates every module and freezes the registry.
    pub fn build(self) -> RegistrationResult<Registry> {
        let mut seen = HashSet::new();
        let mut modules = Vec::with_capacity(self.modules.len());

        for module in self.modules {
            let module = module?;
            let key = module.name().to_ascii_lowercase();
            if !seen.insert(key.clone()) {
                return Err(RegistrationError::DuplicateModule(module.name().to_owned()));
            }
            if self.disabled.contains(&key) {
                info!(module = module.name(), "Module disabled, skipping");
                continue;
            }
            debug!(
                module = module.name(),
                commands = module.commands().len(),
                "Module registered"
            );
            modules.push(module);
        }

        Ok(Registry { modules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use crate::context::CommandContext;

    async fn noop(_ctx: CommandContext) {}

    fn raid() -> ModuleBuilder {
        Module::builder("raid")
            .describe("Raid scheduling")
            .command(Command::new("list", "raid list").handler(noop))
            .command(Command::new("cancel", "raid cancel").handler(noop))
    }

    fn music() -> ModuleBuilder {
        Module::builder("music").command(Command::new("play", "play").handler(noop))
    }

    #[test]
    fn test_build_and_lookup() {
        let registry = Registry::builder().module(raid()).module(music()).build().unwrap();
        assert_eq!(registry.modules().len(), 2);
        assert_eq!(registry.command_count(), 3);
        assert!(registry.command("Raid", "LIST").is_some());
        assert!(registry.command("music", "list").is_none());
        assert_eq!(registry.overview(), "raid: list cancel\nmusic: play");
    }

    #[test]
    fn test_duplicate_module_rejected() {
        let err = Registry::builder().module(music()).module(music()).build().unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateModule("music".to_owned()));
    }

    #[test]
    fn test_disabled_module_is_left_out() {
        let registry = Registry::builder()
            .module(raid())
            .module(music())
            .disable("MUSIC")
            .build()
            .unwrap();
        assert!(registry.module("music").is_none());
        assert_eq!(registry.modules().len(), 1);
    }

    #[test]
    fn test_help_for_first_word() {
        let registry = Registry::builder().module(raid()).build().unwrap();
        let help = registry.help_for("raid frobnicate").unwrap();
        assert!(help.starts_with("raid - Raid scheduling"));
        assert!(help.contains("raid cancel"));
        assert!(registry.help_for("dance").is_none());
        assert!(registry.help_for("   ").is_none());
    }
}
