//! Configuration schema definitions.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sigil_framework::{DEFAULT_HANDLER_ERROR_MESSAGE, DispatchOptions};

use super::error::{ConfigError, ConfigResult};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SigilConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Dispatcher settings.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,

    /// Per-module settings, keyed by module name.
    #[serde(default)]
    pub modules: HashMap<String, ModuleConfig>,
}

impl SigilConfig {
    /// Returns `false` if the module is switched off in configuration.
    pub fn module_enabled(&self, name: &str) -> bool {
        self.module(name).is_none_or(|module| module.enabled)
    }

    /// Deserializes the `settings` table of a module.
    ///
    /// Falls back to `T::default()` when the module has no settings.
    ///
    /// ```rust,ignore
    /// #[derive(Deserialize, Default)]
    /// struct RaidSettings { max_raids: usize }
    ///
    /// let settings: RaidSettings = config.module_settings("raid")?;
    /// ```
    pub fn module_settings<T>(&self, name: &str) -> ConfigResult<T>
    where
        T: DeserializeOwned + Default,
    {
        match self.module(name).map(|module| &module.settings) {
            None | Some(serde_json::Value::Null) => Ok(T::default()),
            Some(value) => serde_json::from_value(value.clone())
                .map_err(|e| ConfigError::module_settings(name, e.to_string())),
        }
    }

    fn module(&self, name: &str) -> Option<&ModuleConfig> {
        self.modules
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, module)| module)
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name, as used in filter directives.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to the `tracing` level.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Full,
    Pretty,
    /// Requires the `json-log` feature.
    Json,
}

/// Where log lines are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    /// Standard error, so replies on stdout stay readable.
    #[default]
    Stderr,
    Stdout,
    File,
}

/// Which span lifecycle events are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SpanEventConfig {
    #[serde(default)]
    pub new: bool,
    #[serde(default)]
    pub enter: bool,
    #[serde(default)]
    pub exit: bool,
    #[serde(default)]
    pub close: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LoggingConfig {
    /// Base log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Line format.
    #[serde(default)]
    pub format: LogFormat,

    /// Destination.
    #[serde(default)]
    pub output: LogOutput,

    /// Span events to log.
    #[serde(default)]
    pub span_events: SpanEventConfig,

    /// Include thread ids.
    #[serde(default)]
    pub thread_ids: bool,

    /// Include file and line number.
    #[serde(default)]
    pub file_location: bool,

    /// Log file path when `output = "file"`.
    #[serde(default)]
    pub file_path: Option<PathBuf>,

    /// Per-target levels, e.g. `sigil_core = "trace"`.
    #[serde(default)]
    pub filters: HashMap<String, LogLevel>,
}

// =============================================================================
// Dispatcher
// =============================================================================

/// Dispatcher and reply settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Marker a message must start with to be treated as a command.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Maximum number of suggestions shown; `0` means no limit.
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,

    /// Reply sent when a handler fails.
    #[serde(default = "default_handler_error_message")]
    pub handler_error_message: String,

    /// Reply for unrecognized commands; `None` stays silent.
    #[serde(default)]
    pub unrecognized_reply: Option<String>,

    /// Line shown above suggestions.
    #[serde(default = "default_suggestion_header")]
    pub suggestion_header: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            max_suggestions: default_max_suggestions(),
            handler_error_message: default_handler_error_message(),
            unrecognized_reply: None,
            suggestion_header: default_suggestion_header(),
        }
    }
}

impl DispatcherConfig {
    /// Options for the framework dispatcher.
    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            max_suggestions: self.max_suggestions,
            handler_error_message: self.handler_error_message.clone(),
        }
    }
}

fn default_prefix() -> String {
    "!".to_string()
}

fn default_max_suggestions() -> usize {
    DispatchOptions::default().max_suggestions
}

fn default_handler_error_message() -> String {
    DEFAULT_HANDLER_ERROR_MESSAGE.to_string()
}

fn default_suggestion_header() -> String {
    "Did you mean:".to_string()
}

// =============================================================================
// Modules
// =============================================================================

/// Settings for one module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleConfig {
    /// Whether the module is registered at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Free-form, module-specific settings.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub settings: serde_json::Value,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            settings: serde_json::Value::Null,
        }
    }
}

fn default_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct RaidSettings {
        max_raids: usize,
    }

    fn config_with(settings: serde_json::Value) -> SigilConfig {
        let mut config = SigilConfig::default();
        config.modules.insert(
            "Raid".to_string(),
            ModuleConfig {
                enabled: false,
                settings,
            },
        );
        config
    }

    #[test]
    fn test_module_settings() {
        let config = config_with(json!({ "max_raids": 3 }));
        let settings: RaidSettings = config.module_settings("raid").unwrap();
        assert_eq!(settings, RaidSettings { max_raids: 3 });

        let settings: RaidSettings = config.module_settings("music").unwrap();
        assert_eq!(settings, RaidSettings::default());

        let config = config_with(json!({ "max_raids": "many" }));
        assert!(matches!(
            config.module_settings::<RaidSettings>("raid"),
            Err(ConfigError::ModuleSettings { .. })
        ));
    }

    #[test]
    fn test_module_enabled() {
        let config = config_with(serde_json::Value::Null);
        assert!(!config.module_enabled("raid"));
        assert!(config.module_enabled("music"));
    }

    #[test]
    fn test_dispatcher_defaults() {
        let config = DispatcherConfig::default();
        assert_eq!(config.prefix, "!");
        assert_eq!(config.dispatch_options(), DispatchOptions::default());
    }
}
