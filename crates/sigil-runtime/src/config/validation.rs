//! Configuration validation utilities.
//!
//! Unknown log levels, formats and outputs never get this far: they are
//! rejected while the configuration is extracted.

use super::error::{ConfigError, ConfigResult};
use super::schema::{DispatcherConfig, LogFormat, LogOutput, LoggingConfig, SigilConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &SigilConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_dispatcher_config(&config.dispatcher)?;
    validate_module_names(config)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.output is \"file\" but logging.file_path is not set",
        ));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "logging.format \"json\" requires the json-log feature",
        ));
    }

    if let Some(target) = logging.filters.keys().find(|t| t.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid logging filter target: {target:?}"
        )));
    }

    Ok(())
}

fn validate_dispatcher_config(dispatcher: &DispatcherConfig) -> ConfigResult<()> {
    if dispatcher.prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::validation(format!(
            "Command prefix must not contain whitespace: {:?}",
            dispatcher.prefix
        )));
    }

    if dispatcher.handler_error_message.trim().is_empty() {
        return Err(ConfigError::validation(
            "dispatcher.handler_error_message must not be empty",
        ));
    }

    Ok(())
}

fn validate_module_names(config: &SigilConfig) -> ConfigResult<()> {
    if let Some(name) = config.modules.keys().find(|name| name.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid module name: {name:?}"
        )));
    }
    Ok(())
}
