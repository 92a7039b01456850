//! Error types for templates, parameters and registration.

use thiserror::Error;

/// Errors raised while parsing a signature template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// The template has no content.
    #[error("signature template is empty")]
    Empty,

    /// The template starts or ends with whitespace, which trimmed input can
    /// never match.
    #[error("signature template has leading or trailing whitespace")]
    SurroundingWhitespace,

    /// A `{` was never closed.
    #[error("unterminated placeholder starting at byte {offset}")]
    Unterminated {
        /// Byte offset of the opening brace.
        offset: usize,
    },

    /// A `}` appeared without a matching `{` (use `}}` for a literal brace).
    #[error("unmatched '}}' at byte {offset}")]
    UnmatchedClose {
        /// Byte offset of the stray brace.
        offset: usize,
    },

    /// A placeholder name is not a plain identifier.
    #[error("invalid placeholder name '{name}'")]
    InvalidName {
        /// The offending name.
        name: String,
    },
}

/// Errors raised while scanning or converting a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// Nothing matching the parameter's shape was found at the cursor.
    #[error("expected {expected}")]
    Missing {
        /// Display name of the expected kind.
        expected: &'static str,
    },

    /// The text has the right shape but does not fit the target width or sign.
    #[error("'{raw}' is out of range for {expected}")]
    OutOfRange {
        /// The scanned text.
        raw: String,
        /// Display name of the expected kind.
        expected: &'static str,
    },

    /// The text could not be converted at all.
    #[error("'{raw}' is not a valid {expected}")]
    Malformed {
        /// The scanned text.
        raw: String,
        /// Display name of the expected kind.
        expected: &'static str,
    },

    /// The decoded value cannot be turned into the handler's argument type.
    #[error("{value} cannot be used as {target}")]
    TypeMismatch {
        /// Rendering of the decoded value.
        value: String,
        /// Name of the requested Rust type.
        target: &'static str,
    },
}

/// Errors raised while building a command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The signature template is malformed.
    #[error("command '{command}': {source}")]
    Template {
        /// Command name.
        command: String,
        /// Underlying template error.
        #[source]
        source: TemplateError,
    },

    /// The template's placeholders and the handler's parameters disagree in number.
    #[error("command '{command}': template has {placeholders} placeholder(s) but handler takes {parameters} parameter(s)")]
    ArityMismatch {
        /// Command name.
        command: String,
        /// Number of placeholders in the template.
        placeholders: usize,
        /// Number of parsed handler parameters.
        parameters: usize,
    },

    /// A string parameter was declared without a matching pattern.
    #[error("command '{command}': string parameter #{index} has no pattern")]
    MissingPattern {
        /// Command name.
        command: String,
        /// Zero-based parameter index.
        index: usize,
    },

    /// More patterns were supplied than there are string parameters.
    #[error("command '{command}': {extra} pattern(s) left over after binding string parameters")]
    UnusedPattern {
        /// Command name.
        command: String,
        /// Number of unused patterns.
        extra: usize,
    },

    /// A pattern failed to compile.
    #[error("command '{command}': invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Command name.
        command: String,
        /// The pattern source.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// A command with this name already exists in the module.
    #[error("module '{module}' already has a command named '{command}'")]
    DuplicateCommand {
        /// Module name.
        module: String,
        /// Command name.
        command: String,
    },

    /// A module with this name was already registered.
    #[error("module '{0}' is already registered")]
    DuplicateModule(String),
}

/// Result type for template parsing.
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Result type for parameter decoding.
pub type ParamResult<T> = Result<T, ParamError>;

/// Result type for registration.
pub type RegistrationResult<T> = Result<T, RegistrationError>;
