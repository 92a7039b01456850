//! Command descriptors and their builder.
//!
//! ```rust,ignore
//! let create = Command::new("create", "raid create {day}/{month} {hour}:{minute} UTC{offset} {title}")
//!     .pattern(r".+")
//!     .describe("Schedule a raid")
//!     .handler(create_raid)?;
//! ```
//!
//! String parameters have no natural boundary, so each one needs a pattern.
//! Patterns are bound to the string parameters in the order they are given.

use std::borrow::Cow;

use futures::future::BoxFuture;
use sigil_core::{
    MatchResult, ParamError, ParamResult, ParamValue, ParameterKind, RegistrationError,
    RegistrationResult, Template, anchored, match_signature,
};

use crate::context::CommandContext;
use crate::error::HandlerResult;
use crate::handler::{BoxedHandler, Handler, Reply, into_handler};

/// Builder for a [`CommandDescriptor`].
#[derive(Debug, Clone)]
pub struct Command {
    name: String,
    template: String,
    description: Option<String>,
    patterns: Vec<String>,
}

impl Command {
    /// Starts a command with a name (for help and lookup) and a signature template.
    pub fn new(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            template: template.into(),
            description: None,
            patterns: Vec::new(),
        }
    }

    /// Adds the pattern for the next string parameter.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.patterns.push(pattern.into());
        self
    }

    /// Sets a one-line description shown in help.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Binds the handler and validates the command.
    ///
    /// Fails when the template is malformed, when its placeholder count differs
    /// from the handler's parameter count, or when string parameters and
    /// patterns do not pair up.
    pub fn handler<H, T>(self, handler: H) -> RegistrationResult<CommandDescriptor>
    where
        H: Handler<T>,
        T: 'static,
    {
        let template =
            Template::parse(&self.template).map_err(|source| RegistrationError::Template {
                command: self.name.clone(),
                source,
            })?;

        let types = H::param_types();
        if template.placeholder_count() != types.len() {
            return Err(RegistrationError::ArityMismatch {
                command: self.name,
                placeholders: template.placeholder_count(),
                parameters: types.len(),
            });
        }

        let mut patterns = self.patterns.into_iter();
        let mut kinds = Vec::with_capacity(types.len());
        for (index, ty) in types.into_iter().enumerate() {
            let pattern = if ty.needs_pattern() {
                let source = patterns.next().ok_or_else(|| RegistrationError::MissingPattern {
                    command: self.name.clone(),
                    index,
                })?;
                let compiled =
                    anchored(&source).map_err(|e| RegistrationError::InvalidPattern {
                        command: self.name.clone(),
                        pattern: source.clone(),
                        reason: e.to_string(),
                    })?;
                Some(compiled)
            } else {
                None
            };

            let kind = ParameterKind::from_type(ty, pattern).ok_or_else(|| {
                RegistrationError::MissingPattern {
                    command: self.name.clone(),
                    index,
                }
            })?;
            kinds.push(kind);
        }

        let extra = patterns.count();
        if extra > 0 {
            return Err(RegistrationError::UnusedPattern {
                command: self.name,
                extra,
            });
        }

        Ok(CommandDescriptor {
            name: self.name,
            description: self.description,
            template,
            kinds,
            handler: into_handler(handler),
        })
    }
}

/// A registered command: its signature, parameter kinds and handler.
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    description: Option<String>,
    template: Template,
    kinds: Vec<ParameterKind>,
    handler: BoxedHandler,
}

impl CommandDescriptor {
    /// Command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Optional help description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The parsed signature template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Parameter kinds, one per placeholder.
    pub fn kinds(&self) -> &[ParameterKind] {
        &self.kinds
    }

    /// Runs the matcher for this command against `input`.
    pub fn matches(&self, input: &str) -> MatchResult {
        match_signature(&self.template, &self.kinds, input)
    }

    /// Display label of placeholder `index`: its name, or its kind.
    pub fn param_label(&self, index: usize, name: Option<&str>) -> String {
        match name {
            Some(name) => name.to_owned(),
            None => self
                .kinds
                .get(index)
                .map_or("?", ParameterKind::name)
                .to_owned(),
        }
    }

    /// Renders the template from segment `from` with placeholders as `<label>`.
    pub fn render_from(&self, from: usize) -> String {
        self.template
            .render_from(from, |index, name| Cow::Owned(self.param_label(index, name)))
    }

    /// Full usage string, e.g. `raid create <day>/<month> ...`.
    pub fn usage(&self) -> String {
        self.render_from(0)
    }

    /// Converts raw extracted strings into values through the parameter kinds.
    pub fn decode(&self, extracted: &[String]) -> ParamResult<Vec<ParamValue>> {
        if extracted.len() != self.kinds.len() {
            return Err(ParamError::Missing {
                expected: self
                    .kinds
                    .get(extracted.len())
                    .map_or("no more parameters", ParameterKind::name),
            });
        }

        self.kinds
            .iter()
            .zip(extracted)
            .map(|(kind, raw)| kind.decode(raw))
            .collect()
    }

    /// Invokes the handler with decoded values.
    pub fn invoke(
        &self,
        ctx: CommandContext,
        values: Vec<ParamValue>,
    ) -> BoxFuture<'static, HandlerResult<Reply>> {
        (self.handler)(ctx, values)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("template", &self.template.as_str())
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create(
        _ctx: CommandContext,
        _day: u8,
        _month: u8,
        _hour: u8,
        _minute: u8,
        _offset: i8,
        title: String,
    ) -> String {
        title
    }

    async fn volume(_ctx: CommandContext, level: u8) -> String {
        level.to_string()
    }

    #[test]
    fn test_build_binds_kinds_in_order() {
        let command = Command::new("create", "raid create {day}/{month} {}:{} UTC{offset} {title}")
            .pattern(r".+")
            .handler(create)
            .unwrap();
        let names: Vec<_> = command.kinds().iter().map(ParameterKind::name).collect();
        assert_eq!(names, vec!["u8", "u8", "u8", "u8", "i8", "text"]);
        assert_eq!(
            command.usage(),
            "raid create <day>/<month> <u8>:<u8> UTC<offset> <title>"
        );
    }

    #[test]
    fn test_arity_mismatch_rejected() {
        let err = Command::new("volume", "volume {} {}").handler(volume).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::ArityMismatch {
                placeholders: 2,
                parameters: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_string_without_pattern_rejected() {
        let err = Command::new("create", "raid create {}/{} {}:{} UTC{} {}")
            .handler(create)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::MissingPattern { index: 5, .. }));
    }

    #[test]
    fn test_pattern_errors() {
        let err = Command::new("volume", "volume {}")
            .pattern(r"\d+")
            .handler(volume)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::UnusedPattern { extra: 1, .. }));

        let err = Command::new("create", "raid create {}/{} {}:{} UTC{} {}")
            .pattern(r"(")
            .handler(create)
            .unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_malformed_template_rejected() {
        let err = Command::new("volume", "volume {").handler(volume).unwrap_err();
        assert!(matches!(err, RegistrationError::Template { .. }));

        let err = Command::new("volume", "volume {} ").handler(volume).unwrap_err();
        assert!(matches!(err, RegistrationError::Template { .. }));
    }

    #[test]
    fn test_decode_requires_every_parameter() {
        let command = Command::new("volume", "volume {}").handler(volume).unwrap();
        assert_eq!(
            command.decode(&["70".to_owned()]),
            Ok(vec![ParamValue::Unsigned(70)])
        );
        assert!(command.decode(&[]).is_err());
        assert!(command.decode(&["700".to_owned()]).is_err());
    }
}
