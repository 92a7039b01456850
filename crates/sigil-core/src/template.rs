//! Signature templates.
//!
//! A template is the grammar of one command: literal characters, whitespace
//! runs and placeholders.
//!
//! ```text
//! raid create {day}/{month} {hour}:{minute} UTC{offset} {title}
//! └──literal─┘└ph─┘│└─ph──┘ ...
//! ```
//!
//! - Literal characters match case-insensitively (ASCII folding).
//! - A whitespace run matches one or more whitespace characters of any kind.
//! - `{}` or `{name}` consumes one parameter, in order. `{{` and `}}` are
//!   literal braces.
//!
//! Consumption is scored in template bytes, except that every placeholder
//! counts as [`PLACEHOLDER_WIDTH`] bytes whatever its name.

use std::borrow::Cow;
use std::ops::Range;

use crate::error::{TemplateError, TemplateResult};

/// Scoring width of one placeholder, the width of `{}`.
pub const PLACEHOLDER_WIDTH: usize = 2;

/// One element of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A single literal character.
    Literal(char),
    /// A run of one or more whitespace characters.
    Whitespace,
    /// A parameter slot.
    Placeholder {
        /// Zero-based parameter index, in template order.
        index: usize,
        /// Optional display name.
        name: Option<String>,
    },
}

/// A token together with its byte span in the template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub token: Token,
    pub span: Range<usize>,
}

/// A parsed signature template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
    /// Scoring offset of each segment, plus the total width at the end.
    offsets: Vec<usize>,
    placeholders: usize,
}

impl Template {
    /// Parses a template string.
    pub fn parse(source: &str) -> TemplateResult<Self> {
        if source.is_empty() {
            return Err(TemplateError::Empty);
        }
        if source.trim() != source {
            return Err(TemplateError::SurroundingWhitespace);
        }

        let mut segments = Vec::new();
        let mut placeholders = 0;
        let mut chars = source.char_indices().peekable();

        while let Some((start, ch)) = chars.next() {
            let (token, end) = match ch {
                c if c.is_whitespace() => {
                    let mut end = start + c.len_utf8();
                    while let Some(&(i, next)) = chars.peek() {
                        if !next.is_whitespace() {
                            break;
                        }
                        end = i + next.len_utf8();
                        chars.next();
                    }
                    (Token::Whitespace, end)
                }
                '{' if matches!(chars.peek(), Some((_, '{'))) => {
                    chars.next();
                    (Token::Literal('{'), start + 2)
                }
                '}' if matches!(chars.peek(), Some((_, '}'))) => {
                    chars.next();
                    (Token::Literal('}'), start + 2)
                }
                '}' => return Err(TemplateError::UnmatchedClose { offset: start }),
                '{' => {
                    let close = source[start..]
                        .find('}')
                        .map(|i| start + i)
                        .ok_or(TemplateError::Unterminated { offset: start })?;
                    let name = &source[start + 1..close];
                    if !name.is_empty() && !is_identifier(name) {
                        return Err(TemplateError::InvalidName {
                            name: name.to_owned(),
                        });
                    }
                    while chars.peek().is_some_and(|&(i, _)| i <= close) {
                        chars.next();
                    }

                    let token = Token::Placeholder {
                        index: placeholders,
                        name: (!name.is_empty()).then(|| name.to_owned()),
                    };
                    placeholders += 1;
                    (token, close + 1)
                }
                c => (Token::Literal(c), start + c.len_utf8()),
            };
            segments.push(Segment {
                token,
                span: start..end,
            });
        }

        let mut offsets = Vec::with_capacity(segments.len() + 1);
        let mut width = 0;
        for seg in &segments {
            offsets.push(width);
            width += match seg.token {
                Token::Placeholder { .. } => PLACEHOLDER_WIDTH,
                _ => seg.span.len(),
            };
        }
        offsets.push(width);

        Ok(Self {
            source: source.to_owned(),
            segments,
            offsets,
            placeholders,
        })
    }

    /// The original template text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Scoring length of the template.
    ///
    /// Equals the byte length when every placeholder is written `{}`.
    pub fn len(&self) -> usize {
        self.offsets.last().copied().unwrap_or_default()
    }

    /// Always `false`; empty templates are rejected by [`parse`](Self::parse).
    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of placeholders.
    pub fn placeholder_count(&self) -> usize {
        self.placeholders
    }

    /// Names of the placeholders in order (`None` for anonymous `{}`).
    pub fn placeholder_names(&self) -> impl Iterator<Item = Option<&str>> {
        self.segments.iter().filter_map(|seg| match &seg.token {
            Token::Placeholder { name, .. } => Some(name.as_deref()),
            _ => None,
        })
    }

    /// Scoring offset at which segment `index` starts, or [`len`](Self::len)
    /// when `index` is past the last segment.
    pub fn offset_of(&self, index: usize) -> usize {
        self.offsets
            .get(index)
            .copied()
            .unwrap_or_else(|| self.len())
    }

    /// The character a string parameter at segment `index` should stop before.
    ///
    /// This is the literal directly after the placeholder, or a space (meaning
    /// "any whitespace") when a whitespace run follows. Returns `None` when
    /// another placeholder or the end of the template follows.
    pub fn stop_char_after(&self, index: usize) -> Option<char> {
        match self.segments.get(index + 1).map(|seg| &seg.token) {
            Some(Token::Literal(ch)) => Some(*ch),
            Some(Token::Whitespace) => Some(' '),
            _ => None,
        }
    }

    /// Renders the template from segment `from` onward, replacing each
    /// placeholder with `<label>`.
    ///
    /// `label` receives the placeholder's index and name.
    pub fn render_from<'a, F>(&'a self, from: usize, label: F) -> String
    where
        F: Fn(usize, Option<&'a str>) -> Cow<'a, str>,
    {
        let mut out = String::new();
        for seg in self.segments.iter().skip(from) {
            match &seg.token {
                Token::Literal(ch) => out.push(*ch),
                Token::Whitespace => out.push_str(&self.source[seg.span.clone()]),
                Token::Placeholder { index, name } => {
                    out.push('<');
                    out.push_str(&label(*index, name.as_deref()));
                    out.push('>');
                }
            }
        }
        out
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literals_and_whitespace() {
        let template = Template::parse("raid   create").unwrap();
        let tokens: Vec<_> = template.segments().iter().map(|s| &s.token).collect();
        assert_eq!(tokens.len(), 4 + 1 + 6);
        assert_eq!(tokens[4], &Token::Whitespace);
        assert_eq!(template.segments()[4].span, 4..7);
        assert_eq!(template.placeholder_count(), 0);
    }

    #[test]
    fn test_parse_placeholders() {
        let template = Template::parse("raid create {}/{month} UTC{offset}").unwrap();
        assert_eq!(template.placeholder_count(), 3);
        let names: Vec<_> = template.placeholder_names().collect();
        assert_eq!(names, vec![None, Some("month"), Some("offset")]);
        assert_eq!(template.len(), "raid create {}/{} UTC{}".len());
    }

    #[test]
    fn test_placeholder_names_do_not_change_width() {
        let anonymous = Template::parse("playlist {} now").unwrap();
        let named = Template::parse("playlist {name_of_the_playlist} now").unwrap();
        assert_eq!(named.len(), anonymous.len());
        for index in 0..=anonymous.segments().len() {
            assert_eq!(named.offset_of(index), anonymous.offset_of(index));
        }
        assert_eq!(named.segments()[9].span, 9..31);
    }

    #[test]
    fn test_surrounding_whitespace_rejected() {
        for source in ["raid list ", " raid list", "\traid list\n"] {
            assert_eq!(
                Template::parse(source),
                Err(TemplateError::SurroundingWhitespace)
            );
        }
        assert!(Template::parse("raid  list").is_ok());
    }

    #[test]
    fn test_escaped_braces_are_literals() {
        let template = Template::parse("{{x}}").unwrap();
        let tokens: Vec<_> = template.segments().iter().map(|s| s.token.clone()).collect();
        assert_eq!(
            tokens,
            vec![
                Token::Literal('{'),
                Token::Literal('x'),
                Token::Literal('}')
            ]
        );
        assert_eq!(template.placeholder_count(), 0);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Template::parse(""), Err(TemplateError::Empty));
        assert_eq!(
            Template::parse("roll {"),
            Err(TemplateError::Unterminated { offset: 5 })
        );
        assert_eq!(
            Template::parse("roll }"),
            Err(TemplateError::UnmatchedClose { offset: 5 })
        );
        assert!(matches!(
            Template::parse("roll {two words}"),
            Err(TemplateError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_stop_char_after() {
        let template = Template::parse("{}/{} {}{}").unwrap();
        assert_eq!(template.stop_char_after(0), Some('/'));
        assert_eq!(template.stop_char_after(2), Some(' '));
        assert_eq!(template.stop_char_after(4), None);
        assert_eq!(template.stop_char_after(5), None);
    }

    #[test]
    fn test_render_from() {
        let template = Template::parse("play {song} now").unwrap();
        let rendered = template.render_from(5, |i, name| {
            Cow::Owned(name.map_or_else(|| format!("arg{i}"), str::to_owned))
        });
        assert_eq!(rendered, "<song> now");
        assert_eq!(template.offset_of(5), 5);
        assert_eq!(template.offset_of(99), template.len());
    }
}
