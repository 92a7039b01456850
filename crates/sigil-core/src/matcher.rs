//! Single-pass signature matcher.
//!
//! [`match_signature`] walks the template and the input side by side exactly
//! once. It never backtracks: the first literal or parameter that does not fit
//! ends the scan, and how far it got becomes the candidate's score. Commands
//! that share a literal prefix are told apart purely by that depth.

use tracing::trace;

use crate::cursor::Cursor;
use crate::param::ParameterKind;
use crate::template::{Template, Token};

/// Outcome of matching one template against one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Bytes of input consumed when the scan stopped.
    pub input_consumed: usize,
    /// Template consumed when the scan stopped, in bytes with every
    /// placeholder counted as `{}`.
    pub template_consumed: usize,
    /// Total template length, measured the same way.
    pub template_length: usize,
    /// Index of the first template segment that was not consumed.
    pub segments_consumed: usize,
    /// `true` when the whole template was consumed.
    pub complete: bool,
    /// Raw text of every parameter read before the scan stopped.
    pub extracted: Vec<String>,
    /// Why the scan stopped early, if it hit a mismatch.
    pub error: Option<String>,
}

impl MatchResult {
    /// Returns `true` when at least one template character was consumed.
    pub fn is_partial(&self) -> bool {
        !self.complete && self.template_consumed > 0
    }
}

/// Matches `input` against `template`, decoding placeholders with `kinds`.
///
/// `kinds[i]` decodes the placeholder with index `i`.
pub fn match_signature(template: &Template, kinds: &[ParameterKind], input: &str) -> MatchResult {
    let segments = template.segments();
    let mut cursor = Cursor::new(input);
    let mut next = 0;
    let mut extracted = Vec::new();
    let mut error = None;

    while next < segments.len() && !cursor.is_at_end() {
        match &segments[next].token {
            Token::Whitespace => {
                if !cursor.current().is_some_and(char::is_whitespace) {
                    error = Some("expected whitespace".to_owned());
                    break;
                }
                cursor.skip_whitespace();
                next += 1;
            }
            Token::Placeholder { index, name } => {
                let Some(kind) = kinds.get(*index) else {
                    error = Some(format!("no parameter bound to placeholder #{index}"));
                    break;
                };

                cursor.skip_whitespace();
                match kind.read(&mut cursor, template.stop_char_after(next)) {
                    Ok(raw) => {
                        extracted.push(raw.to_owned());
                        next += 1;
                        // Tolerate separators the template does not ask for.
                        if !matches!(
                            segments.get(next).map(|seg| &seg.token),
                            Some(Token::Whitespace)
                        ) {
                            cursor.skip_whitespace();
                        }
                    }
                    Err(e) => {
                        let role = name.as_deref().unwrap_or(kind.name());
                        error = Some(format!("<{role}>: {e}"));
                        break;
                    }
                }
            }
            Token::Literal(expected) => match cursor.current() {
                Some(ch) if ch.eq_ignore_ascii_case(expected) => {
                    cursor.advance();
                    next += 1;
                }
                _ => {
                    error = Some(format!("expected '{expected}'"));
                    break;
                }
            },
        }
    }

    let template_consumed = template.offset_of(next);
    let result = MatchResult {
        input_consumed: cursor.position(),
        template_consumed,
        template_length: template.len(),
        segments_consumed: next,
        complete: template_consumed == template.len(),
        extracted,
        error,
    };

    trace!(
        template = template.as_str(),
        input_consumed = result.input_consumed,
        template_consumed = result.template_consumed,
        complete = result.complete,
        "Signature scanned"
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamType;

    fn kind(ty: ParamType) -> ParameterKind {
        ParameterKind::from_type(ty, None).unwrap()
    }

    fn raid_create() -> (Template, Vec<ParameterKind>) {
        let template = Template::parse("raid create {}/{} {}:{} UTC{} {}").unwrap();
        let kinds = vec![
            kind(ParamType::U8),
            kind(ParamType::U8),
            kind(ParamType::U8),
            kind(ParamType::U8),
            kind(ParamType::I8),
            ParameterKind::string(r".+").unwrap(),
        ];
        (template, kinds)
    }

    #[test]
    fn test_full_match() {
        let (template, kinds) = raid_create();
        let input = "raid create 01/01 20:00 UTC+1 Fun raid";
        let result = match_signature(&template, &kinds, input);

        assert!(result.complete);
        assert_eq!(result.template_consumed, result.template_length);
        assert_eq!(result.input_consumed, input.len());
        assert_eq!(result.extracted, vec!["01", "01", "20", "00", "+1", "Fun raid"]);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_prefix_before_first_placeholder() {
        let (template, kinds) = raid_create();
        let result = match_signature(&template, &kinds, "raid create ");
        assert!(!result.complete);
        assert_eq!(result.template_consumed, "raid create ".len());
        assert!(result.extracted.is_empty());
    }

    #[test]
    fn test_whitespace_runs_of_any_length() {
        let template = Template::parse("raid create").unwrap();
        let result = match_signature(&template, &[], "raid \t  create");
        assert!(result.complete);
    }

    #[test]
    fn test_case_insensitive_literals() {
        let template = Template::parse("raid create").unwrap();
        let lower = match_signature(&template, &[], "raid create");
        let upper = match_signature(&template, &[], "RAID CREATE");
        assert!(upper.complete);
        assert_eq!(lower.template_consumed, upper.template_consumed);
    }

    #[test]
    fn test_literal_mismatch_stops() {
        let template = Template::parse("raid create").unwrap();
        let result = match_signature(&template, &[], "raid delete");
        assert!(!result.complete);
        assert_eq!(result.template_consumed, 5);
        assert_eq!(result.input_consumed, 5);
        assert_eq!(result.error.as_deref(), Some("expected 'c'"));
    }

    #[test]
    fn test_numeric_rejection_stops_before_token() {
        let template = Template::parse("volume {}").unwrap();
        let kinds = vec![kind(ParamType::U8)];

        for input in ["volume 999", "volume -1"] {
            let result = match_signature(&template, &kinds, input);
            assert!(!result.complete);
            assert_eq!(result.template_consumed, "volume ".len());
            assert_eq!(result.input_consumed, "volume ".len());
            assert!(result.extracted.is_empty());
            assert!(result.error.is_some());
        }
    }

    #[test]
    fn test_whitespace_required_by_template() {
        let template = Template::parse("play {}").unwrap();
        let kinds = vec![ParameterKind::string(r"\S+").unwrap()];
        let result = match_signature(&template, &kinds, "playlist abc");
        assert!(!result.complete);
        assert_eq!(result.template_consumed, 4);
        assert_eq!(result.error.as_deref(), Some("expected whitespace"));
    }

    #[test]
    fn test_extra_separators_tolerated() {
        let template = Template::parse("at {}:{}").unwrap();
        let kinds = vec![kind(ParamType::U8), kind(ParamType::U8)];
        let result = match_signature(&template, &kinds, "at 20 : 30");
        assert!(result.complete);
        assert_eq!(result.extracted, vec!["20", "30"]);
    }

    #[test]
    fn test_input_exhausted_mid_template() {
        let template = Template::parse("raid list").unwrap();
        let result = match_signature(&template, &[], "raid");
        assert!(result.is_partial());
        assert_eq!(result.template_consumed, 4);
        assert_eq!(result.segments_consumed, 4);
        assert_eq!(result.error, None);
    }

    #[test]
    fn test_named_placeholder_scores_like_anonymous() {
        let kinds = vec![ParameterKind::string(r"\S+").unwrap()];
        let anonymous = Template::parse("playlist {} now").unwrap();
        let named = Template::parse("playlist {name_of_the_playlist} now").unwrap();

        for input in ["playlist clear", "playlist clear now"] {
            let a = match_signature(&anonymous, &kinds, input);
            let n = match_signature(&named, &kinds, input);
            assert_eq!(a.template_consumed, n.template_consumed);
            assert_eq!(a.template_length, n.template_length);
            assert_eq!(a.complete, n.complete);
        }
        let full = match_signature(&named, &kinds, "playlist clear now");
        assert!(full.complete);
        assert_eq!(full.template_length, "playlist {} now".len());
    }

    #[test]
    fn test_string_stops_at_literal_of_any_case() {
        let template = Template::parse("{}X").unwrap();
        let kinds = vec![ParameterKind::string(r".+").unwrap()];
        let result = match_signature(&template, &kinds, "titlex");
        assert!(result.complete);
        assert_eq!(result.extracted, vec!["title"]);
    }

    #[test]
    fn test_literal_only_template_ignores_trailing_input() {
        let template = Template::parse("play").unwrap();
        let result = match_signature(&template, &[], "playlist abc");
        assert!(result.complete);
        assert_eq!(result.input_consumed, 4);
    }
}
