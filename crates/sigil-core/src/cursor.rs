//! Forward-only scanning view over a line of text.
//!
//! A [`Cursor`] never moves backwards. Callers that need to "try" a read keep a
//! copy of the cursor and only write it back when the read succeeds, which keeps
//! the position monotonic for a single matching pass.
//!
//! All distances and positions are byte offsets into the UTF-8 text and always
//! fall on character boundaries.

use regex::Regex;

/// A read-only, forward-scanning view over a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor positioned at the start of `text`.
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// The full underlying text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Current byte offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Text from the current position to the end.
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Text already scanned.
    pub fn consumed(&self) -> &'a str {
        &self.text[..self.pos]
    }

    /// Returns `true` once every character has been consumed.
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// The character at the current position, or `None` at the end.
    pub fn current(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Looks `offset` characters ahead without moving. `peek(0)` equals [`current`](Self::current).
    pub fn peek(&self, offset: usize) -> Option<char> {
        self.remaining().chars().nth(offset)
    }

    /// Moves forward by one character.
    ///
    /// Returns `false` (and stays put) when already at the end.
    pub fn advance(&mut self) -> bool {
        match self.current() {
            Some(ch) => {
                self.pos += ch.len_utf8();
                true
            }
            None => false,
        }
    }

    /// Advances past any whitespace and returns the number of bytes skipped.
    pub fn skip_whitespace(&mut self) -> usize {
        let rest = self.remaining();
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
        skipped
    }

    /// Distance in bytes to the next occurrence of `ch`.
    ///
    /// A whitespace `ch` matches any whitespace character and an ASCII letter
    /// matches either case, the same way literals compare. Does not move the
    /// cursor.
    pub fn find(&self, ch: char) -> Option<usize> {
        if ch.is_whitespace() {
            self.remaining().find(char::is_whitespace)
        } else if ch.is_ascii_alphabetic() {
            self.remaining().find(|c: char| c.eq_ignore_ascii_case(&ch))
        } else {
            self.remaining().find(ch)
        }
    }

    /// Reads the text matched by `pattern` starting exactly at the cursor.
    ///
    /// With `limit`, only the first `limit` bytes of the remaining text are
    /// visible to the pattern. Returns `None` when already at the end and
    /// `Some("")` when the pattern does not match at the current position.
    /// The cursor advances by the length of the returned text.
    pub fn read_matching(&mut self, pattern: &Regex, limit: Option<usize>) -> Option<&'a str> {
        if self.is_at_end() {
            return None;
        }

        let rest = self.remaining();
        let window = match limit {
            Some(limit) => &rest[..floor_char_boundary(rest, limit)],
            None => rest,
        };

        let matched = match pattern.find(window) {
            Some(m) if m.start() == 0 => m.as_str(),
            _ => "",
        };
        self.pos += matched.len();
        Some(matched)
    }
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_and_peek() {
        let cursor = Cursor::new("abc");
        assert_eq!(cursor.current(), Some('a'));
        assert_eq!(cursor.peek(0), Some('a'));
        assert_eq!(cursor.peek(2), Some('c'));
        assert_eq!(cursor.peek(3), None);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut cursor = Cursor::new("é!");
        assert!(cursor.advance());
        assert_eq!(cursor.position(), 2);
        assert!(cursor.advance());
        assert!(cursor.is_at_end());
        assert!(!cursor.advance());
        assert_eq!(cursor.current(), None);
    }

    #[test]
    fn test_skip_whitespace_mixed_kinds() {
        let mut cursor = Cursor::new(" \t\u{a0}x");
        let skipped = cursor.skip_whitespace();
        assert_eq!(cursor.current(), Some('x'));
        assert_eq!(skipped, cursor.position());
        assert_eq!(cursor.skip_whitespace(), 0);
    }

    #[test]
    fn test_find_whitespace_matches_any_kind() {
        let cursor = Cursor::new("ab\tcd");
        assert_eq!(cursor.find(' '), Some(2));
        assert_eq!(cursor.find('d'), Some(4));
        assert_eq!(cursor.find('z'), None);
    }

    #[test]
    fn test_find_letters_ignores_case() {
        let cursor = Cursor::new("titleX rest");
        assert_eq!(cursor.find('x'), Some(5));
        assert_eq!(Cursor::new("titlex").find('X'), Some(5));
        assert_eq!(Cursor::new("a/b").find('/'), Some(1));
    }

    #[test]
    fn test_read_matching_is_anchored() {
        let digits = Regex::new(r"\d+").unwrap();
        let mut cursor = Cursor::new("ab12");
        assert_eq!(cursor.read_matching(&digits, None), Some(""));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_read_matching_with_limit() {
        let word = Regex::new(r"^.+").unwrap();
        let mut cursor = Cursor::new("fun raid/x");
        assert_eq!(cursor.read_matching(&word, Some(8)), Some("fun raid"));
        assert_eq!(cursor.current(), Some('/'));
    }

    #[test]
    fn test_read_matching_at_end() {
        let any = Regex::new(r"^.*").unwrap();
        let mut cursor = Cursor::new("");
        assert_eq!(cursor.read_matching(&any, None), None);
    }
}
