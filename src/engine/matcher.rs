// WHY: finds are matched as escaped literals through regex-automata so Unicode case folding
// comes from the pattern engine, while word boundaries are explicit character predicates

use std::ops::Range;

use regex_automata::{meta::Regex, util::syntax, Input};

use crate::error::Error;

/// Characters with special meaning in a pattern that must be escaped in a literal find
const PATTERN_META: &[char] = &[
    '\\', '.', '+', '*', '?', '(', ')', '|', '[', ']', '{', '}', '^', '$', '#', '&', '-', '~',
];

/// Letter, digit or underscore, Unicode-aware
#[inline]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphabetic() || ch.is_numeric() || ch == '_'
}

/// Escape `literal` so it matches itself verbatim
pub fn escape_literal(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() * 2);
    for ch in literal.chars() {
        if PATTERN_META.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Compiled matcher for one normalized find string
#[derive(Debug, Clone)]
pub struct LiteralMatcher {
    regex: Regex,
}

impl LiteralMatcher {
    /// Compile `find` as a literal, case-insensitive unless `match_case`
    pub fn compile(find: &str, match_case: bool) -> Result<Self, Error> {
        if find.is_empty() {
            return Err(Error::InvalidRule {
                find: find.to_string(),
                reason: "find string is empty".to_string(),
            });
        }
        let regex = Regex::builder()
            .syntax(
                syntax::Config::new()
                    .unicode(true)
                    .utf8(true)
                    .case_insensitive(!match_case),
            )
            .build(&escape_literal(find))
            .map_err(|e| Error::InvalidRule {
                find: find.to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { regex })
    }

    /// Byte range of the first occurrence in `haystack` starting at or after `from`
    pub fn find_from(&self, haystack: &str, from: usize) -> Option<Range<usize>> {
        self.find_in(haystack, from..haystack.len())
    }

    /// Byte range of the first occurrence lying entirely inside `span`
    pub fn find_in(&self, haystack: &str, span: Range<usize>) -> Option<Range<usize>> {
        if span.start > span.end || span.end > haystack.len() {
            return None;
        }
        self.regex
            .find(Input::new(haystack).range(span))
            .map(|m| m.range())
            .filter(|range| !range.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_chars() {
        for ch in ['a', 'Z', 'đ', 'ệ', '7', '_', '٣', '字'] {
            assert!(is_word_char(ch), "{ch:?} should be a word char");
        }
        for ch in [' ', '-', '.', '"', '\'', '\n'] {
            assert!(!is_word_char(ch), "{ch:?} should not be a word char");
        }
    }

    #[test]
    fn test_escape_literal_metacharacters() {
        assert_eq!(escape_literal("a.b"), "a\\.b");
        assert_eq!(escape_literal("(x)*"), "\\(x\\)\\*");
        assert_eq!(escape_literal("plain words"), "plain words");
    }

    #[test]
    fn test_literal_matches_metacharacters_verbatim() {
        let matcher = LiteralMatcher::compile("a.c", true).unwrap();
        assert_eq!(matcher.find_from("abc a.c", 0), Some(4..7));

        let matcher = LiteralMatcher::compile("$1 [x]", true).unwrap();
        assert_eq!(matcher.find_from("cost $1 [x]!", 0), Some(5..11));
    }

    #[test]
    fn test_case_insensitive_unicode() {
        let matcher = LiteralMatcher::compile("việt", false).unwrap();
        assert_eq!(matcher.find_from("TIẾNG VIỆT", 0), Some(8..14));

        let sensitive = LiteralMatcher::compile("việt", true).unwrap();
        assert_eq!(sensitive.find_from("TIẾNG VIỆT", 0), None);
    }

    #[test]
    fn test_find_from_offset() {
        let matcher = LiteralMatcher::compile("ab", true).unwrap();
        assert_eq!(matcher.find_from("ab ab", 1), Some(3..5));
        assert_eq!(matcher.find_from("ab ab", 5), None);
        assert_eq!(matcher.find_from("ab ab", 9), None);
    }

    #[test]
    fn test_find_in_stops_at_span_end() {
        let matcher = LiteralMatcher::compile("cat", true).unwrap();
        assert_eq!(matcher.find_in("cat cat", 1..7), Some(4..7));
        // an occurrence crossing the span end is not reported
        assert_eq!(matcher.find_in("cat cat", 1..6), None);
        assert_eq!(matcher.find_in("cat", 2..1), None);
    }

    #[test]
    fn test_empty_find_is_invalid() {
        let err = LiteralMatcher::compile("", false).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::InvalidRule);
    }
}
