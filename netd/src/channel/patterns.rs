//! Pattern matching utilities for prompt and error-signature detection.

use std::ops::Range;

use regex::bytes::Regex;

/// Test whether `pattern` matches anywhere in `text`.
pub fn matches(text: &[u8], pattern: &Regex) -> bool {
    pattern.is_match(text)
}

/// Test whether any of `patterns` matches anywhere in `text`.
pub fn matches_any<'a>(text: &[u8], patterns: impl IntoIterator<Item = &'a Regex>) -> bool {
    patterns.into_iter().any(|p| p.is_match(text))
}

/// An ordered set of compiled boundary patterns.
///
/// Used both for the prompts of one mode and for an operator's error
/// signatures. Patterns are tried in declaration order and the first one
/// that matches wins.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Regex>,
}

/// A match produced by a [`PatternSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetMatch {
    /// Index of the pattern inside the set.
    pub index: usize,

    /// Byte range of the match inside the searched text.
    pub range: Range<usize>,
}

impl PatternSet {
    /// Compile a pattern set. Fails on the first invalid pattern.
    pub fn new<I, S>(patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Check whether any pattern in the set matches `text`.
    pub fn is_match(&self, text: &[u8]) -> bool {
        matches_any(text, &self.patterns)
    }

    /// Find the first pattern (in declaration order) matching `text`.
    pub fn find(&self, text: &[u8]) -> Option<SetMatch> {
        self.find_at(text, 0)
    }

    /// Like [`find`](Self::find), but only report matches starting at or
    /// after `start`. Anchors still see the bytes before `start`, so `^`
    /// does not match in the middle of a line.
    pub fn find_at(&self, text: &[u8], start: usize) -> Option<SetMatch> {
        self.patterns.iter().enumerate().find_map(|(index, p)| {
            p.find_at(text, start).map(|m| SetMatch {
                index,
                range: m.range(),
            })
        })
    }

    /// Source text of the pattern at `index`.
    pub fn pattern_str(&self, index: usize) -> Option<&str> {
        self.patterns.get(index).map(Regex::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl<'a> IntoIterator for &'a PatternSet {
    type Item = &'a Regex;
    type IntoIter = std::slice::Iter<'a, Regex>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_anchored_at_tail() {
        let pattern = Regex::new(r"router#\s*$").unwrap();
        assert!(matches(b"router# ", &pattern));
        assert!(matches(b"some output\nrouter#", &pattern));
        assert!(!matches(b"router# show version\nok", &pattern));
        assert!(!matches(b"router> ", &pattern));
    }

    #[test]
    fn test_matches_any() {
        let set = PatternSet::new([r"> $", r"# $"]).unwrap();
        assert!(matches_any(b"asa> ", &set));
        assert!(matches_any(b"asa# ", &set));
        assert!(!matches_any(b"asa(config)", &set));
        assert!(!matches_any(b"anything", &PatternSet::default()));
    }

    #[test]
    fn test_find_reports_first_declared_pattern() {
        let set = PatternSet::new([r"% Invalid", r"%"]).unwrap();
        let m = set.find(b"xx\n% Invalid input\n").unwrap();
        assert_eq!(m.index, 0);
        assert_eq!(m.range, 3..12);
        assert_eq!(set.pattern_str(m.index), Some("% Invalid"));
    }

    #[test]
    fn test_find_at_keeps_line_context() {
        let set = PatternSet::new([r"(?mi)^error"]).unwrap();
        let text = b"no error here\r\nError: bad\r\n";
        assert_eq!(set.find_at(text, 3), Some(SetMatch { index: 0, range: 15..20 }));
        assert!(set.find_at(text, 16).is_none());
    }

    #[test]
    fn test_invalid_pattern_fails_construction() {
        assert!(PatternSet::new([r"ok", r"(unclosed"]).is_err());
    }
}
