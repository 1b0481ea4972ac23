//! Splitting generator output lines into symbol samples.

use serde::{Deserialize, Serialize};
use std::str::{CharIndices, Split};

/// How one output line decomposes into samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenMode {
    /// Every character of the line is one sample (character-set audits).
    FixedWidth,
    /// The line splits on the delimiter (word-list audits).
    ///
    /// Empty segments are discarded, so a trailing delimiter yields no
    /// extra sample: `"x.y.z."` under `.` is exactly three tokens.
    Delimiter(char),
}

/// Lazy, single-pass iterator over the samples of one line.
#[derive(Debug)]
pub struct Tokens<'a> {
    line: &'a str,
    inner: Inner<'a>,
}

#[derive(Debug)]
enum Inner<'a> {
    Fixed(CharIndices<'a>),
    Split(Split<'a, char>),
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let line = self.line;
        match &mut self.inner {
            Inner::Fixed(chars) => chars.next().map(|(i, c)| &line[i..i + c.len_utf8()]),
            Inner::Split(segments) => segments.find(|s| !s.is_empty()),
        }
    }
}

/// Tokenizes one line of generator output under the given mode.
pub fn tokens(line: &str, mode: TokenMode) -> Tokens<'_> {
    let inner = match mode {
        TokenMode::FixedWidth => Inner::Fixed(line.char_indices()),
        TokenMode::Delimiter(d) => Inner::Split(line.split(d)),
    };
    Tokens { line, inner }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_yields_every_character() {
        let collected: Vec<&str> = tokens("AB0F", TokenMode::FixedWidth).collect();
        assert_eq!(collected, vec!["A", "B", "0", "F"]);
    }

    #[test]
    fn test_fixed_width_empty_line() {
        assert_eq!(tokens("", TokenMode::FixedWidth).count(), 0);
    }

    #[test]
    fn test_delimiter_split() {
        let collected: Vec<&str> = tokens("alpha.beta.gamma", TokenMode::Delimiter('.')).collect();
        assert_eq!(collected, vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_trailing_delimiter_yields_no_extra_sample() {
        let collected: Vec<&str> = tokens("x.y.z.", TokenMode::Delimiter('.')).collect();
        assert_eq!(collected, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_interior_empty_segment_is_discarded() {
        let collected: Vec<&str> = tokens("x..y", TokenMode::Delimiter('.')).collect();
        assert_eq!(collected, vec!["x", "y"]);
    }

    #[test]
    fn test_delimiter_only_line() {
        assert_eq!(tokens("...", TokenMode::Delimiter('.')).count(), 0);
    }
}
