//! Symbol sets defining the uniformity null hypothesis.
//!
//! A symbol set is the declared alphabet (characters) or word list the
//! generator under audit claims to draw from. It is loaded once before a
//! run and read-only thereafter; every frequency count and expected value
//! is defined relative to it.

mod charset;
mod wordlist;

pub use charset::{Charset, UnknownCharset};
pub use wordlist::load_wordlist;

use std::collections::HashMap;
use thiserror::Error;

/// Errors that can occur while building a symbol set.
#[derive(Debug, Error)]
pub enum SymbolSetError {
    #[error("symbol set needs at least two symbols, got {0}")]
    TooSmall(usize),
    #[error("duplicate symbol in set: {0:?}")]
    Duplicate(String),
    #[error("failed to read word list {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// An ordered collection of distinct symbols the generator draws from.
///
/// The declared order is preserved for reporting; membership lookup is
/// O(1). Instances are immutable once constructed.
#[derive(Debug, Clone)]
pub struct SymbolSet {
    name: String,
    selector: String,
    symbols: Vec<String>,
    index: HashMap<String, usize>,
}

impl SymbolSet {
    /// Builds a set from a string of characters, one symbol per character.
    ///
    /// Used for the built-in character sets, whose distinctness is fixed
    /// at compile time.
    pub(crate) fn from_chars(name: &str, selector: &str, chars: &str) -> Self {
        let symbols: Vec<String> = chars.chars().map(String::from).collect();
        let index: HashMap<String, usize> = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.clone(), i))
            .collect();
        debug_assert_eq!(index.len(), symbols.len(), "character sets must be distinct");
        Self {
            name: name.to_string(),
            selector: selector.to_string(),
            symbols,
            index,
        }
    }

    /// Builds a set from word symbols, validating size and distinctness.
    pub fn from_words(
        name: &str,
        selector: &str,
        words: impl IntoIterator<Item = String>,
    ) -> Result<Self, SymbolSetError> {
        let symbols: Vec<String> = words.into_iter().collect();
        if symbols.len() < 2 {
            return Err(SymbolSetError::TooSmall(symbols.len()));
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, symbol) in symbols.iter().enumerate() {
            if index.insert(symbol.clone(), i).is_some() {
                return Err(SymbolSetError::Duplicate(symbol.clone()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            selector: selector.to_string(),
            symbols,
            index,
        })
    }

    /// Human-readable name of the set (e.g. `hex`, `words`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Generator flag that selects this set (e.g. `--hex`).
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Number of symbols, the `k` of the null hypothesis.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// True if the set holds no symbols. Never true for a validated set.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Position of a symbol in declared order, or `None` if it is not a
    /// member.
    pub fn position(&self, symbol: &str) -> Option<usize> {
        self.index.get(symbol).copied()
    }

    /// Symbol at the given position in declared order.
    pub fn symbol(&self, position: usize) -> &str {
        &self.symbols[position]
    }

    /// Iterates over symbols in declared order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.symbols.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chars_preserves_order() {
        let set = SymbolSet::from_chars("ab", "--ab", "ab");
        assert_eq!(set.len(), 2);
        assert_eq!(set.symbol(0), "a");
        assert_eq!(set.symbol(1), "b");
        assert_eq!(set.position("b"), Some(1));
        assert_eq!(set.position("c"), None);
    }

    #[test]
    fn test_from_words_rejects_duplicates() {
        let words = vec!["apple".to_string(), "apple".to_string()];
        assert!(matches!(
            SymbolSet::from_words("words", "--words", words),
            Err(SymbolSetError::Duplicate(_))
        ));
    }

    #[test]
    fn test_from_words_rejects_singleton() {
        let words = vec!["apple".to_string()];
        assert!(matches!(
            SymbolSet::from_words("words", "--words", words),
            Err(SymbolSetError::TooSmall(1))
        ));
    }

    #[test]
    fn test_word_lookup() {
        let words = vec!["apple".to_string(), "banana".to_string()];
        let set = SymbolSet::from_words("words", "--words", words).unwrap();
        assert_eq!(set.position("banana"), Some(1));
        assert_eq!(set.position("cherry"), None);
        assert_eq!(set.symbols().collect::<Vec<_>>(), vec!["apple", "banana"]);
    }
}
