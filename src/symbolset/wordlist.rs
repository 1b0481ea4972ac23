//! Word-list loading for delimiter-mode audits.

use super::{SymbolSet, SymbolSetError};
use std::io::BufRead;
use std::path::Path;

/// Loads a word list from a line-oriented file, one word per line.
///
/// Surrounding whitespace is trimmed and blank lines are skipped. The
/// resulting set uses the generator's `--words` selector.
pub fn load_wordlist(path: impl AsRef<Path>) -> Result<SymbolSet, SymbolSetError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| SymbolSetError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let set = from_reader(std::io::BufReader::new(file))?;
    tracing::info!(words = set.len(), path = %path.display(), "Word list loaded");
    Ok(set)
}

fn from_reader(reader: impl BufRead) -> Result<SymbolSet, SymbolSetError> {
    let mut words = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|source| SymbolSetError::Io {
            path: "<reader>".to_string(),
            source,
        })?;
        let word = line.trim();
        if !word.is_empty() {
            words.push(word.to_string());
        }
    }
    SymbolSet::from_words("words", "--words", words)
}
