//! Built-in character sets matching the audited generator's documented
//! alphabets.

use super::SymbolSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const HEX: &str = "0123456789ABCDEF";
const ALPHANUMERIC: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ASCII: &str =
    "!\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";
const DIGIT: &str = "0123456789";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";

/// The character sets the generator can be asked to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Charset {
    /// Uppercase hexadecimal digits (k = 16).
    Hex,
    /// Lower, upper and digit characters (k = 62).
    Alpha,
    /// Printable ASCII excluding space (k = 94).
    Ascii,
    /// Decimal digits (k = 10).
    Digit,
    /// Lowercase letters (k = 26).
    Lower,
}

impl Charset {
    /// Every built-in set, in the order runs are reported.
    pub const ALL: [Charset; 5] = [
        Charset::Hex,
        Charset::Alpha,
        Charset::Ascii,
        Charset::Digit,
        Charset::Lower,
    ];

    /// Short name used in configuration and reports.
    pub fn name(self) -> &'static str {
        match self {
            Charset::Hex => "hex",
            Charset::Alpha => "alpha",
            Charset::Ascii => "ascii",
            Charset::Digit => "digit",
            Charset::Lower => "lower",
        }
    }

    /// Generator flag that selects this set.
    pub fn selector(self) -> &'static str {
        match self {
            Charset::Hex => "--hex",
            Charset::Alpha => "--alpha",
            Charset::Ascii => "--ascii",
            Charset::Digit => "--digit",
            Charset::Lower => "--lower",
        }
    }

    fn characters(self) -> &'static str {
        match self {
            Charset::Hex => HEX,
            Charset::Alpha => ALPHANUMERIC,
            Charset::Ascii => ASCII,
            Charset::Digit => DIGIT,
            Charset::Lower => LOWER,
        }
    }

    /// Materializes this set as a [`SymbolSet`].
    pub fn symbol_set(self) -> SymbolSet {
        SymbolSet::from_chars(self.name(), self.selector(), self.characters())
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unrecognized character-set name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown character set {0:?} (expected hex, alpha, ascii, digit or lower)")]
pub struct UnknownCharset(pub String);

impl FromStr for Charset {
    type Err = UnknownCharset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hex" => Ok(Charset::Hex),
            "alpha" => Ok(Charset::Alpha),
            "ascii" => Ok(Charset::Ascii),
            "digit" => Ok(Charset::Digit),
            "lower" => Ok(Charset::Lower),
            other => Err(UnknownCharset(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_sizes() {
        assert_eq!(Charset::Hex.symbol_set().len(), 16);
        assert_eq!(Charset::Alpha.symbol_set().len(), 62);
        assert_eq!(Charset::Ascii.symbol_set().len(), 94);
        assert_eq!(Charset::Digit.symbol_set().len(), 10);
        assert_eq!(Charset::Lower.symbol_set().len(), 26);
    }

    #[test]
    fn test_ascii_covers_printable_range() {
        let set = Charset::Ascii.symbol_set();
        for code in 0x21u8..=0x7E {
            let symbol = (code as char).to_string();
            assert!(set.position(&symbol).is_some(), "missing {:?}", symbol);
        }
        assert!(set.position(" ").is_none());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hex".parse::<Charset>().unwrap(), Charset::Hex);
        assert_eq!("lower".parse::<Charset>().unwrap(), Charset::Lower);
        assert!("base64".parse::<Charset>().is_err());
    }

    #[test]
    fn test_selector_flags() {
        assert_eq!(Charset::Hex.selector(), "--hex");
        assert_eq!(Charset::Alpha.selector(), "--alpha");
    }
}
