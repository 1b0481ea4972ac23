//! Run configuration and TOML file loading.

use crate::analysis::DEFAULT_THRESHOLD;
use crate::pipeline::TokenMode;
use crate::symbolset::Charset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Characters in each fixed-width output unit (one password line).
pub const CHARS_PER_UNIT: u32 = 64;

/// Words in each delimiter-mode output unit (one passphrase line).
pub const WORDS_PER_UNIT: u32 = 10;

/// Delimiter joining the words of a passphrase line.
pub const WORD_DELIMITER: char = '.';

/// Default generator invocations per run.
pub const DEFAULT_SAMPLE_UNITS: u64 = 1_000_000;

/// Reduced sample volume for quick runs. Misses smaller biases.
pub const FAST_SAMPLE_UNITS: u64 = 100_000;

/// Parameters for a single symbol-set run. Immutable for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Generator invocations to request.
    pub sample_units: u64,
    /// Symbols in each output unit.
    pub symbols_per_unit: u32,
    /// How output lines split into samples.
    pub mode: TokenMode,
    /// Significance threshold in standard deviations.
    pub threshold: f64,
    /// Kill the generator if the run exceeds this many seconds.
    pub timeout_secs: Option<u64>,
    /// Substring expected in diagnostics when the generator fails.
    pub failure_hint: Option<String>,
}

impl RunConfig {
    /// Configuration for a fixed-width character-set run.
    pub fn for_charset(sample_units: u64) -> Self {
        Self {
            sample_units,
            symbols_per_unit: CHARS_PER_UNIT,
            mode: TokenMode::FixedWidth,
            threshold: DEFAULT_THRESHOLD,
            timeout_secs: None,
            failure_hint: None,
        }
    }

    /// Configuration for a delimiter-mode word-list run.
    pub fn for_words(sample_units: u64) -> Self {
        Self {
            sample_units,
            symbols_per_unit: WORDS_PER_UNIT,
            mode: TokenMode::Delimiter(WORD_DELIMITER),
            threshold: DEFAULT_THRESHOLD,
            timeout_secs: None,
            failure_hint: None,
        }
    }

    /// Total samples the run promises to observe.
    pub fn expected_total(&self) -> u64 {
        self.sample_units * u64::from(self.symbols_per_unit)
    }

    /// Run timeout as a [`Duration`], if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validates the run parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_units == 0 {
            return Err(ConfigError::ZeroSampleUnits);
        }
        if self.symbols_per_unit == 0 {
            return Err(ConfigError::ZeroUnitLength);
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::BadThreshold(self.threshold));
        }
        Ok(())
    }
}

/// Configuration validation and loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("sample unit count must be positive")]
    ZeroSampleUnits,
    #[error("symbols per unit must be positive")]
    ZeroUnitLength,
    #[error("significance threshold must be a positive finite number, got {0}")]
    BadThreshold(f64),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Generator invocation settings.
    #[serde(default)]
    pub generator: GeneratorSection,
    /// Audit suite settings.
    #[serde(default)]
    pub audit: AuditSection,
}

/// `[generator]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSection {
    /// Path to the generator executable.
    pub program: Option<PathBuf>,
    /// Flag used to pass the unit count.
    pub count_flag: String,
    /// Substring expected in diagnostics when the generator fails.
    pub failure_hint: Option<String>,
}

impl Default for GeneratorSection {
    fn default() -> Self {
        Self {
            program: None,
            count_flag: "-p".to_string(),
            failure_hint: None,
        }
    }
}

/// `[audit]` section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditSection {
    /// Generator invocations per run.
    pub sample_units: u64,
    /// Significance threshold in standard deviations.
    pub threshold: f64,
    /// Character sets to audit.
    pub charsets: Vec<Charset>,
    /// Word list to audit in delimiter mode, if any.
    pub wordlist: Option<PathBuf>,
    /// Per-run timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Run the symbol sets in parallel pipelines.
    pub parallel: bool,
}

impl Default for AuditSection {
    fn default() -> Self {
        Self {
            sample_units: DEFAULT_SAMPLE_UNITS,
            threshold: DEFAULT_THRESHOLD,
            charsets: Charset::ALL.to_vec(),
            wordlist: None,
            timeout_secs: None,
            parallel: false,
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_configs_valid() {
        assert!(RunConfig::for_charset(DEFAULT_SAMPLE_UNITS).validate().is_ok());
        assert!(RunConfig::for_words(FAST_SAMPLE_UNITS).validate().is_ok());
    }

    #[test]
    fn test_zero_sample_units_invalid() {
        let config = RunConfig::for_charset(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroSampleUnits)
        ));
    }

    #[test]
    fn test_bad_threshold_invalid() {
        let mut config = RunConfig::for_charset(100);
        config.threshold = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::BadThreshold(_))));
        config.threshold = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::BadThreshold(_))));
    }

    #[test]
    fn test_expected_total() {
        let config = RunConfig::for_charset(100);
        assert_eq!(config.expected_total(), 6400);
        let config = RunConfig::for_words(100);
        assert_eq!(config.expected_total(), 1000);
    }

    #[test]
    fn test_parse_config_file() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [generator]
            program = "./passgen"
            count_flag = "-p"
            failure_hint = "Error getting random data"

            [audit]
            sample_units = 50000
            threshold = 4.0
            charsets = ["hex", "lower"]
            parallel = true
            "#,
        )
        .unwrap();

        assert_eq!(parsed.generator.program.as_deref(), Some(Path::new("./passgen")));
        assert_eq!(parsed.audit.sample_units, 50000);
        assert_eq!(parsed.audit.threshold, 4.0);
        assert_eq!(parsed.audit.charsets, vec![Charset::Hex, Charset::Lower]);
        assert!(parsed.audit.parallel);
        assert!(parsed.audit.wordlist.is_none());
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let parsed: FileConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.audit.sample_units, DEFAULT_SAMPLE_UNITS);
        assert_eq!(parsed.audit.charsets.len(), 5);
        assert_eq!(parsed.generator.count_flag, "-p");
    }
}
