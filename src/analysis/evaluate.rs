//! Per-symbol z-tests and the combined run verdict.

use crate::pipeline::FrequencyTable;
use crate::symbolset::SymbolSet;
use std::collections::BTreeMap;
use thiserror::Error;

/// Default significance threshold in standard deviations.
///
/// At 3.5 SD each symbol has a false-positive chance of about 1 in 2149.
/// That rate is per symbol and deliberately not Bonferroni-corrected
/// across the set; with 94 symbols the whole-run false-positive rate is
/// noticeably higher, which is an accepted imprecision of the tool.
pub const DEFAULT_THRESHOLD: f64 = 3.5;

/// Errors that make a run's statistics undefined.
#[derive(Debug, Clone, Error)]
pub enum EvaluateError {
    /// The stream produced no samples at all; with n = 0 the standard
    /// deviation is zero and z-scores are undefined.
    #[error("no samples were observed; the run is indeterminate")]
    NoSamples,
}

/// Test outcome for a single symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolStat {
    /// The symbol under test.
    pub symbol: String,
    /// How many times it was observed.
    pub observed: u64,
    /// Expected count under the uniform null, n / k.
    pub expected: f64,
    /// Standard deviations between observed and expected.
    pub z_score: f64,
    /// True if the z-score is within the threshold.
    pub pass: bool,
}

/// Run-level failure signals independent of any single symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// Observed total differs from requested units x symbols-per-unit.
    pub count_mismatch: bool,
    /// A symbol outside the declared set appeared in the stream.
    pub unknown_symbol: bool,
    /// The generator subprocess exited nonzero.
    pub generator_failed: bool,
}

impl RunFlags {
    /// True if any run-level signal fired.
    pub fn any(self) -> bool {
        self.count_mismatch || self.unknown_symbol || self.generator_failed
    }
}

/// Full statistical result for one audit run.
///
/// Derived once from the finalized frequency table; never mutated.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Per-symbol outcomes in the set's declared order.
    pub per_symbol: Vec<SymbolStat>,
    /// Samples actually observed.
    pub total: u64,
    /// Samples the run configuration promised.
    pub expected_total: u64,
    /// Threshold the z-scores were tested against.
    pub threshold: f64,
    /// Run-level failure signals.
    pub flags: RunFlags,
    /// Out-of-set symbols and their counts, for the report.
    pub unknown: BTreeMap<String, u64>,
    /// Overall verdict: no symbol failed and no flag fired.
    pub pass: bool,
}

/// Tests every symbol's frequency against the uniform null hypothesis.
///
/// Each sample is modeled as a draw from a box holding one 1 (the symbol)
/// and k-1 zeros: the indicator has mean p = 1/k and standard deviation
/// sqrt(p(1-p)), so over n draws the count has expectation p*n and
/// standard deviation sqrt(n * p * (1-p)). A symbol passes iff its count
/// sits within `threshold` standard deviations of the expectation.
pub fn evaluate(
    set: &SymbolSet,
    table: &FrequencyTable,
    expected_total: u64,
    threshold: f64,
    generator_failed: bool,
) -> Result<Evaluation, EvaluateError> {
    let n = table.total();
    if n == 0 {
        return Err(EvaluateError::NoSamples);
    }

    let k = set.len() as f64;
    let p = 1.0 / k;
    let expected = p * n as f64;
    // sd of one draw's indicator, then of the n-draw sum.
    let sd_box = (p * (1.0 - p)).sqrt();
    let sd_sum = sd_box * (n as f64).sqrt();

    let per_symbol: Vec<SymbolStat> = set
        .symbols()
        .zip(table.counts())
        .map(|(symbol, &observed)| {
            let z_score = (observed as f64 - expected).abs() / sd_sum;
            SymbolStat {
                symbol: symbol.to_string(),
                observed,
                expected,
                z_score,
                pass: z_score <= threshold,
            }
        })
        .collect();

    let flags = RunFlags {
        count_mismatch: n != expected_total,
        unknown_symbol: table.unknown_seen(),
        generator_failed,
    };
    let pass = per_symbol.iter().all(|s| s.pass) && !flags.any();

    Ok(Evaluation {
        per_symbol,
        total: n,
        expected_total,
        threshold,
        flags,
        unknown: table.unknown().clone(),
        pass,
    })
}
