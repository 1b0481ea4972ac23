//! End-to-end audit runs.
//!
//! One run is a single linear pipeline: spawn the generator, stream its
//! output through the tokenizer into the frequency accumulator (with the
//! progress reporter watching the running total), reap the subprocess,
//! then evaluate the finalized table. Runs over different symbol sets
//! share no mutable state and may execute in parallel worker threads.

mod config;

pub use config::{
    AuditSection, ConfigError, FileConfig, GeneratorSection, RunConfig, CHARS_PER_UNIT,
    DEFAULT_SAMPLE_UNITS, FAST_SAMPLE_UNITS, WORDS_PER_UNIT, WORD_DELIMITER,
};

use crate::analysis::{evaluate, EvaluateError, Evaluation};
use crate::driver::{DriverError, GeneratorCommand, GeneratorExit, GeneratorProcess};
use crate::pipeline::{tokens, Accumulator, ProgressReporter};
use crate::symbolset::SymbolSet;
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors that abort a run before a statistical result exists.
///
/// Everything here is fatal/indeterminate, distinct from a statistical
/// fail: a run that returns one of these produced no verdict at all.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Run parameters were rejected.
    #[error("invalid run configuration: {0}")]
    Config(#[from] ConfigError),
    /// The generator could not be driven to completion.
    #[error(transparent)]
    Driver(#[from] DriverError),
    /// The stream completed but its statistics are undefined.
    #[error(transparent)]
    Evaluate(#[from] EvaluateError),
    /// A parallel worker panicked.
    #[error("audit worker panicked")]
    WorkerPanicked,
}

/// Everything an operator needs to judge one symbol-set run.
#[derive(Debug, Clone)]
pub struct AuditReport {
    /// Name of the audited symbol set.
    pub set_name: String,
    /// The statistical result.
    pub evaluation: Evaluation,
    /// Generator exit status and captured diagnostics.
    pub exit: GeneratorExit,
    /// Whether diagnostics matched the configured failure hint; `None`
    /// when the generator succeeded or no hint was configured.
    pub diagnostic_matched: Option<bool>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
}

impl AuditReport {
    /// True if the run's overall verdict is a pass.
    pub fn passed(&self) -> bool {
        self.evaluation.pass
    }
}

/// Drives one complete audit run for a symbol set.
///
/// The `abort` flag is checked on every line; once set, the generator is
/// killed and the run ends with [`DriverError::Aborted`], never a verdict.
pub fn run_audit(
    command: &GeneratorCommand,
    set: &SymbolSet,
    config: &RunConfig,
    abort: &AtomicBool,
) -> Result<AuditReport, AuditError> {
    config.validate()?;
    let started = Instant::now();
    tracing::info!(
        set = set.name(),
        units = config.sample_units,
        expected_samples = config.expected_total(),
        "Audit run starting"
    );

    let mut process =
        GeneratorProcess::spawn(command, set.selector(), config.sample_units, config.timeout())?;
    let mut accumulator = Accumulator::new(set);
    let mut progress = ProgressReporter::new(config.expected_total());

    let mut line = String::new();
    loop {
        if abort.load(Ordering::Relaxed) {
            process.kill();
            return Err(DriverError::Aborted.into());
        }
        line.clear();
        let read = process
            .reader()
            .read_line(&mut line)
            .map_err(DriverError::Stream)?;
        if read == 0 {
            break;
        }
        let record = line.trim_end_matches(['\r', '\n']);
        for symbol in tokens(record, config.mode) {
            accumulator.record(symbol);
        }
        if let Some(percent) = progress.observe(accumulator.total()) {
            tracing::info!(set = set.name(), percent, "Sampling progress");
        }
    }
    if abort.load(Ordering::Relaxed) {
        process.kill();
        return Err(DriverError::Aborted.into());
    }

    let exit = process.finish()?;
    let table = accumulator.finish();
    let evaluation = evaluate(
        set,
        &table,
        config.expected_total(),
        config.threshold,
        !exit.success(),
    )?;

    let diagnostic_matched = match (&config.failure_hint, exit.success()) {
        (Some(hint), false) => Some(exit.diagnostic_matches(hint)),
        _ => None,
    };

    let report = AuditReport {
        set_name: set.name().to_string(),
        evaluation,
        exit,
        diagnostic_matched,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        set = set.name(),
        pass = report.passed(),
        elapsed_secs = report.elapsed.as_secs(),
        "Audit run finished"
    );
    Ok(report)
}

/// Runs a suite of symbol-set audits, sequentially or in parallel.
///
/// Results are returned in input order. The overall verdict is the AND of
/// every run's verdict and must be folded only after all pipelines have
/// terminated; a failing run never short-circuits the others.
pub fn run_suite(
    command: &GeneratorCommand,
    runs: &[(SymbolSet, RunConfig)],
    parallel: bool,
    abort: &AtomicBool,
) -> Vec<Result<AuditReport, AuditError>> {
    if parallel {
        thread::scope(|scope| {
            let handles: Vec<_> = runs
                .iter()
                .map(|(set, config)| {
                    scope.spawn(move || run_audit(command, set, config, abort))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or(Err(AuditError::WorkerPanicked)))
                .collect()
        })
    } else {
        runs.iter()
            .map(|(set, config)| run_audit(command, set, config, abort))
            .collect()
    }
}

/// Folds suite results into the overall verdict.
///
/// A fatal error in any run makes the suite indeterminate (`None`);
/// otherwise `Some(true)` iff every run passed.
pub fn suite_verdict(results: &[Result<AuditReport, AuditError>]) -> Option<bool> {
    if results.iter().any(|r| r.is_err()) {
        return None;
    }
    Some(
        results
            .iter()
            .all(|r| r.as_ref().map(AuditReport::passed).unwrap_or(false)),
    )
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::symbolset::SymbolSet;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn stub_generator(name: &str, script: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "uniformity-audit-stub-{}-{}",
            name,
            std::process::id()
        ));
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn ab_set() -> SymbolSet {
        SymbolSet::from_chars("ab", "--ab", "AB")
    }

    fn small_run(units: u64, symbols_per_unit: u32) -> RunConfig {
        RunConfig {
            symbols_per_unit,
            ..RunConfig::for_charset(units)
        }
    }

    #[test]
    fn test_balanced_stream_passes() {
        let stub = stub_generator("balanced", "printf 'ABAB\\nBABA\\n'");
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(false);

        let report = run_audit(&command, &ab_set(), &small_run(2, 4), &abort).unwrap();
        assert!(report.passed());
        assert_eq!(report.evaluation.total, 8);
        assert!(report.exit.success());
    }

    #[test]
    fn test_generator_failure_still_evaluates() {
        let stub = stub_generator(
            "failing",
            "printf 'ABAB\\n'; echo 'Error getting random data.' >&2; exit 1",
        );
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(false);
        let config = RunConfig {
            failure_hint: Some("Error getting random data".to_string()),
            ..small_run(1, 4)
        };

        let report = run_audit(&command, &ab_set(), &config, &abort).unwrap();
        assert!(!report.passed());
        assert!(report.evaluation.flags.generator_failed);
        assert_eq!(report.diagnostic_matched, Some(true));
        assert!(report.exit.diagnostics.contains("Error getting random data."));
    }

    #[test]
    fn test_truncated_output_sets_mismatch() {
        let stub = stub_generator("truncated", "printf 'ABA\\n'");
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(false);

        let report = run_audit(&command, &ab_set(), &small_run(1, 4), &abort).unwrap();
        assert!(report.evaluation.flags.count_mismatch);
        assert!(!report.passed());
    }

    #[test]
    fn test_silent_generator_is_indeterminate() {
        let stub = stub_generator("silent", "exit 0");
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(false);

        let result = run_audit(&command, &ab_set(), &small_run(1, 4), &abort);
        assert!(matches!(
            result,
            Err(AuditError::Evaluate(EvaluateError::NoSamples))
        ));
    }

    #[test]
    fn test_preset_abort_is_fatal() {
        let stub = stub_generator("aborted", "printf 'ABAB\\n'");
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(true);

        let result = run_audit(&command, &ab_set(), &small_run(1, 4), &abort);
        assert!(matches!(
            result,
            Err(AuditError::Driver(DriverError::Aborted))
        ));
    }

    #[test]
    fn test_zero_units_rejected() {
        let stub = stub_generator("unused", "exit 0");
        let command = GeneratorCommand::new(&stub);
        let abort = AtomicBool::new(false);

        let result = run_audit(&command, &ab_set(), &small_run(0, 4), &abort);
        assert!(matches!(
            result,
            Err(AuditError::Config(ConfigError::ZeroSampleUnits))
        ));
    }

    #[test]
    fn test_parallel_suite_preserves_order() {
        let stub = stub_generator("suite", "printf 'AB\\n'");
        let abort = AtomicBool::new(false);

        let command = GeneratorCommand::new(&stub);
        let runs = vec![(ab_set(), small_run(1, 2)), (ab_set(), small_run(1, 2))];
        let results = run_suite(&command, &runs, true, &abort);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(suite_verdict(&results), Some(true));
    }

    #[test]
    fn test_suite_verdict_folding() {
        assert_eq!(suite_verdict(&[]), Some(true));
        let fatal: Vec<Result<AuditReport, AuditError>> =
            vec![Err(AuditError::WorkerPanicked)];
        assert_eq!(suite_verdict(&fatal), None);
    }
}
