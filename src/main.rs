//! Uniformity Audit CLI
//!
//! Drives a password/passphrase generator through one audit run per
//! selected symbol set and prints a per-symbol results table for each.
//! Exit status: 0 when every run passes, 1 when any run fails its
//! statistics or flags, 2 on a fatal fault (launch failure, timeout,
//! abort, usage error).

use clap::Parser;
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use uniformity_audit::audit::{run_suite, suite_verdict, FileConfig, RunConfig, FAST_SAMPLE_UNITS};
use uniformity_audit::driver::GeneratorCommand;
use uniformity_audit::report;
use uniformity_audit::symbolset::{load_wordlist, Charset, SymbolSet};

const EXIT_FAIL: i32 = 1;
const EXIT_FATAL: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "uniformity-audit",
    version,
    about = "Statistical uniformity audit of a password generator"
)]
struct Args {
    /// Path to the generator executable under audit.
    #[arg(short, long)]
    generator: Option<PathBuf>,

    /// Character sets to audit (hex, alpha, ascii, digit, lower).
    #[arg(long, value_delimiter = ',')]
    charsets: Vec<String>,

    /// Word list to audit in delimiter mode.
    #[arg(long)]
    wordlist: Option<PathBuf>,

    /// Generator invocations per run.
    #[arg(long)]
    samples: Option<u64>,

    /// Use a reduced sample volume that misses smaller biases.
    #[arg(long)]
    fast: bool,

    /// Significance threshold in standard deviations.
    #[arg(long)]
    threshold: Option<f64>,

    /// Kill a run that exceeds this many seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Run the symbol sets in parallel pipelines.
    #[arg(long)]
    parallel: bool,

    /// TOML configuration file; command-line flags take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Substring expected in generator diagnostics on failure.
    #[arg(long)]
    failure_hint: Option<String>,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let file = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("ERROR: {e}");
                process::exit(EXIT_FATAL);
            }
        },
        None => FileConfig::default(),
    };

    let Some(program) = args.generator.clone().or(file.generator.program.clone()) else {
        eprintln!("ERROR: no generator given (use --generator or a config file)");
        process::exit(EXIT_FATAL);
    };
    let command = GeneratorCommand::new(program).with_count_flag(file.generator.count_flag.clone());

    let sample_units = match (args.samples, args.fast) {
        (Some(units), _) => units,
        (None, true) => {
            warn!("Fast mode will miss smaller biases");
            FAST_SAMPLE_UNITS
        }
        (None, false) => file.audit.sample_units,
    };
    let threshold = args.threshold.unwrap_or(file.audit.threshold);
    let timeout_secs = args.timeout_secs.or(file.audit.timeout_secs);
    let failure_hint = args.failure_hint.clone().or(file.generator.failure_hint.clone());
    let parallel = args.parallel || file.audit.parallel;

    let charsets: Vec<Charset> = if args.charsets.is_empty() {
        file.audit.charsets.clone()
    } else {
        let mut parsed = Vec::with_capacity(args.charsets.len());
        for name in &args.charsets {
            match name.parse::<Charset>() {
                Ok(charset) => parsed.push(charset),
                Err(e) => {
                    eprintln!("ERROR: {e}");
                    process::exit(EXIT_FATAL);
                }
            }
        }
        parsed
    };

    let mut runs: Vec<(SymbolSet, RunConfig)> = Vec::new();
    for charset in &charsets {
        let config = RunConfig {
            threshold,
            timeout_secs,
            failure_hint: failure_hint.clone(),
            ..RunConfig::for_charset(sample_units)
        };
        runs.push((charset.symbol_set(), config));
    }
    if let Some(path) = args.wordlist.clone().or(file.audit.wordlist.clone()) {
        match load_wordlist(&path) {
            Ok(set) => {
                let config = RunConfig {
                    threshold,
                    timeout_secs,
                    failure_hint: failure_hint.clone(),
                    ..RunConfig::for_words(sample_units)
                };
                runs.push((set, config));
            }
            Err(e) => {
                eprintln!("ERROR: {e}");
                process::exit(EXIT_FATAL);
            }
        }
    }
    if runs.is_empty() {
        eprintln!("ERROR: nothing to audit (no charsets and no wordlist)");
        process::exit(EXIT_FATAL);
    }

    let abort = Arc::new(AtomicBool::new(false));
    {
        let abort = Arc::clone(&abort);
        if let Err(e) = ctrlc::set_handler(move || {
            abort.store(true, Ordering::Relaxed);
        }) {
            warn!("Could not install Ctrl-C handler: {e}");
        }
    }

    info!(
        "Uniformity Audit v{} starting at {}",
        uniformity_audit::VERSION,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!(
        runs = runs.len(),
        sample_units, threshold, parallel, "Audit suite configured"
    );

    let results = run_suite(&command, &runs, parallel, &abort);

    for ((set, _), result) in runs.iter().zip(&results) {
        match result {
            Ok(report) => print!("{}", report::render(report)),
            Err(e) => eprintln!("ERROR: {} run did not complete: {e}", set.name()),
        }
    }

    match suite_verdict(&results) {
        None => {
            // At least one run was fatal/indeterminate; never report a pass.
            process::exit(EXIT_FATAL);
        }
        Some(all_passed) => {
            println!("{}", report::verdict_line(all_passed));
            process::exit(if all_passed { 0 } else { EXIT_FAIL });
        }
    }
}
