//! Uniformity Audit Library
//!
//! A streaming statistical auditor for password and passphrase
//! generators. The generator under test is an opaque subprocess observed
//! only through its standard output and exit status; this library drives
//! it at large sample volumes and checks that the symbol frequencies it
//! produces are statistically indistinguishable from a uniform draw over
//! a declared symbol set.
//!
//! # Architecture
//!
//! One run is a single linear pipeline:
//!
//! ```text
//! driver → tokenize → accumulate → evaluate → report
//!              ↓
//!          progress (side channel)
//! ```
//!
//! # Design Principles
//!
//! - **Streaming**: memory stays O(symbol set) at any sample volume;
//!   generator output is never buffered as a whole
//! - **Fail-loud**: unknown symbols, count mismatches and generator
//!   faults are reported flags, never silently dropped
//! - **One writer**: the frequency table is owned by the accumulator and
//!   read-only once the stream ends
//! - **No cryptographic claims**: a passing audit only bounds frequency
//!   bias at the configured volume; it proves nothing else
//!
//! # Example
//!
//! Evaluating a recorded count table offline, without a live generator:
//!
//! ```
//! use uniformity_audit::{
//!     analysis::{evaluate, DEFAULT_THRESHOLD},
//!     pipeline::FrequencyTable,
//!     symbolset::Charset,
//! };
//!
//! let set = Charset::Digit.symbol_set();
//! let counts = vec![100u64; 10];
//! let table = FrequencyTable::from_counts(&set, &counts).unwrap();
//!
//! let eval = evaluate(&set, &table, 1000, DEFAULT_THRESHOLD, false).unwrap();
//! assert!(eval.pass);
//! assert_eq!(eval.per_symbol[0].observed, 100);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod audit;
pub mod driver;
pub mod pipeline;
pub mod report;
pub mod symbolset;

// Re-export commonly used types at crate root
pub use analysis::{evaluate, Evaluation, RunFlags, SymbolStat, DEFAULT_THRESHOLD};
pub use audit::{run_audit, run_suite, suite_verdict, AuditError, AuditReport, RunConfig};
pub use driver::{GeneratorCommand, GeneratorExit, GeneratorProcess};
pub use pipeline::{Accumulator, FrequencyTable, ProgressReporter, TokenMode};
pub use symbolset::{Charset, SymbolSet};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
