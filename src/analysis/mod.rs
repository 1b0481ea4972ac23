//! Hypothesis testing of observed frequencies against the uniform null.
//!
//! Everything here is a pure function of the finalized frequency table
//! and the run parameters; no I/O, no live subprocess.

mod evaluate;

pub use evaluate::{
    evaluate, EvaluateError, Evaluation, RunFlags, SymbolStat, DEFAULT_THRESHOLD,
};
