//! The streaming sample pipeline.
//!
//! Generator output flows through this module one line at a time:
//! the tokenizer splits each line into symbol samples, the accumulator
//! folds them into a frequency table, and the progress reporter watches
//! the running total as a side channel. Nothing here buffers the stream;
//! memory stays bounded by the symbol-set size at any sample volume.

mod accumulate;
mod progress;
mod tokenize;

pub use accumulate::{Accumulator, FrequencyTable};
pub use progress::ProgressReporter;
pub use tokenize::{tokens, TokenMode, Tokens};
