//! Streaming frequency accumulation.
//!
//! The accumulator is the single writer of a run's frequency table. Each
//! observed symbol increments exactly one bucket (or the unknown tally)
//! plus the running total, in stream order; nothing ever decrements.

use crate::symbolset::SymbolSet;
use std::collections::BTreeMap;

/// Per-symbol observation counts for one audit run.
///
/// Counts are dense and parallel to the symbol set's declared order.
/// Symbols observed outside the set are tallied separately by their text
/// so they can be reported rather than silently dropped.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: Vec<u64>,
    total: u64,
    unknown: BTreeMap<String, u64>,
}

impl FrequencyTable {
    fn new(size: usize) -> Self {
        Self {
            counts: vec![0; size],
            total: 0,
            unknown: BTreeMap::new(),
        }
    }

    /// Builds a table from recorded counts, for offline evaluation.
    ///
    /// Returns `None` if the count slice does not match the set size.
    pub fn from_counts(set: &SymbolSet, counts: &[u64]) -> Option<Self> {
        if counts.len() != set.len() {
            return None;
        }
        Some(Self {
            counts: counts.to_vec(),
            total: counts.iter().sum(),
            unknown: BTreeMap::new(),
        })
    }

    /// Observation count per symbol, in the set's declared order.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total samples observed, including unknown symbols.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Out-of-set symbols and how often each was seen.
    pub fn unknown(&self) -> &BTreeMap<String, u64> {
        &self.unknown
    }

    /// True if any symbol outside the declared set was observed.
    pub fn unknown_seen(&self) -> bool {
        !self.unknown.is_empty()
    }
}

/// Folds a token stream into a [`FrequencyTable`].
///
/// Owns the table exclusively while the stream is live; [`finish`]
/// hands it off read-only. Memory is O(symbol set + distinct unknown
/// symbols), independent of how many samples flow through.
///
/// [`finish`]: Accumulator::finish
#[derive(Debug)]
pub struct Accumulator<'a> {
    set: &'a SymbolSet,
    table: FrequencyTable,
}

impl<'a> Accumulator<'a> {
    /// Creates an accumulator with all buckets at zero.
    pub fn new(set: &'a SymbolSet) -> Self {
        Self {
            set,
            table: FrequencyTable::new(set.len()),
        }
    }

    /// Records one observed symbol.
    pub fn record(&mut self, symbol: &str) {
        match self.set.position(symbol) {
            Some(i) => self.table.counts[i] += 1,
            None => *self.table.unknown.entry(symbol.to_string()).or_insert(0) += 1,
        }
        self.table.total += 1;
    }

    /// Running total so far, for progress observation.
    pub fn total(&self) -> u64 {
        self.table.total
    }

    /// Ends the stream and yields the finalized table.
    pub fn finish(self) -> FrequencyTable {
        self.table
    }
}
