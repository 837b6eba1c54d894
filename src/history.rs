use itertools::Itertools;
use std::fmt;

use crate::scramble::Scramble;
use crate::time_format::format_duration;

/// One completed timed attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveRecord {
    duration_ms: u64,
    scramble: Scramble,
}

impl SolveRecord {
    pub fn new(duration_ms: u64, scramble: Scramble) -> Self {
        Self {
            duration_ms,
            scramble,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn scramble(&self) -> &Scramble {
        &self.scramble
    }
}

/// An entry of the ranked history view
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedSolve {
    pub rank: usize,
    pub duration_ms: u64,
    pub time: String,
}

impl fmt::Display for RankedSolve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.rank, self.time)
    }
}

/// Solves of the current process, kept in insertion order
#[derive(Clone, Debug, Default)]
pub struct SessionHistory {
    records: Vec<SolveRecord>,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: SolveRecord) {
        self.records.push(record);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn records(&self) -> &[SolveRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records fastest first; equal durations keep insertion order
    pub fn sorted_records(&self) -> Vec<&SolveRecord> {
        self.records
            .iter()
            .sorted_by_key(|r| r.duration_ms)
            .collect()
    }

    pub fn ordered_by_duration(&self) -> Vec<RankedSolve> {
        self.sorted_records()
            .into_iter()
            .enumerate()
            .map(|(idx, r)| RankedSolve {
                rank: idx + 1,
                duration_ms: r.duration_ms,
                time: format_duration(r.duration_ms),
            })
            .collect()
    }
}
