//! Corpus statistics and run summaries.

use crate::dump::DumpStats;
use serde::Serialize;
use std::time::Duration;

/// Length bucket bounds, in characters.
const SHORT_DOC_CHARS: usize = 500;
const LONG_DOC_CHARS: usize = 2000;

/// CJK ratio bucket bounds.
const HIGH_RATIO: f64 = 0.8;
const MEDIUM_RATIO: f64 = 0.5;

/// Aggregate figures over cleaned documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorpusStats {
    pub accepted: u64,
    pub rejected: u64,
    /// Characters across accepted documents
    pub total_chars: u64,
    /// CJK characters across accepted documents
    pub total_cjk_chars: u64,
    /// Documents under 500 characters
    pub length_short: u64,
    /// Documents of 500 to 1999 characters
    pub length_medium: u64,
    /// Documents of 2000 characters or more
    pub length_long: u64,
    /// Documents with a CJK ratio of at least 0.8
    pub ratio_high: u64,
    /// Documents with a CJK ratio in `[0.5, 0.8)`
    pub ratio_medium: u64,
    /// Documents with a CJK ratio below 0.5
    pub ratio_low: u64,
    #[serde(skip)]
    sum_ratio: f64,
}

impl CorpusStats {
    /// Creates empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts an accepted document.
    pub fn record_accepted(&mut self, length: usize, cjk_ratio: f64) {
        self.accepted += 1;
        self.total_chars += length as u64;
        self.total_cjk_chars += (length as f64 * cjk_ratio).round() as u64;
        self.sum_ratio += cjk_ratio;

        match length {
            l if l < SHORT_DOC_CHARS => self.length_short += 1,
            l if l < LONG_DOC_CHARS => self.length_medium += 1,
            _ => self.length_long += 1,
        }

        if cjk_ratio >= HIGH_RATIO {
            self.ratio_high += 1;
        } else if cjk_ratio >= MEDIUM_RATIO {
            self.ratio_medium += 1;
        } else {
            self.ratio_low += 1;
        }
    }

    /// Counts a rejected document.
    pub fn record_rejected(&mut self) {
        self.rejected += 1;
    }

    /// Documents seen by the cleaner.
    pub fn processed(&self) -> u64 {
        self.accepted + self.rejected
    }

    /// Mean length of accepted documents.
    pub fn average_length(&self) -> f64 {
        if self.accepted == 0 {
            return 0.0;
        }
        self.total_chars as f64 / self.accepted as f64
    }

    /// Mean CJK ratio of accepted documents.
    pub fn average_ratio(&self) -> f64 {
        if self.accepted == 0 {
            return 0.0;
        }
        self.sum_ratio / self.accepted as f64
    }

    /// Share of processed documents that were rejected, in percent.
    pub fn filter_rate(&self) -> f64 {
        let processed = self.processed();
        if processed == 0 {
            return 0.0;
        }
        self.rejected as f64 * 100.0 / processed as f64
    }

    /// Adds another set of statistics into this one.
    pub fn merge(&mut self, other: &CorpusStats) {
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.total_chars += other.total_chars;
        self.total_cjk_chars += other.total_cjk_chars;
        self.length_short += other.length_short;
        self.length_medium += other.length_medium;
        self.length_long += other.length_long;
        self.ratio_high += other.ratio_high;
        self.ratio_medium += other.ratio_medium;
        self.ratio_low += other.ratio_low;
        self.sum_ratio += other.sum_ratio;
    }
}

/// Everything reported at the end of a run.
#[derive(Debug, Clone, Default)]
pub struct ProcessSummary {
    pub dump: DumpStats,
    pub corpus: CorpusStats,
    /// Records mirrored to the sample stream
    pub sampled: usize,
    pub elapsed: Duration,
    /// True if the run stopped at the article limit
    pub limit_reached: bool,
}

impl ProcessSummary {
    /// Pages read per minute of wall time.
    pub fn pages_per_minute(&self) -> f64 {
        let minutes = self.elapsed.as_secs_f64() / 60.0;
        if minutes <= 0.0 {
            return 0.0;
        }
        self.dump.pages_seen as f64 / minutes
    }
}
