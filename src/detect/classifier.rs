//! Pulse classifier.
//!
//! | Duration (µs)   | Vote     |
//! |-----------------|----------|
//! | `> gap`  (400)  | `Idle`   |
//! | `1 ..< short` (100) | `Short`  |
//! | `0`, `100..=400`    | `Abstain`|
//!
//! Durations in the dead zone between the two thresholds never vote.

use crate::config::DetectConfig;
use crate::ports::Sample;

/// Evidence contributed by one duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// Long segment: PPM slot or sync gap.
    Idle,
    /// Short non-zero segment: serial bit time.
    Short,
    /// Zero or dead-zone duration.
    Abstain,
}

/// Threshold classifier operating directly on capture ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulseClassifier {
    gap_ticks: u32,
    short_ticks: u32,
}

impl PulseClassifier {
    pub fn new(config: &DetectConfig) -> Self {
        Self {
            gap_ticks: config.gap_threshold_ticks(),
            short_ticks: config.short_threshold_ticks(),
        }
    }

    pub fn classify(&self, duration: u16) -> Vote {
        let ticks = u32::from(duration);
        if ticks > self.gap_ticks {
            Vote::Idle
        } else if ticks != 0 && ticks < self.short_ticks {
            Vote::Short
        } else {
            Vote::Abstain
        }
    }

    /// Votes for both segments of a sample, evaluated independently.
    pub fn votes(&self, sample: Sample) -> [Vote; 2] {
        sample.durations().map(|d| self.classify(d))
    }
}
