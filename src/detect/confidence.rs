//! Confidence accumulator.
//!
//! A single signed score: idle votes push it up toward PPM, short votes
//! pull it down toward CRSF.  Isolated misclassified segments (start-up
//! glitches, noise) only nudge the score, so a decision needs a sustained
//! majority of more than `margin` net votes.

use super::{Protocol, Vote};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Confidence {
    score: i32,
    margin: i32,
}

impl Confidence {
    pub fn new(margin: i32) -> Self {
        Self { score: 0, margin }
    }

    pub fn record(&mut self, vote: Vote) {
        match vote {
            Vote::Idle => self.score = self.score.saturating_add(1),
            Vote::Short => self.score = self.score.saturating_sub(1),
            Vote::Abstain => {}
        }
    }

    /// `Some` once the score has left `[-margin, margin]`.
    pub fn decision(&self) -> Option<Protocol> {
        if self.score < -self.margin {
            Some(Protocol::Crsf)
        } else if self.score > self.margin {
            Some(Protocol::Ppm)
        } else {
            None
        }
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_neutral(&self) -> bool {
        self.score == 0
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}
