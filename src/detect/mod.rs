//! Pure detection logic: no I/O, no clocks.
//!
//! ```text
//!   Sample ──▶ PulseClassifier ──▶ Vote ──▶ Confidence ──▶ Option<Protocol>
//!                                              ▲
//!                        IdleMonitor ──reset───┘
//! ```
//!
//! Serial CRSF toggles the line every few hundred nanoseconds to tens of
//! microseconds, so its segments are short.  PPM channel slots and the
//! sync gap are hundreds of microseconds to milliseconds long.  The
//! classifier turns each segment into a vote and the accumulator needs a
//! sustained majority before committing.

pub mod classifier;
pub mod confidence;
pub mod idle;

pub use classifier::{PulseClassifier, Vote};
pub use confidence::Confidence;
pub use idle::IdleMonitor;

use core::fmt;

/// Protocol spoken by the attached handset.  A decided detection is
/// `Some(Protocol)`; `None` means undecided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Pulse-position modulation, one pulse per channel.
    Ppm,
    /// Crossfire serial protocol.
    Crsf,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ppm => write!(f, "PPM"),
            Self::Crsf => write!(f, "CRSF"),
        }
    }
}
