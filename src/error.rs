//! Unified error types for the handset autodetection component.
//!
//! Detection itself never fails: malformed durations are simply "no
//! evidence".  The only fallible operations are bringing up the capture
//! peripheral and validating configuration, both of which happen once at
//! start-up.  All variants are `Copy` so they can be logged and passed up
//! to the embedding application without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pulse-capture peripheral could not be configured or started.
    Capture(CaptureError),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Capture(e) => write!(f, "capture: {e}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Capture peripheral errors
// ---------------------------------------------------------------------------

/// Failures reported by a [`PulseCapture`](crate::ports::PulseCapture)
/// backend.  ESP-IDF return codes are carried verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureError {
    /// Channel configuration was rejected by the driver.
    ConfigFailed(i32),
    /// Driver installation failed (channel already in use, no memory).
    InstallFailed(i32),
    /// The driver did not hand out a ring buffer.
    RingBufferUnavailable(i32),
    /// Receiving could not be started.
    StartFailed(i32),
    /// `start()` called while a session is already running.
    AlreadyRunning,
}

impl fmt::Display for CaptureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigFailed(rc) => write!(f, "channel config failed (rc={rc})"),
            Self::InstallFailed(rc) => write!(f, "driver install failed (rc={rc})"),
            Self::RingBufferUnavailable(rc) => write!(f, "ring buffer unavailable (rc={rc})"),
            Self::StartFailed(rc) => write!(f, "rx start failed (rc={rc})"),
            Self::AlreadyRunning => write!(f, "capture already running"),
        }
    }
}

impl From<CaptureError> for Error {
    fn from(e: CaptureError) -> Self {
        Self::Capture(e)
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
