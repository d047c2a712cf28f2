//! Port traits: the boundary between detection logic and the capture
//! hardware.
//!
//! ```text
//!   RMT peripheral ──▶ PulseCapture (port) ──▶ AutoDetect (domain)
//! ```
//!
//! The detector consumes a [`PulseCapture`] through generics, so the same
//! logic runs against the ESP-IDF RMT driver, the host simulation backend
//! in [`adapters::rmt_capture`](crate::adapters::rmt_capture), or a test
//! mock.

use crate::error::CaptureError;

// ───────────────────────────────────────────────────────────────
// Sample
// ───────────────────────────────────────────────────────────────

/// One capture event: two consecutive line segments.
///
/// Layout is the 32-bit RMT item, so driver buffers can be viewed as
/// `&[Sample]` without copying:
///
/// | bits   | field     |
/// |--------|-----------|
/// | 0..15  | duration0 |
/// | 15     | level0    |
/// | 16..31 | duration1 |
/// | 31     | level1    |
///
/// Levels carry no evidence and are masked off.
///
/// Durations are in capture ticks (see
/// [`DetectConfig::ticks_per_us`](crate::config::DetectConfig::ticks_per_us)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct Sample(u32);

const DURATION_MASK: u32 = 0x7FFF;

impl Sample {
    /// Largest duration an item can carry.
    pub const MAX_DURATION: u16 = DURATION_MASK as u16;

    /// Build a sample from two tick counts.  Durations are truncated to 15
    /// bits, as the peripheral does; levels are left low.
    pub const fn new(duration0: u16, duration1: u16) -> Self {
        Self((duration0 as u32 & DURATION_MASK) | ((duration1 as u32 & DURATION_MASK) << 16))
    }

    /// Wrap a raw RMT item.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn duration0(self) -> u16 {
        (self.0 & DURATION_MASK) as u16
    }

    pub const fn duration1(self) -> u16 {
        ((self.0 >> 16) & DURATION_MASK) as u16
    }

    /// Both durations, in capture order.
    pub const fn durations(self) -> [u16; 2] {
        [self.duration0(), self.duration1()]
    }
}

// ───────────────────────────────────────────────────────────────
// Capture port
// ───────────────────────────────────────────────────────────────

/// Peripheral settings for one capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub gpio: i32,
    pub channel: u32,
    /// Divider applied to the 80 MHz APB clock.
    pub clk_div: u8,
    /// Pulses shorter than this many ticks are dropped (0 = keep all).
    pub filter_ticks: u8,
    /// Line idle time, in ticks, that closes a frame.
    pub idle_threshold_ticks: u16,
    pub ring_buffer_bytes: u32,
}

/// Non-blocking source of captured pulse batches.
///
/// The caller owns the session exclusively between [`start`](Self::start)
/// and [`release`](Self::release).  Every batch obtained from
/// [`receive`](Self::receive) must be handed back with
/// [`return_batch`](Self::return_batch) before the next receive.
pub trait PulseCapture {
    /// Configure the peripheral and begin capturing.
    fn start(&mut self, settings: &CaptureSettings) -> Result<(), CaptureError>;

    /// Fetch the next batch without waiting.  `None` if nothing arrived.
    fn receive(&mut self) -> Option<&[Sample]>;

    /// Give the last received batch back to the driver's pool.
    fn return_batch(&mut self);

    /// Stop capturing and uninstall the driver, freeing the pin.
    /// Calling it on a stopped session is a no-op.
    fn release(&mut self);
}
