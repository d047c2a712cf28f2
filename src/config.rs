//! Detection configuration parameters.
//!
//! The defaults are empirically tuned for the RMT capture resolution and
//! the CRSF baud range (400 kBaud – 5.25 MBaud).  They are load-bearing:
//! change them only together with a bench capture of both protocols.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::pins;
use crate::ports::CaptureSettings;

/// RMT driver receive ring buffer size (bytes).
pub const DEFAULT_RING_BUFFER_BYTES: u32 = 1000;

/// Tunables for pulse classification, confidence and capture set-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectConfig {
    // --- Capture ---
    /// Capture ticks per microsecond.  A single bit at 5.25 MBaud is
    /// ~0.19 µs, so this must stay well above 1.
    pub ticks_per_us: u16,
    /// Glitch filter threshold in ticks (0 = disabled).
    pub capture_filter_ticks: u8,
    /// Line idle time that ends a capture frame (µs).
    pub capture_idle_timeout_us: u32,
    /// Size of the driver's receive ring buffer (bytes).
    pub ring_buffer_bytes: u32,

    // --- Classification ---
    /// Durations above this are idle/gap evidence (µs).
    pub gap_threshold_us: u16,
    /// Non-zero durations below this are short-pulse evidence (µs).
    pub short_threshold_us: u16,

    // --- Confidence ---
    /// |score| must exceed this before a protocol is chosen.
    pub decision_margin: i32,
    /// Evidence older than this is discarded once the line goes quiet (ms).
    pub signal_loss_reset_ms: u32,
}

impl Default for DetectConfig {
    fn default() -> Self {
        Self {
            // Capture
            ticks_per_us: 32,
            capture_filter_ticks: 0,
            capture_idle_timeout_us: 2000, // 2 ms
            ring_buffer_bytes: DEFAULT_RING_BUFFER_BYTES,

            // Classification
            gap_threshold_us: 400,
            short_threshold_us: 100,

            // Confidence
            decision_margin: 100,
            signal_loss_reset_ms: 1000,
        }
    }
}

impl DetectConfig {
    /// Reject values that would make detection meaningless or overflow
    /// the 16-bit RMT registers.
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_us == 0 {
            return Err(Error::Config("ticks_per_us must be non-zero"));
        }
        if u32::from(self.ticks_per_us) > pins::APB_CLK_MHZ {
            return Err(Error::Config("ticks_per_us exceeds APB clock"));
        }
        if self.short_threshold_us == 0 {
            return Err(Error::Config("short_threshold_us must be non-zero"));
        }
        if self.short_threshold_us >= self.gap_threshold_us {
            return Err(Error::Config("short threshold must be below gap threshold"));
        }
        if self.decision_margin <= 0 {
            return Err(Error::Config("decision_margin must be positive"));
        }
        if self.signal_loss_reset_ms == 0 {
            return Err(Error::Config("signal_loss_reset_ms must be non-zero"));
        }
        if self.idle_threshold_ticks() > u32::from(u16::MAX) {
            return Err(Error::Config("capture idle timeout does not fit in 16 bits"));
        }
        if self.ring_buffer_bytes < 4 {
            return Err(Error::Config("ring buffer must hold at least one item"));
        }
        Ok(())
    }

    /// Gap threshold converted to capture ticks.
    pub fn gap_threshold_ticks(&self) -> u32 {
        u32::from(self.gap_threshold_us) * u32::from(self.ticks_per_us)
    }

    /// Short-pulse threshold converted to capture ticks.
    pub fn short_threshold_ticks(&self) -> u32 {
        u32::from(self.short_threshold_us) * u32::from(self.ticks_per_us)
    }

    /// Frame idle timeout converted to capture ticks.
    pub fn idle_threshold_ticks(&self) -> u32 {
        self.capture_idle_timeout_us * u32::from(self.ticks_per_us)
    }

    /// Peripheral settings for a capture session on `gpio` / `channel`.
    pub fn capture_settings(&self, gpio: i32, channel: u32) -> CaptureSettings {
        CaptureSettings {
            gpio,
            channel,
            // Integer division, matching the divider the hardware accepts.
            clk_div: (pins::APB_CLK_MHZ / u32::from(self.ticks_per_us.max(1))) as u8,
            filter_ticks: self.capture_filter_ticks,
            idle_threshold_ticks: self.idle_threshold_ticks().min(u32::from(u16::MAX)) as u16,
            ring_buffer_bytes: self.ring_buffer_bytes,
        }
    }
}
