//! GPIO / peripheral assignments for the external module bay.
//!
//! Single source of truth: the capture adapter and the protocol handlers
//! reference this module rather than hard-coding pin numbers.

// ---------------------------------------------------------------------------
// RC signal input (module bay S.Port / PPM pin)
// ---------------------------------------------------------------------------

/// Handset signal line.  Carries PPM pulses or half-duplex CRSF serial,
/// depending on what the handset speaks.
pub const RC_SIGNAL_RX_GPIO: i32 = 13;

/// RMT channel shared by autodetection and the PPM handler.  Only one of
/// them may have the driver installed at a time.
pub const PPM_RMT_CHANNEL: u32 = 4;

// ---------------------------------------------------------------------------
// Clocks
// ---------------------------------------------------------------------------

/// APB clock feeding the RMT peripheral.
pub const APB_CLK_MHZ: u32 = 80;
