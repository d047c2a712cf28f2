//! Handset abstraction and the autodetection front end.
//!
//! A *handset* is whatever owns the RC signal pin and turns it into
//! channel data for the radio link.  The concrete PPM and CRSF handlers
//! live outside this crate; they plug in through [`Handset`] and are built
//! on demand by a [`HandsetFactory`].
//!
//! Until the protocol is known the pin belongs to [`AutoDetect`].  Once it
//! decides, the detector is consumed and the matching handler takes over
//! for the rest of the session:
//!
//! ```text
//!   Init ──begin──▶ Detecting ──margin crossed──▶ PPM handler
//!                        │                    └─▶ CRSF handler
//!                        └──end──▶ Ended (inert)
//! ```

pub mod autodetect;
pub mod callbacks;
pub mod slot;

pub use autodetect::{AutoDetect, Detection};
pub use callbacks::{CallbackSet, LinkCallbacks};
pub use slot::HandsetSlot;

/// Fresh RC channel data is available from the handset.
pub type RcDataCallback = fn();
/// A parameter write arrived from the handset: `(type, index, arg)`.
pub type ParameterUpdateCallback = fn(u8, u8, u8);
/// Link-level notification (connected, disconnected, model update,
/// binding command).
pub type LinkEventCallback = fn();

/// Packet interval replayed onto the handler when the application never
/// set one (µs).
pub const DEFAULT_PACKET_INTERVAL_US: i32 = 5000;

/// Capability set shared by every protocol handler.
///
/// Callback setters take `Option` so a registration can be copied
/// verbatim, including "nothing registered".
pub trait Handset {
    /// Take over the pin and start processing input.
    fn begin(&mut self);

    /// Stop and release the pin.
    fn end(&mut self);

    fn is_armed(&self) -> bool;

    /// Called once per main-loop cycle.  Must not block.
    fn handle_input(&mut self, now_ms: u32);

    fn set_rc_data_callback(&mut self, callback: Option<RcDataCallback>);

    fn register_parameter_update_callback(&mut self, callback: Option<ParameterUpdateCallback>);

    fn register_callbacks(&mut self, callbacks: LinkCallbacks);

    /// RC packet interval requested by the radio link (µs).
    fn set_packet_interval(&mut self, interval_us: i32);
}

/// Builds the concrete handler for a decided protocol.
pub trait HandsetFactory {
    fn ppm(&mut self) -> Box<dyn Handset>;

    fn crsf(&mut self) -> Box<dyn Handset>;
}
