//! Handset protocol autodetection for ESP32 RC transmitter modules.
//!
//! Watches the module-bay signal pin through the RMT peripheral, decides
//! whether the handset speaks PPM or CRSF, and hands the pin over to the
//! matching handler exactly once.  Detection logic is pure and host
//! testable; everything ESP-IDF-specific is guarded by
//! `#[cfg(target_os = "espidf")]` inside [`adapters`].

#![deny(unused_must_use)]

#[cfg(all(target_os = "espidf", not(feature = "espidf")))]
compile_error!("building for ESP-IDF requires the `espidf` feature");

pub mod adapters;
pub mod config;
pub mod detect;
pub mod error;
pub mod handset;
pub mod pins;
pub mod ports;

pub use config::DetectConfig;
pub use detect::Protocol;
pub use error::{CaptureError, Error, Result};
pub use handset::{AutoDetect, Handset, HandsetFactory, HandsetSlot};
