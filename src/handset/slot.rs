//! The application's "current handset".
//!
//! Owned by the top-level context.  Starts out holding the detector and
//! is switched to the protocol handler exactly once, from inside
//! [`handle_input`](HandsetSlot::handle_input), when detection decides.
//! Every other call is forwarded to whichever stage is current, so the
//! application registers callbacks and polls the same way before and after
//! the handoff.

use log::info;

use super::autodetect::{AutoDetect, Detection};
use super::callbacks::LinkCallbacks;
use super::{Handset, HandsetFactory, ParameterUpdateCallback, RcDataCallback};
use crate::detect::Protocol;
use crate::error::Result;
use crate::ports::PulseCapture;

enum Stage<C: PulseCapture, F: HandsetFactory> {
    Detecting(AutoDetect<C, F>),
    Active {
        protocol: Protocol,
        handset: Box<dyn Handset>,
    },
}

pub struct HandsetSlot<C: PulseCapture, F: HandsetFactory> {
    // Only `None` for the duration of a detection poll.
    stage: Option<Stage<C, F>>,
}

impl<C: PulseCapture, F: HandsetFactory> HandsetSlot<C, F> {
    pub fn new(detector: AutoDetect<C, F>) -> Self {
        Self {
            stage: Some(Stage::Detecting(detector)),
        }
    }

    /// Start detection.  A no-op once a handler is installed, since the
    /// handoff has already started it.
    pub fn begin(&mut self, now_ms: u32) -> Result<()> {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.begin(now_ms),
            Some(Stage::Active { .. }) | None => Ok(()),
        }
    }

    pub fn end(&mut self) {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.end(),
            Some(Stage::Active { handset, .. }) => handset.end(),
            None => {}
        }
    }

    pub fn is_armed(&self) -> bool {
        match &self.stage {
            Some(Stage::Detecting(detector)) => detector.is_armed(),
            Some(Stage::Active { handset, .. }) => handset.is_armed(),
            None => false,
        }
    }

    /// Poll the current stage once.  May replace the detector with the
    /// decided handler.
    pub fn handle_input(&mut self, now_ms: u32) {
        if let Some(Stage::Active { handset, .. }) = &mut self.stage {
            handset.handle_input(now_ms);
            return;
        }

        if let Some(Stage::Detecting(detector)) = self.stage.take() {
            match detector.handle_input(now_ms) {
                Detection::Detecting(detector) => self.stage = Some(Stage::Detecting(detector)),
                Detection::Handoff { protocol, handset } => self.install(protocol, handset),
            }
        }
    }

    pub fn set_rc_data_callback(&mut self, callback: Option<RcDataCallback>) {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.set_rc_data_callback(callback),
            Some(Stage::Active { handset, .. }) => handset.set_rc_data_callback(callback),
            None => {}
        }
    }

    pub fn register_parameter_update_callback(&mut self, callback: Option<ParameterUpdateCallback>) {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.register_parameter_update_callback(callback),
            Some(Stage::Active { handset, .. }) => handset.register_parameter_update_callback(callback),
            None => {}
        }
    }

    pub fn register_callbacks(&mut self, callbacks: LinkCallbacks) {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.register_callbacks(callbacks),
            Some(Stage::Active { handset, .. }) => handset.register_callbacks(callbacks),
            None => {}
        }
    }

    pub fn set_packet_interval(&mut self, interval_us: i32) {
        match &mut self.stage {
            Some(Stage::Detecting(detector)) => detector.set_packet_interval(interval_us),
            Some(Stage::Active { handset, .. }) => handset.set_packet_interval(interval_us),
            None => {}
        }
    }

    /// Protocol in use, `None` while still detecting.
    pub fn protocol(&self) -> Option<Protocol> {
        match &self.stage {
            Some(Stage::Active { protocol, .. }) => Some(*protocol),
            _ => None,
        }
    }

    pub fn detector(&self) -> Option<&AutoDetect<C, F>> {
        match &self.stage {
            Some(Stage::Detecting(detector)) => Some(detector),
            _ => None,
        }
    }

    pub fn handset(&self) -> Option<&(dyn Handset + 'static)> {
        match &self.stage {
            Some(Stage::Active { handset, .. }) => Some(handset.as_ref()),
            _ => None,
        }
    }

    pub fn handset_mut(&mut self) -> Option<&mut (dyn Handset + 'static)> {
        match &mut self.stage {
            Some(Stage::Active { handset, .. }) => Some(handset.as_mut()),
            _ => None,
        }
    }

    fn install(&mut self, protocol: Protocol, handset: Box<dyn Handset>) {
        info!("handset: {} handler installed", protocol);
        self.stage = Some(Stage::Active { protocol, handset });
    }
}
