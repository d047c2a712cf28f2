//! Protocol autodetection on the RC signal pin.
//!
//! Each poll drains at most one batch from the capture queue without
//! waiting, classifies every segment and feeds the votes into the
//! confidence score.  The first sample that pushes the score past the
//! margin decides the protocol; the detector then hands the pin over and
//! ceases to exist.
//!
//! ## Handoff order
//!
//! 1. Stop and uninstall the capture driver (the handler reconfigures the
//!    same pin).
//! 2. Build the PPM or CRSF handler.
//! 3. Replay the stored callbacks and packet interval.
//! 4. Begin the handler.
//! 5. Drop the detector; the caller installs the handler.

use log::{debug, info, warn};

use super::callbacks::{CallbackSet, LinkCallbacks};
use super::{Handset, HandsetFactory, ParameterUpdateCallback, RcDataCallback};
use crate::config::DetectConfig;
use crate::detect::{Confidence, IdleMonitor, Protocol, PulseClassifier};
use crate::error::{CaptureError, Result};
use crate::pins;
use crate::ports::{CaptureSettings, PulseCapture};

/// Outcome of one [`AutoDetect::handle_input`] poll.
pub enum Detection<C: PulseCapture, F: HandsetFactory> {
    /// Still undecided; keep polling the returned detector.
    Detecting(AutoDetect<C, F>),
    /// Decided.  The detector is gone and `handset` owns the pin.
    Handoff {
        protocol: Protocol,
        handset: Box<dyn Handset>,
    },
}

pub struct AutoDetect<C: PulseCapture, F: HandsetFactory> {
    capture: C,
    factory: F,
    settings: CaptureSettings,
    classifier: PulseClassifier,
    confidence: Confidence,
    idle: IdleMonitor,
    callbacks: CallbackSet,
    capturing: bool,
}

impl<C: PulseCapture, F: HandsetFactory> AutoDetect<C, F> {
    /// Detector on the module-bay signal pin.
    pub fn new(config: &DetectConfig, capture: C, factory: F) -> Result<Self> {
        Self::with_pin(config, capture, factory, pins::RC_SIGNAL_RX_GPIO, pins::PPM_RMT_CHANNEL)
    }

    pub fn with_pin(
        config: &DetectConfig,
        capture: C,
        factory: F,
        gpio: i32,
        channel: u32,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            capture,
            factory,
            settings: config.capture_settings(gpio, channel),
            classifier: PulseClassifier::new(config),
            confidence: Confidence::new(config.decision_margin),
            idle: IdleMonitor::new(config.signal_loss_reset_ms),
            callbacks: CallbackSet::default(),
            capturing: false,
        })
    }

    /// Start capturing and clear any previous evidence.
    pub fn begin(&mut self, now_ms: u32) -> Result<()> {
        if self.capturing {
            return Err(CaptureError::AlreadyRunning.into());
        }
        self.capture.start(&self.settings)?;
        self.capturing = true;
        self.confidence.reset();
        self.idle.mark_activity(now_ms);
        info!(
            "autodetect: listening on GPIO{} (rmt ch{}, clk_div={}, idle={} ticks)",
            self.settings.gpio,
            self.settings.channel,
            self.settings.clk_div,
            self.settings.idle_threshold_ticks
        );
        Ok(())
    }

    /// Release the capture peripheral without deciding.  The detector is
    /// inert afterwards.
    pub fn end(&mut self) {
        if self.capturing {
            info!("autodetect: stopped before a protocol was detected");
        }
        self.release_capture();
    }

    /// Arming has no meaning before a protocol is chosen.
    pub fn is_armed(&self) -> bool {
        false
    }

    /// Poll once.  Never blocks.
    pub fn handle_input(mut self, now_ms: u32) -> Detection<C, F> {
        match self.sample_input(now_ms) {
            Some(protocol) => {
                let handset = self.hand_off(protocol);
                Detection::Handoff { protocol, handset }
            }
            None => Detection::Detecting(self),
        }
    }

    pub fn set_rc_data_callback(&mut self, callback: Option<RcDataCallback>) {
        self.callbacks.rc_data = callback;
    }

    pub fn register_parameter_update_callback(&mut self, callback: Option<ParameterUpdateCallback>) {
        self.callbacks.parameter_update = callback;
    }

    pub fn register_callbacks(&mut self, callbacks: LinkCallbacks) {
        self.callbacks.link = callbacks;
    }

    pub fn set_packet_interval(&mut self, interval_us: i32) {
        self.callbacks.packet_interval_us = interval_us;
    }

    /// Registrations that will be replayed onto the handler.
    pub fn callbacks(&self) -> &CallbackSet {
        &self.callbacks
    }

    /// Current confidence score (positive leans PPM, negative CRSF).
    pub fn score(&self) -> i32 {
        self.confidence.score()
    }

    pub fn is_capturing(&self) -> bool {
        self.capturing
    }

    /// Capture backend, e.g. for injecting batches into the host
    /// simulation.
    pub fn capture_mut(&mut self) -> &mut C {
        &mut self.capture
    }

    fn sample_input(&mut self, now_ms: u32) -> Option<Protocol> {
        if !self.capturing {
            return None;
        }

        let Some(batch) = self.capture.receive() else {
            if self.idle.is_stale(now_ms) && !self.confidence.is_neutral() {
                debug!(
                    "autodetect: no signal detected, dropping score {}",
                    self.confidence.score()
                );
                self.confidence.reset();
            }
            return None;
        };

        self.idle.mark_activity(now_ms);
        let mut decision = None;
        for &sample in batch {
            for vote in self.classifier.votes(sample) {
                self.confidence.record(vote);
            }
            decision = self.confidence.decision();
            if decision.is_some() {
                break;
            }
        }
        self.capture.return_batch();

        match decision {
            Some(Protocol::Crsf) => debug!("autodetect: serial signal detected"),
            Some(Protocol::Ppm) => debug!("autodetect: PPM signal detected"),
            None => {}
        }
        decision
    }

    fn hand_off(mut self, protocol: Protocol) -> Box<dyn Handset> {
        self.release_capture();

        let mut handset = match protocol {
            Protocol::Ppm => self.factory.ppm(),
            Protocol::Crsf => self.factory.crsf(),
        };
        self.callbacks.replay(handset.as_mut());
        handset.begin();

        info!(
            "autodetect: {} handset started (score={}, interval={}us)",
            protocol,
            self.confidence.score(),
            self.callbacks.packet_interval_us
        );
        handset
    }

    fn release_capture(&mut self) {
        if self.capturing {
            self.capture.release();
            self.capturing = false;
        }
    }
}

impl<C: PulseCapture, F: HandsetFactory> Drop for AutoDetect<C, F> {
    fn drop(&mut self) {
        if self.capturing {
            warn!("autodetect: dropped while capturing, releasing channel");
            self.release_capture();
        }
    }
}
