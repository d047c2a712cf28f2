//! Callback registrations held on behalf of a handler that does not exist
//! yet.

use super::{
    DEFAULT_PACKET_INTERVAL_US, Handset, LinkEventCallback, ParameterUpdateCallback,
    RcDataCallback,
};

/// The four link notifications, registered together.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkCallbacks {
    pub connected: Option<LinkEventCallback>,
    pub disconnected: Option<LinkEventCallback>,
    pub model_update: Option<LinkEventCallback>,
    pub binding_command: Option<LinkEventCallback>,
}

/// Everything the application registered before the protocol was known.
/// Stored untouched and replayed onto the handler at handoff; nothing
/// here is ever invoked by the detector.
#[derive(Debug, Clone, Copy)]
pub struct CallbackSet {
    pub rc_data: Option<RcDataCallback>,
    pub parameter_update: Option<ParameterUpdateCallback>,
    pub link: LinkCallbacks,
    pub packet_interval_us: i32,
}

impl Default for CallbackSet {
    fn default() -> Self {
        Self {
            rc_data: None,
            parameter_update: None,
            link: LinkCallbacks::default(),
            packet_interval_us: DEFAULT_PACKET_INTERVAL_US,
        }
    }
}

impl CallbackSet {
    /// Copy every registration onto `handset`.
    pub fn replay(&self, handset: &mut dyn Handset) {
        handset.set_rc_data_callback(self.rc_data);
        handset.register_parameter_update_callback(self.parameter_update);
        handset.register_callbacks(self.link);
        handset.set_packet_interval(self.packet_interval_us);
    }
}
