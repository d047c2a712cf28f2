//! Adapters: concrete implementations of the port traits.
//!
//! | Adapter       | Implements   | Connects to                    |
//! |---------------|--------------|--------------------------------|
//! | `rmt_capture` | PulseCapture | ESP32 RMT RX / host simulation |

pub mod rmt_capture;
