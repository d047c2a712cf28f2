//! Fuzz target: `AutoDetect::handle_input`
//!
//! Treats the input as a stream of raw RMT items split into batches, with
//! interleaved empty polls and clock jumps.  Asserts that detection never
//! panics, never hands off twice, and never reports a handoff while the
//! score is still inside the margin.
//!
//! cargo fuzz run fuzz_pulse_stream

#![no_main]

use handset_autodetect::handset::{Detection, Handset, HandsetFactory, LinkCallbacks};
use handset_autodetect::ports::{CaptureSettings, PulseCapture, Sample};
use handset_autodetect::{AutoDetect, CaptureError, DetectConfig};
use libfuzzer_sys::fuzz_target;
use std::collections::VecDeque;

struct FuzzCapture {
    batches: VecDeque<Option<Vec<Sample>>>,
    current: Option<Vec<Sample>>,
}

impl PulseCapture for FuzzCapture {
    fn start(&mut self, _settings: &CaptureSettings) -> Result<(), CaptureError> {
        Ok(())
    }
    fn receive(&mut self) -> Option<&[Sample]> {
        self.current = self.batches.pop_front().flatten();
        self.current.as_deref()
    }
    fn return_batch(&mut self) {
        self.current = None;
    }
    fn release(&mut self) {
        self.batches.clear();
    }
}

struct Inert;

impl Handset for Inert {
    fn begin(&mut self) {}
    fn end(&mut self) {}
    fn is_armed(&self) -> bool {
        false
    }
    fn handle_input(&mut self, _now_ms: u32) {}
    fn set_rc_data_callback(&mut self, _callback: Option<fn()>) {}
    fn register_parameter_update_callback(&mut self, _callback: Option<fn(u8, u8, u8)>) {}
    fn register_callbacks(&mut self, _callbacks: LinkCallbacks) {}
    fn set_packet_interval(&mut self, _interval_us: i32) {}
}

struct CountingFactory(u32);

impl HandsetFactory for CountingFactory {
    fn ppm(&mut self) -> Box<dyn Handset> {
        self.0 += 1;
        Box::new(Inert)
    }
    fn crsf(&mut self) -> Box<dyn Handset> {
        self.0 += 1;
        Box::new(Inert)
    }
}

fuzz_target!(|data: &[u8]| {
    // Each 5-byte chunk: 1 control byte + one RMT item.  Control selects
    // batch boundaries, empty polls and how far the clock advances.
    let mut batches = VecDeque::new();
    let mut batch = Vec::new();
    let mut steps = Vec::new();
    for chunk in data.chunks_exact(5) {
        let item = u32::from_le_bytes([chunk[1], chunk[2], chunk[3], chunk[4]]);
        batch.push(Sample::from_raw(item));
        if chunk[0] & 0x01 != 0 {
            batches.push_back(Some(core::mem::take(&mut batch)));
            steps.push(u32::from(chunk[0] >> 1) * 20);
        }
        if chunk[0] & 0x80 != 0 {
            batches.push_back(None);
            steps.push(u32::from(chunk[0]) * 10);
        }
    }

    let capture = FuzzCapture {
        batches,
        current: None,
    };
    let Ok(mut detector) = AutoDetect::new(&DetectConfig::default(), capture, CountingFactory(0))
    else {
        return;
    };
    if detector.begin(0).is_err() {
        return;
    }

    let mut now = 0u32;
    for step in steps {
        now = now.wrapping_add(step);
        let before = detector.score();
        match detector.handle_input(now) {
            Detection::Detecting(d) => {
                assert!((-100..=100).contains(&d.score()), "score left margin undecided");
                detector = d;
            }
            Detection::Handoff { .. } => {
                assert!((-100..=100).contains(&before));
                return;
            }
        }
    }
});
