//! Detection behaviour: classification, confidence and signal loss,
//! driven through the application-facing `HandsetSlot`.

use crate::mock_hw::{Bench, Entry, MockCapture, MockFactory};

use handset_autodetect::ports::Sample;
use handset_autodetect::{
    AutoDetect, CaptureError, DetectConfig, Error, HandsetSlot, Protocol, pins,
};

/// One tick per microsecond, so sample durations read as µs.
fn us_config() -> DetectConfig {
    DetectConfig {
        ticks_per_us: 1,
        ..DetectConfig::default()
    }
}

fn started_slot(bench: &Bench, config: &DetectConfig) -> HandsetSlot<MockCapture, MockFactory> {
    let detector = AutoDetect::new(config, bench.capture(), bench.factory()).unwrap();
    let mut slot = HandsetSlot::new(detector);
    slot.begin(0).unwrap();
    slot
}

fn score(slot: &HandsetSlot<MockCapture, MockFactory>) -> i32 {
    slot.detector().map(|d| d.score()).expect("still detecting")
}

// ── Decisions ─────────────────────────────────────────────────

#[test]
fn long_segments_select_ppm_on_the_101st_sample() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    for i in 1..=100u32 {
        bench.push(vec![Sample::new(450, 0)]);
        slot.handle_input(i);
        assert_eq!(slot.protocol(), None, "decided early at sample {i}");
    }
    assert_eq!(score(&slot), 100);

    bench.push(vec![Sample::new(450, 0)]);
    slot.handle_input(101);
    assert_eq!(slot.protocol(), Some(Protocol::Ppm));
    assert_eq!(bench.handsets_built(), 1);
}

#[test]
fn short_segments_select_crsf_on_the_51st_sample() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    for i in 1..=50u32 {
        bench.push(vec![Sample::new(50, 50)]);
        slot.handle_input(i);
    }
    assert_eq!(slot.protocol(), None);
    assert_eq!(score(&slot), -100, "two votes per sample");

    bench.push(vec![Sample::new(50, 50)]);
    slot.handle_input(51);
    assert_eq!(slot.protocol(), Some(Protocol::Crsf));
}

#[test]
fn decision_inside_a_batch_still_returns_the_batch() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    bench.push(vec![Sample::new(450, 0); 150]);
    slot.handle_input(5);

    assert_eq!(slot.protocol(), Some(Protocol::Ppm));
    let ret = bench.position(&Entry::CaptureReturn).expect("batch returned");
    let rel = bench.position(&Entry::CaptureRelease).expect("capture released");
    assert!(ret < rel, "batch must go back to the pool before uninstall");
    assert_eq!(bench.count(|e| matches!(e, Entry::CaptureReceive(_))), 1);
}

#[test]
fn dead_zone_and_zero_durations_never_decide() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    for i in 1..=50u32 {
        bench.push(vec![
            Sample::new(250, 0),
            Sample::new(100, 400),
            Sample::new(0, 0),
            Sample::new(399, 101),
        ]);
        slot.handle_input(i);
    }

    assert_eq!(slot.protocol(), None);
    assert_eq!(score(&slot), 0);
    assert_eq!(bench.handsets_built(), 0);
}

#[test]
fn balanced_noise_keeps_detector_undecided() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    for i in 1..=200u32 {
        bench.push(vec![Sample::new(450, 0), Sample::new(30, 0)]);
        slot.handle_input(i);
    }

    assert_eq!(slot.protocol(), None);
    assert_eq!(score(&slot), 0);
}

#[test]
fn isolated_glitches_only_delay_the_decision() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    // Every other sample carries one glitch vote: net +1 per two samples.
    let mut polls = 0u32;
    while slot.protocol().is_none() && polls < 500 {
        polls += 1;
        bench.push(vec![Sample::new(450, 12), Sample::new(1800, 0)]);
        slot.handle_input(polls);
    }

    assert_eq!(slot.protocol(), Some(Protocol::Ppm));
    assert_eq!(polls, 101);
}

#[test]
fn sub_microsecond_bits_count_at_default_resolution() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &DetectConfig::default());

    // ~0.19 µs bits at 5.25 MBaud are 6 ticks at 32 ticks/µs.
    bench.push(vec![Sample::new(6, 6); 51]);
    slot.handle_input(1);

    assert_eq!(slot.protocol(), Some(Protocol::Crsf));
}

#[test]
fn default_resolution_scales_gap_threshold() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &DetectConfig::default());

    // 400 µs exactly is inert, 401 µs votes.
    bench.push(vec![Sample::new(400 * 32, 0); 64]);
    slot.handle_input(1);
    assert_eq!(score(&slot), 0);

    bench.push(vec![Sample::new(401 * 32, 0); 64]);
    bench.push(vec![Sample::new(401 * 32, 0); 64]);
    slot.handle_input(2);
    assert_eq!(score(&slot), 64);
    slot.handle_input(3);
    assert_eq!(slot.protocol(), Some(Protocol::Ppm));
}

// ── Signal loss ───────────────────────────────────────────────

#[test]
fn silence_longer_than_window_discards_evidence() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    bench.push(vec![Sample::new(450, 0); 30]);
    slot.handle_input(10);
    assert_eq!(score(&slot), 30);

    slot.handle_input(1010);
    assert_eq!(score(&slot), 30, "exactly 1000 ms is still within the window");

    slot.handle_input(1011);
    assert_eq!(score(&slot), 0);

    for t in (2000..60_000).step_by(500) {
        slot.handle_input(t);
    }
    assert_eq!(slot.protocol(), None);
    assert_eq!(bench.handsets_built(), 0);
}

#[test]
fn stale_evidence_cannot_combine_with_a_new_signal() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    // Handset A: 90 PPM-like votes, then powered off.
    bench.push(vec![Sample::new(450, 0); 90]);
    slot.handle_input(100);
    slot.handle_input(1500);
    assert_eq!(score(&slot), 0);

    // Handset B: 20 more PPM-like votes must not reach the margin.
    bench.push(vec![Sample::new(450, 0); 20]);
    slot.handle_input(1600);
    assert_eq!(slot.protocol(), None);
    assert_eq!(score(&slot), 20);
}

#[test]
fn evidence_survives_a_gap_when_the_next_poll_has_samples() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    bench.push(vec![Sample::new(450, 0); 30]);
    slot.handle_input(10);

    // No empty poll in between, so the monitor never fires.
    bench.push(vec![Sample::new(450, 0)]);
    slot.handle_input(5000);
    assert_eq!(score(&slot), 31);
}

// ── Lifecycle ─────────────────────────────────────────────────

#[test]
fn begin_configures_capture_for_the_signal_pin() {
    let bench = Bench::new();
    let _slot = started_slot(&bench, &us_config());

    let Some(Entry::CaptureStart(settings)) = bench.entries().first().cloned() else {
        panic!("capture not started: {:?}", bench.entries());
    };
    assert_eq!(settings.gpio, pins::RC_SIGNAL_RX_GPIO);
    assert_eq!(settings.channel, pins::PPM_RMT_CHANNEL);
    assert_eq!(settings.filter_ticks, 0, "glitch filter disabled");
    assert_eq!(settings.idle_threshold_ticks, 2000, "2 ms at 1 tick/us");
}

#[test]
fn begin_then_end_never_builds_a_handset() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    slot.end();

    assert!(!slot.is_armed());
    assert_eq!(bench.handsets_built(), 0);
    assert_eq!(bench.count(|e| *e == Entry::CaptureRelease), 1);
    assert!(!slot.detector().unwrap().is_capturing());
}

#[test]
fn polling_after_end_is_inert() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());
    slot.end();

    bench.push(vec![Sample::new(450, 0); 150]);
    slot.handle_input(10);

    assert_eq!(slot.protocol(), None);
    assert_eq!(bench.pending(), 1, "ended detector must not touch the queue");
}

#[test]
fn polling_before_begin_is_inert() {
    let bench = Bench::new();
    let detector = AutoDetect::new(&us_config(), bench.capture(), bench.factory()).unwrap();
    let mut slot = HandsetSlot::new(detector);

    bench.push(vec![Sample::new(450, 0); 150]);
    slot.handle_input(10);

    assert_eq!(slot.protocol(), None);
    assert_eq!(bench.pending(), 1, "unstarted detector must not touch the queue");
    assert!(bench.entries().is_empty());
    assert_eq!(score(&slot), 0);
}

#[test]
fn detector_is_never_armed() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());
    assert!(!slot.is_armed());

    bench.push(vec![Sample::new(50, 50); 10]);
    slot.handle_input(1);
    assert!(!slot.is_armed());
}

#[test]
fn capture_failure_is_reported_from_begin() {
    let bench = Bench::new();
    let capture = bench.failing_capture(CaptureError::InstallFailed(-1));
    let detector = AutoDetect::new(&us_config(), capture, bench.factory()).unwrap();
    let mut slot = HandsetSlot::new(detector);

    assert_eq!(
        slot.begin(0),
        Err(Error::Capture(CaptureError::InstallFailed(-1)))
    );
    assert!(!slot.detector().unwrap().is_capturing());
}

#[test]
fn begin_twice_is_rejected() {
    let bench = Bench::new();
    let mut slot = started_slot(&bench, &us_config());

    assert_eq!(
        slot.begin(5),
        Err(Error::Capture(CaptureError::AlreadyRunning))
    );
    assert_eq!(bench.count(|e| matches!(e, Entry::CaptureStart(_))), 1);
}

#[test]
fn invalid_config_is_rejected_at_construction() {
    let bench = Bench::new();
    let config = DetectConfig {
        short_threshold_us: 500,
        ..DetectConfig::default()
    };
    let result = AutoDetect::new(&config, bench.capture(), bench.factory());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn dropping_a_running_detector_releases_capture() {
    let bench = Bench::new();
    {
        let _slot = started_slot(&bench, &us_config());
    }
    assert_eq!(bench.count(|e| *e == Entry::CaptureRelease), 1);
}
