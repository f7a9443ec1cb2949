//! Command application semantics: scaling, toggles, and decode→apply flow.

use std::error::Error;

use rover_core::{Command, ControlCfg, Drive, GainAxis, Movement};
use rover_traits::clock::test_clock::TestClock;
use rover_traits::{DigitalIo, Level, PulseCounter, PwmOut};
use rstest::rstest;

struct NoopIo;
impl DigitalIo for NoopIo {
    fn read(&mut self, _pin: u8) -> Result<Level, Box<dyn Error + Send + Sync>> {
        Ok(Level::High)
    }
    fn write(&mut self, _pin: u8, _level: Level) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

struct NoopPwm;
impl PwmOut for NoopPwm {
    fn set_duty(&mut self, _channel: u8, _duty: u8) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }
}

struct NoopEncoder;
impl PulseCounter for NoopEncoder {
    fn drain(&mut self) -> u32 {
        0
    }
}

fn drive() -> Drive {
    Drive::builder()
        .with_digital_io(NoopIo)
        .with_pwm(NoopPwm)
        .with_pulse_counter(NoopEncoder)
        .with_clock(Box::new(TestClock::new()))
        .build()
        .expect("drive build")
}

#[rstest]
#[case(255, 1.0)]
#[case(0, 0.0)]
#[case(128, 128.0 / 255.0)]
fn target_velocity_scales_to_max(#[case] payload: u8, #[case] expected_mps: f32) {
    let mut d = drive();
    d.apply(Command::SetTargetVelocity(payload));
    assert!((d.snapshot().target_mps - expected_mps).abs() < 1e-6);
}

#[rstest]
fn gain_payload_255_maps_to_ten() {
    let mut d = drive();
    d.apply(Command::SetGain(GainAxis::P, 255));
    assert!((d.snapshot().gains.p - 10.0).abs() < 1e-6);
}

#[rstest]
fn gain_scaling_is_linear_per_axis() {
    let mut d = drive();
    d.apply(Command::SetGain(GainAxis::I, 51));
    d.apply(Command::SetGain(GainAxis::D, 102));
    let snap = d.snapshot();
    assert!((snap.gains.i - 51.0 * 10.0 / 255.0).abs() < 1e-6);
    assert!((snap.gains.d - 102.0 * 10.0 / 255.0).abs() < 1e-6);
    // P untouched by the other axes.
    assert!((snap.gains.p - 2.0).abs() < 1e-6);
}

#[rstest]
fn toggle_control_flips_and_flips_back() {
    let mut d = drive();
    assert!(d.snapshot().control_active);
    d.apply(Command::ToggleControl);
    assert!(!d.snapshot().control_active);
    d.apply(Command::ToggleControl);
    assert!(d.snapshot().control_active);
}

#[rstest]
fn manual_duty_and_timer_fields_update() {
    let mut d = drive();
    d.apply(Command::SetManualDuty(42));
    d.apply(Command::SetTimerDuration(5));
    d.apply(Command::ToggleTimer);
    let snap = d.snapshot();
    assert_eq!(snap.manual_duty, 42);
    assert!((snap.timer_duration_s - 5.0).abs() < f32::EPSILON);
    assert!(snap.timer_enabled);
}

#[rstest]
fn decoded_frames_drive_the_state_machine() {
    let mut d = drive();
    for frame in [b"a".as_slice(), b"c".as_slice(), b"b".as_slice()] {
        let cmd = Command::decode(frame).expect("valid frame");
        d.apply(cmd);
    }
    assert_eq!(d.state(), Movement::Left);
}

#[rstest]
fn defaults_match_the_power_on_state() {
    let d = drive();
    let snap = d.snapshot();
    assert_eq!(snap.state, Movement::Stopped);
    assert!((snap.target_mps - 0.1).abs() < 1e-6);
    assert!((snap.gains.p - 2.0).abs() < 1e-6);
    assert!((snap.gains.i - 1.0).abs() < 1e-6);
    assert!(snap.gains.d.abs() < 1e-6);
    assert!(snap.control_active);
    assert_eq!(snap.manual_duty, 255);
    assert!(!snap.timer_enabled);
    assert!((snap.timer_duration_s - 12.0).abs() < 1e-6);
}

#[rstest]
fn default_control_cfg_matches_snapshot_defaults() {
    let cfg = ControlCfg::default();
    assert_eq!(cfg.tick_rate_hz, 20);
    assert_eq!(cfg.manual_duty, 255);
}
