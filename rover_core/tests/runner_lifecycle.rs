//! Runner lifecycle: command drain ordering, transport close, shutdown flag.

use std::error::Error;
use std::sync::atomic::AtomicBool;

use crossbeam_channel::bounded;
use rover_core::{
    ControlCfg, GeometryCfg, Movement, PinMap, SafetyCfg, TimerCfg, build_drive, runner,
};
use rover_hardware::SimulatedEncoder;
use rover_traits::clock::test_clock::TestClock;
use rover_traits::{DigitalIo, Level, PwmOut};
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

fn drive() -> rover_core::DriveCore<NoopIo, NoopPwm, SimulatedEncoder> {
    build_drive(
        NoopIo,
        NoopPwm,
        SimulatedEncoder::new(),
        PinMap::default(),
        GeometryCfg::default(),
        ControlCfg::default(),
        SafetyCfg::default(),
        TimerCfg::default(),
        Some(Box::new(TestClock::new())),
    )
    .expect("drive build")
}

#[rstest]
fn closed_transport_parks_and_returns_ok() {
    let mut d = drive();
    let (tx, rx) = bounded::<Vec<u8>>(16);
    tx.send(b"a".to_vec()).unwrap();
    tx.send(b"i\xff".to_vec()).unwrap();
    drop(tx);

    let shutdown = AtomicBool::new(false);
    runner::run(&mut d, &rx, &shutdown).expect("runner");

    // Queued commands were applied before the close was observed, then the
    // vehicle was parked on exit.
    assert_eq!(d.state(), Movement::Stopped);
    assert!((d.snapshot().target_mps - 1.0).abs() < 1e-6);
}

#[rstest]
fn malformed_frames_are_dropped_silently() {
    let mut d = drive();
    let (tx, rx) = bounded::<Vec<u8>>(16);
    tx.send(Vec::new()).unwrap(); // empty frame
    tx.send(b"q".to_vec()).unwrap(); // unknown opcode
    tx.send(b"k".to_vec()).unwrap(); // truncated payload
    tx.send(b"x\x2a".to_vec()).unwrap(); // valid: manual duty 42
    drop(tx);

    let shutdown = AtomicBool::new(false);
    runner::run(&mut d, &rx, &shutdown).expect("runner");
    assert_eq!(d.snapshot().manual_duty, 42);
}

#[rstest]
fn preset_shutdown_flag_stops_immediately() {
    let mut d = drive();
    let (_tx, rx) = bounded::<Vec<u8>>(16);
    let shutdown = AtomicBool::new(true);
    runner::run(&mut d, &rx, &shutdown).expect("runner");
    assert_eq!(d.state(), Movement::Stopped);
}
