//! Drive the controller against the in-memory board.
//!
//! Run with: cargo run -p rover_core --example simulated_drive

use rover_core::{
    Command, ControlCfg, GeometryCfg, PinMap, SafetyCfg, TimerCfg, build_drive,
};
use rover_hardware::{SimulatedEncoder, SimulatedPins, SimulatedPwm};
use rover_traits::clock::test_clock::TestClock;

fn main() -> eyre::Result<()> {
    let encoder = SimulatedEncoder::new();
    let mut drive = build_drive(
        SimulatedPins::new(),
        SimulatedPwm::new(),
        encoder.clone(),
        PinMap::default(),
        GeometryCfg::default(),
        ControlCfg::default(),
        SafetyCfg::default(),
        TimerCfg::default(),
        Some(Box::new(TestClock::new())),
    )?;

    drive.apply(Command::GoRight);
    for i in 0..40u32 {
        // Pretend the wheel produced five encoder pulses this tick.
        encoder.feed(5);
        let status = drive.tick()?;
        if i % 10 == 0 {
            let s = drive.snapshot();
            println!(
                "t={:>4} ms  state={}  v={:.3} m/s  duty={:.3}  ({status:?})",
                i * 50,
                s.state,
                s.velocity_mps,
                s.out_duty,
            );
        }
    }

    drive.apply(Command::Stop);
    drive.tick()?;
    println!("parked: {}", drive.snapshot().state);
    Ok(())
}
