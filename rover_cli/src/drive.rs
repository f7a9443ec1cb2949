//! Control-loop assembly: config mapping, I/O composition, stdin transport.

use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use eyre::WrapErr;

use crate::cli::{Heading, JSON_MODE};
use rover_core::error::Result as CoreResult;
use rover_core::{ControlCfg, GeometryCfg, Movement, PinMap, SafetyCfg, TimerCfg, runner};

/// Run the drive loop until ctrl-c or stdin closes.
pub fn run_drive(
    cfg: &rover_config::Config,
    heading: Heading,
    target_mps: Option<f32>,
    timer_s: Option<f32>,
    stats: bool,
) -> CoreResult<()> {
    let pins: PinMap = (&cfg.pins).into();
    let geometry: GeometryCfg = (&cfg.geometry).into();
    let mut control: ControlCfg = (&cfg.control).into();
    if let Some(t) = target_mps {
        control.target_velocity_mps = t;
    }
    let safety: SafetyCfg = (&cfg.safety).into();
    let mut timer: TimerCfg = (&cfg.timer).into();
    if let Some(s) = timer_s {
        timer = TimerCfg {
            enabled: true,
            duration_s: s,
        };
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            shutdown.store(true, Ordering::Relaxed);
        })
        .wrap_err("install ctrl-c handler")?;
    }

    // Transport: newline-delimited frames on stdin. The core never sees the
    // framing; lines are trimmed and forwarded as raw bytes. Dropping the
    // sender on EOF closes the transport and parks the vehicle.
    let (tx, rx) = crossbeam_channel::bounded::<Vec<u8>>(16);
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let frame = line.trim_end().as_bytes().to_vec();
            if frame.is_empty() {
                continue;
            }
            if tx.send(frame).is_err() {
                break;
            }
        }
        tracing::debug!("stdin transport closed");
    });

    let initial = match heading {
        Heading::Right => Movement::Right,
        Heading::Left => Movement::Left,
        Heading::Stopped => Movement::Stopped,
    };
    let snapshot_every = u64::from(control.tick_rate_hz.max(1));

    // Composition point: hardware-backed or in-memory simulated I/O.
    #[cfg(feature = "hardware")]
    {
        use rover_hardware::pi::{PiEncoder, PiPins, PiPwm};

        let dio = PiPins::new(
            &[cfg.pins.in1, cfg.pins.in2, cfg.pins.in3, cfg.pins.in4],
            &[cfg.pins.edge_left, cfg.pins.edge_right],
        )
        .wrap_err("open direction/sensor pins")?;
        let pwm = PiPwm::new(&[(cfg.pins.pwm_a, cfg.pins.ena), (cfg.pins.pwm_b, cfg.pins.enb)])
            .wrap_err("open pwm pins")?;
        let encoder = PiEncoder::new(cfg.pins.encoder).wrap_err("open encoder pin")?;

        let mut drive = rover_core::build_drive(
            dio, pwm, encoder, pins, geometry, control, safety, timer, None,
        )?;
        drive.request(initial);
        tracing::info!(backend = "hardware", state = %drive.state(), "drive loop starting");
        run_loop(&mut drive, &rx, &shutdown, stats, snapshot_every)
    }
    #[cfg(not(feature = "hardware"))]
    {
        use rover_hardware::{SimulatedEncoder, SimulatedPins, SimulatedPwm};

        let mut drive = rover_core::build_drive(
            SimulatedPins::new(),
            SimulatedPwm::new(),
            SimulatedEncoder::new(),
            pins,
            geometry,
            control,
            safety,
            timer,
            None,
        )?;
        drive.request(initial);
        tracing::info!(backend = "simulated", state = %drive.state(), "drive loop starting");
        run_loop(&mut drive, &rx, &shutdown, stats, snapshot_every)
    }
}

fn run_loop<D, W, P>(
    drive: &mut rover_core::DriveCore<D, W, P>,
    rx: &crossbeam_channel::Receiver<Vec<u8>>,
    shutdown: &AtomicBool,
    stats: bool,
    snapshot_every: u64,
) -> CoreResult<()>
where
    D: rover_traits::DigitalIo,
    W: rover_traits::PwmOut,
    P: rover_traits::PulseCounter,
{
    let mut ticks: u64 = 0;
    runner::run_with(drive, rx, shutdown, |d, _status| {
        ticks += 1;
        if stats && ticks % snapshot_every == 0 {
            let s = d.snapshot();
            tracing::info!(
                state = %s.state,
                target_mps = s.target_mps,
                velocity_mps = s.velocity_mps,
                err_p = s.err.p,
                err_i = s.err.i,
                err_d = s.err.d,
                duty = s.out_duty,
                edge_hits = s.edge_hits,
                "controller snapshot"
            );
        }
    })
}

/// Exercise the composed I/O once: neutral pattern out, edge sensors in,
/// encoder drained. Reports ok when every call succeeds.
pub fn self_check(cfg: &rover_config::Config) -> CoreResult<()> {
    #[cfg(feature = "hardware")]
    let backend = {
        use rover_hardware::pi::{PiEncoder, PiPins, PiPwm};

        let mut dio = PiPins::new(
            &[cfg.pins.in1, cfg.pins.in2, cfg.pins.in3, cfg.pins.in4],
            &[cfg.pins.edge_left, cfg.pins.edge_right],
        )
        .wrap_err("open direction/sensor pins")?;
        let mut pwm =
            PiPwm::new(&[(cfg.pins.pwm_a, cfg.pins.ena), (cfg.pins.pwm_b, cfg.pins.enb)])
                .wrap_err("open pwm pins")?;
        let mut encoder = PiEncoder::new(cfg.pins.encoder).wrap_err("open encoder pin")?;
        exercise_io(cfg, &mut dio, &mut pwm, &mut encoder)?;
        "hardware"
    };
    #[cfg(not(feature = "hardware"))]
    let backend = {
        use rover_hardware::{SimulatedEncoder, SimulatedPins, SimulatedPwm};

        let mut dio = SimulatedPins::new();
        let mut pwm = SimulatedPwm::new();
        let mut encoder = SimulatedEncoder::new();
        exercise_io(cfg, &mut dio, &mut pwm, &mut encoder)?;
        "simulated"
    };

    if *JSON_MODE.get().unwrap_or(&false) {
        println!(
            "{}",
            serde_json::json!({ "status": "ok", "backend": backend })
        );
    } else {
        println!("self-check: ok ({backend})");
    }
    Ok(())
}

fn exercise_io<D, W, P>(
    cfg: &rover_config::Config,
    dio: &mut D,
    pwm: &mut W,
    encoder: &mut P,
) -> CoreResult<()>
where
    D: rover_traits::DigitalIo,
    W: rover_traits::PwmOut,
    P: rover_traits::PulseCounter,
{
    use rover_traits::Level;

    for pin in [cfg.pins.in1, cfg.pins.in2, cfg.pins.in3, cfg.pins.in4] {
        dio.write(pin, Level::Low)
            .map_err(|e| eyre::eyre!("direction pin {pin}: {e}"))?;
    }
    for channel in [cfg.pins.pwm_a, cfg.pins.pwm_b] {
        pwm.set_duty(channel, 0)
            .map_err(|e| eyre::eyre!("pwm channel {channel}: {e}"))?;
    }
    for pin in [cfg.pins.edge_left, cfg.pins.edge_right] {
        let level = dio
            .read(pin)
            .map_err(|e| eyre::eyre!("edge sensor {pin}: {e}"))?;
        tracing::debug!(pin, ?level, "edge sensor sampled");
    }
    let pulses = encoder.drain();
    tracing::debug!(pulses, "encoder drained");
    Ok(())
}
