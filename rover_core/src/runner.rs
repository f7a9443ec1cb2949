//! Drive loop orchestration.
//!
//! Each iteration drains whatever command frames the transport has
//! delivered, applies them, then runs one control tick. The tick paces
//! itself through the clock, so this loop never busy-spins. A command that
//! has not yet been delivered is simply picked up on the next iteration.

use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel as xch;
use rover_traits::{DigitalIo, PulseCounter, PwmOut};

use crate::command::Command;
use crate::core::DriveCore;
use crate::error::Result;
use crate::status::TickStatus;

/// Run the control loop until `shutdown` is set or the transport closes.
/// The vehicle is parked before returning.
pub fn run<D, W, P>(
    drive: &mut DriveCore<D, W, P>,
    frames: &xch::Receiver<Vec<u8>>,
    shutdown: &AtomicBool,
) -> Result<()>
where
    D: DigitalIo,
    W: PwmOut,
    P: PulseCounter,
{
    run_with(drive, frames, shutdown, |_, _| {})
}

/// `run` with an observer invoked after every tick (stats logging, tests).
pub fn run_with<D, W, P, F>(
    drive: &mut DriveCore<D, W, P>,
    frames: &xch::Receiver<Vec<u8>>,
    shutdown: &AtomicBool,
    mut observe: F,
) -> Result<()>
where
    D: DigitalIo,
    W: PwmOut,
    P: PulseCounter,
    F: FnMut(&DriveCore<D, W, P>, &TickStatus),
{
    tracing::info!(state = %drive.state(), "control loop started");
    loop {
        if shutdown.load(Ordering::Relaxed) {
            drive.halt()?;
            tracing::info!("shutdown requested; vehicle parked");
            return Ok(());
        }

        // Drain pending frames; one decode per frame, malformed frames are
        // silently dropped.
        loop {
            match frames.try_recv() {
                Ok(frame) => match Command::decode(&frame) {
                    Some(cmd) => {
                        tracing::debug!(?cmd, "command received");
                        drive.apply(cmd);
                    }
                    None => {
                        tracing::debug!(len = frame.len(), "ignoring unrecognized frame");
                    }
                },
                Err(xch::TryRecvError::Empty) => break,
                Err(xch::TryRecvError::Disconnected) => {
                    drive.halt()?;
                    tracing::info!("command transport closed; vehicle parked");
                    return Ok(());
                }
            }
        }

        let status = drive.tick()?;
        if let TickStatus::Stopped(reason) = status {
            tracing::info!(reason = %reason, "movement stopped");
        }
        observe(drive, &status);
    }
}
