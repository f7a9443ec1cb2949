//! Command protocol decoder.
//!
//! Frames are a single opcode byte followed by a fixed payload. Decoding is a
//! pure function; the side effect happens in `DriveCore::apply`. Anything the
//! decoder cannot make sense of — empty frame, unknown opcode, short payload,
//! unknown gain axis — is a defensive no-op (`None`), never an error.

use crate::pid::GainAxis;

pub const CMD_GO_RIGHT: u8 = b'a';
pub const CMD_GO_LEFT: u8 = b'b';
pub const CMD_STOP: u8 = b'c';
pub const CMD_SET_TARGET_VELOCITY: u8 = b'i';
pub const CMD_TOGGLE_CONTROL: u8 = b'j';
pub const CMD_SET_GAIN: u8 = b'k';
pub const CMD_SET_MANUAL_DUTY: u8 = b'x';
pub const CMD_SET_TIMER_DURATION: u8 = b'y';
pub const CMD_TOGGLE_TIMER: u8 = b'z';

/// A decoded command intent. Payload bytes stay raw; scaling to engineering
/// units happens when the command is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    GoRight,
    GoLeft,
    Stop,
    SetTargetVelocity(u8),
    ToggleControl,
    SetGain(GainAxis, u8),
    SetManualDuty(u8),
    SetTimerDuration(u8),
    ToggleTimer,
}

impl Command {
    /// Decode one frame. Exactly one command per call; surplus payload bytes
    /// are ignored.
    pub fn decode(frame: &[u8]) -> Option<Command> {
        let (&opcode, payload) = frame.split_first()?;
        match opcode {
            CMD_GO_RIGHT => Some(Command::GoRight),
            CMD_GO_LEFT => Some(Command::GoLeft),
            CMD_STOP => Some(Command::Stop),
            CMD_TOGGLE_CONTROL => Some(Command::ToggleControl),
            CMD_TOGGLE_TIMER => Some(Command::ToggleTimer),
            CMD_SET_TARGET_VELOCITY => payload.first().map(|&v| Command::SetTargetVelocity(v)),
            CMD_SET_MANUAL_DUTY => payload.first().map(|&v| Command::SetManualDuty(v)),
            CMD_SET_TIMER_DURATION => payload.first().map(|&v| Command::SetTimerDuration(v)),
            CMD_SET_GAIN => match payload {
                [b'p', v, ..] => Some(Command::SetGain(GainAxis::P, *v)),
                [b'i', v, ..] => Some(Command::SetGain(GainAxis::I, *v)),
                [b'd', v, ..] => Some(Command::SetGain(GainAxis::D, *v)),
                _ => None,
            },
            _ => None,
        }
    }
}
