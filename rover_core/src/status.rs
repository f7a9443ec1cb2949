//! Per-tick status and the diagnostic snapshot.

use crate::error::StopReason;
use crate::movement::Movement;
use crate::pid::{ErrorTerms, PidGains};

/// Public status of a single control tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStatus {
    /// Actively driving in the given direction.
    Moving(Movement),
    /// Parked; neutral pin pattern and zero duty written.
    Idle,
    /// A stop condition tripped this tick; the vehicle is now Stopped.
    Stopped(StopReason),
}

/// Point-in-time view of the controller, for logging and tests.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub state: Movement,
    pub target_mps: f32,
    pub velocity_mps: f32,
    pub err: ErrorTerms,
    pub out_duty: f32,
    pub gains: PidGains,
    pub control_active: bool,
    pub manual_duty: u8,
    pub timer_enabled: bool,
    pub timer_duration_s: f32,
    pub edge_hits: u8,
}
