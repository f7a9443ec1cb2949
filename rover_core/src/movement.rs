//! Movement direction state.

/// Current direction of travel. Initial state is `Stopped`; `Stopped` is
/// re-enterable, not absorbing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    Right,
    Left,
    Stopped,
}

impl Movement {
    #[inline]
    pub fn is_moving(self) -> bool {
        !matches!(self, Movement::Stopped)
    }
}

impl core::fmt::Display for Movement {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = match self {
            Movement::Right => "right",
            Movement::Left => "left",
            Movement::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
