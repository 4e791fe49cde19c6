//! Focus/break countdown.
//!
//! Every transition takes the current state by value and returns the next
//! one, so the state machine can be driven without any clock. Phase
//! boundaries always pause the countdown: a new phase only starts counting
//! after an explicit `start`.

use serde::{Deserialize, Serialize};

pub const FOCUS_SECONDS: u32 = 25 * 60;
pub const BREAK_SECONDS: u32 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    Break,
}

impl Phase {
    pub fn duration_seconds(self) -> u32 {
        match self {
            Self::Focus => FOCUS_SECONDS,
            Self::Break => BREAK_SECONDS,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Focus => "Focus Session",
            Self::Break => "Break Time",
        }
    }
}

/// What a single tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TickOutcome {
    /// The timer was paused; nothing changed.
    Idle,
    Ticked,
    /// A focus countdown hit zero and the break phase is now loaded.
    FocusCompleted,
    /// A break countdown hit zero and a fresh focus phase is now loaded.
    BreakCompleted,
}

impl TickOutcome {
    pub fn is_phase_change(self) -> bool {
        matches!(self, Self::FocusCompleted | Self::BreakCompleted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub remaining_seconds: u32,
    pub is_running: bool,
    pub is_break: bool,
    pub completed_sessions: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            remaining_seconds: FOCUS_SECONDS,
            is_running: false,
            is_break: false,
            completed_sessions: 0,
        }
    }
}

impl TimerState {
    pub fn phase(&self) -> Phase {
        if self.is_break {
            Phase::Break
        } else {
            Phase::Focus
        }
    }

    pub fn start(self) -> Self {
        Self {
            is_running: true,
            ..self
        }
    }

    pub fn pause(self) -> Self {
        Self {
            is_running: false,
            ..self
        }
    }

    /// Back to a paused, full-length focus phase. The session count survives.
    pub fn reset(self) -> Self {
        Self {
            completed_sessions: self.completed_sessions,
            ..Self::default()
        }
    }

    pub fn tick(self) -> (Self, TickOutcome) {
        if !self.is_running {
            return (self, TickOutcome::Idle);
        }

        let remaining = self.remaining_seconds.saturating_sub(1);
        if remaining > 0 {
            let next = Self {
                remaining_seconds: remaining,
                ..self
            };
            return (next, TickOutcome::Ticked);
        }

        match self.phase() {
            Phase::Focus => {
                let next = Self {
                    remaining_seconds: BREAK_SECONDS,
                    is_running: false,
                    is_break: true,
                    completed_sessions: self.completed_sessions.saturating_add(1),
                };
                (next, TickOutcome::FocusCompleted)
            }
            Phase::Break => {
                let next = Self {
                    remaining_seconds: FOCUS_SECONDS,
                    is_running: false,
                    is_break: false,
                    completed_sessions: self.completed_sessions,
                };
                (next, TickOutcome::BreakCompleted)
            }
        }
    }
}
