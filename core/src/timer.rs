use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerState {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Elapsed-seconds counter advanced by an external one-second tick.
///
/// Only a running stopwatch counts ticks, so a tick scheduled for a session that already ended, or one that arrives
/// before the first click of a fresh session, changes nothing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stopwatch {
    state: TimerState,
    elapsed_secs: u32,
}

impl Stopwatch {
    pub const fn new() -> Self {
        Self {
            state: TimerState::Idle,
            elapsed_secs: 0,
        }
    }

    pub const fn state(&self) -> TimerState {
        self.state
    }

    pub const fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running)
    }

    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Starts counting; a stopped stopwatch stays stopped.
    pub fn start(&mut self) {
        if matches!(self.state, TimerState::Idle) {
            self.state = TimerState::Running;
        }
    }

    pub fn stop(&mut self) {
        self.state = TimerState::Stopped;
    }

    pub fn tick(&mut self) -> bool {
        if self.is_running() {
            self.elapsed_secs = self.elapsed_secs.saturating_add(1);
            true
        } else {
            false
        }
    }
}
