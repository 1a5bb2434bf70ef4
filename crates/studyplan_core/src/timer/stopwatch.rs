//! Pause/resume stopwatch.
//!
//! # Invariants
//! - Elapsed time never includes paused intervals: resuming shifts the start
//!   reference forward by the length of the pause.
//! - `start` while running and `stop` while not running are rejected.

use crate::timer::clock::{Clock, MonotonicClock};
use std::error::Error;
use std::fmt::{Display, Formatter};

const NANOS_PER_SECOND: f64 = 1e9;

/// Lifecycle state of a stopwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchState {
    /// Never started, or reset.
    Idle,
    Running,
    /// Paused; `start` resumes.
    Stopped,
}

/// Transition attempted from a state that does not allow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopwatchError {
    AlreadyRunning,
    NotRunning,
}

impl Display for StopwatchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "stopwatch is already running"),
            Self::NotRunning => write!(f, "stopwatch is not running"),
        }
    }
}

impl Error for StopwatchError {}

/// Elapsed-time counter that can be paused and resumed.
#[derive(Debug)]
pub struct Stopwatch<C: Clock = MonotonicClock> {
    clock: C,
    start_nanos: u64,
    end_nanos: u64,
    state: StopwatchState,
}

impl Stopwatch<MonotonicClock> {
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for Stopwatch<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Stopwatch<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            start_nanos: 0,
            end_nanos: 0,
            state: StopwatchState::Idle,
        }
    }

    pub fn state(&self) -> StopwatchState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == StopwatchState::Running
    }

    /// Starts from zero, or resumes after a `stop`.
    pub fn start(&mut self) -> Result<(), StopwatchError> {
        let now = self.clock.now_nanos();
        match self.state {
            StopwatchState::Running => return Err(StopwatchError::AlreadyRunning),
            StopwatchState::Idle => self.start_nanos = now,
            StopwatchState::Stopped => {
                let paused = now.saturating_sub(self.end_nanos);
                self.start_nanos = self.start_nanos.saturating_add(paused);
            }
        }
        self.state = StopwatchState::Running;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), StopwatchError> {
        if self.state != StopwatchState::Running {
            return Err(StopwatchError::NotRunning);
        }
        self.end_nanos = self.clock.now_nanos();
        self.state = StopwatchState::Stopped;
        Ok(())
    }

    /// Clears all recorded time, from any state.
    pub fn reset(&mut self) {
        self.start_nanos = 0;
        self.end_nanos = 0;
        self.state = StopwatchState::Idle;
    }

    /// Elapsed seconds, rounded to the nearest second.
    pub fn elapsed_seconds(&self) -> u64 {
        let reference = match self.state {
            StopwatchState::Running => self.clock.now_nanos(),
            StopwatchState::Idle | StopwatchState::Stopped => self.end_nanos,
        };
        let nanos = reference.saturating_sub(self.start_nanos);
        (nanos as f64 / NANOS_PER_SECOND).round() as u64
    }

    pub fn elapsed_minutes(&self) -> u64 {
        self.elapsed_seconds() / 60
    }

    pub fn elapsed_hours(&self) -> u64 {
        self.elapsed_minutes() / 60
    }

    /// `HH:MM:SS`, minutes and seconds as remainders of the larger unit.
    pub fn formatted(&self) -> String {
        let seconds = self.elapsed_seconds();
        format_hms(seconds)
    }
}

/// Formats a second count as zero-padded `HH:MM:SS`.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = total_seconds / 60 - hours * 60;
    let seconds = total_seconds - (total_seconds / 60) * 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}
