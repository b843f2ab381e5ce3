use crate::phase::{self, LAST_PHASE, PHASES, TOTAL_DURATION_SECS};

/// Clock state of a single practice session.
///
/// The value is never mutated in place: every change goes through
/// [`reduce`], which returns the next state plus the events it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionState {
    pub elapsed_secs: u32,
    pub is_running: bool,
    pub phase_index: usize,
}

/// Inputs accepted by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Tick,
    Start,
    Pause,
    StartPause,
    Reset,
    Skip,
}

/// Signals emitted by a transition, interpreted by whoever owns the state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    PhaseChanged { from: usize, to: usize },
    SessionComplete,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Status {
    Idle,
    Running,
    Paused,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    pub events: Vec<ClockEvent>,
}

impl Transition {
    fn unchanged(state: SessionState) -> Self {
        Self {
            state,
            events: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_secs >= TOTAL_DURATION_SECS
    }

    /// Whether the periodic trigger should be scheduled for this state
    pub fn wants_ticks(&self) -> bool {
        self.is_running && !self.is_complete()
    }

    pub fn is_last_phase(&self) -> bool {
        self.phase_index >= LAST_PHASE
    }

    pub fn can_skip(&self) -> bool {
        !self.is_last_phase()
    }

    pub fn status(&self) -> Status {
        if self.is_complete() {
            Status::Complete
        } else if self.is_running {
            Status::Running
        } else if self.elapsed_secs == 0 {
            Status::Idle
        } else {
            Status::Paused
        }
    }

    pub fn phase(&self) -> &'static phase::PhaseDefinition {
        &PHASES[self.phase_index.min(LAST_PHASE)]
    }

    /// Progress through the active phase, 0 to 100.
    pub fn phase_progress_percent(&self) -> f64 {
        let start = phase::phase_start(self.phase_index);
        let duration = self.phase().duration_secs;
        let into_phase = self.elapsed_secs.saturating_sub(start);
        (100.0 * into_phase as f64 / duration as f64).clamp(0.0, 100.0)
    }

    /// Progress through the whole session, 0 to 100.
    pub fn overall_progress_percent(&self) -> f64 {
        (100.0 * self.elapsed_secs as f64 / TOTAL_DURATION_SECS as f64).clamp(0.0, 100.0)
    }

    pub fn remaining_secs(&self) -> u32 {
        TOTAL_DURATION_SECS.saturating_sub(self.elapsed_secs)
    }
}

/// Apply `action` to `state`.
pub fn reduce(state: SessionState, action: Action) -> Transition {
    match action {
        Action::Tick => tick(state),
        Action::Start => Transition::unchanged(SessionState {
            is_running: true,
            ..state
        }),
        Action::Pause => Transition::unchanged(SessionState {
            is_running: false,
            ..state
        }),
        Action::StartPause => Transition::unchanged(SessionState {
            is_running: !state.is_running,
            ..state
        }),
        Action::Reset => Transition {
            state: SessionState::default(),
            events: vec![ClockEvent::Reset],
        },
        Action::Skip => skip(state),
    }
}

fn tick(state: SessionState) -> Transition {
    if !state.wants_ticks() {
        return Transition::unchanged(state);
    }

    let elapsed_secs = state.elapsed_secs + 1;
    // Phases only move forward; a skip may already point past the derived index.
    let phase_index = phase::phase_index_at(elapsed_secs).max(state.phase_index);
    let mut events = Vec::new();

    if phase_index != state.phase_index {
        events.push(ClockEvent::PhaseChanged {
            from: state.phase_index,
            to: phase_index,
        });
    }

    let mut is_running = state.is_running;
    if elapsed_secs >= TOTAL_DURATION_SECS {
        is_running = false;
        events.push(ClockEvent::SessionComplete);
    }

    Transition {
        state: SessionState {
            elapsed_secs,
            is_running,
            phase_index,
        },
        events,
    }
}

fn skip(state: SessionState) -> Transition {
    if !state.can_skip() {
        return Transition::unchanged(state);
    }

    let to = state.phase_index + 1;
    Transition {
        state: SessionState {
            elapsed_secs: phase::phase_end(state.phase_index),
            phase_index: to,
            ..state
        },
        events: vec![ClockEvent::PhaseChanged {
            from: state.phase_index,
            to,
        }],
    }
}
