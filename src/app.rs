use std::time::Instant;

use crate::config::Settings;
use crate::error::PoolError;
use crate::notes::{NotesSurface, TextBuffer};
use crate::notify::{Cue, Notifier, SilentNotifier, TerminalBell};
use crate::phase::PhaseKind;
use crate::pools::ContentPools;
use crate::prompt::{PromptSelector, PromptState};
use crate::runtime::{FixedTicker, TickSchedule, Ticker};
use crate::session::{self, Action, ClockEvent, SessionState};

/// User intents: the only way the presentation layer changes the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    StartPause,
    Reset,
    Skip,
    ChangeWord,
    ChangeTheme,
}

/// Which part of the screen receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Controls,
    Associations,
    Notes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Session,
    Help,
}

pub struct App {
    pub session: SessionState,
    pub prompts: PromptState,
    /// Free associations typed during the warm-up; cleared on reset
    pub associations: TextBuffer,
    pub notes: NotesSurface,
    pub focus: Focus,
    pub view: View,
    pools: ContentPools,
    selector: PromptSelector,
    notifier: Box<dyn Notifier>,
    schedule: TickSchedule,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("session", &self.session)
            .field("prompts", &self.prompts)
            .field("focus", &self.focus)
            .field("view", &self.view)
            .field("schedule", &self.schedule)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new<T: Ticker>(
        pools: ContentPools,
        seed: Option<u64>,
        notifier: Box<dyn Notifier>,
        ticker: &T,
    ) -> Self {
        let mut selector = PromptSelector::new(seed);
        let prompts = PromptState::draw(&pools, &mut selector);
        tracing::info!(pools = %pools.name, "session created");

        Self {
            session: SessionState::new(),
            prompts,
            associations: TextBuffer::new(),
            notes: NotesSurface::acquire(),
            focus: Focus::Controls,
            view: View::Session,
            pools,
            selector,
            notifier,
            schedule: TickSchedule::new(ticker),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, PoolError> {
        let pools = settings.load_pools()?;
        let notifier: Box<dyn Notifier> = if settings.bell {
            Box::new(TerminalBell::stdout())
        } else {
            Box::new(SilentNotifier)
        };
        Ok(Self::new(
            pools,
            settings.seed,
            notifier,
            &FixedTicker::per_second(),
        ))
    }

    pub fn pools(&self) -> &ContentPools {
        &self.pools
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut TickSchedule {
        &mut self.schedule
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.session.phase().kind
    }

    pub fn dispatch(&mut self, intent: Intent) {
        self.dispatch_at(intent, Instant::now());
    }

    pub fn dispatch_at(&mut self, intent: Intent, now: Instant) {
        tracing::debug!(?intent, "intent");
        match intent {
            Intent::StartPause => self.apply(Action::StartPause, now),
            Intent::Reset => self.apply(Action::Reset, now),
            Intent::Skip => self.apply(Action::Skip, now),
            Intent::ChangeWord => self.prompts.change_word(&self.pools, &mut self.selector),
            Intent::ChangeTheme => self
                .prompts
                .change_expression_theme(&self.pools, &mut self.selector),
        }
    }

    /// Advance the clock by one second
    pub fn on_tick(&mut self) {
        self.apply(Action::Tick, Instant::now());
    }

    fn apply(&mut self, action: Action, now: Instant) {
        let before = self.session;
        let transition = session::reduce(before, action);
        self.session = transition.state;

        for event in transition.events {
            self.on_clock_event(event);
        }

        let after = self.session;
        match (after.wants_ticks(), action) {
            (false, _) => self.schedule.cancel(),
            (true, Action::Tick) => {}
            (true, _) if after.elapsed_secs != before.elapsed_secs || !before.wants_ticks() => {
                self.schedule.arm(now)
            }
            (true, _) => self.schedule.sync(true, now),
        }
    }

    fn on_clock_event(&mut self, event: ClockEvent) {
        match event {
            ClockEvent::PhaseChanged { from, to } => {
                tracing::info!(from, to, elapsed = self.session.elapsed_secs, "phase changed");
                if self.focus == Focus::Associations && self.phase_kind() != PhaseKind::WarmUp {
                    self.focus = Focus::Controls;
                }
                self.notifier.notify(Cue::PhaseTransition);
            }
            ClockEvent::SessionComplete => {
                tracing::info!("session complete");
                self.notifier.notify(Cue::SessionComplete);
            }
            ClockEvent::Reset => {
                tracing::info!("session reset");
                self.prompts = PromptState::draw(&self.pools, &mut self.selector);
                self.associations.clear();
                if self.focus == Focus::Associations {
                    self.focus = Focus::Controls;
                }
            }
        }
    }

    /// Focus the associations input; only available during the warm-up.
    pub fn focus_associations(&mut self) -> bool {
        if self.phase_kind() == PhaseKind::WarmUp {
            self.focus = Focus::Associations;
            true
        } else {
            false
        }
    }

    pub fn focus_notes(&mut self) {
        self.focus = Focus::Notes;
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Controls if self.phase_kind() == PhaseKind::WarmUp => Focus::Associations,
            Focus::Controls | Focus::Associations => Focus::Notes,
            Focus::Notes => Focus::Controls,
        };
    }

    /// Buffer receiving keystrokes for the current focus
    pub fn focused_buffer_mut(&mut self) -> Option<&mut TextBuffer> {
        match self.focus {
            Focus::Controls => None,
            Focus::Associations => Some(&mut self.associations),
            Focus::Notes => Some(self.notes.buffer_mut()),
        }
    }

    pub fn toggle_help(&mut self) {
        self.view = match self.view {
            View::Session => View::Help,
            View::Help => View::Session,
        };
    }
}
