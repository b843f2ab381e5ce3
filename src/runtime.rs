use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent};

/// How long the runner waits for input when no tick is scheduled
pub const IDLE_WAIT: Duration = Duration::from_millis(500);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum SessionEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait SessionEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError>;
}

/// Event source backed by a channel.
///
/// Production feeds it from a crossterm reader thread; tests hold the
/// sending half and script the input themselves.
pub struct ChannelEventSource {
    rx: Receiver<SessionEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<SessionEvent>) -> Self {
        Self { rx }
    }

    /// Spawn a thread forwarding terminal keys and resizes into the channel
    pub fn crossterm() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let event = match event::read() {
                Ok(CtEvent::Key(key)) => SessionEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => SessionEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::warn!(error = %err, "terminal input reader stopped");
                    break;
                }
            };
            if tx.send(event).is_err() {
                break;
            }
        });

        Self::new(rx)
    }
}

impl SessionEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<SessionEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// One tick per second of session time
    pub fn per_second() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Cancellable repeating deadline driving the session clock.
///
/// At most one deadline exists at a time; arming replaces it and firing
/// moves it exactly one interval forward.
#[derive(Debug, Clone)]
pub struct TickSchedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl TickSchedule {
    pub fn new<T: Ticker>(ticker: &T) -> Self {
        Self {
            interval: ticker.interval(),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedule the next tick one interval after `now`, dropping any pending one
    pub fn arm(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Arm if `wanted` and idle, cancel if not wanted; a pending deadline is kept.
    pub fn sync(&mut self, wanted: bool, now: Instant) {
        match (wanted, self.is_armed()) {
            (true, false) => self.arm(now),
            (false, true) => self.cancel(),
            _ => {}
        }
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|due| due.saturating_duration_since(now))
    }

    /// Returns true and schedules the following tick if the deadline has passed.
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(due + self.interval);
                true
            }
            _ => false,
        }
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: SessionEventSource> {
    event_source: E,
    idle_wait: Duration,
}

impl<E: SessionEventSource> Runner<E> {
    pub fn new(event_source: E) -> Self {
        Self {
            event_source,
            idle_wait: IDLE_WAIT,
        }
    }

    pub fn with_idle_wait(mut self, idle_wait: Duration) -> Self {
        self.idle_wait = idle_wait;
        self
    }

    /// Blocks until the next input event or scheduled tick.
    ///
    /// Returns `None` when the wait ended with nothing to do, so the caller
    /// can re-check its own state before stepping again.
    pub fn step(&self, schedule: &mut TickSchedule) -> Option<SessionEvent> {
        let now = Instant::now();
        if schedule.fire_if_due(now) {
            return Some(SessionEvent::Tick);
        }

        let wait = schedule.time_until_due(now).unwrap_or(self.idle_wait);
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => schedule
                .fire_if_due(Instant::now())
                .then_some(SessionEvent::Tick),
            Err(RecvTimeoutError::Disconnected) => {
                // No more input will arrive; keep ticking on schedule.
                std::thread::sleep(wait);
                schedule
                    .fire_if_due(Instant::now())
                    .then_some(SessionEvent::Tick)
            }
        }
    }
}
