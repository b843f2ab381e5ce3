use std::io::{self, Write};
use std::sync::Mutex;

/// Moments that deserve an audible cue
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Cue {
    PhaseTransition,
    SessionComplete,
}

/// Fire-and-forget cue player.
///
/// Implementations must swallow every failure; callers never learn whether
/// a cue was actually heard.
pub trait Notifier: Send {
    fn notify(&self, cue: Cue);
}

/// Rings the terminal bell by writing BEL to the wrapped writer
pub struct TerminalBell<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalBell<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    fn ring(&self) -> io::Result<()> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("bell writer poisoned"))?;
        out.write_all(b"\x07")?;
        out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> Notifier for TerminalBell<W> {
    fn notify(&self, cue: Cue) {
        if let Err(err) = self.ring() {
            tracing::debug!(%cue, error = %err, "cue playback failed");
        }
    }
}

/// Used when cues are turned off
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self, cue: Cue) {
        tracing::trace!(%cue, "cue suppressed");
    }
}

/// Keeps every cue it receives, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    cues: std::sync::Arc<Mutex<Vec<Cue>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cues(&self) -> Vec<Cue> {
        match self.cues.lock() {
            Ok(cues) => cues.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, cue: Cue) {
        if let Ok(mut cues) = self.cues.lock() {
            cues.push(cue);
        }
    }
}
