use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use orate::app::App;
use orate::input::{handle_key, Flow};
use orate::notify::{Cue, RecordingNotifier};
use orate::pools::{ContentPools, SupportedLanguage};
use orate::runtime::{ChannelEventSource, FixedTicker, Runner, SessionEvent};

fn key(c: char) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

fn app(ticker: &FixedTicker, recorder: &RecordingNotifier) -> App {
    App::new(
        ContentPools::builtin(SupportedLanguage::Portuguese).unwrap(),
        Some(99),
        Box::new(recorder.clone()),
        ticker,
    )
}

// Headless integration using the internal runtime + App without a TTY.
// Drives a tiny event loop the way main.rs does.
fn drive(app: &mut App, runner: &Runner<ChannelEventSource>, max_steps: u32) {
    for _ in 0..max_steps {
        match runner.step(app.schedule_mut()) {
            Some(SessionEvent::Tick) => app.on_tick(),
            Some(SessionEvent::Key(key)) => {
                if handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
            Some(SessionEvent::Resize) | None => {}
        }
        if app.session.is_complete() {
            break;
        }
    }
}

#[test]
fn headless_session_runs_to_completion() {
    // Arrange: a very fast clock so 1800 session seconds pass quickly
    let ticker = FixedTicker::new(Duration::from_micros(50));
    let recorder = RecordingNotifier::new();
    let mut app = app(&ticker, &recorder);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx));
    tx.send(key(' ')).unwrap();

    // Act
    drive(&mut app, &runner, 100_000);

    // Assert: finished, stopped, and every cue fired once
    assert!(app.session.is_complete(), "session should have completed");
    assert!(!app.session.is_running);
    assert!(!app.schedule().is_armed());
    assert_eq!(
        recorder.cues(),
        vec![
            Cue::PhaseTransition,
            Cue::PhaseTransition,
            Cue::PhaseTransition,
            Cue::SessionComplete
        ]
    );
    drop(tx);
}

#[test]
fn headless_pause_stops_ticks() {
    let ticker = FixedTicker::new(Duration::from_millis(1));
    let recorder = RecordingNotifier::new();
    let mut app = app(&ticker, &recorder);

    let (tx, rx) = mpsc::channel();
    let runner =
        Runner::new(ChannelEventSource::new(rx)).with_idle_wait(Duration::from_millis(1));

    tx.send(key(' ')).unwrap();
    drive(&mut app, &runner, 20);
    tx.send(key(' ')).unwrap();
    // A due tick may be served before the key is read
    for _ in 0..50 {
        drive(&mut app, &runner, 1);
        if !app.session.is_running {
            break;
        }
    }
    assert!(!app.session.is_running);

    let paused_at = app.session.elapsed_secs;
    drive(&mut app, &runner, 20);
    assert_eq!(app.session.elapsed_secs, paused_at);
}

#[test]
fn headless_skip_to_last_phase_then_quit() {
    let ticker = FixedTicker::per_second();
    let recorder = RecordingNotifier::new();
    let mut app = app(&ticker, &recorder);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(ChannelEventSource::new(rx));
    for c in ['s', 's', 's', 's', 'q'] {
        tx.send(key(c)).unwrap();
    }

    drive(&mut app, &runner, 10);

    // The fourth skip is ignored on the final phase
    assert_eq!(app.session.phase_index, 3);
    assert_eq!(app.session.elapsed_secs, 1500);
    assert_eq!(recorder.cues(), vec![Cue::PhaseTransition; 3]);
}
