use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use orate::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, Overrides, Settings},
    input::{handle_key, Flow},
    pools::SupportedLanguage,
    runtime::{ChannelEventSource, Runner, SessionEvent, SessionEventSource},
    ui,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin, Stdout},
    path::PathBuf,
    sync::Mutex,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// guided four-phase expression practice timer
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A 30 minute guided practice session in four timed phases: a word association warm-up, active reading, rapid speaking and quick writing, with a notes pad alongside."
)]
pub struct Cli {
    /// language of the built-in words and themes
    #[clap(short = 'l', long, value_enum)]
    language: Option<SupportedLanguage>,

    /// JSON file with custom words, reading themes and speaking themes
    #[clap(short = 'p', long)]
    pools: Option<PathBuf>,

    /// seed for reproducible prompt draws
    #[clap(long)]
    seed: Option<u64>,

    /// do not ring the terminal bell on phase changes
    #[clap(short = 'q', long)]
    quiet: bool,

    /// write the effective settings to the config file before starting
    #[clap(long)]
    save_config: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            language: self.language,
            pools_path: self.pools.clone(),
            quiet: self.quiet,
            seed: self.seed,
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let store = FileConfigStore::new();
    let settings = Settings::resolve(&store.load(), &cli.overrides());
    if cli.save_config {
        store.save(&Config::from(&settings))?;
        tracing::info!(path = %store.path().display(), "config saved");
    }

    let mut app = App::from_settings(&settings)?;

    let mut guard = TerminalGuard::enter()?;
    let runner = Runner::new(ChannelEventSource::crossterm());
    run(&mut guard.terminal, &mut app, &runner)?;

    Ok(())
}

/// Owns the alternate screen; restores the terminal on every exit path.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err);
        }
        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(err)
            }
        }
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn run<B: Backend, E: SessionEventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let Some(event) = runner.step(app.schedule_mut()) else {
            continue;
        };

        match event {
            SessionEvent::Tick => app.on_tick(),
            SessionEvent::Resize => {}
            SessionEvent::Key(key) => {
                if handle_key(app, key) == Flow::Quit {
                    break;
                }
            }
        }

        terminal.draw(|f| ui::draw(app, f))?;
    }

    tracing::info!(elapsed = app.session.elapsed_secs, "session closed");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Some((log_path, file)) = open_log_file() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();
        tracing::info!(path = %log_path.display(), "logging initialized");
        return;
    }

    // Without a log file, prefer no logs over corrupting the TUI via stderr
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> Option<(PathBuf, fs::File)> {
    let path = AppDirs::log_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok()?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .ok()?;
    Some((path, file))
}
