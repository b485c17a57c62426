use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use vanish::{
    app::{App, KeyOutcome, SetupForm},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    fade::FadeGranularity,
    logging,
    params::SessionParams,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner},
    session::SessionConfig,
    ui::ui,
};

/// distraction-free writing tui where your words fade away if you stop typing
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Write towards a word count or time goal. Pause longer than the countdown and your text starts to fade; in hardcore mode it is erased once it has faded completely. Run without session arguments to open the setup screen."
)]
pub struct Cli {
    /// goal type: "time" (minutes of writing) or "words"
    #[clap(short = 'g', long)]
    goal_type: Option<String>,

    /// goal value: minutes to write or target word count
    #[clap(short = 'n', long)]
    goal_value: Option<String>,

    /// seconds without typing before the text starts fading
    #[clap(short = 'c', long = "countdown")]
    countdown_duration: Option<String>,

    /// erase the text once it has faded completely
    #[clap(long)]
    hardcore: bool,

    /// session parameters as a query string, e.g. "goalType=words&goalValue=500"
    #[clap(short = 'q', long)]
    query: Option<String>,

    /// fade granularity: coarse (1s ticks, fades to invisible) or fine (100ms ticks, stops at 95%)
    #[clap(short = 'f', long, value_enum)]
    fade: Option<FadeGranularity>,
}

impl Cli {
    /// Session parameters from the query string, overridden by individual flags
    fn to_params(&self) -> SessionParams {
        let base = self
            .query
            .as_deref()
            .map(SessionParams::from_query)
            .unwrap_or_default();
        base.overridden_by(SessionParams {
            goal_type: self.goal_type.clone(),
            goal_value: self.goal_value.clone(),
            countdown_duration: self.countdown_duration.clone(),
            is_hardcore_mode: self.hardcore.then(|| "true".to_string()),
        })
    }

    /// `Ok(None)` when no session parameters were given and setup should open
    fn session_config(&self) -> Result<Option<SessionConfig>, vanish::params::ConfigError> {
        let params = self.to_params();
        if params.is_empty() {
            return Ok(None);
        }
        params.validate().map(Some)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        logging::init(&path);
    }

    // bad parameters never reach the terminal
    let session_config = match cli.session_config() {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(%err, "rejected session parameters");
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::ValueValidation,
                format!("{err}\n\nRun without session arguments to open the setup screen."),
            )
            .exit();
        }
    };

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let store = FileConfigStore::new();
    let prefs = store.load();
    let fade = cli.fade.unwrap_or(prefs.fade);

    let mut app = match session_config {
        Some(config) => App::with_session(config, fade),
        None => App::new(SetupForm::from(&prefs), fade),
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;
    res?;

    if app.started_any {
        if let Err(err) = store.save(&app.preferences()) {
            tracing::warn!(%err, "could not save preferences");
        }
    }

    // hand the writing back so it can be copied
    if let Some(text) = app.final_text() {
        println!("{text}");
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let ticker = FixedTicker::new(app.fade.policy().tick);
    let mut runner = Runner::new(CrosstermEventSource::new(), ticker);
    run_app(terminal, app, &mut runner)
}

/// Event loop: one event at a time, ticks only while a session needs them and
/// a wake-up whenever a toast is due to expire
fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &mut Runner<E, FixedTicker>,
) -> Result<(), Box<dyn Error>> {
    loop {
        runner.set_ticking(app.wants_ticks());
        runner.wake_at(app.next_wake());
        terminal.draw(|f| ui(app, f))?;

        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Wake => app.expire_toasts(),
            AppEvent::Resize => {}
            AppEvent::Closed => break,
            AppEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }
    }

    runner.stop_ticking();
    Ok(())
}
