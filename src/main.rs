use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    cursor::Show,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, LevelFilter};
use melo::{
    app::App,
    app_dirs::AppDirs,
    catalog::Catalog,
    config::{ConfigStore, FileConfigStore, Overrides, RuntimeSettings},
    error::StartupError,
    logging,
    lyrics::{GeniusClient, LyricsFetcher},
    runtime::{AppEventSource, CrosstermEventSource, FixedTicker, Runner, Ticker},
    ui::screen::draw,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin, Stdout},
    sync::Arc,
    thread,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// guess the song from a snippet of its lyrics
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal quiz: pick an artist and album, read a few lines of lyrics fetched from Genius, and guess the song. Correct guesses build your score and streak."
)]
pub struct Cli {
    /// Genius API access token (falls back to "genius_token" in the config file)
    #[clap(long, env = "GENIUS_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// preselect an artist on the menu
    #[clap(short = 'a', long)]
    artist: Option<String>,

    /// milliseconds a revealed title stays up before the next song [default: 2000]
    #[clap(long)]
    reveal_delay_ms: Option<u64>,

    /// lyrics request timeout in seconds [default: 12]
    #[clap(long)]
    timeout_secs: Option<u64>,

    /// log level for the log file (off, error, warn, info, debug, trace)
    #[clap(long, default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            reveal_delay_ms: self.reveal_delay_ms,
            request_timeout_secs: self.timeout_secs,
        }
    }
}

fn load_settings(cli: &Cli) -> Result<(RuntimeSettings, Catalog), StartupError> {
    let store = FileConfigStore::new();
    let settings = RuntimeSettings::resolve(store.load(), cli.overrides(), store.path())?;
    let catalog = Catalog::embedded()?;
    Ok((settings, catalog))
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, Show)
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, StartupError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(cli.log_level, AppDirs::log_path().as_deref());

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let (settings, catalog) = match load_settings(&cli) {
        Ok(loaded) => loaded,
        Err(err @ StartupError::MissingToken(_)) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::MissingRequiredArgument, err).exit();
        }
        Err(err) => return Err(err.into()),
    };
    info!(
        "Starting with {} artists, reveal delay {:?}",
        catalog.artist_names().count(),
        settings.reveal_delay
    );

    // a panic on the UI thread must not leave the shell in raw mode
    logging::chain_panic_hook(|| {
        if thread::current().name() == Some("main") {
            let _ = restore_terminal();
        }
    });
    let mut terminal = setup_terminal()?;

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let source = Arc::new(GeniusClient::new(
        settings.token.clone(),
        settings.request_timeout,
    ));
    let fetcher = LyricsFetcher::new(source, runner.sender());

    let mut app = App::new(catalog, settings.session_config(), fetcher);
    if let Some(artist) = &cli.artist {
        app.preselect_artist(artist);
    }

    let result = start_tui(&mut terminal, &mut app, &runner);

    restore_terminal()?;

    result
}

fn start_tui<B: Backend, E: AppEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| draw(app, f))?;

    while !app.should_quit {
        if app.handle_event(runner.step()) {
            terminal.draw(|f| draw(app, f))?;
        }
    }

    info!("Quitting");
    Ok(())
}
