mod ui;

use clap::{builder::RangedU64ValueParser, error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use skilltest::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    runtime::{key_from_event, CrosstermEventSource, FixedTicker, HostEvent, Runner},
    CorpusKind, Metrics, Phase, SessionError, TypingSession,
};
use std::{
    error::Error,
    fs::{self, File},
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

/// The session clock advances once per second.
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// timed typing test with live per-character feedback and wpm/accuracy results
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test: type the words shown, press space to commit each one, and backspace into your last mistake to fix it. Correct words per minute and accuracy are shown when the time runs out."
)]
pub struct Cli {
    /// number of seconds to run the test
    #[clap(short = 's', long, value_parser = clap::value_parser!(u64).range(1..))]
    secs: Option<u64>,

    /// where the words come from
    #[clap(short = 'c', long, value_enum)]
    corpus: Option<CorpusKind>,

    /// maximum number of words fetched per round
    #[clap(short = 'w', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    words: Option<usize>,

    /// embedded word list to sample from
    #[clap(long)]
    word_list: Option<String>,

    /// save the effective settings as the new defaults
    #[clap(long)]
    save: bool,

    /// read and write settings at this path instead of the default location
    #[clap(long)]
    config: Option<PathBuf>,

    /// log file verbosity (off, error, warn, info, debug, trace)
    #[clap(long, default_value = "info")]
    log_level: String,

    /// print the final results as json after leaving the test
    #[clap(long)]
    json: bool,
}

impl Cli {
    /// Layer command line overrides on top of the stored settings
    fn apply(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.duration_secs = secs;
        }
        if let Some(corpus) = self.corpus {
            config.corpus = corpus;
        }
        if let Some(words) = self.words {
            config.max_tokens = words;
        }
        if let Some(ref word_list) = self.word_list {
            config.word_list = word_list.clone();
        }
        config
    }

    fn config_store(&self) -> FileConfigStore {
        self.config
            .as_ref()
            .map(FileConfigStore::with_path)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub session: TypingSession,
    pub last_metrics: Option<Metrics>,
}

impl App {
    pub fn new(config: Config) -> Result<Self, SessionError> {
        let session = TypingSession::new(config.feed()?, config.session_config())?;

        Ok(Self {
            config,
            session,
            last_metrics: None,
        })
    }

    pub fn on_tick(&mut self) {
        // ticks are only forwarded while the clock runs
        if self.session.phase() == Phase::Running {
            self.session.on_tick();
            self.capture_metrics();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Action {
        if key.kind == KeyEventKind::Release {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Esc => return Action::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Action::Quit
            }
            KeyCode::Tab => {
                self.reset();
                return Action::Continue;
            }
            KeyCode::Char('r') if self.session.phase() == Phase::Finished => {
                self.reset();
                return Action::Continue;
            }
            _ => {}
        }

        if let Some(key) = key_from_event(key) {
            self.session.on_key(key);
            self.capture_metrics();
        }
        Action::Continue
    }

    pub fn reset(&mut self) {
        match self.session.reset() {
            Ok(()) => info!("new {}s test", self.session.duration()),
            Err(err) => error!("could not start a new round: {err}"),
        }
    }

    fn capture_metrics(&mut self) {
        if let Some(metrics) = self.session.metrics().ready() {
            self.last_metrics = Some(metrics);
        }
    }
}

fn init_logging(level: &str) {
    let level = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create(&path) {
        let _ = WriteLogger::init(level, log_config, log_file);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(&cli.log_level);

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if cli.save {
        store.save(&config)?;
        info!("saved settings to {}", store.path().display());
    }

    let mut app = App::new(config)?;
    info!(
        "starting {}s test from the {} corpus",
        app.config.duration_secs, app.config.corpus
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    outcome?;

    if cli.json {
        if let Some(metrics) = app.last_metrics {
            println!("{}", serde_json::to_string(&metrics)?);
        }
    }

    Ok(())
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(TICK_INTERVAL));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match runner.step() {
            HostEvent::Tick => app.on_tick(),
            HostEvent::Resize => {}
            HostEvent::Key(key) => {
                let was_idle = app.session.phase() == Phase::Idle;
                if app.on_key(key) == Action::Quit {
                    break;
                }
                // the first second starts with the first keystroke
                if was_idle && app.session.phase() == Phase::Running {
                    runner.resync();
                }
            }
        }
    }

    Ok(())
}
