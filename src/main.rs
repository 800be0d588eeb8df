use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use homerow::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Ticker},
    ui::DrillScreen,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use tracing::{info, warn};

const FRAME_RATE_MS: u64 = 100;

/// home-row touch typing drill for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Practice the eight home-row keys (a s d f j k l ;) one prompt at a time against a countdown, and see how accurate you are."
)]
pub struct Cli {
    /// length of the practice session in seconds (default from config, 300 if unset)
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    secs: Option<u32>,

    /// hide the mnemonic example word under each prompt
    #[clap(long)]
    no_examples: bool,

    /// write the effective settings back to the config file
    #[clap(long)]
    save: bool,

    /// log filter, overridden by RUST_LOG
    #[clap(long, default_value = logging::DEFAULT_LEVEL)]
    log_level: String,
}

impl Cli {
    /// Command line flags win over the stored config.
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(secs) = self.secs {
            config.session_secs = secs;
        }
        if self.no_examples {
            config.show_example_words = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    // keep going without logs rather than refuse to start
    let log_path = AppDirs::log_path();
    let logging_enabled = match logging::init_file_logging(&log_path, &cli.log_level) {
        Ok(()) => true,
        Err(err) => {
            eprintln!("logging disabled: {}: {err}", log_path.display());
            false
        }
    };

    let store = FileConfigStore::new();
    let config = cli.apply_to(store.load());
    if cli.save {
        if let Err(err) = store.save(&config) {
            warn!(%err, path = %store.path().display(), "could not save config");
        }
    }
    info!(?config, logging_enabled, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let mut app = App::new(config, events.sender());
    let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(FRAME_RATE_MS)));
    let result = start_tui(&mut terminal, &mut app, &runner);

    // releases the countdown if the loop bailed out early
    drop(app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend, E: EventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    terminal.draw(|f| ui(app, f))?;

    while !app.should_quit {
        let event: AppEvent = runner.step();
        if app.handle_event(event) && !app.should_quit {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    let view = app.view();
    f.render_widget(
        DrillScreen::new(&view, app.config.show_example_words),
        f.area(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use homerow::runtime::TestEventSource;
    use homerow::session::{SessionConfig, TypingSession};
    use rand::{rngs::StdRng, SeedableRng};
    use ratatui::backend::TestBackend;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["homerow"]);

        assert_eq!(cli.secs, None);
        assert!(!cli.no_examples);
        assert!(!cli.save);
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_cli_secs() {
        let cli = Cli::parse_from(["homerow", "-s", "60"]);
        assert_eq!(cli.secs, Some(60));

        let cli = Cli::parse_from(["homerow", "--secs", "120"]);
        assert_eq!(cli.secs, Some(120));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["homerow", "--no-examples", "--save", "--log-level", "debug"]);
        assert!(cli.no_examples);
        assert!(cli.save);
        assert_eq!(cli.log_level, "debug");
    }

    #[test]
    fn test_cli_rejects_negative_secs() {
        assert!(Cli::try_parse_from(["homerow", "-s", "-5"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_secs() {
        assert!(Cli::try_parse_from(["homerow", "-s", "0"]).is_err());
        assert!(Cli::try_parse_from(["homerow", "--secs", "0"]).is_err());
        assert_eq!(Cli::parse_from(["homerow", "-s", "1"]).secs, Some(1));
    }

    #[test]
    fn test_cli_overrides_config() {
        let stored = Config {
            session_secs: 90,
            show_example_words: true,
        };

        let cli = Cli::parse_from(["homerow"]);
        assert_eq!(cli.apply_to(stored.clone()), stored);

        let cli = Cli::parse_from(["homerow", "-s", "30", "--no-examples"]);
        let effective = cli.apply_to(stored);
        assert_eq!(effective.session_secs, 30);
        assert!(!effective.show_example_words);
    }

    #[test]
    fn test_ui_function_idle_state() {
        let (tx, _rx) = std::sync::mpsc::channel();
        let app = App::new(Config::default(), tx);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        terminal.draw(|f| ui(&app, f)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Touch Typing Practice"));
        assert!(text.contains("Time Remaining: 05:00"));
    }

    #[test]
    fn test_start_tui_runs_until_quit() {
        let events = TestEventSource::new();
        let tx = events.sender();
        let session =
            TypingSession::with_rng(SessionConfig::default(), StdRng::seed_from_u64(3));
        let expected = session.next_key();
        let mut app = App::with_session(Config::default(), session, events.sender());
        let runner = Runner::new(events, FixedTicker::new(Duration::from_millis(5)));
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        for code in [
            KeyCode::Enter,
            KeyCode::Char(expected.as_char()),
            KeyCode::Tab,
            KeyCode::Esc,
        ] {
            tx.send(AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
                .unwrap();
        }

        start_tui(&mut terminal, &mut app, &runner).unwrap();

        assert!(app.should_quit);
        assert!(app.session.is_finished());
        assert_eq!(app.session.keys_pressed(), 1);
        assert_eq!(app.session.mistakes(), 0);

        let text = buffer_text(&terminal);
        assert!(text.contains("Practice Finished!"));
        assert!(text.contains("Accuracy: 100.00%"));
    }

    #[test]
    fn test_frame_rate_constant() {
        assert_eq!(FRAME_RATE_MS, 100);
    }
}
