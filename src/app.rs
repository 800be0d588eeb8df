use std::sync::mpsc::Sender;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::config::Config;
use crate::runtime::{AppEvent, CountdownTimer};
use crate::session::{KeyOutcome, TypingSession};
use crate::ui::{SessionView, SharedView};

/// Glue between the event loop, the session and its countdown.
///
/// `countdown` is `Some` exactly while the session is running.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub session: TypingSession,
    view: SharedView,
    countdown: Option<CountdownTimer>,
    countdown_period: Duration,
    /// Bumped for every timer started; ticks from older timers are dropped.
    countdown_generation: u64,
    events_tx: Sender<AppEvent>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, events_tx: Sender<AppEvent>) -> Self {
        let session = TypingSession::new(config.session_config());
        Self::with_session(config, session, events_tx)
    }

    pub fn with_session(
        config: Config,
        session: TypingSession,
        events_tx: Sender<AppEvent>,
    ) -> Self {
        let mut app = Self {
            view: SharedView::new(session.snapshot()),
            config,
            session,
            countdown: None,
            countdown_period: CountdownTimer::PERIOD,
            countdown_generation: 0,
            events_tx,
            should_quit: false,
        };
        app.attach_view();
        app
    }

    /// Shorten the countdown period; seconds still count as one tick each.
    pub fn with_countdown_period(mut self, period: Duration) -> Self {
        self.countdown_period = period;
        self
    }

    pub fn view(&self) -> SessionView {
        self.view.get()
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.as_ref().is_some_and(CountdownTimer::is_active)
    }

    /// Returns whether the screen needs a redraw.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Key(key) => {
                self.handle_key(key);
                true
            }
            AppEvent::Countdown(generation) => self.on_countdown(generation),
            AppEvent::Resize => true,
            AppEvent::Frame => false,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.quit(),
            KeyCode::Esc => self.quit(),
            KeyCode::Enter => self.start(),
            KeyCode::Tab => self.finish(),
            KeyCode::Char('n') if self.session.is_finished() => self.new_session(),
            KeyCode::Char(c) => {
                if self.session.handle_key_input(c) == KeyOutcome::Ignored {
                    debug!(key = ?c, "key ignored");
                }
            }
            _ => {}
        }
    }

    pub fn start(&mut self) {
        if self.session.start() {
            self.countdown_generation += 1;
            self.countdown = Some(CountdownTimer::spawn(
                self.events_tx.clone(),
                self.countdown_period,
                self.countdown_generation,
            ));
        }
    }

    pub fn finish(&mut self) {
        if self.session.finish() {
            self.release_countdown();
        }
    }

    /// Throw the finished session away and prepare a fresh idle one.
    pub fn new_session(&mut self) {
        self.new_session_with(TypingSession::new(self.config.session_config()));
    }

    pub fn new_session_with_rng(&mut self, rng: StdRng) {
        self.new_session_with(TypingSession::with_rng(self.config.session_config(), rng));
    }

    pub fn quit(&mut self) {
        self.release_countdown();
        self.should_quit = true;
        info!("quitting");
    }

    fn new_session_with(&mut self, session: TypingSession) {
        self.release_countdown();
        self.session = session;
        self.view = SharedView::new(self.session.snapshot());
        self.attach_view();
        info!("new practice session");
    }

    /// Returns whether the tick was applied.
    fn on_countdown(&mut self, generation: u64) -> bool {
        // ticks queued before a cancel still arrive, possibly after a new session started
        let current = self.countdown.as_ref().map(CountdownTimer::generation);
        if current != Some(generation) {
            debug!(generation, ?current, "dropping stale countdown tick");
            return false;
        }

        self.session.tick();
        if !self.session.is_running() {
            self.release_countdown();
        }
        true
    }

    fn attach_view(&mut self) {
        self.session.subscribe(Box::new(self.view.clone()));
    }

    fn release_countdown(&mut self) {
        if let Some(mut timer) = self.countdown.take() {
            timer.cancel();
        }
    }
}
