use std::fmt;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::keys::HomeRowKey;
use crate::util::accuracy_percent;

pub const DEFAULT_SESSION_SECS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub duration_secs: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: DEFAULT_SESSION_SECS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Correct,
    Incorrect,
    /// Not a home-row key, or the session is not running.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Countdown,
    Manual,
}

/// Everything a view needs to draw one frame of the drill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSnapshot {
    pub next_key: HomeRowKey,
    pub current_input: Option<HomeRowKey>,
    /// All accepted attempts, wrong ones included.
    pub keys_pressed: u32,
    pub mistakes: u32,
    pub accuracy: f64,
    pub remaining_secs: u32,
    pub phase: Phase,
}

impl SessionSnapshot {
    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn correct(&self) -> u32 {
        self.keys_pressed.saturating_sub(self.mistakes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    Started,
    KeyAccepted { key: HomeRowKey, outcome: KeyOutcome },
    NextKey(HomeRowKey),
    Ticked { remaining: u32 },
    Finished { reason: FinishReason },
}

/// Receives every state change of a [`TypingSession`], after it has been applied.
pub trait SessionObserver {
    fn on_event(&mut self, event: &SessionEvent, snapshot: &SessionSnapshot);
}

impl<F> SessionObserver for F
where
    F: FnMut(&SessionEvent, &SessionSnapshot),
{
    fn on_event(&mut self, event: &SessionEvent, snapshot: &SessionSnapshot) {
        self(event, snapshot)
    }
}

/// One practice run: Idle until started, Running while the countdown lasts, then Finished for good.
pub struct TypingSession {
    state: SessionSnapshot,
    rng: StdRng,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl fmt::Debug for TypingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingSession")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl TypingSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    pub fn with_rng(config: SessionConfig, mut rng: StdRng) -> Self {
        let next_key = HomeRowKey::random(&mut rng);
        Self {
            state: SessionSnapshot {
                next_key,
                current_input: None,
                keys_pressed: 0,
                mistakes: 0,
                accuracy: accuracy_percent(0, 0),
                remaining_secs: config.duration_secs,
                phase: Phase::Idle,
            },
            rng,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn next_key(&self) -> HomeRowKey {
        self.state.next_key
    }

    pub fn current_input(&self) -> Option<HomeRowKey> {
        self.state.current_input
    }

    pub fn keys_pressed(&self) -> u32 {
        self.state.keys_pressed
    }

    pub fn mistakes(&self) -> u32 {
        self.state.mistakes
    }

    pub fn accuracy(&self) -> f64 {
        self.state.accuracy
    }

    pub fn remaining_secs(&self) -> u32 {
        self.state.remaining_secs
    }

    /// Idle -> Running. Returns whether the session is now running and needs a countdown.
    ///
    /// Changes nothing from any other phase. A session with no time left goes straight
    /// through to Finished, the same as a countdown that just reached zero.
    pub fn start(&mut self) -> bool {
        if self.state.phase != Phase::Idle {
            return false;
        }

        self.state.phase = Phase::Running;
        info!(
            remaining_secs = self.state.remaining_secs,
            "practice session started"
        );
        self.emit(SessionEvent::Started);

        if self.state.remaining_secs == 0 {
            self.finish_with(FinishReason::Countdown);
            return false;
        }
        true
    }

    /// Running -> Finished on the user's request. Returns false from any other phase.
    pub fn finish(&mut self) -> bool {
        self.finish_with(FinishReason::Manual)
    }

    /// Draw a new prompt and clear the current input. Does nothing once finished.
    pub fn generate_next_key(&mut self) {
        if self.is_finished() {
            return;
        }
        self.state.next_key = HomeRowKey::random(&mut self.rng);
        self.state.current_input = None;
        self.emit(SessionEvent::NextKey(self.state.next_key));
    }

    pub fn handle_key_input(&mut self, c: char) -> KeyOutcome {
        if !self.is_running() {
            return KeyOutcome::Ignored;
        }
        let Some(key) = HomeRowKey::from_char(c) else {
            return KeyOutcome::Ignored;
        };

        let outcome = if key == self.state.next_key {
            KeyOutcome::Correct
        } else {
            KeyOutcome::Incorrect
        };

        self.state.current_input = Some(key);
        self.state.keys_pressed += 1;
        if outcome == KeyOutcome::Incorrect {
            self.state.mistakes += 1;
        }
        self.compute_accuracy();

        debug!(
            expected = %self.state.next_key,
            pressed = %key,
            ?outcome,
            keys_pressed = self.state.keys_pressed,
            mistakes = self.state.mistakes,
            "key accepted"
        );
        self.emit(SessionEvent::KeyAccepted { key, outcome });

        self.generate_next_key();
        outcome
    }

    /// One second of countdown. Only counts while running; reaching zero finishes the session.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }

        self.state.remaining_secs = self.state.remaining_secs.saturating_sub(1);
        debug!(remaining_secs = self.state.remaining_secs, "tick");
        self.emit(SessionEvent::Ticked {
            remaining: self.state.remaining_secs,
        });

        if self.state.remaining_secs == 0 {
            self.finish_with(FinishReason::Countdown);
        }
    }

    pub fn compute_accuracy(&mut self) -> f64 {
        self.state.accuracy = accuracy_percent(self.state.keys_pressed, self.state.mistakes);
        self.state.accuracy
    }

    fn finish_with(&mut self, reason: FinishReason) -> bool {
        if self.state.phase != Phase::Running {
            return false;
        }

        self.state.phase = Phase::Finished;
        info!(
            ?reason,
            keys_pressed = self.state.keys_pressed,
            mistakes = self.state.mistakes,
            accuracy = self.state.accuracy,
            "practice session finished"
        );
        self.emit(SessionEvent::Finished { reason });
        true
    }

    fn emit(&mut self, event: SessionEvent) {
        let snapshot = self.state;
        for observer in self.observers.iter_mut() {
            observer.on_event(&event, &snapshot);
        }
    }
}
