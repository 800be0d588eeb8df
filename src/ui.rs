use std::cell::RefCell;
use std::rc::Rc;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::keys::HomeRowKey;
use crate::session::{KeyOutcome, Phase, SessionEvent, SessionObserver, SessionSnapshot};
use crate::util::format_mm_ss;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;
const BODY_LINES: u16 = 12;

pub const TITLE: &str = "Touch Typing Practice";
pub const FINISHED_MESSAGE: &str = "Practice Finished!";

/// What the screen shows, kept current by subscribing to the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub snapshot: SessionSnapshot,
    /// Most recent accepted key and how it scored. The session clears its own
    /// current input as soon as the next key is drawn, so the view remembers it.
    pub last_input: Option<(HomeRowKey, KeyOutcome)>,
}

impl SessionView {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self {
            snapshot,
            last_input: None,
        }
    }

    pub fn apply(&mut self, event: &SessionEvent, snapshot: &SessionSnapshot) {
        if let SessionEvent::KeyAccepted { key, outcome } = event {
            self.last_input = Some((*key, *outcome));
        }
        self.snapshot = *snapshot;
    }
}

/// Shared handle so the app can read the view that the session writes to.
#[derive(Debug, Clone)]
pub struct SharedView(Rc<RefCell<SessionView>>);

impl SharedView {
    pub fn new(snapshot: SessionSnapshot) -> Self {
        Self(Rc::new(RefCell::new(SessionView::new(snapshot))))
    }

    pub fn get(&self) -> SessionView {
        self.0.borrow().clone()
    }
}

impl SessionObserver for SharedView {
    fn on_event(&mut self, event: &SessionEvent, snapshot: &SessionSnapshot) {
        self.0.borrow_mut().apply(event, snapshot);
    }
}

/// The whole drill screen: prompt, counters, timer or finished message, controls.
pub struct DrillScreen<'a> {
    view: &'a SessionView,
    show_example_words: bool,
}

impl<'a> DrillScreen<'a> {
    pub fn new(view: &'a SessionView, show_example_words: bool) -> Self {
        Self {
            view,
            show_example_words,
        }
    }

    fn body(&self) -> Vec<Line<'static>> {
        let snap = &self.view.snapshot;
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let mut lines = vec![Line::from(vec![
            Span::raw("Next Key: "),
            Span::styled(
                snap.next_key.to_string(),
                Style::default()
                    .patch(bold_style)
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ])];

        if self.show_example_words {
            if let Some(word) = snap.next_key.example_word() {
                lines.push(Line::from(vec![
                    Span::raw("Example Word: "),
                    Span::styled(word, italic_style),
                ]));
            }
        }

        let current_input = match self.view.last_input {
            Some((key, KeyOutcome::Correct)) => Span::styled(
                key.to_string(),
                Style::default().patch(bold_style).fg(Color::Green),
            ),
            Some((key, _)) => Span::styled(
                key.to_string(),
                Style::default().patch(bold_style).fg(Color::Red),
            ),
            None => Span::raw(""),
        };
        lines.push(Line::from(vec![Span::raw("Current Input: "), current_input]));

        lines.push(Line::from(format!("Keys Pressed: {}", snap.keys_pressed)));
        lines.push(Line::from(format!("Mistakes: {}", snap.mistakes)));
        lines.push(Line::from(Span::styled(
            format!("Accuracy: {:.2}%", snap.accuracy),
            bold_style,
        )));
        lines.push(Line::from(""));

        match snap.phase {
            Phase::Finished => {
                lines.push(Line::from(Span::styled(
                    FINISHED_MESSAGE,
                    Style::default()
                        .patch(bold_style)
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::ITALIC),
                )));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("(n)ew / (esc)ape", italic_style)));
            }
            Phase::Idle | Phase::Running => {
                lines.push(Line::from(Span::styled(
                    format!("Time Remaining: {}", format_mm_ss(snap.remaining_secs)),
                    bold_style,
                )));
                lines.push(Line::from(""));
                let control = if snap.phase == Phase::Idle {
                    "(enter) start / (esc)ape"
                } else {
                    "(tab) finish / (esc)ape"
                };
                lines.push(Line::from(Span::styled(control, italic_style)));
            }
        }

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            if snap.is_running() {
                "input: type the key shown above"
            } else {
                "input disabled"
            },
            dim_style,
        )));

        lines
    }
}

impl Widget for DrillScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                TITLE,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        block.render(area, buf);

        let padding = inner.height.saturating_sub(BODY_LINES) / 2;
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN.min(inner.width / 4))
            .vertical_margin(VERTICAL_MARGIN.min(padding))
            .constraints([
                Constraint::Length(padding.saturating_sub(VERTICAL_MARGIN)),
                Constraint::Min(1),
            ])
            .split(inner);

        Paragraph::new(self.body())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionConfig, TypingSession};
    use rand::{rngs::StdRng, SeedableRng};

    fn session() -> TypingSession {
        TypingSession::with_rng(SessionConfig::default(), StdRng::seed_from_u64(99))
    }

    fn render_to_string(view: &SessionView, show_example_words: bool) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);

        DrillScreen::new(view, show_example_words).render(area, &mut buffer);

        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn view_with_key(key: HomeRowKey, phase: Phase) -> SessionView {
        let mut view = SessionView::new(session().snapshot());
        view.snapshot.next_key = key;
        view.snapshot.phase = phase;
        view
    }

    #[test]
    fn test_idle_screen() {
        let view = view_with_key(HomeRowKey::A, Phase::Idle);
        let rendered = render_to_string(&view, true);

        assert!(rendered.contains(TITLE));
        assert!(rendered.contains("Next Key: a"));
        assert!(rendered.contains("Example Word: Apple"));
        assert!(rendered.contains("Keys Pressed: 0"));
        assert!(rendered.contains("Mistakes: 0"));
        assert!(rendered.contains("Accuracy: 100.00%"));
        assert!(rendered.contains("Time Remaining: 05:00"));
        assert!(rendered.contains("(enter) start"));
        assert!(rendered.contains("input disabled"));
        assert!(!rendered.contains(FINISHED_MESSAGE));
    }

    #[test]
    fn test_running_screen_offers_finish() {
        let view = view_with_key(HomeRowKey::K, Phase::Running);
        let rendered = render_to_string(&view, true);

        assert!(rendered.contains("Example Word: Kettle"));
        assert!(rendered.contains("(tab) finish"));
        assert!(!rendered.contains("(enter) start"));
        assert!(!rendered.contains("input disabled"));
    }

    #[test]
    fn test_semicolon_has_no_example_word() {
        let view = view_with_key(HomeRowKey::Semicolon, Phase::Running);
        let rendered = render_to_string(&view, true);

        assert!(rendered.contains("Next Key: ;"));
        assert!(!rendered.contains("Example Word"));
    }

    #[test]
    fn test_example_words_can_be_hidden() {
        let view = view_with_key(HomeRowKey::F, Phase::Running);
        let rendered = render_to_string(&view, false);

        assert!(!rendered.contains("Example Word"));
        assert!(!rendered.contains("Fox"));
    }

    #[test]
    fn test_finished_screen_replaces_timer() {
        let mut view = view_with_key(HomeRowKey::D, Phase::Finished);
        view.snapshot.keys_pressed = 2;
        view.snapshot.mistakes = 1;
        view.snapshot.accuracy = 50.0;
        view.snapshot.remaining_secs = 0;
        let rendered = render_to_string(&view, true);

        assert!(rendered.contains(FINISHED_MESSAGE));
        assert!(!rendered.contains("Time Remaining"));
        assert!(rendered.contains("Accuracy: 50.00%"));
        assert!(rendered.contains("(n)ew"));
        assert!(rendered.contains("input disabled"));
    }

    #[test]
    fn test_current_input_shows_last_accepted_key() {
        let mut view = view_with_key(HomeRowKey::J, Phase::Running);
        view.last_input = Some((HomeRowKey::L, KeyOutcome::Incorrect));
        let rendered = render_to_string(&view, true);

        assert!(rendered.contains("Current Input: l"));
    }

    #[test]
    fn test_shared_view_follows_session() {
        let mut session = session();
        let view = SharedView::new(session.snapshot());
        session.subscribe(Box::new(view.clone()));

        session.start();
        let expected = session.next_key();
        session.handle_key_input(expected.as_char());

        let seen = view.get();
        assert_eq!(seen.snapshot, session.snapshot());
        assert_eq!(seen.last_input, Some((expected, KeyOutcome::Correct)));
        assert_eq!(seen.snapshot.keys_pressed, 1);
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let view = view_with_key(HomeRowKey::S, Phase::Running);
        let area = Rect::new(0, 0, 20, 5);
        let mut buffer = Buffer::empty(area);

        DrillScreen::new(&view, true).render(area, &mut buffer);

        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_ui_constants() {
        assert_eq!(HORIZONTAL_MARGIN, 5);
        assert_eq!(VERTICAL_MARGIN, 2);
    }
}
