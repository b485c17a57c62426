pub mod screen;
pub mod setup;
pub mod style;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
    Frame,
};
use std::time::Instant;
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    notify::ToastQueue,
    session::{GoalType, Session, SessionPhase},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const TOAST_WIDTH: u16 = 44;
const CURSOR: &str = "▏";

/// Draw the current screen plus any toasts on top
pub fn ui(app: &App, f: &mut Frame) {
    screen::current_screen(&app.state).render(app, f);
    render_toasts(&app.toasts, Instant::now(), f.area(), f.buffer_mut());
}

/// The writing screen for one session
pub struct EditorView<'a> {
    pub session: &'a Session,
}

impl Widget for EditorView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = self.session;
        let config = session.config();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Min(1),    // text
                Constraint::Length(1), // status
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(1), Constraint::Length(16)])
            .split(chunks[0]);

        let mut stats = vec![
            Span::styled("Words ", dim_style),
            Span::styled(session.word_count().to_string(), bold_style),
            Span::raw("   "),
            Span::styled(format!("{:.0}%", session.progress()), bold_style),
        ];
        if config.hardcore {
            stats.push(Span::raw("   "));
            stats.push(Span::styled("💀 hardcore", Style::default().fg(Color::Red)));
        }
        Paragraph::new(Line::from(stats)).render(header[0], buf);

        if let Some((label, style)) = style::countdown_span(session.countdown_label()) {
            Paragraph::new(Span::styled(label, style))
                .alignment(Alignment::Right)
                .render(header[1], buf);
        }

        render_text(session, chunks[2], buf);

        let status = match session.phase() {
            SessionPhase::Completed => Span::styled(
                "Goal achieved! Your text is safe.",
                Style::default().patch(bold_style).fg(Color::Green),
            ),
            _ => Span::styled(goal_summary(config.goal_type, config.goal_value), dim_style),
        };
        Paragraph::new(status)
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        Paragraph::new(Span::styled("(esc) back / (ctrl+c) quit", italic_style))
            .render(chunks[4], buf);
    }
}

fn goal_summary(goal_type: GoalType, goal_value: u32) -> String {
    match goal_type {
        GoalType::Time => format!("Goal: write for {goal_value} {}", goal_type.unit()),
        GoalType::Words => format!("Goal: {goal_value} {}", goal_type.unit()),
    }
}

fn render_text(session: &Session, area: Rect, buf: &mut Buffer) {
    if let Some(placeholder) = session.placeholder() {
        Paragraph::new(Span::styled(
            placeholder,
            Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
        ))
        .render(area, buf);
        return;
    }

    let text_style = style::faded_text_style(session.opacity());
    let display = session.text().replace('\t', "    ");

    let mut lines: Vec<Line> = display
        .split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), text_style)))
        .collect();
    if let Some(last) = lines.last_mut() {
        last.spans.push(Span::styled(CURSOR, text_style));
    }

    // keep the end of the text, where the cursor is, in view
    let rows = wrapped_rows(&display, area.width);
    let scroll = rows.saturating_sub(area.height as usize) as u16;

    Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .render(area, buf);
}

/// Rows `text` occupies when wrapped at `width` columns, counting the cursor.
/// Character wrapping; word wrapping may need a few more.
pub fn wrapped_rows(text: &str, width: u16) -> usize {
    let width = width.max(1) as usize;
    let mut lines = text.split('\n').peekable();
    let mut rows = 0;
    while let Some(line) = lines.next() {
        let mut w = line.width();
        if lines.peek().is_none() {
            w += CURSOR.width();
        }
        rows += w.div_ceil(width).max(1);
    }
    rows
}

/// Stack toasts in the top-right corner, newest at the bottom
pub fn render_toasts(toasts: &ToastQueue, now: Instant, area: Rect, buf: &mut Buffer) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width - width;
    let mut y = area.y + 1;

    for toast in toasts.visible(now) {
        let n = &toast.notification;
        let color = style::notification_color(n.level);
        let body_rows = wrapped_rows(&n.body, width.saturating_sub(2)) as u16;
        let height = 2 + 1 + if n.body.is_empty() { 0 } else { body_rows };
        if y + height > area.y + area.height {
            break;
        }

        let rect = Rect::new(x, y, width, height);
        Clear.render(rect, buf);

        let mut lines = vec![Line::from(Span::styled(
            n.title.clone(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))];
        if !n.body.is_empty() {
            lines.push(Line::from(n.body.clone()));
        }

        Paragraph::new(Text::from(lines))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            )
            .render(rect, buf);

        y += height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppState, SetupForm};
    use crate::fade::FadeGranularity;
    use crate::notify::{Notification, Notifier, TOAST_TTL};
    use crate::session::SessionConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn editor_app(hardcore: bool) -> App {
        App::with_session(
            SessionConfig {
                goal_type: GoalType::Words,
                goal_value: 4,
                countdown_duration: 3,
                hardcore,
            },
            FadeGranularity::Coarse,
        )
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn draw(app: &App) -> Terminal<TestBackend> {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(app, f)).unwrap();
        terminal
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows("", 10), 1);
        assert_eq!(wrapped_rows("abc", 10), 1);
        // 9 chars + cursor fills exactly one row
        assert_eq!(wrapped_rows("abcdefghi", 10), 1);
        assert_eq!(wrapped_rows("abcdefghij", 10), 2);
        assert_eq!(wrapped_rows("a\n\nb", 10), 3);
        assert_eq!(wrapped_rows("abc", 0), 4);
    }

    #[test]
    fn test_goal_summary() {
        assert_eq!(goal_summary(GoalType::Words, 500), "Goal: 500 words");
        assert_eq!(goal_summary(GoalType::Time, 15), "Goal: write for 15 minutes");
    }

    #[test]
    fn test_idle_editor_shows_placeholder() {
        let app = editor_app(false);
        let content = buffer_text(&draw(&app));
        assert!(content.contains("Start writing..."));
        assert!(content.contains("Words"));
        assert!(content.contains("0%"));
    }

    #[test]
    fn test_editor_shows_word_count_progress_and_countdown() {
        let mut app = editor_app(false);
        type_str(&mut app, "one two");
        app.on_tick();
        let terminal = draw(&app);
        let content = buffer_text(&terminal);
        assert!(content.contains("one two"));
        assert!(content.contains("50%"));
        assert!(content.contains("Goal: 4 words"));

        // countdown sits right-aligned on the header row
        let header: String = (0..80u16)
            .map(|x| terminal.backend().buffer()[(x, 1u16)].symbol().to_string())
            .collect();
        assert_eq!(header.trim_end().chars().last(), Some('2'));
    }

    #[test]
    fn test_editor_shows_fading_indicator() {
        let mut app = editor_app(true);
        type_str(&mut app, "a");
        for _ in 0..4 {
            app.on_tick();
        }
        let content = buffer_text(&draw(&app));
        assert!(content.contains("Fading"));
        assert!(content.contains("hardcore"));
    }

    #[test]
    fn test_completed_editor_shows_banner_and_toast() {
        let mut app = editor_app(false);
        type_str(&mut app, "one two three four");
        app.on_tick();
        let content = buffer_text(&draw(&app));
        assert!(content.contains("Goal achieved! Your text is safe."));
        assert!(content.contains("Goal achieved!"));
        assert!(content.contains("100%"));
    }

    #[test]
    fn test_faded_text_is_drawn_dark() {
        let mut app = editor_app(false);
        type_str(&mut app, "x");
        for _ in 0..(3 + 10) {
            app.on_tick();
        }
        let terminal = draw(&app);
        let buf = terminal.backend().buffer();
        let cell = buf
            .content
            .iter()
            .find(|c| c.symbol() == "x")
            .expect("text cell");
        assert_eq!(cell.fg, Color::Rgb(0, 0, 0));
    }

    #[test]
    fn test_setup_screen_renders() {
        let app = App::new(SetupForm::default(), FadeGranularity::Coarse);
        assert_eq!(app.state, AppState::Setup);
        let content = buffer_text(&draw(&app));
        assert!(content.contains("Time-based"));
        assert!(content.contains("Minutes to write"));
        assert!(content.contains("10 seconds"));
        assert!(content.contains("Hardcore Mode"));
        assert!(content.contains("Start Writing"));
    }

    #[test]
    fn test_toasts_render_on_top() {
        let mut app = App::new(SetupForm::default(), FadeGranularity::Coarse);
        app.toasts.notify(Notification::text_erased());
        let content = buffer_text(&draw(&app));
        assert!(content.contains("Text faded away!"));
    }

    #[test]
    fn test_expired_toasts_are_not_drawn() {
        let mut app = App::new(SetupForm::default(), FadeGranularity::Coarse);
        let shown_at = Instant::now() - TOAST_TTL - Duration::from_secs(1);
        app.toasts.push_at(Notification::text_erased(), shown_at);
        app.toasts.notify(Notification::goal_achieved());

        let content = buffer_text(&draw(&app));
        assert!(!content.contains("Text faded away!"));
        assert!(content.contains("Goal achieved!"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = editor_app(true);
        type_str(&mut app, "some words that will need wrapping in a narrow area");
        app.toasts.notify(Notification::goal_achieved());
        let backend = TestBackend::new(12, 4);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| ui(&app, f)).unwrap();
    }
}
