use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::{SetupField, SetupForm};
use crate::fade::FadeGranularity;
use crate::session::GoalType;

const FORM_WIDTH: u16 = 60;
const FORM_HEIGHT: u16 = 16;

/// The session configuration form
pub struct SetupView<'a> {
    pub form: &'a SetupForm,
    pub fade: FadeGranularity,
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for SetupView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let form = self.form;
        let rect = centered(area, FORM_WIDTH, FORM_HEIGHT);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" vanish ")
            .title_alignment(Alignment::Center);
        let inner = block.inner(rect);
        block.render(rect, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(2)
            .constraints([
                Constraint::Length(1), // goal type tabs
                Constraint::Length(1),
                Constraint::Length(1), // goal value label
                Constraint::Length(1), // goal value input
                Constraint::Length(1),
                Constraint::Length(1), // countdown label
                Constraint::Length(1), // countdown choice
                Constraint::Length(1),
                Constraint::Length(1), // hardcore
                Constraint::Length(1), // hardcore hint
                Constraint::Length(1),
                Constraint::Length(1), // start
                Constraint::Min(0),    // legend
            ])
            .split(inner);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let focused = |field: SetupField| form.focus == field;
        let marker = |field: SetupField| if focused(field) { "› " } else { "  " };
        let field_style = |field: SetupField| {
            if focused(field) {
                bold.fg(Color::Yellow)
            } else {
                Style::default()
            }
        };

        let tab = |goal: GoalType, label: &'static str| {
            if form.goal_type == goal {
                Span::styled(
                    format!(" {label} "),
                    field_style(SetupField::GoalType).add_modifier(Modifier::REVERSED),
                )
            } else {
                Span::styled(format!(" {label} "), dim)
            }
        };
        Paragraph::new(Line::from(vec![
            Span::raw(marker(SetupField::GoalType)),
            tab(GoalType::Time, "Time-based"),
            Span::raw(" "),
            tab(GoalType::Words, "Word count target"),
        ]))
        .render(rows[0], buf);

        let (label, placeholder) = match form.goal_type {
            GoalType::Time => ("Minutes to write", "15"),
            GoalType::Words => ("Target word count", "500"),
        };
        Paragraph::new(Span::styled(label, bold)).render(rows[2], buf);
        let value = if form.goal_value.is_empty() {
            Span::styled(placeholder, dim)
        } else {
            Span::styled(form.goal_value.clone(), field_style(SetupField::GoalValue))
        };
        let mut input = vec![Span::raw(marker(SetupField::GoalValue)), Span::raw("[ "), value];
        if focused(SetupField::GoalValue) {
            input.push(Span::styled("▏", bold));
        }
        input.push(Span::raw(" ]"));
        Paragraph::new(Line::from(input)).render(rows[3], buf);

        Paragraph::new(Span::styled("Countdown Duration", bold)).render(rows[5], buf);
        Paragraph::new(Line::from(vec![
            Span::raw(marker(SetupField::Countdown)),
            Span::styled(
                format!("< {} seconds >", form.countdown_duration),
                field_style(SetupField::Countdown),
            ),
            Span::styled(format!("   fade: {}", self.fade), dim),
        ]))
        .render(rows[6], buf);

        let checkbox = if form.hardcore { "[x]" } else { "[ ]" };
        Paragraph::new(Line::from(vec![
            Span::raw(marker(SetupField::Hardcore)),
            Span::styled(
                format!("{checkbox} 💀 Hardcore Mode"),
                field_style(SetupField::Hardcore),
            ),
        ]))
        .render(rows[8], buf);
        Paragraph::new(Span::styled(
            "    your text is permanently deleted if it fades completely",
            dim.add_modifier(Modifier::ITALIC),
        ))
        .render(rows[9], buf);

        let start_label = if form.hardcore {
            "[ Start Writing 💀 ]"
        } else {
            "[ Start Writing ✍ ]"
        };
        let start_style = if !form.can_start() {
            dim
        } else {
            field_style(SetupField::Start)
        };
        Paragraph::new(Line::from(vec![
            Span::raw(marker(SetupField::Start)),
            Span::styled(start_label, start_style),
        ]))
        .render(rows[11], buf);

        Paragraph::new(Span::styled(
            "(tab) move / (←→) change / (space) toggle / (enter) start / (esc) quit",
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(rows[12], buf);
    }
}
