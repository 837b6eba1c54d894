use crossterm::event::KeyCode;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Widget, Wrap},
    Frame,
};
use std::time::Instant;

use crate::App;
use cubetime::presenter::Feedback;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const HISTORY_WIDTH: u16 = 20;
const TIMER_HEIGHT: u16 = 5;

struct Areas {
    scramble: Rect,
    timer: Rect,
    history: Rect,
    footer: Rect,
}

fn split(area: Rect) -> Areas {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([Constraint::Min(1), Constraint::Length(HISTORY_WIDTH)])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // scramble
            Constraint::Min(1),    // padding above the timer
            Constraint::Length(TIMER_HEIGHT),
            Constraint::Min(1), // padding below the timer
            Constraint::Length(2), // footer
        ])
        .split(columns[0]);

    Areas {
        scramble: rows[0],
        timer: rows[2],
        history: columns[1],
        footer: rows[4],
    }
}

/// Screen region that accepts taps
pub fn timer_area(area: Rect) -> Rect {
    split(area).timer
}

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "enter".to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}

fn instructions(app: &App) -> String {
    let key = key_label(app.dispatcher.trigger_key());
    let start = if app.dispatcher.mode().pointer {
        format!("tap the timer or press ({key})")
    } else {
        format!("press ({key})")
    };
    format!("{start} to start / stop / clear\n(n)ew scramble  (r)eset all  (esc)ape")
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let display = self.session.presenter();
        let areas = split(area);

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let timer_style = match display.feedback_at(Instant::now()) {
            Feedback::Running => bold_style.fg(Color::Red),
            Feedback::Stopped => bold_style.fg(Color::Green),
            Feedback::Idle => bold_style,
        };

        Paragraph::new(Span::styled(display.scramble.as_str(), bold_style))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" scramble "),
            )
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(areas.scramble, buf);

        // vertically center the single line of time inside its box
        let padding = (TIMER_HEIGHT.saturating_sub(2) / 2) as usize;
        let mut lines: Vec<Line> = vec![Line::default(); padding];
        lines.push(Line::from(Span::styled(display.elapsed.as_str(), timer_style)));

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(timer_style),
            )
            .alignment(Alignment::Center)
            .render(areas.timer, buf);

        let items: Vec<ListItem> = if display.history.is_empty() {
            vec![ListItem::new(Span::styled("no solves yet", dim_style))]
        } else {
            display
                .history
                .iter()
                .map(|entry| ListItem::new(entry.as_str()))
                .collect()
        };
        List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .title(" times "),
            )
            .render(areas.history, buf);

        Paragraph::new(instructions(self))
            .style(italic_style.add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .render(areas.footer, buf);
    }
}
