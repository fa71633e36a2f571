pub mod digits;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, Dialog, DialogKind, InputField},
    timer::Mode,
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const DIALOG_WIDTH: u16 = 44;

pub const FOCUS_COLOR: Color = Color::Rgb(0x1E, 0x90, 0xFF);
pub const BREAK_COLOR: Color = Color::Rgb(0x32, 0xCD, 0x32);
const START_BADGE: Color = Color::Rgb(0x00, 0xFA, 0x9A);
const RESET_BADGE: Color = Color::Rgb(0xFF, 0xD7, 0x00);

pub fn mode_color(mode: Mode) -> Color {
    match mode {
        Mode::Focus => FOCUS_COLOR,
        Mode::Break => BREAK_COLOR,
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();
        let bg = mode_color(snapshot.mode);

        // styles
        let base_style = Style::default().fg(Color::White).bg(bg);
        let bold_style = base_style.add_modifier(Modifier::BOLD);
        let dim_style = base_style.add_modifier(Modifier::DIM);

        Block::default().style(base_style).render(area, buf);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),               // title
                Constraint::Length(1),               // padding
                Constraint::Length(2),               // duration inputs
                Constraint::Length(1),               // padding
                Constraint::Length(digits::height()), // clock
                Constraint::Length(1),               // padding
                Constraint::Length(1),               // mode
                Constraint::Length(1),               // cycle
                Constraint::Min(0),
                Constraint::Length(1), // started at
                Constraint::Length(1), // key hints
            ])
            .split(area);

        Paragraph::new("Pomodoro Timer")
            .style(bold_style)
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        let inputs = [&self.focus_input, &self.break_input]
            .into_iter()
            .map(|input| {
                let editing = !snapshot.running && input.field == self.editing;
                input_line(input, editing, base_style)
            })
            .collect::<Vec<_>>();
        Paragraph::new(inputs)
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        let clock_area = chunks[4];
        let clock_lines = match digits::render_big(&snapshot.clock) {
            Some(lines) if digits::width(&snapshot.clock) <= clock_area.width => lines
                .into_iter()
                .map(|l| Line::from(Span::styled(l, bold_style)))
                .collect::<Vec<_>>(),
            // too narrow for block digits
            _ => vec![
                Line::default(),
                Line::default(),
                Line::from(Span::styled(snapshot.clock.clone(), bold_style)),
            ],
        };
        Paragraph::new(clock_lines)
            .alignment(Alignment::Center)
            .render(clock_area, buf);

        Paragraph::new(snapshot.mode_label.as_str())
            .style(bold_style)
            .alignment(Alignment::Center)
            .render(chunks[6], buf);
        Paragraph::new(snapshot.cycle_label.as_str())
            .style(bold_style)
            .alignment(Alignment::Center)
            .render(chunks[7], buf);

        if let Some(started_at) = self.started_at {
            Paragraph::new(format!("started {}", started_at.format("%H:%M")))
                .style(dim_style.add_modifier(Modifier::ITALIC))
                .alignment(Alignment::Center)
                .render(chunks[9], buf);
        }

        let badge = |color: Color| {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        };
        let hints = Line::from(vec![
            Span::styled(" ⏎ start ", badge(START_BADGE)),
            Span::styled(" ", base_style),
            Span::styled(" r reset ", badge(RESET_BADGE)),
            Span::styled("  (x)stop (tab)field (q)uit", dim_style),
        ]);
        Paragraph::new(hints)
            .alignment(Alignment::Center)
            .render(chunks[10], buf);

        if let Some(dialog) = self.dialog() {
            render_dialog(dialog, area, buf);
        }
    }
}

fn input_line(input: &InputField, editing: bool, base_style: Style) -> Line<'static> {
    let value_style = if editing {
        Style::default()
            .fg(Color::Black)
            .bg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        base_style.add_modifier(Modifier::BOLD)
    };

    Line::from(vec![
        Span::styled(format!("{} ", input.label()), base_style),
        Span::styled(format!("[{:<4}]", input.value), value_style),
    ])
}

fn render_dialog(dialog: &Dialog, area: Rect, buf: &mut Buffer) {
    let border_color = match dialog.kind {
        DialogKind::Info => Color::Cyan,
        DialogKind::Error => Color::Red,
    };

    // borders take two columns; wrapped rows plus borders, blank line and hint
    let inner_width = (DIALOG_WIDTH - 2) as usize;
    let message_rows: usize = dialog
        .message
        .lines()
        .map(|l| l.chars().count().div_ceil(inner_width).max(1))
        .sum();
    let popup = centered_rect(area, DIALOG_WIDTH, message_rows as u16 + 4);

    let mut lines = dialog
        .message
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect::<Vec<_>>();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "[Enter] OK",
        Style::default().add_modifier(Modifier::DIM),
    )));

    Clear.render(popup, buf);
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color))
                .title(dialog.title.as_str()),
        )
        .style(Style::default().fg(Color::White).bg(Color::Black))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(popup, buf);
}

/// Rect of at most `width` x `height` centred inside `area`
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::{FixedTicker, TickLoop};
    use crate::timer::{Durations, Notice};
    use std::sync::mpsc;
    use std::time::Duration;

    fn app() -> App {
        let (tx, _rx) = mpsc::channel();
        let ticks = TickLoop::new(&FixedTicker::new(Duration::from_secs(60)), tx);
        App::new(Durations::default(), ticks)
    }

    fn render(app: &App, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        app.render(buf.area, &mut buf);
        buf
    }

    fn text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn idle_screen_shows_labels_and_inputs() {
        let app = app();
        let screen = text(&render(&app, 60, 24));
        assert!(screen.contains("Pomodoro Timer"));
        assert!(screen.contains("Focus time (min): [25  ]"));
        assert!(screen.contains("Break time (min): [5   ]"));
        assert!(screen.contains("Mode: Focus"));
        assert!(screen.contains("Cycle 1 of 4"));
        assert!(!screen.contains("started"));
    }

    #[test]
    fn background_follows_mode() {
        let mut app = app();
        let buf = render(&app, 60, 24);
        assert_eq!(buf[(0, 0)].bg, FOCUS_COLOR);

        app.session.configure("1", "1").unwrap();
        app.session.start();
        for _ in 0..60 {
            app.session.advance();
        }
        let buf = render(&app, 60, 24);
        assert_eq!(buf[(0, 0)].bg, BREAK_COLOR);
        assert!(text(&buf).contains("Mode: Break"));
    }

    #[test]
    fn narrow_terminal_falls_back_to_plain_clock() {
        let app = app();
        let screen = text(&render(&app, 28, 24));
        assert!(screen.contains("25:00"));
    }

    #[test]
    fn wide_terminal_uses_block_digits() {
        let app = app();
        let screen = text(&render(&app, 60, 24));
        assert!(!screen.contains("25:00"));
        assert!(screen.contains("██████"));
    }

    #[test]
    fn dialog_is_drawn_on_top() {
        let mut app = app();
        app.dialogs.push_back(Notice::IntervalStarted(Mode::Break).into());
        let screen = text(&render(&app, 60, 24));
        assert!(screen.contains("Time for break has started!"));
        assert!(screen.contains("[Enter] OK"));
    }

    #[test]
    fn centered_rect_is_clamped() {
        let area = Rect::new(0, 0, 20, 5);
        let r = centered_rect(area, 44, 10);
        assert_eq!(r, area);

        let r = centered_rect(Rect::new(0, 0, 60, 24), 44, 6);
        assert_eq!(r, Rect::new(8, 9, 44, 6));
    }
}
