//! Common UI styles and layout helpers

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::table::RowAction;

/// Palette shared by every screen
pub struct Styles;

impl Styles {
    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }

    /// Search match inside a cell
    pub fn highlight() -> Style {
        Style::default()
            .bg(Color::Yellow)
            .fg(Color::Black)
    }

    /// Colour for a status value shown in a table or card
    pub fn status(value: &str) -> Style {
        match value {
            "Paid" | "Active" | "In Stock" => Self::success(),
            "Pending" => Self::warning(),
            "Overdue" | "Inactive" | "Low Stock" => Self::error(),
            _ => Style::default(),
        }
    }

    pub fn action(action: RowAction) -> Style {
        match action {
            RowAction::Delete | RowAction::Reject => Self::error(),
            RowAction::Approve | RowAction::Download => Self::success(),
            RowAction::Edit | RowAction::Reset => Self::warning(),
            _ => Self::info(),
        }
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Cut `text` to at most `width` terminal columns, ending with "…" when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Left-align `text` in a field of `width` columns
pub fn pad(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", cut, " ".repeat(fill))
}

/// Right-align `text` in a field of `width` columns
pub fn pad_left(text: &str, width: usize) -> String {
    let cut = truncate(text, width);
    let fill = width.saturating_sub(cut.width());
    format!("{}{}", " ".repeat(fill), cut)
}

/// Row of summary cards, each a bordered label/value pair
pub fn render_cards(f: &mut Frame, area: Rect, cards: &[(&str, String)]) {
    if cards.is_empty() {
        return;
    }
    let share = 100 / cards.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(share); cards.len()])
        .split(area);

    for ((label, value), chunk) in cards.iter().zip(chunks.iter()) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(value.clone(), Styles::title().patch(Styles::status(value)))),
            Line::from(Span::styled(label.to_string(), Styles::inactive())),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(card, *chunk);
    }
}

/// Yes/no confirmation popup
pub fn render_confirm(f: &mut Frame, area: Rect, message: &str) {
    let popup_area = centered_rect(50, 25, area);
    f.render_widget(Clear, popup_area);
    let popup = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Styles::error().add_modifier(Modifier::BOLD)),
            Span::raw(" confirm   "),
            Span::styled("n/Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" cancel"),
        ]),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title("Confirm")
            .borders(Borders::ALL)
            .border_style(Styles::error()),
    );
    f.render_widget(popup, popup_area);
}
