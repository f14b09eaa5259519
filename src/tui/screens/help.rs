//! In-app guide to keys and screens

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::tui::app::{AppContext, Screen};
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::Styles;

/// Help sections
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HelpSection {
    Overview,
    Tables,
    Dashboard,
    Invoices,
    Distributors,
    Inventory,
}

impl HelpSection {
    pub const ALL: [HelpSection; 6] = [
        HelpSection::Overview,
        HelpSection::Tables,
        HelpSection::Dashboard,
        HelpSection::Invoices,
        HelpSection::Distributors,
        HelpSection::Inventory,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            HelpSection::Overview => "Overview",
            HelpSection::Tables => "Working with Tables",
            HelpSection::Dashboard => "Dashboard",
            HelpSection::Invoices => "Invoices",
            HelpSection::Distributors => "Distributors",
            HelpSection::Inventory => "Inventory",
        }
    }

    fn content(&self) -> Vec<Line<'static>> {
        let heading = |text: &'static str| Line::from(Span::styled(text, Styles::title()));
        let sub = |text: &'static str| Line::from(Span::styled(text, Styles::info()));
        match self {
            HelpSection::Overview => vec![
                heading("PharmaBill - Pharmacy Billing"),
                Line::from(""),
                Line::from("Billing, stock and supplier records for a small pharmacy."),
                Line::from("Every list is a table you can search, page, select and export."),
                Line::from(""),
                sub("Global keys:"),
                Line::from("• ESC - Go back"),
                Line::from("• q - Quit (except while typing)"),
                Line::from("• F1 or ? - Context help popup"),
                Line::from(""),
                Line::from("Changes to invoices, sales and distributors are saved"),
                Line::from("immediately to the data directory."),
            ],
            HelpSection::Tables => vec![
                heading("Working with Tables"),
                Line::from(""),
                sub("Moving around:"),
                Line::from("• ↑/↓ - Row"),
                Line::from("• ←/→ or PgUp/PgDn - Page"),
                Line::from("• Home/End - First/last page"),
                Line::from(""),
                sub("Search:"),
                Line::from("• / - Type a search term; matches are highlighted"),
                Line::from("• Enter - Keep the term, Esc - Clear it"),
                Line::from(""),
                sub("Selection:"),
                Line::from("• Space - Toggle the row"),
                Line::from("• a - Select or clear every row that matches the search"),
                Line::from("• x - Delete the selected rows (asks first)"),
                Line::from(""),
                sub("Other:"),
                Line::from("• s - Cycle the status of the row"),
                Line::from("• 1..9 - Row actions, numbered in the Action column"),
                Line::from("• e - Export CSV, J - Export JSON"),
            ],
            HelpSection::Dashboard => vec![
                heading("Dashboard"),
                Line::from(""),
                Line::from("Revenue, inventory health, a weekly sales chart, the graph"),
                Line::from("report of stock shares and the recent sales list."),
                Line::from(""),
                sub("Keys:"),
                Line::from("• p - Cycle the sales period (Today, 6 Days, This Month, All)"),
                Line::from("• g - Cycle the graph report period (Today, 6 Days, This Month)"),
                Line::from("• 1 - Edit the sale, 2 - Delete it"),
                Line::from("• r - Write the dashboard report"),
            ],
            HelpSection::Invoices => vec![
                heading("Invoices"),
                Line::from(""),
                sub("Keys:"),
                Line::from("• p - Cycle the period (All, Daily, Monthly, Yearly)"),
                Line::from("• n - New invoice"),
                Line::from("• s - Cycle Paid / Pending / Overdue"),
                Line::from("• 1 - View, 2 - Print, 3 - Download"),
                Line::from(""),
                sub("New invoice form:"),
                Line::from("• Fill Item, Qty and Price, then Enter to add the line"),
                Line::from("• Enter with empty item fields saves the invoice"),
            ],
            HelpSection::Distributors => vec![
                heading("Distributors"),
                Line::from(""),
                sub("Keys:"),
                Line::from("• n - Add a distributor"),
                Line::from("• s - Toggle Active / Inactive"),
                Line::from("• 1 - Delete the distributor"),
                Line::from(""),
                Line::from("Emails must be unique; mobile numbers have 10 digits."),
            ],
            HelpSection::Inventory => vec![
                heading("Inventory"),
                Line::from(""),
                Line::from("Read-only stock list with expiry dates."),
                Line::from("Rows below the low-stock threshold show Low Stock."),
                Line::from(""),
                sub("Keys:"),
                Line::from("• / - Search, e/J - Export"),
            ],
        }
    }
}

/// Section list on the left, scrollable section text on the right
pub struct HelpScreen {
    pub sections: ListState,
    pub scroll: usize,
}

impl Default for HelpScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpScreen {
    pub fn new() -> Self {
        Self {
            sections: ListState::default().with_selected(Some(0)),
            scroll: 0,
        }
    }

    fn index(&self) -> usize {
        self.sections.selected().unwrap_or(0)
    }

    pub fn section(&self) -> HelpSection {
        HelpSection::ALL[self.index().min(HelpSection::ALL.len() - 1)]
    }

    fn select(&mut self, index: usize) {
        self.sections.select(Some(index.min(HelpSection::ALL.len() - 1)));
        self.scroll = 0;
    }
}

impl ScreenTrait for HelpScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
            .split(area);

        let names: Vec<ListItem> = HelpSection::ALL
            .iter()
            .map(|section| ListItem::new(section.as_str().to_string()))
            .collect();
        let list = List::new(names)
            .block(Block::default().title("Sections").borders(Borders::ALL))
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");
        f.render_stateful_widget(list, chunks[0], &mut self.sections);

        let section = self.section();
        let text: Vec<Line> = section.content().into_iter().skip(self.scroll).collect();
        let body = Paragraph::new(text)
            .block(
                Block::default()
                    .title(format!("Help - {}", section.as_str()))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .wrap(Wrap { trim: true });
        f.render_widget(body, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateTo(Screen::MainMenu)),
            KeyCode::Up => self.select(self.index().saturating_sub(1)),
            KeyCode::Down => self.select(self.index() + 1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(10),
            KeyCode::PageDown => self.scroll += 10,
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        Ok(ScreenAction::None)
    }

    fn help_text(&self) -> &'static str {
        "Help Screen:\n\
        ↑/↓ - Choose section\n\
        PgUp/PgDn - Scroll\n\
        Home - Back to top\n\
        Esc - Main menu"
    }
}
