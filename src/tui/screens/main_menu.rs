//! Landing screen: one entry per section, picked by arrow keys or digit

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::config::DEFAULT_STORE_NAME;
use crate::tui::app::{AppContext, Screen};
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::Styles;

/// Menu entries in display order; entry `i` answers to digit `i + 1`
const ENTRIES: [(Screen, &str); 5] = [
    (Screen::Dashboard, "Revenue, stock health, sales charts and recent sales"),
    (Screen::Invoices, "Billing invoices: search, status, print and create"),
    (Screen::Distributors, "Suppliers and their status"),
    (Screen::Inventory, "Stock list with expiry dates"),
    (Screen::Help, "Keyboard shortcuts and screen guide"),
];

fn shortcut(index: usize) -> char {
    char::from_digit(index as u32 + 1, 10).unwrap_or('?')
}

pub struct MainMenuScreen {
    pub list_state: ListState,
    pub store_name: String,
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenuScreen {
    pub fn new() -> Self {
        Self {
            list_state: ListState::default().with_selected(Some(0)),
            store_name: DEFAULT_STORE_NAME.to_string(),
        }
    }

    pub fn with_store_name(mut self, store_name: &str) -> Self {
        self.store_name = store_name.to_string();
        self
    }

    pub fn highlighted(&self) -> Screen {
        let index = self.list_state.selected().unwrap_or(0);
        ENTRIES[index % ENTRIES.len()].0
    }

    fn step(&mut self, forward: bool) {
        let len = ENTRIES.len();
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward { current + 1 } else { current + len - 1 };
        self.list_state.select(Some(next % len));
    }

    fn entry_items(&self) -> Vec<ListItem<'static>> {
        let selected = self.list_state.selected();
        ENTRIES
            .iter()
            .enumerate()
            .map(|(i, (screen, description))| {
                let body = if selected == Some(i) {
                    Styles::selected()
                } else {
                    Style::default()
                };
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", shortcut(i)), Styles::info()),
                        Span::styled(screen.title().to_string(), body.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", description),
                        if selected == Some(i) { body } else { Styles::inactive() },
                    )),
                ])
            })
            .collect()
    }
}

impl ScreenTrait for MainMenuScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(area);

        let banner = Paragraph::new(format!("PharmaBill - {}", self.store_name))
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(banner, chunks[0]);

        let menu = List::new(self.entry_items())
            .block(
                Block::default()
                    .title("Main Menu")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(menu, chunks[1], &mut self.list_state);

        let bold = Style::default().add_modifier(Modifier::BOLD);
        let hints = Line::from(vec![
            Span::raw("↑/↓ move  "),
            Span::styled("Enter", bold),
            Span::raw(" open  "),
            Span::styled(format!("1-{}", ENTRIES.len()), bold),
            Span::raw(" jump  "),
            Span::styled("q", bold),
            Span::raw(" quit"),
        ]);
        f.render_widget(
            Paragraph::new(hints).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            ),
            chunks[2],
        );
    }

    fn handle_key_event(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> Result<ScreenAction> {
        let action = match key.code {
            KeyCode::Up => {
                self.step(false);
                ScreenAction::None
            }
            KeyCode::Down => {
                self.step(true);
                ScreenAction::None
            }
            KeyCode::Enter => ScreenAction::NavigateTo(self.highlighted()),
            KeyCode::Esc => ScreenAction::Quit,
            KeyCode::Char(c) => (0..ENTRIES.len())
                .find(|&i| shortcut(i) == c)
                .map_or(ScreenAction::None, |i| ScreenAction::NavigateTo(ENTRIES[i].0)),
            _ => ScreenAction::None,
        };
        Ok(action)
    }

    fn help_text(&self) -> &'static str {
        "Main Menu:\n\
        ↑/↓ - Move\n\
        Enter - Open section\n\
        1 Dashboard  2 Invoices  3 Distributors  4 Inventory  5 Help\n\
        Esc / q - Quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;
    use tempfile::TempDir;

    fn press(menu: &mut MainMenuScreen, ctx: &mut AppContext, code: KeyCode) -> ScreenAction {
        menu.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), ctx)
            .unwrap()
    }

    #[test]
    fn test_arrows_wrap_and_enter_opens() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::new(Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        })
        .unwrap();
        let mut menu = MainMenuScreen::new();

        press(&mut menu, &mut ctx, KeyCode::Up);
        assert_eq!(menu.highlighted(), Screen::Help);
        press(&mut menu, &mut ctx, KeyCode::Down);
        assert_eq!(menu.highlighted(), Screen::Dashboard);
        assert_eq!(
            press(&mut menu, &mut ctx, KeyCode::Enter),
            ScreenAction::NavigateTo(Screen::Dashboard)
        );
    }

    #[test]
    fn test_digit_shortcuts() {
        let dir = TempDir::new().unwrap();
        let mut ctx = AppContext::new(Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        })
        .unwrap();
        let mut menu = MainMenuScreen::new();

        assert_eq!(
            press(&mut menu, &mut ctx, KeyCode::Char('3')),
            ScreenAction::NavigateTo(Screen::Distributors)
        );
        assert_eq!(press(&mut menu, &mut ctx, KeyCode::Char('9')), ScreenAction::None);
        assert_eq!(press(&mut menu, &mut ctx, KeyCode::Esc), ScreenAction::Quit);
    }
}
