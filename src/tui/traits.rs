//! Traits every screen and widget in the TUI plugs into

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::app::{AppContext, Screen as ScreenType};
use crate::models::Invoice;

/// What a screen asks the app to do after handling a key
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    NavigateTo(ScreenType),
    /// Show the printable tax invoice for one invoice
    OpenInvoice(Box<Invoice>),
    Quit,
    SetStatus(String),
    SetError(String),
    ClearMessages,
    None,
}

pub trait Screen {
    fn draw(&mut self, f: &mut Frame, area: Rect);

    fn handle_key_event(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction>;

    /// Shortcuts listed in the F1 popup
    fn help_text(&self) -> &'static str;

    /// True while the screen wants raw characters (search box, forms, dialogs)
    fn captures_input(&self) -> bool {
        false
    }

    /// Runs each time the screen becomes current
    fn on_enter(&mut self, _ctx: &mut AppContext) -> Result<()> {
        Ok(())
    }

    fn on_tick(&mut self) {}
}

/// Page-wise movement. Implementors only say where they are and how to
/// jump; stepping never leaves `0..page_total()`.
pub trait Paginated {
    fn current_page(&self) -> usize;

    fn page_total(&self) -> usize;

    fn jump_to_page(&mut self, page: usize);

    fn next_page(&mut self) {
        let next = self.current_page() + 1;
        if next < self.page_total() {
            self.jump_to_page(next);
        }
    }

    fn previous_page(&mut self) {
        if let Some(prev) = self.current_page().checked_sub(1) {
            self.jump_to_page(prev.min(self.page_total().saturating_sub(1)));
        }
    }

    fn first_page(&mut self) {
        self.jump_to_page(0);
    }

    fn last_page(&mut self) {
        self.jump_to_page(self.page_total().saturating_sub(1));
    }
}

/// Focus movement and text editing for a set of fields
pub trait FormHandler {
    fn focused(&self) -> usize;

    fn focus(&mut self, field: usize);

    fn field_count(&self) -> usize;

    fn focus_next(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focus((self.focused() + 1) % count);
        }
    }

    fn focus_previous(&mut self) {
        let count = self.field_count();
        if count > 0 {
            self.focus((self.focused() + count - 1) % count);
        }
    }

    fn insert_char(&mut self, c: char);

    fn backspace(&mut self);

    fn delete_forward(&mut self);
}
