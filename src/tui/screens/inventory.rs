//! Inventory screen: stock cards and the read-only stock table

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use super::table_feedback;
use crate::billing::InventorySummary;
use crate::models::{format_rupees, InventoryItem};
use crate::seed;
use crate::table::TableEvent;
use crate::tables::inventory_table;
use crate::tui::app::{AppContext, Screen};
use crate::tui::components::DataTable;
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::render_cards;

pub struct InventoryScreen {
    pub table: DataTable<InventoryItem, u32>,
    pub summary: InventorySummary,
}

impl InventoryScreen {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let items = seed::inventory();
        let summary = InventorySummary::from_items(&items, ctx.config.low_stock_threshold);
        let view = inventory_table(items, ctx.config.page_size, ctx.config.low_stock_threshold)?;
        Ok(Self {
            table: DataTable::new(view, "Inventory", &ctx.config.export_dir, "inventory"),
            summary,
        })
    }
}

impl ScreenTrait for InventoryScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(area);

        render_cards(
            f,
            chunks[0],
            &[
                ("Total Items", self.summary.total_items.to_string()),
                ("Low Stock", self.summary.low_stock.to_string()),
                ("Total Value", format_rupees(self.summary.total_value)),
            ],
        );
        self.table.render(f, chunks[1]);
    }

    fn handle_key_event(&mut self, key: KeyEvent, _ctx: &mut AppContext) -> Result<ScreenAction> {
        if key.code == KeyCode::Esc && !self.table.searching {
            return Ok(ScreenAction::NavigateTo(Screen::MainMenu));
        }

        let mut events: Vec<TableEvent<InventoryItem>> = Vec::new();
        let input = self.table.handle_key(key, &mut events);
        if events.iter().any(|e| matches!(e, TableEvent::BulkDelete(_))) {
            return Ok(ScreenAction::SetStatus("Inventory is read-only".to_string()));
        }
        Ok(table_feedback(input))
    }

    fn help_text(&self) -> &'static str {
        "Inventory:\n\
        ↑/↓ - Row, ←/→ - Page\n\
        / - Search (Enter keep, Esc clear)\n\
        Space - Select row, a - Select all\n\
        e - Export CSV, J - Export JSON\n\
        Esc - Main menu"
    }

    fn captures_input(&self) -> bool {
        self.table.searching
    }
}
