//! Table component: draws a [`TableView`] and maps keys onto it

use std::hash::Hash;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell as UiCell, Paragraph, Row, Table, TableState},
    Frame,
};
use tracing::{info, warn};

use crate::table::search::split_highlights;
use crate::table::{Cell, ExportError, ExportFormat, HeaderCheck, Record, TableListener, TableView};
use crate::tui::traits::Paginated;
use crate::tui::ui::Styles;

/// Result of feeding a key to the table
#[derive(Debug, Clone, PartialEq)]
pub enum TableInput {
    /// Not a table key; the screen may use it
    Ignored,
    Handled,
    Status(String),
    Error(String),
}

pub struct DataTable<R, Id> {
    pub view: TableView<R, Id>,
    pub title: String,
    /// Typing goes to the search box while set
    pub searching: bool,
    export_dir: PathBuf,
    export_stem: String,
    state: TableState,
}

impl<R, Id> DataTable<R, Id>
where
    R: Record,
    Id: Eq + Hash + Clone,
{
    pub fn new(view: TableView<R, Id>, title: &str, export_dir: &Path, export_stem: &str) -> Self {
        Self {
            view,
            title: title.to_string(),
            searching: false,
            export_dir: export_dir.to_path_buf(),
            export_stem: export_stem.to_string(),
            state: TableState::default(),
        }
    }

    pub fn export_path(&self, format: ExportFormat) -> PathBuf {
        self.export_dir
            .join(format!("{}.{}", self.export_stem, format.file_extension()))
    }

    /// Write the filtered rows to the export directory
    pub fn export(&self, format: ExportFormat) -> Result<PathBuf, ExportError> {
        let path = self.export_path(format);
        let table = self.view.export();
        table.write_to_path(&path, format)?;
        info!("Exported {} rows to {}", table.len(), path.display());
        Ok(path)
    }

    pub fn handle_key<L: TableListener<R>>(&mut self, key: KeyEvent, listener: &mut L) -> TableInput {
        if self.searching {
            return self.handle_search_key(key);
        }

        let options = self.view.options();
        match key.code {
            KeyCode::Up => self.view.cursor_up(),
            KeyCode::Down => self.view.cursor_down(),
            KeyCode::Left | KeyCode::PageUp => self.view.previous_page(),
            KeyCode::Right | KeyCode::PageDown => self.view.next_page(),
            KeyCode::Home => self.view.first_page(),
            KeyCode::End => self.view.last_page(),
            KeyCode::Char('/') if options.search => self.searching = true,
            KeyCode::Char(' ') if options.selection => {
                let Some(id) = self.view.cursor_id().cloned() else {
                    return TableInput::Handled;
                };
                if let Err(e) = self.view.toggle(&id, listener) {
                    return TableInput::Error(e.to_string());
                }
            }
            KeyCode::Char('a') if options.selection => {
                let check = self.view.header_check() != HeaderCheck::Checked;
                self.view.select_all(check, listener);
            }
            KeyCode::Char('x') if options.selection => {
                if self.view.request_bulk_delete(listener) == 0 {
                    return TableInput::Status("No rows selected".to_string());
                }
            }
            KeyCode::Char('s') if self.view.dropdown().is_some() => {
                let Some(id) = self.view.cursor_id().cloned() else {
                    return TableInput::Handled;
                };
                if let Err(e) = self.view.cycle_dropdown(&id, listener) {
                    return TableInput::Error(e.to_string());
                }
            }
            KeyCode::Char('e') if options.export => return self.export_input(ExportFormat::Csv),
            KeyCode::Char('J') if options.export => return self.export_input(ExportFormat::Json),
            KeyCode::Char(c @ '1'..='9') => {
                let actions = self.view.actions();
                let index = c as usize - '1' as usize;
                let (Some(action), Some(id)) = (actions.get(index).copied(), self.view.cursor_id().cloned()) else {
                    return TableInput::Ignored;
                };
                if let Err(e) = self.view.trigger_action(&id, action, listener) {
                    return TableInput::Error(e.to_string());
                }
            }
            _ => return TableInput::Ignored,
        }
        TableInput::Handled
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> TableInput {
        match key.code {
            KeyCode::Enter => self.searching = false,
            KeyCode::Esc => {
                self.searching = false;
                self.view.clear_search();
            }
            KeyCode::Backspace => {
                let mut term = self.view.search().to_string();
                term.pop();
                self.view.set_search(&term);
            }
            KeyCode::Char(c) => {
                let term = format!("{}{}", self.view.search(), c);
                self.view.set_search(&term);
            }
            _ => {}
        }
        TableInput::Handled
    }

    fn export_input(&self, format: ExportFormat) -> TableInput {
        match self.export(format) {
            Ok(path) => TableInput::Status(format!("Exported to {}", path.display())),
            Err(e) => {
                warn!("Export failed: {}", e);
                TableInput::Error(format!("Export failed: {}", e))
            }
        }
    }

    fn cell_line(cell: &Cell) -> Line<'static> {
        match cell {
            Cell::Text { text, highlights } if !highlights.is_empty() => Line::from(
                split_highlights(text, highlights)
                    .into_iter()
                    .map(|(part, hit)| {
                        if hit {
                            Span::styled(part.to_string(), Styles::highlight())
                        } else {
                            Span::raw(part.to_string())
                        }
                    })
                    .collect::<Vec<_>>(),
            ),
            Cell::Text { text, .. } => Line::from(text.clone()),
            Cell::Dropdown { value } => Line::from(vec![
                Span::styled(value.clone(), Styles::status(value)),
                Span::styled(" ▾", Styles::inactive()),
            ]),
            Cell::Actions(actions) => Line::from(
                actions
                    .iter()
                    .enumerate()
                    .flat_map(|(i, action)| {
                        [
                            Span::styled(format!("{}", i + 1), Styles::inactive()),
                            Span::styled(format!("{} ", action.glyph()), Styles::action(*action)),
                        ]
                    })
                    .collect::<Vec<_>>(),
            ),
        }
    }

    /// Render the table, with a search box above it when search is enabled
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let options = self.view.options();
        let table_area = if options.search {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(area);
            let border = if self.searching {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            };
            let text = if self.view.search().is_empty() && !self.searching {
                Line::from(Span::styled("Press / to search", Styles::inactive()))
            } else {
                Line::from(self.view.search().to_string())
            };
            f.render_widget(
                Paragraph::new(text).block(Block::default().title("Search").borders(Borders::ALL).border_style(border)),
                chunks[0],
            );
            chunks[1]
        } else {
            area
        };

        let checkbox = |checked: bool| if checked { "[x]" } else { "[ ]" };
        let mut widths = Vec::new();
        let mut header = Vec::new();
        if options.selection {
            widths.push(Constraint::Length(3));
            header.push(UiCell::from(match self.view.header_check() {
                HeaderCheck::Checked => "[x]",
                HeaderCheck::Indeterminate => "[-]",
                HeaderCheck::Unchecked => "[ ]",
            }));
        }
        let column_count = self.view.columns().len() as u32;
        for column in self.view.columns() {
            widths.push(Constraint::Ratio(1, column_count));
            header.push(UiCell::from(column.label.clone()));
        }

        let page_rows = self.view.page_rows();
        let empty = page_rows.is_empty();
        let rows: Vec<Row> = page_rows
            .iter()
            .map(|row| {
                let mut cells = Vec::new();
                if options.selection {
                    cells.push(UiCell::from(checkbox(row.selected)));
                }
                cells.extend(row.cells.iter().map(|c| UiCell::from(Self::cell_line(c))));
                let style = if row.selected {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(cells).style(style)
            })
            .collect();

        let selected = self.view.selection_len();
        let mut title = format!(
            "{} ({} rows) - Page {}/{}",
            self.title,
            self.view.filtered_len(),
            self.view.page() + 1,
            self.view.page_count()
        );
        if selected > 0 {
            title.push_str(&format!(" - {} selected", selected));
        }

        let table = Table::new(rows, widths)
            .header(Row::new(header).style(Styles::title()))
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        self.state.select(self.view.cursor_row());
        f.render_stateful_widget(table, table_area, &mut self.state);

        if empty {
            // Body starts below the border and the header row
            let inner = table_area.inner(&Margin::new(1, 1));
            let body = Rect {
                y: inner.y.saturating_add(1),
                height: inner.height.saturating_sub(1),
                ..inner
            };
            f.render_widget(
                Paragraph::new(Span::styled("No data found", Styles::inactive())).alignment(Alignment::Center),
                body,
            );
        }
    }
}

impl<R, Id> Paginated for TableView<R, Id>
where
    R: Record,
    Id: Eq + Hash + Clone,
{
    fn current_page(&self) -> usize {
        self.page()
    }

    fn page_total(&self) -> usize {
        self.page_count()
    }

    fn jump_to_page(&mut self, page: usize) {
        self.set_page(page);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sale;
    use crate::seed;
    use crate::table::TableEvent;
    use crate::tables::{inventory_table, sales_table};
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use std::num::NonZeroUsize;
    use tempfile::TempDir;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn sales(dir: &Path) -> DataTable<Sale, u32> {
        let view = sales_table(seed::sales(), NonZeroUsize::new(5).unwrap()).unwrap();
        DataTable::new(view, "Recent Sales", dir, "sales")
    }

    #[test]
    fn test_space_toggles_row_under_cursor() {
        let dir = TempDir::new().unwrap();
        let mut table = sales(dir.path());
        let mut events: Vec<TableEvent<Sale>> = Vec::new();
        table.handle_key(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE), &mut events);
        table.handle_key(key(' '), &mut events);
        assert!(table.view.is_selected(&2));
        assert!(matches!(events[0], TableEvent::SelectionChanged(ref rows) if rows.len() == 1));
    }

    #[test]
    fn test_bulk_delete_without_selection_reports_status() {
        let dir = TempDir::new().unwrap();
        let mut table = sales(dir.path());
        let mut events: Vec<TableEvent<Sale>> = Vec::new();
        assert_eq!(
            table.handle_key(key('x'), &mut events),
            TableInput::Status("No rows selected".to_string())
        );
        table.handle_key(key('a'), &mut events);
        table.handle_key(key('x'), &mut events);
        assert!(matches!(events.last(), Some(TableEvent::BulkDelete(rows)) if rows.len() == 6));
    }

    #[test]
    fn test_number_keys_trigger_actions() {
        let dir = TempDir::new().unwrap();
        let mut table = sales(dir.path());
        let mut events: Vec<TableEvent<Sale>> = Vec::new();
        table.handle_key(key('2'), &mut events);
        assert!(matches!(
            events[0],
            TableEvent::RowAction { action: crate::table::RowAction::Delete, ref row } if row.id == 1
        ));
        assert_eq!(table.handle_key(key('7'), &mut events), TableInput::Ignored);
    }

    #[test]
    fn test_search_mode_captures_typing() {
        let dir = TempDir::new().unwrap();
        let view = inventory_table(seed::inventory(), NonZeroUsize::new(5).unwrap(), 100).unwrap();
        let mut table = DataTable::new(view, "Inventory", dir.path(), "inventory");
        table.handle_key(key('/'), &mut ());
        assert!(table.searching);
        for c in "medequip".chars() {
            table.handle_key(key(c), &mut ());
        }
        assert_eq!(table.view.filtered_len(), 2);
        table.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE), &mut ());
        assert!(!table.searching);
        assert_eq!(table.view.filtered_len(), 5);
    }

    #[test]
    fn test_export_writes_filtered_rows() {
        let dir = TempDir::new().unwrap();
        let view = inventory_table(seed::inventory(), NonZeroUsize::new(2).unwrap(), 100).unwrap();
        let mut table = DataTable::new(view, "Inventory", dir.path(), "inventory");
        table.view.set_search("medisupply");
        let input = table.handle_key(key('e'), &mut ());
        assert!(matches!(input, TableInput::Status(_)));
        let csv = std::fs::read_to_string(dir.path().join("inventory.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(csv.starts_with("Item,Category,Stock,Price,Supplier,Expiry Date"));
    }

    #[test]
    fn test_render_shows_rows_and_empty_state() {
        let dir = TempDir::new().unwrap();
        let mut table = sales(dir.path());
        let mut terminal = Terminal::new(TestBackend::new(120, 14)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Kishor Kedar"));
        assert!(text.contains("Page 1/2"));

        table.view.replace_records(Vec::new());
        terminal.draw(|f| table.render(f, f.size())).unwrap();
        assert!(buffer_text(&terminal).contains("No data found"));
    }

    #[test]
    fn test_empty_state_is_centered_in_body() {
        let dir = TempDir::new().unwrap();
        let mut table = sales(dir.path());
        table.view.replace_records(Vec::new());
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal.draw(|f| table.render(f, f.size())).unwrap();

        let text = buffer_text(&terminal);
        let (y, line) = text
            .lines()
            .enumerate()
            .find(|(_, l)| l.contains("No data found"))
            .unwrap();
        assert_eq!(y, 2);
        let x = line[..line.find("No data found").unwrap()].chars().count();
        assert_eq!(x, 1 + (38 - 13) / 2);
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }
}
