//! Dashboard: headline cards, weekly sales chart, graph report, quick report and recent sales

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Clear, LineGauge, Paragraph},
    Frame,
};
use tracing::{debug, info};

use super::{table_feedback, Confirm};
use crate::billing::{apply_sale_edit, FormError, SaleDraft, SalesPeriod};
use crate::dashboard::{
    report_file_name, write_report, ChartSeries, GraphPeriod, QuickReport, StatCards, StockBreakdown, CHART_MAX,
};
use crate::models::{format_rupees, Distributor, InventoryItem, Invoice, Sale};
use crate::seed;
use crate::store::{DISTRIBUTORS_KEY, INVOICES_KEY, SALES_KEY};
use crate::table::{RowAction, TableEvent};
use crate::tables::sales_table;
use crate::tui::app::{AppContext, Screen};
use crate::tui::components::{DataTable, Form, FormField, FormFieldType, FormInput};
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::{centered_rect, render_cards, render_confirm, Styles};

const SEGMENT_COLORS: [Color; 4] = [Color::LightGreen, Color::Magenta, Color::Cyan, Color::Yellow];

const LABELS: [&str; 6] = ["Name", "Medicine", "Quantity", "Total Price", "Date", "Time"];

fn edit_form(sale: &Sale) -> Form {
    let draft = SaleDraft::from_sale(sale);
    let values = [
        draft.name,
        draft.medicine,
        draft.quantity,
        draft.total_price,
        draft.date,
        draft.time,
    ];
    let types = [
        FormFieldType::Text,
        FormFieldType::Text,
        FormFieldType::Number,
        FormFieldType::Number,
        FormFieldType::Date,
        FormFieldType::Text,
    ];
    let fields = LABELS
        .iter()
        .zip(types)
        .zip(values.iter())
        .map(|((label, field_type), value)| FormField::new(label, field_type).with_value(value))
        .collect();
    Form::new("Edit Sale", fields)
}

fn draft_from(form: &Form) -> SaleDraft {
    SaleDraft {
        name: form.value(0).to_string(),
        medicine: form.value(1).to_string(),
        quantity: form.value(2).to_string(),
        total_price: form.value(3).to_string(),
        date: form.value(4).to_string(),
        time: form.value(5).to_string(),
    }
}

fn error_label(error: &FormError) -> Option<&'static str> {
    match error {
        FormError::Required(field) | FormError::InvalidNumber { field, .. } => Some(*field),
        FormError::InvalidDate(_) => Some("Date"),
        _ => None,
    }
}

enum Mode {
    Browse,
    Edit { id: u32, form: Form },
    ConfirmDelete(Confirm<u32>),
}

pub struct DashboardScreen {
    pub sales: Vec<Sale>,
    pub period: SalesPeriod,
    pub chart: ChartSeries,
    pub graph_period: GraphPeriod,
    pub graph: StockBreakdown,
    pub cards: StatCards,
    pub report: QuickReport,
    pub table: DataTable<Sale, u32>,
    invoices: Vec<Invoice>,
    distributors: Vec<Distributor>,
    inventory: Vec<InventoryItem>,
    mode: Mode,
}

impl DashboardScreen {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let sales = ctx.store.load_or_seed(SALES_KEY, seed::sales)?;
        let invoices = ctx.store.load_or_seed(INVOICES_KEY, seed::invoices)?;
        let distributors = ctx.store.load_or_seed(DISTRIBUTORS_KEY, Vec::new)?;
        let inventory = seed::inventory();
        let period = SalesPeriod::All;
        let view = sales_table(Vec::new(), ctx.config.page_size)?;

        let mut screen = Self {
            cards: StatCards::compute(&invoices, &sales, &inventory, ctx.config.low_stock_threshold),
            report: QuickReport::compute(period, &sales, &invoices, &distributors, ctx.today),
            sales,
            period,
            chart: ChartSeries::default(),
            graph_period: GraphPeriod::default(),
            graph: StockBreakdown::for_period(GraphPeriod::default()),
            table: DataTable::new(view, "Recent Sales", &ctx.config.export_dir, "sales"),
            invoices,
            distributors,
            inventory,
            mode: Mode::Browse,
        };
        screen.refresh(ctx);
        Ok(screen)
    }

    /// Recompute cards and report, and reload the period's sales into the table
    fn refresh(&mut self, ctx: &AppContext) {
        self.cards = StatCards::compute(
            &self.invoices,
            &self.sales,
            &self.inventory,
            ctx.config.low_stock_threshold,
        );
        self.report = QuickReport::compute(self.period, &self.sales, &self.invoices, &self.distributors, ctx.today);
        let visible: Vec<Sale> = self
            .sales
            .iter()
            .filter(|s| self.period.matches(s.date, ctx.today))
            .cloned()
            .collect();
        self.table.view.replace_records(visible);
        self.table.title = format!("Recent Sales - {}", self.period.label());
    }

    fn persist(&self, ctx: &AppContext) -> Result<()> {
        ctx.store.save(SALES_KEY, &self.sales)?;
        Ok(())
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Edit { .. })
    }

    pub fn pending_delete(&self) -> Option<&Confirm<u32>> {
        match self.mode {
            Mode::ConfirmDelete(ref confirm) => Some(confirm),
            _ => None,
        }
    }

    fn handle_table_event(&mut self, event: TableEvent<Sale>) -> ScreenAction {
        match event {
            TableEvent::RowAction {
                action: RowAction::Edit,
                row,
            } => {
                self.mode = Mode::Edit {
                    id: row.id,
                    form: edit_form(&row),
                };
                ScreenAction::ClearMessages
            }
            TableEvent::RowAction {
                action: RowAction::Delete,
                row,
            } => {
                self.mode = Mode::ConfirmDelete(Confirm::delete(vec![row.id], "sale"));
                ScreenAction::None
            }
            TableEvent::BulkDelete(rows) => {
                let ids = rows.into_iter().map(|r| r.id).collect();
                self.mode = Mode::ConfirmDelete(Confirm::delete(ids, "sale"));
                ScreenAction::None
            }
            TableEvent::RowAction { .. } | TableEvent::SelectionChanged(_) | TableEvent::DropdownChanged { .. } => {
                ScreenAction::None
            }
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => return Ok(ScreenAction::NavigateTo(Screen::MainMenu)),
            KeyCode::Char('p') => {
                self.period = self.period.next();
                self.refresh(ctx);
                return Ok(ScreenAction::SetStatus(format!("Showing sales for {}", self.period.label())));
            }
            KeyCode::Char('g') => {
                self.graph_period = self.graph_period.next();
                self.graph = StockBreakdown::for_period(self.graph_period);
                return Ok(ScreenAction::SetStatus(format!(
                    "Graph report for {}",
                    self.graph_period.label()
                )));
            }
            KeyCode::Char('r') => {
                let path = ctx
                    .config
                    .export_dir
                    .join(report_file_name(Local::now().naive_local()));
                write_report(&self.cards, &ctx.config.store_name, &path)?;
                return Ok(ScreenAction::SetStatus(format!("Report written to {}", path.display())));
            }
            _ => {}
        }

        let mut events: Vec<TableEvent<Sale>> = Vec::new();
        let input = self.table.handle_key(key, &mut events);
        let mut action = table_feedback(input);
        for event in events {
            match self.handle_table_event(event) {
                ScreenAction::None => {}
                other => action = other,
            }
        }
        Ok(action)
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        let Mode::Edit { id, ref mut form } = self.mode else {
            return Ok(ScreenAction::None);
        };
        match form.handle_key(key) {
            FormInput::Cancel => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::None)
            }
            FormInput::Submit => {
                form.clear_errors();
                let edited = match draft_from(form).into_sale(id) {
                    Ok(sale) => sale,
                    Err(e) => {
                        form.set_error(error_label(&e), e.to_string());
                        return Ok(ScreenAction::None);
                    }
                };
                let before = self.period;
                if !apply_sale_edit(&mut self.sales, edited, &mut self.period, ctx.today) {
                    self.mode = Mode::Browse;
                    return Ok(ScreenAction::SetError(format!("Sale {} no longer exists", id)));
                }
                self.mode = Mode::Browse;
                self.persist(ctx)?;
                self.refresh(ctx);
                info!("Sale {} updated", id);
                if before != self.period {
                    Ok(ScreenAction::SetStatus(
                        "Sale updated; showing all sales so it stays visible".to_string(),
                    ))
                } else {
                    Ok(ScreenAction::SetStatus("Sale updated".to_string()))
                }
            }
            FormInput::Handled | FormInput::Ignored => Ok(ScreenAction::None),
        }
    }

    fn handle_confirm_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let Mode::ConfirmDelete(confirm) = std::mem::replace(&mut self.mode, Mode::Browse) else {
                    return Ok(ScreenAction::None);
                };
                let before = self.sales.len();
                self.sales.retain(|s| !confirm.ids.contains(&s.id));
                let removed = before - self.sales.len();
                self.persist(ctx)?;
                self.refresh(ctx);
                info!("Deleted {} sales", removed);
                Ok(ScreenAction::SetStatus(format!("Deleted {} sale(s)", removed)))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::SetStatus("Delete cancelled".to_string()))
            }
            _ => Ok(ScreenAction::None),
        }
    }

    fn draw_chart(&self, f: &mut Frame, area: Rect) {
        let bars = self.chart.bars();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title("Weekly Sales")
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            )
            .data(bars.as_slice())
            .bar_width(6)
            .bar_gap(2)
            .max(CHART_MAX)
            .bar_style(Styles::info())
            .value_style(Styles::selected());
        f.render_widget(chart, area);
    }

    fn draw_graph_report(&self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!("Graph Report - {}", self.graph_period.label()))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1); 6])
            .split(inner);
        f.render_widget(
            Paragraph::new(Span::styled(format!("Total {}%", self.graph.total()), Styles::title()))
                .alignment(Alignment::Center),
            rows[0],
        );
        for (i, (label, value)) in self.graph.segments().into_iter().enumerate() {
            let gauge = LineGauge::default()
                .ratio(self.graph.ratio(value))
                .label(format!("{:<9}{:>3}%", label, value))
                .line_set(symbols::line::THICK)
                .gauge_style(Style::default().fg(SEGMENT_COLORS[i]));
            f.render_widget(gauge, rows[i + 1]);
        }
        f.render_widget(
            Paragraph::new(Span::styled("g: period", Styles::inactive())),
            rows[5],
        );
    }

    fn draw_quick_report(&self, f: &mut Frame, area: Rect) {
        let row = |label: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{:<20}", label), Styles::inactive()),
                Span::styled(value, Styles::title()),
            ])
        };
        let lines = vec![
            row("Medicines Sold", self.report.medicines_sold.to_string()),
            row("Invoices Generated", self.report.invoices_generated.to_string()),
            row("Suppliers", self.report.suppliers.to_string()),
            Line::from(""),
            Line::from(Span::styled(
                "p: period  r: report  1 edit  2 delete",
                Styles::inactive(),
            )),
        ];
        f.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .title(format!("Quick Report - {}", self.report.period.label()))
                    .borders(Borders::ALL)
                    .border_style(Styles::inactive_border()),
            ),
            area,
        );
    }
}

impl ScreenTrait for DashboardScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),  // Cards
                Constraint::Length(10), // Chart and quick report
                Constraint::Min(0),     // Recent sales
            ])
            .split(area);

        render_cards(
            f,
            chunks[0],
            &[
                ("Total Revenue", format_rupees(self.cards.total_revenue)),
                ("Inventory Status", self.cards.inventory_status.to_string()),
                ("Medicines Available", self.cards.medicines_available.to_string()),
                ("Medicine Shortage", format!("{:02}", self.cards.medicine_shortage)),
            ],
        );

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(40),
                Constraint::Percentage(30),
                Constraint::Percentage(30),
            ])
            .split(chunks[1]);
        self.draw_chart(f, middle[0]);
        self.draw_graph_report(f, middle[1]);
        self.draw_quick_report(f, middle[2]);

        self.table.render(f, chunks[2]);

        match self.mode {
            Mode::Browse => {}
            Mode::Edit { ref form, .. } => {
                let popup = centered_rect(60, 90, area);
                f.render_widget(Clear, popup);
                form.render(f, popup, &[]);
            }
            Mode::ConfirmDelete(ref confirm) => render_confirm(f, area, &confirm.message),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key, ctx),
            Mode::Edit { .. } => self.handle_form_key(key, ctx),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key, ctx),
        }
    }

    fn help_text(&self) -> &'static str {
        "Dashboard:\n\
        ↑/↓ - Row, ←/→ - Page\n\
        p - Cycle sales period\n\
        g - Cycle graph report period\n\
        Space - Select row, a - Select all, x - Delete selected\n\
        1 - Edit sale, 2 - Delete sale\n\
        r - Write dashboard report\n\
        Esc - Main menu"
    }

    fn captures_input(&self) -> bool {
        !matches!(self.mode, Mode::Browse)
    }

    fn on_enter(&mut self, ctx: &mut AppContext) -> Result<()> {
        if let Some(invoices) = ctx.store.load(INVOICES_KEY)? {
            self.invoices = invoices;
        }
        if let Some(distributors) = ctx.store.load(DISTRIBUTORS_KEY)? {
            self.distributors = distributors;
        }
        self.refresh(ctx);
        Ok(())
    }

    fn on_tick(&mut self) {
        self.chart.randomize(&mut rand::thread_rng());
        debug!("Chart refreshed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use crossterm::event::KeyModifiers;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> AppContext {
        let config = Config {
            data_dir: dir.path().join("data"),
            export_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut ctx = AppContext::new(config).unwrap();
        ctx.today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        ctx
    }

    fn press(screen: &mut DashboardScreen, ctx: &mut AppContext, code: KeyCode) -> ScreenAction {
        screen
            .handle_key_event(KeyEvent::new(code, KeyModifiers::NONE), ctx)
            .unwrap()
    }

    #[test]
    fn test_period_cycle_filters_sales() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        assert_eq!(screen.table.view.records().len(), 6);

        press(&mut screen, &mut ctx, KeyCode::Char('p'));
        assert_eq!(screen.period, SalesPeriod::Today);
        assert_eq!(screen.table.view.records().len(), 2);
        assert_eq!(screen.report.medicines_sold, 6);
    }

    #[test]
    fn test_graph_key_switches_breakdown() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        assert_eq!(screen.graph_period, GraphPeriod::ThisMonth);
        assert_eq!(screen.graph.purchases, 42);

        let action = press(&mut screen, &mut ctx, KeyCode::Char('g'));
        assert_eq!(action, ScreenAction::SetStatus("Graph report for Today".to_string()));
        assert_eq!(screen.graph.purchases, 20);
        assert_eq!(screen.graph.total(), 100);
        // Sales period is independent
        assert_eq!(screen.period, SalesPeriod::All);
    }

    #[test]
    fn test_draw_shows_graph_report() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(150, 30)).unwrap();
        terminal.draw(|f| screen.draw(f, f.size())).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = (0..buffer.area.height)
            .flat_map(|y| (0..buffer.area.width).map(move |x| (x, y)))
            .map(|(x, y)| buffer.get(x, y).symbol().to_string())
            .collect();
        assert!(text.contains("Graph Report - This Month"));
        assert!(text.contains("Total 100%"));
        assert!(text.contains("Purchases 42%"));
        assert!(text.contains("No Sales  12%"));
    }

    #[test]
    fn test_single_delete_confirms_then_persists() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        press(&mut screen, &mut ctx, KeyCode::Char('2'));
        assert_eq!(screen.pending_delete().map(|c| c.ids.clone()), Some(vec![1]));
        assert!(screen.captures_input());
        press(&mut screen, &mut ctx, KeyCode::Char('y'));

        assert_eq!(screen.sales.len(), 5);
        let stored: Vec<Sale> = ctx.store.load(SALES_KEY).unwrap().unwrap();
        assert!(stored.iter().all(|s| s.id != 1));
    }

    #[test]
    fn test_edit_moving_sale_out_of_period_shows_all() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        press(&mut screen, &mut ctx, KeyCode::Char('p'));
        assert_eq!(screen.period, SalesPeriod::Today);

        press(&mut screen, &mut ctx, KeyCode::Char('1'));
        assert!(screen.is_editing());
        for _ in 0..4 {
            press(&mut screen, &mut ctx, KeyCode::Tab);
        }
        for _ in 0..10 {
            press(&mut screen, &mut ctx, KeyCode::Backspace);
        }
        for c in "01-12-2025".chars() {
            press(&mut screen, &mut ctx, KeyCode::Char(c));
        }
        press(&mut screen, &mut ctx, KeyCode::Enter);

        assert!(!screen.is_editing());
        assert_eq!(screen.period, SalesPeriod::All);
        let sale = screen.sales.iter().find(|s| s.id == 1).unwrap();
        assert_eq!(sale.date, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    }

    #[test]
    fn test_invalid_edit_keeps_form_open() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        press(&mut screen, &mut ctx, KeyCode::Char('1'));
        press(&mut screen, &mut ctx, KeyCode::Tab);
        press(&mut screen, &mut ctx, KeyCode::Tab);
        press(&mut screen, &mut ctx, KeyCode::Char('x'));
        press(&mut screen, &mut ctx, KeyCode::Enter);
        assert!(screen.is_editing());
        press(&mut screen, &mut ctx, KeyCode::Esc);
        assert!(!screen.is_editing());
        assert_eq!(screen.sales[0].quantity, 1);
    }

    #[test]
    fn test_report_key_writes_file() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        let action = press(&mut screen, &mut ctx, KeyCode::Char('r'));
        assert!(matches!(action, ScreenAction::SetStatus(ref m) if m.starts_with("Report written")));
        let written = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().starts_with("Dashboard_Report_"));
        assert!(written);
    }

    #[test]
    fn test_tick_changes_chart() {
        let dir = TempDir::new().unwrap();
        let ctx = context(&dir);
        let mut screen = DashboardScreen::new(&ctx).unwrap();
        screen.on_tick();
        assert!(screen.chart.values.iter().all(|v| (5000..35000).contains(v)));
    }
}
