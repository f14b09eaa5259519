//! Invoices screen: billing table, period filter and the create-invoice form

use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};
use tracing::{info, warn};

use super::invoice_view::write_printable;
use super::{table_feedback, Confirm};
use crate::billing::{
    add_invoice, next_invoice_number, parse_date, parse_number, remove_invoices, DraftItem, FormError,
    InvoiceDraft, InvoicePeriod, InvoiceSummary,
};
use crate::models::{format_rupees, Invoice, InvoiceStatus, DATE_FORMAT};
use crate::seed;
use crate::store::INVOICES_KEY;
use crate::table::{RowAction, TableEvent};
use crate::tables::invoice_table;
use crate::tui::app::{AppContext, Screen};
use crate::tui::components::{DataTable, Form, FormField, FormFieldType, FormInput};
use crate::tui::traits::{FormHandler, Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::{centered_rect, render_cards, render_confirm, Styles};

const PATIENT: usize = 0;
const DATE: usize = 1;
const STATUS: usize = 2;
const ITEM: usize = 3;
const QTY: usize = 4;
const PRICE: usize = 5;

/// Create-invoice form: header fields plus the item lines added so far
pub struct InvoiceForm {
    pub form: Form,
    pub items: Vec<DraftItem>,
}

impl InvoiceForm {
    pub fn new(today: chrono::NaiveDate) -> Self {
        let statuses = InvoiceStatus::ALL.iter().map(|s| s.as_str().to_string()).collect();
        let form = Form::new(
            "Create New Invoice",
            vec![
                FormField::new("Patient Name", FormFieldType::Text).with_placeholder("Required"),
                FormField::new("Invoice Date", FormFieldType::Date)
                    .with_value(&today.format(DATE_FORMAT).to_string()),
                FormField::new("Status", FormFieldType::Dropdown).with_dropdown_options(statuses),
                FormField::new("Item", FormFieldType::Text).with_placeholder("Medicine name"),
                FormField::new("Qty", FormFieldType::Number).with_value("1"),
                FormField::new("Price", FormFieldType::Number).with_value("0"),
            ],
        );
        Self { form, items: Vec::new() }
    }

    fn item_pending(&self) -> bool {
        !self.form.value(ITEM).trim().is_empty()
    }

    /// Move the Item/Qty/Price fields into a new item line
    pub fn add_item(&mut self) -> Result<(), FormError> {
        let item = DraftItem {
            item: self.form.value(ITEM).trim().to_string(),
            qty: parse_number(self.form.value(QTY), "Qty")?,
            price: parse_number(self.form.value(PRICE), "Price")?,
        };
        if item.qty == 0 {
            return Err(FormError::InvalidNumber {
                field: "Qty",
                value: "0".to_string(),
            });
        }
        if item.price.is_nan() || item.price < 0.0 {
            return Err(FormError::InvalidNumber {
                field: "Price",
                value: self.form.value(PRICE).to_string(),
            });
        }
        self.items.push(item);
        for (index, value) in [(ITEM, ""), (QTY, "1"), (PRICE, "0")] {
            if let Some(field) = self.form.field_mut(index) {
                field.set_value(value);
            }
        }
        self.form.focus(ITEM);
        Ok(())
    }

    pub fn draft(&self) -> Result<InvoiceDraft, FormError> {
        Ok(InvoiceDraft {
            patient: self.form.value(PATIENT).to_string(),
            date: parse_date(self.form.value(DATE))?,
            status: InvoiceStatus::parse(self.form.value(STATUS)).unwrap_or(InvoiceStatus::Pending),
            items: self.items.clone(),
        })
    }

    fn field_label(error: &FormError) -> Option<&'static str> {
        match error {
            FormError::Required("Patient Name") => Some("Patient Name"),
            FormError::InvalidDate(_) => Some("Invoice Date"),
            FormError::InvalidNumber { field: "Qty", .. } => Some("Qty"),
            FormError::InvalidNumber { field: "Price", .. } => Some("Price"),
            FormError::NoItems | FormError::Required("Item") => Some("Item"),
            _ => None,
        }
    }

    pub fn set_error(&mut self, error: &FormError) {
        self.form.set_error(Self::field_label(error), error.to_string());
    }

    fn item_lines(&self) -> Vec<Line<'static>> {
        let mut lines: Vec<Line> = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Line::from(format!(
                    "{}. {} x{} @ {} = {}",
                    i + 1,
                    item.item,
                    item.qty,
                    format_rupees(item.price),
                    format_rupees(f64::from(item.qty) * item.price)
                ))
            })
            .collect();
        let total: f64 = self.items.iter().map(|i| f64::from(i.qty) * i.price).sum();
        lines.push(Line::from(Span::styled(
            format!("{} item(s), total {}", self.items.len(), format_rupees(total)),
            Styles::title(),
        )));
        lines.push(Line::from(Span::styled(
            "Enter with an Item adds the line, Enter with Item empty saves, Ctrl+D drops the last line",
            Styles::inactive(),
        )));
        lines
    }
}

enum Mode {
    Browse,
    Create(Box<InvoiceForm>),
    ConfirmDelete(Confirm<String>),
}

pub struct InvoicesScreen {
    pub invoices: Vec<Invoice>,
    pub period: InvoicePeriod,
    pub table: DataTable<Invoice, String>,
    pub summary: InvoiceSummary,
    mode: Mode,
}

impl InvoicesScreen {
    pub fn new(ctx: &AppContext) -> Result<Self> {
        let invoices = ctx.store.load_or_seed(INVOICES_KEY, seed::invoices)?;
        let view = invoice_table(Vec::new(), ctx.config.page_size)?;
        let mut screen = Self {
            invoices,
            period: InvoicePeriod::All,
            table: DataTable::new(view, "Invoices", &ctx.config.export_dir, "invoices"),
            summary: InvoiceSummary::default(),
            mode: Mode::Browse,
        };
        screen.refresh(ctx);
        Ok(screen)
    }

    /// Rebuild the table and cards from the invoice list and period
    fn refresh(&mut self, ctx: &AppContext) {
        let visible: Vec<Invoice> = self
            .invoices
            .iter()
            .filter(|i| self.period.matches(i.date, ctx.today))
            .cloned()
            .collect();
        self.summary = InvoiceSummary::from_invoices(&visible);
        self.table.view.replace_records(visible);
        self.table.title = format!("Invoices - {}", self.period.label());
    }

    fn persist(&self, ctx: &AppContext) -> Result<()> {
        ctx.store.save(INVOICES_KEY, &self.invoices)?;
        Ok(())
    }

    pub fn is_creating(&self) -> bool {
        matches!(self.mode, Mode::Create(_))
    }

    pub fn pending_delete(&self) -> Option<&Confirm<String>> {
        match self.mode {
            Mode::ConfirmDelete(ref confirm) => Some(confirm),
            _ => None,
        }
    }

    fn handle_table_event(&mut self, event: TableEvent<Invoice>, ctx: &AppContext) -> Result<ScreenAction> {
        match event {
            TableEvent::DropdownChanged { row, value } => {
                let Some(status) = InvoiceStatus::parse(&value) else {
                    return Ok(ScreenAction::SetError(format!("Unknown status '{}'", value)));
                };
                if let Some(invoice) = self.invoices.iter_mut().find(|i| i.invoice == row.invoice) {
                    invoice.status = status;
                }
                self.table.view.edit_record(&row.invoice, |i| i.status = status)?;
                self.summary = InvoiceSummary::from_invoices(self.table.view.records());
                self.persist(ctx)?;
                info!("Invoice {} marked {}", row.invoice, value);
                Ok(ScreenAction::SetStatus(format!("{} is now {}", row.invoice, value)))
            }
            TableEvent::RowAction { action: RowAction::View, row } => Ok(ScreenAction::OpenInvoice(Box::new(row))),
            TableEvent::RowAction {
                action: RowAction::Print | RowAction::Download,
                row,
            } => {
                let path = write_printable(&row, &ctx.config.store_name, &ctx.config.export_dir)?;
                Ok(ScreenAction::SetStatus(format!("Invoice written to {}", path.display())))
            }
            TableEvent::BulkDelete(rows) => {
                let ids = rows.into_iter().map(|r| r.invoice).collect();
                self.mode = Mode::ConfirmDelete(Confirm::delete(ids, "invoice"));
                Ok(ScreenAction::None)
            }
            TableEvent::RowAction { .. } | TableEvent::SelectionChanged(_) => Ok(ScreenAction::None),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        if !self.table.searching {
            match key.code {
                KeyCode::Esc => return Ok(ScreenAction::NavigateTo(Screen::MainMenu)),
                KeyCode::Char('p') => {
                    self.period = self.period.next();
                    self.refresh(ctx);
                    return Ok(ScreenAction::SetStatus(format!("Showing {} invoices", self.period.label())));
                }
                KeyCode::Char('n') => {
                    self.mode = Mode::Create(Box::new(InvoiceForm::new(ctx.today)));
                    return Ok(ScreenAction::ClearMessages);
                }
                _ => {}
            }
        }

        let mut events: Vec<TableEvent<Invoice>> = Vec::new();
        let input = self.table.handle_key(key, &mut events);
        let mut action = table_feedback(input);
        for event in events {
            match self.handle_table_event(event, ctx)? {
                ScreenAction::None => {}
                other => action = other,
            }
        }
        Ok(action)
    }

    /// Store a submitted invoice. A taken number keeps the form open.
    fn create(&mut self, invoice: Invoice, ctx: &mut AppContext) -> Result<ScreenAction> {
        let number = invoice.invoice.clone();
        if !add_invoice(&mut self.invoices, invoice) {
            warn!("Invoice {} already exists", number);
            return Ok(ScreenAction::SetError(format!("Invoice {} already exists", number)));
        }
        self.persist(ctx)?;
        self.mode = Mode::Browse;
        self.refresh(ctx);
        Ok(ScreenAction::SetStatus(format!("Invoice {} created", number)))
    }

    fn handle_form_key(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        let Mode::Create(ref mut form) = self.mode else {
            return Ok(ScreenAction::None);
        };

        if key.code == KeyCode::Char('d') && key.modifiers.contains(KeyModifiers::CONTROL) {
            form.items.pop();
            return Ok(ScreenAction::None);
        }

        match form.form.handle_key(key) {
            FormInput::Cancel => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::None)
            }
            FormInput::Submit if form.item_pending() => {
                form.form.clear_errors();
                if let Err(e) = form.add_item() {
                    form.set_error(&e);
                }
                Ok(ScreenAction::None)
            }
            FormInput::Submit => {
                form.form.clear_errors();
                let invoice = form
                    .draft()
                    .and_then(|draft| draft.into_invoice(next_invoice_number(Local::now())));
                match invoice {
                    Ok(invoice) => self.create(invoice, ctx),
                    Err(e) => {
                        form.set_error(&e);
                        Ok(ScreenAction::None)
                    }
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
                let removed = remove_invoices(&mut self.invoices, &confirm.ids);
                self.persist(ctx)?;
                self.refresh(ctx);
                info!("Deleted {} invoices", removed);
                Ok(ScreenAction::SetStatus(format!("Deleted {} invoice(s)", removed)))
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.mode = Mode::Browse;
                Ok(ScreenAction::SetStatus("Delete cancelled".to_string()))
            }
            _ => Ok(ScreenAction::None),
        }
    }
}

impl ScreenTrait for InvoicesScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Cards
                Constraint::Length(1), // Period and keys
                Constraint::Min(0),    // Table
            ])
            .split(area);

        render_cards(
            f,
            chunks[0],
            &[
                ("Revenue (Paid)", format_rupees(self.summary.revenue_paid)),
                ("Pending Amount", format_rupees(self.summary.pending_amount)),
                ("Invoices", self.summary.count.to_string()),
            ],
        );
        f.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!(" Period: {} ", self.period.label()), Styles::info()),
                Span::styled(" p: period  n: new invoice  s: status  1 view  2 print  3 download", Styles::inactive()),
            ])),
            chunks[1],
        );
        self.table.render(f, chunks[2]);

        match self.mode {
            Mode::Browse => {}
            Mode::Create(ref form) => {
                let popup = centered_rect(70, 90, area);
                f.render_widget(Clear, popup);
                form.form.render(f, popup, &form.item_lines());
            }
            Mode::ConfirmDelete(ref confirm) => render_confirm(f, area, &confirm.message),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match self.mode {
            Mode::Browse => self.handle_browse_key(key, ctx),
            Mode::Create(_) => self.handle_form_key(key, ctx),
            Mode::ConfirmDelete(_) => self.handle_confirm_key(key, ctx),
        }
    }

    fn help_text(&self) -> &'static str {
        "Invoices:\n\
        ↑/↓ - Row, ←/→ - Page\n\
        / - Search, p - Cycle period\n\
        Space - Select row, a - Select all, x - Delete selected\n\
        s - Cycle status\n\
        1 - View, 2 - Print, 3 - Download\n\
        e - Export CSV, J - Export JSON\n\
        n - New invoice\n\
        Esc - Main menu"
    }

    fn captures_input(&self) -> bool {
        self.table.searching || !matches!(self.mode, Mode::Browse)
    }

    fn on_enter(&mut self, ctx: &mut AppContext) -> Result<()> {
        if let Some(invoices) = ctx.store.load(INVOICES_KEY)? {
            self.invoices = invoices;
        }
        self.refresh(ctx);
        Ok(())
    }
}
