//! Tax invoice / cash memo for a single invoice

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table},
    Frame,
};
use tracing::info;

use crate::models::{Invoice, DATE_FORMAT};
use crate::tui::app::{AppContext, Screen};
use crate::tui::traits::{Screen as ScreenTrait, ScreenAction};
use crate::tui::ui::{pad, pad_left, Styles};

const STORE_ADDRESS: &str = "Shinoli, Tal.- Ambegaon, Dist.- Pune";
const FOOTER: [&str; 3] = [
    "Drug License No: MH-PZ-115478/115479/115480",
    "Goods sold are not returnable.",
    "Subject to Pune jurisdiction.",
];
const WIDTH: usize = 72;

/// Plain-text rendering of the invoice, as written by print/download
pub fn printable_invoice(invoice: &Invoice, store_name: &str) -> String {
    let mut out = String::new();
    let rule = "=".repeat(WIDTH);
    let thin = "-".repeat(WIDTH);
    let side = |left: &str, right: String| format!("{}{}", pad(left, WIDTH - 36), pad_left(&right, 36));

    let _ = writeln!(out, "{}", pad_left("Tax Invoice / Cash Memo", (WIDTH + 23) / 2));
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", side(store_name, format!("Invoice No: {}", invoice.invoice)));
    let _ = writeln!(
        out,
        "{}",
        side(STORE_ADDRESS, format!("Date: {}", invoice.date.format(DATE_FORMAT)))
    );
    let _ = writeln!(out, "{}", side("", format!("Patient: {}", invoice.patient)));
    let _ = writeln!(out, "{}", thin);
    let _ = writeln!(
        out,
        "{} {} {} {} {} {}",
        pad("Sr", 3),
        pad("Particulars", 24),
        pad("Batch No", 10),
        pad("Expiry", 7),
        pad("Qty", 8),
        pad_left("Amount", 15)
    );
    let _ = writeln!(out, "{}", thin);
    for (i, med) in invoice.medicines.iter().enumerate() {
        let _ = writeln!(
            out,
            "{} {} {} {} {} {}",
            pad(&(i + 1).to_string(), 3),
            pad(&med.name, 24),
            pad(&med.batch, 10),
            pad(&med.expiry, 7),
            pad(&med.qty, 8),
            pad_left(&format!("₹ {:.2}", med.amount), 15)
        );
    }
    let _ = writeln!(out, "{}", thin);
    let _ = writeln!(out, "{}", pad_left(&format!("NET : ₹ {:.2}", invoice.price), WIDTH));
    let _ = writeln!(out, "{}", rule);
    for line in FOOTER {
        let _ = writeln!(out, "{}", line);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", pad_left(&format!("For {} STORE", store_name), WIDTH));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", pad_left("Pharmacist", WIDTH));
    out
}

/// Write the printable invoice to `<dir>/<invoice number>.txt`
pub fn write_printable(invoice: &Invoice, store_name: &str, dir: &Path) -> Result<PathBuf> {
    let path = dir.join(format!("{}.txt", invoice.invoice));
    fs::write(&path, printable_invoice(invoice, store_name))
        .with_context(|| format!("Cannot write invoice to {}", path.display()))?;
    info!("Invoice {} written to {}", invoice.invoice, path.display());
    Ok(path)
}

pub struct InvoiceViewScreen {
    pub invoice: Option<Invoice>,
    store_name: String,
}

impl InvoiceViewScreen {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            invoice: None,
            store_name: ctx.config.store_name.clone(),
        }
    }

    pub fn set_invoice(&mut self, invoice: Invoice) {
        self.invoice = Some(invoice);
    }

    fn draw_invoice(&self, f: &mut Frame, area: Rect, invoice: &Invoice) {
        let block = Block::default()
            .title("Tax Invoice / Cash Memo")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Store and invoice details
                Constraint::Min(3),    // Medicines
                Constraint::Length(1), // Net
                Constraint::Length(4), // Footer
            ])
            .split(inner);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[0]);
        f.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(self.store_name.clone(), Styles::title())),
                Line::from(STORE_ADDRESS),
            ]),
            header[0],
        );
        f.render_widget(
            Paragraph::new(vec![
                Line::from(format!("Invoice No: {}", invoice.invoice)),
                Line::from(format!("Date: {}", invoice.date.format(DATE_FORMAT))),
                Line::from(format!("Patient: {}", invoice.patient)),
            ])
            .alignment(Alignment::Right),
            header[1],
        );

        let rows: Vec<Row> = invoice
            .medicines
            .iter()
            .enumerate()
            .map(|(i, med)| {
                Row::new(vec![
                    (i + 1).to_string(),
                    med.name.clone(),
                    med.batch.clone(),
                    med.expiry.clone(),
                    med.qty.clone(),
                    format!("₹ {:.2}", med.amount),
                ])
            })
            .collect();
        let medicines = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Min(16),
                Constraint::Length(10),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(12),
            ],
        )
        .header(
            Row::new(vec!["Sr No", "Particulars", "Batch No", "Expiry", "Qty", "Amount"])
                .style(Styles::info()),
        )
        .block(Block::default().borders(Borders::ALL).border_style(Styles::inactive_border()));
        f.render_widget(medicines, chunks[1]);

        f.render_widget(
            Paragraph::new(Span::styled(format!("NET : ₹ {:.2}", invoice.price), Styles::title()))
                .alignment(Alignment::Right),
            chunks[2],
        );

        let mut footer: Vec<Line> = FOOTER.iter().map(|l| Line::from(Span::styled(*l, Styles::inactive()))).collect();
        footer.push(Line::from(Span::styled("p: write printable copy   Esc: back", Styles::info())));
        f.render_widget(Paragraph::new(footer), chunks[3]);
    }
}

impl ScreenTrait for InvoiceViewScreen {
    fn draw(&mut self, f: &mut Frame, area: Rect) {
        match self.invoice {
            Some(ref invoice) => self.draw_invoice(f, area, invoice),
            None => f.render_widget(
                Paragraph::new("No invoice selected")
                    .style(Styles::inactive())
                    .block(Block::default().borders(Borders::ALL)),
                area,
            ),
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent, ctx: &mut AppContext) -> Result<ScreenAction> {
        match key.code {
            KeyCode::Esc => Ok(ScreenAction::NavigateTo(Screen::Invoices)),
            KeyCode::Char('p') => {
                let Some(ref invoice) = self.invoice else {
                    return Ok(ScreenAction::None);
                };
                let path = write_printable(invoice, &self.store_name, &ctx.config.export_dir)?;
                Ok(ScreenAction::SetStatus(format!("Invoice written to {}", path.display())))
            }
            _ => Ok(ScreenAction::None),
        }
    }

    fn help_text(&self) -> &'static str {
        "Tax Invoice:\n\
        p - Write a printable copy\n\
        Esc - Back to invoices"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use tempfile::TempDir;

    #[test]
    fn test_printable_invoice_lists_medicines_and_net() {
        let invoice = seed::invoices().remove(0);
        let text = printable_invoice(&invoice, "MEDIPLUS MEDICAL & GENERAL");
        assert!(text.contains("Tax Invoice / Cash Memo"));
        assert!(text.contains("Invoice No: INV-001"));
        assert!(text.contains("Date: 15-08-2026"));
        assert!(text.contains("Pantosec D"));
        assert!(text.contains("₹ 91.20"));
        assert!(text.contains("NET : ₹ 2500.00"));
        assert!(text.contains("For MEDIPLUS MEDICAL & GENERAL STORE"));
    }

    #[test]
    fn test_write_printable_names_file_after_invoice() {
        let dir = TempDir::new().unwrap();
        let invoice = seed::invoices().remove(1);
        let path = write_printable(&invoice, "Shop", dir.path()).unwrap();
        assert_eq!(path, dir.path().join("INV-002.txt"));
        assert!(fs::read_to_string(path).unwrap().contains("Priya Singh"));
    }
}
