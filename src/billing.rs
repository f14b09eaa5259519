//! Billing rules: drafts and their validation, period filters and summaries

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};
use thiserror::Error;
use tracing::info;

use crate::models::{
    Distributor, DistributorStatus, InventoryItem, Invoice, InvoiceStatus, MedicineItem, Sale,
};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("'{0}' is not a valid email address")]
    InvalidEmail(String),

    #[error("'{0}' is not a valid 10-digit mobile number")]
    InvalidMobile(String),

    #[error("{field} must be a number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("'{0}' is not a valid date (expected DD-MM-YYYY)")]
    InvalidDate(String),

    #[error("an invoice needs at least one item")]
    NoItems,

    #[error("a distributor with email '{0}' already exists")]
    DuplicateEmail(String),
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(FormError::Required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse DD-MM-YYYY, also accepting ISO YYYY-MM-DD
pub fn parse_date(value: &str) -> Result<NaiveDate, FormError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, crate::models::DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y-%m-%d"))
        .map_err(|_| FormError::InvalidDate(value.to_string()))
}

pub fn parse_number<T: std::str::FromStr>(value: &str, field: &'static str) -> Result<T, FormError> {
    value.trim().parse().map_err(|_| FormError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

// ---- invoices ----

#[derive(Debug, Clone, PartialEq)]
pub struct DraftItem {
    pub item: String,
    pub qty: u32,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub patient: String,
    pub date: NaiveDate,
    pub status: InvoiceStatus,
    pub items: Vec<DraftItem>,
}

impl InvoiceDraft {
    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| f64::from(i.qty) * i.price).sum()
    }

    pub fn validate(&self) -> Result<(), FormError> {
        required(&self.patient, "Patient Name")?;
        if self.items.is_empty() {
            return Err(FormError::NoItems);
        }
        for item in &self.items {
            required(&item.item, "Item")?;
            if item.qty == 0 {
                return Err(FormError::InvalidNumber {
                    field: "Qty",
                    value: item.qty.to_string(),
                });
            }
            if item.price.is_nan() || item.price < 0.0 {
                return Err(FormError::InvalidNumber {
                    field: "Price",
                    value: item.price.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate and turn the draft into an invoice numbered `number`
    pub fn into_invoice(self, number: String) -> Result<Invoice, FormError> {
        self.validate()?;
        let price = self.total();
        Ok(Invoice {
            invoice: number,
            patient: self.patient.trim().to_string(),
            date: self.date,
            price,
            status: self.status,
            medicines: self
                .items
                .into_iter()
                .map(|item| MedicineItem {
                    name: item.item.trim().to_string(),
                    batch: "-".to_string(),
                    expiry: "-".to_string(),
                    qty: item.qty.to_string(),
                    amount: item.price,
                })
                .collect(),
        })
    }
}

pub fn next_invoice_number(now: DateTime<Local>) -> String {
    format!("INV-{}", now.timestamp_millis())
}

/// Prepend `invoice` unless its number is already taken. Returns whether it
/// was added.
pub fn add_invoice(invoices: &mut Vec<Invoice>, invoice: Invoice) -> bool {
    if invoices.iter().any(|i| i.invoice == invoice.invoice) {
        return false;
    }
    info!("Adding invoice {}", invoice.invoice);
    invoices.insert(0, invoice);
    true
}

pub fn remove_invoices(invoices: &mut Vec<Invoice>, numbers: &[String]) -> usize {
    let before = invoices.len();
    invoices.retain(|i| !numbers.contains(&i.invoice));
    before - invoices.len()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvoicePeriod {
    All,
    Daily,
    Monthly,
    Yearly,
}

impl InvoicePeriod {
    pub const ALL: [InvoicePeriod; 4] = [
        InvoicePeriod::All,
        InvoicePeriod::Daily,
        InvoicePeriod::Monthly,
        InvoicePeriod::Yearly,
    ];

    pub fn label(&self) -> &str {
        match self {
            InvoicePeriod::All => "All",
            InvoicePeriod::Daily => "Daily",
            InvoicePeriod::Monthly => "Monthly",
            InvoicePeriod::Yearly => "Yearly",
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            InvoicePeriod::All => true,
            InvoicePeriod::Daily => date == today,
            InvoicePeriod::Monthly => date.month() == today.month() && date.year() == today.year(),
            InvoicePeriod::Yearly => date.year() == today.year(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InvoiceSummary {
    pub revenue_paid: f64,
    pub pending_amount: f64,
    pub count: usize,
}

impl InvoiceSummary {
    pub fn from_invoices(invoices: &[Invoice]) -> Self {
        invoices.iter().fold(Self::default(), |mut acc, inv| {
            match inv.status {
                InvoiceStatus::Paid => acc.revenue_paid += inv.price,
                InvoiceStatus::Pending | InvoiceStatus::Overdue => acc.pending_amount += inv.price,
            }
            acc.count += 1;
            acc
        })
    }
}

// ---- sales ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SalesPeriod {
    Today,
    SixDays,
    ThisMonth,
    All,
}

impl SalesPeriod {
    pub const ALL: [SalesPeriod; 4] = [
        SalesPeriod::Today,
        SalesPeriod::SixDays,
        SalesPeriod::ThisMonth,
        SalesPeriod::All,
    ];

    pub fn label(&self) -> &str {
        match self {
            SalesPeriod::Today => "Today",
            SalesPeriod::SixDays => "6 Days",
            SalesPeriod::ThisMonth => "This Month",
            SalesPeriod::All => "All",
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }

    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            SalesPeriod::Today => date == today,
            SalesPeriod::SixDays => date <= today && date >= today - Duration::days(5),
            SalesPeriod::ThisMonth => date.month() == today.month() && date.year() == today.year(),
            SalesPeriod::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SalesSummary {
    pub quantity: u32,
    pub revenue: f64,
    pub count: usize,
}

impl SalesSummary {
    pub fn for_period(sales: &[Sale], period: SalesPeriod, today: NaiveDate) -> Self {
        sales
            .iter()
            .filter(|s| period.matches(s.date, today))
            .fold(Self::default(), |mut acc, s| {
                acc.quantity += s.quantity;
                acc.revenue += s.total_price;
                acc.count += 1;
                acc
            })
    }
}

/// Replace the sale with the same id. When the edited sale falls outside
/// `period`, widen the period to `All` so it stays visible. Returns false
/// when no sale has that id.
pub fn apply_sale_edit(sales: &mut [Sale], edited: Sale, period: &mut SalesPeriod, today: NaiveDate) -> bool {
    let Some(slot) = sales.iter_mut().find(|s| s.id == edited.id) else {
        return false;
    };
    if !period.matches(edited.date, today) {
        *period = SalesPeriod::All;
    }
    *slot = edited;
    true
}

/// Text of the sale edit form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaleDraft {
    pub name: String,
    pub medicine: String,
    pub quantity: String,
    pub total_price: String,
    pub date: String,
    pub time: String,
}

impl SaleDraft {
    pub fn from_sale(sale: &Sale) -> Self {
        Self {
            name: sale.name.clone(),
            medicine: sale.medicine.clone(),
            quantity: sale.quantity.to_string(),
            total_price: sale.total_price.to_string(),
            date: sale.date.format(crate::models::DATE_FORMAT).to_string(),
            time: sale.time.clone(),
        }
    }

    pub fn into_sale(self, id: u32) -> Result<Sale, FormError> {
        let name = required(&self.name, "Name")?;
        let medicine = required(&self.medicine, "Medicine")?;
        let quantity: u32 = parse_number(&required(&self.quantity, "Quantity")?, "Quantity")?;
        let total_price: f64 = parse_number(&required(&self.total_price, "Total Price")?, "Total Price")?;
        if total_price.is_nan() || total_price < 0.0 {
            return Err(FormError::InvalidNumber {
                field: "Total Price",
                value: self.total_price,
            });
        }
        Ok(Sale {
            id,
            name,
            medicine,
            quantity,
            total_price,
            date: parse_date(&required(&self.date, "Date")?)?,
            time: required(&self.time, "Time")?,
        })
    }
}

// ---- inventory ----

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InventorySummary {
    pub total_items: usize,
    pub low_stock: usize,
    pub total_value: f64,
}

impl InventorySummary {
    pub fn from_items(items: &[InventoryItem], low_stock_threshold: u32) -> Self {
        Self {
            total_items: items.len(),
            low_stock: items
                .iter()
                .filter(|i| i.stock_count().is_some_and(|n| n < low_stock_threshold))
                .count(),
            total_value: items.iter().map(|i| i.price).sum(),
        }
    }
}

// ---- distributors ----

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistributorDraft {
    pub company_name: String,
    pub email: String,
    pub mobile: String,
    pub date: String,
    pub address: String,
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !email.contains(char::is_whitespace)
}

impl DistributorDraft {
    pub fn into_distributor(self) -> Result<Distributor, FormError> {
        let company_name = required(&self.company_name, "Company Name")?;
        let email = required(&self.email, "Email")?;
        if !is_valid_email(&email) {
            return Err(FormError::InvalidEmail(email));
        }
        let mobile = required(&self.mobile, "Mobile")?;
        if mobile.len() != 10 || !mobile.chars().all(|c| c.is_ascii_digit()) {
            return Err(FormError::InvalidMobile(mobile));
        }
        let date = parse_date(&required(&self.date, "Date")?)?;
        let address = required(&self.address, "Address")?;

        Ok(Distributor {
            company_name,
            email,
            mobile,
            date,
            address,
            status: DistributorStatus::Active,
        })
    }
}

/// Validate `draft` and append it, rejecting an email that is already used
pub fn add_distributor(
    distributors: &mut Vec<Distributor>,
    draft: DistributorDraft,
) -> Result<(), FormError> {
    let distributor = draft.into_distributor()?;
    if distributors
        .iter()
        .any(|d| d.email.eq_ignore_ascii_case(&distributor.email))
    {
        return Err(FormError::DuplicateEmail(distributor.email));
    }
    info!("Adding distributor {}", distributor.company_name);
    distributors.push(distributor);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> InvoiceDraft {
        InvoiceDraft {
            patient: " Meera Nair ".to_string(),
            date: day(2026, 1, 6),
            status: InvoiceStatus::Pending,
            items: vec![
                DraftItem { item: "Dolo 650".to_string(), qty: 2, price: 30.0 },
                DraftItem { item: "ORS".to_string(), qty: 3, price: 21.5 },
            ],
        }
    }

    #[test]
    fn test_draft_becomes_invoice() {
        let invoice = draft().into_invoice("INV-9".to_string()).unwrap();
        assert_eq!(invoice.price, 124.5);
        assert_eq!(invoice.patient, "Meera Nair");
        assert_eq!(invoice.medicines.len(), 2);
        assert_eq!(invoice.medicines[1].qty, "3");
        assert_eq!(invoice.medicines[0].batch, "-");
    }

    #[test]
    fn test_draft_validation() {
        let mut d = draft();
        d.patient = "  ".to_string();
        assert_eq!(d.validate(), Err(FormError::Required("Patient Name")));

        let mut d = draft();
        d.items.clear();
        assert_eq!(d.validate(), Err(FormError::NoItems));

        let mut d = draft();
        d.items[0].qty = 0;
        assert!(matches!(d.validate(), Err(FormError::InvalidNumber { field: "Qty", .. })));
    }

    #[test]
    fn test_add_invoice_prepends_and_skips_duplicates() {
        let mut invoices = seed::invoices();
        let new = draft().into_invoice("INV-100".to_string()).unwrap();
        assert!(add_invoice(&mut invoices, new.clone()));
        assert_eq!(invoices[0].invoice, "INV-100");
        assert!(!add_invoice(&mut invoices, new));
        assert_eq!(invoices.len(), 6);
    }

    #[test]
    fn test_invoice_summary() {
        let summary = InvoiceSummary::from_invoices(&seed::invoices());
        assert_eq!(summary.revenue_paid, 4000.0);
        assert_eq!(summary.pending_amount, 16800.0);
        assert_eq!(summary.count, 5);
    }

    #[test]
    fn test_invoice_periods() {
        let today = day(2026, 8, 15);
        assert!(InvoicePeriod::Daily.matches(day(2026, 8, 15), today));
        assert!(InvoicePeriod::Monthly.matches(day(2026, 8, 1), today));
        assert!(!InvoicePeriod::Monthly.matches(day(2025, 8, 1), today));
        assert!(InvoicePeriod::Yearly.matches(day(2026, 1, 1), today));
        assert_eq!(InvoicePeriod::Yearly.next(), InvoicePeriod::All);
    }

    #[test]
    fn test_sales_periods() {
        let today = day(2026, 1, 6);
        let sales = seed::sales();
        let six_days = SalesSummary::for_period(&sales, SalesPeriod::SixDays, today);
        assert_eq!(six_days.count, 5);
        let month = SalesSummary::for_period(&sales, SalesPeriod::ThisMonth, today);
        assert_eq!(month.quantity, 18);
        assert_eq!(SalesSummary::for_period(&sales, SalesPeriod::Today, today).count, 0);
    }

    #[test]
    fn test_sale_edit_out_of_period_widens_filter() {
        let today = day(2026, 1, 6);
        let mut sales = seed::sales();
        let mut period = SalesPeriod::ThisMonth;

        let mut edited = sales[0].clone();
        edited.date = day(2025, 11, 2);
        assert!(apply_sale_edit(&mut sales, edited, &mut period, today));
        assert_eq!(period, SalesPeriod::All);
        assert_eq!(sales[0].date, day(2025, 11, 2));

        let mut ghost = sales[0].clone();
        ghost.id = 99;
        assert!(!apply_sale_edit(&mut sales, ghost, &mut period, today));
    }

    #[test]
    fn test_sale_draft_round_trips_through_form_text() {
        let sale = seed::sales().remove(1);
        let draft = SaleDraft::from_sale(&sale);
        assert_eq!(draft.date, "05-01-2026");
        assert_eq!(draft.into_sale(sale.id).unwrap(), sale);

        let bad = SaleDraft {
            quantity: "five".to_string(),
            ..SaleDraft::from_sale(&sale)
        };
        assert!(matches!(
            bad.into_sale(2),
            Err(FormError::InvalidNumber { field: "Quantity", .. })
        ));
    }

    #[test]
    fn test_inventory_summary() {
        let summary = InventorySummary::from_items(&seed::inventory(), 100);
        assert_eq!(summary.total_items, 5);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.total_value, 275.0);
    }

    fn distributor_draft(email: &str) -> DistributorDraft {
        DistributorDraft {
            company_name: "Acme Pharma".to_string(),
            email: email.to_string(),
            mobile: "9876543210".to_string(),
            date: "05-01-2026".to_string(),
            address: "Shinoli, Pune".to_string(),
        }
    }

    #[test]
    fn test_add_distributor_rejects_duplicate_email() {
        let mut list = Vec::new();
        add_distributor(&mut list, distributor_draft("sales@acme.test")).unwrap();
        assert_eq!(list[0].status, DistributorStatus::Active);
        assert_eq!(
            add_distributor(&mut list, distributor_draft("SALES@acme.test")),
            Err(FormError::DuplicateEmail("SALES@acme.test".to_string()))
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_distributor_validation() {
        assert!(matches!(
            distributor_draft("not-an-email").into_distributor(),
            Err(FormError::InvalidEmail(_))
        ));
        let mut d = distributor_draft("a@b.in");
        d.mobile = "12345".to_string();
        assert!(matches!(d.into_distributor(), Err(FormError::InvalidMobile(_))));
        let mut d = distributor_draft("a@b.in");
        d.date = "31-02-2026".to_string();
        assert!(matches!(d.into_distributor(), Err(FormError::InvalidDate(_))));
    }
}
