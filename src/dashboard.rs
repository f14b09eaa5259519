//! Dashboard figures, the weekly sales chart and the downloadable report

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveDateTime};
use rand::Rng;
use tracing::info;

use crate::billing::{InventorySummary, SalesPeriod, SalesSummary};
use crate::models::{format_rupees, Category, Distributor, InventoryItem, Invoice, InvoiceStatus, Sale};

pub const CHART_LABELS: [&str; 6] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const CHART_BASE: [u64; 6] = [6000, 10000, 30000, 10000, 15000, 16000];
pub const CHART_MAX: u64 = 45000;
const CHART_RANDOM_MIN: u64 = 5000;
const CHART_RANDOM_MAX: u64 = 35000;

/// Weekly sales bars. Refreshed with random values on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub values: [u64; 6],
}

impl Default for ChartSeries {
    fn default() -> Self {
        Self { values: CHART_BASE }
    }
}

impl ChartSeries {
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for v in self.values.iter_mut() {
            *v = rng.gen_range(CHART_RANDOM_MIN..CHART_RANDOM_MAX);
        }
    }

    pub fn bars(&self) -> Vec<(&'static str, u64)> {
        CHART_LABELS.iter().copied().zip(self.values).collect()
    }
}

/// Period picked in the graph report selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GraphPeriod {
    Today,
    SixDays,
    #[default]
    ThisMonth,
}

impl GraphPeriod {
    pub const ALL: [GraphPeriod; 3] = [GraphPeriod::Today, GraphPeriod::SixDays, GraphPeriod::ThisMonth];

    pub fn label(&self) -> &'static str {
        match self {
            GraphPeriod::Today => "Today",
            GraphPeriod::SixDays => "6 Days",
            GraphPeriod::ThisMonth => "This Month",
        }
    }

    pub fn next(self) -> Self {
        let pos = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

/// Percentage shares shown in the graph report, one set per period
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockBreakdown {
    pub purchases: u64,
    pub suppliers: u64,
    pub sales: u64,
    pub no_sales: u64,
}

impl StockBreakdown {
    pub fn for_period(period: GraphPeriod) -> Self {
        let (purchases, suppliers, sales, no_sales) = match period {
            GraphPeriod::Today => (20, 30, 25, 25),
            GraphPeriod::SixDays => (35, 25, 30, 10),
            GraphPeriod::ThisMonth => (42, 28, 18, 12),
        };
        Self {
            purchases,
            suppliers,
            sales,
            no_sales,
        }
    }

    /// Sum of the shares, printed in the middle of the chart
    pub fn total(&self) -> u64 {
        self.purchases + self.suppliers + self.sales + self.no_sales
    }

    pub fn segments(&self) -> [(&'static str, u64); 4] {
        [
            ("Purchases", self.purchases),
            ("Suppliers", self.suppliers),
            ("Sales", self.sales),
            ("No Sales", self.no_sales),
        ]
    }

    /// Share of `value` in the total, 0 when there is nothing to share
    pub fn ratio(&self, value: u64) -> f64 {
        match self.total() {
            0 => 0.0,
            total => value as f64 / total as f64,
        }
    }
}

/// The four headline cards
#[derive(Debug, Clone, PartialEq)]
pub struct StatCards {
    pub total_revenue: f64,
    pub inventory_status: &'static str,
    pub medicines_available: usize,
    pub medicine_shortage: usize,
}

impl StatCards {
    pub fn compute(invoices: &[Invoice], sales: &[Sale], inventory: &[InventoryItem], low_stock_threshold: u32) -> Self {
        let paid: f64 = invoices
            .iter()
            .filter(|i| i.status == InvoiceStatus::Paid)
            .map(|i| i.price)
            .sum();
        let sold: f64 = sales.iter().map(|s| s.total_price).sum();
        let summary = InventorySummary::from_items(inventory, low_stock_threshold);

        Self {
            total_revenue: paid + sold,
            inventory_status: if summary.low_stock == 0 { "Good" } else { "Low" },
            medicines_available: inventory
                .iter()
                .filter(|i| i.category == Category::Medicine)
                .count(),
            medicine_shortage: summary.low_stock,
        }
    }
}

/// Quick report card for one sales period
#[derive(Debug, Clone, PartialEq)]
pub struct QuickReport {
    pub period: SalesPeriod,
    pub medicines_sold: u32,
    pub invoices_generated: usize,
    pub suppliers: usize,
}

impl QuickReport {
    pub fn compute(
        period: SalesPeriod,
        sales: &[Sale],
        invoices: &[Invoice],
        distributors: &[Distributor],
        today: NaiveDate,
    ) -> Self {
        let invoices_generated = invoices
            .iter()
            .filter(|i| period.matches(i.date, today))
            .count();
        Self {
            period,
            medicines_sold: SalesSummary::for_period(sales, period, today).quantity,
            invoices_generated,
            suppliers: distributors.len(),
        }
    }
}

const RULE: &str = "═══════════════════════════════════════════════════";
const THIN_RULE: &str = "───────────────────────────────────────────────────";

/// Plain-text dashboard report, as downloaded from the dashboard
pub struct DashboardReport<'a> {
    pub cards: &'a StatCards,
    pub store_name: &'a str,
    pub generated: NaiveDateTime,
}

impl fmt::Display for DashboardReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cards = self.cards;
        let revenue = format_rupees(cards.total_revenue);
        writeln!(f, "{}", RULE)?;
        writeln!(f, "          INVENTORY DASHBOARD REPORT")?;
        writeln!(f, "          {}", self.store_name)?;
        writeln!(f, "{}\n", RULE)?;
        writeln!(f, "Generated On: {}\n", self.generated.format("%d-%m-%Y %H:%M:%S"))?;
        section(f, "QUICK STATISTICS")?;
        writeln!(f, "- Total Revenue: {}", revenue)?;
        writeln!(f, "- Inventory Status: {}", cards.inventory_status)?;
        writeln!(f, "- Medicines Available: {}", cards.medicines_available)?;
        writeln!(f, "- Medicine Shortage: {:02}\n", cards.medicine_shortage)?;
        section(f, "DETAILED SUMMARY")?;
        writeln!(f, "Total Revenue: {}", revenue)?;
        writeln!(f, "Inventory Status: {}", cards.inventory_status)?;
        writeln!(f, "Available Medicines: {} types", cards.medicines_available)?;
        writeln!(
            f,
            "Critical Shortage: {} medicine{}\n",
            cards.medicine_shortage,
            if cards.medicine_shortage == 1 { "" } else { "s" }
        )?;
        writeln!(f, "{}", RULE)
    }
}

fn section(f: &mut fmt::Formatter<'_>, heading: &str) -> fmt::Result {
    writeln!(f, "{}", THIN_RULE)?;
    writeln!(f, "                 {}", heading)?;
    writeln!(f, "{}\n", THIN_RULE)
}

pub fn render_report(cards: &StatCards, store_name: &str, generated: NaiveDateTime) -> String {
    DashboardReport {
        cards,
        store_name,
        generated,
    }
    .to_string()
}

/// Default file name for a report generated at `now`
pub fn report_file_name(now: NaiveDateTime) -> String {
    format!("Dashboard_Report_{}.txt", now.format("%Y-%m-%d"))
}

pub fn write_report(cards: &StatCards, store_name: &str, path: &Path) -> Result<()> {
    let body = render_report(cards, store_name, Local::now().naive_local());
    fs::write(path, body).with_context(|| format!("Cannot write report to {}", path.display()))?;
    info!("Dashboard report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    #[test]
    fn test_chart_randomize_stays_in_range() {
        let mut chart = ChartSeries::default();
        assert_eq!(chart.values, CHART_BASE);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            chart.randomize(&mut rng);
            assert!(chart.values.iter().all(|v| (5000..35000).contains(v)));
        }
        assert_eq!(chart.bars()[0].0, "Mon");
    }

    #[test]
    fn test_graph_period_cycles_and_totals() {
        let mut period = GraphPeriod::default();
        assert_eq!(period, GraphPeriod::ThisMonth);
        let mut seen = Vec::new();
        for _ in 0..3 {
            period = period.next();
            seen.push(period.label());
            assert_eq!(StockBreakdown::for_period(period).total(), 100);
        }
        assert_eq!(seen, vec!["Today", "6 Days", "This Month"]);

        let month = StockBreakdown::for_period(GraphPeriod::ThisMonth);
        assert_eq!(month.segments()[0], ("Purchases", 42));
        assert_eq!(month.segments()[3], ("No Sales", 12));
        assert_eq!(month.ratio(month.sales), 0.18);
        assert_eq!(StockBreakdown::for_period(GraphPeriod::SixDays).no_sales, 10);
    }

    #[test]
    fn test_empty_breakdown_has_zero_ratio() {
        let empty = StockBreakdown {
            purchases: 0,
            suppliers: 0,
            sales: 0,
            no_sales: 0,
        };
        assert_eq!(empty.total(), 0);
        assert_eq!(empty.ratio(0), 0.0);
    }

    #[test]
    fn test_stat_cards_from_seed() {
        let cards = StatCards::compute(&seed::invoices(), &seed::sales(), &seed::inventory(), 100);
        assert_eq!(cards.total_revenue, 4000.0 + 2338.0);
        assert_eq!(cards.medicines_available, 3);
        assert_eq!(cards.medicine_shortage, 1);
        assert_eq!(cards.inventory_status, "Low");
    }

    #[test]
    fn test_quick_report_counts_period_sales() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 6).unwrap();
        let report = QuickReport::compute(SalesPeriod::ThisMonth, &seed::sales(), &seed::invoices(), &[], today);
        assert_eq!(report.medicines_sold, 18);
        assert_eq!(report.invoices_generated, 0);
        assert_eq!(report.suppliers, 0);
    }

    #[test]
    fn test_report_layout() {
        let cards = StatCards {
            total_revenue: 230847.0,
            inventory_status: "Good",
            medicines_available: 298,
            medicine_shortage: 1,
        };
        let generated = NaiveDate::from_ymd_opt(2026, 1, 6)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let text = render_report(&cards, "MEDIPLUS", generated);
        assert!(text.contains("INVENTORY DASHBOARD REPORT"));
        assert!(text.contains("Generated On: 06-01-2026 09:30:00"));
        assert!(text.contains("- Total Revenue: ₹ 230,847"));
        assert!(text.contains("- Medicine Shortage: 01"));
        assert!(text.contains("Critical Shortage: 1 medicine\n"));
        assert_eq!(report_file_name(generated), "Dashboard_Report_2026-01-06.txt");
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        let cards = StatCards::compute(&[], &[], &[], 100);
        write_report(&cards, "MEDIPLUS", &path).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("Inventory Status: Good"));
    }
}
