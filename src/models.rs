use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::table::{Record, Value};

/// Display format for dates in tables, exports and invoices
pub const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvoiceStatus {
    Paid,
    Pending,
    Overdue,
}

impl InvoiceStatus {
    pub const ALL: [InvoiceStatus; 3] = [InvoiceStatus::Paid, InvoiceStatus::Pending, InvoiceStatus::Overdue];

    pub fn as_str(&self) -> &str {
        match self {
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Overdue => "Overdue",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicineItem {
    pub name: String,
    pub batch: String,
    pub expiry: String,
    pub qty: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub invoice: String,
    pub patient: String,
    pub date: NaiveDate,
    pub price: f64,
    pub status: InvoiceStatus,
    pub medicines: Vec<MedicineItem>,
}

impl Record for Invoice {
    fn field(&self, name: &str) -> Value {
        match name {
            "invoice" => Value::from(&self.invoice),
            "patient" => Value::from(&self.patient),
            "date" => self.date.into(),
            "price" => self.price.into(),
            "status" => self.status.as_str().into(),
            "medicines" => Value::from(
                self.medicines
                    .iter()
                    .map(|m| m.name.as_str())
                    .collect::<Vec<_>>(),
            ),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributorStatus {
    Active,
    Inactive,
}

impl DistributorStatus {
    pub const ALL: [DistributorStatus; 2] = [DistributorStatus::Active, DistributorStatus::Inactive];

    pub fn as_str(&self) -> &str {
        match self {
            DistributorStatus::Active => "Active",
            DistributorStatus::Inactive => "Inactive",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distributor {
    pub company_name: String,
    pub email: String,
    pub mobile: String,
    pub date: NaiveDate,
    pub address: String,
    pub status: DistributorStatus,
}

impl Record for Distributor {
    fn field(&self, name: &str) -> Value {
        match name {
            "companyName" => Value::from(&self.company_name),
            "email" => Value::from(&self.email),
            "mobile" => Value::from(&self.mobile),
            "date" => self.date.into(),
            "address" => Value::from(&self.address),
            "status" => self.status.as_str().into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Medicine,
    Supplies,
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Medicine => "Medicine",
            Category::Supplies => "Supplies",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: u32,
    pub item: String,
    pub category: Category,
    /// Quantity with its unit, e.g. "450 Tablets"
    pub stock: String,
    pub price: f64,
    pub supplier: String,
    pub expiry_date: NaiveDate,
}

impl InventoryItem {
    /// Leading count of the stock string ("450 Tablets" -> 450)
    pub fn stock_count(&self) -> Option<u32> {
        self.stock.split_whitespace().next()?.parse().ok()
    }

    pub fn stock_status(&self, low_stock_threshold: u32) -> &'static str {
        match self.stock_count() {
            Some(n) if n < low_stock_threshold => "Low Stock",
            _ => "In Stock",
        }
    }
}

impl Record for InventoryItem {
    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "item" => Value::from(&self.item),
            "category" => self.category.as_str().into(),
            "stock" => Value::from(&self.stock),
            "price" => self.price.into(),
            "supplier" => Value::from(&self.supplier),
            "expiryDate" => self.expiry_date.into(),
            _ => Value::Null,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: u32,
    pub name: String,
    pub medicine: String,
    pub quantity: u32,
    pub total_price: f64,
    pub date: NaiveDate,
    pub time: String,
}

impl Record for Sale {
    fn field(&self, name: &str) -> Value {
        match name {
            "id" => self.id.into(),
            "name" => Value::from(&self.name),
            "medicine" => Value::from(&self.medicine),
            "quantity" => self.quantity.into(),
            "totalPrice" => self.total_price.into(),
            "date" => self.date.into(),
            "time" => Value::from(&self.time),
            _ => Value::Null,
        }
    }
}

/// Data sets reachable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Invoices,
    Distributors,
    Inventory,
    Sales,
}

impl Dataset {
    pub fn as_str(&self) -> &str {
        match self {
            Dataset::Invoices => "invoices",
            Dataset::Distributors => "distributors",
            Dataset::Inventory => "inventory",
            Dataset::Sales => "sales",
        }
    }
}

/// Format an amount the way the invoices print it: "₹ 2,500"
pub fn format_rupees(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0 {
        format!("₹ -{}", grouped)
    } else {
        format!("₹ {}", grouped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(InvoiceStatus::parse("overdue"), Some(InvoiceStatus::Overdue));
        assert_eq!(DistributorStatus::parse("INACTIVE"), Some(DistributorStatus::Inactive));
        assert_eq!(InvoiceStatus::parse("void"), None);
    }

    #[test]
    fn test_stock_count_and_status() {
        let item = InventoryItem {
            id: 3,
            item: "Insulin Injection".to_string(),
            category: Category::Medicine,
            stock: "85 Vials".to_string(),
            price: 250.0,
            supplier: "MediSupply Co.".to_string(),
            expiry_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        };
        assert_eq!(item.stock_count(), Some(85));
        assert_eq!(item.stock_status(100), "Low Stock");
        assert_eq!(item.stock_status(50), "In Stock");
    }

    #[test]
    fn test_format_rupees() {
        assert_eq!(format_rupees(2500.0), "₹ 2,500");
        assert_eq!(format_rupees(230847.0), "₹ 230,847");
        assert_eq!(format_rupees(57.0), "₹ 57");
    }

    #[test]
    fn test_distributor_serializes_like_the_desktop_store() {
        let d = Distributor {
            company_name: "Acme Pharma".to_string(),
            email: "sales@acme.test".to_string(),
            mobile: "9876543210".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            address: "Pune".to_string(),
            status: DistributorStatus::Active,
        };
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["companyName"], "Acme Pharma");
        assert_eq!(json["status"], "Active");
    }
}
