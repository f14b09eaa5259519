//! Demo data the application starts with

use chrono::NaiveDate;

use crate::models::{Category, Invoice, InvoiceStatus, InventoryItem, MedicineItem, Sale};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn medicine(name: &str) -> MedicineItem {
    MedicineItem {
        name: name.to_string(),
        batch: "14044008".to_string(),
        expiry: "10/26".to_string(),
        qty: "6xTAB".to_string(),
        amount: 91.2,
    }
}

fn second_medicine(name: &str) -> MedicineItem {
    MedicineItem {
        name: name.to_string(),
        batch: "1405019".to_string(),
        expiry: "09/26".to_string(),
        qty: "6xTAB".to_string(),
        amount: 102.0,
    }
}

fn invoice(
    number: &str,
    patient: &str,
    date: NaiveDate,
    price: f64,
    status: InvoiceStatus,
    (first, second): (&str, &str),
) -> Invoice {
    Invoice {
        invoice: number.to_string(),
        patient: patient.to_string(),
        date,
        price,
        status,
        medicines: vec![medicine(first), second_medicine(second)],
    }
}

pub fn invoices() -> Vec<Invoice> {
    vec![
        invoice("INV-001", "Rajesh Kumar", date(2026, 8, 15), 2500.0, InvoiceStatus::Paid, ("Pantosec D", "Nucoxia PY")),
        invoice("INV-002", "Priya Singh", date(2026, 12, 20), 5400.0, InvoiceStatus::Pending, ("Pantosec DO", "Nucoxia P")),
        invoice("INV-003", "Amit Verma", date(2026, 6, 30), 1500.0, InvoiceStatus::Paid, ("Pantosec DD", "Nucoxia P")),
        invoice("INV-004", "Sneha Reddy", date(2027, 3, 1), 8200.0, InvoiceStatus::Overdue, ("Pantosec D", "Nucoxia X")),
        invoice("INV-005", "Vikram Rao", date(2027, 1, 15), 3200.0, InvoiceStatus::Pending, ("Pantosec A", "Nucoxia x")),
    ]
}

pub fn inventory() -> Vec<InventoryItem> {
    let item = |id, name: &str, category, stock: &str, price, supplier: &str, expiry| InventoryItem {
        id,
        item: name.to_string(),
        category,
        stock: stock.to_string(),
        price,
        supplier: supplier.to_string(),
        expiry_date: expiry,
    };
    vec![
        item(1, "Paracetamol 500mg", Category::Medicine, "450 Tablets", 2.0, "MediSupply Co.", date(2026, 8, 15)),
        item(2, "Amoxicillin", Category::Medicine, "120 Capsules", 15.0, "PharmaCare Ltd.", date(2026, 12, 20)),
        item(3, "Insulin Injection", Category::Medicine, "85 Vials", 250.0, "MediSupply Co.", date(2026, 6, 30)),
        item(4, "Surgical Gloves", Category::Supplies, "1500 Pairs", 5.0, "MedEquip Inc.", date(2027, 3, 1)),
        item(5, "Syringes (5ml)", Category::Supplies, "850 Units", 3.0, "MedEquip Inc.", date(2027, 1, 15)),
    ]
}

pub fn sales() -> Vec<Sale> {
    let sale = |id, name: &str, medicine: &str, quantity, total_price, date, time: &str| Sale {
        id,
        name: name.to_string(),
        medicine: medicine.to_string(),
        quantity,
        total_price,
        date,
        time: time.to_string(),
    };
    vec![
        sale(1, "Kishor Kedar", "Medicine Two", 1, 152.0, date(2026, 1, 5), "10:00AM"),
        sale(2, "Rohit Raut", "Paracetamol", 5, 57.0, date(2026, 1, 5), "11:00AM"),
        sale(3, "Smita Rao", "Honitus", 1, 125.0, date(2026, 1, 4), "04:00PM"),
        sale(4, "Shilpa Rathod", "Eladi", 1, 160.0, date(2026, 1, 3), "12:00PM"),
        sale(5, "Kanta Jain", "Insulin", 10, 1799.0, date(2026, 1, 1), "10:00AM"),
        sale(6, "Amit Sharma", "Aspirin", 3, 45.0, date(2025, 12, 30), "02:00PM"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_sizes() {
        assert_eq!(invoices().len(), 5);
        assert_eq!(inventory().len(), 5);
        assert_eq!(sales().len(), 6);
    }

    #[test]
    fn test_seed_invoice_numbers_are_unique() {
        let mut numbers: Vec<_> = invoices().into_iter().map(|i| i.invoice).collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 5);
    }
}
