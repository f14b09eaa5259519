//! Column schemas and table views for each data set

use std::num::NonZeroUsize;

use crate::models::{format_rupees, Distributor, DistributorStatus, InventoryItem, Invoice, InvoiceStatus, Sale};
use crate::table::{Column, DropdownSpec, RowAction, TableError, TableView};

pub type InvoiceTable = TableView<Invoice, String>;
pub type DistributorTable = TableView<Distributor, String>;
pub type InventoryTable = TableView<InventoryItem, u32>;
pub type SalesTable = TableView<Sale, u32>;

pub fn invoice_table(invoices: Vec<Invoice>, page_size: NonZeroUsize) -> Result<InvoiceTable, TableError> {
    let columns = vec![
        Column::field("invoice", "Invoice"),
        Column::field("patient", "Patient"),
        Column::field("date", "Date"),
        Column::field("price", "Price").with_render(|i: &Invoice| format_rupees(i.price)),
        Column::dropdown("Status"),
        Column::actions("Action"),
    ];
    let statuses = InvoiceStatus::ALL.map(|s| s.as_str().to_string());
    Ok(TableView::new(invoices, columns, |i: &Invoice, _| i.invoice.clone())?
        .with_page_size(page_size)
        .with_search()
        .with_export()
        .with_selection()
        .with_dropdown(DropdownSpec::from_values("status", statuses.iter().map(String::as_str)))
        .with_actions([RowAction::View, RowAction::Print, RowAction::Download]))
}

pub fn distributor_table(
    distributors: Vec<Distributor>,
    page_size: NonZeroUsize,
) -> Result<DistributorTable, TableError> {
    let columns = vec![
        Column::field("companyName", "Company Name"),
        Column::field("email", "Email"),
        Column::field("mobile", "Phone"),
        Column::field("date", "Date"),
        Column::field("address", "Address"),
        Column::dropdown("Status"),
        Column::actions("Action"),
    ];
    let statuses = DistributorStatus::ALL.map(|s| s.as_str().to_string());
    Ok(TableView::new(distributors, columns, |d: &Distributor, _| d.email.clone())?
        .with_page_size(page_size)
        .with_search()
        .with_export()
        .with_selection()
        .with_dropdown(DropdownSpec::from_values("status", statuses.iter().map(String::as_str)))
        .with_actions([RowAction::Delete]))
}

pub fn inventory_table(
    items: Vec<InventoryItem>,
    page_size: NonZeroUsize,
    low_stock_threshold: u32,
) -> Result<InventoryTable, TableError> {
    let columns = vec![
        Column::field("item", "Item"),
        Column::field("category", "Category"),
        Column::field("stock", "Stock"),
        Column::field("price", "Price").with_render(|i: &InventoryItem| format_rupees(i.price)),
        Column::field("supplier", "Supplier"),
        Column::field("expiryDate", "Expiry Date"),
        Column::field("status", "Status")
            .with_render(move |i: &InventoryItem| i.stock_status(low_stock_threshold).to_string())
            .not_exportable(),
    ];
    Ok(TableView::new(items, columns, |i: &InventoryItem, _| i.id)?
        .with_page_size(page_size)
        .with_search()
        .with_export()
        .with_selection())
}

pub fn sales_table(sales: Vec<Sale>, page_size: NonZeroUsize) -> Result<SalesTable, TableError> {
    let columns = vec![
        Column::field("name", "Name"),
        Column::field("medicine", "Medicine"),
        Column::field("quantity", "Qty"),
        Column::field("totalPrice", "Price").with_render(|s: &Sale| format_rupees(s.total_price)),
        Column::field("date", "Date"),
        Column::field("time", "Time"),
        Column::actions("Actions"),
    ];
    Ok(TableView::new(sales, columns, |s: &Sale, _| s.id)?
        .with_page_size(page_size)
        .with_selection()
        .with_actions([RowAction::Edit, RowAction::Delete]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use crate::table::Cell;

    #[test]
    fn test_invoice_table_schema() {
        let table = invoice_table(seed::invoices(), NonZeroUsize::new(5).unwrap()).unwrap();
        let export = table.export();
        assert_eq!(export.headers, vec!["Invoice", "Patient", "Date", "Price"]);
        let rows = table.page_rows();
        assert_eq!(rows[0].id, "INV-001");
        assert_eq!(rows[0].cells[3].text(), "₹ 2,500");
        assert_eq!(rows[0].cells[4], Cell::Dropdown { value: "Paid".to_string() });
        assert_eq!(
            rows[0].cells[5],
            Cell::Actions(vec![RowAction::View, RowAction::Download, RowAction::Print])
        );
    }

    #[test]
    fn test_inventory_status_column_is_not_exported() {
        let table = inventory_table(seed::inventory(), NonZeroUsize::new(5).unwrap(), 100).unwrap();
        assert!(!table.export().headers.contains(&"Status".to_string()));
        let insulin = table.page_rows().into_iter().find(|r| r.id == 3).unwrap();
        assert_eq!(insulin.cells[6].text(), "Low Stock");
    }

    #[test]
    fn test_sales_table_pages_by_five() {
        let table = sales_table(seed::sales(), NonZeroUsize::new(5).unwrap()).unwrap();
        assert_eq!(table.page_count(), 2);
        assert!(!table.options().search);
    }
}
