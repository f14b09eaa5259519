//! Screen modules for the pharmabill TUI

pub mod dashboard;
pub mod distributors;
pub mod help;
pub mod inventory;
pub mod invoice_view;
pub mod invoices;
pub mod main_menu;

pub use dashboard::DashboardScreen;
pub use distributors::DistributorsScreen;
pub use help::HelpScreen;
pub use inventory::InventoryScreen;
pub use invoice_view::InvoiceViewScreen;
pub use invoices::InvoicesScreen;
pub use main_menu::MainMenuScreen;

use super::components::TableInput;
use super::traits::ScreenAction;

/// Status-bar message for a table key result
fn table_feedback(input: TableInput) -> ScreenAction {
    match input {
        TableInput::Status(message) => ScreenAction::SetStatus(message),
        TableInput::Error(message) => ScreenAction::SetError(message),
        TableInput::Handled | TableInput::Ignored => ScreenAction::None,
    }
}

/// Pending y/n question over a list of row ids
#[derive(Debug, Clone, PartialEq)]
pub struct Confirm<Id> {
    pub message: String,
    pub ids: Vec<Id>,
}

impl<Id> Confirm<Id> {
    pub fn delete(ids: Vec<Id>, noun: &str) -> Self {
        let message = if ids.len() == 1 {
            format!("Delete this {}?", noun)
        } else {
            format!("Delete {} {}s?", ids.len(), noun)
        };
        Self { message, ids }
    }
}
