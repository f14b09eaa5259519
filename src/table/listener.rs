//! Notifications raised by the tabular view

use super::column::RowAction;

/// Receives the view's callbacks. Every method defaults to a no-op so callers
/// only implement what they care about.
pub trait TableListener<R> {
    /// Selection changed; `selected` is in record order
    fn on_selection_change(&mut self, _selected: &[&R]) {}

    /// The user asked to delete the selected rows
    fn on_bulk_delete(&mut self, _selected: &[&R]) {}

    fn on_dropdown_change(&mut self, _row: &R, _value: &str) {}

    fn on_row_action(&mut self, _action: RowAction, _row: &R) {}
}

/// Ignores all notifications
impl<R> TableListener<R> for () {}

/// Owned copy of a notification, for callers that handle them after the view
/// call returns.
#[derive(Debug, Clone, PartialEq)]
pub enum TableEvent<R> {
    SelectionChanged(Vec<R>),
    BulkDelete(Vec<R>),
    DropdownChanged { row: R, value: String },
    RowAction { action: RowAction, row: R },
}

impl<R: Clone> TableListener<R> for Vec<TableEvent<R>> {
    fn on_selection_change(&mut self, selected: &[&R]) {
        self.push(TableEvent::SelectionChanged(
            selected.iter().map(|r| (*r).clone()).collect(),
        ));
    }

    fn on_bulk_delete(&mut self, selected: &[&R]) {
        self.push(TableEvent::BulkDelete(
            selected.iter().map(|r| (*r).clone()).collect(),
        ));
    }

    fn on_dropdown_change(&mut self, row: &R, value: &str) {
        self.push(TableEvent::DropdownChanged {
            row: row.clone(),
            value: value.to_string(),
        });
    }

    fn on_row_action(&mut self, action: RowAction, row: &R) {
        self.push(TableEvent::RowAction {
            action,
            row: row.clone(),
        });
    }
}
