//! Column schema for the tabular view

use std::fmt;

/// What a column shows: a record field, or one of the two synthetic cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Field(String),
    /// Row action buttons
    Actions,
    /// Inline drop-down editor
    Dropdown,
}

impl ColumnKey {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, ColumnKey::Field(_))
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            ColumnKey::Field(name) => Some(name),
            _ => None,
        }
    }
}

pub type CellRenderer<R> = Box<dyn Fn(&R) -> String>;

/// A column definition: key, header label, optional renderer and export flag.
pub struct Column<R> {
    pub key: ColumnKey,
    pub label: String,
    pub exportable: bool,
    render: Option<CellRenderer<R>>,
}

impl<R> Column<R> {
    pub fn field(name: &str, label: &str) -> Self {
        Self {
            key: ColumnKey::Field(name.to_string()),
            label: label.to_string(),
            exportable: true,
            render: None,
        }
    }

    pub fn actions(label: &str) -> Self {
        Self {
            key: ColumnKey::Actions,
            label: label.to_string(),
            exportable: false,
            render: None,
        }
    }

    pub fn dropdown(label: &str) -> Self {
        Self {
            key: ColumnKey::Dropdown,
            label: label.to_string(),
            exportable: false,
            render: None,
        }
    }

    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&R) -> String + 'static,
    {
        self.render = Some(Box::new(render));
        self
    }

    pub fn not_exportable(mut self) -> Self {
        self.exportable = false;
        self
    }

    pub fn renderer(&self) -> Option<&CellRenderer<R>> {
        self.render.as_ref()
    }

    /// Synthetic columns never take part in search
    pub fn is_searchable(&self) -> bool {
        !self.key.is_synthetic()
    }

    pub fn is_exported(&self) -> bool {
        !self.key.is_synthetic() && self.exportable
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("exportable", &self.exportable)
            .field("render", &self.render.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: &str, label: &str) -> Self {
        Self {
            value: value.to_string(),
            label: label.to_string(),
        }
    }
}

/// Inline editor for one field, rendered in the [`ColumnKey::Dropdown`] cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownSpec {
    pub field: String,
    pub options: Vec<DropdownOption>,
}

impl DropdownSpec {
    pub fn new(field: &str, options: Vec<DropdownOption>) -> Self {
        Self {
            field: field.to_string(),
            options,
        }
    }

    /// Options whose value and label are the same string
    pub fn from_values<'a>(field: &str, values: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(
            field,
            values
                .into_iter()
                .map(|v| DropdownOption::new(v, v))
                .collect(),
        )
    }

    pub fn contains(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }

    /// Option following `current`, wrapping around; the first option when
    /// `current` is not in the list.
    pub fn next_after(&self, current: &str) -> Option<&DropdownOption> {
        let pos = self.options.iter().position(|o| o.value == current);
        match pos {
            Some(i) => self.options.get((i + 1) % self.options.len()),
            None => self.options.first(),
        }
    }
}

/// Per-row action buttons. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RowAction {
    View,
    Edit,
    Delete,
    Download,
    Upload,
    Print,
    Reset,
    Copy,
    Send,
    Approve,
    Reject,
    Share,
    Add,
    Call,
}

impl RowAction {
    pub fn label(&self) -> &'static str {
        match self {
            RowAction::View => "View",
            RowAction::Edit => "Edit",
            RowAction::Delete => "Delete",
            RowAction::Download => "Download",
            RowAction::Upload => "Upload",
            RowAction::Print => "Print",
            RowAction::Reset => "Reset",
            RowAction::Copy => "Copy",
            RowAction::Send => "Send",
            RowAction::Approve => "Approve",
            RowAction::Reject => "Reject",
            RowAction::Share => "Share",
            RowAction::Add => "Add",
            RowAction::Call => "Call",
        }
    }

    /// Short glyph shown inside the action cell
    pub fn glyph(&self) -> &'static str {
        match self {
            RowAction::View => "◉",
            RowAction::Edit => "✎",
            RowAction::Delete => "✗",
            RowAction::Download => "↓",
            RowAction::Upload => "↑",
            RowAction::Print => "⎙",
            RowAction::Reset => "↺",
            RowAction::Copy => "⧉",
            RowAction::Send => "➤",
            RowAction::Approve => "✓",
            RowAction::Reject => "⊘",
            RowAction::Share => "⇪",
            RowAction::Add => "+",
            RowAction::Call => "☏",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_columns_are_not_searched_or_exported() {
        let actions: Column<()> = Column::actions("Action");
        let dropdown: Column<()> = Column::dropdown("Status");
        let field: Column<()> = Column::field("name", "Name");

        assert!(!actions.is_searchable());
        assert!(!dropdown.is_exported());
        assert!(field.is_searchable());
        assert!(field.is_exported());
        assert!(!Column::<()>::field("id", "Id").not_exportable().is_exported());
    }

    #[test]
    fn test_dropdown_next_after_wraps() {
        let spec = DropdownSpec::from_values("status", ["Paid", "Pending", "Overdue"]);
        assert_eq!(spec.next_after("Paid").unwrap().value, "Pending");
        assert_eq!(spec.next_after("Overdue").unwrap().value, "Paid");
        assert_eq!(spec.next_after("Unknown").unwrap().value, "Paid");
        assert!(spec.contains("Pending"));
        assert!(!spec.contains("pending"));
    }
}
