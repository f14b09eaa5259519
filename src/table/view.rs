//! The tabular data view: filtering, paging, selection and inline editing
//! over a caller-supplied record snapshot.
//!
//! The view is pure state. Rendering lives in the TUI layer, which reads
//! [`TableView::page_rows`] and drives the view through its methods.

use std::collections::{BTreeSet, HashSet};
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::ops::Range;

use tracing::{debug, warn};

use super::column::{Column, ColumnKey, DropdownSpec, RowAction};
use super::errors::TableError;
use super::export::ExportTable;
use super::listener::TableListener;
use super::search::{contains_ignore_case, match_ranges};
use super::value::Record;

pub const DEFAULT_PAGE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(4);

pub type IdentityFn<R, Id> = Box<dyn Fn(&R, usize) -> Id>;

/// Feature toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    pub search: bool,
    pub export: bool,
    pub selection: bool,
}

/// Resolved content of one cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Actions(Vec<RowAction>),
    Dropdown { value: String },
    Text {
        text: String,
        highlights: Vec<Range<usize>>,
    },
}

impl Cell {
    pub fn text(&self) -> String {
        match self {
            Cell::Actions(actions) => actions
                .iter()
                .map(|a| a.label())
                .collect::<Vec<_>>()
                .join(" "),
            Cell::Dropdown { value } => value.clone(),
            Cell::Text { text, .. } => text.clone(),
        }
    }
}

/// One row of the current page, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow<Id> {
    pub id: Id,
    pub selected: bool,
    pub cells: Vec<Cell>,
}

/// State of the select-all checkbox in the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

pub struct TableView<R, Id> {
    records: Vec<R>,
    ids: Vec<Id>,
    columns: Vec<Column<R>>,
    identity: IdentityFn<R, Id>,
    page_size: NonZeroUsize,
    page: usize,
    cursor: usize,
    search: String,
    filtered: Vec<usize>,
    selected: HashSet<Id>,
    options: TableOptions,
    dropdown: Option<DropdownSpec>,
    actions: BTreeSet<RowAction>,
}

impl<R, Id> TableView<R, Id>
where
    R: Record,
    Id: Eq + Hash + Clone,
{
    /// Build a view over `records`. `identity` maps a record and its position
    /// in `records` to a key that must be unique within the snapshot.
    pub fn new<F>(records: Vec<R>, columns: Vec<Column<R>>, identity: F) -> Result<Self, TableError>
    where
        F: Fn(&R, usize) -> Id + 'static,
    {
        if columns.is_empty() {
            return Err(TableError::NoColumns);
        }

        let mut view = Self {
            records: Vec::new(),
            ids: Vec::new(),
            columns,
            identity: Box::new(identity),
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
            cursor: 0,
            search: String::new(),
            filtered: Vec::new(),
            selected: HashSet::new(),
            options: TableOptions::default(),
            dropdown: None,
            actions: BTreeSet::new(),
        };
        view.load(records);
        Ok(view)
    }

    pub fn with_page_size(mut self, page_size: NonZeroUsize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Change the page size at runtime; zero is rejected
    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), TableError> {
        self.page_size = NonZeroUsize::new(page_size).ok_or(TableError::ZeroPageSize)?;
        self.page = 0;
        self.cursor = 0;
        Ok(())
    }

    pub fn with_search(mut self) -> Self {
        self.options.search = true;
        self
    }

    pub fn with_export(mut self) -> Self {
        self.options.export = true;
        self
    }

    pub fn with_selection(mut self) -> Self {
        self.options.selection = true;
        self
    }

    pub fn with_dropdown(mut self, spec: DropdownSpec) -> Self {
        self.dropdown = Some(spec);
        self
    }

    pub fn with_actions(mut self, actions: impl IntoIterator<Item = RowAction>) -> Self {
        self.actions.extend(actions);
        self
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn options(&self) -> TableOptions {
        self.options
    }

    pub fn dropdown(&self) -> Option<&DropdownSpec> {
        self.dropdown.as_ref()
    }

    /// Enabled actions in display order
    pub fn actions(&self) -> Vec<RowAction> {
        self.actions.iter().copied().collect()
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    // ---- filtering ----

    /// Set the search term and go back to the first page
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 0;
        self.cursor = 0;
        self.refilter();
    }

    pub fn clear_search(&mut self) {
        self.set_search("");
    }

    pub fn filtered(&self) -> impl Iterator<Item = &R> + '_ {
        self.filtered.iter().map(move |&i| &self.records[i])
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    fn matches(&self, record: &R) -> bool {
        if self.search.is_empty() {
            return true;
        }
        self.columns
            .iter()
            .filter_map(|c| c.key.field_name())
            .any(|name| contains_ignore_case(&record.field(name).to_string(), &self.search))
    }

    fn refilter(&mut self) {
        self.filtered = (0..self.records.len())
            .filter(|&i| self.matches(&self.records[i]))
            .collect();
        self.clamp_cursor();
    }

    // ---- paging ----

    fn page_range(&self, page: usize) -> Range<usize> {
        let size = self.page_size.get();
        let start = page.saturating_mul(size).min(self.filtered.len());
        let end = start.saturating_add(size).min(self.filtered.len());
        start..end
    }

    /// Records on `page`; empty past the last page
    pub fn page_records(&self, page: usize) -> Vec<&R> {
        self.filtered[self.page_range(page)]
            .iter()
            .map(|&i| &self.records[i])
            .collect()
    }

    /// Number of pages; never zero so "page 1 of 1" reads right for an
    /// empty table
    pub fn page_count(&self) -> usize {
        self.filtered.len().div_ceil(self.page_size.get()).max(1)
    }

    /// Jump to any page. Pages past the end are allowed and show no rows.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
        self.cursor = 0;
    }

    fn clamp_cursor(&mut self) {
        let len = self.page_range(self.page).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    // ---- cells ----

    /// Resolve every column of `record` in priority order: action buttons,
    /// drop-down editor, custom renderer, plain value.
    pub fn cells(&self, record: &R) -> Vec<Cell> {
        self.columns.iter().map(|c| self.cell(c, record)).collect()
    }

    fn cell(&self, column: &Column<R>, record: &R) -> Cell {
        match (&column.key, &self.dropdown) {
            (ColumnKey::Actions, _) if !self.actions.is_empty() => {
                return Cell::Actions(self.actions());
            }
            (ColumnKey::Dropdown, Some(spec)) => {
                return Cell::Dropdown {
                    value: record.field(&spec.field).to_string(),
                };
            }
            _ => {}
        }

        if let Some(render) = column.renderer() {
            return Cell::Text {
                text: render(record),
                highlights: Vec::new(),
            };
        }

        let text = column
            .key
            .field_name()
            .map(|name| record.field(name).to_string())
            .unwrap_or_default();
        let highlights = if self.options.search {
            match_ranges(&text, &self.search)
        } else {
            Vec::new()
        };
        Cell::Text { text, highlights }
    }

    /// Rows of the current page. Empty means the "no data" row.
    pub fn page_rows(&self) -> Vec<PageRow<Id>> {
        self.filtered[self.page_range(self.page)]
            .iter()
            .map(|&i| PageRow {
                id: self.ids[i].clone(),
                selected: self.selected.contains(&self.ids[i]),
                cells: self.cells(&self.records[i]),
            })
            .collect()
    }

    // ---- export ----

    /// Export projection over the whole filtered set, ignoring paging
    pub fn export(&self) -> ExportTable {
        let exported: Vec<&Column<R>> = self.columns.iter().filter(|c| c.is_exported()).collect();
        ExportTable {
            headers: exported.iter().map(|c| c.label.clone()).collect(),
            rows: self
                .filtered()
                .map(|record| {
                    exported
                        .iter()
                        .filter_map(|c| c.key.field_name())
                        .map(|name| record.field(name))
                        .collect()
                })
                .collect(),
        }
    }

    // ---- selection ----

    pub fn is_selected(&self, id: &Id) -> bool {
        self.selected.contains(id)
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_ids(&self) -> &HashSet<Id> {
        &self.selected
    }

    /// Selected records in record order
    pub fn selected_records(&self) -> Vec<&R> {
        self.records
            .iter()
            .zip(&self.ids)
            .filter(|(_, id)| self.selected.contains(id))
            .map(|(r, _)| r)
            .collect()
    }

    /// Flip membership of `id` and report the new selection. Only loaded
    /// identities can be selected.
    pub fn toggle<L: TableListener<R>>(&mut self, id: &Id, listener: &mut L) -> Result<(), TableError> {
        if self.position(id).is_none() {
            return Err(TableError::UnknownRow);
        }
        if !self.selected.remove(id) {
            self.selected.insert(id.clone());
        }
        listener.on_selection_change(&self.selected_records());
        Ok(())
    }

    /// Select every loaded record (not just the visible ones), or clear
    pub fn select_all<L: TableListener<R>>(&mut self, checked: bool, listener: &mut L) {
        self.selected.clear();
        if checked {
            self.selected.extend(self.ids.iter().cloned());
        }
        listener.on_selection_change(&self.selected_records());
    }

    pub fn header_check(&self) -> HeaderCheck {
        if self.selected.is_empty() {
            HeaderCheck::Unchecked
        } else if self.ids.iter().all(|id| self.selected.contains(id)) {
            HeaderCheck::Checked
        } else {
            HeaderCheck::Indeterminate
        }
    }

    fn distinct_ids(&self) -> usize {
        self.ids.iter().collect::<HashSet<_>>().len()
    }

    /// Hand the selected records to the listener. Returns how many were
    /// passed; zero means nothing was selected and the listener was not
    /// called. The selection stays until [`replace_records`](Self::replace_records).
    pub fn request_bulk_delete<L: TableListener<R>>(&mut self, listener: &mut L) -> usize {
        let selected = self.selected_records();
        if selected.is_empty() {
            return 0;
        }
        debug!("bulk delete requested for {} rows", selected.len());
        listener.on_bulk_delete(&selected);
        selected.len()
    }

    // ---- records ----

    /// Swap in a new snapshot. Clears the selection.
    pub fn replace_records(&mut self, records: Vec<R>) {
        self.selected.clear();
        self.load(records);
        let last = self.page_count() - 1;
        if self.page > last {
            self.page = last;
        }
        self.clamp_cursor();
    }

    fn load(&mut self, records: Vec<R>) {
        self.ids = records
            .iter()
            .enumerate()
            .map(|(i, r)| (self.identity)(r, i))
            .collect();
        self.records = records;
        let distinct = self.distinct_ids();
        if distinct != self.ids.len() {
            warn!(
                "{} rows share an identity with another row; their selection state is merged",
                self.ids.len() - distinct
            );
        }
        self.refilter();
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.ids.iter().position(|i| i == id)
    }

    pub fn record(&self, id: &Id) -> Option<&R> {
        self.position(id).map(|i| &self.records[i])
    }

    /// Edit one record in place. The selection survives; a selected row
    /// whose identity changes drops out of it.
    pub fn edit_record<F>(&mut self, id: &Id, edit: F) -> Result<(), TableError>
    where
        F: FnOnce(&mut R),
    {
        let pos = self.position(id).ok_or(TableError::UnknownRow)?;
        edit(&mut self.records[pos]);
        let new_id = (self.identity)(&self.records[pos], pos);
        if &new_id != id {
            self.selected.remove(id);
        }
        self.ids[pos] = new_id;
        self.refilter();
        Ok(())
    }

    // ---- inline editing and actions ----

    pub fn change_dropdown<L: TableListener<R>>(
        &mut self,
        id: &Id,
        value: &str,
        listener: &mut L,
    ) -> Result<(), TableError> {
        let spec = self.dropdown.as_ref().ok_or(TableError::NoDropdown)?;
        if !spec.contains(value) {
            return Err(TableError::UnknownOption {
                field: spec.field.clone(),
                value: value.to_string(),
            });
        }
        let record = self.record(id).ok_or(TableError::UnknownRow)?;
        listener.on_dropdown_change(record, value);
        Ok(())
    }

    /// Advance the drop-down of row `id` to its next option
    pub fn cycle_dropdown<L: TableListener<R>>(
        &mut self,
        id: &Id,
        listener: &mut L,
    ) -> Result<String, TableError> {
        let spec = self.dropdown.as_ref().ok_or(TableError::NoDropdown)?;
        let record = self.record(id).ok_or(TableError::UnknownRow)?;
        let current = record.field(&spec.field).to_string();
        let next = spec
            .next_after(&current)
            .map(|o| o.value.clone())
            .ok_or_else(|| TableError::UnknownOption {
                field: spec.field.clone(),
                value: current,
            })?;
        self.change_dropdown(id, &next, listener)?;
        Ok(next)
    }

    pub fn trigger_action<L: TableListener<R>>(
        &mut self,
        id: &Id,
        action: RowAction,
        listener: &mut L,
    ) -> Result<(), TableError> {
        if !self.actions.contains(&action) {
            return Err(TableError::ActionNotEnabled(action.label()));
        }
        let record = self.record(id).ok_or(TableError::UnknownRow)?;
        listener.on_row_action(action, record);
        Ok(())
    }

    // ---- cursor ----

    /// Identity of the row under the cursor on the current page
    pub fn cursor_id(&self) -> Option<&Id> {
        let range = self.page_range(self.page);
        self.filtered[range]
            .get(self.cursor)
            .map(|&i| &self.ids[i])
    }

    /// Cursor row on the current page, `None` when the page is empty
    pub fn cursor_row(&self) -> Option<usize> {
        (!self.page_range(self.page).is_empty()).then_some(self.cursor)
    }

    pub fn cursor_up(&mut self) {
        let len = self.page_range(self.page).len();
        if len > 0 {
            self.cursor = (self.cursor + len - 1) % len;
        }
    }

    pub fn cursor_down(&mut self) {
        let len = self.page_range(self.page).len();
        if len > 0 {
            self.cursor = (self.cursor + 1) % len;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::listener::TableEvent;
    use crate::table::value::Value;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: String,
        status: String,
    }

    impl Record for Row {
        fn field(&self, name: &str) -> Value {
            match name {
                "id" => self.id.into(),
                "name" => Value::from(&self.name),
                "status" => Value::from(&self.status),
                _ => Value::Null,
            }
        }
    }

    fn row(id: i64, name: &str) -> Row {
        Row {
            id,
            name: name.to_string(),
            status: "Pending".to_string(),
        }
    }

    fn view(rows: Vec<Row>) -> TableView<Row, i64> {
        TableView::new(
            rows,
            vec![
                Column::field("id", "Id"),
                Column::field("name", "Name"),
                Column::dropdown("Status"),
                Column::actions("Action"),
            ],
            |r: &Row, _| r.id,
        )
        .unwrap()
        .with_page_size(NonZeroUsize::new(2).unwrap())
        .with_search()
        .with_selection()
        .with_dropdown(DropdownSpec::from_values("status", ["Paid", "Pending", "Overdue"]))
        .with_actions([RowAction::Print, RowAction::View])
    }

    fn ids(records: Vec<&Row>) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_rejects_empty_columns() {
        let result = TableView::<Row, i64>::new(vec![], vec![], |r, _| r.id);
        assert_eq!(result.err(), Some(TableError::NoColumns));
    }

    #[test]
    fn test_zero_page_size_is_rejected() {
        let mut v = view(vec![row(1, "A")]);
        assert_eq!(v.set_page_size(0), Err(TableError::ZeroPageSize));
        assert_eq!(v.page_size(), 2);
        v.set_page_size(10).unwrap();
        assert_eq!(v.page_count(), 1);
    }

    #[test]
    fn test_search_example() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "Ab")]);
        v.set_search("a");
        assert_eq!(ids(v.filtered().collect()), vec![1, 3]);
        assert_eq!(ids(v.page_records(0)), vec![1, 3]);
        assert!(v.page_records(1).is_empty());
    }

    #[test]
    fn test_search_resets_page() {
        let mut v = view((1..=6).map(|i| row(i, "x")).collect());
        v.set_page(2);
        assert_eq!(v.page(), 2);
        v.set_search("x");
        assert_eq!(v.page(), 0);
    }

    #[test]
    fn test_search_ignores_synthetic_columns() {
        // "Pending" lives only behind the dropdown column
        let mut v = view(vec![row(1, "Alpha")]);
        v.set_search("pending");
        assert_eq!(v.filtered_len(), 0);
    }

    #[test]
    fn test_cell_priority() {
        let v = view(vec![row(7, "Zed")]);
        let cells = v.cells(&v.records()[0]);
        assert_eq!(cells[1].text(), "Zed");
        assert_eq!(
            cells[2],
            Cell::Dropdown {
                value: "Pending".to_string()
            }
        );
        // actions come back in catalogue order regardless of insertion order
        assert_eq!(cells[3], Cell::Actions(vec![RowAction::View, RowAction::Print]));
    }

    #[test]
    fn test_synthetic_cells_without_config_fall_back_to_empty_text() {
        let v: TableView<Row, i64> = TableView::new(
            vec![row(1, "A")],
            vec![Column::dropdown("Status"), Column::actions("Action")],
            |r, _| r.id,
        )
        .unwrap();
        let cells = v.cells(&v.records()[0]);
        assert_eq!(cells[0].text(), "");
        assert_eq!(cells[1].text(), "");
    }

    #[test]
    fn test_custom_renderer_wins_over_plain_value() {
        let v: TableView<Row, i64> = TableView::new(
            vec![row(1, "A")],
            vec![Column::field("id", "Id").with_render(|r: &Row| format!("#{}", r.id))],
            |r, _| r.id,
        )
        .unwrap();
        assert_eq!(v.cells(&v.records()[0])[0].text(), "#1");
    }

    #[test]
    fn test_plain_cells_carry_highlights() {
        let mut v = view(vec![row(1, "Rajesh Kumar")]);
        v.set_search("kum");
        let rows = v.page_rows();
        match &rows[0].cells[1] {
            Cell::Text { highlights, .. } => assert_eq!(highlights, &vec![7..10]),
            other => panic!("unexpected cell {:?}", other),
        }
    }

    #[test]
    fn test_export_ignores_paging_and_synthetic_columns() {
        let mut v = view((1..=5).map(|i| row(i, "x")).collect());
        v.set_page(1);
        let export = v.export();
        assert_eq!(export.headers, vec!["Id", "Name"]);
        assert_eq!(export.len(), 5);
    }

    #[test]
    fn test_toggle_twice_restores_selection() {
        let mut v = view(vec![row(1, "A"), row(2, "B")]);
        v.toggle(&2, &mut ()).unwrap();
        let before = v.selected_ids().clone();
        v.toggle(&1, &mut ()).unwrap();
        v.toggle(&1, &mut ()).unwrap();
        assert_eq!(v.selected_ids(), &before);
    }

    #[test]
    fn test_select_all_covers_filtered_out_rows() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "C")]);
        v.set_search("a");
        v.select_all(true, &mut ());
        assert_eq!(v.selection_len(), 3);
        assert_eq!(v.header_check(), HeaderCheck::Checked);
        v.select_all(false, &mut ());
        assert_eq!(v.selection_len(), 0);
        assert_eq!(v.header_check(), HeaderCheck::Unchecked);
    }

    #[test]
    fn test_selection_events_are_in_record_order() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "C")]);
        let mut events: Vec<TableEvent<Row>> = Vec::new();
        v.toggle(&3, &mut events).unwrap();
        v.toggle(&1, &mut events).unwrap();
        assert_eq!(
            events.last(),
            Some(&TableEvent::SelectionChanged(vec![row(1, "A"), row(3, "C")]))
        );
        assert_eq!(v.header_check(), HeaderCheck::Indeterminate);
    }

    #[test]
    fn test_bulk_delete_then_replace_clears_selection() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "Ab")]);
        v.toggle(&1, &mut ()).unwrap();
        v.toggle(&3, &mut ()).unwrap();

        let mut events: Vec<TableEvent<Row>> = Vec::new();
        assert_eq!(v.request_bulk_delete(&mut events), 2);
        let doomed = match &events[0] {
            TableEvent::BulkDelete(rows) => rows.iter().map(|r| r.id).collect::<Vec<_>>(),
            other => panic!("unexpected event {:?}", other),
        };
        assert_eq!(doomed, vec![1, 3]);

        let remaining: Vec<Row> = v
            .records()
            .iter()
            .filter(|r| !doomed.contains(&r.id))
            .cloned()
            .collect();
        v.replace_records(remaining);
        assert_eq!(v.selection_len(), 0);
    }

    #[test]
    fn test_bulk_delete_with_empty_selection_is_silent() {
        let mut v = view(vec![row(1, "A")]);
        let mut events: Vec<TableEvent<Row>> = Vec::new();
        assert_eq!(v.request_bulk_delete(&mut events), 0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_duplicate_identities_merge_selection() {
        let mut v: TableView<Row, String> = TableView::new(
            vec![row(1, "Same"), row(2, "Same")],
            vec![Column::field("name", "Name")],
            |r, _| r.name.clone(),
        )
        .unwrap();
        v.toggle(&"Same".to_string(), &mut ()).unwrap();
        assert!(v.page_rows().iter().all(|r| r.selected));
        assert_eq!(v.selected_records().len(), 2);
        assert_eq!(v.header_check(), HeaderCheck::Checked);
    }

    #[test]
    fn test_unknown_identity_cannot_be_selected() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "C")]);
        v.toggle(&1, &mut ()).unwrap();
        v.toggle(&2, &mut ()).unwrap();

        let mut events: Vec<TableEvent<Row>> = Vec::new();
        assert_eq!(v.toggle(&999, &mut events), Err(TableError::UnknownRow));
        assert!(events.is_empty());
        assert_eq!(v.selection_len(), 2);
        assert_eq!(v.header_check(), HeaderCheck::Indeterminate);

        v.toggle(&3, &mut ()).unwrap();
        assert_eq!(v.header_check(), HeaderCheck::Checked);
    }

    #[test]
    fn test_edit_keeps_selection() {
        let mut v = view(vec![row(1, "A"), row(2, "B")]);
        v.toggle(&2, &mut ()).unwrap();
        v.edit_record(&2, |r| r.status = "Paid".to_string()).unwrap();
        assert!(v.is_selected(&2));
        assert_eq!(v.record(&2).unwrap().status, "Paid");
        assert_eq!(v.edit_record(&9, |_| {}), Err(TableError::UnknownRow));
    }

    #[test]
    fn test_dropdown_change_validates_value() {
        let mut v = view(vec![row(1, "A")]);
        let mut events: Vec<TableEvent<Row>> = Vec::new();
        v.change_dropdown(&1, "Paid", &mut events).unwrap();
        assert_eq!(
            events,
            vec![TableEvent::DropdownChanged {
                row: row(1, "A"),
                value: "Paid".to_string()
            }]
        );
        assert!(matches!(
            v.change_dropdown(&1, "Lost", &mut events),
            Err(TableError::UnknownOption { .. })
        ));
        assert_eq!(v.change_dropdown(&5, "Paid", &mut events), Err(TableError::UnknownRow));
    }

    #[test]
    fn test_cycle_dropdown_moves_to_next_option() {
        let mut v = view(vec![row(1, "A")]);
        assert_eq!(v.cycle_dropdown(&1, &mut ()).unwrap(), "Overdue");
    }

    #[test]
    fn test_actions_must_be_enabled() {
        let mut v = view(vec![row(1, "A")]);
        let mut events: Vec<TableEvent<Row>> = Vec::new();
        v.trigger_action(&1, RowAction::View, &mut events).unwrap();
        assert_eq!(
            v.trigger_action(&1, RowAction::Delete, &mut events),
            Err(TableError::ActionNotEnabled("Delete"))
        );
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_replace_records_pulls_page_back_in_range() {
        let mut v = view((1..=5).map(|i| row(i, "x")).collect());
        v.set_page(2);
        v.replace_records(vec![row(1, "x")]);
        assert_eq!(v.page(), 0);
        assert_eq!(v.cursor_id(), Some(&1));
    }

    #[test]
    fn test_cursor_wraps_within_page() {
        let mut v = view(vec![row(1, "A"), row(2, "B"), row(3, "C")]);
        v.cursor_up();
        assert_eq!(v.cursor_id(), Some(&2));
        v.cursor_down();
        assert_eq!(v.cursor_id(), Some(&1));
        v.set_page(1);
        assert_eq!(v.cursor_id(), Some(&3));
        assert_eq!(v.cursor_row(), Some(0));
        v.set_page(2);
        assert_eq!(v.cursor_row(), None);
    }
}
