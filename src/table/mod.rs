//! Reusable tabular data view
//!
//! A searchable, paginated, selectable and optionally editable view over an
//! ordered record snapshot, with export of the filtered rows. Screens build a
//! [`TableView`] from their records and column schema, feed it user input and
//! react to the notifications it raises through [`TableListener`].

pub mod column;
pub mod errors;
pub mod export;
pub mod listener;
pub mod search;
pub mod value;
pub mod view;

pub use column::{Column, ColumnKey, DropdownOption, DropdownSpec, RowAction};
pub use errors::{ExportError, TableError};
pub use export::{ExportFormat, ExportTable};
pub use listener::{TableEvent, TableListener};
pub use value::{Record, Value};
pub use view::{Cell, HeaderCheck, PageRow, TableOptions, TableView, DEFAULT_PAGE_SIZE};
