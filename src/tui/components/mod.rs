//! Reusable TUI widgets

pub mod data_table;
pub mod form_field;

pub use data_table::{DataTable, TableInput};
pub use form_field::{Form, FormField, FormFieldType, FormInput};
