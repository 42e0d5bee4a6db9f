//! Reusable UI components for the console TUI

pub mod company_table;
pub mod form_field;
pub mod status_display;

pub use company_table::CompanyTable;
pub use form_field::{FormField, FormFieldType};
pub use status_display::StatusDisplay;
