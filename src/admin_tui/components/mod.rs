//! Reusable UI components for the dashboard TUI

pub mod data_table;
pub mod form_field;
pub mod modal;
pub mod notifications;

pub use data_table::{Column, DataTable, DataTableConfig, SortDirection, SortState};
pub use form_field::{Form, FormField, FormFieldType};
pub use modal::Modal;
pub use notifications::{Notification, NotificationKind, Notifications};
