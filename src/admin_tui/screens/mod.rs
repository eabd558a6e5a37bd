//! Screen implementations for the dashboard TUI

pub mod entity_form;
pub mod entity_list;
pub mod sidebar;

pub use entity_form::{EntityForm, FormEvent, FormMode, FormOutcome};
pub use entity_list::{EntityListScreen, ModalState, PLACEHOLDER_ROWS};
pub use sidebar::Sidebar;
