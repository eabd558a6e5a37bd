//! List screen for one entity kind: table, add/edit modal and delete confirmation

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tracing::debug;

use super::entity_form::{EntityForm, FormEvent, FormOutcome};
use crate::admin_tui::{
    components::{Column, DataTable, DataTableConfig, Modal},
    traits::{Navigable, ScreenAction},
    ui::Styles,
};
use crate::models::{Category, EntityKind, EntityRecord, Location, QueryKey, Supplier};
use crate::query::QueryState;

/// Rows shown while a list is loading or refreshing
pub const PLACEHOLDER_ROWS: usize = 10;

pub const DELETE_NOT_IMPLEMENTED: &str = "Delete API is not implemented yet.";
pub const UPDATE_NOT_IMPLEMENTED: &str = "Update API is not implemented yet.";

/// Which overlay is open. The selected record lives inside the variant, so
/// closing the overlay always clears the selection.
#[derive(Debug, Clone)]
pub enum ModalState {
    Idle,
    Form(EntityForm),
    ConfirmingDelete(EntityRecord),
}

impl ModalState {
    pub fn is_open(&self) -> bool {
        !matches!(self, ModalState::Idle)
    }

    pub fn selected(&self) -> Option<&EntityRecord> {
        match self {
            ModalState::Idle => None,
            ModalState::Form(form) => form.record(),
            ModalState::ConfirmingDelete(record) => Some(record),
        }
    }
}

fn as_category(record: &EntityRecord) -> Option<&Category> {
    match record {
        EntityRecord::Category(c) => Some(c),
        _ => None,
    }
}

fn as_location(record: &EntityRecord) -> Option<&Location> {
    match record {
        EntityRecord::Location(l) => Some(l),
        _ => None,
    }
}

fn as_supplier(record: &EntityRecord) -> Option<&Supplier> {
    match record {
        EntityRecord::Supplier(s) => Some(s),
        _ => None,
    }
}

fn or_dash(value: Option<String>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or_else(|| "-".to_string())
}

fn columns_for(kind: EntityKind) -> Vec<Column<EntityRecord>> {
    let id = Column::new("id", "ID", |r: &EntityRecord| r.id().to_string())
        .sortable()
        .with_skeleton_width(4);
    let name = Column::new("name", "Name", |r: &EntityRecord| r.name().to_string())
        .sortable()
        .with_skeleton_width(16);

    match kind {
        EntityKind::Category | EntityKind::Role => vec![
            id,
            name,
            Column::new("parent_id", "Parent", |r: &EntityRecord| {
                or_dash(as_category(r).and_then(|c| c.parent_id).map(|p| p.to_string()))
            })
            .sortable()
            .with_skeleton_width(6),
            Column::new("created_at", "Created", |r: &EntityRecord| {
                or_dash(as_category(r).and_then(|c| c.created_at.clone()))
            })
            .with_skeleton_width(10),
        ],
        EntityKind::Location => vec![
            id,
            name,
            Column::new("landmark", "Landmark", |r: &EntityRecord| {
                or_dash(as_location(r).map(|l| l.landmark.clone()))
            })
            .with_skeleton_width(12),
            Column::new("location_id", "Code", |r: &EntityRecord| {
                or_dash(as_location(r).map(|l| l.location_id.clone()))
            })
            .sortable()
            .with_skeleton_width(8),
            Column::new("city", "City", |r: &EntityRecord| {
                or_dash(as_location(r).map(|l| l.city.clone()))
            })
            .sortable()
            .with_skeleton_width(8),
            Column::new("state", "State", |r: &EntityRecord| {
                or_dash(as_location(r).map(|l| l.state.clone()))
            })
            .with_skeleton_width(8),
            Column::new("country", "Country", |r: &EntityRecord| {
                or_dash(as_location(r).map(|l| l.country.clone()))
            })
            .with_skeleton_width(8),
        ],
        EntityKind::Supplier => vec![
            id,
            name,
            Column::new("mobile_no", "Mobile", |r: &EntityRecord| {
                or_dash(as_supplier(r).map(|s| s.mobile_no.clone()))
            })
            .sortable()
            .with_skeleton_width(12),
        ],
    }
}

pub struct EntityListScreen {
    pub kind: EntityKind,
    pub table: DataTable<EntityRecord>,
    pub modal: ModalState,
    pub editing_filter: bool,
    business_id: i64,
    last_error: Option<String>,
}

impl EntityListScreen {
    pub fn new(kind: EntityKind, business_id: i64) -> Self {
        let mut table = DataTable::new(
            columns_for(kind),
            DataTableConfig::new(kind.plural(), "name"),
        );
        table.set_rows(vec![None; PLACEHOLDER_ROWS]);

        Self {
            kind,
            table,
            modal: ModalState::Idle,
            editing_filter: false,
            business_id,
            last_error: None,
        }
    }

    pub fn query_key(&self) -> QueryKey {
        QueryKey::all(self.kind, self.business_id)
    }

    /// Record the open overlay is about; `None` whenever nothing is open
    pub fn selected(&self) -> Option<&EntityRecord> {
        self.modal.selected()
    }

    /// Whether keys should go to a text input rather than global shortcuts
    pub fn captures_input(&self) -> bool {
        self.editing_filter || matches!(self.modal, ModalState::Form(_))
    }

    /// Mirror a query snapshot into the table.
    ///
    /// Returns a fetch error the first time it is seen so the caller can
    /// report it once.
    pub fn apply_query_state(&mut self, state: &QueryState) -> Option<String> {
        if state.is_fetching {
            self.table.set_rows(vec![None; PLACEHOLDER_ROWS]);
        } else if state.is_error() {
            self.table.set_rows(Vec::new());
        } else {
            self.table
                .set_rows(state.records().iter().cloned().map(Some).collect());
        }

        match &state.error {
            Some(error) if self.last_error.as_ref() != Some(error) => {
                self.last_error = Some(error.clone());
                Some(error.clone())
            }
            Some(_) => None,
            None => {
                self.last_error = None;
                None
            }
        }
    }

    pub fn open_create(&mut self) {
        self.modal = ModalState::Form(EntityForm::create(self.kind, self.business_id));
    }

    /// Ignored when the cursor is on a placeholder row
    pub fn open_edit(&mut self) {
        if let Some(record) = self.table.selected_record().cloned() {
            self.modal = ModalState::Form(EntityForm::edit(self.kind, record));
        }
    }

    /// Ignored when the cursor is on a placeholder row
    pub fn open_delete(&mut self) {
        if let Some(record) = self.table.selected_record().cloned() {
            self.modal = ModalState::ConfirmingDelete(record);
        }
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::Idle;
    }

    /// Mark the open form as waiting on its create request
    pub fn set_saving(&mut self, saving: bool) {
        if let ModalState::Form(form) = &mut self.modal {
            form.set_saving(saving);
        }
    }

    pub fn is_saving(&self) -> bool {
        matches!(&self.modal, ModalState::Form(form) if form.is_saving())
    }

    /// Called once a create dispatched from this screen has succeeded
    pub fn on_create_succeeded(&mut self) {
        self.close_modal();
    }

    /// Called when a create dispatched from this screen failed; input is kept
    pub fn on_create_failed(&mut self) {
        self.set_saving(false);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ScreenAction {
        match &mut self.modal {
            ModalState::Form(form) => {
                return match form.handle_key(key) {
                    FormEvent::Cancelled => {
                        self.close_modal();
                        ScreenAction::None
                    }
                    FormEvent::Submitted(FormOutcome::Create(draft)) => {
                        ScreenAction::SubmitCreate(draft)
                    }
                    FormEvent::Submitted(FormOutcome::UpdateUnsupported) => {
                        ScreenAction::SetError(UPDATE_NOT_IMPLEMENTED.to_string())
                    }
                    FormEvent::Submitted(FormOutcome::Invalid(errors)) => {
                        debug!("{} form invalid: {}", self.kind.as_str(), errors);
                        ScreenAction::None
                    }
                    FormEvent::Edited => ScreenAction::None,
                };
            }
            ModalState::ConfirmingDelete(record) => {
                return match key.code {
                    KeyCode::Char('y') | KeyCode::Enter => {
                        debug!("Delete requested for {} {}", self.kind.as_str(), record.id());
                        self.close_modal();
                        ScreenAction::SetError(DELETE_NOT_IMPLEMENTED.to_string())
                    }
                    KeyCode::Char('n') | KeyCode::Esc => {
                        self.close_modal();
                        ScreenAction::None
                    }
                    _ => ScreenAction::None,
                };
            }
            ModalState::Idle => {}
        }

        if self.editing_filter {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.editing_filter = false,
                KeyCode::Backspace => self.table.pop_filter_char(),
                KeyCode::Char(c) => self.table.push_filter_char(c),
                _ => {}
            }
            return ScreenAction::None;
        }

        match key.code {
            KeyCode::Up => self.table.navigate_up(),
            KeyCode::Down => self.table.navigate_down(),
            KeyCode::Home => self.table.navigate_to_first(),
            KeyCode::End => self.table.navigate_to_last(),
            KeyCode::Left => self.table.focus_previous_column(),
            KeyCode::Right => self.table.focus_next_column(),
            KeyCode::Char('s') => {
                if !self.table.toggle_sort_on_focused() {
                    return ScreenAction::SetStatus("Column is not sortable".to_string());
                }
            }
            KeyCode::Char('/') => self.editing_filter = true,
            KeyCode::Char('a') => self.open_create(),
            KeyCode::Char('e') | KeyCode::Enter => self.open_edit(),
            KeyCode::Char('d') => self.open_delete(),
            KeyCode::Char('r') => return ScreenAction::Refresh,
            _ => {}
        }

        ScreenAction::None
    }

    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.table.render(f, chunks[0]);

        let hint = if self.editing_filter {
            Line::from(vec![
                Span::styled("Filter: ", Styles::title()),
                Span::raw(self.table.filter().to_string()),
                Span::styled("  (Enter/Esc: done)", Styles::inactive()),
            ])
        } else {
            Line::from(Span::styled(
                "a: Add | e/Enter: Edit | d: Delete | s: Sort | ←/→: Column | /: Filter | r: Refresh",
                Styles::inactive(),
            ))
        };
        f.render_widget(Paragraph::new(hint), chunks[1]);

        match &self.modal {
            ModalState::Idle => {}
            ModalState::Form(form) => {
                Modal::new(&form.title())
                    .with_open(true)
                    .with_size(60, 70)
                    .render(f, area, |f, inner| form.render(f, inner));
            }
            ModalState::ConfirmingDelete(record) => {
                let text = vec![
                    Line::from(format!(
                        "Delete {} \"{}\"?",
                        self.kind.singular().to_lowercase(),
                        record.name()
                    )),
                    Line::from(""),
                    Line::from(Span::styled("y/Enter: Delete | n/Esc: Cancel", Styles::inactive())),
                ];
                Modal::new("Confirm Delete")
                    .with_open(true)
                    .with_size(50, 30)
                    .render(f, area, |f, inner| {
                        f.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner)
                    });
            }
        }
    }
}
