//! Create/edit form shown inside the entity modal

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Paragraph,
    Frame,
};

use crate::admin_tui::{components::Form, traits::FormHandler, ui::Styles};
use crate::forms::{build_draft, default_values, fields_for};
use crate::models::{EntityDraft, EntityKind, EntityRecord};
use crate::validation::FieldErrors;

#[derive(Debug, Clone, PartialEq)]
pub enum FormMode {
    Create,
    Edit(EntityRecord),
}

/// Result of pressing submit
#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Validation failed; messages are already attached to the fields
    Invalid(FieldErrors),
    /// Valid create input, ready to dispatch
    Create(EntityDraft),
    /// Valid edit input, but there is no update endpoint
    UpdateUnsupported,
}

/// What a key press did to the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    Submitted(FormOutcome),
    Cancelled,
    Edited,
}

#[derive(Debug, Clone)]
pub struct EntityForm {
    pub kind: EntityKind,
    pub mode: FormMode,
    pub form: Form,
    business_id: i64,
    /// A create request is in flight; input is ignored until it settles
    saving: bool,
}

impl EntityForm {
    pub fn create(kind: EntityKind, business_id: i64) -> Self {
        Self {
            kind,
            mode: FormMode::Create,
            form: Form::from_specs(fields_for(kind), &default_values(kind, None)),
            business_id,
            saving: false,
        }
    }

    /// Prefilled from `record`; the record's own business id is kept
    pub fn edit(kind: EntityKind, record: EntityRecord) -> Self {
        Self {
            kind,
            form: Form::from_specs(fields_for(kind), &default_values(kind, Some(&record))),
            business_id: record.business_id(),
            mode: FormMode::Edit(record),
            saving: false,
        }
    }

    pub fn business_id(&self) -> i64 {
        self.business_id
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn set_saving(&mut self, saving: bool) {
        self.saving = saving;
    }

    /// Record being edited, `None` in create mode
    pub fn record(&self) -> Option<&EntityRecord> {
        match &self.mode {
            FormMode::Create => None,
            FormMode::Edit(record) => Some(record),
        }
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!("Add {}", self.kind.singular()),
            FormMode::Edit(_) => format!("Edit {}", self.kind.singular()),
        }
    }

    /// Validate first; only valid input can produce a draft
    pub fn submit(&mut self) -> FormOutcome {
        match build_draft(self.kind, &self.form.values(), self.business_id) {
            Err(errors) => {
                self.form.apply_errors(&errors);
                FormOutcome::Invalid(errors)
            }
            Ok(draft) => {
                self.form.clear_errors();
                match self.mode {
                    FormMode::Create => FormOutcome::Create(draft),
                    FormMode::Edit(_) => FormOutcome::UpdateUnsupported,
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormEvent {
        if self.saving {
            return FormEvent::Edited;
        }

        match key.code {
            KeyCode::Esc => FormEvent::Cancelled,
            KeyCode::Enter => FormEvent::Submitted(self.submit()),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.form.previous_field();
                FormEvent::Edited
            }
            KeyCode::BackTab => {
                self.form.previous_field();
                FormEvent::Edited
            }
            KeyCode::Tab | KeyCode::Down => {
                self.form.next_field();
                FormEvent::Edited
            }
            KeyCode::Up => {
                self.form.previous_field();
                FormEvent::Edited
            }
            KeyCode::Left => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_left();
                }
                FormEvent::Edited
            }
            KeyCode::Right => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_right();
                }
                FormEvent::Edited
            }
            KeyCode::Home => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_to_start();
                }
                FormEvent::Edited
            }
            KeyCode::End => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_to_end();
                }
                FormEvent::Edited
            }
            KeyCode::Backspace => {
                self.form.handle_backspace();
                FormEvent::Edited
            }
            KeyCode::Delete => {
                self.form.handle_delete();
                FormEvent::Edited
            }
            KeyCode::Char(c) => {
                self.form.handle_char_input(c);
                FormEvent::Edited
            }
            _ => FormEvent::Edited,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        self.form.render(f, chunks[0]);

        let hint = if self.saving {
            Paragraph::new("Saving…").style(Styles::info())
        } else if let Some(error) = &self.form.form_error {
            Paragraph::new(error.as_str()).style(Styles::error())
        } else {
            let action = match self.mode {
                FormMode::Create => "Enter: Add",
                FormMode::Edit(_) => "Enter: Update",
            };
            Paragraph::new(format!("{} | Tab: Next field | Esc: Close", action))
                .style(Styles::inactive())
        };
        f.render_widget(hint, chunks[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, NewSupplier, Supplier};
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: crossterm::event::KeyEventState::NONE,
        }
    }

    fn type_text(form: &mut EntityForm, text: &str) {
        for c in text.chars() {
            form.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_empty_name_blocks_submission() {
        let mut form = EntityForm::create(EntityKind::Supplier, 7);
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "923411415567");

        match form.handle_key(key(KeyCode::Enter)) {
            FormEvent::Submitted(FormOutcome::Invalid(errors)) => {
                assert_eq!(errors.get("name"), Some("Name is required."));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            form.form.get_field("name").and_then(|f| f.validation_error.as_deref()),
            Some("Name is required.")
        );
    }

    #[test]
    fn test_valid_create_yields_draft_with_session_business() {
        let mut form = EntityForm::create(EntityKind::Supplier, 7);
        type_text(&mut form, "Ali");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "923411415567");

        assert_eq!(
            form.submit(),
            FormOutcome::Create(EntityDraft::Supplier(NewSupplier {
                name: "Ali".to_string(),
                mobile_no: 923411415567,
                business_id: 7,
            }))
        );
        assert!(!form.form.has_errors());
    }

    #[test]
    fn test_valid_edit_is_unsupported() {
        let record = EntityRecord::Supplier(Supplier {
            id: 9,
            name: "Sara".to_string(),
            mobile_no: "923000000000".to_string(),
            business_id: 4,
        });
        let mut form = EntityForm::edit(EntityKind::Supplier, record.clone());
        assert_eq!(form.business_id(), 4);
        assert_eq!(form.record(), Some(&record));
        assert_eq!(form.title(), "Edit Supplier");
        assert_eq!(form.submit(), FormOutcome::UpdateUnsupported);
    }

    #[test]
    fn test_invalid_edit_still_reports_errors() {
        let record = EntityRecord::Category(Category {
            id: 1,
            name: "Drinks".to_string(),
            business_id: 4,
            parent_id: None,
            created_by: None,
            created_at: None,
            updated_at: None,
        });
        let mut form = EntityForm::edit(EntityKind::Category, record);
        if let Some(field) = form.form.get_field_mut("name") {
            field.clear();
        }
        assert!(matches!(form.submit(), FormOutcome::Invalid(_)));
    }

    #[test]
    fn test_escape_cancels() {
        let mut form = EntityForm::create(EntityKind::Location, 1);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Cancelled);
        assert_eq!(form.title(), "Add Location");
    }

    #[test]
    fn test_fractional_mobile_is_a_field_error() {
        let mut form = EntityForm::create(EntityKind::Supplier, 7);
        type_text(&mut form, "Ali");
        form.handle_key(key(KeyCode::Tab));
        type_text(&mut form, "1.5");

        assert!(matches!(form.submit(), FormOutcome::Invalid(_)));
        assert_eq!(
            form.form.get_field("mobile_no").and_then(|f| f.validation_error.as_deref()),
            Some("Expected integer, received float")
        );
        assert!(form.form.form_error.is_none());
    }

    #[test]
    fn test_saving_form_ignores_input_and_shows_progress() {
        use ratatui::{backend::TestBackend, Terminal};

        let mut form = EntityForm::create(EntityKind::Supplier, 7);
        type_text(&mut form, "Ali");
        form.set_saving(true);

        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormEvent::Edited);
        assert_eq!(form.handle_key(key(KeyCode::Esc)), FormEvent::Edited);
        type_text(&mut form, "xyz");
        assert_eq!(form.form.values()["name"], "Ali");

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| {
                let area = f.size();
                form.render(f, area)
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("Saving…"));
    }
}
