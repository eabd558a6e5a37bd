//! Form field component for user input

use std::collections::HashMap;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::admin_tui::{traits::FormHandler, ui::Styles};
use crate::forms::FieldSpec;
use crate::validation::FieldErrors;

/// Type of form field
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormFieldType {
    Text,
    /// Accepts digits, sign and decimal point only
    Number,
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(name: &str, label: &str, field_type: FormFieldType) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn from_spec(spec: &FieldSpec) -> Self {
        let field_type = if spec.numeric {
            FormFieldType::Number
        } else {
            FormFieldType::Text
        };
        Self::new(spec.name, spec.label, field_type).with_placeholder(spec.placeholder)
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    fn char_count(&self) -> usize {
        self.value.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Number && !(c.is_ascii_digit() || matches!(c, '-' | '.' | '+')) {
            return;
        }
        let idx = self.byte_index(self.cursor_position);
        self.value.insert(idx, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let idx = self.byte_index(self.cursor_position);
            self.value.remove(idx);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.char_count() {
            let idx = self.byte_index(self.cursor_position);
            self.value.remove(idx);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.char_count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.char_count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let showing_placeholder = self.value.is_empty() && !self.placeholder.is_empty();
        let display_text = if showing_placeholder {
            &self.placeholder
        } else {
            &self.value
        };

        let border_style = if self.validation_error.is_some() {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let title = match &self.validation_error {
            Some(error) => format!("{} - {}", self.label, error),
            None => self.label.clone(),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        let text_style = if showing_placeholder {
            Styles::inactive()
        } else {
            Styles::default()
        };

        let paragraph = Paragraph::new(display_text.to_string())
            .style(text_style)
            .block(block);

        f.render_widget(paragraph, area);

        if self.is_focused {
            let cursor_x = area.x + 1 + self.cursor_position as u16;
            let cursor_y = area.y + 1;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}

/// Form container that manages multiple fields
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
    /// Message that belongs to no single field
    pub form_error: Option<String>,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
            form_error: None,
        };
        form.update_focus();
        form
    }

    /// Build fields from specs, prefilled with `values`
    pub fn from_specs(specs: &[FieldSpec], values: &HashMap<String, String>) -> Self {
        let fields = specs
            .iter()
            .map(|spec| {
                let field = FormField::from_spec(spec);
                match values.get(spec.name) {
                    Some(value) => field.with_value(value),
                    None => field,
                }
            })
            .collect();
        Self::new(fields)
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn get_field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn get_current_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    /// Current raw input keyed by field name
    pub fn values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.value.clone()))
            .collect()
    }

    /// Attach validation messages to their fields; clears the rest.
    /// Messages for unknown names become the form-level error.
    pub fn apply_errors(&mut self, errors: &FieldErrors) {
        for field in &mut self.fields {
            field.validation_error = errors.get(&field.name).map(str::to_string);
        }
        self.form_error = errors
            .iter()
            .find(|(name, _)| self.get_field(name).is_none())
            .map(|(_, message)| message.clone());
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.validation_error = None;
        }
        self.form_error = None;
    }

    pub fn has_errors(&self) -> bool {
        self.form_error.is_some() || self.fields.iter().any(|f| f.validation_error.is_some())
    }

    /// Render fields stacked vertically, three rows each
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|_| Constraint::Length(3))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (field, chunk) in self.fields.iter().zip(chunks.iter()) {
            field.render(f, *chunk);
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        self.form_error = None;
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        self.form_error = None;
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        self.form_error = None;
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn form() -> Form {
        Form::new(vec![
            FormField::new("name", "Name", FormFieldType::Text),
            FormField::new("mobile_no", "Mobile", FormFieldType::Number),
        ])
    }

    #[test]
    fn test_typing_and_cursor_editing() {
        let mut field = FormField::new("name", "Name", FormFieldType::Text);
        for c in "Caé".chars() {
            field.insert_char(c);
        }
        field.move_cursor_left();
        field.insert_char('f');
        assert_eq!(field.value, "Café");

        field.move_cursor_to_start();
        field.delete_char_forward();
        assert_eq!(field.value, "afé");
        field.move_cursor_to_end();
        field.delete_char();
        assert_eq!(field.value, "af");
    }

    #[test]
    fn test_number_field_ignores_letters() {
        let mut field = FormField::new("mobile_no", "Mobile", FormFieldType::Number);
        for c in "92a3x".chars() {
            field.insert_char(c);
        }
        assert_eq!(field.value, "923");
    }

    #[test]
    fn test_focus_cycles_through_fields() {
        let mut form = form();
        assert!(form.fields[0].is_focused);
        form.next_field();
        assert!(form.fields[1].is_focused && !form.fields[0].is_focused);
        form.next_field();
        assert_eq!(form.current_field, 0);
        form.previous_field();
        assert_eq!(form.current_field, 1);
    }

    #[test]
    fn test_errors_attach_and_clear_on_edit() {
        let mut form = form();
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), "Name is required.".to_string());
        form.apply_errors(&FieldErrors(map));

        assert_eq!(
            form.get_field("name").and_then(|f| f.validation_error.as_deref()),
            Some("Name is required.")
        );
        assert!(form.get_field("mobile_no").unwrap().validation_error.is_none());

        form.handle_char_input('A');
        assert!(!form.has_errors());
        assert_eq!(form.values()["name"], "A");
    }

    #[test]
    fn test_unknown_error_keys_become_form_error() {
        let mut form = form();
        let mut map = BTreeMap::new();
        map.insert("form".to_string(), "invalid type: floating point `1.5`".to_string());
        form.apply_errors(&FieldErrors(map));

        assert!(form.has_errors());
        assert!(form.fields.iter().all(|f| f.validation_error.is_none()));
        assert_eq!(
            form.form_error.as_deref(),
            Some("invalid type: floating point `1.5`")
        );

        form.handle_char_input('x');
        assert!(form.form_error.is_none());
    }
}
