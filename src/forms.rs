//! Create forms for each entity kind
//!
//! Field layout, validation schema and draft construction live together so
//! the TUI and the CLI build identical payloads.

use std::collections::HashMap;

use serde_json::Value;

use crate::models::{EntityDraft, EntityKind, EntityRecord};
use crate::validation::{FieldErrors, FieldSchema, Schema};

/// Field injected from the session rather than typed by the user
pub const BUSINESS_ID_FIELD: &str = "business_id";

/// A user-editable input
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub numeric: bool,
}

const fn text(name: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        placeholder,
        numeric: false,
    }
}

const fn number(name: &'static str, label: &'static str, placeholder: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        placeholder,
        numeric: true,
    }
}

const CATEGORY_FIELDS: &[FieldSpec] = &[
    text("name", "Name", "Beverages"),
    number("parent_id", "Parent Category Id (optional)", "12"),
];

const LOCATION_FIELDS: &[FieldSpec] = &[
    text("name", "Name", "Main Branch"),
    text("landmark", "Landmark", "Near Liberty Market"),
    text("location_id", "Location Code", "LHR-001"),
    text("city", "City", "Lahore"),
    text("state", "State", "Punjab"),
    text("country", "Country", "Pakistan"),
];

const SUPPLIER_FIELDS: &[FieldSpec] = &[
    text("name", "Name", "Ali"),
    number("mobile_no", "Mobile", "923411415567"),
];

/// Inputs rendered for a kind, in display order
pub fn fields_for(kind: EntityKind) -> &'static [FieldSpec] {
    match kind {
        EntityKind::Category | EntityKind::Role => CATEGORY_FIELDS,
        EntityKind::Location => LOCATION_FIELDS,
        EntityKind::Supplier => SUPPLIER_FIELDS,
    }
}

pub fn schema_for(kind: EntityKind) -> Schema {
    let name = FieldSchema::text("name").min_length(1, "Name is required.");
    let business_id = FieldSchema::number(BUSINESS_ID_FIELD).integer();

    match kind {
        EntityKind::Category | EntityKind::Role => Schema::new(vec![
            name,
            FieldSchema::optional_number("parent_id").integer().positive(),
            business_id,
        ]),
        EntityKind::Location => Schema::new(vec![
            name,
            FieldSchema::text("landmark").min_length(1, "Landmark is required."),
            FieldSchema::text("location_id").min_length(1, "Location code is required."),
            FieldSchema::text("city").min_length(1, "City is required."),
            FieldSchema::text("state").min_length(1, "State is required."),
            FieldSchema::text("country").min_length(1, "Country is required."),
            business_id,
        ]),
        EntityKind::Supplier => Schema::new(vec![
            name,
            FieldSchema::number("mobile_no").integer().positive(),
            business_id,
        ]),
    }
}

/// Initial input values, taken from the record being edited if any
pub fn default_values(kind: EntityKind, record: Option<&EntityRecord>) -> HashMap<String, String> {
    let mut values: HashMap<String, String> = fields_for(kind)
        .iter()
        .map(|f| (f.name.to_string(), String::new()))
        .collect();

    match record {
        Some(EntityRecord::Category(c)) => {
            values.insert("name".into(), c.name.clone());
            if let Some(parent) = c.parent_id {
                values.insert("parent_id".into(), parent.to_string());
            }
        }
        Some(EntityRecord::Location(l)) => {
            values.insert("name".into(), l.name.clone());
            values.insert("landmark".into(), l.landmark.clone());
            values.insert("location_id".into(), l.location_id.clone());
            values.insert("city".into(), l.city.clone());
            values.insert("state".into(), l.state.clone());
            values.insert("country".into(), l.country.clone());
        }
        Some(EntityRecord::Supplier(s)) => {
            values.insert("name".into(), s.name.clone());
            values.insert("mobile_no".into(), s.mobile_no.clone());
        }
        None => {}
    }

    values
}

/// Key for errors that belong to no single field
pub const FORM_ERROR_KEY: &str = "form";

/// Validate raw input and build the create payload.
///
/// `business_id` always comes from the caller, never from `input`.
pub fn build_draft(
    kind: EntityKind,
    input: &HashMap<String, String>,
    business_id: i64,
) -> Result<EntityDraft, FieldErrors> {
    let mut input = input.clone();
    input.insert(BUSINESS_ID_FIELD.to_string(), business_id.to_string());

    let values = Value::Object(schema_for(kind).validate(&input)?);
    let decoded = match kind {
        EntityKind::Category | EntityKind::Role => {
            serde_json::from_value(values).map(EntityDraft::Category)
        }
        EntityKind::Location => serde_json::from_value(values).map(EntityDraft::Location),
        EntityKind::Supplier => serde_json::from_value(values).map(EntityDraft::Supplier),
    };

    decoded.map_err(|e| {
        let mut errors = FieldErrors::default();
        errors.0.insert(FORM_ERROR_KEY.to_string(), e.to_string());
        errors
    })
}
