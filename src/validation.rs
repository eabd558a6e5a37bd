//! Declarative form validation
//!
//! A [`Schema`] is plain data: each field names a coercion and a list of
//! rules, each rule paired with the message shown when it fails. Evaluation
//! happens before anything is sent to the backend.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Number, Value};

/// How raw input text is turned into a value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coerce {
    /// Kept as a string
    Text,
    /// Parsed as a number; blank input becomes 0
    Number,
    /// Parsed as a number; blank input becomes null and skips the rules
    OptionalNumber,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// At least this many characters (text fields)
    MinLength(usize),
    /// Strictly greater than zero (number fields)
    Positive,
    /// No fractional part (number fields)
    Integer,
    /// Magnitude at most [`MAX_SAFE_INTEGER`] (number fields)
    SafeInteger,
}

/// Largest integer every client and the backend represent exactly
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub rule: Rule,
    pub message: String,
}

impl Constraint {
    pub fn new(rule: Rule, message: &str) -> Self {
        Self {
            rule,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: &'static str,
    pub coerce: Coerce,
    pub constraints: Vec<Constraint>,
}

impl FieldSchema {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            coerce: Coerce::Text,
            constraints: Vec::new(),
        }
    }

    pub fn number(name: &'static str) -> Self {
        Self {
            name,
            coerce: Coerce::Number,
            constraints: Vec::new(),
        }
    }

    pub fn optional_number(name: &'static str) -> Self {
        Self {
            name,
            coerce: Coerce::OptionalNumber,
            constraints: Vec::new(),
        }
    }

    pub fn min_length(mut self, min: usize, message: &str) -> Self {
        self.constraints.push(Constraint::new(Rule::MinLength(min), message));
        self
    }

    pub fn positive(mut self) -> Self {
        self.constraints
            .push(Constraint::new(Rule::Positive, "Number must be greater than 0"));
        self
    }

    /// Whole numbers only, within the safe integer range
    pub fn integer(mut self) -> Self {
        self.constraints
            .push(Constraint::new(Rule::Integer, "Expected integer, received float"));
        self.constraints.push(Constraint::new(
            Rule::SafeInteger,
            "Number must be less than or equal to 9007199254740991",
        ));
        self
    }

    /// Coerce and check one raw input. Returns the first failing message.
    pub fn evaluate(&self, raw: &str) -> Result<Value, String> {
        match self.coerce {
            Coerce::Text => {
                let value = raw.to_string();
                for constraint in &self.constraints {
                    if let Rule::MinLength(min) = constraint.rule {
                        if value.chars().count() < min {
                            return Err(constraint.message.clone());
                        }
                    }
                }
                Ok(Value::String(value))
            }
            Coerce::Number | Coerce::OptionalNumber => {
                let trimmed = raw.trim();
                if trimmed.is_empty() && self.coerce == Coerce::OptionalNumber {
                    return Ok(Value::Null);
                }

                let number = coerce_number(trimmed)
                    .ok_or_else(|| "Expected number, received nan".to_string())?;

                for constraint in &self.constraints {
                    let failed = match constraint.rule {
                        Rule::Positive => number <= 0.0,
                        Rule::Integer => number.fract() != 0.0,
                        Rule::SafeInteger => number.abs() > MAX_SAFE_INTEGER,
                        Rule::MinLength(_) => false,
                    };
                    if failed {
                        return Err(constraint.message.clone());
                    }
                }

                Ok(number_value(number))
            }
        }
    }
}

/// Blank input coerces to zero, anything unparsable is rejected
fn coerce_number(trimmed: &str) -> Option<f64> {
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number_value(number: f64) -> Value {
    if number.fract() == 0.0 && number.abs() < i64::MAX as f64 {
        Value::Number(Number::from(number as i64))
    } else {
        Number::from_f64(number).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Per-field messages from a failed validation, in field name order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub fields: Vec<FieldSchema>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSchema>) -> Self {
        Self { fields }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate every field; missing inputs are treated as blank
    pub fn validate(&self, input: &HashMap<String, String>) -> Result<Map<String, Value>, FieldErrors> {
        let mut values = Map::new();
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            let raw = input.get(field.name).map(String::as_str).unwrap_or("");
            match field.evaluate(raw) {
                Ok(value) => {
                    values.insert(field.name.to_string(), value);
                }
                Err(message) => {
                    errors.insert(field.name.to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(FieldErrors(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supplier_schema() -> Schema {
        Schema::new(vec![
            FieldSchema::text("name").min_length(1, "Name is required."),
            FieldSchema::number("mobile_no").integer().positive(),
            FieldSchema::number("business_id"),
        ])
    }

    fn input(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let errors = supplier_schema()
            .validate(&input(&[("name", ""), ("mobile_no", "923411415567"), ("business_id", "7")]))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("name"), Some("Name is required."));
    }

    #[test]
    fn test_numbers_are_coerced() {
        let values = supplier_schema()
            .validate(&input(&[("name", "Ali"), ("mobile_no", " 923411415567 "), ("business_id", "7")]))
            .unwrap();
        assert_eq!(values["mobile_no"], serde_json::json!(923411415567i64));
        assert_eq!(values["business_id"], serde_json::json!(7));
    }

    #[test]
    fn test_blank_number_coerces_to_zero_and_fails_positive() {
        let errors = supplier_schema()
            .validate(&input(&[("name", "Ali"), ("business_id", "7")]))
            .unwrap_err();
        assert_eq!(errors.get("mobile_no"), Some("Number must be greater than 0"));
    }

    #[test]
    fn test_non_numeric_input() {
        let errors = supplier_schema()
            .validate(&input(&[("name", "Ali"), ("mobile_no", "12ab"), ("business_id", "7")]))
            .unwrap_err();
        assert_eq!(errors.get("mobile_no"), Some("Expected number, received nan"));
    }

    #[test]
    fn test_optional_number_allows_blank() {
        let field = FieldSchema::optional_number("parent_id").positive();
        assert_eq!(field.evaluate("").unwrap(), Value::Null);
        assert_eq!(field.evaluate("4").unwrap(), serde_json::json!(4));
        assert!(field.evaluate("-4").is_err());
    }

    #[test]
    fn test_all_failing_fields_reported() {
        let errors = supplier_schema()
            .validate(&input(&[("mobile_no", "-1")]))
            .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.to_string().contains("name: Name is required."));
    }

    #[test]
    fn test_fractional_and_oversized_numbers_rejected_per_field() {
        let schema = supplier_schema();

        let errors = schema
            .validate(&input(&[("name", "Ali"), ("mobile_no", "1.5"), ("business_id", "7")]))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("mobile_no"), Some("Expected integer, received float"));

        let errors = schema
            .validate(&input(&[
                ("name", "Ali"),
                ("mobile_no", "99999999999999999999"),
                ("business_id", "7"),
            ]))
            .unwrap_err();
        assert_eq!(
            errors.get("mobile_no"),
            Some("Number must be less than or equal to 9007199254740991")
        );

        let parent = FieldSchema::optional_number("parent_id").integer().positive();
        assert_eq!(parent.evaluate("2.0").unwrap(), serde_json::json!(2));
        assert!(parent.evaluate("0.5").is_err());
    }
}
