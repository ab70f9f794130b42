//! Form schemas and field cleaning.
//!
//! Every resource declares its editable fields as a static `FieldSpec`
//! slice. Submitted values arrive as raw strings and are cleaned against
//! that schema; errors are collected per field instead of failing fast so
//! the whole form can be re-rendered at once.

use std::collections::BTreeMap;

use serde::Serialize;

use super::DomainError;

/// Raw submitted (or pre-populated) form values, keyed by field name.
pub type FormValues = BTreeMap<String, String>;

/// Field-level validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const MSG_REQUIRED: &str = "Este campo é obrigatório.";
pub const MSG_INVALID_CHOICE: &str =
    "Faça uma escolha válida. Sua escolha não é uma das disponíveis.";
pub const MSG_INVALID_NUMBER: &str = "Informe um número.";
pub const MSG_INVALID_EMAIL: &str = "Informe um endereço de email válido.";

/// Table a foreign-key field points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reference {
    Category,
    Work,
    Person,
    Customer,
    Employee,
    Proposal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Checkbox,
    Decimal,
    Choice { options: &'static [&'static str] },
    Reference { target: Reference },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub const fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub const fn checkbox(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Checkbox)
    }

    pub const fn decimal(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Decimal)
    }

    pub const fn choice(
        name: &'static str,
        label: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        Self::new(name, label, FieldKind::Choice { options })
    }

    pub const fn reference(name: &'static str, label: &'static str, target: Reference) -> Self {
        Self::new(name, label, FieldKind::Reference { target })
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CleanedValue {
    Text(Option<String>),
    Flag(bool),
    Decimal(Option<f64>),
    Id(Option<i32>),
}

/// Typed values produced by `clean`. Only fields that cleaned
/// successfully are present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedForm {
    values: BTreeMap<&'static str, CleanedValue>,
    references: Vec<(&'static str, Reference, i32)>,
}

impl CleanedForm {
    pub fn text(&self, name: &str) -> Option<String> {
        match self.values.get(name) {
            Some(CleanedValue::Text(value)) => value.clone(),
            _ => None,
        }
    }

    pub fn required_text(&self, name: &str) -> Result<String, DomainError> {
        self.text(name).ok_or_else(|| missing(name))
    }

    pub fn flag(&self, name: &str) -> bool {
        matches!(self.values.get(name), Some(CleanedValue::Flag(true)))
    }

    pub fn decimal(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(CleanedValue::Decimal(value)) => *value,
            _ => None,
        }
    }

    pub fn id(&self, name: &str) -> Option<i32> {
        match self.values.get(name) {
            Some(CleanedValue::Id(value)) => *value,
            _ => None,
        }
    }

    pub fn required_id(&self, name: &str) -> Result<i32, DomainError> {
        self.id(name).ok_or_else(|| missing(name))
    }

    /// Foreign keys that parsed and still need an existence check.
    pub fn references(&self) -> &[(&'static str, Reference, i32)] {
        &self.references
    }
}

fn missing(name: &str) -> DomainError {
    DomainError::Internal(format!("cleaned form has no value for '{}'", name))
}

/// Clean raw values against a schema. Returns the typed values of every
/// field that passed, plus the errors of those that did not.
pub fn clean(fields: &[FieldSpec], raw: &FormValues) -> (CleanedForm, FieldErrors) {
    let mut cleaned = CleanedForm::default();
    let mut errors = FieldErrors::new();

    for field in fields {
        let value = raw
            .get(field.name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty());

        if field.kind == FieldKind::Checkbox {
            cleaned
                .values
                .insert(field.name, CleanedValue::Flag(checkbox_value(value)));
            continue;
        }

        let Some(value) = value else {
            if field.required {
                add_error(&mut errors, field.name, MSG_REQUIRED);
            } else {
                cleaned.values.insert(field.name, empty_value(field.kind));
            }
            continue;
        };

        match field.kind {
            FieldKind::Text => {
                cleaned
                    .values
                    .insert(field.name, CleanedValue::Text(Some(value.to_string())));
            }
            FieldKind::Email => {
                if is_valid_email(value) {
                    cleaned
                        .values
                        .insert(field.name, CleanedValue::Text(Some(value.to_string())));
                } else {
                    add_error(&mut errors, field.name, MSG_INVALID_EMAIL);
                }
            }
            FieldKind::Decimal => match parse_decimal(value) {
                Some(number) => {
                    cleaned
                        .values
                        .insert(field.name, CleanedValue::Decimal(Some(number)));
                }
                None => add_error(&mut errors, field.name, MSG_INVALID_NUMBER),
            },
            FieldKind::Choice { options } => {
                if options.contains(&value) {
                    cleaned
                        .values
                        .insert(field.name, CleanedValue::Text(Some(value.to_string())));
                } else {
                    add_error(&mut errors, field.name, MSG_INVALID_CHOICE);
                }
            }
            FieldKind::Reference { target } => match value.parse::<i32>() {
                Ok(id) if id > 0 => {
                    cleaned.values.insert(field.name, CleanedValue::Id(Some(id)));
                    cleaned.references.push((field.name, target, id));
                }
                _ => add_error(&mut errors, field.name, MSG_INVALID_CHOICE),
            },
            FieldKind::Checkbox => {}
        }
    }

    (cleaned, errors)
}

pub fn add_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

fn empty_value(kind: FieldKind) -> CleanedValue {
    match kind {
        FieldKind::Decimal => CleanedValue::Decimal(None),
        FieldKind::Reference { .. } => CleanedValue::Id(None),
        FieldKind::Checkbox => CleanedValue::Flag(false),
        _ => CleanedValue::Text(None),
    }
}

fn checkbox_value(value: Option<&str>) -> bool {
    match value {
        None => false,
        Some(v) => !matches!(v.to_ascii_lowercase().as_str(), "false" | "off" | "0"),
    }
}

// Accepts both "1234.50" and "1234,50".
fn parse_decimal(value: &str) -> Option<f64> {
    value
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Render a stored optional value back into a form field.
pub fn put_opt<T: ToString>(values: &mut FormValues, name: &str, value: Option<T>) {
    if let Some(v) = value {
        values.insert(name.to_string(), v.to_string());
    }
}

pub fn put<T: ToString>(values: &mut FormValues, name: &str, value: T) {
    values.insert(name.to_string(), value.to_string());
}

pub fn put_flag(values: &mut FormValues, name: &str, value: bool) {
    if value {
        values.insert(name.to_string(), "on".to_string());
    }
}
