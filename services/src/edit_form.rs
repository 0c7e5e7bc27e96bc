//! Edit form inferred from an arbitrary record.
//!
//! Every key except the system denylist becomes a field. `status` and `role`
//! become selects when options exist; everything else is a text input seeded
//! with the stringified value.

use client::Record;
use client::record::display_value;
use serde_json::Value;
use thiserror::Error;

/// Keys never offered for editing.
pub const SYSTEM_FIELDS: [&str; 6] = ["id", "_id", "createdAt", "updatedAt", "__v", "password"];

/// Status choices when the caller supplies none.
pub const DEFAULT_STATUS_OPTIONS: [&str; 5] = ["Active", "Pending", "Suspended", "Completed", "Expired"];

pub fn is_system_field(key: &str) -> bool {
    SYSTEM_FIELDS.contains(&key)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldOptions {
    pub status: Vec<String>,
    pub role: Vec<String>,
}

impl FieldOptions {
    pub fn new(status: &[&str], role: &[&str]) -> Self {
        Self {
            status: status.iter().map(|s| s.to_string()).collect(),
            role: role.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn status_or_default(&self) -> Vec<String> {
        if self.status.is_empty() {
            DEFAULT_STATUS_OPTIONS.iter().map(|s| s.to_string()).collect()
        } else {
            self.status.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Select(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub key: String,
    pub label: String,
    pub kind: FieldKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0} cannot be edited")]
    NotEditable(String),

    #[error("{value:?} is not a valid choice for {key}")]
    InvalidChoice { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditForm {
    pub title: String,
    record: Record,
    fields: Vec<Field>,
}

impl EditForm {
    /// Builds the form; `None` means there is nothing to edit.
    pub fn open(title: impl Into<String>, record: Option<&Record>, options: &FieldOptions) -> Option<Self> {
        let record = record?.clone();
        let status_options = options.status_or_default();

        let fields = record
            .iter()
            .filter(|(key, _)| !is_system_field(key))
            .map(|(key, value)| {
                let kind = if key.eq_ignore_ascii_case("status") && !status_options.is_empty() {
                    FieldKind::Select(status_options.clone())
                } else if key.as_str() == "role" && !options.role.is_empty() {
                    FieldKind::Select(options.role.clone())
                } else {
                    FieldKind::Text
                };
                Field {
                    key: key.clone(),
                    label: label_for(key),
                    kind,
                    value: display_value(value),
                }
            })
            .collect();

        Some(Self {
            title: title.into(),
            record,
            fields,
        })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    /// Sets a field. Selects only accept one of their options.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let field = self
            .fields
            .iter_mut()
            .find(|f| f.key == key)
            .ok_or_else(|| FormError::NotEditable(key.to_string()))?;

        if let FieldKind::Select(options) = &field.kind {
            if !options.iter().any(|o| *o == value) {
                return Err(FormError::InvalidChoice {
                    key: key.to_string(),
                    value,
                });
            }
        }

        field.value = value;
        Ok(())
    }

    /// The full record with edited fields applied.
    ///
    /// Untouched fields keep their original JSON value and type; system fields
    /// pass through unchanged.
    pub fn submit(&self) -> Record {
        let mut out = self.record.clone();
        for field in &self.fields {
            let original = self.record.get(&field.key);
            let unchanged = original.is_some_and(|v| display_value(v) == field.value);
            if !unchanged {
                out.insert(field.key.clone(), Value::String(field.value.clone()));
            }
        }
        out
    }
}

/// `checkInDate` → `Check In Date`, `passport_number` → `Passport Number`.
pub fn label_for(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        match ch {
            '_' => spaced.push(' '),
            c if c.is_uppercase() => {
                spaced.push(' ');
                spaced.push(c);
            }
            c => spaced.push(c),
        }
    }

    spaced
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
