//! Form derivation and submission: fields from columns, then validate,
//! coerce, and assemble the insert payload.

use crate::libs::error::{FormError, FormResult};
use crate::libs::schema::{ColumnKind, ColumnSpec, Record};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which fields must be filled in before an insert is attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RequiredPolicy {
    /// Every field is required.
    #[default]
    All,
    /// Nothing is required; blank fields insert as null.
    None,
}

/// One input in the generated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: ColumnKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn label(&self) -> String {
        format!("Enter {}", self.name)
    }
}

/// The generated form: one field per non-auto-generated column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSpec {
    pub fields: Vec<FieldSpec>,
}

impl FormSpec {
    /// Derive the form from an inferred column set. Auto-generated columns
    /// are listed but never rendered as fields.
    ///
    /// # Example
    /// ```ignore
    /// let form = FormSpec::derive(&columns, RequiredPolicy::All);
    /// for field in &form.fields {
    ///     ui.input(field);
    /// }
    /// ```
    pub fn derive(columns: &[ColumnSpec], required: RequiredPolicy) -> Self {
        let fields = columns
            .iter()
            .filter(|c| !c.auto_generated)
            .map(|c| FieldSpec {
                name: c.name.clone(),
                kind: c.kind,
                required: required == RequiredPolicy::All,
            })
            .collect();
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate and coerce submitted values into the insert payload.
    ///
    /// `values` is parallel to `fields`. The result keeps field order, so
    /// the payload's key set is exactly the rendered field set. No store
    /// call happens here; a validation failure means no request is made at
    /// all.
    pub fn build_record(&self, values: &[String]) -> FormResult<Record> {
        let mut record = Record::new();
        for (i, field) in self.fields.iter().enumerate() {
            let raw = values.get(i).map(String::as_str).unwrap_or("");
            let value = coerce(field, raw)?;
            record.insert(field.name.clone(), value);
        }
        Ok(record)
    }
}

fn coerce(field: &FieldSpec, raw: &str) -> FormResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        if field.required {
            return Err(FormError::MissingField {
                field: field.name.clone(),
            });
        }
        return Ok(Value::Null);
    }

    match field.kind {
        ColumnKind::Text => Ok(Value::String(raw.to_string())),
        ColumnKind::Number => trimmed
            .parse::<f64>()
            .map(Value::from)
            .map_err(|_| FormError::InvalidField {
                field: field.name.clone(),
                reason: format!("'{}' is not a number", trimmed),
            }),
        ColumnKind::Date => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
            .map_err(|_| FormError::InvalidField {
                field: field.name.clone(),
                reason: format!("'{}' is not a date in YYYY-MM-DD form", trimmed),
            }),
    }
}
