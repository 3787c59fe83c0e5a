// schema.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of a remote table: column name -> scalar value, in store order.
pub type Record = serde_json::Map<String, Value>;

/// The one column name the remote store fills in by itself.
pub const ID_COLUMN: &str = "id";

/// Scalar input type a form field can render as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Text,
    Number,
    Date,
}

impl ColumnKind {
    /// Infer a kind from a sampled row value.
    pub fn for_value(value: &Value) -> Self {
        match value {
            Value::Number(_) => ColumnKind::Number,
            Value::String(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => {
                ColumnKind::Date
            }
            _ => ColumnKind::Text,
        }
    }
}

/// A column as the form generator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
    /// True exactly when the store generates this column's value itself.
    /// Such columns show up in the listing but never in the form.
    pub auto_generated: bool,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        let name = name.into();
        // Exact match only. Table and column references are case- and
        // whitespace-sensitive throughout.
        let auto_generated = name == ID_COLUMN;
        Self {
            name,
            kind,
            auto_generated,
        }
    }
}

/// What to do when the table has no rows to sample columns from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FallbackPolicy {
    /// Ask the store's schema metadata for the declared columns.
    #[default]
    SchemaQuery,
    /// Use a hard-coded list of expected columns.
    Fixed(Vec<String>),
    /// Render a form with zero fields.
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_for_number_value() {
        assert_eq!(ColumnKind::for_value(&json!(4.5)), ColumnKind::Number);
        assert_eq!(ColumnKind::for_value(&json!(7)), ColumnKind::Number);
    }

    #[test]
    fn kind_for_iso_date_string() {
        assert_eq!(
            ColumnKind::for_value(&json!("2024-01-01")),
            ColumnKind::Date
        );
    }

    #[test]
    fn kind_for_everything_else_is_text() {
        assert_eq!(ColumnKind::for_value(&json!("Coffee")), ColumnKind::Text);
        assert_eq!(ColumnKind::for_value(&json!("01/02/2024")), ColumnKind::Text);
        assert_eq!(ColumnKind::for_value(&json!(true)), ColumnKind::Text);
        assert_eq!(ColumnKind::for_value(&Value::Null), ColumnKind::Text);
    }

    #[test]
    fn id_column_is_flagged_auto_generated() {
        assert!(ColumnSpec::new("id", ColumnKind::Number).auto_generated);
        assert!(!ColumnSpec::new("Id", ColumnKind::Number).auto_generated);
        assert!(!ColumnSpec::new(" id", ColumnKind::Number).auto_generated);
        assert!(!ColumnSpec::new("uid", ColumnKind::Number).auto_generated);
    }

    #[test]
    fn default_fallback_is_schema_query() {
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::SchemaQuery);
    }
}
