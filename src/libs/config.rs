//! Configuration types

use crate::libs::error::{FormError, FormResult};
use crate::libs::form::RequiredPolicy;
use crate::libs::schema::{ColumnKind, FallbackPolicy};
use serde::{Deserialize, Serialize};

/// Environment variables read by [`AppConfig::from_env`].
pub const TABLE_VAR: &str = "TABFORM_TABLE";
pub const TITLE_VAR: &str = "TABFORM_TITLE";
pub const FALLBACK_VAR: &str = "TABFORM_FALLBACK";
pub const REQUIRED_VAR: &str = "TABFORM_REQUIRED";

/// Everything that varies between deployments of the same form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote table reference. Case- and whitespace-sensitive; passed to
    /// the store exactly as written.
    pub table: String,
    pub title: String,
    pub fallback: FallbackPolicy,
    pub required: RequiredPolicy,
    /// Per-column kind overrides; these win over inference.
    pub kind_overrides: Vec<(String, ColumnKind)>,
}

impl AppConfig {
    pub fn new(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            title: table.clone(),
            table,
            fallback: FallbackPolicy::default(),
            required: RequiredPolicy::default(),
            kind_overrides: Vec::new(),
        }
    }

    /// Build from environment variables.
    ///
    /// - `TABFORM_TABLE`: remote table reference (required)
    /// - `TABFORM_TITLE`: page title (default: the table reference)
    /// - `TABFORM_FALLBACK`: `schema`, `empty`, or `fixed:a,b,c`
    ///   (default: `schema`)
    /// - `TABFORM_REQUIRED`: `all` or `none` (default: `all`)
    pub fn from_env() -> FormResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading from an arbitrary
    /// key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> FormResult<Self> {
        let table = lookup(TABLE_VAR).ok_or_else(|| FormError::Config {
            field: TABLE_VAR.to_string(),
            reason: "not set".to_string(),
        })?;

        let mut config = Self::new(table);
        if let Some(title) = lookup(TITLE_VAR) {
            config.title = title;
        }
        if let Some(raw) = lookup(FALLBACK_VAR) {
            config.fallback = parse_fallback(&raw)?;
        }
        if let Some(raw) = lookup(REQUIRED_VAR) {
            config.required = match raw.as_str() {
                "all" => RequiredPolicy::All,
                "none" => RequiredPolicy::None,
                other => {
                    return Err(FormError::Config {
                        field: REQUIRED_VAR.to_string(),
                        reason: format!("'{}' is not 'all' or 'none'", other),
                    });
                }
            };
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> FormResult<()> {
        if self.table.is_empty() {
            return Err(FormError::Config {
                field: "table".to_string(),
                reason: "table reference must not be empty".to_string(),
            });
        }
        if let FallbackPolicy::Fixed(names) = &self.fallback {
            if names.iter().any(String::is_empty) {
                return Err(FormError::Config {
                    field: "fallback".to_string(),
                    reason: "fixed column list contains an empty name".to_string(),
                });
            }
        }
        if self.kind_overrides.iter().any(|(name, _)| name.is_empty()) {
            return Err(FormError::Config {
                field: "kind_overrides".to_string(),
                reason: "override names a column with an empty name".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_fallback(raw: &str) -> FormResult<FallbackPolicy> {
    match raw {
        "schema" => Ok(FallbackPolicy::SchemaQuery),
        "empty" => Ok(FallbackPolicy::Empty),
        other => match other.strip_prefix("fixed:") {
            Some(list) => Ok(FallbackPolicy::Fixed(
                list.split(',').map(str::to_string).collect(),
            )),
            None => Err(FormError::Config {
                field: FALLBACK_VAR.to_string(),
                reason: format!("'{}' is not 'schema', 'empty', or 'fixed:...'", other),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = AppConfig::from_lookup(lookup(&[(TABLE_VAR, "Finance database")])).unwrap();
        assert_eq!(config.table, "Finance database");
        assert_eq!(config.title, "Finance database");
        assert_eq!(config.fallback, FallbackPolicy::SchemaQuery);
        assert_eq!(config.required, RequiredPolicy::All);
    }

    #[test]
    fn missing_table_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, FormError::Config { field, .. } if field == TABLE_VAR));
    }

    #[test]
    fn fixed_fallback_parses_comma_list() {
        let config = AppConfig::from_lookup(lookup(&[
            (TABLE_VAR, "expenses"),
            (FALLBACK_VAR, "fixed:transaction type,value,date"),
        ]))
        .unwrap();
        assert_eq!(
            config.fallback,
            FallbackPolicy::Fixed(vec![
                "transaction type".to_string(),
                "value".to_string(),
                "date".to_string(),
            ])
        );
    }

    #[test]
    fn unknown_fallback_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[
            (TABLE_VAR, "expenses"),
            (FALLBACK_VAR, "guess"),
        ]))
        .unwrap_err();
        assert!(matches!(err, FormError::Config { field, .. } if field == FALLBACK_VAR));
    }

    #[test]
    fn required_none_parses() {
        let config = AppConfig::from_lookup(lookup(&[
            (TABLE_VAR, "expenses"),
            (REQUIRED_VAR, "none"),
        ]))
        .unwrap();
        assert_eq!(config.required, RequiredPolicy::None);
    }

    #[test]
    fn empty_table_reference_fails_validation() {
        let err = AppConfig::new("").validate().unwrap_err();
        assert!(matches!(err, FormError::Config { field, .. } if field == "table"));
    }

    #[test]
    fn table_reference_is_not_trimmed() {
        let config = AppConfig::from_lookup(lookup(&[(TABLE_VAR, " Finance database ")])).unwrap();
        assert_eq!(config.table, " Finance database ");
    }
}
