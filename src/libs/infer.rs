//! Column inference: sample one row, fall back to configured policy.

use crate::libs::error::{FormError, FormResult};
use crate::libs::schema::{ColumnKind, ColumnSpec, FallbackPolicy};
use crate::libs::store::TableStore;

/// Determine the ordered column set of `table`.
///
/// A single-row probe wins whenever the table has any data: the sampled
/// row's key set, in the order the store produced it, is the column list,
/// and each kind is inferred from the sampled value. Only an empty table
/// consults the fallback policy. Kind overrides from configuration win on
/// either path.
///
/// Columns are re-derived on every render pass; nothing here is cached.
pub async fn infer_columns(
    store: &dyn TableStore,
    table: &str,
    policy: &FallbackPolicy,
    kind_overrides: &[(String, ColumnKind)],
) -> FormResult<Vec<ColumnSpec>> {
    let sample = store.select(table, Some(1)).await.map_err(|e| match e {
        // A failed probe is an inference failure, not a listing failure.
        FormError::Fetch { table, reason } => FormError::SchemaInference { table, reason },
        other => other,
    })?;

    let mut columns = match sample.first() {
        Some(row) => {
            tracing::debug!(table, "columns inferred from sampled row");
            row.iter()
                .map(|(name, value)| ColumnSpec::new(name, ColumnKind::for_value(value)))
                .collect()
        }
        None => match policy {
            FallbackPolicy::SchemaQuery => {
                tracing::debug!(table, "table empty, querying schema metadata");
                specs_from_names(store.select_schema(table).await?)
            }
            FallbackPolicy::Fixed(names) => {
                tracing::debug!(table, "table empty, using fixed column list");
                specs_from_names(names.clone())
            }
            FallbackPolicy::Empty => {
                tracing::debug!(table, "table empty, rendering zero columns");
                Vec::new()
            }
        },
    };

    for column in &mut columns {
        if let Some((_, kind)) = kind_overrides.iter().find(|(name, _)| *name == column.name) {
            column.kind = *kind;
        }
    }

    Ok(columns)
}

/// Fallback paths have no values to sniff, so everything is text until a
/// configured override says otherwise.
fn specs_from_names(names: Vec<String>) -> Vec<ColumnSpec> {
    names
        .into_iter()
        .map(|name| ColumnSpec::new(name, ColumnKind::Text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_default_to_text() {
        let specs = specs_from_names(vec!["id".to_string(), "amount".to_string()]);
        assert_eq!(specs.len(), 2);
        assert!(specs.iter().all(|s| s.kind == ColumnKind::Text));
        assert!(specs[0].auto_generated);
        assert!(!specs[1].auto_generated);
    }
}
