use crate::libs::error::{FormError, FormResult};
use crate::libs::schema::Record;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Row};
use tokio::sync::OnceCell;

/// Environment variable holding the store connection string.
pub const DATABASE_URL_VAR: &str = "TABFORM_DATABASE_URL";

/// The three operations the form generator needs from a tabular store.
///
/// # Example
/// ```ignore
/// let rows = store.select("expenses", Some(1)).await?;
/// let columns = store.select_schema("expenses").await?;
/// store.insert("expenses", &record).await?;
/// ```
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Fetch rows, optionally capped. No filter, no imposed order.
    async fn select(&self, table: &str, limit: Option<u32>) -> FormResult<Vec<Record>>;

    /// Declared column names from the store's schema metadata, in
    /// declaration order.
    async fn select_schema(&self, table: &str) -> FormResult<Vec<String>>;

    /// Append one record in a single atomic request.
    async fn insert(&self, table: &str, record: &Record) -> FormResult<()>;
}

// The connection handle is process-scoped and shared; let a shared store
// satisfy the trait directly.
#[async_trait]
impl<T: TableStore + ?Sized> TableStore for std::sync::Arc<T> {
    async fn select(&self, table: &str, limit: Option<u32>) -> FormResult<Vec<Record>> {
        (**self).select(table, limit).await
    }

    async fn select_schema(&self, table: &str) -> FormResult<Vec<String>> {
        (**self).select_schema(table).await
    }

    async fn insert(&self, table: &str, record: &Record) -> FormResult<()> {
        (**self).insert(table, record).await
    }
}

/// Postgres-backed [`TableStore`].
///
/// The pool is built lazily on first use and reused for the life of the
/// process; there is no explicit teardown. The connection string is passed
/// through untouched, so whatever TLS mode it names stays in force.
pub struct PgStore {
    database_url: String,
    pool: OnceCell<PgPool>,
}

impl PgStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool: OnceCell::new(),
        }
    }

    /// Read the connection string from `TABFORM_DATABASE_URL`.
    pub fn from_env() -> FormResult<Self> {
        let url = std::env::var(DATABASE_URL_VAR).map_err(|_| FormError::Connection {
            reason: format!("{} is not set", DATABASE_URL_VAR),
        })?;
        Ok(Self::new(url))
    }

    async fn pool(&self) -> FormResult<&PgPool> {
        self.pool
            .get_or_try_init(|| async {
                tracing::debug!("connecting to store");
                PgPoolOptions::new()
                    .max_connections(5)
                    .connect(&self.database_url)
                    .await
            })
            .await
            .map_err(|e| FormError::Connection {
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl TableStore for PgStore {
    async fn select(&self, table: &str, limit: Option<u32>) -> FormResult<Vec<Record>> {
        let pool = self.pool().await?;
        let sql = select_sql(table, limit);
        tracing::debug!(table, ?limit, "select");
        let rows = sqlx::query(&sql)
            .fetch_all(pool)
            .await
            .map_err(|e| FormError::Fetch {
                table: table.to_string(),
                reason: e.to_string(),
            })?;
        Ok(rows.iter().map(row_to_record).collect())
    }

    async fn select_schema(&self, table: &str) -> FormResult<Vec<String>> {
        let pool = self.pool().await?;
        tracing::debug!(table, "select_schema");
        let rows = sqlx::query(
            "SELECT column_name \
             FROM information_schema.columns \
             WHERE table_name = $1 \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|e| FormError::SchemaInference {
            table: table.to_string(),
            reason: e.to_string(),
        })?;

        rows.iter()
            .map(|r| {
                r.try_get::<String, _>("column_name")
                    .map_err(|e| FormError::SchemaInference {
                        table: table.to_string(),
                        reason: e.to_string(),
                    })
            })
            .collect()
    }

    async fn insert(&self, table: &str, record: &Record) -> FormResult<()> {
        let pool = self.pool().await?;
        let columns: Vec<&str> = record.keys().map(String::as_str).collect();
        let sql = insert_sql(table, &columns);
        tracing::debug!(table, columns = ?columns, "insert");

        let mut query = sqlx::query(&sql);
        for value in record.values() {
            query = match value {
                Value::String(s) => query.bind(s.clone()),
                Value::Number(n) if n.is_i64() => query.bind(n.as_i64()),
                Value::Number(n) => query.bind(n.as_f64()),
                Value::Bool(b) => query.bind(*b),
                _ => query.bind(None::<String>),
            };
        }

        query.execute(pool).await.map_err(|e| FormError::Insert {
            table: table.to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}

// -------- SQL assembly --------

/// Table names may carry spaces and mixed case, so identifiers are always
/// double-quoted.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn select_sql(table: &str, limit: Option<u32>) -> String {
    let mut sql = format!("SELECT * FROM {}", quote_ident(table));
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {}", n));
    }
    sql
}

fn placeholders(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("${}", i)).collect()
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let cols: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        cols.join(","),
        placeholders(columns.len()).join(",")
    )
}

// -------- Row decoding --------

/// Decode a row into a [`Record`] by probing each column as i64, f64, bool,
/// then String. Anything that decodes as none of those becomes null.
fn row_to_record(row: &PgRow) -> Record {
    let mut record = Record::new();
    for col in row.columns() {
        let name = col.name();
        let value = match row.try_get::<Option<i64>, _>(name) {
            Ok(Some(v)) => Value::from(v),
            Ok(None) => Value::Null,
            Err(_) => match row.try_get::<Option<f64>, _>(name) {
                Ok(Some(v)) => Value::from(v),
                Ok(None) => Value::Null,
                Err(_) => match row.try_get::<Option<bool>, _>(name) {
                    Ok(Some(v)) => Value::from(v),
                    Ok(None) => Value::Null,
                    Err(_) => match row.try_get::<Option<String>, _>(name) {
                        Ok(Some(v)) => Value::from(v),
                        Ok(None) => Value::Null,
                        Err(_) => Value::Null, // fallback
                    },
                },
            },
        };
        record.insert(name.to_string(), value);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_sql_quotes_table_names_with_spaces() {
        assert_eq!(
            select_sql("Finance database", None),
            "SELECT * FROM \"Finance database\""
        );
    }

    #[test]
    fn select_sql_appends_limit() {
        assert_eq!(
            select_sql("expenses", Some(1)),
            "SELECT * FROM \"expenses\" LIMIT 1"
        );
    }

    #[test]
    fn quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn insert_sql_numbers_placeholders() {
        assert_eq!(
            insert_sql("expenses", &["transaction type", "value", "date"]),
            "INSERT INTO \"expenses\" (\"transaction type\",\"value\",\"date\") VALUES ($1,$2,$3)"
        );
    }
}
