//! The render pass: one linear execution per user interaction.

use crate::libs::config::AppConfig;
use crate::libs::error::FormResult;
use crate::libs::form::FormSpec;
use crate::libs::infer::infer_columns;
use crate::libs::store::TableStore;
use crate::libs::ui::Ui;

/// A generic record form over one remote table.
///
/// The whole page logic lives in [`run_pass`](Self::run_pass), which the
/// host re-invokes on every interaction: initial load, submission, or any
/// widget change. A pass holds no state of its own; the only thing shared
/// between passes is the store's connection handle.
///
/// # Example
/// ```ignore
/// let app = FormApp::new(PgStore::from_env()?, AppConfig::from_env()?)?;
/// app.run_pass(&mut ui).await?;
/// ```
pub struct FormApp<S> {
    store: S,
    config: AppConfig,
}

impl<S: TableStore> FormApp<S> {
    pub fn new(store: S, config: AppConfig) -> FormResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Execute one full render pass against `ui`.
    ///
    /// Connection failures abort the pass and propagate; inference and
    /// listing failures degrade to warnings and the pass completes. At
    /// most one insert happens per pass, and only when the host reports a
    /// submission.
    pub async fn run_pass(&self, ui: &mut dyn Ui) -> FormResult<()> {
        tracing::debug!(table = %self.config.table, "render pass");
        ui.title(&self.config.title);

        let columns = match infer_columns(
            &self.store,
            &self.config.table,
            &self.config.fallback,
            &self.config.kind_overrides,
        )
        .await
        {
            Ok(columns) => columns,
            Err(e) if e.is_fatal() => {
                ui.error(&e.to_string());
                return Err(e);
            }
            Err(e) => {
                // Keep rendering; the form simply has zero fields.
                tracing::warn!(error = %e, "schema inference failed");
                ui.warning(&e.to_string());
                Vec::new()
            }
        };

        ui.header("Existing Records");
        let rows = match self.store.select(&self.config.table, None).await {
            Ok(rows) => rows,
            Err(e) if e.is_fatal() => {
                ui.error(&e.to_string());
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "listing failed");
                ui.warning(&e.to_string());
                Vec::new()
            }
        };
        if rows.is_empty() {
            ui.text("No records found.");
        } else {
            let names: Vec<String> = columns.iter().map(|c| c.name.clone()).collect();
            ui.table(&names, &rows);
        }

        ui.header("Add New Record");
        let form = FormSpec::derive(&columns, self.config.required);
        let mut values = Vec::with_capacity(form.fields.len());
        for field in &form.fields {
            values.push(ui.input(field));
        }

        if ui.submit_button("Submit") && !form.is_empty() {
            match form.build_record(&values) {
                Ok(record) => match self.store.insert(&self.config.table, &record).await {
                    Ok(()) => {
                        tracing::info!(table = %self.config.table, "record added");
                        ui.success("Record added!");
                        ui.clear_inputs();
                        ui.request_rerun();
                    }
                    Err(e) if e.is_fatal() => {
                        ui.error(&e.to_string());
                        return Err(e);
                    }
                    // Raw store message, form contents preserved.
                    Err(e) => ui.error(&e.to_string()),
                },
                // No store call was made; the user corrects and resubmits.
                Err(e) => ui.error(&e.to_string()),
            }
        }

        Ok(())
    }
}
