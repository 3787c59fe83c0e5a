//! Terminal front end for the generic record form.
//!
//! Reads `TABFORM_DATABASE_URL` and `TABFORM_TABLE` (plus the optional
//! `TABFORM_*` knobs) from the environment, then loops: list the table,
//! prompt for each inferred field, submit, rerun.

use serde_json::Value;
use std::collections::HashMap;
use std::io::{self, Write};
use tabform::{AppConfig, FieldSpec, FormApp, PgStore, Record, Ui};

struct ConsoleUi {
    /// Widget state between passes; cleared only on successful insert.
    entries: HashMap<String, String>,
    rerun: bool,
}

impl ConsoleUi {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            rerun: false,
        }
    }

    fn take_rerun(&mut self) -> bool {
        std::mem::take(&mut self.rerun)
    }

    fn prompt(&self, text: &str) -> String {
        print!("{text}");
        let _ = io::stdout().flush();
        let mut line = String::new();
        let _ = io::stdin().read_line(&mut line);
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

impl Ui for ConsoleUi {
    fn title(&mut self, text: &str) {
        println!("\n== {text} ==");
    }

    fn header(&mut self, text: &str) {
        println!("\n-- {text} --");
    }

    fn text(&mut self, text: &str) {
        println!("{text}");
    }

    fn table(&mut self, columns: &[String], rows: &[Record]) {
        // Inference can fail while the listing still loads; fall back to
        // the first row's own keys in that case.
        let columns: Vec<String> = if columns.is_empty() {
            rows.first()
                .map(|r| r.keys().cloned().collect())
                .unwrap_or_default()
        } else {
            columns.to_vec()
        };

        let mut table = comfy_table::Table::new();
        table.set_header(columns.clone());
        for row in rows {
            let cells: Vec<String> = columns.iter().map(|c| render_cell(row.get(c))).collect();
            table.add_row(cells);
        }
        println!("{table}");
    }

    fn input(&mut self, field: &FieldSpec) -> String {
        let previous = self.entries.get(&field.name).cloned().unwrap_or_default();
        let hint = if previous.is_empty() {
            String::new()
        } else {
            format!(" [{previous}]")
        };
        let entered = self.prompt(&format!("{}{}: ", field.label(), hint));
        let value = if entered.is_empty() { previous } else { entered };
        self.entries.insert(field.name.clone(), value.clone());
        value
    }

    fn submit_button(&mut self, label: &str) -> bool {
        self.prompt(&format!("{label}? [y/N]: "))
            .eq_ignore_ascii_case("y")
    }

    fn success(&mut self, message: &str) {
        println!("[ok] {message}");
    }

    fn warning(&mut self, message: &str) {
        println!("[warn] {message}");
    }

    fn error(&mut self, message: &str) {
        println!("[error] {message}");
    }

    fn clear_inputs(&mut self) {
        self.entries.clear();
    }

    fn request_rerun(&mut self) {
        self.rerun = true;
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env()?;
    let app = FormApp::new(PgStore::from_env()?, config)?;

    let mut ui = ConsoleUi::new();
    loop {
        app.run_pass(&mut ui).await?;
        if !ui.take_rerun() {
            break;
        }
    }
    Ok(())
}
