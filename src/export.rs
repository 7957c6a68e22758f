//! CSV export of the task list.
//!
//! The column layout is fixed for compatibility with spreadsheets already
//! built on exports from earlier releases, headers included.

use crate::error::Result;
use crate::tasks::Task;
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::Path;

/// Header row of the export, in column order.
pub const CSV_HEADER: [&str; 9] = [
    "ID",
    "Título",
    "Categoría",
    "Estado",
    "Tiempo Empleado (segundos)",
    "Tiempo Empleado (HH:MM:SS)",
    "Iniciada En",
    "Creada En",
    "Actualizada En",
];

/// Write tasks as UTF-8 CSV: a header row, then one row per task in the
/// order given. Timestamps are RFC 3339, or empty when null.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn write_tasks_csv<W: Write>(tasks: &[Task], mut writer: W) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER.map(csv_escape).join(","))?;

    for task in tasks {
        let row = [
            task.id.to_string(),
            task.title.clone(),
            task.category.clone(),
            task.status.as_str().to_string(),
            task.time_spent.to_string(),
            task.total_time_str(),
            timestamp_field(task.started_at),
            timestamp_field(Some(task.created_at)),
            timestamp_field(Some(task.updated_at)),
        ];
        let escaped: Vec<String> = row.iter().map(|f| csv_escape(f)).collect();
        writeln!(writer, "{}", escaped.join(","))?;
    }

    writer.flush()?;
    Ok(())
}

/// Export tasks to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn export_tasks_to_path(tasks: &[Task], path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_tasks_csv(tasks, std::io::BufWriter::new(file))
}

fn timestamp_field(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.to_rfc3339()).unwrap_or_default()
}

/// Quote a field if it contains a comma, quote, or newline; quotes inside
/// are doubled.
fn csv_escape(field: &str) -> String {
    if field.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
