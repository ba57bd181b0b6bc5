//! Renders a flattened [`Table`] to a file format.

use std::fmt::Write as _;

use crate::error::Result;
use crate::flatten::Table;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

pub fn render(table: &Table, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Csv => Ok(to_csv(table)),
        ExportFormat::Json => Ok(serde_json::to_string_pretty(table)? + "\n"),
        ExportFormat::Yaml => Ok(serde_yaml::to_string(table)?),
    }
}

/// RFC 4180 style: CRLF records, fields quoted when they contain a comma,
/// quote or line break.
pub fn to_csv(table: &Table) -> String {
    let mut out = String::new();
    for record in std::iter::once(&table.header).chain(table.rows.iter()) {
        let line = record
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",");
        let _ = write!(out, "{}\r\n", line);
    }
    out
}

fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
