use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde_json::Value;
use tracing::info;

use crate::leaders::{LeadersIndex, NO_INFORMATION};

pub const DEFAULT_JSON_PATH: &str = "./leaders.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Country code -> array of leader objects
    Json,
    /// One row per leader with a `country` column
    Csv,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

pub fn write(index: &LeadersIndex, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Json => write_json(index, path),
        ExportFormat::Csv => write_csv(index, path),
    }
}

/// Nested export; non-ASCII text is written as-is.
pub fn write_json(index: &LeadersIndex, path: &Path) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, index)?;
    out.flush()?;
    info!("Wrote {} leaders to {}", index.leader_count(), path.display());
    Ok(())
}

pub fn read_json(path: &Path) -> Result<LeadersIndex, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Flat export. Columns: `country`, every pass-through field (sorted),
/// `wikipedia_url`, `first_wiki_par`.
pub fn write_csv(index: &LeadersIndex, path: &Path) -> Result<(), ExportError> {
    let fields: BTreeSet<&str> = index
        .leaders()
        .flat_map(|(_, l)| l.fields.keys().map(String::as_str))
        .collect();

    let mut writer = csv::Writer::from_path(path)?;
    let mut header = vec!["country"];
    header.extend(fields.iter().copied());
    header.extend(["wikipedia_url", "first_wiki_par"]);
    writer.write_record(&header)?;

    for (country, leader) in index.leaders() {
        let mut row: Vec<String> = Vec::with_capacity(header.len());
        row.push(country.clone());
        row.extend(fields.iter().map(|f| cell(leader.fields.get(*f))));
        row.push(leader.wikipedia_url.clone());
        row.push(
            leader
                .first_wiki_par
                .as_ref()
                .map_or(NO_INFORMATION, |b| b.as_str())
                .to_string(),
        );
        writer.write_record(&row)?;
    }
    writer.flush()?;
    info!("Wrote {} rows to {}", index.leader_count(), path.display());
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
