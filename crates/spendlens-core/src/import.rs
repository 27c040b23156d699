//! CSV and JSON transaction file import
//!
//! Columns (CSV) and keys (JSON) are looked up through a [`FieldMapping`];
//! nothing is guessed from header names. A record missing a required field is
//! an error for the whole import, never silently skipped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use serde_json::Value;
use tracing::debug;

use crate::config::FieldMapping;
use crate::error::{Error, Result};
use crate::models::{FlowDirection, RawTransaction};

/// Supported input file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Json,
}

impl ImportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Detect format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::UnsupportedFormat(format!("{} (no extension)", path.display())))?;
        ext.parse().map_err(Error::UnsupportedFormat)
    }
}

impl std::str::FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {} (valid: csv, json)", s)),
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Read a transaction file, choosing the parser by extension
pub fn import_file(path: &Path, mapping: &FieldMapping) -> Result<Vec<RawTransaction>> {
    let format = ImportFormat::from_path(path)?;
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    debug!("Importing {} as {}", path.display(), format);
    parse(reader, format, mapping)
}

/// Parse transactions from a reader in the given format
pub fn parse<R: Read>(
    reader: R,
    format: ImportFormat,
    mapping: &FieldMapping,
) -> Result<Vec<RawTransaction>> {
    match format {
        ImportFormat::Csv => parse_csv(reader, mapping),
        ImportFormat::Json => parse_json(reader, mapping),
    }
}

/// Parse CSV with a header row
pub fn parse_csv<R: Read>(reader: R, mapping: &FieldMapping) -> Result<Vec<RawTransaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |name: &str| csv_field(&headers, &record, name);
        transactions.push(build_transaction(index + 1, field, mapping)?);
    }

    debug!("Parsed {} CSV transactions", transactions.len());
    Ok(transactions)
}

/// Parse JSON: either `[{...}, ...]` or `{"data": [{...}, ...]}`
pub fn parse_json<R: Read>(reader: R, mapping: &FieldMapping) -> Result<Vec<RawTransaction>> {
    let value: Value = serde_json::from_reader(reader)?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::UnsupportedFormat(
                    "JSON object without a 'data' array".into(),
                ))
            }
        },
        _ => {
            return Err(Error::UnsupportedFormat(
                "JSON must be an array of objects or an object with a 'data' array".into(),
            ))
        }
    };

    let mut transactions = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let object = item
            .as_object()
            .ok_or_else(|| Error::malformed(index + 1, "expected a JSON object"))?;
        let field = |name: &str| object.get(name).and_then(json_field);
        transactions.push(build_transaction(index + 1, field, mapping)?);
    }

    debug!("Parsed {} JSON transactions", transactions.len());
    Ok(transactions)
}

fn csv_field(headers: &StringRecord, record: &StringRecord, name: &str) -> Option<String> {
    let col = headers.iter().position(|h| h == name)?;
    record.get(col).map(|s| s.to_string())
}

fn json_field(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Turn looked-up fields into a transaction
fn build_transaction<F>(record: usize, field: F, mapping: &FieldMapping) -> Result<RawTransaction>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |name: &str| {
        field(name)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::malformed(record, format!("missing field '{}'", name)))
    };

    let date_str = required(&mapping.date)?;
    let date = parse_date(&date_str, &mapping.date_format)
        .ok_or_else(|| Error::malformed(record, format!("unable to parse date: {}", date_str)))?;

    let amount_str = required(&mapping.amount)?;
    let amount = parse_amount(&amount_str)
        .ok_or_else(|| Error::malformed(record, format!("unable to parse amount: {}", amount_str)))?;

    // Description may be empty, but the field has to exist
    let description = field(&mapping.description).ok_or_else(|| {
        Error::malformed(record, format!("missing field '{}'", mapping.description))
    })?;

    let token = mapping
        .flow
        .as_deref()
        .and_then(|col| field(col))
        .filter(|t| !t.is_empty());
    let flow = match token {
        Some(token) => mapping.flow_for_token(&token).ok_or_else(|| {
            Error::malformed(record, format!("unknown income/expense token: {}", token))
        })?,
        None => FlowDirection::from_signed_amount(amount),
    };

    Ok(RawTransaction {
        date,
        amount,
        description,
        flow,
    })
}

/// Parse a date in the configured format
fn parse_date(s: &str, format: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), format).ok()
}

/// Parse an amount string, handling currency symbols and thousands separators
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', '€', '£', '₽', ',', ' ', '\u{a0}'], "")
        .replace('(', "-")
        .replace(')', "");

    cleaned.parse::<f64>().ok().filter(|a| a.is_finite())
}
