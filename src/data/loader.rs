use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{PrizeEntry, PrizeTable, RawRecord};
use crate::error::{Error, Result};

/// Columns every raw input must carry, in the order they are reported.
pub const RAW_COLUMNS: &[&str] = &[
    "prize_id",
    "prize_name",
    "prize_alias",
    "prize_institution",
    "prize_year",
    "prize_genre",
    "person_id",
    "first_name",
    "last_name",
    "gender",
    "uk_residence",
    "ethnicity_macro",
    "highest_degree",
    "degree_field_cat",
    "degree_institution",
    "degree_field",
    "person_role",
    "book_id",
    "book_title",
];

/// Alternative upstream names accepted for a raw column.
const RAW_ALIASES: &[(&str, &str)] = &[("degree_field_cat", "degree_field_category")];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load raw prize records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming at least [`RAW_COLUMNS`]
/// * `.json`    – `[{ "prize_id": ..., ... }, ...]`
/// * `.parquet` – one column per field, any scalar type
pub fn load_raw(path: &Path) -> Result<Vec<RawRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_raw_csv(path)?,
        "json" => load_raw_json(path)?,
        "parquet" | "pq" => load_raw_parquet(path)?,
        other => return Err(Error::UnsupportedFormat(other.to_string())),
    };
    log::info!("Loaded {} raw records from {}", records.len(), path.display());
    Ok(records)
}

/// Load the normalized table written by the cleaner.
pub fn load_table(path: &Path) -> Result<PrizeTable> {
    let file = open(path)?;
    let mut reader = csv::Reader::from_reader(file);

    let mut entries = Vec::new();
    for result in reader.deserialize::<PrizeEntry>() {
        entries.push(result?);
    }

    let table = PrizeTable::from_entries(entries);
    log::info!(
        "Loaded {} prize entries ({} genres) from {}",
        table.len(),
        table.genres().len(),
        path.display()
    );
    Ok(table)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Column resolution shared by every raw format
// ---------------------------------------------------------------------------

/// Maps each required raw column to its position in the input.
struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    /// Resolve [`RAW_COLUMNS`] against the input's header names, failing on
    /// the first one that is absent.
    fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.as_ref().trim() == name);

        let mut positions = HashMap::with_capacity(RAW_COLUMNS.len());
        for &column in RAW_COLUMNS {
            let alias = RAW_ALIASES
                .iter()
                .find(|(canonical, _)| *canonical == column)
                .map(|(_, alias)| *alias);
            let pos = find(column)
                .or_else(|| alias.and_then(find))
                .ok_or_else(|| Error::MissingColumn {
                    column: column.to_string(),
                })?;
            positions.insert(column, pos);
        }
        Ok(Self { positions })
    }

    /// Build a record from one row, given a way to read a cell by position.
    fn record(&self, row: usize, cell: impl Fn(usize) -> String) -> Result<RawRecord> {
        let get = |column: &str| cell(self.positions[column]);

        Ok(RawRecord {
            prize_id: get("prize_id"),
            prize_name: get("prize_name"),
            prize_alias: get("prize_alias"),
            prize_institution: get("prize_institution"),
            prize_year: parse_year(&get("prize_year"), row)?,
            prize_genre: get("prize_genre"),
            person_id: get("person_id"),
            first_name: get("first_name"),
            last_name: get("last_name"),
            gender: get("gender"),
            uk_residence: parse_flag(&get("uk_residence"), row)?,
            ethnicity_macro: get("ethnicity_macro"),
            highest_degree: get("highest_degree"),
            degree_field_cat: get("degree_field_cat"),
            degree_institution: get("degree_institution"),
            degree_field: get("degree_field"),
            person_role: get("person_role"),
            book_id: get("book_id"),
            book_title: get("book_title"),
        })
    }
}

fn parse_year(s: &str, row: usize) -> Result<i32> {
    let t = s.trim();
    // Parquet/JSON writers sometimes emit whole-number floats ("2019.0").
    let t = t.strip_suffix(".0").unwrap_or(t);
    t.parse::<i32>().map_err(|_| Error::Malformed {
        row,
        column: "prize_year".to_string(),
        reason: format!("'{s}' is not a year"),
    })
}

fn parse_flag(s: &str, row: usize) -> Result<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        "" | "na" => {
            log::warn!("row {row}: blank uk_residence read as false");
            Ok(false)
        }
        _ => Err(Error::Malformed {
            row,
            column: "uk_residence".to_string(),
            reason: format!("'{s}' is not a boolean"),
        }),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_raw_csv(path: &Path) -> Result<Vec<RawRecord>> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let index = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(records.len() + 2, |p| p.line() as usize);
        let raw = index.record(line, |pos| record.get(pos).unwrap_or("").to_string())?;
        records.push(raw);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "prize_id": "12", "prize_year": 2019, "uk_residence": true, ... },
///   ...
/// ]
/// ```
fn load_raw_json(path: &Path) -> Result<Vec<RawRecord>> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;

    let rows = root.as_array().ok_or_else(|| Error::Malformed {
        row: 0,
        column: String::new(),
        reason: "expected a top-level JSON array".to_string(),
    })?;

    // No rows means no keys to check the required columns against.
    if rows.is_empty() {
        return Err(Error::MissingColumn {
            column: RAW_COLUMNS[0].to_string(),
        });
    }

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let row_no = i + 1;
        let obj = row.as_object().ok_or_else(|| Error::Malformed {
            row: row_no,
            column: String::new(),
            reason: "record is not a JSON object".to_string(),
        })?;

        let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        let index = ColumnIndex::resolve(&keys)?;
        let values: Vec<&JsonValue> = obj.values().collect();
        records.push(index.record(row_no, |pos| json_to_cell(values[pos]))?);
    }
    Ok(records)
}

fn json_to_cell(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every column is read through Arrow's display formatter, so strings,
/// integers and booleans all arrive as text; nulls become empty cells.
fn load_raw_parquet(path: &Path) -> Result<Vec<RawRecord>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let index = {
        let schema = builder.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        ColumnIndex::resolve(&names)?
    };
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(batch.num_columns());
            for col in batch.columns() {
                let cell = if col.is_null(row) {
                    String::new()
                } else {
                    array_value_to_string(col, row)?
                };
                cells.push(cell);
            }
            let row_no = records.len() + 1;
            records.push(index.record(row_no, |pos| cells[pos].clone())?);
        }
    }
    Ok(records)
}
