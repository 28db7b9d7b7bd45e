use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use arrow::array::{Array, AsArray, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{LoadError, Result};
use super::model::{Dataset, Record, State, StateAreas};

/// Year column: a 4-digit calendar year.
pub const YEAR_COLUMN: &str = "referencia";
/// Total deforested area (km²) for the year.
pub const TOTAL_COLUMN: &str = "area_total_desmatamento";

/// Every column a file must provide, in canonical order.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    [YEAR_COLUMN, TOTAL_COLUMN]
        .into_iter()
        .chain(State::ALL.into_iter().map(State::column))
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a deforestation dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row + one row per year (the PRODES export)
/// * `.json`    – `[{ "referencia": 2020, "area_total_desmatamento": ..., ... }, ...]`
/// * `.parquet` – flat columns with the same names
///
/// All formats share one schema and one set of parsing rules; extra
/// columns are ignored.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv_reader(std::fs::File::open(path)?),
        "json" => load_json_str(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Shared cell parsing
// ---------------------------------------------------------------------------

/// Build one [`Record`] from a row, fetching each required cell by column
/// name. `row` is 1-based and only used for error messages.
fn parse_record<S, F>(row: usize, mut cell: F) -> Result<Record>
where
    S: AsRef<str>,
    F: FnMut(&'static str) -> Result<S>,
{
    let year = parse_year(row, cell(YEAR_COLUMN)?.as_ref())?;
    let total_deforested_area = parse_number(row, TOTAL_COLUMN, cell(TOTAL_COLUMN)?.as_ref())?;

    let mut states = StateAreas::default();
    for state in State::ALL {
        let column = state.column();
        states[state] = parse_number(row, column, cell(column)?.as_ref())?;
    }

    Ok(Record {
        year,
        total_deforested_area,
        states,
    })
}

/// Accept exactly four ASCII digits (after trimming).
fn parse_year(row: usize, token: &str) -> Result<i32> {
    let t = token.trim();
    if t.len() == 4 && t.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(year) = t.parse::<i32>() {
            return Ok(year);
        }
    }
    Err(LoadError::InvalidYear {
        row,
        value: token.to_string(),
    })
}

/// A finite real. `NaN` and infinities parse as `f64` but are rejected:
/// one of them would poison every sum it reaches.
fn parse_number(row: usize, column: &str, token: &str) -> Result<f64> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(LoadError::InvalidNumber {
            row,
            column: column.to_string(),
            value: token.to_string(),
        }),
    }
}

fn missing(column: &str) -> LoadError {
    LoadError::MissingColumn {
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV text from any reader. The header must name every column in
/// [`required_columns`]; order is irrelevant, names are case-sensitive.
pub fn load_csv_reader<R: Read>(input: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Fields)
        .from_reader(input);

    let positions: BTreeMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();

    let mut index: BTreeMap<&'static str, usize> = BTreeMap::new();
    for column in required_columns() {
        let pos = positions.get(column).ok_or_else(|| missing(column))?;
        index.insert(column, *pos);
    }

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = result?;
        let record = parse_record(i + 1, |column| {
            Ok(index
                .get(column)
                .and_then(|&pos| row.get(pos))
                .unwrap_or(""))
        })?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

/// Convenience wrapper over [`load_csv_reader`] for in-memory text.
#[cfg(test)]
pub fn load_csv_str(text: &str) -> Result<Dataset> {
    load_csv_reader(text.as_bytes())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "referencia": 2020, "area_total_desmatamento": 10851.0, "acre": 706.0, ... },
///   ...
/// ]
/// ```
///
/// Values may be JSON numbers or numeric strings.
pub fn load_json_str(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Schema("expected top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| LoadError::Schema(format!("row {row} is not a JSON object")))?;

        let record = parse_record(row, |column| match obj.get(column) {
            None => Err(missing(column)),
            Some(JsonValue::String(s)) => Ok(s.clone()),
            Some(JsonValue::Number(n)) => Ok(n.to_string()),
            Some(JsonValue::Null) => Ok(String::new()),
            Some(other) => Ok(other.to_string()),
        })?;
        records.push(record);
    }

    Ok(Dataset::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per required field.
///
/// Each required column is cast to text and then goes through the same
/// year/number rules as CSV, so `Int64` years, `Float64` areas and string
/// columns written by Pandas all load the same way. Nulls are rejected.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    for column in required_columns() {
        if schema.index_of(column).is_err() {
            return Err(missing(column));
        }
    }

    let reader = builder.build()?;
    let mut records = Vec::new();
    let mut offset = 0;

    for batch_result in reader {
        let batch = batch_result?;

        let mut columns: BTreeMap<&'static str, StringArray> = BTreeMap::new();
        for column in required_columns() {
            let array = batch.column_by_name(column).ok_or_else(|| missing(column))?;
            let text = cast(array, &DataType::Utf8).map_err(|e| {
                LoadError::Schema(format!(
                    "column '{column}' of type {:?} cannot be read: {e}",
                    array.data_type()
                ))
            })?;
            columns.insert(column, text.as_string::<i32>().clone());
        }

        for i in 0..batch.num_rows() {
            let record = parse_record(offset + i + 1, |column| {
                let values = columns.get(column).ok_or_else(|| missing(column))?;
                Ok(if values.is_null(i) { "" } else { values.value(i) })
            })?;
            records.push(record);
        }
        offset += batch.num_rows();
    }

    Ok(Dataset::from_records(records))
}
