use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, ArrayRef, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawRow};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw rows of an exported sheet, header row included.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – plain export; every row is kept, cells stay text
/// * `.json`    – `[[...], ...]` or a Sheets values response `{ "values": [[...]] }`
/// * `.parquet` – one column per field; the header row is rebuilt from the schema
pub fn load_rows(path: &Path) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!("Loaded {} raw rows from {}", rows.len(), path.display());
    Ok(rows)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Rows may be ragged; the header is returned as an ordinary row so that
/// normalization decides what to skip.
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;

    reader
        .records()
        .enumerate()
        .map(|(row_no, result)| -> Result<RawRow> {
            let record = result.with_context(|| format!("CSV row {row_no}"))?;
            Ok(record.iter().map(text_cell).collect())
        })
        .collect()
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;
    rows_from_json(&root)
}

/// Accepts a bare array of rows or an object with a `values` array. A
/// Sheets response without `values` means the sheet is empty.
pub fn rows_from_json(root: &JsonValue) -> Result<Vec<RawRow>> {
    let rows: &[JsonValue] = match root {
        JsonValue::Array(rows) => rows.as_slice(),
        JsonValue::Object(obj) => match obj.get("values") {
            Some(JsonValue::Array(rows)) => rows.as_slice(),
            Some(JsonValue::Null) | None => &[],
            Some(_) => bail!("`values` is not an array"),
        },
        _ => bail!("Expected a JSON array of rows or an object with `values`"),
    };

    rows.iter()
        .enumerate()
        .map(|(i, row)| -> Result<RawRow> {
            let cells = row
                .as_array()
                .with_context(|| format!("Row {i} is not a JSON array"))?;
            Ok(cells.iter().map(json_to_cell).collect())
        })
        .collect()
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(n.to_string())),
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Empty,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet export. The first returned row holds the column names so
/// the output has the same shape as the other formats.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;

    let header: RawRow = builder
        .schema()
        .fields()
        .iter()
        .map(|f| CellValue::Text(f.name().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = vec![header];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<ArrayRef> = batch.columns().iter().map(readable_column).collect();
        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| extract_cell(col, row)).collect());
        }
    }

    Ok(rows)
}

/// Cast a column into one of the types [`extract_cell`] reads.
///
/// Timestamps and `Date64` become calendar dates, other numeric types
/// become `Float64`, everything else (dictionaries, string views, ...) is
/// rendered as text.
fn readable_column(col: &ArrayRef) -> ArrayRef {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean
        | DataType::Date32 => return Arc::clone(col),
        DataType::Timestamp(_, _) | DataType::Date64 => DataType::Date32,
        t if t.is_numeric() => DataType::Float64,
        _ => DataType::Utf8,
    };
    match cast(col, &target) {
        Ok(converted) => converted,
        Err(e) => {
            log::warn!(
                "Cannot read parquet column of type {} as {target}: {e}",
                col.data_type()
            );
            Arc::clone(col)
        }
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Empty;
    }
    let any = col.as_any();
    let cell = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .map(|s| text_cell(s.value(row))),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| text_cell(s.value(row))),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| CellValue::Number(a.value(row) as f64)),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .map(|a| CellValue::Number(a.value(row))),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .map(|a| CellValue::Text(a.value(row).to_string())),
        DataType::Date32 => any
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| CellValue::Text(d.format("%Y-%m-%d").to_string())),
        other => {
            log::trace!("Unreadable parquet column type {other:?}, reading as empty");
            None
        }
    };
    cell.unwrap_or(CellValue::Empty)
}
