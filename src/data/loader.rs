use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Record, coerce_f64};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load financial records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "date": "2023-09-30", "revenue": ..., "netIncome": ... }, ...]`
/// * `.csv`     – header row naming the record fields
/// * `.parquet` – one column per record field
pub fn load_file(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;
    log::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Date,
    Revenue,
    NetIncome,
    GrossProfit,
    Eps,
    OperatingIncome,
}

impl Column {
    /// Accepts camelCase, snake_case and any capitalisation.
    fn from_header(name: &str) -> Option<Self> {
        let key: String = name
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != ' ')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "date" => Some(Column::Date),
            "revenue" => Some(Column::Revenue),
            "netincome" => Some(Column::NetIncome),
            "grossprofit" => Some(Column::GrossProfit),
            "eps" => Some(Column::Eps),
            "operatingincome" => Some(Column::OperatingIncome),
            _ => None,
        }
    }

    fn assign(self, record: &mut Record, value: Option<f64>) {
        match self {
            Column::Date => {}
            Column::Revenue => record.revenue = value,
            Column::NetIncome => record.net_income = value,
            Column::GrossProfit => record.gross_profit = value,
            Column::Eps => record.eps = value,
            Column::OperatingIncome => record.operating_income = value,
        }
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

/// Parse a JSON payload into records.
///
/// The list may be the top-level array or sit under `data`, `records` or
/// `financials`. Entries that are not objects or do not fit the record shape
/// are skipped; objects with bad or missing figures are kept with those
/// figures unset.
pub fn parse_json(text: &str) -> Result<Vec<Record>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let entries = match &root {
        JsonValue::Array(items) => items,
        JsonValue::Object(obj) => ["data", "records", "financials"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(JsonValue::as_array))
            .context("Expected a JSON array of records")?,
        _ => bail!("Expected a JSON array of records"),
    };

    let mut records = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            log::warn!("Skipping entry {i}: not a JSON object");
            continue;
        }
        match serde_json::from_value::<Record>(entry.clone()) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Skipping entry {i}: {e}"),
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// CSV layout: header row with record field names; unknown columns ignored.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<Record>> {
    let columns: Vec<Option<Column>> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(Column::from_header)
        .collect();

    if !columns.contains(&Some(Column::Date)) {
        bail!("CSV missing 'date' column");
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut record = Record::default();
        for (cell, column) in row.iter().zip(&columns) {
            match column {
                Some(Column::Date) => record.date = cell.trim().to_string(),
                Some(col) => col.assign(&mut record, coerce_f64(cell)),
                None => {}
            }
        }
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Load a Parquet file whose columns are named like the record fields.
///
/// `date` may be a string or a Date32 column; figures may be any integer,
/// float or string column.
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(usize, Column)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(i, f)| Column::from_header(f.name()).map(|c| (i, c)))
            .collect();

        if !columns.iter().any(|(_, c)| *c == Column::Date) {
            bail!("Parquet file missing 'date' column");
        }

        for row in 0..batch.num_rows() {
            let mut record = Record::default();
            for &(idx, column) in &columns {
                let array = batch.column(idx);
                match column {
                    Column::Date => record.date = extract_text(array, row),
                    col => col.assign(&mut record, extract_f64(array, row)),
                }
            }
            records.push(record);
        }
    }

    Ok(records)
}

// -- Arrow helpers --

fn extract_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let value = match col.data_type() {
        DataType::Int32 => col.as_primitive_opt::<Int32Type>()?.value(row) as f64,
        DataType::Int64 => col.as_primitive_opt::<Int64Type>()?.value(row) as f64,
        DataType::Float32 => col.as_primitive_opt::<Float32Type>()?.value(row) as f64,
        DataType::Float64 => col.as_primitive_opt::<Float64Type>()?.value(row),
        DataType::Utf8 | DataType::LargeUtf8 => return coerce_f64(&extract_text(col, row)),
        _ => return None,
    };
    value.is_finite().then_some(value)
}

fn extract_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| s.value(row).to_string())
            .unwrap_or_default(),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| s.value(row).to_string())
            .unwrap_or_default(),
        DataType::Date32 => col
            .as_primitive_opt::<Date32Type>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_top_level_array() {
        let text = r#"[
            {"date": "2022-09-24", "revenue": 394328000000, "netIncome": 99803000000},
            {"date": "2021-09-25", "revenue": "365817000000", "netIncome": null}
        ]"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].revenue, Some(365_817_000_000.0));
        assert_eq!(records[1].net_income, None);
    }

    #[test]
    fn json_wrapped_array_and_non_objects() {
        let text = r#"{"data": [{"date": "2020-01-01", "revenue": 1}, 42, "x"]}"#;
        let records = parse_json(text).unwrap();
        assert_eq!(records, vec![Record {
            date: "2020-01-01".into(),
            revenue: Some(1.0),
            ..Default::default()
        }]);
    }

    #[test]
    fn json_entry_with_both_key_spellings_does_not_drop_the_batch() {
        let text = r#"[
            {"date": "2020-01-01", "revenue": 1, "netIncome": 1},
            {"date": "2021-01-01", "netIncome": 2, "net_income": 3},
            {"date": "2022-01-01", "revenue": 3, "netIncome": 3}
        ]"#;
        let records = parse_json(text).unwrap();
        let dates: Vec<&str> = records.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, ["2020-01-01", "2021-01-01", "2022-01-01"]);
        assert_eq!(records[1].net_income, Some(2.0));
    }

    #[test]
    fn json_wrong_shape_is_an_error() {
        assert!(parse_json(r#"{"error": "limit reached"}"#).is_err());
        assert!(parse_json("not json").is_err());
    }

    #[test]
    fn csv_with_snake_case_headers_and_blank_cells() {
        let data = "date,revenue,net_income,gross_profit,eps,operating_income,symbol\n\
                    2020-06-30,1000,-25,400,,90,ACME\n\
                    2021-06-30,abc,30,410,0.5,95,ACME\n";
        let records = read_csv(csv::Reader::from_reader(data.as_bytes())).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].net_income, Some(-25.0));
        assert_eq!(records[0].eps, None);
        assert_eq!(records[1].revenue, None);
        assert_eq!(records[1].operating_income, Some(95.0));
    }

    #[test]
    fn csv_without_date_column_is_rejected() {
        let data = "revenue,netIncome\n1,2\n";
        assert!(read_csv(csv::Reader::from_reader(data.as_bytes())).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        assert!(load_file(Path::new("records.xlsx")).is_err());
    }
}
