//! Writes synthetic yearly statements as `sample_data.{json,csv,parquet}`.
//!
//! Usage: `generate_sample [OUTPUT_DIR]` (defaults to the current directory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use finviewer::Record;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// One statement per fiscal year, revenue compounding with noise and the
/// occasional loss year.
fn generate_records(rng: &mut SimpleRng, first_year: i32, years: usize) -> Vec<Record> {
    const SHARES_OUTSTANDING: f64 = 2.5e9;

    let mut revenue = 8.0e9;
    (0..years)
        .map(|i| {
            revenue *= 1.0 + rng.range(-0.08, 0.22);
            let gross_margin = rng.range(0.35, 0.45);
            let operating_margin = rng.range(0.05, 0.30);
            let gross_profit = revenue * gross_margin;
            let operating_income = if rng.next_f64() < 0.1 {
                -revenue * rng.range(0.01, 0.05)
            } else {
                revenue * operating_margin
            };
            let net_income = operating_income * rng.range(0.70, 0.85);
            let eps = (net_income / SHARES_OUTSTANDING * 100.0).round() / 100.0;

            Record {
                date: format!("{}-09-30", first_year + i as i32),
                revenue: Some(revenue.round()),
                net_income: Some(net_income.round()),
                gross_profit: Some(gross_profit.round()),
                eps: Some(eps),
                operating_income: Some(operating_income.round()),
            }
        })
        .collect()
}

fn write_json(path: &Path, records: &[Record]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON output")?;
    serde_json::to_writer_pretty(file, records).context("writing JSON")
}

fn write_csv(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    for record in records {
        writer.serialize(record).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")
}

fn write_parquet(path: &Path, records: &[Record]) -> Result<()> {
    let figure = |f: fn(&Record) -> Option<f64>| -> ArrayRef {
        Arc::new(records.iter().map(f).collect::<Float64Array>())
    };
    let dates: ArrayRef = Arc::new(StringArray::from_iter_values(
        records.iter().map(|r| r.date.as_str()),
    ));

    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("revenue", DataType::Float64, true),
        Field::new("netIncome", DataType::Float64, true),
        Field::new("grossProfit", DataType::Float64, true),
        Field::new("eps", DataType::Float64, true),
        Field::new("operatingIncome", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            dates,
            figure(|r| r.revenue),
            figure(|r| r.net_income),
            figure(|r| r.gross_profit),
            figure(|r| r.eps),
            figure(|r| r.operating_income),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let records = generate_records(&mut rng, 2005, 20);

    write_json(&out_dir.join("sample_data.json"), &records)?;
    write_csv(&out_dir.join("sample_data.csv"), &records)?;
    write_parquet(&out_dir.join("sample_data.parquet"), &records)?;

    println!(
        "Wrote {} yearly records to {}/sample_data.{{json,csv,parquet}}",
        records.len(),
        out_dir.display()
    );
    Ok(())
}
