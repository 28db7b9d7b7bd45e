//! Writes a synthetic PRODES-like table as `prodes_sample.csv` and
//! `prodes_sample.parquet` into `OUT_DIR` (default: current directory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const FIRST_YEAR: i64 = 1988;
const LAST_YEAR: i64 = 2023;

/// Column name and typical yearly clearing (km²) per state.
const STATES: [(&str, f64); 9] = [
    ("acre", 550.0),
    ("amazonas", 1100.0),
    ("amapa", 60.0),
    ("maranhao", 800.0),
    ("mato_grosso", 3400.0),
    ("para", 4300.0),
    ("rondonia", 1700.0),
    ("roraima", 280.0),
    ("tocantins", 250.0),
];

/// Relative deforestation level for a year: early high, peaks around
/// 1995 and 2004, a trough around 2012, then a slow rise.
fn trend(year: i64) -> f64 {
    let y = year as f64;
    let peak_1995 = 0.9 * (-(y - 1995.0).powi(2) / 2.0).exp();
    let peak_2004 = 0.8 * (-(y - 2004.0).powi(2) / 8.0).exp();
    let decline = if y > 2004.0 { -0.035 * (y - 2004.0).min(8.0) } else { 0.0 };
    let recovery = if y > 2012.0 { 0.04 * (y - 2012.0) } else { 0.0 };
    (1.0 + peak_1995 + peak_2004 + decline + recovery).max(0.2)
}

#[derive(Parser)]
#[command(about = "Write a synthetic PRODES-like sample dataset")]
struct Args {
    /// Directory to write the sample files into
    #[arg(value_name = "OUT_DIR", default_value = ".")]
    out_dir: PathBuf,
}

/// Seeded xoshiro256** generator, so every run writes the same yearly
/// figures and the sample files can be diffed or checked into fixtures.
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    /// Expand `seed` into the four state words with an LCG.
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

    /// Uniform in `[0, 1)` from the top 53 bits.
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Normal sample via Box-Muller; used as the multiplicative noise on
    /// each state's yearly clearing.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One generated row: year, total, then one value per state.
struct Row {
    year: i64,
    total: f64,
    states: Vec<f64>,
}

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (FIRST_YEAR..=LAST_YEAR)
        .map(|year| {
            let level = trend(year);
            let states: Vec<f64> = STATES
                .iter()
                .map(|&(_, base)| (base * level * rng.gauss(1.0, 0.15)).max(0.0).round())
                .collect();
            Row {
                year,
                total: states.iter().sum(),
                states,
            }
        })
        .collect()
}

fn header() -> Vec<&'static str> {
    let mut cols = vec!["referencia", "area_total_desmatamento"];
    cols.extend(STATES.iter().map(|(name, _)| *name));
    cols
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(header())?;
    for row in rows {
        let mut fields = vec![row.year.to_string(), row.total.to_string()];
        fields.extend(row.states.iter().map(|v| v.to_string()));
        writer.write_record(&fields)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let names = header();
    let mut fields = vec![Field::new(names[0], DataType::Int64, false)];
    fields.extend(
        names[1..]
            .iter()
            .map(|name| Field::new(*name, DataType::Float64, false)),
    );
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
        Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.total))),
    ];
    for i in 0..STATES.len() {
        columns.push(Arc::new(Float64Array::from_iter_values(
            rows.iter().map(|r| r.states[i]),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let Args { out_dir } = Args::parse();
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = out_dir.join("prodes_sample.csv");
    write_csv(&rows, &csv_path)?;
    log::info!("Wrote {} years to {}", rows.len(), csv_path.display());

    let parquet_path = out_dir.join("prodes_sample.parquet");
    write_parquet(&rows, &parquet_path)?;
    log::info!("Wrote {} years to {}", rows.len(), parquet_path.display());

    println!(
        "Wrote {}–{} ({} rows) to {} and {}",
        FIRST_YEAR,
        LAST_YEAR,
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&mut SimpleRng::new(42));
        let b = generate(&mut SimpleRng::new(42));
        assert_eq!(a.len(), (LAST_YEAR - FIRST_YEAR + 1) as usize);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.year, y.year);
            assert_eq!(x.states, y.states);
        }
    }

    #[test]
    fn total_is_sum_of_states() {
        for row in generate(&mut SimpleRng::new(7)) {
            assert_eq!(row.states.len(), STATES.len());
            assert!(row.states.iter().all(|v| *v >= 0.0 && v.is_finite()));
            assert_eq!(row.total, row.states.iter().sum::<f64>());
        }
    }

    #[test]
    fn out_dir_defaults_to_cwd() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("."));
        let args = Args::try_parse_from(["generate_sample", "data/out"]).unwrap();
        assert_eq!(args.out_dir, PathBuf::from("data/out"));
    }
}
