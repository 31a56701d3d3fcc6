//! Writes a synthetic model and matching column list so the app can run
//! without network access:
//!
//! ```text
//! cargo run --bin generate_sample -- [output_dir]
//! WQ_MODEL_PATH=output_dir/pollution_model.json \
//! WQ_COLUMNS_PATH=output_dir/model_columns.json cargo run
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const STATIONS: usize = 22;

/// Typical level (mg/L) and yearly drift per output, in model output order
/// O2, NO3, NO2, SO4, PO4, CL.
const POLLUTANT_BASELINES: [(f64, f64); 6] = [
    (8.5, -0.02),
    (4.0, 0.05),
    (0.12, 0.001),
    (60.0, 0.4),
    (0.35, 0.002),
    (55.0, 0.6),
];

const REFERENCE_YEAR: f64 = 2020.0;

#[derive(Serialize)]
struct LinearModelArtifact {
    feature_names: Vec<String>,
    coefficients: Vec<Vec<f64>>,
    intercepts: Vec<f64>,
}

/// Station indicator columns in the order a dummy encoder emits them:
/// categories sorted as strings, so `id_10` precedes `id_2`.
fn station_columns() -> Vec<String> {
    let mut ids: Vec<String> = (1..=STATIONS).map(|i| i.to_string()).collect();
    ids.sort();
    ids.into_iter().map(|id| format!("id_{id}")).collect()
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = StdRng::seed_from_u64(42);

    let mut columns = vec!["year".to_string()];
    columns.extend(station_columns());

    let mut coefficients = Vec::with_capacity(POLLUTANT_BASELINES.len());
    let mut intercepts = Vec::with_capacity(POLLUTANT_BASELINES.len());
    for &(baseline, drift) in &POLLUTANT_BASELINES {
        let mut row = Vec::with_capacity(columns.len());
        row.push(drift);
        // Station effects: within ±30 % of the baseline.
        row.extend((0..STATIONS).map(|_| rng.gen_range(-0.3..0.3) * baseline));
        coefficients.push(row);
        intercepts.push(baseline - drift * REFERENCE_YEAR);
    }

    let model = LinearModelArtifact {
        feature_names: columns.clone(),
        coefficients,
        intercepts,
    };

    let model_path = out_dir.join("pollution_model.json");
    let file = std::fs::File::create(&model_path)
        .with_context(|| format!("creating {}", model_path.display()))?;
    serde_json::to_writer_pretty(file, &model).context("writing model JSON")?;

    let columns_path = out_dir.join("model_columns.json");
    let file = std::fs::File::create(&columns_path)
        .with_context(|| format!("creating {}", columns_path.display()))?;
    serde_json::to_writer_pretty(file, &columns).context("writing columns JSON")?;

    println!(
        "Wrote model ({} features, {} outputs) to {} and columns to {}",
        columns.len(),
        POLLUTANT_BASELINES.len(),
        model_path.display(),
        columns_path.display()
    );
    Ok(())
}
