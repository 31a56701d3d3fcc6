use std::collections::HashMap;

use super::schema::TrainingSchema;

/// Name of the numeric year feature.
pub const YEAR_COLUMN: &str = "year";

/// Prefix of the one-hot station columns (`id_1`, `id_2`, ...).
pub const STATION_PREFIX: &str = "id_";

// ---------------------------------------------------------------------------
// RawInput – what the user typed
// ---------------------------------------------------------------------------

/// Unvalidated user input for one prediction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInput {
    pub year: i32,
    pub station_id: String,
}

impl RawInput {
    pub fn new(year: i32, station_id: impl Into<String>) -> Self {
        RawInput {
            year,
            station_id: station_id.into(),
        }
    }

    /// The indicator column this station activates.
    pub fn station_column(&self) -> String {
        station_column(&self.station_id)
    }
}

pub fn station_column(station_id: &str) -> String {
    format!("{STATION_PREFIX}{station_id}")
}

// ---------------------------------------------------------------------------
// FeatureVector – one schema-shaped row
// ---------------------------------------------------------------------------

/// A single row of named features, ordered exactly as the training schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    entries: Vec<(String, f64)>,
}

impl FeatureVector {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Values in column order, ready for the predictor.
    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|(_, v)| *v).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ---------------------------------------------------------------------------
// Reconciliation
// ---------------------------------------------------------------------------

/// Build the feature row the predictor expects from raw user input.
///
/// The year is copied as-is and the station is one-hot encoded as
/// `id_<station>`. Every schema column the input does not set becomes 0,
/// anything the schema does not know is dropped, and the result follows the
/// schema order.
///
/// A station absent from the schema therefore yields an all-zero station
/// block, i.e. a prediction as if no station were given. That is the
/// behaviour the model has always had; it is logged, not rejected.
pub fn reconcile(raw: &RawInput, schema: &TrainingSchema) -> FeatureVector {
    let mut working: HashMap<String, f64> = HashMap::with_capacity(2);
    working.insert(YEAR_COLUMN.to_string(), f64::from(raw.year));

    let station_col = raw.station_column();
    if !schema.contains(&station_col) {
        log::warn!(
            "Station '{}' was not seen at training time; predicting with no station indicator set",
            raw.station_id
        );
    }
    working.insert(station_col, 1.0);

    let entries = schema
        .columns()
        .iter()
        .map(|col| (col.clone(), working.get(col).copied().unwrap_or(0.0)))
        .collect();

    FeatureVector { entries }
}
