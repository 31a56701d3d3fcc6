use std::fmt;

use thiserror::Error;

use super::reconcile::FeatureVector;

// ---------------------------------------------------------------------------
// Pollutant – one labelled model output
// ---------------------------------------------------------------------------

/// The six pollutants the regressor predicts.
///
/// The declaration order is the predictor's output order and must never be
/// changed independently of the trained artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pollutant {
    O2,
    No3,
    No2,
    So4,
    Po4,
    Cl,
}

impl Pollutant {
    /// All pollutants in predictor output order.
    pub const ALL: [Pollutant; 6] = [
        Pollutant::O2,
        Pollutant::No3,
        Pollutant::No2,
        Pollutant::So4,
        Pollutant::Po4,
        Pollutant::Cl,
    ];

    /// Table label as shown to users.
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::O2 => "O2",
            Pollutant::No3 => "NO3",
            Pollutant::No2 => "NO2",
            Pollutant::So4 => "SO4",
            Pollutant::Po4 => "PO4",
            Pollutant::Cl => "CL",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Prediction – labelled model output for one request
// ---------------------------------------------------------------------------

/// Predicted concentrations (mg/L), one per pollutant in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub year: i32,
    pub station_id: String,
    values: [f64; 6],
}

impl Prediction {
    /// Label raw predictor output. Fails unless exactly six values are given.
    pub fn from_outputs(
        year: i32,
        station_id: impl Into<String>,
        outputs: &[f64],
    ) -> Result<Self, ModelError> {
        let values: [f64; 6] = outputs.try_into().map_err(|_| ModelError::OutputCount {
            expected: Pollutant::ALL.len(),
            actual: outputs.len(),
        })?;
        Ok(Prediction {
            year,
            station_id: station_id.into(),
            values,
        })
    }

    /// Value for a single pollutant.
    pub fn value(&self, pollutant: Pollutant) -> f64 {
        self.values[pollutant as usize]
    }

    /// `(pollutant, value)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (Pollutant, f64)> + '_ {
        Pollutant::ALL.iter().map(|p| (*p, self.value(*p)))
    }

    /// Table rows with values formatted to two decimals.
    pub fn formatted_rows(&self) -> Vec<(&'static str, String)> {
        self.iter()
            .map(|(p, v)| (p.label(), format!("{v:.2}")))
            .collect()
    }

    /// Heading shown above the result table.
    pub fn title(&self) -> String {
        format!(
            "Predicted Pollutant Levels for Station {} in {}",
            self.station_id, self.year
        )
    }
}

// ---------------------------------------------------------------------------
// Predictor – the opaque trained model
// ---------------------------------------------------------------------------

/// A trained regressor: schema-ordered feature vector in, one value per
/// pollutant out.
pub trait Predictor: Send + Sync {
    /// Number of input features the model was fit against.
    fn n_features(&self) -> usize;

    /// Feature names recorded at fit time, if the artifact carries them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    /// Run inference on a single row.
    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;
}

/// Failures at the predictor boundary.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("model expects {expected} features but received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("feature {position}: model was fit on '{expected}' but schema has '{actual}'")]
    FeatureNameMismatch {
        position: usize,
        expected: String,
        actual: String,
    },

    #[error("model produced {actual} outputs, expected {expected}")]
    OutputCount { expected: usize, actual: usize },

    #[error("invalid model artifact: {0}")]
    InvalidShape(String),
}
