use std::path::Path;

use anyhow::{Context, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use super::model::{ModelError, Predictor};
use super::reconcile::FeatureVector;

// ---------------------------------------------------------------------------
// On-disk artifact
// ---------------------------------------------------------------------------

/// Serialized multi-output linear regressor.
///
/// ```json
/// {
///   "feature_names": ["year", "id_1", ...],
///   "coefficients": [[...], ...],   // one row per output
///   "intercepts": [...]             // one per output
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModelArtifact {
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

// ---------------------------------------------------------------------------
// LinearModel – y = W·x + b
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LinearModel {
    feature_names: Option<Vec<String>>,
    weights: Array2<f64>,
    intercepts: Array1<f64>,
}

impl LinearModel {
    /// Validate an artifact's shape and build the model.
    pub fn from_artifact(artifact: LinearModelArtifact) -> Result<Self, ModelError> {
        let n_outputs = artifact.coefficients.len();
        if n_outputs == 0 {
            return Err(ModelError::InvalidShape("no coefficient rows".into()));
        }
        if artifact.intercepts.len() != n_outputs {
            return Err(ModelError::InvalidShape(format!(
                "{} coefficient rows but {} intercepts",
                n_outputs,
                artifact.intercepts.len()
            )));
        }

        let n_features = artifact.coefficients[0].len();
        if let Some((i, row)) = artifact
            .coefficients
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != n_features)
        {
            return Err(ModelError::InvalidShape(format!(
                "coefficient row {i} has {} values, row 0 has {n_features}",
                row.len()
            )));
        }
        if let Some(names) = &artifact.feature_names {
            if names.len() != n_features {
                return Err(ModelError::InvalidShape(format!(
                    "{} feature names for {n_features} coefficients",
                    names.len()
                )));
            }
        }

        let flat: Vec<f64> = artifact.coefficients.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((n_outputs, n_features), flat)
            .map_err(|e| ModelError::InvalidShape(e.to_string()))?;

        Ok(LinearModel {
            feature_names: artifact.feature_names,
            weights,
            intercepts: Array1::from(artifact.intercepts),
        })
    }

    pub fn n_outputs(&self) -> usize {
        self.weights.nrows()
    }
}

impl Predictor for LinearModel {
    fn n_features(&self) -> usize {
        self.weights.ncols()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features(),
                actual: features.len(),
            });
        }
        if let Some(names) = &self.feature_names {
            if let Some((position, (expected, actual))) = names
                .iter()
                .zip(features.names())
                .enumerate()
                .find(|(_, (a, b))| a.as_str() != *b)
            {
                return Err(ModelError::FeatureNameMismatch {
                    position,
                    expected: expected.clone(),
                    actual: actual.to_string(),
                });
            }
        }
        let x = Array1::from(features.values());
        let y = self.weights.dot(&x) + &self.intercepts;
        Ok(y.to_vec())
    }
}

/// Read a linear model artifact from a JSON file.
pub fn load_linear_model(path: &Path) -> Result<LinearModel> {
    let text = std::fs::read_to_string(path).context("reading model file")?;
    let artifact: LinearModelArtifact =
        serde_json::from_str(&text).context("parsing model JSON")?;
    let model = LinearModel::from_artifact(artifact)
        .with_context(|| format!("invalid model in {}", path.display()))?;
    log::debug!(
        "Linear model: {} features, {} outputs",
        model.n_features(),
        model.n_outputs()
    );
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reconcile::{RawInput, reconcile};
    use crate::data::schema::TrainingSchema;

    fn artifact() -> LinearModelArtifact {
        LinearModelArtifact {
            feature_names: Some(vec!["year".into(), "id_1".into(), "id_2".into()]),
            coefficients: vec![
                vec![0.001, 1.0, 2.0],
                vec![0.0, 0.5, 0.0],
                vec![0.0, 0.0, 0.0],
                vec![0.01, 0.0, 0.0],
                vec![0.0, 0.0, 1.0],
                vec![0.0, 10.0, 20.0],
            ],
            intercepts: vec![5.0, 1.0, 0.02, 0.0, 0.1, 100.0],
        }
    }

    #[test]
    fn predicts_affine_combination() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let schema = TrainingSchema::new(vec!["year".into(), "id_1".into(), "id_2".into()]).unwrap();
        let x = reconcile(&RawInput::new(2000, "2"), &schema);
        let y = model.predict(&x).unwrap();
        let expected = [7.0 + 2.0, 1.0, 0.02, 20.0, 1.1, 120.0];
        assert_eq!(y.len(), 6);
        for (got, want) in y.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
    }

    #[test]
    fn rejects_wrong_input_width() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let schema = TrainingSchema::new(vec!["year".into(), "id_1".into()]).unwrap();
        let x = reconcile(&RawInput::new(2000, "1"), &schema);
        assert_eq!(
            model.predict(&x).unwrap_err(),
            ModelError::DimensionMismatch { expected: 3, actual: 2 }
        );
    }

    #[test]
    fn rejects_rows_in_a_different_column_order() {
        let model = LinearModel::from_artifact(artifact()).unwrap();
        let schema = TrainingSchema::new(vec!["year".into(), "id_2".into(), "id_1".into()]).unwrap();
        let x = reconcile(&RawInput::new(2000, "1"), &schema);
        assert_eq!(
            model.predict(&x).unwrap_err(),
            ModelError::FeatureNameMismatch {
                position: 1,
                expected: "id_1".into(),
                actual: "id_2".into()
            }
        );
    }

    #[test]
    fn rejects_ragged_coefficients() {
        let mut a = artifact();
        a.coefficients[3].pop();
        assert!(matches!(
            LinearModel::from_artifact(a),
            Err(ModelError::InvalidShape(_))
        ));
    }

    #[test]
    fn rejects_intercept_count_mismatch() {
        let mut a = artifact();
        a.intercepts.pop();
        assert!(LinearModel::from_artifact(a).is_err());
    }

    #[test]
    fn feature_names_are_optional() {
        let json = r#"{"coefficients": [[1.0, 2.0]], "intercepts": [0.5]}"#;
        let a: LinearModelArtifact = serde_json::from_str(json).unwrap();
        let model = LinearModel::from_artifact(a).unwrap();
        assert!(model.feature_names().is_none());
        assert_eq!(model.n_features(), 2);
    }
}
