use std::path::Path;

use anyhow::{Context, Result};

use crate::config::AppConfig;
use crate::data::fetch::{Artifact, EnsureOutcome, Fetch, ensure_local};
use crate::data::linear::load_linear_model;
use crate::data::model::{ModelError, Prediction, Predictor};
use crate::data::reconcile::{RawInput, STATION_PREFIX, reconcile, station_column};
use crate::data::schema::{TrainingSchema, load_schema};

// ---------------------------------------------------------------------------
// ModelContext – everything loaded once at startup
// ---------------------------------------------------------------------------

/// The training schema and predictor, loaded once and shared read-only by
/// whatever serves predictions.
pub struct ModelContext {
    schema: TrainingSchema,
    predictor: Box<dyn Predictor>,
}

impl ModelContext {
    /// Pair a schema with a predictor after checking they agree.
    pub fn new(schema: TrainingSchema, predictor: Box<dyn Predictor>) -> Result<Self, ModelError> {
        match predictor.feature_names() {
            Some(names) => {
                if names.len() != schema.len() {
                    return Err(ModelError::DimensionMismatch {
                        expected: names.len(),
                        actual: schema.len(),
                    });
                }
                if let Some((position, (expected, actual))) = names
                    .iter()
                    .zip(schema.columns())
                    .enumerate()
                    .find(|(_, (a, b))| a != b)
                {
                    return Err(ModelError::FeatureNameMismatch {
                        position,
                        expected: expected.clone(),
                        actual: actual.clone(),
                    });
                }
            }
            None => {
                if predictor.n_features() != schema.len() {
                    return Err(ModelError::DimensionMismatch {
                        expected: predictor.n_features(),
                        actual: schema.len(),
                    });
                }
            }
        }
        Ok(ModelContext { schema, predictor })
    }

    /// Fetch both artifacts if needed, then load and cross-check them.
    /// Any failure here is fatal: without both artifacts nothing can be predicted.
    pub fn load(config: &AppConfig, fetcher: &dyn Fetch) -> Result<Self> {
        let model_artifact = config.model_artifact();
        let columns_artifact = config.columns_artifact();

        let model_outcome = ensure_local(fetcher, &model_artifact).context("fetching model")?;
        let columns_outcome =
            ensure_local(fetcher, &columns_artifact).context("fetching model columns")?;

        let predictor = load_artifact(&model_artifact, model_outcome, load_linear_model)?;
        let schema = load_artifact(&columns_artifact, columns_outcome, load_schema)?;

        let context = ModelContext::new(schema, Box::new(predictor))
            .context("model and column list do not match")?;
        log::info!(
            "Model ready: {} features, {} known stations",
            context.schema.len(),
            context.known_stations().len()
        );
        Ok(context)
    }

    pub fn schema(&self) -> &TrainingSchema {
        &self.schema
    }

    /// Whether the station has its own indicator column in the schema.
    pub fn knows_station(&self, station_id: &str) -> bool {
        self.schema.contains(&station_column(station_id))
    }

    /// Station ids the model was trained on, in schema order.
    pub fn known_stations(&self) -> Vec<&str> {
        self.schema
            .columns()
            .iter()
            .filter_map(|c| c.strip_prefix(STATION_PREFIX))
            .collect()
    }

    /// Reconcile the input against the schema and run the predictor.
    pub fn predict(&self, raw: &RawInput) -> Result<Prediction, ModelError> {
        let features = reconcile(raw, &self.schema);
        let outputs = self.predictor.predict(&features)?;
        let prediction = Prediction::from_outputs(raw.year, raw.station_id.clone(), &outputs)?;
        log::info!(
            "Predicted station {} / {}: {:?}",
            raw.station_id,
            raw.year,
            outputs
        );
        Ok(prediction)
    }
}

/// Parse a local artifact.
///
/// A file that was just downloaded and does not parse is removed, so the next
/// start fetches it again. A cached file that does not parse is left alone and
/// the error names the path to delete.
fn load_artifact<T>(
    artifact: &Artifact,
    outcome: EnsureOutcome,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<T> {
    let path = &artifact.path;
    load(path).map_err(|e| match outcome {
        EnsureOutcome::Downloaded(_) => {
            if let Err(rm) = std::fs::remove_file(path) {
                log::warn!("Could not remove unusable {}: {rm}", path.display());
            }
            e.context(format!(
                "{} downloaded from {} is not usable and was discarded",
                artifact.label, artifact.source
            ))
        }
        EnsureOutcome::Cached => e.context(format!(
            "cached {} at {} is not usable; delete it to download it again",
            artifact.label,
            path.display()
        )),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fetch::{ArtifactError, ArtifactSource};
    use crate::data::model::Pollutant;
    use crate::data::reconcile::FeatureVector;
    use std::cell::RefCell;
    use std::io::{Cursor, Read};

    /// Echoes the feature row back, padded to six outputs.
    struct EchoPredictor {
        names: Option<Vec<String>>,
        width: usize,
    }

    impl EchoPredictor {
        fn new(width: usize) -> Self {
            EchoPredictor {
                names: None,
                width,
            }
        }
    }

    impl Predictor for EchoPredictor {
        fn n_features(&self) -> usize {
            self.width
        }

        fn feature_names(&self) -> Option<&[String]> {
            self.names.as_deref()
        }

        fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
            let mut out = features.values();
            out.resize(6, 0.0);
            Ok(out)
        }
    }

    fn schema(cols: &[&str]) -> TrainingSchema {
        TrainingSchema::new(cols.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    #[test]
    fn predicts_through_reconciled_vector() {
        let ctx = ModelContext::new(schema(&["year", "id_1", "id_2"]), Box::new(EchoPredictor::new(3))).unwrap();
        let p = ctx.predict(&RawInput::new(2024, "2")).unwrap();
        assert_eq!(p.value(Pollutant::O2), 2024.0);
        assert_eq!(p.value(Pollutant::No3), 0.0);
        assert_eq!(p.value(Pollutant::No2), 1.0);
    }

    #[test]
    fn unknown_station_still_predicts() {
        let ctx = ModelContext::new(schema(&["year", "id_1", "id_2"]), Box::new(EchoPredictor::new(3))).unwrap();
        assert!(!ctx.knows_station("99"));
        let p = ctx.predict(&RawInput::new(2024, "99")).unwrap();
        assert_eq!(p.formatted_rows()[1].1, "0.00");
        assert_eq!(p.formatted_rows()[2].1, "0.00");
    }

    #[test]
    fn lists_known_stations_in_schema_order() {
        let ctx = ModelContext::new(schema(&["year", "id_3", "id_1", "id_12"]), Box::new(EchoPredictor::new(4))).unwrap();
        assert_eq!(ctx.known_stations(), ["3", "1", "12"]);
        assert!(ctx.knows_station("12"));
    }

    #[test]
    fn rejects_width_mismatch() {
        let err = ModelContext::new(schema(&["year", "id_1"]), Box::new(EchoPredictor::new(3)))
            .err()
            .unwrap();
        assert_eq!(err, ModelError::DimensionMismatch { expected: 3, actual: 2 });
    }

    #[test]
    fn rejects_reordered_feature_names() {
        let mut predictor = EchoPredictor::new(3);
        predictor.names = Some(vec!["year".into(), "id_2".into(), "id_1".into()]);
        let err = ModelContext::new(schema(&["year", "id_1", "id_2"]), Box::new(predictor))
            .err()
            .unwrap();
        assert_eq!(
            err,
            ModelError::FeatureNameMismatch {
                position: 1,
                expected: "id_2".into(),
                actual: "id_1".into()
            }
        );
    }

    /// Serves model and columns from memory, keyed by source kind.
    struct MemoryFetcher {
        model: String,
        columns: String,
        calls: RefCell<Vec<ArtifactSource>>,
    }

    impl Fetch for MemoryFetcher {
        fn open(&self, source: &ArtifactSource) -> Result<Box<dyn Read>, ArtifactError> {
            self.calls.borrow_mut().push(source.clone());
            let body = match source {
                ArtifactSource::GoogleDrive { .. } => self.model.clone(),
                ArtifactSource::Url(_) => self.columns.clone(),
            };
            Ok(Box::new(Cursor::new(body.into_bytes())))
        }
    }

    #[test]
    fn load_fetches_once_then_uses_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("pollution_model.json"),
            columns_path: dir.path().join("model_columns.json"),
            ..AppConfig::default()
        };
        let fetcher = MemoryFetcher {
            model: r#"{
                "feature_names": ["year", "id_1", "id_2"],
                "coefficients": [[0.0, 1.0, 2.0], [0,0,0], [0,0,0], [0,0,0], [0,0,0], [0,0,0]],
                "intercepts": [7.0, 3.05, 0.02, 40.0, 0.08, 120.5]
            }"#
            .to_string(),
            columns: r#"["year", "id_1", "id_2"]"#.to_string(),
            calls: RefCell::new(Vec::new()),
        };

        let ctx = ModelContext::load(&config, &fetcher).unwrap();
        assert_eq!(fetcher.calls.borrow().len(), 2);
        let p = ctx.predict(&RawInput::new(2024, "2")).unwrap();
        assert_eq!(p.formatted_rows()[0], ("O2", "9.00".to_string()));

        ModelContext::load(&config, &fetcher).unwrap();
        assert_eq!(fetcher.calls.borrow().len(), 2);
    }

    #[test]
    fn load_fails_on_mismatched_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("m.json"),
            columns_path: dir.path().join("c.json"),
            ..AppConfig::default()
        };
        let fetcher = MemoryFetcher {
            model: r#"{"coefficients": [[1.0, 1.0]], "intercepts": [0.0]}"#.to_string(),
            columns: r#"["year", "id_1", "id_2"]"#.to_string(),
            calls: RefCell::new(Vec::new()),
        };
        let err = ModelContext::load(&config, &fetcher).err().unwrap();
        assert!(format!("{err:#}").contains("do not match"));
    }

    const VALID_MODEL: &str = r#"{
        "coefficients": [[0.0, 1.0, 2.0], [0,0,0], [0,0,0], [0,0,0], [0,0,0], [0,0,0]],
        "intercepts": [7.0, 3.05, 0.02, 40.0, 0.08, 120.5]
    }"#;

    #[test]
    fn unusable_download_is_discarded_so_next_start_refetches() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("pollution_model.json"),
            columns_path: dir.path().join("model_columns.json"),
            ..AppConfig::default()
        };
        let pickled = MemoryFetcher {
            model: "\u{80}\u{4}\u{95} not a json model".to_string(),
            columns: r#"["year", "id_1", "id_2"]"#.to_string(),
            calls: RefCell::new(Vec::new()),
        };

        let err = ModelContext::load(&config, &pickled).err().unwrap();
        assert!(format!("{err:#}").contains("was discarded"));
        assert!(!config.model_path.exists());

        let fixed = MemoryFetcher {
            model: VALID_MODEL.to_string(),
            columns: String::new(),
            calls: RefCell::new(Vec::new()),
        };
        let ctx = ModelContext::load(&config, &fixed).unwrap();
        assert_eq!(fixed.calls.borrow().len(), 1);
        assert_eq!(ctx.schema().len(), 3);
    }

    #[test]
    fn unusable_cached_file_names_path_to_delete() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_path: dir.path().join("pollution_model.json"),
            columns_path: dir.path().join("model_columns.json"),
            ..AppConfig::default()
        };
        std::fs::write(&config.model_path, b"garbage").unwrap();
        std::fs::write(&config.columns_path, br#"["year", "id_1", "id_2"]"#).unwrap();
        let fetcher = MemoryFetcher {
            model: VALID_MODEL.to_string(),
            columns: String::new(),
            calls: RefCell::new(Vec::new()),
        };

        let err = ModelContext::load(&config, &fetcher).err().unwrap();

        let message = format!("{err:#}");
        assert!(message.contains("delete it to download it again"));
        assert!(message.contains("pollution_model.json"));
        assert!(config.model_path.exists());
        assert!(fetcher.calls.borrow().is_empty());
    }
}
