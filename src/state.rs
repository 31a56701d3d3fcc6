use std::sync::Arc;

use crate::context::ModelContext;
use crate::data::model::Prediction;
use crate::data::reconcile::RawInput;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2050;
pub const DEFAULT_YEAR: i32 = 2024;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded schema and predictor, shared read-only.
    pub context: Arc<ModelContext>,

    /// Year input, clamped to `MIN_YEAR..=MAX_YEAR` by the widget.
    pub year: i32,

    /// Station id text field.
    pub station_input: String,

    /// Result of the last successful prediction.
    pub prediction: Option<Prediction>,

    /// Non-fatal notice (missing input, unknown station).
    pub warning: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self {
            context,
            year: DEFAULT_YEAR,
            station_input: "1".to_string(),
            prediction: None,
            warning: None,
            status_message: None,
        }
    }

    /// Validate the form and run one prediction.
    ///
    /// An empty station id never reaches the model. An unknown one is
    /// predicted anyway, with a notice that no station indicator was set.
    pub fn submit(&mut self) {
        self.warning = None;
        self.status_message = None;

        let station = self.station_input.trim();
        if station.is_empty() {
            self.warning = Some("Please enter the station ID".to_string());
            return;
        }

        let raw = RawInput::new(self.year.clamp(MIN_YEAR, MAX_YEAR), station);
        if !self.context.knows_station(&raw.station_id) {
            self.warning = Some(format!(
                "Station {} was not part of the training data; the prediction ignores the station.",
                raw.station_id
            ));
        }

        match self.context.predict(&raw) {
            Ok(prediction) => self.prediction = Some(prediction),
            Err(e) => {
                log::error!("Prediction failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
                self.prediction = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{ModelError, Pollutant, Predictor};
    use crate::data::reconcile::FeatureVector;
    use crate::data::schema::TrainingSchema;

    /// Returns the index of the active station column as the O2 value.
    struct StationIndexPredictor;

    impl Predictor for StationIndexPredictor {
        fn n_features(&self) -> usize {
            3
        }

        fn predict(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
            let active = features
                .values()
                .iter()
                .skip(1)
                .position(|v| *v == 1.0)
                .map_or(0.0, |i| (i + 1) as f64);
            Ok(vec![active, 0.0, 0.0, 0.0, 0.0, 0.0])
        }
    }

    fn state() -> AppState {
        let schema =
            TrainingSchema::new(vec!["year".into(), "id_1".into(), "id_2".into()]).unwrap();
        let ctx = ModelContext::new(schema, Box::new(StationIndexPredictor)).unwrap();
        AppState::new(Arc::new(ctx))
    }

    #[test]
    fn empty_station_is_rejected_before_predicting() {
        let mut s = state();
        s.station_input = "   ".into();
        s.submit();
        assert_eq!(s.warning.as_deref(), Some("Please enter the station ID"));
        assert!(s.prediction.is_none());
    }

    #[test]
    fn known_station_predicts_without_warning() {
        let mut s = state();
        s.station_input = " 2 ".into();
        s.submit();
        assert!(s.warning.is_none());
        let p = s.prediction.unwrap();
        assert_eq!(p.station_id, "2");
        assert_eq!(p.value(Pollutant::O2), 2.0);
    }

    #[test]
    fn unknown_station_warns_but_predicts() {
        let mut s = state();
        s.station_input = "42".into();
        s.submit();
        assert!(s.warning.as_deref().unwrap().contains("Station 42"));
        assert_eq!(s.prediction.unwrap().value(Pollutant::O2), 0.0);
    }

    #[test]
    fn year_is_clamped_to_form_range() {
        let mut s = state();
        s.year = 1990;
        s.submit();
        assert_eq!(s.prediction.unwrap().year, MIN_YEAR);
    }
}
