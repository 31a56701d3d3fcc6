//! Data layer: artifacts, schema, feature reconciliation and the predictor.
//!
//! Architecture:
//! ```text
//!   remote store (Drive / URL)
//!        │  fetch::ensure_local   (once, at startup)
//!        ▼
//!   pollution_model.json    model_columns.json
//!        │                        │
//!        ▼                        ▼
//!   ┌──────────────┐      ┌────────────────┐
//!   │ linear model  │      │ TrainingSchema │
//!   └──────────────┘      └────────────────┘
//!        ▲                        │
//!        │     RawInput ──► reconcile ──► FeatureVector
//!        │                                    │
//!        └────────────────────────────────────┘
//!                      predict → Prediction
//! ```

pub mod fetch;
pub mod linear;
pub mod model;
pub mod reconcile;
pub mod schema;
