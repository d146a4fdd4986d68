//! Web front-end for a pre-trained house price regressor.
//!
//! Requests are validated against a city-state map built from the training
//! dataset, passed through a fitted preprocessor and the model, then scaled by
//! a per-city market multiplier.

pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod page;
pub mod predict;
pub mod reference;
pub mod server;
pub mod types;
pub mod validate;

pub use error::{ModelError, ValidationError};
pub use predict::Predictor;
pub use reference::{CityStateMap, MultiplierTable, ReferenceData};
pub use types::{PredictedPrice, PredictionRequest};
pub use validate::validate;
