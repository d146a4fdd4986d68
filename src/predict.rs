use std::sync::Arc;

use crate::{
    error::ModelError,
    model::{Preprocessor, Regressor},
    reference::ReferenceData,
    types::{FeatureRecord, PredictedPrice, PredictionRequest},
};

/// Runs validated requests through the preprocessor and model, then applies
/// the city multiplier. Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct Predictor {
    reference: Arc<ReferenceData>,
    preprocessor: Arc<dyn Preprocessor>,
    regressor: Arc<dyn Regressor>,
}

impl Predictor {
    pub fn new(
        reference: Arc<ReferenceData>,
        preprocessor: Arc<dyn Preprocessor>,
        regressor: Arc<dyn Regressor>,
    ) -> Self {
        Self {
            reference,
            preprocessor,
            regressor,
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Forward a zero vector of the preprocessor's width so a model/preprocessor
    /// mismatch shows up at startup rather than on the first request.
    pub fn warmup(&self) -> Result<f64, ModelError> {
        let zeros = vec![0.0; self.preprocessor.output_width()];
        self.regressor.predict(&zeros)
    }

    pub fn predict(&self, req: &PredictionRequest) -> Result<PredictedPrice, ModelError> {
        let record = FeatureRecord::from(req);
        let features = self.preprocessor.transform(&record)?;

        if tracing::enabled!(tracing::Level::DEBUG) {
            let nz = features.iter().filter(|x| **x != 0.0).count();
            let mean = if features.is_empty() {
                0.0
            } else {
                features.iter().sum::<f32>() / (features.len() as f32)
            };
            tracing::debug!(
                "features city={} state={} in_dim={} nonzero={} mean={:.3}",
                req.city,
                req.state,
                features.len(),
                nz,
                mean
            );
        }

        let raw = self.regressor.predict(&features)?;
        let multiplier = self.reference.multipliers.multiplier(&req.state, &req.city);
        tracing::debug!("raw={:.2} multiplier={}", raw, multiplier);

        Ok(PredictedPrice(raw * multiplier))
    }
}
