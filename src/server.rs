use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Router,
};
use std::sync::Arc;

use crate::{
    config::{resolve_asset_path, AppConfig},
    format::prediction_text,
    model::{load_regressor, FittedPreprocessor, Preprocessor},
    page::{render_index, Outcome, SCRIPT_JS},
    predict::Predictor,
    reference::ReferenceData,
    types::PredictForm,
    validate::validate,
};

// ---------- Server state ----------

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self { predictor }
    }

    /// Load every startup artifact named in `cfg`. Any failure here is fatal.
    pub fn load(cfg: &AppConfig) -> anyhow::Result<Self> {
        let dataset_path = resolve_asset_path(&cfg.dataset_path);
        let reference = ReferenceData::load(&dataset_path)?;
        tracing::info!(
            "loaded reference data from {}: {} cities, {} multiplier states",
            dataset_path.display(),
            reference.cities.len(),
            reference.multipliers.state_count()
        );

        let pre_path = resolve_asset_path(&cfg.preprocessor_path);
        let preprocessor = FittedPreprocessor::load(&pre_path)?;
        tracing::info!(
            "loaded preprocessor {}; out_dim={}",
            pre_path.display(),
            preprocessor.output_width()
        );

        let model_path = resolve_asset_path(&cfg.model_path);
        let regressor = load_regressor(&model_path)?;
        tracing::info!("loaded model {}", model_path.display());

        let predictor = Predictor::new(
            Arc::new(reference),
            Arc::new(preprocessor),
            Arc::from(regressor),
        );
        let probe = predictor
            .warmup()
            .map_err(|e| anyhow::anyhow!("model does not accept preprocessor output: {}", e))?;
        tracing::info!("warmup forward ok (baseline={:.2})", probe);

        Ok(Self::new(predictor))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/static/script.js", get(script))
        .with_state(state)
}

// ---------- Handlers ----------

async fn home() -> Html<String> {
    Html(render_index(None))
}

async fn script() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/javascript")], SCRIPT_JS)
}

async fn predict(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let cities = &state.predictor.reference().cities;
    let req = match validate(cities, &form.city, &form.state, &form.area, &form.bhk, &form.age) {
        Ok(req) => req,
        Err(e) => {
            tracing::info!("rejected city={:?} state={:?}: {}", form.city, form.state, e);
            return Ok(Html(render_index(Some(&Outcome::Error(e.to_string())))));
        }
    };

    let price = state.predictor.predict(&req).map_err(|e| {
        tracing::error!("prediction failed for {:?}: {}", req, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(
                "<!DOCTYPE html><html><body><h1>Internal Server Error</h1>\
                 <p>The prediction could not be computed.</p></body></html>"
                    .to_string(),
            ),
        )
    })?;

    tracing::info!(
        "predicted city={} state={} area={} bhk={} age={} price={:.2}",
        req.city,
        req.state,
        req.area,
        req.bhk,
        req.age,
        price.value()
    );
    let text = prediction_text(price.value());
    Ok(Html(render_index(Some(&Outcome::Prediction(text)))))
}
