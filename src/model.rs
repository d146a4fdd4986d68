use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

use crate::{
    error::ModelError,
    types::{Cell, FeatureRecord},
};

// ---------- Seams ----------

/// Fitted feature transform applied to a single record before inference.
pub trait Preprocessor: Send + Sync {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, ModelError>;

    /// Length of every vector `transform` returns.
    fn output_width(&self) -> usize;
}

/// Pre-trained regression model producing one price per feature vector.
pub trait Regressor: Send + Sync {
    fn predict(&self, features: &[f32]) -> Result<f64, ModelError>;
}

// ---------- Fitted preprocessor ----------

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

/// One block of a fitted column transformer. Blocks emit their outputs in
/// the order they are listed.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnStep {
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl ColumnStep {
    fn width(&self) -> usize {
        match self {
            ColumnStep::StandardScaler { columns, .. } | ColumnStep::Passthrough { columns } => {
                columns.len()
            }
            ColumnStep::OneHot { categories, .. } => categories.iter().map(Vec::len).sum(),
        }
    }

    fn check(&self) -> Result<()> {
        let columns = match self {
            ColumnStep::StandardScaler { columns, mean, scale } => {
                if mean.len() != columns.len() || scale.len() != columns.len() {
                    bail!(
                        "standard_scaler has {} columns but {} means and {} scales",
                        columns.len(),
                        mean.len(),
                        scale.len()
                    );
                }
                columns
            }
            ColumnStep::OneHot { columns, categories, .. } => {
                if categories.len() != columns.len() {
                    bail!(
                        "one_hot has {} columns but {} category lists",
                        columns.len(),
                        categories.len()
                    );
                }
                columns
            }
            ColumnStep::Passthrough { columns } => columns,
        };
        for c in columns {
            if !FeatureRecord::COLUMNS.contains(&c.as_str()) {
                bail!("unknown input column '{}'", c);
            }
        }
        Ok(())
    }

    fn apply(&self, record: &FeatureRecord, out: &mut Vec<f32>) -> Result<(), ModelError> {
        match self {
            ColumnStep::StandardScaler { columns, mean, scale } => {
                for ((col, m), s) in columns.iter().zip(mean).zip(scale) {
                    let x = numeric(record, col)?;
                    // zero variance columns are left unscaled
                    let s = if *s == 0.0 { 1.0 } else { *s };
                    out.push(((x - m) / s) as f32);
                }
            }
            ColumnStep::OneHot { columns, categories, handle_unknown } => {
                for (col, cats) in columns.iter().zip(categories) {
                    let value = text(record, col)?;
                    let hit = cats.iter().position(|c| c == value);
                    if hit.is_none() && *handle_unknown == HandleUnknown::Error {
                        return Err(ModelError::UnknownCategory {
                            column: col.clone(),
                            value: value.to_string(),
                        });
                    }
                    out.extend((0..cats.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }));
                }
            }
            ColumnStep::Passthrough { columns } => {
                for col in columns {
                    out.push(numeric(record, col)? as f32);
                }
            }
        }
        Ok(())
    }
}

fn numeric(record: &FeatureRecord, column: &str) -> Result<f64, ModelError> {
    match record.get(column) {
        Some(Cell::Number(x)) => Ok(x),
        Some(Cell::Text(_)) => Err(ModelError::SchemaMismatch {
            column: column.to_string(),
            expected: "numeric",
        }),
        None => Err(ModelError::MissingColumn(column.to_string())),
    }
}

fn text<'a>(record: &'a FeatureRecord, column: &str) -> Result<&'a str, ModelError> {
    match record.get(column) {
        Some(Cell::Text(s)) => Ok(s),
        Some(Cell::Number(_)) => Err(ModelError::SchemaMismatch {
            column: column.to_string(),
            expected: "text",
        }),
        None => Err(ModelError::MissingColumn(column.to_string())),
    }
}

#[derive(Deserialize)]
struct PreprocessorJson {
    steps: Vec<ColumnStep>,
}

/// Column transformer exported to JSON: scalers and one-hot encoders with
/// their fitted parameters.
#[derive(Debug, Clone)]
pub struct FittedPreprocessor {
    steps: Vec<ColumnStep>,
    width: usize,
}

impl FittedPreprocessor {
    pub fn new(steps: Vec<ColumnStep>) -> Result<Self> {
        for step in &steps {
            step.check()?;
        }
        let width = steps.iter().map(ColumnStep::width).sum();
        if width == 0 {
            bail!("preprocessor produces no features");
        }
        Ok(Self { steps, width })
    }

    pub fn from_json(txt: &str) -> Result<Self> {
        let parsed: PreprocessorJson =
            serde_json::from_str(txt).with_context(|| "failed to parse preprocessor JSON")?;
        Self::new(parsed.steps)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read preprocessor at {}", path.display()))?;
        Self::from_json(&txt).with_context(|| format!("invalid preprocessor {}", path.display()))
    }
}

impl Preprocessor for FittedPreprocessor {
    fn transform(&self, record: &FeatureRecord) -> Result<Vec<f32>, ModelError> {
        let mut out = Vec::with_capacity(self.width);
        for step in &self.steps {
            step.apply(record, &mut out)?;
        }
        Ok(out)
    }

    fn output_width(&self) -> usize {
        self.width
    }
}

// ---------- Regressors ----------

#[derive(Deserialize, Debug, Clone)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let txt = fs::read_to_string(path)
            .with_context(|| format!("failed to read model at {}", path.display()))?;
        let model: Self = serde_json::from_str(&txt)
            .with_context(|| format!("failed to parse model JSON {}", path.display()))?;
        if model.coefficients.is_empty() {
            bail!("model {} has no coefficients", path.display());
        }
        Ok(model)
    }
}

impl Regressor for LinearRegressor {
    fn predict(&self, features: &[f32]) -> Result<f64, ModelError> {
        if features.len() != self.coefficients.len() {
            return Err(ModelError::ShapeMismatch {
                got: features.len(),
                expected: self.coefficients.len(),
            });
        }
        let dot: f64 = features
            .iter()
            .zip(&self.coefficients)
            .map(|(x, w)| *x as f64 * w)
            .sum();
        Ok(dot + self.intercept)
    }
}

#[cfg(feature = "torch")]
pub use torch::TorchRegressor;

#[cfg(feature = "torch")]
mod torch {
    use anyhow::{Context, Result};
    use std::path::Path;
    use tch::{kind::Kind, CModule, Device, Tensor};

    use super::Regressor;
    use crate::error::ModelError;

    /// TorchScript regression head: `[1, n]` in, one scalar out.
    pub struct TorchRegressor {
        model: CModule,
        device: Device,
    }

    impl TorchRegressor {
        pub fn load(path: impl AsRef<Path>) -> Result<Self> {
            let path = path.as_ref();
            let device = Device::Cpu;
            let model = CModule::load_on_device(path, device)
                .with_context(|| format!("failed to load TorchScript {}", path.display()))?;
            Ok(Self { model, device })
        }
    }

    impl Regressor for TorchRegressor {
        fn predict(&self, features: &[f32]) -> Result<f64, ModelError> {
            let input = Tensor::from_slice(features)
                .reshape([1, features.len() as i64])
                .to_device(self.device);
            let t = self
                .model
                .forward_ts(&[input])
                .map_err(|e| ModelError::Backend(e.to_string()))?
                .to_kind(Kind::Double)
                .reshape([-1]);
            let sz = t.size();
            if sz != [1] {
                return Err(ModelError::Backend(format!("unexpected model output size: {:?}", sz)));
            }
            Ok(t.double_value(&[0]))
        }
    }
}

/// Pick a regressor backend from the artifact's extension: `.json` for a
/// linear model, `.pt`/`.ts` for TorchScript when built with `torch`.
pub fn load_regressor(path: impl AsRef<Path>) -> Result<Box<dyn Regressor>> {
    let path = path.as_ref();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        "json" => Ok(Box::new(LinearRegressor::load(path)?)),
        #[cfg(feature = "torch")]
        "pt" | "ts" => Ok(Box::new(TorchRegressor::load(path)?)),
        _ => bail!(
            "unsupported model artifact {} (expected .json{})",
            path.display(),
            if cfg!(feature = "torch") { " or .pt" } else { "" }
        ),
    }
}
