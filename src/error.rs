use thiserror::Error;

/// User-correctable input problems. `Display` is the exact message shown on
/// the form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid city-state combination. '{city}' does not belong to the state '{state}'.")]
    InvalidCityState { city: String, state: String },

    #[error("Invalid input. Please enter numerical values for area, BHK, and age.")]
    InvalidNumericInput,
}

/// Failure inside the preprocessing or inference collaborators. These are not
/// recovered; the request fails with a server error.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column '{0}' is not part of the input record")]
    MissingColumn(String),

    #[error("column '{column}' expected {expected} input")]
    SchemaMismatch { column: String, expected: &'static str },

    #[error("found unknown category '{value}' in column '{column}'")]
    UnknownCategory { column: String, value: String },

    #[error("feature length mismatch: got {got}, expected {expected}")]
    ShapeMismatch { got: usize, expected: usize },

    #[error("model backend failed: {0}")]
    Backend(String),
}
