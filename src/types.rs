use serde::Deserialize;

/// Raw form submission for `POST /predict`. Every field arrives as text.
#[derive(Debug, Deserialize, Clone)]
pub struct PredictForm {
    pub area: String,
    pub bhk: String,
    pub age: String,
    pub city: String,
    pub state: String,
}

/// A submission that passed validation. City and state keep the casing the
/// user typed; lookups lowercase them on the fly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionRequest {
    pub area: i128,
    pub bhk: i128,
    pub age: i128,
    pub city: String,
    pub state: String,
}

/// Final price after the city multiplier, in rupees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictedPrice(pub f64);

impl PredictedPrice {
    pub fn value(self) -> f64 {
        self.0
    }
}

/// Single-row record handed to the preprocessor. Column order is
/// `Area, BHK, Age, City, State`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRecord {
    pub area: i128,
    pub bhk: i128,
    pub age: i128,
    pub city: String,
    pub state: String,
}

/// One cell of a [`FeatureRecord`], looked up by column name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

impl FeatureRecord {
    pub const COLUMNS: [&'static str; 5] = ["Area", "BHK", "Age", "City", "State"];

    pub fn get(&self, column: &str) -> Option<Cell<'_>> {
        match column {
            "Area" => Some(Cell::Number(self.area as f64)),
            "BHK" => Some(Cell::Number(self.bhk as f64)),
            "Age" => Some(Cell::Number(self.age as f64)),
            "City" => Some(Cell::Text(&self.city)),
            "State" => Some(Cell::Text(&self.state)),
            _ => None,
        }
    }
}

impl From<&PredictionRequest> for FeatureRecord {
    fn from(req: &PredictionRequest) -> Self {
        Self {
            area: req.area,
            bhk: req.bhk,
            age: req.age,
            city: req.city.clone(),
            state: req.state.clone(),
        }
    }
}
