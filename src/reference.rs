use anyhow::{bail, Context, Result};
use std::{collections::HashMap, fs::File, path::Path};

/// Lowercase city → lowercase state, by majority vote over the dataset.
#[derive(Debug, Clone)]
pub struct CityStateMap {
    inner: HashMap<String, String>,
}

impl CityStateMap {
    /// Build from raw (city, state) pairs. Both sides are lowercased; empty
    /// cities and empty states are skipped. A tie between states goes to the
    /// lexicographically smallest one.
    pub fn from_pairs<I, C, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, S)>,
        C: AsRef<str>,
        S: AsRef<str>,
    {
        let mut counts: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (city, state) in pairs {
            let city = city.as_ref().to_lowercase();
            let state = state.as_ref().to_lowercase();
            if city.is_empty() || state.is_empty() {
                continue;
            }
            *counts.entry(city).or_default().entry(state).or_insert(0) += 1;
        }

        let inner = counts
            .into_iter()
            .filter_map(|(city, states)| {
                states
                    .into_iter()
                    .max_by(|(sa, na), (sb, nb)| na.cmp(nb).then_with(|| sb.cmp(sa)))
                    .map(|(state, _)| (city, state))
            })
            .collect();

        Self { inner }
    }

    /// Expects an already-lowercased city.
    pub fn state_of(&self, city: &str) -> Option<&str> {
        self.inner.get(city).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(c, s)| (c.as_str(), s.as_str()))
    }
}

/// Hand-tuned market premium per (state, city). Anything not listed is 1.0.
#[derive(Debug, Clone)]
pub struct MultiplierTable {
    inner: HashMap<&'static str, HashMap<&'static str, f64>>,
}

const BUILTIN_MULTIPLIERS: &[(&str, &[(&str, f64)])] = &[
    ("maharashtra", &[("mumbai", 1.2), ("pune", 1.1)]),
    ("delhi", &[("delhi", 1.15)]),
    ("uttar pradesh", &[("noida", 1.05), ("lucknow", 1.08), ("ghaziabad", 1.12)]),
    ("karnataka", &[("bangalore", 1.18), ("mangalore", 1.05), ("mysore", 1.07)]),
    ("tamil nadu", &[("chennai", 1.22), ("coimbatore", 1.1), ("madurai", 1.08)]),
    ("west bengal", &[("kolkata", 1.1), ("siliguri", 1.05), ("durgapur", 1.08)]),
    ("rajasthan", &[("jaipur", 1.15), ("udaipur", 1.1), ("jodhpur", 1.08)]),
    ("bihar", &[("patna", 1.1), ("gaya", 1.05)]),
    ("jharkhand", &[("ranchi", 1.1), ("jamshedpur", 1.05)]),
    ("odisha", &[("bhubaneswar", 1.12), ("cuttack", 1.08), ("rourkela", 1.1)]),
    ("kerala", &[("kochi", 1.1), ("thiruvananthapuram", 1.05), ("kozhikode", 1.08)]),
    ("assam", &[("guwahati", 1.1), ("dibrugarh", 1.05), ("dispur", 1.08)]),
    ("uttarakhand", &[("dehradun", 1.05), ("haridwar", 1.08), ("nainital", 1.1)]),
    ("sikkim", &[("gangtok", 1.12)]),
    ("mizoram", &[("aizawl", 1.15)]),
    ("manipur", &[("imphal", 1.1)]),
    ("nagaland", &[("kohima", 1.08), ("dimapur", 1.12)]),
    ("meghalaya", &[("shillong", 1.1), ("tura", 1.08)]),
    ("arunachal pradesh", &[("itanagar", 1.12), ("naharlagun", 1.15)]),
    ("tripura", &[("agartala", 1.08), ("udaipur", 1.1), ("dharmanagar", 1.12)]),
    ("telangana", &[("hyderabad", 1.15)]),
    ("gujarat", &[("ahmedabad", 1.1)]),
    ("punjab", &[("chandigarh", 1.1)]),
];

impl MultiplierTable {
    pub fn builtin() -> Self {
        let inner = BUILTIN_MULTIPLIERS
            .iter()
            .map(|(state, cities)| (*state, cities.iter().copied().collect()))
            .collect();
        Self { inner }
    }

    /// Case-insensitive; 1.0 when the state or the city is missing.
    pub fn multiplier(&self, state: &str, city: &str) -> f64 {
        self.inner
            .get(state.to_lowercase().as_str())
            .and_then(|cities| cities.get(city.to_lowercase().as_str()))
            .copied()
            .unwrap_or(1.0)
    }

    pub fn state_count(&self) -> usize {
        self.inner.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.inner
            .iter()
            .flat_map(|(s, cities)| cities.iter().map(move |(c, m)| (*s, *c, *m)))
    }
}

/// Read-only lookup tables shared by every request.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub cities: CityStateMap,
    pub multipliers: MultiplierTable,
}

impl ReferenceData {
    pub fn new(cities: CityStateMap, multipliers: MultiplierTable) -> Self {
        Self { cities, multipliers }
    }

    /// Load the city-state map from a CSV with `City` and `State` header
    /// columns and pair it with the builtin multiplier table.
    pub fn load(dataset_path: impl AsRef<Path>) -> Result<Self> {
        let path = dataset_path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("failed to open dataset at {}", path.display()))?;
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = rdr
            .headers()
            .with_context(|| format!("failed to read header of {}", path.display()))?
            .clone();
        let city_idx = column_index(&headers, "City", path)?;
        let state_idx = column_index(&headers, "State", path)?;

        let mut pairs = Vec::new();
        for (row, record) in rdr.records().enumerate() {
            let record = record
                .with_context(|| format!("malformed row {} in {}", row + 2, path.display()))?;
            let city = record.get(city_idx).unwrap_or_default().to_string();
            let state = record.get(state_idx).unwrap_or_default().to_string();
            pairs.push((city, state));
        }

        let cities = CityStateMap::from_pairs(pairs);
        if cities.is_empty() {
            bail!("dataset {} has no usable City/State rows", path.display());
        }
        Ok(Self::new(cities, MultiplierTable::builtin()))
    }
}

fn column_index(headers: &csv::StringRecord, name: &str, path: &Path) -> Result<usize> {
    match headers.iter().position(|h| h == name) {
        Some(i) => Ok(i),
        None => bail!("dataset {} is missing the '{}' column", path.display(), name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_state_wins() {
        let map = CityStateMap::from_pairs([
            ("Udaipur", "Rajasthan"),
            ("udaipur", "Tripura"),
            ("UDAIPUR", "rajasthan"),
        ]);
        assert_eq!(map.state_of("udaipur"), Some("rajasthan"));
    }

    #[test]
    fn tie_goes_to_smallest_state() {
        let map = CityStateMap::from_pairs([("Udaipur", "Tripura"), ("Udaipur", "Rajasthan")]);
        assert_eq!(map.state_of("udaipur"), Some("rajasthan"));
    }

    #[test]
    fn empty_cells_are_skipped() {
        let map = CityStateMap::from_pairs([("", "Kerala"), ("Kochi", ""), ("Kochi", "Kerala")]);
        assert_eq!(map.len(), 1);
        assert_eq!(map.state_of("kochi"), Some("kerala"));
    }

    #[test]
    fn builtin_multipliers() {
        let table = MultiplierTable::builtin();
        assert_eq!(table.multiplier("Maharashtra", "Mumbai"), 1.2);
        assert_eq!(table.multiplier("tamil nadu", "chennai"), 1.22);
        assert_eq!(table.multiplier("tripura", "udaipur"), 1.1);
        assert_eq!(table.multiplier("goa", "panaji"), 1.0);
        assert_eq!(table.multiplier("gujarat", "surat"), 1.0);
        assert_eq!(table.state_count(), 23);
    }

    #[test]
    fn builtin_table_is_complete() {
        let expected: &[(&str, &str, f64)] = &[
            ("maharashtra", "mumbai", 1.2),
            ("maharashtra", "pune", 1.1),
            ("delhi", "delhi", 1.15),
            ("uttar pradesh", "noida", 1.05),
            ("uttar pradesh", "lucknow", 1.08),
            ("uttar pradesh", "ghaziabad", 1.12),
            ("karnataka", "bangalore", 1.18),
            ("karnataka", "mangalore", 1.05),
            ("karnataka", "mysore", 1.07),
            ("tamil nadu", "chennai", 1.22),
            ("tamil nadu", "coimbatore", 1.1),
            ("tamil nadu", "madurai", 1.08),
            ("west bengal", "kolkata", 1.1),
            ("west bengal", "siliguri", 1.05),
            ("west bengal", "durgapur", 1.08),
            ("rajasthan", "jaipur", 1.15),
            ("rajasthan", "udaipur", 1.1),
            ("rajasthan", "jodhpur", 1.08),
            ("bihar", "patna", 1.1),
            ("bihar", "gaya", 1.05),
            ("jharkhand", "ranchi", 1.1),
            ("jharkhand", "jamshedpur", 1.05),
            ("odisha", "bhubaneswar", 1.12),
            ("odisha", "cuttack", 1.08),
            ("odisha", "rourkela", 1.1),
            ("kerala", "kochi", 1.1),
            ("kerala", "thiruvananthapuram", 1.05),
            ("kerala", "kozhikode", 1.08),
            ("assam", "guwahati", 1.1),
            ("assam", "dibrugarh", 1.05),
            ("assam", "dispur", 1.08),
            ("uttarakhand", "dehradun", 1.05),
            ("uttarakhand", "haridwar", 1.08),
            ("uttarakhand", "nainital", 1.1),
            ("sikkim", "gangtok", 1.12),
            ("mizoram", "aizawl", 1.15),
            ("manipur", "imphal", 1.1),
            ("nagaland", "kohima", 1.08),
            ("nagaland", "dimapur", 1.12),
            ("meghalaya", "shillong", 1.1),
            ("meghalaya", "tura", 1.08),
            ("arunachal pradesh", "itanagar", 1.12),
            ("arunachal pradesh", "naharlagun", 1.15),
            ("tripura", "agartala", 1.08),
            ("tripura", "udaipur", 1.1),
            ("tripura", "dharmanagar", 1.12),
            ("telangana", "hyderabad", 1.15),
            ("gujarat", "ahmedabad", 1.1),
            ("punjab", "chandigarh", 1.1),
        ];
        let table = MultiplierTable::builtin();
        for (state, city, m) in expected {
            assert_eq!(table.multiplier(state, city), *m, "{}/{}", state, city);
        }
        assert_eq!(table.iter().count(), expected.len());
    }
}
