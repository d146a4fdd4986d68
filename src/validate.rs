use crate::{error::ValidationError, reference::CityStateMap, types::PredictionRequest};

/// Check a raw submission against the city-state map and parse the numeric
/// fields. The city-state check runs first, so a bad pairing is reported even
/// when the numbers are also malformed.
///
/// Only integer parseability is enforced; zero or negative values pass.
pub fn validate(
    cities: &CityStateMap,
    city: &str,
    state: &str,
    area: &str,
    bhk: &str,
    age: &str,
) -> Result<PredictionRequest, ValidationError> {
    let city_lower = city.to_lowercase();
    let state_lower = state.to_lowercase();

    match cities.state_of(&city_lower) {
        Some(mapped) if mapped == state_lower => {}
        _ => {
            return Err(ValidationError::InvalidCityState {
                city: city.to_string(),
                state: state.to_string(),
            })
        }
    }

    let (area, bhk, age) = match (parse_int(area), parse_int(bhk), parse_int(age)) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return Err(ValidationError::InvalidNumericInput),
    };

    Ok(PredictionRequest {
        area,
        bhk,
        age,
        city: city.to_string(),
        state: state.to_string(),
    })
}

/// Code points of the `0` digit of every Unicode decimal digit run. Each run
/// is ten contiguous characters, `0` through `9`.
const DECIMAL_ZEROS: &[u32] = &[
    0x30, 0x660, 0x6F0, 0x7C0, 0x966, 0x9E6, 0xA66, 0xAE6, 0xB66, 0xBE6, 0xC66, 0xCE6, 0xD66,
    0xDE6, 0xE50, 0xED0, 0xF20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0, 0x1A80, 0x1A90,
    0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0, 0xAA50, 0xABF0,
    0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0, 0x11450, 0x114D0,
    0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50, 0x11DA0, 0x16A60, 0x16AC0,
    0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E140, 0x1E2F0, 0x1E950, 0x1FBF0,
];

fn decimal_value(ch: char) -> Option<u32> {
    let cp = ch as u32;
    DECIMAL_ZEROS
        .iter()
        .find_map(|zero| cp.checked_sub(*zero).filter(|d| *d < 10))
}

/// Integer literal in the form a web form user might type: surrounding
/// whitespace, an optional sign, decimal digits from any script, and single
/// underscores between digits (`1_000`). Values outside `i128` are rejected.
fn parse_int(raw: &str) -> Option<i128> {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }

    let mut magnitude: u128 = 0;
    for ch in digits.chars().filter(|c| *c != '_') {
        let d = decimal_value(ch)?;
        magnitude = magnitude.checked_mul(10)?.checked_add(d as u128)?;
    }
    if negative {
        0i128.checked_sub_unsigned(magnitude)
    } else {
        i128::try_from(magnitude).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cities() -> CityStateMap {
        CityStateMap::from_pairs([("Mumbai", "Maharashtra"), ("Pune", "Maharashtra")])
    }

    #[test]
    fn accepts_padded_and_signed_integers() {
        let req = validate(&cities(), "Pune", "Maharashtra", " 900 ", "+3", "-1").unwrap();
        assert_eq!((req.area, req.bhk, req.age), (900, 3, -1));
    }

    #[test]
    fn parses_underscore_groups_and_unicode_digits() {
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("١٠"), Some(10));
        assert_eq!(parse_int("१२३"), Some(123));
        assert_eq!(parse_int("１２"), Some(12));
        assert_eq!(parse_int("-0_7"), Some(-7));
        assert_eq!(
            parse_int("99999999999999999999"),
            Some(99_999_999_999_999_999_999)
        );
    }

    #[test]
    fn rejects_malformed_integers() {
        for bad in ["", " ", "_1", "1_", "1__0", "+_1", "--1", "12.5", "1e3", "½", "²", "abc"] {
            assert_eq!(parse_int(bad), None, "{:?}", bad);
        }
        assert_eq!(parse_int(&"9".repeat(40)), None);
        assert_eq!(parse_int(&i128::MIN.to_string()), Some(i128::MIN));
        assert_eq!(parse_int(&(i128::MAX as u128 + 1).to_string()), None);
    }

    #[test]
    fn city_state_error_wins_over_numeric_error() {
        let err = validate(&cities(), "Pune", "Kerala", "x", "y", "z").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidCityState { .. }));
    }
}
