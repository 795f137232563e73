use serde::{Deserialize, Serialize};

use crate::error::MediaMapTypesError;

/// A single coordinate component as it comes from an external JSON source.
///
/// Some data sources serialize coordinates as numbers, and some as strings. Both are accepted and
/// converted into degrees by [`CoordinateValue::to_degrees`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    /// JSON number.
    Number(f64),
    /// JSON string containing a number.
    Text(String),
}

impl CoordinateValue {
    /// Returns the value in degrees.
    ///
    /// Fails if the value is a string that does not contain a number, or if the number is not
    /// finite.
    ///
    /// ```
    /// use mediamap_types::geo::CoordinateValue;
    ///
    /// assert_eq!(CoordinateValue::Text(" 35.7 ".into()).to_degrees(), Ok(35.7));
    /// assert!(CoordinateValue::Text("north".into()).to_degrees().is_err());
    /// ```
    pub fn to_degrees(&self) -> Result<f64, MediaMapTypesError> {
        let value = match self {
            CoordinateValue::Number(v) => *v,
            CoordinateValue::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| MediaMapTypesError::InvalidCoordinate(text.clone()))?,
        };

        if !value.is_finite() {
            return Err(MediaMapTypesError::InvalidCoordinate(value.to_string()));
        }

        Ok(value)
    }
}

impl From<f64> for CoordinateValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for CoordinateValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_numbers_and_strings() {
        let values: Vec<CoordinateValue> = serde_json::from_str(r#"[12.5, "13.25", "-7"]"#)
            .expect("valid coordinate list");

        let degrees: Vec<f64> = values
            .iter()
            .map(|v| v.to_degrees().expect("numeric value"))
            .collect();
        assert_eq!(degrees, vec![12.5, 13.25, -7.0]);
    }

    #[test]
    fn rejects_non_finite_strings() {
        for text in ["NaN", "inf", "-infinity", "", "12,5", "1e400"] {
            assert!(
                CoordinateValue::from(text).to_degrees().is_err(),
                "{text} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(CoordinateValue::from(f64::NAN).to_degrees().is_err());
    }
}
