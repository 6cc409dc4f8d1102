use serde_json::Value;

use crate::error::ViewError;
use crate::network::Attributed;

/// Min and max of the qualifying samples of one attribute. Empty when nothing qualified.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ValueRange {
    bounds: Option<(f64, f64)>,
}

impl ValueRange {
    pub fn is_empty(&self) -> bool {
        self.bounds.is_none()
    }

    /// `(0, 0)` for an empty range.
    pub fn bounds(&self) -> (f64, f64) {
        self.bounds.unwrap_or((0.0, 0.0))
    }

    pub fn min(&self) -> f64 {
        self.bounds().0
    }

    pub fn max(&self) -> f64 {
        self.bounds().1
    }

    fn include(&mut self, value: f64) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(value), max.max(value)),
            None => (value, value),
        });
    }
}

/// Reads a present attribute as a finite number. Absent and `null` read as `None`.
pub fn numeric_value(attribute: &str, value: Option<&Value>) -> Result<Option<f64>, ViewError> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match parsed {
        Some(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(ViewError::Parse {
            attribute: attribute.to_string(),
            value: value.map(Value::to_string).unwrap_or_default(),
        }),
    }
}

/// The sample value of an attribute: truncated toward zero, kept only when strictly positive.
pub fn sample_value(attribute: &str, value: Option<&Value>) -> Result<Option<f64>, ViewError> {
    Ok(numeric_value(attribute, value)?
        .map(f64::trunc)
        .filter(|sample| *sample > 0.0))
}

pub fn value_range<T: Attributed>(items: &[T], attribute: &str) -> Result<ValueRange, ViewError> {
    let mut range = ValueRange::default();
    for item in items {
        if let Some(sample) = sample_value(attribute, item.attribute(attribute))? {
            range.include(sample);
        }
    }
    Ok(range)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::network::Edge;

    fn weighted(weights: &[Value]) -> Vec<Edge> {
        weights
            .iter()
            .enumerate()
            .map(|(index, weight)| {
                Edge::new(format!("s{index}"), format!("t{index}")).attribute_named("weight", weight.clone())
            })
            .collect()
    }

    #[test]
    fn scenario_a_single_weight() {
        let edges = weighted(&[json!("5")]);
        let range = value_range(&edges, "weight").unwrap();
        assert_eq!(range.bounds(), (5.0, 5.0));
    }

    #[test]
    fn excludes_non_positive_and_missing_values() {
        let mut edges = weighted(&[json!("0"), json!(-4), json!("7"), json!(3), json!(null), json!("0.9")]);
        edges.push(Edge::new("x", "y"));

        let range = value_range(&edges, "weight").unwrap();
        assert_eq!(range.bounds(), (3.0, 7.0));
    }

    #[test]
    fn empty_sample_is_zero_range() {
        let edges = weighted(&[json!("0"), json!(-1)]);
        let range = value_range(&edges, "weight").unwrap();
        assert!(range.is_empty());
        assert_eq!(range.bounds(), (0.0, 0.0));

        let none: Vec<Edge> = Vec::new();
        assert!(value_range(&none, "weight").unwrap().is_empty());
    }

    #[test]
    fn truncates_toward_zero() {
        let edges = weighted(&[json!("2.9"), json!(10.5)]);
        assert_eq!(value_range(&edges, "weight").unwrap().bounds(), (2.0, 10.0));
    }

    #[test]
    fn large_balances_keep_their_magnitude() {
        let edges = weighted(&[json!("100000000000000000000"), json!("1")]);
        assert_eq!(value_range(&edges, "weight").unwrap().max(), 1e20);
    }

    #[test]
    fn malformed_value_is_a_parse_error() {
        let edges = weighted(&[json!("5"), json!("lots")]);
        let error = value_range(&edges, "weight").unwrap_err();
        assert_eq!(
            error,
            ViewError::Parse {
                attribute: "weight".to_string(),
                value: "\"lots\"".to_string(),
            }
        );
        assert!(value_range(&weighted(&[json!(true)]), "weight").is_err());
        assert!(value_range(&weighted(&[json!("inf")]), "weight").is_err());
    }
}
