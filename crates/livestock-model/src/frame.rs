//! Tabular input built from JSON records.

use serde_json::{Map, Value};

use crate::error::{ModelError, Result};

/// Named columns with one `f64` per row per column.
///
/// Values are coerced when the frame is built; a missing value becomes NaN
/// and is rejected later by the model, which knows which columns it needs.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureFrame {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureFrame {
    /// One-row frame with a column per key of `record`.
    pub fn from_record(record: &Map<String, Value>) -> Result<Self> {
        let mut columns = Vec::with_capacity(record.len());
        let mut row = Vec::with_capacity(record.len());
        for (name, value) in record {
            columns.push(name.clone());
            row.push(coerce_value(name, value)?);
        }
        Ok(Self {
            columns,
            rows: vec![row],
        })
    }

    /// One-row frame from an arbitrary JSON value, which must be an object.
    pub fn from_json(value: &Value) -> Result<Self> {
        match value {
            Value::Object(record) => Self::from_record(record),
            other => Err(ModelError::InvalidInput(format!(
                "expected a JSON object of feature values, got {}",
                json_kind(other)
            ))),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Rows reordered to `feature_names` and narrowed to `f32`.
    ///
    /// Every fitted feature must be present and no extra column is accepted.
    pub fn aligned_rows(&self, feature_names: &[String]) -> Result<Vec<Vec<f32>>> {
        let unseen: Vec<&str> = self
            .columns
            .iter()
            .filter(|c| !feature_names.contains(*c))
            .map(String::as_str)
            .collect();
        let missing: Vec<&str> = feature_names
            .iter()
            .filter(|f| !self.columns.contains(*f))
            .map(String::as_str)
            .collect();

        if !unseen.is_empty() || !missing.is_empty() {
            let mut message = String::from("The feature names should match those that were passed during fit.");
            if !unseen.is_empty() {
                message.push_str(&format!(" Feature names unseen at fit time: {}.", unseen.join(", ")));
            }
            if !missing.is_empty() {
                message.push_str(&format!(" Feature names seen at fit time, yet now missing: {}.", missing.join(", ")));
            }
            return Err(ModelError::InvalidInput(message));
        }

        let positions: Vec<usize> = feature_names
            .iter()
            .filter_map(|f| self.columns.iter().position(|c| c == f))
            .collect();

        self.rows
            .iter()
            .map(|row| {
                positions
                    .iter()
                    .zip(feature_names)
                    .map(|(&pos, name)| {
                        let value = row[pos];
                        if value.is_nan() {
                            Err(ModelError::InvalidInput(format!(
                                "Input contains NaN for feature '{name}'"
                            )))
                        } else if value.is_infinite() || value.abs() > f64::from(f32::MAX) {
                            Err(ModelError::InvalidInput(format!(
                                "Input contains infinity or a value too large for dtype('float32') for feature '{name}'"
                            )))
                        } else {
                            Ok(value as f32)
                        }
                    })
                    .collect::<Result<Vec<f32>>>()
            })
            .collect()
    }
}

/// Coerce one JSON value to a number.
///
/// Numeric strings are accepted because form front-ends post every field as
/// text. Booleans count as 1 and 0, `null` is a missing value.
fn coerce_value(name: &str, value: &Value) -> Result<f64> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| {
            ModelError::InvalidInput(format!("feature '{name}': number {n} is not representable"))
        }),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| {
            ModelError::InvalidInput(format!("could not convert string to float: '{s}'"))
        }),
        Value::Bool(b) => Ok(if *b { 1.0 } else { 0.0 }),
        Value::Null => Ok(f64::NAN),
        other => Err(ModelError::InvalidInput(format!(
            "feature '{name}': expected a number, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
