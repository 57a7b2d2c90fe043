// Request and response types for the prediction service

use serde::{Deserialize, Serialize};

use super::error::ServiceError;

/// Output labels in model column order.
pub const OUTPUT_LABELS: [&str; 4] = ["DMD", "OMD", "ME", "CH4"];

/// Decimal places kept in every prediction field.
pub const OUTPUT_DECIMALS: i32 = 2;

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeedPrediction {
    /// Dry matter digestibility
    #[serde(rename = "DMD")]
    pub dmd: f64,
    /// Organic matter digestibility
    #[serde(rename = "OMD")]
    pub omd: f64,
    /// Metabolisable energy
    #[serde(rename = "ME")]
    pub me: f64,
    /// Methane
    #[serde(rename = "CH4")]
    pub ch4: f64,
}

impl FeedPrediction {
    /// Take the first row of a prediction matrix, rounded.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, ServiceError> {
        let row = rows.first().ok_or_else(|| {
            ServiceError::PredictionError("model returned no prediction rows".to_string())
        })?;
        if row.len() < OUTPUT_LABELS.len() {
            return Err(ServiceError::PredictionError(format!(
                "model returned {} output values, expected {} ({})",
                row.len(),
                OUTPUT_LABELS.len(),
                OUTPUT_LABELS.join(", ")
            )));
        }
        Ok(Self {
            dmd: round_to(row[0], OUTPUT_DECIMALS),
            omd: round_to(row[1], OUTPUT_DECIMALS),
            me: round_to(row[2], OUTPUT_DECIMALS),
            ch4: round_to(row[3], OUTPUT_DECIMALS),
        })
    }
}

/// Round to `decimals` places, ties to even on the scaled value.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Body of `GET /test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestStatus {
    pub message: String,
    pub model_loaded: bool,
}

impl TestStatus {
    pub fn new(model_loaded: bool) -> Self {
        Self {
            message: "Backend is working!".to_string(),
            model_loaded,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234_56, 2), 1.23);
        assert_eq!(round_to(1.235_1, 2), 1.24);
        assert_eq!(round_to(-3.456, 2), -3.46);
        assert_eq!(round_to(10.0, 2), 10.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(10.375, 2), 10.38);
        assert_eq!(round_to(61.625, 2), 61.62);
        assert_eq!(round_to(-0.125, 2), -0.12);
    }

    #[test]
    fn test_from_rows_rounds_ties_to_even() {
        let prediction = FeedPrediction::from_rows(&[vec![0.125, 10.375, 61.625, 2.5]]).unwrap();
        assert_eq!(
            prediction,
            FeedPrediction {
                dmd: 0.12,
                omd: 10.38,
                me: 61.62,
                ch4: 2.5
            }
        );
    }

    #[test]
    fn test_from_rows_labels_in_order() {
        let rows = vec![vec![61.234, 59.876, 9.111, 24.999]];
        let prediction = FeedPrediction::from_rows(&rows).unwrap();
        assert_eq!(
            prediction,
            FeedPrediction {
                dmd: 61.23,
                omd: 59.88,
                me: 9.11,
                ch4: 25.0
            }
        );
    }

    #[test]
    fn test_from_rows_uses_first_row_only() {
        let rows = vec![vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]];
        assert_eq!(FeedPrediction::from_rows(&rows).unwrap().dmd, 1.0);
    }

    #[test]
    fn test_from_rows_too_few_columns() {
        let err = FeedPrediction::from_rows(&[vec![1.0]]).unwrap_err();
        assert!(matches!(err, ServiceError::PredictionError(_)));
    }

    #[test]
    fn test_from_rows_empty() {
        assert!(FeedPrediction::from_rows(&[]).is_err());
    }

    #[test]
    fn test_serialized_keys() {
        let json = serde_json::to_value(FeedPrediction {
            dmd: 1.0,
            omd: 2.0,
            me: 3.0,
            ch4: 4.0,
        })
        .unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        let mut expected = OUTPUT_LABELS.to_vec();
        expected.sort_unstable();
        let mut keys_sorted = keys.clone();
        keys_sorted.sort_unstable();
        assert_eq!(keys_sorted, expected);
    }

    #[test]
    fn test_test_status_message() {
        let json = serde_json::to_value(TestStatus::new(false)).unwrap();
        assert_eq!(json["message"], "Backend is working!");
        assert_eq!(json["model_loaded"], false);
    }
}
