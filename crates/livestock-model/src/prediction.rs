//! Prediction output shapes.

/// Raw model output.
///
/// Single-output models return one value per row as a flat vector; multi-output
/// models return one vector per row.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPrediction {
    Flat(Vec<f64>),
    Matrix(Vec<Vec<f64>>),
}

impl RawPrediction {
    pub fn ndim(&self) -> usize {
        match self {
            Self::Flat(_) => 1,
            Self::Matrix(_) => 2,
        }
    }

    /// Two-dimensional view of the output.
    ///
    /// A flat vector becomes a single row holding all of its values, so the
    /// caller can always index `rows[0]`.
    pub fn into_rows(self) -> Vec<Vec<f64>> {
        match self {
            Self::Flat(values) => vec![values],
            Self::Matrix(rows) => rows,
        }
    }
}
