//! Zero-mean, unit-variance feature scaling

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Per-column standardization fitted on a training split
///
/// Uses the population standard deviation. Columns with zero variance
/// scale by 1 so constant features map to 0 instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn fit(features: &[Vec<f64>]) -> Result<Self> {
        let first = features
            .first()
            .ok_or_else(|| Error::Model("cannot fit scaler on zero rows".into()))?;
        let width = first.len();
        let n = features.len() as f64;

        let mut mean = vec![0.0; width];
        for row in features {
            if row.len() != width {
                return Err(Error::Model(format!(
                    "scaler expected {} columns, got {}",
                    width,
                    row.len()
                )));
            }
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut variance = vec![0.0; width];
        for row in features {
            for ((var, v), m) in variance.iter_mut().zip(row).zip(&mean) {
                *var += (v - m).powi(2);
            }
        }

        let scale = variance
            .into_iter()
            .map(|var| {
                let std = (var / n).sqrt();
                if std > f64::EPSILON {
                    std
                } else {
                    1.0
                }
            })
            .collect();

        Ok(Self { mean, scale })
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Standardize a single row
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }

    pub fn transform_all(&self, rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}
