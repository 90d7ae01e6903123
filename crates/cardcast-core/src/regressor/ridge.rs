//! Ridge (L2-regularized) linear regression

use crate::error::{Error, Result};

use super::{check_training_data, FittedRegressor, Regressor};

/// Linear regression with an intercept and L2 penalty `alpha`
///
/// Solved in closed form on centred data: `(XᵀX + αI) w = Xᵀy`, intercept
/// recovered from the column means. The intercept is not penalized.
#[derive(Debug, Clone)]
pub struct RidgeRegressor {
    alpha: f64,
}

impl RidgeRegressor {
    pub fn new(alpha: f64) -> Self {
        Self {
            alpha: alpha.max(0.0),
        }
    }
}

impl Default for RidgeRegressor {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Regressor for RidgeRegressor {
    fn name(&self) -> &'static str {
        "ridge"
    }

    fn fit(&self, features: &[Vec<f64>], targets: &[f64]) -> Result<Box<dyn FittedRegressor>> {
        let width = check_training_data(features, targets)?;
        let n = features.len() as f64;

        let x_mean: Vec<f64> = (0..width)
            .map(|j| features.iter().map(|row| row[j]).sum::<f64>() / n)
            .collect();
        let y_mean = targets.iter().sum::<f64>() / n;

        // Normal equations on centred data
        let mut gram = vec![vec![0.0; width]; width];
        let mut rhs = vec![0.0; width];
        for (row, y) in features.iter().zip(targets) {
            let centred: Vec<f64> = row.iter().zip(&x_mean).map(|(v, m)| v - m).collect();
            let yc = y - y_mean;
            for a in 0..width {
                rhs[a] += centred[a] * yc;
                for b in 0..width {
                    gram[a][b] += centred[a] * centred[b];
                }
            }
        }
        for (a, row) in gram.iter_mut().enumerate() {
            row[a] += self.alpha;
        }

        let weights = solve(gram, rhs)?;
        let intercept = y_mean
            - weights
                .iter()
                .zip(&x_mean)
                .map(|(w, m)| w * m)
                .sum::<f64>();

        Ok(Box::new(FittedRidge { weights, intercept }))
    }
}

/// Gaussian elimination with partial pivoting
fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        if a[pivot][col].abs() < 1e-12 {
            return Err(Error::Model(
                "singular system in ridge fit (try alpha > 0)".into(),
            ));
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    Ok(x)
}

#[derive(Debug)]
struct FittedRidge {
    weights: Vec<f64>,
    intercept: f64,
}

impl FittedRegressor for FittedRidge {
    fn predict(&self, features: &[Vec<f64>]) -> Vec<f64> {
        features
            .iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.weights)
                        .map(|(v, w)| v * w)
                        .sum::<f64>()
            })
            .collect()
    }
}
