//! Regression accuracy metrics

/// Mean absolute error; 0 for empty input
pub fn mean_absolute_error(actual: &[f64], predicted: &[f64]) -> f64 {
    let n = actual.len().min(predicted.len());
    if n == 0 {
        return 0.0;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / n as f64
}

/// Coefficient of determination
///
/// `None` with fewer than two samples. When the actual values are constant
/// the score is 1.0 for a perfect fit and 0.0 otherwise.
pub fn r2_score(actual: &[f64], predicted: &[f64]) -> Option<f64> {
    let n = actual.len().min(predicted.len());
    if n < 2 {
        return None;
    }

    let mean = actual[..n].iter().sum::<f64>() / n as f64;
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    let ss_tot: f64 = actual[..n].iter().map(|a| (a - mean).powi(2)).sum();

    if ss_tot == 0.0 {
        return Some(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Some(1.0 - ss_res / ss_tot)
}
