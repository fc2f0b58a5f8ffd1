//! Statistical utility functions.
//!
//! Scalar moments over slices, and column-wise moments over a set of
//! equally-sized observation vectors (one row per observation).

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Calculate the variance of a slice (sample variance with n-1 denominator).
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    sum_sq / (values.len() - 1) as f64
}

/// Calculate the standard deviation of a slice.
pub fn std_dev(values: &[f64]) -> f64 {
    variance(values).sqrt()
}

/// Element-wise mean of the rows.
///
/// Returns an empty vector when there are no rows.
pub fn column_means(rows: &[Vec<f64>]) -> Vec<f64> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    let n = rows.len() as f64;
    let mut sums = vec![0.0; first.len()];
    for row in rows {
        for (s, &x) in sums.iter_mut().zip(row) {
            *s += x;
        }
    }
    sums.iter().map(|s| s / n).collect()
}

/// Per-column sample variance around `center` (n-1 denominator).
///
/// # Arguments
/// * `rows` - Observation vectors, one per row
/// * `center` - Column means (usually from [`column_means`])
///
/// # Returns
/// One variance per column. Fewer than two rows give all-zero variances.
///
/// # Example
/// ```
/// use pace_outliers::utils::{column_means, column_variances};
///
/// let rows = vec![vec![1.0, 10.0], vec![3.0, 10.0]];
/// let center = column_means(&rows);
/// assert_eq!(column_variances(&rows, &center), vec![2.0, 0.0]);
/// ```
pub fn column_variances(rows: &[Vec<f64>], center: &[f64]) -> Vec<f64> {
    let d = center.len();
    if rows.len() < 2 {
        return vec![0.0; d];
    }
    let mut sums = vec![0.0; d];
    for row in rows {
        for ((s, &x), &c) in sums.iter_mut().zip(row).zip(center) {
            *s += (x - c).powi(2);
        }
    }
    let denom = (rows.len() - 1) as f64;
    sums.iter().map(|s| s / denom).collect()
}

/// Full sample covariance matrix around `center` (n-1 denominator).
///
/// # Arguments
/// * `rows` - Observation vectors, one per row
/// * `center` - Column means
///
/// # Returns
/// A symmetric `d x d` matrix whose diagonal matches [`column_variances`].
/// Fewer than two rows give the zero matrix.
///
/// # Example
/// ```
/// use pace_outliers::utils::{column_means, covariance_matrix};
///
/// let rows = vec![vec![1.0, 2.0], vec![3.0, 6.0]];
/// let cov = covariance_matrix(&rows, &column_means(&rows));
/// assert_eq!(cov, vec![vec![2.0, 4.0], vec![4.0, 8.0]]);
/// ```
pub fn covariance_matrix(rows: &[Vec<f64>], center: &[f64]) -> Vec<Vec<f64>> {
    let d = center.len();
    let mut cov = vec![vec![0.0; d]; d];
    if rows.len() < 2 {
        return cov;
    }

    let mut dev = vec![0.0; d];
    for row in rows {
        for (i, (&x, &c)) in row.iter().zip(center).enumerate() {
            dev[i] = x - c;
        }
        for i in 0..d {
            for j in i..d {
                cov[i][j] += dev[i] * dev[j];
            }
        }
    }

    let denom = (rows.len() - 1) as f64;
    for i in 0..d {
        for j in i..d {
            cov[i][j] /= denom;
            cov[j][i] = cov[i][j];
        }
    }
    cov
}
