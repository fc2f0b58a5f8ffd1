//! Dense symmetric-matrix primitives.
//!
//! Matrices are row-major `Vec<Vec<f64>>`, the same representation the
//! covariance helpers in [`crate::utils::stats`] produce. The eigen solver is
//! the cyclic Jacobi method, which is exact enough for the small (tens of
//! dimensions) spread matrices estimated per cohort and never needs pivoting.

/// Maximum number of full Jacobi sweeps before giving up.
const MAX_SWEEPS: usize = 100;

/// Relative off-diagonal mass at which the Jacobi iteration stops.
const CONVERGENCE_TOL: f64 = 1e-24;

/// Eigen-decomposition of a symmetric matrix.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, in the order produced by the solver (not sorted).
    pub values: Vec<f64>,
    /// Eigenvectors stored as columns: `vectors[i][k]` is component `i` of
    /// the eigenvector belonging to `values[k]`.
    pub vectors: Vec<Vec<f64>>,
}

impl SymmetricEigen {
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Build `V diag(1 / sqrt(max(lambda, floor))) V'`, the symmetric inverse
    /// square root with every eigenvalue raised to at least `floor`.
    ///
    /// Returns the matrix and the number of eigenvalues that were raised.
    pub fn inverse_sqrt_with_floor(&self, floor: f64) -> (Vec<Vec<f64>>, usize) {
        let n = self.dimension();
        let mut floored = 0;
        let scales: Vec<f64> = self
            .values
            .iter()
            .map(|&lambda| {
                if lambda < floor {
                    floored += 1;
                }
                1.0 / lambda.max(floor).sqrt()
            })
            .collect();

        let mut out = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in i..n {
                let mut sum = 0.0;
                for k in 0..n {
                    sum += self.vectors[i][k] * self.vectors[j][k] * scales[k];
                }
                out[i][j] = sum;
                out[j][i] = sum;
            }
        }
        (out, floored)
    }
}

/// Eigen-decompose a symmetric matrix with the cyclic Jacobi method.
///
/// Returns `None` if the matrix is not square, contains non-finite values,
/// or the iteration fails to converge.
pub fn symmetric_eigen(matrix: &[Vec<f64>]) -> Option<SymmetricEigen> {
    let n = matrix.len();
    if matrix.iter().any(|row| row.len() != n) {
        return None;
    }
    if matrix.iter().flatten().any(|x| !x.is_finite()) {
        return None;
    }

    let mut a: Vec<Vec<f64>> = matrix.to_vec();
    let mut v = identity(n);

    let total: f64 = a.iter().flatten().map(|x| x * x).sum();
    if total == 0.0 {
        return Some(SymmetricEigen {
            values: vec![0.0; n],
            vectors: v,
        });
    }

    for _ in 0..MAX_SWEEPS {
        let off = off_diagonal_mass(&a);
        if off <= CONVERGENCE_TOL * total {
            let values = (0..n).map(|i| a[i][i]).collect();
            return Some(SymmetricEigen { values, vectors: v });
        }

        for p in 0..n {
            for q in (p + 1)..n {
                let apq = a[p][q];
                if apq == 0.0 {
                    continue;
                }

                // Rotation angle that zeroes a[p][q]
                let theta = (a[q][q] - a[p][p]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
                let c = 1.0 / (t * t + 1.0).sqrt();
                let s = t * c;

                for k in 0..n {
                    let akp = a[k][p];
                    let akq = a[k][q];
                    a[k][p] = c * akp - s * akq;
                    a[k][q] = s * akp + c * akq;
                }
                for k in 0..n {
                    let apk = a[p][k];
                    let aqk = a[q][k];
                    a[p][k] = c * apk - s * aqk;
                    a[q][k] = s * apk + c * aqk;
                }
                for row in v.iter_mut() {
                    let vkp = row[p];
                    let vkq = row[q];
                    row[p] = c * vkp - s * vkq;
                    row[q] = s * vkp + c * vkq;
                }
            }
        }

        if a.iter().flatten().any(|x| !x.is_finite()) {
            return None;
        }
    }

    None
}

/// Matrix-vector product `m * x`.
pub fn mat_vec(m: &[Vec<f64>], x: &[f64]) -> Vec<f64> {
    m.iter()
        .map(|row| row.iter().zip(x).map(|(a, b)| a * b).sum())
        .collect()
}

/// The `n x n` identity matrix.
pub fn identity(n: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|i| {
            let mut row = vec![0.0; n];
            row[i] = 1.0;
            row
        })
        .collect()
}

fn off_diagonal_mass(a: &[Vec<f64>]) -> f64 {
    let n = a.len();
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i][j] * a[i][j];
            }
        }
    }
    sum
}
