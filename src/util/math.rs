//! Small dense linear algebra helpers for direction matrices.
//!
//! Matrices are stored row-major in flat slices of length `n * n`.

/// Tolerance below which a determinant is treated as zero.
pub(crate) const DETERMINANT_EPSILON: f64 = 1e-12;

/// Returns the `n x n` identity matrix.
pub(crate) fn identity(n: usize) -> Vec<f64> {
    let mut m = vec![0.0; n * n];
    for i in 0..n {
        m[i * n + i] = 1.0;
    }
    m
}

/// Computes the determinant of a row-major `n x n` matrix.
///
/// Uses Gaussian elimination with partial pivoting on a scratch copy.
pub(crate) fn determinant(m: &[f64], n: usize) -> f64 {
    debug_assert_eq!(m.len(), n * n);
    if n == 0 {
        return 1.0;
    }
    let mut a = m.to_vec();
    let mut det = 1.0;
    for col in 0..n {
        let mut pivot = col;
        for row in (col + 1)..n {
            if a[row * n + col].abs() > a[pivot * n + col].abs() {
                pivot = row;
            }
        }
        let p = a[pivot * n + col];
        if p.abs() <= DETERMINANT_EPSILON {
            return 0.0;
        }
        if pivot != col {
            for k in 0..n {
                a.swap(col * n + k, pivot * n + k);
            }
            det = -det;
        }
        det *= p;
        for row in (col + 1)..n {
            let factor = a[row * n + col] / p;
            for k in col..n {
                a[row * n + k] -= factor * a[col * n + k];
            }
        }
    }
    det
}

/// Extracts the square block formed by `axes` rows and columns.
pub(crate) fn submatrix(m: &[f64], n: usize, axes: &[usize]) -> Vec<f64> {
    let k = axes.len();
    let mut out = Vec::with_capacity(k * k);
    for &row in axes {
        for &col in axes {
            out.push(m[row * n + col]);
        }
    }
    out
}
