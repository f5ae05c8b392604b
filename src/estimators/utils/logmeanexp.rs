// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Log-space reductions over critic score matrices
//!
//! All reductions use the max-subtraction identity
//!
//! log Σ_i exp(x_i) = m + log Σ_i exp(x_i - m),   m = max_i x_i
//!
//! so that large positive scores do not overflow and large negative scores do not
//! collapse to -∞. Non-finite inputs are propagated, never masked: a NaN anywhere in
//! the reduced set yields NaN, a +∞ yields +∞.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::estimators::error::{MiError, Result};

/// Which axes an off-diagonal log-mean-exp reduces over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduce {
    /// Reduce over both axes jointly: N(N-1) terms, scalar result.
    Both,
    /// Reduce along a single axis: N-1 terms per lane, one value per lane.
    ///
    /// `Axis(1)` reduces each row (one value per row), `Axis(0)` each column.
    Axis(Axis),
}

/// Output of [`logmeanexp_nodiag`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogMeanExp {
    Scalar(f64),
    Vector(Array1<f64>),
}

impl LogMeanExp {
    pub fn scalar(&self) -> Option<f64> {
        match self {
            LogMeanExp::Scalar(v) => Some(*v),
            LogMeanExp::Vector(_) => None,
        }
    }

    pub fn into_vector(self) -> Option<Array1<f64>> {
        match self {
            LogMeanExp::Scalar(_) => None,
            LogMeanExp::Vector(v) => Some(v),
        }
    }
}

/// Numerically stable log Σ_i exp(x_i) over `len` values produced by `value(i)`.
///
/// Returns -∞ when `len == 0` or every value is -∞.
pub fn log_sum_exp_by(len: usize, value: impl Fn(usize) -> f64) -> f64 {
    let mut max_val = f64::NEG_INFINITY;
    for i in 0..len {
        let v = value(i);
        if v.is_nan() {
            return f64::NAN;
        }
        if v > max_val {
            max_val = v;
        }
    }
    if !max_val.is_finite() {
        // No mass at all, or a +inf term dominates.
        return max_val;
    }
    let mut sum_exp = 0.0;
    for i in 0..len {
        sum_exp += (value(i) - max_val).exp();
    }
    max_val + sum_exp.ln()
}

/// Numerically stable log Σ exp(x) over a slice.
pub fn log_sum_exp(values: &[f64]) -> f64 {
    log_sum_exp_by(values.len(), |i| values[i])
}

/// Numerically stable softplus: ln(1 + e^x).
#[inline]
pub fn softplus(x: f64) -> f64 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Numerically stable logistic sigmoid, the derivative of [`softplus`].
#[inline]
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

/// Side length of a square score matrix, or `ShapeMismatch`.
pub(crate) fn square_dim(scores: &ArrayView2<'_, f64>, what: &'static str) -> Result<usize> {
    let (rows, cols) = scores.dim();
    if rows != cols {
        return Err(MiError::ShapeMismatch {
            what,
            expected: vec![rows, rows],
            got: vec![rows, cols],
        });
    }
    Ok(rows)
}

pub(crate) fn require_batch(n: usize, required: usize) -> Result<()> {
    if n < required {
        return Err(MiError::DegenerateBatch { n, required });
    }
    Ok(())
}

/// log((1/N) Σ_i exp(x_ii)) over the diagonal of a square matrix.
///
/// Requires N >= 1.
pub fn logmeanexp_diag(scores: ArrayView2<'_, f64>) -> Result<f64> {
    let n = square_dim(&scores, "score matrix")?;
    require_batch(n, 1)?;
    Ok(log_sum_exp_by(n, |i| scores[[i, i]]) - (n as f64).ln())
}

/// Log-mean-exp over the off-diagonal entries of a square matrix.
///
/// The diagonal acts as -∞ and carries no mass. The divisor is N(N-1) for
/// [`Reduce::Both`] and N-1 for a single axis. N = 1 has no off-diagonal
/// entries and is rejected with `DegenerateBatch`.
pub fn logmeanexp_nodiag(scores: ArrayView2<'_, f64>, reduce: Reduce) -> Result<LogMeanExp> {
    let n = square_dim(&scores, "score matrix")?;
    require_batch(n, 2)?;
    match reduce {
        Reduce::Both => Ok(LogMeanExp::Scalar(
            offdiag_log_sum_exp(&scores) - ((n * (n - 1)) as f64).ln(),
        )),
        Reduce::Axis(axis) => {
            if axis.index() > 1 {
                return Err(MiError::ShapeMismatch {
                    what: "reduction axis",
                    expected: vec![0, 1],
                    got: vec![axis.index()],
                });
            }
            let log_terms = ((n - 1) as f64).ln();
            let values = offdiag_lane_log_sum_exp(&scores, axis) - log_terms;
            Ok(LogMeanExp::Vector(values))
        }
    }
}

/// log Σ_{i≠j} exp(x_ij). Callers have already validated the shape.
pub(crate) fn offdiag_log_sum_exp(scores: &ArrayView2<'_, f64>) -> f64 {
    let n = scores.nrows();
    log_sum_exp_by(n * n, |k| {
        let (i, j) = (k / n, k % n);
        if i == j { f64::NEG_INFINITY } else { scores[[i, j]] }
    })
}

/// log Σ_{m≠k} exp over each lane along `axis`, skipping the diagonal entry of the lane.
///
/// `Axis(1)` gives one value per row, `Axis(0)` one value per column.
pub(crate) fn offdiag_lane_log_sum_exp(scores: &ArrayView2<'_, f64>, axis: Axis) -> Array1<f64> {
    let n = scores.nrows();
    let per_row = axis.index() == 1;
    (0..n)
        .map(|k| {
            log_sum_exp_by(n, |m| {
                if m == k {
                    f64::NEG_INFINITY
                } else if per_row {
                    scores[[k, m]]
                } else {
                    scores[[m, k]]
                }
            })
        })
        .collect()
}

/// Softmax weights exp(x_ij - lse) over the off-diagonal entries, zero on the diagonal.
///
/// With `lse` = [`offdiag_log_sum_exp`] this is the gradient of that reduction.
pub(crate) fn offdiag_softmax(scores: &ArrayView2<'_, f64>, lse: f64) -> Array2<f64> {
    let mut weights = scores.mapv(|v| (v - lse).exp());
    weights.diag_mut().fill(0.0);
    weights
}

/// Row-wise log Σ_j exp(x_ij) together with the row softmax.
pub(crate) fn row_log_softmax(scores: &ArrayView2<'_, f64>) -> (Array1<f64>, Array2<f64>) {
    let lse: Array1<f64> = scores
        .rows()
        .into_iter()
        .map(|row| log_sum_exp_by(row.len(), |j| row[j]))
        .collect();
    let mut softmax = scores.to_owned();
    for (mut row, &l) in softmax.rows_mut().into_iter().zip(lse.iter()) {
        row.mapv_inplace(|v| (v - l).exp());
    }
    (lse, softmax)
}
