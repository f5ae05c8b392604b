// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, Axis};

use crate::estimators::error::{MiError, Result};

pub trait GlobalValue {
    /// Compute and return the global value of the measure.
    fn global_value(&self) -> f64;
}

/// Optional interface for estimators that may not support local values.
///
/// Estimators whose value is the mean of per-sample contributions return
/// supports_local() = true and provide those contributions via `Ok(Array1<f64>)`.
/// The others return supports_local() = false and `MiError::LocalValuesUnsupported`.
pub trait OptionalLocalValues {
    fn supports_local(&self) -> bool;
    fn local_values_opt(&self) -> Result<Array1<f64>>;
}

/// Marker trait for Mutual Information estimator instances.
pub trait MutualInformationEstimator: GlobalValue + OptionalLocalValues {}

/// Scores every sample of X against every sample of Y.
///
/// Batches hold one sample per row. For batches of N rows the critic must return an
/// N x N matrix whose entry (i, j) is the compatibility of x_i and y_j. Any closure
/// `Fn(&Array2<f64>, &Array2<f64>) -> Array2<f64>` is a critic.
pub trait Critic {
    fn scores(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64>;
}

impl<F> Critic for F
where
    F: Fn(&Array2<f64>, &Array2<f64>) -> Array2<f64>,
{
    fn scores(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        self(x, y)
    }
}

/// Output of a baseline network: `[N]` or `[N, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub enum BaselineScores {
    Vector(Array1<f64>),
    /// Single-column output, squeezed to a vector before use.
    Column(Array2<f64>),
}

impl From<Array1<f64>> for BaselineScores {
    fn from(array: Array1<f64>) -> Self {
        BaselineScores::Vector(array)
    }
}

impl From<Array2<f64>> for BaselineScores {
    fn from(array: Array2<f64>) -> Self {
        BaselineScores::Column(array)
    }
}

impl BaselineScores {
    /// Squeeze to a length-`n` vector.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` unless the output is `[n]` or `[n, 1]`.
    pub fn squeeze(self, n: usize) -> Result<Array1<f64>> {
        match self {
            BaselineScores::Vector(v) if v.len() == n => Ok(v),
            BaselineScores::Vector(v) => Err(MiError::ShapeMismatch {
                what: "log baseline",
                expected: vec![n],
                got: vec![v.len()],
            }),
            BaselineScores::Column(m) if m.dim() == (n, 1) => Ok(m.index_axis_move(Axis(1), 0)),
            BaselineScores::Column(m) => Err(MiError::ShapeMismatch {
                what: "log baseline",
                expected: vec![n, 1],
                got: m.shape().to_vec(),
            }),
        }
    }
}

/// Maps a batch of Y to one log-baseline per sample, used to recentre TUBA scores.
///
/// Closures returning `Array1<f64>` or `Array2<f64>` are baselines.
pub trait Baseline {
    fn log_baseline(&self, y: &Array2<f64>) -> BaselineScores;
}

impl<F, R> Baseline for F
where
    F: Fn(&Array2<f64>) -> R,
    R: Into<BaselineScores>,
{
    fn log_baseline(&self, y: &Array2<f64>) -> BaselineScores {
        self(y).into()
    }
}
