// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2, ArrayView2};

use crate::estimators::error::{MiError, Result};
use crate::estimators::utils::logmeanexp::{require_batch, square_dim};

/// Validated N x N critic score matrix with N >= 2.
///
/// Entry (i, j) scores sample i of X against sample j of Y. The diagonal holds the
/// joint pairs (x_i, y_i), the off-diagonal entries the product-of-marginals pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMatrix {
    scores: Array2<f64>,
}

impl ScoreMatrix {
    pub fn new(scores: Array2<f64>) -> Result<Self> {
        let n = square_dim(&scores.view(), "score matrix")?;
        require_batch(n, 2)?;
        Ok(Self { scores })
    }

    /// Batch size N.
    pub fn n(&self) -> usize {
        self.scores.nrows()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.scores.view()
    }

    pub fn diag(&self) -> Array1<f64> {
        self.scores.diag().to_owned()
    }

    /// Mean of the joint (diagonal) scores.
    pub fn diag_mean(&self) -> f64 {
        self.scores.diag().sum() / self.n() as f64
    }

    pub fn is_finite(&self) -> bool {
        self.scores.iter().all(|v| v.is_finite())
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.scores
    }
}

impl TryFrom<Array2<f64>> for ScoreMatrix {
    type Error = MiError;

    fn try_from(scores: Array2<f64>) -> Result<Self> {
        ScoreMatrix::new(scores)
    }
}

impl AsRef<Array2<f64>> for ScoreMatrix {
    fn as_ref(&self) -> &Array2<f64> {
        &self.scores
    }
}
