// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reference critics.
//!
//! Real critics are neural networks supplied by the caller. The two critics here cover
//! the cases that need no network: a linear separable critic that can be trained with
//! the bound gradients, and the analytic optimal critic of the correlated Gaussian
//! benchmark.

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::Critic;

/// Separable critic f(x, y) = g(x)ᵀ h(y) with linear embeddings g(x) = x Wx, h(y) = y Wy.
///
/// The score matrix of a batch is (X Wx)(Y Wy)ᵀ.
#[derive(Debug, Clone, PartialEq)]
pub struct SeparableCritic {
    wx: Array2<f64>,
    wy: Array2<f64>,
}

impl SeparableCritic {
    /// `wx` is `dim_x x embed`, `wy` is `dim_y x embed`.
    ///
    /// # Errors
    ///
    /// `ShapeMismatch` when the embedding widths differ.
    pub fn new(wx: Array2<f64>, wy: Array2<f64>) -> Result<Self> {
        if wx.ncols() != wy.ncols() {
            return Err(MiError::ShapeMismatch {
                what: "critic embedding width",
                expected: vec![wx.ncols()],
                got: vec![wy.ncols()],
            });
        }
        Ok(Self { wx, wy })
    }

    /// Weights drawn from N(0, scale²).
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for a negative or non-finite `scale`.
    pub fn random<R: Rng + ?Sized>(
        dim_x: usize,
        dim_y: usize,
        embed: usize,
        scale: f64,
        rng: &mut R,
    ) -> Result<Self> {
        let invalid = MiError::InvalidParameter {
            name: "scale",
            value: scale,
            reason: "must be finite and non-negative",
        };
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(invalid);
        }
        let normal = Normal::new(0.0, scale).map_err(|_| invalid)?;
        let wx = Array2::from_shape_fn((dim_x, embed), |_| normal.sample(rng));
        let wy = Array2::from_shape_fn((dim_y, embed), |_| normal.sample(rng));
        Ok(Self { wx, wy })
    }

    pub fn wx(&self) -> &Array2<f64> {
        &self.wx
    }

    pub fn wy(&self) -> &Array2<f64> {
        &self.wy
    }

    /// Chain rule from a score-matrix gradient G to the weights.
    ///
    /// With A = X Wx and B = Y Wy: dWx = Xᵀ (G B), dWy = Yᵀ (Gᵀ A).
    pub fn weight_grads(
        &self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        score_grad: &Array2<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let a = x.dot(&self.wx);
        let b = y.dot(&self.wy);
        let grad_wx = x.t().dot(&score_grad.dot(&b));
        let grad_wy = y.t().dot(&score_grad.t().dot(&a));
        (grad_wx, grad_wy)
    }

    /// One gradient-ascent step on the bound whose score gradient is `score_grad`.
    pub fn ascend(
        &mut self,
        x: &Array2<f64>,
        y: &Array2<f64>,
        score_grad: &Array2<f64>,
        learning_rate: f64,
    ) {
        let (grad_wx, grad_wy) = self.weight_grads(x, y, score_grad);
        self.wx.scaled_add(learning_rate, &grad_wx);
        self.wy.scaled_add(learning_rate, &grad_wy);
    }
}

impl Critic for SeparableCritic {
    /// # Panics
    ///
    /// When the batch widths do not match the weight rows.
    fn scores(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        let a = x.dot(&self.wx);
        let b = y.dot(&self.wy);
        a.dot(&b.t())
    }
}

/// Optimal critic log p(y|x) - log p(y) for the correlated Gaussian benchmark.
///
/// Per dimension y = ρ x + sqrt(1 - ρ²) ε with x, ε ~ N(0, 1), so
///
/// log p(y|x)/p(y) = Σ_d [ y_d²/2 - (y_d - ρ x_d)² / (2(1 - ρ²)) ] - (D/2) log(1 - ρ²)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianOracleCritic {
    rho: f64,
}

impl GaussianOracleCritic {
    /// # Errors
    ///
    /// `InvalidParameter` unless `-1 < rho < 1`.
    pub fn new(rho: f64) -> Result<Self> {
        if !(rho > -1.0 && rho < 1.0) {
            return Err(MiError::InvalidParameter {
                name: "rho",
                value: rho,
                reason: "must lie in (-1, 1)",
            });
        }
        Ok(Self { rho })
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }
}

impl Critic for GaussianOracleCritic {
    /// # Panics
    ///
    /// When `x` and `y` differ in width.
    fn scores(&self, x: &Array2<f64>, y: &Array2<f64>) -> Array2<f64> {
        assert_eq!(x.ncols(), y.ncols(), "oracle critic needs x and y of equal width");
        let one_minus_rho2 = 1.0 - self.rho * self.rho;
        let dim = x.ncols() as f64;
        let log_norm = -0.5 * dim * one_minus_rho2.ln();
        Array2::from_shape_fn((x.nrows(), y.nrows()), |(i, j)| {
            let mut s = log_norm;
            for (&xd, &yd) in x.row(i).iter().zip(y.row(j).iter()) {
                let resid = yd - self.rho * xd;
                s += 0.5 * yd * yd - resid * resid / (2.0 * one_minus_rho2);
            }
            s
        })
    }
}
