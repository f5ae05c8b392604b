// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Correlated Gaussian benchmark with known mutual information.
//!
//! x ~ N(0, I_D), y = ρ x + sqrt(1 - ρ²) ε with ε ~ N(0, I_D). The D component
//! pairs are independent, so I(X;Y) = -(D/2) log(1 - ρ²).

use ndarray::Array2;
use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::estimators::error::{MiError, Result};

/// True mutual information (nats) of the benchmark.
pub fn rho_to_mi(dim: usize, rho: f64) -> f64 {
    -0.5 * dim as f64 * (1.0 - rho * rho).ln()
}

/// Correlation that yields mutual information `mi` in `dim` dimensions.
pub fn mi_to_rho(dim: usize, mi: f64) -> f64 {
    (1.0 - (-2.0 / dim as f64 * mi).exp()).sqrt()
}

/// Draw `batch_size` joint samples; rows of the returned `(x, y)` are paired.
///
/// # Errors
///
/// `InvalidParameter` unless `-1 < rho < 1` and `dim >= 1`.
pub fn sample_correlated_gaussian<R: Rng + ?Sized>(
    rho: f64,
    dim: usize,
    batch_size: usize,
    rng: &mut R,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if !(rho > -1.0 && rho < 1.0) {
        return Err(MiError::InvalidParameter {
            name: "rho",
            value: rho,
            reason: "must lie in (-1, 1)",
        });
    }
    if dim == 0 {
        return Err(MiError::InvalidParameter {
            name: "dim",
            value: 0.0,
            reason: "must be at least 1",
        });
    }
    let x: Array2<f64> = Array2::from_shape_fn((batch_size, dim), |_| StandardNormal.sample(rng));
    let eps: Array2<f64> = Array2::from_shape_fn((batch_size, dim), |_| StandardNormal.sample(rng));
    let y = &x * rho + &eps * (1.0 - rho * rho).sqrt();
    Ok((x, y))
}
