// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! InfoNCE and its multi-label generalisation.
//!
//! InfoNCE (van den Oord et al., 2018) scores each joint pair against every candidate
//! in its row:
//!
//! I_NCE = (1/N) Σ_i [ f_ii - log Σ_j exp(f_ij + a_ij) ]
//!
//! The prior weights a_ii = log(α/N) and a_ij = log((N-α)/(N(N-1))) mix the self pair
//! with the other pairs. With α = 1 every candidate has weight 1/N and the bound is the
//! standard InfoNCE, which can never exceed log N.

use ndarray::{Array1, Array2, ArrayView2};

use crate::estimators::approaches::variational::estimate::BoundEstimate;
use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::approaches::variational::scores::ScoreMatrix;
use crate::estimators::error::{MiError, Result};
use crate::estimators::utils::logmeanexp::{log_sum_exp_by, row_log_softmax};

/// Default self-pair weight of the InfoNCE prior.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// InfoNCE lower bound with self-pair prior weight `alpha`.
///
/// # Errors
///
/// `InvalidParameter` unless `0 < alpha <= N`.
pub fn infonce_lower_bound(scores: &ScoreMatrix, alpha: f64) -> Result<BoundEstimate> {
    let n = scores.n();
    let n_f = n as f64;
    check_prior_alpha(alpha, n)?;

    let a_ii = (alpha / n_f).ln();
    let a_ij = ((n_f - alpha) / (n_f * (n_f - 1.0))).ln();
    let weighted = prior_weighted(scores, a_ii, a_ij);

    let (row_lse, softmax) = row_log_softmax(&weighted.view());
    let local: Array1<f64> = &scores.diag() - &row_lse;
    let value = local.sum() / n_f;

    // d/df_ij = (δ_ij - softmax_i(f + a)_j) / N
    let mut grad = -softmax / n_f;
    grad.diag_mut().mapv_inplace(|g| g + 1.0 / n_f);

    Ok(BoundEstimate::new("infonce", Objective::new(value, grad)).with_local(local))
}

/// Multi-label InfoNCE.
///
/// Without a secondary matrix, every entry competes in one joint normaliser:
///
/// I = mean(diag f) - log Σ_ij exp(f_ij + a_ij),
/// a_ii = log(α/N²), a_ij = log((N-α)/(N²(N-1))), with 0 < α <= N.
///
/// With a secondary score matrix `g` (the critic evaluated against a second batch of
/// M samples of Y, so `g` is N x M), each row mixes the two candidate sets with
/// weights α and 1-α:
///
/// I = mean(diag f) - [ log Σ_i (α Σ_j e^{f_ij} + (1-α) Σ_k e^{g_ik}) - 2 log N ],
///
/// with 0 <= α <= 1; a set with zero weight is left out. The double log-sum-exp
/// (columns, then rows) is evaluated as one log-sum-exp over both weighted sets.
///
/// # Errors
///
/// `InvalidParameter` for an out-of-range `alpha`, `ShapeMismatch` when `g` does not
/// have N rows or has no columns.
pub fn multilabel_infonce_lower_bound(
    scores: &ScoreMatrix,
    alpha: f64,
    secondary: Option<&Array2<f64>>,
) -> Result<BoundEstimate> {
    let n = scores.n();
    let n_f = n as f64;
    let joint_term = scores.diag_mean();

    match secondary {
        None => {
            check_prior_alpha(alpha, n)?;
            let a_ii = (alpha / (n_f * n_f)).ln();
            let a_ij = ((n_f - alpha) / (n_f * n_f * (n_f - 1.0))).ln();
            let weighted = prior_weighted(scores, a_ii, a_ij);

            let lse = log_sum_exp_by(n * n, |k| weighted[[k / n, k % n]]);
            let value = joint_term - lse;

            let mut grad = weighted.mapv(|w| -(w - lse).exp());
            grad.diag_mut().mapv_inplace(|g| g + 1.0 / n_f);

            Ok(BoundEstimate::new("ml_infonce", Objective::new(value, grad)))
        }
        Some(g) => {
            let m = g.ncols();
            if g.nrows() != n || m == 0 {
                return Err(MiError::ShapeMismatch {
                    what: "secondary score matrix",
                    expected: vec![n, m.max(1)],
                    got: vec![g.nrows(), m],
                });
            }
            if !(0.0..=1.0).contains(&alpha) {
                return Err(MiError::InvalidParameter {
                    name: "alpha",
                    value: alpha,
                    reason: "must lie in [0, 1] when a secondary score matrix is given",
                });
            }
            // Log-weights of the two candidate sets; None drops a set entirely.
            let log_w_f = (alpha > 0.0).then(|| alpha.ln());
            let log_w_g = (alpha < 1.0).then(|| (1.0 - alpha).ln());

            let f = scores.view();
            let g_view = g.view();
            let nn = n * n;
            let lse = log_sum_exp_by(nn + n * m, |k| {
                if k < nn {
                    log_w_f.map_or(f64::NEG_INFINITY, |w| f[[k / n, k % n]] + w)
                } else {
                    let idx = k - nn;
                    log_w_g.map_or(f64::NEG_INFINITY, |w| g_view[[idx / m, idx % m]] + w)
                }
            });
            let second_term = lse - 2.0 * n_f.ln();
            let value = joint_term - second_term;

            let mut grad_f = neg_weighted_softmax(f, log_w_f, lse);
            grad_f.diag_mut().mapv_inplace(|v| v + 1.0 / n_f);
            let grad_g = neg_weighted_softmax(g_view, log_w_g, lse);

            Ok(BoundEstimate::new("ml_infonce", Objective::new(value, grad_f))
                .with_secondary_grad(grad_g))
        }
    }
}

/// -exp(m + log_w - lse), or zeros for a dropped set.
fn neg_weighted_softmax(m: ArrayView2<'_, f64>, log_w: Option<f64>, lse: f64) -> Array2<f64> {
    match log_w {
        Some(w) => m.mapv(|v| -(v + w - lse).exp()),
        None => Array2::zeros(m.raw_dim()),
    }
}

fn check_prior_alpha(alpha: f64, n: usize) -> Result<()> {
    if !(alpha > 0.0 && alpha <= n as f64) {
        return Err(MiError::InvalidParameter {
            name: "alpha",
            value: alpha,
            reason: "must lie in (0, N] for the batch size N",
        });
    }
    Ok(())
}

/// f + a with a on the diagonal set to `a_ii` and elsewhere to `a_ij`.
fn prior_weighted(scores: &ScoreMatrix, a_ii: f64, a_ij: f64) -> Array2<f64> {
    let mut weighted = scores.view().mapv(|v| v + a_ij);
    for (w, &f) in weighted.diag_mut().iter_mut().zip(scores.view().diag().iter()) {
        *w = f + a_ii;
    }
    weighted
}
