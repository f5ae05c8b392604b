// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! TUBA and NWJ bounds.
//!
//! TUBA (tractable unnormalized Barber-Agakov) lower-bounds I(X;Y) by
//!
//! I_TUBA = 1 + E_p(x,y)[f(x,y)] - E_p(x)p(y)[exp f(x,y)]
//!
//! with the joint expectation taken over the diagonal of the score matrix and the
//! marginal expectation over the off-diagonal entries. An optional log-baseline a(y)
//! recentres the scores per sample before the bound is applied. NWJ (Nguyen, Wainwright,
//! Jordan) is TUBA with a fixed baseline of 1, i.e. `tuba(f - 1)`.

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::estimators::approaches::variational::estimate::BoundEstimate;
use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::approaches::variational::scores::ScoreMatrix;
use crate::estimators::error::{MiError, Result};
use crate::estimators::utils::logmeanexp::{offdiag_lane_log_sum_exp, offdiag_log_sum_exp};

/// TUBA lower bound, optionally recentred by a log-baseline.
///
/// The baseline is subtracted from each row: `s[i, j] = f[i, j] - log_baseline[i]`.
/// When a baseline is given, the estimate also carries the gradient with respect to it.
///
/// # Errors
///
/// `ShapeMismatch` when the baseline length differs from the batch size.
pub fn tuba_lower_bound(
    scores: &ScoreMatrix,
    log_baseline: Option<&Array1<f64>>,
) -> Result<BoundEstimate> {
    let n = scores.n();
    match log_baseline {
        None => Ok(tuba_from_view("tuba", scores.view())),
        Some(baseline) => {
            if baseline.len() != n {
                return Err(MiError::ShapeMismatch {
                    what: "log baseline",
                    expected: vec![n],
                    got: vec![baseline.len()],
                });
            }
            let shifted = scores.view().to_owned() - &baseline.view().insert_axis(Axis(1));
            let estimate = tuba_from_view("tuba", shifted.view());
            // s[i, j] = f[i, j] - b[i], so dI/db[i] = -sum_j dI/ds[i, j]
            let baseline_grad = -estimate.score_grad().sum_axis(Axis(1));
            Ok(estimate.with_baseline_grad(baseline_grad))
        }
    }
}

/// NWJ lower bound, `tuba(f - 1)` without a baseline.
pub fn nwj_lower_bound(scores: &ScoreMatrix) -> BoundEstimate {
    let shifted = scores.view().to_owned() - 1.0;
    tuba_from_view("nwj", shifted.view())
}

/// NWJ objective on its own, for composing the value/gradient split bounds.
pub(crate) fn nwj_objective(scores: &ScoreMatrix) -> (Objective, Array1<f64>) {
    let shifted = scores.view().to_owned() - 1.0;
    tuba_terms(shifted.view())
}

fn tuba_from_view(bound: &'static str, scores: ArrayView2<'_, f64>) -> BoundEstimate {
    let (objective, local) = tuba_terms(scores);
    BoundEstimate::new(bound, objective).with_local(local)
}

/// Value, gradient and per-row local values of the TUBA bound on a validated square view.
fn tuba_terms(scores: ArrayView2<'_, f64>) -> (Objective, Array1<f64>) {
    let n = scores.nrows();
    let n_f = n as f64;
    let log_terms = ((n * (n - 1)) as f64).ln();

    // Joint term: mean over the diagonal
    let joint_term = scores.diag().sum() / n_f;

    // Marginal term: exp(logmeanexp over off-diagonal entries)
    let marg_term = (offdiag_log_sum_exp(&scores) - log_terms).exp();

    let value = 1.0 + joint_term - marg_term;

    // d/ds_ii = 1/N, d/ds_ij = -exp(s_ij) / (N(N-1))
    let mut grad: Array2<f64> = scores.mapv(|v| -(v - log_terms).exp());
    grad.diag_mut().fill(1.0 / n_f);

    // Row i contributes 1 + s_ii - mean_{j != i} exp(s_ij); the rows average to the value.
    let log_row_terms = ((n - 1) as f64).ln();
    let row_lse = offdiag_lane_log_sum_exp(&scores, Axis(1));
    let local = Array1::from_iter(
        row_lse
            .iter()
            .enumerate()
            .map(|(i, &lse)| 1.0 + scores[[i, i]] - (lse - log_row_terms).exp()),
    );

    (Objective::new(value, grad), local)
}
