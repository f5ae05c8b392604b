// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Donsker-Varadhan bound and the SMILE estimator built on it.
//!
//! I_DV = E_p(x,y)[f] - log E_p(x)p(y)[exp f]
//!
//! The log outside the marginal expectation makes the sample estimate biased and, in
//! practice, an upper-bounded lower bound. SMILE (Song & Ermon, 2020) reports DV on
//! scores clipped to [-τ, τ] to cap the variance of the partition term, and trains the
//! critic through the JS f-GAN gradient.

use ndarray::ArrayView2;

use crate::estimators::approaches::variational::estimate::BoundEstimate;
use crate::estimators::approaches::variational::jensen_shannon::js_fgan_objective;
use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::approaches::variational::scores::ScoreMatrix;
use crate::estimators::error::{MiError, Result};
use crate::estimators::utils::logmeanexp::{offdiag_log_sum_exp, offdiag_softmax};

/// Donsker-Varadhan bound: `mean(diag f) - logmeanexp_nodiag(f)`.
pub fn dv_upper_lower_bound(scores: &ScoreMatrix) -> BoundEstimate {
    BoundEstimate::new("dv", dv_objective(scores.view(), scores.view()))
}

/// SMILE estimator. Not strictly a lower bound because clipping biases it.
///
/// Value: DV with the joint term on the raw scores and the partition term on
/// `clamp(f, -clip, clip)`. Gradient: the JS f-GAN bound on the raw scores.
/// With `clip = None` the value is plain DV.
///
/// # Errors
///
/// `InvalidParameter` for a non-positive or NaN `clip`.
pub fn smile_lower_bound(scores: &ScoreMatrix, clip: Option<f64>) -> Result<BoundEstimate> {
    let dv = match clip {
        Some(tau) => {
            if !(tau > 0.0) {
                return Err(MiError::InvalidParameter {
                    name: "clip",
                    value: tau,
                    reason: "must be positive",
                });
            }
            let clipped = scores.view().mapv(|v| v.clamp(-tau, tau));
            dv_objective(scores.view(), clipped.view())
        }
        None => dv_objective(scores.view(), scores.view()),
    };
    let js = js_fgan_objective(scores);
    let combined = js.clone() + (dv - js).detach();
    Ok(BoundEstimate::new("smile", combined))
}

/// DV objective with the joint term from `joint` and the partition term from `marginal`.
///
/// The gradient ignores the clamp between the two views; SMILE detaches it anyway.
fn dv_objective(joint: ArrayView2<'_, f64>, marginal: ArrayView2<'_, f64>) -> Objective {
    let n = joint.nrows();
    let n_f = n as f64;
    let lse = offdiag_log_sum_exp(&marginal);
    let logmeanexp = lse - ((n * (n - 1)) as f64).ln();
    let value = joint.diag().sum() / n_f - logmeanexp;

    let mut grad = -offdiag_softmax(&marginal, lse);
    grad.diag_mut().fill(1.0 / n_f);
    Objective::new(value, grad)
}
