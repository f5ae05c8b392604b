// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MINE (Belghazi et al., 2018): the DV bound with a moving-average gradient correction.
//!
//! The gradient of log E[exp f] is biased when the expectation is estimated on a
//! minibatch. MINE replaces the denominator by an exponential moving average of
//! E[exp f] carried across training steps. The moving average is state owned by the
//! training loop; it is passed in as a [`MineBuffer`] and handed back in [`MineState`].

use ndarray::Array2;

use crate::estimators::approaches::variational::estimate::BoundEstimate;
use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::approaches::variational::scores::ScoreMatrix;
use crate::estimators::error::{MiError, Result};
use crate::estimators::utils::logmeanexp::{offdiag_log_sum_exp, offdiag_softmax};

/// Lower clamp of the moving average, keeps the gradient rescaling finite.
pub const MINE_BUFFER_FLOOR: f64 = 1e-4;

pub const DEFAULT_MOMENTUM: f64 = 0.9;

/// Moving average of exp(logmeanexp_nodiag(f)) across training steps.
///
/// Starts at 1.0 when the caller has none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineBuffer(f64);

impl MineBuffer {
    /// # Errors
    ///
    /// `InvalidParameter` for a non-finite value.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(MiError::InvalidParameter {
                name: "buffer",
                value,
                reason: "must be finite",
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for MineBuffer {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Buffer state produced by one MINE evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MineState {
    /// Updated moving average, to be passed to the next call.
    pub buffer: MineBuffer,
    /// exp(logmeanexp_nodiag(f)) of the current batch.
    pub update: f64,
}

/// MINE lower bound.
///
/// With u = exp(logmeanexp_nodiag(f)) and b' = max(momentum * b + (1 - momentum) * u, 1e-4):
///
/// value    = mean(diag f) - detach(logmeanexp_nodiag(f)) - u / b' + detach(u / b')
///
/// The last two terms cancel in value, so the reported estimate is the DV bound. They
/// survive in the gradient, which becomes ∇mean(diag f) - ∇u / b'.
///
/// # Errors
///
/// `InvalidParameter` unless `0 <= momentum <= 1`.
pub fn mine_lower_bound(
    scores: &ScoreMatrix,
    buffer: Option<MineBuffer>,
    momentum: f64,
) -> Result<(BoundEstimate, MineState)> {
    if !(0.0..=1.0).contains(&momentum) {
        return Err(MiError::InvalidParameter {
            name: "momentum",
            value: momentum,
            reason: "must lie in [0, 1]",
        });
    }
    let buffer = buffer.unwrap_or_default();
    let n = scores.n();
    let n_f = n as f64;
    let f = scores.view();

    let mut joint_grad = Array2::<f64>::zeros((n, n));
    joint_grad.diag_mut().fill(1.0 / n_f);
    let first_term = Objective::new(scores.diag_mean(), joint_grad);

    let lse = offdiag_log_sum_exp(&f);
    let logmeanexp = lse - ((n * (n - 1)) as f64).ln();
    let softmax = offdiag_softmax(&f, lse);

    // u = exp(logmeanexp), du/df_ij = u * softmax_ij
    let update = logmeanexp.exp();
    let buffer_update = Objective::new(update, softmax.mapv(|w| w * update));

    let second_term = Objective::new(logmeanexp, softmax).detach();

    let ema = buffer.value() * momentum + update * (1.0 - momentum);
    // Comparison form keeps NaN visible instead of clamping it away.
    let buffer_new = if ema < MINE_BUFFER_FLOOR { MINE_BUFFER_FLOOR } else { ema };

    let third_term_grad = buffer_update * (1.0 / buffer_new);
    let third_term_no_grad = third_term_grad.clone().detach();

    let objective = first_term - second_term - third_term_grad + third_term_no_grad;
    let state = MineState {
        buffer: MineBuffer(buffer_new),
        update,
    };
    Ok((BoundEstimate::new("mine", objective), state))
}
