// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use crate::estimators::approaches::variational::{
    dv_upper_lower_bound, infonce_lower_bound, js_fgan_lower_bound, js_lower_bound,
    mine_lower_bound, multilabel_infonce_lower_bound, nwj_lower_bound, smile_lower_bound,
    tuba_lower_bound, BoundEstimate, MineBuffer, MineState, ScoreMatrix,
};
use crate::estimators::error::{MiError, Result};
use crate::estimators::selector::Estimator;
use crate::estimators::traits::{
    Baseline, Critic, GlobalValue, MutualInformationEstimator, OptionalLocalValues,
};

/// Result of [`estimate_mutual_information`].
#[derive(Debug, Clone, PartialEq)]
pub struct MiEstimate {
    /// The evaluated bound: value, gradients and local values.
    pub bound: BoundEstimate,
    /// Updated moving average; `Some` for MINE only. The caller threads
    /// `mine.buffer` into the next training step.
    pub mine: Option<MineState>,
}

impl MiEstimate {
    pub fn value(&self) -> f64 {
        self.bound.value()
    }
}

impl GlobalValue for MiEstimate {
    fn global_value(&self) -> f64 {
        self.bound.value()
    }
}

impl OptionalLocalValues for MiEstimate {
    fn supports_local(&self) -> bool {
        self.bound.supports_local()
    }

    fn local_values_opt(&self) -> Result<Array1<f64>> {
        self.bound.local_values_opt()
    }
}

impl MutualInformationEstimator for MiEstimate {}

/// Estimate a variational bound on I(X;Y) from two batches and a critic.
///
/// 1. `critic.scores(x, y)` produces the N x N score matrix.
/// 2. If a baseline is given it is evaluated on `y` and squeezed to length N. Only the
///    TUBA bound consumes it.
/// 3. The bound selected by `estimator` reduces the scores. Multi-label InfoNCE with a
///    second batch `y_prime` of M samples scores `x` against it for an N x M
///    secondary matrix.
///
/// Non-finite critic output is not sanitised; it propagates into the estimate and is
/// reported with a warning.
///
/// # Errors
///
/// * `ShapeMismatch` when the batches differ in length, the critic output is not
///   N x N, or the baseline output is not `[N]` / `[N, 1]`.
/// * `DegenerateBatch` for N < 2.
/// * `InvalidParameter` for out-of-range bound options.
pub fn estimate_mutual_information<C: Critic + ?Sized>(
    estimator: &Estimator,
    x: &Array2<f64>,
    y: &Array2<f64>,
    critic: &C,
    baseline: Option<&dyn Baseline>,
) -> Result<MiEstimate> {
    let scores = evaluate_critic(critic, x, y)?;
    let n = scores.n();
    tracing::debug!(estimator = estimator.tag(), n, "Estimating mutual information");
    if !scores.is_finite() {
        tracing::warn!(estimator = estimator.tag(), "Critic produced non-finite scores");
    }

    let log_baseline = match baseline {
        Some(b) => Some(b.log_baseline(y).squeeze(n)?),
        None => None,
    };
    if log_baseline.is_some() && !matches!(estimator, Estimator::Tuba) {
        tracing::debug!(estimator = estimator.tag(), "Baseline ignored by this bound");
    }

    let (bound, mine) = match estimator {
        Estimator::Tuba => (tuba_lower_bound(&scores, log_baseline.as_ref())?, None),
        Estimator::Nwj => (nwj_lower_bound(&scores), None),
        Estimator::InfoNce(opts) => (infonce_lower_bound(&scores, opts.alpha)?, None),
        Estimator::Js => (js_lower_bound(&scores), None),
        Estimator::Smile(opts) => (smile_lower_bound(&scores, opts.clip)?, None),
        Estimator::Dv => (dv_upper_lower_bound(&scores), None),
        Estimator::Mine(opts) => {
            let (bound, state) = mine_lower_bound(&scores, opts.buffer, opts.momentum)?;
            tracing::debug!(
                buffer = state.buffer.value(),
                update = state.update,
                "Updated MINE moving average"
            );
            (bound, Some(state))
        }
        Estimator::MlInfoNce(opts) => {
            let secondary = match &opts.y_prime {
                Some(y_prime) => Some(evaluate_secondary(critic, x, y_prime)?),
                None => None,
            };
            let bound = multilabel_infonce_lower_bound(&scores, opts.alpha, secondary.as_ref())?;
            (bound, None)
        }
    };

    if !bound.value().is_finite() {
        tracing::warn!(
            estimator = estimator.tag(),
            value = bound.value(),
            "Non-finite mutual information estimate"
        );
    }
    Ok(MiEstimate { bound, mine })
}

/// Run the critic and validate its output against the batch size.
fn evaluate_critic<C: Critic + ?Sized>(
    critic: &C,
    x: &Array2<f64>,
    y: &Array2<f64>,
) -> Result<ScoreMatrix> {
    let n = x.nrows();
    if y.nrows() != n {
        return Err(MiError::ShapeMismatch {
            what: "sample batches",
            expected: vec![n],
            got: vec![y.nrows()],
        });
    }
    let scores = critic.scores(x, y);
    if scores.dim() != (n, n) {
        return Err(MiError::ShapeMismatch {
            what: "critic output",
            expected: vec![n, n],
            got: scores.shape().to_vec(),
        });
    }
    ScoreMatrix::new(scores)
}

/// Score `x` against a second batch of M samples; the result must be N x M.
fn evaluate_secondary<C: Critic + ?Sized>(
    critic: &C,
    x: &Array2<f64>,
    y_prime: &Array2<f64>,
) -> Result<Array2<f64>> {
    let (n, m) = (x.nrows(), y_prime.nrows());
    if m == 0 {
        return Err(MiError::DegenerateBatch { n: 0, required: 1 });
    }
    let scores = critic.scores(x, y_prime);
    if scores.dim() != (n, m) {
        return Err(MiError::ShapeMismatch {
            what: "secondary critic output",
            expected: vec![n, m],
            got: scores.shape().to_vec(),
        });
    }
    Ok(scores)
}

/// Mutual information bounds on precomputed score matrices.
///
/// This struct provides static methods that validate a raw score matrix and
/// evaluate one bound on it, for callers that run their critic themselves.
pub struct MutualInformation;

impl MutualInformation {
    /// TUBA bound, optionally recentred by a log-baseline.
    pub fn new_tuba(scores: Array2<f64>, log_baseline: Option<&Array1<f64>>) -> Result<BoundEstimate> {
        tuba_lower_bound(&ScoreMatrix::new(scores)?, log_baseline)
    }

    pub fn new_nwj(scores: Array2<f64>) -> Result<BoundEstimate> {
        Ok(nwj_lower_bound(&ScoreMatrix::new(scores)?))
    }

    pub fn new_infonce(scores: Array2<f64>, alpha: f64) -> Result<BoundEstimate> {
        infonce_lower_bound(&ScoreMatrix::new(scores)?, alpha)
    }

    /// JS f-GAN divergence bound, the training path of the calibrated JS and SMILE bounds.
    pub fn new_js_fgan(scores: Array2<f64>) -> Result<BoundEstimate> {
        Ok(js_fgan_lower_bound(&ScoreMatrix::new(scores)?))
    }

    pub fn new_js(scores: Array2<f64>) -> Result<BoundEstimate> {
        Ok(js_lower_bound(&ScoreMatrix::new(scores)?))
    }

    pub fn new_dv(scores: Array2<f64>) -> Result<BoundEstimate> {
        Ok(dv_upper_lower_bound(&ScoreMatrix::new(scores)?))
    }

    pub fn new_smile(scores: Array2<f64>, clip: Option<f64>) -> Result<BoundEstimate> {
        smile_lower_bound(&ScoreMatrix::new(scores)?, clip)
    }

    /// MINE bound; returns the estimate and the buffer to carry into the next step.
    pub fn new_mine(
        scores: Array2<f64>,
        buffer: Option<MineBuffer>,
        momentum: f64,
    ) -> Result<(BoundEstimate, MineState)> {
        mine_lower_bound(&ScoreMatrix::new(scores)?, buffer, momentum)
    }

    pub fn new_ml_infonce(
        scores: Array2<f64>,
        alpha: f64,
        secondary: Option<Array2<f64>>,
    ) -> Result<BoundEstimate> {
        multilabel_infonce_lower_bound(&ScoreMatrix::new(scores)?, alpha, secondary.as_ref())
    }
}
