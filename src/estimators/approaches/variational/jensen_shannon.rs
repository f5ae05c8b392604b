// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array2;

use crate::estimators::approaches::variational::estimate::BoundEstimate;
use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::approaches::variational::scores::ScoreMatrix;
use crate::estimators::approaches::variational::tuba::nwj_objective;
use crate::estimators::utils::logmeanexp::{sigmoid, softplus};

/// Lower bound on the Jensen-Shannon divergence (f-GAN, Nowozin et al. 2016).
///
/// -mean_i softplus(-f_ii) - Σ_{i≠j} softplus(f_ij) / (N(N-1))
///
/// Not an MI bound by itself; it trains the critic towards the log density ratio.
pub fn js_fgan_lower_bound(scores: &ScoreMatrix) -> BoundEstimate {
    BoundEstimate::new("js_fgan", js_fgan_objective(scores))
}

/// Calibrated JS bound: the value of NWJ with the gradient of the JS f-GAN bound.
///
/// Computed as `js_fgan + detach(nwj - js_fgan)`. The critic is trained through the
/// low-variance JS objective while the reported number is the NWJ estimate of I(X;Y).
pub fn js_lower_bound(scores: &ScoreMatrix) -> BoundEstimate {
    let (nwj, nwj_local) = nwj_objective(scores);
    let js = js_fgan_objective(scores);
    let combined = js.clone() + (nwj - js).detach();
    BoundEstimate::new("js", combined).with_local(nwj_local)
}

pub(crate) fn js_fgan_objective(scores: &ScoreMatrix) -> Objective {
    let n = scores.n();
    let n_f = n as f64;
    let n_pairs = n_f * (n_f - 1.0);
    let f = scores.view();

    let mut first_term = 0.0;
    let mut second_sum = 0.0;
    let mut grad = Array2::<f64>::zeros((n, n));
    for ((i, j), &v) in f.indexed_iter() {
        if i == j {
            first_term -= softplus(-v);
            // d/dx [-softplus(-x)] = sigmoid(-x)
            grad[[i, j]] = sigmoid(-v) / n_f;
        } else {
            second_sum += softplus(v);
            grad[[i, j]] = -sigmoid(v) / n_pairs;
        }
    }
    let value = first_term / n_f - second_sum / n_pairs;
    Objective::new(value, grad)
}
