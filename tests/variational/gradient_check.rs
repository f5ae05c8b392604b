// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytic score gradients against central finite differences of the bound values.

use critic_mi::estimators::approaches::{
    dv_upper_lower_bound, infonce_lower_bound, js_fgan_lower_bound, mine_lower_bound,
    multilabel_infonce_lower_bound, nwj_lower_bound, tuba_lower_bound, BoundEstimate, MineBuffer,
    ScoreMatrix,
};
use critic_mi::estimators::utils::logmeanexp::{logmeanexp_nodiag, Reduce};
use ndarray::{array, Array2};

use crate::test_helpers::{
    assert_abs_diff_eq, assert_matrix_close, finite_difference_grad, finite_difference_grad_vec,
    random_scores,
};

const H: f64 = 1e-5;
const TOL: f64 = 1e-7;

fn check<F>(name: &str, f: &Array2<f64>, bound: F)
where
    F: Fn(&ScoreMatrix) -> BoundEstimate,
{
    let analytic = bound(&ScoreMatrix::new(f.clone()).unwrap());
    let numeric = finite_difference_grad(
        |m| bound(&ScoreMatrix::new(m.clone()).unwrap()).value(),
        f,
        H,
    );
    assert_matrix_close(analytic.score_grad(), &numeric, TOL, name);
}

#[test]
fn tuba_and_nwj_gradients() {
    let f = random_scores(4, 0.0, 1.0, 700);
    check("tuba", &f, |s| tuba_lower_bound(s, None).unwrap());
    check("nwj", &f, nwj_lower_bound);
}

#[test]
fn tuba_baseline_gradients() {
    let f = random_scores(4, 0.0, 1.0, 701);
    let baseline = array![0.2, -0.4, 0.1, 0.7];
    check("tuba with baseline", &f, |s| {
        tuba_lower_bound(s, Some(&baseline)).unwrap()
    });

    let scores = ScoreMatrix::new(f).unwrap();
    let analytic = tuba_lower_bound(&scores, Some(&baseline)).unwrap();
    let numeric = finite_difference_grad_vec(
        |b| tuba_lower_bound(&scores, Some(b)).unwrap().value(),
        &baseline,
        H,
    );
    for (a, n) in analytic.baseline_grad().unwrap().iter().zip(numeric.iter()) {
        assert_abs_diff_eq!(*a, *n, epsilon = TOL);
    }
}

#[test]
fn infonce_gradients() {
    let f = random_scores(5, 0.0, 1.0, 702);
    check("infonce alpha 1", &f, |s| infonce_lower_bound(s, 1.0).unwrap());
    check("infonce alpha 2.5", &f, |s| infonce_lower_bound(s, 2.5).unwrap());
}

#[test]
fn js_fgan_and_dv_gradients() {
    let f = random_scores(4, 0.5, 1.5, 703);
    check("js_fgan", &f, js_fgan_lower_bound);
    check("dv", &f, dv_upper_lower_bound);
}

#[test]
fn ml_infonce_gradients() {
    let f = random_scores(4, 0.0, 1.0, 704);
    check("ml_infonce single", &f, |s| {
        multilabel_infonce_lower_bound(s, 1.5, None).unwrap()
    });

    let g = Array2::from_shape_fn((4, 6), |(i, k)| ((i * 6 + k) as f64 * 0.37).sin());
    check("ml_infonce paired f", &f, |s| {
        multilabel_infonce_lower_bound(s, 0.3, Some(&g)).unwrap()
    });

    let sf = ScoreMatrix::new(f).unwrap();
    let analytic = multilabel_infonce_lower_bound(&sf, 0.3, Some(&g)).unwrap();
    let numeric = finite_difference_grad(
        |m| multilabel_infonce_lower_bound(&sf, 0.3, Some(m)).unwrap().value(),
        &g,
        H,
    );
    assert_matrix_close(
        analytic.secondary_grad().unwrap(),
        &numeric,
        TOL,
        "ml_infonce paired g",
    );
}

#[test]
fn mine_gradient_holds_the_moving_average_fixed() {
    let f = random_scores(4, 0.0, 1.0, 706);
    let scores = ScoreMatrix::new(f.clone()).unwrap();
    let (est, state) = mine_lower_bound(&scores, Some(MineBuffer::new(2.0).unwrap()), 0.9).unwrap();
    let b = state.buffer.value();

    // Surrogate with the same gradient: mean(diag f) - exp(logmeanexp_nodiag(f)) / b'
    let numeric = finite_difference_grad(
        |m| {
            let lme = logmeanexp_nodiag(m.view(), Reduce::Both).unwrap().scalar().unwrap();
            m.diag().mean().unwrap() - lme.exp() / b
        },
        &f,
        H,
    );
    assert_matrix_close(est.score_grad(), &numeric, TOL, "mine");
}
