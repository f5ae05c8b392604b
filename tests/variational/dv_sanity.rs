// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use critic_mi::estimators::approaches::{dv_upper_lower_bound, nwj_lower_bound, ScoreMatrix};
use critic_mi::estimators::{MiError, OptionalLocalValues};

use crate::test_helpers::{random_scores, scaled_identity};

#[test]
fn scaled_identity_gives_the_diagonal_value() {
    // mean(diag) = 5, off-diagonal entries are 0 so logmeanexp_nodiag = 0.
    let est = dv_upper_lower_bound(&ScoreMatrix::new(scaled_identity(4, 5.0)).unwrap());
    assert_abs_diff_eq!(est.value(), 5.0, epsilon = 1e-12);
    assert_eq!(est.bound(), "dv");
}

#[test]
fn diagonal_only_enters_the_joint_term() {
    let f = random_scores(5, 0.0, 1.0, 31);
    let mut shifted = f.clone();
    shifted.diag_mut().mapv_inplace(|v| v + 2.0);
    let a = dv_upper_lower_bound(&ScoreMatrix::new(f).unwrap());
    let b = dv_upper_lower_bound(&ScoreMatrix::new(shifted).unwrap());
    assert_abs_diff_eq!(b.value() - a.value(), 2.0, epsilon = 1e-12);
}

#[test]
fn dv_dominates_nwj() {
    // log z <= z / e for z > 0, so DV >= NWJ for every score matrix.
    for seed in 0..10 {
        let scores = ScoreMatrix::new(random_scores(6, 0.0, 2.0, 300 + seed)).unwrap();
        let dv = dv_upper_lower_bound(&scores);
        let nwj = nwj_lower_bound(&scores);
        assert!(dv.value() >= nwj.value() - 1e-12, "seed {seed}");
    }
}

#[test]
fn gradient_off_diagonal_is_a_negative_softmax() {
    let est = dv_upper_lower_bound(&ScoreMatrix::new(random_scores(5, 0.0, 1.0, 8)).unwrap());
    let grad = est.score_grad();
    let off_sum: f64 = grad
        .indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, g)| *g)
        .sum();
    assert_abs_diff_eq!(off_sum, -1.0, epsilon = 1e-12);
    assert_abs_diff_eq!(grad.diag().sum(), 1.0, epsilon = 1e-12);
}

#[test]
fn dv_has_no_local_values() {
    let est = dv_upper_lower_bound(&ScoreMatrix::new(scaled_identity(3, 1.0)).unwrap());
    assert!(!est.supports_local());
    assert_eq!(
        est.local_values_opt().unwrap_err(),
        MiError::LocalValuesUnsupported { bound: "dv" }
    );
}
