// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use critic_mi::estimators::approaches::{infonce_lower_bound, ScoreMatrix};
use critic_mi::estimators::{GlobalValue, MiError, OptionalLocalValues};
use ndarray::Array2;

use crate::test_helpers::{random_scores, scaled_identity};

#[test]
fn constant_scores_give_zero() {
    let scores = ScoreMatrix::new(Array2::from_elem((6, 6), 3.7)).unwrap();
    let est = infonce_lower_bound(&scores, 1.0).unwrap();
    assert_abs_diff_eq!(est.value(), 0.0, epsilon = 1e-12);
}

#[test]
fn separated_diagonal_approaches_log_n() {
    let n = 8;
    let log_n = (n as f64).ln();
    let mut previous = f64::NEG_INFINITY;
    for c in [1.0_f64, 5.0, 20.0, 50.0] {
        let est = infonce_lower_bound(&ScoreMatrix::new(scaled_identity(n, c)).unwrap(), 1.0)
            .unwrap();
        // log N - log(1 + (N-1) e^{-c})
        let expected = log_n - (1.0 + (n as f64 - 1.0) * (-c).exp()).ln();
        assert_abs_diff_eq!(est.value(), expected, epsilon = 1e-12);
        assert!(est.value() > previous);
        assert!(est.value() <= log_n);
        previous = est.value();
    }
    assert_abs_diff_eq!(previous, log_n, epsilon = 1e-12);
}

#[test]
fn never_exceeds_log_n() {
    for seed in 0..10 {
        let n = 3 + seed as usize;
        let f = random_scores(n, 0.0, 10.0, seed);
        let est = infonce_lower_bound(&ScoreMatrix::new(f).unwrap(), 1.0).unwrap();
        assert!(est.value() <= (n as f64).ln() + 1e-12, "seed {seed}");
    }
}

#[test]
fn alpha_equal_to_n_keeps_only_the_diagonal() {
    let f = random_scores(5, 0.0, 2.0, 9);
    let est = infonce_lower_bound(&ScoreMatrix::new(f).unwrap(), 5.0).unwrap();
    assert_abs_diff_eq!(est.value(), 0.0, epsilon = 1e-12);
    // Off-diagonal candidates carry zero prior mass, so they receive no gradient.
    for ((i, j), g) in est.score_grad().indexed_iter() {
        if i != j {
            assert_eq!(*g, 0.0);
        }
    }
}

#[test]
fn alpha_out_of_range_is_rejected() {
    let scores = ScoreMatrix::new(random_scores(4, 0.0, 1.0, 1)).unwrap();
    for alpha in [0.0, -1.0, 4.5, f64::NAN] {
        let err = infonce_lower_bound(&scores, alpha).unwrap_err();
        assert!(
            matches!(err, MiError::InvalidParameter { name: "alpha", .. }),
            "alpha {alpha}"
        );
    }
}

#[test]
fn gradient_rows_sum_to_zero() {
    // Each row gives 1/N to its diagonal and takes 1/N of softmax mass away.
    let f = random_scores(6, 0.0, 1.0, 17);
    let est = infonce_lower_bound(&ScoreMatrix::new(f).unwrap(), 1.0).unwrap();
    for row in est.score_grad().rows() {
        assert_abs_diff_eq!(row.sum(), 0.0, epsilon = 1e-14);
    }
}

#[test]
fn local_values_average_to_the_bound() {
    let f = random_scores(6, 1.0, 1.0, 23);
    let est = infonce_lower_bound(&ScoreMatrix::new(f).unwrap(), 2.0).unwrap();
    assert!(est.supports_local());
    let local = est.local_values_opt().unwrap();
    assert_abs_diff_eq!(local.mean().unwrap(), est.global_value(), epsilon = 1e-12);
}
