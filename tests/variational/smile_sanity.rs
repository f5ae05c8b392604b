// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use approx::assert_abs_diff_eq;
use critic_mi::estimators::approaches::{
    dv_upper_lower_bound, js_fgan_lower_bound, smile_lower_bound, ScoreMatrix,
};
use critic_mi::estimators::MiError;

use crate::test_helpers::{assert_matrix_close, random_scores, scaled_identity};

#[test]
fn without_clip_value_is_dv() {
    for seed in 0..5 {
        let scores = ScoreMatrix::new(random_scores(6, 0.0, 2.0, 400 + seed)).unwrap();
        let smile = smile_lower_bound(&scores, None).unwrap();
        let dv = dv_upper_lower_bound(&scores);
        assert_abs_diff_eq!(smile.value(), dv.value(), epsilon = 1e-12);
        assert_eq!(smile.bound(), "smile");
    }
}

#[test]
fn trains_through_fgan_gradient() {
    let scores = ScoreMatrix::new(random_scores(5, 0.0, 3.0, 401)).unwrap();
    let fgan = js_fgan_lower_bound(&scores);
    for clip in [None, Some(1.0), Some(5.0)] {
        let smile = smile_lower_bound(&scores, clip).unwrap();
        assert_matrix_close(smile.score_grad(), fgan.score_grad(), 0.0, "smile gradient");
    }
}

#[test]
fn loose_clip_matches_dv() {
    let scores = ScoreMatrix::new(random_scores(5, 0.0, 1.0, 402)).unwrap();
    let max_abs = scores.view().iter().fold(0.0f64, |m, v| m.max(v.abs()));
    let smile = smile_lower_bound(&scores, Some(max_abs + 1.0)).unwrap();
    let dv = dv_upper_lower_bound(&scores);
    assert_abs_diff_eq!(smile.value(), dv.value(), epsilon = 1e-12);
}

#[test]
fn clipped_off_diagonal_entries_do_not_move_the_value() {
    let mut f = random_scores(4, 0.0, 0.5, 403);
    f[[0, 1]] = 10.0;
    let a = smile_lower_bound(&ScoreMatrix::new(f.clone()).unwrap(), Some(5.0)).unwrap();
    f[[0, 1]] = 20.0;
    let b = smile_lower_bound(&ScoreMatrix::new(f).unwrap(), Some(5.0)).unwrap();
    assert_abs_diff_eq!(a.value(), b.value(), epsilon = 1e-10);
}

#[test]
fn joint_term_uses_unclipped_scores() {
    // Diagonal 10 with clip 5: the joint term stays at 10, off-diagonal zeros give logmeanexp 0.
    let est = smile_lower_bound(&ScoreMatrix::new(scaled_identity(4, 10.0)).unwrap(), Some(5.0))
        .unwrap();
    assert_abs_diff_eq!(est.value(), 10.0, epsilon = 1e-10);
}

#[test]
fn clip_caps_the_partition_term() {
    let mut f = scaled_identity(4, 0.0);
    f[[2, 3]] = 50.0;
    let scores = ScoreMatrix::new(f).unwrap();
    let clipped = smile_lower_bound(&scores, Some(1.0)).unwrap();
    // logmeanexp over 11 zeros and one entry clipped to 1
    let expected = -((11.0 + 1f64.exp()) / 12.0).ln();
    assert_abs_diff_eq!(clipped.value(), expected, epsilon = 1e-10);
    assert!(clipped.value() > dv_upper_lower_bound(&scores).value());
}

#[test]
fn non_positive_clip_is_rejected() {
    let scores = ScoreMatrix::new(scaled_identity(3, 1.0)).unwrap();
    for clip in [0.0, -1.0, f64::NAN] {
        assert!(matches!(
            smile_lower_bound(&scores, Some(clip)),
            Err(MiError::InvalidParameter { name: "clip", .. })
        ));
    }
}
