// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use critic_mi::estimators::approaches::{js_lower_bound, Objective, ScoreMatrix};
use ndarray::array;

use crate::test_helpers::random_scores;

#[test]
fn detach_keeps_value_and_drops_gradient() {
    let obj = Objective::new(1.5, array![[1.0, 2.0], [3.0, 4.0]]);
    let (value, grad) = obj.detach().into_parts();
    assert_eq!(value, 1.5);
    assert!(grad.iter().all(|g| *g == 0.0));
}

#[test]
fn surgery_takes_value_from_one_side_and_gradient_from_the_other() {
    let a = Objective::new(2.0, array![[1.0, 0.0], [0.0, 1.0]]);
    let b = Objective::new(-1.0, array![[0.5, 0.5], [0.5, 0.5]]);
    let mixed = b.clone() + (a - b.clone()).detach();
    assert_eq!(mixed.value(), 2.0);
    assert_eq!(mixed.grad(), b.grad());
}

#[test]
fn scaling_applies_to_value_and_gradient() {
    let obj = Objective::new(3.0, array![[1.0, -2.0], [0.5, 0.0]]) * 2.0;
    assert_eq!(obj.value(), 6.0);
    assert_eq!(obj.grad(), &array![[2.0, -4.0], [1.0, 0.0]]);
}

#[test]
fn bound_estimates_expose_their_objective() {
    let est = js_lower_bound(&ScoreMatrix::new(random_scores(3, 0.0, 1.0, 5)).unwrap());
    let value = est.value();
    let grad = est.score_grad().clone();
    let obj = est.into_objective();
    assert_eq!(obj.value(), value);
    assert_eq!(obj.grad(), &grad);
}
