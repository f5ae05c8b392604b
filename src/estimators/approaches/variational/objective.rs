// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::Array2;
use std::ops::{Add, Mul, Sub};

/// A scalar objective together with its gradient with respect to the score matrix.
///
/// Bounds are training objectives for the critic, so every bound carries the exact
/// derivative of its differentiable path. Objectives compose with `+`, `-` and scalar
/// `*`, which apply the sum and product rules to value and gradient alike.
///
/// [`Objective::detach`] is the stop-gradient primitive: it keeps the value and drops
/// the gradient. The value/gradient split used by the calibrated JS and SMILE bounds
/// reads as `b.clone() + (a - b).detach()`: the value of `a`, the gradient of `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    value: f64,
    grad: Array2<f64>,
}

impl Objective {
    pub fn new(value: f64, grad: Array2<f64>) -> Self {
        Self { value, grad }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn grad(&self) -> &Array2<f64> {
        &self.grad
    }

    pub fn into_parts(self) -> (f64, Array2<f64>) {
        (self.value, self.grad)
    }

    /// Same value, excluded from differentiation.
    pub fn detach(mut self) -> Self {
        self.grad.fill(0.0);
        self
    }
}

impl Add for Objective {
    type Output = Objective;

    fn add(self, rhs: Objective) -> Objective {
        Objective {
            value: self.value + rhs.value,
            grad: self.grad + &rhs.grad,
        }
    }
}

impl Sub for Objective {
    type Output = Objective;

    fn sub(self, rhs: Objective) -> Objective {
        Objective {
            value: self.value - rhs.value,
            grad: self.grad - &rhs.grad,
        }
    }
}

impl Mul<f64> for Objective {
    type Output = Objective;

    fn mul(self, rhs: f64) -> Objective {
        Objective {
            value: self.value * rhs,
            grad: self.grad * rhs,
        }
    }
}
