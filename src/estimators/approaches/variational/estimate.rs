// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use ndarray::{Array1, Array2};

use crate::estimators::approaches::variational::objective::Objective;
use crate::estimators::error::{MiError, Result};
use crate::estimators::traits::{GlobalValue, MutualInformationEstimator, OptionalLocalValues};

/// Result of evaluating one variational bound on a score matrix.
///
/// Holds the scalar estimate, its gradient with respect to the score matrix and, where
/// the bound consumes them, gradients for the log-baseline vector and the secondary
/// score matrix. Row-decomposable bounds also keep their per-row local values.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundEstimate {
    bound: &'static str,
    objective: Objective,
    baseline_grad: Option<Array1<f64>>,
    secondary_grad: Option<Array2<f64>>,
    local: Option<Array1<f64>>,
}

impl BoundEstimate {
    pub(crate) fn new(bound: &'static str, objective: Objective) -> Self {
        Self {
            bound,
            objective,
            baseline_grad: None,
            secondary_grad: None,
            local: None,
        }
    }

    pub(crate) fn with_local(mut self, local: Array1<f64>) -> Self {
        self.local = Some(local);
        self
    }

    pub(crate) fn with_baseline_grad(mut self, grad: Array1<f64>) -> Self {
        self.baseline_grad = Some(grad);
        self
    }

    pub(crate) fn with_secondary_grad(mut self, grad: Array2<f64>) -> Self {
        self.secondary_grad = Some(grad);
        self
    }

    /// Tag of the bound that produced this estimate.
    pub fn bound(&self) -> &'static str {
        self.bound
    }

    pub fn value(&self) -> f64 {
        self.objective.value()
    }

    /// Gradient of the estimate with respect to the score matrix.
    pub fn score_grad(&self) -> &Array2<f64> {
        self.objective.grad()
    }

    /// Gradient with respect to the log-baseline vector (TUBA with a baseline only).
    pub fn baseline_grad(&self) -> Option<&Array1<f64>> {
        self.baseline_grad.as_ref()
    }

    /// Gradient with respect to the secondary score matrix (multi-label InfoNCE only).
    pub fn secondary_grad(&self) -> Option<&Array2<f64>> {
        self.secondary_grad.as_ref()
    }

    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    pub fn into_objective(self) -> Objective {
        self.objective
    }
}

impl GlobalValue for BoundEstimate {
    fn global_value(&self) -> f64 {
        self.value()
    }
}

impl OptionalLocalValues for BoundEstimate {
    fn supports_local(&self) -> bool {
        self.local.is_some()
    }

    fn local_values_opt(&self) -> Result<Array1<f64>> {
        self.local
            .clone()
            .ok_or(MiError::LocalValuesUnsupported { bound: self.bound })
    }
}

impl MutualInformationEstimator for BoundEstimate {}
