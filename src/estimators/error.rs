// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// Errors raised by the variational bound estimators and the dispatcher.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MiError {
    #[error("Invalid estimator {name:?}, expected one of {valid:?}")]
    InvalidEstimator {
        name: String,
        valid: &'static [&'static str],
    },

    #[error("Shape mismatch for {what}: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        what: &'static str,
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    /// Off-diagonal reductions need at least two samples.
    #[error("Degenerate batch: batch size {n} is below the required {required}")]
    DegenerateBatch { n: usize, required: usize },

    #[error("Invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Local values are not supported by the {bound} bound")]
    LocalValuesUnsupported { bound: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for mutual information estimation.
pub type Result<T> = std::result::Result<T, MiError>;
