// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # critic-mi
//!
//! Variational bounds on the mutual information I(X;Y) between two random variables,
//! estimated from paired samples and a learned critic f(x, y). The critic scores every
//! x in a batch against every y; the N x N score matrix holds the joint pairs on its
//! diagonal and product-of-marginals pairs off it. Each bound reduces that matrix to a
//! scalar and returns the gradient of the scalar with respect to the scores, so the
//! same call reports an estimate and trains the critic.
//!
//! ## Quick Start
//!
//! ```rust
//! use critic_mi::estimators::{estimate_mutual_information, Estimator, GlobalValue};
//! use ndarray::{array, Array2};
//!
//! let x = array![[0.0], [1.0], [2.0], [3.0]];
//! let y = array![[0.1], [0.9], [2.2], [2.8]];
//! let critic = |x: &Array2<f64>, y: &Array2<f64>| x.dot(&y.t());
//!
//! let estimator: Estimator = "infonce".parse().unwrap();
//! let mi = estimate_mutual_information(&estimator, &x, &y, &critic, None).unwrap();
//! assert!(mi.global_value() <= (4.0_f64).ln());
//! ```
//!
//! ## Bounds
//!
//! | Tag | Bound | Value | Gradient |
//! |-----|-------|-------|----------|
//! | `tuba` | Tractable unnormalized Barber-Agakov | TUBA | TUBA |
//! | `nwj` | Nguyen-Wainwright-Jordan | NWJ | NWJ |
//! | `infonce` | InfoNCE with prior weight α | InfoNCE | InfoNCE |
//! | `js` | Calibrated Jensen-Shannon | NWJ | JS f-GAN |
//! | `smile` | SMILE with optional clipping | DV (clipped) | JS f-GAN |
//! | `dv` | Donsker-Varadhan | DV | DV |
//! | `mine` | MINE with moving average | DV | moving-average corrected DV |
//! | `ml_infonce` | Multi-label InfoNCE | ML-InfoNCE | ML-InfoNCE |
//!
//! ## Architecture
//!
//! 1. **Dispatcher**: [`estimators::estimate_mutual_information`] runs the critic and
//!    routes to a bound chosen by an [`estimators::Estimator`].
//! 2. **Bounds**: [`estimators::approaches::variational`], pure functions over a
//!    validated [`estimators::approaches::ScoreMatrix`].
//! 3. **Primitives**: stable log-mean-exp reductions in [`estimators::utils::logmeanexp`].
//!
//! The MINE moving average is caller-owned state: pass the previous
//! [`estimators::approaches::MineBuffer`] in, receive the updated one back.

pub mod estimators;
