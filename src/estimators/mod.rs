// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

pub mod error;
pub mod traits;
pub mod selector;
pub mod mutual_information;
pub mod critics;
pub mod approaches;
pub mod utils;

pub use error::{MiError, Result};
pub use mutual_information::{estimate_mutual_information, MiEstimate, MutualInformation};
pub use selector::{Estimator, InfoNceOptions, MineOptions, MlInfoNceOptions, SmileOptions};
pub use traits::{
    Baseline, BaselineScores, Critic, GlobalValue, MutualInformationEstimator, OptionalLocalValues,
};
