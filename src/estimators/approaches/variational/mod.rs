// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

// Variational bounds on mutual information from a critic score matrix.
// Every bound returns its value together with the gradient of its training path.

pub mod objective;
pub mod scores;
pub mod estimate;

pub mod donsker_varadhan;
pub mod infonce;
pub mod jensen_shannon;
pub mod mine;
pub mod tuba;

pub use donsker_varadhan::{dv_upper_lower_bound, smile_lower_bound};
pub use estimate::BoundEstimate;
pub use infonce::{infonce_lower_bound, multilabel_infonce_lower_bound};
pub use jensen_shannon::{js_fgan_lower_bound, js_lower_bound};
pub use mine::{mine_lower_bound, MineBuffer, MineState};
pub use objective::Objective;
pub use scores::ScoreMatrix;
pub use tuba::{nwj_lower_bound, tuba_lower_bound};
