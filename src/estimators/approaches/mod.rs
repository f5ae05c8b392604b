pub mod variational;

// Unified re-exports so tests and users can import
// critic_mi::estimators::approaches::* ergonomically.
pub use variational::{
    dv_upper_lower_bound, infonce_lower_bound, js_fgan_lower_bound, js_lower_bound,
    mine_lower_bound, multilabel_infonce_lower_bound, nwj_lower_bound, smile_lower_bound,
    tuba_lower_bound, BoundEstimate, MineBuffer, MineState, Objective, ScoreMatrix,
};
