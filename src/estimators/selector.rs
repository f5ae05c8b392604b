// SPDX-FileCopyrightText: 2025-2026 Carlson Büth <code@cbueth.de>
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Estimator selection and its configuration.
//!
//! An [`Estimator`] names one bound together with that bound's options. It is
//! deserialisable, so a training configuration can select the bound:
//!
//! ```toml
//! estimator = "smile"
//! clip = 5.0
//! ```
//!
//! Runtime state (the MINE moving average, the second Y batch of multi-label
//! InfoNCE) is never read from configuration.

use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::estimators::approaches::variational::infonce::DEFAULT_ALPHA;
use crate::estimators::approaches::variational::mine::{MineBuffer, DEFAULT_MOMENTUM};
use crate::estimators::error::{MiError, Result};

/// Options for the InfoNCE bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InfoNceOptions {
    /// Self-pair prior weight, in (0, N].
    #[serde(default = "default_alpha")]
    pub alpha: f64,
}

impl Default for InfoNceOptions {
    fn default() -> Self {
        Self { alpha: DEFAULT_ALPHA }
    }
}

/// Options for the SMILE estimator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SmileOptions {
    /// Clip threshold τ for the partition term; `None` disables clipping.
    #[serde(default)]
    pub clip: Option<f64>,
}

/// Options and carried state for the MINE bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MineOptions {
    #[serde(default = "default_momentum")]
    pub momentum: f64,
    /// Moving average from the previous step; 1.0 when absent.
    #[serde(skip)]
    pub buffer: Option<MineBuffer>,
}

impl Default for MineOptions {
    fn default() -> Self {
        Self {
            momentum: DEFAULT_MOMENTUM,
            buffer: None,
        }
    }
}

/// Options for multi-label InfoNCE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MlInfoNceOptions {
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Second batch of Y; the critic scores X against it to form the secondary matrix.
    #[serde(skip)]
    pub y_prime: Option<Array2<f64>>,
}

impl Default for MlInfoNceOptions {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            y_prime: None,
        }
    }
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}
fn default_momentum() -> f64 {
    DEFAULT_MOMENTUM
}

/// The bound to evaluate, with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "estimator", rename_all = "snake_case")]
pub enum Estimator {
    Tuba,
    Nwj,
    #[serde(rename = "infonce")]
    InfoNce(InfoNceOptions),
    Js,
    Smile(SmileOptions),
    Dv,
    Mine(MineOptions),
    #[serde(rename = "ml_infonce")]
    MlInfoNce(MlInfoNceOptions),
}

impl Estimator {
    /// Every valid estimator tag.
    pub const TAGS: &'static [&'static str] =
        &["tuba", "nwj", "infonce", "js", "smile", "dv", "mine", "ml_infonce"];

    pub fn tag(&self) -> &'static str {
        match self {
            Estimator::Tuba => "tuba",
            Estimator::Nwj => "nwj",
            Estimator::InfoNce(_) => "infonce",
            Estimator::Js => "js",
            Estimator::Smile(_) => "smile",
            Estimator::Dv => "dv",
            Estimator::Mine(_) => "mine",
            Estimator::MlInfoNce(_) => "ml_infonce",
        }
    }

    /// Bounds without options.
    fn is_unit(&self) -> bool {
        matches!(self, Estimator::Tuba | Estimator::Nwj | Estimator::Js | Estimator::Dv)
    }

    /// Load an estimator from a TOML document with an `estimator = "<tag>"` key.
    ///
    /// # Errors
    ///
    /// `InvalidEstimator` for an unknown tag, `Config` for unknown keys and any other
    /// parse failure.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        match toml::from_str::<Estimator>(contents) {
            Ok(estimator) => {
                if estimator.is_unit() {
                    // Unit variants skip field checks during deserialisation.
                    let table = toml::from_str::<toml::Table>(contents)
                        .map_err(|err| MiError::Config(err.to_string()))?;
                    if let Some(key) = table.keys().find(|k| k.as_str() != "estimator") {
                        return Err(MiError::Config(format!(
                            "unknown field `{key}` for estimator `{}`",
                            estimator.tag()
                        )));
                    }
                }
                tracing::debug!(estimator = estimator.tag(), "Loaded estimator config");
                Ok(estimator)
            }
            Err(err) => {
                // Report unknown tags with the same error as name-based selection.
                if let Ok(table) = toml::from_str::<toml::Table>(contents) {
                    if let Some(tag) = table.get("estimator").and_then(|v| v.as_str()) {
                        if !Self::TAGS.contains(&tag) {
                            return Err(MiError::InvalidEstimator {
                                name: tag.to_string(),
                                valid: Self::TAGS,
                            });
                        }
                    }
                }
                Err(MiError::Config(err.to_string()))
            }
        }
    }
}

impl FromStr for Estimator {
    type Err = MiError;

    /// Select an estimator by tag with default options.
    fn from_str(name: &str) -> Result<Self> {
        match name {
            "tuba" => Ok(Estimator::Tuba),
            "nwj" => Ok(Estimator::Nwj),
            "infonce" => Ok(Estimator::InfoNce(InfoNceOptions::default())),
            "js" => Ok(Estimator::Js),
            "smile" => Ok(Estimator::Smile(SmileOptions::default())),
            "dv" => Ok(Estimator::Dv),
            "mine" => Ok(Estimator::Mine(MineOptions::default())),
            "ml_infonce" => Ok(Estimator::MlInfoNce(MlInfoNceOptions::default())),
            _ => Err(MiError::InvalidEstimator {
                name: name.to_string(),
                valid: Self::TAGS,
            }),
        }
    }
}

impl fmt::Display for Estimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
