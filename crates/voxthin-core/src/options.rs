//! Configuration options for thinning runs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThinningError};

/// Which isthmuses the critical-kernel scheme protects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IsthmusMode {
    /// 1-isthmuses and 2-isthmuses: keeps curves and sheets (surface skeleton).
    Full,
    /// 1-isthmuses only: keeps curves (curve skeleton).
    #[default]
    OneIsthmus,
}

/// Parameters of a thinning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThinningOptions {
    /// Rounds an isthmus stays protected after it was last seen.
    ///
    /// `0` selects the basic scheme: plain simple point peeling with no
    /// isthmus protection.
    pub persistence: u32,

    /// Isthmus table used when `persistence > 0`.
    pub isthmus_mode: IsthmusMode,

    /// Stop after this many rounds even without reaching a fixed point.
    pub max_rounds: Option<u32>,
}

impl Default for ThinningOptions {
    fn default() -> Self {
        Self {
            persistence: 0,
            isthmus_mode: IsthmusMode::OneIsthmus,
            max_rounds: None,
        }
    }
}

impl ThinningOptions {
    /// Options for the basic scheme.
    #[must_use]
    pub fn basic() -> Self {
        Self::default()
    }

    /// Options for the critical-kernel scheme.
    #[must_use]
    pub fn critical_kernel(isthmus_mode: IsthmusMode, persistence: u32) -> Self {
        Self {
            persistence,
            isthmus_mode,
            max_rounds: None,
        }
    }

    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    /// Whether these options select the basic scheme.
    #[must_use]
    pub fn is_basic(&self) -> bool {
        self.persistence == 0
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == Some(0) {
            return Err(ThinningError::InvalidOptions(
                "max_rounds must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Parses and validates options from JSON. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Intensity window selecting foreground voxels: `min < value <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Threshold {
    /// Exclusive lower bound.
    pub min: f64,
    /// Inclusive upper bound.
    pub max: f64,
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 255.0,
        }
    }
}

impl Threshold {
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn accepts(&self, value: f64) -> bool {
        self.min < value && value <= self.max
    }
}
