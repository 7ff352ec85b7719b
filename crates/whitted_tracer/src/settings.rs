//! Render settings.

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Maximum recursion depth for reflection/refraction rays
    pub max_recursion_depth: u32,
    /// Trace every `row_stride`-th row; the rows in between repeat the last traced row
    pub row_stride: u32,
    /// Seed for the per-row sample jitter
    pub seed: u64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_recursion_depth: 3,
            row_stride: 1,
            seed: 0,
        }
    }
}

impl RenderSettings {
    /// Parse settings from JSON; missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: RenderSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.row_stride == 0 {
            return Err(RenderError::InvalidSettings(
                "row_stride must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
