//! Configuration for Plotweave chart viewers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed viewer config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// What happens to retained ids that are missing from a submitted definition set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemovalPolicy {
    /// Ids absent from the submission are removed and their renderers released.
    #[default]
    RemoveAbsent,
    /// Ids absent from the submission keep their renderers untouched.
    RetainAbsent,
}

/// Viewer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    pub removal_policy: RemovalPolicy,
    /// Consecutive screen points closer than this in both axes are merged (pixels).
    pub coalesce_tolerance: f32,
    /// Radius of the dot drawn for an isolated sample (pixels).
    pub dot_radius: f32,
    /// Hit radius used when resolving tooltips (pixels).
    pub tooltip_radius: f32,
    /// Alpha applied to confidence band fills.
    pub area_alpha: f32,
    /// Target number of major ticks per axis.
    pub tick_count: usize,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            removal_policy: RemovalPolicy::RemoveAbsent,
            coalesce_tolerance: 1.0,
            dot_radius: 2.5,
            tooltip_radius: 8.0,
            area_alpha: 0.5,
            tick_count: 5,
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the renderers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.area_alpha) {
            return Err(ConfigError::InvalidValue {
                field: "areaAlpha",
                reason: format!("{} is outside 0..=1", self.area_alpha),
            });
        }
        if !self.coalesce_tolerance.is_finite() || self.coalesce_tolerance < 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "coalesceTolerance",
                reason: format!("{} must be a finite, non-negative pixel distance", self.coalesce_tolerance),
            });
        }
        if self.tick_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "tickCount",
                reason: "at least one tick is required".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }
}
