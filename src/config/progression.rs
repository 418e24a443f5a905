//! Progression policy configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Tunable progression policy parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionConfig {
    /// How far back the contribution sync looks when a user has no prior
    /// contribution grants. Bounds the retroactive XP a freshly linked
    /// GitHub account can earn; the right value is a product decision, so
    /// it is configuration rather than a constant.
    #[serde(default = "default_contribution_lookback_days")]
    pub contribution_lookback_days: u32,
}

impl ProgressionConfig {
    /// Validate progression configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.contribution_lookback_days == 0 {
            return Err(ValidationError::InvalidLookbackWindow);
        }
        Ok(())
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            contribution_lookback_days: default_contribution_lookback_days(),
        }
    }
}

fn default_contribution_lookback_days() -> u32 {
    30
}
