//! Chat orchestration configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Upper bound accepted for `max_steps`.
pub const MAX_STEPS_LIMIT: u32 = 50;

/// Chat orchestration configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Maximum model steps per chat request
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,
}

impl ChatConfig {
    /// Validate chat configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_steps == 0 || self.max_steps > MAX_STEPS_LIMIT {
            return Err(ValidationError::InvalidMaxSteps {
                max: MAX_STEPS_LIMIT,
            });
        }
        Ok(())
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
        }
    }
}

fn default_max_steps() -> u32 {
    12
}
