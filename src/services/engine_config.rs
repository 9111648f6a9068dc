// src/services/engine_config.rs
//
// Tunables for the library view engine.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AppError, AppResult};
use crate::services::transition_policy::DEFAULT_MAX_ANIMATED_GROWTH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quiet period after the last collection change
    pub data_quiescence_ms: u64,

    /// Quiet period after the last search keystroke
    pub search_quiescence_ms: u64,

    /// Largest growth that is still presented as an animated insertion
    pub max_animated_growth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            data_quiescence_ms: 100,
            search_quiescence_ms: 300,
            max_animated_growth: DEFAULT_MAX_ANIMATED_GROWTH,
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing keys fall back to defaults
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.data_quiescence_ms == 0 || self.search_quiescence_ms == 0 {
            return Err(AppError::Validation(
                "Quiescence windows must be at least 1ms".to_string(),
            ));
        }
        Ok(())
    }

    pub fn data_window(&self) -> Duration {
        Duration::from_millis(self.data_quiescence_ms)
    }

    pub fn search_window(&self) -> Duration {
        Duration::from_millis(self.search_quiescence_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.data_window(), Duration::from_millis(100));
        assert_eq!(config.search_window(), Duration::from_millis(300));
        assert_eq!(config.max_animated_growth, 5);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json_str(r#"{ "search_quiescence_ms": 250 }"#).unwrap();
        assert_eq!(config.search_quiescence_ms, 250);
        assert_eq!(config.data_quiescence_ms, 100);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{ "data_quiescence_ms": 0 }"#);
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let result = EngineConfig::from_json_str("{ nope");
        assert!(matches!(result, Err(AppError::Serialization(_))));
    }
}
