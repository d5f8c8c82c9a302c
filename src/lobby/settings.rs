//! Game parameters, changeable by the admin between games

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_INITIAL_LIVES: u32 = 3;
pub const DEFAULT_MIN_TIME: u32 = 10;
pub const DEFAULT_MAX_TIME: u32 = 25;

/// Lives and countdown window (seconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    pub initial_lives: u32,
    pub min_time: u32,
    pub max_time: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            initial_lives: DEFAULT_INITIAL_LIVES,
            min_time: DEFAULT_MIN_TIME,
            max_time: DEFAULT_MAX_TIME,
        }
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_lives: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_time: Option<u32>,
}

/// Why a settings update was not applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsRejection {
    #[error("only the admin can change settings")]
    NotAdmin,
    #[error("settings are locked while a game is running")]
    GameActive,
    #[error("initial lives must be at least 1")]
    NoLives,
    #[error("turn duration must be at least one second")]
    ZeroTime,
    #[error("minimum time {min}s exceeds maximum time {max}s")]
    InvertedWindow { min: u32, max: u32 },
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), SettingsRejection> {
        if self.initial_lives == 0 {
            return Err(SettingsRejection::NoLives);
        }
        if self.min_time == 0 {
            return Err(SettingsRejection::ZeroTime);
        }
        if self.min_time > self.max_time {
            return Err(SettingsRejection::InvertedWindow {
                min: self.min_time,
                max: self.max_time,
            });
        }
        Ok(())
    }

    /// Merge `patch` over these settings, validating the result
    pub fn merged(&self, patch: &SettingsPatch) -> Result<GameSettings, SettingsRejection> {
        let merged = GameSettings {
            initial_lives: patch.initial_lives.unwrap_or(self.initial_lives),
            min_time: patch.min_time.unwrap_or(self.min_time),
            max_time: patch.max_time.unwrap_or(self.max_time),
        };
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = GameSettings::default();
        assert_eq!(settings.initial_lives, 3);
        assert_eq!(settings.min_time, 10);
        assert_eq!(settings.max_time, 25);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let patch = SettingsPatch {
            initial_lives: Some(5),
            ..Default::default()
        };
        let merged = GameSettings::default().merged(&patch).unwrap();
        assert_eq!(merged.initial_lives, 5);
        assert_eq!(merged.min_time, 10);
        assert_eq!(merged.max_time, 25);
    }

    #[test]
    fn test_merge_rejects_inverted_window() {
        let patch = SettingsPatch {
            min_time: Some(30),
            ..Default::default()
        };
        assert_eq!(
            GameSettings::default().merged(&patch),
            Err(SettingsRejection::InvertedWindow { min: 30, max: 25 })
        );
    }

    #[test]
    fn test_merge_rejects_zero_values() {
        let zero_lives = SettingsPatch {
            initial_lives: Some(0),
            ..Default::default()
        };
        assert_eq!(
            GameSettings::default().merged(&zero_lives),
            Err(SettingsRejection::NoLives)
        );
        let zero_time = SettingsPatch {
            min_time: Some(0),
            ..Default::default()
        };
        assert_eq!(
            GameSettings::default().merged(&zero_time),
            Err(SettingsRejection::ZeroTime)
        );
    }

    #[test]
    fn test_equal_bounds_allowed() {
        let patch = SettingsPatch {
            min_time: Some(10),
            max_time: Some(10),
            ..Default::default()
        };
        assert!(GameSettings::default().merged(&patch).is_ok());
    }

    #[test]
    fn test_patch_parses_partial_json() {
        let patch: SettingsPatch = serde_json::from_str(r#"{"max_time":40}"#).unwrap();
        assert_eq!(patch.max_time, Some(40));
        assert_eq!(patch.min_time, None);
    }
}
