//! User configuration
//!
//! [`GameSettings`] is the single configuration resource. It is serialized to
//! `settings.json` by [`super::settings_persistence`] and can be overridden from
//! the command line for a single run.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Default port a host listens on
pub const DEFAULT_PORT: u16 = 9470;

/// Resource tracking every user-tunable setting
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[reflect(Resource)]
#[serde(default)]
pub struct GameSettings {
    /// Remote completion API used by the AI opponent
    pub ai: AiSettings,

    /// Peer connection settings
    pub network: NetworkSettings,

    /// Whether to tint the legal destinations of the selected piece
    pub show_hints: bool,

    /// Whether to tint the from/to squares of the last move
    pub highlight_last_move: bool,

    /// In hot-seat games, swing the camera to the side to move after every move
    pub rotate_camera_on_turn: bool,

    /// Filter string handed to Bevy's `LogPlugin` (same syntax as `RUST_LOG`)
    pub log_filter: String,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            ai: AiSettings::default(),
            network: NetworkSettings::default(),
            show_hints: true,
            highlight_last_move: true,
            rotate_camera_on_turn: true,
            log_filter: "info,wgpu=error,naga=warn".to_string(),
        }
    }
}

/// Hosted text-completion API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct AiSettings {
    /// Base URL of the model collection; the model name and
    /// `:generateContent` are appended to it
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Name of the environment variable holding the API key.
    /// The key itself is never written to disk.
    pub api_key_env: String,

    /// Request timeout
    pub timeout_secs: u64,

    /// Sampling temperature sent with every request
    pub temperature: f32,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta/models".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            timeout_secs: 20,
            temperature: 0.4,
        }
    }
}

impl AiSettings {
    /// Read the API key from the configured environment variable.
    ///
    /// Empty values count as missing.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }
}

/// Peer connection configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct NetworkSettings {
    /// Port used by `--host` when none is given
    pub default_port: u16,

    /// Delay between reconnect attempts after the peer connection drops
    pub reconnect_delay_ms: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            default_port: DEFAULT_PORT,
            reconnect_delay_ms: 2000,
        }
    }
}

impl NetworkSettings {
    pub fn reconnect_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_file_fills_defaults() {
        //! Older settings files missing newer fields must still load
        let json = r#"{ "show_hints": false, "ai": { "model": "gemini-pro" } }"#;
        let settings: GameSettings = serde_json::from_str(json).unwrap();

        assert!(!settings.show_hints);
        assert_eq!(settings.ai.model, "gemini-pro");
        assert_eq!(settings.ai.api_key_env, "GEMINI_API_KEY");
        assert_eq!(settings.network.default_port, DEFAULT_PORT);
        assert!(settings.highlight_last_move);
    }

    #[test]
    fn test_settings_json_roundtrip_preserves_values() {
        let mut settings = GameSettings::default();
        settings.network.reconnect_delay_ms = 500;
        settings.rotate_camera_on_turn = false;

        let json = serde_json::to_string_pretty(&settings).unwrap();
        let restored: GameSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(settings, restored);
    }

    #[test]
    fn test_missing_api_key_env_is_none() {
        let settings = AiSettings {
            api_key_env: "CHESS3D_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..AiSettings::default()
        };
        assert!(settings.api_key().is_none());
    }

    #[test]
    fn test_reconnect_delay_conversion() {
        let network = NetworkSettings {
            reconnect_delay_ms: 1500,
            ..NetworkSettings::default()
        };
        assert_eq!(network.reconnect_delay().as_millis(), 1500);
    }
}
