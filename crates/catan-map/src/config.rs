//! Map configuration.

use crate::layout::DEFAULT_MARGIN;
use serde::{Deserialize, Serialize};

/// Hex radius a freshly created map is scaled to
pub const DEFAULT_HEX_RADIUS: i32 = 50;

/// User-facing map settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub hex_radius: i32,
    /// Pixels left blank around the board
    pub margin: i32,
    /// Infer the build tool from what is under the pointer
    pub single_click_build: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            hex_radius: DEFAULT_HEX_RADIUS,
            margin: DEFAULT_MARGIN,
            single_click_build: false,
        }
    }
}

impl MapConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_fields_take_defaults() {
        let config = MapConfig::from_json(r#"{"single_click_build": true}"#).unwrap();
        assert_eq!(
            config,
            MapConfig {
                single_click_build: true,
                ..MapConfig::default()
            }
        );
        assert_eq!(MapConfig::from_json("{}").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_rejects_wrong_types() {
        assert!(MapConfig::from_json(r#"{"hex_radius": "big"}"#).is_err());
    }
}
