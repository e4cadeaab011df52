//! Ambient conditions shared by the whole grid

use serde::{Deserialize, Serialize};

/// Global ambient conditions
///
/// Carried alongside the grid and passed explicitly to the simulation. Neither
/// physics phase reads it: spread has no wind bias and no ambient coupling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Ambient temperature (K)
    pub temperature: f32,
    /// Wind speed (m/s)
    pub wind_speed: f32,
}

impl Environment {
    /// Create conditions with explicit values
    pub const fn new(temperature: f32, wind_speed: f32) -> Self {
        Self {
            temperature,
            wind_speed,
        }
    }
}

impl Default for Environment {
    /// 298 K, calm
    fn default() -> Self {
        Self::new(298.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_calm_room_temperature() {
        let env = Environment::default();
        assert_eq!(env.temperature, 298.0);
        assert_eq!(env.wind_speed, 0.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let env: Environment = serde_json::from_str(r#"{"wind_speed": 4.5}"#).unwrap();
        assert_eq!(env.temperature, 298.0);
        assert_eq!(env.wind_speed, 4.5);
    }
}
