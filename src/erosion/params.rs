//! Erosion simulation parameters and configuration

use serde::{Deserialize, Serialize};

use crate::error::{Result, TerrainError};

/// Erosion intensity preset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErosionPreset {
    /// No droplets - raw noise terrain
    None,
    /// A light sprinkle
    Minimal,
    /// Balanced erosion
    #[default]
    Normal,
    /// Many heavy droplets - deep gullies
    Dramatic,
}

impl ErosionPreset {
    pub fn all() -> &'static [Self] {
        &[Self::None, Self::Minimal, Self::Normal, Self::Dramatic]
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::None => "No erosion (raw terrain)",
            Self::Minimal => "Light rainfall",
            Self::Normal => "Balanced erosion",
            Self::Dramatic => "Heavy rainfall, deep gullies",
        }
    }
}

impl std::fmt::Display for ErosionPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Minimal => write!(f, "minimal"),
            Self::Normal => write!(f, "normal"),
            Self::Dramatic => write!(f, "dramatic"),
        }
    }
}

impl std::str::FromStr for ErosionPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|p| p.to_string() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown erosion preset '{}'", s))
    }
}

/// Droplet erosion parameters
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErosionParams {
    /// Number of droplets simulated per pass (default: 1000)
    pub iterations: usize,

    /// Upper bound of a droplet's initial mass (default: 10.0)
    /// Heavier droplets survive longer on steep ground and carry more sediment
    pub flow_scale: f32,

    /// Lower bound of a droplet's initial mass (default: 0.1)
    pub min_mass: f32,

    /// Step cap per droplet; a droplet that reaches it loses its remaining mass
    pub max_steps: usize,
}

impl Default for ErosionParams {
    fn default() -> Self {
        Self {
            iterations: 1000,
            flow_scale: 10.0,
            min_mass: 0.1,
            max_steps: 10_000,
        }
    }
}

impl ErosionParams {
    /// Create a fast configuration for testing (fewer droplets)
    pub fn fast() -> Self {
        Self {
            iterations: 100,
            ..Default::default()
        }
    }

    /// Create parameters from a preset
    pub fn from_preset(preset: ErosionPreset) -> Self {
        match preset {
            ErosionPreset::None => Self {
                iterations: 0,
                ..Default::default()
            },
            ErosionPreset::Minimal => Self {
                iterations: 250,
                flow_scale: 5.0,
                ..Default::default()
            },
            ErosionPreset::Normal => Self::default(),
            ErosionPreset::Dramatic => Self {
                iterations: 5000,
                flow_scale: 20.0,
                ..Default::default()
            },
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mass_ok = self.min_mass.is_finite()
            && self.flow_scale.is_finite()
            && self.min_mass > 0.0
            && self.min_mass <= self.flow_scale;
        if !mass_ok {
            return Err(TerrainError::InvalidMassRange {
                min: self.min_mass,
                max: self.flow_scale,
            });
        }
        if self.max_steps == 0 {
            return Err(TerrainError::InvalidStepCap);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(ErosionParams::default().validate().is_ok());
        assert!(ErosionParams::fast().validate().is_ok());
        for preset in ErosionPreset::all() {
            assert!(ErosionParams::from_preset(*preset).validate().is_ok(), "{}", preset);
        }
    }

    #[test]
    fn test_inverted_mass_range_rejected() {
        let params = ErosionParams { min_mass: 5.0, flow_scale: 1.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(TerrainError::InvalidMassRange { .. })));

        let params = ErosionParams { min_mass: 0.0, ..Default::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_zero_step_cap_rejected() {
        let params = ErosionParams { max_steps: 0, ..Default::default() };
        assert!(matches!(params.validate(), Err(TerrainError::InvalidStepCap)));
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("Dramatic".parse::<ErosionPreset>().unwrap(), ErosionPreset::Dramatic);
        assert!("biblical".parse::<ErosionPreset>().is_err());
    }
}
