//! Configuration for sweep runs.
//!
//! Everything the core consumes is static input: the fluid constants, the
//! sweep grids, the peak-detection policy, and the trailing window. A run
//! can be configured entirely from CLI flags or loaded from a TOML file:
//!
//! ```toml
//! re_values = [200.0, 500.0]
//! d_values = [1.0, 1.5]
//!
//! [fluid.dynamic]
//! mu = 1.8e-5
//! rho = 1.225
//!
//! [estimator]
//! policy = { min_prominence = 1e-12 }
//! trailing_window = 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::peaks::DetectionPolicy;
use crate::analysis::strouhal::SweepGrid;
use crate::constants::{
    AIR_DENSITY, AIR_DYNAMIC_VISCOSITY, AIR_KINEMATIC_VISCOSITY, DEFAULT_TRAILING_WINDOW,
};
use crate::error::{Result, ShedError};

/// How the free-stream velocity is derived from a (Re, D) pair.
///
/// The two forms are physically equivalent (`ν = μ/ρ`); which one a
/// deployment uses depends on which fluid constants the simulation setup
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluidModel {
    /// `U0 = Re·μ/(ρ·D)` from dynamic viscosity and density
    Dynamic {
        /// Dynamic viscosity in Pa·s
        mu: f64,
        /// Density in kg/m³
        rho: f64,
    },
    /// `U0 = Re·ν/D` from kinematic viscosity
    Kinematic {
        /// Kinematic viscosity in m²/s
        nu: f64,
    },
}

impl FluidModel {
    /// Air at ambient conditions, dynamic form.
    pub fn air_dynamic() -> Self {
        Self::Dynamic {
            mu: AIR_DYNAMIC_VISCOSITY,
            rho: AIR_DENSITY,
        }
    }

    /// Air at ambient conditions, kinematic form.
    pub fn air_kinematic() -> Self {
        Self::Kinematic {
            nu: AIR_KINEMATIC_VISCOSITY,
        }
    }

    /// Free-stream velocity in m/s for a combination. Pure and
    /// deterministic.
    pub fn free_stream_velocity(&self, re: f64, d: f64) -> f64 {
        match *self {
            Self::Dynamic { mu, rho } => re * mu / (rho * d),
            Self::Kinematic { nu } => re * nu / d,
        }
    }
}

impl Default for FluidModel {
    fn default() -> Self {
        Self::air_dynamic()
    }
}

/// Peak detection and period estimation parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Which local maxima count as peaks
    #[serde(default)]
    pub policy: DetectionPolicy,
    /// How many trailing peaks enter the period mean
    #[serde(default = "default_trailing_window")]
    pub trailing_window: usize,
}

fn default_trailing_window() -> usize {
    DEFAULT_TRAILING_WINDOW
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            policy: DetectionPolicy::default(),
            trailing_window: DEFAULT_TRAILING_WINDOW,
        }
    }
}

/// Full configuration of one sweep run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    #[serde(flatten)]
    pub grid: SweepGrid,
    #[serde(default)]
    pub fluid: FluidModel,
    #[serde(default)]
    pub estimator: EstimatorConfig,
}

impl SweepConfig {
    /// Load and validate a sweep configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| ShedError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self =
            toml::from_str(&text).map_err(|e| ShedError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the estimator parameters. An empty grid is valid and yields an
    /// empty result table.
    pub fn validate(&self) -> Result<()> {
        self.estimator.policy.validate()?;
        if self.estimator.trailing_window < 2 {
            return Err(ShedError::TrailingWindow(self.estimator.trailing_window));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dynamic_free_stream_velocity() {
        let fluid = FluidModel::air_dynamic();
        // Re=200, D=1: U0 = 200·1.8e-5/(1.225·1)
        assert_relative_eq!(
            fluid.free_stream_velocity(200.0, 1.0),
            0.002938775,
            max_relative = 1e-5
        );
    }

    #[test]
    fn test_kinematic_free_stream_velocity() {
        let fluid = FluidModel::air_kinematic();
        // Re=200, D=1: U0 = 200·1.47e-5/1
        assert_relative_eq!(
            fluid.free_stream_velocity(200.0, 1.0),
            2.94e-3,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_config_from_toml() {
        let text = r#"
            re_values = [200.0, 500.0]
            d_values = [1.0, 1.5]

            [fluid.kinematic]
            nu = 1.47e-5

            [estimator]
            policy = { min_height = 1e-10 }
            trailing_window = 6
        "#;
        let config: SweepConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.grid.re_values, vec![200.0, 500.0]);
        assert_eq!(config.grid.d_values, vec![1.0, 1.5]);
        assert_eq!(config.fluid, FluidModel::Kinematic { nu: 1.47e-5 });
        assert_eq!(config.estimator.policy, DetectionPolicy::MinHeight(1e-10));
        assert_eq!(config.estimator.trailing_window, 6);
    }

    #[test]
    fn test_config_defaults() {
        let text = r#"
            re_values = [200.0]
            d_values = [1.0]
        "#;
        let config: SweepConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.fluid, FluidModel::air_dynamic());
        assert_eq!(config.estimator.trailing_window, DEFAULT_TRAILING_WINDOW);
    }

    #[test]
    fn test_config_rejects_degenerate_window() {
        let text = r#"
            re_values = [200.0]
            d_values = [1.0]

            [estimator]
            trailing_window = 1
        "#;
        let config: SweepConfig = toml::from_str(text).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ShedError::TrailingWindow(1))
        ));
    }
}
