//! Tunable constants of the force-directed layout.

use serde::{Deserialize, Serialize};

/// Physics and canvas configuration for [`ForceLayout`](super::ForceLayout).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed number of simulation steps before the layout is settled.
    pub iterations: u32,

    /// Repulsion constant; pairwise force is `repulsion / distance²`.
    pub repulsion: f64,

    /// Upper bound on the magnitude of a single pairwise repulsion.
    /// `f64::INFINITY` disables the cap.
    pub max_repulsion: f64,

    /// Spring constant applied to the displacement along each edge.
    pub spring: f64,

    /// Pull toward the canvas center, proportional to displacement.
    pub centering: f64,

    /// Velocity multiplier per step (0.0-1.0, exclusive).
    pub damping: f64,

    /// Canvas width; the center is at half of it.
    pub width: f64,

    /// Canvas height; the center is at half of it.
    pub height: f64,

    /// Half-width of the square around the center used for initial placement.
    pub initial_spread: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 150,
            repulsion: 8000.0,
            max_repulsion: 50.0,
            spring: 0.01,
            centering: 0.005,
            damping: 0.95,
            width: 800.0,
            height: 700.0,
            initial_spread: 150.0,
        }
    }
}

impl LayoutConfig {
    /// The point every node is pulled toward.
    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Set the iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Apply the plain inverse-square repulsion at every distance.
    pub fn without_repulsion_cap(mut self) -> Self {
        self.max_repulsion = f64::INFINITY;
        self
    }

    /// Set the canvas size.
    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Check the constants describe a simulation that converges.
    pub fn validate(&self) -> Result<(), LayoutConfigError> {
        if self.iterations == 0 {
            return Err(LayoutConfigError::NoIterations);
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(LayoutConfigError::Damping(self.damping));
        }
        if self.max_repulsion.is_nan() || self.max_repulsion < 0.0 {
            return Err(LayoutConfigError::Negative {
                name: "max_repulsion",
                value: self.max_repulsion,
            });
        }
        let constants = [
            ("repulsion", self.repulsion),
            ("spring", self.spring),
            ("centering", self.centering),
            ("initial_spread", self.initial_spread),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutConfigError::Negative { name, value });
            }
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(LayoutConfigError::Canvas {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

/// Invalid layout constants.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutConfigError {
    #[error("Iteration budget must be at least one step")]
    NoIterations,
    #[error("Damping must be between 0 and 1 (exclusive), got {0}")]
    Damping(f64),
    #[error("{name} must be a finite, non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("Canvas must have a positive size, got {width}x{height}")]
    Canvas { width: f64, height: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = LayoutConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.iterations, 150);
        assert_eq!(config.center(), (400.0, 350.0));
    }

    #[test]
    fn test_rejects_bad_damping() {
        let mut config = LayoutConfig::default();
        config.damping = 1.0;
        assert_eq!(config.validate(), Err(LayoutConfigError::Damping(1.0)));

        config.damping = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_iterations() {
        let config = LayoutConfig::default().with_iterations(0);
        assert_eq!(config.validate(), Err(LayoutConfigError::NoIterations));
    }

    #[test]
    fn test_rejects_negative_constants() {
        let mut config = LayoutConfig::default();
        config.spring = -0.1;
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::Negative { name: "spring", .. })
        ));
    }

    #[test]
    fn test_uncapped_repulsion_is_valid() {
        let config = LayoutConfig::default().without_repulsion_cap();
        assert!(config.validate().is_ok());

        let mut config = LayoutConfig::default();
        config.max_repulsion = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(LayoutConfigError::Negative { name: "max_repulsion", .. })
        ));
    }
}
