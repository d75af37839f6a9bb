//! Beeline - predictive straight-line motion execution for mobile robots
//!
//! This library provides a cyclic, time-bounded motion behavior that drives
//! a mobile base along one translational axis at constant speed, verifying
//! on every control cycle, via short-horizon forward simulation, that the
//! immediate future path is free of collisions.
//!
//! The behavior talks to the outside world only through the trait
//! boundaries in [`interfaces`]; the [`sim`] module supplies in-process
//! implementations for tests and the demo binary.

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

pub mod behavior;
pub mod geometry;
pub mod interfaces;
pub mod sim;

// Re-export commonly used items for easier access
pub use behavior::{
    FailureReason, FeedbackSample, ForwardCollisionSimulator, GoalValidator, MotionAxis,
    MotionCommand, MotionCycle, PoseTracker, ResultStatus, Status, StepResult,
};
pub use geometry::{Pose2D, Target, Velocity};
pub use interfaces::{
    Clock, CollisionChecker, MonotonicClock, PoseError, PoseSource, VelocitySink,
};

/// Main configuration structure for Beeline
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BeelineConfig {
    /// Control-cycle and lookahead parameters
    pub behavior_config: BehaviorConfig,
    /// Simulated world parameters used by the demo binary
    pub world_config: sim::WorldConfig,
}

/// Control parameters consumed by the motion behavior, fixed at
/// construction
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BehaviorConfig {
    /// Control loop rate (Hz)
    pub cycle_frequency: f64,
    /// Simulated lookahead horizon (seconds)
    pub simulate_ahead_time: f64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        BehaviorConfig {
            cycle_frequency: 10.0,
            simulate_ahead_time: 2.0,
        }
    }
}

impl Default for BeelineConfig {
    fn default() -> Self {
        BeelineConfig {
            behavior_config: BehaviorConfig::default(),
            world_config: sim::WorldConfig::default(),
        }
    }
}

impl BeelineConfig {
    /// Loads and validates configuration from a YAML file
    pub fn from_yaml(path: &str) -> Result<Self, BeelineError> {
        let file = std::fs::File::open(path)
            .map_err(|e| BeelineError::ConfigError(format!("failed to open {}: {}", path, e)))?;
        let config: BeelineConfig = serde_yaml::from_reader(file)
            .map_err(|e| BeelineError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every parameter is usable by the control loop
    pub fn validate(&self) -> Result<(), BeelineError> {
        if self.behavior_config.cycle_frequency <= 0.0 {
            return Err(BeelineError::ConfigError(
                "cycle_frequency must be positive".to_string(),
            ));
        }
        if self.behavior_config.simulate_ahead_time < 0.0 {
            return Err(BeelineError::ConfigError(
                "simulate_ahead_time must be non-negative".to_string(),
            ));
        }
        if self.world_config.grid_resolution <= 0.0 {
            return Err(BeelineError::ConfigError(
                "grid_resolution must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Beeline error types
#[derive(Debug)]
pub enum BeelineError {
    /// Configuration file missing, unparsable, or out of range
    ConfigError(String),
}

impl std::fmt::Display for BeelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BeelineError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for BeelineError {}
