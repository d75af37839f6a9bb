// src/behavior/validator.rs

// Validates an incoming motion command before the cycle starts. A command
// whose target has any nonzero component off the configured axis is a
// malformed request and is rejected without side effects.

// Dependencies
use log::warn;

use super::{FailureReason, MotionAxis, MotionCommand};

/// Pre-flight check for motion commands
#[derive(Clone, Copy, Debug)]
pub struct GoalValidator {
    axis: MotionAxis,
}

impl GoalValidator {
    /// Creates a validator for the given motion axis
    pub fn new(axis: MotionAxis) -> Self {
        GoalValidator { axis }
    }

    /// Accepts a command whose target moves only along the configured axis
    pub fn validate(&self, command: &MotionCommand) -> Result<(), FailureReason> {
        let [first, second] = self.axis.off_axis_components(&command.target);
        if first != 0.0 || second != 0.0 {
            warn!(
                "Rejecting motion command: motion is along the {} axis only",
                self.axis.label()
            );
            return Err(FailureReason::InvalidInput);
        }
        Ok(())
    }
}
