// src/behavior/simulator.rs

// Short-horizon forward simulation of a candidate velocity command. The
// lookahead is a cheap, bounded-cost check, tens of oracle queries at most,
// not a planner: per cycle it projects the base along its current heading in
// control-tick increments and asks the collision oracle about each projected
// pose until either the horizon ends, the goal is reached, or a collision is
// predicted.

use crate::geometry::{Pose2D, Velocity};
use crate::interfaces::CollisionChecker;
use crate::BehaviorConfig;

use super::MotionAxis;

/// Predictive collision check for one candidate command
#[derive(Clone, Copy, Debug)]
pub struct ForwardCollisionSimulator {
    axis: MotionAxis,
    cycle_frequency: f64,
    simulate_ahead_time: f64,
}

impl ForwardCollisionSimulator {
    /// Creates a simulator for the given axis and control parameters
    pub fn new(axis: MotionAxis, config: &BehaviorConfig) -> Self {
        ForwardCollisionSimulator {
            axis,
            cycle_frequency: config.cycle_frequency,
            simulate_ahead_time: config.simulate_ahead_time,
        }
    }

    /// Number of simulated control ticks in the lookahead horizon
    pub fn horizon_ticks(&self) -> u32 {
        (self.cycle_frequency * self.simulate_ahead_time).round() as u32
    }

    /// True if executing `candidate` from `pose` stays collision free for
    /// the whole lookahead horizon, or reaches the goal before leaving it.
    ///
    /// The projection holds the heading fixed at `pose.theta` for the whole
    /// simulated trajectory. Only the first oracle query of a call requests
    /// a fresh environment snapshot; the remaining queries of the same call
    /// reuse it, so snapshot staleness is bounded by one call.
    pub fn is_collision_free<C: CollisionChecker>(
        &self,
        checker: &mut C,
        target_distance: f64,
        distance_traveled: f64,
        candidate: &Velocity,
        pose: &Pose2D,
    ) -> bool {
        let remaining = target_distance - distance_traveled;
        let axis_speed = self.axis.velocity_component(candidate);
        let mut fetch_data = true;

        for tick in 0..self.horizon_ticks() {
            let elapsed = f64::from(tick) / self.cycle_frequency;
            let offset = axis_speed * elapsed;

            // The goal falls inside the horizon: everything past it is
            // never driven, so the trajectory is free.
            if remaining - offset.abs() <= 0.0 {
                break;
            }

            let projected = pose.projected_along(offset);
            if !checker.is_collision_free(&projected, fetch_data) {
                return false;
            }
            fetch_data = false;
        }
        true
    }
}
