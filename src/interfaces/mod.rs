//! Collaborator boundaries for the motion behavior
//!
//! This module defines the contracts the behavior consumes, including:
//! - Resolving the current robot pose
//! - Publishing velocity commands to the base
//! - Querying the collision oracle for projected poses
//! - Reading a monotonic clock
//!
//! The behavior never retries a collaborator call; retry policy, if any,
//! belongs to the invoker behind these traits.

use std::time::{Duration, Instant};

use crate::geometry::{Pose2D, Velocity};

/// Error returned when the current robot pose cannot be resolved
#[derive(Debug, Clone)]
pub enum PoseError {
    /// The pose source has no usable estimate (transform missing, stale,
    /// or the localizer is not up yet)
    Unavailable(String),
}

impl std::fmt::Display for PoseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PoseError::Unavailable(msg) => write!(f, "pose unavailable: {}", msg),
        }
    }
}

impl std::error::Error for PoseError {}

/// Supplies the current robot pose, callable once per control cycle.
/// Expected to return within a bounded time budget owned by the
/// implementation.
#[cfg_attr(test, mockall::automock)]
pub trait PoseSource {
    /// Resolves the current world-frame pose
    fn current_pose(&mut self) -> Result<Pose2D, PoseError>;
}

/// Accepts velocity commands for the base. Publishing is infallible by
/// contract: halting the robot must never itself be subject to failure.
#[cfg_attr(test, mockall::automock)]
pub trait VelocitySink {
    /// Publishes a command; a zero command is the stop signal
    fn publish(&mut self, command: &Velocity);
}

/// Answers whether a pose is free of collision. When `fetch_data` is true
/// the implementation refreshes its environment snapshot before answering;
/// when false it reuses the snapshot from the previous query.
#[cfg_attr(test, mockall::automock)]
pub trait CollisionChecker {
    /// True if the given pose is collision free
    fn is_collision_free(&mut self, pose: &Pose2D, fetch_data: bool) -> bool;
}

/// Monotonic time source for deadlines
#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`std::time::Instant`], anchored at construction
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    /// Creates a clock whose origin is the moment of construction
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        MonotonicClock::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}
