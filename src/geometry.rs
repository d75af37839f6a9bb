// src/geometry.rs

// Planar geometry primitives shared by the motion behavior: world-frame
// poses, velocity commands, goal displacement vectors, and the fixed-heading
// projection used by the forward collision simulator.

// Dependencies
use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

/// Robot pose in the world frame: position in meters, heading in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position (meters)
    pub x: f64,
    /// Y position (meters)
    pub y: f64,
    /// Orientation (radians)
    pub theta: f64,
}

impl Pose2D {
    /// Creates a pose from position and heading
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Pose2D { x, y, theta }
    }

    /// Planar Euclidean distance to another pose; headings are ignored
    pub fn planar_distance(&self, other: &Pose2D) -> f64 {
        Vector2::new(other.x - self.x, other.y - self.y).norm()
    }

    /// Returns this pose displaced by `offset` meters along its own heading.
    /// The rotation is taken from `theta` once; the projected heading is
    /// unchanged.
    pub fn projected_along(&self, offset: f64) -> Pose2D {
        let displacement = Rotation2::new(self.theta) * Vector2::new(offset, 0.0);
        Pose2D {
            x: self.x + displacement.x,
            y: self.y + displacement.y,
            theta: self.theta,
        }
    }
}

/// Planar velocity command: body-frame linear components (m/s) and yaw rate
/// (rad/s). A zero command is the stop signal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    /// Linear velocity along the body x axis (m/s)
    pub linear_x: f64,
    /// Linear velocity along the body y axis (m/s)
    pub linear_y: f64,
    /// Angular velocity about the body z axis (rad/s)
    pub angular_z: f64,
}

impl Velocity {
    /// The zero command, published to halt the base
    pub fn stop() -> Self {
        Velocity {
            linear_x: 0.0,
            linear_y: 0.0,
            angular_z: 0.0,
        }
    }

    /// True if every component is exactly zero
    pub fn is_stop(&self) -> bool {
        self.linear_x == 0.0 && self.linear_y == 0.0 && self.angular_z == 0.0
    }
}

/// Goal displacement vector as received from the invoker (meters). Exactly
/// one component may be nonzero; the configured motion axis decides which.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Displacement along x (meters)
    pub x: f64,
    /// Displacement along y (meters)
    pub y: f64,
    /// Displacement along z (meters); always rejected if nonzero
    pub z: f64,
}

impl Target {
    /// Creates a displacement vector
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Target { x, y, z }
    }
}

/// Wraps an angle to the [-pi, pi] interval
pub fn normalize_angle(angle: f64) -> f64 {
    let mut wrapped = angle;
    while wrapped > std::f64::consts::PI {
        wrapped -= 2.0 * std::f64::consts::PI;
    }
    while wrapped < -std::f64::consts::PI {
        wrapped += 2.0 * std::f64::consts::PI;
    }
    wrapped
}
