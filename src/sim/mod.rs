//! In-process collaborators for tests and the demo binary
//!
//! This module supplies working implementations of every boundary the
//! behavior consumes, including:
//! - A kinematic model of the base that serves as both pose source and
//!   velocity sink through a shared handle
//! - An occupancy-grid collision checker honoring the
//!   fresh-snapshot-per-call contract
//! - A manually advanced clock for lockstep simulation

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::geometry::{normalize_angle, Pose2D, Velocity};
use crate::interfaces::{Clock, CollisionChecker, PoseError, PoseSource, VelocitySink};

/// Configuration for the simulated occupancy-grid world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid side length (cells)
    pub grid_size: usize,
    /// Meters per cell
    pub grid_resolution: f64,
    /// World x of the grid's lower-left corner (meters)
    pub origin_x: f64,
    /// World y of the grid's lower-left corner (meters)
    pub origin_y: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            grid_size: 200,
            grid_resolution: 0.05,
            origin_x: -5.0,
            origin_y: -5.0,
        }
    }
}

/// 2D occupancy grid. Cells are free (0) or occupied (1); coordinates
/// outside the grid are treated as free.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    resolution: f64,
    origin_x: f64,
    origin_y: f64,
    data: Vec<i8>,
}

impl OccupancyGrid {
    /// Creates an all-free grid from a world configuration
    pub fn new(config: &WorldConfig) -> Self {
        OccupancyGrid {
            width: config.grid_size,
            height: config.grid_size,
            resolution: config.grid_resolution,
            origin_x: config.origin_x,
            origin_y: config.origin_y,
            data: vec![0; config.grid_size * config.grid_size],
        }
    }

    fn cell_index(&self, x: f64, y: f64) -> Option<usize> {
        let col = ((x - self.origin_x) / self.resolution).floor();
        let row = ((y - self.origin_y) / self.resolution).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.width || row >= self.height {
            return None;
        }
        Some(row * self.width + col)
    }

    /// Marks the cell containing the world coordinate as occupied
    pub fn mark_occupied(&mut self, x: f64, y: f64) {
        if let Some(index) = self.cell_index(x, y) {
            self.data[index] = 1;
        }
    }

    /// Clears the cell containing the world coordinate
    pub fn mark_free(&mut self, x: f64, y: f64) {
        if let Some(index) = self.cell_index(x, y) {
            self.data[index] = 0;
        }
    }

    /// True if the cell containing the world coordinate is occupied
    pub fn is_occupied(&self, x: f64, y: f64) -> bool {
        match self.cell_index(x, y) {
            Some(index) => self.data[index] == 1,
            None => false,
        }
    }
}

/// Shared handle to a grid that a world owner can keep mutating
pub type SharedGrid = Arc<Mutex<OccupancyGrid>>;

/// Wraps a grid in a shared handle
pub fn shared_grid(grid: OccupancyGrid) -> SharedGrid {
    Arc::new(Mutex::new(grid))
}

/// Collision checker over a shared occupancy grid. A fresh copy of the live
/// grid is taken only when a query passes `fetch_data = true`; queries with
/// `fetch_data = false` reuse the previous snapshot, so staleness is bounded
/// by the caller's fetch policy.
pub struct GridCollisionChecker {
    world: SharedGrid,
    snapshot: Option<OccupancyGrid>,
}

impl GridCollisionChecker {
    /// Creates a checker observing the given shared grid
    pub fn new(world: SharedGrid) -> Self {
        GridCollisionChecker {
            world,
            snapshot: None,
        }
    }
}

impl CollisionChecker for GridCollisionChecker {
    fn is_collision_free(&mut self, pose: &Pose2D, fetch_data: bool) -> bool {
        if fetch_data || self.snapshot.is_none() {
            self.snapshot = Some(self.world.lock().unwrap().clone());
        }
        match &self.snapshot {
            Some(grid) => !grid.is_occupied(pose.x, pose.y),
            None => true,
        }
    }
}

/// Kinematic model of a holonomic base: integrates the last published
/// velocity command into its pose
#[derive(Clone, Debug)]
pub struct SimulatedBase {
    pose: Pose2D,
    command: Velocity,
}

impl SimulatedBase {
    /// Creates a base at rest at the given pose
    pub fn new(pose: Pose2D) -> Self {
        SimulatedBase {
            pose,
            command: Velocity::stop(),
        }
    }

    /// Integrates the last published command over `dt` seconds (Euler step,
    /// body frame rotated into the world frame)
    pub fn advance(&mut self, dt: f64) {
        let (sin_theta, cos_theta) = self.pose.theta.sin_cos();
        self.pose.x += (self.command.linear_x * cos_theta - self.command.linear_y * sin_theta) * dt;
        self.pose.y += (self.command.linear_x * sin_theta + self.command.linear_y * cos_theta) * dt;
        self.pose.theta = normalize_angle(self.pose.theta + self.command.angular_z * dt);
    }

    /// The current pose
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// The last command published to this base
    pub fn last_command(&self) -> Velocity {
        self.command
    }
}

/// Shared handle so one simulated base can serve as both the pose source
/// and the velocity sink of the same cycle
pub type SharedBase = Arc<Mutex<SimulatedBase>>;

/// Wraps a base in a shared handle
pub fn shared_base(pose: Pose2D) -> SharedBase {
    Arc::new(Mutex::new(SimulatedBase::new(pose)))
}

impl PoseSource for SharedBase {
    fn current_pose(&mut self) -> Result<Pose2D, PoseError> {
        Ok(self.lock().unwrap().pose())
    }
}

impl VelocitySink for SharedBase {
    fn publish(&mut self, command: &Velocity) {
        self.lock().unwrap().command = *command;
    }
}

/// Manually advanced clock for lockstep simulation
#[derive(Clone)]
pub struct SimClock {
    now: Arc<Mutex<Duration>>,
}

impl SimClock {
    /// Creates a clock at time zero
    pub fn new() -> Self {
        SimClock {
            now: Arc::new(Mutex::new(Duration::ZERO)),
        }
    }

    /// Moves the clock forward
    pub fn advance(&self, dt: Duration) {
        *self.now.lock().unwrap() += dt;
    }

    /// Jumps the clock to an absolute time
    pub fn set(&self, now: Duration) {
        *self.now.lock().unwrap() = now;
    }
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock::new()
    }
}

impl Clock for SimClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap()
    }
}
