// src/behavior/tracker.rs

// Turns raw pose lookups into "distance traveled since the behavior
// started": the starting pose is anchored once, and progress is the planar
// displacement from that anchor regardless of the path taken in between.

use crate::geometry::Pose2D;

/// Distance-from-start bookkeeping for one behavior
#[derive(Clone, Copy, Debug)]
pub struct PoseTracker {
    initial_pose: Pose2D,
}

impl PoseTracker {
    /// Anchors the tracker at the pose the behavior started from
    pub fn new(initial_pose: Pose2D) -> Self {
        PoseTracker { initial_pose }
    }

    /// The anchored starting pose
    pub fn initial_pose(&self) -> Pose2D {
        self.initial_pose
    }

    /// Planar displacement of `current` from the anchored starting pose
    pub fn distance_traveled(&self, current: &Pose2D) -> f64 {
        self.initial_pose.planar_distance(current)
    }
}
