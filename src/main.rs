// src/main.rs
// Demo entry point for Beeline: runs the motion behavior against a
// simulated base and occupancy grid, first to a clean success, then into a
// predicted collision.

// Dependencies
// - env_logger: Logging for the demo run.
// - beeline modules: behavior, simulated collaborators, configuration.
use beeline::behavior::{MotionAxis, MotionCommand, MotionCycle, Status, StepResult};
use beeline::sim::{shared_base, shared_grid, GridCollisionChecker, OccupancyGrid, SimClock};
use beeline::{BeelineConfig, Pose2D};
use log::{info, warn};
use std::error::Error;
use std::time::Duration;

/// Main function: wires the behavior to simulated collaborators and drives
/// it tick by tick to a terminal status.
fn main() -> Result<(), Box<dyn Error>> {
    // Initialize logging for the demo
    env_logger::init();
    info!("Starting beeline demo...");

    let config = BeelineConfig::default();
    config.validate()?;

    // Scenario 1: free lateral move, expected to succeed
    let outcome = run_scenario(&config, 1.5, None)?;
    info!("Free-path scenario finished: {:?}", outcome.status);

    // Scenario 2: an obstacle half a meter along the simulated ray, expected veto
    let outcome = run_scenario(&config, 1.5, Some((0.5, 0.0)))?;
    info!(
        "Blocked-path scenario finished: {:?} ({:?})",
        outcome.status, outcome.reason
    );

    info!("Beeline demo completed");
    Ok(())
}

/// Runs one lateral move of `distance` meters in a fresh world, optionally
/// placing an obstacle at a world coordinate first.
fn run_scenario(
    config: &BeelineConfig,
    distance: f64,
    obstacle: Option<(f64, f64)>,
) -> Result<StepResult, Box<dyn Error>> {
    let mut grid = OccupancyGrid::new(&config.world_config);
    if let Some((x, y)) = obstacle {
        grid.mark_occupied(x, y);
    }
    let world = shared_grid(grid);
    let base = shared_base(Pose2D::new(0.0, 0.0, 0.0));
    let clock = SimClock::new();

    let mut cycle = MotionCycle::new(
        &config.behavior_config,
        MotionAxis::Lateral,
        base.clone(),
        base.clone(),
        GridCollisionChecker::new(world),
        clock.clone(),
    );

    let started = cycle.start(MotionCommand::lateral(
        distance,
        0.5,
        Duration::from_secs(10),
    ));
    if started.status != Status::Running {
        warn!("Behavior refused to start: {:?}", started.reason);
        return Ok(StepResult {
            status: started.status,
            reason: started.reason,
            feedback: None,
        });
    }

    // Lockstep control loop: one step per tick, then the world moves.
    let dt = 1.0 / config.behavior_config.cycle_frequency;
    let mut ticks = 0u32;
    loop {
        let outcome = cycle.step();
        if let Some(feedback) = outcome.feedback {
            if ticks % 10 == 0 {
                info!("Traveled {:.2} m", feedback.distance_traveled);
            }
        }
        if outcome.status != Status::Running {
            return Ok(outcome);
        }

        base.lock().unwrap().advance(dt);
        clock.advance(Duration::from_secs_f64(dt));
        ticks += 1;
        if ticks > 500 {
            warn!("Demo loop did not terminate within 500 ticks");
            return Ok(outcome);
        }
    }
}

// Weaknesses:
// - Lockstep world: the demo integrates the base with the same dt the
//   behavior assumes; a real deployment gets pose and time from hardware.
// - The collision lookahead projects along the heading held at cycle start,
//   so the demo obstacle sits on the projected ray, not the strafe path.
// Future improvement: drive the demo from a recorded odometry trace.
//
// Current Functionality:
// - Runs a free-path lateral move to success at the default 10 Hz.
// - Runs the same move into a predicted collision and reports the veto.
// - Logs distance feedback once a second at the default rate.
