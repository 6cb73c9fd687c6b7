#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that steers units along the flow field.
//!
//! Ground units read the world's direction field under their current
//! position every tick; fliers ignore the field and head straight for the
//! exit. Units never touch the grid or the connectivity check.

use std::time::Duration;

use frostmaul_core::{Mobility, UnitId};
use frostmaul_world::{query, World};
use glam::Vec2;
use tracing::debug;

/// Distance from the exit centre, in world units, at which a unit counts as
/// having left the maze.
pub const DEFAULT_EXIT_THRESHOLD: f32 = 0.6;

/// Moving unit tracked by the host application.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Walker {
    /// Identifier assigned by the host.
    pub id: UnitId,
    /// Current position in world space.
    pub position: Vec2,
    /// Travel speed in world units per second.
    pub speed: f32,
    /// How the unit traverses the maze.
    pub mobility: Mobility,
}

impl Walker {
    /// Creates a walker standing at the provided position.
    #[must_use]
    pub const fn new(id: UnitId, position: Vec2, speed: f32, mobility: Mobility) -> Self {
        Self {
            id,
            position,
            speed,
            mobility,
        }
    }
}

/// Movement guidance for a unit at `position`.
///
/// Ground units receive the flow field direction of the cell under them,
/// which is [`Vec2::ZERO`] off the grid or where no route exists. Once on the
/// exit cell, where the field has no heading, they close in on its centre.
/// Fliers receive the unit vector toward the exit centre.
#[must_use]
pub fn steer(world: &World, position: Vec2, mobility: Mobility) -> Vec2 {
    let toward_exit = (query::exit_position(world) - position).normalize_or_zero();
    match mobility {
        Mobility::Flying => toward_exit,
        Mobility::Ground => match query::world_to_cell(world, position) {
            Some(cell) if cell == query::exit(world) => toward_exit,
            Some(cell) => query::flow_field(world).direction(cell),
            None => Vec2::ZERO,
        },
    }
}

/// Pure system that advances walkers every simulation tick.
#[derive(Clone, Debug)]
pub struct Movement {
    exit_threshold: f32,
}

impl Movement {
    /// Creates a movement system with a custom exit threshold.
    #[must_use]
    pub const fn new(exit_threshold: f32) -> Self {
        Self { exit_threshold }
    }

    /// Distance from the exit centre at which walkers are reported as arrived.
    #[must_use]
    pub const fn exit_threshold(&self) -> f32 {
        self.exit_threshold
    }

    /// Moves every walker by one tick and reports the ones that reached the
    /// exit.
    ///
    /// Ground walkers without guidance hold their position for the tick.
    /// Arrived walkers are pushed to `arrived` in slice order; removing them
    /// is left to the caller.
    pub fn advance(
        &self,
        world: &World,
        dt: Duration,
        walkers: &mut [Walker],
        arrived: &mut Vec<UnitId>,
    ) {
        let seconds = dt.as_secs_f32();
        let exit = query::exit_position(world);

        for walker in walkers.iter_mut() {
            let direction = steer(world, walker.position, walker.mobility);
            walker.position += direction * walker.speed * seconds;

            if walker.position.distance(exit) < self.exit_threshold {
                debug!(unit = walker.id.get(), "unit reached the exit");
                arrived.push(walker.id);
            }
        }
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(DEFAULT_EXIT_THRESHOLD)
    }
}
