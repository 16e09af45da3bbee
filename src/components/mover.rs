//! Path-following movement for map entities.
//!
//! Positions are continuous and measured in subtiles, five to a tile. A
//! [`Mover`] walks in a straight line towards its target at a fixed speed and
//! then on to each queued tile waypoint. Whenever a new target is set the
//! facing is recomputed as one of the 64 abstract directions.

use std::collections::VecDeque;
use std::fmt;

use bevy_ecs::prelude::Component;
use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::components::composite::direction::FACING_DIRECTIONS;

pub const SUBTILES_PER_TILE: f64 = 5.0;

/// Distance under which the mover counts as arrived.
const ARRIVAL_EPSILON: f64 = 0.0001;

/// A tile coordinate in a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: i32,
    pub y: i32,
}

impl TilePoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Subtile position of the tile corner.
    pub fn to_subtile(self) -> DVec2 {
        DVec2::new(self.x as f64, self.y as f64) * SUBTILES_PER_TILE
    }
}

pub type DirectionCallback = Box<dyn FnMut(usize) + Send + Sync>;
pub type DoneCallback = Box<dyn FnOnce() + Send + Sync>;

#[derive(Component)]
pub struct Mover {
    position: DVec2,
    target: DVec2,
    /// Subtiles per second.
    speed: f64,
    facing: usize,
    path: VecDeque<TilePoint>,
    on_direction: Option<DirectionCallback>,
    on_done: Option<DoneCallback>,
}

impl fmt::Debug for Mover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mover")
            .field("position", &self.position)
            .field("target", &self.target)
            .field("speed", &self.speed)
            .field("facing", &self.facing)
            .field("path", &self.path)
            .finish()
    }
}

impl Mover {
    /// Idle mover at a subtile position.
    pub fn new(x: f64, y: f64) -> Self {
        let position = DVec2::new(x, y);
        Self {
            position,
            target: position,
            speed: 6.0,
            facing: 0,
            path: VecDeque::new(),
            on_direction: None,
            on_done: None,
        }
    }

    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Teleport and stop.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = DVec2::new(x, y);
        self.target = self.position;
        self.path.clear();
    }

    pub fn target(&self) -> DVec2 {
        self.target
    }

    /// Tile containing the current position.
    pub fn tile(&self) -> (i32, i32) {
        let tile = self.position / SUBTILES_PER_TILE;
        (tile.x.trunc() as i32, tile.y.trunc() as i32)
    }

    /// One-based subtile offset inside the current tile.
    pub fn subcell(&self) -> (f64, f64) {
        (
            1.0 + self.position.x % SUBTILES_PER_TILE,
            1.0 + self.position.y % SUBTILES_PER_TILE,
        )
    }

    /// Last computed abstract facing.
    pub fn facing(&self) -> usize {
        self.facing
    }

    pub fn remaining_waypoints(&self) -> usize {
        self.path.len()
    }

    pub fn is_at_target(&self) -> bool {
        self.position.distance(self.target) < ARRIVAL_EPSILON
    }

    /// At the final target with nothing left to report.
    pub fn is_idle(&self) -> bool {
        self.is_at_target() && self.path.is_empty() && self.on_done.is_none()
    }

    /// Register a callback receiving the facing on every new target.
    pub fn on_direction_change(&mut self, callback: impl FnMut(usize) + Send + Sync + 'static) {
        self.on_direction = Some(Box::new(callback));
    }

    /// Walk to a subtile position, dropping any queued path.
    pub fn set_target(&mut self, x: f64, y: f64, done: Option<DoneCallback>) {
        self.path.clear();
        self.on_done = done;
        self.retarget(DVec2::new(x, y));
    }

    /// Walk through tile waypoints in order, starting with the first.
    pub fn set_path(&mut self, path: impl IntoIterator<Item = TilePoint>, done: Option<DoneCallback>) {
        self.path = path.into_iter().collect();
        self.on_done = done;
        match self.path.pop_front() {
            Some(first) => self.retarget(first.to_subtile()),
            None => self.target = self.position,
        }
    }

    fn retarget(&mut self, target: DVec2) {
        self.target = target;
        let angle = 359 - angle_between(self.position, target);
        self.facing = angle_to_direction(angle as f64);
        if let Some(on_direction) = self.on_direction.as_mut() {
            on_direction(self.facing);
        }
    }

    /// Move for `dt` seconds, carrying leftover distance on to the next waypoint.
    pub fn step(&mut self, dt: f64) {
        let mut budget = self.speed * dt;
        loop {
            let to_target = self.target - self.position;
            let distance = to_target.length();

            if distance < ARRIVAL_EPSILON {
                self.position = self.target;
                match self.path.pop_front() {
                    Some(next) => {
                        self.retarget(next.to_subtile());
                        continue;
                    }
                    None => {
                        if let Some(done) = self.on_done.take() {
                            done();
                        }
                        return;
                    }
                }
            }

            if budget <= 0.0 {
                return;
            }
            if budget >= distance {
                self.position = self.target;
                budget -= distance;
            } else {
                self.position += to_target / distance * budget;
                return;
            }
        }
    }
}

/// Screen-space angle in whole degrees from `from` to `to`, in `[0, 360)`.
pub fn angle_between(from: DVec2, to: DVec2) -> i32 {
    let delta_y = from.y - to.y;
    let delta_x = to.x - from.x;
    let degrees = delta_y.atan2(delta_x).to_degrees() as i32;
    degrees.rem_euclid(360)
}

/// Bucket an angle in degrees onto the 64 abstract facings.
pub fn angle_to_direction(angle: f64) -> usize {
    let degrees_per_direction = 360.0 / FACING_DIRECTIONS as f64;
    let offset = 45.0 - degrees_per_direction / 2.0;

    let direction = ((angle - offset) / degrees_per_direction) as i32;
    direction.rem_euclid(FACING_DIRECTIONS as i32) as usize
}
