use crate::config::ExecutorConfig;
use crate::error::{NavError, NavResult};
use crate::event_log::{EventLog, NavEvent};
use crate::geometry::{Angle, Point, Rect};
use crate::grid::{Cell, WorldBounds};
use crate::mover::{Mover, UnitMover};
use crate::pathfinding::Pathfinder;

/// Where the executor is in its route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorState {
    /// Heading for waypoint `i`
    Seeking(usize),
    Arrived,
    /// The mover stopped being alive before arriving
    Cancelled,
}

/// Drives a mover along a fixed route at constant speed.
///
/// No replanning: the route is computed once (or supplied) up front. The
/// host calls [`tick`](Self::tick) once per simulation step.
#[derive(Debug, Clone)]
pub struct PathExecutor {
    /// Top-left positions the mover snaps to, in order
    waypoints: Vec<Point>,
    destination: Point,
    speed: f32,
    tolerance: f32,
    state: ExecutorState,
}

impl PathExecutor {
    /// Plan a route for `mover` to `destination` (a top-left position).
    ///
    /// Obstacles are padded by `config.obstacle_padding` before planning and
    /// `speed` falls back to `config.default_speed`.
    /// Fails with [`NavError::NoPath`] when the destination is unreachable and
    /// [`NavError::MoverTooLarge`] for movers bigger than one cell.
    #[allow(clippy::too_many_arguments)]
    pub fn plan<M: Mover>(
        mover: &M,
        destination: Point,
        speed: Option<f32>,
        world: WorldBounds,
        obstacles: &[Rect],
        pathfinder: &Pathfinder,
        config: &ExecutorConfig,
        mut events: Option<&mut EventLog>,
    ) -> NavResult<Self> {
        let speed = speed.unwrap_or(config.default_speed);
        let position = mover.bounds().top_left();
        if position.distance_to(&destination) <= config.arrival_tolerance {
            return Ok(Self::arrived(destination, speed, config.arrival_tolerance));
        }

        let unit = UnitMover::of(mover)?;
        let padded: Vec<Rect> = obstacles
            .iter()
            .map(|o| o.inflate(config.obstacle_padding))
            .collect();

        let from = unit.cell();
        let to = Cell::containing(destination.x, destination.y);
        let Some(cells) = pathfinder.plan(&unit, destination, world, &padded) else {
            note(&mut events, NavEvent::PathNotFound { from, to });
            return Err(NavError::NoPath {
                from: position,
                to: destination,
            });
        };
        note(&mut events, NavEvent::PathPlanned {
            from,
            to,
            waypoints: cells.len(),
        });

        let mut waypoints: Vec<Point> = cells
            .iter()
            .map(|c| Point::new(c.x as f32, c.y as f32))
            .collect();
        let ends_on_destination = waypoints
            .last()
            .is_some_and(|last| last.distance_to(&destination) <= config.arrival_tolerance);
        if !ends_on_destination {
            waypoints.push(destination);
        }

        Ok(Self::with_path(mover, waypoints, destination, speed, config.arrival_tolerance))
    }

    /// Follow an externally supplied route of top-left positions
    pub fn with_path<M: Mover>(
        mover: &M,
        mut waypoints: Vec<Point>,
        destination: Point,
        speed: f32,
        tolerance: f32,
    ) -> Self {
        let position = mover.bounds().top_left();
        if position.distance_to(&destination) <= tolerance {
            return Self::arrived(destination, speed, tolerance);
        }
        if waypoints
            .first()
            .is_some_and(|first| first.distance_to(&position) <= tolerance)
        {
            waypoints.remove(0);
        }

        let state = if waypoints.is_empty() {
            ExecutorState::Arrived
        } else {
            ExecutorState::Seeking(0)
        };
        PathExecutor {
            waypoints,
            destination,
            speed,
            tolerance,
            state,
        }
    }

    fn arrived(destination: Point, speed: f32, tolerance: f32) -> Self {
        PathExecutor {
            waypoints: Vec::new(),
            destination,
            speed,
            tolerance,
            state: ExecutorState::Arrived,
        }
    }

    pub fn state(&self) -> ExecutorState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        !matches!(self.state, ExecutorState::Seeking(_))
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Units per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }

    /// Waypoints not yet reached
    pub fn remaining(&self) -> &[Point] {
        match self.state {
            ExecutorState::Seeking(i) => &self.waypoints[i..],
            _ => &[],
        }
    }

    /// Advance the mover by `dt` seconds of travel
    pub fn tick<M: Mover>(
        &mut self,
        mover: &mut M,
        dt: f32,
        mut events: Option<&mut EventLog>,
    ) -> ExecutorState {
        let ExecutorState::Seeking(index) = self.state else {
            return self.state;
        };

        let position = mover.bounds().top_left();
        if !mover.is_alive() {
            self.state = ExecutorState::Cancelled;
            note(&mut events, NavEvent::Cancelled { position });
            return self.state;
        }

        let target = self.waypoints[index];
        let travel = dt.max(0.0) * self.speed;
        let distance = position.distance_to(&target);
        if distance > 0.0 {
            mover.set_velocity_angle(Angle::between(position, target));
        }

        if travel >= distance {
            // Snap so leftover travel never accumulates as overshoot
            mover.move_to(target.x, target.y);
            note(&mut events, NavEvent::WaypointReached { index, position: target });

            self.state = if index + 1 >= self.waypoints.len() {
                note(&mut events, NavEvent::Arrived { position: target });
                ExecutorState::Arrived
            } else {
                ExecutorState::Seeking(index + 1)
            };
        } else if let Some(direction) = position.direction_to(&target) {
            let next = position.advance(direction, travel);
            mover.move_to(next.x, next.y);
        }

        self.state
    }
}

fn note(events: &mut Option<&mut EventLog>, event: NavEvent) {
    if let Some(log) = events.as_deref_mut() {
        log.record(event);
    }
}
