use crate::config::NavigationConfig;
use crate::event_log::{EventLog, NavEvent};
use crate::geometry::{Angle, Rect};
use crate::grid::Cell;
use crate::hit::{HitDetector, RayBuffer};
use crate::mover::Mover;
use std::collections::VecDeque;

/// A planned route that shortens itself as the follower advances.
///
/// Waypoints are 1x1 cell rectangles. The list only ever shrinks.
#[derive(Debug, Clone, Default)]
pub struct NavigationPath {
    waypoints: VecDeque<Rect>,
}

impl NavigationPath {
    pub fn new(waypoints: impl IntoIterator<Item = Rect>) -> Self {
        NavigationPath {
            waypoints: waypoints.into_iter().collect(),
        }
    }

    pub fn from_cells(cells: &[Cell]) -> Self {
        Self::new(cells.iter().map(Cell::bounds))
    }

    /// Next waypoint to head for, `None` once the path is complete
    pub fn current_target(&self) -> Option<&Rect> {
        self.waypoints.front()
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Rect> {
        self.waypoints.iter()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Drop the current target once the follower has reached it
    pub fn advance(&mut self) -> Option<Rect> {
        self.waypoints.pop_front()
    }

    /// Skip ahead to the farthest nearby waypoint the follower can already see.
    ///
    /// Waypoints are checked from the far end back; only those within
    /// `prune_distance` of the follower get the (expensive) precise
    /// line-of-sight test. On the first success the follower is snapped
    /// centered onto that waypoint, turned toward the one after it, and every
    /// waypoint up to and including it is dropped. Returns how many were dropped.
    pub fn prune<M: Mover>(
        &mut self,
        follower: &mut M,
        obstacles: &[Rect],
        detector: &HitDetector,
        config: &NavigationConfig,
        scratch: &mut RayBuffer,
        events: Option<&mut EventLog>,
    ) -> usize {
        let bounds = follower.bounds();
        let origin = bounds.center();

        let mut reachable = None;
        for (index, waypoint) in self.waypoints.iter().enumerate().rev() {
            if origin.distance_to(&waypoint.center()) > config.prune_distance {
                continue;
            }
            if detector.has_line_of_sight(&bounds, waypoint, obstacles, scratch) {
                reachable = Some(index);
                break;
            }
        }

        let Some(index) = reachable else {
            return 0;
        };

        let waypoint = self.waypoints[index];
        let center = waypoint.center();
        follower.move_to(center.x - bounds.width / 2.0, center.y - bounds.height / 2.0);
        if let Some(next) = self.waypoints.get(index + 1) {
            follower.set_velocity_angle(Angle::between(center, next.center()));
        }

        let dropped = index + 1;
        self.waypoints.drain(..dropped);

        tracing::debug!(dropped, remaining = self.waypoints.len(), "pruned navigation path");
        if let Some(log) = events {
            log.record(NavEvent::PathPruned {
                dropped,
                remaining: self.waypoints.len(),
            });
        }
        dropped
    }
}
