use crate::collider::{can_collide, Collider, ColliderId};
use crate::config::HitConfig;
use crate::error::{NavError, NavResult};
use crate::geometry::{Angle, Point, Rect, Segment};
use std::iter;

/// How many rays to cast from the moving rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastingMode {
    /// Corners plus points sampled along every edge. Catches obstacles that
    /// clip the mover's sides, not just its corners.
    Precise,
    /// Four corners and the center
    Rough,
    /// Center only
    SingleRay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HitType {
    #[default]
    None,
    Obstacle,
}

/// Result of a hit query. Reuse one instance across queries; every query
/// resets it before writing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HitPrediction {
    pub kind: HitType,
    pub obstacle_bounds: Option<Rect>,
    /// Index into the obstacle slice the query was given
    pub collider_index: Option<usize>,
    pub collider_id: Option<ColliderId>,
    pub intersection: Option<Point>,
    /// The obstacle edge that was struck
    pub edge: Option<Segment>,
    /// Safe point just short of the impact, on the ray that hit first
    pub last_known_good: Point,
    /// Distance the mover can travel along the angle before stopping safely
    pub last_known_good_distance: f32,
    pub visibility: f32,
}

impl HitPrediction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_hit(&self) -> bool {
        self.kind == HitType::Obstacle
    }

    /// Mover rectangle advanced to the last-known-good distance
    pub fn safe_bounds(&self, mover: &Rect, angle: Angle) -> Rect {
        if self.last_known_good_distance.is_finite() {
            mover.offset_by(angle, self.last_known_good_distance)
        } else {
            *mover
        }
    }
}

/// Caller-owned scratch space for ray construction.
///
/// Keep one per thread; a buffer is never shared between concurrent queries.
#[derive(Debug, Default)]
pub struct RayBuffer {
    rays: Vec<Segment>,
    hit_flags: Vec<bool>,
}

impl RayBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(rays: usize) -> Self {
        RayBuffer {
            rays: Vec::with_capacity(rays),
            hit_flags: Vec::with_capacity(rays),
        }
    }

    /// Rays built by the most recent query
    pub fn rays(&self) -> &[Segment] {
        &self.rays
    }

    /// Build the rays for `mode`, all heading along the unit `direction`
    fn fill(&mut self, mover: &Rect, direction: (f32, f32), length: f32, mode: CastingMode, step: f32) {
        self.rays.clear();
        self.hit_flags.clear();
        let ray = |origin: Point| Segment::from_direction(origin, direction, length);

        match mode {
            CastingMode::SingleRay => {
                self.rays.push(ray(mover.center()));
            }
            CastingMode::Rough => {
                self.rays.extend(mover.corners().map(ray));
                self.rays.push(ray(mover.center()));
            }
            CastingMode::Precise => {
                self.rays.extend(mover.corners().map(ray));
                for edge in mover.edges() {
                    let edge_length = edge.length();
                    if edge_length <= step {
                        continue;
                    }
                    // Interpolate so samples on an axis-aligned edge stay exactly on it
                    let mut along = step;
                    while along < edge_length {
                        self.rays.push(ray(edge.start.lerp(&edge.end, along / edge_length)));
                        along += step;
                    }
                }
            }
        }

        self.hit_flags.resize(self.rays.len(), false);
    }
}

/// Ray-cast impact prediction and line-of-sight queries
#[derive(Debug, Clone, Default)]
pub struct HitDetector {
    config: HitConfig,
}

/// Inputs for a general-purpose hit query
#[derive(Debug, Clone, Copy)]
pub struct HitQuery<'a> {
    pub mover: Rect,
    pub obstacles: &'a [Rect],
    /// Optional owners of `obstacles`, index for index
    pub collider_ids: Option<&'a [ColliderId]>,
    pub angle: Angle,
    pub visibility: f32,
    pub mode: CastingMode,
}

impl<'a> HitQuery<'a> {
    pub fn new(mover: Rect, obstacles: &'a [Rect], angle: Angle, visibility: f32) -> Self {
        HitQuery {
            mover,
            obstacles,
            collider_ids: None,
            angle,
            visibility,
            mode: CastingMode::Precise,
        }
    }

    pub fn with_mode(mut self, mode: CastingMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_collider_ids(mut self, ids: &'a [ColliderId]) -> Self {
        self.collider_ids = Some(ids);
        self
    }
}

impl HitDetector {
    pub fn new(config: HitConfig) -> Self {
        HitDetector { config }
    }

    pub fn config(&self) -> &HitConfig {
        &self.config
    }

    /// Predict what the mover strikes first when travelling along the query angle.
    ///
    /// `diagnostics`, when given, receives every ray that intersected any obstacle edge.
    pub fn predict_hit(
        &self,
        query: &HitQuery<'_>,
        scratch: &mut RayBuffer,
        prediction: &mut HitPrediction,
        diagnostics: Option<&mut Vec<Segment>>,
    ) -> NavResult<()> {
        if let Some(ids) = query.collider_ids {
            if ids.len() != query.obstacles.len() {
                return Err(NavError::MismatchedColliders {
                    obstacles: query.obstacles.len(),
                    colliders: ids.len(),
                });
            }
        }

        let candidates = query.obstacles.iter().copied().enumerate();
        self.cast(
            query.mover,
            query.angle.unit_vector(),
            query.visibility,
            query.mode,
            candidates,
            scratch,
            prediction,
            diagnostics,
        );

        if let (Some(ids), Some(index)) = (query.collider_ids, prediction.collider_index) {
            prediction.collider_id = Some(ids[index]);
        }
        Ok(())
    }

    /// Per-tick variant for live colliders: pairs that cannot mutually collide
    /// and the mover itself are skipped before any edge is tested.
    #[allow(clippy::too_many_arguments)]
    pub fn predict_collider_hit<C: Collider>(
        &self,
        mover: &dyn Collider,
        obstacles: &[C],
        angle: Angle,
        visibility: f32,
        mode: CastingMode,
        scratch: &mut RayBuffer,
        prediction: &mut HitPrediction,
    ) {
        let mover_id = mover.id();
        let candidates = obstacles
            .iter()
            .enumerate()
            .filter(|(_, obstacle)| obstacle.id() != mover_id && can_collide(mover, *obstacle))
            .map(|(i, obstacle)| (i, obstacle.bounds()));

        self.cast(
            mover.bounds(),
            angle.unit_vector(),
            visibility,
            mode,
            candidates,
            scratch,
            prediction,
            None,
        );

        if let Some(index) = prediction.collider_index {
            prediction.collider_id = Some(obstacles[index].id());
        }
    }

    /// True when nothing in `obstacles` blocks a precise cast from `from` to `to`
    pub fn has_line_of_sight(
        &self,
        from: &Rect,
        to: &Rect,
        obstacles: &[Rect],
        scratch: &mut RayBuffer,
    ) -> bool {
        self.first_blocker(from, to, obstacles, scratch).is_none()
    }

    /// Index of the obstacle that blocks the view from `from` to `to`, if any
    pub fn first_blocker(
        &self,
        from: &Rect,
        to: &Rect,
        obstacles: &[Rect],
        scratch: &mut RayBuffer,
    ) -> Option<usize> {
        self.sight_blocker(from, to, obstacles.iter().copied(), scratch)
    }

    /// Collider form of [`first_blocker`](Self::first_blocker)
    pub fn first_blocking_collider<'c, C: Collider>(
        &self,
        from: &Rect,
        to: &Rect,
        colliders: &'c [C],
        scratch: &mut RayBuffer,
    ) -> Option<&'c C> {
        let bounds = colliders.iter().map(|c| c.bounds());
        self.sight_blocker(from, to, bounds, scratch)
            .map(|index| &colliders[index])
    }

    /// The target is cast against as one more obstacle, appended after
    /// `obstacles`; landing on it means the view is clear. Rays follow the
    /// exact center-to-center direction.
    fn sight_blocker<I>(&self, from: &Rect, to: &Rect, obstacles: I, scratch: &mut RayBuffer) -> Option<usize>
    where
        I: Iterator<Item = Rect> + Clone,
    {
        let from_center = from.center();
        let to_center = to.center();
        let direction = from_center.direction_to(&to_center)?;
        let visibility = from_center.distance_to(&to_center) * self.config.line_of_sight_factor;

        let target_index = obstacles.clone().count();
        let candidates = obstacles.chain(iter::once(*to)).enumerate();

        let mut prediction = HitPrediction::new();
        self.cast(
            *from,
            direction,
            visibility,
            CastingMode::Precise,
            candidates,
            scratch,
            &mut prediction,
            None,
        );

        prediction
            .collider_index
            .filter(|&index| index < target_index)
    }

    /// Shared ray construction and closest-hit selection for every query form
    #[allow(clippy::too_many_arguments)]
    fn cast<I>(
        &self,
        mover: Rect,
        direction: (f32, f32),
        visibility: f32,
        mode: CastingMode,
        candidates: I,
        scratch: &mut RayBuffer,
        prediction: &mut HitPrediction,
        diagnostics: Option<&mut Vec<Segment>>,
    ) where
        I: Iterator<Item = (usize, Rect)> + Clone,
    {
        prediction.reset();
        prediction.visibility = visibility;
        prediction.last_known_good = mover.top_left();
        prediction.last_known_good_distance = visibility;

        if visibility.is_nan() || visibility <= 0.0 {
            prediction.last_known_good_distance = 0.0;
            return;
        }

        let unbounded = visibility.is_infinite();
        let ray_length = if unbounded {
            // Long enough to cross every candidate, finite so the math stays finite
            let reach = candidates
                .clone()
                .map(|(_, rect)| reach_between(&mover, &rect))
                .fold(0.0_f32, f32::max);
            if reach <= 0.0 {
                return;
            }
            reach + 1.0
        } else {
            visibility
        };

        scratch.fill(&mover, direction, ray_length, mode, self.config.precise_sample_step);

        let mut closest: Option<(f32, usize, Rect, Point, Segment, Point)> = None;

        for (index, obstacle) in candidates {
            if !unbounded && mover.distance_to(&obstacle) > visibility {
                continue;
            }
            for edge in obstacle.edges() {
                for (ray_index, ray) in scratch.rays.iter().enumerate() {
                    let Some(point) = ray.intersection(&edge) else {
                        continue;
                    };
                    scratch.hit_flags[ray_index] = true;
                    let distance = ray.start.distance_to(&point);
                    let closer = match &closest {
                        Some((best, ..)) => distance < *best,
                        None => true,
                    };
                    if closer {
                        closest = Some((distance, index, obstacle, point, edge, ray.start));
                    }
                }
            }
        }

        if let Some(out) = diagnostics {
            out.extend(
                scratch
                    .rays
                    .iter()
                    .zip(&scratch.hit_flags)
                    .filter(|(_, hit)| **hit)
                    .map(|(ray, _)| *ray),
            );
        }

        let Some((distance, index, obstacle, point, edge, origin)) = closest else {
            return;
        };

        let safe_distance = (distance - self.config.safety_margin).max(0.0);
        prediction.kind = HitType::Obstacle;
        prediction.obstacle_bounds = Some(obstacle);
        prediction.collider_index = Some(index);
        prediction.intersection = Some(point);
        prediction.edge = Some(edge);
        prediction.last_known_good = origin.advance(direction, safe_distance);
        prediction.last_known_good_distance = safe_distance;

        tracing::trace!(
            index,
            distance,
            safe_distance,
            "predicted hit"
        );
    }
}

/// Distance from any point of `a` to the far side of `b`
fn reach_between(a: &Rect, b: &Rect) -> f32 {
    let dx = (b.right() - a.left).abs().max((a.right() - b.left).abs());
    let dy = (b.bottom() - a.top).abs().max((a.bottom() - b.top).abs());
    (dx * dx + dy * dy).sqrt()
}
