use crate::error::{NavError, NavResult};
use crate::geometry::{Angle, Point, Rect};
use crate::grid::Cell;

/// Something the navigation code can steer. Owned by the caller; this crate
/// only reads and writes its position and heading.
pub trait Mover {
    fn bounds(&self) -> Rect;

    /// Move the top-left corner to (left, top)
    fn move_to(&mut self, left: f32, top: f32);

    fn velocity_angle(&self) -> Angle;

    fn set_velocity_angle(&mut self, angle: Angle);

    /// Checked once per executor tick; returning false cancels the movement
    fn is_alive(&self) -> bool {
        true
    }
}

/// Bounds of a mover that fits inside a single grid cell.
///
/// Grid planning only handles these; build one with [`UnitMover::new`] to
/// reject larger movers before any search starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitMover {
    bounds: Rect,
}

impl UnitMover {
    pub fn new(bounds: Rect) -> NavResult<Self> {
        if bounds.width > 1.0 || bounds.height > 1.0 || !(bounds.width > 0.0 && bounds.height > 0.0) {
            return Err(NavError::MoverTooLarge {
                width: bounds.width,
                height: bounds.height,
            });
        }
        Ok(UnitMover { bounds })
    }

    pub fn of(mover: &impl Mover) -> NavResult<Self> {
        Self::new(mover.bounds())
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Grid cell holding the mover's top-left corner
    pub fn cell(&self) -> Cell {
        Cell::containing(self.bounds.left, self.bounds.top)
    }
}

/// Plain mover with a rectangle, heading and speed
#[derive(Clone, Debug)]
pub struct Agent {
    pub bounds: Rect,
    pub angle: Angle,
    /// Units per second
    pub speed: f32,
    pub alive: bool,
}

impl Agent {
    pub fn new(left: f32, top: f32, width: f32, height: f32, speed: f32) -> Self {
        Agent {
            bounds: Rect::new(left, top, width, height),
            angle: Angle::default(),
            speed,
            alive: true,
        }
    }

    pub fn position(&self) -> Point {
        self.bounds.top_left()
    }
}

impl Mover for Agent {
    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn move_to(&mut self, left: f32, top: f32) {
        self.bounds = self.bounds.moved_to(left, top);
    }

    fn velocity_angle(&self) -> Angle {
        self.angle
    }

    fn set_velocity_angle(&mut self, angle: Angle) {
        self.angle = angle;
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
