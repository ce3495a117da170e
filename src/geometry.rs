use serde::{Deserialize, Serialize};

/// Determinants smaller than this are treated as parallel lines
const PARALLEL_EPSILON: f32 = 1e-6;

/// A point in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Move this point `distance` units along `angle`
    pub fn offset(&self, angle: Angle, distance: f32) -> Point {
        self.advance(angle.unit_vector(), distance)
    }

    /// Move this point `distance` units along a unit `direction`
    pub fn advance(&self, direction: (f32, f32), distance: f32) -> Point {
        Point::new(self.x + direction.0 * distance, self.y + direction.1 * distance)
    }

    /// Unit vector pointing at `other`, `None` when the points coincide
    pub fn direction_to(&self, other: &Point) -> Option<(f32, f32)> {
        let length = self.distance_to(other);
        if !(length > 0.0) || !length.is_finite() {
            return None;
        }
        Some(((other.x - self.x) / length, (other.y - self.y) / length))
    }

    /// Point a `fraction` of the way from here to `other`
    pub fn lerp(&self, other: &Point, fraction: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * fraction,
            self.y + (other.y - self.y) * fraction,
        )
    }
}

/// Trig residue below this is rounding noise, e.g. cos(90°) in f32
const UNIT_EPSILON: f32 = 1e-6;

/// Angle in degrees, normalized to [0, 360).
/// 0 points along +x, 90 along +y (screen space, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Angle(f32);

impl Angle {
    pub const RIGHT: Angle = Angle(0.0);
    pub const DOWN: Angle = Angle(90.0);
    pub const LEFT: Angle = Angle(180.0);
    pub const UP: Angle = Angle(270.0);

    /// Create an angle from degrees. Non-finite input collapses to 0.
    pub fn from_degrees(degrees: f32) -> Self {
        if !degrees.is_finite() {
            return Angle(0.0);
        }
        let normalized = degrees.rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs
        if normalized >= 360.0 {
            Angle(0.0)
        } else {
            Angle(normalized)
        }
    }

    /// Angle of the vector pointing from `from` to `to`
    pub fn between(from: Point, to: Point) -> Self {
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        if dx == 0.0 && dy == 0.0 {
            return Angle(0.0);
        }
        Angle::from_degrees(dy.atan2(dx).to_degrees())
    }

    pub fn degrees(&self) -> f32 {
        self.0
    }

    pub fn radians(&self) -> f32 {
        self.0.to_radians()
    }

    /// (cos, sin) of this angle. Cardinal angles give exact axis vectors so
    /// vertical rays do not drift sideways.
    pub fn unit_vector(&self) -> (f32, f32) {
        let r = self.radians();
        let snap = |c: f32| if c.abs() < UNIT_EPSILON { 0.0 } else { c };
        (snap(r.cos()), snap(r.sin()))
    }
}

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Segment { start, end }
    }

    /// Segment starting at `origin` extending `length` units along `angle`
    pub fn from_ray(origin: Point, angle: Angle, length: f32) -> Self {
        Self::from_direction(origin, angle.unit_vector(), length)
    }

    /// Segment starting at `origin` extending `length` units along a unit `direction`
    pub fn from_direction(origin: Point, direction: (f32, f32), length: f32) -> Self {
        Segment::new(origin, origin.advance(direction, length))
    }

    pub fn length(&self) -> f32 {
        self.start.distance_to(&self.end)
    }

    /// Parametric intersection with another segment.
    ///
    /// Both parameters must fall strictly inside (0, 1): touching at an
    /// endpoint is not an intersection. Parallel, collinear and zero-length
    /// segments never intersect.
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        let rx = self.end.x - self.start.x;
        let ry = self.end.y - self.start.y;
        let sx = other.end.x - other.start.x;
        let sy = other.end.y - other.start.y;

        let denominator = rx * sy - ry * sx;
        if !denominator.is_finite() || denominator.abs() < PARALLEL_EPSILON {
            return None;
        }

        let qx = other.start.x - self.start.x;
        let qy = other.start.y - self.start.y;

        let t = (qx * sy - qy * sx) / denominator;
        let u = (qx * ry - qy * rx) / denominator;

        if t > 0.0 && t < 1.0 && u > 0.0 && u < 1.0 {
            Some(Point::new(self.start.x + t * rx, self.start.y + t * ry))
        } else {
            None
        }
    }
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Rect { left, top, width, height }
    }

    /// 1x1 rectangle covering grid cell (x, y)
    pub fn cell(x: i32, y: i32) -> Self {
        Rect::new(x as f32, y as f32, 1.0, 1.0)
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn center(&self) -> Point {
        Point::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Corners in order: top-left, top-right, bottom-right, bottom-left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }

    /// Edges in order: top, right, bottom, left
    pub fn edges(&self) -> [Segment; 4] {
        let [tl, tr, br, bl] = self.corners();
        [
            Segment::new(tl, tr),
            Segment::new(tr, br),
            Segment::new(br, bl),
            Segment::new(bl, tl),
        ]
    }

    pub fn moved_to(&self, left: f32, top: f32) -> Rect {
        Rect::new(left, top, self.width, self.height)
    }

    pub fn offset_by(&self, angle: Angle, distance: f32) -> Rect {
        let p = self.top_left().offset(angle, distance);
        self.moved_to(p.x, p.y)
    }

    /// Grow on every side by `pad`
    pub fn inflate(&self, pad: f32) -> Rect {
        Rect::new(
            self.left - pad,
            self.top - pad,
            self.width + pad * 2.0,
            self.height + pad * 2.0,
        )
    }

    /// Strict overlap; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left < other.right()
            && other.left < self.right()
            && self.top < other.bottom()
            && other.top < self.bottom()
    }

    /// Shortest gap between the two rectangles' edges, 0 when touching or overlapping
    pub fn distance_to(&self, other: &Rect) -> f32 {
        let gap_x = (other.left - self.right()).max(self.left - other.right()).max(0.0);
        let gap_y = (other.top - self.bottom()).max(self.top - other.bottom()).max(0.0);
        (gap_x * gap_x + gap_y * gap_y).sqrt()
    }
}
