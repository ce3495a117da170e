use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Identity of a collider, used to skip self-pairs during hit prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// Anything that occupies a rectangle and takes part in collision queries.
///
/// Supplied by the hosting engine; this crate only reads it.
pub trait Collider {
    fn id(&self) -> ColliderId;

    fn bounds(&self) -> Rect;

    /// Group bits other colliders filter against
    fn collision_group(&self) -> u32 {
        1
    }

    /// One-sided eligibility. Use [`can_collide`] for the mutual check.
    fn can_collide_with(&self, other: &dyn Collider) -> bool;
}

/// Mutual collision eligibility: both sides must agree
pub fn can_collide(a: &dyn Collider, b: &dyn Collider) -> bool {
    a.can_collide_with(b) && b.can_collide_with(a)
}

/// Static rectangular obstacle with group/mask filtering.
///
/// Collides with anything whose group intersects its mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ColliderId,
    pub bounds: Rect,
    #[serde(default = "default_group")]
    pub group: u32,
    #[serde(default = "default_mask")]
    pub mask: u32,
}

fn default_group() -> u32 { 1 }
fn default_mask() -> u32 { u32::MAX }

impl Obstacle {
    pub fn new(id: u32, bounds: Rect) -> Self {
        Obstacle {
            id: ColliderId(id),
            bounds,
            group: default_group(),
            mask: default_mask(),
        }
    }

    pub fn with_filter(mut self, group: u32, mask: u32) -> Self {
        self.group = group;
        self.mask = mask;
        self
    }
}

impl Collider for Obstacle {
    fn id(&self) -> ColliderId {
        self.id
    }

    fn bounds(&self) -> Rect {
        self.bounds
    }

    fn collision_group(&self) -> u32 {
        self.group
    }

    fn can_collide_with(&self, other: &dyn Collider) -> bool {
        self.mask & other.collision_group() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_obstacles_collide() {
        let a = Obstacle::new(1, Rect::cell(0, 0));
        let b = Obstacle::new(2, Rect::cell(1, 0));
        assert!(can_collide(&a, &b));
    }

    #[test]
    fn test_mask_must_agree_both_ways() {
        let ghost = Obstacle::new(1, Rect::cell(0, 0)).with_filter(0b10, 0b10);
        let wall = Obstacle::new(2, Rect::cell(1, 0));
        // wall accepts everything, ghost only accepts group 0b10
        assert!(wall.can_collide_with(&ghost));
        assert!(!ghost.can_collide_with(&wall));
        assert!(!can_collide(&ghost, &wall));
    }
}
