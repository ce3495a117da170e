pub mod collider;
pub mod config;
pub mod error;
pub mod event_log;
pub mod executor;
pub mod geometry;
pub mod grid;
pub mod heap;
pub mod hit;
pub mod mover;
pub mod navigation;
pub mod pathfinding;
pub mod pool;

pub use collider::{can_collide, Collider, ColliderId, Obstacle};
pub use config::Config;
pub use error::{NavError, NavResult};
pub use event_log::{EventLog, NavEvent};
pub use executor::{ExecutorState, PathExecutor};
pub use geometry::{Angle, Point, Rect, Segment};
pub use grid::{Cell, WorldBounds};
pub use hit::{CastingMode, HitDetector, HitPrediction, HitQuery, HitType, RayBuffer};
pub use mover::{Agent, Mover, UnitMover};
pub use navigation::NavigationPath;
pub use pathfinding::Pathfinder;
