use crate::geometry::Point;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavError {
    /// The executor could not plan a route for its movement request
    #[error("no path from ({:.2}, {:.2}) to ({:.2}, {:.2})", .from.x, .from.y, .to.x, .to.y)]
    NoPath { from: Point, to: Point },

    /// Grid planning only supports movers that fit in a single cell
    #[error("mover of size {width}x{height} does not fit in one grid cell")]
    MoverTooLarge { width: f32, height: f32 },

    #[error("obstacle and collider lists differ in length ({obstacles} vs {colliders})")]
    MismatchedColliders { obstacles: usize, colliders: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to serialize event log: {0}")]
    EventLog(#[from] serde_json::Error),
}

pub type NavResult<T> = Result<T, NavError>;
