use crate::config::LoggingConfig;
use crate::error::NavResult;
use crate::geometry::Point;
use crate::grid::Cell;
use crate::hit::HitPrediction;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Navigation events worth keeping for later analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum NavEvent {
    /// A route was planned from `from` to `to`
    PathPlanned { from: Cell, to: Cell, waypoints: usize },
    /// Planning failed; the caller decides the fallback
    PathNotFound { from: Cell, to: Cell },
    /// Line-of-sight pruning skipped ahead
    PathPruned { dropped: usize, remaining: usize },
    /// The follower snapped onto waypoint `index`
    WaypointReached { index: usize, position: Point },
    Arrived { position: Point },
    /// The mover stopped being alive mid-route
    Cancelled { position: Point },
    /// `distance` is how far the mover may still travel safely
    HitPredicted { intersection: Point, distance: f32 },
}

/// Logged event with timestamp
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEvent {
    /// Milliseconds since the log was created
    pub timestamp_ms: u64,
    pub event: NavEvent,
}

/// In-memory navigation event recorder
pub struct EventLog {
    start_time: Instant,
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        EventLog {
            start_time: Instant::now(),
            events: Vec::new(),
        }
    }

    /// A log when `config` enables one, otherwise `None`
    pub fn from_config(config: &LoggingConfig) -> Option<Self> {
        config.enable_event_log.then(Self::new)
    }

    /// Record an event with the current timestamp
    pub fn record(&mut self, event: NavEvent) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.events.push(LoggedEvent { timestamp_ms, event });
    }

    /// Record `prediction` if it found something; misses are not logged
    pub fn record_hit(&mut self, prediction: &HitPrediction) {
        if let (true, Some(intersection)) = (prediction.is_hit(), prediction.intersection) {
            self.record(NavEvent::HitPredicted {
                intersection,
                distance: prediction.last_known_good_distance,
            });
        }
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn to_json(&self) -> NavResult<String> {
        Ok(serde_json::to_string_pretty(&self.events)?)
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> NavResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Write to `config.event_log_path`
    pub fn save_configured(&self, config: &LoggingConfig) -> NavResult<()> {
        self.save_to_file(&config.event_log_path)?;
        tracing::debug!(path = %config.event_log_path, events = self.events.len(), "saved event log");
        Ok(())
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut planned = 0;
        let mut failed = 0;
        let mut prunes = 0;
        let mut pruned_waypoints = 0;
        let mut waypoints_reached = 0;
        let mut arrivals = 0;
        let mut cancellations = 0;
        let mut hits = 0;

        for logged in &self.events {
            match &logged.event {
                NavEvent::PathPlanned { .. } => planned += 1,
                NavEvent::PathNotFound { .. } => failed += 1,
                NavEvent::PathPruned { dropped, .. } => {
                    prunes += 1;
                    pruned_waypoints += dropped;
                }
                NavEvent::WaypointReached { .. } => waypoints_reached += 1,
                NavEvent::Arrived { .. } => arrivals += 1,
                NavEvent::Cancelled { .. } => cancellations += 1,
                NavEvent::HitPredicted { .. } => hits += 1,
            }
        }

        let duration = self.events.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Duration: {}ms\n\
             Total Events: {}\n\
             Planning: {} planned, {} failed\n\
             Pruning: {} prunes ({} waypoints skipped)\n\
             Movement: {} waypoints reached, {} arrivals, {} cancelled\n\
             Hits predicted: {}",
            duration,
            self.events.len(),
            planned,
            failed,
            prunes,
            pruned_waypoints,
            waypoints_reached,
            arrivals,
            cancellations,
            hits
        )
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new()
    }
}
