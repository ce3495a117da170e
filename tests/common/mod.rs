#![allow(dead_code)]

use rectpath::config::PathfinderConfig;
use rectpath::{Cell, Pathfinder, Rect, WorldBounds};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pathfinding scenario as stored under `test_data/`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathScenario {
    #[serde(rename = "testName")]
    pub test_name: String,
    #[serde(rename = "gridRows")]
    pub grid_rows: i32,
    #[serde(rename = "gridCols")]
    pub grid_cols: i32,
    #[serde(rename = "blockedCells")]
    pub blocked_cells: Vec<i32>,
    #[serde(rename = "startX")]
    pub start_x: i32,
    #[serde(rename = "startY")]
    pub start_y: i32,
    #[serde(rename = "destX")]
    pub dest_x: i32,
    #[serde(rename = "destY")]
    pub dest_y: i32,
    #[serde(rename = "expectReachable")]
    pub expect_reachable: bool,
}

impl PathScenario {
    pub fn world(&self) -> WorldBounds {
        WorldBounds::new(self.grid_cols, self.grid_rows)
    }

    pub fn start(&self) -> Cell {
        Cell::new(self.start_x, self.start_y)
    }

    pub fn dest(&self) -> Cell {
        Cell::new(self.dest_x, self.dest_y)
    }

    pub fn obstacles(&self) -> Vec<Rect> {
        self.blocked_cells
            .iter()
            .map(|&id| {
                let (x, y) = cell_id_to_coords(id, self.grid_cols);
                Rect::cell(x, y)
            })
            .collect()
    }

    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.blocked_cells
            .contains(&coords_to_cell_id(cell.x, cell.y, self.grid_cols))
    }
}

/// Load a scenario from JSON file
pub fn load_scenario(path: &Path) -> Result<PathScenario, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    let scenario: PathScenario = serde_json::from_str(&contents)?;
    Ok(scenario)
}

pub fn cell_id_to_coords(cell_id: i32, cols: i32) -> (i32, i32) {
    (cell_id % cols, cell_id / cols)
}

pub fn coords_to_cell_id(x: i32, y: i32, cols: i32) -> i32 {
    x + y * cols
}

/// Parse an ASCII map.
///
/// - `■`: blocked cell
/// - `□`: free cell
/// - `s`: start
/// - `d`: destination
pub fn parse_map(map: &str) -> Result<PathScenario, Box<dyn std::error::Error>> {
    let lines: Vec<&str> = map
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.is_empty() {
        return Err("map has no rows".into());
    }

    let grid_cols = lines[0].chars().count() as i32;
    let mut scenario = PathScenario {
        test_name: "ascii".to_string(),
        grid_rows: lines.len() as i32,
        grid_cols,
        blocked_cells: Vec::new(),
        start_x: -1,
        start_y: -1,
        dest_x: -1,
        dest_y: -1,
        expect_reachable: true,
    };

    for (y, line) in lines.iter().enumerate() {
        if line.chars().count() as i32 != grid_cols {
            return Err(format!("row {} has the wrong width", y).into());
        }
        for (x, ch) in line.chars().enumerate() {
            let (x, y) = (x as i32, y as i32);
            match ch {
                '■' => scenario.blocked_cells.push(coords_to_cell_id(x, y, grid_cols)),
                's' => (scenario.start_x, scenario.start_y) = (x, y),
                'd' => (scenario.dest_x, scenario.dest_y) = (x, y),
                '□' => {}
                other => return Err(format!("unexpected map character '{}'", other).into()),
            }
        }
    }

    if scenario.start_x < 0 || scenario.dest_x < 0 {
        return Err("map needs both 's' and 'd'".into());
    }
    Ok(scenario)
}

fn flip(scenario: &PathScenario, horizontal: bool, vertical: bool, suffix: &str) -> PathScenario {
    let cols = scenario.grid_cols;
    let rows = scenario.grid_rows;
    let map = |x: i32, y: i32| {
        let nx = if horizontal { cols - 1 - x } else { x };
        let ny = if vertical { rows - 1 - y } else { y };
        (nx, ny)
    };

    let (start_x, start_y) = map(scenario.start_x, scenario.start_y);
    let (dest_x, dest_y) = map(scenario.dest_x, scenario.dest_y);
    PathScenario {
        test_name: format!("{}_{}", scenario.test_name, suffix),
        blocked_cells: scenario
            .blocked_cells
            .iter()
            .map(|&id| {
                let (x, y) = cell_id_to_coords(id, cols);
                let (nx, ny) = map(x, y);
                coords_to_cell_id(nx, ny, cols)
            })
            .collect(),
        start_x,
        start_y,
        dest_x,
        dest_y,
        ..scenario.clone()
    }
}

/// Pathfinder that keeps every step, so adjacency can be checked
pub fn stepwise_pathfinder() -> Pathfinder {
    Pathfinder::new(PathfinderConfig {
        compress_corners: false,
        ..PathfinderConfig::default()
    })
}

/// Check one scenario; `Err` describes the first violated property
pub fn run_single_scenario(pathfinder: &Pathfinder, scenario: &PathScenario) -> Result<(), String> {
    let path = pathfinder.find_path(
        scenario.world(),
        scenario.start(),
        scenario.dest(),
        &scenario.obstacles(),
    );

    let Some(path) = path else {
        return if scenario.expect_reachable {
            Err("expected a path, found none".to_string())
        } else {
            Ok(())
        };
    };
    if !scenario.expect_reachable {
        return Err(format!("expected no path, found {} steps", path.len()));
    }

    if scenario.start() == scenario.dest() {
        return if path.is_empty() {
            Ok(())
        } else {
            Err("start equals destination but path is not empty".to_string())
        };
    }

    if path.last() != Some(&scenario.dest()) {
        return Err(format!("path ends at {:?}", path.last()));
    }

    let mut previous = scenario.start();
    for &cell in &path {
        if (cell.x - previous.x).abs() > 1 || (cell.y - previous.y).abs() > 1 {
            return Err(format!("step {:?} -> {:?} is not adjacent", previous, cell));
        }
        if scenario.is_blocked(cell) {
            return Err(format!("path enters blocked cell {:?}", cell));
        }
        previous = cell;
    }
    Ok(())
}

/// Run a scenario in all 4 orientations.
/// Returns the failing variant name and reason, if any.
pub fn run_scenario(pathfinder: &Pathfinder, scenario: &PathScenario) -> Result<(), (String, String)> {
    let variants = [
        ("original", scenario.clone()),
        ("h_flip", flip(scenario, true, false, "h_flip")),
        ("v_flip", flip(scenario, false, true, "v_flip")),
        ("hv_flip", flip(scenario, true, true, "hv_flip")),
    ];

    for (name, variant) in variants {
        run_single_scenario(pathfinder, &variant).map_err(|reason| (name.to_string(), reason))?;
    }
    Ok(())
}

/// Render a path over the map, for failure output
pub fn visualize_path(scenario: &PathScenario, path: &[Cell]) -> String {
    let mut result = String::new();
    for y in 0..scenario.grid_rows {
        for x in 0..scenario.grid_cols {
            let cell = Cell::new(x, y);
            let symbol = if cell == scenario.start() {
                'S'
            } else if cell == scenario.dest() {
                'D'
            } else if path.contains(&cell) {
                '*'
            } else if scenario.is_blocked(cell) {
                '█'
            } else {
                '.'
            };
            result.push(symbol);
        }
        result.push('\n');
    }
    result
}
