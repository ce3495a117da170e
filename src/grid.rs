use crate::geometry::Rect;
use serde::{Deserialize, Serialize};

/// Integer world size used to dimension the planning grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: i32,
    pub height: i32,
}

impl WorldBounds {
    pub fn new(width: i32, height: i32) -> Self {
        WorldBounds { width, height }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    pub fn area(&self) -> usize {
        (self.width.max(0) as usize) * (self.height.max(0) as usize)
    }
}

/// A grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// Cell containing the world point (x, y)
    pub fn containing(x: f32, y: f32) -> Self {
        Cell::new(x.floor() as i32, y.floor() as i32)
    }

    pub fn bounds(&self) -> Rect {
        Rect::cell(self.x, self.y)
    }
}

/// Per-cell search state. Reset between searches, never reallocated.
#[derive(Debug, Clone)]
pub struct Node {
    pub x: i32,
    pub y: i32,
    pub walkable: bool,
    pub g: u32,
    pub h: u32,
    /// Index of the previous node on the best known path
    pub parent: Option<usize>,
    /// Position in the open set, `None` when not queued
    pub heap_index: Option<usize>,
    pub closed: bool,
}

impl Node {
    fn new(x: i32, y: i32) -> Self {
        Node {
            x,
            y,
            walkable: true,
            g: 0,
            h: 0,
            parent: None,
            heap_index: None,
            closed: false,
        }
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.x, self.y)
    }

    fn clear(&mut self) {
        self.walkable = true;
        self.g = 0;
        self.h = 0;
        self.parent = None;
        self.heap_index = None;
        self.closed = false;
    }
}

/// Walkability grid over a flat node array
#[derive(Debug, Clone)]
pub struct NavGrid {
    pub width: i32,
    pub height: i32,
    pub nodes: Vec<Node>,
}

impl NavGrid {
    /// Create a grid with every cell walkable
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let mut nodes = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                nodes.push(Node::new(x, y));
            }
        }
        NavGrid { width, height, nodes }
    }

    pub fn bounds(&self) -> WorldBounds {
        WorldBounds::new(self.width, self.height)
    }

    /// Clear search state and re-mark obstacles for a new query
    pub fn reset(&mut self, obstacles: &[Rect]) {
        for node in &mut self.nodes {
            node.clear();
        }
        for obstacle in obstacles {
            self.block_rect(obstacle);
        }
    }

    /// Mark every cell the rectangle overlaps as unwalkable
    pub fn block_rect(&mut self, rect: &Rect) {
        if !(rect.width > 0.0 && rect.height > 0.0) {
            return;
        }
        let min_x = (rect.left.floor() as i32).max(0);
        let min_y = (rect.top.floor() as i32).max(0);
        let max_x = (rect.right().ceil() as i32).min(self.width);
        let max_y = (rect.bottom().ceil() as i32).min(self.height);

        for y in min_y..max_y {
            for x in min_x..max_x {
                let id = self.get_id(x, y);
                self.nodes[id].walkable = false;
            }
        }
    }

    /// Convert (x, y) coordinates to a node index
    pub fn get_id(&self, x: i32, y: i32) -> usize {
        (x + y * self.width) as usize
    }

    /// Node index for a cell, `None` when out of bounds
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if self.bounds().contains(cell) {
            Some(self.get_id(cell.x, cell.y))
        } else {
            None
        }
    }

    /// Out of bounds is considered blocked
    pub fn is_walkable(&self, cell: Cell) -> bool {
        self.index_of(cell)
            .map(|id| self.nodes[id].walkable)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_rect_covers_overlapped_cells() {
        let mut grid = NavGrid::new(10, 10);
        grid.reset(&[Rect::new(2.5, 1.0, 1.0, 1.0)]);

        assert!(!grid.is_walkable(Cell::new(2, 1)));
        assert!(!grid.is_walkable(Cell::new(3, 1)));
        assert!(grid.is_walkable(Cell::new(4, 1)));
        assert!(grid.is_walkable(Cell::new(2, 2)));
    }

    #[test]
    fn test_reset_clears_previous_obstacles() {
        let mut grid = NavGrid::new(5, 5);
        grid.reset(&[Rect::cell(1, 1)]);
        grid.nodes[0].g = 42;
        grid.nodes[0].closed = true;

        grid.reset(&[Rect::cell(3, 3)]);

        assert!(grid.is_walkable(Cell::new(1, 1)));
        assert!(!grid.is_walkable(Cell::new(3, 3)));
        assert_eq!(grid.nodes[0].g, 0);
        assert!(!grid.nodes[0].closed);
    }

    #[test]
    fn test_obstacles_clipped_to_grid() {
        let mut grid = NavGrid::new(4, 4);
        grid.reset(&[Rect::new(-3.0, -3.0, 4.0, 20.0)]);
        assert!(!grid.is_walkable(Cell::new(0, 3)));
        assert!(grid.is_walkable(Cell::new(1, 0)));
        assert!(!grid.is_walkable(Cell::new(-1, 0)));
    }
}
