use crate::config::PathfinderConfig;
use crate::geometry::{Point, Rect};
use crate::grid::{Cell, NavGrid, Node, WorldBounds};
use crate::heap::OpenSet;
use crate::mover::UnitMover;
use crate::pool::Pool;

/// Grids pooled by (width, height)
pub type GridPool = Pool<(i32, i32), NavGrid>;
/// Open sets pooled by capacity
pub type HeapPool = Pool<usize, OpenSet>;

const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1), (0, -1), (1, -1),
    (-1, 0),           (1, 0),
    (-1, 1),  (0, 1),  (1, 1),
];

/// A* search over a walkability grid built from obstacle rectangles.
///
/// Grids and open sets are rented from pools owned by the pathfinder, so
/// repeated searches over the same world size allocate nothing. One
/// pathfinder per thread.
pub struct Pathfinder {
    config: PathfinderConfig,
    grids: GridPool,
    heaps: HeapPool,
}

impl Pathfinder {
    pub fn new(config: PathfinderConfig) -> Self {
        Pathfinder {
            config,
            grids: GridPool::new(),
            heaps: HeapPool::new(),
        }
    }

    pub fn config(&self) -> &PathfinderConfig {
        &self.config
    }

    pub fn grid_pool(&self) -> &GridPool {
        &self.grids
    }

    pub fn heap_pool(&self) -> &HeapPool {
        &self.heaps
    }

    /// Octile cost between two cells, vertical deltas weighted by `vertical_weight`
    pub fn cost(&self, a: Cell, b: Cell) -> u32 {
        let dx = (a.x - b.x).unsigned_abs();
        let dy = (a.y - b.y).unsigned_abs() * self.config.vertical_weight;
        self.config.diagonal_cost * dx.min(dy) + self.config.orthogonal_cost * dx.abs_diff(dy)
    }

    /// Plan for a unit mover toward a world point
    pub fn plan(
        &self,
        mover: &UnitMover,
        target: Point,
        world: WorldBounds,
        obstacles: &[Rect],
    ) -> Option<Vec<Cell>> {
        self.find_path(world, mover.cell(), Cell::containing(target.x, target.y), obstacles)
    }

    /// Find a path from `start` to `target`.
    ///
    /// The returned cells exclude `start` and end on `target`; an empty list
    /// means the two are the same cell. `None` when the target is blocked,
    /// either end is outside the world, or no route exists.
    pub fn find_path(
        &self,
        world: WorldBounds,
        start: Cell,
        target: Cell,
        obstacles: &[Rect],
    ) -> Option<Vec<Cell>> {
        if !world.contains(start) || !world.contains(target) {
            tracing::debug!(?start, ?target, ?world, "path endpoint outside world");
            return None;
        }

        let mut grid = self
            .grids
            .rent((world.width, world.height), || NavGrid::new(world.width, world.height));
        grid.reset(obstacles);

        let start_id = grid.get_id(start.x, start.y);
        let target_id = grid.get_id(target.x, target.y);

        if !grid.nodes[target_id].walkable {
            tracing::debug!(?target, "target cell is blocked");
            return None;
        }
        if start_id == target_id {
            return Some(Vec::new());
        }

        let capacity = world.area();
        let mut open = self.heaps.rent(capacity, || OpenSet::with_capacity(capacity));
        open.clear();

        let nodes = &mut grid.nodes;
        nodes[start_id].g = 0;
        nodes[start_id].h = self.cost(start, target);
        open.push(nodes, start_id);

        let mut expanded = 0usize;
        while let Some(current) = open.pop(nodes) {
            expanded += 1;
            nodes[current].closed = true;

            if current == target_id {
                let mut path = retrace(nodes, start_id, target_id);
                if self.config.compress_corners {
                    compress_corners(&mut path);
                }
                tracing::debug!(?start, ?target, expanded, waypoints = path.len(), "path found");
                return Some(path);
            }

            let here = nodes[current].cell();
            let current_g = nodes[current].g;

            for (dx, dy) in NEIGHBOR_OFFSETS {
                let next = Cell::new(here.x + dx, here.y + dy);
                if !world.contains(next) {
                    continue;
                }
                let id = (next.x + next.y * world.width) as usize;
                let node = &nodes[id];
                if !node.walkable || node.closed {
                    continue;
                }

                let tentative = current_g + self.cost(here, next);
                let queued = node.heap_index.is_some();
                if tentative < node.g || !queued {
                    let h = self.cost(next, target);
                    let node = &mut nodes[id];
                    node.g = tentative;
                    node.h = h;
                    node.parent = Some(current);
                    if queued {
                        open.decrease(nodes, id);
                    } else {
                        open.push(nodes, id);
                    }
                }
            }
        }

        tracing::debug!(?start, ?target, expanded, "no path");
        None
    }
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new(PathfinderConfig::default())
    }
}

/// Walk parent links back from the target; `start` itself is left out
fn retrace(nodes: &[Node], start_id: usize, target_id: usize) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut current = target_id;
    while current != start_id {
        path.push(nodes[current].cell());
        match nodes[current].parent {
            Some(parent) => current = parent,
            None => break,
        }
    }
    path.reverse();
    path
}

/// Drop interior waypoints that sit on a straight horizontal or vertical run.
///
/// Each point is judged against its neighbors in the uncompressed sequence,
/// so long runs collapse to their two ends.
pub fn compress_corners(path: &mut Vec<Cell>) {
    if path.len() < 3 {
        return;
    }
    let original = std::mem::take(path);
    path.push(original[0]);
    for window in original.windows(3) {
        let (prev, here, next) = (window[0], window[1], window[2]);
        let vertical_run = prev.x == here.x && here.x == next.x;
        let horizontal_run = prev.y == here.y && here.y == next.y;
        if !(vertical_run || horizontal_run) {
            path.push(here);
        }
    }
    path.push(original[original.len() - 1]);
}

/// Format path for display
pub fn format_path(path: &[Cell]) -> String {
    if path.is_empty() {
        return "No path".to_string();
    }

    let mut result = String::new();
    for (i, cell) in path.iter().enumerate() {
        if i > 0 {
            result.push_str(" -> ");
        }
        result.push_str(&format!("({},{})", cell.x, cell.y));
    }
    result
}
