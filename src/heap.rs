use crate::grid::Node;

/// Binary min-heap of node indices for the A* open set.
///
/// Ordered by ascending `f`, ties going to the lower `h`. Each queued node
/// records its slot in `heap_index` so cost decreases can re-sift in place.
#[derive(Debug, Default)]
pub struct OpenSet {
    items: Vec<usize>,
}

impl OpenSet {
    pub fn with_capacity(capacity: usize) -> Self {
        OpenSet {
            items: Vec::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the heap. Node `heap_index` fields are cleared by the grid reset.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn push(&mut self, nodes: &mut [Node], id: usize) {
        let slot = self.items.len();
        self.items.push(id);
        nodes[id].heap_index = Some(slot);
        self.sift_up(nodes, slot);
    }

    pub fn pop(&mut self, nodes: &mut [Node]) -> Option<usize> {
        let last = self.items.len().checked_sub(1)?;
        self.swap(nodes, 0, last);
        let top = self.items.pop()?;
        nodes[top].heap_index = None;
        if !self.items.is_empty() {
            self.sift_down(nodes, 0);
        }
        Some(top)
    }

    /// Restore order after a queued node's cost went down
    pub fn decrease(&mut self, nodes: &mut [Node], id: usize) {
        if let Some(slot) = nodes[id].heap_index {
            self.sift_up(nodes, slot);
        }
    }

    fn precedes(nodes: &[Node], a: usize, b: usize) -> bool {
        let (a, b) = (&nodes[a], &nodes[b]);
        a.f() < b.f() || (a.f() == b.f() && a.h < b.h)
    }

    fn swap(&mut self, nodes: &mut [Node], i: usize, j: usize) {
        self.items.swap(i, j);
        nodes[self.items[i]].heap_index = Some(i);
        nodes[self.items[j]].heap_index = Some(j);
    }

    fn sift_up(&mut self, nodes: &mut [Node], mut slot: usize) {
        while slot > 0 {
            let parent = (slot - 1) / 2;
            if !Self::precedes(nodes, self.items[slot], self.items[parent]) {
                break;
            }
            self.swap(nodes, slot, parent);
            slot = parent;
        }
    }

    fn sift_down(&mut self, nodes: &mut [Node], mut slot: usize) {
        let len = self.items.len();
        loop {
            let left = slot * 2 + 1;
            let right = left + 1;
            let mut best = slot;
            if left < len && Self::precedes(nodes, self.items[left], self.items[best]) {
                best = left;
            }
            if right < len && Self::precedes(nodes, self.items[right], self.items[best]) {
                best = right;
            }
            if best == slot {
                break;
            }
            self.swap(nodes, slot, best);
            slot = best;
        }
    }
}
