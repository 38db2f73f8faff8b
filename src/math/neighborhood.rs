//! KD-tree for k-nearest sample search in the plane.
//!
//! ## Purpose
//!
//! Nearest-neighbour interpolation, the IDW neighbour cap and the hull
//! fallback of the piecewise methods all ask for "the k samples closest to
//! this cell". The KD-tree answers that in roughly O(log n) per query.
//!
//! ## Design notes
//!
//! * **Static Construction**: Built once per fitted surface, then queried.
//! * **Eytzinger Layout**: Nodes live in a left-complete binary tree stored in
//!   an array; children of node `i` are `2i + 1` and `2i + 2`.
//! * **Deterministic ties**: Candidates are ordered by `(distance², index)`,
//!   so equidistant samples resolve to the one that came first in the input.
//!
//! ## Invariants
//!
//! * Queries return the exact k smallest `(distance², index)` pairs.
//! * Results are sorted nearest first.
//!
//! ## Non-goals
//!
//! * Dynamic insertion or deletion.
//! * Approximate search.

// External dependencies
use core::cmp::Ordering::{self, Equal};

// Internal dependencies
use crate::primitives::buffer::NeighborhoodSearchBuffer;
use crate::primitives::sample::Coord;

// ============================================================================
// Helper Types
// ============================================================================

/// Heap entry: sample index and squared distance.
///
/// Ordered by distance, then by index, so a max-heap evicts the farthest and,
/// among equals, the latest sample.
#[derive(Debug, Clone, Copy)]
pub struct NodeDistance(pub usize, pub f64);

impl PartialEq for NodeDistance {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Equal
    }
}
impl Eq for NodeDistance {}

impl PartialOrd for NodeDistance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for NodeDistance {
    fn cmp(&self, other: &Self) -> Ordering {
        self.1
            .partial_cmp(&other.1)
            .unwrap_or(Equal)
            .then(self.0.cmp(&other.0))
    }
}

// ============================================================================
// Neighborhood Structure
// ============================================================================

/// Result container for a k-nearest query, sorted nearest first.
#[derive(Debug, Clone, Default)]
pub struct Neighborhood {
    /// Sample indices.
    pub indices: Vec<usize>,
    /// Euclidean distances, aligned with `indices`.
    pub distances: Vec<f64>,
}

impl Neighborhood {
    /// Pre-allocate buffers for `k` neighbours.
    pub fn with_capacity(k: usize) -> Self {
        Self {
            indices: Vec::with_capacity(k),
            distances: Vec::with_capacity(k),
        }
    }

    /// Number of neighbours stored.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

// ============================================================================
// KD-Tree Implementation
// ============================================================================

/// KD-tree over planar sample locations.
#[derive(Debug, Clone)]
pub struct KdTree {
    /// Original sample index per Eytzinger node.
    nodes: Vec<usize>,
    /// Node coordinates, aligned with `nodes`.
    points: Vec<Coord>,
}

impl KdTree {
    /// Build a tree over `(xs[i], ys[i])`.
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        let n = xs.len();
        let coords: Vec<Coord> = xs
            .iter()
            .zip(ys.iter())
            .map(|(&x, &y)| Coord::new(x, y))
            .collect();
        let mut indices: Vec<usize> = (0..n).collect();
        let mut nodes = vec![0usize; n];
        let mut points = vec![Coord::default(); n];

        Self::build_recursive(&coords, &mut indices, 0, &mut nodes, &mut points, 0);

        Self { nodes, points }
    }

    /// Number of indexed samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree indexes no samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Index of the sample nearest to `query`, ties broken by input order.
    pub fn nearest(&self, query: &Coord) -> Option<(usize, f64)> {
        let mut buffer = NeighborhoodSearchBuffer::new(1);
        let mut nbh = Neighborhood::with_capacity(1);
        self.find_k_nearest(query, 1, &mut buffer, &mut nbh);
        nbh.indices.first().map(|&i| (i, nbh.distances[0]))
    }

    /// Find the `k` nearest samples to `query`, writing them to `neighborhood`
    /// sorted nearest first.
    pub fn find_k_nearest(
        &self,
        query: &Coord,
        k: usize,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance>,
        neighborhood: &mut Neighborhood,
    ) {
        neighborhood.indices.clear();
        neighborhood.distances.clear();
        if k == 0 || self.nodes.is_empty() {
            return;
        }

        buffer.clear();
        self.search_iterative(query, k, buffer);

        let mut found: Vec<NodeDistance> = buffer.heap.drain().collect();
        found.sort_unstable();
        for NodeDistance(idx, d2) in found {
            neighborhood.indices.push(idx);
            neighborhood.distances.push(d2.sqrt());
        }
    }

    // ------------------------------------------------------------------------
    // Private Helpers & Algorithms
    // ------------------------------------------------------------------------

    fn build_recursive(
        coords: &[Coord],
        indices: &mut [usize],
        depth: usize,
        nodes: &mut [usize],
        points: &mut [Coord],
        curr: usize,
    ) {
        if indices.is_empty() {
            return;
        }

        let axis = depth % 2;
        let median = Self::calculate_left_subtree_size(indices.len());
        indices.select_nth_unstable_by(median, |&a, &b| {
            axis_value(&coords[a], axis)
                .partial_cmp(&axis_value(&coords[b], axis))
                .unwrap_or(Equal)
        });

        let idx = indices[median];
        nodes[curr] = idx;
        points[curr] = coords[idx];

        let (left, right_with_median) = indices.split_at_mut(median);
        let right = &mut right_with_median[1..];
        Self::build_recursive(coords, left, depth + 1, nodes, points, 2 * curr + 1);
        Self::build_recursive(coords, right, depth + 1, nodes, points, 2 * curr + 2);
    }

    /// Iterative traversal; stack entries pack `(node << 1) | axis`.
    fn search_iterative(
        &self,
        query: &Coord,
        k: usize,
        buffer: &mut NeighborhoodSearchBuffer<NodeDistance>,
    ) {
        let heap = &mut buffer.heap;
        let stack = &mut buffer.stack;
        let len = self.nodes.len();

        stack.push(0);
        while let Some(packed) = stack.pop() {
            let axis = packed & 1;
            let node = packed >> 1;
            let p = &self.points[node];

            let candidate = NodeDistance(self.nodes[node], squared(query, p));
            if heap.len() < k {
                heap.push(candidate);
            } else if let Some(mut top) = heap.peek_mut() {
                if candidate < *top {
                    *top = candidate;
                }
            }

            let left = 2 * node + 1;
            if left >= len {
                continue;
            }
            let right = left + 1;
            let next_axis = axis ^ 1;

            let diff = axis_value(query, axis) - axis_value(p, axis);
            let (near, far) = if diff <= 0.0 {
                (Some(left), (right < len).then_some(right))
            } else {
                ((right < len).then_some(right), Some(left))
            };

            if let Some(far) = far {
                // Equal distances must still be visited so lower indices win ties.
                let plane = diff * diff;
                let worst = if heap.len() < k {
                    f64::INFINITY
                } else {
                    heap.peek().map_or(f64::INFINITY, |nd| nd.1)
                };
                if plane <= worst {
                    stack.push((far << 1) | next_axis);
                }
            }
            if let Some(near) = near {
                stack.push((near << 1) | next_axis);
            }
        }
    }

    /// Number of nodes in the left subtree of a left-complete tree of size `n`.
    pub fn calculate_left_subtree_size(n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        let h = (usize::BITS - n.leading_zeros() - 1) as usize;
        let last_level_capacity = 1usize << h;
        let above = last_level_capacity - 1;
        let r = n - above;
        let left_leaves = r.min(last_level_capacity / 2);
        (last_level_capacity / 2 - 1) + left_leaves
    }
}

#[inline]
fn axis_value(c: &Coord, axis: usize) -> f64 {
    if axis == 0 { c.x } else { c.y }
}

#[inline]
fn squared(a: &Coord, b: &Coord) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
