//! Reusable buffers for neighbourhood search and per-cell evaluation.
//!
//! ## Purpose
//!
//! Grid evaluation queries the sample set once per cell. The buffers here are
//! allocated once per evaluation run (or per worker thread) and logically
//! cleared between cells so the hot loop does not allocate.
//!
//! ## Key concepts
//!
//! * **Slot**: A vector that keeps its capacity across `clear()` calls.
//! * **NeighborhoodSearchBuffer**: Max-heap and traversal stack for the KD-tree.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared, never shrunk.
//!
//! ## Non-goals
//!
//! * Thread-local caching; buffers are passed explicitly, one per worker.

// External dependencies
use core::ops::{Deref, DerefMut};
use std::collections::BinaryHeap;

// ============================================================================
// Slot - Reusable Vector
// ============================================================================

/// A reusable vector slot with automatic capacity management.
#[derive(Debug, Clone)]
pub struct Slot<T>(Vec<T>);

impl<T> Slot<T> {
    /// Create a new slot with the given initial capacity.
    #[inline]
    pub fn new(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Ensure the slot has at least the given capacity; never shrinks.
    #[inline]
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if self.0.capacity() < capacity {
            self.0.reserve(capacity - self.0.len());
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Deref for Slot<T> {
    type Target = Vec<T>;
    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Slot<T> {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

// ============================================================================
// Neighborhood Search Buffer
// ============================================================================

/// Heap and traversal stack reused across KD-tree queries.
#[derive(Debug, Clone)]
pub struct NeighborhoodSearchBuffer<N> {
    pub(crate) heap: BinaryHeap<N>,
    pub(crate) stack: Vec<usize>,
}

impl<N: Ord> NeighborhoodSearchBuffer<N> {
    /// Create a new search buffer for `k` neighbours.
    pub fn new(k: usize) -> Self {
        // Stack depth is bounded by tree height.
        Self {
            heap: BinaryHeap::with_capacity(k),
            stack: Vec::with_capacity(32),
        }
    }

    /// Clear all internal buffers for reuse.
    pub fn clear(&mut self) {
        self.heap.clear();
        self.stack.clear();
    }
}
