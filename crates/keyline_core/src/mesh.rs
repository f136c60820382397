// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deformed mesh vertex storage for FFD keys.

use serde::{Deserialize, Serialize};

/// A single mesh vertex position.
pub type Vector3 = [f32; 3];

/// Resizable ordered buffer of mesh vertex positions.
///
/// Backs the deformed mesh of an FFD key. The logical count always
/// equals the backing storage length. Bulk [`write`](Self::write)
/// clamps to the allocated count so corrupt input cannot overrun the
/// buffer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshBuffer {
    positions: Vec<Vector3>,
}

impl MeshBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize the storage to exactly `count` elements.
    ///
    /// New elements are zeroed. No-op if the buffer already holds
    /// `count` elements. `count` must be positive.
    pub fn alloc(&mut self, count: usize) {
        debug_assert!(count > 0, "alloc with zero vertex count");
        if self.positions.len() != count {
            self.positions.resize(count, [0.0; 3]);
        }
    }

    /// Copy `src` into the buffer head.
    ///
    /// Callers must not pass more elements than are allocated; when
    /// they do anyway, the copy is clamped to the allocated count and
    /// the violation is logged.
    pub fn write(&mut self, src: &[Vector3]) {
        if src.len() > self.positions.len() {
            tracing::warn!(
                requested = src.len(),
                allocated = self.positions.len(),
                "mesh write clamped to allocated count"
            );
        }
        let count = src.len().min(self.positions.len());
        self.positions[..count].copy_from_slice(&src[..count]);
    }

    /// [`alloc`](Self::alloc) to the source length, then
    /// [`write`](Self::write) it.
    pub fn alloc_and_write(&mut self, src: &[Vector3]) {
        self.alloc(src.len());
        self.write(src);
    }

    /// Drop all vertices; the count becomes zero.
    pub fn clear(&mut self) {
        self.positions.clear();
    }

    /// Exchange the backing storage with `other` in O(1).
    ///
    /// The logical count becomes the other vector's prior length.
    pub fn swap(&mut self, other: &mut Vec<Vector3>) {
        std::mem::swap(&mut self.positions, other);
    }

    /// All vertex positions in order.
    pub fn positions(&self) -> &[Vector3] {
        &self.positions
    }

    /// Mutable access to the vertex positions.
    pub fn positions_mut(&mut self) -> &mut [Vector3] {
        &mut self.positions
    }

    /// Number of vertices held.
    pub fn count(&self) -> usize {
        self.positions.len()
    }

    /// True when no vertices are held.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Insert a vertex at `index` (`0 <= index <= count`).
    pub fn insert(&mut self, index: usize, pos: Vector3) {
        assert!(index <= self.positions.len(), "vertex insert out of range");
        self.positions.insert(index, pos);
    }

    /// Append a vertex.
    pub fn push_back(&mut self, pos: Vector3) {
        self.positions.push(pos);
    }

    /// Remove and return the vertex at `index`.
    pub fn remove_at(&mut self, index: usize) -> Vector3 {
        assert!(index < self.positions.len(), "vertex remove out of range");
        self.positions.remove(index)
    }

    /// Remove and return the last vertex. The buffer must be non-empty.
    pub fn pop_back(&mut self) -> Vector3 {
        self.positions.pop().expect("pop from empty vertex buffer")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_sets_count_and_storage() {
        let mut buffer = MeshBuffer::new();
        for n in [1usize, 3, 64] {
            buffer.alloc(n);
            assert_eq!(buffer.count(), n);
            assert_eq!(buffer.positions().len(), n);
        }
        // no-op when already sized
        buffer.push_back([1.0, 2.0, 3.0]);
        let count = buffer.count();
        buffer.alloc(count);
        assert_eq!(buffer.positions()[count - 1], [1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_write_clamps_to_allocated_count() {
        // A fail safe, not a hard error: the extra elements are dropped.
        let mut buffer = MeshBuffer::new();
        buffer.alloc(3);
        let src = [[1.0, 0.0, 0.0]; 8];
        buffer.write(&src);
        assert_eq!(buffer.count(), 3);
        assert_eq!(buffer.positions(), &src[..3]);
    }

    #[test]
    fn test_alloc_and_write_round_trip() {
        let src = vec![[0.0, 1.0, 2.0], [3.0, 4.0, 5.0]];
        let mut buffer = MeshBuffer::new();
        buffer.alloc_and_write(&src);
        assert_eq!(buffer.positions(), src.as_slice());

        buffer.clear();
        assert_eq!(buffer.count(), 0);
    }

    #[test]
    fn test_swap_transfers_ownership() {
        let mut buffer = MeshBuffer::new();
        buffer.alloc_and_write(&[[1.0; 3]]);

        let mut other = vec![[2.0; 3], [3.0; 3]];
        buffer.swap(&mut other);

        assert_eq!(buffer.count(), 2);
        assert_eq!(buffer.positions()[0], [2.0; 3]);
        assert_eq!(other, vec![[1.0; 3]]);
    }

    #[test]
    fn test_element_edits() {
        let mut buffer = MeshBuffer::new();
        buffer.push_back([0.0; 3]);
        buffer.push_back([2.0; 3]);
        buffer.insert(1, [1.0; 3]);
        assert_eq!(buffer.count(), 3);

        assert_eq!(buffer.remove_at(0), [0.0; 3]);
        assert_eq!(buffer.pop_back(), [2.0; 3]);
        assert_eq!(buffer.count(), 1);
        assert_eq!(buffer.positions()[0], [1.0; 3]);
    }
}
