// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node key storage.

use crate::key::{Key, KeyKind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All animation keys of one node, ordered by frame within each lane.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeLine {
    maps: IndexMap<KeyKind, BTreeMap<i32, Key>>,
}

impl TimeLine {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no lane holds a key.
    pub fn is_empty(&self) -> bool {
        self.maps.values().all(BTreeMap::is_empty)
    }

    /// Total key count across all lanes.
    pub fn key_count(&self) -> usize {
        self.maps.values().map(BTreeMap::len).sum()
    }

    /// The ordered key map of one lane, if any key exists on it.
    pub fn map(&self, kind: KeyKind) -> Option<&BTreeMap<i32, Key>> {
        self.maps.get(&kind)
    }

    /// Insert `key` at `frame` on its lane. Fails when the frame is
    /// already occupied on that lane.
    pub fn insert_key(&mut self, frame: i32, key: Key) -> bool {
        let map = self.maps.entry(key.kind()).or_default();
        if map.contains_key(&frame) {
            return false;
        }
        map.insert(frame, key);
        true
    }

    /// Remove and return the key at `frame` on `kind`.
    pub fn remove_key(&mut self, kind: KeyKind, frame: i32) -> Option<Key> {
        self.maps.get_mut(&kind)?.remove(&frame)
    }

    /// The key at `frame` on `kind`, if present.
    pub fn key(&self, kind: KeyKind, frame: i32) -> Option<&Key> {
        self.maps.get(&kind)?.get(&frame)
    }

    /// True when `kind` holds a key at `frame`.
    pub fn has_key(&self, kind: KeyKind, frame: i32) -> bool {
        self.key(kind, frame).is_some()
    }

    /// Move the key at `from` to `to` within its lane.
    ///
    /// Fails without touching the map when `from` is empty or `to` is
    /// occupied.
    pub fn move_key(&mut self, kind: KeyKind, from: i32, to: i32) -> bool {
        if from == to {
            return self.has_key(kind, from);
        }
        let Some(map) = self.maps.get_mut(&kind) else {
            return false;
        };
        if !map.contains_key(&from) || map.contains_key(&to) {
            return false;
        }
        let key = map.remove(&from).expect("checked above");
        map.insert(to, key);
        true
    }

    /// Iterate all keys as `(kind, frame, key)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (KeyKind, i32, &Key)> {
        self.maps
            .iter()
            .flat_map(|(kind, map)| map.iter().map(move |(frame, key)| (*kind, *frame, key)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::EasingParam;

    fn opacity_key(value: f32) -> Key {
        Key::Opacity {
            value,
            easing: EasingParam::default(),
        }
    }

    #[test]
    fn test_insert_and_occupancy() {
        let mut line = TimeLine::new();
        assert!(line.insert_key(10, opacity_key(0.5)));
        assert!(!line.insert_key(10, opacity_key(0.7)));
        assert!(line.has_key(KeyKind::Opacity, 10));
        assert!(!line.has_key(KeyKind::Move, 10));
        assert_eq!(line.key_count(), 1);
    }

    #[test]
    fn test_move_key() {
        let mut line = TimeLine::new();
        line.insert_key(5, opacity_key(0.1));
        line.insert_key(8, opacity_key(0.9));

        // occupied target rejected
        assert!(!line.move_key(KeyKind::Opacity, 5, 8));
        assert!(line.has_key(KeyKind::Opacity, 5));

        assert!(line.move_key(KeyKind::Opacity, 5, 6));
        assert!(!line.has_key(KeyKind::Opacity, 5));
        assert!(line.has_key(KeyKind::Opacity, 6));

        // missing source rejected
        assert!(!line.move_key(KeyKind::Opacity, 5, 7));
    }

    #[test]
    fn test_iter_order() {
        let mut line = TimeLine::new();
        line.insert_key(8, opacity_key(0.2));
        line.insert_key(3, opacity_key(0.1));

        let frames: Vec<i32> = line.iter().map(|(_, frame, _)| frame).collect();
        assert_eq!(frames, vec![3, 8]);
    }
}
