// SPDX-License-Identifier: MIT OR Apache-2.0
//! Change notifications for batched key edits.

use crate::key::KeyKind;
use crate::object::NodeId;
use serde::{Deserialize, Serialize};

/// What a batch of key edits did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimelineEventKind {
    /// Keys were moved to new frames.
    MoveKey,
    /// Keys were removed.
    RemoveKey,
}

/// One affected key position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyTarget {
    /// Owning node, lookup only.
    pub node: NodeId,
    /// Lane of the key.
    pub kind: KeyKind,
    /// Frame of the key.
    pub frame: i32,
}

/// A change notification describing one batch of key edits.
#[derive(Debug, Clone)]
pub struct TimelineEvent {
    kind: TimelineEventKind,
    targets: Vec<KeyTarget>,
}

impl TimelineEvent {
    /// Create an empty event of the given kind.
    pub fn new(kind: TimelineEventKind) -> Self {
        Self {
            kind,
            targets: Vec::new(),
        }
    }

    /// The edit kind.
    pub fn kind(&self) -> TimelineEventKind {
        self.kind
    }

    /// Reclassify the event.
    pub fn set_kind(&mut self, kind: TimelineEventKind) {
        self.kind = kind;
    }

    /// Record an affected key.
    pub fn push_target(&mut self, target: KeyTarget) {
        self.targets.push(target);
    }

    /// All affected keys.
    pub fn targets(&self) -> &[KeyTarget] {
        &self.targets
    }

    /// Replace the affected key set.
    pub fn set_targets(&mut self, targets: Vec<KeyTarget>) {
        self.targets = targets;
    }

    /// True when no key is affected.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
