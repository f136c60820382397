// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project state: scene tree, attributes, command stack and
//! change notifications.

use crate::cmnd::Stack;
use crate::event::TimelineEvent;
use crate::object::ObjectTree;

/// Project-wide attributes.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Highest valid frame index.
    pub max_frame: i32,
}

impl Attribute {
    /// Create attributes with the given frame bound.
    pub fn new(max_frame: i32) -> Self {
        Self { max_frame }
    }
}

/// An open document.
///
/// The command stack exclusively owns every pushed command; editors
/// keep only [`crate::cmnd::CommandId`] references into it. Change
/// notifications queue up here and are drained by the embedding
/// application after each mutation.
pub struct Project {
    /// Scene nodes.
    pub tree: ObjectTree,
    /// Project attributes.
    pub attribute: Attribute,
    /// Undoable command stack.
    pub commands: Stack,
    notifications: Vec<TimelineEvent>,
}

impl Project {
    /// Create an empty project with the given frame bound.
    pub fn new(max_frame: i32) -> Self {
        Self {
            tree: ObjectTree::new(),
            attribute: Attribute::new(max_frame),
            commands: Stack::new(),
            notifications: Vec::new(),
        }
    }

    /// Record a change notification for the embedding application.
    pub fn on_timeline_modified(&mut self, event: TimelineEvent) {
        tracing::debug!(kind = ?event.kind(), targets = event.targets().len(), "timeline modified");
        self.notifications.push(event);
    }

    /// Drain all pending notifications.
    pub fn take_notifications(&mut self) -> Vec<TimelineEvent> {
        std::mem::take(&mut self.notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TimelineEventKind;

    #[test]
    fn test_notification_queue() {
        let mut project = Project::new(600);
        project.on_timeline_modified(TimelineEvent::new(TimelineEventKind::MoveKey));
        project.on_timeline_modified(TimelineEvent::new(TimelineEventKind::RemoveKey));

        let events = project.take_notifications();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind(), TimelineEventKind::RemoveKey);
        assert!(project.take_notifications().is_empty());
    }
}
