// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reversible command stack with macro grouping.
//!
//! The stack takes exclusive ownership of every pushed command.
//! Callers keep only a [`CommandId`] and must ask
//! [`Stack::is_modifiable`] before amending an in-progress command
//! through [`Stack::modify`]; any later push or undo invalidates the
//! reference.

use crate::event::{KeyTarget, TimelineEvent};
use crate::object::ObjectTree;
use std::any::Any;

/// Identity of a pushed command, for amend-in-place queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandId(u64);

/// A reversible timeline mutation, owned by the stack once pushed.
pub trait Command {
    /// Short human-readable label.
    fn label(&self) -> &'static str;

    /// Apply for the first time.
    fn invoke(&mut self, tree: &mut ObjectTree);

    /// Reverse a previous invoke/redo.
    fn undo(&mut self, tree: &mut ObjectTree);

    /// Apply again after an undo.
    fn redo(&mut self, tree: &mut ObjectTree);

    /// Downcast access for amend-in-place.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// One undo step: a single command or a closed macro of several.
struct Entry {
    label: String,
    commands: Vec<(CommandId, Box<dyn Command>)>,
}

/// Undoable command stack.
#[derive(Default)]
pub struct Stack {
    done: Vec<Entry>,
    undone: Vec<Entry>,
    open_macro: Option<Entry>,
    next_id: u64,
}

impl Stack {
    /// Create an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin grouping subsequent pushes into one undo step.
    pub fn begin_macro(&mut self, label: impl Into<String>) {
        debug_assert!(self.open_macro.is_none(), "nested command macro");
        self.open_macro = Some(Entry {
            label: label.into(),
            commands: Vec::new(),
        });
    }

    /// Close the current macro. An empty macro is discarded.
    pub fn end_macro(&mut self) {
        if let Some(entry) = self.open_macro.take() {
            if !entry.commands.is_empty() {
                self.done.push(entry);
            }
        }
    }

    /// Execute `command` against `tree` and take ownership of it.
    ///
    /// Discards any redo history.
    pub fn push(&mut self, tree: &mut ObjectTree, mut command: Box<dyn Command>) -> CommandId {
        self.undone.clear();
        command.invoke(tree);

        let id = CommandId(self.next_id);
        self.next_id += 1;
        tracing::debug!(id = id.0, label = command.label(), "push command");

        match &mut self.open_macro {
            Some(entry) => entry.commands.push((id, command)),
            None => self.done.push(Entry {
                label: command.label().to_owned(),
                commands: vec![(id, command)],
            }),
        }
        id
    }

    fn last_command_id(&self) -> Option<CommandId> {
        if let Some(entry) = &self.open_macro {
            if let Some((id, _)) = entry.commands.last() {
                return Some(*id);
            }
        }
        self.done
            .last()
            .and_then(|entry| entry.commands.last())
            .map(|(id, _)| *id)
    }

    /// True while `id` names the newest pushed command and nothing was
    /// undone since it was pushed.
    pub fn is_modifiable(&self, id: CommandId) -> bool {
        self.last_command_id() == Some(id)
    }

    /// Amend the still-modifiable top command in place.
    ///
    /// Returns `None` when `id` is no longer the live top entry or the
    /// command is not a `T`; the edit merges into the existing undo
    /// step either way.
    pub fn modify<T: Command + 'static, R>(
        &mut self,
        id: CommandId,
        edit: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        if !self.is_modifiable(id) {
            return None;
        }
        let slot = match &mut self.open_macro {
            Some(entry) => entry.commands.last_mut(),
            None => self.done.last_mut().and_then(|entry| entry.commands.last_mut()),
        };
        let (_, command) = slot?;
        command.as_any_mut().downcast_mut::<T>().map(edit)
    }

    /// Undo the newest step, returning its label.
    pub fn undo(&mut self, tree: &mut ObjectTree) -> Option<String> {
        debug_assert!(self.open_macro.is_none(), "undo inside an open macro");
        let mut entry = self.done.pop()?;
        for (_, command) in entry.commands.iter_mut().rev() {
            command.undo(tree);
        }
        let label = entry.label.clone();
        tracing::debug!(%label, "undo");
        self.undone.push(entry);
        Some(label)
    }

    /// Redo the newest undone step, returning its label.
    pub fn redo(&mut self, tree: &mut ObjectTree) -> Option<String> {
        let mut entry = self.undone.pop()?;
        for (_, command) in entry.commands.iter_mut() {
            command.redo(tree);
        }
        let label = entry.label.clone();
        tracing::debug!(%label, "redo");
        self.done.push(entry);
        Some(label)
    }

    /// True when a step can be undone.
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// True when a step can be redone.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Number of undoable steps.
    pub fn undo_count(&self) -> usize {
        self.done.len()
    }

    /// Drop all history.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
        self.open_macro = None;
    }
}

/// One in-progress drag of one or more keys, amendable in place.
///
/// All targets share a single accumulated frame delta; the drag is
/// merged into one undo step instead of pushing per move event.
pub struct MoveKeysCommand {
    targets: Vec<KeyTarget>,
    delta: i32,
}

impl MoveKeysCommand {
    /// Capture the keys named by `event` at their current frames.
    pub fn new(event: &TimelineEvent) -> Self {
        Self {
            targets: event.targets().to_vec(),
            delta: 0,
        }
    }

    /// The accumulated frame delta applied so far.
    pub fn delta(&self) -> i32 {
        self.delta
    }

    fn shift(&self, tree: &mut ObjectTree, from_delta: i32, to_delta: i32) {
        // two passes so keys inside the moving set never collide
        let mut taken = Vec::with_capacity(self.targets.len());
        for target in &self.targets {
            if let Some(node) = tree.node_mut(target.node) {
                if let Some(key) = node.timeline.remove_key(target.kind, target.frame + from_delta)
                {
                    taken.push((*target, key));
                }
            }
        }
        for (target, key) in taken {
            if let Some(node) = tree.node_mut(target.node) {
                node.timeline.insert_key(target.frame + to_delta, key);
            }
        }
    }

    /// Amend the drag by `add` frames, clamped so every key stays in
    /// `range`. Fills `out` with the targets at their new frames and
    /// returns the applied delta, or `None` when nothing moved (zero
    /// clamped delta, or a destination occupied by an unmoved key).
    pub fn modify_move(
        &mut self,
        tree: &mut ObjectTree,
        out: &mut TimelineEvent,
        add: i32,
        range: (i32, i32),
    ) -> Option<i32> {
        if self.targets.is_empty() {
            return None;
        }

        let (min, max) = range;
        let mut lo = i32::MIN;
        let mut hi = i32::MAX;
        for target in &self.targets {
            let current = target.frame + self.delta;
            lo = lo.max(min - current);
            hi = hi.min(max - current);
        }
        let add = add.clamp(lo, hi);
        if add == 0 {
            return None;
        }

        // reject the amend when a destination holds a key outside the
        // moving set
        for target in &self.targets {
            let dest = target.frame + self.delta + add;
            let node = tree.node(target.node)?;
            if node.timeline.has_key(target.kind, dest) {
                let moving = self.targets.iter().any(|other| {
                    other.node == target.node
                        && other.kind == target.kind
                        && other.frame + self.delta == dest
                });
                if !moving {
                    return None;
                }
            }
        }

        self.shift(tree, self.delta, self.delta + add);
        self.delta += add;

        out.set_targets(
            self.targets
                .iter()
                .map(|target| KeyTarget {
                    frame: target.frame + self.delta,
                    ..*target
                })
                .collect(),
        );
        Some(add)
    }
}

impl Command for MoveKeysCommand {
    fn label(&self) -> &'static str {
        "move time keys"
    }

    fn invoke(&mut self, _tree: &mut ObjectTree) {
        // the drag starts at delta zero; amendments do the moving
    }

    fn undo(&mut self, tree: &mut ObjectTree) {
        self.shift(tree, self.delta, 0);
    }

    fn redo(&mut self, tree: &mut ObjectTree) {
        self.shift(tree, 0, self.delta);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Removes one key, restoring it on undo.
pub struct RemoveKeyCommand {
    target: KeyTarget,
    removed: Option<crate::key::Key>,
}

impl RemoveKeyCommand {
    /// Create a remover for the key at `target`.
    pub fn new(target: KeyTarget) -> Self {
        Self {
            target,
            removed: None,
        }
    }
}

impl Command for RemoveKeyCommand {
    fn label(&self) -> &'static str {
        "remove time key"
    }

    fn invoke(&mut self, tree: &mut ObjectTree) {
        if let Some(node) = tree.node_mut(self.target.node) {
            self.removed = node.timeline.remove_key(self.target.kind, self.target.frame);
        }
    }

    fn undo(&mut self, tree: &mut ObjectTree) {
        if let Some(key) = self.removed.take() {
            if let Some(node) = tree.node_mut(self.target.node) {
                node.timeline.insert_key(self.target.frame, key);
            }
        }
    }

    fn redo(&mut self, tree: &mut ObjectTree) {
        self.invoke(tree);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TimelineEventKind;
    use crate::key::{EasingParam, Key, KeyKind};
    use crate::object::{NodeId, ObjectNode, ObjectTree};

    fn opacity_key(value: f32) -> Key {
        Key::Opacity {
            value,
            easing: EasingParam::default(),
        }
    }

    fn tree_with_keys(frames: &[i32]) -> (ObjectTree, NodeId) {
        let mut tree = ObjectTree::new();
        let mut node = ObjectNode::new("layer");
        for frame in frames {
            node.timeline.insert_key(*frame, opacity_key(0.5));
        }
        let id = tree.add_node(node);
        (tree, id)
    }

    fn move_event(node: NodeId, frames: &[i32]) -> TimelineEvent {
        let mut event = TimelineEvent::new(TimelineEventKind::MoveKey);
        for frame in frames {
            event.push_target(KeyTarget {
                node,
                kind: KeyKind::Opacity,
                frame: *frame,
            });
        }
        event
    }

    #[test]
    fn test_move_amend_merges_into_one_step() {
        let (mut tree, node) = tree_with_keys(&[10, 20]);
        let mut stack = Stack::new();

        let event = move_event(node, &[10, 20]);
        let id = stack.push(&mut tree, Box::new(MoveKeysCommand::new(&event)));
        assert_eq!(stack.undo_count(), 1);
        assert!(stack.is_modifiable(id));

        let mut out = TimelineEvent::new(TimelineEventKind::MoveKey);
        for _ in 0..3 {
            stack.modify(id, |command: &mut MoveKeysCommand| {
                command.modify_move(&mut tree, &mut out, 5, (0, 600))
            });
        }
        // three amendments, still a single undo step
        assert_eq!(stack.undo_count(), 1);

        let line = &tree.node(node).unwrap().timeline;
        assert!(line.has_key(KeyKind::Opacity, 25));
        assert!(line.has_key(KeyKind::Opacity, 35));

        stack.undo(&mut tree);
        let line = &tree.node(node).unwrap().timeline;
        assert!(line.has_key(KeyKind::Opacity, 10));
        assert!(line.has_key(KeyKind::Opacity, 20));

        stack.redo(&mut tree);
        let line = &tree.node(node).unwrap().timeline;
        assert!(line.has_key(KeyKind::Opacity, 25));
        assert!(line.has_key(KeyKind::Opacity, 35));
    }

    #[test]
    fn test_move_clamps_to_range() {
        let (mut tree, node) = tree_with_keys(&[2, 10]);
        let mut command = MoveKeysCommand::new(&move_event(node, &[2, 10]));
        let mut out = TimelineEvent::new(TimelineEventKind::MoveKey);

        // requesting -5 clamps to -2 so the earliest key stops at zero
        assert_eq!(
            command.modify_move(&mut tree, &mut out, -5, (0, 600)),
            Some(-2)
        );
        let line = &tree.node(node).unwrap().timeline;
        assert!(line.has_key(KeyKind::Opacity, 0));
        assert!(line.has_key(KeyKind::Opacity, 8));
        assert_eq!(out.targets()[0].frame, 0);

        // already at the bound, nothing to apply
        assert_eq!(command.modify_move(&mut tree, &mut out, -3, (0, 600)), None);
    }

    #[test]
    fn test_move_rejects_collision_with_unmoved_key() {
        let (mut tree, node) = tree_with_keys(&[10, 12]);
        let mut command = MoveKeysCommand::new(&move_event(node, &[10]));
        let mut out = TimelineEvent::new(TimelineEventKind::MoveKey);

        assert_eq!(command.modify_move(&mut tree, &mut out, 2, (0, 600)), None);
        let line = &tree.node(node).unwrap().timeline;
        assert!(line.has_key(KeyKind::Opacity, 10));
        assert!(line.has_key(KeyKind::Opacity, 12));
    }

    #[test]
    fn test_is_modifiable_invalidated_by_later_push() {
        let (mut tree, node) = tree_with_keys(&[10, 30]);
        let mut stack = Stack::new();

        let id = stack.push(
            &mut tree,
            Box::new(MoveKeysCommand::new(&move_event(node, &[10]))),
        );
        assert!(stack.is_modifiable(id));

        stack.push(
            &mut tree,
            Box::new(RemoveKeyCommand::new(KeyTarget {
                node,
                kind: KeyKind::Opacity,
                frame: 30,
            })),
        );
        assert!(!stack.is_modifiable(id));
        assert!(stack
            .modify(id, |_: &mut MoveKeysCommand| unreachable!())
            .is_none());
    }

    #[test]
    fn test_macro_groups_removals_into_one_step() {
        let (mut tree, node) = tree_with_keys(&[5, 15, 25]);
        let mut stack = Stack::new();

        stack.begin_macro("remove time keys");
        for frame in [5, 15] {
            stack.push(
                &mut tree,
                Box::new(RemoveKeyCommand::new(KeyTarget {
                    node,
                    kind: KeyKind::Opacity,
                    frame,
                })),
            );
        }
        stack.end_macro();

        assert_eq!(stack.undo_count(), 1);
        assert_eq!(tree.node(node).unwrap().timeline.key_count(), 1);

        assert_eq!(stack.undo(&mut tree).as_deref(), Some("remove time keys"));
        assert_eq!(tree.node(node).unwrap().timeline.key_count(), 3);

        stack.redo(&mut tree);
        assert_eq!(tree.node(node).unwrap().timeline.key_count(), 1);
    }

    #[test]
    fn test_empty_macro_discarded() {
        let mut stack = Stack::new();
        stack.begin_macro("nothing");
        stack.end_macro();
        assert!(!stack.can_undo());
    }

    #[test]
    fn test_undo_invalidates_move_reference() {
        let (mut tree, node) = tree_with_keys(&[10]);
        let mut stack = Stack::new();
        let id = stack.push(
            &mut tree,
            Box::new(MoveKeysCommand::new(&move_event(node, &[10]))),
        );
        stack.undo(&mut tree);
        assert!(!stack.is_modifiable(id));
    }
}
