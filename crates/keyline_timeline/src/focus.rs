// SPDX-License-Identifier: MIT OR Apache-2.0
//! Key hit-testing and rectangle enclosure selection.

use crate::row::TimeLineRow;
use crate::scale::TimeScale;
use egui::{Pos2, Rect, Vec2};
use keyline_core::{KeyTarget, ObjectTree, TimelineEvent};

/// Pixel tolerance for picking a single key.
const HIT_RADIUS: f32 = 4.5;

/// Current focus of the timeline.
#[derive(Debug, Clone, PartialEq)]
enum FocusState {
    /// Nothing focused.
    Empty,
    /// One key picked under the cursor.
    Single(KeyTarget),
    /// A dragged enclosure rectangle and the keys inside it.
    Range {
        rect: Rect,
        targets: Vec<KeyTarget>,
    },
}

/// Tracks single-key focus and rectangle enclosure selection over the
/// visible rows.
#[derive(Debug)]
pub struct TimeLineFocus {
    state: FocusState,
    anchor: Pos2,
    margin: i32,
    view_changed: bool,
}

impl TimeLineFocus {
    /// Create an empty focus with the timeline's left margin.
    pub fn new(margin: i32) -> Self {
        Self {
            state: FocusState::Empty,
            anchor: Pos2::ZERO,
            margin,
            view_changed: false,
        }
    }

    fn set_state(&mut self, state: FocusState) {
        if self.state != state {
            self.state = state;
            self.view_changed = true;
        }
    }

    /// Hit-test `point` against all row keys, replacing any enclosure.
    ///
    /// Focuses and returns the nearest key within tolerance, or clears
    /// the focus and returns `None`. The point also becomes the anchor
    /// of a prospective enclosure.
    pub fn reset(
        &mut self,
        tree: &ObjectTree,
        rows: &[TimeLineRow],
        scale: &TimeScale,
        point: Pos2,
    ) -> Option<KeyTarget> {
        self.anchor = point;
        let hit = self.hit_test(tree, rows, scale, point);
        match hit {
            Some(target) => self.set_state(FocusState::Single(target)),
            None => self.set_state(FocusState::Empty),
        }
        hit
    }

    /// Extend the enclosure from the anchor to `point` and recompute
    /// the enclosed key set.
    pub fn update(
        &mut self,
        tree: &ObjectTree,
        rows: &[TimeLineRow],
        scale: &TimeScale,
        point: Pos2,
    ) {
        let rect = Rect::from_two_pos(self.anchor, point);
        let mut targets = Vec::new();
        for row in rows {
            let node = match tree.node(row.node) {
                Some(node) => node,
                None => continue,
            };
            let y = row.key_y();
            for (kind, frame, _) in node.timeline.iter() {
                let x = (self.margin + scale.pixel_width(frame)) as f32;
                if rect.contains(Pos2::new(x, y)) {
                    targets.push(KeyTarget {
                        node: row.node,
                        kind,
                        frame,
                    });
                }
            }
        }
        self.set_state(FocusState::Range { rect, targets });
    }

    /// True iff an enclosure is active and `point` falls inside it.
    pub fn is_in_range(&self, point: Pos2) -> bool {
        match &self.state {
            FocusState::Range { rect, .. } => rect.contains(point),
            _ => false,
        }
    }

    /// True iff a non-degenerate enclosure rectangle is active.
    pub fn has_range(&self) -> bool {
        match &self.state {
            FocusState::Range { rect, .. } => rect.area() > 0.0,
            _ => false,
        }
    }

    /// Populate `event` with the focused key(s) as edit targets.
    /// Returns false when nothing is focused.
    pub fn select(&self, event: &mut TimelineEvent) -> bool {
        match &self.state {
            FocusState::Single(target) => {
                event.push_target(*target);
                true
            }
            FocusState::Range { targets, .. } if !targets.is_empty() => {
                for target in targets {
                    event.push_target(*target);
                }
                true
            }
            _ => false,
        }
    }

    /// Shift the enclosure rectangle and its key set horizontally by
    /// `delta_frames`, keeping them in sync with an in-progress drag.
    pub fn move_bounding_rect(&mut self, scale: &TimeScale, delta_frames: i32) {
        if delta_frames == 0 {
            return;
        }
        if let FocusState::Range { rect, targets } = &mut self.state {
            let delta_px = scale.pixel_width(delta_frames) as f32;
            *rect = rect.translate(Vec2::new(delta_px, 0.0));
            for target in targets.iter_mut() {
                target.frame += delta_frames;
            }
            self.anchor.x += delta_px;
            self.view_changed = true;
        }
    }

    /// Edge-triggered redraw flag; cleared by this read.
    pub fn view_is_changed(&mut self) -> bool {
        std::mem::take(&mut self.view_changed)
    }

    /// Return to the empty state.
    pub fn clear(&mut self) {
        self.set_state(FocusState::Empty);
    }

    /// The enclosure rectangle, while one is active.
    pub fn visual_rect(&self) -> Option<Rect> {
        match &self.state {
            FocusState::Range { rect, .. } => Some(*rect),
            _ => None,
        }
    }

    /// True when `target` is the single focus or inside the enclosure.
    pub fn is_focused(&self, target: KeyTarget) -> bool {
        match &self.state {
            FocusState::Single(focused) => *focused == target,
            FocusState::Range { targets, .. } => targets.contains(&target),
            FocusState::Empty => false,
        }
    }

    fn hit_test(
        &self,
        tree: &ObjectTree,
        rows: &[TimeLineRow],
        scale: &TimeScale,
        point: Pos2,
    ) -> Option<KeyTarget> {
        let mut nearest: Option<(f32, KeyTarget)> = None;
        for row in rows {
            let Some(node) = tree.node(row.node) else {
                continue;
            };
            let y = row.key_y();
            for (kind, frame, _) in node.timeline.iter() {
                let x = (self.margin + scale.pixel_width(frame)) as f32;
                let dist = (point - Pos2::new(x, y)).length();
                if dist < HIT_RADIUS && nearest.map_or(true, |(best, _)| dist < best) {
                    nearest = Some((
                        dist,
                        KeyTarget {
                            node: row.node,
                            kind,
                            frame,
                        },
                    ));
                }
            }
        }
        nearest.map(|(_, target)| target)
    }
}
