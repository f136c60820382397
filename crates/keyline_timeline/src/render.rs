// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only draw-list projection for the embedding painter.
//!
//! The editor never paints; it flattens its state into a [`DrawModel`]
//! that the widget turns into shapes. Keys outside the culling
//! rectangle are skipped, with a small pixel slop so half-visible
//! diamonds at the edges still draw.

use crate::editor::{State, TimeLineEditor};
use egui::{Pos2, Rect};
use keyline_core::{KeyKind, KeyTarget, ObjectTree};

/// Horizontal cull slop in pixels, covering a key glyph's radius.
const CULL_SLOP: i32 = 5;

/// One key glyph.
#[derive(Debug, Clone, Copy)]
pub struct KeyModel {
    /// Glyph center in model space.
    pub pos: Pos2,
    /// Lane of the key.
    pub kind: KeyKind,
    /// Frame of the key.
    pub frame: i32,
    /// True when hovered or inside the enclosure.
    pub focused: bool,
}

/// One row band with its visible keys.
#[derive(Debug, Clone)]
pub struct RowModel {
    /// Band rectangle in model space.
    pub rect: Rect,
    /// True while the node is the current selection.
    pub selecting: bool,
    /// True for a collapsed folder row.
    pub closed_folder: bool,
    /// Visible keys, frame order within each lane.
    pub keys: Vec<KeyModel>,
}

/// Everything the widget needs to paint one frame of the timeline.
#[derive(Debug, Clone, Default)]
pub struct DrawModel {
    /// Visible rows, top to bottom in push order.
    pub rows: Vec<RowModel>,
    /// The enclosure rectangle, while one is being dragged or held.
    pub selection_rect: Option<Rect>,
    /// Current-time handle position in the header.
    pub current_pos: Pos2,
    /// Pick radius of the current-time handle.
    pub current_radius: f32,
    /// Current frame, for the header label.
    pub current_frame: i32,
    /// Header height in pixels.
    pub header_height: f32,
    /// Left margin of the frame band in pixels.
    pub margin: i32,
}

impl TimeLineEditor {
    /// Flatten the visible state into a paintable model.
    ///
    /// `cull` is the on-screen viewport in model space; rows and keys
    /// outside it are dropped. A viewport narrower than the two
    /// margins paints nothing.
    pub fn draw_model(&self, tree: &ObjectTree, cull: Rect) -> DrawModel {
        let margin = self.config().margin;
        let mut model = DrawModel {
            current_pos: self.current_time_cursor_pos(),
            current_radius: self.current().handle_radius(),
            current_frame: self.current_frame().get(),
            header_height: self.config().header_height,
            margin,
            ..DrawModel::default()
        };
        if cull.width() < (2 * margin) as f32 {
            return model;
        }

        let begin = self.scale().frame(cull.left() as i32 - margin - CULL_SLOP);
        let end = self.scale().frame(cull.right() as i32 - margin + CULL_SLOP);

        for row in self.rows() {
            if row.rect.max.y < cull.top() || row.rect.min.y > cull.bottom() {
                continue;
            }
            let Some(node) = tree.node(row.node) else {
                continue;
            };
            let mut keys = Vec::new();
            for (kind, frame, _) in node.timeline.iter() {
                if frame < begin || frame > end {
                    continue;
                }
                let target = KeyTarget {
                    node: row.node,
                    kind,
                    frame,
                };
                keys.push(KeyModel {
                    pos: Pos2::new((margin + self.scale().pixel_width(frame)) as f32, row.key_y()),
                    kind,
                    frame,
                    focused: self.focus().is_focused(target),
                });
            }
            model.rows.push(RowModel {
                rect: row.rect,
                selecting: row.selecting,
                closed_folder: row.closed_folder,
                keys,
            });
        }

        if matches!(self.state(), State::EncloseKeys) {
            model.selection_rect = self.focus().visual_rect();
        }
        model
    }
}
