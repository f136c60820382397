// SPDX-License-Identifier: MIT OR Apache-2.0
//! Visible timeline rows.

use egui::Rect;
use keyline_core::NodeId;

/// One visible row of the timeline, mapping a scene node to its
/// on-screen band.
///
/// Rows are rebuilt wholesale by the caller whenever the scene
/// changes; the editor never persists them across a `clear_rows`.
#[derive(Debug, Clone, Copy)]
pub struct TimeLineRow {
    /// Owning node, lookup only.
    pub node: NodeId,
    /// Screen rectangle of the row band.
    pub rect: Rect,
    /// True for a collapsed folder row.
    pub closed_folder: bool,
    /// True while the node is the current selection.
    pub selecting: bool,
}

impl TimeLineRow {
    /// Vertical center of the row's key lane.
    pub fn key_y(&self) -> f32 {
        self.rect.center().y
    }
}
