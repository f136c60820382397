// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cursor-driven timeline interaction.
//!
//! [`TimeLineEditor`] is a state machine fed exclusively through
//! [`update_cursor`](TimeLineEditor::update_cursor) and
//! [`update_wheel`](TimeLineEditor::update_wheel). Every key edit it
//! makes goes through the project's command stack, so a whole drag or
//! a batch deletion lands as a single undoable step.

use crate::cursor::{Cursor, CursorState};
use crate::focus::TimeLineFocus;
use crate::row::TimeLineRow;
use crate::scale::TimeScale;
use egui::{Pos2, Vec2};
use keyline_core::{
    CommandId, Frame, KeyTarget, MoveKeysCommand, NodeId, Project, RemoveKeyCommand,
    TimelineEvent, TimelineEventKind,
};

/// Pick tolerance of the current-time handle.
const CURRENT_HANDLE_RADIUS: f32 = 5.0;

/// Fixed layout constants of the timeline surface.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Horizontal padding on both sides of the frame band, in pixels.
    pub margin: i32,
    /// Height of the scrub header at the top, in pixels.
    pub header_height: f32,
    /// Frames-per-unit zoom levels, coarse to fine.
    pub frame_list: Vec<i32>,
    /// Frame bound used before a project attribute arrives.
    pub default_max_frame: i32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            margin: 14,
            header_height: 22.0,
            frame_list: vec![60, 30, 10],
            default_max_frame: 600,
        }
    }
}

/// What changed during an update, for the embedding widget.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateFlags {
    /// The surface needs repainting.
    pub view: bool,
    /// The current frame changed and playback should reseek.
    pub frame: bool,
}

impl UpdateFlags {
    /// True when anything changed.
    pub fn any(self) -> bool {
        self.view || self.frame
    }
}

/// Interaction state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum State {
    /// Waiting for a press; hover highlights keys.
    Standby,
    /// Dragging the current-time handle or scrubbing the header.
    MoveCurrent,
    /// Dragging one key or an enclosed key set.
    MoveKeys {
        /// The live move command on the stack.
        command: CommandId,
        /// Frame under the cursor when the drag began.
        press_frame: i32,
        /// Total frame delta applied so far.
        applied: i32,
    },
    /// Dragging an enclosure rectangle, or holding a finished one.
    EncloseKeys,
}

/// The current-time marker: a frame plus its handle position in the
/// scrub header.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeCurrent {
    frame: Frame,
    pos: Pos2,
}

impl TimeCurrent {
    /// The marked frame.
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Replace the marked frame. Call [`update`](Self::update) after.
    pub fn set_frame(&mut self, frame: Frame) {
        self.frame = frame;
    }

    /// Recompute the handle position for the current zoom level.
    pub fn update(&mut self, scale: &TimeScale, margin: i32, header_height: f32) {
        self.pos = Pos2::new(
            (margin + scale.pixel_width(self.frame.get())) as f32,
            header_height * 0.5,
        );
    }

    /// Handle position in model space.
    pub fn pos(&self) -> Pos2 {
        self.pos
    }

    /// Pick radius of the handle, for hit tests and painting.
    pub fn handle_radius(&self) -> f32 {
        CURRENT_HANDLE_RADIUS
    }

    /// True when `point` grabs the handle.
    pub fn hit_test(&self, point: Pos2) -> bool {
        (point - self.pos).length() <= CURRENT_HANDLE_RADIUS
    }
}

/// The timeline editor.
///
/// Holds no project data of its own; rows are pushed in by the
/// embedding widget each layout pass and every key edit is routed
/// through `Project::commands`.
pub struct TimeLineEditor {
    config: EditorConfig,
    scale: TimeScale,
    focus: TimeLineFocus,
    rows: Vec<TimeLineRow>,
    current: TimeCurrent,
    state: State,
    deletable: TimelineEvent,
    on_updating_key: bool,
}

impl TimeLineEditor {
    /// Create an editor with the given layout constants.
    pub fn new(config: EditorConfig) -> Self {
        let mut scale = TimeScale::new(config.frame_list.clone());
        scale.set_max_frame(config.default_max_frame);
        let mut current = TimeCurrent::default();
        current.update(&scale, config.margin, config.header_height);
        Self {
            focus: TimeLineFocus::new(config.margin),
            scale,
            rows: Vec::new(),
            current,
            state: State::Standby,
            deletable: TimelineEvent::new(TimelineEventKind::RemoveKey),
            on_updating_key: false,
            config,
        }
    }

    /// Layout constants.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Frame/pixel mapping at the current zoom level.
    pub fn scale(&self) -> &TimeScale {
        &self.scale
    }

    /// Visible rows, in push order.
    pub fn rows(&self) -> &[TimeLineRow] {
        &self.rows
    }

    /// Key focus and enclosure selection.
    pub fn focus(&self) -> &TimeLineFocus {
        &self.focus
    }

    /// Current-time marker.
    pub fn current(&self) -> &TimeCurrent {
        &self.current
    }

    /// Interaction state.
    pub fn state(&self) -> State {
        self.state
    }

    /// The marked frame.
    pub fn current_frame(&self) -> Frame {
        self.current.frame()
    }

    /// Handle position of the current-time marker.
    pub fn current_time_cursor_pos(&self) -> Pos2 {
        self.current.pos()
    }

    /// Size of the scrollable model space: the full frame band plus
    /// margins, under the header and all rows.
    pub fn model_space_size(&self) -> Vec2 {
        let width = (self.config.margin * 2 + self.scale.max_pixel_width()) as f32;
        let height = self
            .rows
            .iter()
            .fold(self.config.header_height, |acc, row| acc.max(row.rect.max.y));
        Vec2::new(width, height)
    }

    /// Drop all rows before a fresh layout pass.
    pub fn clear_rows(&mut self) {
        self.rows.clear();
    }

    /// Append a visible row.
    pub fn push_row(&mut self, row: TimeLineRow) {
        self.rows.push(row);
    }

    /// Mark `node`'s row as the selected one.
    pub fn update_row_selection(&mut self, node: NodeId) -> UpdateFlags {
        for row in &mut self.rows {
            row.selecting = row.node == node;
        }
        UpdateFlags {
            view: true,
            frame: false,
        }
    }

    /// Abort any in-progress interaction and drop the focus.
    pub fn clear_state(&mut self) {
        self.state = State::Standby;
        self.focus.clear();
        self.deletable = TimelineEvent::new(TimelineEventKind::RemoveKey);
    }

    /// Called when timeline keys changed outside this editor.
    ///
    /// Drops any in-progress interaction so a stale drag can never
    /// amend keys that no longer exist. Edits made by the editor
    /// itself are exempt; their echo arrives while the updating flag
    /// is set.
    pub fn update_key(&mut self) {
        if self.on_updating_key {
            return;
        }
        self.clear_state();
    }

    /// Adopt the project's frame bound, aborting any in-progress
    /// interaction first.
    pub fn update_project_attribute(&mut self, project: &Project) -> UpdateFlags {
        self.clear_state();
        self.set_max_frame(project.attribute.max_frame)
    }

    /// Replace the frame bound, clamping the current frame into it
    /// and resizing every row to the new band width.
    pub fn set_max_frame(&mut self, max_frame: i32) -> UpdateFlags {
        self.scale.set_max_frame(max_frame);
        let clamped = self.current.frame().clamped(0, self.scale.max_frame());
        let frame = self.current.frame() != clamped;
        self.current.set_frame(clamped);
        self.current
            .update(&self.scale, self.config.margin, self.config.header_height);
        let width = self.scale.max_pixel_width() as f32;
        for row in &mut self.rows {
            row.rect.max.x = row.rect.min.x + width;
        }
        UpdateFlags { view: true, frame }
    }

    /// Jump the current-time marker to `frame`.
    pub fn set_frame(&mut self, frame: Frame) -> UpdateFlags {
        let clamped = frame.clamped(0, self.scale.max_frame());
        let changed = self.current.frame() != clamped;
        self.current.set_frame(clamped);
        self.current
            .update(&self.scale, self.config.margin, self.config.header_height);
        UpdateFlags {
            view: changed,
            frame: changed,
        }
    }

    /// Step the zoom level per wheel event, re-seat the marker and
    /// resize every row to the new band width. Never touches the
    /// command stack.
    pub fn update_wheel(&mut self, delta: i32) -> UpdateFlags {
        self.scale.update(delta);
        self.current
            .update(&self.scale, self.config.margin, self.config.header_height);
        let width = self.scale.max_pixel_width() as f32;
        for row in &mut self.rows {
            row.rect.max.x = row.rect.min.x + width;
        }
        self.focus.clear();
        UpdateFlags {
            view: true,
            frame: false,
        }
    }

    /// Feed one cursor event through the state machine.
    pub fn update_cursor(&mut self, project: &mut Project, cursor: &Cursor) -> UpdateFlags {
        match cursor.state() {
            CursorState::Press => self.press(project, cursor),
            CursorState::Move => self.drag(project, cursor),
            CursorState::Release => self.release(),
            CursorState::Idle => self.hover(project, cursor),
        }
    }

    fn press(&mut self, project: &mut Project, cursor: &Cursor) -> UpdateFlags {
        let mut flags = UpdateFlags::default();
        let world = cursor.world_pos();

        if matches!(self.state, State::EncloseKeys) {
            // a press inside the rectangle grabs the whole set
            if self.focus.is_in_range(world) && self.begin_move_keys(project, world) {
                flags.view = true;
                return flags;
            }
            // outside it, the selection dies and the press is fresh
            self.focus.clear();
            self.state = State::Standby;
            flags.view = true;
        }

        // only a standby press starts a new interaction
        if !matches!(self.state, State::Standby) {
            return flags;
        }

        // grabbing the handle directly drags it from where it is
        if self.current.hit_test(world) {
            tracing::debug!("begin current frame drag");
            self.state = State::MoveCurrent;
            flags.view = true;
            return flags;
        }

        // a press in the header band snaps the handle to the pointer
        if cursor.screen_pos().y <= self.config.header_height {
            tracing::debug!("begin current frame drag");
            self.state = State::MoveCurrent;
            flags.frame = self.seek(world);
            flags.view = true;
            return flags;
        }

        match self.focus.reset(&project.tree, &self.rows, &self.scale, world) {
            Some(target) => {
                self.begin_move_key(project, target, world);
                flags.view = true;
            }
            None => {
                self.state = State::EncloseKeys;
                flags.view |= self.focus.view_is_changed();
            }
        }
        flags
    }

    fn drag(&mut self, project: &mut Project, cursor: &Cursor) -> UpdateFlags {
        let mut flags = UpdateFlags::default();
        let world = cursor.world_pos();

        match self.state {
            State::Standby => {}
            State::MoveCurrent => {
                flags.frame = self.seek(world);
                flags.view |= flags.frame;
            }
            State::MoveKeys {
                command,
                press_frame,
                applied,
            } => {
                // something else landed on the stack: abandon the drag
                if !project.commands.is_modifiable(command) {
                    tracing::debug!("key drag invalidated");
                    self.clear_state();
                    flags.view = true;
                    return flags;
                }
                let cursor_frame = self.frame_at(world.x);
                let add = (cursor_frame - press_frame) - applied;
                if add != 0 && self.modify_move_keys(project, command, add) {
                    flags.view = true;
                }
            }
            State::EncloseKeys => {
                self.focus
                    .update(&project.tree, &self.rows, &self.scale, world);
                flags.view = self.focus.view_is_changed();
            }
        }
        flags
    }

    fn release(&mut self) -> UpdateFlags {
        let mut flags = UpdateFlags::default();
        match self.state {
            State::Standby => {}
            State::MoveCurrent => {
                self.state = State::Standby;
            }
            State::MoveKeys { .. } => {
                self.focus.clear();
                self.state = State::Standby;
                flags.view = true;
            }
            State::EncloseKeys => {
                if !self.focus.has_range() {
                    self.focus.clear();
                    self.state = State::Standby;
                }
                flags.view = true;
            }
        }
        flags
    }

    fn hover(&mut self, project: &mut Project, cursor: &Cursor) -> UpdateFlags {
        let mut flags = UpdateFlags::default();
        if !matches!(self.state, State::EncloseKeys) {
            self.focus
                .reset(&project.tree, &self.rows, &self.scale, cursor.world_pos());
            flags.view = self.focus.view_is_changed();
        }
        flags
    }

    /// Start dragging the single key at `target`.
    fn begin_move_key(&mut self, project: &mut Project, target: KeyTarget, world: Pos2) {
        let mut event = TimelineEvent::new(TimelineEventKind::MoveKey);
        event.push_target(target);
        self.begin_move(project, event, world);
    }

    /// Start dragging the enclosed key set. False when nothing is
    /// selected.
    fn begin_move_keys(&mut self, project: &mut Project, world: Pos2) -> bool {
        let mut event = TimelineEvent::new(TimelineEventKind::MoveKey);
        if !self.focus.select(&mut event) {
            return false;
        }
        self.begin_move(project, event, world);
        true
    }

    fn begin_move(&mut self, project: &mut Project, event: TimelineEvent, world: Pos2) {
        let Project {
            ref mut tree,
            ref mut commands,
            ..
        } = *project;
        let command = commands.push(tree, Box::new(MoveKeysCommand::new(&event)));
        self.state = State::MoveKeys {
            command,
            press_frame: self.frame_at(world.x),
            applied: 0,
        };
        tracing::debug!(targets = event.targets().len(), "begin key drag");
    }

    /// Amend the live move command by `add` frames. True when any key
    /// actually moved.
    fn modify_move_keys(&mut self, project: &mut Project, command: CommandId, add: i32) -> bool {
        let mut event = TimelineEvent::new(TimelineEventKind::MoveKey);
        let range = (0, project.attribute.max_frame);
        let Project {
            ref mut tree,
            ref mut commands,
            ..
        } = *project;

        let moved = commands
            .modify(command, |cmd: &mut MoveKeysCommand| {
                cmd.modify_move(tree, &mut event, add, range)
            })
            .flatten();

        let Some(step) = moved else {
            return false;
        };
        if let State::MoveKeys { applied, .. } = &mut self.state {
            *applied += step;
            tracing::debug!(delta = *applied, "key drag");
        }
        self.focus.move_bounding_rect(&self.scale, step);
        self.notify(project, event);
        true
    }

    /// Collect the keys a deletion at `point` would affect.
    ///
    /// Inside an active enclosure that is the enclosed set; with no
    /// enclosure it is the single key under the point. A point outside
    /// an active enclosure deletes nothing. True when any key was
    /// found.
    pub fn check_deletable_keys(&mut self, project: &Project, point: Pos2) -> bool {
        let mut event = TimelineEvent::new(TimelineEventKind::RemoveKey);
        if self.focus.has_range() {
            if self.focus.is_in_range(point) {
                self.focus.select(&mut event);
            }
        } else if let Some(target) = self.focus.reset(&project.tree, &self.rows, &self.scale, point)
        {
            event.push_target(target);
        }
        self.deletable = event;
        !self.deletable.is_empty()
    }

    /// Delete the keys collected by
    /// [`check_deletable_keys`](Self::check_deletable_keys) as one
    /// undo step.
    pub fn delete_checked_keys(&mut self, project: &mut Project) -> bool {
        if self.deletable.is_empty() {
            return false;
        }
        let event = std::mem::replace(
            &mut self.deletable,
            TimelineEvent::new(TimelineEventKind::RemoveKey),
        );

        let Project {
            ref mut tree,
            ref mut commands,
            ..
        } = *project;
        commands.begin_macro("remove time keys");
        for target in event.targets() {
            commands.push(tree, Box::new(RemoveKeyCommand::new(*target)));
        }
        commands.end_macro();

        self.notify(project, event);
        self.clear_state();
        true
    }

    /// Queue the change for the embedding application. The editor's
    /// own echo through [`update_key`](Self::update_key) is suppressed
    /// while the flag is up, so the in-progress drag survives.
    fn notify(&mut self, project: &mut Project, event: TimelineEvent) {
        self.on_updating_key = true;
        project.on_timeline_modified(event);
        self.update_key();
        self.on_updating_key = false;
    }

    fn seek(&mut self, world: Pos2) -> bool {
        let frame = Frame::new(self.frame_at(world.x));
        if frame == self.current.frame() {
            return false;
        }
        self.current.set_frame(frame);
        self.current
            .update(&self.scale, self.config.margin, self.config.header_height);
        true
    }

    fn frame_at(&self, x: f32) -> i32 {
        self.scale.frame(x as i32 - self.config.margin)
    }
}
