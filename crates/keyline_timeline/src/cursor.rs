// SPDX-License-Identifier: MIT OR Apache-2.0
//! Cursor input events.

use egui::Pos2;

/// Button/motion classification of one input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// Primary button went down.
    Press,
    /// Pointer moved with the primary button held.
    Move,
    /// Primary button went up.
    Release,
    /// Pointer update with no button held.
    Idle,
}

/// A single cursor update, the sole external trigger into the editor.
///
/// `world` is the position in timeline model space (scroll applied);
/// `screen` is the raw widget-local position used for header checks.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    state: CursorState,
    screen: Pos2,
    world: Pos2,
}

impl Cursor {
    /// Create a cursor event.
    pub fn new(state: CursorState, screen: Pos2, world: Pos2) -> Self {
        Self {
            state,
            screen,
            world,
        }
    }

    /// A press at `world`, with screen and world spaces coinciding.
    pub fn pressed(world: Pos2) -> Self {
        Self::new(CursorState::Press, world, world)
    }

    /// A held-button move at `world`.
    pub fn moved(world: Pos2) -> Self {
        Self::new(CursorState::Move, world, world)
    }

    /// A release at `world`.
    pub fn released(world: Pos2) -> Self {
        Self::new(CursorState::Release, world, world)
    }

    /// A hover update at `world`.
    pub fn idle(world: Pos2) -> Self {
        Self::new(CursorState::Idle, world, world)
    }

    /// Override the screen-space position.
    pub fn with_screen(mut self, screen: Pos2) -> Self {
        self.screen = screen;
        self
    }

    /// Event classification.
    pub fn state(&self) -> CursorState {
        self.state
    }

    /// Widget-local position.
    pub fn screen_pos(&self) -> Pos2 {
        self.screen
    }

    /// Timeline model-space position.
    pub fn world_pos(&self) -> Pos2 {
        self.world
    }
}
