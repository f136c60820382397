// SPDX-License-Identifier: MIT OR Apache-2.0
//! Timeline editor for keyline.
//!
//! This crate provides the interactive timeline surface:
//! - Frame/pixel coordinate mapping with discrete zoom
//! - Key hit-testing and rectangle enclosure selection
//! - A cursor-driven interaction state machine issuing transactional
//!   move/delete edits through the core command stack
//! - A read-only draw-list projection for the embedding painter
//!
//! ## Architecture
//!
//! The editor never owns the project; every mutating entry point takes
//! `&mut Project` and routes edits through `keyline_core::cmnd` so
//! each drag or deletion is a single undoable step.

pub mod cursor;
pub mod editor;
pub mod focus;
pub mod render;
pub mod row;
pub mod scale;

pub use cursor::{Cursor, CursorState};
pub use editor::{EditorConfig, State, TimeCurrent, TimeLineEditor, UpdateFlags};
pub use focus::TimeLineFocus;
pub use render::{DrawModel, KeyModel, RowModel};
pub use row::TimeLineRow;
pub use scale::TimeScale;
