// SPDX-License-Identifier: MIT OR Apache-2.0
//! Core model for the keyline animation editor.
//!
//! This crate provides everything the timeline editor mutates:
//! - Scene nodes with per-kind key timelines
//! - Keyframe payloads, including FFD mesh keys and their byte codec
//! - A reversible command stack with macro grouping and in-place
//!   amendment for interactive drags
//! - Project state and change notifications
//!
//! ## Architecture
//!
//! Commands own all mutation of key data once pushed; callers keep
//! only a [`cmnd::CommandId`] to query whether the pushed command is
//! still the live, amendable top of the stack.

pub mod cmnd;
pub mod event;
pub mod frame;
pub mod key;
pub mod mesh;
pub mod object;
pub mod project;
pub mod serial;
pub mod timeline;

pub use cmnd::{Command, CommandId, MoveKeysCommand, RemoveKeyCommand, Stack};
pub use event::{KeyTarget, TimelineEvent, TimelineEventKind};
pub use frame::Frame;
pub use key::{EasingCurve, EasingParam, FfdKeyData, Key, KeyKind};
pub use mesh::{MeshBuffer, Vector3};
pub use object::{NodeId, ObjectNode, ObjectTree};
pub use project::{Attribute, Project};
pub use serial::{Deserializer, SerialError, SerialResult, Serializer};
pub use timeline::TimeLine;
