// SPDX-License-Identifier: MIT OR Apache-2.0
//! Integer animation time.

use serde::{Deserialize, Serialize};

/// An integer frame index on the timeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Frame(i32);

impl Frame {
    /// Create a frame from a raw index.
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw index.
    pub fn get(self) -> i32 {
        self.0
    }

    /// Replace the index.
    pub fn set(&mut self, value: i32) {
        self.0 = value;
    }

    /// Clamp the index to `[min, max]` in place.
    pub fn clamp(&mut self, min: i32, max: i32) {
        self.0 = self.0.clamp(min, max);
    }

    /// Return a copy clamped to `[min, max]`.
    pub fn clamped(self, min: i32, max: i32) -> Self {
        Self(self.0.clamp(min, max))
    }
}

impl From<i32> for Frame {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let mut frame = Frame::new(720);
        Frame::clamp(&mut frame, 0, 600);
        assert_eq!(frame.get(), 600);

        let mut frame = Frame::new(-3);
        Frame::clamp(&mut frame, 0, 600);
        assert_eq!(frame.get(), 0);

        assert_eq!(Frame::new(42).clamped(0, 600), Frame::new(42));
    }
}
