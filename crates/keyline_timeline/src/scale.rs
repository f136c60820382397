// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame/pixel coordinate mapping.

/// Width in pixels of one timescale unit (one second band).
const UNIT_WIDTH: i32 = 60;

/// Bidirectional frame/pixel mapping with a discrete zoom level.
///
/// The frames-per-unit list is fixed at construction; the zoom level
/// is the only mutable cursor into it. `frame(pixel_width(f)) == f`
/// holds exactly for every frame in `[0, max_frame]`.
#[derive(Debug, Clone)]
pub struct TimeScale {
    frame_list: Vec<i32>,
    index: usize,
    max_frame: i32,
}

impl TimeScale {
    /// Create a scale over an ordered frames-per-unit list,
    /// coarse to fine. Each entry must divide the unit width.
    pub fn new(frame_list: Vec<i32>) -> Self {
        debug_assert!(!frame_list.is_empty());
        debug_assert!(frame_list
            .iter()
            .all(|fpu| *fpu > 0 && UNIT_WIDTH % fpu == 0));
        Self {
            frame_list,
            index: 0,
            max_frame: 0,
        }
    }

    /// Set the highest valid frame.
    pub fn set_max_frame(&mut self, max_frame: i32) {
        self.max_frame = max_frame.max(0);
    }

    /// Highest valid frame.
    pub fn max_frame(&self) -> i32 {
        self.max_frame
    }

    /// Current zoom level index into the frame list.
    pub fn zoom_index(&self) -> usize {
        self.index
    }

    fn pixels_per_frame(&self) -> i32 {
        UNIT_WIDTH / self.frame_list[self.index]
    }

    /// Pixel offset of `frame` from the timeline origin.
    /// Monotonic non-decreasing in `frame`.
    pub fn pixel_width(&self, frame: i32) -> i32 {
        frame * self.pixels_per_frame()
    }

    /// Nearest valid frame for a pixel offset; the exact inverse of
    /// [`pixel_width`](Self::pixel_width) over `[0, max_frame]`.
    pub fn frame(&self, pixel: i32) -> i32 {
        let ppf = self.pixels_per_frame();
        let frame = (pixel + ppf / 2).div_euclid(ppf);
        frame.clamp(0, self.max_frame)
    }

    /// Pixel width of the whole timeline.
    pub fn max_pixel_width(&self) -> i32 {
        self.pixel_width(self.max_frame)
    }

    /// Step the zoom one notch per wheel event, clamped to the list.
    /// A positive delta zooms in (finer frames per unit).
    pub fn update(&mut self, wheel_delta: i32) {
        if wheel_delta > 0 && self.index + 1 < self.frame_list.len() {
            self.index += 1;
        } else if wheel_delta < 0 && self.index > 0 {
            self.index -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> TimeScale {
        let mut scale = TimeScale::new(vec![60, 30, 10]);
        scale.set_max_frame(600);
        scale
    }

    #[test]
    fn test_frame_pixel_round_trip_all_levels() {
        let mut scale = scale();
        for _ in 0..scale.frame_list.len() {
            for frame in 0..=scale.max_frame() {
                assert_eq!(scale.frame(scale.pixel_width(frame)), frame);
            }
            scale.update(1);
        }
    }

    #[test]
    fn test_frame_rounds_to_nearest() {
        let mut scale = scale();
        scale.update(1); // 2 px per frame
        assert_eq!(scale.pixel_width(3), 6);
        assert_eq!(scale.frame(5), 3); // rounds up at the midpoint
        assert_eq!(scale.frame(4), 2);
        assert_eq!(scale.frame(-7), 0); // clamped
        assert_eq!(scale.frame(100_000), 600);
    }

    #[test]
    fn test_wheel_clamps_to_level_bounds() {
        let mut scale = scale();
        assert_eq!(scale.zoom_index(), 0);
        scale.update(-1);
        assert_eq!(scale.zoom_index(), 0);

        scale.update(1);
        scale.update(1);
        scale.update(1);
        assert_eq!(scale.zoom_index(), 2);
        assert_eq!(scale.max_pixel_width(), 600 * 6);

        scale.update(-1);
        assert_eq!(scale.zoom_index(), 1);
        assert_eq!(scale.max_pixel_width(), 600 * 2);
    }
}
