//! Ratio arithmetic for divider drags.

use crate::layout::geometry::Extent;
use crate::layout::tree::{clamp_ratio, display_ratio, DividerId, Orientation};

/// New ratio after dragging from `start` to `current` along an axis of size
/// `extent`. Always inside the stored ratio bounds; a zero, negative or
/// non-finite extent keeps the anchor.
pub fn compute_new_ratio(anchor_ratio: f32, start: f32, current: f32, extent: f32) -> f32 {
    if !(extent > 0.0 && extent.is_finite()) {
        return clamp_ratio(anchor_ratio);
    }
    let shifted = anchor_ratio + (current - start) / extent;
    if shifted.is_nan() {
        clamp_ratio(anchor_ratio)
    } else {
        clamp_ratio(shifted)
    }
}

/// Offset of the divider handle from the container origin, in points.
pub fn handle_offset(ratio: f32, extent: f32) -> f32 {
    display_ratio(ratio) * extent
}

/// Drag state captured when a pointer locks onto a divider handle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerDrag {
    pub divider: DividerId,
    pub orientation: Orientation,
    pub anchor_ratio: f32,
    pub start_x: f32,
    pub start_y: f32,
    /// Size of the owning container at lock time
    pub extent: Extent,
}

impl DividerDrag {
    /// Ratio for the pointer at `(x, y)`. Vertical dividers follow the
    /// horizontal axis and resize widths; horizontal ones follow the vertical
    /// axis and resize heights.
    pub fn ratio_at(&self, x: f32, y: f32) -> f32 {
        match self.orientation {
            Orientation::Vertical => {
                compute_new_ratio(self.anchor_ratio, self.start_x, x, self.extent.width)
            }
            Orientation::Horizontal => {
                compute_new_ratio(self.anchor_ratio, self.start_y, y, self.extent.height)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::tree::{MAX_RATIO, MIN_RATIO};

    #[test]
    fn moves_by_delta_share_of_extent() {
        let ratio = compute_new_ratio(0.5, 100.0, 400.0, 1000.0);
        assert!((ratio - 0.8).abs() < 1e-6);
    }

    #[test]
    fn clamps_overshoot_in_both_directions() {
        assert_eq!(compute_new_ratio(0.5, 0.0, 10_000.0, 1000.0), MAX_RATIO);
        assert_eq!(compute_new_ratio(0.5, 0.0, -10_000.0, 1000.0), MIN_RATIO);
    }

    #[test]
    fn stays_in_bounds_for_degenerate_input() {
        let samples = [
            compute_new_ratio(0.5, 10.0, 10.0, 0.0),
            compute_new_ratio(0.5, 10.0, 20.0, 0.0),
            compute_new_ratio(0.5, 10.0, 20.0, -50.0),
            compute_new_ratio(3.0, 0.0, 0.0, 100.0),
            compute_new_ratio(f32::NAN, 0.0, 5.0, 100.0),
            compute_new_ratio(0.5, f32::INFINITY, 5.0, 100.0),
            compute_new_ratio(0.5, 0.0, f32::MAX, f32::MIN_POSITIVE),
        ];
        for ratio in samples {
            assert!(
                (MIN_RATIO..=MAX_RATIO).contains(&ratio),
                "ratio {} escaped bounds",
                ratio
            );
        }
        assert_eq!(samples[0], 0.5);
        assert_eq!(samples[1], 0.5);
        assert_eq!(samples[2], 0.5);
        assert_eq!(compute_new_ratio(0.4, 0.0, 50.0, f32::INFINITY), 0.4);
        assert_eq!(compute_new_ratio(0.4, 0.0, 50.0, f32::NAN), 0.4);
    }

    #[test]
    fn handle_offset_uses_display_ceiling() {
        assert_eq!(handle_offset(0.5, 200.0), 100.0);
        assert!((handle_offset(0.9, 200.0) - 160.0).abs() < 1e-4);
    }

    #[test]
    fn drag_axis_follows_orientation() {
        let mut drag = DividerDrag {
            divider: DividerId(0),
            orientation: Orientation::Vertical,
            anchor_ratio: 0.5,
            start_x: 100.0,
            start_y: 100.0,
            extent: Extent {
                width: 400.0,
                height: 200.0,
            },
        };
        assert!((drag.ratio_at(140.0, 500.0) - 0.6).abs() < 1e-6);

        drag.orientation = Orientation::Horizontal;
        assert!((drag.ratio_at(500.0, 80.0) - 0.4).abs() < 1e-6);
    }
}
