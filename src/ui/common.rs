//! # UI Common Components and Utilities
//!
//! Shared styling and conversions for the controller surface renderer.
//!
//! ## Key Abstractions
//!
//! ### Theme and Styling System
//! The [`UiColors`] struct provides the dark palette used by every drawn
//! element: panel backgrounds, released and pressed buttons, divider handles
//! and the connection indicator in the top bar.
//!
//! ### Geometry Conversion
//! The layout module works in its own [`Rect`] type so it stays independent of
//! egui. [`to_egui_rect`] and [`from_egui_rect`] convert at the paint and
//! arrange boundary.

use crate::layout::geometry::Rect;
use crate::transport::ConnectionState;
use eframe::egui::{self, pos2, vec2, Color32, Frame, Stroke};

/// Creates a styled frame with consistent visual parameters.
pub fn create_frame(bg_color: Color32, border_color: Color32) -> Frame {
    Frame::new()
        .stroke(Stroke::new(1.0, border_color))
        .fill(bg_color)
        .inner_margin(4)
        .outer_margin(2)
}

pub fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(pos2(rect.x, rect.y), vec2(rect.width, rect.height))
}

pub fn from_egui_rect(rect: egui::Rect) -> Rect {
    Rect::new(rect.min.x, rect.min.y, rect.width(), rect.height())
}

/// Label and indicator color for the transport state.
pub fn connection_badge(state: ConnectionState) -> (&'static str, Color32) {
    match state {
        ConnectionState::Disabled => ("offline", UiColors::BORDER),
        ConnectionState::Connecting => ("connecting", UiColors::HANDLE),
        ConnectionState::Connected => ("connected", UiColors::ACTIVE),
        ConnectionState::Failed => ("no broker", UiColors::INACTIVE),
    }
}

/// Centralized color palette for the dark theme.
///
/// ## Color Hierarchy
/// - **Background Colors**: INNER_BG → MAIN_BG (darkest to lightest)
/// - **Controls**: BUTTON for released controls, PRESSED while held
/// - **Status Colors**: ACTIVE (green) for connected, INACTIVE (red) for failed
/// - **Structural Colors**: BORDER for outlines, HANDLE for divider handles
pub struct UiColors;

impl UiColors {
    /// Primary background color for the surface (RGB: 30, 30, 30)
    pub const MAIN_BG: Color32 = Color32::from_rgb(30, 30, 30);

    /// Top bar background (RGB: 25, 25, 25)
    pub const INNER_BG: Color32 = Color32::from_rgb(25, 25, 25);

    /// Border color for control outlines (RGB: 60, 60, 60)
    pub const BORDER: Color32 = Color32::from_rgb(60, 60, 60);

    /// Released control fill (RGB: 45, 45, 50)
    pub const BUTTON: Color32 = Color32::from_rgb(45, 45, 50);

    /// Held control fill (RGB: 70, 110, 190)
    pub const PRESSED: Color32 = Color32::from_rgb(70, 110, 190);

    /// Divider handle fill while adjusting (RGB: 220, 170, 40)
    pub const HANDLE: Color32 = Color32::from_rgb(220, 170, 40);

    pub const TEXT: Color32 = Color32::from_rgb(220, 220, 220);

    /// Connected status indicator color (RGB: 50, 200, 20) - Green
    pub const ACTIVE: Color32 = Color32::from_rgb(50, 200, 20);

    /// Failed status indicator color (RGB: 200, 50, 20) - Red
    pub const INACTIVE: Color32 = Color32::from_rgb(200, 50, 20);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rects_convert_both_ways() {
        let rect = Rect::new(10.0, 20.0, 300.0, 40.0);
        let converted = to_egui_rect(rect);
        assert_eq!(converted.min, pos2(10.0, 20.0));
        assert_eq!(converted.max, pos2(310.0, 60.0));
        assert_eq!(from_egui_rect(converted), rect);
    }
}
