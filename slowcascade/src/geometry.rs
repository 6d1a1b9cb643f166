//! Window placement geometry
//!
//! Pure arithmetic over egui screen coordinates (origin at the top-left of
//! the screen, y growing downward). `cascade_top_left` steps a new window
//! down-right from the previous one; `clamp_to_screen` pulls a prospective
//! frame back inside the visible screen bounds. Nothing in here touches a
//! window or a screen directly, which is what keeps it testable.

use egui::{Pos2, Rect, Vec2};

/// Diagonal offset between successive cascaded windows, in points.
pub const CASCADE_STEP: Vec2 = Vec2::new(30.0, 30.0);

/// Fraction of the visible screen used to size the first window when the
/// host supplies no default.
const DEFAULT_SIZE_FRACTION: f32 = 0.75;

/// Next cascade position: one step down-right from `from`.
///
/// Stateless; the caller owns the anchor (the controller's shared
/// last-top-left). Calling twice with the same input yields the same output.
pub fn cascade_top_left(from: Pos2) -> Pos2 {
    from + CASCADE_STEP
}

/// Adjust a proposed top-left so a window of `window_size` stays inside
/// `screen` (the screen's visible frame).
///
/// Returns `proposed` unchanged when the frame already fits. Otherwise the
/// rules below run in order, each testing the unadjusted prospective frame,
/// with later rules overriding earlier x adjustments:
///
/// 1. bottom edge below the screen: wrap the window back to the top edge
/// 2. left edge off-screen: pin to the screen's left edge
/// 3. right edge off-screen: align the right edge with the screen's
/// 4. window exactly the size of the screen: pin to the left edge
pub fn clamp_to_screen(proposed: Pos2, window_size: Vec2, screen: Rect) -> Pos2 {
    let frame = Rect::from_min_size(proposed, window_size);
    if screen.contains_rect(frame) {
        return proposed;
    }

    let mut top_left = proposed;
    if frame.max.y > screen.max.y {
        top_left.y = screen.min.y;
    }
    if frame.min.x < screen.min.x {
        top_left.x = screen.min.x;
    }
    if frame.max.x > screen.max.x {
        top_left.x = screen.max.x - window_size.x;
    }
    if window_size == screen.size() {
        top_left.x = screen.min.x;
    }
    top_left
}

/// Top-left that centers a window of `window_size` on `screen`.
pub fn center_on_screen(window_size: Vec2, screen: Rect) -> Pos2 {
    screen.min + (screen.size() - window_size) * 0.5
}

/// First-run window size when the host does not supply one: 75% of the
/// visible screen, floored to whole pixels.
pub fn default_window_size(screen: Rect) -> Vec2 {
    Vec2::new(
        (screen.width() * DEFAULT_SIZE_FRACTION).floor(),
        (screen.height() * DEFAULT_SIZE_FRACTION).floor(),
    )
}
