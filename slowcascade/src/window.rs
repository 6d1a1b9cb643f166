//! Window abstraction
//!
//! `CascadeWindow` is the controller's view of a host window: just enough
//! surface to read and move a frame without binding the library to one
//! windowing backend. The slowdocs demo implements it over egui viewports;
//! the controller tests implement it over a plain struct.

use egui::{Pos2, Rect, Vec2};

/// Stable identity for a window over its whole life.
///
/// The host picks the value; viewport id hashes, document ids, or plain
/// counters all work. Equality is all the controller needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowId(pub u64);

/// Lifecycle notifications the host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window became the frontmost window of the application.
    BecameMain,
    /// The window received keyboard focus.
    BecameKey,
    /// The user finished resizing the window.
    Resized,
    /// The user finished moving the window.
    Moved,
    /// The window is about to close.
    WillClose,
}

/// The controller's view of a host window.
pub trait CascadeWindow {
    /// Stable identity, constant for the life of the window.
    fn id(&self) -> WindowId;

    /// Current frame in screen coordinates.
    fn frame(&self) -> Rect;

    /// Move and resize the window.
    fn set_frame(&mut self, frame: Rect);

    /// Visible frame of the screen this window lives on, or `None` while
    /// the window is not attached to any screen.
    fn screen(&self) -> Option<Rect>;

    /// Whether the window has finished loading its content. Events arriving
    /// earlier are ignored.
    fn is_loaded(&self) -> bool;

    /// Whether the window currently has keyboard focus.
    fn is_key(&self) -> bool;

    /// Whether the window is the frontmost window of the application.
    ///
    /// Hosts that do not distinguish main from key can answer both from the
    /// same flag.
    fn is_main(&self) -> bool;

    /// Top-left corner of the frame.
    fn top_left(&self) -> Pos2 {
        self.frame().min
    }

    /// Move the window to `top_left` without changing its size.
    fn set_top_left(&mut self, top_left: Pos2) {
        let size: Vec2 = self.frame().size();
        self.set_frame(Rect::from_min_size(top_left, size));
    }
}
