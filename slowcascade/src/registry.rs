//! Open-window census
//!
//! The controller decides "first window of its kind?" and "last one
//! closing?" from a count of open windows. The host owns that census; this
//! trait is how the controller asks for it at the moment of a placement or
//! a close, so the answer is never stale.

/// Source of the open-window count for one window kind.
///
/// The count follows the host's bookkeeping, with two conventions the
/// controller relies on: during placement the window being placed is not
/// counted yet (zero means it will be the first), and during close handling
/// the closing window is still counted (one means it is the last).
pub trait WindowRegistry {
    /// Number of windows of this kind currently open.
    fn window_count(&self) -> usize;
}

/// A bare count works as a census when the host already has the number.
impl WindowRegistry for usize {
    fn window_count(&self) -> usize {
        *self
    }
}
