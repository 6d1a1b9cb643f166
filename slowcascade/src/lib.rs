//! slowcascade — window cascading and frame persistence for slow computer applications
//!
//! New windows open offset down-right from the previous one instead of
//! stacking in the same spot, and every window remembers where the user
//! left it across launches. See [`controller`] for the wiring.

pub mod controller;
pub mod geometry;
pub mod registry;
pub mod store;
pub mod window;

pub use controller::{CascadeConfig, CascadeController, KindId, Placement};
pub use registry::WindowRegistry;
pub use store::{FrameStore, JsonFileStore};
pub use window::{CascadeWindow, WindowEvent, WindowId};
