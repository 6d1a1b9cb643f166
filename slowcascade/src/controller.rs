//! Cascading placement controller
//!
//! `CascadeController` owns the placement policy for every window kind an
//! app manages. The host wires it up once, then talks to it at two points
//! in a window's life:
//!
//! 1. **Placement**: call [`place_window`] when a new window is ready to be
//!    shown. The first window of a kind comes back where the user last left
//!    it (or centered); every later one steps down-right from the previous
//!    window, wrapping when it would leave the screen.
//! 2. **Events**: forward [`WindowEvent`]s as the host observes them. The
//!    controller persists the frame on main/resize/move, keeps the cascade
//!    anchor on the most recently touched window, and drops the saved frame
//!    when the last window closes (if configured to).
//!
//! Window kinds are registered up front with [`register_kind`]; each kind
//! has its own [`CascadeConfig`], autosave name, and cascade anchor, so
//! document windows and inspector panels cascade independently.
//!
//! The controller never talks to a windowing backend. It sees windows
//! through [`CascadeWindow`], counts them through [`WindowRegistry`], and
//! persists through [`FrameStore`], which keeps all of the policy in plain
//! synchronous code.
//!
//! [`place_window`]: CascadeController::place_window
//! [`register_kind`]: CascadeController::register_kind

use std::collections::HashMap;

use egui::{Pos2, Rect, Vec2};
use tracing::debug;

use crate::geometry;
use crate::registry::WindowRegistry;
use crate::store::FrameStore;
use crate::window::{CascadeWindow, WindowEvent, WindowId};

/// Per-kind placement policy.
///
/// The defaults match the common document-window setup: frames persist,
/// nothing is discarded on close, and a first window with a saved frame
/// reopens where it was rather than centered.
#[derive(Debug, Clone)]
pub struct CascadeConfig {
    /// Name the kind's frame is saved under. Pick one per kind.
    pub autosave_name: String,
    /// Save the frame on main/resize/move and restore it at placement.
    pub persist_frames: bool,
    /// Forget the saved frame when the last window of the kind closes.
    pub discard_on_last_close: bool,
    /// Center the first window even when a saved frame exists (the saved
    /// size is kept).
    pub center_first_window: bool,
    /// Size for a first window with no saved frame. `None` means 75% of
    /// the screen's visible frame.
    pub default_size: Option<Vec2>,
}

impl CascadeConfig {
    pub fn new(autosave_name: impl Into<String>) -> Self {
        Self {
            autosave_name: autosave_name.into(),
            persist_frames: true,
            discard_on_last_close: false,
            center_first_window: false,
            default_size: None,
        }
    }
}

/// Handle for a registered window kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KindId(usize);

/// What [`CascadeController::place_window`] did with the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The window had no screen; nothing was touched and the window is not
    /// tracked. Call again once it lands on a screen.
    Skipped,
    /// The saved frame was applied, pulled back on screen if needed.
    Restored,
    /// The window was centered, at its default size or at the saved size
    /// when recentering is configured.
    Centered,
    /// The window was stepped down-right from the previous one of its kind.
    Cascaded,
}

/// State kept per registered kind.
struct KindState {
    config: CascadeConfig,
    /// Top-left of the kind's most recently placed or touched window. This
    /// is the cascade anchor.
    last_top_left: Option<Pos2>,
}

/// Places windows and keeps their frames saved. See the module docs.
pub struct CascadeController<S: FrameStore> {
    store: S,
    kinds: Vec<KindState>,
    /// Which kind each live window belongs to.
    tracked: HashMap<WindowId, KindId>,
}

impl<S: FrameStore> CascadeController<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            kinds: Vec::new(),
            tracked: HashMap::new(),
        }
    }

    /// Register a window kind. Give each kind its own autosave name,
    /// otherwise they overwrite each other's saved frame.
    pub fn register_kind(&mut self, config: CascadeConfig) -> KindId {
        self.kinds.push(KindState {
            config,
            last_top_left: None,
        });
        KindId(self.kinds.len() - 1)
    }

    pub fn config(&self, kind: KindId) -> &CascadeConfig {
        &self.kinds[kind.0].config
    }

    pub fn config_mut(&mut self, kind: KindId) -> &mut CascadeConfig {
        &mut self.kinds[kind.0].config
    }

    /// Current cascade anchor for a kind, if any window has been placed or
    /// touched since startup.
    pub fn last_top_left(&self, kind: KindId) -> Option<Pos2> {
        self.kinds[kind.0].last_top_left
    }

    /// Whether events from this window are currently being handled.
    pub fn is_tracked(&self, id: WindowId) -> bool {
        self.tracked.contains_key(&id)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Position a window that is about to be shown, and start tracking it.
    ///
    /// `registry` must not count `window` itself yet: a count of zero means
    /// this is the first window of its kind. Returns what was done; on
    /// [`Placement::Skipped`] the window is left alone and not tracked.
    pub fn place_window<W: CascadeWindow>(
        &mut self,
        window: &mut W,
        kind: KindId,
        registry: &dyn WindowRegistry,
    ) -> Placement {
        let Some(screen) = window.screen() else {
            debug!("window {:?} has no screen, skipping placement", window.id());
            return Placement::Skipped;
        };

        let placement = if registry.window_count() == 0 {
            self.place_first(window, kind, screen)
        } else {
            self.place_cascaded(window, kind, screen)
        };

        let state = &mut self.kinds[kind.0];
        state.last_top_left = Some(window.top_left());
        self.tracked.insert(window.id(), kind);
        debug!(
            "placed {} window {:?}: {:?} at {:?}",
            state.config.autosave_name,
            window.id(),
            placement,
            window.top_left()
        );
        placement
    }

    /// First window of its kind: saved frame if there is one, otherwise
    /// default size, centered.
    fn place_first<W: CascadeWindow>(&self, window: &mut W, kind: KindId, screen: Rect) -> Placement {
        let config = &self.kinds[kind.0].config;
        let saved = if config.persist_frames {
            self.store.load(&config.autosave_name)
        } else {
            None
        };

        match saved {
            Some(saved) if config.center_first_window => {
                let top_left = geometry::center_on_screen(saved.size(), screen);
                window.set_frame(Rect::from_min_size(top_left, saved.size()));
                Placement::Centered
            }
            Some(saved) => {
                let top_left = geometry::clamp_to_screen(saved.min, saved.size(), screen);
                window.set_frame(Rect::from_min_size(top_left, saved.size()));
                Placement::Restored
            }
            None => {
                let size = config
                    .default_size
                    .unwrap_or_else(|| geometry::default_window_size(screen));
                let top_left = geometry::center_on_screen(size, screen);
                window.set_frame(Rect::from_min_size(top_left, size));
                Placement::Centered
            }
        }
    }

    /// Any later window: adopt the saved frame if there is one, then step
    /// down-right from the anchor. With no anchor yet, the window's own
    /// top-left (saved or not) starts the cascade.
    fn place_cascaded<W: CascadeWindow>(
        &self,
        window: &mut W,
        kind: KindId,
        screen: Rect,
    ) -> Placement {
        let state = &self.kinds[kind.0];
        if state.config.persist_frames {
            if let Some(saved) = self.store.load(&state.config.autosave_name) {
                window.set_frame(saved);
            }
        }

        let anchor = state.last_top_left.unwrap_or_else(|| window.top_left());
        let proposed = geometry::cascade_top_left(anchor);
        let top_left = geometry::clamp_to_screen(proposed, window.frame().size(), screen);
        window.set_top_left(top_left);
        Placement::Cascaded
    }

    /// Handle a lifecycle event from a tracked window. Events from windows
    /// the controller is not tracking are ignored.
    ///
    /// For [`WindowEvent::WillClose`], `registry` must still count the
    /// closing window: a count of one means the last window is going away.
    pub fn handle_event<W: CascadeWindow>(
        &mut self,
        window: &W,
        event: WindowEvent,
        registry: &dyn WindowRegistry,
    ) {
        let Some(&kind) = self.tracked.get(&window.id()) else {
            return;
        };
        let state = &mut self.kinds[kind.0];

        match event {
            WindowEvent::WillClose => {
                if state.config.discard_on_last_close && registry.window_count() == 1 {
                    debug!(
                        "last {} window closing, discarding saved frame",
                        state.config.autosave_name
                    );
                    self.store.clear(&state.config.autosave_name);
                }
                self.tracked.remove(&window.id());
            }
            _ if !window.is_loaded() || !state.config.persist_frames => {}
            WindowEvent::BecameMain => {
                self.store.save(&state.config.autosave_name, window.frame());
            }
            WindowEvent::BecameKey => {
                state.last_top_left = Some(window.top_left());
            }
            WindowEvent::Resized => {
                self.store.save(&state.config.autosave_name, window.frame());
                state.last_top_left = Some(window.top_left());
            }
            WindowEvent::Moved => {
                // only the window the user is actually holding counts
                if window.is_key() {
                    self.store.save(&state.config.autosave_name, window.frame());
                    if window.is_main() {
                        state.last_top_left = Some(window.top_left());
                    }
                }
            }
        }
    }

    /// Stop tracking a window without handling a close event. Useful when
    /// the host drops a window it never got a close notification for.
    pub fn release_window(&mut self, id: WindowId) {
        self.tracked.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};

    struct FakeWindow {
        id: WindowId,
        frame: Rect,
        screen: Option<Rect>,
        loaded: bool,
        key: bool,
        main: bool,
    }

    impl FakeWindow {
        fn new(id: u64) -> Self {
            Self {
                id: WindowId(id),
                frame: Rect::from_min_size(pos2(200.0, 200.0), vec2(400.0, 300.0)),
                screen: Some(Rect::from_min_size(Pos2::ZERO, vec2(1440.0, 900.0))),
                loaded: true,
                key: true,
                main: true,
            }
        }
    }

    impl CascadeWindow for FakeWindow {
        fn id(&self) -> WindowId {
            self.id
        }
        fn frame(&self) -> Rect {
            self.frame
        }
        fn set_frame(&mut self, frame: Rect) {
            self.frame = frame;
        }
        fn screen(&self) -> Option<Rect> {
            self.screen
        }
        fn is_loaded(&self) -> bool {
            self.loaded
        }
        fn is_key(&self) -> bool {
            self.key
        }
        fn is_main(&self) -> bool {
            self.main
        }
    }

    #[derive(Default)]
    struct MemStore {
        frames: HashMap<String, Rect>,
    }

    impl FrameStore for MemStore {
        fn save(&mut self, name: &str, frame: Rect) {
            self.frames.insert(name.to_string(), frame);
        }
        fn load(&self, name: &str) -> Option<Rect> {
            self.frames.get(name).copied()
        }
        fn clear(&mut self, name: &str) {
            self.frames.remove(name);
        }
    }

    fn controller() -> (CascadeController<MemStore>, KindId) {
        let mut controller = CascadeController::new(MemStore::default());
        let kind = controller.register_kind(CascadeConfig::new("Document"));
        (controller, kind)
    }

    fn seeded_controller(saved: Rect) -> (CascadeController<MemStore>, KindId) {
        let mut store = MemStore::default();
        store.save("Document", saved);
        let mut controller = CascadeController::new(store);
        let kind = controller.register_kind(CascadeConfig::new("Document"));
        (controller, kind)
    }

    #[test]
    fn test_first_window_without_saved_frame_centers() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);

        let placement = controller.place_window(&mut window, kind, &0usize);

        assert_eq!(placement, Placement::Centered);
        // 75% of 1440x900, centered
        assert_eq!(window.frame.size(), vec2(1080.0, 675.0));
        assert_eq!(window.frame.min, pos2(180.0, 112.5));
        assert!(controller.is_tracked(WindowId(1)));
        assert_eq!(controller.last_top_left(kind), Some(pos2(180.0, 112.5)));
    }

    #[test]
    fn test_first_window_uses_configured_default_size() {
        let (mut controller, kind) = controller();
        controller.config_mut(kind).default_size = Some(vec2(600.0, 400.0));
        let mut window = FakeWindow::new(1);

        controller.place_window(&mut window, kind, &0usize);

        assert_eq!(window.frame.size(), vec2(600.0, 400.0));
        assert_eq!(window.frame.min, pos2(420.0, 250.0));
    }

    #[test]
    fn test_first_window_with_saved_frame_restores() {
        let saved = Rect::from_min_size(pos2(300.0, 150.0), vec2(500.0, 400.0));
        let (mut controller, kind) = seeded_controller(saved);
        let mut window = FakeWindow::new(1);

        let placement = controller.place_window(&mut window, kind, &0usize);

        assert_eq!(placement, Placement::Restored);
        assert_eq!(window.frame, saved);
    }

    #[test]
    fn test_first_window_saved_offscreen_is_pulled_back() {
        let saved = Rect::from_min_size(pos2(1300.0, 850.0), vec2(400.0, 300.0));
        let (mut controller, kind) = seeded_controller(saved);
        let mut window = FakeWindow::new(1);

        let placement = controller.place_window(&mut window, kind, &0usize);

        assert_eq!(placement, Placement::Restored);
        assert_eq!(window.frame.min, pos2(1040.0, 0.0));
        assert_eq!(window.frame.size(), vec2(400.0, 300.0));
    }

    #[test]
    fn test_first_window_recenters_when_configured() {
        let saved = Rect::from_min_size(pos2(100.0, 100.0), vec2(500.0, 400.0));
        let (mut controller, kind) = seeded_controller(saved);
        controller.config_mut(kind).center_first_window = true;
        let mut window = FakeWindow::new(1);

        let placement = controller.place_window(&mut window, kind, &0usize);

        // saved size kept, position recentered
        assert_eq!(placement, Placement::Centered);
        assert_eq!(window.frame.size(), vec2(500.0, 400.0));
        assert_eq!(window.frame.min, pos2(470.0, 250.0));
    }

    #[test]
    fn test_second_window_cascades_from_first() {
        let (mut controller, kind) = controller();
        let mut first = FakeWindow::new(1);
        let mut second = FakeWindow::new(2);

        controller.place_window(&mut first, kind, &0usize);
        let placement = controller.place_window(&mut second, kind, &1usize);

        assert_eq!(placement, Placement::Cascaded);
        assert_eq!(second.frame.min, first.frame.min + vec2(30.0, 30.0));
        // nothing saved yet, so the second window keeps its own size
        assert_eq!(second.frame.size(), vec2(400.0, 300.0));
        assert_eq!(controller.last_top_left(kind), Some(second.frame.min));
    }

    #[test]
    fn test_cascaded_window_adopts_saved_size() {
        let saved = Rect::from_min_size(pos2(50.0, 60.0), vec2(640.0, 480.0));
        let (mut controller, kind) = seeded_controller(saved);
        let mut first = FakeWindow::new(1);
        let mut second = FakeWindow::new(2);

        controller.place_window(&mut first, kind, &0usize);
        controller.place_window(&mut second, kind, &1usize);

        assert_eq!(first.frame, saved);
        assert_eq!(second.frame.size(), vec2(640.0, 480.0));
        assert_eq!(second.frame.min, pos2(80.0, 90.0));
    }

    #[test]
    fn test_cascade_without_anchor_starts_from_own_top_left() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);

        // other windows exist but none were placed by this controller
        let placement = controller.place_window(&mut window, kind, &2usize);

        assert_eq!(placement, Placement::Cascaded);
        assert_eq!(window.frame.min, pos2(230.0, 230.0));
    }

    #[test]
    fn test_cascade_wraps_at_screen_corner() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        window.frame = Rect::from_min_size(pos2(1200.0, 700.0), vec2(400.0, 300.0));

        controller.place_window(&mut window, kind, &3usize);

        // 1230x730 would hang off both edges: wrap to the top, right-aligned
        assert_eq!(window.frame.min, pos2(1040.0, 0.0));
    }

    #[test]
    fn test_window_without_screen_is_skipped() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        window.screen = None;
        let before = window.frame;

        let placement = controller.place_window(&mut window, kind, &0usize);

        assert_eq!(placement, Placement::Skipped);
        assert_eq!(window.frame, before);
        assert!(!controller.is_tracked(WindowId(1)));
    }

    #[test]
    fn test_resize_and_main_events_persist_frame() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);

        window.frame = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        controller.handle_event(&window, WindowEvent::Resized, &1usize);
        assert_eq!(controller.store().load("Document"), Some(window.frame));
        assert_eq!(controller.last_top_left(kind), Some(pos2(10.0, 20.0)));

        window.frame = Rect::from_min_size(pos2(40.0, 50.0), vec2(800.0, 600.0));
        controller.handle_event(&window, WindowEvent::BecameMain, &1usize);
        assert_eq!(controller.store().load("Document"), Some(window.frame));
        // becoming main does not move the anchor
        assert_eq!(controller.last_top_left(kind), Some(pos2(10.0, 20.0)));
    }

    #[test]
    fn test_became_key_moves_anchor_without_saving() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);

        window.frame = Rect::from_min_size(pos2(5.0, 6.0), vec2(400.0, 300.0));
        controller.handle_event(&window, WindowEvent::BecameKey, &1usize);

        assert_eq!(controller.last_top_left(kind), Some(pos2(5.0, 6.0)));
        assert_eq!(controller.store().load("Document"), None);
    }

    #[test]
    fn test_move_saves_only_while_key() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);
        let placed_top_left = controller.last_top_left(kind);

        window.key = false;
        window.frame = Rect::from_min_size(pos2(70.0, 80.0), vec2(400.0, 300.0));
        controller.handle_event(&window, WindowEvent::Moved, &1usize);
        assert_eq!(controller.store().load("Document"), None);
        assert_eq!(controller.last_top_left(kind), placed_top_left);

        // key but not main: frame saved, anchor stays
        window.key = true;
        window.main = false;
        controller.handle_event(&window, WindowEvent::Moved, &1usize);
        assert_eq!(controller.store().load("Document"), Some(window.frame));
        assert_eq!(controller.last_top_left(kind), placed_top_left);

        window.main = true;
        controller.handle_event(&window, WindowEvent::Moved, &1usize);
        assert_eq!(controller.last_top_left(kind), Some(pos2(70.0, 80.0)));
    }

    #[test]
    fn test_events_ignored_until_loaded() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);

        window.loaded = false;
        controller.handle_event(&window, WindowEvent::Resized, &1usize);

        assert_eq!(controller.store().load("Document"), None);
    }

    #[test]
    fn test_events_from_untracked_windows_ignored() {
        let (mut controller, _kind) = controller();
        let window = FakeWindow::new(7);

        controller.handle_event(&window, WindowEvent::Resized, &1usize);

        assert_eq!(controller.store().load("Document"), None);
    }

    #[test]
    fn test_persistence_disabled_never_touches_store() {
        let saved = Rect::from_min_size(pos2(300.0, 150.0), vec2(500.0, 400.0));
        let (mut controller, kind) = seeded_controller(saved);
        controller.config_mut(kind).persist_frames = false;
        let mut window = FakeWindow::new(1);

        let placement = controller.place_window(&mut window, kind, &0usize);
        // the saved frame is ignored and the window centered fresh
        assert_eq!(placement, Placement::Centered);
        assert_eq!(window.frame.size(), vec2(1080.0, 675.0));

        window.frame = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        controller.handle_event(&window, WindowEvent::Resized, &1usize);
        assert_eq!(controller.store().load("Document"), Some(saved));
    }

    #[test]
    fn test_last_close_discards_saved_frame() {
        let (mut controller, kind) = controller();
        controller.config_mut(kind).discard_on_last_close = true;
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);
        controller.handle_event(&window, WindowEvent::Resized, &1usize);
        assert!(controller.store().load("Document").is_some());

        // two windows open: closing one keeps the frame
        controller.handle_event(&window, WindowEvent::WillClose, &2usize);
        assert!(controller.store().load("Document").is_some());
        assert!(!controller.is_tracked(WindowId(1)));

        let mut window = FakeWindow::new(2);
        controller.place_window(&mut window, kind, &0usize);
        controller.handle_event(&window, WindowEvent::WillClose, &1usize);
        assert_eq!(controller.store().load("Document"), None);
    }

    #[test]
    fn test_close_keeps_saved_frame_by_default() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);
        controller.handle_event(&window, WindowEvent::Resized, &1usize);

        controller.handle_event(&window, WindowEvent::WillClose, &1usize);

        assert!(controller.store().load("Document").is_some());
        assert!(!controller.is_tracked(WindowId(1)));
    }

    #[test]
    fn test_release_window_stops_tracking() {
        let (mut controller, kind) = controller();
        let mut window = FakeWindow::new(1);
        controller.place_window(&mut window, kind, &0usize);

        controller.release_window(WindowId(1));
        window.frame = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        controller.handle_event(&window, WindowEvent::Resized, &1usize);

        assert!(!controller.is_tracked(WindowId(1)));
        assert_eq!(controller.store().load("Document"), None);
    }

    #[test]
    fn test_kinds_cascade_independently() {
        let mut controller = CascadeController::new(MemStore::default());
        let docs = controller.register_kind(CascadeConfig::new("Document"));
        let inspectors = controller.register_kind(CascadeConfig::new("Inspector"));

        let mut doc = FakeWindow::new(1);
        let mut inspector = FakeWindow::new(2);
        controller.place_window(&mut doc, docs, &0usize);
        controller.place_window(&mut inspector, inspectors, &0usize);

        doc.frame = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        inspector.frame = Rect::from_min_size(pos2(900.0, 40.0), vec2(300.0, 500.0));
        controller.handle_event(&doc, WindowEvent::Resized, &1usize);
        controller.handle_event(&inspector, WindowEvent::Resized, &1usize);

        assert_eq!(controller.store().load("Document"), Some(doc.frame));
        assert_eq!(
            controller.store().load("Inspector"),
            Some(inspector.frame)
        );
        assert_eq!(controller.last_top_left(docs), Some(pos2(10.0, 20.0)));
        assert_eq!(controller.last_top_left(inspectors), Some(pos2(900.0, 40.0)));
    }
}
