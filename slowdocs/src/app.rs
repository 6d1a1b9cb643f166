//! Document windows and their cascade wiring
//!
//! Each document is an immediate egui viewport. Every frame we snapshot the
//! viewport's reported geometry, hand it to the cascade controller as a
//! [`CascadeWindow`], and turn geometry changes into the lifecycle events
//! the controller expects. Placement happens once per document, as soon as
//! the viewport reports where it is.

use egui::{CentralPanel, Context, Pos2, Rect, ViewportBuilder, ViewportCommand, ViewportId};
use slowcascade::{
    CascadeConfig, CascadeController, CascadeWindow, JsonFileStore, KindId, Placement,
    WindowEvent, WindowId,
};
use tracing::info;

/// One frame's view of a document viewport, in the shape the cascade
/// controller understands. `set_frame` only records the wish; the caller
/// turns the result into viewport commands.
struct ViewportWindow {
    id: WindowId,
    frame: Rect,
    screen: Option<Rect>,
    focused: bool,
}

impl CascadeWindow for ViewportWindow {
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
        // the snapshot only exists once the viewport reported geometry
        true
    }
    fn is_key(&self) -> bool {
        self.focused
    }
    fn is_main(&self) -> bool {
        self.focused
    }
}

/// A single open document.
struct DocWindow {
    id: WindowId,
    viewport_id: ViewportId,
    title: String,
    text: String,
    open: bool,
    /// Set once the cascade controller has positioned the window.
    placed: bool,
    /// Frame seen last frame, for detecting moves and resizes.
    last_frame: Option<Rect>,
    was_focused: bool,
}

pub struct SlowDocsApp {
    controller: CascadeController<JsonFileStore>,
    doc_kind: KindId,
    docs: Vec<DocWindow>,
    next_doc: u64,
}

impl SlowDocsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let mut controller = CascadeController::new(JsonFileStore::new("slowdocs"));
        let doc_kind = controller.register_kind(CascadeConfig::new("Document"));
        info!("saving window frames to {}", controller.store().path().display());

        let mut app = Self {
            controller,
            doc_kind,
            docs: Vec::new(),
            next_doc: 0,
        };
        app.open_document();
        app
    }

    fn open_document(&mut self) {
        self.next_doc += 1;
        self.docs.push(DocWindow {
            id: WindowId(self.next_doc),
            viewport_id: ViewportId::from_hash_of(("slowdoc", self.next_doc)),
            title: format!("untitled {}", self.next_doc),
            text: String::new(),
            open: true,
            placed: false,
            last_frame: None,
            was_focused: false,
        });
    }

    /// The library window: spawn button, cascade settings, open list.
    fn library_panel(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            ui.heading("slowDocs");
            ui.label("every document opens in its own window");
            ui.add_space(8.0);

            if ui.button("new document").clicked() {
                self.open_document();
            }

            ui.add_space(8.0);
            ui.separator();
            let config = self.controller.config_mut(self.doc_kind);
            ui.checkbox(&mut config.persist_frames, "remember window frames");
            ui.checkbox(&mut config.center_first_window, "center first window");
            ui.checkbox(
                &mut config.discard_on_last_close,
                "forget frame when last window closes",
            );

            ui.separator();
            ui.label(format!("open documents: {}", self.docs.len()));
            for doc in &self.docs {
                ui.label(format!("  {}", doc.title));
            }
        });
    }

    /// Show every open document viewport, placing new ones and feeding
    /// observed geometry changes back to the controller as events.
    fn show_documents(&mut self, ctx: &Context) {
        // counts the controller's conventions expect: placement excludes the
        // window being placed, close still includes the closing window
        let mut placed = self.docs.iter().filter(|d| d.open && d.placed).count();
        let mut open = self.docs.iter().filter(|d| d.open).count();

        let controller = &mut self.controller;
        let kind = self.doc_kind;

        for doc in &mut self.docs {
            if !doc.open {
                continue;
            }
            let builder = ViewportBuilder::default()
                .with_title(doc.title.clone())
                .with_inner_size([480.0, 360.0]);

            ctx.show_viewport_immediate(doc.viewport_id, builder, |ctx, _class| {
                CentralPanel::default().show(ctx, |ui| {
                    ui.text_edit_singleline(&mut doc.title);
                    ui.add_sized(
                        ui.available_size(),
                        egui::TextEdit::multiline(&mut doc.text),
                    );
                });

                let info = ctx.input(|i| i.viewport().clone());
                // outer position plus inner size, the same pair the builder
                // and the commands below work in
                let observed = match (info.outer_rect, info.inner_rect) {
                    (Some(outer), Some(inner)) => Some(Rect::from_min_size(outer.min, inner.size())),
                    _ => None,
                };
                let screen = info
                    .monitor_size
                    .map(|size| Rect::from_min_size(Pos2::ZERO, size));
                let focused = info.focused.unwrap_or(false);

                if let Some(frame) = observed {
                    let mut window = ViewportWindow {
                        id: doc.id,
                        frame,
                        screen,
                        focused,
                    };
                    if !doc.placed {
                        if controller.place_window(&mut window, kind, &placed) != Placement::Skipped {
                            doc.placed = true;
                            placed += 1;
                            let target = window.frame();
                            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(target.min));
                            ctx.send_viewport_cmd(ViewportCommand::InnerSize(target.size()));
                            doc.last_frame = Some(target);
                            doc.was_focused = focused;
                        }
                    } else {
                        if focused && !doc.was_focused {
                            controller.handle_event(&window, WindowEvent::BecameMain, &open);
                            controller.handle_event(&window, WindowEvent::BecameKey, &open);
                        }
                        if let Some(last) = doc.last_frame {
                            if frame.min != last.min {
                                controller.handle_event(&window, WindowEvent::Moved, &open);
                            }
                            if frame.size() != last.size() {
                                controller.handle_event(&window, WindowEvent::Resized, &open);
                            }
                        }
                        doc.last_frame = Some(frame);
                        doc.was_focused = focused;
                    }

                    if info.close_requested() {
                        controller.handle_event(&window, WindowEvent::WillClose, &open);
                        doc.open = false;
                        open -= 1;
                    }
                } else if info.close_requested() {
                    // closed before it ever reported geometry
                    controller.release_window(doc.id);
                    doc.open = false;
                    open -= 1;
                }
            });
        }

        self.docs.retain(|d| d.open);
    }
}

impl eframe::App for SlowDocsApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.library_panel(ctx);
        self.show_documents(ctx);
    }
}
