//! Application state and the frame update loop.

use crate::canvas::{self, View};
use kurbo::{Point, Vec2};
use rotabox_core::handles::{self, HandleKind};
use rotabox_core::{
    storage, AnnotationSet, BoxId, DrawTool, InteractionController, UndoStack,
};
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];
const CLASSES_FILE: &str = "classes.txt";

/// The annotator application.
pub struct LabelApp {
    pub(crate) image_paths: Vec<PathBuf>,
    pub(crate) current_idx: Option<usize>,

    pub(crate) raw_image: Option<image::DynamicImage>,
    pub(crate) texture: Option<egui::TextureHandle>,
    pub(crate) image_size: egui::Vec2,

    pub(crate) annotations: AnnotationSet,
    pub(crate) undo: UndoStack,

    pub(crate) classes: Vec<String>,
    pub(crate) current_class: usize,
    pub(crate) class_input: String,

    pub(crate) draw_mode: bool,
    pub(crate) draw_tool: DrawTool,
    pub(crate) controller: InteractionController,
    /// Box owned by the active handle drag.
    active_box: Option<BoxId>,
    /// Box being moved by a body drag.
    moving_box: Option<BoxId>,

    pub(crate) pan: egui::Vec2,
    pub(crate) zoom: f32,

    last_title: String,
}

impl LabelApp {
    pub fn new(folder: Option<PathBuf>) -> Self {
        let classes = storage::load_classes(Path::new(CLASSES_FILE)).unwrap_or_else(|e| {
            log::error!("failed to load {CLASSES_FILE}: {e}");
            Vec::new()
        });

        let mut app = Self {
            image_paths: Vec::new(),
            current_idx: None,
            raw_image: None,
            texture: None,
            image_size: egui::Vec2::ZERO,
            annotations: AnnotationSet::new(),
            undo: UndoStack::new(),
            classes,
            current_class: 0,
            class_input: String::new(),
            draw_mode: false,
            draw_tool: DrawTool::new(),
            controller: InteractionController::new(),
            active_box: None,
            moving_box: None,
            pan: egui::Vec2::ZERO,
            zoom: 1.0,
            last_title: String::new(),
        };
        if let Some(dir) = folder {
            app.load_folder(dir);
        }
        app
    }

    pub(crate) fn current_label(&self) -> String {
        self.classes.get(self.current_class).cloned().unwrap_or_default()
    }

    pub(crate) fn current_image_path(&self) -> Option<&Path> {
        self.current_idx.map(|i| self.image_paths[i].as_path())
    }

    pub(crate) fn load_folder(&mut self, dir: PathBuf) {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| {
                    p.extension()
                        .and_then(|e| e.to_str())
                        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                        .unwrap_or(false)
                })
                .collect(),
            Err(e) => {
                log::error!("failed to read {}: {e}", dir.display());
                return;
            }
        };
        paths.sort();
        log::info!("opened {} with {} images", dir.display(), paths.len());

        self.image_paths = paths;
        self.current_idx = if self.image_paths.is_empty() { None } else { Some(0) };
        self.load_current();
    }

    /// Load the image at the current index and its annotation sidecar,
    /// replacing the annotation set and resetting per-image state.
    pub(crate) fn load_current(&mut self) {
        self.texture = None;
        self.raw_image = None;
        self.image_size = egui::Vec2::ZERO;
        self.annotations = AnnotationSet::new();
        self.undo.clear();
        self.draw_tool.cancel();
        self.controller = InteractionController::new();
        self.active_box = None;
        self.moving_box = None;

        let Some(path) = self.current_image_path().map(Path::to_path_buf) else {
            return;
        };

        match image::open(&path) {
            Ok(img) => {
                self.image_size = egui::vec2(img.width() as f32, img.height() as f32);
                self.raw_image = Some(img);
            }
            Err(e) => log::error!("failed to open {}: {e}", path.display()),
        }

        match storage::load_annotations(&path) {
            Ok(boxes) => self.annotations = AnnotationSet::from_boxes(boxes),
            Err(e) => log::error!("failed to load annotations for {}: {e}", path.display()),
        }
    }

    pub(crate) fn save_current(&self) {
        let Some(path) = self.current_image_path() else {
            return;
        };
        if let Err(e) = storage::save_annotations(path, self.annotations.boxes()) {
            log::error!("failed to save annotations for {}: {e}", path.display());
        }
    }

    pub(crate) fn prev_image(&mut self) {
        if let Some(idx) = self.current_idx {
            if idx > 0 {
                self.current_idx = Some(idx - 1);
                self.load_current();
            }
        }
    }

    pub(crate) fn next_image(&mut self) {
        if let Some(idx) = self.current_idx {
            if idx + 1 < self.image_paths.len() {
                self.current_idx = Some(idx + 1);
                self.load_current();
            }
        }
    }

    pub(crate) fn add_class(&mut self) {
        let name = self.class_input.trim().to_string();
        self.class_input.clear();
        if name.is_empty() || self.classes.iter().any(|c| c == &name) {
            return;
        }
        if let Err(e) = storage::append_class(Path::new(CLASSES_FILE), &name) {
            log::error!("failed to update {CLASSES_FILE}: {e}");
        }
        self.classes.push(name);
        self.current_class = self.classes.len() - 1;
    }

    pub(crate) fn apply_label_to_selection(&mut self) {
        let label = self.current_label();
        for bx in self.annotations.boxes_mut() {
            if bx.selected {
                bx.label = label.clone();
            }
        }
    }

    fn delete_selected(&mut self) {
        for id in self.annotations.selected_ids() {
            if let Some(bx) = self.annotations.remove(id) {
                self.undo.record_deleted(bx);
            }
        }
    }

    fn cancel_active_drag(&mut self) {
        if self.draw_tool.is_active() {
            self.draw_tool.cancel();
            return;
        }
        if let Some(id) = self.active_box.take() {
            if let Some(bx) = self.annotations.get_mut(id) {
                self.controller.cancel(bx);
            }
        }
    }

    fn image_contains(&self, p: Point) -> bool {
        self.image_size != egui::Vec2::ZERO
            && p.x >= 0.0
            && p.y >= 0.0
            && p.x <= self.image_size.x as f64
            && p.y <= self.image_size.y as f64
    }

    fn clamp_to_image(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(0.0, self.image_size.x as f64),
            p.y.clamp(0.0, self.image_size.y as f64),
        )
    }

    fn on_pointer_down(&mut self, p: Point) {
        if self.draw_mode {
            if self.image_contains(p) {
                self.draw_tool.begin(p);
            }
            return;
        }

        // Handle grabs only apply to selected boxes, topmost first.
        for bx in self.annotations.boxes().iter().rev() {
            if bx.selected && self.controller.pointer_down(bx, p) {
                self.active_box = Some(bx.id());
                return;
            }
        }

        if let Some(id) = self.annotations.hit_topmost(p) {
            self.annotations.select_only(id);
            self.moving_box = Some(id);
        } else {
            self.annotations.clear_selection();
        }
    }

    fn on_pointer_move(&mut self, p: Point, screen_delta: egui::Vec2) {
        if self.draw_tool.is_active() {
            self.draw_tool.update(self.clamp_to_image(p));
            return;
        }
        if let Some(id) = self.active_box {
            if let Some(bx) = self.annotations.get_mut(id) {
                self.controller.pointer_move(bx, p);
            }
            return;
        }
        if let Some(id) = self.moving_box {
            let delta = Vec2::new(
                (screen_delta.x / self.zoom) as f64,
                (screen_delta.y / self.zoom) as f64,
            );
            if let Some(bx) = self.annotations.get_mut(id) {
                bx.translate(delta);
            }
        }
    }

    fn on_pointer_up(&mut self, p: Point) {
        if self.draw_tool.is_active() {
            let label = self.current_label();
            if let Some(bx) = self.draw_tool.end(self.clamp_to_image(p), &label) {
                let id = self.annotations.add(bx);
                self.undo.record_created(id);
                log::debug!("created box {id}");
            }
            return;
        }
        if self.active_box.take().is_some() {
            if let Some(kind) = self.controller.pointer_up() {
                log::debug!("drag finalized: {kind:?}");
            }
        }
        self.moving_box = None;
    }

    fn hover_cursor(&self, p: Point) -> Option<egui::CursorIcon> {
        if self.draw_mode {
            return Some(egui::CursorIcon::Crosshair);
        }
        for bx in self.annotations.boxes().iter().rev() {
            if !bx.selected {
                continue;
            }
            match handles::hit_test(bx, bx.scene_to_local(p)) {
                Some(HandleKind::Rotate) => return Some(egui::CursorIcon::Crosshair),
                Some(HandleKind::Corner(_)) => return Some(egui::CursorIcon::Move),
                None => {}
            }
        }
        None
    }

    fn sync_title(&mut self, ctx: &egui::Context) {
        let name = self
            .current_image_path()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("no image");
        let mode = if self.draw_mode { "ON" } else { "OFF" };
        let title = format!("rotabox | {name} | draw mode: {mode}");
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
    }

    fn ensure_texture(&mut self, ctx: &egui::Context) {
        if self.texture.is_some() {
            return;
        }
        if let Some(img) = &self.raw_image {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            let color_image = egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice());
            self.texture =
                Some(ctx.load_texture("image", color_image, egui::TextureOptions::LINEAR));
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            if i.modifiers.ctrl && i.key_pressed(egui::Key::Z) {
                self.undo.undo(&mut self.annotations);
            }
            if i.modifiers.ctrl && i.key_pressed(egui::Key::S) {
                self.save_current();
            }
            if i.key_pressed(egui::Key::W) {
                self.draw_mode = !self.draw_mode;
                if !self.draw_mode {
                    self.draw_tool.cancel();
                }
            }
            if i.key_pressed(egui::Key::Delete) {
                self.delete_selected();
            }
            if i.key_pressed(egui::Key::Escape) {
                self.cancel_active_drag();
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                self.prev_image();
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                self.next_image();
            }
        });
    }

    fn canvas_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let view = View {
            canvas_rect: response.rect,
            pan: self.pan,
            zoom: self.zoom,
            image_size: self.image_size,
        };

        painter.rect_filled(response.rect, 0.0, egui::Color32::from_gray(40));
        if let Some(tex) = &self.texture {
            painter.image(
                tex.id(),
                view.image_rect_on_screen(),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        for bx in self.annotations.boxes() {
            canvas::paint_box(&painter, &view, bx);
        }
        if let Some(preview) = self.draw_tool.preview() {
            canvas::paint_preview(&painter, &view, &preview);
        }

        if let Some(pos) = response.hover_pos() {
            if let Some(cursor) = self.hover_cursor(view.to_scene(pos)) {
                ctx.output_mut(|o| o.cursor_icon = cursor);
            }
        }

        // Pan with the middle mouse button.
        if ctx.input(|i| i.pointer.middle_down()) {
            self.pan += ctx.input(|i| i.pointer.delta());
        }

        // Ctrl + wheel zooms, anchored at the cursor.
        let (scroll, ctrl) = ctx.input(|i| (i.smooth_scroll_delta.y, i.modifiers.ctrl));
        if ctrl && scroll != 0.0 && response.hovered() {
            let zoom_factor = 1.0 + scroll * 0.002;
            let new_zoom = (self.zoom * zoom_factor).clamp(0.1, 5.0);
            if let Some(cursor) = response.hover_pos() {
                let rel = cursor - response.rect.center() - self.pan;
                self.pan -= rel * (new_zoom / self.zoom - 1.0);
            }
            self.zoom = new_zoom;
        }

        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                let p = view.to_scene(pos);
                self.on_pointer_down(p);
                self.on_pointer_up(p);
            }
        }
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.hover_pos() {
                self.on_pointer_down(view.to_scene(pos));
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response
                .hover_pos()
                .or(ctx.input(|i| i.pointer.latest_pos()))
            {
                self.on_pointer_move(view.to_scene(pos), response.drag_delta());
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(pos) = response
                .hover_pos()
                .or(ctx.input(|i| i.pointer.latest_pos()))
            {
                self.on_pointer_up(view.to_scene(pos));
            }
        }
    }
}

impl eframe::App for LabelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ensure_texture(ctx);
        self.sync_title(ctx);
        self.handle_shortcuts(ctx);
        self.toolbar(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ctx, ui);
        });
    }
}
