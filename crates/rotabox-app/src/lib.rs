//! Rotabox desktop annotator.
//!
//! eframe/egui shell around the `rotabox-core` engine: image canvas,
//! folder navigation, draw mode, label classes, and shortcuts.

mod app;
mod canvas;
mod ui;

pub use app::LabelApp;
