//! Native entry point.

use std::path::PathBuf;

fn main() {
    env_logger::init();
    log::info!("starting rotabox");

    let folder = std::env::args().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("rotabox"),
        ..Default::default()
    };

    eframe::run_native(
        "rotabox",
        options,
        Box::new(move |_cc| Ok(Box::new(rotabox_app::LabelApp::new(folder)))),
    )
    .expect("failed to run eframe");
}
