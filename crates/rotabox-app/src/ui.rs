//! Toolbar panel.

use crate::app::LabelApp;

impl LabelApp {
    pub(crate) fn toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open Folder").clicked() {
                    if let Some(dir) = rfd::FileDialog::new().pick_folder() {
                        self.load_folder(dir);
                    }
                }
                if ui.button("Prev").clicked() {
                    self.prev_image();
                }
                if ui.button("Next").clicked() {
                    self.next_image();
                }
                if ui.button("Save").clicked() {
                    self.save_current();
                }

                ui.separator();

                ui.checkbox(&mut self.draw_mode, "Draw (W)");

                ui.separator();

                let selected_name = self
                    .classes
                    .get(self.current_class)
                    .cloned()
                    .unwrap_or_else(|| "<none>".to_string());
                let before = self.current_class;
                egui::ComboBox::from_id_salt("label-combo")
                    .selected_text(selected_name)
                    .show_ui(ui, |ui| {
                        for (idx, name) in self.classes.iter().enumerate() {
                            ui.selectable_value(&mut self.current_class, idx, name.clone());
                        }
                    });
                if self.current_class != before {
                    self.apply_label_to_selection();
                }

                ui.add(
                    egui::TextEdit::singleline(&mut self.class_input)
                        .hint_text("new class")
                        .desired_width(100.0),
                );
                if ui.button("Add Class").clicked() {
                    self.add_class();
                }

                ui.separator();

                let mut pct = self.zoom * 100.0;
                if ui
                    .add(egui::Slider::new(&mut pct, 10.0..=400.0).suffix("%"))
                    .changed()
                {
                    self.zoom = pct / 100.0;
                }

                ui.separator();

                let status = match self.current_idx {
                    Some(idx) => {
                        let name = self.image_paths[idx]
                            .file_name()
                            .and_then(|n| n.to_str())
                            .unwrap_or("?");
                        format!("{name} ({}/{})", idx + 1, self.image_paths.len())
                    }
                    None => "no image".to_string(),
                };
                ui.label(status);
            });
        });
    }
}
