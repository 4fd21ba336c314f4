//! Canvas painting and scene/screen transforms.

use kurbo::Point;
use rotabox_core::{Corner, OrientedBox};

/// Maps between scene (image) coordinates and screen coordinates for the
/// current frame: the image is centered in the canvas, then panned and
/// zoomed.
#[derive(Clone, Copy)]
pub(crate) struct View {
    pub canvas_rect: egui::Rect,
    pub pan: egui::Vec2,
    pub zoom: f32,
    pub image_size: egui::Vec2,
}

impl View {
    pub fn to_screen(&self, p: Point) -> egui::Pos2 {
        let center = self.canvas_rect.center();
        center + self.pan + (egui::vec2(p.x as f32, p.y as f32) - self.image_size * 0.5) * self.zoom
    }

    pub fn to_scene(&self, pos: egui::Pos2) -> Point {
        let center = self.canvas_rect.center();
        let rel = pos - center - self.pan;
        Point::new(
            (rel.x / self.zoom + self.image_size.x * 0.5) as f64,
            (rel.y / self.zoom + self.image_size.y * 0.5) as f64,
        )
    }

    pub fn image_rect_on_screen(&self) -> egui::Rect {
        egui::Rect::from_min_max(
            self.to_screen(Point::ZERO),
            self.to_screen(Point::new(self.image_size.x as f64, self.image_size.y as f64)),
        )
    }
}

/// Map the corners of a local-frame rect through the box pose to screen
/// points, as a drawable loop.
fn local_rect_points(view: &View, bx: &OrientedBox, rect: kurbo::Rect) -> Vec<egui::Pos2> {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ]
    .iter()
    .map(|&p| view.to_screen(bx.local_to_scene(p)))
    .collect()
}

/// Paint one box: outline, and when selected the handles and label.
pub(crate) fn paint_box(painter: &egui::Painter, view: &View, bx: &OrientedBox) {
    let stroke_color = if bx.selected {
        egui::Color32::RED
    } else {
        egui::Color32::GREEN
    };
    let outline: Vec<egui::Pos2> = bx.corners().iter().map(|&p| view.to_screen(p)).collect();
    painter.add(egui::Shape::closed_line(
        outline,
        egui::Stroke::new(2.0, stroke_color),
    ));

    if bx.selected {
        for corner in Corner::ALL {
            painter.add(egui::Shape::convex_polygon(
                local_rect_points(view, bx, bx.corner_handle_rect(corner)),
                egui::Color32::from_gray(200),
                egui::Stroke::NONE,
            ));
        }
        painter.add(egui::Shape::convex_polygon(
            local_rect_points(view, bx, bx.rotation_handle_rect()),
            egui::Color32::from_rgb(150, 150, 255),
            egui::Stroke::NONE,
        ));

        let anchor = view.to_screen(bx.corner_scene(Corner::TopLeft));
        painter.text(
            anchor + egui::vec2(4.0, -4.0),
            egui::Align2::LEFT_BOTTOM,
            &bx.label,
            egui::FontId::proportional(14.0),
            egui::Color32::BLACK,
        );
    }
}

/// Paint the rubber-band preview while drawing a new box.
pub(crate) fn paint_preview(painter: &egui::Painter, view: &View, bx: &OrientedBox) {
    let outline: Vec<egui::Pos2> = bx.corners().iter().map(|&p| view.to_screen(p)).collect();
    painter.add(egui::Shape::closed_line(
        outline,
        egui::Stroke::new(1.5, egui::Color32::GREEN),
    ));
}
