//! Oriented bounding box entity and its geometry.

use crate::canonical::canonicalize_angle;
use crate::document::BoxRecord;
use crate::handles::{Corner, HANDLE_SIZE};
use kurbo::{Point, Rect, Size, Vec2};
use uuid::Uuid;

/// Identifier of a box within an annotation set. Not persisted.
pub type BoxId = Uuid;

/// Distance from the box's top edge to the rotation handle center, in scene
/// units.
pub const ROTATE_HANDLE_GAP: f64 = 20.0;

/// Smallest width/height a resize can produce. Resizes past this floor are
/// clamped, never mirrored.
pub const MIN_DIM: f64 = 2.0 * HANDLE_SIZE;

/// A labeled rectangle with an orientation, in image/scene coordinates
/// (origin top-left, x right, y down).
///
/// `width` and `height` are measured along the box's own local axes, before
/// rotation. `angle` is in degrees; positive turns local +x toward +y, which
/// reads as clockwise on screen. It accumulates freely during editing and is
/// only folded into a bounded range by [`canonicalize_angle`] at the save
/// boundary.
#[derive(Debug, Clone)]
pub struct OrientedBox {
    id: BoxId,
    /// Geometric center of the rectangle in its current rotated pose.
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub angle: f64,
    pub label: String,
    /// View state only; no effect on geometry.
    pub selected: bool,
}

/// Rotate a vector by `radians`. A pure vector rotation: deltas transformed
/// through this carry no translation component.
fn rotate_vec(v: Vec2, radians: f64) -> Vec2 {
    let (s, c) = radians.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

impl OrientedBox {
    /// Create an axis-aligned box centered at `center`.
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            center,
            width,
            height,
            angle: 0.0,
            label: String::new(),
            selected: false,
        }
    }

    /// Build a box from a rubber-band drag span: axis-aligned, centered on
    /// the span midpoint. The span may be degenerate while a drag is still
    /// in progress; the draw tool discards undersized boxes on release.
    pub fn from_drag_span(start: Point, end: Point) -> Self {
        let center = Point::new((start.x + end.x) / 2.0, (start.y + end.y) / 2.0);
        Self::new(center, (end.x - start.x).abs(), (end.y - start.y).abs())
    }

    pub fn id(&self) -> BoxId {
        self.id
    }

    /// Rotate about the box's own center. `center` is untouched.
    pub fn rotate(&mut self, delta_deg: f64) {
        self.angle += delta_deg;
    }

    pub fn set_angle(&mut self, deg: f64) {
        self.angle = deg;
    }

    /// Move the whole box by a scene-space delta.
    pub fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    /// Resize by dragging one corner with a scene-space pointer delta.
    ///
    /// The delta is un-rotated into the local frame, width/height change by
    /// its components per the dragged corner, and the center shifts by half
    /// the delta (rotated back to scene space) so the edges not being
    /// dragged stay fixed in scene space. Width and height are clamped to
    /// [`MIN_DIM`]; an over-drag past center floors instead of flipping the
    /// box.
    pub fn resize_from_corner(&mut self, corner: Corner, scene_delta: Vec2) {
        if scene_delta.x == 0.0 && scene_delta.y == 0.0 {
            return;
        }
        let radians = self.angle.to_radians();
        let local = rotate_vec(scene_delta, -radians);

        let mut new_w = self.width;
        let mut new_h = self.height;
        let mut offset = Vec2::ZERO;

        if corner.is_left() {
            new_w -= local.x;
        } else {
            new_w += local.x;
        }
        offset.x += local.x / 2.0;

        if corner.is_top() {
            new_h -= local.y;
        } else {
            new_h += local.y;
        }
        offset.y += local.y / 2.0;

        self.width = new_w.max(MIN_DIM);
        self.height = new_h.max(MIN_DIM);
        self.center += rotate_vec(offset, radians);
    }

    /// Map a scene-space point into the box's local (unrotated) frame, with
    /// the origin at the box center.
    pub fn scene_to_local(&self, p: Point) -> Point {
        rotate_vec(p - self.center, -self.angle.to_radians()).to_point()
    }

    /// Map a local-frame point back to scene space.
    pub fn local_to_scene(&self, p: Point) -> Point {
        self.center + rotate_vec(p.to_vec2(), self.angle.to_radians())
    }

    fn corner_local(&self, corner: Corner) -> Point {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        match corner {
            Corner::TopLeft => Point::new(-hw, -hh),
            Corner::TopRight => Point::new(hw, -hh),
            Corner::BottomLeft => Point::new(-hw, hh),
            Corner::BottomRight => Point::new(hw, hh),
        }
    }

    /// Corner-handle rect in the local frame: a [`HANDLE_SIZE`] square
    /// centered on the corner.
    pub fn corner_handle_rect(&self, corner: Corner) -> Rect {
        Rect::from_center_size(self.corner_local(corner), Size::new(HANDLE_SIZE, HANDLE_SIZE))
    }

    /// Rotation-handle rect in the local frame: on the negative-height axis,
    /// [`ROTATE_HANDLE_GAP`] past the top edge.
    pub fn rotation_handle_rect(&self) -> Rect {
        let center = Point::new(0.0, -self.height / 2.0 - ROTATE_HANDLE_GAP);
        Rect::from_center_size(center, Size::new(HANDLE_SIZE, HANDLE_SIZE))
    }

    /// The corner position in scene space.
    pub fn corner_scene(&self, corner: Corner) -> Point {
        self.local_to_scene(self.corner_local(corner))
    }

    /// The four corners in scene space, ordered as a drawable loop
    /// (top-left, top-right, bottom-right, bottom-left).
    pub fn corners(&self) -> [Point; 4] {
        [
            self.corner_scene(Corner::TopLeft),
            self.corner_scene(Corner::TopRight),
            self.corner_scene(Corner::BottomRight),
            self.corner_scene(Corner::BottomLeft),
        ]
    }

    /// Body hit test against a scene-space point.
    pub fn contains(&self, p: Point) -> bool {
        let local = self.scene_to_local(p);
        local.x.abs() <= self.width / 2.0 && local.y.abs() <= self.height / 2.0
    }

    /// Produce the persistence record. The angle is canonicalized into
    /// `(-90, 90]` here; the in-memory angle is left alone.
    pub fn to_record(&self) -> BoxRecord {
        BoxRecord {
            cx: self.center.x,
            cy: self.center.y,
            w: self.width,
            h: self.height,
            angle: canonicalize_angle(self.angle),
            label: self.label.clone(),
        }
    }

    /// Reconstruct a box from a record. The canonical angle is a valid pose
    /// as-is, so it is taken verbatim.
    pub fn from_record(record: &BoxRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            center: Point::new(record.cx, record.cy),
            width: record.w,
            height: record.h,
            angle: record.angle,
            label: record.label.clone(),
            selected: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    fn approx_point(a: Point, b: Point) -> bool {
        approx(a.x, b.x) && approx(a.y, b.y)
    }

    #[test]
    fn test_rotate_keeps_center() {
        let mut bx = OrientedBox::new(Point::new(200.0, 200.0), 100.0, 50.0);
        for delta in [13.0, -400.0, 720.0, 0.1] {
            bx.rotate(delta);
            assert!(approx_point(bx.center, Point::new(200.0, 200.0)));
        }
        assert!(approx(bx.angle, 13.0 - 400.0 + 720.0 + 0.1));
    }

    #[test]
    fn test_resize_top_left_axis_aligned() {
        // Spec scenario: 100x50 at (200,200), angle 0, TopLeft drag (10, 5).
        let mut bx = OrientedBox::new(Point::new(200.0, 200.0), 100.0, 50.0);
        bx.resize_from_corner(Corner::TopLeft, Vec2::new(10.0, 5.0));
        assert!(approx(bx.width, 90.0));
        assert!(approx(bx.height, 45.0));
        assert!(approx_point(bx.center, Point::new(205.0, 202.5)));
    }

    #[test]
    fn test_resize_rotated_90_moves_height() {
        // At 90 degrees a pure horizontal scene delta becomes a local
        // (0, -10) delta, so only the height changes.
        let mut bx = OrientedBox::new(Point::new(200.0, 200.0), 100.0, 50.0);
        bx.set_angle(90.0);
        bx.resize_from_corner(Corner::TopLeft, Vec2::new(10.0, 0.0));
        assert!(approx(bx.width, 100.0));
        assert!(approx(bx.height, 60.0));
        // Local offset (0, -5) rotated by +90 degrees lands at (5, 0).
        assert!(approx_point(bx.center, Point::new(205.0, 200.0)));
    }

    #[test]
    fn test_anchor_invariant_arbitrary_angle() {
        // The three corners not being dragged must stay fixed in scene
        // space, including at non-multiple-of-90 angles.
        let mut bx = OrientedBox::new(Point::new(123.0, 87.5), 80.0, 46.0);
        bx.set_angle(37.3);

        let fixed = [Corner::TopRight, Corner::BottomLeft, Corner::BottomRight];
        let before: Vec<Point> = fixed.iter().map(|&c| bx.corner_scene(c)).collect();

        bx.resize_from_corner(Corner::TopLeft, Vec2::new(-7.25, 12.5));

        for (&corner, &old) in fixed.iter().zip(before.iter()) {
            let new = bx.corner_scene(corner);
            assert!(
                approx_point(new, old),
                "{corner:?} moved from {old:?} to {new:?}"
            );
        }
    }

    #[test]
    fn test_anchor_invariant_every_corner() {
        for dragged in Corner::ALL {
            let mut bx = OrientedBox::new(Point::new(50.0, 60.0), 70.0, 90.0);
            bx.set_angle(-203.0);

            let fixed: Vec<Corner> =
                Corner::ALL.iter().copied().filter(|&c| c != dragged).collect();
            let before: Vec<Point> = fixed.iter().map(|&c| bx.corner_scene(c)).collect();

            bx.resize_from_corner(dragged, Vec2::new(4.0, -9.0));

            for (&corner, &old) in fixed.iter().zip(before.iter()) {
                assert!(approx_point(bx.corner_scene(corner), old), "{corner:?}");
            }
        }
    }

    #[test]
    fn test_resize_clamps_to_min_dim() {
        // Shrinking width to -20 must floor at MIN_DIM exactly.
        let mut bx = OrientedBox::new(Point::new(0.0, 0.0), 100.0, 100.0);
        bx.resize_from_corner(Corner::TopLeft, Vec2::new(120.0, 0.0));
        assert!((bx.width - MIN_DIM).abs() < EPS);
        assert!(approx(bx.height, 100.0));
        assert!(bx.width > 0.0);
    }

    #[test]
    fn test_zero_delta_is_noop() {
        let mut bx = OrientedBox::new(Point::new(10.0, 20.0), 30.0, 40.0);
        bx.set_angle(15.0);
        let before = bx.clone();
        bx.resize_from_corner(Corner::BottomRight, Vec2::ZERO);
        assert!(approx_point(bx.center, before.center));
        assert!(approx(bx.width, before.width));
        assert!(approx(bx.height, before.height));
    }

    #[test]
    fn test_from_drag_span() {
        let bx = OrientedBox::from_drag_span(Point::new(10.0, 10.0), Point::new(110.0, 60.0));
        assert!(approx(bx.width, 100.0));
        assert!(approx(bx.height, 50.0));
        assert!(approx_point(bx.center, Point::new(60.0, 35.0)));
        assert!(approx(bx.angle, 0.0));

        // Dragging up-left still yields positive dimensions.
        let bx = OrientedBox::from_drag_span(Point::new(110.0, 60.0), Point::new(10.0, 10.0));
        assert!(approx(bx.width, 100.0));
        assert!(approx(bx.height, 50.0));
    }

    #[test]
    fn test_contains() {
        let mut bx = OrientedBox::new(Point::new(100.0, 100.0), 100.0, 40.0);
        bx.set_angle(90.0);
        // After a quarter turn the long axis is vertical.
        assert!(bx.contains(Point::new(100.0, 145.0)));
        assert!(!bx.contains(Point::new(145.0, 100.0)));
        assert!(bx.contains(Point::new(115.0, 100.0)));
    }

    #[test]
    fn test_record_round_trip() {
        let mut bx = OrientedBox::new(Point::new(12.5, -3.0), 64.0, 32.0);
        bx.set_angle(45.0);
        bx.label = "car".to_string();
        bx.selected = true;

        let restored = OrientedBox::from_record(&bx.to_record());
        assert!(approx_point(restored.center, bx.center));
        assert!(approx(restored.width, bx.width));
        assert!(approx(restored.height, bx.height));
        assert!(approx(restored.angle, 45.0));
        assert_eq!(restored.label, "car");
        assert!(!restored.selected);
    }

    #[test]
    fn test_record_preserves_visual_pose_modulo_half_turn() {
        // An accumulated 450-degree angle stores as 90; the corner loop of
        // the restored box matches the original up to the 180-degree fold.
        let mut bx = OrientedBox::new(Point::new(0.0, 0.0), 100.0, 50.0);
        bx.rotate(450.0);
        assert!(approx(bx.angle, 450.0));

        let record = bx.to_record();
        assert!(approx(record.angle, 90.0));

        let restored = OrientedBox::from_record(&record);
        let a = bx.corners();
        let b = restored.corners();
        for (pa, pb) in a.iter().zip(b.iter()) {
            assert!(approx_point(*pa, *pb));
        }
    }

    #[test]
    fn test_rotation_handle_rect_position() {
        let bx = OrientedBox::new(Point::new(0.0, 0.0), 100.0, 50.0);
        let rect = bx.rotation_handle_rect();
        assert!(approx(rect.center().x, 0.0));
        assert!(approx(rect.center().y, -25.0 - ROTATE_HANDLE_GAP));
        assert!(approx(rect.width(), HANDLE_SIZE));
        assert!(approx(rect.height(), HANDLE_SIZE));
    }
}
