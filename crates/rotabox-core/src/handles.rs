//! Interactive handle model and hit testing.

use crate::obox::OrientedBox;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Side length of the square handle affordances, in scene units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Corner positions of a box, named in its local (unrotated) frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// All corners, in the fixed order hit testing uses.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// What the pointer is grabbing on a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Rotate,
    Corner(Corner),
}

/// Resolve the handle under a pointer position given in the box's local
/// frame.
///
/// The rotation handle sits outside the body and is tested first so it wins
/// any ambiguous overlap; corners follow in a fixed order, first match wins.
/// Cursor affordance for the returned handle is the caller's concern.
pub fn hit_test(bx: &OrientedBox, local: Point) -> Option<HandleKind> {
    if bx.rotation_handle_rect().contains(local) {
        return Some(HandleKind::Rotate);
    }
    for corner in Corner::ALL {
        if bx.corner_handle_rect(corner).contains(local) {
            return Some(HandleKind::Corner(corner));
        }
    }
    None
}
