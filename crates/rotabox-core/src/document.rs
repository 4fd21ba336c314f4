//! Annotation records and the per-image box collection.

use crate::obox::{BoxId, OrientedBox};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// One persisted box.
///
/// `cx`/`cy`/`w`/`h` are required: a record missing any of them fails
/// deserialization outright rather than fabricating geometry. `angle` and
/// `label` default when absent. On write the angle is in canonical
/// `(-90, 90]` form; on read any real value is accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxRecord {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub label: String,
}

/// On-disk document: the ordered list of box records for one image. Order
/// reflects creation order and carries no meaning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationDocument {
    pub boxes: Vec<BoxRecord>,
}

impl AnnotationDocument {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// The owned set of boxes for the currently displayed image.
///
/// Fully replaced when switching images; boxes are never shared across
/// images.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    boxes: Vec<OrientedBox>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_boxes(boxes: Vec<OrientedBox>) -> Self {
        Self { boxes }
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Add a box (new or restored by undo) and return its id.
    pub fn add(&mut self, bx: OrientedBox) -> BoxId {
        let id = bx.id();
        self.boxes.push(bx);
        id
    }

    /// Remove a box by id, returning it so a delete can be undone.
    pub fn remove(&mut self, id: BoxId) -> Option<OrientedBox> {
        let idx = self.boxes.iter().position(|b| b.id() == id)?;
        Some(self.boxes.remove(idx))
    }

    pub fn get(&self, id: BoxId) -> Option<&OrientedBox> {
        self.boxes.iter().find(|b| b.id() == id)
    }

    pub fn get_mut(&mut self, id: BoxId) -> Option<&mut OrientedBox> {
        self.boxes.iter_mut().find(|b| b.id() == id)
    }

    pub fn boxes(&self) -> &[OrientedBox] {
        &self.boxes
    }

    pub fn boxes_mut(&mut self) -> &mut [OrientedBox] {
        &mut self.boxes
    }

    /// Topmost box whose body contains the scene-space point. Later boxes
    /// draw on top, so iteration runs back to front.
    pub fn hit_topmost(&self, p: Point) -> Option<BoxId> {
        self.boxes.iter().rev().find(|b| b.contains(p)).map(|b| b.id())
    }

    /// Select one box and deselect the rest.
    pub fn select_only(&mut self, id: BoxId) {
        for b in &mut self.boxes {
            b.selected = b.id() == id;
        }
    }

    pub fn clear_selection(&mut self) {
        for b in &mut self.boxes {
            b.selected = false;
        }
    }

    pub fn selected_ids(&self) -> Vec<BoxId> {
        self.boxes.iter().filter(|b| b.selected).map(|b| b.id()).collect()
    }

    /// Bulk-serialize every box in the set, angles canonicalized.
    pub fn to_document(&self) -> AnnotationDocument {
        AnnotationDocument {
            boxes: self.boxes.iter().map(OrientedBox::to_record).collect(),
        }
    }

    pub fn from_document(doc: &AnnotationDocument) -> Self {
        Self {
            boxes: doc.boxes.iter().map(OrientedBox::from_record).collect(),
        }
    }
}
