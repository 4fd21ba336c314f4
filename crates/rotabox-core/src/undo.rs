//! Two-action undo stack over an annotation set.

use crate::document::AnnotationSet;
use crate::obox::{BoxId, OrientedBox};

/// Maximum number of undoable actions to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A reversible edit to the annotation set.
#[derive(Debug, Clone)]
pub enum UndoAction {
    /// A box was created; undo removes it.
    Created(BoxId),
    /// A box was deleted; undo puts it back.
    Deleted(OrientedBox),
}

/// Undo history for the current image. Cleared when switching images.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    actions: Vec<UndoAction>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_created(&mut self, id: BoxId) {
        self.push(UndoAction::Created(id));
    }

    pub fn record_deleted(&mut self, bx: OrientedBox) {
        self.push(UndoAction::Deleted(bx));
    }

    fn push(&mut self, action: UndoAction) {
        self.actions.push(action);
        if self.actions.len() > MAX_UNDO_HISTORY {
            self.actions.remove(0);
        }
    }

    /// Reverse the most recent action. Returns false when the stack is
    /// empty. A re-added box comes back selected.
    pub fn undo(&mut self, set: &mut AnnotationSet) -> bool {
        let Some(action) = self.actions.pop() else {
            return false;
        };
        match action {
            UndoAction::Created(id) => {
                set.remove(id);
            }
            UndoAction::Deleted(mut bx) => {
                bx.selected = true;
                set.add(bx);
            }
        }
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn clear(&mut self) {
        self.actions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_undo_created_removes_box() {
        let mut set = AnnotationSet::new();
        let mut undo = UndoStack::new();

        let id = set.add(OrientedBox::new(Point::new(0.0, 0.0), 50.0, 50.0));
        undo.record_created(id);

        assert!(undo.undo(&mut set));
        assert!(set.is_empty());
        assert!(!undo.can_undo());
    }

    #[test]
    fn test_undo_deleted_restores_selected() {
        let mut set = AnnotationSet::new();
        let mut undo = UndoStack::new();

        let mut bx = OrientedBox::new(Point::new(10.0, 10.0), 40.0, 40.0);
        bx.label = "bus".to_string();
        let id = set.add(bx);

        let deleted = set.remove(id).unwrap();
        undo.record_deleted(deleted);
        assert!(set.is_empty());

        assert!(undo.undo(&mut set));
        let restored = set.get(id).unwrap();
        assert_eq!(restored.label, "bus");
        assert!(restored.selected);
    }

    #[test]
    fn test_undo_empty_stack() {
        let mut set = AnnotationSet::new();
        let mut undo = UndoStack::new();
        assert!(!undo.undo(&mut set));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut set = AnnotationSet::new();
        let mut undo = UndoStack::new();

        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            let id = set.add(OrientedBox::new(Point::new(0.0, 0.0), 20.0, 20.0));
            undo.record_created(id);
        }

        let mut undone = 0;
        while undo.undo(&mut set) {
            undone += 1;
        }
        assert_eq!(undone, MAX_UNDO_HISTORY);
        assert_eq!(set.len(), 10);
    }
}
