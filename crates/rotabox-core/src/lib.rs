//! Rotabox core library.
//!
//! Platform-agnostic geometry and interaction engine for labeling raster
//! images with oriented bounding boxes: the box entity itself, handle hit
//! testing, the drag state machine, angle canonicalization, and the
//! annotation document/undo/persistence layer around it.

pub mod canonical;
pub mod document;
pub mod handles;
pub mod interaction;
pub mod obox;
pub mod storage;
pub mod tools;
pub mod undo;

pub use canonical::canonicalize_angle;
pub use document::{AnnotationDocument, AnnotationSet, BoxRecord};
pub use handles::{Corner, HandleKind, HANDLE_SIZE};
pub use interaction::{DragKind, DragState, InteractionController};
pub use obox::{BoxId, OrientedBox, MIN_DIM, ROTATE_HANDLE_GAP};
pub use tools::{DrawTool, MIN_DRAW_SIZE};
pub use undo::{UndoAction, UndoStack};
