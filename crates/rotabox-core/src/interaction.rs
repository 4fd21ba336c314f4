//! Drag session state machine for rotate and resize interactions.

use crate::handles::{self, Corner, HandleKind};
use crate::obox::OrientedBox;
use kurbo::Point;

/// The kind of drag a completed session performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Rotate,
    Resize(Corner),
}

/// Active drag session. One session at a time; a pointer-down that lands on
/// no handle leaves the controller idle so the caller's ordinary
/// move/select behavior applies.
#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Rotating {
        /// Box center at drag start; a pure rotate never moves it.
        pivot: Point,
        start_pointer: Point,
        start_angle: f64,
    },
    Resizing {
        corner: Corner,
        /// Pointer position as of the last move. Deltas are incremental,
        /// not cumulative from drag start.
        last_pointer: Point,
    },
}

/// Geometry as it was at pointer-down, restored on cancel.
#[derive(Debug, Clone, Copy)]
struct PoseSnapshot {
    center: Point,
    width: f64,
    height: f64,
    angle: f64,
}

impl PoseSnapshot {
    fn of(bx: &OrientedBox) -> Self {
        Self {
            center: bx.center,
            width: bx.width,
            height: bx.height,
            angle: bx.angle,
        }
    }

    fn restore(&self, bx: &mut OrientedBox) {
        bx.center = self.center;
        bx.width = self.width;
        bx.height = self.height;
        bx.angle = self.angle;
    }
}

/// Owns the in-progress drag for one box and turns pointer events into
/// geometry mutations.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    state: DragState,
    snapshot: Option<PoseSnapshot>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a pointer-down against the box's handles and start the
    /// matching session. Returns false when the press landed on no handle
    /// and was not consumed.
    pub fn pointer_down(&mut self, bx: &OrientedBox, scene_pos: Point) -> bool {
        let local = bx.scene_to_local(scene_pos);
        match handles::hit_test(bx, local) {
            Some(HandleKind::Rotate) => {
                self.snapshot = Some(PoseSnapshot::of(bx));
                self.state = DragState::Rotating {
                    pivot: bx.center,
                    start_pointer: scene_pos,
                    start_angle: bx.angle,
                };
                true
            }
            Some(HandleKind::Corner(corner)) => {
                self.snapshot = Some(PoseSnapshot::of(bx));
                self.state = DragState::Resizing {
                    corner,
                    last_pointer: scene_pos,
                };
                true
            }
            None => false,
        }
    }

    /// Feed a pointer-move into the active session.
    pub fn pointer_move(&mut self, bx: &mut OrientedBox, scene_pos: Point) {
        match &mut self.state {
            DragState::Idle => {}
            DragState::Rotating {
                pivot,
                start_pointer,
                start_angle,
            } => {
                let v0 = *start_pointer - *pivot;
                let v1 = scene_pos - *pivot;
                // atan2 of screen components: y grows downward, so positive
                // deltas read clockwise, matching the box's sign convention.
                let a0 = v0.y.atan2(v0.x).to_degrees();
                let a1 = v1.y.atan2(v1.x).to_degrees();
                bx.set_angle(*start_angle + (a1 - a0));
            }
            DragState::Resizing {
                corner,
                last_pointer,
            } => {
                let delta = scene_pos - *last_pointer;
                bx.resize_from_corner(*corner, delta);
                *last_pointer = scene_pos;
            }
        }
    }

    /// End the session. Returns the finalized drag kind, or None when no
    /// session was active (a stray pointer-up is a no-op).
    pub fn pointer_up(&mut self) -> Option<DragKind> {
        let finished = match self.state {
            DragState::Idle => None,
            DragState::Rotating { .. } => Some(DragKind::Rotate),
            DragState::Resizing { corner, .. } => Some(DragKind::Resize(corner)),
        };
        self.state = DragState::Idle;
        self.snapshot = None;
        finished
    }

    /// Abort the session and put the box back in its pre-drag pose.
    /// Returns false when there was nothing to cancel.
    pub fn cancel(&mut self, bx: &mut OrientedBox) -> bool {
        if matches!(self.state, DragState::Idle) {
            return false;
        }
        if let Some(snapshot) = self.snapshot.take() {
            snapshot.restore(bx);
        }
        self.state = DragState::Idle;
        true
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }
}
