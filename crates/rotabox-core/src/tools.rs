//! Rubber-band draw tool for creating boxes.

use crate::obox::OrientedBox;
use kurbo::Point;

/// Boxes drawn with either dimension at or below this are discarded on
/// release, in scene units.
pub const MIN_DRAW_SIZE: f64 = 10.0;

/// State of a draw interaction.
#[derive(Debug, Clone, Default)]
pub enum DrawState {
    #[default]
    Idle,
    Active {
        start: Point,
        current: Point,
    },
}

/// Tracks a rubber-band drag that creates a new axis-aligned box.
#[derive(Debug, Clone, Default)]
pub struct DrawTool {
    state: DrawState,
}

impl DrawTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self, point: Point) {
        self.state = DrawState::Active {
            start: point,
            current: point,
        };
    }

    pub fn update(&mut self, point: Point) {
        if let DrawState::Active { current, .. } = &mut self.state {
            *current = point;
        }
    }

    /// The in-progress box for rendering, possibly degenerate.
    pub fn preview(&self) -> Option<OrientedBox> {
        if let DrawState::Active { start, current } = self.state {
            Some(OrientedBox::from_drag_span(start, current))
        } else {
            None
        }
    }

    /// End the drag. Returns the finished box carrying `label`, or None
    /// when the span is below the minimum draw size (or no drag was
    /// active).
    pub fn end(&mut self, point: Point, label: &str) -> Option<OrientedBox> {
        let DrawState::Active { start, .. } = self.state else {
            return None;
        };
        self.state = DrawState::Idle;

        let mut bx = OrientedBox::from_drag_span(start, point);
        if bx.width <= MIN_DRAW_SIZE || bx.height <= MIN_DRAW_SIZE {
            return None;
        }
        bx.label = label.to_string();
        Some(bx)
    }

    pub fn cancel(&mut self) {
        self.state = DrawState::Idle;
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, DrawState::Active { .. })
    }
}
