use crate::grid::{CellState, Grid};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

#[derive(Debug, Clone)]
pub struct GestureTracker {
    state: DragState,
}

impl Default for GestureTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureTracker {
    pub fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn pointer_down(&mut self, grid: &mut Grid, day: u8, index: usize, brush: CellState) {
        self.state = DragState::Dragging;
        grid.paint(day, index, brush);
    }

    // Enter only paints mid-drag; a hover without a held button does nothing.
    pub fn pointer_enter(&mut self, grid: &mut Grid, day: u8, index: usize, brush: CellState) {
        if self.state == DragState::Dragging {
            grid.paint(day, index, brush);
        }
    }

    // Up may arrive from outside the grid; it always resolves the drag.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }
}
