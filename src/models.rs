use crate::form::{MemberRoster, SubmissionPayload};
use crate::gesture::GestureTracker;
use crate::grid::{CellState, CellView, Grid};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct Session {
    pub grid: Grid,
    pub brush: CellState,
    pub gesture: GestureTracker,
    pub members: MemberRoster,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            grid: Grid::new(),
            brush: CellState::MajorityAvailable,
            gesture: GestureTracker::new(),
            members: MemberRoster::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PointerRequest {
    pub action: String,
    pub day: Option<u8>,
    pub index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RowResponse {
    pub day: u8,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Serialize)]
pub struct PointerResponse {
    pub dragging: bool,
    pub row: Option<RowResponse>,
}

#[derive(Debug, Deserialize)]
pub struct BrushRequest {
    pub brush: CellState,
}

#[derive(Debug, Serialize)]
pub struct BrushResponse {
    pub brush: CellState,
}

#[derive(Debug, Deserialize)]
pub struct MemberNameRequest {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RosterResponse {
    pub members: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct GridResponse {
    pub brush: CellState,
    pub grid: Grid,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub ok: bool,
    pub errors: Vec<String>,
    pub redirect: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionRecord {
    pub submitted_at: String,
    pub registration: SubmissionPayload,
}
