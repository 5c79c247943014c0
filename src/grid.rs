use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DAYS: std::ops::RangeInclusive<u8> = 1..=3;
pub const OPEN_HOUR: u32 = 9;
pub const CLOSE_HOUR: u32 = 18;
pub const SLOTS_PER_HOUR: usize = 12;
pub const CELLS_PER_DAY: usize = (CLOSE_HOUR - OPEN_HOUR) as usize * SLOTS_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellState {
    Unmarked,
    MajorityAvailable,
    AllAvailable,
}

impl Default for CellState {
    fn default() -> Self {
        CellState::Unmarked
    }
}

impl CellState {
    pub fn is_marked(self) -> bool {
        self != CellState::Unmarked
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub days: BTreeMap<u8, Vec<CellState>>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    pub fn new() -> Self {
        let days = DAYS
            .map(|day| (day, vec![CellState::Unmarked; CELLS_PER_DAY]))
            .collect();
        Self { days }
    }

    pub fn paint(&mut self, day: u8, index: usize, state: CellState) {
        assert!(index < CELLS_PER_DAY, "cell index {index} out of range");
        let cells = self
            .days
            .get_mut(&day)
            .unwrap_or_else(|| panic!("day {day} out of range"));
        cells[index] = state;
    }

    pub fn cells_of(&self, day: u8) -> &[CellState] {
        self.days
            .get(&day)
            .unwrap_or_else(|| panic!("day {day} out of range"))
    }

    pub fn has_any_marked(&self, day: u8) -> bool {
        self.cells_of(day).iter().any(|cell| cell.is_marked())
    }

    pub fn any_marked(&self) -> bool {
        self.days.keys().any(|day| self.has_any_marked(*day))
    }

    pub fn row(&self, day: u8) -> Vec<CellView> {
        let cells = self.cells_of(day);
        cells
            .iter()
            .enumerate()
            .map(|(index, state)| CellView {
                index,
                state: *state,
                label: boundary_label(cells, index),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    pub index: usize,
    pub state: CellState,
    pub label: Option<String>,
}

pub fn time_of(index: usize) -> (u32, u32) {
    assert!(index < CELLS_PER_DAY, "cell index {index} out of range");
    let hour = index as u32 / SLOTS_PER_HOUR as u32 + OPEN_HOUR;
    let minute = (index % SLOTS_PER_HOUR) as u32 * 5;
    (hour, minute)
}

pub fn label_for(index: usize) -> String {
    let (hour, minute) = time_of(index);
    NaiveTime::from_hms_opt(hour, minute, 0)
        .expect("cell time within a day")
        .format("%H:%M")
        .to_string()
}

// A label marks the start of a run whose state differs from the previous
// cell; index 0 never carries one.
fn boundary_label(cells: &[CellState], index: usize) -> Option<String> {
    if index > 0 && cells[index - 1] != cells[index] {
        Some(label_for(index))
    } else {
        None
    }
}
