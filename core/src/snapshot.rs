use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord,
    pub cells: Array2<CellView>,
    pub mines_left: i32,
    pub elapsed_secs: u32,
    pub outcome: Outcome,
    pub triggered_mine: Option<Coord2>,
}

impl Snapshot {
    pub fn cell(&self, coords: Coord2) -> CellView {
        self.cells[coords.to_nd_index()]
    }

    pub fn is_triggered(&self, coords: Coord2) -> bool {
        self.triggered_mine == Some(coords)
    }

    pub fn count(&self, view: CellView) -> usize {
        self.cells.iter().filter(|&&cell| cell == view).count()
    }
}
