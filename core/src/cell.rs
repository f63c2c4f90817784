use serde::{Deserialize, Serialize};

/// One grid entry as the engine stores it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub(crate) is_mine: bool,
    pub(crate) revealed: bool,
    pub(crate) flagged: bool,
    pub(crate) adjacent_mines: u8,
}

impl Cell {
    pub const fn is_mine(self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(self) -> bool {
        self.revealed
    }

    pub const fn is_flagged(self) -> bool {
        self.flagged
    }

    /// Meaningless for mine cells.
    pub const fn adjacent_mines(self) -> u8 {
        self.adjacent_mines
    }

    pub const fn view(self) -> CellView {
        match self {
            Self { revealed: true, is_mine: true, .. } => CellView::Mine,
            Self { revealed: true, adjacent_mines, .. } => CellView::Revealed(adjacent_mines),
            Self { flagged: true, .. } => CellView::Flagged,
            _ => CellView::Hidden,
        }
    }
}

/// Player-visible state of a cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    #[default]
    Hidden,
    Flagged,
    Revealed(u8),
    Mine,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}
