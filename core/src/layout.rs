use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where the mines are. Built once per session, never edited afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Wraps a square mask. Callers guarantee the mask is square with a side that fits `Coord`.
    pub(crate) fn from_mine_mask(mine_mask: Array2<bool>) -> Self {
        debug_assert_eq!(mine_mask.nrows(), mine_mask.ncols());
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        Self {
            mine_mask,
            mine_count,
        }
    }

    /// Hand-built layout, handy for replays and fixed puzzles. Duplicate coordinates count once.
    pub fn from_mine_coords(size: Coord, mine_coords: &[Coord2]) -> Result<Self> {
        if size == 0 {
            return Err(GameError::InvalidSize);
        }

        let mut mine_mask = Array2::default((size, size).to_nd_index());
        for &coords in mine_coords {
            if !in_bounds(coords, size) {
                return Err(GameError::InvalidCoords);
            }
            mine_mask[coords.to_nd_index()] = true;
        }

        Ok(Self::from_mine_mask(mine_mask))
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig::new_unchecked(self.size(), self.mine_count)
    }

    pub fn size(&self) -> Coord {
        self.mine_mask.nrows() as Coord
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        neighbors(coords, self.size())
            .filter(|&pos| self[pos])
            .count() as u8
    }

    pub fn iter_mines(&self) -> impl Iterator<Item = Coord2> + '_ {
        iter_coords(self.size()).filter(|&pos| self[pos])
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_clipped_at_the_edges() {
        // . . . . .
        // . * . . .
        // . . . . .
        // . . . * *
        // . . . * .
        let layout = MineLayout::from_mine_coords(5, &[(1, 1), (3, 3), (3, 4), (4, 3)]).unwrap();

        assert_eq!(layout.mine_count(), 4);
        assert_eq!(layout.adjacent_mine_count((0, 0)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 2)), 2);
        assert_eq!(layout.adjacent_mine_count((4, 4)), 3);
        assert_eq!(layout.adjacent_mine_count((0, 4)), 0);
        assert_eq!(layout.adjacent_mine_count((2, 4)), 2);
    }

    #[test]
    fn rejects_out_of_bounds_coords() {
        assert_eq!(
            MineLayout::from_mine_coords(3, &[(0, 3)]),
            Err(GameError::InvalidCoords)
        );
    }

    #[test]
    fn duplicate_coords_count_once() {
        let layout = MineLayout::from_mine_coords(3, &[(1, 1), (1, 1)]).unwrap();
        assert_eq!(layout.mine_count(), 1);
        assert_eq!(layout.iter_mines().collect::<Vec<_>>(), vec![(1, 1)]);
        assert_eq!(layout.game_config(), GameConfig::new_unchecked(3, 1));
    }
}
