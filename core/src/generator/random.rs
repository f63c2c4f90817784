use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// Uniformly random layout that keeps the 3x3 block around the first click free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomLayoutGenerator {
    seed: u64,
    first_click: Coord2,
}

impl RandomLayoutGenerator {
    pub fn new(seed: u64, first_click: Coord2) -> Self {
        Self { seed, first_click }
    }

    fn place_by_rejection(&self, rng: &mut SmallRng, mask: &mut Array2<bool>, mines: CellCount) {
        let size = mask.nrows() as Coord;
        let mut placed = 0;
        while placed < mines {
            let pos = (rng.random_range(0..size), rng.random_range(0..size));
            if within_reach(pos, self.first_click) || mask[pos.to_nd_index()] {
                continue;
            }
            mask[pos.to_nd_index()] = true;
            placed += 1;
        }
    }

    fn place_by_shuffle(&self, rng: &mut SmallRng, mask: &mut Array2<bool>, mines: CellCount) {
        let size = mask.nrows() as Coord;
        let mut free: Vec<Coord2> = iter_coords(size)
            .filter(|&pos| !within_reach(pos, self.first_click))
            .collect();
        let (chosen, _) = free.partial_shuffle(rng, mines.into());
        for pos in chosen.iter() {
            mask[pos.to_nd_index()] = true;
        }
    }
}

impl LayoutGenerator for RandomLayoutGenerator {
    fn generate(self, config: GameConfig) -> MineLayout {
        let size = config.size;
        let free_cells = config.total_cells() - block(self.first_click, size).count() as CellCount;

        let mines = if config.mines > free_cells {
            log::warn!(
                "Cannot keep first click clear with {} mines, only {} cells available",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mask = Array2::default((size, size).to_nd_index());

        // rejection sampling stalls once most candidates are taken
        if mines.saturating_mul(2) <= free_cells {
            self.place_by_rejection(&mut rng, &mut mask, mines);
        } else {
            log::debug!("dense board ({mines}/{free_cells}), shuffling free cells");
            self.place_by_shuffle(&mut rng, &mut mask, mines);
        }

        MineLayout::from_mine_mask(mask)
    }
}
