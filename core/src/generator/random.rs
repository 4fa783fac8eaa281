use ndarray::Array2;
use rand::Rng;

use super::*;

/// Rejection sampling: draw uniformly random cells and keep those that are neither mined already nor inside the
/// safe zone around `start`.
#[derive(Debug)]
pub struct RandomMinefieldGenerator<'a, R: Rng> {
    rng: &'a mut R,
    start: Coord2,
    safe_zone: SafeZone,
}

impl<'a, R: Rng> RandomMinefieldGenerator<'a, R> {
    pub fn new(rng: &'a mut R, start: Coord2, safe_zone: SafeZone) -> Self {
        Self {
            rng,
            start,
            safe_zone,
        }
    }
}

impl<R: Rng> MinefieldGenerator for RandomMinefieldGenerator<'_, R> {
    fn generate(self, config: &GameConfig) -> MineLayout {
        let size = config.size;
        let total_cells = config.total_cells();

        let safe_zone = match self.safe_zone {
            SafeZone::Neighborhood
                if config.mines + SafeZone::Neighborhood.cell_count(self.start, size)
                    > total_cells =>
            {
                log::warn!("Cannot keep the start neighborhood clear, fallback to a single safe cell");
                SafeZone::Cell
            }
            zone => zone,
        };

        let free_cells = total_cells - safe_zone.cell_count(self.start, size).min(total_cells);
        let mines = if config.mines > free_cells {
            log::warn!(
                "Minefield too small, requested {} mines but only {} fit",
                config.mines,
                free_cells
            );
            free_cells
        } else {
            config.mines
        };

        let mut mine_mask: Array2<bool> = Array2::default(size.to_nd_index());
        let mut placed = 0;
        let mut rejected = 0u64;
        while placed < mines {
            let coords = (
                self.rng.random_range(0..size.0),
                self.rng.random_range(0..size.1),
            );
            if mine_mask[coords.to_nd_index()] || safe_zone.contains(self.start, coords) {
                rejected += 1;
                continue;
            }
            mine_mask[coords.to_nd_index()] = true;
            placed += 1;
        }
        log::trace!("Placed {} mines, {} draws rejected", placed, rejected);

        MineLayout::from_mine_mask(mine_mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn generate(config: &GameConfig, start: Coord2, seed: u64) -> MineLayout {
        let mut rng = SmallRng::seed_from_u64(seed);
        RandomMinefieldGenerator::new(&mut rng, start, SafeZone::Neighborhood).generate(config)
    }

    #[test]
    fn places_exact_mine_count_outside_safe_zone() {
        for difficulty in Difficulty::PRESET_LEVELS {
            let config = GameConfig::preset(difficulty);
            for seed in 0..20 {
                let start = (
                    (seed as Coord * 7) % config.rows(),
                    (seed as Coord * 11) % config.cols(),
                );
                let layout = generate(&config, start, seed);
                assert_eq!(layout.mine_count(), config.mines);
                assert!(layout.iter_mines().all(|mine| !is_within_one(mine, start)));
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let config = GameConfig::preset(Difficulty::Medium);
        assert_eq!(generate(&config, (3, 3), 7), generate(&config, (3, 3), 7));
    }

    #[test]
    fn falls_back_to_single_safe_cell_on_crowded_grids() {
        let config = GameConfig::custom(3, 3, 7).unwrap();
        let layout = generate(&config, (1, 1), 3);
        assert_eq!(layout.mine_count(), 7);
        assert!(!layout.contains_mine((1, 1)));
    }

    #[test]
    fn corner_start_leaves_room_on_tiny_grid() {
        let config = GameConfig::custom(3, 3, 5).unwrap();
        let layout = generate(&config, (0, 0), 1);
        assert_eq!(layout.mine_count(), 5);
        for coords in [(0, 0), (0, 1), (1, 0), (1, 1)] {
            assert!(!layout.contains_mine(coords));
        }
    }
}
