use rand::Rng;

/// Binary cell matrix on a torus.
///
/// Cells are stored row-major; neighbor lookups wrap modulo the edge length
/// in both dimensions, so every cell has exactly eight Moore neighbors (which
/// may coincide on grids smaller than 3x3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// Create an all-dead grid.
    pub fn dead(size: usize) -> Self {
        Self {
            size,
            cells: vec![false; size * size],
        }
    }

    /// Create a grid where each cell is independently alive with
    /// probability `prob_alive`.
    pub fn random(size: usize, prob_alive: f64, rng: &mut impl Rng) -> Self {
        let mut grid = Self::dead(size);
        for cell in &mut grid.cells {
            *cell = rng.gen::<f64>() < prob_alive;
        }
        grid
    }

    /// Grid edge length N.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.size + x]
    }

    pub fn set_alive(&mut self, x: usize, y: usize, alive: bool) {
        self.cells[y * self.size + x] = alive;
    }

    /// Number of living cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&alive| alive).count()
    }

    /// Sum of the eight toroidally-wrapped Moore neighbors of (x, y).
    ///
    /// The cell itself is excluded, but on tiny grids a single neighbor cell
    /// can be counted more than once where wrapped offsets coincide.
    pub fn neighbor_total(&self, x: usize, y: usize) -> u8 {
        let n = self.size as isize;
        let mut total = 0;
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let nx = (x as isize + dx).rem_euclid(n) as usize;
                let ny = (y as isize + dy).rem_euclid(n) as usize;
                if self.is_alive(nx, ny) {
                    total += 1;
                }
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_neighbor_total_excludes_self() {
        let mut grid = Grid::dead(3);
        grid.set_alive(1, 1, true);
        assert_eq!(grid.neighbor_total(1, 1), 0);
        assert_eq!(grid.neighbor_total(0, 0), 1);
        assert_eq!(grid.neighbor_total(2, 2), 1);
    }

    #[test]
    fn test_wrapped_neighbors_coincide_on_2x2() {
        // On a 2x2 torus the diagonal offsets of (0, 0) all land on (1, 1),
        // so a single living cell there is counted four times.
        let mut grid = Grid::dead(2);
        grid.set_alive(1, 1, true);
        assert_eq!(grid.neighbor_total(0, 0), 4);

        let mut full = Grid::dead(2);
        for y in 0..2 {
            for x in 0..2 {
                full.set_alive(x, y, true);
            }
        }
        assert_eq!(full.neighbor_total(0, 0), 8);
    }

    #[test]
    fn test_corner_wraps_to_opposite_edges() {
        let mut grid = Grid::dead(5);
        grid.set_alive(4, 4, true);
        grid.set_alive(4, 0, true);
        grid.set_alive(0, 4, true);
        // All three sit in the wrapped neighborhood of the (0, 0) corner.
        assert_eq!(grid.neighbor_total(0, 0), 3);
    }

    #[test]
    fn test_random_probability_extremes() {
        let mut rng = StdRng::seed_from_u64(11);
        let dead = Grid::random(8, 0.0, &mut rng);
        assert_eq!(dead.population(), 0);

        let alive = Grid::random(8, 1.0, &mut rng);
        assert_eq!(alive.population(), 64);
    }
}
