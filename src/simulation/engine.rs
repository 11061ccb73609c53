use rand::Rng;

use crate::config::{
    BOUNDARY_TOTAL, COLLAPSE_FLIP_PROBABILITY, COLLAPSE_THRESHOLD, SUPERPOSITION_INCREMENT,
};
use crate::simulation::entanglement::{Coord, EntanglementTable};
use crate::simulation::grid::Grid;
use crate::simulation::superposition::SuperpositionField;

/// Advance the simulation by one generation.
///
/// The inputs are never mutated; the caller receives a fully materialized
/// next grid and superposition field and swaps them in. Cells are scanned in
/// row-major order:
///
/// 1. the old grid's eight-neighbor total is computed;
/// 2. a cell on the boundary total gains 0.25 superposition (capped at 1.0),
///    any other cell resets to zero;
/// 3. a cell whose accumulator just reached the threshold collapses: one
///    uniform draw decides whether its state flips, and the accumulator
///    resets either way. Otherwise the classic birth/death rule applies.
///    Collapse and the classic rule are mutually exclusive per generation;
/// 4. after every cell has settled, each table entry whose source cell
///    changed state this generation records an override copying the source's
///    new state onto its partner. Overrides are applied after the scan, in
///    table order, so the last entry targeting a cell wins. Propagation is a
///    plain copy and never cascades through further entries.
pub fn step(
    grid: &Grid,
    superposition: &SuperpositionField,
    entanglement: &EntanglementTable,
    rng: &mut impl Rng,
) -> (Grid, SuperpositionField) {
    let size = grid.size();
    let mut next = grid.clone();
    let mut field = superposition.clone();

    for y in 0..size {
        for x in 0..size {
            let total = grid.neighbor_total(x, y);

            if total == BOUNDARY_TOTAL {
                field.set(x, y, (field.get(x, y) + SUPERPOSITION_INCREMENT).min(1.0));
            } else {
                field.set(x, y, 0.0);
            }

            if field.get(x, y) >= COLLAPSE_THRESHOLD {
                if rng.gen::<f64>() < COLLAPSE_FLIP_PROBABILITY {
                    next.set_alive(x, y, !grid.is_alive(x, y));
                }
                field.set(x, y, 0.0);
            } else if grid.is_alive(x, y) {
                if total < 2 || total > 3 {
                    next.set_alive(x, y, false);
                }
            } else if total == 3 {
                next.set_alive(x, y, true);
            }
        }
    }

    let mut overrides: Vec<(Coord, bool)> = Vec::new();
    for ((sx, sy), target) in entanglement.iter() {
        if grid.is_alive(sx, sy) != next.is_alive(sx, sy) {
            overrides.push((target, next.is_alive(sx, sy)));
        }
    }
    for ((x, y), state) in overrides {
        next.set_alive(x, y, state);
    }

    (next, field)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// StepRng yielding all-zero words: every uniform draw is 0.0, so a
    /// collapse always flips.
    fn always_flip() -> StepRng {
        StepRng::new(0, 0)
    }

    /// StepRng yielding all-one words: every uniform draw is just under 1.0,
    /// so a collapse never flips.
    fn never_flip() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    /// Stable 2x2 block with its upper-left corner at (1, 1).
    fn block_grid(size: usize) -> Grid {
        let mut grid = Grid::dead(size);
        for &(x, y) in &[(1, 1), (2, 1), (1, 2), (2, 2)] {
            grid.set_alive(x, y, true);
        }
        grid
    }

    #[test]
    fn test_dead_grid_stays_dead() {
        let mut grid = Grid::dead(4);
        let mut field = SuperpositionField::new(4);
        let table = EntanglementTable::new();
        let mut rng = StdRng::seed_from_u64(0);

        for _ in 0..3 {
            let (g, f) = step(&grid, &field, &table, &mut rng);
            grid = g;
            field = f;
        }
        assert_eq!(grid.population(), 0);
        assert!(field.is_zeroed());
    }

    #[test]
    fn test_boundary_cells_accumulate_superposition() {
        // Next to a block, the dead cell (1, 3) sees exactly two living
        // neighbors, (1, 2) and (2, 2), every generation.
        let mut grid = block_grid(6);
        let mut field = SuperpositionField::new(6);
        let table = EntanglementTable::new();
        let mut rng = StdRng::seed_from_u64(0);

        let reference = grid.clone();
        for _ in 0..3 {
            let (g, f) = step(&grid, &field, &table, &mut rng);
            grid = g;
            field = f;
        }
        assert_eq!(grid, reference, "block must stay static");
        assert_eq!(field.get(1, 3), 0.75);
        // Block members sit on total 3, off the boundary.
        assert_eq!(field.get(1, 1), 0.0);
        // Far corner sees no neighbors at all.
        assert_eq!(field.get(4, 5), 0.0);
    }

    #[test]
    fn test_superposition_resets_off_boundary() {
        let grid = Grid::dead(5);
        let mut field = SuperpositionField::new(5);
        field.set(2, 2, 0.5);
        let table = EntanglementTable::new();

        let (_, field) = step(&grid, &field, &table, &mut always_flip());
        assert_eq!(field.get(2, 2), 0.0);
    }

    #[test]
    fn test_collapse_flips_on_low_draw() {
        let grid = block_grid(6);
        let mut field = SuperpositionField::new(6);
        field.set(1, 3, 0.75);
        let table = EntanglementTable::new();

        let (next, field) = step(&grid, &field, &table, &mut always_flip());
        // (1, 3) reached 1.0 this generation and flipped dead -> alive.
        assert!(next.is_alive(1, 3));
        assert_eq!(field.get(1, 3), 0.0);
        // Other boundary cells only started accumulating.
        assert_eq!(field.get(0, 0), 0.0);
        assert_eq!(field.get(2, 0), 0.25);
    }

    #[test]
    fn test_collapse_resets_without_flip_on_high_draw() {
        let grid = block_grid(6);
        let mut field = SuperpositionField::new(6);
        field.set(1, 3, 0.75);
        let table = EntanglementTable::new();

        let (next, field) = step(&grid, &field, &table, &mut never_flip());
        assert!(!next.is_alive(1, 3));
        assert_eq!(field.get(1, 3), 0.0);
    }

    #[test]
    fn test_collapse_preempts_classic_rule() {
        // Middle of a horizontal blinker: alive with total 2, which the
        // classic rule would keep alive. A collapse with a low draw kills it
        // regardless.
        let mut grid = Grid::dead(6);
        for &(x, y) in &[(1, 1), (2, 1), (3, 1)] {
            grid.set_alive(x, y, true);
        }
        let mut field = SuperpositionField::new(6);
        field.set(2, 1, 0.75);
        let table = EntanglementTable::new();

        let (next, field) = step(&grid, &field, &table, &mut always_flip());
        assert!(!next.is_alive(2, 1));
        assert_eq!(field.get(2, 1), 0.0);

        // With a high draw the cell keeps its old state instead of applying
        // any birth/death logic.
        let mut field = SuperpositionField::new(6);
        field.set(2, 1, 0.75);
        let (next, field) = step(&grid, &field, &table, &mut never_flip());
        assert!(next.is_alive(2, 1));
        assert_eq!(field.get(2, 1), 0.0);
    }

    #[test]
    fn test_entanglement_mirrors_changed_source() {
        // (0, 0) is a lone living cell that dies of isolation; its partner
        // (3, 3) belongs to a stable block and would survive, but the mirror
        // copy overrides the classic result.
        let mut grid = Grid::dead(8);
        grid.set_alive(0, 0, true);
        for &(x, y) in &[(3, 3), (4, 3), (3, 4), (4, 4)] {
            grid.set_alive(x, y, true);
        }
        let field = SuperpositionField::new(8);
        let table = EntanglementTable::from_pairs([((0, 0), (3, 3))]);

        let (next, _) = step(&grid, &field, &table, &mut never_flip());
        assert!(!next.is_alive(0, 0));
        assert!(!next.is_alive(3, 3), "partner must mirror the source's death");
        // The reverse entry does not fire: (3, 3) itself did not change
        // before overrides were applied.
        assert!(next.is_alive(4, 4));
        assert!(next.is_alive(4, 3));
    }

    #[test]
    fn test_unchanged_source_leaves_partner_alone() {
        let grid = block_grid(8);
        let field = SuperpositionField::new(8);
        // Both endpoints are stable block members; neither changes, so the
        // pair never fires.
        let table = EntanglementTable::from_pairs([((1, 1), (2, 2))]);

        let (next, _) = step(&grid, &field, &table, &mut always_flip());
        assert!(next.is_alive(1, 1));
        assert!(next.is_alive(2, 2));
    }

    #[test]
    fn test_last_override_wins_in_table_order() {
        // Two sources change in the same generation and both target (0, 3):
        // (0, 0) dies of isolation, while (3, 4) is born under the blinker at
        // y = 3. The later table entry wins, leaving the target alive.
        let mut grid = Grid::dead(8);
        grid.set_alive(0, 0, true);
        for &(x, y) in &[(2, 3), (3, 3), (4, 3)] {
            grid.set_alive(x, y, true);
        }
        let field = SuperpositionField::new(8);
        let table = EntanglementTable::from_pairs([
            ((0, 0), (0, 3)),
            ((3, 4), (0, 3)),
        ]);

        let (next, _) = step(&grid, &field, &table, &mut never_flip());
        assert!(!next.is_alive(0, 0));
        assert!(next.is_alive(3, 4), "center column of the blinker is born");
        assert!(next.is_alive(0, 3), "later entry overrides the earlier one");
    }

    #[test]
    fn test_corner_block_on_3x3_torus() {
        // On a 3x3 torus every cell's neighborhood covers the whole grid
        // except itself, so with three living cells the living ones total 2
        // and the dead ones total 3: everything is alive after one step.
        let mut grid = Grid::dead(3);
        for &(x, y) in &[(0, 0), (0, 1), (1, 0)] {
            grid.set_alive(x, y, true);
        }
        let field = SuperpositionField::new(3);
        let table = EntanglementTable::new();

        let (next, field) = step(&grid, &field, &table, &mut never_flip());
        assert_eq!(next.population(), 9);
        // The originally living cells sat on the boundary total and started
        // accumulating; the born cells did not.
        assert_eq!(field.get(0, 0), 0.25);
        assert_eq!(field.get(0, 1), 0.25);
        assert_eq!(field.get(1, 0), 0.25);
        assert_eq!(field.get(2, 2), 0.0);
    }
}
