mod engine;
mod entanglement;
mod grid;
mod superposition;

pub use engine::step;
pub use entanglement::{Coord, EntanglementTable};
pub use grid::Grid;
pub use superposition::SuperpositionField;

use rand::Rng;

use crate::config::{ConfigError, SimConfig};

/// Build the initial simulation state: a randomly populated grid, a zeroed
/// superposition field, and the run's entanglement table.
///
/// Fails fast on a malformed config; nothing is sampled in that case.
pub fn initialize(
    config: &SimConfig,
    rng: &mut impl Rng,
) -> Result<(Grid, SuperpositionField, EntanglementTable), ConfigError> {
    config.validate()?;
    let grid = Grid::random(config.size, config.prob_alive, rng);
    let superposition = SuperpositionField::new(config.size);
    let entanglement = EntanglementTable::sample(config.size, rng);
    Ok((grid, superposition, entanglement))
}
