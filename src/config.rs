use thiserror::Error;

/// Neighbor total that puts a cell on the survival/death boundary.
pub const BOUNDARY_TOTAL: u8 = 2;

/// Superposition gained per generation spent on the boundary.
pub const SUPERPOSITION_INCREMENT: f32 = 0.25;

/// Accumulator value at which a cell collapses.
pub const COLLAPSE_THRESHOLD: f32 = 1.0;

/// Chance that a collapsing cell flips its state.
pub const COLLAPSE_FLIP_PROBABILITY: f64 = 0.5;

/// One entangled pair is drawn per this many grid cells.
pub const ENTANGLED_PAIR_DIVISOR: usize = 50;

/// Milliseconds between generations (10 generations per second).
pub const STEP_INTERVAL_MS: u64 = 100;

/// Simulation parameters supplied by the caller.
///
/// `cell_size` only affects the window; the core ignores it.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Grid edge length N (the grid is N x N).
    pub size: usize,
    /// On-screen edge length of one cell, in pixels.
    pub cell_size: usize,
    /// Probability that a cell starts alive.
    pub prob_alive: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            size: 60,
            cell_size: 10,
            prob_alive: 0.2,
        }
    }
}

impl SimConfig {
    /// Reject malformed parameters before any state is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 1 {
            return Err(ConfigError::GridSize(self.size));
        }
        if self.cell_size < 1 {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if !(0.0..=1.0).contains(&self.prob_alive) {
            return Err(ConfigError::AliveProbability(self.prob_alive));
        }
        Ok(())
    }

    /// Window edge length in logical pixels.
    pub fn window_size(&self) -> u32 {
        (self.size * self.cell_size) as u32
    }
}

/// Errors raised for caller contract violations at construction time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be a positive integer, got {0}")]
    GridSize(usize),

    #[error("cell size must be a positive integer, got {0}")]
    CellSize(usize),

    #[error("alive probability must lie in [0.0, 1.0], got {0}")]
    AliveProbability(f64),
}
