use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rand::Rng;

use crate::config::ENTANGLED_PAIR_DIVISOR;

/// Grid coordinate as (x, y).
pub type Coord = (usize, usize);

/// Immutable-after-construction pairing between grid coordinates.
///
/// Linking is last-write-wins per key: re-linking a coordinate overwrites its
/// partner but keeps the coordinate's original position in iteration order,
/// so the propagation tie-break in the engine stays reproducible. The table
/// is symmetric at link time, though overwrites from later draws can leave
/// individual entries one-directional.
#[derive(Clone, Debug, Default)]
pub struct EntanglementTable {
    entries: Vec<(Coord, Coord)>,
    index: HashMap<Coord, usize>,
}

impl EntanglementTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw `floor(size^2 / 50)` random coordinate pairs and link each
    /// bidirectionally. Draws may collide or self-pair; no deduplication.
    pub fn sample(size: usize, rng: &mut impl Rng) -> Self {
        let mut table = Self::new();
        let pair_count = size * size / ENTANGLED_PAIR_DIVISOR;
        for _ in 0..pair_count {
            let a = (rng.gen_range(0..size), rng.gen_range(0..size));
            let b = (rng.gen_range(0..size), rng.gen_range(0..size));
            table.link(a, b);
            table.link(b, a);
        }
        table
    }

    /// Build a table from explicit pairs, applying the same bidirectional
    /// last-write-wins linking as `sample`.
    #[allow(dead_code)]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Coord, Coord)>) -> Self {
        let mut table = Self::new();
        for (a, b) in pairs {
            table.link(a, b);
            table.link(b, a);
        }
        table
    }

    fn link(&mut self, key: Coord, partner: Coord) {
        match self.index.entry(key) {
            Entry::Occupied(slot) => self.entries[*slot.get()].1 = partner,
            Entry::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push((key, partner));
            }
        }
    }

    /// Current partner of `coord`, if it is entangled.
    #[allow(dead_code)]
    pub fn partner_of(&self, coord: Coord) -> Option<Coord> {
        self.index.get(&coord).map(|&slot| self.entries[slot].1)
    }

    pub fn is_entangled(&self, coord: Coord) -> bool {
        self.index.contains_key(&coord)
    }

    /// Live entries in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, Coord)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of live entries (entangled coordinates, not pairs).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
