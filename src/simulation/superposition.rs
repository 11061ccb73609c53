/// Per-cell accumulator tracking how long a cell has sat on the
/// survival/death boundary. Values stay in [0.0, 1.0]; the engine resets a
/// cell to zero the moment it leaves the boundary or collapses.
#[derive(Clone, Debug, PartialEq)]
pub struct SuperpositionField {
    size: usize,
    values: Vec<f32>,
}

impl SuperpositionField {
    /// Create a zeroed field.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            values: vec![0.0; size * size],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[y * self.size + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: f32) {
        self.values[y * self.size + x] = value;
    }

    /// True if no cell carries any accumulated superposition.
    #[allow(dead_code)]
    pub fn is_zeroed(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field_is_zeroed() {
        let field = SuperpositionField::new(4);
        assert!(field.is_zeroed());
        assert_eq!(field.get(3, 3), 0.0);
    }

    #[test]
    fn test_set_get() {
        let mut field = SuperpositionField::new(4);
        field.set(2, 1, 0.75);
        assert_eq!(field.get(2, 1), 0.75);
        assert!(!field.is_zeroed());
    }
}
