//! A single reel column

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// A column of visible symbol cells, top row first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reel {
    /// Column index (0 = leftmost)
    pub index: usize,
    cells: Vec<Symbol>,
}

impl Reel {
    pub fn new(index: usize, cells: Vec<Symbol>) -> Self {
        Self { index, cells }
    }

    /// Symbol at a row, if in range
    pub fn symbol_at(&self, row: usize) -> Option<&Symbol> {
        self.cells.get(row)
    }

    /// Replace the symbol at a row
    ///
    /// Rows outside the reel are ignored; returns whether a cell changed.
    pub fn update_symbol(&mut self, row: usize, symbol: Symbol) -> bool {
        match self.cells.get_mut(row) {
            Some(cell) => {
                *cell = symbol;
                true
            }
            None => false,
        }
    }

    /// Roll the reel by `steps`
    ///
    /// Each step moves the top cell to the bottom and shifts the others up.
    pub fn roll(&mut self, steps: usize) {
        if self.cells.is_empty() {
            return;
        }
        let shift = steps % self.cells.len();
        self.cells.rotate_left(shift);
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
