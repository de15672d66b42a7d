//! Reel board (columns × rows)

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::reel::Reel;
use crate::symbols::{Symbol, SymbolTable};
use crate::timing::SpinPlan;

/// The visible reel grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    reels: Vec<Reel>,
    rows: usize,
}

impl Board {
    /// Board from explicit columns (each inner vec is one reel, top first)
    ///
    /// Returns `None` if the columns differ in height.
    pub fn from_columns(columns: Vec<Vec<Symbol>>) -> Option<Self> {
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        if columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        let reels = columns
            .into_iter()
            .enumerate()
            .map(|(index, cells)| Reel::new(index, cells))
            .collect();
        Some(Self { reels, rows })
    }

    /// Fresh board with every cell drawn independently
    pub fn random<R: Rng + ?Sized>(
        columns: usize,
        rows: usize,
        table: &SymbolTable,
        rng: &mut R,
    ) -> Self {
        let reels = (0..columns)
            .map(|index| Reel::new(index, (0..rows).map(|_| table.draw(rng)).collect()))
            .collect();
        Self { reels, rows }
    }

    /// Redraw every cell (one pre-spin shuffle frame)
    pub fn randomize<R: Rng + ?Sized>(&mut self, table: &SymbolTable, rng: &mut R) {
        for reel in &mut self.reels {
            for row in 0..self.rows {
                reel.update_symbol(row, table.draw(rng));
            }
        }
    }

    /// Deal the final layout before reels start rolling
    ///
    /// Reel 0 is drawn freely. Every other cell leans toward the reel 0
    /// symbol on the same row with probability `bias`.
    pub fn deal_near_miss<R: Rng + ?Sized>(&mut self, table: &SymbolTable, bias: f64, rng: &mut R) {
        let Some((first, rest)) = self.reels.split_first_mut() else {
            return;
        };

        for row in 0..self.rows {
            first.update_symbol(row, table.draw(rng));
        }

        for reel in rest {
            for (row, preferred) in first.symbols().iter().enumerate() {
                reel.update_symbol(row, table.draw_biased(rng, Some(preferred), bias));
            }
        }
    }

    /// Roll every reel by its planned step count
    pub fn roll(&mut self, plan: &SpinPlan) {
        for reel in &mut self.reels {
            reel.roll(plan.roll_steps(reel.index));
        }
    }

    /// Symbols across all reels at one row
    pub fn row(&self, row: usize) -> Option<Vec<Symbol>> {
        if row >= self.rows {
            return None;
        }
        self.reels
            .iter()
            .map(|reel| reel.symbol_at(row).cloned())
            .collect()
    }

    pub fn cell(&self, column: usize, row: usize) -> Option<&Symbol> {
        self.reels.get(column).and_then(|reel| reel.symbol_at(row))
    }

    /// Column-major snapshot (grid[reel][row])
    pub fn grid(&self) -> Vec<Vec<Symbol>> {
        self.reels.iter().map(|reel| reel.symbols().to_vec()).collect()
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn reel_mut(&mut self, column: usize) -> Option<&mut Reel> {
        self.reels.get_mut(column)
    }

    pub fn columns(&self) -> usize {
        self.reels.len()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::WeightedSymbol;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn symbols(names: &[&str]) -> Vec<Symbol> {
        names.iter().map(|&n| Symbol::from(n)).collect()
    }

    #[test]
    fn test_random_board_shape() {
        let table = SymbolTable::standard().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let board = Board::random(5, 3, &table, &mut rng);

        assert_eq!(board.columns(), 5);
        assert_eq!(board.rows(), 3);
        assert!(board.grid().iter().flatten().all(|s| table.weight(s) > 0));
    }

    #[test]
    fn test_from_columns_rejects_ragged() {
        assert!(Board::from_columns(vec![symbols(&["A", "B"]), symbols(&["A"])]).is_none());
    }

    #[test]
    fn test_row_reads_across_reels() {
        let board = Board::from_columns(vec![
            symbols(&["A", "B", "C"]),
            symbols(&["D", "E", "F"]),
        ])
        .unwrap();
        assert_eq!(board.row(1), Some(symbols(&["B", "E"])));
        assert_eq!(board.row(3), None);
        assert_eq!(board.cell(1, 2), Some(&Symbol::from("F")));
    }

    #[test]
    fn test_full_bias_copies_first_reel() {
        let table = SymbolTable::standard().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut board = Board::random(5, 3, &table, &mut rng);

        board.deal_near_miss(&table, 1.0, &mut rng);

        for row in 0..3 {
            let line = board.row(row).unwrap();
            assert!(line.iter().all(|s| s == &line[0]));
        }
    }

    #[test]
    fn test_zero_bias_draws_from_table() {
        let entries = vec![WeightedSymbol::new("A", 1), WeightedSymbol::new("B", 1)];
        let table = SymbolTable::new(entries).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut board = Board::random(4, 2, &table, &mut rng);

        board.deal_near_miss(&table, 0.0, &mut rng);
        assert!(board.grid().iter().flatten().all(|s| table.weight(s) == 1));
    }

    #[test]
    fn test_roll_follows_plan() {
        let mut board = Board::from_columns(vec![
            symbols(&["A", "B", "C"]),
            symbols(&["A", "B", "C"]),
        ])
        .unwrap();

        let plan = SpinPlan {
            spin_duration_ms: 100.0,
            reel_stagger_ms: 100.0,
            roll_step_ms: 100.0,
            ..SpinPlan::standard()
        };
        board.roll(&plan);

        // Reel 0 rolls once, reel 1 twice
        assert_eq!(board.reels()[0].symbols(), symbols(&["B", "C", "A"]).as_slice());
        assert_eq!(board.reels()[1].symbols(), symbols(&["C", "A", "B"]).as_slice());
    }
}
