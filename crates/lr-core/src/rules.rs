//! Spin rules shared by sessions and simulations

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{ConfigError, GridSpec, MachineConfig};
use crate::paytable::{LineEvaluation, PayTable};
use crate::symbols::{Symbol, SymbolTable};
use crate::timing::SpinPlan;

/// Immutable rules of one machine, built from a validated config
#[derive(Debug, Clone)]
pub struct SpinRules {
    pub table: SymbolTable,
    pub pay_table: PayTable,
    pub plan: SpinPlan,
    pub grid: GridSpec,
    pub min_run: usize,
    pub near_miss_bias: f64,
}

/// What a resolved spin landed on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Symbols on the winning row, left to right
    pub line: Vec<Symbol>,
    pub evaluation: LineEvaluation,
    /// (reel, row) of every cell in the paying run; empty on a loss
    pub winning_cells: Vec<(usize, usize)>,
}

impl SpinRules {
    pub fn from_config(config: &MachineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            table: config.symbol_table()?,
            pay_table: config.pay_table(),
            plan: config.timing.clone(),
            grid: config.grid,
            min_run: config.min_run,
            near_miss_bias: config.near_miss_bias,
        })
    }

    /// Board for a new session
    pub fn initial_board<R: Rng + ?Sized>(&self, rng: &mut R) -> Board {
        Board::random(self.grid.columns, self.grid.rows, &self.table, rng)
    }

    /// Pre-spin phase: shuffle frames, then the near-miss deal
    pub fn prepare<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) {
        self.shuffle_phase(board, rng);
        self.deal(board, rng);
    }

    /// Full reshuffles shown while the spin starts
    pub fn shuffle_phase<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) {
        for _ in 0..self.plan.shuffle_frames() {
            board.randomize(&self.table, rng);
        }
    }

    /// Final layout the reels roll from; must follow every shuffle frame
    pub fn deal<R: Rng + ?Sized>(&self, board: &mut Board, rng: &mut R) {
        board.deal_near_miss(&self.table, self.near_miss_bias, rng);
    }

    /// Roll the reels and evaluate the winning row
    pub fn resolve(&self, board: &mut Board) -> Resolution {
        board.roll(&self.plan);

        let line = board.row(self.grid.winning_row).unwrap_or_default();
        let evaluation = self.pay_table.evaluate(&line, self.min_run);

        let winning_cells = if evaluation.is_win() {
            (0..evaluation.match_count)
                .map(|reel| (reel, self.grid.winning_row))
                .collect()
        } else {
            Vec::new()
        };

        Resolution {
            line,
            evaluation,
            winning_cells,
        }
    }
}
