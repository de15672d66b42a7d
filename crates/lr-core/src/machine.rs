//! Slot machine session — coins, spin lifecycle and statistics

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::{ConfigError, MachineConfig};
use crate::paytable::LineEvaluation;
use crate::rules::SpinRules;
use crate::symbols::Symbol;

/// A playable slot machine
///
/// A spin has two phases. [`begin_spin`] pays for the spin and runs the
/// shuffle frames; [`finish_spin`] deals the near-miss layout, rolls the
/// reels and settles the win.
/// While a spin is in flight further spin requests are refused.
///
/// [`begin_spin`]: SlotMachine::begin_spin
/// [`finish_spin`]: SlotMachine::finish_spin
pub struct SlotMachine {
    /// Configuration
    config: MachineConfig,
    /// Rules derived from the configuration
    rules: SpinRules,
    /// Visible reels
    board: Board,
    /// Random number generator
    rng: StdRng,
    /// Coin balance
    coins: u64,
    /// A spin is in flight
    spinning: bool,
    /// Spins started so far
    spin_count: u64,
    /// Current session stats
    stats: SessionStats,
}

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_spins: u64,
    pub wins: u64,
    pub losses: u64,
    pub coins_spent: u64,
    pub coins_won: u64,
    pub biggest_payout: u64,
}

impl SessionStats {
    /// Return to player (%)
    pub fn rtp(&self) -> f64 {
        if self.coins_spent > 0 {
            (self.coins_won as f64 / self.coins_spent as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins (%)
    pub fn hit_rate(&self) -> f64 {
        if self.total_spins > 0 {
            (self.wins as f64 / self.total_spins as f64) * 100.0
        } else {
            0.0
        }
    }

    fn record(&mut self, payout: u64) {
        self.total_spins = self.total_spins.saturating_add(1);
        if payout > 0 {
            self.wins = self.wins.saturating_add(1);
            self.coins_won = self.coins_won.saturating_add(payout);
            self.biggest_payout = self.biggest_payout.max(payout);
        } else {
            self.losses = self.losses.saturating_add(1);
        }
    }
}

/// Settled spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// 1-based spin number within the session
    pub spin_id: u64,
    /// Final board (grid[reel][row])
    pub grid: Vec<Vec<Symbol>>,
    /// Winning row, left to right
    pub line: Vec<Symbol>,
    pub evaluation: LineEvaluation,
    /// Cells of the paying run (reel, row)
    pub winning_cells: Vec<(usize, usize)>,
    /// Balance after the payout
    pub coins: u64,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.evaluation.is_win()
    }

    pub fn payout(&self) -> u64 {
        self.evaluation.payout
    }
}

/// Spin request errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpinError {
    #[error("A spin is already in progress")]
    AlreadySpinning,

    #[error("No spin in progress")]
    NotSpinning,

    #[error("Not enough coins: have {coins}, spin costs {cost}")]
    InsufficientCoins { coins: u64, cost: u64 },
}

impl SlotMachine {
    /// Create a machine seeded from the OS
    pub fn new(config: MachineConfig) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a machine with reproducible draws
    pub fn with_seed(config: MachineConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: MachineConfig, mut rng: StdRng) -> Result<Self, ConfigError> {
        let rules = SpinRules::from_config(&config)?;
        let board = rules.initial_board(&mut rng);

        Ok(Self {
            coins: config.starting_coins,
            config,
            rules,
            board,
            rng,
            spinning: false,
            spin_count: 0,
            stats: SessionStats::default(),
        })
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // STATE
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn rules(&self) -> &SpinRules {
        &self.rules
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Whether the balance covers one more spin
    pub fn can_spin(&self) -> bool {
        !self.spinning && self.coins >= self.config.spin_cost
    }

    /// Top up the balance
    pub fn add_coins(&mut self, amount: u64) {
        self.coins = self.coins.saturating_add(amount);
    }

    /// Reseed the RNG for reproducible results
    pub fn seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // SPIN EXECUTION
    // ═══════════════════════════════════════════════════════════════════════════

    /// Pay for a spin and run the shuffle frames
    pub fn begin_spin(&mut self) -> Result<(), SpinError> {
        if self.spinning {
            return Err(SpinError::AlreadySpinning);
        }
        let cost = self.config.spin_cost;
        if self.coins < cost || self.coins == 0 {
            log::debug!("Spin refused: {} coins, cost {}", self.coins, cost);
            return Err(SpinError::InsufficientCoins {
                coins: self.coins,
                cost,
            });
        }

        self.coins -= cost;
        self.stats.coins_spent = self.stats.coins_spent.saturating_add(cost);
        self.spinning = true;
        self.spin_count = self.spin_count.saturating_add(1);

        self.rules.shuffle_phase(&mut self.board, &mut self.rng);
        Ok(())
    }

    /// Extra shuffle frame while the spin is starting
    pub fn shuffle(&mut self) -> Result<(), SpinError> {
        if !self.spinning {
            return Err(SpinError::NotSpinning);
        }
        self.board.randomize(&self.rules.table, &mut self.rng);
        Ok(())
    }

    /// Deal the near-miss layout, roll the reels, evaluate the winning row
    /// and credit the payout
    pub fn finish_spin(&mut self) -> Result<SpinOutcome, SpinError> {
        if !self.spinning {
            return Err(SpinError::NotSpinning);
        }

        self.rules.deal(&mut self.board, &mut self.rng);
        let resolution = self.rules.resolve(&mut self.board);
        let payout = resolution.evaluation.payout;
        self.coins = self.coins.saturating_add(payout);
        self.stats.record(payout);
        self.spinning = false;

        log::debug!(
            "Spin {}: {:?} run={} payout={} coins={}",
            self.spin_count,
            resolution.line,
            resolution.evaluation.match_count,
            payout,
            self.coins
        );

        Ok(SpinOutcome {
            spin_id: self.spin_count,
            grid: self.board.grid(),
            line: resolution.line,
            evaluation: resolution.evaluation,
            winning_cells: resolution.winning_cells,
            coins: self.coins,
        })
    }

    /// Complete spin in one call
    pub fn spin(&mut self) -> Result<SpinOutcome, SpinError> {
        self.begin_spin()?;
        self.finish_spin()
    }

    /// Reset coins and statistics, keeping the board
    pub fn reset_session(&mut self) {
        self.coins = self.config.starting_coins;
        self.stats = SessionStats::default();
        self.spin_count = 0;
        self.spinning = false;
    }
}
