//! Batch spin simulation and draw statistics
//!
//! Spins are split across rayon workers. Each worker owns a `ChaCha8Rng`
//! seeded from the run seed and its worker index, so a run is reproducible
//! for a fixed `(spins, seed, workers)` regardless of thread scheduling.

use std::collections::BTreeMap;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, MachineConfig};
use crate::rules::SpinRules;
use crate::symbols::{Symbol, SymbolTable};

/// Batch simulation parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub spins: u64,
    pub seed: u64,
    /// Number of independent RNG streams (0 = one per CPU)
    pub workers: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            spins: 100_000,
            seed: 0,
            workers: 0,
        }
    }
}

/// Aggregated simulation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub spins: u64,
    pub wins: u64,
    pub coins_in: u64,
    pub coins_out: u64,
    pub biggest_payout: u64,
    /// Leading run length → spins
    pub run_lengths: BTreeMap<usize, u64>,
    /// Paying symbol → wins
    pub symbol_wins: BTreeMap<Symbol, u64>,
}

impl SimulationReport {
    /// Return to player (%)
    pub fn rtp(&self) -> f64 {
        if self.coins_in > 0 {
            (self.coins_out as f64 / self.coins_in as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Winning spins (%)
    pub fn hit_rate(&self) -> f64 {
        if self.spins > 0 {
            (self.wins as f64 / self.spins as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Fold another report into this one
    pub fn merge(mut self, other: Self) -> Self {
        self.spins = self.spins.saturating_add(other.spins);
        self.wins = self.wins.saturating_add(other.wins);
        self.coins_in = self.coins_in.saturating_add(other.coins_in);
        self.coins_out = self.coins_out.saturating_add(other.coins_out);
        self.biggest_payout = self.biggest_payout.max(other.biggest_payout);
        for (run, count) in other.run_lengths {
            bump(self.run_lengths.entry(run).or_default(), count);
        }
        for (symbol, count) in other.symbol_wins {
            bump(self.symbol_wins.entry(symbol).or_default(), count);
        }
        self
    }
}

/// Play `sim.spins` spins without coin limits
pub fn simulate(config: &MachineConfig, sim: &SimulationConfig) -> Result<SimulationReport, ConfigError> {
    let rules = SpinRules::from_config(config)?;
    let workers = match sim.workers {
        0 => rayon::current_num_threads(),
        n => n,
    }
    .max(1);
    let spin_cost = config.spin_cost;

    log::info!(
        "Simulating {} spins on {} workers (seed {})",
        sim.spins,
        workers,
        sim.seed
    );
    let started = Instant::now();

    let report = (0..workers)
        .into_par_iter()
        .map(|worker| {
            let share = worker_share(sim.spins, workers, worker);
            run_worker(&rules, spin_cost, share, worker_seed(sim.seed, worker))
        })
        .reduce(SimulationReport::default, SimulationReport::merge);

    log::info!(
        "Simulation finished in {:.2?}: RTP {:.2}%, hit rate {:.2}%",
        started.elapsed(),
        report.rtp(),
        report.hit_rate()
    );
    Ok(report)
}

fn worker_share(total: u64, workers: usize, worker: usize) -> u64 {
    let workers = workers as u64;
    let worker = worker as u64;
    total / workers + u64::from(worker < total % workers)
}

fn worker_seed(seed: u64, worker: usize) -> u64 {
    seed ^ (worker as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn run_worker(rules: &SpinRules, spin_cost: u64, spins: u64, seed: u64) -> SimulationReport {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut board = rules.initial_board(&mut rng);
    let mut report = SimulationReport::default();

    for _ in 0..spins {
        rules.prepare(&mut board, &mut rng);
        let resolution = rules.resolve(&mut board);
        let evaluation = resolution.evaluation;

        report.spins = report.spins.saturating_add(1);
        report.coins_in = report.coins_in.saturating_add(spin_cost);
        bump(report.run_lengths.entry(evaluation.match_count).or_default(), 1);

        if evaluation.is_win() {
            report.wins = report.wins.saturating_add(1);
            report.coins_out = report.coins_out.saturating_add(evaluation.payout);
            report.biggest_payout = report.biggest_payout.max(evaluation.payout);
            if let Some(symbol) = evaluation.symbol {
                bump(report.symbol_wins.entry(symbol).or_default(), 1);
            }
        }
    }

    report
}

fn bump(counter: &mut u64, by: u64) {
    *counter = counter.saturating_add(by);
}

/// Observed draw counts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawHistogram {
    pub trials: u64,
    pub counts: BTreeMap<Symbol, u64>,
}

impl DrawHistogram {
    /// Observed share of a symbol in `[0, 1]`
    pub fn observed_share(&self, symbol: &Symbol) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.counts.get(symbol).copied().unwrap_or(0) as f64 / self.trials as f64
    }

    /// Largest gap between observed and configured share
    pub fn max_deviation(&self, table: &SymbolTable) -> f64 {
        table
            .symbols()
            .map(|s| (self.observed_share(s) - table.probability(s)).abs())
            .fold(0.0, f64::max)
    }
}

/// Sample `trials` unbiased draws
pub fn draw_frequencies(table: &SymbolTable, trials: u64, seed: u64) -> DrawHistogram {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut histogram = DrawHistogram {
        trials,
        counts: BTreeMap::new(),
    };
    for _ in 0..trials {
        *histogram.counts.entry(table.draw(&mut rng)).or_default() += 1;
    }
    histogram
}
