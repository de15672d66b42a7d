//! Pay table and line evaluation

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::symbols::Symbol;

/// Default minimum run length for a paying line
pub const DEFAULT_MIN_RUN: usize = 3;

/// Symbol → coin payout mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PayTable {
    payouts: BTreeMap<Symbol, u64>,
}

impl PayTable {
    /// Create an empty pay table (nothing pays)
    pub fn new() -> Self {
        Self::default()
    }

    /// Pay table of the standard machine
    pub fn standard() -> Self {
        [
            ("H1", 10),
            ("H2", 15),
            ("H3", 20),
            ("H4", 25),
            ("H5", 30),
            ("H6", 35),
            ("H7", 5),
            ("H8", 10),
            ("H9", 50),
            ("Bonus", 100),
        ]
        .into_iter()
        .map(|(name, payout)| (Symbol::new(name), payout))
        .collect()
    }

    /// Register (or replace) a payout
    pub fn insert(&mut self, symbol: Symbol, payout: u64) {
        self.payouts.insert(symbol, payout);
    }

    /// Payout for a symbol; `None` when absent or zero
    pub fn payout(&self, symbol: &Symbol) -> Option<u64> {
        self.payouts.get(symbol).copied().filter(|&p| p > 0)
    }

    /// Evaluate a row left to right
    ///
    /// Only the run starting at the first reel counts. The payout is flat:
    /// a run of five pays the same as a run of `min_run`.
    pub fn evaluate(&self, row: &[Symbol], min_run: usize) -> LineEvaluation {
        let match_count = leading_run(row);
        let symbol = row.first().cloned();

        let payout = match &symbol {
            Some(s) if match_count >= min_run => self.payout(s).unwrap_or(0),
            _ => 0,
        };

        LineEvaluation {
            symbol,
            match_count,
            payout,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, u64)> {
        self.payouts.iter().map(|(s, &p)| (s, p))
    }

    pub fn len(&self) -> usize {
        self.payouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payouts.is_empty()
    }
}

impl FromIterator<(Symbol, u64)> for PayTable {
    fn from_iter<I: IntoIterator<Item = (Symbol, u64)>>(iter: I) -> Self {
        Self {
            payouts: iter.into_iter().collect(),
        }
    }
}

/// Length of the run of identical symbols starting at index 0
pub fn leading_run(row: &[Symbol]) -> usize {
    let Some(first) = row.first() else {
        return 0;
    };
    row.iter().take_while(|s| *s == first).count()
}

/// Result of evaluating one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineEvaluation {
    /// Symbol on the first reel (`None` for an empty row)
    pub symbol: Option<Symbol>,
    /// Contiguous matches from the left
    pub match_count: usize,
    /// Coins won (0 for no win)
    pub payout: u64,
}

impl LineEvaluation {
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}
