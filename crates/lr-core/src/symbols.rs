//! Symbol definitions and weighted draws

use std::collections::HashSet;
use std::fmt;

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// A reel symbol, identified by name (e.g., "H1", "Bonus")
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Create a symbol from its name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Symbol name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A (symbol, weight) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedSymbol {
    pub symbol: Symbol,
    /// Relative draw weight (0 = never drawn)
    pub weight: u32,
}

impl WeightedSymbol {
    pub fn new(symbol: impl Into<String>, weight: u32) -> Self {
        Self {
            symbol: Symbol::new(symbol),
            weight,
        }
    }
}

/// Weighted symbol table
///
/// Draws are proportional to weight (cumulative roulette selection). The
/// table is never empty and its total weight is always positive.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    entries: Vec<WeightedSymbol>,
    index: WeightedIndex<u32>,
    total_weight: u64,
}

impl SymbolTable {
    /// Build a table, rejecting empty, duplicated or all-zero entries
    pub fn new(entries: Vec<WeightedSymbol>) -> Result<Self, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::EmptySymbolTable);
        }

        {
            let mut seen = HashSet::with_capacity(entries.len());
            for entry in &entries {
                if !seen.insert(entry.symbol.as_str()) {
                    return Err(ConfigError::DuplicateSymbol(entry.symbol.to_string()));
                }
            }
        }

        let index = WeightedIndex::new(entries.iter().map(|e| e.weight))
            .map_err(|e| ConfigError::InvalidWeights(e.to_string()))?;
        let total_weight = entries.iter().map(|e| e.weight as u64).sum();

        Ok(Self {
            entries,
            index,
            total_weight,
        })
    }

    /// Weighted table of the standard machine
    pub fn standard() -> Result<Self, ConfigError> {
        Self::new(standard_weights())
    }

    /// Draw one symbol proportionally to weight
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> Symbol {
        self.entries[self.index.sample(rng)].symbol.clone()
    }

    /// Draw with a soft bias toward `preferred`
    ///
    /// With probability `bias` the preferred symbol is returned as-is, even
    /// when it is not part of the table. Otherwise this is a plain [`draw`].
    ///
    /// [`draw`]: SymbolTable::draw
    pub fn draw_biased<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        preferred: Option<&Symbol>,
        bias: f64,
    ) -> Symbol {
        if let Some(preferred) = preferred {
            if rng.random::<f64>() < bias {
                return preferred.clone();
            }
        }
        self.draw(rng)
    }

    /// Configured share of a symbol (weight / total weight)
    pub fn probability(&self, symbol: &Symbol) -> f64 {
        self.weight(symbol) as f64 / self.total_weight as f64
    }

    /// Weight of a symbol (0 if absent)
    pub fn weight(&self, symbol: &Symbol) -> u32 {
        self.entries
            .iter()
            .find(|e| &e.symbol == symbol)
            .map(|e| e.weight)
            .unwrap_or(0)
    }

    pub fn total_weight(&self) -> u64 {
        self.total_weight
    }

    pub fn entries(&self) -> &[WeightedSymbol] {
        &self.entries
    }

    pub fn symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.entries.iter().map(|e| &e.symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Weights of the standard ten-symbol machine
///
/// Low payers (H7, H3, H8) dominate; premium symbols and Bonus are rare.
pub fn standard_weights() -> Vec<WeightedSymbol> {
    vec![
        WeightedSymbol::new("H1", 70),
        WeightedSymbol::new("H2", 60),
        WeightedSymbol::new("H3", 80),
        WeightedSymbol::new("H4", 50),
        WeightedSymbol::new("H5", 20),
        WeightedSymbol::new("H6", 20),
        WeightedSymbol::new("H9", 20),
        WeightedSymbol::new("H7", 90),
        WeightedSymbol::new("H8", 80),
        WeightedSymbol::new("Bonus", 20),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(
            SymbolTable::new(Vec::new()),
            Err(ConfigError::EmptySymbolTable)
        ));
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        let entries = vec![WeightedSymbol::new("A", 1), WeightedSymbol::new("A", 2)];
        assert!(matches!(
            SymbolTable::new(entries),
            Err(ConfigError::DuplicateSymbol(name)) if name == "A"
        ));
    }

    #[test]
    fn test_zero_weights_rejected() {
        let entries = vec![WeightedSymbol::new("A", 0), WeightedSymbol::new("B", 0)];
        assert!(matches!(
            SymbolTable::new(entries),
            Err(ConfigError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_zero_weight_symbol_never_drawn() {
        let entries = vec![WeightedSymbol::new("A", 0), WeightedSymbol::new("B", 5)];
        let table = SymbolTable::new(entries).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1_000 {
            assert_eq!(table.draw(&mut rng).as_str(), "B");
        }
    }

    #[test]
    fn test_standard_table_builds() {
        let table = SymbolTable::standard().unwrap();
        let names: Vec<&str> = table.symbols().map(Symbol::as_str).collect();
        assert_eq!(
            names,
            ["H1", "H2", "H3", "H4", "H5", "H6", "H9", "H7", "H8", "Bonus"]
        );
    }

    #[test]
    fn test_standard_probabilities() {
        let table = SymbolTable::standard().unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table.total_weight(), 510);
        assert_abs_diff_eq!(table.probability(&Symbol::from("H7")), 90.0 / 510.0);
        assert_eq!(table.probability(&Symbol::from("missing")), 0.0);
    }

    #[test]
    fn test_draw_converges_to_weights() {
        let table = SymbolTable::standard().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let trials = 100_000;
        let hits = (0..trials)
            .filter(|_| table.draw(&mut rng).as_str() == "H7")
            .count();
        let observed = hits as f64 / trials as f64;
        assert_abs_diff_eq!(observed, 90.0 / 510.0, epsilon = 0.01);
    }

    #[test]
    fn test_biased_draw_share() {
        let table = SymbolTable::standard().unwrap();
        let preferred = Symbol::from("H9");
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let trials = 50_000;
        let hits = (0..trials)
            .filter(|_| table.draw_biased(&mut rng, Some(&preferred), 0.4) == preferred)
            .count();
        let expected = 0.4 + 0.6 * (20.0 / 510.0);
        assert_abs_diff_eq!(hits as f64 / trials as f64, expected, epsilon = 0.01);
    }

    #[test]
    fn test_biased_draw_returns_unknown_preferred() {
        let table = SymbolTable::standard().unwrap();
        let preferred = Symbol::from("H1_connect");
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(table.draw_biased(&mut rng, Some(&preferred), 1.0), preferred);
    }

    #[test]
    fn test_zero_bias_ignores_preferred() {
        let entries = vec![WeightedSymbol::new("A", 1)];
        let table = SymbolTable::new(entries).unwrap();
        let preferred = Symbol::from("Z");
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(table.draw_biased(&mut rng, Some(&preferred), 0.0).as_str(), "A");
        }
    }
}
