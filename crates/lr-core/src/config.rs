//! Machine configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::paytable::{DEFAULT_MIN_RUN, PayTable};
use crate::symbols::{Symbol, SymbolTable, WeightedSymbol, standard_weights};
use crate::timing::SpinPlan;

/// Grid specification (columns × rows)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    /// Number of reels
    pub columns: usize,
    /// Visible rows per reel
    pub rows: usize,
    /// Row evaluated for wins (0 = top)
    pub winning_row: usize,
}

impl GridSpec {
    /// Standard 5×3, paying on the middle row
    pub fn standard_5x3() -> Self {
        Self {
            columns: 5,
            rows: 3,
            winning_row: 1,
        }
    }

    pub fn total_positions(&self) -> usize {
        self.columns * self.rows
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::standard_5x3()
    }
}

/// One symbol's weight and payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolSpec {
    pub name: String,
    pub weight: u32,
    /// Coins paid for a winning line (0 = never pays)
    #[serde(default)]
    pub payout: u64,
}

impl SymbolSpec {
    pub fn new(name: impl Into<String>, weight: u32, payout: u64) -> Self {
        Self {
            name: name.into(),
            weight,
            payout,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub grid: GridSpec,
    /// Minimum leading run for a paying line
    pub min_run: usize,
    /// Coins at session start
    pub starting_coins: u64,
    /// Coins deducted per spin
    pub spin_cost: u64,
    /// Probability that a cell copies reel 0's symbol on the same row
    pub near_miss_bias: f64,
    pub symbols: Vec<SymbolSpec>,
    pub timing: SpinPlan,
}

impl MachineConfig {
    /// The standard ten-symbol, 5×3 machine
    pub fn standard() -> Self {
        let pays = PayTable::standard();
        let symbols = standard_weights()
            .into_iter()
            .map(|w| {
                let payout = pays.payout(&w.symbol).unwrap_or(0);
                SymbolSpec::new(w.symbol.as_str(), w.weight, payout)
            })
            .collect();

        Self {
            grid: GridSpec::standard_5x3(),
            min_run: DEFAULT_MIN_RUN,
            starting_coins: 10,
            spin_cost: 1,
            near_miss_bias: 0.4,
            symbols,
            timing: SpinPlan::standard(),
        }
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let config = match extension.as_str() {
            "json" => Self::from_json_str(&text)?,
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };

        log::info!(
            "Loaded machine config from {} ({} symbols, {}x{})",
            path.display(),
            config.symbols.len(),
            config.grid.columns,
            config.grid.rows
        );
        Ok(config)
    }

    /// Parse and validate JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check grid, thresholds, bias, symbols and timing
    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.columns == 0 || grid.rows == 0 {
            return Err(ConfigError::InvalidGrid(format!(
                "grid must be at least 1x1, got {}x{}",
                grid.columns, grid.rows
            )));
        }
        if grid.winning_row >= grid.rows {
            return Err(ConfigError::InvalidGrid(format!(
                "winning row {} outside {} rows",
                grid.winning_row, grid.rows
            )));
        }
        if self.min_run == 0 || self.min_run > grid.columns {
            return Err(ConfigError::InvalidGrid(format!(
                "minimum run {} must be between 1 and {} columns",
                self.min_run, grid.columns
            )));
        }
        if !(0.0..=1.0).contains(&self.near_miss_bias) {
            return Err(ConfigError::InvalidBias(self.near_miss_bias));
        }

        self.symbol_table()?;
        self.timing.validate()?;

        if self.spin_cost == 0 {
            log::warn!("spin_cost is 0: spins are free and coins can only grow");
        }
        if self.symbols.iter().all(|s| s.payout == 0) {
            log::warn!("no symbol has a payout: every spin loses");
        }

        Ok(())
    }

    /// Weighted table built from the symbol list
    pub fn symbol_table(&self) -> Result<SymbolTable, ConfigError> {
        SymbolTable::new(
            self.symbols
                .iter()
                .map(|s| WeightedSymbol::new(s.name.as_str(), s.weight))
                .collect(),
        )
    }

    /// Pay table built from the symbol list
    pub fn pay_table(&self) -> PayTable {
        self.symbols
            .iter()
            .map(|s| (Symbol::new(s.name.as_str()), s.payout))
            .collect()
    }

    /// Builder pattern: replace the symbol list
    pub fn with_symbols(mut self, symbols: Vec<SymbolSpec>) -> Self {
        self.symbols = symbols;
        self
    }

    /// Builder pattern: set starting coins
    pub fn with_starting_coins(mut self, coins: u64) -> Self {
        self.starting_coins = coins;
        self
    }

    /// Builder pattern: set near-miss bias
    pub fn with_near_miss_bias(mut self, bias: f64) -> Self {
        self.near_miss_bias = bias;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yml::Error),

    #[error("Unsupported config format: '{0}' (expected json, yaml or yml)")]
    UnsupportedFormat(String),

    #[error("Symbol table is empty")]
    EmptySymbolTable,

    #[error("Symbol listed twice: {0}")]
    DuplicateSymbol(String),

    #[error("Invalid symbol weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Near-miss bias must be within [0, 1], got {0}")]
    InvalidBias(f64),

    #[error("Invalid timing: {0}")]
    InvalidTiming(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        let config = MachineConfig::standard();
        assert!(config.validate().is_ok());
        assert_eq!(config.symbols.len(), 10);
        assert_eq!(config.grid.total_positions(), 15);
        assert_eq!(config.pay_table().payout(&Symbol::from("Bonus")), Some(100));
        assert_eq!(config.symbol_table().unwrap().total_weight(), 510);
    }

    #[test]
    fn test_parse_partial_json_uses_defaults() {
        let json = r#"{
            "starting_coins": 50,
            "symbols": [
                { "name": "Cherry", "weight": 3, "payout": 4 },
                { "name": "Seven", "weight": 1, "payout": 77 }
            ]
        }"#;

        let config = MachineConfig::from_json_str(json).unwrap();
        assert_eq!(config.starting_coins, 50);
        assert_eq!(config.grid, GridSpec::standard_5x3());
        assert_eq!(config.timing, SpinPlan::standard());
        assert_eq!(config.symbols[1], SymbolSpec::new("Seven", 1, 77));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
grid:
  columns: 3
  rows: 1
  winning_row: 0
min_run: 2
near_miss_bias: 0.0
symbols:
  - name: A
    weight: 1
    payout: 2
  - name: B
    weight: 1
timing:
  scale: 0.5
"#;

        let config = MachineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.grid.columns, 3);
        assert_eq!(config.min_run, 2);
        assert_eq!(config.symbols[1].payout, 0);
        assert_eq!(config.timing.scale, 0.5);
        assert_eq!(config.timing.roll_step_ms, 100.0);
    }

    #[test]
    fn test_validation_limits() {
        let empty = MachineConfig::standard().with_symbols(Vec::new());
        assert!(matches!(empty.validate(), Err(ConfigError::EmptySymbolTable)));

        let mut bad_row = MachineConfig::standard();
        bad_row.grid.winning_row = 3;
        assert!(matches!(bad_row.validate(), Err(ConfigError::InvalidGrid(_))));

        let mut long_run = MachineConfig::standard();
        long_run.min_run = 6;
        assert!(matches!(long_run.validate(), Err(ConfigError::InvalidGrid(_))));

        let bias = MachineConfig::standard().with_near_miss_bias(1.5);
        assert!(matches!(bias.validate(), Err(ConfigError::InvalidBias(_))));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            MachineConfig::from_json_str("{ not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let path = std::env::temp_dir().join("lr-core-config-test.toml");
        std::fs::write(&path, "grid = 1").unwrap();
        let result = MachineConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(ext)) if ext == "toml"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = MachineConfig::load("/definitely/not/here.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
