//! # lr-core — Headless slot machine core for Lucky Reels
//!
//! Everything the game needs to decide an outcome, with no rendering attached:
//! weighted symbol draws, near-miss dealing, reel rolling, left-to-right line
//! payouts and the coin session that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! MachineConfig (JSON / YAML / defaults)
//!     │
//!     v
//! SpinRules
//!     ├── SymbolTable (weighted draws, near-miss bias)
//!     ├── PayTable (symbol → coins, leading run evaluation)
//!     └── SpinPlan (staggered roll steps per reel)
//!           │
//!           v
//! SlotMachine ── Board (Reel × columns) ──> SpinOutcome
//!
//! simulate() ── rayon workers × SpinRules ──> SimulationReport
//! ```

pub mod board;
pub mod config;
pub mod machine;
pub mod paytable;
pub mod reel;
pub mod rules;
pub mod simulation;
pub mod symbols;
pub mod timing;

pub use board::*;
pub use config::*;
pub use machine::*;
pub use paytable::*;
pub use reel::*;
pub use rules::*;
pub use simulation::*;
pub use symbols::*;
pub use timing::*;
