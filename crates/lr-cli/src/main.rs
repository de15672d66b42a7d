//! Lucky Reels command line
//!
//! Usage:
//!   lucky-reels play --spins 20      - Play a session with the default machine
//!   lucky-reels simulate -n 1000000  - Batch RTP / hit rate report
//!   lucky-reels draws                - Observed vs configured symbol shares
//!   lucky-reels table                - Print the symbol table
//!
//! Pass `--config machine.yaml` to use another machine and `--seed N` for
//! reproducible runs. Set `RUST_LOG=debug` for per-spin logging.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lr_core::{
    MachineConfig, SimulationConfig, SimulationReport, SlotMachine, SpinError, SpinOutcome,
    draw_frequencies, simulate,
};

#[derive(Parser)]
#[command(name = "lucky-reels", about = "Lucky Reels slot machine")]
struct Cli {
    /// Machine config (.json, .yaml or .yml); defaults to the standard machine
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// RNG seed for reproducible runs
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session until the spins are used up or coins run out
    Play {
        /// Maximum number of spins
        #[arg(short = 'n', long, default_value_t = 10)]
        spins: u64,
        /// Starting coins (overrides the config)
        #[arg(long)]
        coins: Option<u64>,
    },
    /// Run a batch simulation
    Simulate {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 100_000)]
        spins: u64,
        /// Worker count (0 = one per CPU)
        #[arg(short, long, default_value_t = 0)]
        workers: usize,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sample symbol draws and compare against configured weights
    Draws {
        /// Number of draws
        #[arg(short = 'n', long, default_value_t = 100_000)]
        trials: u64,
    },
    /// Print symbols, weights, probabilities and payouts
    Table,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Play { spins, coins } => play(config, cli.seed, spins, coins),
        Commands::Simulate {
            spins,
            workers,
            json,
        } => run_simulation(&config, cli.seed.unwrap_or(0), spins, workers, json),
        Commands::Draws { trials } => print_draws(&config, cli.seed.unwrap_or(0), trials),
        Commands::Table => print_table(&config),
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<MachineConfig> {
    match path {
        Some(path) => MachineConfig::load(path)
            .with_context(|| format!("Failed to load machine config {}", path.display())),
        None => {
            log::debug!("No --config given, using the standard machine");
            Ok(MachineConfig::standard())
        }
    }
}

fn play(mut config: MachineConfig, seed: Option<u64>, spins: u64, coins: Option<u64>) -> Result<()> {
    if let Some(coins) = coins {
        config.starting_coins = coins;
    }
    let mut machine = match seed {
        Some(seed) => SlotMachine::with_seed(config, seed),
        None => SlotMachine::new(config),
    }
    .context("Invalid machine config")?;

    println!("Coins: {}\n", machine.coins());

    for _ in 0..spins {
        match machine.spin() {
            Ok(outcome) => print_outcome(&outcome),
            Err(SpinError::InsufficientCoins { .. }) => {
                println!("Not enough coins!");
                break;
            }
            Err(e) => return Err(e).context("Spin failed"),
        }
    }

    let stats = machine.stats();
    println!();
    println!("Spins:       {}", stats.total_spins);
    println!("Wins:        {}", stats.wins);
    println!("Hit rate:    {:.1}%", stats.hit_rate());
    println!("RTP:         {:.1}%", stats.rtp());
    println!("Biggest win: {}", stats.biggest_payout);
    println!("Coins:       {}", machine.coins());
    Ok(())
}

fn print_outcome(outcome: &SpinOutcome) {
    let line = outcome
        .line
        .iter()
        .map(|s| format!("{:>5}", s.as_str()))
        .collect::<Vec<_>>()
        .join(" ");

    let verdict = if outcome.is_win() {
        format!("You Win: {} Coins! :D", outcome.payout())
    } else {
        "Sorry, No Win. :(".to_string()
    };

    println!(
        "#{:<4} [{}]  {:<24} Coins: {}",
        outcome.spin_id, line, verdict, outcome.coins
    );
}

fn run_simulation(
    config: &MachineConfig,
    seed: u64,
    spins: u64,
    workers: usize,
    json: bool,
) -> Result<()> {
    let sim = SimulationConfig {
        spins,
        seed,
        workers,
    };
    let report = simulate(config, &sim).context("Simulation failed")?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Spins:       {}", report.spins);
    println!("Coins in:    {}", report.coins_in);
    println!("Coins out:   {}", report.coins_out);
    println!("RTP:         {:.2}%", report.rtp());
    println!("Hit rate:    {:.2}%", report.hit_rate());
    println!("Biggest win: {}", report.biggest_payout);

    println!("\nRun length distribution:");
    for (run, count) in &report.run_lengths {
        let share = *count as f64 / report.spins.max(1) as f64 * 100.0;
        println!("  {run}: {count:>10} ({share:6.2}%)");
    }

    if !report.symbol_wins.is_empty() {
        println!("\nWins by symbol:");
        for (symbol, count) in &report.symbol_wins {
            println!("  {:<8} {count:>10}", symbol.as_str());
        }
    }
}

fn print_draws(config: &MachineConfig, seed: u64, trials: u64) -> Result<()> {
    let table = config.symbol_table().context("Invalid symbol table")?;
    let histogram = draw_frequencies(&table, trials, seed);

    println!("{:<8} {:>10} {:>10}", "Symbol", "Expected", "Observed");
    for entry in table.entries() {
        println!(
            "{:<8} {:>9.3}% {:>9.3}%",
            entry.symbol.as_str(),
            table.probability(&entry.symbol) * 100.0,
            histogram.observed_share(&entry.symbol) * 100.0
        );
    }
    println!(
        "\nMax deviation: {:.3}%",
        histogram.max_deviation(&table) * 100.0
    );
    Ok(())
}

fn print_table(config: &MachineConfig) -> Result<()> {
    let table = config.symbol_table().context("Invalid symbol table")?;
    let pays = config.pay_table();

    println!(
        "{:<8} {:>6} {:>8} {:>7}",
        "Symbol", "Weight", "Chance", "Payout"
    );
    for entry in table.entries() {
        println!(
            "{:<8} {:>6} {:>7.2}% {:>7}",
            entry.symbol.as_str(),
            entry.weight,
            table.probability(&entry.symbol) * 100.0,
            pays.payout(&entry.symbol).unwrap_or(0)
        );
    }
    println!(
        "\n{} reels x {} rows, paying row {}, {} in a row to win, near-miss bias {:.0}%",
        config.grid.columns,
        config.grid.rows,
        config.grid.winning_row,
        config.min_run,
        config.near_miss_bias * 100.0
    );
    Ok(())
}
