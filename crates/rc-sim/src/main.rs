//! Batch spin simulator
//!
//! Runs many independent sessions in parallel and aggregates RTP, hit rate,
//! and feature frequency. One engine per session keeps the single-writer
//! discipline intact; parallelism is across sessions only.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use rc_engine::{
    EngineConfig, EngineResult, MemoryLedger, SlotEngine, SpinEngine, SpinRequest, WinClass,
};

#[derive(Parser, Debug)]
#[command(name = "rc-sim", about = "ReelCore batch spin simulator")]
struct Args {
    /// Spins per session
    #[arg(long, default_value_t = 100_000)]
    spins: u64,

    /// Parallel sessions
    #[arg(long, default_value_t = num_cpus::get() as u64)]
    sessions: u64,

    /// Bet per spin
    #[arg(long, default_value_t = 1.0)]
    bet: f64,

    /// Active paylines (1..=20)
    #[arg(long, default_value_t = 20)]
    lines: u8,

    /// Base RNG seed; session i runs on seed + i
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Engine config file (.json or .yaml); defaults to the standard game
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit the report as JSON
    #[arg(long)]
    json: bool,
}

/// Aggregated results across all sessions
#[derive(Debug, Default, Serialize)]
struct SimReport {
    sessions: u64,
    total_spins: u64,
    base_spins: u64,
    bonus_spins: u64,
    total_bet: f64,
    total_win: f64,
    rtp_percent: f64,
    hit_rate_percent: f64,
    bonus_triggers: u64,
    bonus_rounds_completed: u64,
    max_win_ratio: f64,
    small_wins: u64,
    medium_wins: u64,
    large_wins: u64,
    mega_wins: u64,
}

impl SimReport {
    fn merge(&mut self, other: &SimReport) {
        self.sessions += other.sessions;
        self.total_spins += other.total_spins;
        self.base_spins += other.base_spins;
        self.bonus_spins += other.bonus_spins;
        self.total_bet += other.total_bet;
        self.total_win += other.total_win;
        self.bonus_triggers += other.bonus_triggers;
        self.bonus_rounds_completed += other.bonus_rounds_completed;
        self.max_win_ratio = self.max_win_ratio.max(other.max_win_ratio);
        self.small_wins += other.small_wins;
        self.medium_wins += other.medium_wins;
        self.large_wins += other.large_wins;
        self.mega_wins += other.mega_wins;
    }

    fn finalize(&mut self, wins: u64) {
        if self.total_bet > 0.0 {
            self.rtp_percent = self.total_win / self.total_bet * 100.0;
        }
        if self.total_spins > 0 {
            self.hit_rate_percent = wins as f64 / self.total_spins as f64 * 100.0;
        }
    }
}

fn run_session(
    config: &EngineConfig,
    spins: u64,
    bet: f64,
    lines: u8,
    seed: u64,
) -> EngineResult<(SimReport, u64)> {
    // Balance large enough that the session never runs dry
    let bankroll = bet * spins as f64 * 2.0;
    let mut engine = SlotEngine::with_seed(config.clone(), MemoryLedger::new(bankroll), seed)?;
    let request = SpinRequest::new(bet, lines);

    let mut report = SimReport {
        sessions: 1,
        ..SimReport::default()
    };

    for _ in 0..spins {
        let result = engine.spin(&request)?;
        report.total_spins += 1;
        if result.is_bonus_spin {
            report.bonus_spins += 1;
            if result.bonus_lump > 0.0 {
                report.bonus_rounds_completed += 1;
            }
        } else {
            report.base_spins += 1;
        }
        match result.win_class {
            Some(WinClass::Small) => report.small_wins += 1,
            Some(WinClass::Medium) => report.medium_wins += 1,
            Some(WinClass::Large) => report.large_wins += 1,
            Some(WinClass::Mega) => report.mega_wins += 1,
            None => {}
        }
    }

    let stats = engine.stats();
    report.total_bet = stats.total_bet;
    report.total_win = stats.total_win;
    report.bonus_triggers = stats.bonus_triggers;
    report.max_win_ratio = stats.max_win_ratio;
    Ok((report, stats.wins))
}

fn load_config(path: &PathBuf) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => EngineConfig::from_yaml(&text)?,
        _ => EngineConfig::from_json(&text)?,
    };
    Ok(config)
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;

    log::info!(
        "simulating {} sessions x {} spins on '{}'",
        args.sessions,
        args.spins,
        config.name
    );

    let results: Vec<(SimReport, u64)> = (0..args.sessions)
        .into_par_iter()
        .map(|i| {
            run_session(
                &config,
                args.spins,
                args.bet,
                args.lines,
                args.seed.wrapping_add(i),
            )
        })
        .collect::<EngineResult<Vec<_>>>()?;

    let mut report = SimReport::default();
    let mut wins = 0u64;
    for (session_report, session_wins) in &results {
        report.merge(session_report);
        wins += session_wins;
    }
    report.finalize(wins);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SimReport) {
    println!("=== ReelCore simulation ===");
    println!("sessions:          {}", report.sessions);
    println!(
        "spins:             {} ({} base, {} bonus)",
        report.total_spins, report.base_spins, report.bonus_spins
    );
    println!("total bet:         {:.2}", report.total_bet);
    println!("total win:         {:.2}", report.total_win);
    println!("RTP:               {:.2}%", report.rtp_percent);
    println!("hit rate:          {:.2}%", report.hit_rate_percent);
    println!("bonus triggers:    {}", report.bonus_triggers);
    println!("bonus completed:   {}", report.bonus_rounds_completed);
    println!("max win ratio:     {:.1}x", report.max_win_ratio);
    println!(
        "win classes:       small {} / medium {} / large {} / mega {}",
        report.small_wins, report.medium_wins, report.large_wins, report.mega_wins
    );
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_run_produces_consistent_report() {
        let config = EngineConfig::default();
        let (report, wins) = run_session(&config, 500, 1.0, 20, 42).unwrap();
        assert_eq!(report.total_spins, 500);
        assert_eq!(report.base_spins + report.bonus_spins, 500);
        assert!(wins <= report.total_spins);
        assert!(report.total_bet > 0.0);
    }

    #[test]
    fn reports_merge_additively() {
        let mut a = SimReport {
            sessions: 1,
            total_spins: 10,
            total_bet: 10.0,
            total_win: 5.0,
            max_win_ratio: 3.0,
            ..SimReport::default()
        };
        let b = SimReport {
            sessions: 1,
            total_spins: 20,
            total_bet: 20.0,
            total_win: 25.0,
            max_win_ratio: 8.0,
            ..SimReport::default()
        };
        a.merge(&b);
        a.finalize(9);
        assert_eq!(a.sessions, 2);
        assert_eq!(a.total_spins, 30);
        assert_eq!(a.max_win_ratio, 8.0);
        assert!((a.rtp_percent - 100.0).abs() < 1e-9);
        assert!((a.hit_rate_percent - 30.0).abs() < 1e-9);
    }
}
