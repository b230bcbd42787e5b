use std::path::PathBuf;
use std::time::Instant;

use bingo::env_config;
use bingo::patterns::{LineProgressDetector, NoPatterns, PatternDetector};
use bingo::simulation::{run_simulation_with, SimulationOptions, SimulationStatistics};

struct Args {
    num_games: usize,
    workers: usize,
    seed: u64,
    config: Option<PathBuf>,
    json: bool,
    patterns: bool,
}

const USAGE: &str =
    "Usage: bingo-simulate [--games N] [--workers W] [--seed S] [--config PATH] [--patterns] [--json]";

fn parse_value<T: std::str::FromStr>(flag: &str, value: Option<&String>) -> T {
    let Some(v) = value else {
        eprintln!("Missing value for {}", flag);
        std::process::exit(1);
    };
    v.parse().unwrap_or_else(|_| {
        eprintln!("Invalid {} value: {}", flag, v);
        std::process::exit(1);
    })
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        num_games: 1000,
        workers: env_config::worker_threads(),
        seed: env_config::seed(),
        config: None,
        json: false,
        patterns: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                i += 1;
                parsed.num_games = parse_value("--games", args.get(i));
            }
            "--workers" => {
                i += 1;
                parsed.workers = parse_value("--workers", args.get(i));
            }
            "--seed" => {
                i += 1;
                parsed.seed = parse_value("--seed", args.get(i));
            }
            "--config" => {
                i += 1;
                parsed.config = Some(parse_value("--config", args.get(i)));
            }
            "--json" => parsed.json = true,
            "--patterns" => parsed.patterns = true,
            "--help" | "-h" => {
                println!("{}", USAGE);
                println!();
                println!("Options:");
                println!("  --games N      Number of games to simulate (default: 1000)");
                println!("  --workers W    Worker threads (default: BINGO_NUM_THREADS or all cores)");
                println!("  --seed S       Base RNG seed, game i uses S+i (default: BINGO_SEED or 42)");
                println!("  --config PATH  JSON scoring config (default: BINGO_CONFIG or built-in)");
                println!("  --patterns     Track line-progress patterns on oracle moves");
                println!("  --json         Print the statistics record as JSON");
                std::process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                eprintln!("{}", USAGE);
                std::process::exit(1);
            }
        }
        i += 1;
    }
    if parsed.num_games == 0 || parsed.workers == 0 {
        eprintln!("--games and --workers must be at least 1");
        std::process::exit(1);
    }
    parsed
}

fn print_summary(stats: &SimulationStatistics) {
    println!("Games:          {}", stats.total_games);
    if stats.failed_games > 0 || stats.cancelled_games > 0 {
        println!(
            "Failed:         {}  Cancelled: {}",
            stats.failed_games, stats.cancelled_games
        );
    }
    println!("Mean lines:     {:.3}", stats.mean_lines);
    println!("Std dev:        {:.3}", stats.std_lines);
    println!("Min / Max:      {} / {}", stats.min_lines, stats.max_lines);
    println!();
    println!("Lines  Games");
    for k in 0..=bingo::constants::MAX_COMPLETED_LINES {
        let count = stats.line_distribution.get(&k.to_string()).copied().unwrap_or(0);
        if count > 0 {
            println!("{:>5}  {}", k, count);
        }
    }
    println!();
    let sp = &stats.score_patterns;
    println!(
        "Oracle move score (mean): three {:.1}  four {:.1}  five {:.1}  total {:.1}",
        sp.mean_three_line, sp.mean_four_line, sp.mean_five_line, sp.mean_total
    );
    if stats.patterns.total_matches > 0 {
        println!(
            "Patterns: {} matches ({:.1} per 100 oracle moves), most common {}",
            stats.patterns.total_matches,
            stats.patterns.match_rate,
            stats.patterns.most_common_pattern.as_deref().unwrap_or("-")
        );
    }
}

fn main() {
    env_logger::init();
    let args = parse_args();

    let ctx = env_config::load_context(args.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("Failed to load scoring config: {}", e);
        std::process::exit(1);
    });

    let detector: &dyn PatternDetector = if args.patterns {
        &LineProgressDetector
    } else {
        &NoPatterns
    };
    let opts = SimulationOptions::new(args.num_games, args.workers, args.seed).with_detector(detector);

    if !args.json {
        println!(
            "Simulating {} games on {} workers (seed {})...",
            args.num_games, args.workers, args.seed
        );
    }
    let start = Instant::now();
    let stats = run_simulation_with(&ctx, &opts).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    });

    if args.json {
        match serde_json::to_string_pretty(&stats) {
            Ok(s) => println!("{}", s),
            Err(e) => {
                eprintln!("Failed to serialize statistics: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        println!("Done in {:.2?}", start.elapsed());
        println!();
        print_summary(&stats);
    }
}
