use bingo::env_config;
use bingo::solver::{evaluate_all, suggest_moves};
use bingo::Board;

const USAGE: &str = "Usage: bingo-evaluate <cells|empty>   e.g. bingo-evaluate 0,6,12";

fn parse_board(arg: &str) -> Board {
    if arg == "empty" || arg.is_empty() {
        return Board::EMPTY;
    }
    let mut cells = Vec::new();
    for part in arg.split(',') {
        match part.trim().parse::<u8>() {
            Ok(c) => cells.push(c),
            Err(_) => {
                eprintln!("Invalid cell: {}", part);
                std::process::exit(1);
            }
        }
    }
    Board::from_cells(&cells).unwrap_or_else(|e| {
        eprintln!("Invalid board: {}", e);
        std::process::exit(1);
    })
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 || args[1] == "--help" || args[1] == "-h" {
        eprintln!("{}", USAGE);
        std::process::exit(if args.len() == 2 { 0 } else { 1 });
    }
    let board = parse_board(&args[1]);

    let ctx = env_config::load_context(None).unwrap_or_else(|e| {
        eprintln!("Failed to load scoring config: {}", e);
        std::process::exit(1);
    });

    println!("{}", board);
    println!();

    let moves = evaluate_all(&ctx, board).unwrap_or_else(|e| {
        eprintln!("Evaluation failed: {}", e);
        std::process::exit(1);
    });
    println!("{:>4}  {:>10}  {:>10}  {:>10}  {:>10}", "cell", "three", "four", "five", "total");
    for m in &moves {
        let s = m.score;
        println!(
            "{:>4}  {:>10.1}  {:>10.1}  {:>10.1}  {:>10.1}",
            m.cell, s.three_line, s.four_line, s.five_line, s.total
        );
    }
    println!();

    match suggest_moves(&ctx, board) {
        Ok(s) => {
            println!("Best:        {} ({:.1})", s.best.cell, s.best.score.total);
            match s.second_best {
                Some(m) => println!("Second best: {} ({:.1})", m.cell, m.score.total),
                None => println!("Second best: -"),
            }
        }
        Err(e) => println!("No suggestion: {}", e),
    }
}
