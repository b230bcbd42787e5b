//! Aggregate statistics over finished games.
//!
//! Every map is keyed by a decimal string and holds plain numbers, so the
//! record serializes to JSON with no crate types inside.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::constants::{BOARD_CELLS, MAX_COMPLETED_LINES};
use crate::types::Mover;

use super::engine::GameResult;

/// Mean score components over all oracle moves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ScorePatterns {
    pub mean_three_line: f64,
    pub mean_four_line: f64,
    pub mean_five_line: f64,
    pub mean_total: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct PatternStatistics {
    pub total_matches: usize,
    /// Matches per 100 oracle moves.
    pub match_rate: f64,
    pub most_common_pattern: Option<String>,
    pub counts: BTreeMap<String, usize>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SimulationStatistics {
    /// Completed games; failed and cancelled games are counted separately.
    pub total_games: usize,
    pub failed_games: usize,
    pub cancelled_games: usize,
    pub mean_lines: f64,
    pub std_lines: f64,
    pub min_lines: usize,
    pub max_lines: usize,
    /// Games per completed-line count, keys "0".."13".
    pub line_distribution: BTreeMap<String, usize>,
    /// Moves per cell (both seats) divided by completed games, keys "0".."24".
    pub move_frequencies: BTreeMap<String, f64>,
    pub score_patterns: ScorePatterns,
    pub patterns: PatternStatistics,
}

pub fn aggregate_statistics(
    results: &[GameResult],
    failed_games: usize,
    cancelled_games: usize,
) -> SimulationStatistics {
    let n = results.len();

    let mut line_distribution: BTreeMap<String, usize> =
        (0..=MAX_COMPLETED_LINES).map(|k| (k.to_string(), 0)).collect();
    let mut cell_counts = [0usize; BOARD_CELLS];
    let mut sum = ScorePatterns::default();
    let mut oracle_moves = 0usize;

    for r in results {
        *line_distribution
            .entry(r.completed_lines.to_string())
            .or_insert(0) += 1;
        for m in &r.moves {
            cell_counts[m.cell as usize] += 1;
        }
        oracle_moves += r.moves.iter().filter(|m| m.mover == Mover::Oracle).count();
        for s in &r.oracle_scores {
            sum.mean_three_line += s.three_line;
            sum.mean_four_line += s.four_line;
            sum.mean_five_line += s.five_line;
            sum.mean_total += s.total;
        }
    }

    let (mean_lines, std_lines, min_lines, max_lines) = if n == 0 {
        (0.0, 0.0, 0, 0)
    } else {
        let mean = results.iter().map(|r| r.completed_lines as f64).sum::<f64>() / n as f64;
        let variance = results
            .iter()
            .map(|r| (r.completed_lines as f64 - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let min = results.iter().map(|r| r.completed_lines).min().unwrap_or(0);
        let max = results.iter().map(|r| r.completed_lines).max().unwrap_or(0);
        (mean, variance.sqrt(), min, max)
    };

    let move_frequencies = cell_counts
        .iter()
        .enumerate()
        .map(|(cell, &c)| {
            let freq = if n == 0 { 0.0 } else { c as f64 / n as f64 };
            (cell.to_string(), freq)
        })
        .collect();

    let scored: usize = results.iter().map(|r| r.oracle_scores.len()).sum();
    let score_patterns = if scored == 0 {
        ScorePatterns::default()
    } else {
        let d = scored as f64;
        ScorePatterns {
            mean_three_line: sum.mean_three_line / d,
            mean_four_line: sum.mean_four_line / d,
            mean_five_line: sum.mean_five_line / d,
            mean_total: sum.mean_total / d,
        }
    };

    SimulationStatistics {
        total_games: n,
        failed_games,
        cancelled_games,
        mean_lines,
        std_lines,
        min_lines,
        max_lines,
        line_distribution,
        move_frequencies,
        score_patterns,
        patterns: pattern_statistics(results, oracle_moves),
    }
}

fn pattern_statistics(results: &[GameResult], oracle_moves: usize) -> PatternStatistics {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for m in results.iter().flat_map(|r| &r.patterns) {
        *counts.entry(m.name.clone()).or_insert(0) += 1;
    }
    let total_matches = counts.values().sum();
    let match_rate = if oracle_moves == 0 {
        0.0
    } else {
        100.0 * total_matches as f64 / oracle_moves as f64
    };
    // Highest count; ties go to the name that sorts first.
    let most_common_pattern = counts
        .iter()
        .fold(None::<(&String, usize)>, |best, (name, &c)| match best {
            Some((_, bc)) if bc >= c => best,
            _ => Some((name, c)),
        })
        .map(|(name, _)| name.clone());

    PatternStatistics {
        total_matches,
        match_rate,
        most_common_pattern,
        counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::PatternMatch;
    use crate::simulation::engine::MoveRecord;
    use crate::types::{Board, ScoreBreakdown};

    fn game(lines: usize, cells: &[u8], scores: &[f64], patterns: &[&str]) -> GameResult {
        GameResult {
            game_index: 0,
            completed_lines: lines,
            final_board: Board::from_cells(cells).unwrap(),
            moves: cells
                .iter()
                .enumerate()
                .map(|(i, &cell)| MoveRecord {
                    cell,
                    mover: if i % 2 == 0 { Mover::Oracle } else { Mover::Opponent },
                })
                .collect(),
            oracle_scores: scores
                .iter()
                .map(|&t| ScoreBreakdown {
                    three_line: t,
                    four_line: 0.0,
                    five_line: 0.0,
                    total: t,
                })
                .collect(),
            patterns: patterns
                .iter()
                .map(|p| PatternMatch {
                    name: p.to_string(),
                    line: None,
                })
                .collect(),
        }
    }

    #[test]
    fn test_aggregate_basic() {
        let results = vec![
            game(1, &[0, 1, 2, 3], &[10.0, 20.0], &["a", "b"]),
            game(3, &[0, 5, 6, 7], &[30.0, 40.0], &["b"]),
        ];
        let s = aggregate_statistics(&results, 1, 2);
        assert_eq!(s.total_games, 2);
        assert_eq!(s.failed_games, 1);
        assert_eq!(s.cancelled_games, 2);
        assert_eq!(s.mean_lines, 2.0);
        assert_eq!(s.std_lines, 1.0);
        assert_eq!((s.min_lines, s.max_lines), (1, 3));
        assert_eq!(s.line_distribution.len(), 14);
        assert_eq!(s.line_distribution["1"], 1);
        assert_eq!(s.line_distribution["3"], 1);
        assert_eq!(s.line_distribution.values().sum::<usize>(), 2);
        assert_eq!(s.move_frequencies.len(), 25);
        assert_eq!(s.move_frequencies["0"], 1.0);
        assert_eq!(s.move_frequencies["5"], 0.5);
        assert_eq!(s.score_patterns.mean_total, 25.0);
        assert_eq!(s.patterns.total_matches, 3);
        assert_eq!(s.patterns.match_rate, 75.0);
        assert_eq!(s.patterns.most_common_pattern.as_deref(), Some("b"));
    }

    #[test]
    fn test_aggregate_empty() {
        let s = aggregate_statistics(&[], 3, 0);
        assert_eq!(s.total_games, 0);
        assert_eq!(s.failed_games, 3);
        assert_eq!(s.mean_lines, 0.0);
        assert!(s.move_frequencies.values().all(|&f| f == 0.0));
        assert_eq!(s.patterns.most_common_pattern, None);
    }

    #[test]
    fn test_statistics_serialize_with_string_keys() {
        let s = aggregate_statistics(&[game(2, &[0, 1], &[1.0], &[])], 0, 0);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["line_distribution"]["2"], 1);
        assert_eq!(v["total_games"], 1);
    }
}
