//! Scoring configuration.
//!
//! All tunable constants of the move scoring engine live in one frozen
//! [`ScoringConfig`]. It is validated once when an
//! [`OracleContext`](crate::types::OracleContext) is built and then passed by
//! reference into every evaluation.

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_CELLS, MAX_CELLS, PHASE_THRESHOLD};
use crate::error::OracleError;

/// Reward for a reachable combination: `base + power_base^(power_exponent − distance)`,
/// where distance is the occupied-cell count after the move plus the cells
/// still missing from the combination.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LineScore {
    pub base: f64,
    pub power_base: f64,
    pub power_exponent: i32,
}

impl LineScore {
    #[inline]
    pub fn reward(&self, distance: usize) -> f64 {
        self.base + self.power_base.powi(self.power_exponent - distance as i32)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineScores {
    pub three_line: LineScore,
    pub four_line: LineScore,
    pub five_line: LineScore,
}

impl Default for LineScores {
    fn default() -> Self {
        Self {
            three_line: LineScore {
                base: 0.0,
                power_base: 3.0,
                power_exponent: 16,
            },
            four_line: LineScore {
                base: 25.0,
                power_base: 3.0,
                power_exponent: 16,
            },
            five_line: LineScore {
                base: 100.0,
                power_base: 3.0,
                power_exponent: 16,
            },
        }
    }
}

impl LineScores {
    /// Score parameters for a combination arity (3, 4 or 5).
    pub fn for_arity(&self, arity: usize) -> Option<&LineScore> {
        match arity {
            3 => Some(&self.three_line),
            4 => Some(&self.four_line),
            5 => Some(&self.five_line),
            _ => None,
        }
    }
}

/// Flat line bonuses of the combinatorial (early) regime.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImmediateBonuses {
    pub complete_line: f64,
    pub four_cell_line: f64,
    pub three_cell_line: f64,
}

impl Default for ImmediateBonuses {
    fn default() -> Self {
        Self {
            complete_line: 50.0,
            four_cell_line: 25.0,
            three_cell_line: 10.0,
        }
    }
}

/// Direct line rule used once more than `threshold` cells are occupied.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateScoring {
    pub complete_line: f64,
    pub four_cell_line: f64,
    pub three_cell_line: f64,
    pub threshold: usize,
}

impl Default for LateScoring {
    fn default() -> Self {
        Self {
            complete_line: 100.0,
            four_cell_line: 25.0,
            three_cell_line: 10.0,
            threshold: PHASE_THRESHOLD,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveWeights {
    pub three_line: f64,
    pub four_line: f64,
    pub five_line: f64,
}

impl Default for MoveWeights {
    fn default() -> Self {
        Self {
            three_line: 1.0,
            four_line: 1.0,
            five_line: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub line_scores: LineScores,
    pub immediate_bonuses: ImmediateBonuses,
    pub late_scoring: LateScoring,
    pub weights: MoveWeights,
    /// Cell budget; also the combination-table filter.
    pub max_cells: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            line_scores: LineScores::default(),
            immediate_bonuses: ImmediateBonuses::default(),
            late_scoring: LateScoring::default(),
            weights: MoveWeights::default(),
            max_cells: MAX_CELLS,
        }
    }
}

fn non_negative(name: &str, value: f64) -> Result<(), OracleError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(OracleError::InvalidConfig(format!(
            "{name} must be finite and non-negative, got {value}"
        )))
    }
}

impl ScoringConfig {
    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, OracleError> {
        let config: ScoringConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), OracleError> {
        if self.max_cells == 0 || self.max_cells > BOARD_CELLS {
            return Err(OracleError::InvalidConfig(format!(
                "max_cells must be in 1..={BOARD_CELLS}, got {}",
                self.max_cells
            )));
        }
        if self.late_scoring.threshold >= self.max_cells {
            return Err(OracleError::InvalidConfig(format!(
                "late_scoring.threshold ({}) must be below max_cells ({})",
                self.late_scoring.threshold, self.max_cells
            )));
        }

        let ls = &self.line_scores;
        for (name, score) in [
            ("three_line", &ls.three_line),
            ("four_line", &ls.four_line),
            ("five_line", &ls.five_line),
        ] {
            non_negative(&format!("line_scores.{name}.base"), score.base)?;
            non_negative(&format!("line_scores.{name}.power_base"), score.power_base)?;
        }

        let ib = &self.immediate_bonuses;
        non_negative("immediate_bonuses.complete_line", ib.complete_line)?;
        non_negative("immediate_bonuses.four_cell_line", ib.four_cell_line)?;
        non_negative("immediate_bonuses.three_cell_line", ib.three_cell_line)?;

        let late = &self.late_scoring;
        non_negative("late_scoring.complete_line", late.complete_line)?;
        non_negative("late_scoring.four_cell_line", late.four_cell_line)?;
        non_negative("late_scoring.three_cell_line", late.three_cell_line)?;

        let w = &self.weights;
        non_negative("weights.three_line", w.three_line)?;
        non_negative("weights.four_line", w.four_line)?;
        non_negative("weights.five_line", w.five_line)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        ScoringConfig::default().validate().unwrap();
    }

    #[test]
    fn test_reward_grows_as_distance_shrinks() {
        let s = ScoringConfig::default().line_scores.four_line;
        assert_eq!(s.reward(16), 26.0);
        assert_eq!(s.reward(15), 28.0);
        assert_eq!(s.reward(14), 34.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let cfg = ScoringConfig::from_json_str(r#"{"weights": {"four_line": 2.0}}"#).unwrap();
        assert_eq!(cfg.weights.four_line, 2.0);
        assert_eq!(cfg.weights.three_line, 1.0);
        assert_eq!(cfg.max_cells, MAX_CELLS);
        assert_eq!(cfg.late_scoring.threshold, PHASE_THRESHOLD);
    }

    #[test]
    fn test_rejects_negative_weight() {
        let mut cfg = ScoringConfig::default();
        cfg.weights.five_line = -1.0;
        assert!(matches!(cfg.validate(), Err(OracleError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_threshold_at_budget() {
        let mut cfg = ScoringConfig::default();
        cfg.late_scoring.threshold = cfg.max_cells;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            ScoringConfig::from_json_str("{not json"),
            Err(OracleError::Config(_))
        ));
    }
}
