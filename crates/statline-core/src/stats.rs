// Stat functions: batting average, on-base percentage, slugging percentage.

use crate::config::Eligibility;
use crate::join::MergedRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatError {
    #[error("player {player_id}: {field} value {value:?} is not a valid {expected}")]
    Parse {
        player_id: String,
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Strategy trait
// ---------------------------------------------------------------------------

/// A rate stat computed from one merged record.
///
/// Implementations return 0.0 for players below the eligibility threshold,
/// so they sort to the bottom instead of dropping out of the pool.
pub trait StatFunction {
    /// Machine name, as used in config files.
    fn name(&self) -> &'static str;

    /// Human-readable name for report titles.
    fn label(&self) -> &'static str;

    fn compute(&self, eligibility: &Eligibility, record: &MergedRecord) -> Result<f64, StatError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BattingAverage;

#[derive(Debug, Clone, Copy, Default)]
pub struct OnBasePercentage;

#[derive(Debug, Clone, Copy, Default)]
pub struct SluggingPercentage;

impl StatFunction for BattingAverage {
    fn name(&self) -> &'static str {
        "batting_average"
    }

    fn label(&self) -> &'static str {
        "batting average"
    }

    /// H / AB
    fn compute(&self, eligibility: &Eligibility, record: &MergedRecord) -> Result<f64, StatError> {
        let Some(ab) = eligible_at_bats(eligibility, record)? else {
            return Ok(0.0);
        };
        let h = count(record, "hits", &record.batting().hits)?;
        Ok(h / ab)
    }
}

impl StatFunction for OnBasePercentage {
    fn name(&self) -> &'static str {
        "on_base_percentage"
    }

    fn label(&self) -> &'static str {
        "on-base percentage"
    }

    /// (H + BB) / AB. Hit-by-pitch and sacrifice flies are not counted.
    fn compute(&self, eligibility: &Eligibility, record: &MergedRecord) -> Result<f64, StatError> {
        let Some(ab) = eligible_at_bats(eligibility, record)? else {
            return Ok(0.0);
        };
        let line = record.batting();
        let h = count(record, "hits", &line.hits)?;
        let bb = count(record, "walks", &line.walks)?;
        Ok((h + bb) / ab)
    }
}

impl StatFunction for SluggingPercentage {
    fn name(&self) -> &'static str {
        "slugging_percentage"
    }

    fn label(&self) -> &'static str {
        "slugging percentage"
    }

    /// Total bases / AB, where singles = H - 2B - 3B - HR.
    fn compute(&self, eligibility: &Eligibility, record: &MergedRecord) -> Result<f64, StatError> {
        let Some(ab) = eligible_at_bats(eligibility, record)? else {
            return Ok(0.0);
        };
        let line = record.batting();
        let h = count(record, "hits", &line.hits)?;
        let doubles = count(record, "doubles", &line.doubles)?;
        let triples = count(record, "triples", &line.triples)?;
        let hr = count(record, "home_runs", &line.home_runs)?;
        let singles = h - doubles - triples - hr;
        let total_bases = singles + 2.0 * doubles + 3.0 * triples + 4.0 * hr;
        Ok(total_bases / ab)
    }
}

// ---------------------------------------------------------------------------
// Config-selectable stat
// ---------------------------------------------------------------------------

/// The stats a config file can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    BattingAverage,
    #[serde(alias = "onbase_percentage")]
    OnBasePercentage,
    SluggingPercentage,
}

impl Stat {
    pub const ALL: [Stat; 3] = [
        Stat::BattingAverage,
        Stat::OnBasePercentage,
        Stat::SluggingPercentage,
    ];

    pub fn function(self) -> &'static dyn StatFunction {
        match self {
            Stat::BattingAverage => &BattingAverage,
            Stat::OnBasePercentage => &OnBasePercentage,
            Stat::SluggingPercentage => &SluggingPercentage,
        }
    }
}

impl StatFunction for Stat {
    fn name(&self) -> &'static str {
        self.function().name()
    }

    fn label(&self) -> &'static str {
        self.function().label()
    }

    fn compute(&self, eligibility: &Eligibility, record: &MergedRecord) -> Result<f64, StatError> {
        self.function().compute(eligibility, record)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// At-bats as f64 when the player meets the threshold, `None` otherwise.
///
/// At-bats must parse as an integer; the other counts may be fractional.
fn eligible_at_bats(eligibility: &Eligibility, record: &MergedRecord) -> Result<Option<f64>, StatError> {
    let raw = &record.batting().at_bats;
    let ab: i64 = raw
        .trim()
        .parse()
        .map_err(|_| parse_error(record, "at_bats", raw, "integer"))?;
    if ab >= i64::from(eligibility.min_at_bats) {
        Ok(Some(ab as f64))
    } else {
        Ok(None)
    }
}

fn count(record: &MergedRecord, field: &'static str, raw: &str) -> Result<f64, StatError> {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(parse_error(record, field, raw, "number")),
    }
}

fn parse_error(record: &MergedRecord, field: &'static str, raw: &str, expected: &'static str) -> StatError {
    StatError::Parse {
        player_id: record.player_id().to_string(),
        field,
        value: raw.to_string(),
        expected,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
