// Ranking engine: top-N merged records by a stat function.

use crate::config::Eligibility;
use crate::join::MergedRecord;
use crate::stats::{StatError, StatFunction};

/// A merged record with the stat value it was ranked by.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub record: MergedRecord,
    pub value: f64,
}

/// Leaderboard produced by one ranking pass, highest value first.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedResult {
    /// `StatFunction::name` of the stat that produced the ordering.
    pub stat: &'static str,
    pub entries: Vec<RankedEntry>,
}

impl RankedResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RankedEntry> {
        self.entries.iter()
    }

    pub fn records(&self) -> impl Iterator<Item = &MergedRecord> {
        self.entries.iter().map(|e| &e.record)
    }
}

/// Score every candidate, sort descending and keep the first `num_players`.
///
/// The sort is stable: equal values (including every ineligible 0.0) keep
/// their candidate order. The first unparseable count aborts the ranking.
pub fn rank_top<S>(
    candidates: Vec<MergedRecord>,
    stat: &S,
    eligibility: &Eligibility,
    num_players: usize,
) -> Result<RankedResult, StatError>
where
    S: StatFunction + ?Sized,
{
    let mut entries = candidates
        .into_iter()
        .map(|record| -> Result<RankedEntry, StatError> {
            let value = stat.compute(eligibility, &record)?;
            Ok(RankedEntry { record, value })
        })
        .collect::<Result<Vec<_>, _>>()?;

    entries.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    entries.truncate(num_players);

    Ok(RankedResult {
        stat: stat.name(),
        entries,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldSchema;
    use crate::loader::RawRecord;
    use crate::records::{BioRecord, SeasonRecord};
    use crate::stats::{BattingAverage, Stat};

    const DEFAULT: Eligibility = Eligibility { min_at_bats: 500 };

    fn candidate(id: &str, ab: u32, h: u32) -> MergedRecord {
        let schema = FieldSchema::default();
        let bio: RawRecord = [("playerID", id), ("nameFirst", id), ("nameLast", "X")]
            .into_iter()
            .collect();
        let (ab, h) = (ab.to_string(), h.to_string());
        let season: RawRecord = [
            ("playerID", id),
            ("yearID", "2016"),
            ("AB", ab.as_str()),
            ("H", h.as_str()),
            ("2B", "0"),
            ("3B", "0"),
            ("HR", "0"),
            ("BB", "0"),
        ]
        .into_iter()
        .collect();
        MergedRecord::new(
            BioRecord::from_raw(bio, &schema, 1).unwrap(),
            SeasonRecord::from_raw(season, &schema, 1).unwrap(),
        )
    }

    fn ids(result: &RankedResult) -> Vec<&str> {
        result.records().map(|r| r.player_id()).collect()
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let candidates = vec![
            candidate("a", 600, 150),
            candidate("b", 600, 210),
            candidate("c", 600, 180),
            candidate("d", 600, 90),
        ];
        let result = rank_top(candidates, &BattingAverage, &DEFAULT, 2).unwrap();
        assert_eq!(ids(&result), vec!["b", "c"]);
        assert_eq!(result.stat, "batting_average");
        assert!((result.entries[0].value - 0.35).abs() < 1e-9);
    }

    #[test]
    fn fewer_candidates_than_requested_returns_all() {
        let candidates = vec![candidate("a", 600, 150), candidate("b", 600, 210)];
        let result = rank_top(candidates, &BattingAverage, &DEFAULT, 5).unwrap();
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn empty_candidates_is_empty_result() {
        let result = rank_top(Vec::new(), &BattingAverage, &DEFAULT, 5).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn zero_players_is_empty_result() {
        let result = rank_top(vec![candidate("a", 600, 150)], &BattingAverage, &DEFAULT, 0).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn ties_keep_input_order() {
        let candidates = vec![
            candidate("low1", 100, 90),
            candidate("top", 600, 200),
            candidate("tie1", 600, 180),
            candidate("low2", 200, 150),
            candidate("tie2", 600, 180),
            candidate("low3", 499, 400),
        ];
        let result = rank_top(candidates, &BattingAverage, &DEFAULT, 10).unwrap();
        assert_eq!(
            ids(&result),
            vec!["top", "tie1", "tie2", "low1", "low2", "low3"]
        );
        assert!(result.entries[3..].iter().all(|e| e.value == 0.0));
    }

    #[test]
    fn ineligible_players_rank_last_but_stay_in_pool() {
        let candidates = vec![candidate("part_time", 120, 60), candidate("regular", 550, 140)];
        let result = rank_top(candidates, &Stat::BattingAverage, &DEFAULT, 2).unwrap();
        assert_eq!(ids(&result), vec!["regular", "part_time"]);
    }

    #[test]
    fn dyn_stat_function_accepted() {
        let stat: &dyn StatFunction = Stat::SluggingPercentage.function();
        let result = rank_top(vec![candidate("a", 600, 150)], stat, &DEFAULT, 1).unwrap();
        assert_eq!(result.stat, "slugging_percentage");
    }

    #[test]
    fn ranking_is_idempotent() {
        let make = || {
            vec![
                candidate("a", 600, 150),
                candidate("b", 600, 150),
                candidate("c", 300, 150),
                candidate("d", 600, 180),
            ]
        };
        let first = rank_top(make(), &BattingAverage, &DEFAULT, 3).unwrap();
        let second = rank_top(make(), &BattingAverage, &DEFAULT, 3).unwrap();
        assert_eq!(first, second);
    }
}
