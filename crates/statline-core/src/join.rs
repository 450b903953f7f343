// Join engine: pairs biographical records with season or career batting rows.
//
// Neither join fails on a missing cross-reference; unmatched players are
// simply left out of the candidate set.

use crate::records::{BattingLine, BioRecord, SeasonRecord};
use std::collections::HashMap;
use tracing::debug;

// ---------------------------------------------------------------------------
// Merged record
// ---------------------------------------------------------------------------

/// One player's biographical record joined with one batting row.
///
/// The column view is the union of both rows; on a shared header the batting
/// row's value wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedRecord {
    bio: BioRecord,
    season: SeasonRecord,
}

impl MergedRecord {
    pub fn new(bio: BioRecord, season: SeasonRecord) -> Self {
        Self { bio, season }
    }

    pub fn player_id(&self) -> &str {
        self.season.player_id()
    }

    pub fn bio(&self) -> &BioRecord {
        &self.bio
    }

    pub fn season(&self) -> &SeasonRecord {
        &self.season
    }

    pub fn batting(&self) -> &BattingLine {
        self.season.batting()
    }

    /// Value of `column` in the merged view.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.season
            .columns()
            .get(column)
            .or_else(|| self.bio.columns().get(column))
    }

    /// All merged columns: biographical headers first, then batting-only
    /// headers, each in file order.
    pub fn columns(&self) -> Vec<(&str, &str)> {
        let season = self.season.columns();
        let mut merged: Vec<(&str, &str)> = self
            .bio
            .columns()
            .iter()
            .map(|(h, v)| (h, season.get(h).unwrap_or(v)))
            .collect();
        let bio = self.bio.columns();
        merged.extend(season.iter().filter(|(h, _)| bio.get(h).is_none()));
        merged
    }
}

// ---------------------------------------------------------------------------
// Joins
// ---------------------------------------------------------------------------

/// Season join: every batting row for `year`, paired with the first
/// biographical record carrying the same player id.
///
/// The year matches on the exact string `year.to_string()`; "2016.0" or
/// " 2016" do not match 2016. Output follows batting-row order.
pub fn join_season(bios: &[BioRecord], seasons: &[SeasonRecord], year: i32) -> Vec<MergedRecord> {
    let year = year.to_string();

    let mut by_id: HashMap<&str, &BioRecord> = HashMap::with_capacity(bios.len());
    for bio in bios {
        by_id.entry(bio.player_id()).or_insert(bio);
    }

    let mut unmatched = 0usize;
    let joined: Vec<MergedRecord> = seasons
        .iter()
        .filter(|s| s.year() == year)
        .filter_map(|s| match by_id.get(s.player_id()) {
            Some(bio) => Some(MergedRecord::new((*bio).clone(), s.clone())),
            None => {
                unmatched += 1;
                None
            }
        })
        .collect();

    debug!(
        "season join {}: {} candidates, {} batting rows without a master record",
        year,
        joined.len(),
        unmatched
    );
    joined
}

/// Career join: each biographical record paired with the LAST batting row
/// (in input order) carrying its player id.
///
/// This is a single terminal row, not a sum over seasons, and "last" means
/// last loaded: unsorted input yields whichever row came last. Players with
/// no batting rows are skipped. Output follows biographical-record order.
pub fn join_career(bios: &[BioRecord], seasons: &[SeasonRecord]) -> Vec<MergedRecord> {
    let mut last_by_id: HashMap<&str, &SeasonRecord> = HashMap::with_capacity(seasons.len());
    for season in seasons {
        last_by_id.insert(season.player_id(), season);
    }

    let joined: Vec<MergedRecord> = bios
        .iter()
        .filter_map(|bio| {
            last_by_id
                .get(bio.player_id())
                .map(|s| MergedRecord::new(bio.clone(), (*s).clone()))
        })
        .collect();

    debug!(
        "career join: {} candidates from {} master records",
        joined.len(),
        bios.len()
    );
    joined
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
