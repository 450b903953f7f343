// Query surface: load, join and rank in one call.
//
// Each `top_*` function reloads both input files; nothing is cached between
// calls. Callers that already hold records use `DataSet` directly.

use crate::config::{Config, Eligibility, FieldSchema};
use crate::join::{join_career, join_season};
use crate::loader::{load_records, LoadError, RawRecord};
use crate::rank::{rank_top, RankedResult};
use crate::records::{bio_records, season_records, BioRecord, RecordError, RecordOrigin, SeasonRecord};
use crate::stats::{BattingAverage, OnBasePercentage, SluggingPercentage, StatError, StatFunction};
use tracing::info;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("failed to load {origin} records: {source}")]
    Load {
        origin: RecordOrigin,
        source: LoadError,
    },

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Stat(#[from] StatError),
}

// ---------------------------------------------------------------------------
// DataSet
// ---------------------------------------------------------------------------

/// Both record sets, translated and ready to join.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    pub bios: Vec<BioRecord>,
    pub seasons: Vec<SeasonRecord>,
}

impl DataSet {
    /// Translate already-parsed rows from any loader.
    pub fn from_raw(
        master: Vec<RawRecord>,
        batting: Vec<RawRecord>,
        schema: &FieldSchema,
    ) -> Result<Self, RecordError> {
        Ok(Self {
            bios: bio_records(master, schema)?,
            seasons: season_records(batting, schema)?,
        })
    }

    /// Load and translate the master and batting files named by `config`.
    pub fn load(config: &Config) -> Result<Self, QueryError> {
        let data = &config.data;
        let master = load_records(&data.master, data.separator, data.quote).map_err(|e| {
            QueryError::Load {
                origin: RecordOrigin::Master,
                source: e,
            }
        })?;
        let batting = load_records(&data.batting, data.separator, data.quote).map_err(|e| {
            QueryError::Load {
                origin: RecordOrigin::Batting,
                source: e,
            }
        })?;
        let set = Self::from_raw(master, batting, &config.fields)?;
        info!(
            "Loaded {} master records, {} batting records",
            set.bios.len(),
            set.seasons.len()
        );
        Ok(set)
    }

    /// Top `num_players` for one season.
    pub fn top_by_year<S>(
        &self,
        eligibility: &Eligibility,
        stat: &S,
        num_players: usize,
        year: i32,
    ) -> Result<RankedResult, StatError>
    where
        S: StatFunction + ?Sized,
    {
        let candidates = join_season(&self.bios, &self.seasons, year);
        rank_top(candidates, stat, eligibility, num_players)
    }

    /// Top `num_players` by each player's last-loaded batting row.
    pub fn top_by_career<S>(
        &self,
        eligibility: &Eligibility,
        stat: &S,
        num_players: usize,
    ) -> Result<RankedResult, StatError>
    where
        S: StatFunction + ?Sized,
    {
        let candidates = join_career(&self.bios, &self.seasons);
        rank_top(candidates, stat, eligibility, num_players)
    }
}

// ---------------------------------------------------------------------------
// Config-driven queries
// ---------------------------------------------------------------------------

pub fn top_stats_by_year<S>(
    config: &Config,
    stat: &S,
    num_players: usize,
    year: i32,
) -> Result<RankedResult, QueryError>
where
    S: StatFunction + ?Sized,
{
    let data = DataSet::load(config)?;
    let result = data.top_by_year(&config.eligibility, stat, num_players, year)?;
    info!("Ranked {} for {}: {} players", stat.name(), year, result.len());
    Ok(result)
}

pub fn top_stats_by_career<S>(
    config: &Config,
    stat: &S,
    num_players: usize,
) -> Result<RankedResult, QueryError>
where
    S: StatFunction + ?Sized,
{
    let data = DataSet::load(config)?;
    let result = data.top_by_career(&config.eligibility, stat, num_players)?;
    info!("Ranked career {}: {} players", stat.name(), result.len());
    Ok(result)
}

pub fn top_career_batting_average(config: &Config, num_players: usize) -> Result<RankedResult, QueryError> {
    top_stats_by_career(config, &BattingAverage, num_players)
}

pub fn top_career_onbase_percentage(config: &Config, num_players: usize) -> Result<RankedResult, QueryError> {
    top_stats_by_career(config, &OnBasePercentage, num_players)
}

pub fn top_career_slugging_percentage(config: &Config, num_players: usize) -> Result<RankedResult, QueryError> {
    top_stats_by_career(config, &SluggingPercentage, num_players)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_records_from_reader;
    use crate::stats::Stat;

    const MASTER: &str = "\
playerID,nameFirst,nameLast
p1,Ann,One
p2,Bob,Two
p3,Cal,Three";

    const BATTING: &str = "\
playerID,yearID,AB,H,2B,3B,HR,BB
p1,2015,600,210,40,2,30,80
p1,2016,600,150,20,1,10,40
p2,2016,550,176,30,5,25,60
p3,2016,300,120,10,0,5,20
ghost,2016,650,260,50,5,40,90";

    fn data_set() -> DataSet {
        let master = load_records_from_reader(MASTER.as_bytes(), ',', '"', "master").unwrap();
        let batting = load_records_from_reader(BATTING.as_bytes(), ',', '"', "batting").unwrap();
        DataSet::from_raw(master, batting, &FieldSchema::default()).unwrap()
    }

    fn ids(result: &RankedResult) -> Vec<&str> {
        result.records().map(|r| r.player_id()).collect()
    }

    #[test]
    fn season_query_ranks_matched_players_for_year() {
        let result = data_set()
            .top_by_year(&Eligibility::default(), &Stat::BattingAverage, 5, 2016)
            .unwrap();
        // ghost has no master row; p3 is below 500 AB and ranks last.
        assert_eq!(ids(&result), vec!["p2", "p1", "p3"]);
        assert!(result.iter().all(|e| e.record.season().year() == "2016"));
    }

    #[test]
    fn career_query_uses_last_row() {
        let result = data_set()
            .top_by_career(&Eligibility::default(), &Stat::BattingAverage, 5)
            .unwrap();
        assert_eq!(ids(&result), vec!["p2", "p1", "p3"]);
        assert_eq!(result.entries[1].record.season().year(), "2016");
    }

    #[test]
    fn year_without_rows_is_empty() {
        let result = data_set()
            .top_by_year(&Eligibility::default(), &Stat::BattingAverage, 5, 1999)
            .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn from_raw_reports_missing_column() {
        let master = load_records_from_reader("playerID,nameFirst\np1,Ann".as_bytes(), ',', '"', "m").unwrap();
        let err = DataSet::from_raw(master, Vec::new(), &FieldSchema::default()).unwrap_err();
        assert!(matches!(err, RecordError::MissingField { origin: RecordOrigin::Master, .. }));
    }
}
