// Typed biographical and season records.
//
// Raw rows are translated once, through the configured `FieldSchema`, into
// records with named fields. Counting stats stay as the raw strings from the
// file; the stat functions parse them on demand.

use crate::config::FieldSchema;
use crate::loader::RawRecord;
use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Which input file a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordOrigin {
    Master,
    Batting,
}

impl fmt::Display for RecordOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordOrigin::Master => write!(f, "master"),
            RecordOrigin::Batting => write!(f, "batting"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    /// `row` is the 1-based data row (the header row is not counted).
    #[error("{origin} row {row}: missing required field `{field}`")]
    MissingField {
        field: String,
        origin: RecordOrigin,
        row: usize,
    },
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Biographical record, one per player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioRecord {
    player_id: String,
    first_name: String,
    last_name: String,
    columns: RawRecord,
}

impl BioRecord {
    pub fn from_raw(raw: RawRecord, schema: &FieldSchema, row: usize) -> Result<Self, RecordError> {
        let field = |name: &str| require(&raw, name, RecordOrigin::Master, row);
        let player_id = field(&schema.player_id)?;
        let first_name = field(&schema.first_name)?;
        let last_name = field(&schema.last_name)?;
        Ok(Self {
            player_id,
            first_name,
            last_name,
            columns: raw,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last", or whichever part is present.
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (true, _) => self.last_name.clone(),
            (false, true) => self.first_name.clone(),
        }
    }

    /// Every column of the source row, in header order.
    pub fn columns(&self) -> &RawRecord {
        &self.columns
    }
}

/// The counting stats of one batting row, exactly as they appear in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattingLine {
    pub at_bats: String,
    pub hits: String,
    pub doubles: String,
    pub triples: String,
    pub home_runs: String,
    pub walks: String,
}

/// Batting record, one per player per season (or stint).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonRecord {
    player_id: String,
    year: String,
    batting: BattingLine,
    columns: RawRecord,
}

impl SeasonRecord {
    pub fn from_raw(raw: RawRecord, schema: &FieldSchema, row: usize) -> Result<Self, RecordError> {
        let field = |name: &str| require(&raw, name, RecordOrigin::Batting, row);
        let player_id = field(&schema.player_id)?;
        let year = field(&schema.year)?;
        let batting = BattingLine {
            at_bats: field(&schema.at_bats)?,
            hits: field(&schema.hits)?,
            doubles: field(&schema.doubles)?,
            triples: field(&schema.triples)?,
            home_runs: field(&schema.home_runs)?,
            walks: field(&schema.walks)?,
        };
        Ok(Self {
            player_id,
            year,
            batting,
            columns: raw,
        })
    }

    pub fn player_id(&self) -> &str {
        &self.player_id
    }

    /// The year cell as written in the file; compared as a string.
    pub fn year(&self) -> &str {
        &self.year
    }

    pub fn batting(&self) -> &BattingLine {
        &self.batting
    }

    pub fn columns(&self) -> &RawRecord {
        &self.columns
    }
}

// ---------------------------------------------------------------------------
// Batch translation
// ---------------------------------------------------------------------------

/// Translate master rows. Aborts on the first row missing a required field.
pub fn bio_records(raw: Vec<RawRecord>, schema: &FieldSchema) -> Result<Vec<BioRecord>, RecordError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| BioRecord::from_raw(r, schema, i + 1))
        .collect()
}

/// Translate batting rows. Aborts on the first row missing a required field.
pub fn season_records(
    raw: Vec<RawRecord>,
    schema: &FieldSchema,
) -> Result<Vec<SeasonRecord>, RecordError> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| SeasonRecord::from_raw(r, schema, i + 1))
        .collect()
}

fn require(raw: &RawRecord, name: &str, origin: RecordOrigin, row: usize) -> Result<String, RecordError> {
    raw.get(name)
        .map(str::to_string)
        .ok_or_else(|| RecordError::MissingField {
            field: name.to_string(),
            origin,
            row,
        })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
