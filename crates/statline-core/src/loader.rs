// Delimited-text record loading.
//
// Reads a header row plus data rows into ordered header/value pairs. The
// loader knows nothing about baseball; typed translation lives in `records`.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One data row: `(header, cell)` pairs in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    columns: Vec<(String, String)>,
}

impl RawRecord {
    /// Value of the column named `header`, if present.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path}: missing header row")]
    MissingHeader { path: String },

    #[error("{path}: duplicate header `{header}`")]
    DuplicateHeader { path: String, header: String },

    #[error("{path}: {name} {value:?} is not a single ASCII character")]
    InvalidDialect {
        path: String,
        name: &'static str,
        value: char,
    },
}

// ---------------------------------------------------------------------------
// Reader-based loader (enables testing without temp files)
// ---------------------------------------------------------------------------

/// Read all rows from `rdr`. `origin` names the source in error messages.
pub fn load_records_from_reader<R: Read>(
    rdr: R,
    separator: char,
    quote: char,
    origin: &str,
) -> Result<Vec<RawRecord>, LoadError> {
    let delimiter = ascii_byte(separator, "separator", origin)?;
    let quote = ascii_byte(quote, "quote", origin)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .quote(quote)
        .double_quote(true)
        .flexible(false)
        .from_reader(rdr);

    let csv_err = |source: csv::Error| LoadError::Csv {
        path: origin.to_string(),
        source,
    };

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::MissingHeader {
            path: origin.to_string(),
        });
    }
    let mut seen = HashSet::new();
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(LoadError::DuplicateHeader {
                path: origin.to_string(),
                header: header.clone(),
            });
        }
    }

    let mut records: Vec<RawRecord> = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_err)?;
        records.push(
            headers
                .iter()
                .zip(row.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect(),
        );
    }

    debug!("{}: loaded {} rows, {} columns", origin, records.len(), headers.len());
    Ok(records)
}

// ---------------------------------------------------------------------------
// Public path-based loader
// ---------------------------------------------------------------------------

/// Load every data row of the delimited file at `path`, using the first row
/// as headers and keeping file order.
pub fn load_records(path: &Path, separator: char, quote: char) -> Result<Vec<RawRecord>, LoadError> {
    let display = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: display.clone(),
        source: e,
    })?;
    load_records_from_reader(file, separator, quote, &display)
}

fn ascii_byte(c: char, name: &'static str, origin: &str) -> Result<u8, LoadError> {
    if c.is_ascii() {
        Ok(c as u8)
    } else {
        Err(LoadError::InvalidDialect {
            path: origin.to_string(),
            name,
            value: c,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
