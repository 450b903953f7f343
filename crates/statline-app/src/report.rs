// Leaderboard rendering: plain-text tables and JSON.

use serde::Serialize;
use statline_core::config::FieldSchema;
use statline_core::rank::RankedResult;
use statline_core::stats::StatFunction;

/// Which pool a leaderboard was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Season(i32),
    Career,
}

/// A ranked result flattened for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaderboard {
    pub title: String,
    pub stat: &'static str,
    pub scope: Scope,
    /// Headers of the counting-stat columns carried by every row.
    pub columns: Vec<String>,
    pub rows: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardRow {
    pub rank: usize,
    pub player_id: String,
    pub name: String,
    pub year: String,
    pub value: f64,
    /// Cells for `Leaderboard::columns`, empty when the merged record lacks one.
    pub counts: Vec<String>,
}

impl Leaderboard {
    pub fn new<S>(result: &RankedResult, stat: &S, scope: Scope, fields: &FieldSchema) -> Self
    where
        S: StatFunction + ?Sized,
    {
        let title = match scope {
            Scope::Season(year) => format!("Top players by {} in {}", stat.label(), year),
            Scope::Career => format!("Top players by career {}", stat.label()),
        };
        let rows = result
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let record = &entry.record;
                LeaderboardRow {
                    rank: i + 1,
                    player_id: record.player_id().to_string(),
                    name: record.bio().full_name(),
                    year: record.season().year().to_string(),
                    value: entry.value,
                    counts: fields
                        .stat_fields
                        .iter()
                        .map(|c| record.get(c).unwrap_or_default().to_string())
                        .collect(),
                }
            })
            .collect();
        Self {
            title,
            stat: stat.name(),
            scope,
            columns: fields.stat_fields.clone(),
            rows,
        }
    }
}

/// Render as an aligned text table, rate stats to three decimals.
pub fn render_text(board: &Leaderboard) -> String {
    let mut headers = vec!["#".to_string(), "Player".into(), "Year".into()];
    headers.extend(board.columns.iter().cloned());
    headers.push(board.stat.to_uppercase());

    let body: Vec<Vec<String>> = board
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.rank.to_string(), row.name.clone(), row.year.clone()];
            cells.extend(row.counts.iter().cloned());
            cells.push(format_rate(row.value));
            cells
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for cells in &body {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = format!("{}:\n", board.title);
    if body.is_empty() {
        out.push_str("  (no players)\n");
        return out;
    }
    push_line(&mut out, &headers, &widths);
    for cells in &body {
        push_line(&mut out, cells, &widths);
    }
    out
}

/// Render one or more leaderboards as a pretty-printed JSON array.
pub fn render_json(boards: &[Leaderboard]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(boards)
}

/// ".347" style, as rate stats are conventionally printed.
pub fn format_rate(value: f64) -> String {
    let s = format!("{value:.3}");
    match s.strip_prefix("0.") {
        Some(rest) => format!(".{rest}"),
        None => s,
    }
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            // Player names left-aligned, numbers right-aligned.
            if i == 1 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    out.push_str("  ");
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use statline_core::config::Eligibility;
    use statline_core::loader::load_records_from_reader;
    use statline_core::query::DataSet;
    use statline_core::stats::{BattingAverage, SluggingPercentage};

    const MASTER: &str = "\
playerID,nameFirst,nameLast
murphda08,Daniel,Murphy
altuvjo01,Jose,Altuve";

    const BATTING: &str = "\
playerID,yearID,AB,H,2B,3B,HR,BB
murphda08,2016,531,184,47,5,25,35
altuvjo01,2016,640,216,42,5,24,60";

    fn data() -> DataSet {
        let master = load_records_from_reader(MASTER.as_bytes(), ',', '"', "m").unwrap();
        let batting = load_records_from_reader(BATTING.as_bytes(), ',', '"', "b").unwrap();
        DataSet::from_raw(master, batting, &FieldSchema::default()).unwrap()
    }

    fn season_board() -> Leaderboard {
        let result = data()
            .top_by_year(&Eligibility::default(), &BattingAverage, 5, 2016)
            .unwrap();
        Leaderboard::new(&result, &BattingAverage, Scope::Season(2016), &FieldSchema::default())
    }

    #[test]
    fn leaderboard_rows_from_result() {
        let board = season_board();
        assert_eq!(board.title, "Top players by batting average in 2016");
        assert_eq!(board.stat, "batting_average");
        assert_eq!(board.columns, vec!["AB", "H", "2B", "3B", "HR", "BB"]);
        assert_eq!(board.rows.len(), 2);
        assert_eq!(board.rows[0].rank, 1);
        assert_eq!(board.rows[0].name, "Daniel Murphy");
        assert_eq!(board.rows[0].counts, vec!["531", "184", "47", "5", "25", "35"]);
        assert_eq!(board.rows[1].player_id, "altuvjo01");
    }

    #[test]
    fn career_title() {
        let result = data()
            .top_by_career(&Eligibility::default(), &SluggingPercentage, 5)
            .unwrap();
        let board = Leaderboard::new(&result, &SluggingPercentage, Scope::Career, &FieldSchema::default());
        assert_eq!(board.title, "Top players by career slugging percentage");
    }

    #[test]
    fn text_table_layout() {
        let text = render_text(&season_board());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Top players by batting average in 2016:");
        assert!(lines[1].contains("Player"));
        assert!(lines[1].ends_with("BATTING_AVERAGE"));
        assert!(lines[2].starts_with("  1  Daniel Murphy"));
        assert!(lines[2].ends_with(".347"));
        assert!(lines[3].contains("Jose Altuve"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn text_table_empty_result() {
        let mut board = season_board();
        board.rows.clear();
        assert_eq!(render_text(&board), "Top players by batting average in 2016:\n  (no players)\n");
    }

    #[test]
    fn json_output_shape() {
        let json = render_json(&[season_board()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let board = &parsed[0];
        assert_eq!(board["stat"], "batting_average");
        assert_eq!(board["scope"]["season"], 2016);
        assert_eq!(board["rows"][0]["player_id"], "murphda08");
        assert_eq!(board["rows"][1]["counts"][0], "640");
    }

    #[test]
    fn career_scope_serializes_as_string() {
        let json = serde_json::to_value(Scope::Career).unwrap();
        assert_eq!(json, "career");
    }

    #[test]
    fn rate_formatting() {
        assert_eq!(format_rate(184.0 / 531.0), ".347");
        assert_eq!(format_rate(0.0), ".000");
        assert_eq!(format_rate(1.25), "1.250");
    }
}
