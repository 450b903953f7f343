// The reference report: every configured stat for one season, then careers.

use crate::report::{render_json, render_text, Leaderboard, Scope};
use anyhow::Context;
use statline_core::config::{Config, OutputFormat};
use statline_core::query::{self, QueryError};
use tracing::info;

/// Build the season leaderboards followed by the career leaderboards.
///
/// Each query reloads the input files.
pub fn leaderboards(config: &Config) -> Result<Vec<Leaderboard>, QueryError> {
    let q = &config.query;
    let mut boards = Vec::with_capacity(q.stats.len() * 2);

    for stat in &q.stats {
        let result = query::top_stats_by_year(config, stat, q.num_players, q.year)?;
        boards.push(Leaderboard::new(&result, stat, Scope::Season(q.year), &config.fields));
    }
    for stat in &q.stats {
        let result = query::top_stats_by_career(config, stat, q.num_players)?;
        boards.push(Leaderboard::new(&result, stat, Scope::Career, &config.fields));
    }

    info!("Built {} leaderboards", boards.len());
    Ok(boards)
}

/// Render leaderboards in the configured output format.
pub fn render(config: &Config, boards: &[Leaderboard]) -> anyhow::Result<String> {
    match config.output.format {
        OutputFormat::Text => Ok(boards
            .iter()
            .map(render_text)
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => render_json(boards).context("failed to serialize leaderboards"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use statline_core::config::{DataPaths, Eligibility, FieldSchema, OutputConfig, QueryConfig};
    use statline_core::stats::Stat;
    use std::path::PathBuf;

    fn fixture_config() -> Config {
        let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../statline-core/tests/fixtures");
        Config {
            data: DataPaths {
                master: fixtures.join("Master.csv"),
                batting: fixtures.join("Batting.csv"),
                separator: ',',
                quote: '"',
            },
            fields: FieldSchema::default(),
            eligibility: Eligibility::default(),
            query: QueryConfig::default(),
            output: OutputConfig::default(),
        }
    }

    #[test]
    fn six_boards_season_then_career() {
        let boards = leaderboards(&fixture_config()).unwrap();
        assert_eq!(boards.len(), 6);
        assert!(boards[..3].iter().all(|b| b.scope == Scope::Season(2016)));
        assert!(boards[3..].iter().all(|b| b.scope == Scope::Career));
        assert_eq!(boards[0].stat, "batting_average");
        assert_eq!(boards[1].stat, "on_base_percentage");
        assert_eq!(boards[2].stat, "slugging_percentage");
        assert!(boards.iter().all(|b| b.rows.len() == 5));
        assert_eq!(boards[0].rows[0].name, "Daniel Murphy");
    }

    #[test]
    fn configured_stats_subset() {
        let mut config = fixture_config();
        config.query.stats = vec![Stat::SluggingPercentage];
        config.query.num_players = 2;
        let boards = leaderboards(&config).unwrap();
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[0].rows[0].player_id, "ortizda01");
        assert_eq!(boards[1].title, "Top players by career slugging percentage");
    }

    #[test]
    fn text_render_joins_boards() {
        let config = fixture_config();
        let boards = leaderboards(&config).unwrap();
        let text = render(&config, &boards).unwrap();
        assert!(text.starts_with("Top players by batting average in 2016:\n"));
        assert!(text.contains("\nTop players by career on-base percentage:\n"));
    }

    #[test]
    fn json_render_is_array_of_boards() {
        let mut config = fixture_config();
        config.output.format = OutputFormat::Json;
        let boards = leaderboards(&config).unwrap();
        let json = render(&config, &boards).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.as_array().map(Vec::len), Some(6));
    }

    #[test]
    fn missing_data_file_propagates() {
        let mut config = fixture_config();
        config.data.batting = PathBuf::from("/nonexistent/Batting.csv");
        assert!(matches!(leaderboards(&config), Err(QueryError::Load { .. })));
    }
}
