use once_cell::sync::Lazy;
use regex::Regex;

use crate::page_fetch;

/// One finished match from the historical results page. Half-time totals are
/// NOT validated against full-time totals; the source is occasionally
/// inconsistent and rows are kept as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub date: String,
    pub league: String,
    pub home: String,
    pub away: String,
    pub home_ht: u32,
    pub away_ht: u32,
    pub home_ft: u32,
    pub away_ft: u32,
}

impl MatchRecord {
    pub fn total_ht(&self) -> u32 {
        self.home_ht + self.away_ht
    }

    pub fn total_ft(&self) -> u32 {
        self.home_ft + self.away_ft
    }

    pub fn involves(&self, player: &str) -> bool {
        self.home == player || self.away == player
    }

    /// Both sides scored in the given half-time pair.
    pub fn btts_ht(&self) -> bool {
        self.home_ht > 0 && self.away_ht > 0
    }

    pub fn btts_ft(&self) -> bool {
        self.home_ft > 0 && self.away_ft > 0
    }
}

static PAREN_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\([^)]*\)").expect("paren suffix regex"));

/// Source captions seen on the results page, in the canonical order we keep.
const DATE_HEADER: &str = "Data";
const LEAGUE_HEADER: &str = "Campeonato";
const HOME_HEADER: &str = "Jogador 1";
const AWAY_HEADER: &str = "Jogador 2";
const SCORE_HT_HEADER: &str = "Placar HT";
const SCORE_FT_HEADER: &str = "Placar";

/// The four canonical league names the dashboard analyses.
pub const MAIN_LEAGUES: [&str; 4] = ["Battle 8 Min", "Volta 6 Min", "H2H 8 Min", "GT 12 Min"];

/// Results-page league captions to the canonical names used everywhere else.
pub fn canonical_league(raw: &str) -> String {
    match raw {
        "GT League" => "GT 12 Min".to_string(),
        "H2H 8m" => "H2H 8 Min".to_string(),
        "Battle 8m" => "Battle 8 Min".to_string(),
        "Battle 6m" => "Volta 6 Min".to_string(),
        other => other.to_string(),
    }
}

/// Strips a parenthesized team suffix: "Name (Team)" -> "Name".
pub fn clean_player_name(raw: &str) -> String {
    PAREN_SUFFIX.replace_all(raw, "").trim().to_string()
}

/// Splits an "H x A" score string. Malformed or missing components coerce to
/// zero so one bad cell never drops the row.
pub fn split_score(raw: &str) -> (u32, u32) {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let mut parts = compact.splitn(2, 'x');
    let home = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    let away = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0);
    (home, away)
}

/// Builds the match table from raw `<tr>` rows. The first row is the header;
/// every following row becomes one record. Zero usable rows is an empty
/// table, not an error.
pub fn parse_results_rows(rows: &[Vec<String>]) -> Vec<MatchRecord> {
    let Some((header, body)) = rows.split_first() else {
        return Vec::new();
    };

    let column = |caption: &str| header.iter().position(|cell| cell.trim() == caption);
    let (Some(league_idx), Some(home_idx), Some(away_idx), Some(ft_idx)) = (
        column(LEAGUE_HEADER),
        column(HOME_HEADER),
        column(AWAY_HEADER),
        column(SCORE_FT_HEADER),
    ) else {
        tracing::warn!("results header is missing required columns");
        return Vec::new();
    };
    let date_idx = column(DATE_HEADER);
    let ht_idx = column(SCORE_HT_HEADER);

    let max_cols = rows.iter().map(|row| row.len()).max().unwrap_or(0);

    let mut out = Vec::with_capacity(body.len());
    for row in body {
        let mut padded;
        let row = if row.len() < max_cols {
            padded = row.clone();
            padded.resize(max_cols, String::new());
            &padded
        } else {
            row
        };

        let (home_ht, away_ht) = ht_idx.map_or((0, 0), |idx| split_score(&row[idx]));
        let (home_ft, away_ft) = split_score(&row[ft_idx]);

        out.push(MatchRecord {
            date: date_idx.map_or_else(String::new, |idx| row[idx].clone()),
            league: canonical_league(&row[league_idx]),
            home: clean_player_name(&row[home_idx]),
            away: clean_player_name(&row[away_idx]),
            home_ht,
            away_ht,
            home_ft,
            away_ft,
        });
    }
    out
}

/// Fetches and normalizes the historical results table. Fetch or parse
/// failures surface as an empty table plus a log entry.
pub fn fetch_results() -> Vec<MatchRecord> {
    let rows = page_fetch::fetch_rows(&page_fetch::results_url());
    parse_results_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_score_handles_well_formed_and_malformed() {
        assert_eq!(split_score("2 x 1"), (2, 1));
        assert_eq!(split_score("2x1"), (2, 1));
        assert_eq!(split_score("x"), (0, 0));
        assert_eq!(split_score(""), (0, 0));
        assert_eq!(split_score("a x b"), (0, 0));
        assert_eq!(split_score("3"), (3, 0));
    }

    #[test]
    fn clean_player_name_strips_team_suffix() {
        assert_eq!(clean_player_name("kray (Arsenal)"), "kray");
        assert_eq!(clean_player_name("plain"), "plain");
        assert_eq!(clean_player_name("a (x) b (y)"), "a b");
    }

    #[test]
    fn canonical_league_maps_known_and_passes_unknown() {
        assert_eq!(canonical_league("GT League"), "GT 12 Min");
        assert_eq!(canonical_league("Battle 6m"), "Volta 6 Min");
        assert_eq!(canonical_league("Other Cup"), "Other Cup");
    }

    #[test]
    fn short_rows_are_right_padded() {
        let rows = vec![
            vec![
                "Data".into(),
                "Campeonato".into(),
                "Jogador 1".into(),
                "Jogador 2".into(),
                "Placar HT".into(),
                "Placar".into(),
            ],
            vec!["01/02".into(), "GT League".into(), "solo (X)".into()],
        ];
        let records = parse_results_rows(&rows);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].home, "solo");
        assert_eq!(records[0].away, "");
        assert_eq!(records[0].total_ft(), 0);
    }

    #[test]
    fn missing_required_columns_yield_empty_table() {
        let rows = vec![vec!["Data".to_string()], vec!["01/02".to_string()]];
        assert!(parse_results_rows(&rows).is_empty());
    }
}
