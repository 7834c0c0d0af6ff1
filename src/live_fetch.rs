use once_cell::sync::Lazy;
use regex::Regex;

use crate::markets;
use crate::page_fetch;
use crate::player_stats::{self, PlayerLeagueStats};
use crate::results_fetch::MatchRecord;

/// Live-feed competition captions we broadcast. Everything else on the page
/// is dropped silently.
pub const ALLOWED_COMPETITIONS: [&str; 4] = [
    "E-soccer - H2H GG League - 8 minutos de jogo",
    "Esoccer Battle Volta - 6 Minutos de Jogo",
    "E-soccer - GT Leagues - 12 mins de jogo",
    "E-soccer - Battle - 8 minutos de jogo",
];

/// Column positions on the live listings page: hour, (unused), matchup text,
/// competition caption.
const HOUR_COL: usize = 0;
const MATCHUP_COL: usize = 2;
const COMPETITION_COL: usize = 3;

static PLAYER_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\).*?x.*?\(([^)]+)\)").expect("player pair regex"));

/// Live-feed competition captions to the same canonical names produced by the
/// results pipeline, so league-scoped joins line up.
pub fn canonical_live_league(raw: &str) -> String {
    match raw {
        "E-soccer - H2H GG League - 8 minutos de jogo" => "H2H 8 Min".to_string(),
        "Esoccer Battle Volta - 6 Minutos de Jogo" => "Volta 6 Min".to_string(),
        "E-soccer - GT Leagues - 12 mins de jogo" => "GT 12 Min".to_string(),
        "E-soccer - Battle - 8 minutos de jogo" => "Battle 8 Min".to_string(),
        other => other.to_string(),
    }
}

/// A normalized row from the live listings page. Unmatched matchup text keeps
/// the row with two empty names; its stats degenerate to zero downstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRow {
    pub hour: String,
    pub league: String,
    pub home: String,
    pub away: String,
}

/// Extracts "(name1) ... x ... (name2)" from the matchup cell.
pub fn extract_players(matchup: &str) -> (String, String) {
    let base = matchup.replace("Ao Vivo Agora", "");
    match PLAYER_PAIR.captures(base.trim()) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => (String::new(), String::new()),
    }
}

pub fn parse_live_rows(rows: &[Vec<String>]) -> Vec<LiveRow> {
    let mut out = Vec::new();
    for row in rows {
        let Some(competition) = row.get(COMPETITION_COL) else {
            continue;
        };
        if !ALLOWED_COMPETITIONS.contains(&competition.as_str()) {
            continue;
        }
        let matchup = row.get(MATCHUP_COL).map(String::as_str).unwrap_or("");
        let (home, away) = extract_players(matchup);
        out.push(LiveRow {
            hour: row.get(HOUR_COL).cloned().unwrap_or_default(),
            league: canonical_live_league(competition),
            home,
            away,
        });
    }
    out
}

/// One live matchup joined against both players' history in that league.
#[derive(Debug, Clone, PartialEq)]
pub struct LiveMatch {
    pub hour: String,
    pub league: String,
    pub home: String,
    pub away: String,
    pub home_stats: PlayerLeagueStats,
    pub away_stats: PlayerLeagueStats,
    /// Matchup goals-for estimate: (home scored avg + away conceded avg) / 2.
    pub gp: f64,
    /// Matchup goals-against estimate: (away scored avg + home conceded avg) / 2.
    pub gc: f64,
    pub goals_ht: f64,
    pub goals_ft: f64,
    pub suggestion_ht: &'static str,
    pub suggestion_ft: &'static str,
    pub over_home: String,
    pub over_away: String,
}

/// Joins every live row with league-scoped history for both players and
/// derives the predicted-goals block.
///
/// The FT pairing mixes each side's scored average with the OPPOSING side's
/// conceded average, while HT sums each side with itself. The asymmetry is
/// load-bearing; do not "fix" it without product sign-off (see DESIGN.md).
pub fn build_live_board(rows: &[LiveRow], results: &[MatchRecord]) -> Vec<LiveMatch> {
    rows.iter()
        .map(|row| {
            let home_stats = player_stats::league_stats(results, &row.home, &row.league);
            let away_stats = player_stats::league_stats(results, &row.away, &row.league);

            let sum_ht_home = home_stats.avg_goals_for_ht() + home_stats.avg_goals_against_ht();
            let sum_ht_away = away_stats.avg_goals_for_ht() + away_stats.avg_goals_against_ht();
            let sum_ft_home = home_stats.avg_goals_for_ft() + away_stats.avg_goals_against_ft();
            let sum_ft_away = away_stats.avg_goals_for_ft() + home_stats.avg_goals_against_ft();

            let goals_ht = (sum_ht_home + sum_ht_away) / 2.0;
            let goals_ft = (sum_ft_home + sum_ft_away) / 2.0;

            let both_have_history = home_stats.games > 0 && away_stats.games > 0;
            let gp = if both_have_history {
                (home_stats.avg_goals_for_ft() + away_stats.avg_goals_against_ft()) / 2.0
            } else {
                0.0
            };
            let gc = if both_have_history {
                (away_stats.avg_goals_for_ft() + home_stats.avg_goals_against_ft()) / 2.0
            } else {
                0.0
            };

            LiveMatch {
                hour: row.hour.clone(),
                league: row.league.clone(),
                home: row.home.clone(),
                away: row.away.clone(),
                gp,
                gc,
                goals_ht,
                goals_ft,
                suggestion_ht: markets::suggest_over_ht(goals_ht),
                suggestion_ft: markets::suggest_over_ft(goals_ft),
                over_home: markets::over_band_hint(&row.home, gp),
                over_away: markets::over_band_hint(&row.away, gc),
                home_stats,
                away_stats,
            }
        })
        .collect()
}

/// Fetches the live page and builds the joined board. Failures become an
/// empty board plus a log entry.
pub fn fetch_live_board(results: &[MatchRecord]) -> Vec<LiveMatch> {
    let rows = page_fetch::fetch_rows(&page_fetch::live_url());
    build_live_board(&parse_live_rows(&rows), results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_players_happy_and_malformed() {
        let (h, a) = extract_players("Esoccer Battle (kray) Arsenal x Chelsea (meltosik) Ao Vivo Agora");
        assert_eq!(h, "kray");
        assert_eq!(a, "meltosik");

        let (h, a) = extract_players("no parentheses here");
        assert_eq!(h, "");
        assert_eq!(a, "");
    }

    #[test]
    fn both_league_maps_meet_on_the_same_canonical_name() {
        assert_eq!(
            canonical_live_league("E-soccer - GT Leagues - 12 mins de jogo"),
            "GT 12 Min"
        );
        assert_eq!(
            crate::results_fetch::canonical_league("GT League"),
            "GT 12 Min"
        );
    }

    #[test]
    fn rows_outside_the_allow_list_are_dropped() {
        let rows = vec![
            vec![
                "10:00".into(),
                "".into(),
                "(a) x (b)".into(),
                "E-soccer - Battle - 8 minutos de jogo".into(),
            ],
            vec![
                "11:00".into(),
                "".into(),
                "(c) x (d)".into(),
                "Some Other League".into(),
            ],
            vec!["short row".into()],
        ];
        let live = parse_live_rows(&rows);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].league, "Battle 8 Min");
        assert_eq!(live[0].home, "a");
        assert_eq!(live[0].away, "b");
    }

    fn rec(league: &str, home: &str, away: &str, ht: (u32, u32), ft: (u32, u32)) -> MatchRecord {
        MatchRecord {
            date: String::new(),
            league: league.to_string(),
            home: home.to_string(),
            away: away.to_string(),
            home_ht: ht.0,
            away_ht: ht.1,
            home_ft: ft.0,
            away_ft: ft.1,
        }
    }

    #[test]
    fn board_join_uses_league_scoped_history() {
        // "a" averages 3 for / 1 against FT in Battle 8 Min; "b" averages 2 / 2.
        let results = vec![
            rec("Battle 8 Min", "a", "x", (1, 0), (3, 1)),
            rec("Battle 8 Min", "b", "x", (1, 1), (2, 2)),
            // Same players in another league must not leak in.
            rec("GT 12 Min", "a", "b", (5, 5), (9, 9)),
        ];
        let rows = vec![LiveRow {
            hour: "10:00".into(),
            league: "Battle 8 Min".into(),
            home: "a".into(),
            away: "b".into(),
        }];
        let board = build_live_board(&rows, &results);
        let m = &board[0];

        assert_eq!(m.home_stats.games, 1);
        assert_eq!(m.away_stats.games, 1);
        // FT cross pairing: home sum = 3 + 2, away sum = 2 + 1 -> (5 + 3) / 2.
        assert!((m.goals_ft - 4.0).abs() < 1e-9);
        // HT same-side sums: home 1 + 0, away 1 + 1 -> (1 + 2) / 2.
        assert!((m.goals_ht - 1.5).abs() < 1e-9);
        // GP = (3 + 2) / 2, GC = (2 + 1) / 2.
        assert!((m.gp - 2.5).abs() < 1e-9);
        assert!((m.gc - 1.5).abs() < 1e-9);
        assert_eq!(m.suggestion_ft, "Over 2.5 FT");
        assert_eq!(m.suggestion_ht, markets::NO_ENTRY);
        assert_eq!(m.over_home, "a 1.5 Gols");
        assert_eq!(m.over_away, "Instável");
    }

    #[test]
    fn unknown_players_degrade_to_zeroed_stats() {
        let rows = vec![LiveRow {
            hour: "10:00".into(),
            league: "Battle 8 Min".into(),
            home: "".into(),
            away: "".into(),
        }];
        let board = build_live_board(&rows, &[]);
        let m = &board[0];
        assert_eq!(m.home_stats.games, 0);
        assert_eq!(m.gp, 0.0);
        assert_eq!(m.gc, 0.0);
        assert_eq!(m.goals_ft, 0.0);
        assert_eq!(m.suggestion_ft, markets::NO_ENTRY);
    }
}
