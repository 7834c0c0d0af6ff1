use std::collections::{BTreeMap, BTreeSet};

use crate::markets;
use crate::results_fetch::MatchRecord;

/// Hit rate as a percentage. Zero games is 0%, never an error.
pub fn pct(hits: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(hits) / f64::from(games) * 100.0
    }
}

fn avg(total: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(total) / f64::from(games)
    }
}

/// Counters for one player restricted to one league. Everything derived is
/// recomputed from these counts at read time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerLeagueStats {
    pub games: u32,
    pub goals_for_ft: u32,
    pub goals_against_ft: u32,
    pub goals_for_ht: u32,
    pub goals_against_ht: u32,
    pub over_05_ht: u32,
    pub over_15_ht: u32,
    pub over_25_ht: u32,
    pub btts_ht: u32,
    pub over_05_ft: u32,
    pub over_15_ft: u32,
    pub over_25_ft: u32,
    pub over_35_ft: u32,
    pub over_45_ft: u32,
    pub over_55_ft: u32,
    pub over_65_ft: u32,
    pub btts_ft: u32,
}

impl PlayerLeagueStats {
    pub fn avg_goals_for_ft(&self) -> f64 {
        avg(self.goals_for_ft, self.games)
    }

    pub fn avg_goals_against_ft(&self) -> f64 {
        avg(self.goals_against_ft, self.games)
    }

    pub fn avg_goals_for_ht(&self) -> f64 {
        avg(self.goals_for_ht, self.games)
    }

    pub fn avg_goals_against_ht(&self) -> f64 {
        avg(self.goals_against_ht, self.games)
    }
}

/// Scans the match table for one player in one league, accumulating goal and
/// threshold counters from that player's perspective.
pub fn league_stats(matches: &[MatchRecord], player: &str, league: &str) -> PlayerLeagueStats {
    let mut s = PlayerLeagueStats::default();

    for m in matches {
        if m.league != league || !m.involves(player) {
            continue;
        }
        let home = m.home == player;
        let (gf_ft, ga_ft) = if home {
            (m.home_ft, m.away_ft)
        } else {
            (m.away_ft, m.home_ft)
        };
        let (gf_ht, ga_ht) = if home {
            (m.home_ht, m.away_ht)
        } else {
            (m.away_ht, m.home_ht)
        };

        s.games += 1;
        s.goals_for_ft += gf_ft;
        s.goals_against_ft += ga_ft;
        s.goals_for_ht += gf_ht;
        s.goals_against_ht += ga_ht;

        let total_ht = m.total_ht();
        s.over_05_ht += u32::from(total_ht > 0);
        s.over_15_ht += u32::from(total_ht > 1);
        s.over_25_ht += u32::from(total_ht > 2);
        s.btts_ht += u32::from(gf_ht > 0 && ga_ht > 0);

        let total_ft = m.total_ft();
        s.over_05_ft += u32::from(total_ft > 0);
        s.over_15_ft += u32::from(total_ft > 1);
        s.over_25_ft += u32::from(total_ft > 2);
        s.over_35_ft += u32::from(total_ft > 3);
        s.over_45_ft += u32::from(total_ft > 4);
        s.over_55_ft += u32::from(total_ft > 5);
        s.over_65_ft += u32::from(total_ft > 6);
        s.btts_ft += u32::from(gf_ft > 0 && ga_ft > 0);
    }

    s
}

/// Cumulative counters for one player across every league.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerTotals {
    pub player: String,
    pub games: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub goals_for_ft: u32,
    pub goals_against_ft: u32,
    pub goals_for_ht: u32,
    pub goals_against_ht: u32,
    pub clean_sheets: u32,
    pub over_05_ht: u32,
    pub over_15_ht: u32,
    pub over_25_ht: u32,
    pub btts_ht: u32,
    pub over_05_ft: u32,
    pub over_15_ft: u32,
    pub over_25_ft: u32,
    pub over_35_ft: u32,
    pub over_45_ft: u32,
    pub over_55_ft: u32,
    pub over_65_ft: u32,
    pub btts_ft: u32,
    pub under_25_ft: u32,
    pub leagues: BTreeSet<String>,
}

impl PlayerTotals {
    pub fn win_rate(&self) -> f64 {
        pct(self.wins, self.games)
    }

    pub fn loss_rate(&self) -> f64 {
        pct(self.losses, self.games)
    }

    pub fn avg_goals_for(&self) -> f64 {
        avg(self.goals_for_ft, self.games)
    }

    pub fn avg_goals_against(&self) -> f64 {
        avg(self.goals_against_ft, self.games)
    }

    pub fn goal_diff(&self) -> i64 {
        i64::from(self.goals_for_ft) - i64::from(self.goals_against_ft)
    }

    pub fn clean_sheet_rate(&self) -> f64 {
        pct(self.clean_sheets, self.games)
    }

    pub fn leagues_label(&self) -> String {
        self.leagues.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

/// Single pass over the whole match table, crediting both participants of
/// every match. Output is sorted by player name, which also makes repeat runs
/// over the same table byte-identical.
pub fn all_player_totals(matches: &[MatchRecord]) -> Vec<PlayerTotals> {
    let mut by_player: BTreeMap<String, PlayerTotals> = BTreeMap::new();

    for m in matches {
        for home in [true, false] {
            let name = if home { &m.home } else { &m.away };
            let entry = by_player.entry(name.clone()).or_insert_with(|| PlayerTotals {
                player: name.clone(),
                ..PlayerTotals::default()
            });
            let (gf_ft, ga_ft) = if home {
                (m.home_ft, m.away_ft)
            } else {
                (m.away_ft, m.home_ft)
            };
            let (gf_ht, ga_ht) = if home {
                (m.home_ht, m.away_ht)
            } else {
                (m.away_ht, m.home_ht)
            };

            entry.leagues.insert(m.league.clone());
            entry.games += 1;
            entry.goals_for_ft += gf_ft;
            entry.goals_against_ft += ga_ft;
            entry.goals_for_ht += gf_ht;
            entry.goals_against_ht += ga_ht;

            if gf_ft > ga_ft {
                entry.wins += 1;
            } else if gf_ft < ga_ft {
                entry.losses += 1;
            } else {
                entry.draws += 1;
            }
            entry.clean_sheets += u32::from(ga_ft == 0);

            let total_ht = m.total_ht();
            entry.over_05_ht += u32::from(total_ht > 0);
            entry.over_15_ht += u32::from(total_ht > 1);
            entry.over_25_ht += u32::from(total_ht > 2);
            entry.btts_ht += u32::from(m.btts_ht());

            let total_ft = m.total_ft();
            entry.over_05_ft += u32::from(total_ft > 0);
            entry.over_15_ft += u32::from(total_ft > 1);
            entry.over_25_ft += u32::from(total_ft > 2);
            entry.under_25_ft += u32::from(total_ft <= 2);
            entry.over_35_ft += u32::from(total_ft > 3);
            entry.over_45_ft += u32::from(total_ft > 4);
            entry.over_55_ft += u32::from(total_ft > 5);
            entry.over_65_ft += u32::from(total_ft > 6);
            entry.btts_ft += u32::from(m.btts_ft());
        }
    }

    by_player.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Win,
    Loss,
    Draw,
}

/// Counters over a player's most recent N matches (any league), plus the
/// current streak block. Streaks follow chronological order and reset the
/// moment an outcome flips.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentStats {
    pub games: u32,
    pub goals_for_ft: u32,
    pub goals_against_ft: u32,
    pub goals_for_ht: u32,
    pub goals_against_ht: u32,
    pub over_05_ht: u32,
    pub over_15_ht: u32,
    pub over_25_ht: u32,
    pub btts_ht: u32,
    pub over_05_ft: u32,
    pub over_15_ft: u32,
    pub over_25_ft: u32,
    pub over_35_ft: u32,
    pub over_45_ft: u32,
    pub over_55_ft: u32,
    pub over_65_ft: u32,
    pub btts_ft: u32,
    pub under_25_ft: u32,
    pub win_streak: u32,
    pub loss_streak: u32,
    pub draw_streak: u32,
    pub btts_streak: u32,
    pub over_25_ft_streak: u32,
}

impl RecentStats {
    pub fn avg_goals_for_ft(&self) -> f64 {
        avg(self.goals_for_ft, self.games)
    }

    pub fn avg_goals_against_ft(&self) -> f64 {
        avg(self.goals_against_ft, self.games)
    }

    pub fn avg_goals_for_ht(&self) -> f64 {
        avg(self.goals_for_ht, self.games)
    }

    pub fn avg_goals_against_ht(&self) -> f64 {
        avg(self.goals_against_ht, self.games)
    }

    pub fn pct_over_05_ht(&self) -> f64 {
        pct(self.over_05_ht, self.games)
    }

    pub fn pct_over_15_ht(&self) -> f64 {
        pct(self.over_15_ht, self.games)
    }

    pub fn pct_over_25_ht(&self) -> f64 {
        pct(self.over_25_ht, self.games)
    }

    pub fn pct_over_25_ft(&self) -> f64 {
        pct(self.over_25_ft, self.games)
    }

    pub fn pct_under_25_ft(&self) -> f64 {
        pct(self.under_25_ft, self.games)
    }

    pub fn pct_btts_ft(&self) -> f64 {
        pct(self.btts_ft, self.games)
    }
}

/// Statistics over a player's last `window` matches. The match table is
/// chronological (oldest first), so the window is the tail.
pub fn recent_stats(matches: &[MatchRecord], player: &str, window: usize) -> RecentStats {
    let involved: Vec<&MatchRecord> = matches.iter().filter(|m| m.involves(player)).collect();
    let start = involved.len().saturating_sub(window);

    let mut s = RecentStats::default();
    let mut last_outcome: Option<Outcome> = None;
    let mut last_btts: Option<bool> = None;
    let mut last_over_25: Option<bool> = None;

    for m in &involved[start..] {
        let home = m.home == player;
        let (gf_ft, ga_ft) = if home {
            (m.home_ft, m.away_ft)
        } else {
            (m.away_ft, m.home_ft)
        };
        let (gf_ht, ga_ht) = if home {
            (m.home_ht, m.away_ht)
        } else {
            (m.away_ht, m.home_ht)
        };

        s.games += 1;
        s.goals_for_ft += gf_ft;
        s.goals_against_ft += ga_ft;
        s.goals_for_ht += gf_ht;
        s.goals_against_ht += ga_ht;

        let total_ht = m.total_ht();
        s.over_05_ht += u32::from(total_ht > 0);
        s.over_15_ht += u32::from(total_ht > 1);
        s.over_25_ht += u32::from(total_ht > 2);
        s.btts_ht += u32::from(gf_ht > 0 && ga_ht > 0);

        let total_ft = m.total_ft();
        s.over_05_ft += u32::from(total_ft > 0);
        s.over_15_ft += u32::from(total_ft > 1);
        if total_ft > 2 {
            s.over_25_ft += 1;
        } else {
            s.under_25_ft += 1;
        }
        s.over_35_ft += u32::from(total_ft > 3);
        s.over_45_ft += u32::from(total_ft > 4);
        s.over_55_ft += u32::from(total_ft > 5);
        s.over_65_ft += u32::from(total_ft > 6);

        let btts = gf_ft > 0 && ga_ft > 0;
        s.btts_ft += u32::from(btts);
        let over_25 = total_ft > 2;

        let outcome = if gf_ft > ga_ft {
            Outcome::Win
        } else if gf_ft < ga_ft {
            Outcome::Loss
        } else {
            Outcome::Draw
        };
        if last_outcome.is_none_or(|prev| prev == outcome) {
            match outcome {
                Outcome::Win => s.win_streak += 1,
                Outcome::Loss => s.loss_streak += 1,
                Outcome::Draw => s.draw_streak += 1,
            }
        } else {
            s.win_streak = u32::from(outcome == Outcome::Win);
            s.loss_streak = u32::from(outcome == Outcome::Loss);
            s.draw_streak = u32::from(outcome == Outcome::Draw);
        }
        last_outcome = Some(outcome);

        if last_btts.is_none_or(|prev| prev == btts) {
            s.btts_streak += u32::from(btts);
        } else {
            s.btts_streak = u32::from(btts);
        }
        last_btts = Some(btts);

        if last_over_25.is_none_or(|prev| prev == over_25) {
            s.over_25_ft_streak += u32::from(over_25);
        } else {
            s.over_25_ft_streak = u32::from(over_25);
        }
        last_over_25 = Some(over_25);
    }

    s
}

/// Head-to-head summary over the last `window` direct meetings.
#[derive(Debug, Clone, PartialEq)]
pub struct H2hSummary {
    pub rows: Vec<MatchRecord>,
    pub avg_goals_ht: f64,
    pub avg_goals_ft: f64,
    pub best_line_ht: &'static str,
    pub best_line_ft: &'static str,
    pub btts_pct: f64,
}

pub fn head_to_head(
    matches: &[MatchRecord],
    player1: &str,
    player2: &str,
    window: usize,
) -> H2hSummary {
    let direct: Vec<&MatchRecord> = matches
        .iter()
        .filter(|m| {
            (m.home == player1 && m.away == player2) || (m.home == player2 && m.away == player1)
        })
        .collect();
    let start = direct.len().saturating_sub(window);
    let rows: Vec<MatchRecord> = direct[start..].iter().map(|m| (*m).clone()).collect();

    let games = rows.len() as u32;
    let total_ht: u32 = rows.iter().map(|m| m.total_ht()).sum();
    let total_ft: u32 = rows.iter().map(|m| m.total_ft()).sum();
    let btts_hits = rows.iter().filter(|m| m.btts_ft()).count() as u32;

    let avg_goals_ht = avg(total_ht, games);
    let avg_goals_ft = avg(total_ft, games);

    H2hSummary {
        avg_goals_ht,
        avg_goals_ft,
        best_line_ht: markets::suggest_over_ht(avg_goals_ht),
        best_line_ft: markets::suggest_over_ft(avg_goals_ft),
        btts_pct: pct(btts_hits, games),
        rows,
    }
}

/// The extra BTTS tip only fires when both players run hot on BTTS recently
/// AND the direct meetings agree.
pub fn btts_suggestion(p1: &RecentStats, p2: &RecentStats, h2h: &H2hSummary) -> Option<String> {
    if p1.pct_btts_ft() >= 60.0 && p2.pct_btts_ft() >= 60.0 && h2h.btts_pct >= 60.0 {
        Some(format!(
            "Ambos Marcam (BTTS FT) com {:.2}% de acerto nos confrontos diretos",
            h2h.btts_pct
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(league: &str, home: &str, away: &str, ht: (u32, u32), ft: (u32, u32)) -> MatchRecord {
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
    fn league_stats_scopes_by_league_and_player() {
        let table = vec![
            m("GT 12 Min", "a", "b", (1, 0), (2, 1)),
            m("GT 12 Min", "c", "a", (0, 0), (0, 4)),
            m("Battle 8 Min", "a", "b", (3, 3), (5, 5)),
        ];
        let s = league_stats(&table, "a", "GT 12 Min");
        assert_eq!(s.games, 2);
        assert_eq!(s.goals_for_ft, 6);
        assert_eq!(s.goals_against_ft, 1);
        assert_eq!(s.goals_for_ht, 1);
        assert_eq!(s.goals_against_ht, 0);
        assert_eq!(s.over_25_ft, 2);
        assert_eq!(s.btts_ft, 1);
    }

    #[test]
    fn over_25_example_from_three_games() {
        // FT totals [3, 1, 4] -> 2 hits, ~66.67%.
        let table = vec![
            m("GT 12 Min", "a", "b", (0, 0), (2, 1)),
            m("GT 12 Min", "a", "b", (0, 0), (1, 0)),
            m("GT 12 Min", "b", "a", (0, 0), (2, 2)),
        ];
        let s = league_stats(&table, "a", "GT 12 Min");
        assert_eq!(s.games, 3);
        assert_eq!(s.over_25_ft, 2);
        let rate = pct(s.over_25_ft, s.games);
        assert!((rate - 66.666).abs() < 0.01);
    }

    #[test]
    fn totals_credit_both_sides() {
        let table = vec![m("GT 12 Min", "a", "b", (1, 1), (3, 0))];
        let totals = all_player_totals(&table);
        assert_eq!(totals.len(), 2);
        let a = totals.iter().find(|t| t.player == "a").unwrap();
        let b = totals.iter().find(|t| t.player == "b").unwrap();
        assert_eq!(a.wins, 1);
        assert_eq!(a.clean_sheets, 1);
        assert_eq!(b.losses, 1);
        assert_eq!(b.clean_sheets, 0);
        assert_eq!(a.over_25_ft, 1);
        assert_eq!(b.over_25_ft, 1);
        assert_eq!(a.btts_ht, 1);
        assert_eq!(a.btts_ft, 0);
        assert_eq!(a.under_25_ft, 0);
    }

    #[test]
    fn under_25_is_complement_of_over_25() {
        let table = vec![
            m("GT 12 Min", "a", "b", (0, 0), (1, 1)),
            m("GT 12 Min", "a", "b", (0, 0), (2, 1)),
        ];
        let totals = all_player_totals(&table);
        let a = totals.iter().find(|t| t.player == "a").unwrap();
        assert_eq!(a.over_25_ft + a.under_25_ft, a.games);
        assert_eq!(a.over_25_ft, 1);
        assert_eq!(a.under_25_ft, 1);
    }

    #[test]
    fn rates_are_bounded_and_zero_when_empty() {
        assert_eq!(pct(0, 0), 0.0);
        let empty = PlayerTotals::default();
        assert_eq!(empty.win_rate(), 0.0);
        for hits in 0..=10 {
            let rate = pct(hits, 10);
            assert!((0.0..=100.0).contains(&rate));
        }
    }

    #[test]
    fn totals_are_idempotent_over_unchanged_table() {
        let table = vec![
            m("GT 12 Min", "a", "b", (1, 0), (2, 2)),
            m("Volta 6 Min", "b", "a", (0, 2), (1, 3)),
        ];
        assert_eq!(all_player_totals(&table), all_player_totals(&table));
    }

    #[test]
    fn win_streak_resets_on_flip() {
        // Chronological [win, win, loss, win] -> current win streak is 1.
        let table = vec![
            m("GT 12 Min", "a", "b", (0, 0), (1, 0)),
            m("GT 12 Min", "a", "b", (0, 0), (2, 0)),
            m("GT 12 Min", "b", "a", (0, 0), (3, 0)),
            m("GT 12 Min", "a", "b", (0, 0), (2, 1)),
        ];
        let s = recent_stats(&table, "a", 10);
        assert_eq!(s.win_streak, 1);
        assert_eq!(s.loss_streak, 0);
        assert_eq!(s.games, 4);
    }

    #[test]
    fn recent_window_takes_the_tail() {
        let table = vec![
            m("GT 12 Min", "a", "b", (0, 0), (9, 0)),
            m("GT 12 Min", "a", "b", (0, 0), (1, 0)),
            m("GT 12 Min", "a", "b", (0, 0), (1, 1)),
        ];
        let s = recent_stats(&table, "a", 2);
        assert_eq!(s.games, 2);
        assert_eq!(s.goals_for_ft, 2);
    }

    #[test]
    fn btts_and_over_streaks_track_current_run() {
        let table = vec![
            m("GT 12 Min", "a", "b", (0, 0), (2, 1)), // btts, over
            m("GT 12 Min", "a", "b", (0, 0), (1, 0)), // no btts, under
            m("GT 12 Min", "a", "b", (0, 0), (2, 2)), // btts, over
            m("GT 12 Min", "a", "b", (0, 0), (3, 1)), // btts, over
        ];
        let s = recent_stats(&table, "a", 10);
        assert_eq!(s.btts_streak, 2);
        assert_eq!(s.over_25_ft_streak, 2);
    }

    #[test]
    fn head_to_head_windows_direct_meetings() {
        let table = vec![
            m("GT 12 Min", "a", "b", (1, 1), (2, 2)),
            m("GT 12 Min", "a", "c", (0, 0), (9, 9)),
            m("GT 12 Min", "b", "a", (2, 1), (3, 2)),
        ];
        let h2h = head_to_head(&table, "a", "b", 10);
        assert_eq!(h2h.rows.len(), 2);
        assert!((h2h.avg_goals_ft - 4.5).abs() < 1e-9);
        assert!((h2h.avg_goals_ht - 2.5).abs() < 1e-9);
        assert_eq!(h2h.best_line_ft, "Over 3.5 FT");
        assert_eq!(h2h.best_line_ht, "Over 1.5 HT");
        assert_eq!(h2h.btts_pct, 100.0);
    }

    #[test]
    fn head_to_head_with_no_meetings_is_empty_not_an_error() {
        let h2h = head_to_head(&[], "a", "b", 10);
        assert!(h2h.rows.is_empty());
        assert_eq!(h2h.avg_goals_ft, 0.0);
        assert_eq!(h2h.best_line_ft, markets::NO_ENTRY);
        assert_eq!(h2h.btts_pct, 0.0);
    }
}
