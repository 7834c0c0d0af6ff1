use crate::results_fetch::{MatchRecord, MAIN_LEAGUES};

pub const GAMES_PER_LEAGUE: usize = 20;
pub const MIN_STREAK: u32 = 3;
pub const MIN_RATE: f64 = 70.0;

/// A weighted market: heavier weights mark harder lines, so a streak on them
/// scores higher.
pub struct MarketSpec {
    pub label: &'static str,
    pub weight: f64,
    hit: fn(&MatchRecord, &str) -> bool,
}

fn player_ft_goals(m: &MatchRecord, player: &str) -> u32 {
    if m.home == player {
        m.home_ft
    } else {
        m.away_ft
    }
}

pub const MARKETS: [MarketSpec; 7] = [
    MarketSpec {
        label: "1.5+ Gols",
        weight: 1.2,
        hit: |m, p| f64::from(player_ft_goals(m, p)) >= 1.5,
    },
    MarketSpec {
        label: "2.5+ Gols",
        weight: 1.5,
        hit: |m, p| f64::from(player_ft_goals(m, p)) >= 2.5,
    },
    MarketSpec {
        label: "Over 1.5 HT",
        weight: 1.0,
        hit: |m, _| m.total_ht() > 1,
    },
    MarketSpec {
        label: "Over 2.5 HT",
        weight: 1.3,
        hit: |m, _| m.total_ht() > 2,
    },
    MarketSpec {
        label: "Over 2.5 FT",
        weight: 1.4,
        hit: |m, _| m.total_ft() > 2,
    },
    MarketSpec {
        label: "Over 3.5 FT",
        weight: 1.6,
        hit: |m, _| m.total_ft() > 3,
    },
    MarketSpec {
        label: "BTTS FT",
        weight: 1.1,
        hit: |m, _| m.btts_ft(),
    },
];

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRow {
    pub player: String,
    pub market: &'static str,
    pub streak: u32,
    pub rate: f64,
    pub league: String,
    pub score: f64,
    pub games: u32,
    pub last_date: String,
}

/// Streak predictions over each league's latest 20 matches: retain
/// player/market pairs with a streak of at least 3 inside the window and a
/// hit rate of at least 70%, scored streak x weight x rate, best first.
pub fn build_predictions(matches: &[MatchRecord]) -> Vec<PredictionRow> {
    let mut recent: Vec<&MatchRecord> = Vec::new();
    for league in MAIN_LEAGUES {
        let league_matches: Vec<&MatchRecord> =
            matches.iter().filter(|m| m.league == league).collect();
        let start = league_matches.len().saturating_sub(GAMES_PER_LEAGUE);
        recent.extend(&league_matches[start..]);
    }

    let mut players: Vec<&str> = Vec::new();
    for m in &recent {
        if !players.contains(&m.home.as_str()) {
            players.push(&m.home);
        }
    }
    for m in &recent {
        if !players.contains(&m.away.as_str()) {
            players.push(&m.away);
        }
    }

    let mut rows = Vec::new();
    for player in players {
        // Most recent first; streaks count back from the latest match.
        let mut involved: Vec<&MatchRecord> = recent
            .iter()
            .copied()
            .filter(|m| m.involves(player))
            .collect();
        involved.reverse();
        involved.sort_by(|a, b| b.date.cmp(&a.date));

        if (involved.len() as u32) < MIN_STREAK {
            continue;
        }

        for market in &MARKETS {
            let mut best_streak = 0u32;
            let mut current = 0u32;
            let mut hits = 0u32;
            for m in &involved {
                if (market.hit)(m, player) {
                    current += 1;
                    best_streak = best_streak.max(current);
                    hits += 1;
                } else {
                    current = 0;
                }
            }

            let rate = f64::from(hits) / involved.len() as f64 * 100.0;
            if best_streak >= MIN_STREAK && rate >= MIN_RATE {
                rows.push(PredictionRow {
                    player: player.to_string(),
                    market: market.label,
                    streak: best_streak,
                    rate,
                    league: involved[0].league.clone(),
                    score: f64::from(best_streak) * market.weight * (rate / 100.0),
                    games: involved.len() as u32,
                    last_date: involved[0].date.clone(),
                });
            }
        }
    }

    rows.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.last_date.cmp(&a.last_date))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(date: &str, league: &str, home: &str, away: &str, ht: (u32, u32), ft: (u32, u32)) -> MatchRecord {
        MatchRecord {
            date: date.to_string(),
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
    fn perfect_over_streak_is_reported() {
        let table: Vec<MatchRecord> = (0..5)
            .map(|i| {
                m(
                    &format!("2026-08-0{}", i + 1),
                    "GT 12 Min",
                    "hot",
                    "cold",
                    (2, 1),
                    (3, 2),
                )
            })
            .collect();
        let rows = build_predictions(&table);
        let over_25 = rows
            .iter()
            .find(|r| r.player == "hot" && r.market == "Over 2.5 FT")
            .expect("streak row should exist");
        assert_eq!(over_25.streak, 5);
        assert_eq!(over_25.rate, 100.0);
        assert_eq!(over_25.league, "GT 12 Min");
        assert!((over_25.score - 5.0 * 1.4).abs() < 1e-9);
        assert_eq!(over_25.last_date, "2026-08-05");
    }

    #[test]
    fn broken_streaks_and_low_rates_are_dropped() {
        // Alternating over/under: no streak of 3, rate 50%.
        let table: Vec<MatchRecord> = (0..8)
            .map(|i| {
                let ft = if i % 2 == 0 { (3, 2) } else { (1, 0) };
                m(
                    &format!("2026-08-0{}", i + 1),
                    "GT 12 Min",
                    "flip",
                    "flop",
                    (0, 0),
                    ft,
                )
            })
            .collect();
        let rows = build_predictions(&table);
        assert!(rows.iter().all(|r| r.market != "Over 2.5 FT"));
    }

    #[test]
    fn window_restricts_to_latest_twenty_per_league() {
        let mut table = Vec::new();
        // 20 old under matches push the early over run out of the window.
        for i in 0..5 {
            table.push(m(
                &format!("2026-07-{:02}", i + 1),
                "GT 12 Min",
                "early",
                "other",
                (2, 2),
                (4, 3),
            ));
        }
        for i in 0..20 {
            table.push(m(
                &format!("2026-08-{:02}", i + 1),
                "GT 12 Min",
                "a",
                "b",
                (0, 0),
                (1, 0),
            ));
        }
        let rows = build_predictions(&table);
        assert!(rows.iter().all(|r| r.player != "early"));
    }

    #[test]
    fn scores_sort_best_first() {
        let mut table = Vec::new();
        for i in 0..4 {
            table.push(m(
                &format!("2026-08-0{}", i + 1),
                "GT 12 Min",
                "gt",
                "x",
                (2, 1),
                (2, 2),
            ));
        }
        for i in 0..6 {
            table.push(m(
                &format!("2026-08-0{}", i + 1),
                "Battle 8 Min",
                "bt",
                "y",
                (3, 1),
                (4, 3),
            ));
        }
        let rows = build_predictions(&table);
        assert!(!rows.is_empty());
        for pair in rows.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
