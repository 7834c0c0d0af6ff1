use chrono::NaiveTime;

use crate::player_stats::{pct, PlayerTotals};
use crate::results_fetch::MatchRecord;
use crate::saved_games::SavedGame;

/// Flat one-unit stake: a hit pays odds - 1, a miss loses the unit.
pub fn flat_stake_profit(hits: u32, games: u32, odds: f64) -> f64 {
    f64::from(hits) * (odds - 1.0) - f64::from(games - hits)
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketProfit {
    pub market: &'static str,
    pub games: u32,
    pub hits: u32,
    pub hit_rate: f64,
    pub profit: f64,
}

/// Hit rate and expected flat-stake profit for the four tracked markets of
/// one player, at the given odds.
pub fn player_market_profits(totals: &PlayerTotals, odds: f64) -> Vec<MarketProfit> {
    let markets: [(&'static str, u32); 4] = [
        ("Vitória do Jogador", totals.wins),
        ("Jogos Over 1.5 HT", totals.over_15_ht),
        ("Jogos Over 2.5 FT", totals.over_25_ft),
        ("Jogos BTTS FT", totals.btts_ft),
    ];

    markets
        .into_iter()
        .map(|(market, hits)| MarketProfit {
            market,
            games: totals.games,
            hits,
            hit_rate: pct(hits, totals.games),
            profit: flat_stake_profit(hits, totals.games, odds),
        })
        .collect()
}

/// Settles one suggestion against the actual period total. "Sem Entrada" and
/// unparseable lines settle to zero.
pub fn settle_suggestion(suggestion: &str, actual_total: u32, odds: f64) -> f64 {
    let Some(line) = suggestion_line(suggestion) else {
        return 0.0;
    };
    if f64::from(actual_total) > line {
        odds - 1.0
    } else {
        -1.0
    }
}

fn suggestion_line(suggestion: &str) -> Option<f64> {
    if !suggestion.contains("Over") {
        return None;
    }
    suggestion.split_whitespace().nth(1)?.parse::<f64>().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Upcoming,
    InProgress,
    Finished,
}

impl GameStatus {
    pub fn label(self) -> &'static str {
        match self {
            GameStatus::Upcoming => "⏳ A iniciar",
            GameStatus::InProgress => "▶️ Em andamento",
            GameStatus::Finished => "✅ Finalizado",
        }
    }
}

/// Classifies a saved game by its listed kickoff hour against the clock.
/// Anything unparseable counts as finished so it gets settled.
pub fn game_status(hour: &str, now: NaiveTime) -> GameStatus {
    let Ok(kickoff) = NaiveTime::parse_from_str(hour.trim(), "%H:%M") else {
        return GameStatus::Finished;
    };
    if kickoff > now {
        return GameStatus::Upcoming;
    }
    let elapsed = now - kickoff;
    if elapsed.num_minutes() < 30 {
        GameStatus::InProgress
    } else {
        GameStatus::Finished
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettledGame {
    pub hour: String,
    pub date: String,
    pub matchup: String,
    pub status: GameStatus,
    pub suggestion_ht: String,
    pub suggestion_ft: String,
    /// Home/away pairs from the matched historical record; None while the
    /// result is still unknown.
    pub result_ht: Option<(u32, u32)>,
    pub result_ft: Option<(u32, u32)>,
    pub profit_ht: f64,
    pub profit_ft: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettlementReport {
    pub rows: Vec<SettledGame>,
    pub settled_games: u32,
    pub ht_greens: u32,
    pub ht_reds: u32,
    pub ft_greens: u32,
    pub ft_reds: u32,
    pub total_ht_profit: f64,
    pub total_ft_profit: f64,
}

fn latest_result<'a>(
    matches: &'a [MatchRecord],
    home: &str,
    away: &str,
) -> Option<&'a MatchRecord> {
    matches
        .iter()
        .rev()
        .find(|m| m.home == home && m.away == away)
}

/// Re-derives each saved game's actual totals from the latest matching
/// historical record and classifies both suggestions at the given odds.
pub fn settle_saved_games(
    saved: &[SavedGame],
    matches: &[MatchRecord],
    odds: f64,
    now: NaiveTime,
) -> SettlementReport {
    let mut report = SettlementReport::default();

    for game in saved {
        let status = game_status(&game.hora, now);
        let matchup = format!("{} vs {}", game.mandante, game.visitante);
        let result = latest_result(matches, &game.mandante, &game.visitante);

        if status != GameStatus::Finished {
            report.rows.push(SettledGame {
                hour: game.hora.clone(),
                date: result.map(|m| m.date.clone()).unwrap_or_default(),
                matchup,
                status,
                suggestion_ht: game.sugestao_ht.clone(),
                suggestion_ft: game.sugestao_ft.clone(),
                result_ht: None,
                result_ft: None,
                profit_ht: 0.0,
                profit_ft: 0.0,
            });
            continue;
        }

        let Some(record) = result else {
            report.rows.push(SettledGame {
                hour: game.hora.clone(),
                date: String::new(),
                matchup,
                status,
                suggestion_ht: game.sugestao_ht.clone(),
                suggestion_ft: game.sugestao_ft.clone(),
                result_ht: None,
                result_ft: None,
                profit_ht: 0.0,
                profit_ft: 0.0,
            });
            continue;
        };

        let profit_ht = settle_suggestion(&game.sugestao_ht, record.total_ht(), odds);
        let profit_ft = settle_suggestion(&game.sugestao_ft, record.total_ft(), odds);

        if profit_ht > 0.0 {
            report.ht_greens += 1;
        } else if profit_ht < 0.0 {
            report.ht_reds += 1;
        }
        if profit_ft > 0.0 {
            report.ft_greens += 1;
        } else if profit_ft < 0.0 {
            report.ft_reds += 1;
        }
        report.total_ht_profit += profit_ht;
        report.total_ft_profit += profit_ft;
        report.settled_games += 1;

        report.rows.push(SettledGame {
            hour: game.hora.clone(),
            date: record.date.clone(),
            matchup,
            status,
            suggestion_ht: game.sugestao_ht.clone(),
            suggestion_ft: game.sugestao_ft.clone(),
            result_ht: Some((record.home_ht, record.away_ht)),
            result_ft: Some((record.home_ft, record.away_ft)),
            profit_ht,
            profit_ft,
        });
    }

    report
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionRow {
    pub odds: f64,
    pub games: u32,
    pub ht_greens: u32,
    pub ht_reds: u32,
    pub ft_greens: u32,
    pub ft_reds: u32,
    pub profit_ht: f64,
    pub profit_ft: f64,
    pub profit_total: f64,
}

/// Recomputes the saved-games outcome across the fixed odds sweep
/// 1.50..=3.00 in 0.25 steps. Settlement ignores kickoff status here: every
/// saved game with a known result participates.
pub fn profit_projection(saved: &[SavedGame], matches: &[MatchRecord]) -> Vec<ProjectionRow> {
    (0..7)
        .map(|step| {
            let odds = 1.50 + 0.25 * step as f64;
            let mut row = ProjectionRow {
                odds,
                games: 0,
                ht_greens: 0,
                ht_reds: 0,
                ft_greens: 0,
                ft_reds: 0,
                profit_ht: 0.0,
                profit_ft: 0.0,
                profit_total: 0.0,
            };

            for game in saved {
                let Some(record) = latest_result(matches, &game.mandante, &game.visitante) else {
                    continue;
                };
                let ht = settle_suggestion(&game.sugestao_ht, record.total_ht(), odds);
                let ft = settle_suggestion(&game.sugestao_ft, record.total_ft(), odds);

                if ht > 0.0 {
                    row.ht_greens += 1;
                } else if ht < 0.0 {
                    row.ht_reds += 1;
                }
                if ft > 0.0 {
                    row.ft_greens += 1;
                } else if ft < 0.0 {
                    row.ft_reds += 1;
                }
                row.profit_ht += ht;
                row.profit_ft += ft;
                row.games += 1;
            }

            row.profit_total = row.profit_ht + row.profit_ft;
            row
        })
        .collect()
}
