use crate::results_fetch::MatchRecord;

pub const MIN_GAMES: usize = 5;
pub const WINDOW: usize = 10;

/// One leaderboard row: a player's consistency over their last games in one
/// league. Percentages are whole numbers, rounded the way the board shows
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct TipRow {
    pub player: String,
    pub games: u32,
    pub over_15_ht: u32,
    pub over_25_ht: u32,
    pub over_25_ft: u32,
    pub over_35_ft: u32,
    pub over_45_ft: u32,
    pub btts_ft: u32,
    pub goals_for_avg: f64,
    pub goals_against_avg: f64,
}

/// Builds the per-league tip leaderboard: every player with at least
/// `MIN_GAMES` of their last `WINDOW` league games, sorted by Over 2.5 FT
/// percentage descending.
pub fn league_tips(matches: &[MatchRecord], league: &str) -> Vec<TipRow> {
    let league_matches: Vec<&MatchRecord> =
        matches.iter().filter(|m| m.league == league).collect();

    let mut players: Vec<&str> = Vec::new();
    for m in &league_matches {
        if !players.contains(&m.home.as_str()) {
            players.push(&m.home);
        }
    }
    for m in &league_matches {
        if !players.contains(&m.away.as_str()) {
            players.push(&m.away);
        }
    }

    let mut rows = Vec::new();
    for player in players {
        let involved: Vec<&MatchRecord> = league_matches
            .iter()
            .copied()
            .filter(|m| m.involves(player))
            .collect();
        let start = involved.len().saturating_sub(WINDOW);
        let window = &involved[start..];
        if window.len() < MIN_GAMES {
            continue;
        }

        let games = window.len() as u32;
        let mut over_15_ht = 0u32;
        let mut over_25_ht = 0u32;
        let mut over_25_ft = 0u32;
        let mut over_35_ft = 0u32;
        let mut over_45_ft = 0u32;
        let mut btts_ft = 0u32;
        let mut goals_for = 0u32;
        let mut goals_against = 0u32;

        for m in window {
            let total_ht = m.total_ht();
            over_15_ht += u32::from(total_ht > 1);
            over_25_ht += u32::from(total_ht > 2);

            let total_ft = m.total_ft();
            over_25_ft += u32::from(total_ft > 2);
            over_35_ft += u32::from(total_ft > 3);
            over_45_ft += u32::from(total_ft > 4);
            btts_ft += u32::from(m.btts_ft());

            if m.home == player {
                goals_for += m.home_ft;
                goals_against += m.away_ft;
            } else {
                goals_for += m.away_ft;
                goals_against += m.home_ft;
            }
        }

        let pct_round = |hits: u32| (f64::from(hits) / f64::from(games) * 100.0).round() as u32;
        rows.push(TipRow {
            player: player.to_string(),
            games,
            over_15_ht: pct_round(over_15_ht),
            over_25_ht: pct_round(over_25_ht),
            over_25_ft: pct_round(over_25_ft),
            over_35_ft: pct_round(over_35_ft),
            over_45_ft: pct_round(over_45_ft),
            btts_ft: pct_round(btts_ft),
            goals_for_avg: round2(f64::from(goals_for) / f64::from(games)),
            goals_against_avg: round2(f64::from(goals_against) / f64::from(games)),
        });
    }

    rows.sort_by(|a, b| b.over_25_ft.cmp(&a.over_25_ft));
    rows
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Templated consistency report: each line fires off a fixed rule threshold.
pub fn player_report(row: &TipRow) -> Vec<String> {
    let mut parts = Vec::new();

    if row.over_25_ft >= 80 {
        parts.push(format!(
            "Máquina de Over Gols - {}% dos jogos com Over 2.5 FT",
            row.over_25_ft
        ));
        if row.over_35_ft >= 60 {
            parts.push(format!(
                "Especialista em Placar Alto - {}% dos jogos com Over 3.5 FT",
                row.over_35_ft
            ));
        }
    } else if row.over_25_ft <= 30 {
        parts.push(format!(
            "Padrão Under - Apenas {}% dos jogos com Over 2.5 FT",
            row.over_25_ft
        ));
    } else {
        parts.push(format!(
            "Desempenho Intermediário - {}% dos jogos com Over 2.5 FT",
            row.over_25_ft
        ));
    }

    if row.goals_for_avg >= 2.5 {
        parts.push(format!(
            "Ataque Potente - Média de {} gols marcados por jogo",
            row.goals_for_avg
        ));
    } else if row.goals_for_avg <= 1.0 {
        parts.push(format!(
            "Ataque Limitado - Apenas {} gols marcados em média",
            row.goals_for_avg
        ));
    }

    if row.goals_against_avg >= 2.0 {
        parts.push(format!(
            "Defesa Instável - Média de {} gols sofridos por jogo",
            row.goals_against_avg
        ));
    } else if row.goals_against_avg <= 1.0 {
        parts.push(format!(
            "Defesa Sólida - Apenas {} gols sofridos em média",
            row.goals_against_avg
        ));
    }

    if row.over_15_ht >= 80 {
        parts.push(format!(
            "Começo Forte - {}% dos jogos com Over 1.5 HT",
            row.over_15_ht
        ));
    }

    let mut recommendations = Vec::new();
    if row.over_25_ft >= 80 && row.goals_for_avg >= 2.0 {
        if row.over_35_ft >= 60 {
            recommendations.push("Over 3.5 FT é uma aposta altamente recomendada");
        } else {
            recommendations.push("Over 2.5 FT é uma aposta segura");
        }
    }
    if row.over_15_ht >= 70 {
        recommendations.push("Over 1.5 HT tem bom potencial");
    }
    if !recommendations.is_empty() {
        parts.push("Recomendações de Aposta:".to_string());
        for rec in recommendations {
            parts.push(format!("✅ {rec}"));
        }
    }

    if row.over_25_ft >= 80 && row.goals_for_avg >= 2.5 {
        parts.push("🟢 ALERTA DE CONFIANÇA: Apostas em over são altamente recomendadas".to_string());
    } else if row.over_25_ft <= 30 && row.goals_for_avg <= 1.0 {
        parts.push("🔴 ALERTA DE RISCO: Evitar apostas em over".to_string());
    }

    parts
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

    fn high_scoring_table() -> Vec<MatchRecord> {
        (0..6)
            .map(|_| m("GT 12 Min", "hot", "cold", (2, 1), (3, 2)))
            .collect()
    }

    #[test]
    fn leaderboard_requires_minimum_games() {
        let mut table = high_scoring_table();
        table.push(m("GT 12 Min", "casual", "hot", (0, 0), (0, 0)));
        let tips = league_tips(&table, "GT 12 Min");
        assert!(tips.iter().any(|t| t.player == "hot"));
        assert!(tips.iter().all(|t| t.player != "casual"));
    }

    #[test]
    fn leaderboard_sorts_by_over_25_ft() {
        let mut table = high_scoring_table();
        for _ in 0..6 {
            table.push(m("GT 12 Min", "quiet", "dull", (0, 0), (1, 0)));
        }
        let tips = league_tips(&table, "GT 12 Min");
        assert_eq!(tips[0].player, "hot");
        assert_eq!(tips[0].over_25_ft, 100);
        assert_eq!(tips.last().unwrap().over_25_ft, 0);
    }

    #[test]
    fn percentages_and_averages_round_like_the_board() {
        let table = vec![
            m("GT 12 Min", "p", "q", (1, 1), (2, 1)),
            m("GT 12 Min", "p", "q", (0, 0), (1, 0)),
            m("GT 12 Min", "p", "q", (2, 1), (3, 2)),
            m("GT 12 Min", "p", "q", (0, 1), (1, 2)),
            m("GT 12 Min", "p", "q", (1, 0), (2, 0)),
            m("GT 12 Min", "p", "q", (1, 1), (2, 2)),
        ];
        let tips = league_tips(&table, "GT 12 Min");
        let p = tips.iter().find(|t| t.player == "p").unwrap();
        assert_eq!(p.games, 6);
        // Over 2.5 FT in [3, 1, 5, 3, 2, 4] -> 4 of 6, rounded.
        assert_eq!(p.over_25_ft, 67);
        // Goals for: 2+1+3+1+2+2 = 11 over 6 games.
        assert!((p.goals_for_avg - 1.83).abs() < 1e-9);
    }

    #[test]
    fn report_flags_over_machine_with_confidence_alert() {
        let row = TipRow {
            player: "hot".to_string(),
            games: 10,
            over_15_ht: 85,
            over_25_ht: 40,
            over_25_ft: 90,
            over_35_ft: 70,
            over_45_ft: 30,
            btts_ft: 60,
            goals_for_avg: 3.1,
            goals_against_avg: 2.2,
        };
        let report = player_report(&row);
        assert!(report.iter().any(|l| l.contains("Máquina de Over Gols")));
        assert!(report.iter().any(|l| l.contains("Especialista em Placar Alto")));
        assert!(report.iter().any(|l| l.contains("Ataque Potente")));
        assert!(report.iter().any(|l| l.contains("Defesa Instável")));
        assert!(report.iter().any(|l| l.contains("Começo Forte")));
        assert!(report.iter().any(|l| l.contains("Over 3.5 FT é uma aposta altamente recomendada")));
        assert!(report.iter().any(|l| l.contains("ALERTA DE CONFIANÇA")));
    }

    #[test]
    fn report_flags_under_pattern_with_risk_alert() {
        let row = TipRow {
            player: "cold".to_string(),
            games: 10,
            over_15_ht: 10,
            over_25_ht: 0,
            over_25_ft: 20,
            over_35_ft: 0,
            over_45_ft: 0,
            btts_ft: 10,
            goals_for_avg: 0.8,
            goals_against_avg: 0.9,
        };
        let report = player_report(&row);
        assert!(report.iter().any(|l| l.contains("Padrão Under")));
        assert!(report.iter().any(|l| l.contains("Ataque Limitado")));
        assert!(report.iter().any(|l| l.contains("Defesa Sólida")));
        assert!(report.iter().any(|l| l.contains("ALERTA DE RISCO")));
        assert!(!report.iter().any(|l| l.contains("Recomendações")));
    }
}
