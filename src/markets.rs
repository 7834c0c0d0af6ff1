/// Threshold ladders and display glyphs for the over/under markets. All pure;
/// ladders are ordered high to low and the first match wins.
pub const NO_ENTRY: &str = "Sem Entrada";

pub fn suggest_over_ft(avg_goals_ft: f64) -> &'static str {
    if avg_goals_ft >= 6.70 {
        "Over 5.5 FT"
    } else if avg_goals_ft >= 5.70 {
        "Over 4.5 FT"
    } else if avg_goals_ft >= 4.50 {
        "Over 3.5 FT"
    } else if avg_goals_ft >= 3.45 {
        "Over 2.5 FT"
    } else if avg_goals_ft >= 2.40 {
        "Over 1.5 FT"
    } else if avg_goals_ft >= 2.00 {
        "Over 0.5 FT"
    } else {
        NO_ENTRY
    }
}

pub fn suggest_over_ht(avg_goals_ht: f64) -> &'static str {
    if avg_goals_ht >= 2.75 {
        "Over 2.5 HT"
    } else if avg_goals_ht >= 2.20 {
        "Over 1.5 HT"
    } else if avg_goals_ht >= 1.70 {
        "Over 0.5 HT"
    } else {
        NO_ENTRY
    }
}

/// Display bucket for the predicted HT average. Cutoffs differ from the
/// suggestion ladder on purpose: yellow flags "almost Over 2.5 HT".
pub fn format_goals_ht(avg_goals_ht: f64) -> String {
    if avg_goals_ht >= 2.75 {
        format!("🟢 {avg_goals_ht:.2}")
    } else if (2.62..=2.74).contains(&avg_goals_ht) {
        format!("🟡 {avg_goals_ht:.2}")
    } else {
        format!("⚪ {avg_goals_ht:.2}")
    }
}

/// Traffic-light glyph for a pair of hit rates, one per side of a matchup.
pub fn pair_glyph(home_hits: u32, home_games: u32, away_hits: u32, away_games: u32) -> &'static str {
    let home_rate = rate(home_hits, home_games);
    let away_rate = rate(away_hits, away_games);
    if home_rate >= 0.70 && away_rate >= 0.70 {
        "🟢"
    } else if home_rate >= 0.60 && away_rate >= 0.60 {
        "🟡"
    } else {
        "🔴"
    }
}

/// "`glyph` home-hits/home-games⏎away-hits/away-games" cell text for the
/// live board's per-threshold columns.
pub fn format_pair(home_hits: u32, home_games: u32, away_hits: u32, away_games: u32) -> String {
    let glyph = pair_glyph(home_hits, home_games, away_hits, away_games);
    format!("{glyph} {home_hits}/{home_games}\n{away_hits}/{away_games}")
}

/// Per-player goal-expectation hint. Only two bands map to a playable line;
/// everything else is reported as unstable.
pub fn over_band_hint(player: &str, avg_goals: f64) -> String {
    if (2.30..=3.39).contains(&avg_goals) {
        format!("{player} 1.5 Gols")
    } else if (3.40..=4.50).contains(&avg_goals) {
        format!("{player} 2.5 Gols")
    } else {
        "Instável".to_string()
    }
}

fn rate(hits: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        f64::from(hits) / f64::from(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ft_ladder_boundaries() {
        assert_eq!(suggest_over_ft(6.70), "Over 5.5 FT");
        assert_eq!(suggest_over_ft(5.70), "Over 4.5 FT");
        assert_eq!(suggest_over_ft(4.50), "Over 3.5 FT");
        assert_eq!(suggest_over_ft(3.45), "Over 2.5 FT");
        assert_eq!(suggest_over_ft(2.40), "Over 1.5 FT");
        assert_eq!(suggest_over_ft(2.00), "Over 0.5 FT");
        assert_eq!(suggest_over_ft(1.99), NO_ENTRY);
    }

    #[test]
    fn ht_ladder_boundaries() {
        assert_eq!(suggest_over_ht(2.75), "Over 2.5 HT");
        assert_eq!(suggest_over_ht(2.20), "Over 1.5 HT");
        assert_eq!(suggest_over_ht(1.70), "Over 0.5 HT");
        assert_eq!(suggest_over_ht(1.69), NO_ENTRY);
    }

    #[test]
    fn ladders_are_monotonic() {
        let line_rank = |s: &str| match s {
            NO_ENTRY => 0,
            other => other
                .split_whitespace()
                .nth(1)
                .and_then(|n| n.parse::<f64>().ok())
                .map(|n| (n * 10.0) as i64 + 10)
                .unwrap_or(0),
        };

        let mut prev_ft = -1;
        let mut prev_ht = -1;
        for step in 0..=800 {
            let avg = step as f64 / 100.0;
            let ft = line_rank(suggest_over_ft(avg));
            let ht = line_rank(suggest_over_ht(avg));
            assert!(ft >= prev_ft, "FT ladder regressed at avg={avg}");
            assert!(ht >= prev_ht, "HT ladder regressed at avg={avg}");
            prev_ft = ft;
            prev_ht = ht;
        }
    }

    #[test]
    fn ht_display_buckets() {
        assert!(format_goals_ht(2.80).starts_with("🟢"));
        assert!(format_goals_ht(2.70).starts_with("🟡"));
        assert!(format_goals_ht(2.50).starts_with("⚪"));
    }

    #[test]
    fn pair_glyph_thresholds() {
        assert_eq!(pair_glyph(7, 10, 7, 10), "🟢");
        assert_eq!(pair_glyph(6, 10, 7, 10), "🟡");
        assert_eq!(pair_glyph(6, 10, 5, 10), "🔴");
        assert_eq!(pair_glyph(0, 0, 7, 10), "🔴");
    }

    #[test]
    fn over_band_hints() {
        assert_eq!(over_band_hint("kray", 2.30), "kray 1.5 Gols");
        assert_eq!(over_band_hint("kray", 3.40), "kray 2.5 Gols");
        assert_eq!(over_band_hint("kray", 4.51), "Instável");
        assert_eq!(over_band_hint("kray", 0.0), "Instável");
    }
}
