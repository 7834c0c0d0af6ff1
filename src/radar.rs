use crate::live_fetch::LiveMatch;
use crate::player_stats::pct;

/// Radar criteria: the label shown per column and the predicted-average
/// cutoff a live matchup must reach to count.
pub const HT_CRITERIA: [(&str, f64); 3] = [("0.5 HT", 1.70), ("1.5 HT", 2.20), ("2.5 HT", 2.75)];
pub const FT_CRITERIA: [(&str, f64); 6] = [
    ("0.5 FT", 2.00),
    ("1.5 FT", 2.40),
    ("2.5 FT", 3.45),
    ("3.5 FT", 4.50),
    ("4.5 FT", 5.70),
    ("5.5 FT", 6.70),
];

/// How many live matches per league feed the radar.
const MATCHES_PER_LEAGUE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct RadarRow {
    pub league: String,
    pub avg_goals_ht: f64,
    pub avg_goals_ft: f64,
    /// Percentage of sampled matches meeting each HT criterion, in
    /// `HT_CRITERIA` order.
    pub ht_pcts: [u32; 3],
    pub ft_pcts: [u32; 6],
}

/// Per-league percentages of live matchups whose predicted averages clear
/// each over cutoff, over at most the first 10 matches of each league.
pub fn build_radar(board: &[LiveMatch]) -> Vec<RadarRow> {
    let mut leagues: Vec<&str> = Vec::new();
    for m in board {
        if !leagues.contains(&m.league.as_str()) {
            leagues.push(&m.league);
        }
    }

    let mut out = Vec::with_capacity(leagues.len());
    for league in leagues {
        let sample: Vec<&LiveMatch> = board
            .iter()
            .filter(|m| m.league == league)
            .take(MATCHES_PER_LEAGUE)
            .collect();
        let games = sample.len() as u32;
        if games == 0 {
            continue;
        }

        let sum_ht: f64 = sample.iter().map(|m| m.goals_ht).sum();
        let sum_ft: f64 = sample.iter().map(|m| m.goals_ft).sum();

        let mut ht_pcts = [0u32; 3];
        for (slot, (_, cutoff)) in ht_pcts.iter_mut().zip(HT_CRITERIA) {
            let hits = sample.iter().filter(|m| m.goals_ht >= cutoff).count() as u32;
            *slot = pct(hits, games) as u32;
        }
        let mut ft_pcts = [0u32; 6];
        for (slot, (_, cutoff)) in ft_pcts.iter_mut().zip(FT_CRITERIA) {
            let hits = sample.iter().filter(|m| m.goals_ft >= cutoff).count() as u32;
            *slot = pct(hits, games) as u32;
        }

        out.push(RadarRow {
            league: league.to_string(),
            avg_goals_ht: sum_ht / f64::from(games),
            avg_goals_ft: sum_ft / f64::from(games),
            ht_pcts,
            ft_pcts,
        });
    }
    out
}
