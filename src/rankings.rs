use crate::player_stats::{pct, PlayerTotals};

pub const MEDALS: [&str; 3] = ["🥇", "🥈", "🥉"];
pub const DEFAULT_MIN_GAMES: u32 = 10;
pub const DEFAULT_TOP_N: usize = 20;

/// The rankable metrics. `ascending` marks "worst of" boards where a low
/// value should lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    WinRate,
    LossRate,
    GoalsScoredAvg,
    GoalsScoredAvgWorst,
    GoalsConcededAvg,
    GoalDiff,
    CleanSheetRate,
    Over15HtRate,
    Over25FtRate,
    Under25FtRate,
    BttsFtRate,
}

pub const ALL_METRICS: [Metric; 11] = [
    Metric::WinRate,
    Metric::LossRate,
    Metric::GoalsScoredAvg,
    Metric::GoalsScoredAvgWorst,
    Metric::GoalsConcededAvg,
    Metric::GoalDiff,
    Metric::CleanSheetRate,
    Metric::Over15HtRate,
    Metric::Over25FtRate,
    Metric::Under25FtRate,
    Metric::BttsFtRate,
];

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::WinRate => "Win Rate (%)",
            Metric::LossRate => "Derrota Rate (%)",
            Metric::GoalsScoredAvg => "Gols Marcados Média",
            Metric::GoalsScoredAvgWorst => "Pior Ataque (Média)",
            Metric::GoalsConcededAvg => "Gols Sofridos Média",
            Metric::GoalDiff => "Saldo de Gols",
            Metric::CleanSheetRate => "Clean Sheets (%)",
            Metric::Over15HtRate => "Over 1.5 HT (%)",
            Metric::Over25FtRate => "Over 2.5 FT (%)",
            Metric::Under25FtRate => "Under 2.5 FT (%)",
            Metric::BttsFtRate => "BTTS FT (%)",
        }
    }

    pub fn ascending(self) -> bool {
        matches!(self, Metric::GoalsScoredAvgWorst)
    }

    fn value(self, t: &PlayerTotals) -> f64 {
        match self {
            Metric::WinRate => t.win_rate(),
            Metric::LossRate => t.loss_rate(),
            Metric::GoalsScoredAvg | Metric::GoalsScoredAvgWorst => t.avg_goals_for(),
            Metric::GoalsConcededAvg => t.avg_goals_against(),
            Metric::GoalDiff => t.goal_diff() as f64,
            Metric::CleanSheetRate => t.clean_sheet_rate(),
            Metric::Over15HtRate => pct(t.over_15_ht, t.games),
            Metric::Over25FtRate => pct(t.over_25_ft, t.games),
            Metric::Under25FtRate => pct(t.under_25_ft, t.games),
            Metric::BttsFtRate => pct(t.btts_ft, t.games),
        }
    }

    /// Percentages are "x.xx%", averages "x.xx", signed differentials "+x".
    fn format(self, value: f64) -> String {
        match self {
            Metric::WinRate
            | Metric::LossRate
            | Metric::CleanSheetRate
            | Metric::Over15HtRate
            | Metric::Over25FtRate
            | Metric::Under25FtRate
            | Metric::BttsFtRate => format!("{value:.2}%"),
            Metric::GoalsScoredAvg
            | Metric::GoalsScoredAvgWorst
            | Metric::GoalsConcededAvg => format!("{value:.2}"),
            Metric::GoalDiff => format!("{value:+.0}"),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RankingSpec {
    pub metric: Metric,
    pub min_games: u32,
    pub top_n: usize,
}

impl RankingSpec {
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            min_games: DEFAULT_MIN_GAMES,
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub player: String,
    pub games: String,
    pub value: String,
    pub leagues: String,
}

/// Prepends a medal glyph on the podium ranks.
pub fn medal_name(rank: usize, player: &str) -> String {
    match MEDALS.get(rank) {
        Some(medal) => format!("{medal} {player}"),
        None => player.to_string(),
    }
}

/// Filters to the minimum sample size, sorts by the metric, truncates to the
/// top N and formats for display. An empty filtered set yields a single
/// placeholder row so the board always has something to render.
pub fn build_ranking(stats: &[PlayerTotals], spec: RankingSpec) -> Vec<RankingRow> {
    let mut eligible: Vec<&PlayerTotals> = stats
        .iter()
        .filter(|t| t.games >= spec.min_games)
        .collect();

    if eligible.is_empty() {
        return vec![RankingRow {
            player: "N/A".to_string(),
            games: "N/A".to_string(),
            value: "N/A".to_string(),
            leagues: "N/A".to_string(),
        }];
    }

    eligible.sort_by(|a, b| {
        let va = spec.metric.value(a);
        let vb = spec.metric.value(b);
        let ord = va.total_cmp(&vb);
        if spec.metric.ascending() {
            ord
        } else {
            ord.reverse()
        }
    });
    eligible.truncate(spec.top_n);

    eligible
        .iter()
        .enumerate()
        .map(|(rank, t)| RankingRow {
            player: medal_name(rank, &t.player),
            games: t.games.to_string(),
            value: spec.metric.format(spec.metric.value(t)),
            leagues: t.leagues_label(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn totals(player: &str, games: u32, wins: u32, gf: u32, ga: u32) -> PlayerTotals {
        PlayerTotals {
            player: player.to_string(),
            games,
            wins,
            goals_for_ft: gf,
            goals_against_ft: ga,
            ..PlayerTotals::default()
        }
    }

    #[test]
    fn filters_sorts_and_medals() {
        let stats = vec![
            totals("low", 20, 5, 10, 10),
            totals("top", 20, 18, 40, 10),
            totals("mid", 20, 10, 20, 10),
            totals("fresh", 3, 3, 9, 0),
        ];
        let rows = build_ranking(&stats, RankingSpec::new(Metric::WinRate));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].player, "🥇 top");
        assert_eq!(rows[0].value, "90.00%");
        assert_eq!(rows[1].player, "🥈 mid");
        assert_eq!(rows[2].player, "🥉 low");
    }

    #[test]
    fn ascending_metric_puts_lowest_first() {
        let stats = vec![
            totals("heavy", 15, 0, 45, 0),
            totals("light", 15, 0, 3, 0),
        ];
        let rows = build_ranking(&stats, RankingSpec::new(Metric::GoalsScoredAvgWorst));
        assert_eq!(rows[0].player, "🥇 light");
        assert_eq!(rows[0].value, "0.20");
    }

    #[test]
    fn goal_diff_is_signed() {
        let stats = vec![totals("a", 12, 6, 30, 20), totals("b", 12, 2, 10, 25)];
        let rows = build_ranking(&stats, RankingSpec::new(Metric::GoalDiff));
        assert_eq!(rows[0].value, "+10");
        assert_eq!(rows[1].value, "-15");
    }

    #[test]
    fn empty_filter_yields_placeholder_row() {
        let stats = vec![totals("fresh", 2, 1, 4, 2)];
        let rows = build_ranking(&stats, RankingSpec::new(Metric::WinRate));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player, "N/A");
        assert_eq!(rows[0].value, "N/A");
    }

    #[test]
    fn top_n_truncates() {
        let stats: Vec<PlayerTotals> = (0..30)
            .map(|i| totals(&format!("p{i}"), 15, i % 15, 20, 10))
            .collect();
        let rows = build_ranking(&stats, RankingSpec::new(Metric::WinRate));
        assert_eq!(rows.len(), DEFAULT_TOP_N);
    }
}
