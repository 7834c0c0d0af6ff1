use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::live_fetch::LiveMatch;
use crate::player_stats::{self, H2hSummary, PlayerTotals, RecentStats};
use crate::profit::{ProjectionRow, SettlementReport};
use crate::rankings::ALL_METRICS;
use crate::results_fetch::{MatchRecord, MAIN_LEAGUES};
use crate::saved_games::{SavedGame, SavedGames};

const LOG_CAPACITY: usize = 50;

pub const MAX_H2H_WINDOW: usize = 10;
pub const MAX_INDIVIDUAL_WINDOW: usize = 20;
pub const MIN_ODDS: f64 = 1.50;
pub const MAX_ODDS: f64 = 3.00;
pub const ODDS_STEP: f64 = 0.05;
pub const DEFAULT_ODDS: f64 = 1.90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    AoVivo,
    Radar,
    Dicas,
    Previsao,
    Rankings,
    Manual,
    Ganhos,
    Salvos,
}

pub const TABS: [Tab; 8] = [
    Tab::AoVivo,
    Tab::Radar,
    Tab::Dicas,
    Tab::Previsao,
    Tab::Rankings,
    Tab::Manual,
    Tab::Ganhos,
    Tab::Salvos,
];

impl Tab {
    pub fn label(self) -> &'static str {
        match self {
            Tab::AoVivo => "Ao Vivo",
            Tab::Radar => "Radar",
            Tab::Dicas => "Dicas",
            Tab::Previsao => "Previsão IA",
            Tab::Rankings => "Rankings",
            Tab::Manual => "Análise Manual",
            Tab::Ganhos => "Ganhos & Perdas",
            Tab::Salvos => "Jogos Salvos",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualFocus {
    Player1,
    Player2,
    H2hWindow,
    IndividualWindow,
}

impl ManualFocus {
    pub fn next(self) -> Self {
        match self {
            ManualFocus::Player1 => ManualFocus::Player2,
            ManualFocus::Player2 => ManualFocus::H2hWindow,
            ManualFocus::H2hWindow => ManualFocus::IndividualWindow,
            ManualFocus::IndividualWindow => ManualFocus::Player1,
        }
    }
}

/// Output of one manual head-to-head analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualReport {
    pub player1: String,
    pub player2: String,
    pub recent1: RecentStats,
    pub recent2: RecentStats,
    pub h2h: H2hSummary,
    pub btts_tip: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManualAnalysis {
    pub player1: usize,
    pub player2: usize,
    pub focus: ManualFocus,
    pub h2h_window: usize,
    pub individual_window: usize,
    pub report: Option<ManualReport>,
}

impl Default for ManualAnalysis {
    fn default() -> Self {
        Self {
            player1: 0,
            player2: 0,
            focus: ManualFocus::Player1,
            h2h_window: MAX_H2H_WINDOW,
            individual_window: 10,
            report: None,
        }
    }
}

/// Everything the dashboard renders from. All derived tables are rebuilt on
/// every refresh; nothing here is mutated incrementally.
pub struct AppState {
    pub tab: Tab,
    pub results: Vec<MatchRecord>,
    pub live: Vec<LiveMatch>,
    pub totals: Vec<PlayerTotals>,
    pub players: Vec<String>,
    pub selected: usize,
    pub tips_league: usize,
    pub tips_selected: usize,
    pub prediction_scroll: usize,
    pub ranking_metric: usize,
    pub profit_player: usize,
    pub odds: f64,
    pub manual: ManualAnalysis,
    pub saved: SavedGames,
    pub settlement: Option<SettlementReport>,
    pub projection: Vec<ProjectionRow>,
    pub logs: VecDeque<String>,
    pub last_refresh: Option<DateTime<Local>>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            tab: Tab::AoVivo,
            results: Vec::new(),
            live: Vec::new(),
            totals: Vec::new(),
            players: Vec::new(),
            selected: 0,
            tips_league: 0,
            tips_selected: 0,
            prediction_scroll: 0,
            ranking_metric: 0,
            profit_player: 0,
            odds: DEFAULT_ODDS,
            manual: ManualAnalysis::default(),
            saved: SavedGames::new(),
            settlement: None,
            projection: Vec::new(),
            logs: VecDeque::new(),
            last_refresh: None,
            help_overlay: false,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    /// Installs a freshly fetched snapshot and rebuilds every derived table.
    pub fn apply_snapshot(&mut self, results: Vec<MatchRecord>, live: Vec<LiveMatch>) {
        self.totals = player_stats::all_player_totals(&results);
        self.players = self.totals.iter().map(|t| t.player.clone()).collect();
        self.results = results;
        self.live = live;
        self.last_refresh = Some(Local::now());

        self.selected = clamp_index(self.selected, self.live.len());
        self.profit_player = clamp_index(self.profit_player, self.players.len());
        self.manual.player1 = clamp_index(self.manual.player1, self.players.len());
        self.manual.player2 = clamp_index(self.manual.player2, self.players.len());

        if self.results.is_empty() {
            self.push_log("[WARN] Nenhum resultado histórico disponível");
        }
        if self.live.is_empty() {
            self.push_log("[WARN] Nenhuma partida ao vivo no momento");
        }
    }

    pub fn selected_live(&self) -> Option<&LiveMatch> {
        self.live.get(self.selected)
    }

    pub fn tips_league_name(&self) -> &'static str {
        MAIN_LEAGUES[self.tips_league % MAIN_LEAGUES.len()]
    }

    pub fn cycle_tips_league(&mut self) {
        self.tips_league = (self.tips_league + 1) % MAIN_LEAGUES.len();
        self.tips_selected = 0;
    }

    pub fn cycle_ranking_metric(&mut self) {
        self.ranking_metric = (self.ranking_metric + 1) % ALL_METRICS.len();
    }

    pub fn odds_up(&mut self) {
        self.odds = (self.odds + ODDS_STEP).min(MAX_ODDS);
    }

    pub fn odds_down(&mut self) {
        self.odds = (self.odds - ODDS_STEP).max(MIN_ODDS);
    }

    /// Moves whatever selection the active tab owns.
    pub fn select_next(&mut self) {
        match self.tab {
            Tab::AoVivo => self.selected = next_index(self.selected, self.live.len()),
            Tab::Dicas => self.tips_selected = self.tips_selected.saturating_add(1),
            Tab::Previsao => self.prediction_scroll = self.prediction_scroll.saturating_add(1),
            Tab::Ganhos => {
                self.profit_player = next_index(self.profit_player, self.players.len());
            }
            Tab::Manual => self.manual_adjust(1),
            _ => {}
        }
    }

    pub fn select_prev(&mut self) {
        match self.tab {
            Tab::AoVivo => self.selected = prev_index(self.selected),
            Tab::Dicas => self.tips_selected = self.tips_selected.saturating_sub(1),
            Tab::Previsao => self.prediction_scroll = self.prediction_scroll.saturating_sub(1),
            Tab::Ganhos => self.profit_player = prev_index(self.profit_player),
            Tab::Manual => self.manual_adjust(-1),
            _ => {}
        }
    }

    fn manual_adjust(&mut self, delta: i64) {
        match self.manual.focus {
            ManualFocus::Player1 => {
                self.manual.player1 = step_index(self.manual.player1, delta, self.players.len());
            }
            ManualFocus::Player2 => {
                self.manual.player2 = step_index(self.manual.player2, delta, self.players.len());
            }
            ManualFocus::H2hWindow => {
                self.manual.h2h_window = step_window(self.manual.h2h_window, delta, MAX_H2H_WINDOW);
            }
            ManualFocus::IndividualWindow => {
                self.manual.individual_window =
                    step_window(self.manual.individual_window, delta, MAX_INDIVIDUAL_WINDOW);
            }
        }
    }

    /// Runs the manual head-to-head analysis for the currently selected pair.
    pub fn run_manual_analysis(&mut self) {
        let (Some(p1), Some(p2)) = (
            self.players.get(self.manual.player1).cloned(),
            self.players.get(self.manual.player2).cloned(),
        ) else {
            self.push_log("[INFO] Selecione ambos os jogadores");
            return;
        };
        if p1 == p2 {
            self.push_log("[WARN] Selecione jogadores diferentes");
            return;
        }

        let recent1 = player_stats::recent_stats(&self.results, &p1, self.manual.individual_window);
        let recent2 = player_stats::recent_stats(&self.results, &p2, self.manual.individual_window);
        let h2h = player_stats::head_to_head(&self.results, &p1, &p2, self.manual.h2h_window);
        let btts_tip = player_stats::btts_suggestion(&recent1, &recent2, &h2h);

        self.manual.report = Some(ManualReport {
            player1: p1,
            player2: p2,
            recent1,
            recent2,
            h2h,
            btts_tip,
        });
    }

    /// Saves the highlighted live matchup into the session store.
    pub fn save_selected_live(&mut self) {
        let Some(m) = self.selected_live() else {
            self.push_log("[INFO] Nenhum jogo selecionado");
            return;
        };
        let saved_at = Local::now().format("%d/%m/%Y %H:%M:%S").to_string();
        let game = SavedGame::from_live(m, saved_at);
        let label = format!("{} x {}", game.mandante, game.visitante);
        self.saved.save(game);
        self.push_log(format!("[INFO] Jogo salvo: {label}"));
    }

    /// Settles saved games against the current results table and rebuilds the
    /// odds-sweep projection. The settlement table uses a fixed 1.60 base
    /// odd; the projection sweeps the full range.
    pub fn refresh_settlement(&mut self) {
        let now = Local::now().time();
        self.settlement = Some(crate::profit::settle_saved_games(
            self.saved.games(),
            &self.results,
            1.60,
            now,
        ));
        self.projection = crate::profit::profit_projection(self.saved.games(), &self.results);
        self.push_log("[INFO] Análise de resultados atualizada");
    }

    pub fn clear_saved(&mut self) {
        self.saved.clear();
        self.settlement = None;
        self.projection.clear();
        self.push_log("[INFO] Jogos salvos removidos");
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { index.min(len - 1) }
}

fn next_index(index: usize, len: usize) -> usize {
    if len == 0 { 0 } else { (index + 1).min(len - 1) }
}

fn prev_index(index: usize) -> usize {
    index.saturating_sub(1)
}

fn step_index(index: usize, delta: i64, len: usize) -> usize {
    if delta >= 0 {
        next_index(index, len)
    } else {
        prev_index(index)
    }
}

fn step_window(value: usize, delta: i64, max: usize) -> usize {
    if delta >= 0 {
        (value + 1).min(max)
    } else {
        value.saturating_sub(1).max(1)
    }
}
