use std::fs;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing_subscriber::EnvFilter;

use esoccer_terminal::ai_prediction;
use esoccer_terminal::live_fetch;
use esoccer_terminal::markets;
use esoccer_terminal::page_fetch;
use esoccer_terminal::player_stats::RecentStats;
use esoccer_terminal::profit;
use esoccer_terminal::radar::{self, FT_CRITERIA, HT_CRITERIA};
use esoccer_terminal::rankings::{self, RankingSpec, ALL_METRICS};
use esoccer_terminal::results_fetch;
use esoccer_terminal::smart_tips;
use esoccer_terminal::state::{AppState, ManualFocus, Tab, TABS};

const EXPORT_PATH: &str = "jogos_salvos.csv";

struct App {
    state: AppState,
    should_quit: bool,
    refresh: Duration,
    last_refresh: Instant,
}

impl App {
    fn new() -> Self {
        let refresh = std::env::var("REFRESH_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(60)
            .max(10);
        Self {
            state: AppState::new(),
            should_quit: false,
            refresh: Duration::from_secs(refresh),
            last_refresh: Instant::now(),
        }
    }

    /// Recomputes the whole pipeline. Fetches go through the page cache, so a
    /// reload inside the TTL window reuses the last pages.
    fn reload(&mut self) {
        let results = results_fetch::fetch_results();
        let live = live_fetch::fetch_live_board(&results);
        self.state.apply_snapshot(results, live);
        self.last_refresh = Instant::now();
    }

    fn force_reload(&mut self) {
        page_fetch::invalidate_cache();
        self.reload();
        self.state.push_log("[INFO] Atualização manual concluída");
    }

    fn maybe_refresh(&mut self) {
        if self.last_refresh.elapsed() >= self.refresh {
            self.reload();
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('r') | KeyCode::Char('R') => self.force_reload(),
            KeyCode::Char(c @ '1'..='8') => {
                let idx = (c as u8 - b'1') as usize;
                if let Some(tab) = TABS.get(idx) {
                    self.state.tab = *tab;
                }
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.state.select_prev(),
            KeyCode::Char('s') if self.state.tab == Tab::AoVivo => {
                self.state.save_selected_live();
            }
            KeyCode::Char('l') | KeyCode::Char('L') if self.state.tab == Tab::Dicas => {
                self.state.cycle_tips_league();
            }
            KeyCode::Char('m') if self.state.tab == Tab::Rankings => {
                self.state.cycle_ranking_metric();
            }
            KeyCode::Tab if self.state.tab == Tab::Manual => {
                self.state.manual.focus = self.state.manual.focus.next();
            }
            KeyCode::Enter if self.state.tab == Tab::Manual => {
                self.state.run_manual_analysis();
            }
            KeyCode::Char('+') | KeyCode::Char('=') if self.state.tab == Tab::Ganhos => {
                self.state.odds_up();
            }
            KeyCode::Char('-') | KeyCode::Char('_') if self.state.tab == Tab::Ganhos => {
                self.state.odds_down();
            }
            KeyCode::Char('u') if self.state.tab == Tab::Salvos => {
                self.state.refresh_settlement();
            }
            KeyCode::Char('x') if self.state.tab == Tab::Salvos => {
                self.state.clear_saved();
            }
            KeyCode::Char('e') if self.state.tab == Tab::Salvos => self.export_saved(),
            _ => {}
        }
    }

    fn export_saved(&mut self) {
        if self.state.saved.is_empty() {
            self.state.push_log("[INFO] Nenhum jogo salvo para exportar");
            return;
        }
        match self.state.saved.export_csv() {
            Ok(csv) => match fs::write(EXPORT_PATH, csv) {
                Ok(()) => {
                    self.state
                        .push_log(format!("[INFO] Jogos exportados para {EXPORT_PATH}"));
                }
                Err(err) => {
                    tracing::warn!(error = %err, "csv export failed");
                    self.state.push_log(format!("[WARN] Falha ao exportar: {err}"));
                }
            },
            Err(err) => {
                tracing::warn!(error = %err, "csv serialize failed");
                self.state.push_log(format!("[WARN] Falha ao exportar: {err}"));
            }
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let mut app = App::new();
    app.reload();
    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

/// File logging only on request: a subscriber on stdout would fight the
/// alternate screen.
fn init_tracing() -> io::Result<()> {
    let Ok(path) = std::env::var("ESOCCER_LOG") else {
        return Ok(());
    };
    let file = fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        app.maybe_refresh();

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state));
    frame.render_widget(header, chunks[0]);

    match app.state.tab {
        Tab::AoVivo => render_live(frame, chunks[1], &app.state),
        Tab::Radar => render_radar(frame, chunks[1], &app.state),
        Tab::Dicas => render_tips(frame, chunks[1], &app.state),
        Tab::Previsao => render_predictions(frame, chunks[1], &app.state),
        Tab::Rankings => render_rankings(frame, chunks[1], &app.state),
        Tab::Manual => render_manual(frame, chunks[1], &app.state),
        Tab::Ganhos => render_profit(frame, chunks[1], &app.state),
        Tab::Salvos => render_saved(frame, chunks[1], &app.state),
    }

    let console = Paragraph::new(console_text(&app.state))
        .block(Block::default().title("Console").borders(Borders::TOP));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state)).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let updated = state
        .last_refresh
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    let tabs = TABS
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let marker = if *tab == state.tab { "*" } else { " " };
            format!("{}{} {}", marker, i + 1, tab.label())
        })
        .collect::<Vec<_>>()
        .join(" |");
    format!("FIFALGO TERMINAL | Última atualização: {updated}\n{tabs}")
}

fn footer_text(state: &AppState) -> String {
    let common = "1-8 Abas | j/k Mover | r Atualizar | ? Ajuda | q Sair";
    match state.tab {
        Tab::AoVivo => format!("{common} | s Salvar jogo"),
        Tab::Dicas => format!("{common} | l Trocar liga"),
        Tab::Rankings => format!("{common} | m Trocar métrica"),
        Tab::Manual => format!("{common} | Tab Foco | Enter Analisar"),
        Tab::Ganhos => format!("{common} | +/- Odds"),
        Tab::Salvos => format!("{common} | u Atualizar análise | x Limpar | e Exportar CSV"),
        _ => common.to_string(),
    }
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "Sem avisos".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn live_columns() -> [Constraint; 10] {
    [
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(16),
        Constraint::Length(16),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(16),
        Constraint::Length(12),
        Constraint::Length(12),
    ]
}

fn render_live(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(area);

    let widths = live_columns();
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(sections[0]);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let captions = [
        "Hora",
        "Liga",
        "Mandante",
        "Visitante",
        "GP",
        "GC",
        "Over Mandante",
        "Over Visitante",
        "Sugestão HT",
        "Sugestão FT",
    ];
    for (col, caption) in header_cols.iter().zip(captions) {
        frame.render_widget(Paragraph::new(caption).style(bold), *col);
    }

    render_live_detail(frame, sections[2], state);

    let list_area = sections[1];
    if state.live.is_empty() {
        let empty = Paragraph::new("⏳ Nenhuma partida ao vivo no momento")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(state.selected, state.live.len(), visible);

    for (i, idx) in (start..end).enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let selected = idx == state.selected;
        let row_style = if selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        if selected {
            frame.render_widget(Block::default().style(row_style), row_area);
        }

        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);

        let m = &state.live[idx];
        let cells = [
            m.hour.clone(),
            m.league.clone(),
            m.home.clone(),
            m.away.clone(),
            format!("{:.2}", m.gp),
            format!("{:.2}", m.gc),
            m.over_home.clone(),
            m.over_away.clone(),
            m.suggestion_ht.to_string(),
            m.suggestion_ft.to_string(),
        ];
        for (col, cell) in cols.iter().zip(cells) {
            frame.render_widget(Paragraph::new(cell).style(row_style), *col);
        }
    }
}

/// Per-threshold hit pairs of the highlighted matchup, one line per period.
fn render_live_detail(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::TOP);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(m) = state.selected_live() else {
        return;
    };
    let (hs, vs) = (&m.home_stats, &m.away_stats);

    let cell = |label: &str, home_hits: u32, away_hits: u32| {
        let pair = markets::format_pair(home_hits, hs.games, away_hits, vs.games).replace('\n', "·");
        format!("{label} {pair}")
    };

    let summary = format!(
        "{} x {} | Gols HT {} | Gols FT {:.2} | J1 {} jogos | J2 {} jogos",
        m.home,
        m.away,
        markets::format_goals_ht(m.goals_ht),
        m.goals_ft,
        hs.games,
        vs.games
    );
    let ht_line = [
        cell("0.5 HT", hs.over_05_ht, vs.over_05_ht),
        cell("1.5 HT", hs.over_15_ht, vs.over_15_ht),
        cell("2.5 HT", hs.over_25_ht, vs.over_25_ht),
        cell("BTTS HT", hs.btts_ht, vs.btts_ht),
        cell("BTTS FT", hs.btts_ft, vs.btts_ft),
    ]
    .join("   ");
    let ft_line = [
        cell("0.5 FT", hs.over_05_ft, vs.over_05_ft),
        cell("1.5 FT", hs.over_15_ft, vs.over_15_ft),
        cell("2.5 FT", hs.over_25_ft, vs.over_25_ft),
        cell("3.5 FT", hs.over_35_ft, vs.over_35_ft),
        cell("4.5 FT", hs.over_45_ft, vs.over_45_ft),
        cell("5.5 FT", hs.over_55_ft, vs.over_55_ft),
        cell("6.5 FT", hs.over_65_ft, vs.over_65_ft),
    ]
    .join("   ");

    let text = format!("{summary}\n{ht_line}\n{ft_line}");
    frame.render_widget(Paragraph::new(text), inner);
}

fn percent_style(percent: u32) -> Style {
    if percent >= 80 {
        Style::default().fg(Color::Green)
    } else if percent >= 60 {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn render_radar(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = radar::build_radar(&state.live);
    if rows.is_empty() {
        let empty = Paragraph::new("Nenhum dado para o Radar")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut header = format!("{:<14} {:>9} {:>9}", "Liga", "Média HT", "Média FT");
    for (label, _) in HT_CRITERIA {
        header.push_str(&format!(" {label:>7}"));
    }
    for (label, _) in FT_CRITERIA {
        header.push_str(&format!(" {label:>7}"));
    }
    lines.push(Line::styled(
        header,
        Style::default().add_modifier(Modifier::BOLD),
    ));

    for row in &rows {
        let mut spans = vec![Span::raw(format!(
            "{:<14} {:>9.2} {:>9.2}",
            row.league, row.avg_goals_ht, row.avg_goals_ft
        ))];
        for pct in row.ht_pcts.iter().chain(row.ft_pcts.iter()) {
            spans.push(Span::styled(
                format!(" {:>6}%", pct),
                percent_style(*pct),
            ));
        }
        lines.push(Line::from(spans));
    }

    let block = Block::default()
        .title("Radar de Ligas (médias previstas dos jogos ao vivo)")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_tips(frame: &mut Frame, area: Rect, state: &AppState) {
    let league = state.tips_league_name();
    let tips = smart_tips::league_tips(&state.results, league);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let mut lines = vec![Line::styled(
        format!(
            "{:<4} {:<20} {:>5} {:>10} {:>10} {:>10} {:>8} {:>8}",
            "Pos", "Jogador", "Jogos", "Ov2.5FT%", "Ov3.5FT%", "Ov1.5HT%", "GM Méd", "GS Méd"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if tips.is_empty() {
        lines.push(Line::raw(format!(
            "Nenhum jogador com mínimo de {} jogos na liga {league}",
            smart_tips::MIN_GAMES
        )));
    }
    let selected = state.tips_selected.min(tips.len().saturating_sub(1));
    for (i, tip) in tips.iter().enumerate() {
        let style = if i == selected {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else {
            Style::default()
        };
        lines.push(Line::styled(
            format!(
                "{:<4} {:<20} {:>5} {:>9}% {:>9}% {:>9}% {:>8.2} {:>8.2}",
                i + 1,
                rankings::medal_name(i, &tip.player),
                tip.games,
                tip.over_25_ft,
                tip.over_35_ft,
                tip.over_15_ht,
                tip.goals_for_avg,
                tip.goals_against_avg
            ),
            style,
        ));
    }

    let board = Block::default()
        .title(format!("Dicas Inteligentes - Liga: {league}"))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(board), sections[0]);

    let report_text = match tips.get(selected) {
        Some(tip) => {
            let mut out = vec![format!("Relatório de Desempenho: {}", tip.player)];
            out.extend(smart_tips::player_report(tip));
            out.join("\n")
        }
        None => "Selecione um jogador".to_string(),
    };
    let report = Block::default()
        .title("Relatório de Consistência")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(report_text).block(report), sections[1]);
}

fn render_predictions(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = ai_prediction::build_predictions(&state.results);

    let mut lines = vec![Line::styled(
        format!(
            "{:<20} {:<14} {:>9} {:>6} {:<14} {:>6} {:>7}",
            "Jogador", "Mercado", "Sequência", "Taxa", "Liga", "Jogos", "Score"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if rows.is_empty() {
        lines.push(Line::raw(
            "Nenhuma sequência relevante nos últimos 20 jogos de cada liga",
        ));
    }

    let start = state.prediction_scroll.min(rows.len().saturating_sub(1));
    for row in rows.iter().skip(start) {
        lines.push(Line::raw(format!(
            "{:<20} {:<14} {:>9} {:>5.0}% {:<14} {:>6} {:>7.1}",
            row.player, row.market, row.streak, row.rate, row.league, row.games, row.score
        )));
    }

    let block = Block::default()
        .title("Previsão IA - melhores sequências (últimos 20 jogos por liga)")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let metric = ALL_METRICS[state.ranking_metric % ALL_METRICS.len()];
    let rows = rankings::build_ranking(&state.totals, RankingSpec::new(metric));

    let mut lines = vec![Line::styled(
        format!(
            "{:<24} {:>6} {:>14}  {}",
            "Jogador",
            "Jogos",
            metric.label(),
            "Ligas"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    for row in &rows {
        lines.push(Line::raw(format!(
            "{:<24} {:>6} {:>14}  {}",
            row.player, row.games, row.value, row.leagues
        )));
    }

    let block = Block::default()
        .title(format!("Ranking por {}", metric.label()))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn recent_stats_text(player: &str, window: usize, stats: &RecentStats) -> String {
    if stats.games == 0 {
        return format!("Sem dados recentes para {player} nos últimos {window} jogos");
    }
    [
        format!("{player} (últimos {} jogos)", stats.games),
        format!(
            "Ataque FT/HT: {:.2} / {:.2} gols por jogo",
            stats.avg_goals_for_ft(),
            stats.avg_goals_for_ht()
        ),
        format!(
            "Defesa FT/HT: {:.2} / {:.2} gols sofridos",
            stats.avg_goals_against_ft(),
            stats.avg_goals_against_ht()
        ),
        format!(
            "Over 0.5/1.5/2.5 HT: {:.2}% / {:.2}% / {:.2}%",
            stats.pct_over_05_ht(),
            stats.pct_over_15_ht(),
            stats.pct_over_25_ht()
        ),
        format!(
            "Over 2.5 FT: {:.2}% | Under 2.5 FT: {:.2}% | BTTS FT: {:.2}%",
            stats.pct_over_25_ft(),
            stats.pct_under_25_ft(),
            stats.pct_btts_ft()
        ),
        format!(
            "Sequências: V {} | D {} | E {} | BTTS {} | Over 2.5 FT {}",
            stats.win_streak,
            stats.loss_streak,
            stats.draw_streak,
            stats.btts_streak,
            stats.over_25_ft_streak
        ),
    ]
    .join("\n")
}

fn render_manual(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);

    let manual = &state.manual;
    let player_name = |idx: usize| {
        state
            .players
            .get(idx)
            .map(String::as_str)
            .unwrap_or("(nenhum)")
    };
    let mark = |focus: ManualFocus| if manual.focus == focus { ">" } else { " " };
    let selectors = format!(
        "{} Jogador 1: {:<20} {} Jogador 2: {:<20}\n{} Confrontos diretos (máx. 10): {:<3} {} Jogos individuais (máx. 20): {:<3}",
        mark(ManualFocus::Player1),
        player_name(manual.player1),
        mark(ManualFocus::Player2),
        player_name(manual.player2),
        mark(ManualFocus::H2hWindow),
        manual.h2h_window,
        mark(ManualFocus::IndividualWindow),
        manual.individual_window,
    );
    let selector_block = Block::default()
        .title("Análise Manual - Tab move o foco, j/k ajusta, Enter analisa")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(selectors).block(selector_block), sections[0]);

    let Some(report) = &manual.report else {
        let hint = Paragraph::new("Selecione dois jogadores e pressione Enter")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hint, sections[1]);
        return;
    };

    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(sections[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(body[0]);

    let left = Paragraph::new(recent_stats_text(
        &report.player1,
        manual.individual_window,
        &report.recent1,
    ))
    .block(Block::default().title("Desempenho Individual").borders(Borders::ALL));
    frame.render_widget(left, columns[0]);

    let right = Paragraph::new(recent_stats_text(
        &report.player2,
        manual.individual_window,
        &report.recent2,
    ))
    .block(Block::default().title("Desempenho Individual").borders(Borders::ALL));
    frame.render_widget(right, columns[1]);

    let h2h = &report.h2h;
    let mut h2h_lines = Vec::new();
    if h2h.rows.is_empty() {
        h2h_lines.push(format!(
            "Sem confrontos diretos recentes entre {} e {}",
            report.player1, report.player2
        ));
    } else {
        h2h_lines.push(format!(
            "Últimos {} confrontos | Média Gols HT {:.2} | FT {:.2} | BTTS {:.2}%",
            h2h.rows.len(),
            h2h.avg_goals_ht,
            h2h.avg_goals_ft,
            h2h.btts_pct
        ));
        h2h_lines.push(format!(
            "Sugestão HT: {} | Sugestão FT: {}",
            h2h.best_line_ht, h2h.best_line_ft
        ));
        if let Some(tip) = &report.btts_tip {
            h2h_lines.push(format!("Sugestão adicional: {tip}"));
        }
        for m in h2h.rows.iter().rev() {
            h2h_lines.push(format!(
                "{} {} {} {}x{} ({}x{} HT) {}",
                m.date, m.league, m.home, m.home_ft, m.away_ft, m.home_ht, m.away_ht, m.away
            ));
        }
    }
    let h2h_block = Block::default()
        .title("Confrontos Diretos")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(h2h_lines.join("\n")).block(h2h_block), body[1]);
}

fn profit_style(value: f64) -> Style {
    if value > 0.0 {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else if value < 0.0 {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Yellow)
    }
}

fn render_profit(frame: &mut Frame, area: Rect, state: &AppState) {
    let Some(player) = state.players.get(state.profit_player) else {
        let empty = Paragraph::new("Nenhum jogador disponível para análise")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };
    let Some(totals) = state.totals.iter().find(|t| &t.player == player) else {
        return;
    };

    let profits = profit::player_market_profits(totals, state.odds);

    let mut lines = vec![
        Line::raw(format!(
            "Jogador: {player} (j/k troca) | Total de jogos: {} | Odds: {:.2} (+/-)",
            totals.games, state.odds
        )),
        Line::raw(""),
        Line::styled(
            format!(
                "{:<22} {:>6} {:>8} {:>10} {:>10}",
                "Mercado", "Jogos", "Acertos", "Taxa", "Lucro (u)"
            ),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    for p in &profits {
        lines.push(Line::from(vec![
            Span::raw(format!(
                "{:<22} {:>6} {:>8} {:>9.2}% ",
                p.market, p.games, p.hits, p.hit_rate
            )),
            Span::styled(format!("{:>10.2}", p.profit), profit_style(p.profit)),
        ]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "Análise de Mercados:",
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let mut ordered = profits.clone();
    ordered.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    for p in &ordered {
        let (glyph, verdict) = if p.profit > 0.0 {
            ("✅", "Lucrativo")
        } else {
            ("❌", "Prejuízo")
        };
        lines.push(Line::styled(
            format!(
                "{glyph} {}: {verdict} com {:.2}% de acerto, {:+.2} unidades em {} jogos",
                p.market, p.hit_rate, p.profit, p.games
            ),
            profit_style(p.profit),
        ));
    }

    let block = Block::default()
        .title("Ganhos & Perdas por Jogador")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_saved(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Percentage(40),
            Constraint::Percentage(25),
        ])
        .split(area);

    let mut saved_lines = vec![Line::styled(
        format!(
            "{:<6} {:<12} {:<16} {:<16} {:<12} {:<12} {}",
            "Hora", "Liga", "Mandante", "Visitante", "Sug. HT", "Sug. FT", "Salvo em"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if state.saved.is_empty() {
        saved_lines.push(Line::raw(
            "Nenhum jogo salvo. Use 's' na aba Ao Vivo para salvar.",
        ));
    }
    for game in state.saved.games() {
        saved_lines.push(Line::raw(format!(
            "{:<6} {:<12} {:<16} {:<16} {:<12} {:<12} {}",
            game.hora,
            game.liga,
            game.mandante,
            game.visitante,
            game.sugestao_ht,
            game.sugestao_ft,
            game.data_salvamento
        )));
    }
    let saved_block = Block::default()
        .title(format!("Jogos Salvos ({})", state.saved.len()))
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(saved_lines).block(saved_block), sections[0]);

    let mut settle_lines: Vec<Line> = Vec::new();
    match &state.settlement {
        Some(report) => {
            settle_lines.push(Line::styled(
                format!(
                    "{:<6} {:<12} {:<28} {:<16} {:>9} {:>9} {:>9} {:>9}",
                    "Hora", "Data", "Jogo", "Status", "Res. HT", "Lucro HT", "Res. FT", "Lucro FT"
                ),
                Style::default().add_modifier(Modifier::BOLD),
            ));
            for row in &report.rows {
                let fmt_result = |r: Option<(u32, u32)>| match r {
                    Some((h, a)) => format!("{h}-{a}"),
                    None => "N/D".to_string(),
                };
                settle_lines.push(Line::from(vec![
                    Span::raw(format!(
                        "{:<6} {:<12} {:<28} {:<16} {:>9} ",
                        row.hour,
                        row.date,
                        row.matchup,
                        row.status.label(),
                        fmt_result(row.result_ht),
                    )),
                    Span::styled(format!("{:>8.2}u", row.profit_ht), profit_style(row.profit_ht)),
                    Span::raw(format!(" {:>9} ", fmt_result(row.result_ft))),
                    Span::styled(format!("{:>8.2}u", row.profit_ft), profit_style(row.profit_ft)),
                ]));
            }
            settle_lines.push(Line::from(vec![
                Span::raw(format!(
                    "Jogos analisados: {} | Greens HT {} Reds HT {} | Greens FT {} Reds FT {} | ",
                    report.settled_games,
                    report.ht_greens,
                    report.ht_reds,
                    report.ft_greens,
                    report.ft_reds
                )),
                Span::styled(
                    format!(
                        "Lucro (odd 1.60): HT {:+.2}u FT {:+.2}u",
                        report.total_ht_profit, report.total_ft_profit
                    ),
                    profit_style(report.total_ht_profit + report.total_ft_profit),
                ),
            ]));
        }
        None => settle_lines.push(Line::raw("Pressione 'u' para atualizar a análise de resultados")),
    }
    let settle_block = Block::default()
        .title("Análise de Resultados")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(settle_lines).block(settle_block), sections[1]);

    let mut proj_lines = vec![Line::styled(
        format!(
            "{:>5} {:>6} {:>9} {:>8} {:>9} {:>8} {:>10} {:>10} {:>11}",
            "Odd", "Jogos", "Greens HT", "Reds HT", "Greens FT", "Reds FT", "Lucro HT", "Lucro FT", "Lucro Total"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if state.projection.is_empty() {
        proj_lines.push(Line::raw("Sem projeção: atualize a análise com 'u'"));
    }
    for row in &state.projection {
        proj_lines.push(Line::from(vec![
            Span::raw(format!(
                "{:>5.2} {:>6} {:>9} {:>8} {:>9} {:>8} ",
                row.odds, row.games, row.ht_greens, row.ht_reds, row.ft_greens, row.ft_reds
            )),
            Span::styled(format!("{:>9.2}u", row.profit_ht), profit_style(row.profit_ht)),
            Span::styled(format!(" {:>9.2}u", row.profit_ft), profit_style(row.profit_ft)),
            Span::styled(
                format!(" {:>10.2}u", row.profit_total),
                profit_style(row.profit_total),
            ),
        ]));
    }
    let proj_block = Block::default()
        .title("Projeção de Ganhos/Perdas (odds 1.50 - 3.00)")
        .borders(Borders::ALL);
    frame.render_widget(Paragraph::new(proj_lines).block(proj_block), sections[2]);
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }
    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "FIFAlgo Terminal - Ajuda",
        "",
        "Global:",
        "  1-8          Troca de aba",
        "  j/k ou ↑/↓   Move a seleção",
        "  r            Atualização manual (ignora o cache)",
        "  ?            Mostra/esconde esta ajuda",
        "  q            Sair",
        "",
        "Ao Vivo:       s salva o jogo destacado",
        "Dicas:         l troca a liga",
        "Rankings:      m troca a métrica",
        "Análise:       Tab muda o foco, Enter analisa",
        "Ganhos:        +/- ajusta as odds (1.50 a 3.00)",
        "Salvos:        u atualiza, x limpa, e exporta CSV",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Ajuda").borders(Borders::ALL));
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
