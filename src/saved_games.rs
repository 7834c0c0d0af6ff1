use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::live_fetch::LiveMatch;

/// Snapshot of a live matchup the user chose to track. Column captions match
/// the exported CSV exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedGame {
    #[serde(rename = "Hora")]
    pub hora: String,
    #[serde(rename = "Liga")]
    pub liga: String,
    #[serde(rename = "Mandante")]
    pub mandante: String,
    #[serde(rename = "Visitante")]
    pub visitante: String,
    #[serde(rename = "Sugestão HT")]
    pub sugestao_ht: String,
    #[serde(rename = "Sugestão FT")]
    pub sugestao_ft: String,
    #[serde(rename = "Data Salvamento")]
    pub data_salvamento: String,
}

impl SavedGame {
    pub fn from_live(m: &LiveMatch, saved_at: String) -> Self {
        Self {
            hora: m.hour.clone(),
            liga: m.league.clone(),
            mandante: m.home.clone(),
            visitante: m.away.clone(),
            sugestao_ht: m.suggestion_ht.to_string(),
            sugestao_ft: m.suggestion_ft.to_string(),
            data_salvamento: saved_at,
        }
    }
}

/// Owned per-session store of saved games. Lives only as long as the
/// dashboard session; the sole durable output is the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SavedGames {
    games: Vec<SavedGame>,
}

impl SavedGames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save(&mut self, game: SavedGame) {
        self.games.push(game);
    }

    pub fn clear(&mut self) {
        self.games.clear();
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn games(&self) -> &[SavedGame] {
        &self.games
    }

    pub fn export_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for game in &self.games {
            writer.serialize(game).context("serialize saved game")?;
        }
        let bytes = writer.into_inner().context("flush csv writer")?;
        String::from_utf8(bytes).context("csv output is not utf-8")
    }

    pub fn import_csv(raw: &str) -> Result<Self> {
        let mut reader = csv::Reader::from_reader(raw.as_bytes());
        let mut games = Vec::new();
        for row in reader.deserialize() {
            games.push(row.context("decode saved game row")?);
        }
        Ok(Self { games })
    }
}
