use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use oxo_ai::{DifficultySeed, DifficultySelector, TurnReport};
use oxo_engine::{Board, GameResult, GameSession, PlayedMove};
use serde::{Deserialize, Serialize};

use crate::util::Output;

/// A finished (or abandoned) interactive game, as saved by `oxo play --save-recording`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedGame {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed of the AI's depth selection; replaying the same human moves with
    /// it reproduces the game
    pub seed: DifficultySeed,
    /// Depths the AI drew from for each reply
    pub depths: Vec<usize>,
    pub result: GameResult,
    pub final_board: Board,
    /// Every move in order, both sides
    pub moves: Vec<PlayedMove>,
    /// Per-turn details, including the depth and score of each AI reply
    pub turns: Vec<TurnReport>,
}

impl RecordedGame {
    pub fn new(
        selector: &DifficultySelector,
        session: &GameSession,
        turns: Vec<TurnReport>,
    ) -> Self {
        Self {
            recorded_at: Utc::now(),
            seed: selector.seed(),
            depths: selector.candidate_depths().to_vec(),
            result: session.result(),
            final_board: *session.board(),
            moves: session.history().to_vec(),
            turns,
        }
    }

    /// Saves the recording as `game_{YYYYMMDD_HHMMSS}.json` under `record_dir`.
    ///
    /// The directory is created if it doesn't exist. Returns the path written.
    pub fn save(&self, record_dir: &Path) -> anyhow::Result<PathBuf> {
        let filename = format!("game_{}.json", self.recorded_at.format("%Y%m%d_%H%M%S"));
        let path = record_dir.join(filename);
        let mut output = Output::create(path.clone())
            .with_context(|| format!("Failed to save recording to {}", record_dir.display()))?;
        output.write_json(self)?;
        Ok(path)
    }
}
