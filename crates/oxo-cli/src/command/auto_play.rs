use std::{num::NonZeroUsize, path::PathBuf, thread};

use anyhow::anyhow;
use oxo_ai::{AiPlayer, DepthSetError, Difficulty, DifficultySeed, DifficultySelector};
use oxo_engine::{Board, GameResult, GameSession, Side};
use rand::Rng as _;
use serde::Serialize;
use tracing::{debug, info, instrument};

use super::depth_selector;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: usize,
    /// Strength of the AI side
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,
    /// Custom candidate depths for the AI side, e.g. `4,6` (instead of `--difficulty`)
    #[arg(long, value_delimiter = ',', conflicts_with = "difficulty")]
    depths: Option<Vec<usize>>,
    /// Strength of the search playing the human side
    #[arg(long, default_value_t = Difficulty::Easy)]
    human_difficulty: Difficulty,
    /// Base seed in hex; every game derives its own seeds from it (random if omitted)
    #[arg(long)]
    seed: Option<DifficultySeed>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct AutoPlaySummary {
    seed: DifficultySeed,
    ai_depths: Vec<usize>,
    human_difficulty: Difficulty,
    games: usize,
    human_wins: usize,
    ai_wins: usize,
    draws: usize,
    records: Vec<GameRecord>,
}

#[derive(Debug, Clone, Serialize)]
struct GameRecord {
    index: usize,
    ai_seed: DifficultySeed,
    first: Side,
    result: GameResult,
    moves: usize,
    final_board: Board,
}

/// Configuration shared by every game of a run.
#[derive(Debug, Clone)]
struct Matchup {
    seed: DifficultySeed,
    ai_depths: Vec<usize>,
    human_difficulty: Difficulty,
}

impl Matchup {
    fn new(
        seed: DifficultySeed,
        difficulty: Difficulty,
        depths: Option<&[usize]>,
        human_difficulty: Difficulty,
    ) -> Result<Self, DepthSetError> {
        let selector = depth_selector(difficulty, depths, seed)?;
        Ok(Self {
            seed,
            ai_depths: selector.candidate_depths().to_vec(),
            human_difficulty,
        })
    }

    /// Seeds for the AI and human selectors of game `index`.
    fn game_seeds(&self, index: usize) -> (DifficultySeed, DifficultySeed) {
        let base = self.seed.to_u128().wrapping_add(2 * index as u128);
        (
            DifficultySeed::from_u128(base),
            DifficultySeed::from_u128(base.wrapping_add(1)),
        )
    }

    /// Plays game `index` to the end. Even games start with the human side.
    #[instrument(level = "debug", skip(self))]
    fn play_game(&self, index: usize) -> anyhow::Result<GameRecord> {
        let (ai_seed, human_seed) = self.game_seeds(index);
        let mut ai = AiPlayer::new(DifficultySelector::from_depths(
            self.ai_depths.iter().copied(),
            ai_seed,
        )?);
        let mut human =
            AiPlayer::new(DifficultySelector::with_seed(self.human_difficulty, human_seed));

        let first = if index % 2 == 0 { Side::Human } else { Side::Ai };
        let mut session = GameSession::new(first);
        while !session.is_finished() {
            let played = match session.to_move() {
                Side::Human => human.play(&mut session)?,
                Side::Ai => ai.play(&mut session)?,
            };
            if played.is_none() {
                break;
            }
        }
        debug!(result = %session.result(), board = %session.board(), "game finished");

        Ok(GameRecord {
            index,
            ai_seed: ai.selector().seed(),
            first,
            result: session.result(),
            moves: session.history().len(),
            final_board: *session.board(),
        })
    }
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let AutoPlayArg {
        games,
        difficulty,
        depths,
        human_difficulty,
        seed,
        output,
    } = arg;

    let matchup = Matchup::new(
        seed.unwrap_or_else(|| rand::rng().random()),
        *difficulty,
        depths.as_deref(),
        *human_difficulty,
    )?;
    info!(games, seed = %matchup.seed, ai_depths = ?matchup.ai_depths, "starting auto-play");

    let summary = play_games(&matchup, *games)?;
    eprintln!(
        "{} games: AI {} / human {} / draw {}",
        summary.games, summary.ai_wins, summary.human_wins, summary.draws
    );
    Output::save_json(&summary, output.clone())?;
    Ok(())
}

fn play_games(matchup: &Matchup, games: usize) -> anyhow::Result<AutoPlaySummary> {
    let workers = thread::available_parallelism()
        .map_or(1, NonZeroUsize::get)
        .min(games.max(1));

    let mut records = thread::scope(|s| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                s.spawn(move || {
                    (worker..games)
                        .step_by(workers)
                        .map(|index| matchup.play_game(index))
                        .collect::<anyhow::Result<Vec<_>>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("auto-play worker panicked"))?
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?
    .into_iter()
    .flatten()
    .collect::<Vec<_>>();
    records.sort_by_key(|record| record.index);

    let count = |result: GameResult| records.iter().filter(|r| r.result == result).count();
    Ok(AutoPlaySummary {
        seed: matchup.seed,
        ai_depths: matchup.ai_depths.clone(),
        human_difficulty: matchup.human_difficulty,
        games,
        human_wins: count(GameResult::HumanWins),
        ai_wins: count(GameResult::AiWins),
        draws: count(GameResult::Draw),
        records,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup(difficulty: Difficulty, human_difficulty: Difficulty) -> Matchup {
        Matchup::new(
            DifficultySeed::from_u128(42),
            difficulty,
            None,
            human_difficulty,
        )
        .unwrap()
    }

    #[test]
    fn test_perfect_play_always_draws() {
        let summary = play_games(&matchup(Difficulty::Hard, Difficulty::Hard), 4).unwrap();
        assert_eq!(summary.games, 4);
        assert_eq!(summary.draws, 4);
        assert!(summary.records.iter().all(|r| r.moves == 9));
        assert_eq!(summary.records[0].first, Side::Human);
        assert_eq!(summary.records[1].first, Side::Ai);
    }

    #[test]
    fn test_hard_ai_never_loses() {
        let summary = play_games(&matchup(Difficulty::Hard, Difficulty::Easy), 20).unwrap();
        assert_eq!(summary.human_wins, 0);
        assert_eq!(summary.ai_wins + summary.draws, 20);
        let indices: Vec<_> = summary.records.iter().map(|r| r.index).collect();
        assert_eq!(indices, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_games_are_reproducible() {
        let m = matchup(Difficulty::Normal, Difficulty::Easy);
        for index in 0..6 {
            let a = m.play_game(index).unwrap();
            let b = m.play_game(index).unwrap();
            assert_eq!(a.final_board, b.final_board);
            assert_eq!(a.result, b.result);
            assert!(a.result.is_finished());
        }
    }

    #[test]
    fn test_custom_ai_depths() {
        let seed = DifficultySeed::from_u128(42);
        let m = Matchup::new(seed, Difficulty::Easy, Some(&[9]), Difficulty::Hard).unwrap();
        let summary = play_games(&m, 4).unwrap();
        assert_eq!(summary.ai_depths, [9]);
        assert_eq!(summary.draws, 4);
        assert_eq!(summary.records[0].ai_seed, seed);
        assert_eq!(summary.records[3].ai_seed, DifficultySeed::from_u128(42 + 6));

        assert_eq!(
            Matchup::new(seed, Difficulty::Easy, Some(&[4, 0]), Difficulty::Easy).unwrap_err(),
            DepthSetError::ZeroDepth
        );
    }

    #[test]
    fn test_zero_games() {
        let summary = play_games(&matchup(Difficulty::Easy, Difficulty::Easy), 0).unwrap();
        assert_eq!(summary.games, 0);
        assert!(summary.records.is_empty());
    }
}
