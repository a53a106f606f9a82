use std::{
    io::{self, BufRead as _, Write as _},
    path::PathBuf,
    sync::mpsc,
    thread,
};

use anyhow::{Context as _, anyhow};
use oxo_ai::{AiPlayer, Difficulty, DifficultySeed, DifficultySelector, TurnReport, play_turn};
use oxo_engine::{GameResult, GameSession, InvalidMoveError, Move, Side};
use rand::Rng as _;
use tracing::{debug, info};

use super::depth_selector;
use crate::record::RecordedGame;

const DEFAULT_RECORD_DIR: &str = "./data/recordings/";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// AI strength (easy, normal or hard)
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,
    /// Custom candidate depths for the AI, e.g. `4,6` (instead of `--difficulty`)
    #[arg(long, value_delimiter = ',', conflicts_with = "difficulty")]
    depths: Option<Vec<usize>>,
    /// Seed for the AI's depth selection, in hex (random if omitted)
    #[arg(long)]
    seed: Option<DifficultySeed>,
    /// Save the game recording to a file when the game ends
    #[arg(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[arg(long, default_value = DEFAULT_RECORD_DIR)]
    record_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            depths: None,
            seed: None,
            save_recording: false,
            record_dir: PathBuf::from(DEFAULT_RECORD_DIR),
        }
    }
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let PlayArg {
        difficulty,
        depths,
        seed,
        save_recording,
        record_dir,
    } = arg;

    let seed = seed.unwrap_or_else(|| rand::rng().random());
    let selector = depth_selector(*difficulty, depths.as_deref(), seed)?;
    info!(depths = ?selector.candidate_depths(), %seed, "starting game");

    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    match depths {
        Some(_) => writeln!(
            stdout,
            "You are X, the AI is O. Search depths: {:?}",
            selector.candidate_depths()
        )?,
        None => writeln!(stdout, "You are X, the AI is O. Difficulty: {difficulty}")?,
    }

    let worker = AiWorker::spawn(GameSession::new(Side::Human), AiPlayer::new(selector));
    let mut session = GameSession::new(Side::Human);
    let mut turns = vec![];

    loop {
        write!(stdout, "\n{}", session.board().grid(session.is_finished()))?;
        if session.is_finished() {
            writeln!(stdout, "{}", result_message(session.result()))?;
            break;
        }

        write!(stdout, "Your move (1-9 or row,col; q to quit): ")?;
        stdout.flush()?;
        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "q" | "quit") {
            break;
        }

        let mv = match line.parse::<Move>() {
            Ok(mv) => mv,
            Err(e) => {
                writeln!(stdout, "{e}")?;
                continue;
            }
        };

        writeln!(stdout, "AI is thinking...")?;
        let (next_session, report) = worker.play_turn(mv)?;
        session = next_session;
        match report {
            Ok(report) => {
                if let Some(ai_move) = report.ai_move {
                    writeln!(
                        stdout,
                        "AI plays {} (cell {})",
                        ai_move.mv,
                        ai_move.mv.index() + 1
                    )?;
                }
                turns.push(report);
            }
            Err(e) => writeln!(stdout, "{e}")?,
        }
    }

    let ai = worker.shutdown()?;

    if *save_recording {
        let recording = RecordedGame::new(ai.selector(), &session, turns);
        let path = recording.save(record_dir)?;
        eprintln!("Recording saved to {}", path.display());
    }

    Ok(())
}

fn result_message(result: GameResult) -> &'static str {
    match result {
        GameResult::HumanWins => "You have won!",
        GameResult::AiWins => "The AI has won!",
        GameResult::Draw => "Nobody has won!",
        GameResult::InProgress => "",
    }
}

type TurnResponse = (GameSession, Result<TurnReport, InvalidMoveError>);

/// Runs the game on a background thread so the search never blocks the
/// thread reading input.
///
/// The worker owns the authoritative session; every response carries a
/// snapshot of it for display.
#[derive(Debug)]
struct AiWorker {
    tx: mpsc::Sender<Move>,
    rx: mpsc::Receiver<TurnResponse>,
    handle: thread::JoinHandle<AiPlayer<DifficultySelector>>,
}

impl AiWorker {
    fn spawn(session: GameSession, ai: AiPlayer<DifficultySelector>) -> Self {
        let (tx_move, rx_move) = mpsc::channel();
        let (tx_response, rx_response) = mpsc::channel();
        let handle = thread::spawn(move || ai_thread(session, ai, &rx_move, &tx_response));
        Self {
            tx: tx_move,
            rx: rx_response,
            handle,
        }
    }

    fn play_turn(&self, mv: Move) -> anyhow::Result<TurnResponse> {
        self.tx
            .send(mv)
            .map_err(|_| anyhow!("AI worker stopped unexpectedly"))?;
        self.rx.recv().context("AI worker stopped unexpectedly")
    }

    /// Stops the worker and hands back the AI player it owned.
    fn shutdown(self) -> anyhow::Result<AiPlayer<DifficultySelector>> {
        let Self { tx, rx: _, handle } = self;
        // Closing the channel ends the worker loop
        drop(tx);
        handle.join().map_err(|_| anyhow!("AI worker panicked"))
    }
}

fn ai_thread(
    mut session: GameSession,
    mut ai: AiPlayer<DifficultySelector>,
    rx: &mpsc::Receiver<Move>,
    tx: &mpsc::Sender<TurnResponse>,
) -> AiPlayer<DifficultySelector> {
    while let Ok(mv) = rx.recv() {
        let report = play_turn(&mut session, mv, &mut ai);
        debug!(?report, "turn processed");
        if tx.send((session.clone(), report)).is_err() {
            break;
        }
    }
    ai
}
