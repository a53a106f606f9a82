use std::path::PathBuf;

use oxo_ai::{
    DepthSelector as _, DepthSetError, Difficulty, DifficultySeed, SearchOutcome, search,
};
use oxo_engine::{Board, GameResult, Move, Side};
use rand::Rng as _;
use serde::Serialize;

use super::depth_selector;
use crate::util::Output;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Board in compact form, e.g. `XX./.O./...` (X = human, O = AI)
    board: Board,
    /// Side to search for (human or ai)
    #[arg(long, default_value_t = Side::Ai)]
    side: Side,
    /// Search depth; defaults to the number of empty cells (a full search)
    #[arg(long, conflicts_with = "preset")]
    depth: Option<usize>,
    /// Draw the depth from a difficulty preset instead
    #[arg(long, group = "preset")]
    difficulty: Option<Difficulty>,
    /// Draw the depth from custom candidate depths instead, e.g. `4,6`
    #[arg(long, value_delimiter = ',', group = "preset")]
    depths: Option<Vec<usize>>,
    /// Seed in hex for `--difficulty` or `--depths` (random if omitted)
    #[arg(long, requires = "preset")]
    seed: Option<DifficultySeed>,
    /// Output file path (stdout if omitted)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
struct AnalysisReport {
    board: Board,
    side: Side,
    result: GameResult,
    legal_moves: Vec<Move>,
    depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    candidate_depths: Option<Vec<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<DifficultySeed>,
    #[serde(flatten)]
    outcome: SearchOutcome,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let report = analyze(arg)?;
    Output::save_json(&report, arg.output.clone())?;
    Ok(())
}

fn analyze(arg: &AnalyzeArg) -> Result<AnalysisReport, DepthSetError> {
    let AnalyzeArg {
        board,
        side,
        depth,
        difficulty,
        depths,
        seed,
        output: _,
    } = arg;

    let remaining = board.remaining_moves();
    let mut candidate_depths = None;
    let mut used_seed = None;
    let depth = match depth {
        Some(depth) => usize::min(*depth, remaining),
        None if difficulty.is_some() || depths.is_some() => {
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let mut selector =
                depth_selector(difficulty.unwrap_or_default(), depths.as_deref(), seed)?;
            candidate_depths = Some(selector.candidate_depths().to_vec());
            used_seed = Some(selector.seed());
            selector.select_depth(remaining)
        }
        None => remaining,
    };

    Ok(AnalysisReport {
        board: *board,
        side: *side,
        result: board.game_result(),
        legal_moves: board.legal_moves().to_vec(),
        depth,
        candidate_depths,
        seed: used_seed,
        outcome: search(*board, depth, *side),
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use oxo_engine::Score;

    use super::*;

    #[derive(Debug, Parser)]
    struct Wrapper {
        #[clap(flatten)]
        arg: AnalyzeArg,
    }

    fn analyze_ok(arg: &AnalyzeArg) -> AnalysisReport {
        analyze(arg).unwrap()
    }

    fn parse(args: &[&str]) -> AnalyzeArg {
        Wrapper::try_parse_from(std::iter::once("analyze").chain(args.iter().copied()))
            .unwrap()
            .arg
    }

    #[test]
    fn test_analyze_blocking_position() {
        let report = analyze_ok(&parse(&["XX./.O./..."]));
        assert_eq!(report.depth, 6);
        assert_eq!(report.outcome.best_move, Move::new(0, 2));
        assert_eq!(report.outcome.score, Score::DRAW);
        assert_eq!(report.legal_moves.len(), 6);
        assert_eq!(report.result, GameResult::InProgress);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["board"], "XX./.O./...");
        assert_eq!(json["best_move"], "0,2");
        assert_eq!(json["side"], "ai");
        assert!(json.get("seed").is_none());
        assert!(json.get("candidate_depths").is_none());
    }

    #[test]
    fn test_analyze_depth_options() {
        let report = analyze_ok(&parse(&["X../.../...", "--depth", "20", "--side", "human"]));
        assert_eq!(report.depth, 8);
        assert_eq!(report.side, Side::Human);

        let report = analyze_ok(&parse(&[
            "X../.../...",
            "--difficulty",
            "easy",
            "--seed",
            "1f",
        ]));
        assert!([1, 2].contains(&report.depth));
        assert_eq!(report.seed, Some(DifficultySeed::from_u128(0x1f)));
        assert_eq!(report.candidate_depths, Some(vec![1, 2]));

        let report = analyze_ok(&parse(&["X../.../...", "--depths", "3", "--seed", "2"]));
        assert_eq!(report.depth, 3);
        assert_eq!(report.candidate_depths, Some(vec![3]));
        assert_eq!(report.seed, Some(DifficultySeed::from_u128(2)));

        assert_eq!(
            analyze(&parse(&["X../.../...", "--depths", "0"])).unwrap_err(),
            DepthSetError::ZeroDepth
        );

        let conflicting = Wrapper::try_parse_from([
            "analyze",
            "X../.../...",
            "--depth",
            "1",
            "--difficulty",
            "easy",
        ]);
        assert!(conflicting.is_err());

        let both_presets = Wrapper::try_parse_from([
            "analyze",
            "X../.../...",
            "--difficulty",
            "easy",
            "--depths",
            "3",
        ]);
        assert!(both_presets.is_err());
        let conflicting =
            Wrapper::try_parse_from(["analyze", "X../.../...", "--depth", "1", "--depths", "3"]);
        assert!(conflicting.is_err());
        let orphan_seed = Wrapper::try_parse_from(["analyze", "X../.../...", "--seed", "1"]);
        assert!(orphan_seed.is_err());
    }

    #[test]
    fn test_analyze_finished_board() {
        let report = analyze_ok(&parse(&["XXX/OO./..."]));
        assert_eq!(report.result, GameResult::HumanWins);
        assert_eq!(report.outcome.best_move, None);
        assert_eq!(report.outcome.score, Score::HUMAN_WIN);
    }
}
