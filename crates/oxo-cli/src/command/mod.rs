use clap::{Parser, Subcommand};
use oxo_ai::{DepthSetError, Difficulty, DifficultySeed, DifficultySelector};

use self::{analyze::AnalyzeArg, auto_play::AutoPlayArg, play::PlayArg};
use crate::util;

mod analyze;
mod auto_play;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Log filter for stderr output, overriding `RUST_LOG` (e.g. `debug`, `oxo_ai=trace`)
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play against the computer in the terminal
    Play(#[clap(flatten)] PlayArg),
    /// Let the search play both sides and summarize the results
    AutoPlay(#[clap(flatten)] AutoPlayArg),
    /// Search a single position and print the result as JSON
    Analyze(#[clap(flatten)] AnalyzeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_tracing(args.log_level.as_deref())?;

    match args.mode.unwrap_or(Mode::Play(PlayArg::default())) {
        Mode::Play(arg) => play::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
        Mode::Analyze(arg) => analyze::run(&arg)?,
    }
    Ok(())
}

/// Builds a depth selector from `--depths` when given, else from the difficulty preset.
fn depth_selector(
    difficulty: Difficulty,
    depths: Option<&[usize]>,
    seed: DifficultySeed,
) -> Result<DifficultySelector, DepthSetError> {
    match depths {
        Some(depths) => DifficultySelector::from_depths(depths.iter().copied(), seed),
        None => Ok(DifficultySelector::with_seed(difficulty, seed)),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_args() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let args = CommandArgs::try_parse_from(["oxo"]).unwrap();
        assert!(args.mode.is_none());

        let args =
            CommandArgs::try_parse_from(["oxo", "analyze", "XX./.O./...", "--log-level", "debug"])
                .unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(matches!(args.mode, Some(Mode::Analyze(_))));

        let args = CommandArgs::try_parse_from(["oxo", "auto-play", "--games", "3"]).unwrap();
        assert!(matches!(args.mode, Some(Mode::AutoPlay(_))));

        assert!(
            CommandArgs::try_parse_from(["oxo", "play", "--difficulty", "impossible"]).is_err()
        );
        assert!(
            CommandArgs::try_parse_from(["oxo", "play", "--difficulty", "easy", "--depths", "3"])
                .is_err()
        );
        assert!(CommandArgs::try_parse_from(["oxo", "analyze", "XXX"]).is_err());
    }

    #[test]
    fn test_depth_selector() {
        let seed = DifficultySeed::from_u128(3);

        let preset = depth_selector(Difficulty::Easy, None, seed).unwrap();
        assert_eq!(preset.candidate_depths(), [1, 2]);
        assert_eq!(preset.seed(), seed);

        let custom = depth_selector(Difficulty::Easy, Some(&[3, 5]), seed).unwrap();
        assert_eq!(custom.candidate_depths(), [3, 5]);

        assert_eq!(
            depth_selector(Difficulty::Easy, Some(&[]), seed).unwrap_err(),
            DepthSetError::Empty
        );
        assert_eq!(
            depth_selector(Difficulty::Easy, Some(&[0]), seed).unwrap_err(),
            DepthSetError::ZeroDepth
        );
    }
}
