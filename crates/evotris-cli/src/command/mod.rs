use clap::{Parser, Subcommand};

use self::{auto_play::AutoPlayArg, train::TrainArg};

mod auto_play;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve a population of policies
    Train(#[clap(flatten)] TrainArg),
    /// Watch a freshly initialized policy play one game
    #[command(name = "auto-play")]
    AutoPlay(#[clap(flatten)] AutoPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::AutoPlay(arg) => auto_play::run(&arg)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;

    use super::*;

    #[test]
    fn test_command_definition() {
        CommandArgs::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let args = CommandArgs::try_parse_from(["evotris", "train", "--generations", "3"]).unwrap();
        assert!(matches!(args.mode, Mode::Train(_)));

        let args =
            CommandArgs::try_parse_from(["evotris", "auto-play", "--frame-every", "10"]).unwrap();
        assert!(matches!(args.mode, Mode::AutoPlay(_)));

        assert!(CommandArgs::try_parse_from(["evotris", "train", "--seed", "xyz"]).is_err());
    }
}
