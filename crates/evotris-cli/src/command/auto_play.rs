use std::io::{self, Write as _};

use evotris_engine::{BoardSize, GameState, PieceSeed, TickOutcome};
use evotris_policy::{ObservationEncoder, PolicyController, policy::Topology};
use evotris_training::{episode::EpisodeRunner, operators::random_policy};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct AutoPlayArg {
    /// Seed for the policy weights and the piece sequence, as 32 hex digits
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Hidden layer width
    #[arg(long, default_value_t = 100)]
    hidden: usize,
    /// Print the board every N ticks
    #[arg(long)]
    frame_every: Option<u64>,
    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,
}

pub(crate) fn run(arg: &AutoPlayArg) -> anyhow::Result<()> {
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());
    let size = BoardSize::DEFAULT;

    let mut rng = Pcg32::from_seed(seed.to_bytes());
    let policy = random_policy(Topology::for_board(size, arg.hidden), &mut rng);
    let piece_seed: PieceSeed = rng.random();
    log::info!("auto-play seed={seed} piece_seed={piece_seed}");

    let runner = EpisodeRunner::new(size).with_max_ticks(arg.max_ticks);
    let mut controller = PolicyController::new(&policy, ObservationEncoder::for_size(size));
    let mut final_board = GameState::with_seed(size, piece_seed).render_board();
    let summary = runner.run_controller(
        &mut controller,
        piece_seed,
        |state: &GameState, outcome: &TickOutcome| {
            let ticks = state.stats().ticks();
            if arg.frame_every.is_some_and(|n| n > 0 && ticks.is_multiple_of(n)) {
                println!(
                    "tick {ticks} ({:?}) score {}",
                    outcome.action,
                    state.score()
                );
                println!("{}", state.render_board());
                println!();
            }
            final_board = state.render_board();
        },
    );

    let mut out = io::stdout().lock();
    writeln!(out, "{final_board}")?;
    writeln!(out)?;
    if summary.game_over {
        writeln!(out, "Game over")?;
    } else {
        writeln!(out, "Stopped after {} ticks", summary.ticks)?;
    }
    writeln!(out, "  Seed: {seed}")?;
    writeln!(out, "  Score: {}", summary.score)?;
    writeln!(out, "  Ticks: {}", summary.ticks)?;
    writeln!(out, "  Pieces: {}", summary.completed_pieces)?;
    writeln!(out, "  Lines: {}", summary.cleared_lines)?;

    Ok(())
}
