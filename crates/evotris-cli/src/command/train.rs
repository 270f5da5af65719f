use std::path::PathBuf;

use anyhow::Context;
use evotris_engine::PieceSeed;
use evotris_training::trainer::{GenerationReport, PopulationTrainer};
use rand::Rng as _;

use crate::config::{self, TrainerOverrides};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Training configuration JSON file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of generations to run
    #[arg(long, default_value_t = 100)]
    generations: usize,
    #[arg(long)]
    population_size: Option<usize>,
    /// Number of top performers eligible as parents
    #[arg(long)]
    top_k: Option<usize>,
    /// Scale of the Gaussian mutation noise
    #[arg(long)]
    mutation_rate: Option<f32>,
    /// Hidden layer width
    #[arg(long)]
    hidden: Option<usize>,
    /// Trainer seed as 32 hex digits (random if omitted)
    #[arg(long)]
    seed: Option<PieceSeed>,
    /// Tick cap per episode
    #[arg(long)]
    max_ticks: Option<u64>,
    /// Evaluate individuals in parallel (`--parallel=false` overrides the config file)
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    parallel: Option<bool>,
}

impl TrainArg {
    fn overrides(&self) -> TrainerOverrides {
        TrainerOverrides {
            population_size: self.population_size,
            top_k: self.top_k,
            mutation_rate: self.mutation_rate,
            hidden: self.hidden,
            max_ticks: self.max_ticks,
            parallel: self.parallel,
        }
    }
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let config = config::load_trainer_config(arg.config.as_deref(), &arg.overrides())?;
    let seed = arg.seed.unwrap_or_else(|| rand::rng().random());

    eprintln!("Training configuration:");
    eprintln!(
        "  {}",
        serde_json::to_string(&config).context("Failed to serialize training configuration")?
    );
    eprintln!("  Generations: {}", arg.generations);
    eprintln!("  Seed: {seed}");

    let mut trainer = PopulationTrainer::new(config, seed)?;
    trainer.train(arg.generations, print_report);

    eprintln!();
    eprintln!("Training complete");
    eprintln!("  Generations: {}", trainer.generation());
    if let Some((fitness, policy)) = trainer.best() {
        let topology = policy.topology();
        eprintln!("  Best fitness: {fitness}");
        eprintln!(
            "  Topology: {} -> {} -> {}",
            topology.input, topology.hidden, topology.output
        );
    }

    Ok(())
}

fn print_report(report: &GenerationReport) {
    let stats = &report.fitness_stats;
    eprintln!("Generation #{}:", report.generation);
    eprintln!("  Fitness: {:?}", report.fitness());
    eprintln!(
        "  Ranking: {:?}",
        report.ranking.iter().map(|r| r.index).collect::<Vec<_>>()
    );
    eprintln!("  Fitness Stats:");
    eprintln!("    Min:    {:.1}", stats.min);
    eprintln!("    Max:    {:.1}", stats.max);
    eprintln!("    Mean:   {:.1}", stats.mean);
    eprintln!("    Median: {:.1}", stats.median);
    eprintln!("    StdDev: {:.1}", stats.std_dev);
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[derive(Debug, clap::Parser)]
    struct TrainCli {
        #[command(flatten)]
        arg: TrainArg,
    }

    fn parallel_override(flags: &[&str]) -> Option<bool> {
        let args = std::iter::once("train").chain(flags.iter().copied());
        TrainCli::try_parse_from(args).unwrap().arg.overrides().parallel
    }

    #[test]
    fn test_parallel_flag() {
        assert_eq!(parallel_override(&[]), None);
        assert_eq!(parallel_override(&["--parallel"]), Some(true));
        assert_eq!(parallel_override(&["--parallel=true"]), Some(true));
        assert_eq!(parallel_override(&["--parallel=false"]), Some(false));
    }
}
