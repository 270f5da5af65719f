use evotris_engine::{BoardSize, PieceSeed};
use evotris_policy::policy::{Policy, Topology};
use evotris_stats::descriptive::DescriptiveStats;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    episode::{EpisodeRunner, EpisodeSummary},
    genetic::{EpisodeResult, Population, PopulationEvolver, rank},
};

/// Training parameters.
///
/// Every field has a default, so a configuration file only needs the fields
/// it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainerConfig {
    pub population_size: usize,
    /// Number of top-ranked individuals eligible as parents.
    pub top_k: usize,
    pub mutation_rate: f32,
    pub topology: Topology,
    pub board_size: BoardSize,
    /// Tick cap per episode; `None` plays every game to game over.
    pub max_ticks: Option<u64>,
    /// Evaluate individuals on one thread each.
    pub parallel: bool,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            population_size: 5,
            top_k: 2,
            mutation_rate: 0.01,
            topology: Topology::DEFAULT,
            board_size: BoardSize::DEFAULT,
            max_ticks: None,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("top_k must be at least 2, got {top_k}")]
    TopKTooSmall { top_k: usize },
    #[display("population_size ({population_size}) must be at least top_k ({top_k})")]
    PopulationTooSmall { population_size: usize, top_k: usize },
    #[display("topology input width {input} does not match the {cells} board cells")]
    TopologyMismatch { input: usize, cells: usize },
    #[display("topology output width {output} does not match the {actions} controller actions")]
    OutputMismatch { output: usize, actions: usize },
    #[display("mutation_rate must be finite and non-negative, got {rate}")]
    InvalidMutationRate { rate: f32 },
}

impl TrainerConfig {
    /// Checks the constraints the trainer relies on.
    ///
    /// # Examples
    ///
    /// ```
    /// use evotris_training::trainer::{ConfigError, TrainerConfig};
    ///
    /// assert_eq!(TrainerConfig::default().validate(), Ok(()));
    ///
    /// let config = TrainerConfig { top_k: 1, ..TrainerConfig::default() };
    /// assert_eq!(config.validate(), Err(ConfigError::TopKTooSmall { top_k: 1 }));
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k < 2 {
            return Err(ConfigError::TopKTooSmall { top_k: self.top_k });
        }
        if self.population_size < self.top_k {
            return Err(ConfigError::PopulationTooSmall {
                population_size: self.population_size,
                top_k: self.top_k,
            });
        }
        let cells = self.board_size.cell_count();
        if self.topology.input != cells {
            return Err(ConfigError::TopologyMismatch {
                input: self.topology.input,
                cells,
            });
        }
        let actions = Topology::DEFAULT.output;
        if self.topology.output != actions {
            return Err(ConfigError::OutputMismatch {
                output: self.topology.output,
                actions,
            });
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return Err(ConfigError::InvalidMutationRate {
                rate: self.mutation_rate,
            });
        }
        Ok(())
    }
}

/// Outcome of one generation.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Zero-based generation number.
    pub generation: usize,
    /// Episode of each individual, in population order.
    pub episodes: Vec<EpisodeSummary>,
    /// `(index, fitness)` by descending fitness.
    pub ranking: Vec<EpisodeResult>,
    pub fitness_stats: DescriptiveStats,
}

impl GenerationReport {
    /// Fitness of each individual, in population order.
    #[must_use]
    pub fn fitness(&self) -> Vec<usize> {
        self.episodes.iter().map(EpisodeSummary::fitness).collect()
    }

    /// Best individual of the generation; the earliest one among ties.
    ///
    /// Returns `None` when the ranking is empty.
    #[must_use]
    pub fn best(&self) -> Option<EpisodeResult> {
        self.ranking.first().copied()
    }
}

/// Runs the evaluate → rank → reproduce loop.
///
/// All randomness comes from one PCG32 seeded at construction: episode seeds
/// for a generation are drawn before evaluation, then reproduction draws
/// parents and mutation noise.
#[derive(Debug, Clone)]
pub struct PopulationTrainer {
    config: TrainerConfig,
    rng: Pcg32,
    runner: EpisodeRunner,
    evolver: PopulationEvolver,
    population: Population,
    generation: usize,
    best: Option<(usize, Policy)>,
}

impl PopulationTrainer {
    /// Validates `config` and creates the initial random population.
    pub fn new(config: TrainerConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::from_seed(seed.to_bytes());
        let population = Population::random(config.topology, config.population_size, &mut rng);
        let runner = EpisodeRunner::new(config.board_size).with_max_ticks(config.max_ticks);
        let evolver = PopulationEvolver {
            top_k: config.top_k,
            mutation_rate: config.mutation_rate,
        };
        Ok(Self {
            config,
            rng,
            runner,
            evolver,
            population,
            generation: 0,
            best: None,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Population to be evaluated by the next generation.
    #[must_use]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Number of completed generations.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Highest-scoring policy evaluated so far and its fitness.
    #[must_use]
    pub fn best(&self) -> Option<(usize, &Policy)> {
        self.best.as_ref().map(|(fitness, policy)| (*fitness, policy))
    }

    /// Evaluates the current population, then replaces it with its children.
    pub fn run_generation(&mut self) -> GenerationReport {
        let seeds = (0..self.population.len())
            .map(|_| self.rng.random())
            .collect::<Vec<PieceSeed>>();
        let episodes = self
            .population
            .evaluate_fitness(&self.runner, &seeds, self.config.parallel);
        let ranking = rank(self.population.results());
        // Population size is at least top_k >= 2, so there is always a result.
        let fitness_stats = DescriptiveStats::from_scores(ranking.iter().map(|r| r.fitness))
            .unwrap_or_else(|| unreachable!("evaluated population is empty"));

        let top = ranking[0];
        if self.best.as_ref().is_none_or(|(fitness, _)| top.fitness > *fitness) {
            let policy = self.population.individuals()[top.index].policy().clone();
            self.best = Some((top.fitness, policy));
        }

        log::info!(
            "generation {}: best={} mean={:.1} median={:.1} min={}",
            self.generation,
            fitness_stats.max,
            fitness_stats.mean,
            fitness_stats.median,
            fitness_stats.min
        );

        self.population = self
            .evolver
            .evolve(&self.population, &ranking, &mut self.rng);
        let report = GenerationReport {
            generation: self.generation,
            episodes,
            ranking,
            fitness_stats,
        };
        self.generation += 1;
        report
    }

    /// Runs `generations` generations, passing each report to
    /// `on_generation`.
    pub fn train<F>(&mut self, generations: usize, mut on_generation: F)
    where
        F: FnMut(&GenerationReport),
    {
        for _ in 0..generations {
            let report = self.run_generation();
            on_generation(&report);
        }
    }
}
