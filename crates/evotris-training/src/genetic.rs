//! Population, ranking, and reproduction.
//!
//! One generation of the genetic algorithm:
//!
//! 1. **Evaluate Fitness** - [`Population::evaluate_fitness`] plays one episode per
//!    individual and records the final score
//! 2. **Rank** - [`rank`] orders `(index, fitness)` pairs by descending fitness;
//!    the sort is stable, so ties keep population order
//! 3. **Reproduce** - [`PopulationEvolver::evolve`] builds exactly as many children
//!    as there are individuals, each from two distinct parents drawn from the
//!    top-K, combined with [`crossover`] and perturbed with [`mutate`]
//!
//! Evaluation can run on scoped threads, one per individual. Episode seeds are
//! supplied by the caller, so the parallel and sequential paths produce the
//! same fitness values.

use std::{panic, thread};

use evotris_engine::PieceSeed;
use evotris_policy::policy::{Policy, Topology};
use evotris_stats::descriptive::DescriptiveStats;
use rand::{Rng, seq::index};
use serde::{Deserialize, Serialize};

use crate::{
    episode::{EpisodeRunner, EpisodeSummary},
    operators::{crossover, mutate, random_policy},
};

/// A policy and the fitness of its latest episode.
#[derive(Debug, Clone)]
pub struct Individual {
    policy: Policy,
    fitness: Option<usize>,
}

impl Individual {
    #[must_use]
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            fitness: None,
        }
    }

    #[must_use]
    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    /// Returns the fitness, or `None` before the first evaluation.
    #[must_use]
    pub fn fitness(&self) -> Option<usize> {
        self.fitness
    }
}

/// Ordered collection of individuals of a single topology.
#[derive(Debug, Clone)]
pub struct Population {
    individuals: Vec<Individual>,
}

/// Ranking entry: an individual's position in the evaluated population and
/// its fitness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeResult {
    pub index: usize,
    pub fitness: usize,
}

/// Sorts results by descending fitness, keeping input order among ties.
///
/// # Examples
///
/// ```
/// use evotris_training::genetic::{EpisodeResult, rank};
///
/// let ranked = rank([300, 100, 300, 0].into_iter().enumerate().map(
///     |(index, fitness)| EpisodeResult { index, fitness },
/// ));
/// let order = ranked.iter().map(|r| r.index).collect::<Vec<_>>();
/// assert_eq!(order, vec![0, 2, 1, 3]);
/// ```
pub fn rank<I>(results: I) -> Vec<EpisodeResult>
where
    I: IntoIterator<Item = EpisodeResult>,
{
    let mut results = results.into_iter().collect::<Vec<_>>();
    results.sort_by(|a, b| b.fitness.cmp(&a.fitness));
    results
}

impl Population {
    /// Creates `count` individuals with N(0, 1) weights.
    #[must_use]
    pub fn random<R>(topology: Topology, count: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count)
            .map(|_| Individual::new(random_policy(topology, rng)))
            .collect();
        Self { individuals }
    }

    /// # Panics
    ///
    /// Panics if the policies do not all share one topology.
    #[must_use]
    pub fn from_policies(policies: Vec<Policy>) -> Self {
        if let Some(first) = policies.first() {
            let topology = first.topology();
            assert!(
                policies.iter().all(|p| p.topology() == topology),
                "all policies in a population must share one topology"
            );
        }
        Self {
            individuals: policies.into_iter().map(Individual::new).collect(),
        }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Plays one episode per individual, `seeds[i]` for individual `i`, and
    /// records each final score as fitness.
    ///
    /// Returns the episode summaries in population order.
    ///
    /// # Panics
    ///
    /// Panics if `seeds.len()` differs from the population size.
    pub fn evaluate_fitness(
        &mut self,
        runner: &EpisodeRunner,
        seeds: &[PieceSeed],
        parallel: bool,
    ) -> Vec<EpisodeSummary> {
        assert_eq!(
            seeds.len(),
            self.individuals.len(),
            "one episode seed is required per individual"
        );

        let summaries = if parallel {
            thread::scope(|s| {
                let handles = self
                    .individuals
                    .iter()
                    .zip(seeds)
                    .map(|(ind, seed)| s.spawn(move || runner.run(&ind.policy, *seed)))
                    .collect::<Vec<_>>();
                handles
                    .into_iter()
                    .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                    .collect::<Vec<_>>()
            })
        } else {
            self.individuals
                .iter()
                .zip(seeds)
                .map(|(ind, seed)| runner.run(&ind.policy, *seed))
                .collect()
        };

        for (ind, summary) in self.individuals.iter_mut().zip(&summaries) {
            ind.fitness = Some(summary.fitness());
        }
        summaries
    }

    /// Returns `(index, fitness)` for every evaluated individual, in
    /// population order.
    #[must_use]
    pub fn results(&self) -> Vec<EpisodeResult> {
        self.individuals
            .iter()
            .enumerate()
            .filter_map(|(index, ind)| {
                ind.fitness.map(|fitness| EpisodeResult { index, fitness })
            })
            .collect()
    }

    /// Descriptive statistics of the recorded fitness values.
    ///
    /// Returns `None` if no individual has been evaluated.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<DescriptiveStats> {
        DescriptiveStats::from_scores(self.individuals.iter().filter_map(|ind| ind.fitness))
    }
}

/// Reproduction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top-ranked individuals eligible as parents. At least 2.
    pub top_k: usize,
    /// Scale of the Gaussian noise added to every child weight.
    pub mutation_rate: f32,
}

impl PopulationEvolver {
    /// Builds the next generation.
    ///
    /// For each of the `population.len()` children, two distinct parents are
    /// drawn uniformly from the first `top_k` entries of `ranking`; the child
    /// is their mean plus `mutation_rate × N(0, 1)` noise on every weight.
    ///
    /// # Panics
    ///
    /// Panics if `top_k < 2`, or if `ranking` has fewer than `top_k` entries.
    #[must_use]
    pub fn evolve<R>(
        &self,
        population: &Population,
        ranking: &[EpisodeResult],
        rng: &mut R,
    ) -> Population
    where
        R: Rng + ?Sized,
    {
        assert!(self.top_k >= 2, "at least two top performers are required");
        assert!(
            ranking.len() >= self.top_k,
            "ranking has fewer entries than top_k"
        );
        let parents = &ranking[..self.top_k];

        let individuals = (0..population.len())
            .map(|_| {
                let picked = index::sample(rng, parents.len(), 2);
                let p1 = &population.individuals[parents[picked.index(0)].index];
                let p2 = &population.individuals[parents[picked.index(1)].index];
                let mut child = crossover(&p1.policy, &p2.policy);
                mutate(&mut child, self.mutation_rate, rng);
                Individual::new(child)
            })
            .collect();
        Population { individuals }
    }
}
