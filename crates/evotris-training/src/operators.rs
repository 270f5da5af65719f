//! Genetic operators on policies.
//!
//! - **Initialization**: [`random_policy`] draws every weight from N(0, 1)
//! - **Crossover**: [`crossover`] averages two parents elementwise
//! - **Mutation**: [`mutate`] adds `rate × N(0, 1)` to every weight

use evotris_policy::{
    matrix::Matrix,
    policy::{Policy, Topology},
};
use rand::Rng;
use rand_distr::StandardNormal;

/// Creates a policy with i.i.d. standard normal weights.
pub fn random_policy<R>(topology: Topology, rng: &mut R) -> Policy
where
    R: Rng + ?Sized,
{
    let input_hidden = Matrix::from_fn(topology.input, topology.hidden, |_, _| {
        rng.sample(StandardNormal)
    });
    let hidden_output = Matrix::from_fn(topology.hidden, topology.output, |_, _| {
        rng.sample(StandardNormal)
    });
    Policy::from_matrices(input_hidden, hidden_output)
}

/// Adds independent `rate × N(0, 1)` noise to every weight of both layers.
///
/// A rate of zero leaves the policy unchanged.
pub fn mutate<R>(policy: &mut Policy, rate: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    for weight in policy.weights_mut() {
        let noise: f32 = rng.sample(StandardNormal);
        *weight += rate * noise;
    }
}

/// Returns the elementwise mean of two policies.
///
/// # Panics
///
/// Panics if the parents have different topologies.
///
/// # Examples
///
/// ```
/// use evotris_policy::{matrix::Matrix, policy::Policy};
/// use evotris_training::operators::crossover;
///
/// let a = Policy::from_matrices(Matrix::from_vec(1, 1, vec![1.0]), Matrix::from_vec(1, 1, vec![-2.0]));
/// let b = Policy::from_matrices(Matrix::from_vec(1, 1, vec![3.0]), Matrix::from_vec(1, 1, vec![2.0]));
/// let child = crossover(&a, &b);
/// assert_eq!(child.matrices()[0].as_slice(), &[2.0]);
/// assert_eq!(child.matrices()[1].as_slice(), &[0.0]);
/// ```
#[must_use]
pub fn crossover(a: &Policy, b: &Policy) -> Policy {
    assert_eq!(
        a.topology(),
        b.topology(),
        "parent policies must have the same topology"
    );
    let [a_in, a_out] = a.matrices();
    let [b_in, b_out] = b.matrices();
    Policy::from_matrices(
        a_in.zip_map(b_in, f32::midpoint),
        a_out.zip_map(b_out, f32::midpoint),
    )
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const TOPOLOGY: Topology = Topology {
        input: 8,
        hidden: 5,
        output: 4,
    };

    #[test]
    fn test_random_policy_shape_and_distribution() {
        let mut rng = Pcg32::seed_from_u64(1);
        let policy = random_policy(Topology::DEFAULT, &mut rng);
        assert_eq!(policy.topology(), Topology::DEFAULT);

        let weights = policy
            .matrices()
            .iter()
            .flat_map(|m| m.as_slice().iter().copied())
            .collect::<Vec<_>>();
        #[expect(clippy::cast_precision_loss)]
        let n = weights.len() as f32;
        let mean = weights.iter().sum::<f32>() / n;
        let variance = weights.iter().map(|w| (w - mean).powi(2)).sum::<f32>() / n;
        assert!(mean.abs() < 0.05, "mean {mean}");
        assert!((variance - 1.0).abs() < 0.1, "variance {variance}");
    }

    #[test]
    fn test_random_policy_is_reproducible() {
        let a = random_policy(TOPOLOGY, &mut Pcg32::seed_from_u64(9));
        let b = random_policy(TOPOLOGY, &mut Pcg32::seed_from_u64(9));
        let c = random_policy(TOPOLOGY, &mut Pcg32::seed_from_u64(10));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_crossover_with_itself_is_identity() {
        let a = random_policy(TOPOLOGY, &mut Pcg32::seed_from_u64(2));
        assert_eq!(crossover(&a, &a), a);
    }

    #[test]
    fn test_crossover_is_symmetric() {
        let mut rng = Pcg32::seed_from_u64(3);
        let a = random_policy(TOPOLOGY, &mut rng);
        let b = random_policy(TOPOLOGY, &mut rng);
        assert_eq!(crossover(&a, &b), crossover(&b, &a));
    }

    #[test]
    #[should_panic(expected = "parent policies must have the same topology")]
    fn test_crossover_mismatched_topologies() {
        let a = Policy::zeros(TOPOLOGY);
        let b = Policy::zeros(Topology {
            hidden: 6,
            ..TOPOLOGY
        });
        let _ = crossover(&a, &b);
    }

    #[test]
    fn test_mutate_with_zero_rate_is_identity() {
        let mut rng = Pcg32::seed_from_u64(4);
        let original = random_policy(TOPOLOGY, &mut rng);
        let mut mutated = original.clone();
        mutate(&mut mutated, 0.0, &mut rng);
        assert_eq!(mutated, original);
    }

    #[test]
    fn test_mutate_perturbs_every_weight_by_scaled_noise() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut policy = Policy::zeros(Topology::DEFAULT);
        mutate(&mut policy, 0.01, &mut rng);

        let weights = policy
            .matrices()
            .iter()
            .flat_map(|m| m.as_slice().iter().copied())
            .collect::<Vec<_>>();
        assert!(weights.iter().all(|w| *w != 0.0));
        assert!(weights.iter().all(|w| w.abs() < 0.1));
        #[expect(clippy::cast_precision_loss)]
        let n = weights.len() as f32;
        let rms = (weights.iter().map(|w| w * w).sum::<f32>() / n).sqrt();
        assert!((rms - 0.01).abs() < 0.001, "rms {rms}");
    }
}
