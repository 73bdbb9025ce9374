//! Simulated annealing over permutation ranks.
//!
//! The search space is three integer axes: the rank of the input, output,
//! and gate-group permutation. A [`SearchStrategy`] proposes real-valued
//! points, which are floored and clamped to valid ranks, and is told the
//! objective at each point: the negated best score found so far.

use super::{Evaluator, Outcome, SearchOptions, SearchSpace};
use crate::error::TechmapError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Cooling rate (multiplied once per temperature step).
const COOLING_RATE: f64 = 0.95;

/// Temperature below which the annealer reheats.
const MIN_TEMPERATURE: f64 = 0.01;

/// Starting temperature, as a fraction of each axis' span.
const INITIAL_TEMPERATURE: f64 = 1.0;

/// Proposals per temperature step.
const MOVES_PER_TEMP: u64 = 10;

/// A minimizer over a bounded three-dimensional box.
pub trait SearchStrategy {
    /// The next point to evaluate.
    fn propose(&mut self) -> [f64; 3];

    /// Reports the objective at a proposed point.
    fn accept(&mut self, point: [f64; 3], objective: f64);
}

/// Metropolis annealing with geometric cooling and reheating.
///
/// Moves are uniform steps scaled by the temperature times the axis span, so
/// early proposals roam the whole space and later ones stay close to the
/// current point. When the temperature bottoms out, or nothing has been
/// accepted for a whole step, it restarts hot from a random point.
#[derive(Clone, Debug)]
pub struct SimulatedAnnealing {
    rng: StdRng,
    bounds: [f64; 3],
    current: Option<([f64; 3], f64)>,
    temperature: f64,
    moves: u64,
    accepted: u64,
}

impl SimulatedAnnealing {
    /// Creates an annealer over `[0, bounds[d])` on each axis. A fixed seed
    /// makes the proposal sequence reproducible.
    pub fn new(bounds: [u128; 3], seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            bounds: bounds.map(|b| b as f64),
            current: None,
            temperature: INITIAL_TEMPERATURE,
            moves: 0,
            accepted: 0,
        }
    }

    /// The current temperature.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    fn random_point(&mut self) -> [f64; 3] {
        let mut point = [0.0; 3];
        for (p, &upper) in point.iter_mut().zip(&self.bounds) {
            *p = if upper > 1.0 {
                self.rng.gen_range(0.0..upper)
            } else {
                0.0
            };
        }
        point
    }

    fn cool(&mut self) {
        let acceptance_rate = self.accepted as f64 / MOVES_PER_TEMP as f64;
        self.temperature *= COOLING_RATE;
        self.accepted = 0;
        if self.temperature < MIN_TEMPERATURE || acceptance_rate < 0.001 {
            log::debug!("reheating after acceptance rate {acceptance_rate:.3}");
            self.temperature = INITIAL_TEMPERATURE;
            self.current = None;
        }
    }
}

impl SearchStrategy for SimulatedAnnealing {
    fn propose(&mut self) -> [f64; 3] {
        let Some((current, _)) = self.current else {
            return self.random_point();
        };
        let mut point = current;
        for (p, &upper) in point.iter_mut().zip(&self.bounds) {
            if upper <= 1.0 {
                *p = 0.0;
                continue;
            }
            let step = self.rng.gen_range(-1.0..=1.0) * upper * self.temperature;
            *p = (*p + step).clamp(0.0, upper);
        }
        point
    }

    fn accept(&mut self, point: [f64; 3], objective: f64) {
        let take = match self.current {
            None => true,
            Some((_, current)) => {
                let delta = objective - current;
                delta < 0.0 || self.rng.gen::<f64>() < (-delta / self.temperature).exp()
            }
        };
        if take {
            self.current = Some((point, objective));
            self.accepted += 1;
        }
        self.moves += 1;
        if self.moves % MOVES_PER_TEMP == 0 {
            self.cool();
        }
    }
}

/// Maps a proposed point to permutation ranks: floor, then clamp into range.
fn to_ranks(point: [f64; 3], dimensions: [u128; 3]) -> [u128; 3] {
    let mut ranks = [0u128; 3];
    for ((rank, &p), &len) in ranks.iter_mut().zip(&point).zip(&dimensions) {
        let floored = if p.is_finite() && p > 0.0 { p.floor() as u128 } else { 0 };
        *rank = floored.min(len.saturating_sub(1));
    }
    ranks
}

/// Draws `budget` candidates from `strategy`.
pub(super) fn run(
    evaluator: &Evaluator<'_>,
    space: &SearchSpace,
    options: &SearchOptions,
    budget: u64,
    strategy: &mut dyn SearchStrategy,
) -> Result<Outcome, TechmapError> {
    let mut outcome = Outcome::default();
    let Some(dimensions) = space.dimensions() else {
        return Ok(outcome);
    };
    while outcome.iterations < budget {
        if options.is_cancelled() {
            outcome.cancelled = true;
            break;
        }
        let point = strategy.propose();
        outcome.iterations += 1;
        let Some(candidate) = space.candidate_at(to_ranks(point, dimensions)) else {
            continue;
        };
        let before = outcome.best.score();
        if let Some(score) = evaluator.evaluate(candidate, &mut outcome.best)? {
            outcome.evaluated += 1;
            if outcome.best.score() > before {
                log::info!(
                    "iteration {}/{budget}: best score {:.4e}",
                    outcome.iterations,
                    outcome.best.score()
                );
            } else {
                log::debug!("iteration {}/{budget}: score {score:.4e}", outcome.iterations);
            }
        }
        strategy.accept(point, -outcome.best.score());
    }
    evaluator.report("simulated annealing", &outcome);
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_floored_and_clamped() {
        assert_eq!(to_ranks([0.0, 2.7, 9.99], [1, 3, 5]), [0, 2, 4]);
        assert_eq!(to_ranks([-3.0, f64::NAN, 4.0], [4, 2, 5]), [0, 0, 4]);
    }

    #[test]
    fn proposals_stay_in_bounds() {
        let mut sa = SimulatedAnnealing::new([24, 2, 1], Some(3));
        for i in 0..500 {
            let point = sa.propose();
            assert!((0.0..=24.0).contains(&point[0]));
            assert!((0.0..=2.0).contains(&point[1]));
            assert_eq!(point[2], 0.0);
            sa.accept(point, -(i as f64));
        }
    }

    #[test]
    fn seeded_runs_repeat() {
        let trace = |seed| {
            let mut sa = SimulatedAnnealing::new([100, 100, 100], Some(seed));
            (0..50)
                .map(|i| {
                    let p = sa.propose();
                    sa.accept(p, (i % 7) as f64);
                    p
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(trace(11), trace(11));
        assert_ne!(trace(11), trace(12));
    }

    #[test]
    fn cooling_and_reheat() {
        let mut sa = SimulatedAnnealing::new([10, 10, 10], Some(5));
        for _ in 0..MOVES_PER_TEMP {
            let p = sa.propose();
            sa.accept(p, 0.0);
        }
        assert!((sa.temperature() - INITIAL_TEMPERATURE * COOLING_RATE).abs() < 1e-12);
        for _ in 0..MOVES_PER_TEMP * 200 {
            let p = sa.propose();
            sa.accept(p, 0.0);
        }
        assert!(sa.temperature() >= MIN_TEMPERATURE);
    }
}
