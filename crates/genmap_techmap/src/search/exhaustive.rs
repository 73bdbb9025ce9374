//! Exhaustive enumeration, sharded by input permutation.

use super::{Evaluator, Outcome, SearchOptions, SearchSpace};
use crate::assignment::Candidate;
use crate::error::TechmapError;
use crate::permute::KPermutations;
use rayon::prelude::*;

/// Scores every candidate in lexicographic (input, output, gate) order.
///
/// Each input permutation is one rayon task. Shards are merged in input
/// order, so ties come out exactly as a sequential pass would list them.
/// Every shard reports its own skipped candidates and cancellation point.
pub(super) fn run(
    evaluator: &Evaluator<'_>,
    space: &SearchSpace,
    options: &SearchOptions,
) -> Result<Outcome, TechmapError> {
    let input_perms: Vec<Vec<usize>> =
        KPermutations::new(space.available.inputs, space.design.inputs).collect();

    let sweep = || -> Result<Outcome, TechmapError> {
        let shards = input_perms
            .par_iter()
            .map(|inputs| shard(evaluator, space, options, inputs))
            .collect::<Result<Vec<Outcome>, TechmapError>>()?;
        Ok(shards.into_iter().fold(Outcome::default(), Outcome::merge))
    };

    if options.threads > 0 {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(options.threads)
            .build()?;
        pool.install(sweep)
    } else {
        sweep()
    }
}

fn shard(
    evaluator: &Evaluator<'_>,
    space: &SearchSpace,
    options: &SearchOptions,
    inputs: &[usize],
) -> Result<Outcome, TechmapError> {
    let mut outcome = Outcome::default();
    'outputs: for outputs in KPermutations::new(space.available.outputs, space.design.outputs) {
        for groups in KPermutations::new(space.available.gates, space.design.gates) {
            if options.is_cancelled() {
                outcome.cancelled = true;
                break 'outputs;
            }
            outcome.iterations += 1;
            let candidate = Candidate {
                inputs: inputs.to_vec(),
                outputs: outputs.clone(),
                groups,
            };
            if evaluator.evaluate(candidate, &mut outcome.best)?.is_some() {
                outcome.evaluated += 1;
            }
        }
    }
    let subject = format!("inputs {}", evaluator.sensor_names(inputs));
    evaluator.report(&subject, &outcome);
    Ok(outcome)
}
