//! The best-result accumulator.

use std::collections::HashSet;

use super::MappedCircuit;
use crate::assignment::Candidate;

/// Tracks the highest score seen and every distinct assignment that reached it.
///
/// The score starts at a floor of zero, so only assignments scoring above
/// zero are ever kept. A candidate offered again at the best score is not
/// listed twice. Trackers merge associatively: merging shards in candidate
/// order gives the same result, ties in the same order, as one sequential
/// pass.
#[derive(Clone, Debug, Default)]
pub struct BestTracker {
    score: f64,
    circuits: Vec<MappedCircuit>,
    seen: HashSet<Candidate>,
}

impl BestTracker {
    /// Creates an empty tracker at the zero floor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The best score so far.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// The assignments that reached the best score, in the order offered.
    pub fn circuits(&self) -> &[MappedCircuit] {
        &self.circuits
    }

    /// Offers a scored assignment. `circuit` is only built when the score is
    /// kept and `candidate` is not already listed. Returns `true` if the best
    /// score improved.
    pub fn offer(
        &mut self,
        score: f64,
        candidate: &Candidate,
        circuit: impl FnOnce() -> MappedCircuit,
    ) -> bool {
        if score > self.score {
            self.score = score;
            self.circuits.clear();
            self.seen.clear();
            self.push(circuit());
            true
        } else {
            if score == self.score && score > 0.0 && !self.seen.contains(candidate) {
                self.push(circuit());
            }
            false
        }
    }

    /// Combines two trackers, keeping `self`'s ties ahead of `other`'s.
    pub fn merge(mut self, other: BestTracker) -> BestTracker {
        if other.score > self.score {
            other
        } else {
            if other.score == self.score && other.score > 0.0 {
                for circuit in other.circuits {
                    if !self.seen.contains(&circuit.candidate) {
                        self.push(circuit);
                    }
                }
            }
            self
        }
    }

    fn push(&mut self, circuit: MappedCircuit) {
        self.seen.insert(circuit.candidate.clone());
        self.circuits.push(circuit);
    }

    pub(crate) fn into_parts(self) -> (f64, Vec<MappedCircuit>) {
        (self.score, self.circuits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::MappedCircuit;

    fn candidate(tag: usize) -> Candidate {
        Candidate {
            inputs: vec![tag],
            outputs: vec![],
            groups: vec![],
        }
    }

    fn circuit(tag: usize) -> MappedCircuit {
        MappedCircuit::empty(candidate(tag))
    }

    fn offer(best: &mut BestTracker, score: f64, tag: usize) -> bool {
        best.offer(score, &candidate(tag), || circuit(tag))
    }

    fn tags(tracker: &BestTracker) -> Vec<usize> {
        tracker
            .circuits()
            .iter()
            .map(|c| c.candidate.inputs[0])
            .collect()
    }

    #[test]
    fn greater_replaces_equal_appends() {
        let mut best = BestTracker::new();
        assert!(offer(&mut best, 1.0, 0));
        assert!(!offer(&mut best, 1.0, 1));
        assert!(!offer(&mut best, 0.5, 2));
        assert_eq!(tags(&best), vec![0, 1]);
        assert!(offer(&mut best, 2.0, 3));
        assert_eq!(tags(&best), vec![3]);
        assert_eq!(best.score(), 2.0);
    }

    #[test]
    fn zero_scores_never_kept() {
        let mut best = BestTracker::new();
        assert!(!offer(&mut best, 0.0, 0));
        assert!(!offer(&mut best, -1.0, 1));
        assert!(best.circuits().is_empty());
    }

    #[test]
    fn best_never_decreases() {
        let mut best = BestTracker::new();
        let mut last = best.score();
        for (i, s) in [0.3, 0.1, 0.9, 0.2, 0.9, 0.4].into_iter().enumerate() {
            offer(&mut best, s, i);
            assert!(best.score() >= last);
            last = best.score();
        }
        assert_eq!(tags(&best), vec![2, 4]);
    }

    #[test]
    fn merge_matches_sequential() {
        let scores = [0.5, 1.0, 0.2, 1.0, 1.0, 0.7];
        let mut sequential = BestTracker::new();
        for (i, &s) in scores.iter().enumerate() {
            offer(&mut sequential, s, i);
        }

        let shard = |range: std::ops::Range<usize>| {
            let mut t = BestTracker::new();
            for i in range {
                offer(&mut t, scores[i], i);
            }
            t
        };
        let left_first = shard(0..2).merge(shard(2..4)).merge(shard(4..6));
        let right_first = shard(0..2).merge(shard(2..4).merge(shard(4..6)));
        assert_eq!(tags(&left_first), tags(&sequential));
        assert_eq!(tags(&right_first), tags(&sequential));
    }

    #[test]
    fn revisited_candidate_listed_once() {
        let mut best = BestTracker::new();
        assert!(offer(&mut best, 1.0, 4));
        assert!(!offer(&mut best, 1.0, 4));
        assert!(!offer(&mut best, 1.0, 5));
        assert!(!offer(&mut best, 1.0, 4));
        assert_eq!(tags(&best), vec![4, 5]);
    }

    #[test]
    fn merge_skips_candidates_already_listed() {
        let mut left = BestTracker::new();
        offer(&mut left, 1.0, 0);
        offer(&mut left, 1.0, 1);
        let mut right = BestTracker::new();
        offer(&mut right, 1.0, 1);
        offer(&mut right, 1.0, 2);
        assert_eq!(tags(&left.merge(right)), vec![0, 1, 2]);
    }
}
