//! The search controller.
//!
//! [`techmap`] checks that the catalog can cover the design, sizes the
//! assignment space, and then walks it either exhaustively (every
//! permutation, sharded across rayon workers) or with simulated annealing
//! over permutation ranks. Every candidate is filtered for duplicate part
//! names, bound, scored, and offered to a [`BestTracker`]. Skipped
//! candidates and cancellation points are reported per shard through a
//! [`DiagnosticSink`].

mod anneal;
mod best;
mod exhaustive;

pub use anneal::{SearchStrategy, SimulatedAnnealing};
pub use best::BestTracker;

use crate::assignment::{Assignment, Candidate};
use crate::codes::{CANDIDATES_SKIPPED, SEARCH_CANCELLED};
use crate::error::TechmapError;
use crate::permute::{nth_permutation, partial_permutations};
use crate::role::{NodeId, RoleGraph};
use crate::scorer::CircuitScorer;
use crate::truth_table::TruthTable;
use genmap_diagnostics::{Diagnostic, DiagnosticSink};
use genmap_library::{Catalog, DesignSize};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Default annealing iteration budget.
pub const DEFAULT_ITERATIONS: u64 = 1_000;

/// Default ceiling on the number of candidate assignments.
pub const DEFAULT_MAX_PERMUTATIONS: u128 = 10_000_000_000_000;

/// How the assignment space is explored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchMode {
    /// Score every candidate.
    Exhaustive,
    /// Simulated annealing over permutation ranks.
    #[default]
    Annealing,
}

/// Search parameters.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Exploration strategy.
    pub mode: SearchMode,
    /// Annealing budget; capped at the number of candidates.
    pub iterations: u64,
    /// Annealing seed. `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Refuse to search spaces larger than this.
    pub max_permutations: u128,
    /// Worker threads for exhaustive search; `0` uses rayon's default.
    pub threads: usize,
    /// Checked between candidates; when set, the search stops early.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_permutations: DEFAULT_MAX_PERMUTATIONS,
            threads: 0,
            cancel: None,
        }
    }
}

impl SearchOptions {
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// A netlist role and the part bound to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NodeBinding {
    /// Role-graph node.
    pub node: NodeId,
    /// Port name or gate id.
    pub role: String,
    /// Bound sensor, device, or gate-group name.
    pub part: String,
}

/// One best-scoring assignment.
#[derive(Clone, Debug, Serialize)]
pub struct MappedCircuit {
    /// Input bindings.
    pub inputs: Vec<NodeBinding>,
    /// Output bindings.
    pub outputs: Vec<NodeBinding>,
    /// Gate bindings.
    pub gates: Vec<NodeBinding>,
    /// The catalog indices behind the bindings.
    pub candidate: Candidate,
    /// Per-output device scores.
    pub device_scores: Vec<f64>,
    /// The evaluated truth table.
    pub truth_table: TruthTable,
}

impl MappedCircuit {
    fn new(
        assignment: &Assignment<'_>,
        candidate: Candidate,
        device_scores: Vec<f64>,
        truth_table: TruthTable,
    ) -> Self {
        let graph = assignment.graph();
        let bindings = |nodes: &mut dyn Iterator<Item = NodeId>| -> Vec<NodeBinding> {
            nodes
                .map(|node| NodeBinding {
                    node,
                    role: graph.node(node).name().to_string(),
                    part: assignment.part(node).name().to_string(),
                })
                .collect()
        };
        Self {
            inputs: bindings(&mut graph.inputs()),
            outputs: bindings(&mut graph.outputs()),
            gates: bindings(&mut graph.gates()),
            candidate,
            device_scores,
            truth_table,
        }
    }

    #[cfg(test)]
    pub(crate) fn empty(candidate: Candidate) -> Self {
        let graph = RoleGraph::from_nodes("empty", Vec::new());
        Self {
            inputs: Vec::new(),
            outputs: Vec::new(),
            gates: Vec::new(),
            candidate,
            device_scores: Vec::new(),
            truth_table: TruthTable::new(&graph, Vec::new()),
        }
    }
}

/// Counters describing a finished search.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Candidates drawn, including ones rejected for duplicate names.
    pub iterations: u64,
    /// Candidates that passed the uniqueness check and were scored.
    pub evaluated: u64,
    /// Candidates the search meant to draw.
    pub budget: u64,
    /// Size of the whole assignment space.
    pub permutations: u128,
    /// The search stopped on the cancellation flag.
    pub cancelled: bool,
}

/// The outcome of [`techmap`].
#[derive(Clone, Debug)]
pub struct BestResult {
    /// The best circuit score.
    pub score: f64,
    /// Every assignment that reached `score`, in search order.
    pub circuits: Vec<MappedCircuit>,
    /// Search counters.
    pub stats: SearchStats,
}

impl BestResult {
    /// The first best assignment.
    pub fn best(&self) -> Option<&MappedCircuit> {
        self.circuits.first()
    }

    /// The first best assignment's truth table.
    pub fn truth_table(&self) -> Option<&TruthTable> {
        self.best().map(|c| &c.truth_table)
    }

    /// The first best assignment's truth-table labels.
    pub fn truth_table_labels(&self) -> Vec<String> {
        self.truth_table().map(TruthTable::labels).unwrap_or_default()
    }
}

/// The assignment space: which catalog parts can fill which roles.
#[derive(Clone, Copy, Debug)]
pub struct SearchSpace {
    /// Sensors, devices, and gate groups available.
    pub available: DesignSize,
    /// Inputs, outputs, and gates needed.
    pub design: DesignSize,
}

impl SearchSpace {
    /// Sizes the space, failing if any kind of part is too scarce.
    pub fn new(graph: &RoleGraph, catalog: &Catalog) -> Result<Self, TechmapError> {
        let design = graph.size();
        let available = DesignSize {
            inputs: catalog.sensors.len(),
            outputs: catalog.devices.len(),
            gates: catalog.groups.len(),
        };
        let scarce = [
            ("input sensors", available.inputs, design.inputs),
            ("output devices", available.outputs, design.outputs),
            ("gate groups", available.gates, design.gates),
        ]
        .into_iter()
        .filter(|(_, have, need)| have < need)
        .map(|(kind, have, need)| format!("{need} {kind} needed, {have} available"))
        .collect::<Vec<_>>();
        if !scarce.is_empty() {
            return Err(TechmapError::ConfigurationMismatch(scarce.join("; ")));
        }
        Ok(Self { available, design })
    }

    /// Permutation counts per role: inputs, outputs, gates.
    pub fn dimensions(&self) -> Option<[u128; 3]> {
        Some([
            partial_permutations(self.available.inputs, self.design.inputs)?,
            partial_permutations(self.available.outputs, self.design.outputs)?,
            partial_permutations(self.available.gates, self.design.gates)?,
        ])
    }

    /// Total number of candidates, or `None` if it overflows `u128`.
    pub fn permutations(&self) -> Option<u128> {
        let [i, o, g] = self.dimensions()?;
        i.checked_mul(o)?.checked_mul(g)
    }

    /// The candidate at the given input, output, and gate permutation ranks.
    pub fn candidate_at(&self, ranks: [u128; 3]) -> Option<Candidate> {
        Some(Candidate {
            inputs: nth_permutation(self.available.inputs, self.design.inputs, ranks[0])?,
            outputs: nth_permutation(self.available.outputs, self.design.outputs, ranks[1])?,
            groups: nth_permutation(self.available.gates, self.design.gates, ranks[2])?,
        })
    }
}

/// Shared read-only state for scoring candidates.
pub(crate) struct Evaluator<'a> {
    graph: &'a RoleGraph,
    catalog: &'a Catalog,
    scorer: CircuitScorer<'a>,
    diagnostics: &'a DiagnosticSink,
}

impl<'a> Evaluator<'a> {
    /// Reports what one shard or pass skipped, and where it was cancelled.
    pub(crate) fn report(&self, subject: &str, outcome: &Outcome) {
        if outcome.cancelled {
            self.diagnostics.emit(
                Diagnostic::warning(SEARCH_CANCELLED, "search stopped early")
                    .with_subject(subject)
                    .with_note(format!("cancelled after {} candidates", outcome.iterations)),
            );
        }
        let skipped = outcome.iterations - outcome.evaluated;
        if skipped > 0 {
            self.diagnostics.emit(
                Diagnostic::note(CANDIDATES_SKIPPED, "candidates reusing a part name were skipped")
                    .with_subject(subject)
                    .with_note(format!("{skipped} of {} candidates", outcome.iterations)),
            );
        }
    }

    /// Names the sensors of an input permutation, for shard subjects.
    pub(crate) fn sensor_names(&self, inputs: &[usize]) -> String {
        inputs
            .iter()
            .map(|&i| self.catalog.sensors[i].name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Scores `candidate` into `best` and returns its score, or `None`
    /// without scoring when two roles would share a part name.
    pub(crate) fn evaluate(
        &self,
        candidate: Candidate,
        best: &mut BestTracker,
    ) -> Result<Option<f64>, TechmapError> {
        if !candidate.is_unique(self.catalog) {
            return Ok(None);
        }
        let assignment = Assignment::bind(self.graph, self.catalog, &candidate)?;
        let scored = self.scorer.score(&assignment)?;
        log::debug!("{:?} scored {:.4e}", assignment.names(), scored.score);
        let score = scored.score;
        best.offer(score, &candidate, || {
            MappedCircuit::new(
                &assignment,
                candidate.clone(),
                scored.device_scores,
                scored.truth_table,
            )
        });
        Ok(Some(score))
    }
}

/// Progress of one search pass or shard.
#[derive(Debug, Default)]
pub(crate) struct Outcome {
    pub(crate) best: BestTracker,
    pub(crate) iterations: u64,
    pub(crate) evaluated: u64,
    pub(crate) cancelled: bool,
}

impl Outcome {
    pub(crate) fn merge(self, other: Outcome) -> Outcome {
        Outcome {
            best: self.best.merge(other.best),
            iterations: self.iterations + other.iterations,
            evaluated: self.evaluated + other.evaluated,
            cancelled: self.cancelled || other.cancelled,
        }
    }
}

/// Finds the best assignment of `catalog` parts to `graph`'s roles.
///
/// Per-shard findings are only logged; use [`techmap_with_diagnostics`] to
/// collect them.
pub fn techmap(
    graph: &RoleGraph,
    catalog: &Catalog,
    options: &SearchOptions,
) -> Result<BestResult, TechmapError> {
    let sink = DiagnosticSink::new();
    let result = techmap_with_diagnostics(graph, catalog, options, &sink);
    for diag in sink.take_sorted() {
        log::debug!("{}[{}]: {}", diag.severity, diag.code, diag.message);
    }
    result
}

/// [`techmap`], emitting skipped-candidate and cancellation findings into
/// `sink`.
pub fn techmap_with_diagnostics(
    graph: &RoleGraph,
    catalog: &Catalog,
    options: &SearchOptions,
    sink: &DiagnosticSink,
) -> Result<BestResult, TechmapError> {
    let space = SearchSpace::new(graph, catalog)?;
    let permutations = match space.permutations() {
        Some(count) if count <= options.max_permutations => count,
        count => {
            return Err(TechmapError::ComplexityExceeded {
                count,
                ceiling: options.max_permutations,
            })
        }
    };
    let evaluator = Evaluator {
        graph,
        catalog,
        scorer: CircuitScorer::new(graph)?,
        diagnostics: sink,
    };
    log::info!(
        "mapping '{}': {} inputs, {} outputs, {} gates; {permutations} candidate assignments",
        graph.name(),
        space.design.inputs,
        space.design.outputs,
        space.design.gates
    );

    let (outcome, budget) = match options.mode {
        SearchMode::Exhaustive => {
            let budget = u64::try_from(permutations).unwrap_or(u64::MAX);
            (exhaustive::run(&evaluator, &space, options)?, budget)
        }
        SearchMode::Annealing => {
            let budget = u64::try_from(permutations)
                .unwrap_or(u64::MAX)
                .min(options.iterations);
            let dimensions = space.dimensions().unwrap_or_default();
            let mut strategy = SimulatedAnnealing::new(dimensions, options.seed);
            let outcome = anneal::run(&evaluator, &space, options, budget, &mut strategy)?;
            (outcome, budget)
        }
    };

    let stats = SearchStats {
        iterations: outcome.iterations,
        evaluated: outcome.evaluated,
        budget,
        permutations,
        cancelled: outcome.cancelled,
    };
    log::info!(
        "completed {}/{} iterations (of {} possible)",
        stats.evaluated,
        stats.budget,
        stats.permutations
    );

    let (score, circuits) = outcome.best.into_parts();
    if circuits.is_empty() {
        return Err(if stats.cancelled {
            TechmapError::Cancelled
        } else {
            TechmapError::NoValidAssignment {
                evaluated: stats.evaluated,
            }
        });
    }
    Ok(BestResult {
        score,
        circuits,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::RoleNode;
    use genmap_library::{Composition, Device, GateGroup, GateVariant, Response, Sensor, Signal};
    use genmap_netlist::GateKind;

    fn sensor(name: &str, low: f64, high: f64) -> Sensor {
        let signal = |value| Signal { value, tandem: 0.0 };
        Sensor {
            name: name.into(),
            low: signal(low),
            high: signal(high),
        }
    }

    fn group(name: &str, ymax: f64) -> GateGroup {
        GateGroup {
            name: name.into(),
            gate_type: Some("NOR".into()),
            composition: Composition::Sum,
            variants: vec![GateVariant {
                name: format!("{name}_1"),
                response: Response::Hill {
                    ymin: 0.01,
                    ymax,
                    k: 0.5,
                    n: 2.0,
                },
                tandem: None,
            }],
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            sensors: vec![
                sensor("pTac", 0.02, 2.0),
                sensor("pTet", 0.01, 3.0),
                sensor("pBAD", 0.05, 1.0),
            ],
            devices: vec![Device {
                name: "YFP".into(),
                response: Response::Linear { c: 1.0 },
            }],
            groups: vec![group("P1", 2.0), group("H1", 4.0), group("S1", 1.0)],
            units: None,
        }
    }

    fn inverter() -> RoleGraph {
        RoleGraph::from_nodes(
            "inv",
            vec![
                RoleNode::Input {
                    name: "a".into(),
                    bit: 2,
                },
                RoleNode::Gate {
                    id: "1".into(),
                    kind: GateKind::Not,
                    inputs: vec![2],
                    output: 3,
                },
                RoleNode::Output {
                    name: "y".into(),
                    bit: 3,
                },
            ],
        )
    }

    fn candidates(result: &BestResult) -> Vec<Candidate> {
        result.circuits.iter().map(|c| c.candidate.clone()).collect()
    }

    fn exhaustive_options() -> SearchOptions {
        SearchOptions {
            mode: SearchMode::Exhaustive,
            ..SearchOptions::default()
        }
    }

    #[test]
    fn space_counts_and_ranks() {
        let graph = inverter();
        let space = SearchSpace::new(&graph, &catalog()).unwrap();
        assert_eq!(space.dimensions(), Some([3, 1, 3]));
        assert_eq!(space.permutations(), Some(9));
        let candidate = space.candidate_at([2, 0, 1]).unwrap();
        assert_eq!(candidate.inputs, vec![2]);
        assert_eq!(candidate.groups, vec![1]);
        assert!(space.candidate_at([3, 0, 0]).is_none());
    }

    #[test]
    fn scarce_catalog_is_a_mismatch() {
        let graph = inverter();
        let mut catalog = catalog();
        catalog.devices.clear();
        let err = techmap(&graph, &catalog, &exhaustive_options()).unwrap_err();
        match err {
            TechmapError::ConfigurationMismatch(msg) => {
                assert_eq!(msg, "1 output devices needed, 0 available")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn ceiling_is_enforced() {
        let graph = inverter();
        let options = SearchOptions {
            max_permutations: 8,
            ..exhaustive_options()
        };
        assert!(matches!(
            techmap(&graph, &catalog(), &options),
            Err(TechmapError::ComplexityExceeded {
                count: Some(9),
                ceiling: 8
            })
        ));
    }

    #[test]
    fn exhaustive_picks_strongest_gate_and_sensor() {
        let graph = inverter();
        let result = techmap(&graph, &catalog(), &exhaustive_options()).unwrap();
        assert_eq!(result.stats.iterations, 9);
        assert_eq!(result.stats.evaluated, 9);
        assert_eq!(result.stats.budget, 9);
        let best = result.best().unwrap();
        assert_eq!(best.gates[0].part, "H1");
        assert_eq!(best.inputs[0].part, "pTet");
        assert_eq!(best.outputs[0].role, "y");
        assert_eq!(result.truth_table_labels().len(), 6);
    }

    #[test]
    fn exhaustive_is_deterministic_across_thread_counts() {
        let graph = inverter();
        let catalog = catalog();
        let with_threads = |threads| SearchOptions {
            threads,
            ..exhaustive_options()
        };
        let single = techmap(&graph, &catalog, &with_threads(1)).unwrap();
        let many = techmap(&graph, &catalog, &with_threads(4)).unwrap();
        assert_eq!(single.score, many.score);
        assert_eq!(candidates(&single), candidates(&many));
    }

    #[test]
    fn annealing_is_reproducible_with_a_seed() {
        let graph = inverter();
        let catalog = catalog();
        let options = SearchOptions {
            seed: Some(7),
            iterations: 5,
            ..SearchOptions::default()
        };
        let first = techmap(&graph, &catalog, &options).unwrap();
        let second = techmap(&graph, &catalog, &options).unwrap();
        assert_eq!(first.stats.budget, 5);
        assert_eq!(first.stats.iterations, 5);
        assert_eq!(first.score, second.score);
        assert_eq!(first.best().unwrap().candidate, second.best().unwrap().candidate);
    }

    #[test]
    fn annealing_budget_capped_by_space() {
        let graph = inverter();
        let options = SearchOptions {
            seed: Some(1),
            iterations: 1_000,
            ..SearchOptions::default()
        };
        let result = techmap(&graph, &catalog(), &options).unwrap();
        assert_eq!(result.stats.budget, 9);
    }

    #[test]
    fn annealing_revisits_list_each_candidate_once() {
        let graph = inverter();
        let mut catalog = catalog();
        for group in &mut catalog.groups {
            group.variants[0].response = Response::Linear { c: 2.0 };
        }
        let options = SearchOptions {
            seed: Some(1),
            iterations: 1_000,
            ..SearchOptions::default()
        };
        let result = techmap(&graph, &catalog, &options).unwrap();
        let listed = candidates(&result);
        let distinct: std::collections::HashSet<_> = listed.iter().collect();
        assert_eq!(listed.len(), distinct.len());
        assert!(listed.iter().all(|c| c.inputs == listed[0].inputs));
    }

    #[test]
    fn shards_report_skipped_candidates() {
        let graph = inverter();
        let mut catalog = catalog();
        catalog.groups[0].name = "pTac".into();
        let sink = DiagnosticSink::new();
        let result =
            techmap_with_diagnostics(&graph, &catalog, &exhaustive_options(), &sink).unwrap();
        assert_eq!(result.stats.iterations, 9);
        assert_eq!(result.stats.evaluated, 8);
        let diagnostics = sink.take_sorted();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, CANDIDATES_SKIPPED);
        assert_eq!(diagnostics[0].subject.as_deref(), Some("inputs pTac"));
        assert_eq!(diagnostics[0].notes, vec!["1 of 3 candidates".to_string()]);
    }

    #[test]
    fn cancelled_before_start() {
        let graph = inverter();
        let options = SearchOptions {
            cancel: Some(Arc::new(AtomicBool::new(true))),
            ..exhaustive_options()
        };
        let sink = DiagnosticSink::new();
        assert!(matches!(
            techmap_with_diagnostics(&graph, &catalog(), &options, &sink),
            Err(TechmapError::Cancelled)
        ));
        let subjects: Vec<_> = sink
            .take_sorted()
            .into_iter()
            .filter(|d| d.code == SEARCH_CANCELLED)
            .filter_map(|d| d.subject)
            .collect();
        assert_eq!(subjects, vec!["inputs pBAD", "inputs pTac", "inputs pTet"]);
    }
}
