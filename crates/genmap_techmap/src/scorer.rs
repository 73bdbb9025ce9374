//! Circuit scoring: truth-table propagation and reduction to one number.
//!
//! For each input combination the scorer propagates binary levels through
//! the gates in topological order, then evaluates every node's analog value
//! through the bound parts. Each output's values are split by its binary
//! level and reduced to `min(ON) / max(OFF)`; the circuit score is the
//! weakest output.

use crate::assignment::{Assignment, RowState};
use crate::error::TechmapError;
use crate::role::{NodeId, RoleGraph, RoleNode};
use crate::truth_table::{row_count, TruthRow, TruthTable};
use genmap_common::{InternalError, Level};
use genmap_netlist::GateKind;

/// The score and truth table of one assignment.
#[derive(Clone, Debug)]
pub struct ScoredCircuit {
    /// Minimum device score over all outputs.
    pub score: f64,
    /// Per-output device scores, in output order.
    pub device_scores: Vec<f64>,
    /// The evaluated truth table.
    pub truth_table: TruthTable,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Finished,
}

/// Scores assignments over one role graph.
///
/// Construction checks the wiring once: every gate and output must resolve
/// its predecessors, and the gates must be acyclic.
#[derive(Clone, Debug)]
pub struct CircuitScorer<'g> {
    graph: &'g RoleGraph,
    order: Vec<NodeId>,
    rows: usize,
}

impl<'g> CircuitScorer<'g> {
    /// Orders the graph topologically.
    pub fn new(graph: &'g RoleGraph) -> Result<Self, TechmapError> {
        let rows = row_count(graph.size().inputs)?;
        let mut visit = vec![Visit::New; graph.len()];
        let mut order = Vec::with_capacity(graph.len());
        for root in graph.gates().chain(graph.outputs()) {
            visit_node(graph, root, &mut visit, &mut order)?;
        }
        Ok(Self { graph, order, rows })
    }

    /// Gates and outputs, each after all of its predecessors.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Scores `assignment` over every input combination.
    pub fn score(&self, assignment: &Assignment<'_>) -> Result<ScoredCircuit, TechmapError> {
        let graph = self.graph;
        let width = graph.size().inputs;
        let names = assignment.names().into_iter().map(str::to_string).collect();
        let mut table = TruthTable::new(graph, names);

        for row in 0..self.rows {
            let mut state = RowState::new(graph);
            let mut io = vec![Level::Low; graph.len()];
            for (pos, input) in graph.inputs().enumerate() {
                let level = Level::of_row(row, pos, width);
                io[input.index()] = level;
                state.set_level(graph, input, level);
            }
            self.propagate(&mut io)?;

            for output in graph.outputs() {
                assignment.score(output, &mut state)?;
            }
            let mut scores = Vec::with_capacity(graph.len());
            let mut variants = Vec::with_capacity(graph.len());
            for node in graph.ids() {
                scores.push(assignment.score(node, &mut state)?.value);
                variants.push(state.chosen_variant(node).and_then(|i| {
                    match graph.node(node) {
                        RoleNode::Gate { .. } => group_variant_name(assignment, node, i),
                        _ => None,
                    }
                }));
            }
            log::trace!("row {row}: io {io:?} scores {scores:?}");
            table.push(TruthRow {
                io,
                scores,
                variants,
            });
        }

        let device_scores: Vec<f64> = graph
            .outputs()
            .map(|output| {
                let (mut on, mut off) = (Vec::new(), Vec::new());
                for row in 0..table.len() {
                    let value = table.score(row, output);
                    match table.io(row, output) {
                        Level::High => on.push(value),
                        Level::Low => off.push(value),
                    }
                }
                reduce_device_score(&on, &off)
            })
            .collect();
        let score = device_scores
            .iter()
            .copied()
            .reduce(f64::min)
            .unwrap_or(0.0);

        Ok(ScoredCircuit {
            score,
            device_scores,
            truth_table: table,
        })
    }

    fn propagate(&self, io: &mut [Level]) -> Result<(), TechmapError> {
        for &node in &self.order {
            let preds = self.graph.find_predecessor(node)?;
            let level = match (self.graph.node(node), preds) {
                (RoleNode::Gate { kind: GateKind::Not, .. }, [a]) => !io[a.index()],
                (RoleNode::Gate { kind: GateKind::Nor, .. }, [a, b]) => {
                    io[a.index()].nor(io[b.index()])
                }
                (RoleNode::Output { .. }, [a]) => io[a.index()],
                (role, preds) => {
                    return Err(InternalError::new(format!(
                        "{role} has {} predecessors",
                        preds.len()
                    ))
                    .into())
                }
            };
            io[node.index()] = level;
        }
        Ok(())
    }
}

fn group_variant_name(assignment: &Assignment<'_>, node: NodeId, index: usize) -> Option<String> {
    match assignment.part(node) {
        crate::assignment::PartBinding::Group(group) => {
            group.variants.get(index).map(|v| v.name.clone())
        }
        _ => None,
    }
}

fn visit_node(
    graph: &RoleGraph,
    node: NodeId,
    visit: &mut [Visit],
    order: &mut Vec<NodeId>,
) -> Result<(), TechmapError> {
    match visit[node.index()] {
        Visit::Finished => return Ok(()),
        Visit::Active => {
            return Err(TechmapError::UnsupportedTopology {
                node: graph.node(node).to_string(),
            })
        }
        Visit::New => {}
    }
    if let RoleNode::Input { .. } = graph.node(node) {
        visit[node.index()] = Visit::Finished;
        return Ok(());
    }
    visit[node.index()] = Visit::Active;
    for &pred in graph.find_predecessor(node)? {
        visit_node(graph, pred, visit, order)?;
    }
    visit[node.index()] = Visit::Finished;
    order.push(node);
    Ok(())
}

/// Reduces one output's analog values to a device score.
///
/// `on` and `off` hold the values of rows where the output is high and low.
/// The score is `min(on) / max(off)`, except that a missing side yields the
/// other side's maximum and a zero `max(off)` yields zero.
pub fn reduce_device_score(on: &[f64], off: &[f64]) -> f64 {
    let max = |values: &[f64]| values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    match (on.is_empty(), off.is_empty()) {
        (true, true) => 0.0,
        (true, false) => max(off),
        (false, true) => max(on),
        (false, false) => {
            let max_off = max(off);
            if max_off == 0.0 {
                max_off
            } else {
                let min_on = on.iter().copied().fold(f64::INFINITY, f64::min);
                min_on / max_off
            }
        }
    }
}

/// Builds a scorer for `assignment`'s graph and scores it.
pub fn score_circuit(assignment: &Assignment<'_>) -> Result<ScoredCircuit, TechmapError> {
    CircuitScorer::new(assignment.graph())?.score(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::Candidate;
    use genmap_library::{
        Catalog, Composition, Device, GateGroup, GateVariant, Response, Sensor, Signal,
    };

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    fn sensor(name: &str, low: f64, high: f64) -> Sensor {
        Sensor {
            name: name.into(),
            low: Signal {
                value: low,
                tandem: 0.0,
            },
            high: Signal {
                value: high,
                tandem: 0.0,
            },
        }
    }

    fn repressor(name: &str, ymin: f64, ymax: f64) -> GateVariant {
        GateVariant {
            name: name.into(),
            response: Response::Hill {
                ymin,
                ymax,
                k: 1.0,
                n: 2.0,
            },
            tandem: None,
        }
    }

    fn group(name: &str) -> GateGroup {
        GateGroup {
            name: name.into(),
            gate_type: Some("NOR".into()),
            composition: Composition::Sum,
            variants: vec![repressor(&format!("{name}_a"), 0.01, 3.0)],
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            sensors: vec![sensor("pTac", 0.01, 2.0), sensor("pBAD", 0.02, 4.0)],
            devices: vec![Device {
                name: "YFP".into(),
                response: Response::Linear { c: 1.0 },
            }],
            groups: vec![group("P1"), group("P2"), group("P3")],
            units: None,
        }
    }

    fn and_gate() -> RoleGraph {
        let gate = |id: &str, kind, inputs: Vec<u32>, output| RoleNode::Gate {
            id: id.into(),
            kind,
            inputs,
            output,
        };
        RoleGraph::from_nodes(
            "and_gate",
            vec![
                RoleNode::Input {
                    name: "a".into(),
                    bit: 2,
                },
                RoleNode::Input {
                    name: "b".into(),
                    bit: 3,
                },
                gate("147", GateKind::Not, vec![2], 5),
                gate("148", GateKind::Not, vec![3], 6),
                gate("149", GateKind::Nor, vec![5, 6], 4),
                RoleNode::Output {
                    name: "out".into(),
                    bit: 4,
                },
            ],
        )
    }

    #[test]
    fn reduction_rules() {
        assert!(close(reduce_device_score(&[4.0, 2.0], &[0.5, 1.0]), 2.0));
        assert_eq!(reduce_device_score(&[], &[0.3, 0.7]), 0.7);
        assert_eq!(reduce_device_score(&[0.3, 0.9], &[]), 0.9);
        assert_eq!(reduce_device_score(&[5.0], &[0.0, 0.0]), 0.0);
        assert_eq!(reduce_device_score(&[], &[]), 0.0);
    }

    #[test]
    fn topological_order_puts_predecessors_first() {
        let graph = and_gate();
        let scorer = CircuitScorer::new(&graph).unwrap();
        let order: Vec<u32> = scorer.order().iter().map(|n| n.as_raw()).collect();
        assert_eq!(order, vec![2, 3, 4, 5]);
    }

    #[test]
    fn and_gate_truth_table() {
        let graph = and_gate();
        let catalog = catalog();
        let candidate = Candidate {
            inputs: vec![0, 1],
            outputs: vec![0],
            groups: vec![0, 1, 2],
        };
        let assignment = Assignment::bind(&graph, &catalog, &candidate).unwrap();
        let scored = score_circuit(&assignment).unwrap();
        let table = &scored.truth_table;
        assert_eq!(table.len(), 4);

        let out = NodeId::from_raw(5);
        let bits: Vec<u8> = (0..4).map(|r| table.io(r, out).as_bit()).collect();
        assert_eq!(bits, vec![0, 0, 0, 1]);
        // row 2 is a=1, b=0
        assert_eq!(table.io(2, NodeId::from_raw(0)), Level::High);
        assert_eq!(table.io(2, NodeId::from_raw(1)), Level::Low);
        assert_eq!(table.variant(3, NodeId::from_raw(4)), Some("P3_a"));
        assert_eq!(table.variant(3, out), None);

        let on: Vec<f64> = vec![table.score(3, out)];
        let off: Vec<f64> = (0..3).map(|r| table.score(r, out)).collect();
        assert!(close(scored.score, reduce_device_score(&on, &off)));
        assert!(scored.score > 1.0);
    }

    #[test]
    fn no_outputs_scores_zero() {
        let graph = RoleGraph::from_nodes(
            "idle",
            vec![RoleNode::Input {
                name: "a".into(),
                bit: 2,
            }],
        );
        let catalog = catalog();
        let candidate = Candidate {
            inputs: vec![0],
            outputs: vec![],
            groups: vec![],
        };
        let assignment = Assignment::bind(&graph, &catalog, &candidate).unwrap();
        let scored = score_circuit(&assignment).unwrap();
        assert_eq!(scored.score, 0.0);
        assert_eq!(scored.truth_table.len(), 2);
    }

    #[test]
    fn cycle_rejected_at_construction() {
        let graph = RoleGraph::from_nodes(
            "ring",
            vec![
                RoleNode::Gate {
                    id: "1".into(),
                    kind: GateKind::Nor,
                    inputs: vec![2, 4],
                    output: 3,
                },
                RoleNode::Input {
                    name: "a".into(),
                    bit: 2,
                },
                RoleNode::Gate {
                    id: "2".into(),
                    kind: GateKind::Not,
                    inputs: vec![3],
                    output: 4,
                },
            ],
        );
        assert!(matches!(
            CircuitScorer::new(&graph),
            Err(TechmapError::UnsupportedTopology { .. })
        ));
    }

    #[test]
    fn too_many_inputs_rejected_at_construction() {
        let inputs = (0..usize::BITS)
            .map(|i| RoleNode::Input {
                name: format!("in{i}"),
                bit: i + 2,
            })
            .collect();
        let graph = RoleGraph::from_nodes("wide", inputs);
        assert!(matches!(
            CircuitScorer::new(&graph),
            Err(TechmapError::TooManyInputs { inputs }) if inputs == usize::BITS as usize
        ));
    }
}
