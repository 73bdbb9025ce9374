//! Binding catalog parts onto the role graph, and per-node scoring.
//!
//! An [`Assignment`] is cheap: it borrows the shared [`RoleGraph`] and the
//! catalog and holds one [`PartBinding`] per node. Everything that changes
//! from row to row (input levels, memoized signals, chosen variants) lives in
//! a [`RowState`].

use crate::error::TechmapError;
use crate::role::{NodeId, RoleGraph, RoleNode};
use genmap_common::{InternalError, Level};
use genmap_library::{Catalog, Device, GateGroup, Sensor, Signal};
use genmap_netlist::GateKind;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashSet;

/// One point of the search space: catalog indices for every input, output,
/// and gate, in role-graph order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Candidate {
    /// Sensor index per input node.
    pub inputs: Vec<usize>,
    /// Device index per output node.
    pub outputs: Vec<usize>,
    /// Gate-group index per gate node.
    pub groups: Vec<usize>,
}

impl Candidate {
    /// Part names in input, output, gate order. Indices out of range are
    /// skipped.
    pub fn names<'c>(&self, catalog: &'c Catalog) -> Vec<&'c str> {
        let inputs = self
            .inputs
            .iter()
            .filter_map(|&i| catalog.sensors.get(i).map(|s| s.name.as_str()));
        let outputs = self
            .outputs
            .iter()
            .filter_map(|&i| catalog.devices.get(i).map(|d| d.name.as_str()));
        let groups = self
            .groups
            .iter()
            .filter_map(|&i| catalog.groups.get(i).map(|g| g.name.as_str()));
        inputs.chain(outputs).chain(groups).collect()
    }

    /// Returns `true` if every chosen part name is distinct and every index
    /// resolves.
    pub fn is_unique(&self, catalog: &Catalog) -> bool {
        let names = self.names(catalog);
        let expected = self.inputs.len() + self.outputs.len() + self.groups.len();
        names.len() == expected && names.iter().collect::<HashSet<_>>().len() == expected
    }
}

/// The part bound to one node.
#[derive(Clone, Copy, Debug)]
pub enum PartBinding<'a> {
    /// An input sensor.
    Sensor(&'a Sensor),
    /// An output device.
    Device(&'a Device),
    /// A gate group; one variant is chosen per row.
    Group(&'a GateGroup),
}

impl<'a> PartBinding<'a> {
    /// The bound part or group name.
    pub fn name(&self) -> &'a str {
        match self {
            PartBinding::Sensor(s) => &s.name,
            PartBinding::Device(d) => &d.name,
            PartBinding::Group(g) => &g.name,
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Mark {
    Unvisited,
    Visiting,
    Done(Signal),
}

/// Per-row evaluation state.
#[derive(Clone, Debug)]
pub struct RowState {
    levels: Vec<Option<Level>>,
    marks: Vec<Mark>,
    chosen: Vec<Option<usize>>,
}

impl RowState {
    /// Creates an empty state for `graph`: no input levels set.
    pub fn new(graph: &RoleGraph) -> Self {
        Self {
            levels: vec![None; graph.size().inputs],
            marks: vec![Mark::Unvisited; graph.len()],
            chosen: vec![None; graph.len()],
        }
    }

    /// Sets the active level of an input node. Other nodes are ignored.
    pub fn set_level(&mut self, graph: &RoleGraph, node: NodeId, level: Level) {
        if let Some(pos) = graph.input_position(node) {
            self.levels[pos] = Some(level);
        }
    }

    /// The signal computed for `node`, if it has been scored.
    pub fn signal(&self, node: NodeId) -> Option<Signal> {
        match self.marks.get(node.index()) {
            Some(Mark::Done(signal)) => Some(*signal),
            _ => None,
        }
    }

    /// Index of the variant chosen for a gate node in this row.
    pub fn chosen_variant(&self, node: NodeId) -> Option<usize> {
        self.chosen.get(node.index()).copied().flatten()
    }
}

/// Parts bound onto every node of a role graph.
#[derive(Clone, Debug)]
pub struct Assignment<'a> {
    graph: &'a RoleGraph,
    parts: Vec<PartBinding<'a>>,
}

impl<'a> Assignment<'a> {
    /// Binds a candidate's parts onto `graph`.
    pub fn bind(
        graph: &'a RoleGraph,
        catalog: &'a Catalog,
        candidate: &Candidate,
    ) -> Result<Self, TechmapError> {
        let size = graph.size();
        if candidate.inputs.len() != size.inputs
            || candidate.outputs.len() != size.outputs
            || candidate.groups.len() != size.gates
        {
            return Err(InternalError::new(format!(
                "candidate shape {}/{}/{} does not match design {}/{}/{}",
                candidate.inputs.len(),
                candidate.outputs.len(),
                candidate.groups.len(),
                size.inputs,
                size.outputs,
                size.gates
            ))
            .into());
        }

        let missing = |kind: &str, i: usize| InternalError::new(format!("no {kind} at index {i}"));
        let mut parts = Vec::with_capacity(graph.len());
        for &i in &candidate.inputs {
            let sensor = catalog.sensors.get(i).ok_or_else(|| missing("sensor", i))?;
            parts.push(PartBinding::Sensor(sensor));
        }
        for &i in &candidate.groups {
            let group = catalog.groups.get(i).ok_or_else(|| missing("gate group", i))?;
            parts.push(PartBinding::Group(group));
        }
        for &i in &candidate.outputs {
            let device = catalog.devices.get(i).ok_or_else(|| missing("device", i))?;
            parts.push(PartBinding::Device(device));
        }
        Ok(Self { graph, parts })
    }

    /// The role graph the parts are bound to.
    pub fn graph(&self) -> &'a RoleGraph {
        self.graph
    }

    /// The part bound to `node`.
    pub fn part(&self, node: NodeId) -> PartBinding<'a> {
        self.parts[node.index()]
    }

    /// Bound part names in node (column) order.
    pub fn names(&self) -> Vec<&'a str> {
        self.parts.iter().map(PartBinding::name).collect()
    }

    /// Returns `true` if no part name is bound twice.
    pub fn is_unique(&self) -> bool {
        let names = self.names();
        names.iter().collect::<HashSet<_>>().len() == names.len()
    }

    /// The nodes feeding `node`.
    pub fn find_predecessor(&self, node: NodeId) -> Result<&'a [NodeId], TechmapError> {
        self.graph.find_predecessor(node)
    }

    /// Scores `node` in the current row, scoring its predecessors first.
    ///
    /// Results are memoized in `state`; reaching a node that is still being
    /// scored means the wiring is cyclic.
    pub fn score(&self, node: NodeId, state: &mut RowState) -> Result<Signal, TechmapError> {
        match state.marks[node.index()] {
            Mark::Done(signal) => return Ok(signal),
            Mark::Visiting => {
                return Err(TechmapError::UnsupportedTopology {
                    node: self.graph.node(node).to_string(),
                })
            }
            Mark::Unvisited => {}
        }
        state.marks[node.index()] = Mark::Visiting;
        let signal = self.compute(node, state)?;
        state.marks[node.index()] = Mark::Done(signal);
        Ok(signal)
    }

    fn compute(&self, node: NodeId, state: &mut RowState) -> Result<Signal, TechmapError> {
        let role = self.graph.node(node);
        match (role, self.part(node)) {
            (RoleNode::Input { .. }, PartBinding::Sensor(sensor)) => {
                let level = self
                    .graph
                    .input_position(node)
                    .and_then(|pos| state.levels[pos])
                    .ok_or_else(|| TechmapError::InputLevelUnset {
                        node: role.to_string(),
                    })?;
                Ok(sensor.signal(level))
            }
            (RoleNode::Output { .. }, PartBinding::Device(device)) => {
                let x = self.score(self.single_predecessor(node)?, state)?.value;
                Ok(Signal {
                    value: device.response.eval(x),
                    tandem: 0.0,
                })
            }
            (RoleNode::Gate { kind, .. }, PartBinding::Group(group)) => {
                let preds = self.find_predecessor(node)?;
                let x = match (kind, preds) {
                    (GateKind::Not, [a]) => self.score(*a, state)?.value,
                    (GateKind::Nor, [a, b]) => {
                        let first = self.score(*a, state)?;
                        let second = self.score(*b, state)?;
                        group.composition.eval(first.value, second.value, first.tandem)
                    }
                    _ => {
                        return Err(InternalError::new(format!(
                            "{role} has {} predecessors",
                            preds.len()
                        ))
                        .into())
                    }
                };
                let (index, signal) = best_variant(group, x).ok_or_else(|| {
                    InternalError::new(format!("gate group '{}' has no variants", group.name))
                })?;
                state.chosen[node.index()] = Some(index);
                Ok(signal)
            }
            (role, part) => Err(InternalError::new(format!(
                "{role} is bound to incompatible part '{}'",
                part.name()
            ))
            .into()),
        }
    }

    fn single_predecessor(&self, node: NodeId) -> Result<NodeId, TechmapError> {
        match self.find_predecessor(node)? {
            [pred] => Ok(*pred),
            preds => Err(InternalError::new(format!(
                "{} has {} predecessors",
                self.graph.node(node),
                preds.len()
            ))
            .into()),
        }
    }
}

/// Evaluates every variant at `x` and keeps the one with the highest output.
///
/// Equal outputs go to the lexicographically greater variant name, then to
/// the greater tandem factor.
fn best_variant(group: &GateGroup, x: f64) -> Option<(usize, Signal)> {
    let mut best: Option<(usize, Signal)> = None;
    for (i, variant) in group.variants.iter().enumerate() {
        let signal = variant.signal(x);
        let wins = match best {
            None => true,
            Some((j, b)) => match signal.value.total_cmp(&b.value) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => match variant.name.cmp(&group.variants[j].name) {
                    Ordering::Greater => true,
                    Ordering::Less => false,
                    Ordering::Equal => signal.tandem > b.tandem,
                },
            },
        };
        if wins {
            best = Some((i, signal));
        }
    }
    best
}
