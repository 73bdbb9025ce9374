//! The role graph: typed placeholders for the parts a netlist needs.
//!
//! Nodes are allocated inputs first, then gates, then outputs, so a node's
//! index is also its truth-table column. Each node's predecessors are
//! resolved from net bits once, at construction.

use crate::error::TechmapError;
use genmap_common::{define_id, InternalError};
use genmap_library::DesignSize;
use genmap_netlist::{GateKind, Netlist};
use std::collections::HashMap;
use std::fmt;

define_id!(
    /// Opaque index of a node in a [`RoleGraph`].
    NodeId
);

/// A netlist role waiting for a part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoleNode {
    /// A primary input, to be bound to an input sensor.
    Input {
        /// Port name.
        name: String,
        /// Net bit the input drives.
        bit: u32,
    },
    /// A logic gate, to be bound to a gate group.
    Gate {
        /// Netlist gate id.
        id: String,
        /// NOR or NOT.
        kind: GateKind,
        /// Net bits read, in pin order.
        inputs: Vec<u32>,
        /// Net bit driven.
        output: u32,
    },
    /// A primary output, to be bound to an output device.
    Output {
        /// Port name.
        name: String,
        /// Net bit the output reads.
        bit: u32,
    },
}

impl RoleNode {
    /// The port name or gate id.
    pub fn name(&self) -> &str {
        match self {
            RoleNode::Input { name, .. } | RoleNode::Output { name, .. } => name,
            RoleNode::Gate { id, .. } => id,
        }
    }
}

impl fmt::Display for RoleNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleNode::Input { name, bit } => write!(f, "input '{name}' (bit {bit})"),
            RoleNode::Gate { id, kind, .. } => write!(f, "{kind} gate {id}"),
            RoleNode::Output { name, bit } => write!(f, "output '{name}' (bit {bit})"),
        }
    }
}

#[derive(Clone, Debug)]
enum Wiring {
    Source,
    Resolved(Vec<NodeId>),
    Unresolved { bit: u32 },
    Ambiguous { bit: u32, drivers: usize },
}

/// The placeholder graph of one netlist.
#[derive(Clone, Debug)]
pub struct RoleGraph {
    name: String,
    nodes: Vec<RoleNode>,
    wiring: Vec<Wiring>,
    input_count: usize,
    gate_count: usize,
}

impl RoleGraph {
    /// Builds the role graph of a validated netlist.
    pub fn from_netlist(netlist: &Netlist) -> Self {
        let mut nodes = Vec::with_capacity(
            netlist.inputs.len() + netlist.gates.len() + netlist.outputs.len(),
        );
        nodes.extend(netlist.inputs.iter().map(|p| RoleNode::Input {
            name: p.name.clone(),
            bit: p.bit,
        }));
        nodes.extend(netlist.gates.iter().map(|g| RoleNode::Gate {
            id: g.id.clone(),
            kind: g.kind,
            inputs: g.inputs.clone(),
            output: g.output,
        }));
        nodes.extend(netlist.outputs.iter().map(|p| RoleNode::Output {
            name: p.name.clone(),
            bit: p.bit,
        }));
        Self::from_nodes(netlist.name.clone(), nodes)
    }

    /// Builds a role graph from nodes already in input, gate, output order.
    pub fn from_nodes(name: impl Into<String>, mut nodes: Vec<RoleNode>) -> Self {
        nodes.sort_by_key(|n| match n {
            RoleNode::Input { .. } => 0,
            RoleNode::Gate { .. } => 1,
            RoleNode::Output { .. } => 2,
        });
        let input_count = nodes
            .iter()
            .filter(|n| matches!(n, RoleNode::Input { .. }))
            .count();
        let gate_count = nodes
            .iter()
            .filter(|n| matches!(n, RoleNode::Gate { .. }))
            .count();

        let mut drivers: HashMap<u32, Vec<NodeId>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            let id = NodeId::from_raw(i as u32);
            match node {
                RoleNode::Input { bit, .. } => drivers.entry(*bit).or_default().push(id),
                RoleNode::Gate { output, .. } => drivers.entry(*output).or_default().push(id),
                RoleNode::Output { .. } => {}
            }
        }

        let gate_drivers = |bit: u32| -> Vec<NodeId> {
            drivers
                .get(&bit)
                .map(|ids| {
                    ids.iter()
                        .copied()
                        .filter(|id| matches!(nodes[id.index()], RoleNode::Gate { .. }))
                        .collect()
                })
                .unwrap_or_default()
        };
        let resolve = |bits: &[u32], candidates: &dyn Fn(u32) -> Vec<NodeId>| -> Wiring {
            let mut preds = Vec::with_capacity(bits.len());
            for &bit in bits {
                let found = candidates(bit);
                match found.len() {
                    0 => return Wiring::Unresolved { bit },
                    1 => preds.push(found[0]),
                    n => return Wiring::Ambiguous { bit, drivers: n },
                }
            }
            Wiring::Resolved(preds)
        };
        let any_driver = |bit: u32| drivers.get(&bit).cloned().unwrap_or_default();

        let wiring = nodes
            .iter()
            .map(|node| match node {
                RoleNode::Input { .. } => Wiring::Source,
                RoleNode::Gate { inputs, .. } => resolve(inputs.as_slice(), &any_driver),
                RoleNode::Output { bit, .. } => resolve(&[*bit], &gate_drivers),
            })
            .collect();

        Self {
            name: name.into(),
            nodes,
            wiring,
            input_count,
            gate_count,
        }
    }

    /// The design name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node with the given id.
    pub fn node(&self, id: NodeId) -> &RoleNode {
        &self.nodes[id.index()]
    }

    /// All node ids, in column order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId::from_raw)
    }

    /// Input node ids.
    pub fn inputs(&self) -> impl Iterator<Item = NodeId> {
        (0..self.input_count as u32).map(NodeId::from_raw)
    }

    /// Gate node ids.
    pub fn gates(&self) -> impl Iterator<Item = NodeId> {
        let start = self.input_count as u32;
        (start..start + self.gate_count as u32).map(NodeId::from_raw)
    }

    /// Output node ids.
    pub fn outputs(&self) -> impl Iterator<Item = NodeId> {
        let start = (self.input_count + self.gate_count) as u32;
        (start..self.nodes.len() as u32).map(NodeId::from_raw)
    }

    /// Inputs, outputs, and gates the design needs.
    pub fn size(&self) -> DesignSize {
        DesignSize {
            inputs: self.input_count,
            outputs: self.nodes.len() - self.input_count - self.gate_count,
            gates: self.gate_count,
        }
    }

    /// Position of an input node among the inputs (0 = most significant
    /// truth-table bit), or `None` for other nodes.
    pub fn input_position(&self, id: NodeId) -> Option<usize> {
        (id.index() < self.input_count).then_some(id.index())
    }

    /// The nodes feeding `id`.
    ///
    /// An output's predecessor is the unique gate driving its bit; a gate's
    /// predecessors are the unique gate or input driving each of its input
    /// bits, in pin order. Inputs have no predecessor.
    pub fn find_predecessor(&self, id: NodeId) -> Result<&[NodeId], TechmapError> {
        match &self.wiring[id.index()] {
            Wiring::Resolved(preds) => Ok(preds),
            Wiring::Source => Err(InternalError::new(format!(
                "{} has no predecessor",
                self.node(id)
            ))
            .into()),
            Wiring::Unresolved { bit } => Err(TechmapError::UnresolvedPredecessor {
                node: self.node(id).to_string(),
                bit: *bit,
            }),
            Wiring::Ambiguous { bit, drivers } => Err(TechmapError::AmbiguousPredecessor {
                node: self.node(id).to_string(),
                bit: *bit,
                drivers: *drivers,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genmap_netlist::{NetlistGate, NetlistPort};

    fn port(name: &str, bit: u32) -> NetlistPort {
        NetlistPort {
            name: name.into(),
            bit,
        }
    }

    fn and_gate() -> Netlist {
        Netlist {
            name: "and_gate".into(),
            inputs: vec![port("a", 2), port("b", 3)],
            outputs: vec![port("out", 4)],
            gates: vec![
                NetlistGate {
                    id: "147".into(),
                    kind: GateKind::Not,
                    inputs: vec![2],
                    output: 5,
                },
                NetlistGate {
                    id: "148".into(),
                    kind: GateKind::Not,
                    inputs: vec![3],
                    output: 6,
                },
                NetlistGate {
                    id: "149".into(),
                    kind: GateKind::Nor,
                    inputs: vec![5, 6],
                    output: 4,
                },
            ],
        }
    }

    #[test]
    fn nodes_in_column_order() {
        let graph = RoleGraph::from_netlist(&and_gate());
        let names: Vec<&str> = graph.ids().map(|id| graph.node(id).name()).collect();
        assert_eq!(names, vec!["a", "b", "147", "148", "149", "out"]);
        assert_eq!(graph.inputs().count(), 2);
        assert_eq!(graph.gates().count(), 3);
        assert_eq!(graph.outputs().map(|o| o.index()).collect::<Vec<_>>(), vec![5]);
        assert_eq!(
            graph.size(),
            DesignSize {
                inputs: 2,
                outputs: 1,
                gates: 3
            }
        );
    }

    #[test]
    fn predecessors_resolved_by_bit() {
        let graph = RoleGraph::from_netlist(&and_gate());
        let id = |i: u32| NodeId::from_raw(i);
        assert_eq!(graph.find_predecessor(id(2)).unwrap(), &[id(0)]);
        assert_eq!(graph.find_predecessor(id(4)).unwrap(), &[id(2), id(3)]);
        assert_eq!(graph.find_predecessor(id(5)).unwrap(), &[id(4)]);
    }

    #[test]
    fn input_has_no_predecessor() {
        let graph = RoleGraph::from_netlist(&and_gate());
        assert!(matches!(
            graph.find_predecessor(NodeId::from_raw(0)),
            Err(TechmapError::Internal(_))
        ));
        assert_eq!(graph.input_position(NodeId::from_raw(1)), Some(1));
        assert_eq!(graph.input_position(NodeId::from_raw(2)), None);
    }

    #[test]
    fn output_driven_by_input_is_unresolved() {
        let graph = RoleGraph::from_nodes(
            "wire",
            vec![
                RoleNode::Input {
                    name: "a".into(),
                    bit: 2,
                },
                RoleNode::Output {
                    name: "y".into(),
                    bit: 2,
                },
            ],
        );
        assert!(matches!(
            graph.find_predecessor(NodeId::from_raw(1)),
            Err(TechmapError::UnresolvedPredecessor { bit: 2, .. })
        ));
    }

    #[test]
    fn doubly_driven_bit_is_ambiguous() {
        let mut netlist = and_gate();
        netlist.gates[1].output = 5;
        let graph = RoleGraph::from_netlist(&netlist);
        assert!(matches!(
            graph.find_predecessor(NodeId::from_raw(4)),
            Err(TechmapError::AmbiguousPredecessor {
                bit: 5,
                drivers: 2,
                ..
            })
        ));
    }

    #[test]
    fn from_nodes_sorts_roles() {
        let graph = RoleGraph::from_nodes(
            "mixed",
            vec![
                RoleNode::Output {
                    name: "y".into(),
                    bit: 3,
                },
                RoleNode::Gate {
                    id: "1".into(),
                    kind: GateKind::Not,
                    inputs: vec![2],
                    output: 3,
                },
                RoleNode::Input {
                    name: "a".into(),
                    bit: 2,
                },
            ],
        );
        assert_eq!(graph.node(NodeId::from_raw(0)).name(), "a");
        assert_eq!(graph.node(NodeId::from_raw(2)).name(), "y");
    }
}
