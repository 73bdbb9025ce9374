//! The typed netlist view.

use crate::error::NetlistError;
use crate::yosys::{Cell, Document, Module, Port};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A primary input or output: its port name and the net bit it drives or reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetlistPort {
    /// Port name.
    pub name: String,
    /// Net bit id.
    pub bit: u32,
}

/// The two gate types a genetic circuit is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GateKind {
    /// Two-input NOR.
    Nor,
    /// One-input NOT.
    Not,
}

impl GateKind {
    /// Number of inputs a gate of this kind has.
    pub fn arity(self) -> usize {
        match self {
            GateKind::Nor => 2,
            GateKind::Not => 1,
        }
    }

    fn from_cell_type(cell_type: &str) -> Option<Self> {
        match cell_type.trim_start_matches('$').trim_matches('_') {
            "NOR" => Some(GateKind::Nor),
            "NOT" => Some(GateKind::Not),
            _ => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateKind::Nor => write!(f, "NOR"),
            GateKind::Not => write!(f, "NOT"),
        }
    }
}

/// A NOR or NOT gate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NetlistGate {
    /// Gate id: the text after the last `$` of the Yosys cell name.
    pub id: String,
    /// Gate type.
    pub kind: GateKind,
    /// Input net bits, in connection order.
    pub inputs: Vec<u32>,
    /// Output net bit.
    pub output: u32,
}

/// A validated single-module netlist of NOR and NOT gates.
///
/// Ports and gates keep the order of the JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Netlist {
    /// Module name.
    pub name: String,
    /// Primary inputs.
    pub inputs: Vec<NetlistPort>,
    /// Primary outputs.
    pub outputs: Vec<NetlistPort>,
    /// Gates.
    pub gates: Vec<NetlistGate>,
}

impl Netlist {
    /// Reads and validates a Yosys JSON netlist file.
    pub fn load(path: &Path) -> Result<Self, NetlistError> {
        let text = std::fs::read_to_string(path).map_err(|source| NetlistError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let netlist = Self::parse(&text)?;
        log::info!(
            "netlist '{}': {} inputs, {} outputs, {} gates",
            netlist.name,
            netlist.inputs.len(),
            netlist.outputs.len(),
            netlist.gates.len()
        );
        Ok(netlist)
    }

    /// Parses and validates Yosys JSON text.
    pub fn parse(text: &str) -> Result<Self, NetlistError> {
        Self::from_value(&serde_json::from_str(text)?)
    }

    /// Validates an already-parsed Yosys JSON document.
    pub fn from_value(doc: &Value) -> Result<Self, NetlistError> {
        let doc = Document::deserialize(doc)?;
        if doc.modules.len() > 1 {
            return Err(NetlistError::MultipleModules(doc.modules.len()));
        }
        let (name, module) = doc.modules.iter().next().ok_or(NetlistError::NoModule)?;
        let module = Module::deserialize(module)?;

        let mut netlist = Netlist {
            name: name.clone(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            gates: Vec::new(),
        };

        for (port_name, port) in &module.ports {
            let port = Port::deserialize(port)?;
            if port.bits.len() != 1 {
                return Err(NetlistError::MultiBitPort {
                    port: port_name.clone(),
                    width: port.bits.len(),
                });
            }
            let node = NetlistPort {
                name: port_name.clone(),
                bit: net_bit(port_name, &port.bits[0])?,
            };
            match port.direction.as_str() {
                "input" => netlist.inputs.push(node),
                "output" => netlist.outputs.push(node),
                other => {
                    return Err(NetlistError::PortDirection {
                        port: port_name.clone(),
                        direction: other.to_string(),
                    })
                }
            }
        }

        let mut used: HashSet<u32> = HashSet::new();
        for (cell_name, cell) in &module.cells {
            let cell = Cell::deserialize(cell)?;
            let gate = gate_from_cell(cell_name, &cell)?;
            used.extend(gate.inputs.iter().copied());
            used.insert(gate.output);
            netlist.gates.push(gate);
        }

        let unused: Vec<String> = netlist
            .inputs
            .iter()
            .chain(&netlist.outputs)
            .filter(|p| !used.contains(&p.bit))
            .map(|p| p.name.clone())
            .collect();
        if !unused.is_empty() {
            return Err(NetlistError::UnusedPorts(unused));
        }

        Ok(netlist)
    }

    /// Looks up a gate by id.
    pub fn gate(&self, id: &str) -> Option<&NetlistGate> {
        self.gates.iter().find(|g| g.id == id)
    }
}

fn net_bit(owner: &str, bit: &Value) -> Result<u32, NetlistError> {
    bit.as_u64()
        .and_then(|b| u32::try_from(b).ok())
        .ok_or_else(|| NetlistError::NonNetBit {
            owner: owner.to_string(),
            bit: bit.to_string(),
        })
}

fn gate_id(cell_name: &str) -> String {
    cell_name.rsplit('$').next().unwrap_or(cell_name).to_string()
}

fn gate_from_cell(cell_name: &str, cell: &Cell) -> Result<NetlistGate, NetlistError> {
    let kind =
        GateKind::from_cell_type(&cell.cell_type).ok_or_else(|| NetlistError::UnsupportedCell {
            cell: cell_name.to_string(),
            cell_type: cell.cell_type.clone(),
        })?;
    if !cell.parameters.is_empty() {
        return Err(NetlistError::CellParameters(cell_name.to_string()));
    }
    if !cell.attributes.is_empty() {
        return Err(NetlistError::CellAttributes(cell_name.to_string()));
    }
    if cell.port_directions.len() != cell.connections.len() {
        return Err(NetlistError::PinMismatch(
            cell_name.to_string(),
            cell.port_directions.len(),
            cell.connections.len(),
        ));
    }

    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    for (pin, bits) in &cell.connections {
        let bit = pin_bit(cell_name, pin, bits)?;
        match direction(&cell.port_directions, pin) {
            Some("input") => inputs.push(bit),
            Some("output") => outputs.push(bit),
            other => {
                return Err(NetlistError::PinDirection {
                    cell: cell_name.to_string(),
                    pin: pin.clone(),
                    direction: other.unwrap_or("none").to_string(),
                })
            }
        }
    }

    if inputs.len() != kind.arity() || outputs.len() != 1 {
        return Err(NetlistError::Arity {
            cell: cell_name.to_string(),
            kind: kind.to_string(),
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }

    Ok(NetlistGate {
        id: gate_id(cell_name),
        kind,
        inputs,
        output: outputs[0],
    })
}

fn direction<'a>(directions: &'a Map<String, Value>, pin: &str) -> Option<&'a str> {
    directions.get(pin)?.as_str()
}

fn pin_bit(cell_name: &str, pin: &str, bits: &Value) -> Result<u32, NetlistError> {
    let owner = format!("{cell_name}.{pin}");
    match bits.as_array() {
        Some(bits) if bits.len() == 1 => net_bit(&owner, &bits[0]),
        Some(bits) => Err(NetlistError::MultiBitPin {
            cell: cell_name.to_string(),
            pin: pin.to_string(),
            width: bits.len(),
        }),
        None => Err(NetlistError::NonNetBit {
            owner,
            bit: bits.to_string(),
        }),
    }
}
