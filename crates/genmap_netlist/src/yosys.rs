//! Serde view of the Yosys `write_json` format.

use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    pub modules: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Module {
    #[serde(default)]
    pub ports: Map<String, Value>,
    #[serde(default)]
    pub cells: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Port {
    pub direction: String,
    pub bits: Vec<Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Cell {
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default)]
    pub attributes: Map<String, Value>,
    #[serde(default)]
    pub port_directions: Map<String, Value>,
    #[serde(default)]
    pub connections: Map<String, Value>,
}
