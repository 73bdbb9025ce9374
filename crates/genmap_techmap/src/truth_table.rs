//! The scored truth table of one assignment.

use crate::error::TechmapError;
use crate::role::{NodeId, RoleGraph};
use genmap_common::Level;
use serde::Serialize;
use std::fmt;

/// One row: binary level, analog value, and chosen variant per node.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TruthRow {
    /// Binary level per node, in column order.
    pub io: Vec<Level>,
    /// Analog value per node.
    pub scores: Vec<f64>,
    /// Variant chosen for each gate node; `None` for inputs and outputs.
    pub variants: Vec<Option<String>>,
}

/// A single table cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cell {
    /// A binary column.
    Bit(Level),
    /// An analog column.
    Value(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bit(level) => write!(f, "{level}"),
            Cell::Value(v) => write!(f, "{v:.2e}"),
        }
    }
}

/// `2^inputs` rows over every node of a role graph.
///
/// Row `r` sets input `i` to bit `inputs - 1 - i` of `r`, so the first input
/// is the most significant. Columns are grouped by role: inputs, gates,
/// outputs, each as a block of binary (`<name>_I/O`) columns followed by a
/// block of analog (`<name>`) columns.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TruthTable {
    names: Vec<String>,
    inputs: usize,
    gates: usize,
    rows: Vec<TruthRow>,
}

impl TruthTable {
    /// Creates an empty table whose columns are named `names`, in node order.
    pub fn new(graph: &RoleGraph, names: Vec<String>) -> Self {
        let size = graph.size();
        Self {
            names,
            inputs: size.inputs,
            gates: size.gates,
            rows: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, row: TruthRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows, in input-combination order.
    pub fn rows(&self) -> &[TruthRow] {
        &self.rows
    }

    /// Column names (bound part names), in node order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Binary level of `node` in `row`.
    pub fn io(&self, row: usize, node: NodeId) -> Level {
        self.rows[row].io[node.index()]
    }

    /// Analog value of `node` in `row`.
    pub fn score(&self, row: usize, node: NodeId) -> f64 {
        self.rows[row].scores[node.index()]
    }

    /// Variant chosen for gate `node` in `row`.
    pub fn variant(&self, row: usize, node: NodeId) -> Option<&str> {
        self.rows[row].variants[node.index()].as_deref()
    }

    fn blocks(&self) -> [std::ops::Range<usize>; 3] {
        let gates_end = self.inputs + self.gates;
        [
            0..self.inputs,
            self.inputs..gates_end,
            gates_end..self.names.len(),
        ]
    }

    /// Column labels in table order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::with_capacity(self.names.len() * 2);
        for block in self.blocks() {
            labels.extend(self.names[block.clone()].iter().map(|n| format!("{n}_I/O")));
            labels.extend(self.names[block].iter().cloned());
        }
        labels
    }

    /// The cells of `row`, aligned with [`labels`](Self::labels).
    pub fn cells(&self, row: usize) -> Vec<Cell> {
        let row = &self.rows[row];
        let mut cells = Vec::with_capacity(self.names.len() * 2);
        for block in self.blocks() {
            cells.extend(row.io[block.clone()].iter().map(|&l| Cell::Bit(l)));
            cells.extend(row.scores[block].iter().map(|&v| Cell::Value(v)));
        }
        cells
    }

    /// Analog columns (names and per-row values) in node order.
    pub fn activity(&self) -> (Vec<&str>, Vec<Vec<f64>>) {
        let names = self.names.iter().map(String::as_str).collect();
        let rows = self.rows.iter().map(|r| r.scores.clone()).collect();
        (names, rows)
    }

    /// Binary columns (labels and per-row bits) in node order.
    pub fn logic(&self) -> (Vec<String>, Vec<Vec<Level>>) {
        let labels = self.names.iter().map(|n| format!("{n}_I/O")).collect();
        let rows = self.rows.iter().map(|r| r.io.clone()).collect();
        (labels, rows)
    }
}

/// `2^inputs`, or [`TechmapError::TooManyInputs`] if that overflows `usize`.
pub(crate) fn row_count(inputs: usize) -> Result<usize, TechmapError> {
    u32::try_from(inputs)
        .ok()
        .and_then(|width| 1usize.checked_shl(width))
        .ok_or(TechmapError::TooManyInputs { inputs })
}
