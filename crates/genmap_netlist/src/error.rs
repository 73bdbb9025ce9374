//! Errors raised while loading or validating a netlist.

use std::path::PathBuf;

/// Every way a Yosys netlist can be unusable for technology mapping.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The netlist file could not be read.
    #[error("failed to read netlist '{}': {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The netlist is not valid JSON or lacks the Yosys document shape.
    #[error("failed to parse netlist: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no module.
    #[error("netlist has no module")]
    NoModule,

    /// The document has more than one module.
    #[error("netlist has {0} modules, only one circuit per design is supported")]
    MultipleModules(usize),

    /// A port is wider than one bit.
    #[error("port '{port}' is {width} bits wide, only single-bit ports are supported")]
    MultiBitPort {
        /// The port name.
        port: String,
        /// Its width.
        width: usize,
    },

    /// A port direction other than `input` or `output`.
    #[error("port '{port}' has unsupported direction '{direction}'")]
    PortDirection {
        /// The port name.
        port: String,
        /// The direction found.
        direction: String,
    },

    /// A connection to a constant or otherwise non-numeric bit.
    #[error("'{owner}' connects to non-net bit {bit}")]
    NonNetBit {
        /// The port or cell.
        owner: String,
        /// The bit as written in the netlist.
        bit: String,
    },

    /// A cell that is not a NOR or NOT gate.
    #[error("cell '{cell}' has type '{cell_type}', only $_NOR_ and $_NOT_ are supported")]
    UnsupportedCell {
        /// The cell name.
        cell: String,
        /// The cell type.
        cell_type: String,
    },

    /// A cell still carrying parameters.
    #[error("cell '{0}' has parameters")]
    CellParameters(String),

    /// A cell still carrying attributes.
    #[error("cell '{0}' has attributes")]
    CellAttributes(String),

    /// Port directions and connections disagree.
    #[error("cell '{0}' declares {1} port directions for {2} connections")]
    PinMismatch(String, usize, usize),

    /// A cell pin connected to more than one bit.
    #[error("cell '{cell}' pin '{pin}' connects {width} bits")]
    MultiBitPin {
        /// The cell name.
        cell: String,
        /// The pin name.
        pin: String,
        /// The number of bits.
        width: usize,
    },

    /// A cell pin direction other than `input` or `output`.
    #[error("cell '{cell}' pin '{pin}' has unsupported direction '{direction}'")]
    PinDirection {
        /// The cell name.
        cell: String,
        /// The pin name.
        pin: String,
        /// The direction found.
        direction: String,
    },

    /// A gate with the wrong number of inputs or outputs for its type.
    #[error("{kind} cell '{cell}' has {inputs} inputs and {outputs} outputs")]
    Arity {
        /// The cell name.
        cell: String,
        /// The gate type.
        kind: String,
        /// Input pin count.
        inputs: usize,
        /// Output pin count.
        outputs: usize,
    },

    /// Ports whose bit no cell connects to.
    #[error("ports {0:?} are not used by any gate")]
    UnusedPorts(Vec<String>),
}
