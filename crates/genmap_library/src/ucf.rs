//! Raw UCF documents and collection queries.

use crate::error::LibraryError;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// One of the three UCF documents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Section {
    /// The main document: gates, models, functions, structures, parts, constraints.
    Main,
    /// The input-sensor document.
    Input,
    /// The output-device document.
    Output,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Main => write!(f, "main"),
            Section::Input => write!(f, "input"),
            Section::Output => write!(f, "output"),
        }
    }
}

/// Measurement standard declared by the main UCF.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeasurementUnits {
    /// Unit of every signal value (e.g. `RPU`).
    pub signal_carrier_units: Option<String>,
    /// Free-text normalization instructions.
    pub normalization_instructions: Option<String>,
}

/// A loaded User Constraint File.
#[derive(Clone, Debug)]
pub struct Ucf {
    main: Vec<Value>,
    input: Vec<Value>,
    output: Vec<Value>,
    counts: BTreeMap<String, usize>,
}

impl Ucf {
    /// Reads and parses the three UCF documents.
    pub fn load(main: &Path, input: &Path, output: &Path) -> Result<Self, LibraryError> {
        Self::from_documents(read_json(main)?, read_json(input)?, read_json(output)?)
    }

    /// Builds a UCF from already-parsed documents.
    pub fn from_documents(main: Value, input: Value, output: Value) -> Result<Self, LibraryError> {
        let main = into_records(main, Section::Main)?;
        let input = into_records(input, Section::Input)?;
        let output = into_records(output, Section::Output)?;

        let mut counts = BTreeMap::new();
        for record in &main {
            if let Some(name) = collection_of(record) {
                *counts.entry(name.to_string()).or_insert(0) += 1;
            }
        }

        log::debug!(
            "loaded UCF: {} main, {} input, {} output records",
            main.len(),
            input.len(),
            output.len()
        );

        Ok(Self {
            main,
            input,
            output,
            counts,
        })
    }

    fn records(&self, section: Section) -> &[Value] {
        match section {
            Section::Main => &self.main,
            Section::Input => &self.input,
            Section::Output => &self.output,
        }
    }

    /// Returns every record of `collection` in `section`, in document order.
    pub fn query(&self, section: Section, collection: &str) -> Vec<&Value> {
        self.records(section)
            .iter()
            .filter(|r| collection_of(r) == Some(collection))
            .collect()
    }

    /// Number of records of `collection` in the main document.
    pub fn collection_count(&self, collection: &str) -> usize {
        self.counts.get(collection).copied().unwrap_or(0)
    }

    /// Distinct collection names of a section, in first-appearance order.
    pub fn collection_names(&self, section: Section) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for record in self.records(section) {
            if let Some(name) = collection_of(record) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// The distinct key sets used by records of a main-document collection.
    pub fn list_collection_parameters(&self, collection: &str) -> Vec<Vec<String>> {
        let mut shapes: Vec<Vec<String>> = Vec::new();
        for record in self.query(Section::Main, collection) {
            if let Some(obj) = record.as_object() {
                let keys: Vec<String> = obj.keys().cloned().collect();
                if !shapes.contains(&keys) {
                    shapes.push(keys);
                }
            }
        }
        shapes
    }

    /// The version string of the main document's header record.
    pub fn version(&self) -> Option<&str> {
        self.main.first()?.get("version")?.as_str()
    }

    /// The measurement standard, if the main document declares one.
    pub fn units(&self) -> Option<MeasurementUnits> {
        let record = self.query(Section::Main, "measurement_std").into_iter().next()?;
        let field = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
        Some(MeasurementUnits {
            signal_carrier_units: field("signal_carrier_units"),
            normalization_instructions: field("normalization_instructions"),
        })
    }
}

fn collection_of(record: &Value) -> Option<&str> {
    record.get("collection")?.as_str()
}

fn read_json(path: &Path) -> Result<Value, LibraryError> {
    let text = std::fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| LibraryError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn into_records(doc: Value, section: Section) -> Result<Vec<Value>, LibraryError> {
    match doc {
        Value::Array(records) => Ok(records),
        _ => Err(LibraryError::NotAnArray(section.to_string())),
    }
}
