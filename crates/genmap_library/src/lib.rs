//! The part library: User Constraint File loading and the typed part catalog.
//!
//! A UCF is three JSON documents (main, input, output), each an array of
//! records tagged with a `collection` name. [`Ucf`] keeps the raw records and
//! answers collection queries. [`Catalog::build`] resolves every input sensor,
//! output device, and gate group against its model and functions and compiles
//! the transfer functions into [`Response`]/[`Composition`] values ready for
//! scoring. [`check_conditions`] compares the library against a netlist's size
//! before any search runs.

#![warn(missing_docs)]

pub mod catalog;
pub mod check;
pub mod codes;
pub mod error;
pub mod records;
pub mod transfer;
pub mod ucf;

pub use catalog::{Catalog, Device, GateGroup, GateVariant, Sensor, Signal};
pub use check::{check_conditions, CompatibilityReport, DesignSize};
pub use error::LibraryError;
pub use transfer::{Composition, Response};
pub use ucf::{MeasurementUnits, Section, Ucf};
