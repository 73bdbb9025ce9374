//! The typed part catalog.
//!
//! Every part is resolved against its model (the record named by the part's
//! `model` field, or `<name>_model`) and the model's functions. Parts whose
//! model cannot be resolved are skipped with a [`PART_SKIPPED`] warning.
//! Functions without an `equation` (toxicity and cytometry tables) are not
//! transfer functions and are ignored.

use crate::codes::{MIXED_GATE_TYPES, PART_SKIPPED};
use crate::error::LibraryError;
use crate::records::{decode, FunctionRecord, ModelRecord, PartRecord};
use crate::transfer::{compile_tandem, eval_state, resolve_parameters, Composition, Response};
use crate::ucf::{MeasurementUnits, Section, Ucf};
use genmap_common::Level;
use genmap_diagnostics::{Diagnostic, DiagnosticSink};
use genmap_expr::Compiled;
use std::collections::HashMap;

const RESPONSE_FUNCTION: &str = "response_function";
const INPUT_COMPOSITION: &str = "input_composition";
const TANDEM_FACTOR: &str = "tandem_interference_factor";

/// A signal on a wire: its analog value and the tandem interference factor
/// it presents to a downstream composition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Signal {
    /// Analog output level.
    pub value: f64,
    /// Tandem interference factor; `0.0` when the model declares none.
    pub tandem: f64,
}

/// An input sensor with its output precomputed at both input levels.
#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    /// Part name.
    pub name: String,
    /// Output when the inducer is absent.
    pub low: Signal,
    /// Output when the inducer is present.
    pub high: Signal,
}

impl Sensor {
    /// The sensor's output at `level`.
    pub fn signal(&self, level: Level) -> Signal {
        match level {
            Level::Low => self.low,
            Level::High => self.high,
        }
    }
}

/// An output device.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    /// Part name.
    pub name: String,
    /// Transfer from the driving gate's output to the reported signal.
    pub response: Response,
}

/// One concrete gate of a group.
#[derive(Clone, Debug, PartialEq)]
pub struct GateVariant {
    /// Part name.
    pub name: String,
    /// Response to the composed input.
    pub response: Response,
    /// Tandem interference factor as a function of the composed input.
    pub tandem: Option<Compiled>,
}

impl GateVariant {
    /// Evaluates the variant at composed input `x`.
    pub fn signal(&self, x: f64) -> Signal {
        let value = self.response.eval(x);
        let tandem = self.tandem.as_ref().map_or(0.0, |t| t.eval(&[x]));
        Signal { value, tandem }
    }
}

/// A gate-equivalence group: interchangeable gates built on one repressor.
///
/// Only one variant of a group may appear in a circuit, so groups (not
/// individual gates) are what the search assigns to netlist gates.
#[derive(Clone, Debug, PartialEq)]
pub struct GateGroup {
    /// Group name.
    pub name: String,
    /// Declared gate type of the first variant.
    pub gate_type: Option<String>,
    /// How two predecessor signals combine, taken from the first variant.
    pub composition: Composition,
    /// The concrete gates, in UCF order.
    pub variants: Vec<GateVariant>,
}

/// All parts of a UCF, compiled for scoring.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    /// Input sensors, in UCF order.
    pub sensors: Vec<Sensor>,
    /// Output devices, in UCF order.
    pub devices: Vec<Device>,
    /// Gate groups, in order of first appearance.
    pub groups: Vec<GateGroup>,
    /// Measurement standard, if declared.
    pub units: Option<MeasurementUnits>,
}

impl Catalog {
    /// Resolves and compiles every part of `ucf`.
    ///
    /// Malformed records are errors. Parts with missing models, functions, or
    /// parameters are left out and reported to `sink`.
    pub fn build(ucf: &Ucf, sink: &DiagnosticSink) -> Result<Self, LibraryError> {
        let main = SectionIndex::new(ucf, Section::Main)?;
        let input = SectionIndex::new(ucf, Section::Input)?;
        let output = SectionIndex::new(ucf, Section::Output)?;

        let mut catalog = Catalog {
            units: ucf.units(),
            ..Catalog::default()
        };

        for record in ucf.query(Section::Input, "input_sensors") {
            let part: PartRecord = decode("input_sensors", record)?;
            match build_sensor(&part, &input, &main) {
                Ok(sensor) => catalog.sensors.push(sensor),
                Err(err) => skip(sink, &part, &err),
            }
        }

        for record in ucf.query(Section::Output, "output_devices") {
            let part: PartRecord = decode("output_devices", record)?;
            match build_device(&part, &output, &main) {
                Ok(device) => catalog.devices.push(device),
                Err(err) => skip(sink, &part, &err),
            }
        }

        let mut group_index: HashMap<String, usize> = HashMap::new();
        for record in ucf.query(Section::Main, "gates") {
            let part: PartRecord = decode("gates", record)?;
            let group_name = part.group.clone().unwrap_or_else(|| part.name.clone());
            let (model, variant) = match build_variant(&part, &main) {
                Ok(built) => built,
                Err(err) => {
                    skip(sink, &part, &err);
                    continue;
                }
            };

            if let Some(&i) = group_index.get(&group_name) {
                let group = &mut catalog.groups[i];
                if part.gate_type.is_some() && part.gate_type != group.gate_type {
                    sink.emit(
                        Diagnostic::warning(
                            MIXED_GATE_TYPES,
                            format!("gate group '{group_name}' mixes gate types"),
                        )
                        .with_subject(part.name.clone())
                        .with_note("the group is scored with the first variant's composition"),
                    );
                }
                group.variants.push(variant);
                continue;
            }

            let composition = match build_composition(model, &main) {
                Ok(c) => c,
                Err(err) => {
                    skip(sink, &part, &err);
                    continue;
                }
            };
            group_index.insert(group_name.clone(), catalog.groups.len());
            catalog.groups.push(GateGroup {
                name: group_name,
                gate_type: part.gate_type.clone(),
                composition,
                variants: vec![variant],
            });
        }

        log::info!(
            "catalog: {} sensors, {} devices, {} gate groups",
            catalog.sensors.len(),
            catalog.devices.len(),
            catalog.groups.len()
        );
        Ok(catalog)
    }

    /// Looks up a sensor by name.
    pub fn sensor(&self, name: &str) -> Option<&Sensor> {
        self.sensors.iter().find(|s| s.name == name)
    }

    /// Looks up a device by name.
    pub fn device(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Looks up a gate group by name.
    pub fn group(&self, name: &str) -> Option<&GateGroup> {
        self.groups.iter().find(|g| g.name == name)
    }
}

fn skip(sink: &DiagnosticSink, part: &PartRecord, err: &LibraryError) {
    log::debug!("skipping part '{}': {err}", part.name);
    sink.emit(
        Diagnostic::warning(PART_SKIPPED, format!("part '{}' left out of the catalog", part.name))
            .with_subject(part.name.clone())
            .with_note(err.to_string()),
    );
}

/// Models and functions of one UCF document, by name.
struct SectionIndex {
    models: HashMap<String, ModelRecord>,
    functions: HashMap<String, FunctionRecord>,
}

impl SectionIndex {
    fn new(ucf: &Ucf, section: Section) -> Result<Self, LibraryError> {
        let mut models = HashMap::new();
        for record in ucf.query(section, "models") {
            let model: ModelRecord = decode("models", record)?;
            models.insert(model.name.clone(), model);
        }
        let mut functions = HashMap::new();
        for record in ucf.query(section, "functions") {
            let function: FunctionRecord = decode("functions", record)?;
            if function.equation.is_some() {
                functions.insert(function.name.clone(), function);
            }
        }
        Ok(Self { models, functions })
    }

    fn model(&self, part: &PartRecord) -> Result<&ModelRecord, LibraryError> {
        let name = part.model_name();
        self.models
            .get(&name)
            .ok_or_else(|| LibraryError::MissingModel {
                part: part.name.clone(),
                model: name,
            })
    }
}

/// Resolves the function a model binds to `role`, looking in the part's own
/// document first and then in the main document.
fn function<'a>(
    model: &ModelRecord,
    role: &str,
    own: &'a SectionIndex,
    main: &'a SectionIndex,
) -> Option<&'a FunctionRecord> {
    let name = model.function(role)?;
    own.functions.get(name).or_else(|| main.functions.get(name))
}

fn required<'a>(
    model: &ModelRecord,
    role: &str,
    own: &'a SectionIndex,
    main: &'a SectionIndex,
) -> Result<&'a FunctionRecord, LibraryError> {
    function(model, role, own, main).ok_or_else(|| LibraryError::MissingFunction {
        model: model.name.clone(),
        role: role.to_string(),
    })
}

fn build_sensor(
    part: &PartRecord,
    own: &SectionIndex,
    main: &SectionIndex,
) -> Result<Sensor, LibraryError> {
    let model = own.model(part)?;
    let response = required(model, RESPONSE_FUNCTION, own, main)?;
    let response_params = resolve_parameters(model, response);
    let tandem_factor = function(model, TANDEM_FACTOR, own, main);

    let signal = |level: Level| -> Result<Signal, LibraryError> {
        let state = f64::from(level.as_bit());
        let value = eval_state(response, &response_params, state)?;
        let tandem = match tandem_factor {
            Some(f) => {
                compile_tandem(f, &resolve_parameters(model, f), Some(state))?.eval(&[value])
            }
            None => 0.0,
        };
        Ok(Signal { value, tandem })
    };

    Ok(Sensor {
        name: part.name.clone(),
        low: signal(Level::Low)?,
        high: signal(Level::High)?,
    })
}

fn build_device(
    part: &PartRecord,
    own: &SectionIndex,
    main: &SectionIndex,
) -> Result<Device, LibraryError> {
    let model = own.model(part)?;
    let response = required(model, RESPONSE_FUNCTION, own, main)?;
    Ok(Device {
        name: part.name.clone(),
        response: Response::compile(response, &resolve_parameters(model, response))?,
    })
}

fn build_variant<'a>(
    part: &PartRecord,
    main: &'a SectionIndex,
) -> Result<(&'a ModelRecord, GateVariant), LibraryError> {
    let model = main.model(part)?;
    let response = required(model, RESPONSE_FUNCTION, main, main)?;
    let tandem = match function(model, TANDEM_FACTOR, main, main) {
        Some(f) => Some(compile_tandem(f, &resolve_parameters(model, f), None)?),
        None => None,
    };
    let variant = GateVariant {
        name: part.name.clone(),
        response: Response::compile(response, &resolve_parameters(model, response))?,
        tandem,
    };
    Ok((model, variant))
}

fn build_composition(
    model: &ModelRecord,
    main: &SectionIndex,
) -> Result<Composition, LibraryError> {
    match function(model, INPUT_COMPOSITION, main, main) {
        Some(f) => Composition::compile(f, &resolve_parameters(model, f)),
        None => Ok(Composition::Sum),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn hill_model(name: &str, ymax: f64, ymin: f64, k: f64, n: f64) -> Value {
        json!({
            "collection": "models",
            "name": name,
            "functions": {
                "response_function": "Hill_response",
                "input_composition": "linear_input_composition",
                "toxicity": "toxicity_table"
            },
            "parameters": [
                {"name": "ymax", "value": ymax},
                {"name": "ymin", "value": ymin},
                {"name": "K", "value": k},
                {"name": "n", "value": n}
            ]
        })
    }

    fn ucf() -> Ucf {
        Ucf::from_documents(
            json!([
                {"collection": "header", "version": "test"},
                {"collection": "gates", "name": "P1_PhlF", "group": "PhlF", "gate_type": "NOR", "model": "P1_PhlF_model"},
                {"collection": "gates", "name": "A1_AmtR", "group": "AmtR", "gate_type": "NOR"},
                {"collection": "gates", "name": "P2_PhlF", "group": "PhlF", "gate_type": "NOR"},
                {"collection": "gates", "name": "Z9_Ghost", "group": "Ghost", "gate_type": "NOR"},
                hill_model("P1_PhlF_model", 3.9, 0.01, 0.1, 2.0),
                hill_model("A1_AmtR_model", 3.8, 0.06, 0.07, 1.6),
                hill_model("P2_PhlF_model", 4.1, 0.02, 0.13, 3.9),
                {"collection": "functions", "name": "Hill_response",
                 "equation": "$ymin + ($ymax - $ymin) / (1.0 + ($x / $K) ^ $n)"},
                {"collection": "functions", "name": "linear_input_composition", "equation": "$x1 + $x2"},
                {"collection": "functions", "name": "toxicity_table", "table": []}
            ]),
            json!([
                {"collection": "input_sensors", "name": "LacI_sensor", "model": "LacI_sensor_model"},
                {"collection": "input_sensors", "name": "TetR_sensor"},
                {"collection": "models", "name": "LacI_sensor_model",
                 "functions": {"response_function": "sensor_response"},
                 "parameters": [{"name": "ymax", "value": 2.8}, {"name": "ymin", "value": 0.0034}]},
                {"collection": "models", "name": "TetR_sensor_model",
                 "functions": {"response_function": "sensor_response"},
                 "parameters": [{"name": "ymax", "value": 4.4}, {"name": "ymin", "value": 0.0013}]},
                {"collection": "functions", "name": "sensor_response",
                 "equation": "$STATE * ($ymax - $ymin) + $ymin"}
            ]),
            json!([
                {"collection": "output_devices", "name": "YFP_reporter"},
                {"collection": "models", "name": "YFP_reporter_model",
                 "functions": {"response_function": "linear_response"},
                 "parameters": [{"name": "unit_conversion", "value": 1.0}]},
                {"collection": "functions", "name": "linear_response", "equation": "$c * $x",
                 "parameters": [{"name": "c", "map": "#//model/parameters/unit_conversion"}]}
            ]),
        )
        .unwrap()
    }

    #[test]
    fn sensors_precompute_levels() {
        let sink = DiagnosticSink::new();
        let catalog = Catalog::build(&ucf(), &sink).unwrap();
        assert_eq!(catalog.sensors.len(), 2);
        let laci = catalog.sensor("LacI_sensor").unwrap();
        assert!((laci.signal(Level::High).value - 2.8).abs() < 1e-12);
        assert!((laci.signal(Level::Low).value - 0.0034).abs() < 1e-12);
        assert_eq!(laci.low.tandem, 0.0);
    }

    #[test]
    fn devices_resolve_aliased_parameters() {
        let catalog = Catalog::build(&ucf(), &DiagnosticSink::new()).unwrap();
        let yfp = catalog.device("YFP_reporter").unwrap();
        assert_eq!(yfp.response, Response::Linear { c: 1.0 });
    }

    #[test]
    fn gates_grouped_in_first_appearance_order() {
        let catalog = Catalog::build(&ucf(), &DiagnosticSink::new()).unwrap();
        let names: Vec<&str> = catalog.groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["PhlF", "AmtR"]);
        let phlf = catalog.group("PhlF").unwrap();
        let variants: Vec<&str> = phlf.variants.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(variants, vec!["P1_PhlF", "P2_PhlF"]);
        assert_eq!(phlf.composition, Composition::Sum);
        assert_eq!(phlf.gate_type.as_deref(), Some("NOR"));
    }

    #[test]
    fn unresolvable_part_skipped_with_warning() {
        let sink = DiagnosticSink::new();
        let catalog = Catalog::build(&ucf(), &sink).unwrap();
        assert!(catalog.group("Ghost").is_none());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, PART_SKIPPED);
        assert_eq!(diags[0].subject.as_deref(), Some("Z9_Ghost"));
        assert!(!sink.has_errors());
    }

    #[test]
    fn variant_signal_without_tandem() {
        let catalog = Catalog::build(&ucf(), &DiagnosticSink::new()).unwrap();
        let variant = &catalog.group("AmtR").unwrap().variants[0];
        let signal = variant.signal(0.07);
        assert!((signal.value - (0.06 + 3.74 / 2.0)).abs() < 1e-12);
        assert_eq!(signal.tandem, 0.0);
    }

    #[test]
    fn tandem_factor_compiled_for_gates() {
        let main = json!([
            {"collection": "gates", "name": "T1", "group": "T"},
            {"collection": "models", "name": "T1_model",
             "functions": {"response_function": "lin", "tandem_interference_factor": "tf"},
             "parameters": [{"name": "c", "value": 2.0}, {"name": "a", "value": 0.5}]},
            {"collection": "functions", "name": "lin", "equation": "c * x"},
            {"collection": "functions", "name": "tf", "equation": "a * x"}
        ]);
        let ucf = Ucf::from_documents(main, json!([]), json!([])).unwrap();
        let catalog = Catalog::build(&ucf, &DiagnosticSink::new()).unwrap();
        let signal = catalog.groups[0].variants[0].signal(3.0);
        assert_eq!(signal.value, 6.0);
        assert_eq!(signal.tandem, 1.5);
    }

    #[test]
    fn malformed_record_is_error() {
        let ucf = Ucf::from_documents(
            json!([{"collection": "gates", "group": "X"}]),
            json!([]),
            json!([]),
        )
        .unwrap();
        let err = Catalog::build(&ucf, &DiagnosticSink::new()).unwrap_err();
        assert!(matches!(err, LibraryError::Record { .. }));
    }
}
