//! Typed views of the UCF records the catalog reads.
//!
//! Records carry many more fields than the mapper needs (DNA sequences,
//! cytometry tables, plotting colors); unknown fields are ignored.

use crate::error::LibraryError;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// An `input_sensors`, `output_devices`, or `gates` record.
#[derive(Clone, Debug, Deserialize)]
pub struct PartRecord {
    /// The part name.
    pub name: String,
    /// The model name; defaults to `<name>_model` when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Gate-equivalence group (gates only).
    #[serde(default)]
    pub group: Option<String>,
    /// Declared gate type such as `NOR` (gates only).
    #[serde(default)]
    pub gate_type: Option<String>,
}

impl PartRecord {
    /// The name of the model this part is characterized by.
    pub fn model_name(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| format!("{}_model", self.name))
    }
}

/// A `models` record.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelRecord {
    /// The model name.
    pub name: String,
    /// Function role (`response_function`, `input_composition`, ...) to function name.
    #[serde(default)]
    pub functions: BTreeMap<String, Value>,
    /// Named parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterRecord>,
}

impl ModelRecord {
    /// The function name bound to `role`, if any.
    pub fn function(&self, role: &str) -> Option<&str> {
        self.functions.get(role)?.as_str()
    }

    /// All numeric parameters by name; non-numeric values are skipped.
    pub fn numeric_parameters(&self) -> BTreeMap<String, f64> {
        self.parameters
            .iter()
            .filter_map(|p| Some((p.name.clone(), p.value.as_f64()?)))
            .collect()
    }
}

/// A named model parameter.
#[derive(Clone, Debug, Deserialize)]
pub struct ParameterRecord {
    /// Parameter name.
    pub name: String,
    /// Parameter value; numeric for every parameter an equation uses.
    #[serde(default)]
    pub value: Value,
}

/// A `functions` record.
#[derive(Clone, Debug, Deserialize)]
pub struct FunctionRecord {
    /// Function name.
    pub name: String,
    /// The equation, absent for table-valued functions such as cytometry data.
    #[serde(default)]
    pub equation: Option<String>,
    /// Parameter declarations, optionally aliasing model parameters.
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
}

/// A parameter declared by a function.
#[derive(Clone, Debug, Deserialize)]
pub struct FunctionParameter {
    /// Name used inside the equation.
    pub name: String,
    /// Reference such as `#//model/parameters/unit_conversion`.
    #[serde(default)]
    pub map: Option<String>,
    /// An inline value.
    #[serde(default)]
    pub value: Option<f64>,
}

const MODEL_PARAMETER_PREFIX: &str = "#//model/parameters/";

impl FunctionParameter {
    /// The model parameter this declaration aliases, if any.
    pub fn model_parameter(&self) -> Option<&str> {
        self.map.as_deref()?.strip_prefix(MODEL_PARAMETER_PREFIX)
    }
}

/// A `logic_constraints` record.
#[derive(Clone, Debug, Deserialize)]
pub struct LogicConstraintRecord {
    /// Per gate-type instance limits.
    #[serde(default)]
    pub available_gates: Vec<AvailableGate>,
}

/// One entry of `logic_constraints.available_gates`.
#[derive(Clone, Debug, Deserialize)]
pub struct AvailableGate {
    /// Gate type, e.g. `NOR`.
    #[serde(rename = "type", default)]
    pub gate_type: Option<String>,
    /// Instance limit: a count, or `true` for unlimited.
    #[serde(default)]
    pub max_instances: Value,
}

impl AvailableGate {
    /// The instance limit as a number; `true` means unlimited.
    pub fn max_instances(&self) -> u64 {
        match &self.max_instances {
            Value::Bool(true) => u64::MAX,
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().map(|f| f.max(0.0) as u64))
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// Decodes a raw record into a typed view.
pub fn decode<T: DeserializeOwned>(collection: &str, record: &Value) -> Result<T, LibraryError> {
    T::deserialize(record).map_err(|e| LibraryError::Record {
        collection: collection.to_string(),
        name: record
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("?")
            .to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_name_fallback() {
        let part: PartRecord = decode("gates", &json!({"name": "P1_PhlF"})).unwrap();
        assert_eq!(part.model_name(), "P1_PhlF_model");
        let part: PartRecord =
            decode("gates", &json!({"name": "P1_PhlF", "model": "phlf"})).unwrap();
        assert_eq!(part.model_name(), "phlf");
    }

    #[test]
    fn numeric_parameters_skip_strings() {
        let model: ModelRecord = decode(
            "models",
            &json!({
                "name": "m",
                "functions": {"response_function": "Hill_response", "cytometry": "c"},
                "parameters": [
                    {"name": "ymax", "value": 3.9},
                    {"name": "note", "value": "n/a"},
                    {"name": "n", "value": 2}
                ]
            }),
        )
        .unwrap();
        let params = model.numeric_parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params["n"], 2.0);
        assert_eq!(model.function("response_function"), Some("Hill_response"));
        assert_eq!(model.function("tandem_interference_factor"), None);
    }

    #[test]
    fn function_parameter_alias() {
        let func: FunctionRecord = decode(
            "functions",
            &json!({
                "name": "linear_response",
                "equation": "$c * $x",
                "parameters": [{"name": "c", "map": "#//model/parameters/unit_conversion"}]
            }),
        )
        .unwrap();
        assert_eq!(func.parameters[0].model_parameter(), Some("unit_conversion"));
    }

    #[test]
    fn max_instances_forms() {
        let gate = |v: Value| AvailableGate {
            gate_type: Some("NOR".into()),
            max_instances: v,
        };
        assert_eq!(gate(json!(12)).max_instances(), 12);
        assert_eq!(gate(json!(true)).max_instances(), u64::MAX);
        assert_eq!(gate(json!(false)).max_instances(), 0);
        assert_eq!(gate(json!(null)).max_instances(), 0);
    }

    #[test]
    fn decode_error_names_record() {
        let err = decode::<PartRecord>("gates", &json!({"name": 5})).unwrap_err();
        assert!(
            matches!(err, LibraryError::Record { ref collection, .. } if collection == "gates")
        );
        let model = json!({"name": "m", "parameters": 3});
        let err = decode::<ModelRecord>("models", &model).unwrap_err();
        assert!(err.to_string().starts_with("malformed models record 'm'"));
    }
}
