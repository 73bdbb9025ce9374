//! Shared UCF and netlist fixtures for the mapping scenarios.

#![allow(dead_code)]

use genmap_diagnostics::DiagnosticSink;
use genmap_library::{Catalog, Ucf};
use genmap_netlist::Netlist;
use serde_json::{json, Map, Value};

/// A gate variant: group, part name, and Hill parameters.
pub struct GateSpec {
    pub group: &'static str,
    pub name: &'static str,
    pub ymax: f64,
    pub ymin: f64,
    pub k: f64,
    pub n: f64,
}

/// `ymin + (ymax - ymin) / (1 + (x / K)^n)`, written out by hand.
pub fn hill(ymax: f64, ymin: f64, k: f64, n: f64, x: f64) -> f64 {
    ymin + (ymax - ymin) / (1.0 + (x / k).powf(n))
}

/// `STATE * (ymax - ymin) + ymin`.
pub fn sensor_level(ymax: f64, ymin: f64, state: f64) -> f64 {
    state * (ymax - ymin) + ymin
}

pub fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

pub fn ucf(sensors: &[(&str, f64, f64)], devices: &[&str], gates: &[GateSpec]) -> Ucf {
    let mut main = vec![
        json!({"collection": "header", "version": "scenario"}),
        json!({"collection": "functions", "name": "Hill_response",
               "equation": "$ymin + ($ymax - $ymin) / (1.0 + ($x / $K) ^ $n)"}),
        json!({"collection": "functions", "name": "linear_input_composition",
               "equation": "$x1 + $x2"}),
    ];
    for g in gates {
        main.push(json!({"collection": "gates", "name": g.name, "group": g.group, "gate_type": "NOR"}));
        main.push(json!({
            "collection": "models",
            "name": format!("{}_model", g.name),
            "functions": {
                "response_function": "Hill_response",
                "input_composition": "linear_input_composition"
            },
            "parameters": [
                {"name": "ymax", "value": g.ymax},
                {"name": "ymin", "value": g.ymin},
                {"name": "K", "value": g.k},
                {"name": "n", "value": g.n}
            ]
        }));
    }

    let mut input = vec![json!({"collection": "functions", "name": "sensor_response",
                                 "equation": "$STATE * ($ymax - $ymin) + $ymin"})];
    for &(name, ymax, ymin) in sensors {
        input.push(json!({"collection": "input_sensors", "name": name}));
        input.push(json!({
            "collection": "models",
            "name": format!("{name}_model"),
            "functions": {"response_function": "sensor_response"},
            "parameters": [{"name": "ymax", "value": ymax}, {"name": "ymin", "value": ymin}]
        }));
    }

    let mut output = vec![json!({"collection": "functions", "name": "linear_response",
                                  "equation": "$c * $x",
                                  "parameters": [{"name": "c", "map": "#//model/parameters/unit_conversion"}]})];
    for &name in devices {
        output.push(json!({"collection": "output_devices", "name": name}));
        output.push(json!({
            "collection": "models",
            "name": format!("{name}_model"),
            "functions": {"response_function": "linear_response"},
            "parameters": [{"name": "unit_conversion", "value": 1.0}]
        }));
    }

    Ucf::from_documents(Value::Array(main), Value::Array(input), Value::Array(output))
        .expect("fixture UCF")
}

pub fn catalog(ucf: &Ucf) -> Catalog {
    let sink = DiagnosticSink::new();
    let catalog = Catalog::build(ucf, &sink).expect("fixture catalog");
    let diagnostics = sink.take_all();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    catalog
}

/// A one-module Yosys netlist. `gates` are `(id, inputs, output)`; one input
/// makes a `$_NOT_`, two a `$_NOR_`.
pub fn netlist(
    name: &str,
    inputs: &[(&str, u32)],
    outputs: &[(&str, u32)],
    gates: &[(&str, &[u32], u32)],
) -> Netlist {
    let mut ports = Map::new();
    for &(port, bit) in inputs {
        ports.insert(port.into(), json!({"direction": "input", "bits": [bit]}));
    }
    for &(port, bit) in outputs {
        ports.insert(port.into(), json!({"direction": "output", "bits": [bit]}));
    }
    let mut cells = Map::new();
    for &(id, ins, out) in gates {
        let cell = match ins {
            [a] => json!({
                "type": "$_NOT_",
                "parameters": {},
                "attributes": {},
                "port_directions": {"A": "input", "Y": "output"},
                "connections": {"A": [a], "Y": [out]}
            }),
            [a, b] => json!({
                "type": "$_NOR_",
                "parameters": {},
                "attributes": {},
                "port_directions": {"A": "input", "B": "input", "Y": "output"},
                "connections": {"A": [a], "B": [b], "Y": [out]}
            }),
            _ => panic!("gate {id} must have one or two inputs"),
        };
        cells.insert(format!("$abc$100$auto$blifparse.cc:396:parse_blif${id}"), cell);
    }
    let doc = json!({"modules": {name: {"ports": ports, "cells": cells}}});
    Netlist::from_value(&doc).expect("fixture netlist")
}
