//! Integration tests for the netlist → diagram pipeline.
//!
//! Tests the full pipeline: netlist JSON → Document → JSON / HTML.

use gatediagram::{convert_json, DiagramConfig, DiagramError, Document, HtmlConfig};
use gatediagram_layout::{LayoutConfig, RankDir};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// One AND gate between two inputs and an output.
fn and_gate() -> String {
    r#"{
        "modules": {
            "top": {
                "ports": {
                    "a": { "direction": "input", "bits": [2] },
                    "b": { "direction": "input", "bits": [3] },
                    "y": { "direction": "output", "bits": [4] }
                },
                "cells": {
                    "$and$top.v:3$1": {
                        "type": "$and",
                        "port_directions": { "A": "input", "B": "input", "Y": "output" },
                        "connections": { "A": [2], "B": [3], "Y": [4] }
                    }
                }
            }
        }
    }"#
    .to_string()
}

/// Full adder built from two half adders and an OR gate.
fn full_adder() -> String {
    r#"{
        "creator": "synth",
        "modules": {
            "full_adder": {
                "attributes": { "top": "00000000000000000000000000000001" },
                "ports": {
                    "a": { "direction": "input", "bits": [2] },
                    "b": { "direction": "input", "bits": [3] },
                    "cin": { "direction": "input", "bits": [4] },
                    "s": { "direction": "output", "bits": [5] },
                    "cout": { "direction": "output", "bits": [6] }
                },
                "cells": {
                    "ha0": {
                        "type": "half_adder",
                        "port_directions": { "x": "input", "y": "input", "s": "output", "c": "output" },
                        "connections": { "x": [2], "y": [3], "s": [7], "c": [8] }
                    },
                    "ha1": {
                        "type": "half_adder",
                        "port_directions": { "x": "input", "y": "input", "s": "output", "c": "output" },
                        "connections": { "x": [7], "y": [4], "s": [5], "c": [9] }
                    },
                    "or0": {
                        "type": "$or",
                        "port_directions": { "A": "input", "B": "input", "Y": "output" },
                        "connections": { "A": [8], "B": [9], "Y": [6] }
                    }
                },
                "netnames": {}
            },
            "half_adder": {
                "ports": {
                    "x": { "direction": "input", "bits": [2] },
                    "y": { "direction": "input", "bits": [3] },
                    "s": { "direction": "output", "bits": [4] },
                    "c": { "direction": "output", "bits": [5] }
                },
                "cells": {
                    "xor0": {
                        "type": "$xor",
                        "port_directions": { "A": "input", "B": "input", "Y": "output" },
                        "connections": { "A": [2], "B": [3], "Y": [4] }
                    },
                    "and0": {
                        "type": "$and",
                        "port_directions": { "A": "input", "B": "input", "Y": "output" },
                        "connections": { "A": [2], "B": [3], "Y": [5] }
                    }
                }
            }
        }
    }"#
    .to_string()
}

fn emit_value(src: &str) -> Value {
    let doc = convert_json(src, &DiagramConfig::default()).unwrap();
    serde_json::from_str(&doc.to_json().unwrap()).unwrap()
}

/// Every diagram of a document, library first.
fn diagrams(doc: &Document) -> Vec<&gatediagram::ModuleDiagram> {
    doc.library.iter().chain(std::iter::once(&doc.root)).map(|m| &m.diagram).collect()
}

// ─── End-to-end shape ───────────────────────────────────────────────────────

#[test]
fn and_gate_document() {
    let value = emit_value(&and_gate());

    assert_eq!(value["library"].as_array().unwrap().len(), 0);
    assert_eq!(value["root"]["name"], "top");

    let devices = value["root"]["diagram"]["devices"].as_array().unwrap();
    let types: Vec<&str> = devices.iter().map(|d| d["type"].as_str().unwrap()).collect();
    assert_eq!(types, ["In", "In", "Out", "AND"]);
    let ids: Vec<&str> = devices.iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["dev0", "dev1", "dev2", "dev3"]);
    assert_eq!(devices[3]["label"], "$and$top.v:3$1");

    let connectors: Vec<(&str, &str)> = value["root"]["diagram"]["connectors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| (c["from"].as_str().unwrap(), c["to"].as_str().unwrap()))
        .collect();
    assert_eq!(
        connectors,
        [("dev3.in0", "dev0.out0"), ("dev3.in1", "dev1.out0"), ("dev2.in0", "dev3.out0")]
    );
}

#[test]
fn device_count_is_ports_plus_cells() {
    let doc = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    assert_eq!(doc.library[0].diagram.devices.len(), 4 + 2);
    assert_eq!(doc.root.diagram.devices.len(), 5 + 3);
}

#[test]
fn sub_module_is_emitted_before_its_user() {
    let doc = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    let names: Vec<&str> = doc.library.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["half_adder"]);
    assert_eq!(doc.root.name, "full_adder");
}

#[test]
fn instance_pins_follow_sub_module_slots() {
    let value = emit_value(&full_adder());
    let root = &value["root"]["diagram"];
    let ha0 = root["devices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["label"] == "ha0")
        .unwrap();
    assert_eq!(ha0["type"], "half_adder");

    let id = ha0["id"].as_str().unwrap();
    let pins: HashSet<String> = root["connectors"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|c| [c["from"].as_str().unwrap(), c["to"].as_str().unwrap()])
        .filter_map(|e| e.strip_prefix(id).map(str::to_string))
        .collect();
    let expected: HashSet<String> = [".in0", ".in1", ".out0", ".out1"].iter().map(|s| s.to_string()).collect();
    assert_eq!(pins, expected);

    // Boundary devices of the sub-module carry the same slot numbers.
    let lib = &value["library"][0]["diagram"]["devices"];
    let orders: Vec<(&str, u64)> = lib
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d.get("order").is_some())
        .map(|d| (d["label"].as_str().unwrap(), d["order"].as_u64().unwrap()))
        .collect();
    assert_eq!(orders, [("x", 0), ("y", 1), ("s", 0), ("c", 1)]);
}

// ─── Net resolution ─────────────────────────────────────────────────────────

#[test]
fn every_listened_net_has_one_driver() {
    let doc = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    for diagram in diagrams(&doc) {
        let mut driver_of = HashMap::new();
        for c in &diagram.connectors {
            // Each listener endpoint appears once and always points at one driver.
            assert!(driver_of.insert(c.from, c.to).is_none(), "{} listens twice", c.from);
            assert!(matches!(c.to.slot, gatediagram::ports::Slot::Out(_)));
        }
    }
}

#[test]
fn second_driver_is_rejected() {
    let src = and_gate().replace(r#""Y": [4]"#, r#""Y": [3]"#);
    let err = convert_json(&src, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::MultipleDrivers { net: 3, .. }));
    assert!(err.to_string().contains("dev1.out0"));
}

#[test]
fn undriven_listener_is_rejected() {
    let src = and_gate().replace(r#""A": [2]"#, r#""A": [42]"#);
    let err = convert_json(&src, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::UnresolvedNet { net: 42, .. }));
}

#[test]
fn port_slots_follow_bit_order() {
    let src = r#"{
        "modules": {
            "top": {
                "ports": {
                    "p1": { "direction": "input", "bits": [3] },
                    "p2": { "direction": "input", "bits": [1] },
                    "p3": { "direction": "input", "bits": [2] },
                    "y": { "direction": "output", "bits": [4] }
                },
                "cells": {
                    "g": { "type": "$and", "connections": { "A": [1], "B": [2], "Y": [4] } }
                }
            }
        }
    }"#;
    let value = emit_value(src);
    let orders: Vec<(&str, u64)> = value["root"]["diagram"]["devices"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|d| d["type"] == "In")
        .map(|d| (d["label"].as_str().unwrap(), d["order"].as_u64().unwrap()))
        .collect();
    assert_eq!(orders, [("p1", 2), ("p2", 0), ("p3", 1)]);
}

#[test]
fn bus_port_is_rejected() {
    let src = and_gate().replace(r#""bits": [2]"#, r#""bits": [2, 5]"#);
    let err = convert_json(&src, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::InvalidPortWidth { width: 2, .. }));
}

// ─── Module ordering ────────────────────────────────────────────────────────

#[test]
fn recursive_hierarchy_is_rejected() {
    let src = r#"{
        "modules": {
            "X": { "cells": { "u": { "type": "Y" } } },
            "Y": { "cells": { "u": { "type": "X" } } }
        }
    }"#;
    let err = convert_json(src, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::CyclicDependency { .. }));
}

#[test]
fn unrelated_modules_are_ambiguous() {
    let src = r#"{ "modules": { "a": {}, "b": {} } }"#;
    let err = convert_json(src, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::AmbiguousRoot { .. }));
}

#[test]
fn empty_netlist_is_rejected() {
    let err = convert_json(r#"{ "modules": {} }"#, &DiagramConfig::default()).unwrap_err();
    assert!(matches!(err, DiagramError::EmptyNetlist));
}

// ─── Layout ─────────────────────────────────────────────────────────────────

#[test]
fn every_device_is_placed_inside_the_canvas() {
    for rank_dir in [RankDir::RL, RankDir::LR, RankDir::TB, RankDir::BT] {
        let config = DiagramConfig {
            layout: LayoutConfig {
                rank_dir,
                ..LayoutConfig::default()
            },
            ..DiagramConfig::default()
        };
        let doc = convert_json(&full_adder(), &config).unwrap();
        for diagram in diagrams(&doc) {
            for d in &diagram.devices {
                let (x, y) = (d.x.unwrap(), d.y.unwrap());
                assert!(x < diagram.width && y < diagram.height, "{rank_dir:?}: {} outside canvas", d.id);
            }
        }
    }
}

#[test]
fn canvas_adds_margins_to_the_farthest_device() {
    let doc = convert_json(&and_gate(), &DiagramConfig::default()).unwrap();
    let diagram = &doc.root.diagram;
    let max_x = diagram.devices.iter().filter_map(|d| d.x).max().unwrap();
    let max_y = diagram.devices.iter().filter_map(|d| d.y).max().unwrap();
    assert_eq!(diagram.width, max_x + 256);
    assert_eq!(diagram.height, max_y + 64);
}

#[test]
fn signal_flows_left_to_right_by_default() {
    let doc = convert_json(&and_gate(), &DiagramConfig::default()).unwrap();
    let x: Vec<u32> = doc.root.diagram.devices.iter().map(|d| d.x.unwrap()).collect();
    assert!(x[0] < x[3] && x[1] < x[3] && x[3] < x[2]);
}

#[test]
fn unconnected_device_is_still_placed() {
    let src = and_gate().replace(
        r#""y": { "direction": "output", "bits": [4] }"#,
        r#""y": { "direction": "output", "bits": [4] }, "spare": { "direction": "input", "bits": [9] }"#,
    );
    let value = emit_value(&src);
    let spare = value["root"]["diagram"]["devices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|d| d["label"] == "spare")
        .cloned()
        .unwrap();
    assert!(spare["x"].is_u64());
    assert!(spare["y"].is_u64());
}

#[test]
fn toggle_flip_flop_feedback_is_laid_out() {
    // q = !q on every clock edge: ff.Q → inv.A, inv.Y → ff.D
    let src = r#"{
        "modules": {
            "top": {
                "ports": {
                    "clk": { "direction": "input", "bits": [2] },
                    "q": { "direction": "output", "bits": [3] }
                },
                "cells": {
                    "ff": {
                        "type": "$dff",
                        "port_directions": { "CLK": "input", "D": "input", "Q": "output" },
                        "connections": { "CLK": [2], "D": [4], "Q": [3] }
                    },
                    "inv": {
                        "type": "$not",
                        "port_directions": { "A": "input", "Y": "output" },
                        "connections": { "A": [3], "Y": [4] }
                    }
                }
            }
        }
    }"#;
    let doc = convert_json(src, &DiagramConfig::default()).unwrap();
    let diagram = &doc.root.diagram;
    assert_eq!(diagram.connectors.len(), 4);

    let x: HashMap<&str, u32> = diagram.devices.iter().map(|d| (d.label.as_str(), d.x.unwrap())).collect();
    assert!(diagram.devices.iter().all(|d| d.y.is_some()));
    assert!(x["clk"] < x["ff"] && x["ff"] < x["q"]);
    assert_ne!(x["inv"], x["ff"]);
}

#[test]
fn output_is_deterministic() {
    let a = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    let b = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    assert_eq!(a.to_json().unwrap(), b.to_json().unwrap());
}

// ─── HTML output ────────────────────────────────────────────────────────────

#[test]
fn html_page_mounts_root_and_registers_library() {
    let doc = convert_json(&full_adder(), &DiagramConfig::default()).unwrap();
    let page = doc
        .to_html(&HtmlConfig {
            script_url: "https://cdn.example.org/dj.js".into(),
            ..HtmlConfig::default()
        })
        .unwrap();

    assert!(page.starts_with("<!doctype html>"));
    assert!(page.contains("<title>full_adder</title>"));
    assert!(page.contains(r#"src="https://cdn.example.org/dj.js""#));
    assert!(page.contains(r#"href="dist/main.css""#));
    assert!(page.contains(r#""name":"half_adder""#));
    assert!(page.contains("subcircuits[entry.name]"));
}
