use approx::assert_relative_eq;
use test_log::test;

use crate::*;

const ARCH: &str = r#"
[[technology]]
name = "logic"
pn_ratio = 2.0
pmos = { name = "pch", chan_length = 40e-9, min_width = 140e-9, max_width = 560e-9 }
nmos = { name = "nch", chan_length = 40e-9, min_width = 140e-9, max_width = 280e-9 }

[[circuit_model]]
name = "INVTX1"
kind = "inv_buf"
device_model = "logic"
buffer = { kind = "inverter", size = 1.0 }
port = [
    { prefix = "in", kind = "input" },
    { prefix = "out", kind = "output" },
]

[[circuit_model]]
name = "buf4_pg"
kind = "inv_buf"
device_model = "logic"
is_power_gated = true
buffer = { kind = "buffer", size = 1.0, num_levels = 2, f_per_stage = 4.0 }
port = [
    { prefix = "in", kind = "input" },
    { prefix = "out", kind = "output" },
    { prefix = "EN", kind = "input", size = 2, is_global = true, is_config_enable = true, default_value = 0 },
    { prefix = "ENB", kind = "input", size = 2, is_global = true, is_config_enable = true, default_value = 1 },
]

[[circuit_model]]
name = "sram6T"
kind = "sram"
circuit_netlist = "sram.sp"

[spice]
vdd_rail = "VDD_LOCAL"
"#;

#[test]
fn loads_architecture() {
    let arch = Architecture::from_toml_str(ARCH).unwrap();
    assert_eq!(arch.circuit_lib.len(), 3);

    let inv = arch.circuit_lib.model_named("INVTX1").unwrap();
    let tech = arch.bindings.get(inv).unwrap();
    let tech = arch.tech_lib.model(tech);
    assert_eq!(tech.name(), "logic");
    assert_eq!(tech.model_ref(), "M");
    assert_eq!(tech.kind(), TechModelKind::Transistor);
    assert_relative_eq!(tech.pn_ratio(), 2.0);
    assert_relative_eq!(tech.transistor(Polarity::Nmos).max_width, 280e-9);

    let sram = arch.circuit_lib.model_named("sram6T").unwrap();
    assert!(arch.bindings.get(sram).is_none());
    assert_eq!(
        arch.circuit_lib.model(sram).circuit_netlist().map(|p| p.as_str()),
        Some("sram.sp")
    );

    assert_eq!(
        arch.spice.get("vdd_rail").and_then(|v| v.as_str()),
        Some("VDD_LOCAL")
    );
}

#[test]
fn buffer_defaults_fill_missing_fields() {
    let arch = Architecture::from_toml_str(ARCH).unwrap();
    let inv = arch.circuit_lib.model_named("INVTX1").unwrap();
    let buffer = arch.circuit_lib.model(inv).buffer();
    assert_eq!(buffer.kind, BufferKind::Inverter);
    assert_eq!(buffer.num_levels, 1);
    assert_relative_eq!(buffer.f_per_stage, 4.0);
}

#[test]
fn finds_power_gate_ports() {
    let arch = Architecture::from_toml_str(ARCH).unwrap();
    let buf = arch.circuit_lib.model_named("buf4_pg").unwrap();
    let model = arch.circuit_lib.model(buf);

    assert!(model.is_power_gated());
    assert_eq!(model.power_gate_en_port().unwrap().prefix, "EN");
    assert_eq!(model.power_gate_enb_port().unwrap().prefix, "ENB");

    let inputs: Vec<_> = model.ports_by_kind(PortKind::Input, true).collect();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].prefix, "in");
    assert_eq!(model.ports_by_kind(PortKind::Input, false).count(), 3);
}

#[test]
fn rejects_unknown_technology() {
    let arch = r#"
[[circuit_model]]
name = "INVTX1"
kind = "inv_buf"
device_model = "missing"
"#;
    let err = Architecture::from_toml_str(arch).unwrap_err();
    assert!(matches!(err, LoadError::UnknownTechnology { .. }));
}

#[test]
fn rejects_duplicate_models() {
    let mut lib = CircuitLibrary::new();
    lib.add_model(CircuitModel::new("inv", ModelKind::InvBuf))
        .unwrap();
    let err = lib
        .add_model(CircuitModel::new("inv", ModelKind::Gate))
        .unwrap_err();
    assert!(matches!(err, LoadError::DuplicateModel(name) if name == "inv"));
}

#[test]
fn rejects_unknown_fields() {
    let err = Architecture::from_toml_str("[[technology]]\nnmae = \"typo\"\n").unwrap_err();
    assert!(matches!(err, LoadError::Parse(_)));
}

#[test]
fn module_ports_expand_buses() {
    let arch = Architecture::from_toml_str(ARCH).unwrap();
    let modules = ModuleManager::from_circuit_library(&arch.circuit_lib);

    let id = modules.find_module("buf4_pg").unwrap();
    assert_eq!(modules.module_name(id), "buf4_pg");
    let names: Vec<_> = modules
        .module_ports(id)
        .iter()
        .flat_map(|port| port.bit_names())
        .collect();
    assert_eq!(
        names,
        ["in", "out", "EN[0]", "EN[1]", "ENB[0]", "ENB[1]"]
    );
    assert!(modules.find_module("nonexistent").is_none());
}

#[test]
fn netlist_registration_is_idempotent() {
    let mut netlists = NetlistManager::new();
    let a = netlists.add_netlist("out/a.sp");
    let b = netlists.add_netlist("out/b.sp");
    netlists.set_netlist_kind(b, NetlistKind::TopLevel);

    assert_eq!(netlists.add_netlist("out/a.sp"), a);
    assert_eq!(netlists.len(), 2);
    assert_eq!(
        netlists.netlists_of_kind(NetlistKind::Submodule).collect::<Vec<_>>(),
        [a]
    );
    assert_eq!(netlists.netlist_path(b), std::path::Path::new("out/b.sp"));
}

#[test]
fn builds_transistor_technology_in_code() {
    let pmos = TransistorModel {
        name: "pch".into(),
        chan_length: 40e-9,
        min_width: 140e-9,
        max_width: 560e-9,
    };
    let nmos = TransistorModel {
        name: "nch".into(),
        ..pmos.clone()
    };
    let tech = TechnologyModel::new_transistor("logic", "X", 2., pmos, nmos);

    assert_eq!(tech.kind(), TechModelKind::Transistor);
    assert_eq!(tech.model_ref(), "X");
    assert_eq!(tech.transistor(Polarity::Pmos).name, "pch");
    assert_eq!(tech.transistor(Polarity::Nmos).name, "nch");

    let mut lib = TechnologyLibrary::new();
    let id = lib.add_model(tech.with_kind(TechModelKind::Rram));
    assert_eq!(lib.model_named("logic"), Some(id));
    assert_eq!(lib.model(id).kind(), TechModelKind::Rram);
}
