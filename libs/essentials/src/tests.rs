use approx::assert_relative_eq;
use arcstr::ArcStr;
use circuitlib::{
    BufferKind, BufferParams, CircuitLibrary, CircuitModel, CircuitPort, ModelKind, ModuleManager,
    NetlistKind, NetlistManager, PortKind, TechBindings, TechModelKind, TechnologyLibrary,
    TechnologyModel, TechnologyModelId, TransistorModel,
};
use test_log::test;

use crate::binning::{bin, MAX_BINS};
use crate::buffer::{chain_stages, compose_chain, stage_widths};
use crate::primitive::{Gating, Primitive, Topology};
use crate::validation::Cause;
use crate::writer::format_width;
use crate::*;

const NOTICE: &str =
    "* This is a generated file. Be careful when editing manually: this file may be overwritten.\n";

fn transistor(name: &str, max_width: f64) -> TransistorModel {
    TransistorModel {
        name: name.into(),
        chan_length: 40e-9,
        min_width: 1.,
        max_width,
    }
}

fn logic(pmos_max: f64, nmos_max: f64) -> TechnologyModel {
    TechnologyModel::new_transistor(
        "logic",
        "M",
        2.,
        transistor("pch", pmos_max),
        transistor("nch", nmos_max),
    )
}

fn inverter(name: &str, size: f64) -> CircuitModel {
    let mut model = CircuitModel::new(name, ModelKind::InvBuf);
    model.set_buffer(BufferParams {
        size,
        ..Default::default()
    });
    model.add_port(CircuitPort::new("in", PortKind::Input));
    model.add_port(CircuitPort::new("out", PortKind::Output));
    model
}

fn buffer(name: &str, size: f64, num_levels: usize, f_per_stage: f64) -> CircuitModel {
    let mut model = inverter(name, size);
    model.set_buffer(BufferParams {
        kind: BufferKind::Buffer,
        size,
        num_levels,
        f_per_stage,
    });
    model
}

fn power_gated(mut model: CircuitModel, bits: usize) -> CircuitModel {
    model.set_power_gated(true);
    model.add_port(
        CircuitPort::new("EN", PortKind::Input)
            .with_size(bits)
            .config_enable(0),
    );
    model.add_port(
        CircuitPort::new("ENB", PortKind::Input)
            .with_size(bits)
            .config_enable(1),
    );
    model
}

struct Fixture {
    circuit_lib: CircuitLibrary,
    tech_lib: TechnologyLibrary,
    bindings: TechBindings,
    modules: ModuleManager,
    tech: TechnologyModelId,
}

impl Fixture {
    fn new(tech: TechnologyModel) -> Self {
        let mut tech_lib = TechnologyLibrary::new();
        let tech = tech_lib.add_model(tech);
        Self {
            circuit_lib: CircuitLibrary::new(),
            tech_lib,
            bindings: TechBindings::new(),
            modules: ModuleManager::new(),
            tech,
        }
    }

    fn add(&mut self, model: CircuitModel, bound: bool) -> &mut Self {
        let id = self.circuit_lib.add_model(model).unwrap();
        if bound {
            self.bindings.bind(id, self.tech);
        }
        self.modules = ModuleManager::from_circuit_library(&self.circuit_lib);
        self
    }

    fn library(&self) -> GateLibrary<'_> {
        GateLibrary::new(
            &self.circuit_lib,
            &self.tech_lib,
            &self.bindings,
            &self.modules,
        )
    }

    fn render(&self) -> (Result<EmitSummary, EmitError>, String) {
        let mut out = SpiceWriter::new(Vec::new(), 10);
        let result = write_essentials(&mut out, &self.library(), &SpiceOptions::default());
        let text = String::from_utf8(out.finish().unwrap()).unwrap();
        (result, text)
    }

    fn resolve(&self, name: &str) -> Result<Primitive<'_>> {
        let id = self.circuit_lib.model_named(name).unwrap();
        Primitive::resolve(self.circuit_lib.model(id), self.tech_lib.model(self.tech))
    }
}

fn device_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|line| line.starts_with('X')).collect()
}

#[test]
fn bins_sum_to_total_width() {
    let cases = [
        (6., 4., 2),
        (3., 2., 2),
        (8., 4., 2),
        (10., 3., 4),
        (1., 1., 1),
        (0.3, 0.1, 3),
        (1.4e-6, 5.6e-7, 3),
        (2.8e-7, 5.6e-7, 1),
    ];
    for (total, max, count) in cases {
        let bins = bin(total, max).unwrap();
        assert_eq!(bins.len(), count, "bin({}, {})", total, max);
        let sum: f64 = bins.iter().map(|b| b.width).sum();
        assert_relative_eq!(sum, total, max_relative = 1e-9);
        for (i, b) in bins.iter().enumerate() {
            assert_eq!(b.index, i);
            assert!(b.width > 0.);
            assert!(b.width <= max * (1. + 1e-12));
        }
    }
}

#[test]
fn exact_multiple_has_no_remainder_bin() {
    let bins = bin(8., 4.).unwrap();
    assert_eq!(bins.iter().map(|b| b.width).collect::<Vec<_>>(), [4., 4.]);

    let bins = bin(6., 4.).unwrap();
    assert_eq!(bins.iter().map(|b| b.width).collect::<Vec<_>>(), [4., 2.]);
}

#[test]
fn zero_width_produces_no_bins() {
    assert!(bin(0., 4.).unwrap().is_empty());
}

#[test]
fn binning_rejects_invalid_widths() {
    assert!(matches!(bin(1., 0.), Err(Error::InvalidParameter(_))));
    assert!(matches!(bin(1., -2.), Err(Error::InvalidParameter(_))));
    assert!(matches!(bin(1., f64::NAN), Err(Error::InvalidParameter(_))));
    assert!(matches!(bin(-1., 2.), Err(Error::InvalidParameter(_))));
    assert!(matches!(bin(f64::INFINITY, 2.), Err(Error::InvalidParameter(_))));
}

#[test]
fn rejects_unbounded_bin_counts() {
    assert!(matches!(bin(1e20, 1.), Err(Error::InvalidParameter(_))));
    assert!(matches!(bin(1., 1e-300), Err(Error::InvalidParameter(_))));
    assert!(matches!(
        bin((MAX_BINS + 1) as f64, 1.),
        Err(Error::InvalidParameter(_))
    ));
    assert_eq!(bin(MAX_BINS as f64, 1.).unwrap().len(), MAX_BINS);
}

#[test]
fn formats_widths_with_significant_digits() {
    assert_eq!(format_width(4., 10), "4");
    assert_eq!(format_width(0., 10), "0");
    assert_eq!(format_width(1.4e-7, 10), "1.4e-07");
    assert_eq!(format_width(40e-9, 10), "4e-08");
    assert_eq!(format_width(0.0001, 10), "0.0001");
    assert_eq!(format_width(123456.789, 10), "123456.789");
    assert_eq!(format_width(1e10, 10), "1e+10");
    assert_eq!(format_width(1.0 / 3.0, 10), "0.3333333333");
    assert_eq!(format_width(2.0 / 3.0 * 1e-6, 10), "6.666666667e-07");
}

#[test]
fn splits_inverter_into_bins() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(inverter("inv", 3.), true);
    let (result, text) = fixture.render();

    let summary = result.unwrap();
    assert_eq!(summary.subckts, ["inv"]);
    assert_eq!(
        text,
        format!(
            "* Essential gates\n{}\n\
             .subckt inv in out\n\
             Xpmos_0 out in LVDD LVDD pch_wrapper W=4\n\
             Xpmos_1 out in LVDD LVDD pch_wrapper W=2\n\
             Xnmos_0 out in LGND LGND nch_wrapper W=2\n\
             Xnmos_1 out in LGND LGND nch_wrapper W=1\n\
             .ends inv\n\n",
            NOTICE
        )
    );
}

#[test]
fn cascades_power_gate_bits_in_declared_order() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(power_gated(inverter("inv_pg", 1.), 2), true);
    let (result, text) = fixture.render();
    result.unwrap();

    assert!(text.contains(".subckt inv_pg in out EN[0] EN[1] ENB[0] ENB[1]\n"));
    assert_eq!(
        device_lines(&text),
        [
            "Xpmos_powergate_0_pin_0 out_pmos_pg_0 ENB[0] LVDD LVDD pch_wrapper W=2",
            "Xpmos_powergate_0_pin_1 out_pmos_pg_1 ENB[1] out_pmos_pg_0 LVDD pch_wrapper W=2",
            "Xpmos_0 out in out_pmos_pg_1 LVDD pch_wrapper W=2",
            "Xnmos_powergate_0_pin_0 out_nmos_pg_0 EN[0] LGND LGND nch_wrapper W=1",
            "Xnmos_powergate_0_pin_1 out_nmos_pg_1 EN[1] out_nmos_pg_0 LGND nch_wrapper W=1",
            "Xnmos_0 out in out_nmos_pg_1 LGND nch_wrapper W=1",
        ]
    );
    assert_eq!(text.matches(".subckt").count(), 1);
}

#[test]
fn every_bin_gets_its_own_gating_chain() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(power_gated(inverter("inv_pg", 3.), 2), true);
    let (result, text) = fixture.render();
    result.unwrap();

    assert_eq!(
        device_lines(&text),
        [
            "Xpmos_powergate_0_pin_0 out_pmos_pg_0 ENB[0] LVDD LVDD pch_wrapper W=4",
            "Xpmos_powergate_0_pin_1 out_pmos_pg_1 ENB[1] out_pmos_pg_0 LVDD pch_wrapper W=4",
            "Xpmos_0 out in out_pmos_pg_1 LVDD pch_wrapper W=4",
            "Xpmos_powergate_1_pin_0 out_pmos_pg_0 ENB[0] LVDD LVDD pch_wrapper W=2",
            "Xpmos_powergate_1_pin_1 out_pmos_pg_1 ENB[1] out_pmos_pg_0 LVDD pch_wrapper W=2",
            "Xpmos_1 out in out_pmos_pg_1 LVDD pch_wrapper W=2",
            "Xnmos_powergate_0_pin_0 out_nmos_pg_0 EN[0] LGND LGND nch_wrapper W=2",
            "Xnmos_powergate_0_pin_1 out_nmos_pg_1 EN[1] out_nmos_pg_0 LGND nch_wrapper W=2",
            "Xnmos_0 out in out_nmos_pg_1 LGND nch_wrapper W=2",
            "Xnmos_powergate_1_pin_0 out_nmos_pg_0 EN[0] LGND LGND nch_wrapper W=1",
            "Xnmos_powergate_1_pin_1 out_nmos_pg_1 EN[1] out_nmos_pg_0 LGND nch_wrapper W=1",
            "Xnmos_1 out in out_nmos_pg_1 LGND nch_wrapper W=1",
        ]
    );
}

#[test]
fn buffer_stages_grow_geometrically() {
    let params = BufferParams {
        kind: BufferKind::Buffer,
        size: 1.,
        num_levels: 3,
        f_per_stage: 2.,
    };
    let widths = stage_widths(&params, params.num_levels);
    assert_eq!(widths.len(), 3);
    for (level, width) in widths.into_iter().enumerate() {
        assert_relative_eq!(width, 2f64.powi(level as i32));
    }
}

#[test]
fn buffer_chain_names_interior_nodes() {
    let mut fixture = Fixture::new(logic(100., 100.));
    fixture.add(buffer("buf", 1., 3, 2.), true);

    let primitive = fixture.resolve("buf").unwrap();
    assert_eq!(primitive.topology, Topology::Buffer { num_levels: 3 });
    let stages = chain_stages(&primitive, 3);
    let nodes: Vec<(&str, &str)> = stages
        .iter()
        .map(|stage| (stage.input.as_str(), stage.output.as_str()))
        .collect();
    assert_eq!(
        nodes,
        [
            ("in", "out_level0"),
            ("out_level0", "out_level1"),
            ("out_level1", "out"),
        ]
    );

    let (result, text) = fixture.render();
    result.unwrap();
    assert_eq!(
        device_lines(&text),
        [
            "Xpmos_level0_bin0 out_level0 in LVDD LVDD pch_wrapper W=2",
            "Xnmos_level0_bin0 out_level0 in LGND LGND nch_wrapper W=1",
            "Xpmos_level1_bin0 out_level1 out_level0 LVDD LVDD pch_wrapper W=4",
            "Xnmos_level1_bin0 out_level1 out_level0 LGND LGND nch_wrapper W=2",
            "Xpmos_level2_bin0 out out_level1 LVDD LVDD pch_wrapper W=8",
            "Xnmos_level2_bin0 out out_level1 LGND LGND nch_wrapper W=4",
        ]
    );
    assert_eq!(text.matches(".subckt").count(), 1);
    assert_eq!(text.matches(".ends buf").count(), 1);
}

#[test]
fn chain_follows_resolved_topology() {
    let mut fixture = Fixture::new(logic(100., 100.));
    fixture
        .add(buffer("buf", 1., 3, 2.), true)
        .add(inverter("inv", 1.), true);
    let opts = SpiceOptions::default();

    let primitive = Primitive {
        topology: Topology::Buffer { num_levels: 2 },
        ..fixture.resolve("buf").unwrap()
    };
    let mut out = SpiceWriter::new(Vec::new(), 10);
    compose_chain(&mut out, &primitive, &opts).unwrap();
    let text = String::from_utf8(out.finish().unwrap()).unwrap();
    assert_eq!(
        device_lines(&text),
        [
            "Xpmos_level0_bin0 out_level0 in LVDD LVDD pch_wrapper W=2",
            "Xnmos_level0_bin0 out_level0 in LGND LGND nch_wrapper W=1",
            "Xpmos_level1_bin0 out out_level0 LVDD LVDD pch_wrapper W=4",
            "Xnmos_level1_bin0 out out_level0 LGND LGND nch_wrapper W=2",
        ]
    );

    let inverter = fixture.resolve("inv").unwrap();
    let mut out = SpiceWriter::new(Vec::new(), 10);
    assert!(matches!(
        compose_chain(&mut out, &inverter, &opts),
        Err(Error::InvalidParameter(_))
    ));
}

#[test]
fn power_gated_buffer_gates_every_stage() {
    let mut fixture = Fixture::new(logic(100., 100.));
    fixture.add(power_gated(buffer("buf_pg", 1., 2, 4.), 1), true);
    let (result, text) = fixture.render();
    result.unwrap();

    let devices = device_lines(&text);
    assert_eq!(devices.len(), 2 * 2 * 2);
    assert!(devices.contains(
        &"Xpmos_powergate_level1_bin0_pin_0 out_pmos_pg_0 ENB LVDD LVDD pch_wrapper W=8"
    ));
    assert!(devices.contains(
        &"Xnmos_level1_bin0 out out_level0 out_nmos_pg_0 LGND nch_wrapper W=4"
    ));
}

#[test]
fn skips_models_with_external_netlists() {
    let mut fixture = Fixture::new(logic(4., 2.));
    let mut external = inverter("ext_inv", 1.);
    external.set_circuit_netlist("ext_inv.sp");
    fixture
        .add(external, false)
        .add(CircuitModel::new("sram6T", ModelKind::Sram), false)
        .add(inverter("inv", 1.), true);
    let (result, text) = fixture.render();

    let summary = result.unwrap();
    assert_eq!(summary.skipped, ["ext_inv", "sram6T"]);
    assert_eq!(summary.subckts, ["inv"]);
    assert!(!text.contains("ext_inv"));
    assert!(text.contains(".subckt inv in out"));
}

#[test]
fn pass_gates_need_a_binding_but_have_no_body() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture
        .add(CircuitModel::new("tgate", ModelKind::PassGate), true)
        .add(inverter("inv", 1.), true);
    let (result, text) = fixture.render();
    let summary = result.unwrap();
    assert_eq!(summary.skipped, ["tgate"]);
    assert!(!text.contains("tgate"));

    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(CircuitModel::new("nand2", ModelKind::Gate), false);
    let (result, _) = fixture.render();
    let err = result.unwrap_err();
    assert!(matches!(err.source, Error::MissingTechBinding(ref name) if name == "nand2"));
}

#[test]
fn missing_binding_keeps_partial_netlist() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture
        .add(inverter("inv", 1.), true)
        .add(inverter("inv_unbound", 1.), false)
        .add(inverter("inv_after", 1.), true);

    let dir = tempfile::tempdir().unwrap();
    let mut netlists = NetlistManager::new();
    let opts = SpiceOptions::default();
    let err = emit_library(&mut netlists, &fixture.library(), dir.path(), &opts).unwrap_err();

    assert_eq!(err.model.as_deref(), Some("inv_unbound"));
    assert!(matches!(err.source, Error::MissingTechBinding(_)));
    let netlist = err.netlist.unwrap();
    assert_eq!(netlists.netlist_kind(netlist), NetlistKind::Submodule);
    assert_eq!(netlists.netlist_path(netlist), dir.path().join(&opts.essentials_file));
    assert_eq!(
        err.to_string(),
        "failed to synthesize circuit model `inv_unbound`: \
         unable to find technology binding for circuit model `inv_unbound`"
    );
    assert!(std::error::Error::source(&err).is_some());

    let text = std::fs::read_to_string(netlists.netlist_path(netlist)).unwrap();
    assert!(text.contains(".subckt inv in out\n"));
    assert!(text.contains(".ends inv\n"));
    assert!(!text.contains("inv_unbound"));
    assert!(!text.contains("inv_after"));
}

#[test]
fn unopenable_output_has_no_netlist() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(inverter("inv", 1.), true);

    let dir = tempfile::tempdir().unwrap();
    let mut netlists = NetlistManager::new();
    let missing = dir.path().join("missing");
    let err = emit_library(
        &mut netlists,
        &fixture.library(),
        &missing,
        &SpiceOptions::default(),
    )
    .unwrap_err();

    assert!(err.model.is_none());
    assert!(err.netlist.is_none());
    assert!(matches!(err.source, Error::StreamFault(_)));
    assert!(err
        .to_string()
        .starts_with("failed to write essential gates: I/O error: "));
    assert!(netlists.is_empty());
}

#[test]
fn emits_and_registers_netlists() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture
        .add(inverter("inv", 3.), true)
        .add(buffer("buf", 1., 2, 4.), true);

    let dir = tempfile::tempdir().unwrap();
    let mut netlists = NetlistManager::new();
    let opts = SpiceOptions::default();
    let wrappers =
        emit_transistor_wrappers(&mut netlists, &fixture.tech_lib, dir.path(), &opts).unwrap();
    let report = emit_library(&mut netlists, &fixture.library(), dir.path(), &opts).unwrap();

    assert_eq!(report.summary.subckts, ["inv", "buf"]);
    assert_eq!(
        netlists
            .netlists_of_kind(NetlistKind::Submodule)
            .collect::<Vec<_>>(),
        [wrappers, report.netlist]
    );
    let text = std::fs::read_to_string(dir.path().join("inv_buf_passgate.sp")).unwrap();
    assert!(text.starts_with("* Essential gates\n"));
    assert!(dir.path().join("transistor.sp").exists());
}

#[test]
fn emission_is_deterministic() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture
        .add(inverter("inv", 3.), true)
        .add(power_gated(buffer("buf", 1.5, 4, 3.), 3), true);

    let (first, a) = fixture.render();
    let (second, b) = fixture.render();
    first.unwrap();
    second.unwrap();
    assert_eq!(a, b);
}

#[test]
fn uses_configured_rails_and_wrapper_postfix() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(inverter("inv", 1.), true);

    let mut table = toml::Table::new();
    table.insert("vdd_rail".into(), "VDD_LOCAL".into());
    table.insert("wrapper_postfix".into(), "_w".into());
    let opts = SpiceOptions::from_table(&table).unwrap();
    assert_eq!(opts.gnd_rail, "LGND");

    let mut out = SpiceWriter::new(Vec::new(), opts.width_precision());
    write_essentials(&mut out, &fixture.library(), &opts).unwrap();
    let text = String::from_utf8(out.finish().unwrap()).unwrap();
    assert_eq!(
        device_lines(&text),
        [
            "Xpmos_0 out in VDD_LOCAL VDD_LOCAL pch_w W=2",
            "Xnmos_0 out in LGND LGND nch_w W=1",
        ]
    );
}

#[test]
fn rejects_unknown_spice_options() {
    let mut table = toml::Table::new();
    table.insert("vdd".into(), "VDD".into());
    assert!(SpiceOptions::from_table(&table).is_err());
}

#[test]
fn power_gated_model_needs_both_control_ports() {
    let mut model = inverter("inv_pg", 1.);
    model.set_power_gated(true);
    model.add_port(CircuitPort::new("EN", PortKind::Input).config_enable(0));
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(model, true);

    let err = fixture.resolve("inv_pg").unwrap_err();
    assert!(matches!(
        err,
        Error::MissingControlPort {
            port: ControlPort::EnableBar,
            ..
        }
    ));

    let (result, _) = fixture.render();
    assert_eq!(result.unwrap_err().model.as_deref(), Some("inv_pg"));
}

#[test]
fn resolves_gating_per_polarity() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(power_gated(inverter("inv_pg", 1.), 2), true);
    let primitive = fixture.resolve("inv_pg").unwrap();

    assert!(matches!(primitive.gating, Gating::PowerGated { .. }));
    let pmos = primitive.gating.control(circuitlib::Polarity::Pmos).unwrap();
    let nmos = primitive.gating.control(circuitlib::Polarity::Nmos).unwrap();
    assert_eq!(pmos.prefix, "ENB");
    assert_eq!(nmos.prefix, "EN");
}

#[test]
fn rejects_malformed_ports() {
    let mut model = CircuitModel::new("wide", ModelKind::InvBuf);
    model.add_port(CircuitPort::new("in", PortKind::Input).with_size(2));
    model.add_port(CircuitPort::new("out", PortKind::Output));
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(model, true).add(buffer("short", 1., 1, 4.), true);

    assert!(matches!(fixture.resolve("wide"), Err(Error::InvalidParameter(_))));
    assert!(matches!(fixture.resolve("short"), Err(Error::InvalidParameter(_))));
}

#[test]
fn writes_transistor_wrappers() {
    let mut tech_lib = TechnologyLibrary::new();
    tech_lib.add_model(logic(4., 2.));
    tech_lib.add_model(logic(4., 2.).with_kind(TechModelKind::Rram));

    let mut out = SpiceWriter::new(Vec::new(), 10);
    let count = write_transistor_wrappers(&mut out, &tech_lib, &SpiceOptions::default()).unwrap();
    let text = String::from_utf8(out.finish().unwrap()).unwrap();

    assert_eq!(count, 2);
    assert_eq!(
        text,
        format!(
            "* Transistor wrappers\n{}\n\
             .subckt pch_wrapper drain gate source bulk L=4e-08 W=1\n\
             M1 drain gate source bulk pch L=L W=W\n\
             .ends pch_wrapper\n\n\
             .subckt nch_wrapper drain gate source bulk L=4e-08 W=1\n\
             M1 drain gate source bulk nch L=L W=W\n\
             .ends nch_wrapper\n\n",
            NOTICE
        )
    );
}

#[test]
fn validation_reports_every_problem() {
    let mut fixture = Fixture::new(logic(4., 2.));
    let mut half_gated = inverter("half_gated", 1.);
    half_gated.set_power_gated(true);
    half_gated.add_port(CircuitPort::new("EN", PortKind::Input).config_enable(0));
    fixture
        .add(inverter("inv", 1.), true)
        .add(inverter("unbound", 1.), false)
        .add(buffer("short", -1., 1, 0.), true)
        .add(half_gated, true)
        .add(CircuitModel::new("tgate", ModelKind::PassGate), true);

    let issues = validate(&fixture.circuit_lib, &fixture.tech_lib, &fixture.bindings);
    let causes: Vec<&Cause> = issues.iter().map(|issue| issue.cause()).collect();

    assert!(causes.contains(&&Cause::MissingTechBinding {
        model: ArcStr::from("unbound")
    }));
    assert!(causes.contains(&&Cause::TooFewStages {
        model: ArcStr::from("short"),
        num_levels: 1
    }));
    assert!(causes.contains(&&Cause::InvalidSize {
        model: ArcStr::from("short"),
        size: -1.
    }));
    assert!(causes.contains(&&Cause::InvalidGrowthFactor {
        model: ArcStr::from("short"),
        f_per_stage: 0.
    }));
    assert!(causes.contains(&&Cause::MissingControlPort {
        model: ArcStr::from("half_gated"),
        port: ControlPort::EnableBar
    }));
    assert!(causes.contains(&&Cause::NoDeviceBody {
        model: ArcStr::from("tgate"),
        kind: ModelKind::PassGate
    }));
    assert!(!causes.iter().any(|cause| format!("{}", cause).contains("`inv`")));

    assert_eq!(
        issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Info)
            .count(),
        1
    );
    assert_eq!(issues.num_errors(), 5);
    assert!(issues.has_error());
    assert!(!issues.has_warning());
    assert_eq!(issues.len(), 6);
}

#[test]
fn validation_checks_technology_limits() {
    let tech = TechnologyModel::new_transistor(
        "logic",
        "M",
        0.,
        transistor("pch", 0.5),
        transistor("nch", 2.),
    );
    let mut fixture = Fixture::new(tech);
    fixture
        .add(inverter("inv_a", 1.), true)
        .add(inverter("inv_b", 1.), true);

    let issues = validate(&fixture.circuit_lib, &fixture.tech_lib, &fixture.bindings);
    let causes: Vec<&Cause> = issues.iter().map(|issue| issue.cause()).collect();
    assert_eq!(
        causes,
        [
            &Cause::InvalidWidths {
                tech: ArcStr::from("logic"),
                polarity: circuitlib::Polarity::Pmos,
                min_width: 1.,
                max_width: 0.5,
            },
            &Cause::InvalidPnRatio {
                tech: ArcStr::from("logic"),
                pn_ratio: 0.,
            },
        ]
    );
}

#[test]
fn unknown_module_is_fatal() {
    let mut fixture = Fixture::new(logic(4., 2.));
    fixture.add(inverter("inv", 1.), true);
    fixture.modules = ModuleManager::new();
    let (result, _) = fixture.render();
    assert!(matches!(result.unwrap_err().source, Error::MissingModule(_)));
}
