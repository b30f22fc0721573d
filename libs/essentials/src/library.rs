//! Emitting the essential gates netlist.
//!
//! Every circuit model in the library is visited in order. Models backed by
//! an external netlist, and kinds that are not synthesized at the device
//! level, are skipped. Models that are synthesized must have a technology
//! binding. Inverters and buffers then get a subcircuit; pass gates and
//! logic gates are bound but have no device-level body here.
//!
//! The first failure stops emission. Whatever was written before it stays in
//! the output file, which is still closed and registered.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use arcstr::ArcStr;
use circuitlib::{
    CircuitLibrary, CircuitModel, CircuitModelId, ModelKind, ModuleId, ModuleManager, NetlistId,
    NetlistKind, NetlistManager, TechBindings, TechModelKind, TechnologyLibrary,
};

use crate::options::SpiceOptions;
use crate::primitive::{write_primitive_subckt, Primitive};
use crate::writer::SpiceWriter;
use crate::{Error, Result};

/// The libraries and registries an essential gates netlist is generated from.
#[derive(Copy, Clone, Debug)]
pub struct GateLibrary<'a> {
    /// The circuit library; its order is the emission order.
    pub circuit_lib: &'a CircuitLibrary,
    /// The technology library.
    pub tech_lib: &'a TechnologyLibrary,
    /// Circuit-to-technology model bindings.
    pub bindings: &'a TechBindings,
    /// Module names and port lists.
    pub modules: &'a ModuleManager,
}

impl<'a> GateLibrary<'a> {
    /// Creates a new [`GateLibrary`].
    pub fn new(
        circuit_lib: &'a CircuitLibrary,
        tech_lib: &'a TechnologyLibrary,
        bindings: &'a TechBindings,
        modules: &'a ModuleManager,
    ) -> Self {
        Self {
            circuit_lib,
            tech_lib,
            bindings,
            modules,
        }
    }
}

/// What was written for each model.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmitSummary {
    /// Subcircuits written, in order.
    pub subckts: Vec<ArcStr>,
    /// Models that were not synthesized.
    pub skipped: Vec<ArcStr>,
}

/// The result of a successful emission.
#[derive(Clone, Debug)]
pub struct EmitReport {
    /// The registered netlist.
    pub netlist: NetlistId,
    /// What was written.
    pub summary: EmitSummary,
}

/// A failed emission.
#[derive(thiserror::Error, Clone, Debug)]
#[error("{}: {source}", failure_context(.model))]
pub struct EmitError {
    /// The model being synthesized when the failure occurred.
    pub model: Option<ArcStr>,
    /// The partially written netlist, if the output file was created.
    pub netlist: Option<NetlistId>,
    /// The underlying error.
    #[source]
    pub source: Error,
}

fn failure_context(model: &Option<ArcStr>) -> String {
    match model {
        Some(model) => format!("failed to synthesize circuit model `{}`", model),
        None => "failed to write essential gates".to_string(),
    }
}

enum Disposition<'a> {
    Skip(&'static str),
    NoBody,
    Synthesize {
        module: ModuleId,
        primitive: Primitive<'a>,
    },
}

fn plan<'a>(
    lib: &GateLibrary<'a>,
    id: CircuitModelId,
    model: &'a CircuitModel,
) -> Result<Disposition<'a>> {
    if model.circuit_netlist().is_some() {
        return Ok(Disposition::Skip("netlist supplied externally"));
    }
    if !model.kind().needs_device_synthesis() {
        return Ok(Disposition::Skip("not a device-level primitive"));
    }

    let tech = lib
        .bindings
        .get(id)
        .and_then(|tech| lib.tech_lib.try_model(tech))
        .ok_or_else(|| Error::MissingTechBinding(model.name().clone()))?;
    if tech.kind() != TechModelKind::Transistor {
        return Err(Error::invalid(format!(
            "circuit model `{}` is bound to `{}`, which is not a transistor model",
            model.name(),
            tech.name()
        )));
    }

    match model.kind() {
        ModelKind::InvBuf => {
            let module = lib
                .modules
                .find_module(model.name())
                .ok_or_else(|| Error::MissingModule(model.name().clone()))?;
            Ok(Disposition::Synthesize {
                module,
                primitive: Primitive::resolve(model, tech)?,
            })
        }
        _ => Ok(Disposition::NoBody),
    }
}

fn emit_model<W: Write>(
    out: &mut SpiceWriter<W>,
    lib: &GateLibrary<'_>,
    id: CircuitModelId,
    model: &CircuitModel,
    opts: &SpiceOptions,
    summary: &mut EmitSummary,
) -> Result<()> {
    match plan(lib, id, model)? {
        Disposition::Skip(reason) => {
            tracing::debug!(model = model.name().as_str(), reason, "skipping circuit model");
            summary.skipped.push(model.name().clone());
        }
        Disposition::NoBody => {
            tracing::debug!(
                model = model.name().as_str(),
                kind = ?model.kind(),
                "technology binding resolved; no device-level body to write"
            );
            summary.skipped.push(model.name().clone());
        }
        Disposition::Synthesize { module, primitive } => {
            tracing::debug!(
                model = model.name().as_str(),
                topology = ?primitive.topology,
                power_gated = model.is_power_gated(),
                "writing subcircuit"
            );
            let name = lib.modules.module_name(module);
            write_primitive_subckt(out, name, lib.modules.module_ports(module), &primitive, opts)?;
            summary.subckts.push(name.clone());
        }
    }
    Ok(())
}

/// Writes the essential gates netlist to `out`, stopping at the first failure.
pub fn write_essentials<W: Write>(
    out: &mut SpiceWriter<W>,
    lib: &GateLibrary<'_>,
    opts: &SpiceOptions,
) -> Result<EmitSummary, EmitError> {
    out.write_header("Essential gates")
        .map_err(|source| EmitError {
            model: None,
            netlist: None,
            source,
        })?;

    let mut summary = EmitSummary::default();
    for (id, model) in lib.circuit_lib.models() {
        if let Err(source) = emit_model(out, lib, id, model, opts, &mut summary) {
            tracing::error!(
                model = model.name().as_str(),
                error = %source,
                "aborting essential gates"
            );
            return Err(EmitError {
                model: Some(model.name().clone()),
                netlist: None,
                source,
            });
        }
    }
    Ok(summary)
}

/// Writes the essential gates netlist into `dir` and registers it as a
/// submodule netlist.
///
/// If synthesis fails part way through, the partial file is still
/// registered and its ID is returned in the error.
pub fn emit_library(
    netlists: &mut NetlistManager,
    lib: &GateLibrary<'_>,
    dir: &Path,
    opts: &SpiceOptions,
) -> Result<EmitReport, EmitError> {
    let path = dir.join(&opts.essentials_file);
    let span = tracing::info_span!("essential_gates", path = ?path);
    let _guard = span.enter();
    tracing::info!("generating SPICE netlist for essential gates");

    let file = File::create(&path).map_err(|err| EmitError {
        model: None,
        netlist: None,
        source: err.into(),
    })?;
    let mut out = SpiceWriter::new(file, opts.width_precision());
    let written = write_essentials(&mut out, lib, opts);
    let closed = out.finish();

    let netlist = netlists.add_netlist(path.clone());
    netlists.set_netlist_kind(netlist, NetlistKind::Submodule);

    let summary = written.map_err(|err| EmitError {
        netlist: Some(netlist),
        ..err
    })?;
    closed.map_err(|source| EmitError {
        model: None,
        netlist: Some(netlist),
        source,
    })?;

    tracing::info!(subckts = summary.subckts.len(), "done");
    Ok(EmitReport { netlist, summary })
}
