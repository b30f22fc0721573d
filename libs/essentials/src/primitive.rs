//! Inverter-like primitives resolved against their technology model.
//!
//! A circuit model's topology (single inverter or multi-stage buffer) and
//! gating (regular or power gated) are resolved once, up front. The stage
//! composers then read both from the resolved [`Primitive`] instead of
//! re-querying the circuit model.

use std::io::Write;

use circuitlib::{
    BufferKind, CircuitModel, CircuitPort, ModulePort, Polarity, PortKind, TechnologyModel,
};

use crate::buffer::compose_chain;
use crate::inverter::compose_inverter;
use crate::options::SpiceOptions;
use crate::writer::SpiceWriter;
use crate::{ControlPort, Error, Result};

/// The stage structure of a primitive.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Topology {
    /// A single inverting stage.
    Inverter,
    /// A chain of `num_levels` inverting stages.
    Buffer {
        /// The number of stages; at least 2.
        num_levels: usize,
    },
}

/// Whether a primitive's stages are power gated.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Gating<'a> {
    /// Stages connect directly to the rails.
    Regular,
    /// Each network is separated from its rail by a chain of gating devices.
    PowerGated {
        /// Gates the NMOS network.
        en: &'a CircuitPort,
        /// Gates the PMOS network.
        enb: &'a CircuitPort,
    },
}

impl<'a> Gating<'a> {
    /// The control port gating the network of the given polarity, if any.
    pub fn control(&self, polarity: Polarity) -> Option<&'a CircuitPort> {
        match (self, polarity) {
            (Self::Regular, _) => None,
            (Self::PowerGated { enb, .. }, Polarity::Pmos) => Some(*enb),
            (Self::PowerGated { en, .. }, Polarity::Nmos) => Some(*en),
        }
    }
}

/// A circuit model ready for device-level synthesis.
#[derive(Copy, Clone, Debug)]
pub struct Primitive<'a> {
    /// The circuit model.
    pub model: &'a CircuitModel,
    /// The bound technology model.
    pub tech: &'a TechnologyModel,
    /// The single-bit input port.
    pub input: &'a CircuitPort,
    /// The single-bit output port.
    pub output: &'a CircuitPort,
    /// Inverter or buffer.
    pub topology: Topology,
    /// Regular or power gated.
    pub gating: Gating<'a>,
}

fn single_bit_port<'a>(model: &'a CircuitModel, kind: PortKind) -> Result<&'a CircuitPort> {
    let ports: Vec<_> = model.ports_by_kind(kind, true).collect();
    match ports.as_slice() {
        [port] if port.size == 1 => Ok(*port),
        _ => Err(Error::invalid(format!(
            "circuit model `{}` must have exactly one {:?} port of width 1, found {} port(s) with widths {:?}",
            model.name(),
            kind,
            ports.len(),
            ports.iter().map(|port| port.size).collect::<Vec<_>>(),
        ))),
    }
}

impl<'a> Primitive<'a> {
    /// Resolves the topology, gating and ports of an inverter or buffer model.
    pub fn resolve(model: &'a CircuitModel, tech: &'a TechnologyModel) -> Result<Self> {
        let input = single_bit_port(model, PortKind::Input)?;
        let output = single_bit_port(model, PortKind::Output)?;

        let buffer = model.buffer();
        if !(buffer.size >= 0.) || !buffer.size.is_finite() {
            return Err(Error::invalid(format!(
                "circuit model `{}` has invalid buffer size {}",
                model.name(),
                buffer.size
            )));
        }

        let topology = match buffer.kind {
            BufferKind::Inverter => Topology::Inverter,
            BufferKind::Buffer => {
                if buffer.num_levels < 2 {
                    return Err(Error::invalid(format!(
                        "buffer `{}` must have at least 2 stages, found {}",
                        model.name(),
                        buffer.num_levels
                    )));
                }
                if !(buffer.f_per_stage > 0.) || !buffer.f_per_stage.is_finite() {
                    return Err(Error::invalid(format!(
                        "buffer `{}` has invalid per-stage growth factor {}",
                        model.name(),
                        buffer.f_per_stage
                    )));
                }
                Topology::Buffer {
                    num_levels: buffer.num_levels,
                }
            }
        };

        let gating = if model.is_power_gated() {
            let en = model
                .power_gate_en_port()
                .ok_or_else(|| Error::MissingControlPort {
                    model: model.name().clone(),
                    port: ControlPort::Enable,
                })?;
            let enb = model
                .power_gate_enb_port()
                .ok_or_else(|| Error::MissingControlPort {
                    model: model.name().clone(),
                    port: ControlPort::EnableBar,
                })?;
            Gating::PowerGated { en, enb }
        } else {
            Gating::Regular
        };

        Ok(Self {
            model,
            tech,
            input,
            output,
            topology,
            gating,
        })
    }
}

/// Writes the complete subcircuit of a primitive: definition line, the
/// devices of every stage, and the terminator.
pub fn write_primitive_subckt<W: Write>(
    out: &mut SpiceWriter<W>,
    name: &str,
    ports: &[ModulePort],
    primitive: &Primitive<'_>,
    opts: &SpiceOptions,
) -> Result<()> {
    out.start_subckt(name, ports.iter().flat_map(|port| port.bit_names()), &[])?;
    match primitive.topology {
        Topology::Inverter => compose_inverter(out, primitive, opts)?,
        Topology::Buffer { .. } => compose_chain(out, primitive, opts)?,
    }
    out.end_subckt(name)
}
