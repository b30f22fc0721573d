//! Circuit models and the circuit library.
//!
//! A circuit model describes a technology-independent primitive: its kind,
//! its ports and, for inverters and buffers, its sizing parameters.

use std::fmt::{Display, Formatter};
use std::ops::Range;

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::LoadError;

/// An opaque circuit model identifier.
///
/// A circuit model ID created in the context of one library must
/// *not* be used in the context of another library.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct CircuitModelId(u64);

impl Display for CircuitModelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "circuit_model{}", self.0)
    }
}

/// The kind of a circuit model.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// An inverter or a multi-stage buffer.
    InvBuf,
    /// A pass-transistor or transmission gate.
    PassGate,
    /// A logic gate.
    Gate,
    /// A routing multiplexer.
    Mux,
    /// A look-up table.
    Lut,
    /// A flip-flop.
    Ff,
    /// A configuration memory cell.
    Sram,
    /// A configuration-chain flip-flop.
    Ccff,
    /// An I/O pad.
    Iopad,
    /// A hard IP block.
    Hard,
    /// A local wire.
    Wire,
    /// A routing channel wire.
    ChanWire,
}

impl ModelKind {
    /// Returns `true` if models of this kind are bound to a technology model
    /// and synthesized at the device level.
    #[inline]
    pub fn needs_device_synthesis(&self) -> bool {
        matches!(self, Self::InvBuf | Self::PassGate | Self::Gate)
    }
}

/// The topology of an [`ModelKind::InvBuf`] circuit model.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BufferKind {
    /// A single inverting stage.
    #[default]
    Inverter,
    /// A chain of two or more inverting stages.
    Buffer,
}

/// Sizing parameters of an inverter or buffer.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferParams {
    /// Inverter or multi-stage buffer.
    pub kind: BufferKind,
    /// Size of the first stage, in multiples of a minimum-width device.
    pub size: f64,
    /// Number of stages.
    pub num_levels: usize,
    /// Geometric growth factor between consecutive stages.
    pub f_per_stage: f64,
}

impl Default for BufferParams {
    fn default() -> Self {
        Self {
            kind: BufferKind::Inverter,
            size: 1.,
            num_levels: 1,
            f_per_stage: 4.,
        }
    }
}

/// The direction or role of a circuit port.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortKind {
    /// An input.
    Input,
    /// An output.
    Output,
    /// A bidirectional port.
    Inout,
    /// A clock input.
    Clock,
    /// A configuration memory port.
    Sram,
}

/// A port of a circuit model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CircuitPort {
    /// The name prefix of the port.
    pub prefix: ArcStr,
    /// The port kind.
    pub kind: PortKind,
    /// The number of bits in the port.
    #[serde(default = "default_port_size")]
    pub size: usize,
    /// Whether the port is a global signal shared by all instances.
    #[serde(default)]
    pub is_global: bool,
    /// Whether the port is a configuration-enable signal.
    #[serde(default)]
    pub is_config_enable: bool,
    /// The value the port holds when inactive.
    #[serde(default)]
    pub default_value: u8,
}

fn default_port_size() -> usize {
    1
}

impl CircuitPort {
    /// Creates a new single-bit, non-global port.
    pub fn new(prefix: impl Into<ArcStr>, kind: PortKind) -> Self {
        Self {
            prefix: prefix.into(),
            kind,
            size: 1,
            is_global: false,
            is_config_enable: false,
            default_value: 0,
        }
    }

    /// Returns this port with the given width.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Returns this port marked as a global configuration-enable signal
    /// with the given inactive value.
    pub fn config_enable(mut self, default_value: u8) -> Self {
        self.is_global = true;
        self.is_config_enable = true;
        self.default_value = default_value;
        self
    }

    /// The bit positions of this port, in declaration order.
    #[inline]
    pub fn pins(&self) -> Range<usize> {
        0..self.size
    }

    /// The node name of a single bit of this port.
    ///
    /// Single-bit ports are named by their prefix alone.
    pub fn bit_name(&self, pin: usize) -> ArcStr {
        bit_name(&self.prefix, self.size, pin)
    }
}

/// Names bit `pin` of a port with the given prefix and width.
///
/// This is the only naming rule for port bits; subcircuit port lists and
/// device connections both go through it.
pub fn bit_name(prefix: &ArcStr, width: usize, pin: usize) -> ArcStr {
    if width == 1 {
        prefix.clone()
    } else {
        arcstr::format!("{}[{}]", prefix, pin)
    }
}

/// A technology-independent circuit model.
#[derive(Clone, Debug, PartialEq)]
pub struct CircuitModel {
    name: ArcStr,
    kind: ModelKind,
    circuit_netlist: Option<ArcStr>,
    buffer: BufferParams,
    is_power_gated: bool,
    ports: Vec<CircuitPort>,
}

impl CircuitModel {
    /// Creates a new circuit model with no ports.
    pub fn new(name: impl Into<ArcStr>, kind: ModelKind) -> Self {
        Self {
            name: name.into(),
            kind,
            circuit_netlist: None,
            buffer: BufferParams::default(),
            is_power_gated: false,
            ports: Vec::new(),
        }
    }

    /// Sets the buffer parameters of this model.
    pub fn set_buffer(&mut self, buffer: BufferParams) {
        self.buffer = buffer;
    }

    /// Marks this model as power gated (or not).
    pub fn set_power_gated(&mut self, is_power_gated: bool) {
        self.is_power_gated = is_power_gated;
    }

    /// Declares that this model's netlist is supplied by an external file.
    pub fn set_circuit_netlist(&mut self, path: impl Into<ArcStr>) {
        self.circuit_netlist = Some(path.into());
    }

    /// Appends a port to this model.
    pub fn add_port(&mut self, port: CircuitPort) {
        self.ports.push(port);
    }

    /// The name of this model.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The kind of this model.
    #[inline]
    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// The externally supplied netlist, if any.
    ///
    /// An empty path is treated as absent.
    pub fn circuit_netlist(&self) -> Option<&ArcStr> {
        self.circuit_netlist.as_ref().filter(|path| !path.is_empty())
    }

    /// The buffer sizing parameters.
    #[inline]
    pub fn buffer(&self) -> &BufferParams {
        &self.buffer
    }

    /// Whether this model is power gated.
    #[inline]
    pub fn is_power_gated(&self) -> bool {
        self.is_power_gated
    }

    /// All ports of this model, in declaration order.
    #[inline]
    pub fn ports(&self) -> &[CircuitPort] {
        &self.ports
    }

    /// Ports of the given kind, optionally leaving out global ports.
    pub fn ports_by_kind(
        &self,
        kind: PortKind,
        ignore_global: bool,
    ) -> impl Iterator<Item = &CircuitPort> {
        self.ports
            .iter()
            .filter(move |port| port.kind == kind && !(ignore_global && port.is_global))
    }

    fn power_gate_port(&self, default_value: u8) -> Option<&CircuitPort> {
        self.ports.iter().find(|port| {
            port.kind == PortKind::Input
                && port.is_global
                && port.is_config_enable
                && port.default_value == default_value
        })
    }

    /// The active-high power-gate enable port, if any.
    ///
    /// This is the first global configuration-enable input whose inactive value is 0.
    pub fn power_gate_en_port(&self) -> Option<&CircuitPort> {
        self.power_gate_port(0)
    }

    /// The active-low power-gate enable port, if any.
    ///
    /// This is the first global configuration-enable input whose inactive value is 1.
    pub fn power_gate_enb_port(&self) -> Option<&CircuitPort> {
        self.power_gate_port(1)
    }
}

/// An ordered collection of circuit models.
#[derive(Clone, Debug, Default)]
pub struct CircuitLibrary {
    model_id: u64,
    models: IndexMap<CircuitModelId, CircuitModel>,
    name_map: IndexMap<ArcStr, CircuitModelId>,
}

impl CircuitLibrary {
    /// Creates a new, empty circuit library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model to the library.
    ///
    /// Returns an error if a model with the same name already exists.
    pub fn add_model(&mut self, model: CircuitModel) -> Result<CircuitModelId, LoadError> {
        if self.name_map.contains_key(model.name()) {
            return Err(LoadError::DuplicateModel(model.name().clone()));
        }
        self.model_id += 1;
        let id = CircuitModelId(self.model_id);
        self.name_map.insert(model.name().clone(), id);
        self.models.insert(id, model);
        Ok(id)
    }

    /// Gets the model with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if no model has the given ID.
    #[inline]
    pub fn model(&self, id: CircuitModelId) -> &CircuitModel {
        &self.models[&id]
    }

    /// Gets the model with the given ID, if it exists.
    #[inline]
    pub fn try_model(&self, id: CircuitModelId) -> Option<&CircuitModel> {
        self.models.get(&id)
    }

    /// Gets the ID of the model with the given name.
    #[inline]
    pub fn model_named(&self, name: &str) -> Option<CircuitModelId> {
        self.name_map.get(name).copied()
    }

    /// Iterates over all models in insertion order.
    pub fn models(&self) -> impl Iterator<Item = (CircuitModelId, &CircuitModel)> {
        self.models.iter().map(|(id, model)| (*id, model))
    }

    /// The number of models in the library.
    #[inline]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns `true` if the library has no models.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
