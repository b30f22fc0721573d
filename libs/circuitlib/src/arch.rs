//! Loading circuit and technology libraries from TOML architecture files.
//!
//! An architecture file looks like this:
//!
//! ```toml
//! [[technology]]
//! name = "logic"
//! pn_ratio = 2.0
//! pmos = { name = "pch", chan_length = 40e-9, min_width = 140e-9, max_width = 560e-9 }
//! nmos = { name = "nch", chan_length = 40e-9, min_width = 140e-9, max_width = 280e-9 }
//!
//! [[circuit_model]]
//! name = "INVTX1"
//! kind = "inv_buf"
//! device_model = "logic"
//! buffer = { kind = "inverter", size = 1.0 }
//! port = [
//!     { prefix = "in", kind = "input" },
//!     { prefix = "out", kind = "output" },
//! ]
//! ```

use std::path::Path;
use std::sync::Arc;

use arcstr::ArcStr;
use serde::Deserialize;

use crate::binding::TechBindings;
use crate::circuit::{BufferParams, CircuitLibrary, CircuitModel, CircuitPort, ModelKind};
use crate::technology::{TechModelKind, TechnologyLibrary, TechnologyModel, TransistorModel};
use crate::{LoadError, Result};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawArchitecture {
    #[serde(default)]
    technology: Vec<RawTechnology>,
    #[serde(default)]
    circuit_model: Vec<RawCircuitModel>,
    #[serde(default)]
    spice: toml::Table,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTechnology {
    name: ArcStr,
    #[serde(default)]
    kind: TechModelKind,
    #[serde(default = "default_model_ref")]
    model_ref: ArcStr,
    pn_ratio: f64,
    pmos: TransistorModel,
    nmos: TransistorModel,
}

fn default_model_ref() -> ArcStr {
    arcstr::literal!("M")
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCircuitModel {
    name: ArcStr,
    kind: ModelKind,
    #[serde(default)]
    circuit_netlist: Option<ArcStr>,
    #[serde(default)]
    device_model: Option<ArcStr>,
    #[serde(default)]
    is_power_gated: bool,
    #[serde(default)]
    buffer: Option<BufferParams>,
    #[serde(default, rename = "port")]
    ports: Vec<CircuitPort>,
}

/// The libraries described by an architecture file.
#[derive(Clone, Debug, Default)]
pub struct Architecture {
    /// The circuit library.
    pub circuit_lib: CircuitLibrary,
    /// The technology library.
    pub tech_lib: TechnologyLibrary,
    /// Circuit-to-technology model bindings.
    pub bindings: TechBindings,
    /// The raw `[spice]` table, interpreted by the netlist writers.
    pub spice: toml::Table,
}

impl Architecture {
    /// Reads and parses the architecture file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| LoadError::Io {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parses an architecture description.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let raw: RawArchitecture = toml::from_str(contents)?;

        let mut tech_lib = TechnologyLibrary::new();
        for tech in raw.technology {
            tech_lib.add_model(
                TechnologyModel::new_transistor(
                    tech.name,
                    tech.model_ref,
                    tech.pn_ratio,
                    tech.pmos,
                    tech.nmos,
                )
                .with_kind(tech.kind),
            );
        }

        let mut circuit_lib = CircuitLibrary::new();
        let mut bindings = TechBindings::new();
        for raw_model in raw.circuit_model {
            let mut model = CircuitModel::new(raw_model.name.clone(), raw_model.kind);
            if let Some(path) = raw_model.circuit_netlist {
                model.set_circuit_netlist(path);
            }
            if let Some(buffer) = raw_model.buffer {
                model.set_buffer(buffer);
            }
            model.set_power_gated(raw_model.is_power_gated);
            for port in raw_model.ports {
                model.add_port(port);
            }
            let id = circuit_lib.add_model(model)?;

            if let Some(tech_name) = raw_model.device_model {
                let tech = tech_lib.model_named(&tech_name).ok_or_else(|| {
                    LoadError::UnknownTechnology {
                        model: raw_model.name.clone(),
                        technology: tech_name.clone(),
                    }
                })?;
                bindings.bind(id, tech);
            }
        }

        tracing::debug!(
            circuit_models = circuit_lib.len(),
            "loaded architecture description"
        );

        Ok(Self {
            circuit_lib,
            tech_lib,
            bindings,
            spice: raw.spice,
        })
    }
}
