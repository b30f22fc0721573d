//! Circuit and technology libraries consumed by netlist generators.
//!
//! This crate holds the read-only descriptions that device-level netlist
//! synthesis works from: technology-independent circuit models, physical
//! technology models, the bindings between them, and the registries of
//! structural modules and generated netlist files.
#![warn(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;

use arcstr::ArcStr;

pub mod arch;
pub mod binding;
pub mod circuit;
pub mod module;
pub mod netlist;
pub mod technology;

#[cfg(test)]
mod tests;

pub use arch::Architecture;
pub use binding::TechBindings;
pub use circuit::{
    BufferKind, BufferParams, CircuitLibrary, CircuitModel, CircuitModelId, CircuitPort,
    ModelKind, PortKind,
};
pub use module::{ModuleId, ModuleManager, ModulePort};
pub use netlist::{NetlistId, NetlistKind, NetlistManager};
pub use technology::{
    Polarity, TechModelKind, TechnologyLibrary, TechnologyModel, TechnologyModelId,
    TransistorModel,
};

/// A result type returning [`LoadError`]s.
pub type Result<T, E = LoadError> = std::result::Result<T, E>;

/// An error building a circuit or technology library.
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// The architecture file could not be read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        /// The path that was read.
        path: PathBuf,
        /// The underlying error.
        source: Arc<std::io::Error>,
    },
    /// The architecture file is not valid TOML or does not match the expected schema.
    #[error("failed to parse architecture description: {0}")]
    Parse(#[from] toml::de::Error),
    /// Two circuit models have the same name.
    #[error("duplicate circuit model `{0}`")]
    DuplicateModel(ArcStr),
    /// A circuit model names a technology model that does not exist.
    #[error("circuit model `{model}` is bound to unknown technology model `{technology}`")]
    UnknownTechnology {
        /// The circuit model.
        model: ArcStr,
        /// The missing technology model.
        technology: ArcStr,
    },
}
