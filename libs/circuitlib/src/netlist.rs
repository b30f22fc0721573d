//! A registry of generated netlist files.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// An opaque netlist identifier.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct NetlistId(usize);

/// The classification of a generated netlist.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum NetlistKind {
    /// A library of subcircuits included by other netlists.
    #[default]
    Submodule,
    /// A top-level netlist.
    TopLevel,
}

#[derive(Clone, Debug)]
struct NetlistEntry {
    path: PathBuf,
    kind: NetlistKind,
}

/// Tracks every netlist file written during generation.
#[derive(Clone, Debug, Default)]
pub struct NetlistManager {
    netlists: Vec<NetlistEntry>,
}

impl NetlistManager {
    /// Creates an empty netlist manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a netlist file.
    ///
    /// Registering a path twice returns the original ID.
    pub fn add_netlist(&mut self, path: impl Into<PathBuf>) -> NetlistId {
        let path = path.into();
        if let Some(idx) = self.netlists.iter().position(|entry| entry.path == path) {
            return NetlistId(idx);
        }
        let id = NetlistId(self.netlists.len());
        self.netlists.push(NetlistEntry {
            path,
            kind: NetlistKind::default(),
        });
        tracing::debug!(path = ?self.netlists[id.0].path, "registered netlist");
        id
    }

    /// Sets the classification of a netlist.
    ///
    /// # Panics
    ///
    /// Panics if the netlist does not exist.
    pub fn set_netlist_kind(&mut self, id: NetlistId, kind: NetlistKind) {
        self.netlists[id.0].kind = kind;
    }

    /// The path of a netlist.
    ///
    /// # Panics
    ///
    /// Panics if the netlist does not exist.
    #[inline]
    pub fn netlist_path(&self, id: NetlistId) -> &Path {
        &self.netlists[id.0].path
    }

    /// The classification of a netlist.
    ///
    /// # Panics
    ///
    /// Panics if the netlist does not exist.
    #[inline]
    pub fn netlist_kind(&self, id: NetlistId) -> NetlistKind {
        self.netlists[id.0].kind
    }

    /// All netlists of the given kind, in registration order.
    pub fn netlists_of_kind(&self, kind: NetlistKind) -> impl Iterator<Item = NetlistId> + '_ {
        self.netlists
            .iter()
            .enumerate()
            .filter(move |(_, entry)| entry.kind == kind)
            .map(|(idx, _)| NetlistId(idx))
    }

    /// The number of registered netlists.
    #[inline]
    pub fn len(&self) -> usize {
        self.netlists.len()
    }

    /// Returns `true` if no netlists are registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.netlists.is_empty()
    }
}
