//! A registry of structural modules.
//!
//! Modules are stored in an arena and addressed by [`ModuleId`]s; there are
//! no references between modules.

use std::collections::HashMap;

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};

use crate::circuit::{bit_name, CircuitLibrary, PortKind};

/// An opaque module identifier: an index into the module arena.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ModuleId(usize);

/// A port of a module.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePort {
    /// The port name.
    pub name: ArcStr,
    /// The port kind.
    pub kind: PortKind,
    /// The number of bits in the port.
    pub width: usize,
}

impl ModulePort {
    /// The node names of each bit of this port, in order.
    pub fn bit_names(&self) -> impl Iterator<Item = ArcStr> + '_ {
        (0..self.width).map(|pin| bit_name(&self.name, self.width, pin))
    }
}

#[derive(Clone, Debug)]
struct Module {
    name: ArcStr,
    ports: Vec<ModulePort>,
}

/// A registry mapping module names to modules and their port lists.
#[derive(Clone, Debug, Default)]
pub struct ModuleManager {
    modules: Vec<Module>,
    name_map: HashMap<ArcStr, ModuleId>,
}

impl ModuleManager {
    /// Creates an empty module manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one module per circuit model, with ports in declaration order.
    pub fn from_circuit_library(lib: &CircuitLibrary) -> Self {
        let mut manager = Self::new();
        for (_, model) in lib.models() {
            let id = manager.add_module(model.name().clone());
            for port in model.ports() {
                manager.add_port(
                    id,
                    ModulePort {
                        name: port.prefix.clone(),
                        kind: port.kind,
                        width: port.size,
                    },
                );
            }
        }
        manager
    }

    /// Adds a module with no ports, returning the existing ID if a module
    /// with this name is already registered.
    pub fn add_module(&mut self, name: impl Into<ArcStr>) -> ModuleId {
        let name = name.into();
        if let Some(id) = self.name_map.get(&name) {
            return *id;
        }
        let id = ModuleId(self.modules.len());
        self.name_map.insert(name.clone(), id);
        self.modules.push(Module {
            name,
            ports: Vec::new(),
        });
        id
    }

    /// Appends a port to the given module.
    ///
    /// # Panics
    ///
    /// Panics if the module does not exist.
    pub fn add_port(&mut self, id: ModuleId, port: ModulePort) {
        self.modules[id.0].ports.push(port);
    }

    /// Finds the module with the given name.
    #[inline]
    pub fn find_module(&self, name: &str) -> Option<ModuleId> {
        self.name_map.get(name).copied()
    }

    /// The name of the given module.
    ///
    /// # Panics
    ///
    /// Panics if the module does not exist.
    #[inline]
    pub fn module_name(&self, id: ModuleId) -> &ArcStr {
        &self.modules[id.0].name
    }

    /// The ports of the given module, in order.
    ///
    /// # Panics
    ///
    /// Panics if the module does not exist.
    #[inline]
    pub fn module_ports(&self, id: ModuleId) -> &[ModulePort] {
        &self.modules[id.0].ports
    }
}
