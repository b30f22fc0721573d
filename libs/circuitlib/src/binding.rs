//! Bindings from circuit models to technology models.

use indexmap::IndexMap;

use crate::circuit::CircuitModelId;
use crate::technology::TechnologyModelId;

/// A one-to-one association of circuit models with technology models.
#[derive(Clone, Debug, Default)]
pub struct TechBindings {
    bindings: IndexMap<CircuitModelId, TechnologyModelId>,
}

impl TechBindings {
    /// Creates an empty set of bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `circuit_model` to `tech_model`, replacing any previous binding.
    pub fn bind(&mut self, circuit_model: CircuitModelId, tech_model: TechnologyModelId) {
        self.bindings.insert(circuit_model, tech_model);
    }

    /// The technology model bound to the given circuit model, if any.
    #[inline]
    pub fn get(&self, circuit_model: CircuitModelId) -> Option<TechnologyModelId> {
        self.bindings.get(&circuit_model).copied()
    }

    /// Iterates over all bindings in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (CircuitModelId, TechnologyModelId)> + '_ {
        self.bindings.iter().map(|(c, t)| (*c, *t))
    }
}

impl FromIterator<(CircuitModelId, TechnologyModelId)> for TechBindings {
    fn from_iter<T: IntoIterator<Item = (CircuitModelId, TechnologyModelId)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
