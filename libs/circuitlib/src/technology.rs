//! Technology models: the physical devices circuit models are bound to.

use std::fmt::{Display, Formatter};

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An opaque technology model identifier.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
pub struct TechnologyModelId(u64);

impl Display for TechnologyModelId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tech_model{}", self.0)
    }
}

/// Transistor polarity.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// A P-channel device, pulling towards the supply rail.
    Pmos,
    /// An N-channel device, pulling towards the ground rail.
    Nmos,
}

impl Polarity {
    /// Both polarities, PMOS first.
    pub const ALL: [Polarity; 2] = [Polarity::Pmos, Polarity::Nmos];

    /// A lowercase name suitable for use in generated identifiers.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pmos => "pmos",
            Self::Nmos => "nmos",
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of a technology model.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TechModelKind {
    /// A CMOS transistor pair.
    #[default]
    Transistor,
    /// A resistive memory device.
    Rram,
}

/// Physical parameters of one transistor polarity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransistorModel {
    /// The device model card name.
    pub name: ArcStr,
    /// Channel length.
    pub chan_length: f64,
    /// Minimum device width.
    pub min_width: f64,
    /// Maximum width of a single device.
    pub max_width: f64,
}

/// A technology model.
#[derive(Clone, Debug, PartialEq)]
pub struct TechnologyModel {
    name: ArcStr,
    kind: TechModelKind,
    model_ref: ArcStr,
    pn_ratio: f64,
    pmos: TransistorModel,
    nmos: TransistorModel,
}

impl TechnologyModel {
    /// Creates a new transistor technology model.
    pub fn new_transistor(
        name: impl Into<ArcStr>,
        model_ref: impl Into<ArcStr>,
        pn_ratio: f64,
        pmos: TransistorModel,
        nmos: TransistorModel,
    ) -> Self {
        Self {
            name: name.into(),
            kind: TechModelKind::Transistor,
            model_ref: model_ref.into(),
            pn_ratio,
            pmos,
            nmos,
        }
    }

    /// Returns this model with the given kind.
    pub fn with_kind(mut self, kind: TechModelKind) -> Self {
        self.kind = kind;
        self
    }

    /// The name of this model.
    #[inline]
    pub fn name(&self) -> &ArcStr {
        &self.name
    }

    /// The kind of this model.
    #[inline]
    pub fn kind(&self) -> TechModelKind {
        self.kind
    }

    /// The instance prefix used when referencing the device model card.
    #[inline]
    pub fn model_ref(&self) -> &ArcStr {
        &self.model_ref
    }

    /// The PMOS-to-NMOS width ratio.
    #[inline]
    pub fn pn_ratio(&self) -> f64 {
        self.pn_ratio
    }

    /// The transistor parameters of the given polarity.
    #[inline]
    pub fn transistor(&self, polarity: Polarity) -> &TransistorModel {
        match polarity {
            Polarity::Pmos => &self.pmos,
            Polarity::Nmos => &self.nmos,
        }
    }
}

/// An ordered collection of technology models.
#[derive(Clone, Debug, Default)]
pub struct TechnologyLibrary {
    model_id: u64,
    models: IndexMap<TechnologyModelId, TechnologyModel>,
}

impl TechnologyLibrary {
    /// Creates a new, empty technology library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model to the library.
    pub fn add_model(&mut self, model: TechnologyModel) -> TechnologyModelId {
        self.model_id += 1;
        let id = TechnologyModelId(self.model_id);
        self.models.insert(id, model);
        id
    }

    /// Gets the model with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if no model has the given ID.
    #[inline]
    pub fn model(&self, id: TechnologyModelId) -> &TechnologyModel {
        &self.models[&id]
    }

    /// Gets the model with the given ID, if it exists.
    #[inline]
    pub fn try_model(&self, id: TechnologyModelId) -> Option<&TechnologyModel> {
        self.models.get(&id)
    }

    /// Gets the ID of the first model with the given name.
    pub fn model_named(&self, name: &str) -> Option<TechnologyModelId> {
        self.models
            .iter()
            .find(|(_, model)| model.name().as_str() == name)
            .map(|(id, _)| *id)
    }

    /// Iterates over all models in insertion order.
    pub fn models(&self) -> impl Iterator<Item = (TechnologyModelId, &TechnologyModel)> {
        self.models.iter().map(|(id, model)| (*id, model))
    }
}
