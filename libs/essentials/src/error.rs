//! Error types and error handling utilities.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use arcstr::ArcStr;

/// A result type returning synthesis errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A power-gating control port.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
pub enum ControlPort {
    /// The active-high enable, gating the NMOS network.
    Enable,
    /// The active-low enable, gating the PMOS network.
    EnableBar,
}

impl Display for ControlPort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::EnableBar => write!(f, "enable-bar"),
        }
    }
}

/// The error type for device-level synthesis.
///
/// Every variant is fatal for the model being synthesized.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A sizing parameter or port declaration is malformed.
    #[error("invalid parameter: {0}")]
    InvalidParameter(ArcStr),
    /// A model that requires device-level synthesis has no technology model.
    #[error("unable to find technology binding for circuit model `{0}`")]
    MissingTechBinding(ArcStr),
    /// A power-gated model lacks one of its control ports.
    #[error("power-gated circuit model `{model}` has no {port} port")]
    MissingControlPort {
        /// The circuit model.
        model: ArcStr,
        /// The missing port.
        port: ControlPort,
    },
    /// The module manager has no module for a circuit model.
    #[error("no module found for circuit model `{0}`")]
    MissingModule(ArcStr),
    /// The output stream could not be opened or written.
    #[error("I/O error: {0}")]
    StreamFault(#[from] Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::StreamFault(Arc::new(value))
    }
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<ArcStr>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}
