//! Device-level SPICE synthesis of essential gates.
//!
//! Inverters and buffers declared in a [`circuitlib::CircuitLibrary`] are
//! turned into transistor-level subcircuits, sized against the technology
//! model each circuit model is bound to:
//!
//! - device widths larger than the technology allows are split into
//!   parallel [bins](binning),
//! - power-gated primitives get a [cascade](powergate) of gating devices
//!   between each network and its rail,
//! - multi-stage [buffers](buffer) are built from geometrically growing
//!   [inverter stages](inverter).
//!
//! Generated devices instantiate the [transistor wrappers](wrapper) rather
//! than model cards directly.
#![warn(missing_docs)]

pub mod binning;
pub mod buffer;
pub mod error;
pub mod inverter;
pub mod library;
pub mod naming;
pub mod options;
pub mod powergate;
pub mod primitive;
pub mod stamp;
pub mod validation;
pub mod wrapper;
pub mod writer;

#[cfg(test)]
mod tests;

pub use diagnostics::{Diagnostic, IssueSet, Severity};
pub use error::{ControlPort, Error, Result};
pub use library::{emit_library, write_essentials, EmitError, EmitReport, EmitSummary, GateLibrary};
pub use options::SpiceOptions;
pub use validation::{validate, ValidatorIssue};
pub use wrapper::{emit_transistor_wrappers, write_transistor_wrappers};
pub use writer::SpiceWriter;
