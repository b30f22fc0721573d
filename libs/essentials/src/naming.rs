//! Names of generated devices and internal nodes.
//!
//! All identifiers synthesized inside a subcircuit body come from here.

use arcstr::ArcStr;
use circuitlib::{Polarity, TransistorModel};

/// The switching device of one bin of an inverter stage.
pub fn device_name(polarity: Polarity, suffix: &str) -> ArcStr {
    arcstr::format!("X{}_{}", polarity, suffix)
}

/// The power-gating device controlled by bit `pin`.
pub fn powergate_device_name(polarity: Polarity, suffix: &str, pin: usize) -> ArcStr {
    arcstr::format!("X{}_powergate_{}_pin_{}", polarity, suffix, pin)
}

/// The node below (PMOS) or above (NMOS) the power-gating device controlled by bit `pin`.
pub fn powergate_node(signal: &str, polarity: Polarity, pin: usize) -> ArcStr {
    arcstr::format!("{}_{}_pg_{}", signal, polarity, pin)
}

/// The node driven by stage `level` of a buffer chain.
pub fn stage_node(output_port: &str, level: usize) -> ArcStr {
    arcstr::format!("{}_level{}", output_port, level)
}

/// The device-name suffix of bin `bin` of a stage.
///
/// Stages of a buffer chain carry their level so names stay unique
/// across the whole subcircuit.
pub fn bin_suffix(level: Option<usize>, bin: usize) -> String {
    match level {
        Some(level) => format!("level{}_bin{}", level, bin),
        None => bin.to_string(),
    }
}

/// The wrapper subcircuit around a transistor model card.
pub fn wrapper_name(transistor: &TransistorModel, postfix: &str) -> ArcStr {
    arcstr::format!("{}{}", transistor.name, postfix)
}
