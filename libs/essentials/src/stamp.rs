//! Emitting individual device instances.

use std::io::Write;

use arcstr::ArcStr;

use crate::writer::{Device, SpiceWriter, Terminals};
use crate::Result;

/// Writes one device instance line.
///
/// `name` must be unique within the enclosing subcircuit.
pub fn stamp<W: Write>(
    out: &mut SpiceWriter<W>,
    name: ArcStr,
    terminals: Terminals,
    model: &ArcStr,
    width: f64,
) -> Result<()> {
    tracing::trace!(name = name.as_str(), width, "stamping device");
    out.write_device(&Device {
        name,
        terminals,
        model: model.clone(),
        width,
    })
}
