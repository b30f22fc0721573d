//! Multi-stage buffers.
//!
//! Stage `k` is `f^k` times the size of the first stage. Interior nodes are
//! named after the output port and the index of the stage driving them.
//!
//! ```text
//! in --|>o-- out_level0 --|>o-- out_level1 --|>o-- out
//! ```

use std::io::Write;

use circuitlib::BufferParams;

use crate::inverter::{compose_inverter_stage, StageSpec};
use crate::naming::stage_node;
use crate::options::SpiceOptions;
use crate::primitive::{Primitive, Topology};
use crate::writer::SpiceWriter;
use crate::{Error, Result};

/// The size of each of `num_levels` stages of a buffer.
pub fn stage_widths(buffer: &BufferParams, num_levels: usize) -> Vec<f64> {
    (0..num_levels)
        .map(|level| buffer.size * buffer.f_per_stage.powi(level as i32))
        .collect()
}

/// The stages of a buffer chain, first to last.
///
/// The first stage is driven by the input port and the last drives the
/// output port; every other connection is an interior node.
pub fn chain_stages(primitive: &Primitive<'_>, num_levels: usize) -> Vec<StageSpec> {
    let input = primitive.input.bit_name(0);
    let output = primitive.output.bit_name(0);
    let widths = stage_widths(primitive.model.buffer(), num_levels);
    let last = widths.len().saturating_sub(1);

    widths
        .into_iter()
        .enumerate()
        .map(|(level, width)| StageSpec {
            level,
            chained: true,
            input: if level == 0 {
                input.clone()
            } else {
                stage_node(&output, level - 1)
            },
            output: if level == last {
                output.clone()
            } else {
                stage_node(&output, level)
            },
            width,
        })
        .collect()
}

/// Writes every stage of a multi-stage buffer.
pub fn compose_chain<W: Write>(
    out: &mut SpiceWriter<W>,
    primitive: &Primitive<'_>,
    opts: &SpiceOptions,
) -> Result<()> {
    let num_levels = match primitive.topology {
        Topology::Buffer { num_levels } if num_levels >= 2 => num_levels,
        Topology::Buffer { num_levels } => {
            return Err(Error::invalid(format!(
                "buffer `{}` must have at least 2 stages, found {}",
                primitive.model.name(),
                num_levels
            )))
        }
        Topology::Inverter => {
            return Err(Error::invalid(format!(
                "`{}` is a single inverter, not a buffer chain",
                primitive.model.name()
            )))
        }
    };
    for stage in chain_stages(primitive, num_levels) {
        compose_inverter_stage(out, primitive, &stage, opts)?;
    }
    Ok(())
}
