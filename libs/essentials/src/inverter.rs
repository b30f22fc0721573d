//! Single inverter stages.
//!
//! ```text
//!          LVDD
//!            |
//!      +-o||
//!      |     |
//! in-->+     +--> out
//!      |     |
//!      +--||
//!            |
//!          LGND
//! ```

use std::io::Write;

use arcstr::ArcStr;
use circuitlib::Polarity;

use crate::binning::bin;
use crate::naming::{bin_suffix, device_name, wrapper_name};
use crate::options::SpiceOptions;
use crate::powergate::Cascade;
use crate::primitive::Primitive;
use crate::stamp::stamp;
use crate::writer::{SpiceWriter, Terminals};
use crate::Result;

/// One inverting stage of a primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct StageSpec {
    /// The stage index within its chain.
    pub level: usize,
    /// Whether the stage belongs to a multi-stage buffer.
    pub chained: bool,
    /// The node driving the stage.
    pub input: ArcStr,
    /// The node the stage drives.
    pub output: ArcStr,
    /// The stage size, in multiples of a minimum-width NMOS device.
    pub width: f64,
}

impl StageSpec {
    /// The device-name suffix of the given bin of this stage.
    pub fn device_suffix(&self, bin: usize) -> String {
        bin_suffix(self.chained.then_some(self.level), bin)
    }
}

/// Writes the PMOS and NMOS devices of one stage.
///
/// Each network is binned separately; every bin gets its own switching
/// device and, when the primitive is power gated, its own gating chain.
pub fn compose_inverter_stage<W: Write>(
    out: &mut SpiceWriter<W>,
    primitive: &Primitive<'_>,
    stage: &StageSpec,
    opts: &SpiceOptions,
) -> Result<()> {
    for polarity in Polarity::ALL {
        let transistor = primitive.tech.transistor(polarity);
        let ratio = match polarity {
            Polarity::Pmos => primitive.tech.pn_ratio(),
            Polarity::Nmos => 1.,
        };
        let total_width = stage.width * ratio * transistor.min_width;
        let bins = bin(total_width, transistor.max_width)?;
        tracing::debug!(
            model = primitive.model.name().as_str(),
            level = stage.level,
            polarity = polarity.as_str(),
            total_width,
            bins = bins.len(),
            "binned stage"
        );

        let model = wrapper_name(transistor, &opts.wrapper_postfix);
        let rail = opts.rail(polarity);
        for b in bins {
            let suffix = stage.device_suffix(b.index);
            let source = match primitive.gating.control(polarity) {
                Some(control) => Cascade {
                    control,
                    rail,
                    signal: &stage.output,
                    polarity,
                    model: &model,
                    width: b.width,
                    suffix: &suffix,
                }
                .build(out)?,
                None => rail.clone(),
            };
            stamp(
                out,
                device_name(polarity, &suffix),
                Terminals {
                    drain: stage.output.clone(),
                    gate: stage.input.clone(),
                    source,
                    bulk: rail.clone(),
                },
                &model,
                b.width,
            )?;
        }
    }
    Ok(())
}

/// Writes a single-stage inverter sized by the model's buffer size.
pub fn compose_inverter<W: Write>(
    out: &mut SpiceWriter<W>,
    primitive: &Primitive<'_>,
    opts: &SpiceOptions,
) -> Result<()> {
    let stage = StageSpec {
        level: 0,
        chained: false,
        input: primitive.input.bit_name(0),
        output: primitive.output.bit_name(0),
        width: primitive.model.buffer().size,
    };
    compose_inverter_stage(out, primitive, &stage, opts)
}
