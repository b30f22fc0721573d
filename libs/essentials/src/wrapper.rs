//! Wrapper subcircuits around transistor model cards.
//!
//! Generated devices instantiate these wrappers rather than model cards so
//! that every device shares the technology's channel length and a
//! consistent `drain gate source bulk` port order.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use circuitlib::{
    NetlistId, NetlistKind, NetlistManager, Polarity, TechModelKind, TechnologyLibrary,
};

use crate::naming::wrapper_name;
use crate::options::SpiceOptions;
use crate::writer::SpiceWriter;
use crate::Result;

const WRAPPER_PORTS: [&str; 4] = ["drain", "gate", "source", "bulk"];

/// Writes a PMOS and an NMOS wrapper for every transistor technology model.
///
/// Returns the number of wrappers written.
pub fn write_transistor_wrappers<W: Write>(
    out: &mut SpiceWriter<W>,
    tech_lib: &TechnologyLibrary,
    opts: &SpiceOptions,
) -> Result<usize> {
    out.write_header("Transistor wrappers")?;
    let mut count = 0;
    for (_, tech) in tech_lib.models() {
        if tech.kind() != TechModelKind::Transistor {
            continue;
        }
        for polarity in Polarity::ALL {
            let transistor = tech.transistor(polarity);
            let name = wrapper_name(transistor, &opts.wrapper_postfix);
            out.start_subckt(
                &name,
                WRAPPER_PORTS,
                &[("L", transistor.chan_length), ("W", transistor.min_width)],
            )?;
            out.write_line(&format!(
                "{}1 {} {} L=L W=W",
                tech.model_ref(),
                WRAPPER_PORTS.join(" "),
                transistor.name
            ))?;
            out.end_subckt(&name)?;
            count += 1;
        }
    }
    Ok(count)
}

/// Writes the transistor wrapper netlist into `dir` and registers it as a
/// submodule netlist.
pub fn emit_transistor_wrappers(
    netlists: &mut NetlistManager,
    tech_lib: &TechnologyLibrary,
    dir: &Path,
    opts: &SpiceOptions,
) -> Result<NetlistId> {
    let path = dir.join(&opts.transistors_file);
    let span = tracing::info_span!("transistor_wrappers", path = ?path);
    let _guard = span.enter();
    tracing::info!("generating SPICE netlist for transistors");

    let mut out = SpiceWriter::new(File::create(&path)?, opts.width_precision());
    let count = write_transistor_wrappers(&mut out, tech_lib, opts)?;
    out.finish()?;

    let netlist = netlists.add_netlist(path);
    netlists.set_netlist_kind(netlist, NetlistKind::Submodule);
    tracing::info!(wrappers = count, "done");
    Ok(netlist)
}
