//! Power-gating cascades.
//!
//! A power-gated network is disconnected from its rail by a series chain of
//! devices, one per bit of the control port. The first declared bit sits
//! next to the rail; the node below the last bit feeds the switching device.
//!
//! ```text
//!            LVDD
//!              |
//!   ENB[0] -o||
//!              |  out_pmos_pg_0
//!   ENB[1] -o||
//!              |  out_pmos_pg_1
//!     in ---o||
//!              |
//!             out
//! ```

use std::io::Write;

use arcstr::ArcStr;
use circuitlib::{CircuitPort, Polarity};

use crate::naming::{powergate_device_name, powergate_node};
use crate::stamp::stamp;
use crate::writer::{SpiceWriter, Terminals};
use crate::Result;

/// A power-gating chain for one bin of one polarity.
#[derive(Clone, Debug)]
pub struct Cascade<'a> {
    /// The control port; one device is emitted per bit.
    pub control: &'a CircuitPort,
    /// The rail the chain is anchored to.
    pub rail: &'a ArcStr,
    /// The signal whose network is gated; intermediate nodes are named after it.
    pub signal: &'a ArcStr,
    /// The polarity of the gated network.
    pub polarity: Polarity,
    /// The subcircuit instantiated for each device.
    pub model: &'a ArcStr,
    /// The width of each device.
    pub width: f64,
    /// Distinguishes this chain's device names from other bins and stages.
    pub suffix: &'a str,
}

impl Cascade<'_> {
    /// Writes the chain, returning the node the switching device should
    /// use as its source.
    ///
    /// A control port without bits leaves the switching device on the rail.
    pub fn build<W: Write>(&self, out: &mut SpiceWriter<W>) -> Result<ArcStr> {
        let mut upstream = self.rail.clone();
        for pin in self.control.pins() {
            let node = powergate_node(self.signal, self.polarity, pin);
            stamp(
                out,
                powergate_device_name(self.polarity, self.suffix, pin),
                Terminals {
                    drain: node.clone(),
                    gate: self.control.bit_name(pin),
                    source: upstream,
                    bulk: self.rail.clone(),
                },
                self.model,
                self.width,
            )?;
            upstream = node;
        }
        Ok(upstream)
    }
}
