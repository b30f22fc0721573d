//! Netlist emission options.

use arcstr::ArcStr;
use circuitlib::Polarity;
use serde::{Deserialize, Serialize};

/// The minimum number of significant digits used for device widths.
pub const MIN_WIDTH_PRECISION: usize = 10;

/// Options controlling SPICE netlist emission.
///
/// Usually read from the `[spice]` table of an architecture file;
/// missing fields take their default values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpiceOptions {
    /// The local supply rail.
    pub vdd_rail: ArcStr,
    /// The local ground rail.
    pub gnd_rail: ArcStr,
    /// Appended to a transistor model name to form its wrapper subcircuit name.
    pub wrapper_postfix: ArcStr,
    /// File name of the essential gates netlist.
    pub essentials_file: String,
    /// File name of the transistor wrapper netlist.
    pub transistors_file: String,
    /// Significant digits used when writing device widths.
    pub width_precision: usize,
}

impl Default for SpiceOptions {
    fn default() -> Self {
        Self {
            vdd_rail: arcstr::literal!("LVDD"),
            gnd_rail: arcstr::literal!("LGND"),
            wrapper_postfix: arcstr::literal!("_wrapper"),
            essentials_file: "inv_buf_passgate.sp".to_string(),
            transistors_file: "transistor.sp".to_string(),
            width_precision: MIN_WIDTH_PRECISION,
        }
    }
}

impl SpiceOptions {
    /// Reads options from a TOML table.
    pub fn from_table(table: &toml::Table) -> Result<Self, toml::de::Error> {
        toml::Value::Table(table.clone()).try_into()
    }

    /// The rail a network of the given polarity is anchored to.
    #[inline]
    pub fn rail(&self, polarity: Polarity) -> &ArcStr {
        match polarity {
            Polarity::Pmos => &self.vdd_rail,
            Polarity::Nmos => &self.gnd_rail,
        }
    }

    /// Significant digits for device widths, never fewer than [`MIN_WIDTH_PRECISION`].
    #[inline]
    pub fn width_precision(&self) -> usize {
        self.width_precision.max(MIN_WIDTH_PRECISION)
    }
}
