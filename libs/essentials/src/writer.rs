//! A line-oriented SPICE writer.

use std::io::{BufWriter, Write};

use arcstr::ArcStr;

use crate::Result;

/// The four terminals of a MOS device, in SPICE order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Terminals {
    /// Drain.
    pub drain: ArcStr,
    /// Gate.
    pub gate: ArcStr,
    /// Source.
    pub source: ArcStr,
    /// Bulk.
    pub bulk: ArcStr,
}

/// A sized device instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Device {
    /// The instance name, unique within its subcircuit.
    pub name: ArcStr,
    /// Terminal connections.
    pub terminals: Terminals,
    /// The subcircuit or model card instantiated.
    pub model: ArcStr,
    /// Device width.
    pub width: f64,
}

/// Formats `value` like C's `%.{precision}g`.
///
/// Uses `precision` significant digits, drops trailing zeros and switches to
/// scientific notation for exponents below -4 or at least `precision`.
pub fn format_width(value: f64, precision: usize) -> String {
    if value == 0. || !value.is_finite() {
        return format!("{}", value);
    }
    let precision = precision.max(1);
    let sci = format!("{:.*e}", precision - 1, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Writes SPICE statements to an output stream.
pub struct SpiceWriter<W: Write> {
    out: BufWriter<W>,
    precision: usize,
}

impl<W: Write> SpiceWriter<W> {
    /// Creates a new writer that formats widths with `precision` significant digits.
    pub fn new(out: W, precision: usize) -> Self {
        Self {
            out: BufWriter::new(out),
            precision,
        }
    }

    /// Writes the file header comment.
    pub fn write_header(&mut self, description: &str) -> Result<()> {
        writeln!(self.out, "* {}", description)?;
        writeln!(self.out, "* This is a generated file. Be careful when editing manually: this file may be overwritten.\n")?;
        Ok(())
    }

    /// Writes a begin subcircuit statement with optional numeric parameters.
    pub fn start_subckt<I>(&mut self, name: &str, ports: I, params: &[(&str, f64)]) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        write!(self.out, ".subckt {}", name)?;
        for port in ports {
            write!(self.out, " {}", port.as_ref())?;
        }
        for (key, value) in params {
            write!(self.out, " {}={}", key, format_width(*value, self.precision))?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    /// Writes an end subcircuit statement followed by a blank line.
    pub fn end_subckt(&mut self, name: &str) -> Result<()> {
        writeln!(self.out, ".ends {}\n", name)?;
        Ok(())
    }

    /// Writes one device instance line.
    pub fn write_device(&mut self, device: &Device) -> Result<()> {
        let Terminals {
            drain,
            gate,
            source,
            bulk,
        } = &device.terminals;
        writeln!(
            self.out,
            "{} {} {} {} {} {} W={}",
            device.name,
            drain,
            gate,
            source,
            bulk,
            device.model,
            format_width(device.width, self.precision)
        )?;
        Ok(())
    }

    /// Writes a raw line.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.out, "{}", line)?;
        Ok(())
    }

    /// Flushes buffered output and returns the underlying stream.
    pub fn finish(self) -> Result<W> {
        self.out.into_inner().map_err(|err| err.into_error().into())
    }
}
