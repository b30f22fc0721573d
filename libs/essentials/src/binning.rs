//! Splitting device widths into fabricable bins.
//!
//! A device wider than the technology's maximum width is built from several
//! parallel devices: as many full-width bins as fit, plus at most one
//! narrower bin holding the remainder.

use crate::{Error, Result};

/// Relative tolerance, as a fraction of the maximum bin width, within which
/// a floating-point remainder is snapped to zero or to a full bin.
pub const BIN_TOLERANCE: f64 = 1e-9;

/// The largest number of bins a single device may be split into.
pub const MAX_BINS: usize = 1 << 16;

/// One parallel device of a binned width.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bin {
    /// Position of this bin in the sequence.
    pub index: usize,
    /// The width of this bin.
    pub width: f64,
}

/// Decomposes `total_width` into bins no wider than `max_bin_width`.
///
/// All bins but the last are exactly `max_bin_width` wide; the last bin holds
/// the remainder if `total_width` is not a multiple of `max_bin_width`.
/// A zero total width produces no bins.
pub fn bin(total_width: f64, max_bin_width: f64) -> Result<Vec<Bin>> {
    if !(max_bin_width > 0.) || !max_bin_width.is_finite() {
        return Err(Error::invalid(format!(
            "maximum bin width must be positive, got {}",
            max_bin_width
        )));
    }
    if !(total_width >= 0.) || !total_width.is_finite() {
        return Err(Error::invalid(format!(
            "total device width must be non-negative, got {}",
            total_width
        )));
    }

    let quotient = total_width / max_bin_width;
    if !(quotient <= MAX_BINS as f64) {
        return Err(Error::invalid(format!(
            "total device width {} needs more than {} bins of width {}",
            total_width, MAX_BINS, max_bin_width
        )));
    }

    let mut remainder = total_width % max_bin_width;
    let mut num_full = ((total_width - remainder) / max_bin_width).round() as usize;
    let tolerance = BIN_TOLERANCE * max_bin_width;
    if max_bin_width - remainder <= tolerance {
        num_full += 1;
        remainder = 0.;
    } else if remainder <= tolerance && num_full > 0 {
        remainder = 0.;
    }

    let mut bins: Vec<Bin> = (0..num_full)
        .map(|index| Bin {
            index,
            width: max_bin_width,
        })
        .collect();
    if remainder > 0. {
        bins.push(Bin {
            index: num_full,
            width: remainder,
        });
    }
    Ok(bins)
}
