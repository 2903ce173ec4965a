// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. The per-pixel pipeline does as many
calculations as possible in double precision and only converts to f32 when
writing the output maps.
 */

pub use std::f64::consts::{PI, TAU};

/// Speed of light \[m/s\].
pub const VEL_C: f64 = 299_792_458.0;

/// Landé g factor of the Fe I 6173 Å line.
pub const LANDE_G: f64 = 2.5;

/// Zeeman splitting scale \[Å G⁻¹ Å⁻²\] for the classical splitting formula.
pub const ZEEMAN_SPLITTING: f64 = 4.67e-5;

/// Reference wavelength-to-velocity conversion factor \[Å / (m/s)\] baked into
/// the magnetic proxy constant. This is deliberately *not* the `dlamdv` of
/// [`crate::DopplerParams`]; the proxy calibration fixed it at this value.
pub const DLAMDV_REFERENCE: f64 = 0.000_061_733_433;

/// Converts the LCP/RCP calibrated velocity difference \[m/s\] into a
/// line-of-sight field strength \[G\].
pub const MAGNETIC: f64 = 1.0 / (2.0 * ZEEMAN_SPLITTING * DLAMDV_REFERENCE * LANDE_G * VEL_C);

/// Pixels further than `rsun + EXTRA_CROP` from disk centre are cropped.
pub const EXTRA_CROP: f64 = 50.0;

/// Coarse stride of the lookup-table bracket search. `ntest - 1` must be a
/// multiple of this, otherwise the scan never reaches the top of the table.
pub const SEARCH_STEP: usize = 10;

/// FWHM of the Fe I line \[mÅ\] as a 5th-order polynomial in the distance from
/// disk centre \[arcsec\], fitted to a linewidth map made with this same
/// algorithm. Lowest order first.
pub const DISK_FWHM_POLY: [f64; 6] = [
    100.67102,
    0.015037016,
    -1.0128197e-4,
    3.1548385e-7,
    -3.7298102e-10,
    1.7275788e-13,
];
