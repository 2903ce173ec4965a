// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Wavelength tuning geometry: the fixed angular positions of the sampled
//! wavelengths and the trigonometric coefficients derived from them. Built
//! once per invocation and shared read-only by the pixel loop.

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::constants::TAU;

// Tuning-position multipliers, in units of `dtune`, indexed by filtergram
// pair. The index order follows the framelist, not wavelength order.
const TUNE_5: [f64; 5] = [2.0, 1.0, 0.0, -1.0, -2.0];
const TUNE_6: [f64; 6] = [2.5, 1.5, 0.5, -0.5, -1.5, -2.5];
const TUNE_8: [f64; 8] = [2.5, 1.5, 0.5, -0.5, -1.5, -2.5, -3.5, 3.5];
const TUNE_10: [f64; 10] = [2.5, 1.5, 0.5, -0.5, -1.5, -2.5, -3.5, 3.5, -4.5, 4.5];

#[derive(Error, Debug)]
pub enum TuningError {
    #[error("The framelist size {0} is not 10, 12, 16 or 20")]
    UnsupportedFramelistSize(usize),
}

/// Per-wavelength sampling geometry and the scalars derived from it.
///
/// `angle[i]` is the phase of tuning position `i` on the unit circle of one
/// full sampling period; the four trig arrays are its (double-)angle
/// cosines/sines, hoisted out of the pixel loop.
#[derive(Debug, Clone)]
pub struct TuningGeometry {
    pub(crate) num_wavelengths: usize,

    /// Wavelength offset of each tuning position \[Å\].
    pub(crate) tune: Vec<f64>,
    pub(crate) angle: Vec<f64>,
    pub(crate) cos: Vec<f64>,
    pub(crate) sin: Vec<f64>,
    pub(crate) cos2: Vec<f64>,
    pub(crate) sin2: Vec<f64>,

    /// Wavelength separation between tuning positions \[Å\].
    pub(crate) dtune: f64,
    /// Conversion factor from wavelength to velocity \[(m/s) / Å\].
    pub(crate) dv: f64,
    /// Sampled wavelength span \[Å\].
    pub(crate) period: f64,
    /// Wrap period of the 1st-harmonic phase in velocity units \[m/s\].
    pub(crate) pv1: f64,
    /// Wrap period of the 2nd-harmonic phase: half of `pv1` \[m/s\].
    pub(crate) pv2: f64,
    /// Normalisation applied to the Fourier sums before the line-shape
    /// formulas.
    pub(crate) kfourier: f64,
}

impl TuningGeometry {
    /// Derive the tuning geometry from the framelist size, the narrow-band
    /// Michelson FSR \[Å\] and the wavelength-to-velocity factor \[Å/(m/s)\].
    pub fn new(framelist_size: usize, fsr_nb: f64, dlamdv: f64) -> Result<Self, TuningError> {
        let multipliers: &[f64] = match framelist_size {
            10 => &TUNE_5,
            12 => &TUNE_6,
            16 => &TUNE_8,
            20 => &TUNE_10,
            _ => return Err(TuningError::UnsupportedFramelistSize(framelist_size)),
        };
        let n = multipliers.len();

        // Nominally 68.8 mÅ between tuning positions, for any N.
        let dtune = fsr_nb / 2.5;
        let dv = 1.0 / dlamdv;
        let dvtune = dtune * dv;
        let period = (n - 1) as f64 * dtune;

        let tune: Vec<f64> = multipliers.iter().map(|m| m * dtune).collect();
        let angle: Vec<f64> = multipliers.iter().map(|m| m * TAU / n as f64).collect();

        Ok(TuningGeometry {
            num_wavelengths: n,
            cos: angle.iter().map(|a| a.cos()).collect(),
            sin: angle.iter().map(|a| a.sin()).collect(),
            cos2: angle.iter().map(|a| (2.0 * a).cos()).collect(),
            sin2: angle.iter().map(|a| (2.0 * a).sin()).collect(),
            tune,
            angle,
            dtune,
            dv,
            period,
            pv1: dvtune * (n - 1) as f64,
            pv2: dvtune * (n - 1) as f64 / 2.0,
            kfourier: dtune / period * 2.0,
        })
    }

    /// The number of sampled wavelengths N (half the framelist size).
    pub fn num_wavelengths(&self) -> usize {
        self.num_wavelengths
    }

    /// Wavelength span covered by the tuning positions \[Å\].
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Velocity at which the 1st-harmonic phase wraps \[m/s\].
    pub fn velocity_period(&self) -> f64 {
        self.pv1
    }
}
