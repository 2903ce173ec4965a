// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Synthesis of the final observables from the calibrated channel velocities
//! and the normalised harmonic amplitudes.


use crate::constants::{MAGNETIC, PI};
use crate::fourier::HarmonicSums;
use crate::tuning::TuningGeometry;
use crate::velcal::CalibratedVelocities;

/// One pixel's worth of output. Any field can be NaN even when the inputs
/// were finite (log of a degenerate amplitude ratio, division in the
/// correction polynomial); the caller counts those per quantity.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PixelObservables {
    pub(crate) doppler: f32,
    pub(crate) magnetic: f32,
    pub(crate) line_depth: f32,
    pub(crate) line_width: f32,
    pub(crate) continuum: f32,
    pub(crate) raw_doppler: f32,
}

/// Combine one pixel's calibrated LCP/RCP velocities and harmonic sums into
/// the six observables.
///
/// `disk_sigma` is the Gaussian sigma \[Å\] of the line at this pixel's
/// distance from disk centre, from the fixed disk-position polynomial. It is
/// *not* the line-width observable computed here; the two widths play
/// different roles and are deliberately kept apart.
pub(crate) fn synthesize(
    geometry: &TuningGeometry,
    correction: &[f64; 4],
    lcp_sums: &HarmonicSums,
    rcp_sums: &HarmonicSums,
    lcp_samples: &[f32],
    rcp_samples: &[f32],
    cal: &CalibratedVelocities,
    disk_sigma: f64,
) -> PixelObservables {
    let period = geometry.period;
    let n = geometry.num_wavelengths as f64;

    let lcp_sums = lcp_sums.scaled(geometry.kfourier);
    let rcp_sums = rcp_sums.scaled(geometry.kfourier);

    // Sign convention: positive velocities are redshifts, away from the
    // observer.
    let raw_doppler = (cal.lcp + cal.rcp) / 2.0;

    // Empirical instrument-drift correction, applied per channel before
    // averaging. The coefficients are calibration products tied to the
    // lookup table in use.
    let vlcp = cal.lcp - poly3(correction, cal.lcp);
    let vrcp = cal.rcp - poly3(correction, cal.rcp);

    let doppler = (vlcp + vrcp) / 2.0;
    let magnetic = (vlcp - vrcp) * MAGNETIC;

    // Gaussian-equivalent sigma of the line from the 1st/2nd harmonic
    // amplitude ratio, per channel, then summed and converted to FWHM in mÅ.
    let sigma_lcp = period / PI * ((lcp_sums.power1() / lcp_sums.power2()).ln() / 6.0).sqrt();
    let sigma_rcp = period / PI * ((rcp_sums.power1() / rcp_sums.power2()).ln() / 6.0).sqrt();
    let line_width = (sigma_lcp + sigma_rcp) * 2.0_f64.ln().sqrt() * 1000.0;

    // Line depth from the 1st-harmonic amplitude alone, using the
    // disk-position sigma rather than the harmonic-ratio sigma above.
    let depth_lcp = gaussian_depth(period, lcp_sums.power1(), disk_sigma);
    let depth_rcp = gaussian_depth(period, rcp_sums.power1(), disk_sigma);
    let line_depth = (depth_lcp + depth_rcp) / 2.0;

    // Continuum intensity: put a Gaussian absorption profile of the derived
    // depth and width back onto the tuning positions and add the mean
    // absorbed intensity back to the mean observed intensity.
    let shift_lcp = vlcp / geometry.dv;
    let shift_rcp = vrcp / geometry.dv;
    let mut mean_lcp = lcp_samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let mut mean_rcp = rcp_samples.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    for &tune in &geometry.tune {
        mean_lcp += depth_lcp / n * gaussian(tune - shift_lcp, disk_sigma);
        mean_rcp += depth_rcp / n * gaussian(tune - shift_rcp, disk_sigma);
    }
    let continuum = (mean_lcp + mean_rcp) / 2.0;

    PixelObservables {
        doppler: doppler as f32,
        magnetic: magnetic as f32,
        line_depth: line_depth as f32,
        line_width: line_width as f32,
        continuum: continuum as f32,
        raw_doppler: raw_doppler as f32,
    }
}

/// The 3rd-order velocity correction polynomial, lowest order first.
#[inline]
fn poly3(coeff: &[f64; 4], v: f64) -> f64 {
    coeff[0] + coeff[1] * v + coeff[2] * v * v + coeff[3] * v * v * v
}

/// Depth of a Gaussian absorption line with the given 1st-harmonic power and
/// sigma \[Å\].
#[inline]
fn gaussian_depth(period: f64, power1: f64, sigma: f64) -> f64 {
    period / 2.0 * power1.sqrt() / PI.sqrt() / sigma * (PI * PI * sigma * sigma / period / period).exp()
}

#[inline]
fn gaussian(x: f64, sigma: f64) -> f64 {
    (-x * x / sigma / sigma).exp()
}
