// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Velocity calibration against the lookup table: a lazy coarse-to-fine
//! bracket search over the bilinearly-interpolated calibration curves,
//! followed by linear interpolation onto the test-velocity grid, with
//! clamping of raw velocities the table does not cover.


use crate::constants::SEARCH_STEP;
use crate::lookup::Stencil;

/// Raw phase velocities of one pixel, both channels and both harmonics
/// \[m/s\].
#[derive(Debug, Clone, Copy)]
pub(crate) struct RawVelocities {
    pub(crate) lcp: f64,
    pub(crate) rcp: f64,
    pub(crate) lcp2: f64,
    pub(crate) rcp2: f64,
}

/// Table-calibrated velocities \[m/s\]. A channel whose raw velocity fell
/// outside the table's range is clamped to the nearest test-velocity endpoint
/// instead of being interpolated, and the pixel is flagged saturated.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CalibratedVelocities {
    pub(crate) lcp: f64,
    pub(crate) rcp: f64,
    pub(crate) lcp2: f64,
    pub(crate) rcp2: f64,
    pub(crate) saturated: bool,
}

/// Calibrate one pixel's four raw velocities against the interpolated lookup
/// curves.
///
/// `poly` and `poly2` are per-thread scratch of length `ntest`; entries are
/// computed on demand. The first and last entries double as the table's
/// covered range for the saturation checks. Serial by design: the pixel loop
/// above this runs in parallel.
pub(crate) fn calibrate_velocities(
    stencil: &Stencil,
    vtest: &[f64],
    raw: RawVelocities,
    poly: &mut [f32],
    poly2: &mut [f32],
) -> CalibratedVelocities {
    calibrate_velocities_with_step(stencil, vtest, raw, poly, poly2, SEARCH_STEP)
}

pub(crate) fn calibrate_velocities_with_step(
    stencil: &Stencil,
    vtest: &[f64],
    raw: RawVelocities,
    poly: &mut [f32],
    poly2: &mut [f32],
    step: usize,
) -> CalibratedVelocities {
    let ntest = vtest.len();

    let mut index_l: Option<usize> = None;
    let mut index_r: Option<usize> = None;
    let mut index_l2: Option<usize> = None;
    let mut index_r2: Option<usize> = None;

    // The curve endpoints are needed unconditionally: they bound the covered
    // velocity range.
    poly[0] = stencil.first(0);
    poly2[0] = stencil.second(0);
    let min1 = f64::from(poly[0]);
    let min2 = f64::from(poly2[0]);
    poly[ntest - 1] = stencil.first(ntest - 1);
    poly2[ntest - 1] = stencil.second(ntest - 1);
    let max1 = f64::from(poly[ntest - 1]);
    let max2 = f64::from(poly2[ntest - 1]);

    // Coarse scan in strides of `step`, backfilling a stride's interior only
    // when it brackets a target. The four targets share one pass and one
    // scratch curve per harmonic; backfilled entries are identical no matter
    // which target triggered them.
    let mut i = step;
    while i < ntest {
        poly[i] = stencil.first(i);
        poly2[i] = stencil.second(i);

        if bracketed(poly[i], poly[i - step], raw.lcp) {
            index_l = backfill_first(stencil, poly, i, step, raw.lcp).or(index_l);
        }
        if bracketed(poly[i], poly[i - step], raw.rcp) {
            index_r = backfill_first(stencil, poly, i, step, raw.rcp).or(index_r);
        }
        if bracketed(poly2[i], poly2[i - step], raw.lcp2) {
            index_l2 = backfill_second(stencil, poly2, i, step, raw.lcp2).or(index_l2);
        }
        if bracketed(poly2[i], poly2[i - step], raw.rcp2) {
            index_r2 = backfill_second(stencil, poly2, i, step, raw.rcp2).or(index_r2);
        }

        i += step;
    }

    // Saturation: a raw velocity outside the covered range is clamped to the
    // nearest test-velocity endpoint and its bracket is discarded, so the
    // final check below flags the pixel instead of extrapolating.
    let mut lcp = raw.lcp;
    let mut rcp = raw.rcp;
    let mut lcp2 = raw.lcp2;
    let mut rcp2 = raw.rcp2;

    if lcp < min1 {
        lcp = vtest[0];
        index_l = None;
    }
    if lcp > max1 {
        lcp = vtest[ntest - 1];
        index_l = None;
    }
    if rcp < min1 {
        rcp = vtest[0];
        index_r = None;
    }
    if rcp > max1 {
        rcp = vtest[ntest - 1];
        index_r = None;
    }
    if lcp2 < min2 {
        lcp2 = vtest[0];
        index_l2 = None;
    }
    if lcp2 > max2 {
        lcp2 = vtest[ntest - 1];
        index_l2 = None;
    }
    if rcp2 < min2 {
        rcp2 = vtest[0];
        index_r2 = None;
    }
    if rcp2 > max2 {
        rcp2 = vtest[ntest - 1];
        index_r2 = None;
    }

    let saturated =
        index_l.is_none() || index_r.is_none() || index_l2.is_none() || index_r2.is_none();

    // Channels with a valid bracket still get the linear correction, even on
    // a saturated pixel.
    if let Some(i) = index_l {
        lcp = interpolate(vtest, poly, i, lcp);
    }
    if let Some(i) = index_r {
        rcp = interpolate(vtest, poly, i, rcp);
    }
    if let Some(i) = index_l2 {
        lcp2 = interpolate(vtest, poly2, i, lcp2);
    }
    if let Some(i) = index_r2 {
        rcp2 = interpolate(vtest, poly2, i, rcp2);
    }

    CalibratedVelocities {
        lcp,
        rcp,
        lcp2,
        rcp2,
        saturated,
    }
}

#[inline]
fn bracketed(hi: f32, lo: f32, target: f64) -> bool {
    f64::from(hi) > target && f64::from(lo) <= target
}

/// Fill in the 1st-harmonic curve over `(i - step, i]` and locate the exact
/// bracket of `target` within it.
fn backfill_first(
    stencil: &Stencil,
    poly: &mut [f32],
    i: usize,
    step: usize,
    target: f64,
) -> Option<usize> {
    let mut found = None;
    for j in (i - step + 1)..=i {
        poly[j] = stencil.first(j);
        if bracketed(poly[j], poly[j - 1], target) {
            found = Some(j - 1);
        }
    }
    found
}

/// As [`backfill_first`], for the 2nd-harmonic curve.
fn backfill_second(
    stencil: &Stencil,
    poly2: &mut [f32],
    i: usize,
    step: usize,
    target: f64,
) -> Option<usize> {
    let mut found = None;
    for j in (i - step + 1)..=i {
        poly2[j] = stencil.second(j);
        if bracketed(poly2[j], poly2[j - 1], target) {
            found = Some(j - 1);
        }
    }
    found
}

/// Linear interpolation from the calibration curve onto the test-velocity
/// grid: `v = vtest[i] + (v - poly[i]) * (vtest[i+1] - vtest[i]) /
/// (poly[i+1] - poly[i])`.
#[inline]
fn interpolate(vtest: &[f64], poly: &[f32], i: usize, v: f64) -> f64 {
    vtest[i]
        + (v - f64::from(poly[i])) * (vtest[i + 1] - vtest[i])
            / (f64::from(poly[i + 1]) - f64::from(poly[i]))
}
