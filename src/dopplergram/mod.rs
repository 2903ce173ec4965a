// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The per-pixel observable pipeline: disk cropping, harmonic extraction,
//! lookup-table calibration and observable synthesis, run data-parallel over
//! every pixel of the filtergrams.

pub(crate) mod error;

use hifitime::Epoch;
use itertools::izip;
use log::{debug, info, trace};
use ndarray::{Array2, ArrayViewMut1};
use rayon::prelude::*;

use crate::constants::{DISK_FWHM_POLY, EXTRA_CROP};
use crate::fourier::{first_harmonic_velocity, harmonic_sums, second_harmonic_velocity};
use crate::lookup::LookupTable;
use crate::observables::{synthesize, PixelObservables};
use crate::params::{DiskGeometry, DopplerParams};
use crate::tuning::{TuningError, TuningGeometry};
use crate::velcal::{calibrate_velocities, RawVelocities};

pub use error::DopplergramError;

/// The input filtergrams: `2 * N` frames of identical shape, interleaved as
/// LCP/RCP pairs per tuning position, in framelist order.
pub struct FiltergramSet {
    frames: Vec<Array2<f32>>,
    rows: usize,
    cols: usize,
}

impl FiltergramSet {
    pub fn new(frames: Vec<Array2<f32>>) -> Result<FiltergramSet, DopplergramError> {
        match frames.len() {
            10 | 12 | 16 | 20 => (),
            n => return Err(TuningError::UnsupportedFramelistSize(n).into()),
        }

        let (rows, cols) = frames[0].dim();
        for (index, frame) in frames.iter().enumerate().skip(1) {
            let (got_rows, got_cols) = frame.dim();
            if (got_rows, got_cols) != (rows, cols) {
                return Err(DopplergramError::MismatchedDimensions {
                    index,
                    got_rows,
                    got_cols,
                    rows,
                    cols,
                });
            }
        }

        Ok(FiltergramSet { frames, rows, cols })
    }

    pub fn framelist_size(&self) -> usize {
        self.frames.len()
    }

    pub fn num_wavelengths(&self) -> usize {
        self.frames.len() / 2
    }

    /// (rows, columns) of every frame.
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Copy the N LCP and N RCP samples of one pixel into the scratch
    /// vectors.
    fn sample_into(&self, row: usize, col: usize, lcp: &mut [f32], rcp: &mut [f32]) {
        for (pair, l, r) in izip!(self.frames.chunks_exact(2), lcp.iter_mut(), rcp.iter_mut()) {
            *l = pair[0][(row, col)];
            *r = pair[1][(row, col)];
        }
    }
}

/// Tallies of per-pixel soft failures, accumulated per thread and merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingCounts {
    pub doppler: u64,
    pub magnetic: u64,
    pub line_depth: u64,
    pub line_width: u64,
    pub continuum: u64,
}

impl MissingCounts {
    fn merge(self, other: MissingCounts) -> MissingCounts {
        MissingCounts {
            doppler: self.doppler + other.doppler,
            magnetic: self.magnetic + other.magnetic,
            line_depth: self.line_depth + other.line_depth,
            line_width: self.line_width + other.line_width,
            continuum: self.continuum + other.continuum,
        }
    }

    fn increment_all(&mut self) {
        self.doppler += 1;
        self.magnetic += 1;
        self.line_depth += 1;
        self.line_width += 1;
        self.continuum += 1;
    }
}

/// The six observable maps plus the aggregate counters.
pub struct ObservableMaps {
    pub dopplergram: Array2<f32>,
    pub magnetogram: Array2<f32>,
    pub line_depth: Array2<f32>,
    pub line_width: Array2<f32>,
    pub continuum: Array2<f32>,
    pub raw_dopplergram: Array2<f32>,
    pub missing: MissingCounts,
    pub num_saturated: u64,
}

/// Per-thread scratch reused across the pixels of a row. Nothing here is
/// shared between threads; the pixel loop is lock-free.
struct PixelScratch {
    lcp: Vec<f32>,
    rcp: Vec<f32>,
    poly: Vec<f32>,
    poly2: Vec<f32>,
}

impl PixelScratch {
    fn new(num_wavelengths: usize, ntest: usize) -> PixelScratch {
        PixelScratch {
            lcp: vec![0.0; num_wavelengths],
            rcp: vec![0.0; num_wavelengths],
            poly: vec![0.0; ntest],
            poly2: vec![0.0; ntest],
        }
    }
}

#[derive(Default, Clone, Copy)]
struct Tallies {
    missing: MissingCounts,
    saturated: u64,
}

impl Tallies {
    fn merge(self, other: Tallies) -> Tallies {
        Tallies {
            missing: self.missing.merge(other.missing),
            saturated: self.saturated + other.saturated,
        }
    }
}

enum PixelOutcome {
    /// Outside the cropped disk; never enters the pipeline.
    OffDisk,
    /// NaN in the harmonic sums; hard short-circuit.
    MissingInput,
    Computed {
        values: PixelObservables,
        saturated: bool,
    },
}

/// Compute the six observable maps from a filtergram set.
///
/// `reference_time` is the nominal observation time the calibration
/// coefficients were derived for; the active correction path does not consume
/// it, but it is part of the pipeline interface.
pub fn compute_observables(
    filtergrams: &FiltergramSet,
    lookup: &LookupTable,
    disk: &DiskGeometry,
    params: &DopplerParams,
    reference_time: Epoch,
) -> Result<ObservableMaps, DopplergramError> {
    let geometry = TuningGeometry::new(
        filtergrams.framelist_size(),
        params.fsr.narrow_band,
        params.dlamdv,
    )?;
    lookup.check_bounds(params.max_vtest, params.max_nx)?;

    // The rebinning ratio must be a whole number or the stencil walks off the
    // table partway through the image.
    let (rows, cols) = filtergrams.dim();
    let table_rows = lookup.table_rows();
    if table_rows == 0 || rows % table_rows != 0 {
        return Err(DopplergramError::IncompatibleRebin { table_rows, rows });
    }

    // The table was built by block-averaging ratio-wide blocks of the full
    // grid, so its cell 0 sits at full-grid position (ratio - 1) / 2.
    let ratio = rows / table_rows;
    let offset = (ratio as f64 - 1.0) / 2.0;

    info!("using {} wavelengths", geometry.num_wavelengths());
    debug!(
        "lookup table dimensions: {} {} {}; rebinning ratio {ratio}",
        lookup.table_rows(),
        lookup.table_cols(),
        2 * lookup.ntest(),
    );
    trace!("reference time: {reference_time}");

    let mut maps = ObservableMaps {
        dopplergram: Array2::from_elem((rows, cols), params.missing_result),
        magnetogram: Array2::from_elem((rows, cols), params.missing_result),
        line_depth: Array2::from_elem((rows, cols), params.missing_result),
        line_width: Array2::from_elem((rows, cols), params.missing_result),
        continuum: Array2::from_elem((rows, cols), params.missing_result),
        raw_dopplergram: Array2::from_elem((rows, cols), params.missing_result),
        missing: MissingCounts::default(),
        num_saturated: 0,
    };

    // One parallel pass over the image rows. Each row is handled serially by
    // `process_row`; the only cross-pixel state is the tallies, which are
    // per-thread partials merged by an associative reduction.
    let tallies = maps
        .dopplergram
        .outer_iter_mut()
        .into_par_iter()
        .zip(maps.magnetogram.outer_iter_mut())
        .zip(maps.line_depth.outer_iter_mut())
        .zip(maps.line_width.outer_iter_mut())
        .zip(maps.continuum.outer_iter_mut())
        .zip(maps.raw_dopplergram.outer_iter_mut())
        .enumerate()
        .map_init(
            || PixelScratch::new(geometry.num_wavelengths(), lookup.ntest()),
            |scratch, (row, (((((doppler, magnetic), depth), width), continuum), raw))| {
                process_row(
                    RowOutputs {
                        doppler,
                        magnetic,
                        depth,
                        width,
                        continuum,
                        raw,
                    },
                    row,
                    filtergrams,
                    &geometry,
                    lookup,
                    disk,
                    params,
                    ratio,
                    offset,
                    scratch,
                )
            },
        )
        .reduce(Tallies::default, Tallies::merge);

    maps.missing = tallies.missing;
    maps.num_saturated = tallies.saturated;

    info!(
        "missing values: doppler {}, magnetic {}, line depth {}, line width {}, continuum {}; saturated {}",
        maps.missing.doppler,
        maps.missing.magnetic,
        maps.missing.line_depth,
        maps.missing.line_width,
        maps.missing.continuum,
        maps.num_saturated,
    );

    Ok(maps)
}

struct RowOutputs<'a> {
    doppler: ArrayViewMut1<'a, f32>,
    magnetic: ArrayViewMut1<'a, f32>,
    depth: ArrayViewMut1<'a, f32>,
    width: ArrayViewMut1<'a, f32>,
    continuum: ArrayViewMut1<'a, f32>,
    raw: ArrayViewMut1<'a, f32>,
}

/// Process one image row. Serial by design: the row loop above runs in
/// parallel.
#[allow(clippy::too_many_arguments)]
fn process_row(
    mut outputs: RowOutputs,
    row: usize,
    filtergrams: &FiltergramSet,
    geometry: &TuningGeometry,
    lookup: &LookupTable,
    disk: &DiskGeometry,
    params: &DopplerParams,
    ratio: usize,
    offset: f64,
    scratch: &mut PixelScratch,
) -> Tallies {
    let (_, cols) = filtergrams.dim();
    let mut tallies = Tallies::default();

    for col in 0..cols {
        match process_pixel(
            row,
            col,
            filtergrams,
            geometry,
            lookup,
            disk,
            params,
            ratio,
            offset,
            scratch,
        ) {
            PixelOutcome::OffDisk => {
                outputs.doppler[col] = params.missing_result;
                outputs.magnetic[col] = params.missing_result;
                outputs.depth[col] = params.missing_result;
                outputs.width[col] = params.missing_result;
                outputs.continuum[col] = params.missing_result;
                outputs.raw[col] = params.missing_result;
            }
            PixelOutcome::MissingInput => {
                outputs.doppler[col] = params.missing_result;
                outputs.magnetic[col] = params.missing_result;
                outputs.depth[col] = params.missing_result;
                outputs.width[col] = params.missing_result;
                outputs.continuum[col] = params.missing_result;
                outputs.raw[col] = params.missing_result;
                tallies.missing.increment_all();
            }
            PixelOutcome::Computed { values, saturated } => {
                outputs.doppler[col] = values.doppler;
                outputs.magnetic[col] = values.magnetic;
                outputs.depth[col] = values.line_depth;
                outputs.width[col] = values.line_width;
                outputs.continuum[col] = values.continuum;
                outputs.raw[col] = values.raw_doppler;

                // NaN can appear per quantity even with finite inputs.
                if values.doppler.is_nan() {
                    tallies.missing.doppler += 1;
                }
                if values.magnetic.is_nan() {
                    tallies.missing.magnetic += 1;
                }
                if values.line_depth.is_nan() {
                    tallies.missing.line_depth += 1;
                }
                if values.line_width.is_nan() {
                    tallies.missing.line_width += 1;
                }
                if values.continuum.is_nan() {
                    tallies.missing.continuum += 1;
                }
                if saturated {
                    tallies.saturated += 1;
                }
            }
        }
    }

    tallies
}

#[allow(clippy::too_many_arguments)]
fn process_pixel(
    row: usize,
    col: usize,
    filtergrams: &FiltergramSet,
    geometry: &TuningGeometry,
    lookup: &LookupTable,
    disk: &DiskGeometry,
    params: &DopplerParams,
    ratio: usize,
    offset: f64,
    scratch: &mut PixelScratch,
) -> PixelOutcome {
    let distance_px = (row as f64 - disk.y0).hypot(col as f64 - disk.x0);
    if distance_px > disk.rsun + EXTRA_CROP {
        return PixelOutcome::OffDisk;
    }

    // Gaussian sigma of the line at this distance from disk centre, from the
    // fixed polynomial in arcseconds. Distinct from the line-width
    // observable.
    let distance_arcsec = distance_px * disk.cdelt1;
    let fwhm_milliangstrom = horner(&DISK_FWHM_POLY, distance_arcsec);
    let disk_sigma = fwhm_milliangstrom / 2.0 / 2.0_f64.ln().sqrt() / 1000.0;

    filtergrams.sample_into(row, col, &mut scratch.lcp, &mut scratch.rcp);
    let lcp_sums = harmonic_sums(geometry, &scratch.lcp);
    let rcp_sums = harmonic_sums(geometry, &scratch.rcp);

    if lcp_sums.is_missing() || rcp_sums.is_missing() {
        return PixelOutcome::MissingInput;
    }

    let vlcp = first_harmonic_velocity(&lcp_sums, geometry.pv1);
    let vrcp = first_harmonic_velocity(&rcp_sums, geometry.pv1);
    let raw = RawVelocities {
        lcp: vlcp,
        rcp: vrcp,
        lcp2: second_harmonic_velocity(&lcp_sums, vlcp, geometry.pv2),
        rcp2: second_harmonic_velocity(&rcp_sums, vrcp, geometry.pv2),
    };

    let stencil = lookup.stencil(row, col, ratio, offset);
    let cal = calibrate_velocities(
        &stencil,
        lookup.vtest(),
        raw,
        &mut scratch.poly,
        &mut scratch.poly2,
    );

    let values = synthesize(
        geometry,
        &params.correction,
        &lcp_sums,
        &rcp_sums,
        &scratch.lcp,
        &scratch.rcp,
        &cal,
        disk_sigma,
    );

    PixelOutcome::Computed {
        values,
        saturated: cal.saturated,
    }
}

/// Evaluate a polynomial with coefficients in ascending order.
#[inline]
fn horner(coefficients: &[f64], x: f64) -> f64 {
    coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, &c| acc * x + c)
}
