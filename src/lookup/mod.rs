// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The velocity calibration lookup table and its access contract.
//!
//! The table is produced offline by forward-modelling line profiles on a
//! spatially rebinned grid; this module only *consumes* it, via bilinear
//! interpolation at each pixel's rebinned location. Each spatial cell holds
//! two stacked curves of length `ntest`: the apparent phase velocity the
//! instrument would report for each test velocity, derived from the 1st and
//! from the 2nd Fourier coefficient.

pub(crate) mod error;
#[cfg(test)]
mod tests;

use ndarray::{s, Array3, ArrayView1};

pub use error::LookupError;

/// A read-only calibration table of shape `(rows, cols, 2 * ntest)`, plus the
/// reconstructed test-velocity grid it was built from.
#[derive(Debug, Clone)]
pub struct LookupTable {
    data: Array3<f32>,
    ntest: usize,

    /// `vtest[i] = dvtest * (i - (ntest - 1) / 2)`. This must match the
    /// table-construction convention exactly or the calibration is silently
    /// wrong.
    vtest: Vec<f64>,
}

impl LookupTable {
    pub fn new(data: Array3<f32>, ntest: usize, dvtest: f64) -> Result<LookupTable, LookupError> {
        let velocity_axis = data.dim().2;
        if velocity_axis != 2 * ntest {
            return Err(LookupError::BadVelocityAxis {
                got: velocity_axis,
                expected: 2 * ntest,
            });
        }

        let vtest = (0..ntest)
            .map(|i| dvtest * (i as f64 - (ntest as f64 - 1.0) / 2.0))
            .collect();

        Ok(LookupTable { data, ntest, vtest })
    }

    /// Check the table against the declared bounds of the parameter block.
    /// Done once at entry, before any pixel work.
    pub fn check_bounds(&self, max_vtest: usize, max_nx: usize) -> Result<(), LookupError> {
        let (rows, cols, velocity_axis) = self.data.dim();
        if velocity_axis > max_vtest || cols > max_nx || rows > max_nx {
            return Err(LookupError::ExceedsDeclaredBounds {
                rows,
                cols,
                velocity_axis,
                max_vtest,
                max_nx,
            });
        }
        Ok(())
    }

    pub fn ntest(&self) -> usize {
        self.ntest
    }

    /// The symmetric test-velocity grid \[m/s\].
    pub fn vtest(&self) -> &[f64] {
        &self.vtest
    }

    pub fn table_rows(&self) -> usize {
        self.data.dim().0
    }

    pub fn table_cols(&self) -> usize {
        self.data.dim().1
    }

    /// The bilinear interpolation stencil for full-resolution pixel
    /// `(row, col)`, given the spatial rebinning `ratio` and the half-cell
    /// `offset = (ratio - 1) / 2` of the rebinned grid.
    pub(crate) fn stencil(&self, row: usize, col: usize, ratio: usize, offset: f64) -> Stencil<'_> {
        let (x0, x1, xb) = cell_origin(col, offset, ratio, self.table_cols());
        let (y0, y1, yb) = cell_origin(row, offset, ratio, self.table_rows());

        Stencil {
            c00: self.data.slice(s![y0, x0, ..]),
            c10: self.data.slice(s![y0, x1, ..]),
            c01: self.data.slice(s![y1, x0, ..]),
            c11: self.data.slice(s![y1, x1, ..]),
            xa: 1.0 - xb,
            xb,
            ya: 1.0 - yb,
            yb,
            ntest: self.ntest,
        }
    }
}

/// Map a full-resolution coordinate onto the rebinned grid: the two bracketing
/// cell indices and the fractional offset within the cell. Cell 0 of the
/// rebinned grid sits at full-resolution position `offset`, not 0, because the
/// table was built by block-averaging `ratio`-wide blocks.
///
/// Both edges are clamped so the stencil stays in bounds; the fractional
/// offset is then allowed outside \[0, 1\], which extrapolates rather than
/// producing NaN.
pub(crate) fn cell_origin(
    coord: usize,
    offset: f64,
    ratio: usize,
    len: usize,
) -> (usize, usize, f64) {
    let mut i0 = ((coord as f64 - offset) / ratio as f64).floor() as isize;
    let mut i1 = i0 + 1;
    if i1 >= len as isize {
        i0 -= 1;
        i1 -= 1;
    }
    if i0 < 0 {
        i0 += 1;
        i1 += 1;
    }
    // A single-cell axis leaves nothing to bracket; collapse the stencil onto
    // that one cell.
    if i1 >= len as isize {
        i1 = i0;
    }
    let frac = ((coord as f64 - offset) - (i0 * ratio as isize) as f64) / ratio as f64;
    (i0 as usize, i1 as usize, frac)
}

/// The four corner curves and weights interpolating the table at one pixel.
/// Values are computed on demand; the bracket search only evaluates the
/// entries it actually visits.
pub(crate) struct Stencil<'a> {
    c00: ArrayView1<'a, f32>,
    c10: ArrayView1<'a, f32>,
    c01: ArrayView1<'a, f32>,
    c11: ArrayView1<'a, f32>,
    xa: f64,
    xb: f64,
    ya: f64,
    yb: f64,
    ntest: usize,
}

impl Stencil<'_> {
    fn at(&self, i: usize) -> f32 {
        (self.ya * (f64::from(self.c00[i]) * self.xa + f64::from(self.c10[i]) * self.xb)
            + self.yb * (f64::from(self.c01[i]) * self.xa + f64::from(self.c11[i]) * self.xb))
            as f32
    }

    /// Interpolated 1st-harmonic curve at test-velocity index `i`.
    pub(crate) fn first(&self, i: usize) -> f32 {
        self.at(i)
    }

    /// Interpolated 2nd-harmonic curve at test-velocity index `i`.
    pub(crate) fn second(&self, i: usize) -> f32 {
        self.at(i + self.ntest)
    }
}
