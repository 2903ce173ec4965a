// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use ndarray::Array3;

use super::*;

fn linear_table(rows: usize, cols: usize, ntest: usize) -> Array3<f32> {
    // Each spatial cell holds the identity curve in both harmonic planes,
    // scaled by the cell's column so that spatial interpolation is visible.
    Array3::from_shape_fn((rows, cols, 2 * ntest), |(_, c, v)| {
        let i = v % ntest;
        (i as f32 - (ntest as f32 - 1.0) / 2.0) * (1.0 + c as f32)
    })
}

#[test]
fn vtest_grid_is_symmetric() {
    let table = LookupTable::new(linear_table(4, 4, 21), 21, 50.0).unwrap();
    let vtest = table.vtest();
    assert_eq!(vtest.len(), 21);
    assert_abs_diff_eq!(vtest[0], -500.0);
    assert_abs_diff_eq!(vtest[10], 0.0);
    assert_abs_diff_eq!(vtest[20], 500.0);
    // Symmetric about the central test velocity.
    for i in 0..21 {
        assert_abs_diff_eq!(vtest[i], -vtest[20 - i]);
    }
}

#[test]
fn velocity_axis_must_be_twice_ntest() {
    let result = LookupTable::new(linear_table(4, 4, 21), 20, 50.0);
    assert!(matches!(
        result,
        Err(LookupError::BadVelocityAxis {
            got: 42,
            expected: 40
        })
    ));
}

#[test]
fn declared_bounds_are_enforced() {
    let table = LookupTable::new(linear_table(256, 256, 101), 101, 50.0).unwrap();
    assert!(table.check_bounds(202, 256).is_ok());
    assert!(matches!(
        table.check_bounds(200, 256),
        Err(LookupError::ExceedsDeclaredBounds { .. })
    ));
    assert!(matches!(
        table.check_bounds(202, 255),
        Err(LookupError::ExceedsDeclaredBounds { .. })
    ));
}

#[test]
fn rebinned_cell_origin() {
    // ratio 16 rebinning puts table cell 0 at full-resolution position 7.5;
    // columns 7 and 8 both fall in cell 0, either side of its centre.
    let ratio = 16;
    let offset = (ratio as f64 - 1.0) / 2.0;
    assert_abs_diff_eq!(offset, 7.5);

    let (x0, x1, frac) = cell_origin(7, offset, ratio, 256);
    assert_eq!((x0, x1), (0, 1));
    assert_abs_diff_eq!(frac, -0.03125);

    let (x0, x1, frac) = cell_origin(8, offset, ratio, 256);
    assert_eq!((x0, x1), (0, 1));
    assert_abs_diff_eq!(frac, 0.03125);

    // One ratio further along, the fraction advances by exactly one cell.
    let (x0, x1, frac) = cell_origin(7 + 16, offset, ratio, 256);
    assert_eq!((x0, x1), (0, 1));
    assert_abs_diff_eq!(frac, 0.96875);
    let (x0, x1, frac) = cell_origin(8 + 16, offset, ratio, 256);
    assert_eq!((x0, x1), (1, 2));
    assert_abs_diff_eq!(frac, 0.03125);

    // Upper edge: the stencil backs off one cell and extrapolates.
    let (x0, x1, frac) = cell_origin(255, offset, ratio, 16);
    assert_eq!((x0, x1), (14, 15));
    assert!(frac > 1.0);
}

#[test]
fn stencil_interpolates_between_cells() {
    let ntest = 21;
    let table = LookupTable::new(linear_table(4, 4, ntest), ntest, 50.0).unwrap();

    // ratio 1: full-resolution pixel (1, 2) lands exactly on cell (1, 2),
    // whose curve is the identity scaled by (1 + col) = 3.
    let stencil = table.stencil(1, 2, 1, 0.0);
    assert_abs_diff_eq!(stencil.first(0), -30.0);
    assert_abs_diff_eq!(stencil.first(10), 0.0);
    assert_abs_diff_eq!(stencil.first(20), 30.0);
    assert_abs_diff_eq!(stencil.second(10), 0.0);
    assert_abs_diff_eq!(stencil.second(20), 30.0);
}

#[test]
fn stencil_weights_average_midway_pixels() {
    let ntest = 21;
    let table = LookupTable::new(linear_table(4, 4, ntest), ntest, 50.0).unwrap();

    // ratio 2, offset 0: full-resolution column 1 sits midway between table
    // columns 0 and 1, so the interpolated curve is the mean of scales 1 and 2.
    let stencil = table.stencil(0, 1, 2, 0.0);
    assert_abs_diff_eq!(stencil.first(20), 15.0, epsilon = 1e-6);
    assert_abs_diff_eq!(stencil.first(0), -15.0, epsilon = 1e-6);
}
