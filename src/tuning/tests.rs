// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;

// Nominal HMI values.
const FSR_NB: f64 = 0.172;
const DLAMDV: f64 = 0.000061733433;

#[test]
fn unsupported_framelist_sizes_are_rejected() {
    for size in [0, 1, 5, 6, 8, 11, 14, 18, 22] {
        let result = TuningGeometry::new(size, FSR_NB, DLAMDV);
        assert!(
            matches!(result, Err(TuningError::UnsupportedFramelistSize(got)) if got == size),
            "framelist size {size} should be rejected"
        );
    }
}

#[test]
fn trig_tables_sum_to_zero() {
    // Equally-spaced angles over a full period sum to zero in each harmonic.
    for size in [10, 12, 16, 20] {
        let geometry = TuningGeometry::new(size, FSR_NB, DLAMDV).unwrap();
        assert_eq!(geometry.num_wavelengths(), size / 2);
        assert_abs_diff_eq!(geometry.cos.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.sin.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.cos2.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(geometry.sin2.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
    }
}

#[test]
fn derived_scalars() {
    let geometry = TuningGeometry::new(12, FSR_NB, DLAMDV).unwrap();
    let dtune = FSR_NB / 2.5;

    assert_abs_diff_eq!(geometry.dtune, dtune);
    assert_abs_diff_eq!(geometry.period(), 5.0 * dtune);
    assert_abs_diff_eq!(geometry.velocity_period(), 5.0 * dtune / DLAMDV, epsilon = 1e-9);
    assert_abs_diff_eq!(geometry.pv2, geometry.pv1 / 2.0);
    assert_abs_diff_eq!(geometry.kfourier, 2.0 / 5.0);

    // Tuning offsets are symmetric about line centre and `dtune` apart.
    assert_abs_diff_eq!(geometry.tune[0], 2.5 * dtune);
    assert_abs_diff_eq!(geometry.tune[5], -2.5 * dtune);
    assert_abs_diff_eq!(geometry.tune.iter().sum::<f64>(), 0.0, epsilon = 1e-12);
}

#[test]
fn five_wavelength_geometry_includes_line_centre() {
    let geometry = TuningGeometry::new(10, FSR_NB, DLAMDV).unwrap();
    assert_eq!(geometry.num_wavelengths(), 5);
    assert_abs_diff_eq!(geometry.tune[2], 0.0);
    assert_abs_diff_eq!(geometry.angle[2], 0.0);
}
