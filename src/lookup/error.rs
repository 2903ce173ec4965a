// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the calibration lookup table.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("The lookup table velocity axis has length {got}, but 2 * ntest = {expected}")]
    BadVelocityAxis { got: usize, expected: usize },

    #[error("The lookup table dimensions ({rows} x {cols} x {velocity_axis}) exceed the declared bounds ({max_nx} x {max_nx} x {max_vtest})")]
    ExceedsDeclaredBounds {
        rows: usize,
        cols: usize,
        velocity_axis: usize,
        max_vtest: usize,
        max_nx: usize,
    },
}
