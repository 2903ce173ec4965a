// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors associated with the observable computation. All of these are
//! configuration errors detected at entry, before any pixel work begins;
//! per-pixel conditions surface through the aggregate counters instead.

use thiserror::Error;

use crate::lookup::LookupError;
use crate::tuning::TuningError;

#[derive(Error, Debug)]
pub enum DopplergramError {
    #[error("{0}")]
    Tuning(#[from] TuningError),

    #[error("Filtergram {index} is {got_rows} x {got_cols}, but the first filtergram is {rows} x {cols}")]
    MismatchedDimensions {
        index: usize,
        got_rows: usize,
        got_cols: usize,
        rows: usize,
        cols: usize,
    },

    #[error("{0}")]
    Lookup(#[from] LookupError),

    #[error("The filtergram rows ({rows}) are not a whole multiple of the lookup table's rows ({table_rows}); no integer rebinning ratio exists")]
    IncompatibleRebin { table_rows: usize, rows: usize },
}
