// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all observable-pipeline errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ObservablesError {
    #[error("{0}")]
    Tuning(#[from] crate::tuning::TuningError),

    #[error("{0}")]
    Lookup(#[from] crate::lookup::LookupError),

    #[error("{0}")]
    Dopplergram(#[from] crate::dopplergram::DopplergramError),
}
