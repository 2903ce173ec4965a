// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Doppler, magnetic and line-shape observables from polarised narrow-band solar
filtergrams.

A filtergram set samples a solar absorption line at N tuning positions in both
circular polarisations. For every on-disk pixel, this crate extracts the first
and second Fourier harmonics of the line profile across the tuning positions,
converts their phases to apparent velocities, calibrates those against a
per-position lookup table of the instrument response, and synthesises six
full-disk maps: Dopplergram, magnetogram, line depth, line width, continuum
intensity and the uncalibrated Dopplergram.
 */

pub mod constants;
pub mod dopplergram;
pub mod error;
pub(crate) mod fourier;
pub mod lookup;
pub(crate) mod observables;
pub mod params;
pub mod tuning;
pub(crate) mod velcal;

// Re-exports.
pub use dopplergram::{
    compute_observables, DopplergramError, FiltergramSet, MissingCounts, ObservableMaps,
};
pub use error::ObservablesError;
pub use lookup::{LookupError, LookupTable};
pub use params::{DiskGeometry, DopplerParams, FreeSpectralRanges};
pub use tuning::{TuningError, TuningGeometry};

// External re-exports.
pub use hifitime::Epoch;
