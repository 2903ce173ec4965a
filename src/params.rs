// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Injected configuration for the observable pipeline. These values come from
//! the surrounding pipeline (instrument tables, calibration records); nothing
//! here is re-read from disk inside the per-pixel loop.

/// Free spectral ranges of the tunable filter elements \[Å\]. Only the
/// narrow-band Michelson is consumed by the Doppler core; the rest are carried
/// for the collaborating subsystems that share this parameter block.
#[derive(Debug, Clone, Copy)]
pub struct FreeSpectralRanges {
    /// Narrow-band Michelson, nominally 0.172 Å.
    pub narrow_band: f64,
    /// Wide-band Michelson.
    pub wide_band: f64,
    /// Lyot elements E1 through E5.
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
    pub e4: f64,
    pub e5: f64,
}

/// Scalar instrument parameters for the observable computation.
#[derive(Debug, Clone)]
pub struct DopplerParams {
    pub fsr: FreeSpectralRanges,

    /// Wavelength-to-velocity conversion factor \[Å / (m/s)\].
    pub dlamdv: f64,

    /// Declared upper bound on the lookup table's velocity axis (`2 * ntest`).
    pub max_vtest: usize,

    /// Declared upper bound on the lookup table's spatial axes.
    pub max_nx: usize,

    /// Number of test velocities per harmonic plane of the lookup table.
    pub ntest: usize,

    /// Spacing of the test-velocity grid \[m/s\].
    pub dvtest: f64,

    /// Sentinel marking missing input samples. Carried for interface parity;
    /// missing inputs announce themselves as NaNs.
    pub missing_data: f32,

    /// Sentinel written to output pixels that could not be computed.
    pub missing_result: f32,

    /// Coefficients of the empirical 3rd-order velocity correction, lowest
    /// order first. These are opaque calibration products; zeros disable the
    /// correction.
    pub correction: [f64; 4],

    /// Definitive or quick-look processing. The active code path treats both
    /// the same way.
    pub quick_look: bool,
}

/// Solar disk geometry of the filtergrams being processed.
#[derive(Debug, Clone, Copy)]
pub struct DiskGeometry {
    /// Solar radius \[pixels\].
    pub rsun: f64,
    /// Column of disk centre \[pixels\].
    pub x0: f64,
    /// Row of disk centre \[pixels\].
    pub y0: f64,
    /// Plate scale \[arcsec/pixel\].
    pub cdelt1: f64,
}
