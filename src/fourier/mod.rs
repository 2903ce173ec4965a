// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Discrete 1st- and 2nd-harmonic extraction from the N-point intensity
//! sequence of one polarization channel, and the conversion of the harmonic
//! phases to raw (uncalibrated) velocities.


use crate::constants::TAU;
use crate::tuning::TuningGeometry;

/// The four harmonic partial sums of one channel's intensity sequence.
///
/// The sums are accumulated in double precision even though the samples are
/// f32; near zero velocity the cosine projections cancel almost exactly and
/// single precision loses the phase.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct HarmonicSums {
    pub(crate) f1c: f64,
    pub(crate) f1s: f64,
    pub(crate) f2c: f64,
    pub(crate) f2s: f64,
}

impl HarmonicSums {
    /// A NaN intensity sample poisons every sum; checking the 1st-harmonic
    /// pair is sufficient to detect missing input.
    pub(crate) fn is_missing(&self) -> bool {
        self.f1c.is_nan() || self.f1s.is_nan()
    }

    /// The sums scaled by the Fourier normalisation constant, ready for the
    /// line-shape formulas.
    pub(crate) fn scaled(&self, k: f64) -> HarmonicSums {
        HarmonicSums {
            f1c: self.f1c * k,
            f1s: self.f1s * k,
            f2c: self.f2c * k,
            f2s: self.f2s * k,
        }
    }

    /// Squared amplitude of the 1st harmonic.
    pub(crate) fn power1(&self) -> f64 {
        self.f1c * self.f1c + self.f1s * self.f1s
    }

    /// Squared amplitude of the 2nd harmonic.
    pub(crate) fn power2(&self) -> f64 {
        self.f2c * self.f2c + self.f2s * self.f2s
    }
}

/// Project one channel's intensity samples onto the tuning-angle harmonics.
pub(crate) fn harmonic_sums(geometry: &TuningGeometry, samples: &[f32]) -> HarmonicSums {
    let mut sums = HarmonicSums::default();
    for (i, &sample) in samples.iter().enumerate() {
        let sample = f64::from(sample);
        sums.f1c += geometry.cos[i] * sample;
        sums.f1s += geometry.sin[i] * sample;
        sums.f2c += geometry.cos2[i] * sample;
        sums.f2s += geometry.sin2[i] * sample;
    }
    sums
}

/// Raw velocity from the 1st-harmonic phase \[m/s\].
///
/// Both atan2 arguments are negated so that the 2π wrap falls at the velocity
/// extreme instead of at zero: an absorption line at rest produces sums of
/// negative sign, and physically-expected near-zero velocities must stay away
/// from the branch cut.
pub(crate) fn first_harmonic_velocity(sums: &HarmonicSums, pv1: f64) -> f64 {
    (-sums.f1s).atan2(-sums.f1c) * pv1 / TAU
}

/// Raw velocity from the 2nd-harmonic phase \[m/s\], unwrapped against the
/// 1st-harmonic estimate.
///
/// The 2nd harmonic wraps every `pv2 = pv1 / 2`, so its phase is ambiguous by
/// half a period; of the candidate branches, pick the one nearest the
/// full-range 1st-harmonic velocity. The `10.5 * pv2` offset keeps the fmod
/// argument positive for any raw phase.
pub(crate) fn second_harmonic_velocity(sums: &HarmonicSums, v1: f64, pv2: f64) -> f64 {
    let v2 = (-sums.f2s).atan2(-sums.f2c) * pv2 / TAU;
    (v2 - v1 + 10.5 * pv2) % pv2 - pv2 / 2.0 + v1
}
