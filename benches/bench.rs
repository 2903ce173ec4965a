// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;
use ndarray::{Array2, Array3};

use helio_observables::{
    compute_observables, DiskGeometry, DopplerParams, Epoch, FiltergramSet, FreeSpectralRanges,
    LookupTable,
};

const FSR_NB: f64 = 0.172;
const DLAMDV: f64 = 0.000061733433;
const NTEST: usize = 101;
const DVTEST: f64 = 50.0;

fn params() -> DopplerParams {
    DopplerParams {
        fsr: FreeSpectralRanges {
            narrow_band: FSR_NB,
            wide_band: 0.344,
            e1: 0.693,
            e2: 1.407,
            e3: 2.779,
            e4: 5.682,
            e5: 11.354,
        },
        dlamdv: DLAMDV,
        max_vtest: 2 * NTEST,
        max_nx: 512,
        ntest: NTEST,
        dvtest: DVTEST,
        missing_data: f32::NAN,
        missing_result: -8388608.0,
        correction: [0.0; 4],
        quick_look: false,
    }
}

/// A Gaussian absorption line red-shifted by `v_los` \[m/s\], sampled at the
/// six tuning positions of a 12-frame framelist.
fn line_samples(v_los: f64) -> Vec<f32> {
    let dtune = FSR_NB / 2.5;
    let shift = v_los * DLAMDV;
    [2.5, 1.5, 0.5, -0.5, -1.5, -2.5]
        .iter()
        .map(|&m| {
            let x = m * dtune - shift;
            (1000.0 - 600.0 * (-x * x / 0.06 / 0.06).exp()) as f32
        })
        .collect()
}

fn observable_pipeline(c: &mut Criterion) {
    let rows = 256;
    let samples = line_samples(300.0);
    let frames = (0..12)
        .map(|i| Array2::from_elem((rows, rows), samples[i / 2]))
        .collect();
    let filtergrams = FiltergramSet::new(frames).unwrap();

    // An identity response: each test velocity maps to itself in both
    // harmonic lanes, uniformly over a 16 x 16 spatial grid.
    let data = Array3::from_shape_fn((16, 16, 2 * NTEST), |(_, _, v)| {
        (DVTEST * ((v % NTEST) as f64 - 50.0)) as f32
    });
    let lookup = LookupTable::new(data, NTEST, DVTEST).unwrap();

    let disk = DiskGeometry {
        rsun: 1.0e6,
        x0: rows as f64 / 2.0,
        y0: rows as f64 / 2.0,
        cdelt1: 0.5,
    };
    let params = params();
    let time = Epoch::from_gpst_seconds(1.0e9);

    c.bench_function("256x256 observables", |b| {
        b.iter(|| compute_observables(&filtergrams, &lookup, &disk, &params, time).unwrap())
    });
}

criterion_group!(benches, observable_pipeline);
criterion_main!(benches);
