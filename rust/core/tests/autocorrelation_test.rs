// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use arenamap_core::{autocorrelation, MaskedGrid};
use nalgebra::DMatrix;

/// Periodic bump pattern, roughly what a grid cell rate map looks like
fn grid_like_map(nrows: usize, ncols: usize) -> MaskedGrid {
    let data = DMatrix::from_fn(nrows, ncols, |r, c| {
        let (y, x) = (r as f64, c as f64);
        (x * 0.9).cos() + (y * 0.9).cos() + 2.0
    });
    MaskedGrid::new(data)
}

#[test]
fn uniform_map_gives_nondegenerate_odd_autocorrelogram() {
    let map = MaskedGrid::new(DMatrix::from_element(5, 5, 4.0));
    let acorr = autocorrelation(&map).unwrap();
    let (rows, cols) = acorr.shape();
    assert!(rows % 2 == 1 && cols % 2 == 1);
    assert!(rows <= 9 && cols <= 9);
    assert!(acorr.iter().any(|&v| v != 0.0));
}

#[test]
fn output_is_odd_and_peaks_at_center() {
    for (n, m) in [(1, 1), (2, 7), (16, 16), (25, 40), (33, 20)] {
        let acorr = autocorrelation(&grid_like_map(n, m)).unwrap();
        let (rows, cols) = acorr.shape();
        assert_eq!(rows % 2, 1, "{n}x{m}");
        assert_eq!(cols % 2, 1, "{n}x{m}");
        assert!(rows <= 2 * n - 1 && cols <= 2 * m - 1);

        let center = acorr[(rows / 2, cols / 2)];
        assert!((center - 1.0).abs() < 1e-9, "{n}x{m}: center {center}");
        assert!(acorr.iter().all(|v| v.is_finite() && *v <= 1.0 + 1e-9));
    }
}

#[test]
fn nan_cells_do_not_propagate() {
    let mut map = grid_like_map(20, 20);
    let mut rows = map.to_rows();
    rows[4][7] = f64::NAN;
    rows[19][0] = f64::NAN;
    map = MaskedGrid::from_rows(&rows).unwrap();

    let acorr = autocorrelation(&map).unwrap();
    assert_eq!(acorr.shape(), (35, 35));
    assert!(acorr.iter().all(|v| v.is_finite()));
}
