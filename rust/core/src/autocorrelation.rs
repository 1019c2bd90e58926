// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D spatial autocorrelation of a firing map
//!
//! Lags near the edge of the full correlation surface are computed from very
//! few overlapping cells and are too noisy to use, so the surface is cropped
//! to an odd-sized window around zero lag.

use crate::error::{Error, Result};
use crate::grid::FiringMap;
use crate::xcorr::{CrossCorrelation, NormXCorr2};
use nalgebra::DMatrix;

/// Cropped, centered autocorrelation surface
pub type Autocorrelogram = DMatrix<f64>;

/// Fraction of the map size added to it to get the retained window, so
/// an axis of `n` bins keeps about `1.8 * n` lags in total.
///
/// Fixed so that autocorrelograms stay comparable between analyses.
pub const OVERLAP_AMOUNT: f64 = 0.8;

/// Autocorrelogram of `map` using [`NormXCorr2`]
pub fn autocorrelation(map: &FiringMap) -> Result<Autocorrelogram> {
    autocorrelation_with(map, &NormXCorr2::default())
}

/// Autocorrelogram of `map` using a caller-supplied correlation
pub fn autocorrelation_with<C>(map: &FiringMap, correlator: &C) -> Result<Autocorrelogram>
where
    C: CrossCorrelation + ?Sized,
{
    let (nrows, ncols) = map.shape();
    if nrows == 0 || ncols == 0 {
        return Err(Error::invalid("cannot autocorrelate an empty map"));
    }

    // Invalid cells carry no signal
    let invalid = map.invalid_cells();
    let mut clean = map.nan_to_num();
    for (value, &bad) in clean.iter_mut().zip(invalid.iter()) {
        if bad {
            *value = 0.0;
        }
    }

    let full = correlator.autocorrelate(&clean);
    let (rows, cols) = (
        crop_window(nrows, full.nrows()),
        crop_window(ncols, full.ncols()),
    );
    tracing::debug!(
        map = ?(nrows, ncols),
        full = ?full.shape(),
        rows = ?rows,
        cols = ?cols,
        "cropping autocorrelogram"
    );

    Ok(full.view((rows.0, cols.0), (rows.1, cols.1)).into_owned())
}

/// Start and length of the retained window along one axis
///
/// `original` is the map size, `full` the correlation surface size.
pub fn crop_window(original: usize, full: usize) -> (usize, usize) {
    let mut retained = (original as f64 * (1.0 + OVERLAP_AMOUNT)).round_ties_even();
    if retained % 2.0 == 0.0 {
        retained -= 1.0;
    }
    let offset = ((full as f64 - retained) / 2.0 + 1.0).round_ties_even();
    let start = (offset - 1.0).max(0.0) as usize;
    let end = ((full as f64 - offset + 1.0).max(0.0) as usize).min(full);
    (start.min(end), end - start.min(end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::MaskedGrid;

    #[test]
    fn test_crop_window_sizes() {
        assert_eq!(crop_window(1, 1), (0, 1));
        assert_eq!(crop_window(2, 3), (0, 3));
        assert_eq!(crop_window(5, 9), (0, 9));
        assert_eq!(crop_window(10, 19), (1, 17));
        assert_eq!(crop_window(20, 39), (2, 35));
        assert_eq!(crop_window(40, 79), (4, 71));
    }

    #[test]
    fn test_crop_window_even_surface_rounds_half_to_even() {
        // offset (6 - 3) / 2 + 1 = 2.5 rounds down to 2
        assert_eq!(crop_window(2, 6), (1, 4));
    }

    #[test]
    fn test_crop_is_odd_and_centered() {
        for n in 1..60 {
            let full = 2 * n - 1;
            let (start, len) = crop_window(n, full);
            assert_eq!(len % 2, 1, "n = {n}");
            assert!(len <= full);
            // zero lag sits at full / 2
            assert_eq!(start + len / 2, full / 2, "n = {n}");
        }
    }

    #[test]
    fn test_constant_map() {
        let map = MaskedGrid::new(DMatrix::from_element(5, 5, 3.0));
        let acorr = autocorrelation(&map).unwrap();
        assert_eq!(acorr.shape(), (9, 9));
        assert!(acorr.iter().any(|&v| v != 0.0));
    }

    #[test]
    fn test_rectangular_map_with_nan() {
        let mut rows = vec![vec![0.0; 12]; 7];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, v) in row.iter_mut().enumerate() {
                *v = ((r * 3 + c * 7) % 5) as f64;
            }
        }
        rows[2][3] = f64::NAN;
        let map = MaskedGrid::from_rows(&rows).unwrap();
        let acorr = autocorrelation(&map).unwrap();

        assert_eq!(acorr.shape(), (13, 21));
        assert!(acorr.iter().all(|v| v.is_finite()));
        // zero lag of the full surface lands in the middle
        assert!((acorr[(6, 10)] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_custom_correlator_is_used() {
        struct Ones;
        impl CrossCorrelation for Ones {
            fn correlate(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
                DMatrix::from_element(a.nrows() + b.nrows() - 1, a.ncols() + b.ncols() - 1, 1.0)
            }
        }
        let map = MaskedGrid::new(DMatrix::from_element(10, 10, 0.0));
        let acorr = autocorrelation_with(&map, &Ones).unwrap();
        assert_eq!(acorr.shape(), (17, 17));
        assert!(acorr.iter().all(|&v| v == 1.0));
    }
}
