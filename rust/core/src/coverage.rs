// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coverage of one wall by one field
//!
//! Works on a canonical strip (see [`Wall::canonical_strip`](crate::Wall::canonical_strip)):
//! one row per position along the wall, column 0 adjacent to the wall.

use crate::grid::MaskedGrid;
use image::{GrayImage, Luma};
use imageproc::distance_transform::euclidean_squared_distance_transform;
use nalgebra::DMatrix;

/// Wall-adjacent site counts for one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteCounts {
    /// Sites whose distance to the field is exactly 0
    pub covered: usize,
    /// Sites with a usable value after substitution
    pub valid: usize,
    /// Sites along the wall
    pub total: usize,
}

impl SiteCounts {
    /// Fraction of valid sites inside the field, `None` without valid sites
    pub fn coverage(&self) -> Option<f64> {
        if self.valid == 0 {
            None
        } else {
            Some(self.covered as f64 / self.valid as f64)
        }
    }
}

/// Fraction of wall-adjacent sites that lie inside the field.
///
/// Returns `None` when no wall-adjacent site is valid, even after
/// substituting values from further along each row.
pub fn wall_coverage(strip: &MaskedGrid) -> Option<f64> {
    count_wall_sites(strip).coverage()
}

/// Count covered and valid wall-adjacent sites of a canonical strip
pub fn count_wall_sites(strip: &MaskedGrid) -> SiteCounts {
    let (nrows, ncols) = strip.shape();
    if nrows == 0 || ncols == 0 {
        return SiteCounts {
            covered: 0,
            valid: 0,
            total: nrows,
        };
    }

    // A labelled map may still carry field ids > 1
    let strip = strip.clamp_max(1.0);
    let invalid = strip.invalid_cells();

    // Complement grid is zero inside the field; NaN is zero-filled as well
    let field_cells = strip.data().map(|v| {
        let complement = 1.0 - v;
        complement.is_nan() || complement == 0.0
    });
    let distance = distance_to_field(&field_cells);

    let mut counts = SiteCounts {
        covered: 0,
        valid: 0,
        total: nrows,
    };
    for row in 0..nrows {
        if let Some(d) = wall_site_distance(&distance, &invalid, row) {
            counts.valid += 1;
            if d == 0.0 {
                counts.covered += 1;
            }
        }
    }

    tracing::trace!(
        covered = counts.covered,
        valid = counts.valid,
        total = counts.total,
        "wall sites counted"
    );
    counts
}

/// Distance at the wall-adjacent cell of `row`, or at the first valid cell
/// further out along the row when that one is invalid
fn wall_site_distance(distance: &DMatrix<f64>, invalid: &DMatrix<bool>, row: usize) -> Option<f64> {
    (0..distance.ncols())
        .map(|col| (distance[(row, col)], invalid[(row, col)]))
        .find(|(d, bad)| !bad && !d.is_nan())
        .map(|(d, _)| d)
}

/// Euclidean distance from every cell to the nearest field cell
///
/// Infinite everywhere if the strip holds no field cell.
pub fn distance_to_field(field_cells: &DMatrix<bool>) -> DMatrix<f64> {
    let (nrows, ncols) = field_cells.shape();
    if !field_cells.iter().any(|&inside| inside) {
        return DMatrix::from_element(nrows, ncols, f64::INFINITY);
    }

    let image = GrayImage::from_fn(ncols as u32, nrows as u32, |x, y| {
        let inside = field_cells[(y as usize, x as usize)];
        Luma([if inside { 255 } else { 0 }])
    });
    let squared = euclidean_squared_distance_transform(&image);

    DMatrix::from_fn(nrows, ncols, |r, c| {
        squared.get_pixel(c as u32, r as u32).0[0].sqrt()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn strip(rows: &[Vec<f64>]) -> MaskedGrid {
        MaskedGrid::from_rows(rows).unwrap()
    }

    #[test]
    fn test_full_field_covers_wall() {
        let s = strip(&[vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert_eq!(wall_coverage(&s), Some(1.0));
    }

    #[test]
    fn test_empty_field_covers_nothing() {
        let s = strip(&[vec![0.0, 0.0], vec![0.0, 0.0]]);
        assert_eq!(wall_coverage(&s), Some(0.0));
    }

    #[test]
    fn test_partial_coverage() {
        let s = strip(&[
            vec![1.0, 0.0, 0.0],
            vec![1.0, 1.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
        ]);
        assert_relative_eq!(wall_coverage(&s).unwrap(), 0.5);
    }

    #[test]
    fn test_labelled_values_are_clamped() {
        let s = strip(&[vec![3.0, 0.0], vec![0.0, 0.0]]);
        assert_relative_eq!(wall_coverage(&s).unwrap(), 0.5);
    }

    #[test]
    fn test_masked_site_takes_next_valid_value() {
        // Row 0's wall cell is masked; the next cell out is inside the field
        let s = strip(&[vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 0.0]])
            .masked_by_rows(&[vec![true, false, false], vec![false, false, false]])
            .unwrap();
        let counts = count_wall_sites(&s);
        assert_eq!(counts.valid, 2);
        assert_eq!(counts.covered, 1);
    }

    #[test]
    fn test_fully_invalid_row_is_excluded() {
        let s = MaskedGrid::from_optional_rows(&[
            vec![None, None],
            vec![Some(1.0), Some(0.0)],
            vec![Some(0.0), Some(0.0)],
        ])
        .unwrap();
        let counts = count_wall_sites(&s);
        assert_eq!(counts.total, 3);
        assert_eq!(counts.valid, 2);
        assert_relative_eq!(counts.coverage().unwrap(), 0.5);
    }

    #[test]
    fn test_no_valid_sites_is_undefined() {
        let s = MaskedGrid::from_optional_rows(&[vec![None], vec![None]]).unwrap();
        assert_eq!(wall_coverage(&s), None);
    }

    #[test]
    fn test_distance_transform_values() {
        let cells = DMatrix::from_row_slice(1, 4, &[true, false, false, false]);
        let d = distance_to_field(&cells);
        assert_relative_eq!(d[(0, 0)], 0.0);
        assert_relative_eq!(d[(0, 3)], 3.0);

        let diagonal = DMatrix::from_row_slice(2, 2, &[true, false, false, false]);
        let d = distance_to_field(&diagonal);
        assert_relative_eq!(d[(1, 1)], 2f64.sqrt());
    }

    #[test]
    fn test_distance_without_field_is_infinite() {
        let cells = DMatrix::from_element(2, 3, false);
        assert!(distance_to_field(&cells).iter().all(|d| d.is_infinite()));
    }
}
