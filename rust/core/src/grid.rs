// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Masked 2D grids
//!
//! Firing maps and field maps are row-major grids (row 0 at the top, as in
//! camera images) that may contain invalid cells. A cell is invalid when it
//! is explicitly masked or holds NaN. Every operation here returns a new
//! grid; the input is never modified.

use crate::error::{Error, Result};
use nalgebra::{DMatrix, Scalar};

/// A 2D grid of samples with an explicit invalidity mask (`true` = invalid)
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedGrid {
    data: DMatrix<f64>,
    mask: DMatrix<bool>,
}

/// Firing rate or occupancy map
pub type FiringMap = MaskedGrid;

/// Binary map of a single firing field (1 inside, 0 outside)
pub type FieldMap = MaskedGrid;

impl MaskedGrid {
    /// Wrap a matrix with nothing masked
    pub fn new(data: DMatrix<f64>) -> Self {
        let mask = DMatrix::from_element(data.nrows(), data.ncols(), false);
        Self { data, mask }
    }

    /// Wrap a matrix with an explicit mask of the same shape
    pub fn with_mask(data: DMatrix<f64>, mask: DMatrix<bool>) -> Result<Self> {
        if data.shape() != mask.shape() {
            return Err(Error::invalid(format!(
                "mask shape {:?} does not match data shape {:?}",
                mask.shape(),
                data.shape()
            )));
        }
        Ok(Self { data, mask })
    }

    /// Build from row-major nested rows
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let (nrows, ncols) = rectangular_shape(rows)?;
        let data = DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c]);
        Ok(Self::new(data))
    }

    /// Build from rows where `None` marks a missing sample (stored as NaN)
    pub fn from_optional_rows(rows: &[Vec<Option<f64>>]) -> Result<Self> {
        let (nrows, ncols) = rectangular_shape(rows)?;
        let data = DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c].unwrap_or(f64::NAN));
        Ok(Self::new(data))
    }

    /// Replace the mask with one given as nested rows
    pub fn masked_by_rows(self, rows: &[Vec<bool>]) -> Result<Self> {
        let (nrows, ncols) = rectangular_shape(rows)?;
        let mask = DMatrix::from_fn(nrows, ncols, |r, c| rows[r][c]);
        Self::with_mask(self.data, mask)
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.shape()
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn mask(&self) -> &DMatrix<bool> {
        &self.mask
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.data[(row, col)]
    }

    /// True if the cell is masked or NaN
    pub fn is_invalid(&self, row: usize, col: usize) -> bool {
        self.mask[(row, col)] || self.data[(row, col)].is_nan()
    }

    /// Combined invalidity (mask or NaN) for every cell
    pub fn invalid_cells(&self) -> DMatrix<bool> {
        DMatrix::from_fn(self.nrows(), self.ncols(), |r, c| self.is_invalid(r, c))
    }

    /// Raw data with NaN replaced by 0 and infinities by the largest finite values
    pub fn nan_to_num(&self) -> DMatrix<f64> {
        self.data.map(|v| {
            if v.is_nan() {
                0.0
            } else if v == f64::INFINITY {
                f64::MAX
            } else if v == f64::NEG_INFINITY {
                f64::MIN
            } else {
                v
            }
        })
    }

    /// Clamp every value above `max` down to `max`; NaN is kept
    pub fn clamp_max(&self, max: f64) -> Self {
        Self {
            data: self.data.map(|v| if v > max { max } else { v }),
            mask: self.mask.clone(),
        }
    }

    /// The first `n` columns (all columns if `n` exceeds the width)
    pub fn first_columns(&self, n: usize) -> Self {
        let n = n.min(self.ncols());
        Self {
            data: self.data.columns(0, n).into_owned(),
            mask: self.mask.columns(0, n).into_owned(),
        }
    }

    /// The last `n` columns (all columns if `n` exceeds the width)
    pub fn last_columns(&self, n: usize) -> Self {
        let n = n.min(self.ncols());
        let start = self.ncols() - n;
        Self {
            data: self.data.columns(start, n).into_owned(),
            mask: self.mask.columns(start, n).into_owned(),
        }
    }

    /// The first `n` rows (all rows if `n` exceeds the height)
    pub fn first_rows(&self, n: usize) -> Self {
        let n = n.min(self.nrows());
        Self {
            data: self.data.rows(0, n).into_owned(),
            mask: self.mask.rows(0, n).into_owned(),
        }
    }

    /// The last `n` rows (all rows if `n` exceeds the height)
    pub fn last_rows(&self, n: usize) -> Self {
        let n = n.min(self.nrows());
        let start = self.nrows() - n;
        Self {
            data: self.data.rows(start, n).into_owned(),
            mask: self.mask.rows(start, n).into_owned(),
        }
    }

    /// Mirror left-right
    pub fn mirror_horizontal(&self) -> Self {
        Self {
            data: mirror_horizontal(&self.data),
            mask: mirror_horizontal(&self.mask),
        }
    }

    /// Rotate 90 degrees counter-clockwise: the top edge becomes the left edge
    pub fn rotate_ccw(&self) -> Self {
        Self {
            data: rotate_ccw(&self.data),
            mask: rotate_ccw(&self.mask),
        }
    }

    /// Data as nested rows, for serialization
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        matrix_rows(&self.data)
    }
}

/// Row-major nested rows of a matrix
pub fn matrix_rows(m: &DMatrix<f64>) -> Vec<Vec<f64>> {
    m.row_iter().map(|row| row.iter().copied().collect()).collect()
}

pub(crate) fn mirror_horizontal<T: Scalar>(m: &DMatrix<T>) -> DMatrix<T> {
    let ncols = m.ncols();
    DMatrix::from_fn(m.nrows(), ncols, |r, c| m[(r, ncols - 1 - c)].clone())
}

pub(crate) fn rotate_ccw<T: Scalar>(m: &DMatrix<T>) -> DMatrix<T> {
    let (nrows, ncols) = m.shape();
    DMatrix::from_fn(ncols, nrows, |r, c| m[(c, ncols - 1 - r)].clone())
}

fn rectangular_shape<T>(rows: &[Vec<T>]) -> Result<(usize, usize)> {
    let nrows = rows.len();
    let ncols = rows.first().map(|r| r.len()).unwrap_or(0);
    if nrows == 0 || ncols == 0 {
        return Err(Error::invalid("grid must have at least one row and one column"));
    }
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(Error::invalid(format!(
            "ragged grid: row {} has {} columns, expected {}",
            i,
            row.len(),
            ncols
        )));
    }
    Ok((nrows, ncols))
}
