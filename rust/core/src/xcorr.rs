// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Full 2D normalized cross-correlation
//!
//! Each output cell is the Pearson correlation of the two grids over the
//! region where they overlap at that lag. Window sums come from summed-area
//! tables; only the cross term is accumulated directly.

use nalgebra::DMatrix;
use rayon::prelude::*;

/// A full-mode 2D cross-correlation
pub trait CrossCorrelation: Sync {
    /// Correlate `a` with `b`, returning a surface of shape
    /// `(a.nrows() + b.nrows() - 1, a.ncols() + b.ncols() - 1)`.
    /// Inputs are finite.
    fn correlate(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64>;

    /// Correlate a grid with itself
    fn autocorrelate(&self, map: &DMatrix<f64>) -> DMatrix<f64> {
        self.correlate(map, map)
    }
}

/// Normalized cross-correlation over the overlapping region of each lag
#[derive(Debug, Clone, Copy, Default)]
pub struct NormXCorr2 {
    /// Lags overlapping fewer cells than this are 0
    pub min_overlap: usize,
}

impl NormXCorr2 {
    pub fn new(min_overlap: usize) -> Self {
        Self { min_overlap }
    }
}

impl CrossCorrelation for NormXCorr2 {
    fn correlate(&self, a: &DMatrix<f64>, b: &DMatrix<f64>) -> DMatrix<f64> {
        let (na, ma) = a.shape();
        let (nb, mb) = b.shape();
        if na == 0 || ma == 0 || nb == 0 || mb == 0 {
            return DMatrix::zeros(0, 0);
        }
        let out_rows = na + nb - 1;
        let out_cols = ma + mb - 1;

        let sum_a = SummedArea::new(a, |v| v);
        let sum_a2 = SummedArea::new(a, |v| v * v);
        let sum_b = SummedArea::new(b, |v| v);
        let sum_b2 = SummedArea::new(b, |v| v * v);

        let rows: Vec<Vec<f64>> = (0..out_rows)
            .into_par_iter()
            .map(|i| {
                // b row r - dy sits over a row r
                let dy = i as isize - (nb as isize - 1);
                let (r0, r1) = overlap(dy, na, nb);
                (0..out_cols)
                    .map(|j| {
                        let dx = j as isize - (mb as isize - 1);
                        let (c0, c1) = overlap(dx, ma, mb);
                        let count = (r1 - r0) * (c1 - c0);
                        if count == 0 || count < self.min_overlap {
                            return 0.0;
                        }
                        let br0 = (r0 as isize - dy) as usize;
                        let bc0 = (c0 as isize - dx) as usize;
                        let (h, w) = (r1 - r0, c1 - c0);

                        let mut cross = 0.0;
                        for r in 0..h {
                            for c in 0..w {
                                cross += a[(r0 + r, c0 + c)] * b[(br0 + r, bc0 + c)];
                            }
                        }

                        let window = Window {
                            count: count as f64,
                            sum_a: sum_a.window(r0, c0, h, w),
                            sum_a2: sum_a2.window(r0, c0, h, w),
                            sum_b: sum_b.window(br0, bc0, h, w),
                            sum_b2: sum_b2.window(br0, bc0, h, w),
                            cross,
                        };
                        window.correlation()
                    })
                    .collect()
            })
            .collect();

        DMatrix::from_fn(out_rows, out_cols, |i, j| rows[i][j])
    }
}

/// Overlapping index range in the first grid for shift `d`
fn overlap(d: isize, len_a: usize, len_b: usize) -> (usize, usize) {
    let start = d.max(0) as usize;
    let end = (len_b as isize + d).min(len_a as isize).max(0) as usize;
    (start.min(end), end)
}

struct Window {
    count: f64,
    sum_a: f64,
    sum_a2: f64,
    sum_b: f64,
    sum_b2: f64,
    cross: f64,
}

impl Window {
    fn correlation(&self) -> f64 {
        let var_a = (self.sum_a2 - self.sum_a * self.sum_a / self.count).max(0.0);
        let var_b = (self.sum_b2 - self.sum_b * self.sum_b / self.count).max(0.0);
        let flat_a = var_a <= flatness_tolerance(self.sum_a2);
        let flat_b = var_b <= flatness_tolerance(self.sum_b2);

        match (flat_a, flat_b) {
            (true, true) => {
                // Two constant windows correlate perfectly only if they agree
                let mean_a = self.sum_a / self.count;
                let mean_b = self.sum_b / self.count;
                let scale = mean_a.abs().max(mean_b.abs()).max(1.0);
                if (mean_a - mean_b).abs() <= 1e-9 * scale {
                    1.0
                } else {
                    0.0
                }
            }
            (false, false) => {
                let numerator = self.cross - self.sum_a * self.sum_b / self.count;
                (numerator / (var_a * var_b).sqrt()).clamp(-1.0, 1.0)
            }
            _ => 0.0,
        }
    }
}

fn flatness_tolerance(sum_sq: f64) -> f64 {
    1e-10 * (1.0 + sum_sq)
}

/// Summed-area table with a zero border row and column
struct SummedArea {
    table: DMatrix<f64>,
}

impl SummedArea {
    fn new(m: &DMatrix<f64>, f: impl Fn(f64) -> f64) -> Self {
        let (nrows, ncols) = m.shape();
        let mut table = DMatrix::zeros(nrows + 1, ncols + 1);
        for r in 0..nrows {
            for c in 0..ncols {
                table[(r + 1, c + 1)] =
                    f(m[(r, c)]) + table[(r, c + 1)] + table[(r + 1, c)] - table[(r, c)];
            }
        }
        Self { table }
    }

    fn window(&self, r0: usize, c0: usize, h: usize, w: usize) -> f64 {
        let t = &self.table;
        t[(r0 + h, c0 + w)] - t[(r0, c0 + w)] - t[(r0 + h, c0)] + t[(r0, c0)]
    }
}
