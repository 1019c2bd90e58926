// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Angular occupancy: how often the animal faced each direction

use crate::config::DEFAULT_ANGULAR_BINS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Gaussian kernels are cut off at this many standard deviations
const GAUSSIAN_TRUNCATE: f64 = 4.0;

/// Parameters of the angular histogram
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AngularConfig {
    /// Number of equal bins over [0, 2π)
    pub bins: usize,
    /// Standard deviation of the smoothing kernel, in bins. No smoothing if unset.
    pub sigma: Option<f64>,
}

impl Default for AngularConfig {
    fn default() -> Self {
        Self {
            bins: DEFAULT_ANGULAR_BINS,
            sigma: None,
        }
    }
}

/// Histogram of head angles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AngularOccupancy {
    /// Sample count per bin, smoothed if requested
    pub histogram: Vec<f64>,
    /// False where the bin received no samples before smoothing
    pub valid: Vec<bool>,
    /// `bins + 1` bin edges in radians
    pub bin_edges: Vec<f64>,
}

/// Angular occupancy of `head_angle` samples (radians).
///
/// Samples outside [0, 2π] and NaN are ignored; 2π falls in the last bin.
pub fn angular_occupancy(head_angle: &[f64], config: &AngularConfig) -> Result<AngularOccupancy> {
    let bins = config.bins;
    if bins == 0 {
        return Err(Error::invalid("angular occupancy needs at least one bin"));
    }
    if let Some(sigma) = config.sigma {
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(Error::invalid(format!(
                "smoothing sigma must be positive, got {}",
                sigma
            )));
        }
    }

    let bin_edges: Vec<f64> = (0..=bins).map(|i| TAU * i as f64 / bins as f64).collect();

    let mut counts = vec![0.0; bins];
    let mut ignored = 0usize;
    for &angle in head_angle {
        if !(0.0..=TAU).contains(&angle) {
            ignored += 1;
            continue;
        }
        counts[locate_bin(&bin_edges, angle)] += 1.0;
    }
    if ignored > 0 {
        tracing::debug!(ignored, "head angles outside [0, 2pi] ignored");
    }

    let valid = counts.iter().map(|&c| c > 0.0).collect();
    let histogram = match config.sigma {
        Some(sigma) => gaussian_filter_nearest(&counts, sigma),
        None => counts,
    };
    Ok(AngularOccupancy {
        histogram,
        valid,
        bin_edges,
    })
}

/// Index of the half-open bin `[edges[i], edges[i + 1])` holding `value`;
/// the last bin is closed on the right
fn locate_bin(edges: &[f64], value: f64) -> usize {
    let bins = edges.len() - 1;
    let span = edges[bins] - edges[0];
    let mut bin = (((value - edges[0]) / span) * bins as f64).floor() as usize;
    bin = bin.min(bins - 1);
    if bin > 0 && value < edges[bin] {
        bin -= 1;
    } else if bin + 1 < bins && value >= edges[bin + 1] {
        bin += 1;
    }
    bin
}

/// 1D Gaussian smoothing, extending the signal with its edge values
pub fn gaussian_filter_nearest(values: &[f64], sigma: f64) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let radius = (GAUSSIAN_TRUNCATE * sigma + 0.5) as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let total: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= total);

    let last = values.len() as isize - 1;
    (0..values.len() as isize)
        .map(|i| {
            kernel
                .iter()
                .zip(-radius..=radius)
                .map(|(w, k)| w * values[(i + k).clamp(0, last) as usize])
                .sum::<f64>()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_bins() {
        let occ = angular_occupancy(&[0.1, 3.0], &AngularConfig::default()).unwrap();
        assert_eq!(occ.histogram.len(), 180);
        assert_eq!(occ.bin_edges.len(), 181);
        assert_relative_eq!(occ.bin_edges[180], TAU);
        assert_relative_eq!(occ.histogram.iter().sum::<f64>(), 2.0);
    }

    #[test]
    fn test_counts_and_validity() {
        let config = AngularConfig {
            bins: 4,
            sigma: None,
        };
        let angles = [0.1, 0.2, 2.0, TAU, -0.5, f64::NAN, 7.0];
        let occ = angular_occupancy(&angles, &config).unwrap();
        assert_eq!(occ.histogram, vec![2.0, 1.0, 0.0, 1.0]);
        assert_eq!(occ.valid, vec![true, true, false, true]);
    }

    #[test]
    fn test_samples_on_edges_fall_in_upper_bin() {
        let config = AngularConfig::default();
        let edges = angular_occupancy(&[], &config).unwrap().bin_edges;
        for i in 0..config.bins {
            let occ = angular_occupancy(&[edges[i]], &config).unwrap();
            assert_eq!(occ.histogram[i], 1.0, "edge {i}");
        }
    }

    #[test]
    fn test_whole_degrees_match_returned_edges() {
        let angles: Vec<f64> = (0..360).map(|d| (d as f64).to_radians()).collect();
        let config = AngularConfig::default();
        let edges = angular_occupancy(&[], &config).unwrap().bin_edges;
        for &angle in &angles {
            let bin = locate_bin(&edges, angle);
            assert!(edges[bin] <= angle && angle < edges[bin + 1], "angle {angle}");
        }
        assert_eq!(locate_bin(&edges, TAU), config.bins - 1);
    }

    #[test]
    fn test_smoothing_keeps_unsmoothed_validity() {
        let config = AngularConfig {
            bins: 8,
            sigma: Some(1.0),
        };
        let occ = angular_occupancy(&[0.1; 10], &config).unwrap();
        assert!(occ.histogram[1] > 0.0);
        assert!(!occ.valid[1]);
        assert!(occ.valid[0]);
    }

    #[test]
    fn test_gaussian_preserves_constant_signal() {
        let smoothed = gaussian_filter_nearest(&[2.0; 6], 1.5);
        for v in smoothed {
            assert_relative_eq!(v, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rejects_bad_config() {
        assert!(angular_occupancy(&[], &AngularConfig { bins: 0, sigma: None }).is_err());
        assert!(angular_occupancy(&[], &AngularConfig { bins: 4, sigma: Some(0.0) }).is_err());
    }
}
