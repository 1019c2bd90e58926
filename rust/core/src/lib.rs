// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # ArenaMap Core
//!
//! Spatial statistics over firing maps from place-cell and grid-cell
//! recordings:
//! 1. Autocorrelograms of rate maps, cropped to the reliable central lags
//! 2. Border coverage: how completely a firing field runs along the arena walls
//! 3. Angular occupancy histograms of head direction
//!
//! Maps are row-major with row 0 at the top, as delivered by the tracking
//! camera. Seen from above, the first row is the *bottom* wall.
//!
//! # Usage
//!
//! ```rust,ignore
//! use arenamap_core::{border_coverage, CoverageConfig, FieldSet};
//!
//! let fields = FieldSet::from_json(&detected_fields)?;
//! let report = border_coverage(&fields, &CoverageConfig::default())?;
//! println!("coverage = {}", report.coverage());
//! ```

pub mod arena;
pub mod autocorrelation;
pub mod border;
pub mod config;
pub mod coverage;
pub mod error;
pub mod field;
pub mod grid;
pub mod occupancy;
pub mod walls;
pub mod xcorr;

pub use arena::{ArenaShape, ArenaSize};
pub use autocorrelation::{autocorrelation, autocorrelation_with, Autocorrelogram, OVERLAP_AMOUNT};
pub use border::{border_coverage, border_coverage_resolved, BorderCoverage, WallCoverage};
pub use config::{CoverageConfig, ResolvedCoverage};
pub use coverage::{count_wall_sites, wall_coverage, SiteCounts};
pub use error::{Error, Result};
pub use field::{Field, FieldSet};
pub use grid::{matrix_rows, FieldMap, FiringMap, MaskedGrid};
pub use occupancy::{angular_occupancy, AngularConfig, AngularOccupancy};
pub use walls::{validate_wall_definition, validate_wall_value, Wall, WallSet};
pub use xcorr::{CrossCorrelation, NormXCorr2};
