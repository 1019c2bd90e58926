// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Border coverage across fields and walls
//!
//! Every (field, wall) pair is evaluated and kept in the report. The scalar
//! border coverage is the best of those values.

use crate::arena::ArenaShape;
use crate::config::{CoverageConfig, ResolvedCoverage};
use crate::coverage::wall_coverage;
use crate::error::{Error, Result};
use crate::field::{Field, FieldSet};
use crate::walls::Wall;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Coverage of one wall by one field
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WallCoverage {
    pub wall: Wall,
    /// Position of the field in the supplied collection
    pub field_index: usize,
    /// `None` when the wall has no valid adjacent sites
    pub coverage: Option<f64>,
}

/// All evaluations of a border coverage run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BorderCoverage {
    /// Field-major, walls in top, right, bottom, left order
    pub evaluations: Vec<WallCoverage>,
}

impl BorderCoverage {
    /// Best coverage over all fields and walls, 0.0 if none is defined
    pub fn coverage(&self) -> f64 {
        self.best().and_then(|e| e.coverage).unwrap_or(0.0)
    }

    /// The first evaluation reaching the best coverage
    pub fn best(&self) -> Option<&WallCoverage> {
        let mut best: Option<&WallCoverage> = None;
        for eval in &self.evaluations {
            let Some(c) = eval.coverage else { continue };
            if best.and_then(|b| b.coverage).map_or(true, |b| c > b) {
                best = Some(eval);
            }
        }
        best
    }

    /// Best coverage of a single wall over all fields
    pub fn wall_best(&self, wall: Wall) -> Option<f64> {
        self.evaluations
            .iter()
            .filter(|e| e.wall == wall)
            .filter_map(|e| e.coverage)
            .reduce(f64::max)
    }
}

/// Border coverage of `fields` with the given configuration
pub fn border_coverage(fields: &FieldSet, config: &CoverageConfig) -> Result<BorderCoverage> {
    let resolved = config.resolve()?;
    border_coverage_resolved(fields.as_slice(), &resolved)
}

/// Border coverage with already validated parameters
pub fn border_coverage_resolved(
    fields: &[Field],
    params: &ResolvedCoverage,
) -> Result<BorderCoverage> {
    match params.arena_shape {
        ArenaShape::Rectangular => {}
        ArenaShape::Linear => {
            tracing::warn!("linear arena: using rectangular border coverage");
        }
        ArenaShape::Circular => {
            return Err(Error::NotSupported(
                "border coverage for circular arenas".into(),
            ));
        }
    }

    let walls: Vec<Wall> = params.walls.iter().collect();
    let search_width = params.search_width;

    let evaluations: Vec<WallCoverage> = fields
        .par_iter()
        .enumerate()
        .flat_map_iter(|(field_index, field)| {
            let walls = walls.clone();
            walls.into_iter().map(move |wall| {
                let strip = wall.canonical_strip(&field.field_map, search_width);
                let coverage = wall_coverage(&strip);
                if coverage.is_none() {
                    tracing::warn!(field_index, %wall, "no valid wall-adjacent sites");
                }
                tracing::debug!(field_index, %wall, ?coverage, "wall coverage");
                WallCoverage {
                    wall,
                    field_index,
                    coverage,
                }
            })
        })
        .collect();

    Ok(BorderCoverage { evaluations })
}
