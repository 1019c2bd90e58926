// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Analysis parameters and their defaults

use crate::arena::ArenaShape;
use crate::error::{Error, Result};
use crate::walls::{validate_wall_value, WallSet};
use serde::{Deserialize, Serialize};

/// Rows/columns examined next to each wall
pub const DEFAULT_SEARCH_WIDTH: usize = 8;
/// All four walls
pub const DEFAULT_WALLS: &str = "trbl";
pub const DEFAULT_ARENA_SHAPE: &str = "square";
/// Angular histogram resolution, 2 degrees per bin
pub const DEFAULT_ANGULAR_BINS: usize = 180;

/// Parameters of border coverage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoverageConfig {
    /// Rows/columns within this many bins of a wall are searched
    pub search_width: usize,
    /// Wall specifier, e.g. `"trbl"` or `"BL"`
    pub walls: String,
    /// Arena shape name or alias
    pub arena_shape: String,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            search_width: DEFAULT_SEARCH_WIDTH,
            walls: DEFAULT_WALLS.into(),
            arena_shape: DEFAULT_ARENA_SHAPE.into(),
        }
    }
}

/// Parameters after validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedCoverage {
    pub search_width: usize,
    pub walls: WallSet,
    pub arena_shape: ArenaShape,
}

impl CoverageConfig {
    /// Read a loosely typed JSON object; absent keys keep their defaults
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| Error::invalid(format!("coverage config must be an object, got {}", value)))?;
        let mut config = Self::default();

        if let Some(width) = object.get("search_width") {
            config.search_width = width
                .as_u64()
                .map(|w| w as usize)
                .ok_or_else(|| {
                    Error::invalid(format!("search_width must be a positive integer, got {}", width))
                })?;
        }
        if let Some(walls) = object.get("walls") {
            config.walls = validate_wall_value(walls)?;
        }
        if let Some(shape) = object.get("arena_shape") {
            config.arena_shape = shape
                .as_str()
                .ok_or_else(|| Error::invalid(format!("arena_shape must be a string, got {}", shape)))?
                .to_string();
        }
        Ok(config)
    }

    /// Check every parameter; the shape is checked first
    pub fn resolve(&self) -> Result<ResolvedCoverage> {
        let arena_shape = ArenaShape::parse(&self.arena_shape)?;
        let walls = WallSet::parse(&self.walls)?;
        if self.search_width == 0 {
            return Err(Error::invalid("search_width must be at least 1"));
        }
        Ok(ResolvedCoverage {
            search_width: self.search_width,
            walls,
            arena_shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let resolved = CoverageConfig::default().resolve().unwrap();
        assert_eq!(resolved.search_width, 8);
        assert_eq!(resolved.walls, WallSet::all());
        assert_eq!(resolved.arena_shape, ArenaShape::Rectangular);
    }

    #[test]
    fn test_from_json_partial() {
        let config = CoverageConfig::from_json(&json!({"walls": "BL", "search_width": 3})).unwrap();
        assert_eq!(config.walls, "bl");
        assert_eq!(config.search_width, 3);
        assert_eq!(config.arena_shape, DEFAULT_ARENA_SHAPE);
    }

    #[test]
    fn test_from_json_rejects_non_string_walls() {
        assert!(matches!(
            CoverageConfig::from_json(&json!({"walls": 12})),
            Err(Error::InvalidArgument(_))
        ));
        assert!(CoverageConfig::from_json(&json!({"search_width": -2})).is_err());
    }

    #[test]
    fn test_resolve_rejects_zero_width() {
        let config = CoverageConfig {
            search_width: 0,
            ..Default::default()
        };
        assert!(config.resolve().is_err());
    }
}
