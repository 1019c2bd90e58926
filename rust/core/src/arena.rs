// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena shape and size keywords

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const SHAPES_RECTANGULAR: &[&str] = &["square", "rectangle", "rectangular", "rect", "s", "r"];
const SHAPES_CIRCULAR: &[&str] = &["circ", "circular", "circle", "c"];
const SHAPES_LINEAR: &[&str] = &["linear", "line", "l"];

/// Arena geometry category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArenaShape {
    /// Squares and rectangles
    Rectangular,
    Circular,
    /// Linear tracks
    Linear,
}

impl ArenaShape {
    /// Resolve a shape name or alias, case-insensitively
    pub fn parse(shape: &str) -> Result<Self> {
        let key = shape.trim().to_lowercase();
        if SHAPES_RECTANGULAR.contains(&key.as_str()) {
            Ok(ArenaShape::Rectangular)
        } else if SHAPES_CIRCULAR.contains(&key.as_str()) {
            Ok(ArenaShape::Circular)
        } else if SHAPES_LINEAR.contains(&key.as_str()) {
            Ok(ArenaShape::Linear)
        } else {
            Err(Error::NotSupported(format!(
                "arena shape '{}' not implemented",
                shape
            )))
        }
    }
}

impl fmt::Display for ArenaShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArenaShape::Rectangular => "rectangular",
            ArenaShape::Circular => "circular",
            ArenaShape::Linear => "linear",
        };
        f.write_str(name)
    }
}

/// Physical arena size, in the caller's length unit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ArenaSize {
    /// Length of a linear track
    Length(f64),
    /// Width and height of a 2D arena
    Area([f64; 2]),
}

impl ArenaSize {
    /// Validate an arena size keyword for data of `dim` spatial dimensions.
    ///
    /// Accepts a number, a numeric string, or a pair (2D only). A single value
    /// given for 2D data describes a square arena.
    pub fn from_value(value: &serde_json::Value, dim: usize) -> Result<Self> {
        if dim != 1 && dim != 2 {
            return Err(Error::NotSupported(format!(
                "arena size for {}-dimensional data",
                dim
            )));
        }
        match value {
            serde_json::Value::Array(items) => {
                if dim == 1 {
                    return Err(Error::DimensionMismatch {
                        expected: 1,
                        actual: items.len(),
                    });
                }
                if items.len() != 2 {
                    return Err(Error::DimensionMismatch {
                        expected: 2,
                        actual: items.len(),
                    });
                }
                let width = positive_length(&items[0])?;
                let height = positive_length(&items[1])?;
                Ok(ArenaSize::Area([width, height]))
            }
            scalar => {
                let side = positive_length(scalar)?;
                Ok(if dim == 1 {
                    ArenaSize::Length(side)
                } else {
                    ArenaSize::Area([side, side])
                })
            }
        }
    }

    pub fn is_2d(&self) -> bool {
        matches!(self, ArenaSize::Area(_))
    }
}

fn positive_length(value: &serde_json::Value) -> Result<f64> {
    let length = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| Error::invalid(format!("arena size {} is not a number", value)))?;

    if !length.is_finite() || length <= 0.0 {
        return Err(Error::invalid(format!(
            "arena size must be positive, got {}",
            length
        )));
    }
    Ok(length)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_shape_aliases() {
        assert_eq!(ArenaShape::parse("Square").unwrap(), ArenaShape::Rectangular);
        assert_eq!(ArenaShape::parse("rect").unwrap(), ArenaShape::Rectangular);
        assert_eq!(ArenaShape::parse("CIRCLE").unwrap(), ArenaShape::Circular);
        assert_eq!(ArenaShape::parse(" line ").unwrap(), ArenaShape::Linear);
    }

    #[test]
    fn test_unknown_shape_not_supported() {
        let err = ArenaShape::parse("hexagon").unwrap_err();
        assert!(matches!(err, Error::NotSupported(_)));
        assert!(err.to_string().contains("hexagon"));
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(matches!(
            ArenaSize::from_value(&json!(-1), 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ArenaSize::from_value(&json!(-1), 2),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ArenaSize::from_value(&json!(0), 1),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            ArenaSize::from_value(&json!(80), 3),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            ArenaSize::from_value(&json!(80), 0),
            Err(Error::NotSupported(_))
        ));
        assert!(matches!(
            ArenaSize::from_value(&json!([80, 80]), 1),
            Err(Error::DimensionMismatch { .. })
        ));
        assert!(ArenaSize::from_value(&json!("eighty"), 1).is_err());
    }

    #[test]
    fn test_1d_sizes() {
        let size = ArenaSize::from_value(&json!(80), 1).unwrap();
        assert_eq!(size, ArenaSize::Length(80.0));
        assert!(!size.is_2d());
        assert_eq!(ArenaSize::from_value(&json!("80"), 1).unwrap(), ArenaSize::Length(80.0));
    }

    #[test]
    fn test_2d_sizes() {
        let square = ArenaSize::from_value(&json!(80), 2).unwrap();
        assert_eq!(square, ArenaSize::Area([80.0, 80.0]));
        assert!(square.is_2d());

        let rect = ArenaSize::from_value(&json!([80, 120]), 2).unwrap();
        assert_eq!(rect, ArenaSize::Area([80.0, 120.0]));
    }
}
