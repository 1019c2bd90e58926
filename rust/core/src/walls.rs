// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena walls
//!
//! Walls are named from a fixed top-down camera view. Because maps are
//! stored row 0 first, the "bottom" wall is the first row of the grid and
//! the "top" wall is the last row.

use crate::error::{Error, Result};
use crate::grid::MaskedGrid;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Characters accepted in a wall specifier
const WALL_CHARS: [char; 4] = ['t', 'r', 'b', 'l'];

/// One arena wall
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Wall {
    Top,
    Right,
    Bottom,
    Left,
}

impl Wall {
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];

    fn from_char(c: char) -> Option<Wall> {
        match c.to_ascii_lowercase() {
            't' => Some(Wall::Top),
            'r' => Some(Wall::Right),
            'b' => Some(Wall::Bottom),
            'l' => Some(Wall::Left),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Wall::Top => 't',
            Wall::Right => 'r',
            Wall::Bottom => 'b',
            Wall::Left => 'l',
        }
    }

    /// Extract the `search_width` rows/columns adjacent to this wall and
    /// reorient them so that column 0 touches the wall and column index
    /// grows with distance from it.
    ///
    /// The result has one row per position along the wall. A search width
    /// wider than the map is truncated to the map.
    pub fn canonical_strip(&self, field_map: &MaskedGrid, search_width: usize) -> MaskedGrid {
        match self {
            Wall::Left => field_map.first_columns(search_width),
            Wall::Right => field_map.last_columns(search_width).mirror_horizontal(),
            Wall::Bottom => field_map.first_rows(search_width).rotate_ccw(),
            Wall::Top => field_map
                .last_rows(search_width)
                .rotate_ccw()
                .mirror_horizontal(),
        }
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Wall::Top => "top",
            Wall::Right => "right",
            Wall::Bottom => "bottom",
            Wall::Left => "left",
        };
        f.write_str(name)
    }
}

/// Check a wall specifier such as `"trbl"` or `"BL"`.
///
/// Returns the lower-cased specifier.
pub fn validate_wall_definition(walls: &str) -> Result<String> {
    let count = walls.chars().count();
    if count > 4 {
        return Err(Error::invalid(format!(
            "wall definition may not exceed 4 characters; '{}' contains {}",
            walls, count
        )));
    }
    if count == 0 {
        return Err(Error::invalid(
            "wall definition must contain at least 1 character from [t, r, b, l]",
        ));
    }
    let lowered = walls.to_lowercase();
    let bad: String = lowered.chars().filter(|c| !WALL_CHARS.contains(c)).collect();
    if !bad.is_empty() {
        return Err(Error::invalid(format!(
            "character(s) '{}' not valid in wall definition; valid characters are [t, r, b, l]",
            bad
        )));
    }
    Ok(lowered)
}

/// Same as [`validate_wall_definition`] for a loosely typed JSON value
pub fn validate_wall_value(walls: &serde_json::Value) -> Result<String> {
    match walls {
        serde_json::Value::String(s) => validate_wall_definition(s),
        other => Err(Error::invalid(format!(
            "wall definition must be given as a string, e.g. 'trbl'; {} is not a valid input",
            other
        ))),
    }
}

/// Canonical set of walls, iterated in top, right, bottom, left order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WallSet {
    bits: u8,
}

impl WallSet {
    pub fn all() -> Self {
        Wall::ALL.iter().copied().collect()
    }

    /// Parse and validate a specifier; duplicates collapse
    pub fn parse(walls: &str) -> Result<Self> {
        let lowered = validate_wall_definition(walls)?;
        Ok(lowered.chars().filter_map(Wall::from_char).collect())
    }

    pub fn insert(&mut self, wall: Wall) {
        self.bits |= Self::bit(wall);
    }

    pub fn contains(&self, wall: Wall) -> bool {
        self.bits & Self::bit(wall) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Wall> + '_ {
        Wall::ALL.into_iter().filter(move |w| self.contains(*w))
    }

    fn bit(wall: Wall) -> u8 {
        match wall {
            Wall::Top => 1,
            Wall::Right => 2,
            Wall::Bottom => 4,
            Wall::Left => 8,
        }
    }
}

impl FromIterator<Wall> for WallSet {
    fn from_iter<I: IntoIterator<Item = Wall>>(iter: I) -> Self {
        let mut set = WallSet::default();
        for wall in iter {
            set.insert(wall);
        }
        set
    }
}

impl fmt::Display for WallSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for wall in self.iter() {
            write!(f, "{}", wall.as_char())?;
        }
        Ok(())
    }
}
