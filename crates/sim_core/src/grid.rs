//! Grid geometry: locations on an integer grid and the Manhattan metric.
//!
//! All travel in the simulation happens on a rectangular grid; the distance
//! between two locations is `|Δrow| + |Δcol|` and travel time is that
//! distance divided by the driver's speed, rounded to the nearest tick.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A two-dimensional grid location. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub row: i64,
    pub col: i64,
}

impl Location {
    pub fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

/// Error parsing a `"row,col"` location string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLocationError {
    pub input: String,
}

impl fmt::Display for ParseLocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid location '{}': expected 'row,col'", self.input)
    }
}

impl std::error::Error for ParseLocationError {}

impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseLocationError {
            input: s.to_string(),
        };
        let (row, col) = s.split_once(',').ok_or_else(err)?;
        Ok(Location {
            row: row.trim().parse().map_err(|_| err())?,
            col: col.trim().parse().map_err(|_| err())?,
        })
    }
}

/// Manhattan distance between two locations.
pub fn manhattan_distance(origin: Location, destination: Location) -> u64 {
    origin.row.abs_diff(destination.row) + origin.col.abs_diff(destination.col)
}

/// Travel time in ticks for `distance / speed`, rounded to the nearest
/// integer (ties away from zero).
///
/// Precondition: `speed > 0`.
pub fn travel_time(origin: Location, destination: Location, speed: u64) -> u64 {
    debug_assert!(speed > 0, "driver speed must be positive");
    let distance = manhattan_distance(origin, destination);
    (distance as f64 / speed as f64).round() as u64
}
