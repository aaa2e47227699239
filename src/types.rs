use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Port side of a logic block. The names double as pin ids in the pin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    North,
    South,
    East,
    West,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 6] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
        Direction::Up,
        Direction::Down,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::North => "NORTH",
            Direction::South => "SOUTH",
            Direction::East => "EAST",
            Direction::West => "WEST",
            Direction::Up => "UP",
            Direction::Down => "DOWN",
        }
    }
}

/// Returned when a token is not one of the six direction names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction '{0}'")]
pub struct UnknownDirection(pub String);

impl FromStr for Direction {
    type Err = UnknownDirection;

    // Exact, case-sensitive spelling only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::ALL
            .iter()
            .find(|direction| direction.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownDirection(s.to_string()))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Direction> for String {
    fn from(value: Direction) -> Self {
        value.as_str().to_string()
    }
}
