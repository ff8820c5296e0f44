//! Coordinate lookup — parse `"x,y"` room queries.

use crate::geometry::RoomCoordinate;

/// Message shown for any malformed query.
pub const FORMAT_HINT: &str = "Invalid format. Use: x,y";

/// Parse `"x,y"` (whitespace around either part is ignored).
pub fn parse_coordinate(input: &str) -> Result<RoomCoordinate, LookupError> {
    let mut parts = input.trim().split(',');
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(LookupError::Format(input.to_string()));
    };

    let x = x
        .trim()
        .parse::<i32>()
        .map_err(|_| LookupError::Format(input.to_string()))?;
    let y = y
        .trim()
        .parse::<i32>()
        .map_err(|_| LookupError::Format(input.to_string()))?;

    Ok(RoomCoordinate::new(x, y))
}

/// Errors from parsing a lookup query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The raw input that failed to parse.
    Format(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Format(_) => write!(f, "{}", FORMAT_HINT),
        }
    }
}

impl std::error::Error for LookupError {}
