use std::fmt;
use std::ops::Add;
use serde::{Deserialize, Serialize};

/// Vertex identifier as it appears in the edge data
pub type VertexId = u64;

/// Length of a shortest path, or the sentinel for a vertex that cannot be reached.
///
/// `Unreachable` orders after every finite distance, so `min` over a set of
/// candidate distances naturally prefers any finite value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Distance {
    Finite(u64),
    Unreachable,
}

impl Distance {
    pub const ZERO: Distance = Distance::Finite(0);

    pub fn is_finite(&self) -> bool {
        matches!(self, Distance::Finite(_))
    }

    pub fn value(&self) -> Option<u64> {
        match self {
            Distance::Finite(d) => Some(*d),
            Distance::Unreachable => None,
        }
    }
}

impl Default for Distance {
    fn default() -> Self {
        Distance::Unreachable
    }
}

impl From<u64> for Distance {
    fn from(value: u64) -> Self {
        Distance::Finite(value)
    }
}

impl Add for Distance {
    type Output = Distance;

    fn add(self, rhs: Distance) -> Distance {
        match (self, rhs) {
            (Distance::Finite(a), Distance::Finite(b)) => Distance::Finite(a.saturating_add(b)),
            _ => Distance::Unreachable,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Finite(d) => write!(f, "{}", d),
            Distance::Unreachable => write!(f, "inf"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_is_greatest() {
        assert!(Distance::Finite(u64::MAX) < Distance::Unreachable);
        assert_eq!(
            [Distance::Unreachable, Distance::Finite(4), Distance::Finite(2)].iter().min(),
            Some(&Distance::Finite(2))
        );
    }

    #[test]
    fn test_addition() {
        assert_eq!(Distance::Finite(2) + Distance::Finite(3), Distance::Finite(5));
        assert_eq!(Distance::Finite(2) + Distance::Unreachable, Distance::Unreachable);
        // a huge finite sum stays reachable
        assert_eq!(Distance::Finite(u64::MAX) + Distance::Finite(1), Distance::Finite(u64::MAX));
        assert!(Distance::Finite(u64::MAX - 1) + Distance::Finite(5) < Distance::Unreachable);
    }

    #[test]
    fn test_display() {
        assert_eq!(Distance::Finite(3).to_string(), "3");
        assert_eq!(Distance::Unreachable.to_string(), "inf");
        assert_eq!(Distance::ZERO.value(), Some(0));
    }
}
