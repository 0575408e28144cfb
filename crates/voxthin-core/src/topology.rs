//! Digital topologies on the cubic lattice.

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// Lattice adjacency relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Adjacency {
    /// Face neighbors.
    Six,
    /// Face and edge neighbors.
    Eighteen,
    /// Face, edge and vertex neighbors.
    TwentySix,
}

impl Adjacency {
    /// Returns whether two points at lattice offset `offset` are adjacent.
    ///
    /// A point is not adjacent to itself.
    #[must_use]
    pub fn is_adjacent_offset(self, offset: IVec3) -> bool {
        let a = offset.abs();
        if a.max_element() != 1 {
            return false;
        }
        let nonzero = (a.x + a.y + a.z) as u32;
        nonzero <= self.max_nonzero()
    }

    #[must_use]
    pub fn are_adjacent(self, a: IVec3, b: IVec3) -> bool {
        self.is_adjacent_offset(b - a)
    }

    fn max_nonzero(self) -> u32 {
        match self {
            Self::Six => 1,
            Self::Eighteen => 2,
            Self::TwentySix => 3,
        }
    }
}

/// The (object, background) adjacency pair of a digital object.
///
/// Only complementary pairs are offered so that the Jordan property holds and
/// simple-point characterizations apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DigitalTopology {
    /// 26-adjacency for the object, 6-adjacency for the background.
    #[default]
    Adj26_6,
    /// 6-adjacency for the object, 26-adjacency for the background.
    Adj6_26,
}

impl DigitalTopology {
    #[must_use]
    pub fn foreground(self) -> Adjacency {
        match self {
            Self::Adj26_6 => Adjacency::TwentySix,
            Self::Adj6_26 => Adjacency::Six,
        }
    }

    #[must_use]
    pub fn background(self) -> Adjacency {
        match self {
            Self::Adj26_6 => Adjacency::Six,
            Self::Adj6_26 => Adjacency::TwentySix,
        }
    }
}
