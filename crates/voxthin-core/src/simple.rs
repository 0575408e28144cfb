//! Brute-force simple point characterization.
//!
//! A point `x` of an object `X` is simple when both topological numbers equal
//! one: `T(x, X)`, the number of object components in the (geodesic)
//! neighborhood of `x`, and `T̄(x, X)`, the same count for the background.
//! For the 6-adjacency the geodesic neighborhood `N6²` is used: the 6-neighbors
//! in the set plus the 18-neighbors 6-reachable from them inside the set.

use crate::configuration::{
    adjacency_table, count_components, Configuration, ALL_NEIGHBORS, EIGHTEEN_NEIGHBORS,
    SIX_NEIGHBORS,
};
use crate::error::{Result, ThinningError};
use crate::oracle::SimplePointOracle;
use crate::topology::{Adjacency, DigitalTopology};

/// Number of `adjacency`-components of the geodesic neighborhood of the
/// center restricted to the neighbor set `set`.
#[must_use]
pub fn topological_number(set: u32, adjacency: Adjacency) -> u32 {
    let set = set & ALL_NEIGHBORS;
    match adjacency {
        Adjacency::Six => {
            let table = adjacency_table(Adjacency::Six);
            let first = set & SIX_NEIGHBORS;
            let mut geodesic = first;
            let mut rest = first;
            while rest != 0 {
                let i = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                geodesic |= table[i] & set & EIGHTEEN_NEIGHBORS;
            }
            count_components(geodesic, table)
        }
        Adjacency::Eighteen => {
            let table = adjacency_table(Adjacency::Eighteen);
            count_components(set & EIGHTEEN_NEIGHBORS, table)
        }
        Adjacency::TwentySix => count_components(set, adjacency_table(Adjacency::TwentySix)),
    }
}

/// Returns whether the center of `configuration` is simple for `topology`.
#[must_use]
pub fn is_simple_configuration(configuration: Configuration, topology: DigitalTopology) -> bool {
    let object = configuration.bits();
    let background = configuration.complement().bits();
    topological_number(object, topology.foreground()) == 1
        && topological_number(background, topology.background()) == 1
}

/// Simple point oracle evaluating topological numbers directly.
///
/// Slower than a [`crate::LookupTable`] but needs no precomputed data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometricSimplicity {
    topology: DigitalTopology,
}

impl GeometricSimplicity {
    #[must_use]
    pub fn new(topology: DigitalTopology) -> Self {
        Self { topology }
    }

    #[must_use]
    pub fn topology(&self) -> DigitalTopology {
        self.topology
    }
}

impl SimplePointOracle for GeometricSimplicity {
    fn is_simple(&self, configuration: Configuration) -> Result<bool> {
        if !configuration.is_valid() {
            return Err(ThinningError::MalformedTable(format!(
                "configuration {:#x} has bits outside the 26-neighborhood",
                configuration.bits()
            )));
        }
        Ok(is_simple_configuration(configuration, self.topology))
    }
}
