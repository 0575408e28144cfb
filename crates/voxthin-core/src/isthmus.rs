//! Brute-force isthmus classification.
//!
//! The punctured neighborhood `N*(x) ∩ X` is reduced by sequential simple
//! point deletion until stable. `x` is a 1-isthmus when the residue is a
//! 0-surface (two non-adjacent points) and a 2-isthmus when it is a 1-surface
//! (a simple closed curve).

use glam::IVec3;

use crate::configuration::Configuration;
use crate::error::{Result, ThinningError};
use crate::options::IsthmusMode;
use crate::oracle::IsthmusOracle;
use crate::simple::is_simple_configuration;
use crate::topology::{Adjacency, DigitalTopology};

/// Classification of a punctured neighborhood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsthmusKind {
    None,
    /// Neighborhood homotopic to two points: `x` joins two branches.
    One,
    /// Neighborhood homotopic to a circle: `x` lies inside a thin sheet.
    Two,
}

impl IsthmusKind {
    #[must_use]
    pub fn is_protected_by(self, mode: IsthmusMode) -> bool {
        match mode {
            IsthmusMode::Full => self != Self::None,
            IsthmusMode::OneIsthmus => self == Self::One,
        }
    }
}

/// Lattice points in the 5x5x5 box centered on the origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Patch(u128);

impl Patch {
    fn bit(offset: IVec3) -> Option<u32> {
        if offset.abs().max_element() > 2 {
            return None;
        }
        let o = offset + IVec3::splat(2);
        Some((o.x + 5 * o.y + 25 * o.z) as u32)
    }

    fn offset(bit: u32) -> IVec3 {
        let b = bit as i32;
        IVec3::new(b % 5, (b / 5) % 5, b / 25) - IVec3::splat(2)
    }

    fn from_configuration(configuration: Configuration) -> Self {
        let mut patch = Self::default();
        for o in configuration.occupied_offsets() {
            patch.insert(o);
        }
        patch
    }

    fn contains(self, offset: IVec3) -> bool {
        Self::bit(offset).is_some_and(|b| (self.0 >> b) & 1 == 1)
    }

    fn insert(&mut self, offset: IVec3) {
        if let Some(b) = Self::bit(offset) {
            self.0 |= 1 << b;
        }
    }

    fn remove(&mut self, offset: IVec3) {
        if let Some(b) = Self::bit(offset) {
            self.0 &= !(1 << b);
        }
    }

    fn len(self) -> u32 {
        self.0.count_ones()
    }

    fn points(self) -> impl Iterator<Item = IVec3> {
        (0..125).filter(move |b| (self.0 >> b) & 1 == 1).map(Self::offset)
    }

    fn configuration_around(self, center: IVec3) -> Configuration {
        Configuration::from_fn(|d| self.contains(center + d))
    }

    fn neighbor_count(self, point: IVec3, adjacency: Adjacency) -> usize {
        self.points()
            .filter(|q| adjacency.are_adjacent(point, *q))
            .count()
    }

    fn is_connected(self, adjacency: Adjacency) -> bool {
        let Some(seed) = self.points().next() else {
            return true;
        };
        let mut reached = Patch::default();
        reached.insert(seed);
        let mut stack = vec![seed];
        while let Some(p) = stack.pop() {
            for q in self.points() {
                if !reached.contains(q) && adjacency.are_adjacent(p, q) {
                    reached.insert(q);
                    stack.push(q);
                }
            }
        }
        reached == self
    }
}

/// Removes simple points from `patch` until none remain.
fn reduce(mut patch: Patch, topology: DigitalTopology) -> Patch {
    loop {
        let mut changed = false;
        for p in patch.points() {
            if is_simple_configuration(patch.configuration_around(p), topology) {
                patch.remove(p);
                changed = true;
            }
        }
        if !changed {
            return patch;
        }
    }
}

fn is_zero_surface(patch: Patch, adjacency: Adjacency) -> bool {
    let mut points = patch.points();
    match (points.next(), points.next(), points.next()) {
        (Some(a), Some(b), None) => !adjacency.are_adjacent(a, b),
        _ => false,
    }
}

fn is_one_surface(patch: Patch, adjacency: Adjacency) -> bool {
    patch.len() >= 4
        && patch.is_connected(adjacency)
        && patch
            .points()
            .all(|p| patch.neighbor_count(p, adjacency) == 2)
}

/// Classifies the center of `configuration`.
#[must_use]
pub fn classify(configuration: Configuration, topology: DigitalTopology) -> IsthmusKind {
    let adjacency = topology.foreground();
    let residue = reduce(Patch::from_configuration(configuration), topology);
    if is_zero_surface(residue, adjacency) {
        IsthmusKind::One
    } else if is_one_surface(residue, adjacency) {
        IsthmusKind::Two
    } else {
        IsthmusKind::None
    }
}

/// Isthmus oracle computing [`classify`] on every query.
///
/// Wrap it in [`crate::Cached`] when the same configurations recur.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometricIsthmus {
    mode: IsthmusMode,
    topology: DigitalTopology,
}

impl GeometricIsthmus {
    #[must_use]
    pub fn new(mode: IsthmusMode, topology: DigitalTopology) -> Self {
        Self { mode, topology }
    }

    #[must_use]
    pub fn mode(&self) -> IsthmusMode {
        self.mode
    }
}

impl IsthmusOracle for GeometricIsthmus {
    fn is_isthmus(&self, configuration: Configuration) -> Result<bool> {
        if !configuration.is_valid() {
            return Err(ThinningError::MalformedTable(format!(
                "configuration {:#x} has bits outside the 26-neighborhood",
                configuration.bits()
            )));
        }
        Ok(classify(configuration, self.topology).is_protected_by(self.mode))
    }
}
