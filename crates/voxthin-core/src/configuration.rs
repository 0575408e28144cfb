//! 26-neighborhood occupancy configurations.
//!
//! A [`Configuration`] is a 26-bit mask, one bit per neighbor of a lattice
//! point. Bit `i` corresponds to [`NEIGHBOR_OFFSETS`]`[i]`; offsets are listed
//! z-major, then y, then x, each over `-1..=1`, with the center skipped.

use glam::IVec3;

use crate::topology::Adjacency;

/// Number of neighbors in the 3x3x3 stencil around a point.
pub const NEIGHBOR_COUNT: usize = 26;

/// Number of distinct configurations (the domain of a lookup table).
pub const CONFIGURATION_COUNT: usize = 1 << NEIGHBOR_COUNT;

/// Neighbor offsets in bit order.
pub const NEIGHBOR_OFFSETS: [IVec3; NEIGHBOR_COUNT] = neighbor_offsets();

/// Bits of the 6 face neighbors.
pub const SIX_NEIGHBORS: u32 = stencil_mask(1);

/// Bits of the 18 face and edge neighbors.
pub const EIGHTEEN_NEIGHBORS: u32 = stencil_mask(2);

/// Bits of all 26 neighbors.
pub const ALL_NEIGHBORS: u32 = (1 << NEIGHBOR_COUNT) - 1;

const ADJACENT_6: [u32; NEIGHBOR_COUNT] = adjacency_masks(1);
const ADJACENT_18: [u32; NEIGHBOR_COUNT] = adjacency_masks(2);
const ADJACENT_26: [u32; NEIGHBOR_COUNT] = adjacency_masks(3);

const fn neighbor_offsets() -> [IVec3; NEIGHBOR_COUNT] {
    let mut out = [IVec3::ZERO; NEIGHBOR_COUNT];
    let mut n = 0;
    let mut i = 0;
    while n < 27 {
        if n != 13 {
            out[i] = IVec3::new(n % 3 - 1, (n / 3) % 3 - 1, n / 9 - 1);
            i += 1;
        }
        n += 1;
    }
    out
}

const fn nonzero_count(o: IVec3) -> i32 {
    (o.x != 0) as i32 + (o.y != 0) as i32 + (o.z != 0) as i32
}

const fn stencil_mask(max_nonzero: i32) -> u32 {
    let offsets = neighbor_offsets();
    let mut mask = 0;
    let mut i = 0;
    while i < NEIGHBOR_COUNT {
        if nonzero_count(offsets[i]) <= max_nonzero {
            mask |= 1 << i;
        }
        i += 1;
    }
    mask
}

// For each neighbor, the bits of the other neighbors adjacent to it.
const fn adjacency_masks(max_nonzero: i32) -> [u32; NEIGHBOR_COUNT] {
    let offsets = neighbor_offsets();
    let mut out = [0; NEIGHBOR_COUNT];
    let mut i = 0;
    while i < NEIGHBOR_COUNT {
        let mut j = 0;
        while j < NEIGHBOR_COUNT {
            let d = IVec3::new(
                offsets[j].x - offsets[i].x,
                offsets[j].y - offsets[i].y,
                offsets[j].z - offsets[i].z,
            );
            let within = d.x.abs() <= 1 && d.y.abs() <= 1 && d.z.abs() <= 1;
            if i != j && within && nonzero_count(d) <= max_nonzero {
                out[i] |= 1 << j;
            }
            j += 1;
        }
        i += 1;
    }
    out
}

/// Returns, for each neighbor bit, the mask of neighbors adjacent to it.
#[must_use]
pub fn adjacency_table(adjacency: Adjacency) -> &'static [u32; NEIGHBOR_COUNT] {
    match adjacency {
        Adjacency::Six => &ADJACENT_6,
        Adjacency::Eighteen => &ADJACENT_18,
        Adjacency::TwentySix => &ADJACENT_26,
    }
}

/// Counts the connected components of the neighbors set in `mask`, using the
/// adjacency encoded by `table` and never passing through the center.
#[must_use]
pub fn count_components(mask: u32, table: &[u32; NEIGHBOR_COUNT]) -> u32 {
    let mut remaining = mask & ALL_NEIGHBORS;
    let mut count = 0;
    while remaining != 0 {
        count += 1;
        let mut frontier = 1 << remaining.trailing_zeros();
        remaining &= !frontier;
        while frontier != 0 {
            let i = frontier.trailing_zeros() as usize;
            frontier &= frontier - 1;
            let reached = table[i] & remaining;
            remaining &= !reached;
            frontier |= reached;
        }
    }
    count
}

/// Occupancy pattern of the 26 neighbors of a lattice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Configuration(u32);

impl Configuration {
    /// No neighbor occupied.
    pub const EMPTY: Self = Self(0);

    /// Every neighbor occupied.
    pub const FULL: Self = Self(ALL_NEIGHBORS);

    /// Wraps raw bits without validation.
    ///
    /// Bits above the 26th make the configuration fall outside every lookup
    /// table; see [`Self::is_valid`].
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Builds a configuration by probing each neighbor offset.
    pub fn from_fn(mut occupied: impl FnMut(IVec3) -> bool) -> Self {
        let bits = NEIGHBOR_OFFSETS
            .iter()
            .enumerate()
            .filter(|(_, o)| occupied(**o))
            .fold(0, |acc, (i, _)| acc | (1 << i));
        Self(bits)
    }

    /// Builds a configuration from a list of occupied offsets.
    ///
    /// Offsets outside the 26-neighborhood are ignored.
    #[must_use]
    pub fn from_offsets(offsets: &[IVec3]) -> Self {
        Self::from_fn(|o| offsets.contains(&o))
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Position of this configuration in a lookup table.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether the configuration uses only the 26 neighbor bits.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 & !ALL_NEIGHBORS == 0
    }

    /// Returns the bit assigned to `offset`, or `None` for the center and
    /// anything outside the 3x3x3 stencil.
    #[must_use]
    pub fn bit_of(offset: IVec3) -> Option<usize> {
        if offset == IVec3::ZERO || offset.abs().max_element() > 1 {
            return None;
        }
        let n = (offset.x + 1) + 3 * (offset.y + 1) + 9 * (offset.z + 1);
        let n = n as usize;
        Some(if n < 13 { n } else { n - 1 })
    }

    #[must_use]
    pub fn contains(self, offset: IVec3) -> bool {
        Self::bit_of(offset).is_some_and(|bit| self.0 & (1 << bit) != 0)
    }

    /// Number of occupied neighbors.
    #[must_use]
    pub const fn count(self) -> u32 {
        (self.0 & ALL_NEIGHBORS).count_ones()
    }

    /// Occupancy of the complement (background neighbors).
    #[must_use]
    pub const fn complement(self) -> Self {
        Self(!self.0 & ALL_NEIGHBORS)
    }

    /// Iterates over the offsets of the occupied neighbors.
    pub fn occupied_offsets(self) -> impl Iterator<Item = IVec3> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .enumerate()
            .filter(move |(i, _)| self.0 & (1 << i) != 0)
            .map(|(_, o)| o)
    }
}
