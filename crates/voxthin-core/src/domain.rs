//! Axis-aligned integer lattice boxes.

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThinningError};

/// A closed axis-aligned box `[lower, upper]` of lattice points.
///
/// Linear indices run with x fastest, then y, then z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoxelDomain {
    lower: IVec3,
    upper: IVec3,
}

impl VoxelDomain {
    /// Creates a domain, rejecting bounds with `lower > upper` on any axis.
    ///
    /// The box grown by one voxel on every side must still be addressable:
    /// its corners fit in `i32` and its voxel count in `usize`. Larger boxes
    /// are rejected as well.
    pub fn new(lower: IVec3, upper: IVec3) -> Result<Self> {
        let invalid = || ThinningError::InvalidDomain { lower, upper };
        if lower.cmpgt(upper).any() {
            return Err(invalid());
        }
        let mut voxels: usize = 1;
        for (lo, hi) in lower.to_array().into_iter().zip(upper.to_array()) {
            let (lo, hi) = (i64::from(lo), i64::from(hi));
            let padded_extent = hi - lo + 3;
            if lo == i64::from(i32::MIN)
                || hi == i64::from(i32::MAX)
                || padded_extent > i64::from(i32::MAX)
            {
                return Err(invalid());
            }
            voxels = usize::try_from(padded_extent)
                .ok()
                .and_then(|n| voxels.checked_mul(n))
                .ok_or_else(invalid)?;
        }
        Ok(Self { lower, upper })
    }

    /// Creates the domain `[0, size - 1]`.
    pub fn from_size(size: IVec3) -> Result<Self> {
        Self::new(IVec3::ZERO, size.saturating_sub(IVec3::ONE))
    }

    #[must_use]
    pub fn lower(&self) -> IVec3 {
        self.lower
    }

    #[must_use]
    pub fn upper(&self) -> IVec3 {
        self.upper
    }

    /// Number of lattice points along each axis.
    #[must_use]
    pub fn extent(&self) -> IVec3 {
        self.upper - self.lower + IVec3::ONE
    }

    /// Total number of lattice points in the box.
    #[must_use]
    pub fn num_voxels(&self) -> usize {
        let e = self.extent();
        e.x as usize * e.y as usize * e.z as usize
    }

    #[must_use]
    pub fn contains(&self, point: IVec3) -> bool {
        point.cmpge(self.lower).all() && point.cmple(self.upper).all()
    }

    /// Returns the linear index of `point`, or `None` outside the box.
    #[must_use]
    pub fn index_of(&self, point: IVec3) -> Option<usize> {
        if !self.contains(point) {
            return None;
        }
        let d = point - self.lower;
        let e = self.extent();
        Some(d.x as usize + e.x as usize * (d.y as usize + e.y as usize * d.z as usize))
    }

    /// Inverse of [`Self::index_of`].
    #[must_use]
    pub fn point_at(&self, index: usize) -> Option<IVec3> {
        if index >= self.num_voxels() {
            return None;
        }
        let e = self.extent();
        let (ex, ey) = (e.x as usize, e.y as usize);
        let x = index % ex;
        let y = (index / ex) % ey;
        let z = index / (ex * ey);
        Some(self.lower + IVec3::new(x as i32, y as i32, z as i32))
    }

    /// Iterates over every lattice point of the box in linear index order.
    pub fn points(&self) -> impl Iterator<Item = IVec3> + '_ {
        (self.lower.z..=self.upper.z).flat_map(move |z| {
            (self.lower.y..=self.upper.y)
                .flat_map(move |y| (self.lower.x..=self.upper.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    /// Returns the box grown by `margin` on every side.
    ///
    /// A margin of one always fits; see [`Self::new`].
    #[must_use]
    pub fn padded(&self, margin: i32) -> Self {
        let m = IVec3::splat(margin);
        Self {
            lower: self.lower - m,
            upper: self.upper + m,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_bounds() {
        let err = VoxelDomain::new(IVec3::new(0, 2, 0), IVec3::new(3, 1, 3));
        assert!(matches!(err, Err(ThinningError::InvalidDomain { .. })));
        assert!(VoxelDomain::new(IVec3::ONE, IVec3::ONE).is_ok());
        assert!(VoxelDomain::from_size(IVec3::new(4, 0, 4)).is_err());
    }

    #[test]
    fn rejects_boxes_too_large_to_address() {
        let huge = VoxelDomain::new(IVec3::splat(i32::MIN), IVec3::splat(i32::MAX));
        assert!(matches!(huge, Err(ThinningError::InvalidDomain { .. })));

        // No room for the padding voxel.
        assert!(VoxelDomain::new(IVec3::ZERO, IVec3::new(i32::MAX, 0, 0)).is_err());
        assert!(VoxelDomain::new(IVec3::new(0, i32::MIN, 0), IVec3::ZERO).is_err());
        assert!(VoxelDomain::from_size(IVec3::splat(i32::MIN)).is_err());

        // Every axis fits on its own but the voxel count does not.
        let side = 1 << 30;
        assert!(VoxelDomain::new(IVec3::ZERO, IVec3::splat(side)).is_err());

        let wide = VoxelDomain::new(IVec3::new(-1000, 0, 0), IVec3::new(1000, 0, 0)).unwrap();
        assert_eq!(wide.num_voxels(), 2001);
    }

    #[test]
    fn index_round_trip_covers_the_box() {
        let domain = VoxelDomain::new(IVec3::new(-1, 2, 5), IVec3::new(1, 4, 6)).unwrap();
        assert_eq!(domain.extent(), IVec3::new(3, 3, 2));
        assert_eq!(domain.num_voxels(), 18);

        for (i, p) in domain.points().enumerate() {
            assert_eq!(domain.index_of(p), Some(i));
            assert_eq!(domain.point_at(i), Some(p));
        }
        assert_eq!(domain.points().count(), 18);
    }

    #[test]
    fn outside_points_have_no_index() {
        let domain = VoxelDomain::from_size(IVec3::splat(3)).unwrap();
        assert!(!domain.contains(IVec3::new(3, 0, 0)));
        assert_eq!(domain.index_of(IVec3::new(-1, 0, 0)), None);
        assert_eq!(domain.point_at(27), None);
        assert!(domain.padded(1).contains(IVec3::new(3, -1, 3)));
    }
}
