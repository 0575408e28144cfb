//! Digital objects: a point set over a voxel domain plus a topology.

use std::collections::{BTreeSet, VecDeque};

use glam::IVec3;

use crate::configuration::{Configuration, NEIGHBOR_OFFSETS};
use crate::domain::VoxelDomain;
use crate::error::{Result, ThinningError};
use crate::oracle::{IsthmusOracle, SimplePointOracle};
use crate::options::Threshold;
use crate::topology::DigitalTopology;

/// A finite set of lattice points inside a [`VoxelDomain`].
///
/// The object owns both the membership index (kept ordered so traversal is
/// reproducible) and the backing occupancy grid. The two are only ever updated
/// together, inside [`Self::insert`] and [`Self::remove`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalObject {
    domain: VoxelDomain,
    topology: DigitalTopology,
    grid: Vec<bool>,
    members: BTreeSet<usize>,
}

impl DigitalObject {
    /// Creates an empty object.
    #[must_use]
    pub fn new(domain: VoxelDomain, topology: DigitalTopology) -> Self {
        Self {
            domain,
            topology,
            grid: vec![false; domain.num_voxels()],
            members: BTreeSet::new(),
        }
    }

    /// Creates an object from a list of points.
    ///
    /// Duplicates are ignored. Any point outside `domain` is an error.
    pub fn from_points(
        domain: VoxelDomain,
        topology: DigitalTopology,
        points: impl IntoIterator<Item = IVec3>,
    ) -> Result<Self> {
        let mut object = Self::new(domain, topology);
        for p in points {
            object.insert(p)?;
        }
        Ok(object)
    }

    /// Creates an object from an occupancy grid laid out in the domain's
    /// linear order.
    pub fn from_mask(domain: VoxelDomain, topology: DigitalTopology, mask: &[bool]) -> Result<Self> {
        if mask.len() != domain.num_voxels() {
            return Err(ThinningError::SizeMismatch {
                expected: domain.num_voxels(),
                actual: mask.len(),
            });
        }
        let members = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &occupied)| occupied.then_some(i))
            .collect();
        Ok(Self {
            domain,
            topology,
            grid: mask.to_vec(),
            members,
        })
    }

    /// Creates an object from a scalar volume, keeping the voxels whose value
    /// lies in `threshold`.
    pub fn from_threshold<T: Copy + Into<f64>>(
        domain: VoxelDomain,
        topology: DigitalTopology,
        values: &[T],
        threshold: Threshold,
    ) -> Result<Self> {
        let mask: Vec<bool> = values.iter().map(|&v| threshold.accepts(v.into())).collect();
        let object = Self::from_mask(domain, topology, &mask)?;
        log::debug!(
            "thresholded {} voxels into {} object points",
            mask.len(),
            object.len()
        );
        Ok(object)
    }

    #[must_use]
    pub fn domain(&self) -> &VoxelDomain {
        &self.domain
    }

    #[must_use]
    pub fn topology(&self) -> DigitalTopology {
        self.topology
    }

    /// Number of member points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, point: IVec3) -> bool {
        self.domain
            .index_of(point)
            .is_some_and(|i| self.grid[i])
    }

    /// Adds a point. Returns `false` if it was already a member.
    pub fn insert(&mut self, point: IVec3) -> Result<bool> {
        let index = self
            .domain
            .index_of(point)
            .ok_or(ThinningError::InvalidPoint(point))?;
        self.grid[index] = true;
        Ok(self.members.insert(index))
    }

    /// Removes a member point and clears its voxel in the backing grid.
    pub fn remove(&mut self, point: IVec3) -> Result<()> {
        match self.domain.index_of(point) {
            Some(index) if self.grid[index] => {
                self.grid[index] = false;
                self.members.remove(&index);
                Ok(())
            }
            _ => Err(ThinningError::InvalidPoint(point)),
        }
    }

    /// Occupancy of the 26 neighbors of `point`. Points outside the domain
    /// read as background.
    #[must_use]
    pub fn configuration(&self, point: IVec3) -> Configuration {
        Configuration::from_fn(|d| self.contains(point + d))
    }

    /// Whether `point` is a member that `oracle` reports as simple.
    ///
    /// Non-members are never simple.
    pub fn is_simple<O: SimplePointOracle + ?Sized>(&self, point: IVec3, oracle: &O) -> Result<bool> {
        if !self.contains(point) {
            return Ok(false);
        }
        oracle.is_simple(self.configuration(point))
    }

    /// Whether `point` is a member that `oracle` reports as an isthmus.
    pub fn is_isthmus<O: IsthmusOracle + ?Sized>(&self, point: IVec3, oracle: &O) -> Result<bool> {
        if !self.contains(point) {
            return Ok(false);
        }
        oracle.is_isthmus(self.configuration(point))
    }

    /// Iterates over the members in linear index order.
    ///
    /// The iterator borrows the object, so a fresh traversal always reflects
    /// the current point set.
    pub fn points(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.members
            .iter()
            .filter_map(move |&i| self.domain.point_at(i))
    }

    pub fn for_each_point(&self, mut visitor: impl FnMut(IVec3)) {
        for p in self.points() {
            visitor(p);
        }
    }

    /// Linear indices of the members, ascending.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members.iter().copied()
    }

    /// The backing occupancy grid in the domain's linear order.
    #[must_use]
    pub fn mask(&self) -> &[bool] {
        &self.grid
    }

    #[must_use]
    pub fn to_points(&self) -> Vec<IVec3> {
        self.points().collect()
    }

    /// Number of connected components under the object adjacency.
    #[must_use]
    pub fn connected_components(&self) -> usize {
        let adjacency = self.topology.foreground();
        let steps: Vec<IVec3> = NEIGHBOR_OFFSETS
            .into_iter()
            .filter(|d| adjacency.is_adjacent_offset(*d))
            .collect();

        let mut seen = vec![false; self.grid.len()];
        let mut components = 0;
        let mut queue = VecDeque::new();
        for &start in &self.members {
            if seen[start] {
                continue;
            }
            components += 1;
            seen[start] = true;
            queue.push_back(start);
            while let Some(i) = queue.pop_front() {
                let Some(p) = self.domain.point_at(i) else {
                    continue;
                };
                for d in &steps {
                    if let Some(j) = self.domain.index_of(p + *d) {
                        if self.grid[j] && !seen[j] {
                            seen[j] = true;
                            queue.push_back(j);
                        }
                    }
                }
            }
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::simple::GeometricSimplicity;

    fn cube_domain(n: i32) -> VoxelDomain {
        VoxelDomain::from_size(IVec3::splat(n)).unwrap()
    }

    #[test]
    fn insert_and_remove_keep_grid_in_sync() {
        let domain = cube_domain(3);
        let mut object = DigitalObject::new(domain, DigitalTopology::Adj26_6);
        assert!(object.is_empty());
        assert!(object.insert(IVec3::ONE).unwrap());
        assert!(!object.insert(IVec3::ONE).unwrap());
        assert_eq!(object.len(), 1);
        assert!(object.mask()[domain.index_of(IVec3::ONE).unwrap()]);

        object.remove(IVec3::ONE).unwrap();
        assert!(!object.contains(IVec3::ONE));
        assert!(object.mask().iter().all(|v| !v));
    }

    #[test]
    fn invalid_points_are_rejected() {
        let mut object = DigitalObject::new(cube_domain(3), DigitalTopology::Adj26_6);
        let outside = IVec3::new(5, 0, 0);
        assert!(matches!(object.insert(outside), Err(ThinningError::InvalidPoint(p)) if p == outside));
        assert!(matches!(object.remove(IVec3::ZERO), Err(ThinningError::InvalidPoint(_))));
        assert!(matches!(object.remove(outside), Err(ThinningError::InvalidPoint(_))));
        assert!(!object.is_simple(IVec3::ZERO, &GeometricSimplicity::default()).unwrap());
    }

    #[test]
    fn mask_length_must_match_domain() {
        let err = DigitalObject::from_mask(cube_domain(2), DigitalTopology::Adj26_6, &[true; 7]);
        assert!(matches!(
            err,
            Err(ThinningError::SizeMismatch {
                expected: 8,
                actual: 7
            })
        ));
    }

    #[test]
    fn threshold_selects_foreground() {
        let domain = VoxelDomain::from_size(IVec3::new(4, 1, 1)).unwrap();
        let values: [u8; 4] = [0, 10, 200, 255];
        let object = DigitalObject::from_threshold(
            domain,
            DigitalTopology::Adj26_6,
            &values,
            Threshold::new(10.0, 200.0),
        )
        .unwrap();
        assert_eq!(object.to_points(), vec![IVec3::new(2, 0, 0)]);
    }

    #[test]
    fn configuration_treats_outside_as_background() {
        let object =
            DigitalObject::from_points(cube_domain(2), DigitalTopology::Adj26_6, [IVec3::ZERO, IVec3::X])
                .unwrap();
        let c = object.configuration(IVec3::ZERO);
        assert_eq!(c, Configuration::from_offsets(&[IVec3::X]));
        assert!(object.is_simple(IVec3::ZERO, &GeometricSimplicity::default()).unwrap());
    }

    #[test]
    fn points_are_visited_in_linear_order() {
        let domain = cube_domain(3);
        let pts = [IVec3::new(2, 2, 2), IVec3::new(0, 1, 0), IVec3::new(1, 0, 0)];
        let object = DigitalObject::from_points(domain, DigitalTopology::Adj26_6, pts).unwrap();
        let visited = object.to_points();
        assert_eq!(
            visited,
            vec![IVec3::new(1, 0, 0), IVec3::new(0, 1, 0), IVec3::new(2, 2, 2)]
        );
        let mut count = 0;
        object.for_each_point(|_| count += 1);
        assert_eq!(count, 3);
        // Restartable: a second traversal sees the same points.
        assert_eq!(object.points().count(), 3);
    }

    #[test]
    fn components_depend_on_topology() {
        let pts = [IVec3::ZERO, IVec3::ONE];
        let a = DigitalObject::from_points(cube_domain(2), DigitalTopology::Adj26_6, pts).unwrap();
        let b = DigitalObject::from_points(cube_domain(2), DigitalTopology::Adj6_26, pts).unwrap();
        assert_eq!(a.connected_components(), 1);
        assert_eq!(b.connected_components(), 2);
        assert_eq!(DigitalObject::new(cube_domain(2), DigitalTopology::Adj26_6).connected_components(), 0);
    }

    proptest! {
        #[test]
        fn mask_and_members_agree(mask in prop::collection::vec(any::<bool>(), 27), drop in 0usize..27) {
            let domain = cube_domain(3);
            let mut object = DigitalObject::from_mask(domain, DigitalTopology::Adj26_6, &mask).unwrap();
            prop_assert_eq!(object.len(), mask.iter().filter(|v| **v).count());

            let p = domain.point_at(drop).unwrap();
            let was_member = object.contains(p);
            prop_assert_eq!(object.remove(p).is_ok(), was_member);
            for (i, &occupied) in object.mask().iter().enumerate() {
                prop_assert_eq!(occupied, object.contains(domain.point_at(i).unwrap()));
            }
            prop_assert_eq!(object.mask().iter().filter(|v| **v).count(), object.len());
        }
    }
}
