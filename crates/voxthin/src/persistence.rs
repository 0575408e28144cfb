//! Critical-kernel thinning with isthmus persistence.
//!
//! Rounds are numbered by an epoch that advances after every round that
//! removed something. At the start of a round each member is classified by
//! the isthmus oracle, and isthmus members record the current epoch. A member
//! stays protected while fewer than `persistence` epochs have passed since it
//! was last seen as an isthmus, so short-lived isthmuses created by boundary
//! noise are peeled before they can anchor a branch.
//!
//! Unprotected simple members are the round's candidates. Clique
//! representatives (see [`crate::clique`]) are kept; the remaining candidates
//! are removed in ascending distance order, each checked for simplicity right
//! before removal.
//!
//! Before its first round a run with persistence `k > 1` computes the kernel
//! for `k - 1` from the same object, itself anchored on the kernel for
//! `k - 2` and so on. Those points are anchors and are never removed, so the
//! kernel for `k` always contains the kernel for `k - 1`.

use std::collections::{HashMap, HashSet};

use glam::IVec3;
use voxthin_core::{DigitalObject, DistanceMap, IsthmusOracle, Result, SimplePointOracle};

use crate::clique::{select_representatives, sort_by_priority, Candidate};
use crate::scheme::Thinning;

#[derive(Debug, Clone)]
pub struct CriticalKernelThinning<S, I, D> {
    simple: S,
    isthmus: I,
    distance: D,
    persistence: u32,
    epoch: u64,
    last_isthmus: HashMap<IVec3, u64>,
    /// Kernel for `persistence - 1`; computed on the first round.
    anchors: Option<HashSet<IVec3>>,
}

impl<S, I, D> CriticalKernelThinning<S, I, D>
where
    S: SimplePointOracle,
    I: IsthmusOracle,
    D: DistanceMap,
{
    /// `persistence` should be at least 1; with 0 nothing is ever protected.
    pub fn new(simple: S, isthmus: I, distance: D, persistence: u32) -> Self {
        Self {
            simple,
            isthmus,
            distance,
            persistence,
            epoch: 0,
            last_isthmus: HashMap::new(),
            anchors: None,
        }
    }

    pub fn persistence(&self) -> u32 {
        self.persistence
    }

    /// Number of rounds so far that removed at least one point.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Points the run never removes, once known.
    pub fn anchors(&self) -> Option<&HashSet<IVec3>> {
        self.anchors.as_ref()
    }

    fn is_protected(&self, point: IVec3) -> bool {
        self.anchors.as_ref().is_some_and(|a| a.contains(&point))
            || self
                .last_isthmus
                .get(&point)
                .is_some_and(|&last| self.epoch - last < u64::from(self.persistence))
    }

    /// Runs every shorter persistence to its fixed point on a copy of
    /// `object`, each anchored on the previous kernel.
    fn shorter_kernel(&self, object: &DigitalObject) -> Result<HashSet<IVec3>> {
        let mut anchors = HashSet::new();
        for persistence in 1..self.persistence {
            let mut kernel = object.clone();
            let mut run = CriticalKernelThinning {
                simple: &self.simple,
                isthmus: &self.isthmus,
                distance: &self.distance,
                persistence,
                epoch: 0,
                last_isthmus: HashMap::new(),
                anchors: Some(anchors),
            };
            while run.round(&mut kernel)? > 0 {}
            anchors = kernel.points().collect();
            log::debug!("persistence {persistence}: {} anchors", anchors.len());
        }
        Ok(anchors)
    }

    fn collect_candidates(&mut self, object: &DigitalObject) -> Result<Vec<Candidate>> {
        let mut candidates = Vec::new();
        for (index, p) in object.indices().zip(object.points()) {
            if object.is_isthmus(p, &self.isthmus)? {
                self.last_isthmus.insert(p, self.epoch);
            }
            if !self.is_protected(p) && object.is_simple(p, &self.simple)? {
                candidates.push(Candidate {
                    point: p,
                    index,
                    distance: self.distance.distance(p),
                });
            }
        }
        Ok(candidates)
    }

    /// One round with the anchors as they are.
    fn round(&mut self, object: &mut DigitalObject) -> Result<usize> {
        let mut candidates = self.collect_candidates(object)?;
        let kept = select_representatives(&candidates);
        log::trace!(
            "epoch {}: {} candidates, {} clique representatives",
            self.epoch,
            candidates.len(),
            kept.len()
        );

        candidates.retain(|c| !kept.contains(&c.index));
        sort_by_priority(&mut candidates);

        let mut removed = 0;
        for c in &candidates {
            if object.is_simple(c.point, &self.simple)? {
                object.remove(c.point)?;
                self.last_isthmus.remove(&c.point);
                removed += 1;
            }
        }
        if removed > 0 {
            self.epoch += 1;
        }
        Ok(removed)
    }
}

impl<S, I, D> Thinning for CriticalKernelThinning<S, I, D>
where
    S: SimplePointOracle,
    I: IsthmusOracle,
    D: DistanceMap,
{
    fn name(&self) -> &'static str {
        "critical-kernel"
    }

    fn step(&mut self, object: &mut DigitalObject) -> Result<usize> {
        if self.anchors.is_none() {
            self.anchors = Some(self.shorter_kernel(object)?);
        }
        self.round(object)
    }
}

#[cfg(test)]
mod tests {
    use voxthin_core::{
        DigitalTopology, DistanceField, GeometricIsthmus, GeometricSimplicity, IsthmusMode,
        NoIsthmus, VoxelDomain,
    };

    use super::*;

    fn bar() -> DigitalObject {
        let domain = VoxelDomain::new(IVec3::ZERO, IVec3::new(8, 2, 2)).unwrap();
        let points = (1..=7).map(|x| IVec3::new(x, 1, 1));
        DigitalObject::from_points(domain, DigitalTopology::Adj26_6, points).unwrap()
    }

    fn thinning(
        object: &DigitalObject,
        persistence: u32,
    ) -> CriticalKernelThinning<GeometricSimplicity, GeometricIsthmus, DistanceField> {
        CriticalKernelThinning::new(
            GeometricSimplicity::default(),
            GeometricIsthmus::new(IsthmusMode::OneIsthmus, object.topology()),
            DistanceField::compute(object),
            persistence,
        )
    }

    #[test]
    fn isthmuses_are_protected_for_persistence_epochs() {
        let mut object = bar();
        let mut t = thinning(&object, 2);

        // Only the ends are simple; the interior is a 1-isthmus.
        assert_eq!(t.step(&mut object).unwrap(), 2);
        assert_eq!(t.epoch(), 1);
        // The new ends were isthmuses one epoch ago and are still protected.
        assert_eq!(t.step(&mut object).unwrap(), 0);
        assert_eq!(t.epoch(), 1);
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn persistence_one_protects_only_current_isthmuses() {
        let mut object = bar();
        let mut t = thinning(&object, 1);
        assert_eq!(t.step(&mut object).unwrap(), 2);
        assert_eq!(t.step(&mut object).unwrap(), 2);
        assert_eq!(t.step(&mut object).unwrap(), 2);
        assert_eq!(t.step(&mut object).unwrap(), 0);
        assert_eq!(object.to_points(), vec![IVec3::new(4, 1, 1)]);
    }

    #[test]
    fn shorter_kernels_become_anchors() {
        let mut object = bar();
        let mut t = thinning(&object, 1);
        assert!(t.anchors().is_none());
        t.step(&mut object).unwrap();
        assert!(t.anchors().unwrap().is_empty());

        let mut object = bar();
        let mut t = thinning(&object, 3);
        t.step(&mut object).unwrap();
        // The kernel for persistence 2 is x = 2..=6.
        let anchors = t.anchors().unwrap();
        assert_eq!(anchors.len(), 5);
        assert!((2..=6).all(|x| anchors.contains(&IVec3::new(x, 1, 1))));
        // Anchoring runs on a copy: the first round only peels the ends.
        assert_eq!(object.len(), 5);
    }

    #[test]
    fn clique_representative_survives_the_round() {
        // A 2x2x1 square: every point is simple, none is an isthmus, and all
        // four are pairwise adjacent.
        let domain = VoxelDomain::from_size(IVec3::splat(4)).unwrap();
        let square = [
            IVec3::new(2, 2, 2),
            IVec3::new(3, 2, 2),
            IVec3::new(2, 3, 2),
            IVec3::new(3, 3, 2),
        ];
        let mut object =
            DigitalObject::from_points(domain, DigitalTopology::Adj26_6, square).unwrap();
        let mut t = CriticalKernelThinning::new(
            GeometricSimplicity::default(),
            NoIsthmus,
            DistanceField::compute(&object),
            1,
        );
        let removed = t.step(&mut object).unwrap();
        assert!(removed >= 1);
        // All distances tie at 1, so the largest linear index is kept.
        assert!(object.contains(IVec3::new(3, 3, 2)));
        assert_eq!(t.step(&mut object).unwrap() + removed, 3);
        assert_eq!(object.to_points(), vec![IVec3::new(3, 3, 2)]);
    }
}
