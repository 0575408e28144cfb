//! Removal candidates and clique representatives.
//!
//! A clique is a maximal set of candidates that are pairwise 26-adjacent and
//! share the same distance. Pairwise 26-adjacent points span at most two
//! values per axis, so every clique lies in some 2x2x2 window; cliques are
//! found by scanning each window that contains a candidate. In every clique
//! with at least two candidates the highest priority point is kept for the
//! round.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};

use glam::IVec3;

/// A point that may be removed this round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub point: IVec3,
    /// Linear index in the object's domain; breaks distance ties.
    pub index: usize,
    pub distance: f64,
}

impl Candidate {
    /// Total order by distance, then linear index.
    pub fn priority_cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Sorts candidates by ascending priority.
pub fn sort_by_priority(candidates: &mut [Candidate]) {
    candidates.sort_by(Candidate::priority_cmp);
}

/// Corner offsets of a 2x2x2 window.
fn window_corners() -> impl Iterator<Item = IVec3> {
    (0..8).map(|i| IVec3::new(i & 1, (i >> 1) & 1, (i >> 2) & 1))
}

/// Returns the linear indices of the clique representatives among
/// `candidates`.
pub fn select_representatives(candidates: &[Candidate]) -> HashSet<usize> {
    let by_point: HashMap<IVec3, &Candidate> =
        candidates.iter().map(|c| (c.point, c)).collect();
    let windows: HashSet<IVec3> = candidates
        .iter()
        .flat_map(|c| window_corners().map(move |o| c.point - o))
        .collect();

    // Tied candidates of each window, as sorted linear indices.
    let mut groups: BTreeSet<Vec<usize>> = BTreeSet::new();
    for origin in windows {
        let mut ties: HashMap<u64, Vec<usize>> = HashMap::new();
        for corner in window_corners() {
            if let Some(c) = by_point.get(&(origin + corner)) {
                ties.entry(c.distance.to_bits()).or_default().push(c.index);
            }
        }
        for mut group in ties.into_values().filter(|g| g.len() >= 2) {
            group.sort_unstable();
            groups.insert(group);
        }
    }

    // A window may see only part of a clique; drop those partial groups.
    let mut containing: HashMap<usize, Vec<&Vec<usize>>> = HashMap::new();
    for group in &groups {
        for &index in group {
            containing.entry(index).or_default().push(group);
        }
    }
    let is_maximal = |group: &Vec<usize>| {
        containing.get(&group[0]).map_or(true, |others| {
            !others.iter().any(|other| {
                other.len() > group.len()
                    && group.iter().all(|i| other.binary_search(i).is_ok())
            })
        })
    };

    groups
        .iter()
        .filter(|group| is_maximal(*group))
        .filter_map(|group| group.last().copied())
        .collect()
}
