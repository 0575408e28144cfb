//! Basic thinning: sequential removal of simple points.

use std::collections::VecDeque;

use voxthin_core::{DigitalObject, Result, SimplePointOracle};

use crate::scheme::Thinning;

/// Peels every point that is simple at the start of a round.
///
/// Queued points are checked again right before removal, since removing a
/// neighbor earlier in the same round can change their status. Only points
/// verified simple against the current object are deleted, one at a time.
#[derive(Debug, Clone)]
pub struct SimplePeeling<S> {
    simple: S,
}

impl<S: SimplePointOracle> SimplePeeling<S> {
    pub fn new(simple: S) -> Self {
        Self { simple }
    }
}

impl<S: SimplePointOracle> Thinning for SimplePeeling<S> {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn step(&mut self, object: &mut DigitalObject) -> Result<usize> {
        let mut queue = VecDeque::new();
        for p in object.points() {
            if object.is_simple(p, &self.simple)? {
                queue.push_back(p);
            }
        }
        log::trace!("{} simple points queued", queue.len());

        let mut removed = 0;
        while let Some(p) = queue.pop_front() {
            if object.is_simple(p, &self.simple)? {
                object.remove(p)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
