//! Round-based thinning driver.

use std::ops::ControlFlow;

use serde::Serialize;
use voxthin_core::{
    Cached, DigitalObject, DistanceField, DistanceMap, GeometricIsthmus, IsthmusOracle, Result,
    SimplePointOracle, ThinningOptions,
};

use crate::basic::SimplePeeling;
use crate::persistence::CriticalKernelThinning;

/// One removal strategy.
///
/// `step` runs a single round on `object` and returns the number of points it
/// removed. A round that removes nothing marks a fixed point: the next round
/// must remove nothing as well.
pub trait Thinning {
    fn name(&self) -> &'static str;

    fn step(&mut self, object: &mut DigitalObject) -> Result<usize>;
}

/// Outcome of a single round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    /// 1-based round number within the scheme's lifetime.
    pub round: u32,
    pub removed: usize,
    pub remaining: usize,
    /// The round removed nothing.
    pub finished: bool,
}

/// Outcome of a multi-round run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub rounds: u32,
    pub removed: usize,
    pub remaining: usize,
    /// A fixed point was reached.
    pub finished: bool,
    /// The observer asked to stop before a fixed point was reached.
    pub stopped: bool,
}

/// A thinning scheme bound to its oracles.
///
/// The scheme borrows the object only for the duration of each call, so the
/// caller may inspect it between rounds.
pub struct ThinningScheme<'a> {
    inner: Box<dyn Thinning + 'a>,
    rounds: u32,
    max_rounds: Option<u32>,
}

impl std::fmt::Debug for ThinningScheme<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThinningScheme")
            .field("kind", &self.inner.name())
            .field("rounds", &self.rounds)
            .field("max_rounds", &self.max_rounds)
            .finish()
    }
}

impl<'a> ThinningScheme<'a> {
    /// Wraps a custom strategy.
    pub fn new(inner: impl Thinning + 'a) -> Self {
        Self {
            inner: Box::new(inner),
            rounds: 0,
            max_rounds: None,
        }
    }

    /// Plain simple point peeling.
    pub fn basic(simple: impl SimplePointOracle + 'a) -> Self {
        Self::new(SimplePeeling::new(simple))
    }

    /// Critical-kernel thinning with isthmus persistence `persistence`.
    ///
    /// A persistence of `0` selects [`Self::basic`]; the isthmus oracle and
    /// the distance map are then unused.
    pub fn critical_kernel(
        simple: impl SimplePointOracle + 'a,
        isthmus: impl IsthmusOracle + 'a,
        distance: impl DistanceMap + 'a,
        persistence: u32,
    ) -> Self {
        if persistence == 0 {
            return Self::basic(simple);
        }
        Self::new(CriticalKernelThinning::new(
            simple,
            isthmus,
            distance,
            persistence,
        ))
    }

    /// Builds the scheme `options` describe for `object`.
    ///
    /// The critical-kernel scheme uses a geometric isthmus oracle for the
    /// object's topology and a distance field computed from the object as it
    /// is now.
    pub fn from_options(
        options: &ThinningOptions,
        object: &DigitalObject,
        simple: impl SimplePointOracle + 'a,
    ) -> Result<Self> {
        options.validate()?;
        let scheme = if options.is_basic() {
            Self::basic(simple)
        } else {
            let isthmus = Cached::new(GeometricIsthmus::new(
                options.isthmus_mode,
                object.topology(),
            ));
            Self::critical_kernel(
                simple,
                isthmus,
                DistanceField::compute(object),
                options.persistence,
            )
        };
        Ok(match options.max_rounds {
            Some(max) => scheme.with_max_rounds(max),
            None => scheme,
        })
    }

    /// Caps the number of rounds a single [`Self::run`] may take.
    #[must_use]
    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// Rounds applied so far.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Applies one round.
    pub fn one_step(&mut self, object: &mut DigitalObject) -> Result<RoundReport> {
        let before = object.len();
        let removed = self.inner.step(object)?;
        self.rounds += 1;
        log::info!("Removed {removed} / {before} points.");
        Ok(RoundReport {
            round: self.rounds,
            removed,
            remaining: object.len(),
            finished: removed == 0,
        })
    }

    /// Applies rounds until a fixed point or the round cap.
    pub fn run(&mut self, object: &mut DigitalObject) -> Result<RunReport> {
        self.run_with(object, |_| ControlFlow::Continue(()))
    }

    /// Like [`Self::run`], calling `observer` after every round.
    ///
    /// Returning [`ControlFlow::Break`] stops the run before the next round;
    /// rounds already applied are kept.
    pub fn run_with(
        &mut self,
        object: &mut DigitalObject,
        mut observer: impl FnMut(&RoundReport) -> ControlFlow<()>,
    ) -> Result<RunReport> {
        let start = object.len();
        let mut report = RunReport {
            rounds: 0,
            removed: 0,
            remaining: start,
            finished: object.is_empty(),
            stopped: false,
        };

        while !report.finished && self.max_rounds.map_or(true, |max| report.rounds < max) {
            let round = self.one_step(object)?;
            report.rounds += 1;
            let flow = observer(&round);
            if round.finished {
                report.finished = true;
            } else if flow.is_break() {
                report.stopped = true;
                break;
            }
        }

        report.remaining = object.len();
        report.removed = start - report.remaining;
        log::debug!(
            "{} thinning: {} rounds, {} removed, {} remaining (finished: {})",
            self.inner.name(),
            report.rounds,
            report.removed,
            report.remaining,
            report.finished
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use voxthin_core::{DigitalTopology, GeometricSimplicity, IVec3, VoxelDomain};

    use super::*;

    fn bar(length: i32) -> DigitalObject {
        let domain = VoxelDomain::from_size(IVec3::new(length + 2, 3, 3)).unwrap();
        let points = (1..=length).map(|x| IVec3::new(x, 1, 1));
        DigitalObject::from_points(domain, DigitalTopology::Adj26_6, points).unwrap()
    }

    /// Removes one member per round, in linear order.
    struct OneAtATime;

    impl Thinning for OneAtATime {
        fn name(&self) -> &'static str {
            "one-at-a-time"
        }

        fn step(&mut self, object: &mut DigitalObject) -> Result<usize> {
            let first = object.points().next();
            match first {
                Some(p) => {
                    object.remove(p)?;
                    Ok(1)
                }
                None => Ok(0),
            }
        }
    }

    #[test]
    fn run_counts_the_terminal_round() {
        let mut object = bar(3);
        let mut scheme = ThinningScheme::new(OneAtATime);
        let report = scheme.run(&mut object).unwrap();
        assert_eq!(report.rounds, 4);
        assert_eq!(report.removed, 3);
        assert!(report.finished);
        assert!(!report.stopped);
        assert_eq!(scheme.rounds(), 4);
    }

    #[test]
    fn empty_object_needs_no_rounds() {
        let domain = VoxelDomain::from_size(IVec3::splat(2)).unwrap();
        let mut object = DigitalObject::new(domain, DigitalTopology::Adj26_6);
        let mut scheme = ThinningScheme::basic(GeometricSimplicity::default());
        let report = scheme.run(&mut object).unwrap();
        assert_eq!(report.rounds, 0);
        assert!(report.finished);

        let round = scheme.one_step(&mut object).unwrap();
        assert_eq!(round.removed, 0);
        assert!(round.finished);
    }

    #[test]
    fn observer_can_stop_between_rounds() {
        let mut object = bar(5);
        let mut scheme = ThinningScheme::new(OneAtATime);
        let mut seen = Vec::new();
        let report = scheme
            .run_with(&mut object, |round| {
                seen.push(round.round);
                if round.round == 2 {
                    ControlFlow::Break(())
                } else {
                    ControlFlow::Continue(())
                }
            })
            .unwrap();
        assert_eq!(seen, vec![1, 2]);
        assert!(report.stopped);
        assert!(!report.finished);
        assert_eq!(object.len(), 3);
    }

    #[test]
    fn max_rounds_caps_a_run() {
        let mut object = bar(5);
        let mut scheme = ThinningScheme::new(OneAtATime).with_max_rounds(2);
        let report = scheme.run(&mut object).unwrap();
        assert_eq!(report.rounds, 2);
        assert!(!report.finished && !report.stopped);
        assert_eq!(report.remaining, 3);
    }

    #[test]
    fn options_select_the_scheme() {
        let object = bar(4);
        let basic = ThinningScheme::from_options(
            &ThinningOptions::basic(),
            &object,
            GeometricSimplicity::default(),
        )
        .unwrap();
        assert_eq!(basic.name(), "basic");

        let options =
            ThinningOptions::critical_kernel(voxthin_core::IsthmusMode::Full, 2).with_max_rounds(7);
        let ck = ThinningScheme::from_options(&options, &object, GeometricSimplicity::default())
            .unwrap();
        assert_eq!(ck.name(), "critical-kernel");
        assert_eq!(ck.max_rounds, Some(7));

        let invalid = ThinningOptions {
            max_rounds: Some(0),
            ..ThinningOptions::default()
        };
        assert!(
            ThinningScheme::from_options(&invalid, &object, GeometricSimplicity::default())
                .is_err()
        );
    }

    #[test]
    fn reports_serialize() {
        let report = RoundReport {
            round: 1,
            removed: 2,
            remaining: 3,
            finished: false,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"removed\":2"));
    }
}
