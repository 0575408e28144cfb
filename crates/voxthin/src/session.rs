//! Interactive thinning session.

use std::collections::HashMap;
use std::ops::ControlFlow;

use glam::IVec3;
use voxthin_core::{
    Cached, DigitalObject, DigitalTopology, DistanceField, GeometricIsthmus, GeometricSimplicity,
    IsthmusMode, IsthmusOracle, Result, SimplePointOracle, ThinningOptions,
};

use crate::scheme::{RoundReport, RunReport, ThinningScheme};

/// Keeps the object as it was loaded next to the object being thinned, so a
/// caller can step through rounds, run to completion and start over.
///
/// # Example
///
/// ```
/// use voxthin::*;
///
/// let domain = VoxelDomain::from_size(IVec3::splat(5)).unwrap();
/// let cube = VoxelDomain::new(IVec3::ONE, IVec3::splat(3)).unwrap();
/// let object = DigitalObject::from_points(domain, DigitalTopology::Adj26_6, cube.points()).unwrap();
///
/// let mut session = ThinningSession::new(object);
/// session.step().unwrap();
/// let report = session.run_to_fixed_point().unwrap();
/// assert!(report.finished);
/// assert!(!session.current().is_empty());
///
/// session.reset();
/// assert_eq!(session.current().len(), 27);
/// ```
pub struct ThinningSession<'a> {
    original: DigitalObject,
    current: DigitalObject,
    simple: Box<dyn SimplePointOracle + 'a>,
    isthmus: HashMap<IsthmusMode, Box<dyn IsthmusOracle + 'a>>,
    rounds: u32,
}

impl std::fmt::Debug for ThinningSession<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThinningSession")
            .field("original", &self.original.len())
            .field("current", &self.current.len())
            .field("rounds", &self.rounds)
            .finish_non_exhaustive()
    }
}

impl<'a> ThinningSession<'a> {
    /// Starts a session with memoized geometric oracles for the object's
    /// topology.
    pub fn new(object: DigitalObject) -> Self {
        let simple = Cached::new(GeometricSimplicity::new(object.topology()));
        Self {
            current: object.clone(),
            original: object,
            simple: Box::new(simple),
            isthmus: HashMap::new(),
            rounds: 0,
        }
    }

    /// Replaces the simple point oracle, e.g. with a loaded
    /// [`voxthin_core::LookupTable`].
    #[must_use]
    pub fn with_simple_oracle(mut self, oracle: impl SimplePointOracle + 'a) -> Self {
        self.simple = Box::new(oracle);
        self
    }

    /// Replaces the isthmus oracle used for `mode`.
    #[must_use]
    pub fn with_isthmus_oracle(
        mut self,
        mode: IsthmusMode,
        oracle: impl IsthmusOracle + 'a,
    ) -> Self {
        self.isthmus.insert(mode, Box::new(oracle));
        self
    }

    pub fn original(&self) -> &DigitalObject {
        &self.original
    }

    pub fn current(&self) -> &DigitalObject {
        &self.current
    }

    /// Rounds applied since the last reset.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Restores the original object.
    pub fn reset(&mut self) {
        self.current = self.original.clone();
        self.rounds = 0;
        log::debug!("session reset to {} points", self.current.len());
    }

    /// Applies one round of the basic scheme.
    pub fn step(&mut self) -> Result<RoundReport> {
        let mut scheme = ThinningScheme::basic(&*self.simple);
        let mut report = scheme.one_step(&mut self.current)?;
        self.rounds += 1;
        report.round = self.rounds;
        Ok(report)
    }

    /// Applies up to `n` rounds of the basic scheme, stopping early at a
    /// fixed point.
    pub fn step_n(&mut self, n: u32) -> Result<RunReport> {
        if n == 0 {
            return Ok(self.idle_report());
        }
        let scheme = ThinningScheme::basic(&*self.simple).with_max_rounds(n);
        drive(&mut self.current, &mut self.rounds, scheme)
    }

    /// Applies the basic scheme until no simple point remains.
    pub fn run_to_fixed_point(&mut self) -> Result<RunReport> {
        let scheme = ThinningScheme::basic(&*self.simple);
        drive(&mut self.current, &mut self.rounds, scheme)
    }

    /// Runs the critical-kernel scheme on the current object.
    ///
    /// The distance field is computed once from the current object before
    /// the first round. A persistence of `0` runs the basic scheme.
    pub fn critical_kernel(&mut self, mode: IsthmusMode, persistence: u32) -> Result<RunReport> {
        let options = ThinningOptions::critical_kernel(mode, persistence);
        self.run_with_options(&options)
    }

    /// Runs whichever scheme `options` select.
    pub fn run_with_options(&mut self, options: &ThinningOptions) -> Result<RunReport> {
        options.validate()?;
        let mut scheme = if options.is_basic() {
            ThinningScheme::basic(&*self.simple)
        } else {
            let topology = self.current.topology();
            let mode = options.isthmus_mode;
            let isthmus = self
                .isthmus
                .entry(mode)
                .or_insert_with(|| geometric_isthmus(mode, topology));
            let distance = DistanceField::compute(&self.current);
            ThinningScheme::critical_kernel(
                &*self.simple,
                &**isthmus,
                distance,
                options.persistence,
            )
        };
        if let Some(max) = options.max_rounds {
            scheme = scheme.with_max_rounds(max);
        }
        drive(&mut self.current, &mut self.rounds, scheme)
    }

    /// Points of the original object that have been thinned away.
    pub fn removed_points(&self) -> Vec<IVec3> {
        self.original
            .points()
            .filter(|p| !self.current.contains(*p))
            .collect()
    }

    fn idle_report(&self) -> RunReport {
        RunReport {
            rounds: 0,
            removed: 0,
            remaining: self.current.len(),
            finished: self.current.is_empty(),
            stopped: false,
        }
    }
}

fn geometric_isthmus<'b>(
    mode: IsthmusMode,
    topology: DigitalTopology,
) -> Box<dyn IsthmusOracle + 'b> {
    Box::new(Cached::new(GeometricIsthmus::new(mode, topology)))
}

fn drive(
    object: &mut DigitalObject,
    rounds: &mut u32,
    mut scheme: ThinningScheme<'_>,
) -> Result<RunReport> {
    let report = scheme.run_with(object, |_| ControlFlow::Continue(()))?;
    *rounds += report.rounds;
    Ok(report)
}
