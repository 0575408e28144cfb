//! voxthin: topology-preserving thinning of 3D voxel objects.
//!
//! A [`DigitalObject`] is reduced by removing simple points, points whose
//! deletion does not change the topology of the object, round after round
//! until none is left.
//!
//! # Quick Start
//!
//! ```
//! use voxthin::*;
//!
//! fn main() -> Result<()> {
//!     // A 3x3x3 cube inside a 5x5x5 volume
//!     let domain = VoxelDomain::from_size(IVec3::splat(5))?;
//!     let cube = VoxelDomain::new(IVec3::ONE, IVec3::splat(3))?;
//!     let mut object = DigitalObject::from_points(domain, DigitalTopology::Adj26_6, cube.points())?;
//!
//!     // Curve skeleton, isthmuses protected for two rounds
//!     let options = ThinningOptions::critical_kernel(IsthmusMode::OneIsthmus, 2);
//!     let report = skeletonize(&mut object, &options)?;
//!     assert!(report.finished);
//!     assert_eq!(object.connected_components(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! # Schemes
//!
//! - **Basic**: every point simple at the start of a round is queued and
//!   removed if it is still simple when its turn comes.
//! - **Critical kernel**: as above, but isthmuses (points joining two
//!   branches, or lying inside a thin sheet) are protected for `persistence`
//!   rounds after they appear. In every clique of adjacent candidates tied
//!   on distance one point is kept. The kernel for a longer persistence
//!   always contains the kernel for a shorter one.
//!
//! Both are driven by [`ThinningScheme`]; [`ThinningSession`] adds the
//! step/run/reset cycle of an interactive viewer.

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]

pub mod basic;
pub mod clique;
pub mod persistence;
pub mod scheme;
pub mod session;

// Re-export core types
pub use voxthin_core::{
    configuration::{Configuration, CONFIGURATION_COUNT, NEIGHBOR_OFFSETS},
    distance::{DistanceField, DistanceMap},
    domain::VoxelDomain,
    error::{Result, ThinningError},
    isthmus::{GeometricIsthmus, IsthmusKind},
    object::DigitalObject,
    options::{IsthmusMode, Threshold, ThinningOptions},
    oracle::{Cached, IsthmusOracle, NoIsthmus, SimplePointOracle},
    simple::GeometricSimplicity,
    table::{LookupTable, TABLE_BYTES},
    topology::{Adjacency, DigitalTopology},
    IVec3,
};

pub use basic::SimplePeeling;
pub use clique::Candidate;
pub use persistence::CriticalKernelThinning;
pub use scheme::{RoundReport, RunReport, Thinning, ThinningScheme};
pub use session::ThinningSession;

/// Thins `object` in place with the scheme `options` select, using
/// geometric oracles for the object's topology.
pub fn skeletonize(object: &mut DigitalObject, options: &ThinningOptions) -> Result<RunReport> {
    let simple = Cached::new(GeometricSimplicity::new(object.topology()));
    let mut scheme = ThinningScheme::from_options(options, object, simple)?;
    log::debug!(
        "skeletonizing {} points with the {} scheme",
        object.len(),
        scheme.name()
    );
    scheme.run(object)
}
