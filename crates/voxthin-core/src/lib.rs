//! Core abstractions for voxthin.
//!
//! This crate provides the data types and collaborators the thinning schemes
//! work on:
//! - [`VoxelDomain`] and [`DigitalObject`], a point set with its backing grid
//! - [`Configuration`], the 26-neighborhood occupancy mask
//! - [`SimplePointOracle`] and [`IsthmusOracle`] with table-driven and
//!   geometric implementations
//! - [`DistanceField`], the removal priority of the critical-kernel scheme
//! - Errors and run options

// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
// Lattice coordinates are small; index casts between i32/usize/u32 are intended
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::must_use_candidate)]

pub mod configuration;
pub mod distance;
pub mod domain;
pub mod error;
pub mod isthmus;
pub mod object;
pub mod options;
pub mod oracle;
pub mod simple;
pub mod table;
pub mod topology;

pub use configuration::{Configuration, CONFIGURATION_COUNT, NEIGHBOR_COUNT, NEIGHBOR_OFFSETS};
pub use distance::{DistanceField, DistanceMap};
pub use domain::VoxelDomain;
pub use error::{Result, ThinningError};
pub use isthmus::{GeometricIsthmus, IsthmusKind};
pub use object::DigitalObject;
pub use options::{IsthmusMode, Threshold, ThinningOptions};
pub use oracle::{Cached, IsthmusOracle, NoIsthmus, SimplePointOracle};
pub use simple::GeometricSimplicity;
pub use table::{LookupTable, TABLE_BYTES};
pub use topology::{Adjacency, DigitalTopology};

// Re-export glam types for convenience
pub use glam::IVec3;
