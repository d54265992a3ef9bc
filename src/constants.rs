//! # Constants and type definitions for multest
//!
//! This module centralizes the **binning tables** and **common type definitions**
//! used throughout the `multest` library.
//!
//! ## Overview
//!
//! - Core type aliases used across the crate
//! - The pseudorapidity, multiplicity-class and event-weight axis definitions
//! - The variable-width transverse-momentum bin edge table shared by every
//!   per-species spectrum
//!
//! These definitions are used by all main modules, including the acceptance
//! regions, the per-region estimators, and the output model.

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Pseudorapidity
pub type Eta = f64;

/// Transverse momentum in GeV/c
pub type Pt = f64;

/// Per-event weight read from the generator header
pub type Weight = f64;

// -------------------------------------------------------------------------------------------------
// Axis definitions
// -------------------------------------------------------------------------------------------------

/// Number of multiplicity classes on the class axis of every per-region
/// histogram. An event with more charged primaries than this in a region
/// falls outside the axis and is not recorded.
pub const ESTIMATOR_BINS: usize = 200;

/// Number of bins on the pseudorapidity axis
pub const ETA_BINS: usize = 200;

/// Lower edge of the pseudorapidity axis
pub const ETA_AXIS_MIN: Eta = -10.0;

/// Upper edge of the pseudorapidity axis
pub const ETA_AXIS_MAX: Eta = 10.0;

/// Number of bins of the event-weight diagnostic axis
pub const WEIGHT_BINS: usize = 10_000;

/// Upper edge of the event-weight diagnostic axis (lower edge is 0)
pub const WEIGHT_AXIS_MAX: Weight = 10_000.0;

/// Bin edges of the transverse-momentum axis, in GeV/c.
///
/// Width grows with pT: 0.1 steps up to 2 GeV/c, then progressively coarser
/// bins up to 20 GeV/c, matching the statistics available per bin in
/// minimum-bias production.
pub const PT_BIN_EDGES: [Pt; 47] = [
    0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0, 1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7,
    1.8, 1.9, 2.0, // 0.1 * 20
    2.2, 2.4, 2.6, 2.8, 3.0, // 0.2 * 5
    3.3, 3.6, 3.9, 4.2, // 0.3 * 4
    4.6, 5.0, 5.4, // 0.4 * 3
    5.9, 6.5, 7.0, 7.5, 8.0, 8.5, 9.2, 10.0, 11.0, 12.0, 13.5, 15.0, 17.0, 20.0,
];
