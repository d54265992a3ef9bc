//! # Event-record collaborator seam
//!
//! This module defines the boundary between the aggregation logic and
//! whatever harness feeds it Monte-Carlo events. The host side is modelled
//! as two read-only traits:
//!
//! - [`EventRecord`] — one generated event: indexed track access, the
//!   generator header, and the particle stack.
//! - [`ParticleStack`] — the simulation stack view needed by the
//!   primary-particle filter: the host's own physical-primary flag, the
//!   generator-particle boundary, and ancestry links.
//!
//! [`McEvent`]/[`McStack`] are plain in-memory implementations used by the
//! test suite and by any batch harness that already holds events in memory.
//!
//! ## Conventions
//!
//! - Track index and stack index refer to the same particle; an event's
//!   tracks and its stack entries are parallel.
//! - A `None` track at a valid index models a track the host could not
//!   read back. Callers log and skip it (the event continues).
//! - Charge is in units of the elementary charge; only `charge != 0`
//!   matters to the counting logic.

use serde::{Deserialize, Serialize};

use crate::constants::{Eta, Pt, Weight};

/// One generated particle as seen by the acceptance and counting logic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// Pseudorapidity
    pub eta: Eta,
    /// Transverse momentum in GeV/c
    pub pt: Pt,
    /// Electric charge in units of e
    pub charge: i32,
    /// Signed PDG code
    pub pdg: i32,
}

/// Generator family advertised by the event header.
///
/// Only two families carry information this logic uses (Pythia exposes the
/// number of multi-parton interactions). Anything else is tolerated: the
/// event weight is still read, the family is logged once per event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeneratorFamily {
    Pythia,
    DpmJet,
    Unknown(String),
}

/// Event-level metadata read from the generator header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHeader {
    pub family: GeneratorFamily,
    /// Per-event weight; 1.0 for unweighted production
    pub weight: Weight,
    /// Number of multi-parton interactions, Pythia only
    pub n_mpi: Option<u32>,
}

impl EventHeader {
    /// Header of an unweighted Pythia event.
    pub fn pythia(weight: Weight, n_mpi: u32) -> Self {
        EventHeader {
            family: GeneratorFamily::Pythia,
            weight,
            n_mpi: Some(n_mpi),
        }
    }

    pub fn dpmjet(weight: Weight) -> Self {
        EventHeader {
            family: GeneratorFamily::DpmJet,
            weight,
            n_mpi: None,
        }
    }
}

/// One entry of the simulation particle stack, as needed by ancestry walks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StackParticle {
    /// Signed PDG code
    pub pdg: i32,
    /// Stack index of the first mother, if any
    pub first_mother: Option<usize>,
}

/// Read-only view of the simulation particle stack.
pub trait ParticleStack {
    /// The host's own physical-primary flag for the particle at `index`.
    /// Neutral pions are *not* flagged primary by the host; see
    /// [`crate::primary::is_pi0_physical_primary`].
    fn is_physical_primary(&self, index: usize) -> bool;

    /// Number of generator-level particles: indices below this boundary were
    /// produced directly by the event generator, indices at or above it by
    /// transport.
    fn primary_count(&self) -> usize;

    /// Stack entry at `index`, `None` when the index is out of range or the
    /// entry is unreadable.
    fn particle(&self, index: usize) -> Option<&StackParticle>;
}

/// Read-only view of one Monte-Carlo event.
pub trait EventRecord {
    type Stack: ParticleStack;

    /// Number of track slots in the event (including unreadable ones).
    fn track_count(&self) -> usize;

    /// Track at `index`, `None` when the host cannot provide it.
    fn track(&self, index: usize) -> Option<&Track>;

    /// Generator header, `None` when absent. The event weight then defaults
    /// to 1.0.
    fn header(&self) -> Option<&EventHeader>;

    fn stack(&self) -> &Self::Stack;
}

/// In-memory particle stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct McStack {
    particles: Vec<StackParticle>,
    primary_flags: Vec<bool>,
    primary_count: usize,
}

impl McStack {
    pub fn new(primary_count: usize) -> Self {
        McStack {
            particles: Vec::new(),
            primary_flags: Vec::new(),
            primary_count,
        }
    }

    pub fn push(&mut self, particle: StackParticle, physical_primary: bool) {
        self.particles.push(particle);
        self.primary_flags.push(physical_primary);
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl ParticleStack for McStack {
    fn is_physical_primary(&self, index: usize) -> bool {
        self.primary_flags.get(index).copied().unwrap_or(false)
    }

    fn primary_count(&self) -> usize {
        self.primary_count
    }

    fn particle(&self, index: usize) -> Option<&StackParticle> {
        self.particles.get(index)
    }
}

/// In-memory Monte-Carlo event.
///
/// Built track by track; each pushed track appends the matching stack entry
/// so that track and stack indices stay parallel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McEvent {
    tracks: Vec<Option<Track>>,
    header: Option<EventHeader>,
    stack: McStack,
}

impl McEvent {
    /// Start an event with `primary_count` generator-level particles.
    pub fn new(header: Option<EventHeader>, primary_count: usize) -> Self {
        McEvent {
            tracks: Vec::new(),
            header,
            stack: McStack::new(primary_count),
        }
    }

    /// Append a readable track and its stack entry.
    pub fn push_track(&mut self, track: Track, mother: Option<usize>, physical_primary: bool) {
        self.stack.push(
            StackParticle {
                pdg: track.pdg,
                first_mother: mother,
            },
            physical_primary,
        );
        self.tracks.push(Some(track));
    }

    /// Append a track slot the host cannot read back. The stack entry is
    /// still present, as it is in the simulation stack.
    pub fn push_unreadable(&mut self, particle: StackParticle, physical_primary: bool) {
        self.stack.push(particle, physical_primary);
        self.tracks.push(None);
    }
}

impl EventRecord for McEvent {
    type Stack = McStack;

    fn track_count(&self) -> usize {
        self.tracks.len()
    }

    fn track(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index).and_then(|t| t.as_ref())
    }

    fn header(&self) -> Option<&EventHeader> {
        self.header.as_ref()
    }

    fn stack(&self) -> &McStack {
        &self.stack
    }
}
