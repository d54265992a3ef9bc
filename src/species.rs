//! # Species classification
//!
//! Maps PDG particle codes onto the small fixed set of species for which
//! per-class transverse-momentum spectra are accumulated. The mapping is an
//! exact match against eleven signed codes; every other code is outside the
//! table and contributes only to charged-multiplicity counting.
//!
//! The enum order is load-bearing: it is the bin order of the species axis
//! of [`Hist3D`](crate::histograms::Hist3D) spectra, so reordering variants
//! silently relabels merged output.

use serde::{Deserialize, Serialize};

/// Number of identified species, i.e. the size of the species axis.
pub const SPECIES_COUNT: usize = 11;

/// The identified-particle species tracked by the pT spectra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Proton,
    Lambda,
    K0Short,
    KPlus,
    KMinus,
    PiPlus,
    PiMinus,
    Pi0,
    Xi,
    OmegaMinus,
    OmegaPlus,
}

impl Species {
    /// All species, in species-axis bin order.
    pub const ALL: [Species; SPECIES_COUNT] = [
        Species::Proton,
        Species::Lambda,
        Species::K0Short,
        Species::KPlus,
        Species::KMinus,
        Species::PiPlus,
        Species::PiMinus,
        Species::Pi0,
        Species::Xi,
        Species::OmegaMinus,
        Species::OmegaPlus,
    ];

    /// Classify a signed PDG code.
    ///
    /// Arguments
    /// -----------------
    /// * `pdg`: the signed PDG code of a generated particle.
    ///
    /// Return
    /// ----------
    /// * `Some(species)` for one of the eleven tabulated codes, `None` for
    ///   anything else (total over all inputs).
    pub fn from_pdg(pdg: i32) -> Option<Species> {
        match pdg {
            2212 => Some(Species::Proton),
            3122 => Some(Species::Lambda),
            310 => Some(Species::K0Short),
            321 => Some(Species::KPlus),
            -321 => Some(Species::KMinus),
            211 => Some(Species::PiPlus),
            -211 => Some(Species::PiMinus),
            111 => Some(Species::Pi0),
            3322 => Some(Species::Xi),
            3334 => Some(Species::OmegaMinus),
            -3334 => Some(Species::OmegaPlus),
            _ => None,
        }
    }

    /// The signed PDG code of this species.
    pub fn pdg(self) -> i32 {
        match self {
            Species::Proton => 2212,
            Species::Lambda => 3122,
            Species::K0Short => 310,
            Species::KPlus => 321,
            Species::KMinus => -321,
            Species::PiPlus => 211,
            Species::PiMinus => -211,
            Species::Pi0 => 111,
            Species::Xi => 3322,
            Species::OmegaMinus => 3334,
            Species::OmegaPlus => -3334,
        }
    }

    /// Bin index on the species axis.
    pub fn index(self) -> usize {
        self as usize
    }
}
