//! # Physical-primary filtering
//!
//! A particle is a *physical primary* when it is directly attributable to
//! the simulated collision rather than to transport through detector
//! material. The simulation stack flags most species itself; neutral pions
//! are the exception — the stack treats them as unstable and never flags
//! them — so they get their own ancestry-based rule here.
//!
//! The heavy-flavor criterion used by the ancestry walk (leading decimal
//! digit of the absolute PDG code ≥ 4) is an inherited domain heuristic,
//! applied as-is.

use log::warn;

use crate::event::{ParticleStack, StackParticle};
use crate::species::Species;

const SIGMA0_PDG: u32 = 3212;

/// Whether the particle at `index` is a physical primary: either flagged so
/// by the stack itself, or a neutral pion passing the π0-specific rule.
pub fn is_physical_primary<S: ParticleStack>(index: usize, stack: &S) -> bool {
    stack.is_physical_primary(index) || is_pi0_physical_primary(index, stack)
}

/// Primary classification for neutral pions.
///
/// The stack never flags a π0 as primary, so the decision is reconstructed
/// from its production history:
///
/// - produced by the generator itself (index below the generator boundary):
///   primary;
/// - transport product whose mother is a generator-level Σ0 or π0: primary
///   (feed-down of generator particles);
/// - decay product of a heavy-flavor hadron: primary if that hadron — or,
///   walking the mother links back, the first generator-level ancestor — is
///   heavy flavor;
/// - anything descending from a light-hadron transport chain: not primary.
///
/// Arguments
/// -----------------
/// * `index`: stack index of the candidate particle.
/// * `stack`: the simulation particle stack.
///
/// Return
/// ----------
/// * `true` iff `index` points at a neutral pion classified as primary.
///   Any other species returns `false` (the stack flag already covers it).
///   A broken ancestry link is logged and classified as not primary.
pub fn is_pi0_physical_primary<S: ParticleStack>(index: usize, stack: &S) -> bool {
    let Some(particle) = stack.particle(index) else {
        warn!("could not read stack particle {index}; treating as non-primary");
        return false;
    };

    if particle.pdg.unsigned_abs() != Species::Pi0.pdg() as u32 {
        return false;
    }

    if index < stack.primary_count() {
        // Produced by the generator
        return true;
    }

    // Produced during transport: classify by the mother chain.
    let Some((mut mother_index, mut mother)) = lookup_mother(particle.first_mother, stack) else {
        warn!("stack particle {index} has no readable mother; treating as non-primary");
        return false;
    };

    let mother_pdg = mother.pdg.unsigned_abs();
    let mother_is_generated = mother_index < stack.primary_count();

    // Feed-down from a generator-level Sigma0
    if mother_pdg == SIGMA0_PDG && mother_is_generated {
        return true;
    }

    // Decay product of a generator-level pi0
    if mother_pdg == Species::Pi0.pdg() as u32 && mother_is_generated {
        return true;
    }

    // Light hadron mother: a secondary chain
    if leading_digit(mother_pdg) < 4 {
        return false;
    }

    // Heavy-flavor hadron produced by the generator
    if mother_is_generated {
        return true;
    }

    // The heavy-flavor mother is itself a transport product: walk back to
    // the first generator-level ancestor and re-apply the test there.
    while mother_index >= stack.primary_count() {
        match lookup_mother(mother.first_mother, stack) {
            Some((idx, m)) => {
                mother_index = idx;
                mother = m;
            }
            None => {
                warn!(
                    "broken ancestry above stack particle {index}; treating as non-primary"
                );
                return false;
            }
        }
    }

    leading_digit(mother.pdg.unsigned_abs()) >= 4
}

fn lookup_mother<S: ParticleStack>(
    mother: Option<usize>,
    stack: &S,
) -> Option<(usize, &StackParticle)> {
    let index = mother?;
    stack.particle(index).map(|p| (index, p))
}

fn leading_digit(mut pdg: u32) -> u32 {
    while pdg >= 10 {
        pdg /= 10;
    }
    pdg
}
