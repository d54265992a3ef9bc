//! # Per-region persistent aggregates
//!
//! [`HistogramSet`] is everything one acceptance region accumulates over an
//! event sample. It is the merge-visible state: two workers running over
//! disjoint samples combine by [`HistogramSet::merge`], and nothing
//! event-transient is allowed in here.

use serde::{Deserialize, Serialize};

use crate::constants::{
    Weight, ESTIMATOR_BINS, ETA_AXIS_MAX, ETA_AXIS_MIN, ETA_BINS, PT_BIN_EDGES, WEIGHT_AXIS_MAX,
    WEIGHT_BINS,
};
use crate::histograms::{Axis, Hist1D, Hist2D, Hist3D};
use crate::multest_errors::MultEstError;
use crate::species::{Species, SPECIES_COUNT};

use super::region::AcceptanceRegion;

/// A weighted histogram and its unweighted twin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPair<H> {
    pub weighted: H,
    pub unweighted: H,
}

/// One event-level row of the multiplicity ntuple: the in-region charged
/// primary count, the event weight, and the Pythia multi-parton-interaction
/// count where available. Merging is concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventTuple {
    pub nch: u32,
    pub weight: Weight,
    pub n_mpi: Option<u32>,
}

/// The persistent aggregates of one acceptance region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSet {
    /// Charged-primary eta vs. multiplicity class
    pub dndeta: VariantPair<Hist2D>,
    /// Multiplicity class vs. pT vs. species
    pub class_pt_species: VariantPair<Hist3D>,
    /// Events per multiplicity class
    pub event_counter: VariantPair<Hist1D>,
    /// Event-weight distribution per multiplicity class (diagnostic)
    pub weight_diag: Hist2D,
    /// Per-event multiplicity rows
    pub event_tuples: Vec<EventTuple>,
}

fn class_axis() -> Result<Axis, MultEstError> {
    Axis::uniform(ESTIMATOR_BINS, 0.0, ESTIMATOR_BINS as f64)
}

impl HistogramSet {
    /// Create the empty aggregates for `region`. Histogram titles carry the
    /// region title; names carry the variant suffix, matching what ends up
    /// in persisted output.
    pub fn new(region: &AcceptanceRegion) -> Result<HistogramSet, MultEstError> {
        let eta_axis = Axis::uniform(ETA_BINS, ETA_AXIS_MIN, ETA_AXIS_MAX)?;
        let pt_axis = Axis::from_edges(PT_BIN_EDGES.to_vec())?;
        // shift bins to center around integer species indices
        let species_axis =
            Axis::from_edges((0..=SPECIES_COUNT).map(|i| i as f64 - 0.5).collect())?;
        let weight_axis = Axis::uniform(WEIGHT_BINS, 0.0, WEIGHT_AXIS_MAX)?;

        let dndeta_title = format!("dN/deta, {}", region.title());
        let spectrum_title = format!("Event class vs. pT vs. species, {}", region.title());
        let counter_title = format!("Multiplicity distribution, {}", region.title());

        Ok(HistogramSet {
            dndeta: VariantPair {
                weighted: Hist2D::new("dndeta", &dndeta_title, eta_axis.clone(), class_axis()?),
                unweighted: Hist2D::new(
                    "dndeta_unweighted",
                    &dndeta_title,
                    eta_axis,
                    class_axis()?,
                ),
            },
            class_pt_species: VariantPair {
                weighted: Hist3D::new(
                    "class_pt_species",
                    &spectrum_title,
                    class_axis()?,
                    pt_axis.clone(),
                    species_axis.clone(),
                ),
                unweighted: Hist3D::new(
                    "class_pt_species_unweighted",
                    &spectrum_title,
                    class_axis()?,
                    pt_axis,
                    species_axis,
                ),
            },
            event_counter: VariantPair {
                weighted: Hist1D::new("event_counter", &counter_title, class_axis()?),
                unweighted: Hist1D::new("event_counter_unweighted", &counter_title, class_axis()?),
            },
            weight_diag: Hist2D::new(
                "weight_esti",
                "Distribution of weights in each multiplicity class",
                weight_axis,
                class_axis()?,
            ),
            event_tuples: Vec::new(),
        })
    }

    /// Add another region's aggregates bin-by-bin; ntuple rows concatenate.
    pub fn merge(&mut self, other: &HistogramSet) -> Result<(), MultEstError> {
        self.dndeta.weighted.merge(&other.dndeta.weighted)?;
        self.dndeta.unweighted.merge(&other.dndeta.unweighted)?;
        self.class_pt_species
            .weighted
            .merge(&other.class_pt_species.weighted)?;
        self.class_pt_species
            .unweighted
            .merge(&other.class_pt_species.unweighted)?;
        self.event_counter.weighted.merge(&other.event_counter.weighted)?;
        self.event_counter
            .unweighted
            .merge(&other.event_counter.unweighted)?;
        self.weight_diag.merge(&other.weight_diag)?;
        self.event_tuples.extend_from_slice(&other.event_tuples);
        Ok(())
    }

    /// Species-axis coordinate for `species`, the value to pass as the z
    /// argument of the spectrum fill.
    pub fn species_coordinate(species: Species) -> f64 {
        species.index() as f64
    }
}
