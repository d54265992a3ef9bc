//! # Multiplicity estimators
//!
//! One [`Estimator`] pairs an acceptance region with its persistent
//! [`HistogramSet`] and drives the two-pass-per-event scheme:
//!
//! ```text
//! pre_event        count_track*       begin_filling      fill_track*      post_event
//! Idle ────────▶ Counting ──────────────────▶ Filling ─────────────────▶ Idle
//! ```
//!
//! Pass 1 ([`Estimator::count_track`]) only counts charged in-region tracks
//! to establish the event's multiplicity class. Pass 2
//! ([`Estimator::fill_track`]) fills the per-particle histograms keyed by
//! that now-known class. The [`Estimator::begin_filling`] barrier makes the
//! ordering explicit: no fill can ever observe a partially-computed count.
//!
//! Primary-particle selection is the caller's job (see
//! [`crate::task::MultEstTask::consume`]): both passes receive physical
//! primaries only, so the stack-walking π0 rule stays out of the hot loop.

pub mod hist_set;
pub mod region;

use log::debug;

use crate::constants::Weight;
use crate::event::{EventHeader, Track};
use crate::multest_errors::MultEstError;
use crate::species::Species;

pub use hist_set::{EventTuple, HistogramSet, VariantPair};
pub use region::{AcceptanceRegion, RegionRegistry};

/// Per-event phase of an estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Counting,
    Filling,
}

/// One acceptance region plus its aggregates and per-event scratch state.
#[derive(Debug, Clone)]
pub struct Estimator {
    region: AcceptanceRegion,
    hists: HistogramSet,
    phase: Phase,
    /// Charged physical primaries counted in-region this event
    nch_in_region: u32,
    /// Identified particles seen this event, by species-axis index
    species_counts: [u32; crate::species::SPECIES_COUNT],
    event_weight: Weight,
    n_mpi: Option<u32>,
}

impl Estimator {
    pub fn new(region: AcceptanceRegion) -> Result<Estimator, MultEstError> {
        let hists = HistogramSet::new(&region)?;
        Ok(Estimator {
            region,
            hists,
            phase: Phase::Idle,
            nch_in_region: 0,
            species_counts: [0; crate::species::SPECIES_COUNT],
            event_weight: 1.0,
            n_mpi: None,
        })
    }

    pub fn region(&self) -> &AcceptanceRegion {
        &self.region
    }

    pub fn name(&self) -> &str {
        self.region.name()
    }

    /// The multiplicity counted so far this event. Only meaningful after
    /// the counting pass is complete.
    pub fn multiplicity(&self) -> u32 {
        self.nch_in_region
    }

    /// Reset the per-event scratch state and cache the event metadata.
    /// The weight defaults to 1.0 when no header is available.
    pub fn pre_event(&mut self, header: Option<&EventHeader>) {
        self.nch_in_region = 0;
        self.species_counts = [0; crate::species::SPECIES_COUNT];
        self.event_weight = header.map_or(1.0, |h| h.weight);
        self.n_mpi = header.and_then(|h| h.n_mpi);
        self.phase = Phase::Counting;
    }

    /// Counting pass: a charged track inside the region increments the
    /// event's multiplicity. `track` must be a physical primary.
    pub fn count_track(&mut self, track: &Track) {
        debug_assert_eq!(self.phase, Phase::Counting, "count_track outside counting pass");
        if self.phase != Phase::Counting {
            return;
        }
        if track.charge != 0 && self.region.contains(track.eta) {
            self.nch_in_region += 1;
        }
    }

    /// Barrier between the two passes: the multiplicity class is final from
    /// here on.
    pub fn begin_filling(&mut self) {
        debug_assert_eq!(self.phase, Phase::Counting, "begin_filling outside counting pass");
        self.phase = Phase::Filling;
    }

    /// Filling pass: fill the per-particle histograms with the known
    /// multiplicity class. `track` must be a physical primary; unlike the
    /// counting pass it is *not* restricted to the acceptance region.
    pub fn fill_track(&mut self, track: &Track) {
        debug_assert_eq!(self.phase, Phase::Filling, "fill_track outside filling pass");
        if self.phase != Phase::Filling {
            return;
        }
        let class = self.nch_in_region as f64;

        // Only charged tracks enter dN/deta
        if track.charge != 0 {
            self.hists.dndeta.weighted.fill(track.eta, class, self.event_weight);
            self.hists.dndeta.unweighted.fill(track.eta, class, 1.0);
        }

        // Identified species may be uncharged
        if let Some(species) = Species::from_pdg(track.pdg) {
            let coord = HistogramSet::species_coordinate(species);
            self.hists
                .class_pt_species
                .weighted
                .fill(class, track.pt, coord, self.event_weight);
            self.hists
                .class_pt_species
                .unweighted
                .fill(class, track.pt, coord, 1.0);
            self.species_counts[species.index()] += 1;
        }
    }

    /// Close the event: record the event counters, the weight diagnostic and
    /// the ntuple row, then return to idle.
    pub fn post_event(&mut self) {
        debug_assert_eq!(self.phase, Phase::Filling, "post_event outside filling pass");
        if self.phase != Phase::Filling {
            return;
        }
        let class = self.nch_in_region as f64;
        self.hists.event_counter.weighted.fill(class, self.event_weight);
        self.hists.event_counter.unweighted.fill(class, 1.0);
        self.hists.weight_diag.fill(self.event_weight, class, 1.0);
        self.hists.event_tuples.push(EventTuple {
            nch: self.nch_in_region,
            weight: self.event_weight,
            n_mpi: self.n_mpi,
        });
        debug!(
            "{}: event closed with nch={} weight={}",
            self.region.name(),
            self.nch_in_region,
            self.event_weight
        );
        self.phase = Phase::Idle;
    }

    /// Hand over the merge-visible aggregates, consuming the estimator.
    pub fn into_histograms(self) -> HistogramSet {
        self.hists
    }

    pub fn histograms(&self) -> &HistogramSet {
        &self.hists
    }
}

#[cfg(test)]
mod estimator_test {
    use super::*;
    use crate::event::EventHeader;

    fn charged(eta: f64, pt: f64, pdg: i32) -> Track {
        Track {
            eta,
            pt,
            charge: 1,
            pdg,
        }
    }

    fn eta_lt_05() -> Estimator {
        Estimator::new(AcceptanceRegion::windowed(
            "EtaLt05", "|eta| <= 0.5", -0.5, 0.0, 0.0, 0.5,
        ))
        .unwrap()
    }

    #[test]
    fn test_counting_pass_counts_charged_in_region_only() {
        let mut est = eta_lt_05();
        est.pre_event(Some(&EventHeader::pythia(1.0, 1)));
        est.count_track(&charged(0.3, 1.0, 211));
        est.count_track(&charged(2.0, 1.0, 211)); // out of region
        est.count_track(&Track {
            eta: 0.1,
            pt: 0.4,
            charge: 0,
            pdg: 310,
        }); // neutral
        assert_eq!(est.multiplicity(), 1);
    }

    #[test]
    fn test_fills_use_the_final_count_regardless_of_track_order() {
        // Two estimators over the same tracks in opposite orders must agree.
        let tracks = [
            charged(0.3, 0.7, 211),
            charged(-0.2, 1.1, -211),
            charged(0.45, 2.0, 321),
        ];
        let mut forward = eta_lt_05();
        let mut backward = eta_lt_05();
        for est in [&mut forward, &mut backward] {
            est.pre_event(None);
        }
        for t in &tracks {
            forward.count_track(t);
        }
        for t in tracks.iter().rev() {
            backward.count_track(t);
        }
        for est in [&mut forward, &mut backward] {
            est.begin_filling();
        }
        for t in &tracks {
            forward.fill_track(t);
        }
        for t in tracks.iter().rev() {
            backward.fill_track(t);
        }
        for est in [&mut forward, &mut backward] {
            est.post_event();
        }
        assert_eq!(forward.histograms(), backward.histograms());
        assert_eq!(
            forward.histograms().event_counter.unweighted.value(3),
            1.0
        );
    }

    #[test]
    fn test_scratch_state_resets_between_events() {
        let mut est = eta_lt_05();
        est.pre_event(Some(&EventHeader::pythia(2.0, 4)));
        est.count_track(&charged(0.1, 1.0, 211));
        est.begin_filling();
        est.fill_track(&charged(0.1, 1.0, 211));
        est.post_event();

        est.pre_event(None);
        assert_eq!(est.multiplicity(), 0);
        est.begin_filling();
        est.post_event();

        let tuples = &est.histograms().event_tuples;
        assert_eq!(tuples.len(), 2);
        assert_eq!(tuples[0].weight, 2.0);
        assert_eq!(tuples[0].n_mpi, Some(4));
        // second event had no header: weight falls back to 1.0
        assert_eq!(tuples[1].weight, 1.0);
        assert_eq!(tuples[1].n_mpi, None);
    }

    #[test]
    fn test_uncharged_species_fill_spectrum_but_not_dndeta() {
        let mut est = eta_lt_05();
        est.pre_event(None);
        let k0s = Track {
            eta: 0.1,
            pt: 0.4,
            charge: 0,
            pdg: 310,
        };
        est.count_track(&k0s);
        est.begin_filling();
        est.fill_track(&k0s);
        est.post_event();

        let hists = est.histograms();
        assert_eq!(hists.dndeta.unweighted.entries(), 0.0);
        assert_eq!(hists.class_pt_species.unweighted.entries(), 1.0);
    }
}
