//! # Output model, merging and finalization
//!
//! [`AnalysisOutput`] is the ordered, named collection of per-region
//! aggregates a worker produces; it is the unit the surrounding batch layer
//! persists and combines. Combination is the pure function
//! [`AnalysisOutput::merge`]: summing the outputs of two workers over
//! disjoint event samples equals one worker's output over the union. No
//! shared mutable state exists anywhere — each worker owns its instance
//! exclusively until merge time.
//!
//! [`finalize`] turns a fully merged output into the derived results: for
//! every multiplicity class with enough weighted events, the per-class
//! dN/deta curve (projection of the weighted eta-class histogram, divided by
//! the weighted event count of that class).

use ahash::AHashMap;
use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::estimator::{Estimator, HistogramSet};
use crate::histograms::Hist1D;
use crate::multest_errors::MultEstError;

/// The aggregates of one acceptance region, keyed by the region name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionOutput {
    pub name: String,
    pub title: String,
    pub hists: HistogramSet,
}

/// Ordered, named collection of per-region aggregates; the merge unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOutput {
    regions: Vec<RegionOutput>,
}

impl AnalysisOutput {
    /// Collect the aggregates out of a set of estimators, preserving their
    /// registry order.
    pub fn from_estimators(estimators: Vec<Estimator>) -> AnalysisOutput {
        let regions = estimators
            .into_iter()
            .map(|est| RegionOutput {
                name: est.region().name().to_owned(),
                title: est.region().title().to_owned(),
                hists: est.into_histograms(),
            })
            .collect();
        AnalysisOutput { regions }
    }

    pub fn regions(&self) -> &[RegionOutput] {
        &self.regions
    }

    pub fn region(&self, name: &str) -> Option<&RegionOutput> {
        self.regions.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Combine with the output of another worker over an independent event
    /// sample.
    ///
    /// Both outputs must cover the same regions (same task configuration on
    /// every worker); pairing is by region name so the other worker's
    /// ordering does not matter.
    pub fn merge(mut self, other: AnalysisOutput) -> Result<AnalysisOutput, MultEstError> {
        if self.regions.len() != other.regions.len() {
            return Err(MultEstError::RegionSetMismatch(format!(
                "{} regions vs {}",
                self.regions.len(),
                other.regions.len()
            )));
        }
        let by_name: AHashMap<&str, &RegionOutput> = other
            .regions
            .iter()
            .map(|r| (r.name.as_str(), r))
            .collect();
        for region in &mut self.regions {
            let Some(partner) = by_name.get(region.name.as_str()) else {
                return Err(MultEstError::RegionSetMismatch(format!(
                    "region '{}' missing from other output (has: {})",
                    region.name,
                    other.regions.iter().map(|r| r.name.as_str()).join(", ")
                )));
            };
            region.hists.merge(&partner.hists)?;
        }
        Ok(self)
    }
}

/// One per-class pseudorapidity density curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassCurve {
    /// Multiplicity class (charged primaries in the region)
    pub class: usize,
    /// Weighted number of events in this class
    pub weighted_events: f64,
    /// dN/deta of this class, normalized per weighted event
    pub dndeta: Hist1D,
}

/// The per-class curves of one region, stacked for overlay plotting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionResults {
    pub name: String,
    pub title: String,
    pub curves: Vec<ClassCurve>,
}

/// Everything derived at finalization, over all regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedResults {
    pub regions: Vec<RegionResults>,
}

/// Minimum weighted event count for a class to get a derived curve.
/// A single event cannot support a normalized density.
const MIN_WEIGHTED_EVENTS: f64 = 1.0;

/// Derive the final distributions from a fully merged output.
///
/// Arguments
/// -----------------
/// * `merged`: the sum of every worker's [`AnalysisOutput`].
///
/// Return
/// ----------
/// * Per-region stacks of per-class normalized dN/deta curves, or
///   [`MultEstError::MissingMergedOutput`] when `merged` is empty — derived
///   results cannot be computed without the merged aggregates.
pub fn finalize(merged: &AnalysisOutput) -> Result<DerivedResults, MultEstError> {
    if merged.is_empty() {
        return Err(MultEstError::MissingMergedOutput);
    }

    let mut regions = Vec::with_capacity(merged.len());
    for region in merged.regions() {
        let counter = &region.hists.event_counter.weighted;
        let mut curves = Vec::new();
        for class in 0..counter.axis().n_bins() {
            let weighted_events = counter.value(class);
            if weighted_events <= MIN_WEIGHTED_EVENTS {
                continue;
            }
            let mut curve = region
                .hists
                .dndeta
                .weighted
                .projection_x(class, &format!("dndeta_{}_class{class}", region.name));
            curve.scale(1.0 / weighted_events);
            curves.push(ClassCurve {
                class,
                weighted_events,
                dndeta: curve,
            });
        }
        debug!("{}: derived {} class curves", region.name, curves.len());
        regions.push(RegionResults {
            name: region.name.clone(),
            title: region.title.clone(),
            curves,
        });
    }
    info!("finalized {} regions", regions.len());
    Ok(DerivedResults { regions })
}

#[cfg(test)]
mod output_test {
    use super::*;
    use crate::estimator::AcceptanceRegion;

    fn output_for(names: &[&str]) -> AnalysisOutput {
        let estimators = names
            .iter()
            .map(|n| Estimator::new(AcceptanceRegion::from_name(n).unwrap()).unwrap())
            .collect();
        AnalysisOutput::from_estimators(estimators)
    }

    #[test]
    fn test_merge_rejects_mismatched_region_sets() {
        let err = output_for(&["EtaLt05"])
            .merge(output_for(&["EtaLt05", "V0M"]))
            .unwrap_err();
        assert!(matches!(err, MultEstError::RegionSetMismatch(_)));

        let err = output_for(&["EtaLt05"])
            .merge(output_for(&["V0M"]))
            .unwrap_err();
        assert!(matches!(err, MultEstError::RegionSetMismatch(_)));
    }

    #[test]
    fn test_merge_pairs_regions_by_name_not_order() {
        let a = output_for(&["EtaLt05", "V0M"]);
        let b = output_for(&["V0M", "EtaLt05"]);
        let merged = a.merge(b).unwrap();
        assert_eq!(merged.regions()[0].name, "EtaLt05");
        assert_eq!(merged.regions()[1].name, "V0M");
    }

    #[test]
    fn test_finalize_without_merged_output_is_fatal() {
        assert_eq!(
            finalize(&AnalysisOutput::default()),
            Err(MultEstError::MissingMergedOutput)
        );
    }

    #[test]
    fn test_finalize_skips_underpopulated_classes() {
        let mut output = output_for(&["EtaLt05"]);
        {
            let hists = &mut output.regions[0].hists;
            // class 2: two weighted events, one eta entry
            hists.event_counter.weighted.fill(2.0, 1.5);
            hists.event_counter.weighted.fill(2.0, 1.5);
            hists.dndeta.weighted.fill(0.3, 2.0, 3.0);
            // class 5: a single event, below threshold
            hists.event_counter.weighted.fill(5.0, 1.0);
            hists.dndeta.weighted.fill(0.1, 5.0, 1.0);
        }
        let results = finalize(&output).unwrap();
        assert_eq!(results.regions.len(), 1);
        let curves = &results.regions[0].curves;
        assert_eq!(curves.len(), 1);
        assert_eq!(curves[0].class, 2);
        assert_eq!(curves[0].weighted_events, 3.0);
        // 3.0 filled / 3.0 weighted events
        let eta_bin = curves[0].dndeta.axis().index(0.3).unwrap();
        assert_eq!(curves[0].dndeta.value(eta_bin), 1.0);
    }
}
