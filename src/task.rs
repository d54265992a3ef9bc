//! # Analysis task facade
//!
//! [`MultEstTask`] bundles the configured estimators behind the three entry
//! points the surrounding harness drives:
//!
//! 1. [`MultEstTask::new`] — setup: parse the estimator list, build one
//!    [`Estimator`](crate::estimator::Estimator) with its histogram set per
//!    region.
//! 2. [`MultEstTask::consume`] — per event: run the two-pass accumulation
//!    over every configured region.
//! 3. [`MultEstTask::finalize`] — once, on the merged output of all
//!    workers: derive the per-class dN/deta curves.
//!
//! Each worker owns one task instance; [`MultEstTask::into_output`] yields
//! the worker's [`AnalysisOutput`], and cross-worker combination is
//! [`AnalysisOutput::merge`]. Within a worker, events are consumed strictly
//! sequentially — one event is fully drained before the next begins.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::estimator::{Estimator, RegionRegistry};
use crate::event::{EventRecord, GeneratorFamily};
use crate::multest_errors::MultEstError;
use crate::output::{self, AnalysisOutput, DerivedResults};
use crate::primary::is_physical_primary;

/// Pseudorapidity window of the INEL>0 trigger condition.
const INEL_ETA_WINDOW: f64 = 1.0;

/// Task configuration, host-supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Comma-separated estimator names, matched by prefix against the fixed
    /// catalog (e.g. `"EtaLt05,V0M,Total"`). Unknown names are warned about
    /// and skipped.
    pub estimators: String,
    /// Only aggregate events with at least one physical primary inside
    /// |eta| < 1 (the INEL>0 event class). Rejected events are counted by
    /// no estimator.
    pub require_inel_gt0: bool,
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig {
            estimators: String::new(),
            require_inel_gt0: true,
        }
    }
}

/// One worker's analysis state: the configured estimators and their
/// accumulating histogram sets.
#[derive(Debug, Clone)]
pub struct MultEstTask {
    estimators: Vec<Estimator>,
    require_inel_gt0: bool,
}

impl MultEstTask {
    /// Setup: build the region registry from the configuration and create
    /// the per-region histogram sets.
    pub fn new(config: &TaskConfig) -> Result<MultEstTask, MultEstError> {
        let registry = RegionRegistry::from_spec(&config.estimators);
        let estimators = registry
            .iter()
            .cloned()
            .map(Estimator::new)
            .collect::<Result<Vec<_>, _>>()?;
        debug!("task set up with {} estimators", estimators.len());
        Ok(MultEstTask {
            estimators,
            require_inel_gt0: config.require_inel_gt0,
        })
    }

    pub fn estimators(&self) -> &[Estimator] {
        &self.estimators
    }

    /// Aggregate one event into every configured region.
    ///
    /// Per-event anomalies degrade gracefully: an unreadable track is logged
    /// and skipped, an unrecognized or missing generator header is logged
    /// and the event weight defaults to 1.0. Nothing here aborts the run.
    pub fn consume<E: EventRecord>(&mut self, event: &E) {
        let header = event.header();
        match header.map(|h| &h.family) {
            Some(GeneratorFamily::Pythia) | Some(GeneratorFamily::DpmJet) => {}
            Some(GeneratorFamily::Unknown(name)) => {
                warn!("unknown generator header '{name}'; event weight still applied");
            }
            None => warn!("event carries no generator header; weight defaults to 1"),
        }
        for est in &mut self.estimators {
            est.pre_event(header);
        }

        let stack = event.stack();

        // Pass 1: establish each region's multiplicity, latch INEL>0.
        let mut is_inel_gt0 = false;
        for index in 0..event.track_count() {
            let Some(track) = event.track(index) else {
                warn!("could not read track {index}; skipping");
                continue;
            };
            if !is_physical_primary(index, stack) {
                continue;
            }
            if track.eta.abs() < INEL_ETA_WINDOW {
                is_inel_gt0 = true;
            }
            for est in &mut self.estimators {
                est.count_track(track);
            }
        }

        if self.require_inel_gt0 && !is_inel_gt0 {
            debug!("event rejected: not INEL>0");
            return;
        }

        // Pass 2: multiplicities are final, fill the per-particle histograms.
        for est in &mut self.estimators {
            est.begin_filling();
        }
        for index in 0..event.track_count() {
            let Some(track) = event.track(index) else {
                // already reported in pass 1
                continue;
            };
            if !is_physical_primary(index, stack) {
                continue;
            }
            for est in &mut self.estimators {
                est.fill_track(track);
            }
        }
        for est in &mut self.estimators {
            est.post_event();
        }
    }

    /// Hand over this worker's merge unit.
    pub fn into_output(self) -> AnalysisOutput {
        AnalysisOutput::from_estimators(self.estimators)
    }

    /// Derive the final distributions from the merged output of all
    /// workers. Fatal when the merged output is missing or empty.
    pub fn finalize(merged: &AnalysisOutput) -> Result<DerivedResults, MultEstError> {
        output::finalize(merged)
    }
}
