//! Merge-additivity: running one worker over A ∪ B must equal merging the
//! outputs of two workers run over A and B separately, bin by bin, in both
//! the weighted and unweighted variants. This is the contract that makes
//! distributed execution correct.

mod common;

use common::{charged_pion, k0_short};
use multest::event::{EventHeader, McEvent, Track};
use multest::task::{MultEstTask, TaskConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ESTIMATORS: &str = "EtaLt05,EtaLt08,V0M,Total";

fn task() -> MultEstTask {
    MultEstTask::new(&TaskConfig {
        estimators: ESTIMATORS.into(),
        require_inel_gt0: true,
    })
    .unwrap()
}

/// A random event: mixed species, mixed charges, weights away from 1 so the
/// weighted and unweighted variants genuinely differ.
fn random_event(rng: &mut StdRng) -> McEvent {
    let n_tracks = rng.random_range(0..40);
    // weights are multiples of 0.25 so bin sums are exact in f64 and the
    // split/combined comparison is not at the mercy of addition order
    let weight = rng.random_range(1..=16) as f64 * 0.25;
    let mut event = McEvent::new(Some(EventHeader::pythia(weight, rng.random_range(1..10))), n_tracks);
    for _ in 0..n_tracks {
        let eta = rng.random_range(-6.0..6.0);
        let pt = rng.random_range(0.05..8.0);
        let track = match rng.random_range(0..4) {
            0 => charged_pion(eta, pt),
            1 => Track {
                eta,
                pt,
                charge: -1,
                pdg: -321,
            },
            2 => k0_short(eta, pt),
            _ => Track {
                eta,
                pt,
                charge: 0,
                pdg: 2112,
            }, // neutron: uncounted, unmatched
        };
        // one in five tracks is a transport secondary
        let primary = rng.random_range(0..5) > 0;
        event.push_track(track, None, primary);
    }
    event
}

#[test]
fn split_and_merged_runs_agree_bin_by_bin() {
    let mut rng = StdRng::seed_from_u64(0x6d756c74);
    let sample_a: Vec<McEvent> = (0..60).map(|_| random_event(&mut rng)).collect();
    let sample_b: Vec<McEvent> = (0..40).map(|_| random_event(&mut rng)).collect();

    let mut combined = task();
    for event in sample_a.iter().chain(&sample_b) {
        combined.consume(event);
    }

    let mut worker_a = task();
    for event in &sample_a {
        worker_a.consume(event);
    }
    let mut worker_b = task();
    for event in &sample_b {
        worker_b.consume(event);
    }

    let merged = worker_a
        .into_output()
        .merge(worker_b.into_output())
        .unwrap();
    let reference = combined.into_output();

    // HistogramSet equality covers every variant, bin contents, sumw2,
    // entry counts and the event ntuple rows.
    assert_eq!(merged, reference);
}

#[test]
fn merge_is_commutative() {
    let mut rng = StdRng::seed_from_u64(7);
    let sample_a: Vec<McEvent> = (0..20).map(|_| random_event(&mut rng)).collect();
    let sample_b: Vec<McEvent> = (0..20).map(|_| random_event(&mut rng)).collect();

    let run = |sample: &[McEvent]| {
        let mut t = task();
        for event in sample {
            t.consume(event);
        }
        t.into_output()
    };

    let ab = run(&sample_a).merge(run(&sample_b)).unwrap();
    let ba = run(&sample_b).merge(run(&sample_a)).unwrap();
    // event tuple rows are ordered by arrival, so compare histograms per
    // region instead of whole outputs
    for (left, right) in ab.regions().iter().zip(ba.regions()) {
        assert_eq!(left.name, right.name);
        assert_eq!(left.hists.dndeta, right.hists.dndeta);
        assert_eq!(left.hists.class_pt_species, right.hists.class_pt_species);
        assert_eq!(left.hists.event_counter, right.hists.event_counter);
        assert_eq!(left.hists.weight_diag, right.hists.weight_diag);
    }
}
