//! Synthetic event builders shared by the integration tests.

use multest::event::{EventHeader, McEvent, Track};

pub fn charged_pion(eta: f64, pt: f64) -> Track {
    Track {
        eta,
        pt,
        charge: 1,
        pdg: 211,
    }
}

pub fn k0_short(eta: f64, pt: f64) -> Track {
    Track {
        eta,
        pt,
        charge: 0,
        pdg: 310,
    }
}

/// A Pythia event whose tracks are all generator-level physical primaries.
pub fn primaries_event(weight: f64, tracks: &[Track]) -> McEvent {
    let mut event = McEvent::new(Some(EventHeader::pythia(weight, 1)), tracks.len());
    for track in tracks {
        event.push_track(*track, None, true);
    }
    event
}
