//! # Acceptance regions and the region registry
//!
//! An acceptance region is a named pseudorapidity window — or pair of
//! windows, one backward and one forward of mid-rapidity — defining one
//! multiplicity estimator. The well-known regions live in a fixed catalog
//! keyed by name prefix; a task configures its registry once from a
//! comma-separated list of names.

use log::warn;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::Eta;

/// A named pseudorapidity acceptance window pair. Immutable after
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceRegion {
    name: String,
    title: String,
    eta_min_backward: Eta,
    eta_max_backward: Eta,
    eta_min_forward: Eta,
    eta_max_forward: Eta,
    bypass: bool,
}

impl AcceptanceRegion {
    /// A region made of a backward and a forward window. Either window may
    /// be degenerate (`min == max == 0.0`) to express a single-sided region.
    pub fn windowed(
        name: &str,
        title: &str,
        eta_min_backward: Eta,
        eta_max_backward: Eta,
        eta_min_forward: Eta,
        eta_max_forward: Eta,
    ) -> AcceptanceRegion {
        AcceptanceRegion {
            name: name.to_owned(),
            title: title.to_owned(),
            eta_min_backward,
            eta_max_backward,
            eta_min_forward,
            eta_max_forward,
            bypass: false,
        }
    }

    /// A region accepting every pseudorapidity.
    pub fn full_acceptance(name: &str, title: &str) -> AcceptanceRegion {
        AcceptanceRegion {
            name: name.to_owned(),
            title: title.to_owned(),
            eta_min_backward: 0.0,
            eta_max_backward: 0.0,
            eta_min_forward: 0.0,
            eta_max_forward: 0.0,
            bypass: true,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether `eta` falls inside the region. Both window bounds are
    /// inclusive; a bypassing region accepts everything.
    pub fn contains(&self, eta: Eta) -> bool {
        self.bypass
            || (eta >= self.eta_min_backward && eta <= self.eta_max_backward)
            || (eta >= self.eta_min_forward && eta <= self.eta_max_forward)
    }

    /// Look up a region in the fixed catalog by name prefix.
    ///
    /// Return
    /// ----------
    /// * `Some(region)` when `name` starts with a catalog entry, `None`
    ///   otherwise. The region keeps the *catalog* name, not the full
    ///   configured string.
    pub fn from_name(name: &str) -> Option<AcceptanceRegion> {
        if name.starts_with("Total") {
            return Some(AcceptanceRegion::full_acceptance("Total", "full eta coverage"));
        }
        if name.starts_with("EtaLt05") {
            return Some(AcceptanceRegion::windowed(
                "EtaLt05", "|eta| <= 0.5", -0.5, 0.0, 0.0, 0.5,
            ));
        }
        if name.starts_with("EtaLt08") {
            return Some(AcceptanceRegion::windowed(
                "EtaLt08", "|eta| <= 0.8", -0.8, 0.0, 0.0, 0.8,
            ));
        }
        if name.starts_with("EtaLt15") {
            return Some(AcceptanceRegion::windowed(
                "EtaLt15", "|eta| <= 1.5", -1.5, 0.0, 0.0, 1.5,
            ));
        }
        if name.starts_with("Eta08_15") {
            return Some(AcceptanceRegion::windowed(
                "Eta08_15", "0.8 <= |eta| <= 1.5", -1.5, -0.8, 0.8, 1.5,
            ));
        }
        if name.starts_with("V0A") {
            return Some(AcceptanceRegion::windowed(
                "V0A", "2.8 <= eta <= 5.1", 0.0, 0.0, 2.8, 5.1,
            ));
        }
        if name.starts_with("V0C") {
            return Some(AcceptanceRegion::windowed(
                "V0C", "-3.7 <= eta <= -1.7", -3.7, -1.7, 0.0, 0.0,
            ));
        }
        if name.starts_with("V0M") {
            return Some(AcceptanceRegion::windowed(
                "V0M",
                "-3.7 <= eta <= -1.7 || 2.8 <= eta <= 5.1",
                -3.7,
                -1.7,
                2.8,
                5.1,
            ));
        }
        None
    }
}

/// The ordered set of acceptance regions a task runs with.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: SmallVec<[AcceptanceRegion; 8]>,
}

impl RegionRegistry {
    /// Parse a comma-separated list of region names against the catalog.
    ///
    /// Unknown names produce no region; they are warned about and otherwise
    /// ignored, so a misspelled entry thins the output rather than failing
    /// the job.
    pub fn from_spec(spec: &str) -> RegionRegistry {
        let mut regions = SmallVec::new();
        for name in spec.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match AcceptanceRegion::from_name(name) {
                Some(region) => regions.push(region),
                None => warn!("unknown estimator name '{name}'; no region registered"),
            }
        }
        RegionRegistry { regions }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcceptanceRegion> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

#[cfg(test)]
mod region_test {
    use super::*;

    #[test]
    fn test_bypass_accepts_everything() {
        let total = AcceptanceRegion::full_acceptance("Total", "full eta coverage");
        for eta in [-100.0, -0.8, 0.0, 3.3, 42.0] {
            assert!(total.contains(eta));
        }
    }

    #[test]
    fn test_two_sided_window_bounds_are_inclusive() {
        let region = AcceptanceRegion::windowed("EtaLt08", "", -0.8, 0.0, 0.0, 0.8);
        for eta in [-0.8, -0.5, 0.0, 0.5, 0.8] {
            assert!(region.contains(eta), "eta {eta}");
        }
        for eta in [-0.81, 0.81] {
            assert!(!region.contains(eta), "eta {eta}");
        }
    }

    #[test]
    fn test_single_sided_region_rejects_other_hemisphere() {
        let v0c = AcceptanceRegion::from_name("V0C").unwrap();
        assert!(v0c.contains(-2.0));
        assert!(!v0c.contains(2.0));
        // the degenerate forward window still accepts exactly 0.0
        assert!(v0c.contains(0.0));
    }

    #[test]
    fn test_catalog_prefix_matching() {
        assert_eq!(AcceptanceRegion::from_name("V0M_suffix").unwrap().name(), "V0M");
        let v0m = AcceptanceRegion::from_name("V0M").unwrap();
        assert!(v0m.contains(-2.0) && v0m.contains(3.0));
        assert!(!v0m.contains(1.0));
        assert!(AcceptanceRegion::from_name("NoSuchRegion").is_none());
    }

    #[test]
    fn test_registry_keeps_order_and_skips_unknown_names() {
        let registry = RegionRegistry::from_spec("EtaLt05, Bogus ,V0M,");
        let names: Vec<&str> = registry.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["EtaLt05", "V0M"]);
        assert!(RegionRegistry::from_spec("").is_empty());
    }
}
