//! # Additive histogram model
//!
//! Minimal weighted histograms used as the merge unit of the whole crate:
//! everything a parallel worker accumulates lives in these types, and
//! combining two workers is bin-by-bin addition ([`Hist1D::merge`] and
//! friends). Merging requires identical binning; anything else is a
//! configuration error, not a recoverable condition.
//!
//! ## Conventions
//!
//! - Bins are half-open `[lo, hi)`, except the last bin which also contains
//!   its upper edge.
//! - There are no under/overflow bins: a fill outside the axis is dropped.
//! - Every fill also accumulates the squared weight per bin (`sumw2`), so
//!   statistical errors survive merging and scaling.
//!
//! The field model (name/title/edges/content/sumw2/entries) follows the
//! usual on-file histogram layout of HEP analyses.

use itertools::izip;
use serde::{Deserialize, Serialize};

use crate::constants::Weight;
use crate::multest_errors::MultEstError;

/// One histogram axis: an ordered set of bin edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    edges: Vec<f64>,
}

impl Axis {
    /// `n_bins` equal-width bins over `[min, max]`.
    pub fn uniform(n_bins: usize, min: f64, max: f64) -> Result<Axis, MultEstError> {
        if n_bins == 0 || !(min < max) {
            return Err(MultEstError::InvalidAxis(format!(
                "uniform axis needs n_bins > 0 and min < max, got n_bins={n_bins}, [{min}, {max}]"
            )));
        }
        let width = (max - min) / n_bins as f64;
        let mut edges: Vec<f64> = (0..n_bins).map(|i| min + i as f64 * width).collect();
        edges.push(max);
        Ok(Axis { edges })
    }

    /// An axis from explicit, strictly increasing bin edges.
    pub fn from_edges(edges: Vec<f64>) -> Result<Axis, MultEstError> {
        if edges.len() < 2 || edges.windows(2).any(|w| !(w[0] < w[1])) {
            return Err(MultEstError::InvalidAxis(
                "axis edges must be strictly increasing with at least two entries".into(),
            ));
        }
        Ok(Axis { edges })
    }

    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin index containing `x`, `None` outside the axis. The upper edge of
    /// the last bin is inclusive.
    pub fn index(&self, x: f64) -> Option<usize> {
        let (&lo, &hi) = (self.edges.first()?, self.edges.last()?);
        if !(x >= lo && x <= hi) {
            return None;
        }
        if x == hi {
            return Some(self.n_bins() - 1);
        }
        // partition_point: first edge > x, minus one edge = containing bin
        Some(self.edges.partition_point(|&e| e <= x) - 1)
    }

    /// Center of bin `i`.
    pub fn center(&self, i: usize) -> f64 {
        0.5 * (self.edges[i] + self.edges[i + 1])
    }
}

macro_rules! check_same_binning {
    ($a:expr, $b:expr) => {
        if $a.axes() != $b.axes() {
            return Err(MultEstError::BinningMismatch($a.name.clone()));
        }
    };
}

/// A one-dimensional weighted histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist1D {
    pub name: String,
    pub title: String,
    axis: Axis,
    content: Vec<f64>,
    sumw2: Vec<f64>,
    entries: f64,
}

impl Hist1D {
    pub fn new(name: &str, title: &str, axis: Axis) -> Hist1D {
        let n = axis.n_bins();
        Hist1D {
            name: name.to_owned(),
            title: title.to_owned(),
            axis,
            content: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0.0,
        }
    }

    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    fn axes(&self) -> &Axis {
        &self.axis
    }

    pub fn fill(&mut self, x: f64, weight: Weight) {
        if let Some(i) = self.axis.index(x) {
            self.content[i] += weight;
            self.sumw2[i] += weight * weight;
            self.entries += 1.0;
        }
    }

    pub fn value(&self, bin: usize) -> f64 {
        self.content[bin]
    }

    /// Statistical error of bin `bin` (square root of the summed squared
    /// weights).
    pub fn error(&self, bin: usize) -> f64 {
        self.sumw2[bin].sqrt()
    }

    pub fn entries(&self) -> f64 {
        self.entries
    }

    pub fn content(&self) -> &[f64] {
        &self.content
    }

    /// Multiply every bin by `factor` (errors scale accordingly).
    pub fn scale(&mut self, factor: f64) {
        for (c, w2) in izip!(&mut self.content, &mut self.sumw2) {
            *c *= factor;
            *w2 *= factor * factor;
        }
    }

    /// Add `other` bin-by-bin. Fails unless the binning is identical.
    pub fn merge(&mut self, other: &Hist1D) -> Result<(), MultEstError> {
        check_same_binning!(self, other);
        for (c, w2, oc, ow2) in izip!(
            &mut self.content,
            &mut self.sumw2,
            &other.content,
            &other.sumw2
        ) {
            *c += oc;
            *w2 += ow2;
        }
        self.entries += other.entries;
        Ok(())
    }
}

/// A two-dimensional weighted histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist2D {
    pub name: String,
    pub title: String,
    x_axis: Axis,
    y_axis: Axis,
    content: Vec<f64>,
    sumw2: Vec<f64>,
    entries: f64,
}

impl Hist2D {
    pub fn new(name: &str, title: &str, x_axis: Axis, y_axis: Axis) -> Hist2D {
        let n = x_axis.n_bins() * y_axis.n_bins();
        Hist2D {
            name: name.to_owned(),
            title: title.to_owned(),
            x_axis,
            y_axis,
            content: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0.0,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    fn axes(&self) -> (&Axis, &Axis) {
        (&self.x_axis, &self.y_axis)
    }

    fn flat(&self, ix: usize, iy: usize) -> usize {
        iy * self.x_axis.n_bins() + ix
    }

    pub fn fill(&mut self, x: f64, y: f64, weight: Weight) {
        if let (Some(ix), Some(iy)) = (self.x_axis.index(x), self.y_axis.index(y)) {
            let i = self.flat(ix, iy);
            self.content[i] += weight;
            self.sumw2[i] += weight * weight;
            self.entries += 1.0;
        }
    }

    pub fn value(&self, ix: usize, iy: usize) -> f64 {
        self.content[self.flat(ix, iy)]
    }

    pub fn entries(&self) -> f64 {
        self.entries
    }

    /// Project the x axis at the y bin `iy` into a 1D histogram.
    pub fn projection_x(&self, iy: usize, name: &str) -> Hist1D {
        let mut out = Hist1D::new(name, &self.title, self.x_axis.clone());
        for ix in 0..self.x_axis.n_bins() {
            let i = self.flat(ix, iy);
            out.content[ix] = self.content[i];
            out.sumw2[ix] = self.sumw2[i];
        }
        out.entries = out.content.iter().sum();
        out
    }

    pub fn merge(&mut self, other: &Hist2D) -> Result<(), MultEstError> {
        check_same_binning!(self, other);
        for (c, w2, oc, ow2) in izip!(
            &mut self.content,
            &mut self.sumw2,
            &other.content,
            &other.sumw2
        ) {
            *c += oc;
            *w2 += ow2;
        }
        self.entries += other.entries;
        Ok(())
    }
}

/// A three-dimensional weighted histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hist3D {
    pub name: String,
    pub title: String,
    x_axis: Axis,
    y_axis: Axis,
    z_axis: Axis,
    content: Vec<f64>,
    sumw2: Vec<f64>,
    entries: f64,
}

impl Hist3D {
    pub fn new(name: &str, title: &str, x_axis: Axis, y_axis: Axis, z_axis: Axis) -> Hist3D {
        let n = x_axis.n_bins() * y_axis.n_bins() * z_axis.n_bins();
        Hist3D {
            name: name.to_owned(),
            title: title.to_owned(),
            x_axis,
            y_axis,
            z_axis,
            content: vec![0.0; n],
            sumw2: vec![0.0; n],
            entries: 0.0,
        }
    }

    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    pub fn z_axis(&self) -> &Axis {
        &self.z_axis
    }

    fn axes(&self) -> (&Axis, &Axis, &Axis) {
        (&self.x_axis, &self.y_axis, &self.z_axis)
    }

    fn flat(&self, ix: usize, iy: usize, iz: usize) -> usize {
        (iz * self.y_axis.n_bins() + iy) * self.x_axis.n_bins() + ix
    }

    pub fn fill(&mut self, x: f64, y: f64, z: f64, weight: Weight) {
        if let (Some(ix), Some(iy), Some(iz)) = (
            self.x_axis.index(x),
            self.y_axis.index(y),
            self.z_axis.index(z),
        ) {
            let i = self.flat(ix, iy, iz);
            self.content[i] += weight;
            self.sumw2[i] += weight * weight;
            self.entries += 1.0;
        }
    }

    pub fn value(&self, ix: usize, iy: usize, iz: usize) -> f64 {
        self.content[self.flat(ix, iy, iz)]
    }

    pub fn entries(&self) -> f64 {
        self.entries
    }

    pub fn merge(&mut self, other: &Hist3D) -> Result<(), MultEstError> {
        check_same_binning!(self, other);
        for (c, w2, oc, ow2) in izip!(
            &mut self.content,
            &mut self.sumw2,
            &other.content,
            &other.sumw2
        ) {
            *c += oc;
            *w2 += ow2;
        }
        self.entries += other.entries;
        Ok(())
    }
}
