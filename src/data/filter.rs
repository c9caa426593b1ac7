use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::model::{Exif, Focus, LensCatalog, LensKind, LensRecord};

// ---------------------------------------------------------------------------
// LogRange – a range-slider value in log2 space
// ---------------------------------------------------------------------------

/// Relative slack when comparing against `2^bound`, so a record sitting
/// exactly on a bound survives the log2/exp2 round trip.
const ROUND_OFF: f64 = 1e-9;

/// Slider step in log2 units.
pub const SLIDER_STEP: f64 = 0.01;

/// Closed interval whose bounds are stored as log2 values.
///
/// Sliders move in log2 space so that each step is perceptually the same
/// across orders of magnitude. Predicates exponentiate the bounds and compare
/// against the record's linear value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogRange {
    pub lo: f64,
    pub hi: f64,
}

impl LogRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        LogRange { lo, hi }
    }

    /// Range covering the linear interval `[lo, hi]`.
    pub fn from_linear(lo: f64, hi: f64) -> Self {
        LogRange::new(lo.log2(), hi.log2())
    }

    /// Full slider range for values spanning `[min, max]`, padded on both
    /// ends by 1% of `log2(max - min)`.
    pub fn slider(min: f64, max: f64) -> Self {
        let r = if max > min { (max - min).log2().max(0.0) } else { 0.0 };
        LogRange::new(min.log2() - 0.01 * r, max.log2() + 0.01 * r)
    }

    /// Linear-scale bounds, `(2^lo, 2^hi)`.
    pub fn linear(&self) -> (f64, f64) {
        (self.lo.exp2(), self.hi.exp2())
    }

    /// `lo > hi` (or a NaN bound): nothing can match.
    pub fn is_inverted(&self) -> bool {
        !(self.lo <= self.hi)
    }

    /// `value ∈ [2^lo, 2^hi]`
    pub fn contains(&self, value: f64) -> bool {
        self.intersects(value, value)
    }

    /// Whether the linear interval `[min, max]` overlaps `[2^lo, 2^hi]`.
    pub fn intersects(&self, min: f64, max: f64) -> bool {
        if self.is_inverted() {
            return false;
        }
        let (lo, hi) = self.linear();
        max >= lo - lo.abs() * ROUND_OFF && min <= hi + hi.abs() * ROUND_OFF
    }
}

// ---------------------------------------------------------------------------
// LensQuery – one predicate per facet
// ---------------------------------------------------------------------------

/// The named query parameters behind the dashboard controls.
///
/// Facets are combined with AND. Empty sets and `None` mean "no constraint";
/// within a set, any selected value matches.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LensQuery {
    pub manufacturers: BTreeSet<String>,
    pub kind: Option<LensKind>,
    pub focus: Option<Focus>,
    pub exif: Option<Exif>,
    pub focal_length: Option<LogRange>,
    pub aperture: Option<LogRange>,
    pub weight: Option<LogRange>,
    pub magnification: Option<LogRange>,
    pub price: Option<LogRange>,
    /// Selected diameters in mm. Lenses without a filter thread never match
    /// a non-empty selection.
    pub filter_diameters: Vec<f64>,
}

impl LensQuery {
    /// True when some range is inverted, so the result is empty whatever the data.
    pub fn is_unsatisfiable(&self) -> bool {
        self.ranges().any(|r| r.is_inverted())
    }

    fn ranges(&self) -> impl Iterator<Item = &LogRange> {
        [
            &self.focal_length,
            &self.aperture,
            &self.weight,
            &self.magnification,
            &self.price,
        ]
        .into_iter()
        .flatten()
    }

    pub fn matches(&self, lens: &LensRecord) -> bool {
        if !self.manufacturers.is_empty() && !self.manufacturers.contains(&lens.manufacturer) {
            return false;
        }
        if self.kind.is_some_and(|kind| lens.kind() != kind) {
            return false;
        }
        if self.focus.is_some_and(|focus| lens.focus != focus) {
            return false;
        }
        if self.exif.is_some_and(|exif| lens.exif != exif) {
            return false;
        }

        if let Some(range) = &self.focal_length {
            let (min, max) = lens.focal_length_bounds();
            if !range.intersects(min, max) {
                return false;
            }
        }
        if let Some(range) = &self.aperture {
            let (min, max) = lens.aperture_bounds();
            if !range.intersects(min, max) {
                return false;
            }
        }

        let scalars = [
            (&self.weight, lens.weight),
            (&self.magnification, lens.magnification),
            (&self.price, lens.price),
        ];
        for (range, value) in scalars {
            if range.is_some_and(|r| !r.contains(value)) {
                return false;
            }
        }

        if !self.filter_diameters.is_empty() {
            match lens.filter_diameter {
                Some(d) if self.filter_diameters.contains(&d) => {}
                _ => return false,
            }
        }
        true
    }
}

/// Return indices of lenses that pass every facet of `query`, in catalog
/// order (heaviest first). Re-scans the whole catalog each call.
pub fn filtered_indices(catalog: &LensCatalog, query: &LensQuery) -> Vec<usize> {
    if query.is_unsatisfiable() {
        return Vec::new();
    }
    catalog
        .lenses()
        .iter()
        .enumerate()
        .filter(|(_, lens)| query.matches(lens))
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Slider ranges derived from the catalog
// ---------------------------------------------------------------------------

/// Full travel of every range slider, computed once per catalog.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderRanges {
    pub focal_length: LogRange,
    pub aperture: LogRange,
    pub weight: LogRange,
    pub magnification: LogRange,
    pub price: LogRange,
}

impl SliderRanges {
    pub fn for_catalog(catalog: &LensCatalog) -> Self {
        let lenses = catalog.lenses();
        let slider = |values: Vec<f64>| match extent(&values) {
            Some((min, max)) => LogRange::slider(min, max),
            None => LogRange::new(0.0, 0.0),
        };

        SliderRanges {
            focal_length: slider(lenses.iter().flat_map(|l| l.focal_length.clone()).collect()),
            aperture: slider(lenses.iter().flat_map(|l| l.aperture.clone()).collect()),
            weight: slider(lenses.iter().map(|l| l.weight).collect()),
            magnification: slider(lenses.iter().map(|l| l.magnification).collect()),
            price: slider(lenses.iter().map(|l| l.price).collect()),
        }
    }

    /// Query with every slider at full travel and nothing else selected.
    pub fn full_query(&self) -> LensQuery {
        LensQuery {
            focal_length: Some(self.focal_length),
            aperture: Some(self.aperture),
            weight: Some(self.weight),
            magnification: Some(self.magnification),
            price: Some(self.price),
            ..LensQuery::default()
        }
    }
}

fn extent(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })
}
