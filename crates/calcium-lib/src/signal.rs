use serde::{Deserialize, Serialize};

pub const DEFAULT_BASELINE: f64 = 1.0;
pub const DEFAULT_PEAK_THRESHOLD: f64 = 1.0;

/// A single `(time, value)` point of a processed trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

impl Sample {
    pub fn new(time: f64, value: f64) -> Self {
        Self { time, value }
    }
}

impl From<(f64, f64)> for Sample {
    fn from((time, value): (f64, f64)) -> Self {
        Self { time, value }
    }
}

/// Build a series from `[time, value]` pairs.
pub fn series_from_pairs(pairs: &[[f64; 2]]) -> Vec<Sample> {
    pairs.iter().map(|p| Sample::new(p[0], p[1])).collect()
}

/// One recorded cell of a slice: its raw fluorescence samples plus the
/// per-cell analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub id: usize,
    pub name: String,
    /// Raw intensity samples, implicitly indexed `0..len`.
    pub data: Vec<f64>,
    /// Offset subtracted before area integration. Not the normalization
    /// baseline used by the pipeline.
    pub baseline: f64,
    /// Level a trace must exceed to count as a peak.
    pub peak_threshold: f64,
    /// Excluded cells are still processed but left out of exports.
    pub excluded: bool,
}

impl Cell {
    pub fn new(id: usize, name: impl Into<String>, data: Vec<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            data,
            baseline: DEFAULT_BASELINE,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            excluded: false,
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A time interval during which a trace stays above its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub start: f64,
    pub end: f64,
    pub length: f64,
}

impl Peak {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start,
            end,
            length: end - start,
        }
    }
}
