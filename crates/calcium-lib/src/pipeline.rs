use crate::{
    baseline::normalize,
    convolve::{boxcar, convolve, ConvolutionError},
    signal::{Cell, Sample},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reference level the smoothing step subtracts before convolving and adds
/// back afterwards, so truncated edge windows are pulled toward this level
/// instead of toward zero.
pub const SMOOTHING_OFFSET: f64 = 1.0;

/// Parameters shared by every cell of a slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Divide each trace by the mean of its leading samples.
    pub baseline_enabled: bool,
    /// Number of leading samples averaged for the normalization baseline.
    pub baseline_samples: usize,
    /// Boxcar smoothing width in samples (odd, at least 1).
    pub convolution_width: usize,
    /// Time units per sample; `time = index * sampling_rate`.
    pub sampling_rate: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            baseline_enabled: true,
            baseline_samples: 30,
            convolution_width: 1,
            sampling_rate: 1.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Convolution(#[from] ConvolutionError),
    #[error("The sampling rate must be a finite number above 0, received {0}")]
    InvalidSamplingRate(f64),
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.sampling_rate.is_finite() || self.sampling_rate <= 0.0 {
            return Err(PipelineError::InvalidSamplingRate(self.sampling_rate));
        }
        boxcar(self.convolution_width)?;
        Ok(())
    }
}

/// Turn a cell's raw samples into a time-stamped, normalized and smoothed
/// trace of the same length.
pub fn process(cell: &Cell, config: &PipelineConfig) -> Result<Vec<Sample>, PipelineError> {
    log::debug!(
        "processing cell {} ({}) with {} samples",
        cell.id,
        cell.name,
        cell.len()
    );
    process_values(&cell.data, config)
}

/// [`process`] over a bare slice of raw values.
pub fn process_values(values: &[f64], config: &PipelineConfig) -> Result<Vec<Sample>, PipelineError> {
    config.validate()?;
    let raw: Vec<Sample> = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Sample::new(i as f64, v))
        .collect();

    let adjusted = if config.baseline_enabled {
        normalize(&raw, config.baseline_samples)
    } else {
        raw
    };

    let shifted: Vec<f64> = adjusted.iter().map(|s| s.value - SMOOTHING_OFFSET).collect();
    let kernel = boxcar(config.convolution_width)?;
    let smoothed = convolve(&shifted, &kernel)?;

    Ok(adjusted
        .iter()
        .zip(smoothed)
        .map(|(s, v)| Sample::new(s.time * config.sampling_rate, v + SMOOTHING_OFFSET))
        .collect())
}
