use crate::{
    detectors::peaks::{calculate_peaks, filter_peaks_to_section},
    metrics::area::{integrate_samples, samples_in_section},
    pipeline::{process, PipelineConfig, PipelineError},
    section::Section,
    signal::{Cell, Peak, Sample},
};
use serde::{Deserialize, Serialize};

/// Area and peak statistics of one cell within one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub name: String,
    pub start: f64,
    pub end: f64,
    pub area: f64,
    pub peaks: Vec<Peak>,
    pub total_peak_time: f64,
    /// Fraction of the section covered by peaks.
    pub proportion_peak_time: f64,
}

impl SectionSummary {
    pub fn peak_count(&self) -> usize {
        self.peaks.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellSummary {
    pub cell: Cell,
    pub sections: Vec<SectionSummary>,
}

/// Summarize an already processed trace of `cell` over `section`.
///
/// Peaks are detected on the whole trace before clipping so a peak that
/// begins before the section still counts from the section start.
pub fn summarize_section(series: &[Sample], cell: &Cell, section: &Section) -> SectionSummary {
    let windowed = samples_in_section(series, section);
    let area = integrate_samples(&windowed, cell.baseline);
    let peaks = filter_peaks_to_section(&calculate_peaks(series, cell.peak_threshold), section);
    let total_peak_time = peaks.iter().fold(0.0, |acc, p| acc + p.length);
    SectionSummary {
        name: section.name.clone(),
        start: section.start,
        end: section.end,
        area,
        peaks,
        total_peak_time,
        proportion_peak_time: total_peak_time / section.duration(),
    }
}

/// Run the pipeline for `cell` and summarize every section.
pub fn summarize_cell<'a, I>(
    cell: &Cell,
    sections: I,
    config: &PipelineConfig,
) -> Result<CellSummary, PipelineError>
where
    I: IntoIterator<Item = &'a Section>,
{
    let series = process(cell, config)?;
    let sections = sections
        .into_iter()
        .map(|section| summarize_section(&series, cell, section))
        .collect();
    Ok(CellSummary {
        cell: cell.clone(),
        sections,
    })
}

/// [`summarize_cell`] for every cell, ordered by cell id.
pub fn summarize_cells(
    cells: &[Cell],
    sections: &[Section],
    config: &PipelineConfig,
) -> Result<Vec<CellSummary>, PipelineError> {
    config.validate()?;
    let mut ordered: Vec<&Cell> = cells.iter().collect();
    ordered.sort_by_key(|c| c.id);
    ordered
        .into_iter()
        .map(|cell| summarize_cell(cell, sections, config))
        .collect()
}
