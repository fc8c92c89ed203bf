use crate::{metrics::summary::CellSummary, signal::Cell};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Parse a slice recording laid out one column per cell, one row per sample.
///
/// The first row is a header when any non-blank field in it is not a number;
/// blank header fields and header-less files get `Cell <n>` names. Blank or
/// non-numeric data fields are skipped for their column only.
pub fn parse_cells<R: Read>(reader: R) -> Result<Vec<Cell>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut cells: Vec<Cell> = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("reading row {}", row + 1))?;
        if row == 0 {
            let header = is_header(&record);
            cells = record
                .iter()
                .enumerate()
                .map(|(idx, name)| {
                    let name = if header && !name.is_empty() {
                        name.to_string()
                    } else {
                        default_name(idx)
                    };
                    Cell::new(idx, name, Vec::new())
                })
                .collect();
            if header {
                continue;
            }
        }
        if record.len() > cells.len() {
            log::warn!(
                "row {} has {} fields but only {} cells, ignoring the extra fields",
                row + 1,
                record.len(),
                cells.len()
            );
        }
        for (cell, field) in cells.iter_mut().zip(record.iter()) {
            if let Some(value) = parse_sample(field) {
                cell.data.push(value);
            }
        }
    }
    if cells.is_empty() {
        anyhow::bail!("no cell columns found");
    }
    log::debug!("parsed {} cells", cells.len());
    Ok(cells)
}

/// Read a slice recording from disk, see [`parse_cells`].
pub fn read_cells(path: &Path) -> Result<Vec<Cell>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_cells(file).with_context(|| format!("parsing {}", path.display()))
}

fn is_header(record: &StringRecord) -> bool {
    record
        .iter()
        .any(|field| !field.is_empty() && parse_sample(field).is_none())
}

/// A usable sample value; `NaN` and infinities count as non-numeric.
fn parse_sample(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn default_name(idx: usize) -> String {
    format!("Cell {}", idx + 1)
}

/// `slice.csv` becomes `slice_processed.csv`; other names just get the
/// suffix appended.
pub fn processed_filename(name: &str) -> String {
    format!("{}_processed.csv", name.strip_suffix(".csv").unwrap_or(name))
}

/// Sibling of `input` named by [`processed_filename`].
pub fn processed_path(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(processed_filename(&name))
}

fn summary_header(summary: &CellSummary) -> Vec<String> {
    let mut header = vec!["Cell Name".to_string()];
    for section in &summary.sections {
        header.push(format!("{} area", section.name));
        header.push(format!("{} peaks", section.name));
        header.push(format!("{} peak time", section.name));
        header.push(format!("{} peak proportion", section.name));
    }
    header
}

/// Write one row per non-excluded cell. Returns the number of rows written;
/// nothing at all is written when every cell is excluded.
pub fn write_summaries<W: Write>(writer: W, summaries: &[CellSummary]) -> Result<usize> {
    let included: Vec<&CellSummary> = summaries.iter().filter(|s| !s.cell.excluded).collect();
    let Some(first) = included.first() else {
        log::warn!("every cell is excluded, nothing to export");
        return Ok(0);
    };

    let mut writer = WriterBuilder::new().from_writer(writer);
    writer
        .write_record(summary_header(first))
        .context("writing header")?;
    for summary in &included {
        let mut row = vec![summary.cell.name.clone()];
        for section in &summary.sections {
            row.push(section.area.to_string());
            row.push(section.peak_count().to_string());
            row.push(section.total_peak_time.to_string());
            row.push(section.proportion_peak_time.to_string());
        }
        writer
            .write_record(&row)
            .with_context(|| format!("writing row for {}", summary.cell.name))?;
    }
    writer.flush().context("flushing export")?;
    Ok(included.len())
}

/// Export summaries to a CSV file at `path`.
pub fn export_summaries(path: &Path, summaries: &[CellSummary]) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_summaries(file, summaries)
}
