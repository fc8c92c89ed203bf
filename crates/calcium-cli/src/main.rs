use anyhow::{anyhow, bail, Context, Result};
use calcium_lib::{
    config::SessionConfig,
    detectors::peaks::{calculate_peaks, filter_peaks_to_section},
    io::csv as csv_io,
    metrics::summary::summarize_cells,
    pipeline::{process, PipelineConfig},
    section::{find_errors_in_section, Section, SectionDraft, SectionSet},
    signal::Cell,
};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "calcium",
    version,
    about = "Calcium transient analysis: baseline-normalized area and peak statistics per section"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Pipeline flags. Anything left unset falls back to the session config,
/// then to the built-in defaults.
#[derive(Args, Debug, Default)]
struct PipelineArgs {
    /// Session file with pipeline settings, sections and per-cell overrides
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leading samples averaged for the normalization baseline
    #[arg(long)]
    baseline_samples: Option<usize>,
    /// Skip baseline normalization
    #[arg(long)]
    no_baseline: bool,
    /// Boxcar smoothing width in samples (odd)
    #[arg(long)]
    convolution_width: Option<usize>,
    /// Time units per sample
    #[arg(long)]
    sampling_rate: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize every cell per section and write the processed CSV
    Process {
        #[arg(long)]
        input: PathBuf,
        /// Extra section as NAME:START:END, may be repeated
        #[arg(long = "section")]
        sections: Vec<String>,
        /// Output path, defaults to <input>_processed.csv
        #[arg(long)]
        out: Option<PathBuf>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print the processed time-value trace of one cell as JSON
    Trace {
        #[arg(long)]
        input: PathBuf,
        /// Cell name or 1-based column number
        #[arg(long)]
        cell: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Print the peaks of one cell as JSON
    Peaks {
        #[arg(long)]
        input: PathBuf,
        /// Cell name or 1-based column number
        #[arg(long)]
        cell: String,
        /// Overrides the cell's peak threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Clip the peaks to this NAME:START:END window
        #[arg(long)]
        section: Option<String>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Report what is missing or wrong with a section
    CheckSection {
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        start: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        end: Option<f64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Process {
            input,
            sections,
            out,
            pipeline,
        } => cmd_process(&input, &sections, out.as_deref(), &pipeline)?,
        Commands::Trace {
            input,
            cell,
            pipeline,
        } => cmd_trace(&input, &cell, &pipeline)?,
        Commands::Peaks {
            input,
            cell,
            threshold,
            section,
            pipeline,
        } => cmd_peaks(&input, &cell, threshold, section.as_deref(), &pipeline)?,
        Commands::CheckSection { name, start, end } => cmd_check_section(name, start, end)?,
    }
    Ok(())
}

struct Session {
    config: SessionConfig,
    pipeline: PipelineConfig,
    cells: Vec<Cell>,
}

fn load_session(input: &Path, args: &PipelineArgs) -> Result<Session> {
    let config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    let mut pipeline = config.pipeline;
    if let Some(samples) = args.baseline_samples {
        pipeline.baseline_samples = samples;
    }
    if args.no_baseline {
        pipeline.baseline_enabled = false;
    }
    if let Some(width) = args.convolution_width {
        pipeline.convolution_width = width;
    }
    if let Some(rate) = args.sampling_rate {
        pipeline.sampling_rate = rate;
    }
    pipeline.validate()?;

    let mut cells = csv_io::read_cells(input)?;
    config.apply_to_cells(&mut cells);
    Ok(Session {
        config,
        pipeline,
        cells,
    })
}

fn parse_section(text: &str) -> Result<Section> {
    let mut parts = text.rsplitn(3, ':');
    let (end, start, name) = match (parts.next(), parts.next(), parts.next()) {
        (Some(end), Some(start), Some(name)) => (end, start, name),
        _ => bail!("section must look like NAME:START:END, got {text:?}"),
    };
    let start: f64 = start
        .trim()
        .parse()
        .with_context(|| format!("section start is not a number: {start}"))?;
    let end: f64 = end
        .trim()
        .parse()
        .with_context(|| format!("section end is not a number: {end}"))?;
    Ok(Section::new(name.trim(), start, end)?)
}

fn select_cell<'a>(cells: &'a [Cell], selector: &str) -> Result<&'a Cell> {
    if let Some(cell) = cells.iter().find(|c| c.name == selector) {
        return Ok(cell);
    }
    selector
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| cells.get(idx))
        .ok_or_else(|| anyhow!("no cell matches {selector:?}"))
}

fn cmd_process(
    input: &Path,
    extra_sections: &[String],
    out: Option<&Path>,
    args: &PipelineArgs,
) -> Result<()> {
    let session = load_session(input, args)?;
    let mut sections: SectionSet = session.config.sections()?;
    for text in extra_sections {
        sections.insert(parse_section(text)?)?;
    }
    if sections.is_empty() {
        log::warn!("no sections configured, the export will only list cell names");
    }

    let summaries = summarize_cells(&session.cells, sections.as_slice(), &session.pipeline)?;
    let out = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| csv_io::processed_path(input));
    let rows = csv_io::export_summaries(&out, &summaries)?;
    log::info!("wrote {} rows to {}", rows, out.display());
    println!("{}", serde_json::to_string(&summaries)?);
    Ok(())
}

fn cmd_trace(input: &Path, selector: &str, args: &PipelineArgs) -> Result<()> {
    let session = load_session(input, args)?;
    let cell = select_cell(&session.cells, selector)?;
    let series = process(cell, &session.pipeline)?;
    println!("{}", serde_json::to_string(&series)?);
    Ok(())
}

fn cmd_peaks(
    input: &Path,
    selector: &str,
    threshold: Option<f64>,
    section: Option<&str>,
    args: &PipelineArgs,
) -> Result<()> {
    let session = load_session(input, args)?;
    let cell = select_cell(&session.cells, selector)?;
    let series = process(cell, &session.pipeline)?;
    let peaks = calculate_peaks(&series, threshold.unwrap_or(cell.peak_threshold));
    let peaks = match section {
        Some(text) => filter_peaks_to_section(&peaks, &parse_section(text)?),
        None => peaks,
    };
    println!("{}", serde_json::to_string(&peaks)?);
    Ok(())
}

fn cmd_check_section(name: Option<String>, start: Option<f64>, end: Option<f64>) -> Result<()> {
    let draft = SectionDraft { name, start, end };
    let errors = find_errors_in_section(&draft);
    println!("{}", serde_json::to_string(&errors)?);
    if !errors.is_empty() {
        bail!("section is invalid: {}", errors.join(", "));
    }
    Ok(())
}
