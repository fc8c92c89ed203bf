//! TOML session file: pipeline parameters, the section list and per-cell
//! overrides for one slice.
use crate::{
    pipeline::PipelineConfig,
    section::{find_errors_in_section, SectionDraft, SectionSet},
    signal::Cell,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub pipeline: PipelineConfig,
    pub sections: Vec<SectionDraft>,
    /// Keyed by cell name.
    pub cells: BTreeMap<String, CellOverride>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CellOverride {
    #[serde(default)]
    pub baseline: Option<f64>,
    #[serde(default)]
    pub peak_threshold: Option<f64>,
    #[serde(default)]
    pub excluded: Option<bool>,
}

impl CellOverride {
    pub fn apply(&self, cell: &mut Cell) {
        if let Some(baseline) = self.baseline {
            cell.baseline = baseline;
        }
        if let Some(threshold) = self.peak_threshold {
            cell.peak_threshold = threshold;
        }
        if let Some(excluded) = self.excluded {
            cell.excluded = excluded;
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("parsing session config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Build the usable sections. Incomplete or inverted drafts are skipped
    /// with a warning; a repeated name is an error.
    pub fn sections(&self) -> Result<SectionSet> {
        let mut set = SectionSet::new();
        for (idx, draft) in self.sections.iter().enumerate() {
            let errors = find_errors_in_section(draft);
            if !errors.is_empty() {
                log::warn!(
                    "skipping section {} ({}): {}",
                    idx + 1,
                    draft.name.as_deref().unwrap_or("unnamed"),
                    errors.join(", ")
                );
                continue;
            }
            let section = draft
                .clone()
                .into_section()
                .with_context(|| format!("section {}", idx + 1))?;
            set.insert(section)?;
        }
        Ok(set)
    }

    /// Apply the per-cell overrides by name.
    pub fn apply_to_cells(&self, cells: &mut [Cell]) {
        for (name, overrides) in &self.cells {
            match cells.iter_mut().find(|c| &c.name == name) {
                Some(cell) => overrides.apply(cell),
                None => log::warn!("no cell named {name:?}, ignoring its overrides"),
            }
        }
    }
}
