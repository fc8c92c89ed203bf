//! Named time windows ("sections") that split a recording into
//! experimental conditions.
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectionError {
    #[error("section name must be specified")]
    MissingName,
    #[error("start must be specified")]
    MissingStart,
    #[error("end must be specified")]
    MissingEnd,
    #[error("start must be before end (start {start}, end {end})")]
    StartNotBeforeEnd { start: f64, end: f64 },
    #[error("section name {0:?} is already used")]
    DuplicateName(String),
}

/// A validated time window `[start, end]` with `start < end`.
///
/// Deserializing goes through [`SectionDraft::into_section`], so an
/// inverted or incomplete window is rejected there as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SectionDraft", into = "SectionDraft")]
pub struct Section {
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl Section {
    pub fn new(name: impl Into<String>, start: f64, end: f64) -> Result<Self, SectionError> {
        // NaN bounds compare as unordered and are rejected too
        if start.partial_cmp(&end) != Some(Ordering::Less) {
            return Err(SectionError::StartNotBeforeEnd { start, end });
        }
        Ok(Self {
            name: name.into(),
            start,
            end,
        })
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether `time` falls inside the closed window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// A section as entered by a user, before any field is known to be present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub start: Option<f64>,
    #[serde(default)]
    pub end: Option<f64>,
}

impl SectionDraft {
    pub fn into_section(self) -> Result<Section, SectionError> {
        let name = self.name.ok_or(SectionError::MissingName)?;
        let start = self.start.ok_or(SectionError::MissingStart)?;
        let end = self.end.ok_or(SectionError::MissingEnd)?;
        Section::new(name, start, end)
    }
}

impl TryFrom<SectionDraft> for Section {
    type Error = SectionError;

    fn try_from(draft: SectionDraft) -> Result<Self, Self::Error> {
        draft.into_section()
    }
}

impl From<Section> for SectionDraft {
    fn from(section: Section) -> Self {
        Self {
            name: Some(section.name),
            start: Some(section.start),
            end: Some(section.end),
        }
    }
}

/// List the problems with a draft section without failing.
///
/// An empty list means the bounds are usable; callers skip drafts that
/// report anything.
pub fn find_errors_in_section(section: &SectionDraft) -> Vec<String> {
    let mut errors = Vec::new();
    if section.end.is_none() {
        errors.push(SectionError::MissingEnd.to_string());
    }
    if section.start.is_none() {
        errors.push(SectionError::MissingStart.to_string());
    }
    if let (Some(start), Some(end)) = (section.start, section.end) {
        if start >= end {
            errors.push("start must be before end".to_string());
        }
    }
    errors
}

/// Sections keyed by unique name, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionSet {
    sections: Vec<Section>,
}

impl SectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, section: Section) -> Result<(), SectionError> {
        if self.get(&section.name).is_some() {
            return Err(SectionError::DuplicateName(section.name));
        }
        self.sections.push(section);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Option<Section> {
        let idx = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(idx))
    }

    pub fn get(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    pub fn as_slice(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl<'a> IntoIterator for &'a SectionSet {
    type Item = &'a Section;
    type IntoIter = std::slice::Iter<'a, Section>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl TryFrom<Vec<Section>> for SectionSet {
    type Error = SectionError;

    fn try_from(sections: Vec<Section>) -> Result<Self, Self::Error> {
        let mut set = SectionSet::new();
        for section in sections {
            set.insert(section)?;
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(start: Option<f64>, end: Option<f64>) -> SectionDraft {
        SectionDraft {
            name: Some("aCSF".into()),
            start,
            end,
        }
    }

    #[test]
    fn complete_draft_has_no_errors() {
        assert!(find_errors_in_section(&draft(Some(0.0), Some(10.0))).is_empty());
    }

    #[test]
    fn missing_bounds_are_reported() {
        assert_eq!(
            find_errors_in_section(&draft(None, None)),
            vec!["end must be specified", "start must be specified"]
        );
        assert_eq!(
            find_errors_in_section(&draft(Some(1.0), None)),
            vec!["end must be specified"]
        );
    }

    #[test]
    fn inverted_bounds_are_reported() {
        assert_eq!(
            find_errors_in_section(&draft(Some(5.0), Some(5.0))),
            vec!["start must be before end"]
        );
        assert_eq!(
            find_errors_in_section(&draft(Some(0.0), Some(-1.0))),
            vec!["start must be before end"]
        );
    }

    #[test]
    fn draft_conversion() {
        let section = draft(Some(0.7), Some(5.0)).into_section().unwrap();
        assert!((section.duration() - 4.3).abs() < 1e-12);
        assert_eq!(
            draft(Some(1.0), None).into_section(),
            Err(SectionError::MissingEnd)
        );
        let nameless = SectionDraft {
            name: None,
            ..draft(Some(0.0), Some(1.0))
        };
        assert_eq!(nameless.into_section(), Err(SectionError::MissingName));
    }

    #[test]
    fn new_rejects_empty_window() {
        assert!(matches!(
            Section::new("x", 2.0, 2.0),
            Err(SectionError::StartNotBeforeEnd { .. })
        ));
        assert!(Section::new("x", f64::NAN, 2.0).is_err());
    }

    #[test]
    fn deserializing_validates_bounds() {
        let section: Section =
            toml::from_str("name = \"aCSF\"\nstart = 0.0\nend = 60.0\n").unwrap();
        assert_eq!(section, Section::new("aCSF", 0.0, 60.0).unwrap());
        let written = toml::to_string(&section).unwrap();
        assert_eq!(toml::from_str::<Section>(&written).unwrap(), section);

        let inverted = toml::from_str::<Section>("name = \"aCSF\"\nstart = 60.0\nend = 0.0\n");
        let err = inverted.unwrap_err().to_string();
        assert!(err.contains("start must be before end"), "{err}");
        assert!(toml::from_str::<Section>("name = \"aCSF\"\nstart = 1.0\n").is_err());
    }

    #[test]
    fn set_rejects_duplicate_names() {
        let mut set = SectionSet::new();
        set.insert(Section::new("aCSF", 0.0, 10.0).unwrap()).unwrap();
        set.insert(Section::new("4-AP", 10.0, 20.0).unwrap()).unwrap();
        assert_eq!(
            set.insert(Section::new("aCSF", 30.0, 40.0).unwrap()),
            Err(SectionError::DuplicateName("aCSF".into()))
        );
        let names: Vec<&str> = set.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["aCSF", "4-AP"]);
        assert!(set.remove("aCSF").is_some());
        assert_eq!(set.len(), 1);
        assert!(set.remove("aCSF").is_none());
    }
}
