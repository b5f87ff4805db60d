//! The document model: a summary plus named sections, validated on
//! construction.

mod entry;
mod inherit;

pub use entry::{normalize_signature, Entry, EntryInput, RawEntry, StringList};

use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Section data keyed by (case-insensitive) section name, in document order.
/// This is what the parser produces and what [`Document::from_sections`]
/// consumes.
pub type SectionMap = IndexMap<String, SectionValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SectionValue {
    Text(String),
    Paragraphs(Vec<String>),
    Entries(Vec<EntryInput>),
    /// A bare entry where a list was expected.
    Entry(EntryInput),
}

pub const SUMMARY: &str = "summary";
pub const EXTENDED: &str = "extended";
pub const REFERENCES: &str = "references";

/// Sections made of entries (`name[(signature)][ : types]` plus descriptions).
pub const ENTRY_SECTIONS: &[&str] = &[
    "parameters",
    "other parameters",
    "attributes",
    "methods",
    "returns",
    "yields",
    "raises",
    "see also",
    "properties",
    "abstract properties",
    "abstract methods",
];

/// Sections made of free-text paragraphs.
pub const PARAGRAPH_SECTIONS: &[&str] = &[EXTENDED, "notes", REFERENCES, "examples"];

/// Order of the titled sections in rendered output.
pub const SECTION_ORDER: &[&str] = &[
    "parameters",
    "other parameters",
    "attributes",
    "properties",
    "abstract properties",
    "methods",
    "abstract methods",
    "returns",
    "yields",
    "raises",
    "see also",
    "notes",
    "references",
    "examples",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Summary,
    Paragraphs,
    Entries,
    /// Not a numpy section: kept, but without a place in the fixed layout.
    Custom,
}

impl SectionKind {
    /// Classify a lowercase section key.
    pub fn of(key: &str) -> Self {
        if key == SUMMARY {
            SectionKind::Summary
        } else if ENTRY_SECTIONS.contains(&key) {
            SectionKind::Entries
        } else if PARAGRAPH_SECTIONS.contains(&key) {
            SectionKind::Paragraphs
        } else {
            SectionKind::Custom
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Paragraphs(Vec<String>),
    Entries(Vec<Entry>),
}

impl Section {
    pub fn is_empty(&self) -> bool {
        match self {
            Section::Paragraphs(paragraphs) => paragraphs.is_empty(),
            Section::Entries(entries) => entries.is_empty(),
        }
    }

    fn to_value(&self) -> SectionValue {
        match self {
            Section::Paragraphs(paragraphs) => SectionValue::Paragraphs(paragraphs.clone()),
            Section::Entries(entries) => SectionValue::Entries(
                entries.iter().map(|e| EntryInput::Raw(e.to_raw())).collect(),
            ),
        }
    }
}

/// A validated docstring.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    summary: String,
    sections: IndexMap<String, Section>,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Validate section data. Keys are lowercased; a bare string stands for a
    /// one-paragraph list and a bare entry for a one-entry list.
    pub fn from_sections(sections: SectionMap) -> Result<Self> {
        let mut doc = Document::default();
        for (key, value) in sections {
            let key = key.to_lowercase();
            match SectionKind::of(&key) {
                SectionKind::Summary => match value {
                    SectionValue::Text(summary) if !summary.contains('\n') => {
                        doc.summary = summary
                    }
                    SectionValue::Text(_) => {
                        return Err(Error::SectionShape {
                            section: key,
                            expected: "a single-line string",
                        })
                    }
                    _ => {
                        return Err(Error::SectionShape {
                            section: key,
                            expected: "a string",
                        })
                    }
                },
                SectionKind::Paragraphs => {
                    let paragraphs = paragraphs(&key, value)?;
                    doc.sections.insert(key, Section::Paragraphs(paragraphs));
                }
                SectionKind::Entries => {
                    let entries = entries(&key, value)?;
                    doc.sections.insert(key, Section::Entries(entries));
                }
                SectionKind::Custom => {
                    let paragraphs = paragraphs(&key, value)?;
                    log::debug!("keeping unknown section `{}`", key);
                    doc.diagnostics.push(Diagnostic::UnknownSection { key: key.clone() });
                    doc.sections.insert(key, Section::Paragraphs(paragraphs));
                }
            }
        }
        Ok(doc)
    }

    /// Build from JSON section data, e.g. `{"summary": "...", "parameters": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        let sections: SectionMap = serde_json::from_str(json)?;
        Document::from_sections(sections)
    }

    /// The document as section data, summary first, then sections in the
    /// order they were given. Entries are in their raw form, leaving out
    /// empty fields, i.e. the shape the parser produces.
    pub fn to_sections(&self) -> SectionMap {
        let mut map = SectionMap::new();
        map.insert(SUMMARY.to_string(), SectionValue::Text(self.summary.clone()));
        for (key, section) in self.sections() {
            map.insert(key.to_string(), section.to_value());
        }
        map
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_sections())?)
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn section(&self, key: &str) -> Option<&Section> {
        self.sections.get(&key.to_lowercase())
    }

    /// Entries of `key`, empty if the section is missing or holds paragraphs.
    pub fn entries(&self, key: &str) -> &[Entry] {
        match self.section(key) {
            Some(Section::Entries(entries)) => entries,
            _ => &[],
        }
    }

    /// Paragraphs of `key`, empty if the section is missing or holds entries.
    pub fn paragraphs(&self, key: &str) -> &[String] {
        match self.section(key) {
            Some(Section::Paragraphs(paragraphs)) => paragraphs,
            _ => &[],
        }
    }

    /// Sections in insertion order (summary excluded).
    pub fn sections(&self) -> impl Iterator<Item = (&str, &Section)> {
        self.sections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keys that are not numpy sections, in insertion order.
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.sections
            .keys()
            .map(String::as_str)
            .filter(|k| SectionKind::of(k) == SectionKind::Custom)
    }

    /// Findings collected while building the document.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

fn paragraphs(key: &str, value: SectionValue) -> Result<Vec<String>> {
    match value {
        SectionValue::Text(text) => Ok(vec![text]),
        SectionValue::Paragraphs(paragraphs) => Ok(paragraphs),
        SectionValue::Entries(items) if items.is_empty() => Ok(Vec::new()),
        _ => Err(Error::SectionShape {
            section: key.to_string(),
            expected: "a string or a list of strings",
        }),
    }
}

fn entries(key: &str, value: SectionValue) -> Result<Vec<Entry>> {
    let items = match value {
        SectionValue::Entry(item) => vec![item],
        SectionValue::Entries(items) => items,
        SectionValue::Paragraphs(paragraphs) if paragraphs.is_empty() => Vec::new(),
        _ => {
            return Err(Error::SectionShape {
                section: key.to_string(),
                expected: "an entry or a list of entries",
            })
        }
    };
    items
        .into_iter()
        .map(|item| {
            item.into_entry().map_err(|source| Error::InSection {
                section: key.to_string(),
                source: Box::new(source),
            })
        })
        .collect()
}
