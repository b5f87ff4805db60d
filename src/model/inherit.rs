//! Filling a document's gaps from another one (e.g. a subclass method
//! inheriting its parent's documentation).

use super::{Document, Entry, Section, SectionKind};
use crate::diagnostic::Diagnostic;
use indexmap::IndexMap;
use std::collections::HashSet;

impl Document {
    /// Take from `other` whatever `self` lacks.
    ///
    /// Sections missing or empty in `self` are copied wholesale. Entry
    /// sections present in both are merged by name, `self` winning on
    /// conflicts; entries only in `other` go before `self`'s own entries, or
    /// after them with `append_at_end`. Paragraph sections and the summary
    /// are only taken when `self` has none.
    ///
    /// An `abstract X` section of `other` is read as `X` when `self` has `X`,
    /// so a concrete override picks up its abstract declaration.
    pub fn inherit(&mut self, other: &Document, append_at_end: bool) {
        if self.summary.is_empty() {
            self.summary = other.summary.clone();
        }

        for (key, theirs) in self.fold_abstract(other) {
            match self.sections.get_mut(&key) {
                Some(mine) if !mine.is_empty() => {
                    if let (Section::Entries(mine), Section::Entries(theirs)) = (mine, &theirs) {
                        merge_entries(mine, theirs, append_at_end);
                    }
                }
                existing => {
                    if existing.is_none() && SectionKind::of(&key) == SectionKind::Custom {
                        self.diagnostics
                            .push(Diagnostic::UnknownSection { key: key.clone() });
                    }
                    log::debug!("inheriting section `{}`", key);
                    self.sections.insert(key, theirs);
                }
            }
        }
    }

    /// `other`'s sections, with `abstract X` renamed to `X` where `self`
    /// has `X`. Sections meeting under one name are merged, first one winning.
    fn fold_abstract(&self, other: &Document) -> IndexMap<String, Section> {
        let mut folded: IndexMap<String, Section> = IndexMap::new();
        for (key, section) in &other.sections {
            let target = match key.strip_prefix("abstract ") {
                Some(plain) if self.sections.contains_key(plain) => plain.to_string(),
                _ => key.clone(),
            };
            match (folded.get_mut(&target), section) {
                (Some(Section::Entries(existing)), Section::Entries(incoming)) => {
                    merge_entries(existing, incoming, true);
                }
                (Some(_), _) => {}
                (None, _) => {
                    folded.insert(target, section.clone());
                }
            }
        }
        folded
    }
}

fn merge_entries(mine: &mut Vec<Entry>, theirs: &[Entry], append_at_end: bool) {
    let names: HashSet<String> = mine.iter().map(|e| e.name().to_string()).collect();
    let inherited: Vec<Entry> = theirs
        .iter()
        .filter(|e| !names.contains(e.name()))
        .cloned()
        .collect();
    if append_at_end {
        mine.extend(inherited);
    } else {
        mine.splice(0..0, inherited);
    }
}
