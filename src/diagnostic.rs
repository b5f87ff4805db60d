//! Advisory (non-fatal) findings collected while building or rendering a document.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    /// A section key outside the known numpy sections was kept as-is.
    #[error("unknown section `{key}` is stored but has no place in the numpy layout")]
    UnknownSection { key: String },

    /// The summary is longer than the available width, even on its own line.
    #[error("summary is {length} characters long but only {available} fit on a line")]
    SummaryTooLong { length: usize, available: usize },

    /// A kept section has no slot in the numpy layout and was left out.
    #[error("section `{key}` was not rendered")]
    UnrenderedSection { key: String },
}
