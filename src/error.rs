//! Error type shared by the parser, the document model and the renderers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The first (or second) line is not followed by a blank line.
    #[error("the summary must be on the first or the second line, with a blank line afterwards:\n{0}")]
    Summary(String),

    #[error("need {expected} `-` underneath the header title `{header}`, found {found}")]
    HeaderUnderline {
        header: String,
        expected: usize,
        found: usize,
    },

    /// A chunk of a structured section that is not `name[(signature)][ : types]`.
    #[error("could not process the following entry:\n{0}")]
    Entry(String),

    #[error(
        "raw string delimiters (r\"\"\") are not supported: backslashes of escape sequences \
         cannot be told apart from literal backslashes once the text is materialized"
    )]
    RawString,

    #[error("`{field}` must be {expected}, got {found}")]
    Field {
        field: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("section `{section}` must be {expected}")]
    SectionShape {
        section: String,
        expected: &'static str,
    },

    #[error("invalid entry in section `{section}`: {source}")]
    InSection {
        section: String,
        #[source]
        source: Box<Error>,
    },

    #[error("`added_indent` takes at most two parts (initial, subsequent), got {0}")]
    AddedIndent(usize),

    #[error("invalid render options: {0}")]
    Options(String),

    #[error("invalid literal at offset {offset}: {message}")]
    Literal { offset: usize, message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
