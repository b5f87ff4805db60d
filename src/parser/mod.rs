//! Parser module: dispatch by input format.

pub mod literal;
pub mod numpy;

pub use literal::parse_literal;
pub use numpy::{has_delimiters, parse};

use crate::error::{Error, Result};
use crate::model::SectionMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A numpy docstring, with or without enclosing quotes.
    Numpy,
    /// Section data as a JSON object.
    Json,
    /// The `Docstring(**{...})` literal form.
    Literal,
}

impl std::str::FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "numpy" => Ok(InputFormat::Numpy),
            "json" => Ok(InputFormat::Json),
            "literal" | "code" => Ok(InputFormat::Literal),
            other => Err(Error::Options(format!("unknown input format: {}", other))),
        }
    }
}

/// Read section data from `text` in the given format. Numpy input is checked
/// for enclosing quotes.
pub fn parse_as(format: InputFormat, text: &str) -> Result<SectionMap> {
    match format {
        InputFormat::Numpy => parse(text, has_delimiters(text)),
        InputFormat::Json => Ok(serde_json::from_str(text)?),
        InputFormat::Literal => parse_literal(text),
    }
}
