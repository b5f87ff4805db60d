//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod literal;
pub mod numpy;

use crate::diagnostic::Diagnostic;
use crate::error::{Error, Result};
use crate::model::Document;

/// Layout settings shared by all renderers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Maximum line length, indentation included.
    pub width: usize,
    /// Indentation of every line but the first, in tabs.
    pub indent_level: usize,
    /// Spaces per tab.
    pub tab_size: usize,
    /// Prefix the opening quotes with `r`.
    pub is_raw: bool,
    /// Emit the enclosing triple quotes.
    pub include_delimiters: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 100,
            indent_level: 0,
            tab_size: 4,
            is_raw: false,
            include_delimiters: true,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 {
            return Err(Error::Options("width must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Indentation string for `indent_level` tabs.
    pub(crate) fn tab(&self) -> String {
        " ".repeat(self.indent_level * self.tab_size)
    }
}

/// Rendered text plus anything worth telling the caller about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

impl Rendered {
    pub(crate) fn plain(text: String) -> Self {
        Rendered {
            text,
            diagnostics: Vec::new(),
        }
    }
}

/// Trait for rendering a Document into a specific output format.
pub trait Renderer {
    fn render(&self, doc: &Document, opts: &RenderOptions) -> Result<Rendered>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "numpy" => Ok(Box::new(numpy::NumpyRenderer)),
        "literal" | "code" => Ok(Box::new(literal::LiteralRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(Error::Options(format!(
            "unknown format: {}. Use numpy, literal, or json",
            format
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderers_by_name() {
        assert_eq!(create_renderer("numpy").unwrap().file_extension(), "txt");
        assert_eq!(create_renderer("code").unwrap().file_extension(), "py");
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
        assert!(create_renderer("html").is_err());
    }

    #[test]
    fn zero_width_rejected() {
        let opts = RenderOptions {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(Error::Options(_))));
        assert!(RenderOptions::default().validate().is_ok());
    }
}
