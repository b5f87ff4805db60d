//! Parse, validate, merge and re-render numpy-style documentation blocks.
//!
//! ```text
//! text ─ parser::parse ─> SectionMap ─ Document::from_sections ─> Document
//!                                                 │ inherit(other)
//!                                                 └─> render_fixed / render_literal / to_json
//! ```

pub mod diagnostic;
pub mod error;
pub mod layered;
pub mod math;
pub mod model;
pub mod parser;
pub mod render;
pub mod wrap;

pub use diagnostic::Diagnostic;
pub use error::{Error, Result};
pub use model::{Document, Entry, EntryInput, Section, SectionMap, SectionValue};
pub use parser::{has_delimiters, parse, parse_literal, InputFormat};
pub use render::{create_renderer, RenderOptions, Rendered, Renderer};
