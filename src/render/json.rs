//! JSON renderer: the document as section data, for tooling.

use crate::error::Result;
use crate::model::Document;
use crate::render::{RenderOptions, Rendered, Renderer};

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, doc: &Document, opts: &RenderOptions) -> Result<Rendered> {
        opts.validate()?;
        Ok(Rendered::plain(doc.to_json()?))
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
