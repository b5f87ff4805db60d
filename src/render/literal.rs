//! Literal renderer: a Python expression rebuilding the document,
//! `Docstring(**{'summary': ..., 'parameters': [...]})`.

use crate::error::Result;
use crate::layered::{self, Group, Layer, LayerConfig};
use crate::model::{Document, Entry, Section, EXTENDED, SECTION_ORDER, SUMMARY};
use crate::render::{RenderOptions, Rendered, Renderer};

pub struct LiteralRenderer;

impl Renderer for LiteralRenderer {
    fn render(&self, doc: &Document, opts: &RenderOptions) -> Result<Rendered> {
        doc.render_literal(opts)
    }

    fn file_extension(&self) -> &str {
        "py"
    }
}

impl Document {
    /// Render as a literal expression. Sections come in the numpy order,
    /// followed by non-numpy sections, which this form keeps.
    pub fn render_literal(&self, opts: &RenderOptions) -> Result<Rendered> {
        opts.validate()?;
        let mut root = Group::new("Docstring(**{", "})", true);
        root.push(pair(SUMMARY, Layer::text(escape(self.summary()))));

        let mut keys: Vec<&str> = vec![EXTENDED];
        keys.extend(SECTION_ORDER);
        keys.extend(self.custom_keys());
        for key in keys {
            match self.section(key) {
                Some(Section::Entries(entries)) if !entries.is_empty() => {
                    root.push(
                        Group::new(format!("{}: [", quote(key)), "]", true)
                            .with_items(entries.iter().map(entry).collect())
                            .into(),
                    );
                }
                Some(Section::Paragraphs(paragraphs)) if !paragraphs.is_empty() => {
                    root.push(
                        Group::new(format!("{}: [", quote(key)), "]", false)
                            .with_items(texts(paragraphs))
                            .into(),
                    );
                }
                _ => {}
            }
        }

        let text = layered::render(
            &root.into(),
            &LayerConfig {
                width: opts.width,
                indent_level: opts.indent_level,
                tab_size: opts.tab_size,
                edges: ("'".to_string(), "'".to_string()),
            },
        );
        Ok(Rendered::plain(text))
    }
}

fn entry(entry: &Entry) -> Layer {
    let mut group = Group::new("{", "}", false);
    group.push(pair("name", Layer::text(escape(entry.name()))));
    if !entry.signature().is_empty() {
        group.push(pair("signature", Layer::text(escape(entry.signature()))));
    }
    if !entry.types().is_empty() {
        group.push(pair("types", list(entry.types())));
    }
    if !entry.descriptions().is_empty() {
        group.push(pair("descriptions", list(entry.descriptions())));
    }
    group.into()
}

fn pair(key: &str, value: Layer) -> Layer {
    Group::new(format!("{}: ", quote(key)), "", false)
        .with_items(vec![value])
        .into()
}

fn list(items: &[String]) -> Layer {
    Group::new("[", "]", false).with_items(texts(items)).into()
}

fn texts(items: &[String]) -> Vec<Layer> {
    items.iter().map(|s| Layer::text(escape(s))).collect()
}

fn quote(s: &str) -> String {
    format!("'{}'", escape(s))
}

/// Escape for a single-quoted Python string.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}
