//! Numpy renderer: the docstring convention the parser reads.
//!
//! The first line is never indented (it follows the opening quotes in
//! source); every other line gets `indent_level` tabs.

use crate::diagnostic::Diagnostic;
use crate::error::Result;
use crate::math::is_math;
use crate::model::{Document, Entry, Section, EXTENDED, REFERENCES, SECTION_ORDER};
use crate::render::{RenderOptions, Rendered, Renderer};
use crate::wrap::{self, char_len, collapse_lines, indent_verbatim, multi_wrap, AddedIndent, WrapConfig};

pub struct NumpyRenderer;

impl Renderer for NumpyRenderer {
    fn render(&self, doc: &Document, opts: &RenderOptions) -> Result<Rendered> {
        doc.render_fixed(opts)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

const QUOTES: &str = "\"\"\"";

/// Stands for a space the entry header must not break at: a continuation
/// line is indented and would read back as description text.
const GLUE: char = '\u{a0}';

impl Document {
    /// Render in the numpy convention.
    ///
    /// The summary stays on one line: the parser reads only a one-line
    /// summary back. If it does not fit after the opening quotes it moves to
    /// its own line, unwrapped, and `SummaryTooLong` is reported when it
    /// still exceeds the width there.
    pub fn render_fixed(&self, opts: &RenderOptions) -> Result<Rendered> {
        opts.validate()?;
        let mut diagnostics = Vec::new();
        let tab = opts.tab();
        let (open, close) = match (opts.include_delimiters, opts.is_raw) {
            (false, _) => (String::new(), ""),
            (true, false) => (QUOTES.to_string(), QUOTES),
            (true, true) => (format!("r{}", QUOTES), QUOTES),
        };
        let body = self.render_body(opts, &mut diagnostics);
        let summary = self.summary();

        let one_liner = format!("{}{}{}", open, summary, close);
        if body.is_empty() && char_len(&tab) + char_len(&one_liner) <= opts.width {
            return Ok(Rendered {
                text: one_liner,
                diagnostics,
            });
        }

        let mut out = open.clone();
        if char_len(&tab) + char_len(&open) + char_len(summary) <= opts.width || open.is_empty()
        {
            out.push_str(summary);
        } else {
            out.push('\n');
            out.push_str(&tab);
            out.push_str(summary);
        }
        let available = opts.width.saturating_sub(char_len(&tab));
        if char_len(summary) > available {
            log::debug!("summary does not fit in {} columns", available);
            diagnostics.push(Diagnostic::SummaryTooLong {
                length: char_len(summary),
                available,
            });
        }

        out.push_str(&body);
        if !close.is_empty() {
            out.push('\n');
            out.push_str(&tab);
            out.push_str(close);
        }
        Ok(Rendered {
            text: out,
            diagnostics,
        })
    }

    /// Everything after the summary line, each block introduced by a blank line.
    fn render_body(&self, opts: &RenderOptions, diagnostics: &mut Vec<Diagnostic>) -> String {
        let tab = opts.tab();
        let mut out = String::new();

        for paragraph in self.paragraphs(EXTENDED) {
            out.push_str("\n\n");
            out.push_str(&paragraph_text(paragraph, opts));
        }

        for &key in SECTION_ORDER {
            let Some(section) = self.section(key).filter(|s| !s.is_empty()) else {
                continue;
            };
            let title = title_case(key);
            out.push_str(&format!(
                "\n\n{tab}{title}\n{tab}{dashes}\n",
                dashes = "-".repeat(char_len(&title))
            ));
            let body = match section {
                Section::Entries(entries) => entries
                    .iter()
                    .map(|e| e.render_fixed(opts.width, opts.indent_level, opts.tab_size))
                    .collect::<Vec<_>>()
                    .join("\n"),
                Section::Paragraphs(paragraphs) if key == REFERENCES => references(paragraphs, opts),
                Section::Paragraphs(paragraphs) => paragraphs
                    .iter()
                    .map(|p| paragraph_text(p, opts))
                    .collect::<Vec<_>>()
                    .join("\n\n"),
            };
            out.push_str(&body);
        }

        for key in self.custom_keys() {
            log::debug!("section `{}` has no place in the numpy layout", key);
            diagnostics.push(Diagnostic::UnrenderedSection {
                key: key.to_string(),
            });
        }
        out
    }
}

impl Entry {
    /// `name(signature) : types` with continuation lines aligned past the
    /// name, then one block per description at one more indent level.
    pub fn render_fixed(&self, width: usize, indent_level: usize, tab_size: usize) -> String {
        let mut header = format!("{}{}", glue(self.name()), self.signature());
        let types = self.types();
        if let Some((first, rest)) = types.split_first() {
            header.push(GLUE);
            header.push(':');
            header.push(GLUE);
            if rest.is_empty() {
                header.push_str(&glue(first));
            } else {
                header.push('{');
                header.push_str(&glue(first));
                for t in rest {
                    header.push_str(", ");
                    header.push_str(t);
                }
                header.push('}');
            }
        }
        let hanging = if !self.signature().is_empty() {
            char_len(self.name()) + 1
        } else if !types.is_empty() {
            char_len(self.name()) + 3
        } else {
            0
        };

        let header = wrap::wrap(
            &header,
            &WrapConfig {
                width,
                indent_level,
                tab_size,
                added_indent: AddedIndent::hanging(hanging),
                ..Default::default()
            },
        );
        let mut lines = vec![header.replace(GLUE, " ")];

        let descriptions = self.descriptions();
        for (i, description) in descriptions.iter().enumerate() {
            if is_math(description) {
                lines.push(indent_verbatim(description, indent_level + 1, tab_size));
                if i + 1 < descriptions.len() {
                    lines.push(String::new());
                }
            } else {
                lines.push(wrap::wrap(
                    description,
                    &WrapConfig {
                        width,
                        indent_level: indent_level + 1,
                        tab_size,
                        ..Default::default()
                    },
                ));
            }
        }
        lines.join("\n")
    }
}

fn glue(text: &str) -> String {
    text.replace(' ', &GLUE.to_string())
}

fn paragraph_text(paragraph: &str, opts: &RenderOptions) -> String {
    if is_math(paragraph) {
        indent_verbatim(paragraph, opts.indent_level, opts.tab_size)
    } else {
        multi_wrap(paragraph, opts.width, opts.indent_level, opts.tab_size)
    }
}

/// `.. [N] text`, numbered from 1, continuation lines aligned past the marker.
fn references(paragraphs: &[String], opts: &RenderOptions) -> String {
    paragraphs
        .iter()
        .enumerate()
        .map(|(i, paragraph)| {
            let marker = format!(".. [{}] ", i + 1);
            wrap::wrap(
                &collapse_lines(paragraph),
                &WrapConfig {
                    width: opts.width,
                    indent_level: opts.indent_level,
                    tab_size: opts.tab_size,
                    added_indent: AddedIndent::Split {
                        subsequent: " ".repeat(char_len(&marker)),
                        initial: marker,
                    },
                    ..Default::default()
                },
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn title_case(key: &str) -> String {
    key.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionMap;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        let sections: SectionMap = serde_json::from_value(value).unwrap();
        Document::from_sections(sections).unwrap()
    }

    fn opts(width: usize, indent_level: usize) -> RenderOptions {
        RenderOptions {
            width,
            indent_level,
            ..Default::default()
        }
    }

    fn render(doc: &Document, opts: &RenderOptions) -> String {
        doc.render_fixed(opts).unwrap().text
    }

    #[test]
    fn one_liner() {
        let d = doc(json!({"summary": "Summary."}));
        assert_eq!(render(&d, &opts(100, 0)), "\"\"\"Summary.\"\"\"");
        let raw = RenderOptions {
            is_raw: true,
            ..Default::default()
        };
        assert_eq!(render(&d, &raw), "r\"\"\"Summary.\"\"\"");
        let bare = RenderOptions {
            include_delimiters: false,
            ..Default::default()
        };
        assert_eq!(render(&d, &bare), "Summary.");
    }

    #[test]
    fn parameters_section() {
        let d = doc(json!({
            "summary": "Summary.",
            "parameters": [{"name": "a", "types": "str", "descs": ["description1.", "description2."]}],
        }));
        assert_eq!(
            render(&d, &opts(100, 1)),
            "\"\"\"Summary.\n\n    Parameters\n    ----------\n    a : str\n        description1.\n        description2.\n    \"\"\""
        );
    }

    #[test]
    fn long_summary_gets_own_line() {
        let d = doc(json!({"summary": "A summary that is long."}));
        let rendered = d.render_fixed(&opts(20, 0)).unwrap();
        assert_eq!(rendered.text, "\"\"\"\nA summary that is long.\n\"\"\"");
        assert_eq!(
            rendered.diagnostics,
            [Diagnostic::SummaryTooLong {
                length: 23,
                available: 20
            }]
        );
    }

    #[test]
    fn canonical_section_order() {
        let d = doc(json!({
            "summary": "S.",
            "notes": "A note.",
            "see also": [{"name": "other"}],
            "Parameters": [{"name": "x"}],
        }));
        assert_eq!(
            render(&d, &opts(100, 0)),
            "\"\"\"S.\n\nParameters\n----------\nx\n\nSee Also\n--------\nother\n\nNotes\n-----\nA note.\n\"\"\""
        );
    }

    #[test]
    fn extended_paragraphs_wrap_and_math_stays() {
        let d = doc(json!({
            "summary": "S.",
            "extended": ["one two three four", ".. math::\n\n    x^2"],
        }));
        assert_eq!(
            render(&d, &opts(14, 1)),
            "\"\"\"S.\n\n    one two\n    three four\n\n    .. math::\n\n        x^2\n    \"\"\""
        );
    }

    #[test]
    fn references_are_numbered() {
        let d = doc(json!({
            "summary": "S.",
            "references": ["First reference that is rather long.", "Second."],
        }));
        assert_eq!(
            render(&d, &opts(30, 0)),
            "\"\"\"S.\n\nReferences\n----------\n.. [1] First reference that is\n       rather long.\n\n.. [2] Second.\n\"\"\""
        );
    }

    #[test]
    fn entry_header_hangs_past_the_name() {
        let entry = Entry::new("run")
            .unwrap()
            .with_signature("alpha, beta, gamma");
        assert_eq!(entry.render_fixed(20, 0, 4), "run(alpha, beta,\n    gamma)");

        let entry = Entry::new("x").unwrap().with_types(["int", "float"]);
        assert_eq!(entry.render_fixed(100, 0, 4), "x : {int, float}");
    }

    #[test]
    fn entry_header_keeps_types_with_the_name() {
        let entry = Entry::new("parameter_name")
            .unwrap()
            .with_types(["int", "float"])
            .with_descriptions("The value.");
        assert_eq!(
            entry.render_fixed(20, 0, 4),
            "parameter_name : {int,\n                 float}\n    The value."
        );

        let entry = Entry::new("x").unwrap().with_types("int or None");
        assert_eq!(entry.render_fixed(8, 0, 4), "x : int or None");
    }

    #[test]
    fn entry_descriptions_with_math() {
        let entry = Entry::new("x").unwrap().with_types("float").with_descriptions(vec![
            "Some float.",
            ".. math::\n\n    \\frac{1}{2}",
            "Yes.",
        ]);
        assert_eq!(
            entry.render_fixed(100, 0, 4),
            "x : float\n    Some float.\n    .. math::\n\n        \\frac{1}{2}\n\n    Yes."
        );
    }

    #[test]
    fn custom_sections_are_left_out() {
        let d = doc(json!({"summary": "S.", "warnings": "careful"}));
        let rendered = d.render_fixed(&opts(100, 0)).unwrap();
        assert_eq!(rendered.text, "\"\"\"S.\"\"\"");
        assert_eq!(
            rendered.diagnostics,
            [Diagnostic::UnrenderedSection {
                key: "warnings".to_string()
            }]
        );
    }

    #[test]
    fn empty_summary_keeps_blank_first_line() {
        let d = doc(json!({"summary": "", "extended": ["Text."]}));
        assert_eq!(render(&d, &opts(100, 0)), "\"\"\"\n\nText.\n\"\"\"");
    }
}
