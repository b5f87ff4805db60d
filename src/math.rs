//! reStructuredText `.. math::` blocks.
//!
//! A math block is the directive line plus every following line that is
//! blank or indented deeper than the directive. It is kept verbatim: never
//! paragraph-split, never reflowed.

use regex::Regex;
use std::sync::LazyLock;

static RE_MATH_DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[ \t]*\.\.[ \t]*math::").unwrap());

/// Piece of text as seen by [`split_math`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Ordinary lines, joined with `\n`; may contain blank lines.
    Text(String),
    /// A math block, dedented to its directive, trailing blank lines removed.
    Math(String),
}

/// True if `text` starts with a math directive.
pub fn is_math(text: &str) -> bool {
    RE_MATH_DIRECTIVE.is_match(text)
}

/// Separate math blocks from the surrounding text, in order.
pub fn split_math(text: &str) -> Vec<Block> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut blocks = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        if !is_math(lines[i]) {
            pending.push(lines[i]);
            i += 1;
            continue;
        }

        flush_text(&mut blocks, &mut pending);

        let directive_indent = indent_of(lines[i]);
        let mut end = i + 1;
        let mut last_content = i;
        while end < lines.len() {
            let line = lines[end];
            if line.trim().is_empty() {
                end += 1;
                continue;
            }
            if indent_of(line) <= directive_indent {
                break;
            }
            last_content = end;
            end += 1;
        }

        let body: Vec<&str> = lines[i..=last_content]
            .iter()
            .map(|l| {
                if l.trim().is_empty() {
                    ""
                } else {
                    &l[directive_indent.min(l.len())..]
                }
            })
            .collect();
        blocks.push(Block::Math(body.join("\n")));
        i = end;
    }
    flush_text(&mut blocks, &mut pending);
    blocks
}

fn flush_text(blocks: &mut Vec<Block>, pending: &mut Vec<&str>) {
    if pending.iter().any(|l| !l.trim().is_empty()) {
        blocks.push(Block::Text(pending.join("\n")));
    }
    pending.clear();
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_directive() {
        assert!(is_math(".. math::\n\n    x"));
        assert!(is_math("..math::"));
        assert!(!is_math("see .. math:: later"));
    }

    #[test]
    fn text_only() {
        assert_eq!(
            split_math("a\n\nb"),
            vec![Block::Text("a\n\nb".to_string())]
        );
    }

    #[test]
    fn math_between_text() {
        let text = "Some float.\n.. math::\n\n    \\frac{1}{2}\n\nYes.\n..math::\n    \\frac{1}{3}\nThis is the float.";
        assert_eq!(
            split_math(text),
            vec![
                Block::Text("Some float.".to_string()),
                Block::Math(".. math::\n\n    \\frac{1}{2}".to_string()),
                Block::Text("Yes.".to_string()),
                Block::Math("..math::\n    \\frac{1}{3}".to_string()),
                Block::Text("This is the float.".to_string()),
            ]
        );
    }

    #[test]
    fn indented_directive_is_dedented() {
        assert_eq!(
            split_math("  .. math::\n\n      x^2\n"),
            vec![Block::Math(".. math::\n\n    x^2".to_string())]
        );
    }
}
