//! Fixed-width line wrapping.
//!
//! First-fit packing on top of `textwrap`. Words longer than the width are
//! never broken. With edges, whitespace at line boundaries is kept so the
//! decorated pieces concatenate back to the input.

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;
use textwrap::{dedent, Options, WordSeparator, WordSplitter, WrapAlgorithm};

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\n\s*").unwrap());

static RE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+|\S+").unwrap());

/// Indentation added after the `indent_level * tab_size` spaces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AddedIndent {
    #[default]
    None,
    /// Same extra indent on every line.
    Uniform(String),
    /// Separate extra indent for the first line and the following lines.
    Split { initial: String, subsequent: String },
}

impl AddedIndent {
    /// Build from zero, one or two parts. A single part applies to all lines.
    pub fn from_parts(parts: &[&str]) -> Result<Self> {
        match parts {
            [] => Ok(AddedIndent::None),
            [all] => Ok(AddedIndent::Uniform(all.to_string())),
            [initial, subsequent] => Ok(AddedIndent::Split {
                initial: initial.to_string(),
                subsequent: subsequent.to_string(),
            }),
            _ => Err(Error::AddedIndent(parts.len())),
        }
    }

    /// No extra indent on the first line, `n` spaces on the others.
    pub fn hanging(n: usize) -> Self {
        AddedIndent::Split {
            initial: String::new(),
            subsequent: " ".repeat(n),
        }
    }

    fn parts(&self) -> (&str, &str) {
        match self {
            AddedIndent::None => ("", ""),
            AddedIndent::Uniform(all) => (all, all),
            AddedIndent::Split {
                initial,
                subsequent,
            } => (initial, subsequent),
        }
    }
}

/// Settings for [`wrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrapConfig {
    /// Maximum line length, indentation and edges included.
    pub width: usize,
    pub indent_level: usize,
    /// Spaces per indent level; also the tab stop used to expand tabs.
    pub tab_size: usize,
    /// Text placed right after the indentation / at the end of every line.
    pub edges: (String, String),
    pub added_indent: AddedIndent,
    /// Strip the computed indentation from the first line only.
    pub remove_initial_indent: bool,
    /// Drop whitespace at line boundaries. Defaults to on without edges and
    /// off with edges, so decorated lines keep their exact content.
    pub drop_whitespace: Option<bool>,
}

impl Default for WrapConfig {
    fn default() -> Self {
        Self {
            width: 100,
            indent_level: 0,
            tab_size: 4,
            edges: (String::new(), String::new()),
            added_indent: AddedIndent::None,
            remove_initial_indent: false,
            drop_whitespace: None,
        }
    }
}

/// Wrap `text` into lines of at most `config.width` characters.
pub fn wrap(text: &str, config: &WrapConfig) -> String {
    let (left, right) = (config.edges.0.as_str(), config.edges.1.as_str());
    let drop_whitespace = config
        .drop_whitespace
        .unwrap_or(left.is_empty() && right.is_empty());
    let budget = config.width.saturating_sub(char_len(left) + char_len(right));

    let tab = " ".repeat(config.tab_size * config.indent_level);
    let (added_first, added_rest) = config.added_indent.parts();
    let initial = format!("{}{}", tab, added_first);
    let subsequent = format!("{}{}", tab, added_rest);

    let expanded = text.replace('\t', &" ".repeat(config.tab_size));
    let mut lines = if drop_whitespace {
        let source = expanded.trim();
        if source.is_empty() {
            return String::new();
        }
        let options = Options::new(budget)
            .initial_indent(&initial)
            .subsequent_indent(&subsequent)
            .break_words(false)
            .word_separator(WordSeparator::AsciiSpace)
            .word_splitter(WordSplitter::NoHyphenation)
            .wrap_algorithm(WrapAlgorithm::FirstFit);
        textwrap::wrap(source, options)
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    } else {
        fill_keeping_whitespace(&expanded, budget, &initial, &subsequent)
    };
    if lines.is_empty() {
        return String::new();
    }

    let mut first_indent = initial.as_str();
    if config.remove_initial_indent {
        lines[0] = strip_indent(&lines[0], &initial);
        first_indent = "";
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let indent = if i == 0 { first_indent } else { subsequent.as_str() };
            add_edges(line, indent, left, right)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap each line of `text` on its own, keeping existing newlines.
///
/// Continuation lines are indented like the line they came from, so nested
/// bullets and quotes keep their relative indentation after reflow.
pub fn multi_wrap(text: &str, width: usize, indent_level: usize, tab_size: usize) -> String {
    let expanded = text.replace('\t', &" ".repeat(tab_size));
    let wrapped: Vec<String> = expanded
        .split('\n')
        .map(|line| {
            let content = line.trim_start();
            let leading = char_len(line) - char_len(content);
            wrap(
                content,
                &WrapConfig {
                    width,
                    indent_level,
                    tab_size,
                    added_indent: AddedIndent::Uniform(" ".repeat(leading)),
                    ..Default::default()
                },
            )
        })
        .collect();
    wrapped.join("\n").trim_end_matches('\n').to_string()
}

/// Indent every non-blank line of `text` by `indent_level * tab_size` spaces
/// without reflowing it.
pub fn indent_verbatim(text: &str, indent_level: usize, tab_size: usize) -> String {
    let tab = " ".repeat(indent_level * tab_size);
    text.split('\n')
        .map(|line| {
            if line.trim().is_empty() {
                String::new()
            } else {
                format!("{}{}", tab, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dedent `text`, optionally leaving the first line out of the margin
/// computation (it follows the opening quotes in source and is never indented).
pub fn remove_indent(text: &str, include_first_line: bool) -> String {
    if include_first_line {
        return dedent(text);
    }
    match text.split_once('\n') {
        Some((first, rest)) => format!("{}\n{}", first, dedent(rest)),
        None => text.to_string(),
    }
}

/// Join the lines of `text` with single spaces.
pub fn collapse_lines(text: &str) -> String {
    RE_LINE_BREAK.replace_all(text.trim(), " ").into_owned()
}

/// Number of characters, which is what widths are measured in.
pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

// -- Internals ----------------------------------------------------------------

/// A run of whitespace or of non-whitespace, packed as-is.
#[derive(Debug)]
struct Run<'a>(&'a str);

impl Fragment for Run<'_> {
    fn width(&self) -> f64 {
        char_len(self.0) as f64
    }

    fn whitespace_width(&self) -> f64 {
        0.0
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// First-fit packing where whitespace counts like any other run and stays
/// at line boundaries, so the lines concatenate back to `text`.
fn fill_keeping_whitespace(
    text: &str,
    width: usize,
    initial: &str,
    subsequent: &str,
) -> Vec<String> {
    let runs: Vec<Run> = RE_RUN.find_iter(text).map(|m| Run(m.as_str())).collect();
    if runs.is_empty() {
        return Vec::new();
    }
    let line_widths = [
        width as f64 - char_len(initial) as f64,
        width as f64 - char_len(subsequent) as f64,
    ];
    wrap_first_fit(&runs, &line_widths)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let indent = if i == 0 { initial } else { subsequent };
            let content: String = line.iter().map(|run| run.0).collect();
            format!("{}{}", indent, content)
        })
        .collect()
}

fn strip_indent(line: &str, indent: &str) -> String {
    match line.strip_prefix(indent) {
        Some(rest) => rest.to_string(),
        None => line.chars().skip(char_len(indent)).collect(),
    }
}

fn add_edges(line: &str, indent: &str, left: &str, right: &str) -> String {
    if left.is_empty() && right.is_empty() {
        return line.to_string();
    }
    match line.strip_prefix(indent) {
        Some(content) if !content.is_empty() => {
            format!("{}{}{}{}", indent, left, content, right)
        }
        _ => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg(width: usize, indent_level: usize, tab_size: usize) -> WrapConfig {
        WrapConfig {
            width,
            indent_level,
            tab_size,
            ..Default::default()
        }
    }

    #[test]
    fn one_word_per_line() {
        assert_eq!(wrap("hello my name is", &cfg(5, 0, 4)), "hello\nmy\nname\nis");
    }

    #[test]
    fn indent_counts_towards_width() {
        assert_eq!(wrap("hello my name is", &cfg(5, 1, 1)), " hello\n my\n name\n is");
    }

    #[test]
    fn surrounding_whitespace_dropped() {
        assert_eq!(
            wrap("\n\nhello   my   name   is\n\n", &cfg(5, 0, 4)),
            "hello\nmy\nname\nis"
        );
    }

    #[test]
    fn added_indent_variants() {
        let with = |added: AddedIndent| {
            wrap(
                "hello my name is",
                &WrapConfig {
                    width: 5,
                    added_indent: added,
                    ..Default::default()
                },
            )
        };
        assert_eq!(
            with(AddedIndent::from_parts(&["xx", ""]).unwrap()),
            "xxhello\nmy\nname\nis"
        );
        assert_eq!(
            with(AddedIndent::from_parts(&["", "xx"]).unwrap()),
            "hello\nxxmy\nxxname\nxxis"
        );
        assert_eq!(
            with(AddedIndent::from_parts(&["xx"]).unwrap()),
            "xxhello\nxxmy\nxxname\nxxis"
        );
        assert_eq!(
            with(AddedIndent::Uniform("xx".to_string())),
            "xxhello\nxxmy\nxxname\nxxis"
        );
    }

    #[test]
    fn added_indent_rejects_three_parts() {
        assert!(matches!(
            AddedIndent::from_parts(&["a", "b", "c"]),
            Err(Error::AddedIndent(3))
        ));
    }

    #[test]
    fn edges_with_dropped_whitespace() {
        let edged = |width: usize, indent_level: usize, tab_size: usize| {
            wrap(
                "hello my name is",
                &WrapConfig {
                    width,
                    indent_level,
                    tab_size,
                    edges: ("(".to_string(), ")".to_string()),
                    drop_whitespace: Some(true),
                    ..Default::default()
                },
            )
        };
        assert_eq!(edged(5, 0, 4), "(hello)\n(my)\n(name)\n(is)");
        assert_eq!(edged(11, 1, 1), " (hello my)\n (name is)");
        assert_eq!(edged(10, 1, 1), " (hello)\n (my name)\n (is)");
    }

    #[test]
    fn edges_keep_whitespace_by_default() {
        let out = wrap(
            "hello my name is",
            &WrapConfig {
                width: 11,
                indent_level: 1,
                tab_size: 1,
                edges: ("(".to_string(), ")".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(out, " (hello my)\n ( name is)");
    }

    #[test]
    fn remove_initial_indent_for_prefixed_text() {
        let start = "x = (";
        let out = wrap(
            "1 + 2 + 3 + 4 + 5 + 6 + 7",
            &WrapConfig {
                width: 9,
                added_indent: AddedIndent::Uniform(" ".repeat(start.len())),
                remove_initial_indent: true,
                ..Default::default()
            },
        );
        assert_eq!(
            format!("{}{})", start, out),
            "x = (1 +\n     2 +\n     3 +\n     4 +\n     5 +\n     6 +\n     7)"
        );

        let out = wrap(
            "1 + 2 + 3 + 4 + 5 + 6 + 7",
            &WrapConfig {
                width: 9,
                added_indent: AddedIndent::hanging(start.len()),
                ..Default::default()
            },
        );
        assert_eq!(
            format!("{}{})", start, out),
            "x = (1 + 2 + 3\n     + 4\n     + 5\n     + 6\n     + 7)"
        );
    }

    #[test]
    fn wrap_is_a_fixed_point() {
        let text = "The quick brown fox jumps over the lazy dog and keeps on running far away.";
        for config in [cfg(20, 0, 4), cfg(24, 1, 4), cfg(13, 2, 2)] {
            let once = wrap(text, &config);
            assert_eq!(wrap(&once, &config), once);
        }
    }

    #[test]
    fn empty_text_wraps_to_empty() {
        assert_eq!(wrap("", &cfg(10, 1, 4)), "");
        assert_eq!(wrap("   \n ", &cfg(10, 1, 4)), "");
    }

    #[test]
    fn multi_wrap_keeps_relative_indentation() {
        let text = "Intro line\n  - first item that is long\n  - second";
        assert_eq!(
            multi_wrap(text, 20, 1, 2),
            "  Intro line\n    - first item\n    that is long\n    - second"
        );
    }

    #[test]
    fn multi_wrap_keeps_blank_lines() {
        assert_eq!(multi_wrap("a\n\nb\n\n", 10, 0, 4), "a\n\nb");
    }

    #[test]
    fn remove_indent_first_line() {
        assert_eq!(remove_indent("   fx\n    gx\n  hx", false), "   fx\n  gx\nhx");
        assert_eq!(remove_indent("   fx\n    gx\n  hx", true), " fx\n  gx\nhx");
        assert_eq!(remove_indent("single", false), "single");
    }

    #[test]
    fn tabs_become_spaces() {
        assert_eq!(wrap("a\tb", &cfg(10, 0, 2)), "a  b");
        assert_eq!(multi_wrap("\tx\n\ty", 10, 0, 2), "  x\n  y");
    }

    #[test]
    fn hyphenated_words_stay_whole() {
        assert_eq!(wrap("an array-like value", &cfg(12, 0, 4)), "an\narray-like\nvalue");
    }

    #[test]
    fn lines_collapse_to_spaces() {
        assert_eq!(collapse_lines("  one\n   two  \n\nthree "), "one two three");
        assert_eq!(collapse_lines("a  b"), "a  b");
    }

    #[test]
    fn verbatim_indent_skips_blank_lines() {
        assert_eq!(indent_verbatim(".. math::\n\n    x", 1, 4), "    .. math::\n\n        x");
    }
}
