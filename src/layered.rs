//! Rendering of nested, delimited, comma-separated structures such as
//! `Docstring(**{'summary': '...', 'parameters': [{...}, ...]})`.
//!
//! Every group picks its own layout:
//!
//! * `newline: true` puts the left delimiter at the end of the current line,
//!   each child on its own line one tab deeper (`,\n` separated, no trailing
//!   comma), and the right delimiter on a line of its own at the outer indent.
//! * `newline: false` keeps the children on the line of the left delimiter,
//!   separated by `, `. A child that would overflow moves to a continuation
//!   line aligned just after the left delimiter.
//!
//! The renderer tracks the column where each child starts and how many
//! characters follow it on its last line (separators and closing
//! delimiters), so text leaves are wrapped to exactly the room they have.

use crate::wrap::{self, char_len, AddedIndent, WrapConfig};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// A string leaf, wrapped and decorated with the configured edges.
    Text(String),
    Group(Group),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub left: String,
    pub right: String,
    pub newline: bool,
    pub items: Vec<Layer>,
}

impl Group {
    pub fn new(left: impl Into<String>, right: impl Into<String>, newline: bool) -> Self {
        Group {
            left: left.into(),
            right: right.into(),
            newline,
            items: Vec::new(),
        }
    }

    pub fn with_items(mut self, items: Vec<Layer>) -> Self {
        self.items = items;
        self
    }

    pub fn push(&mut self, item: Layer) {
        self.items.push(item);
    }
}

impl Layer {
    pub fn text(text: impl Into<String>) -> Self {
        Layer::Text(text.into())
    }
}

impl From<Group> for Layer {
    fn from(group: Group) -> Self {
        Layer::Group(group)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerConfig {
    pub width: usize,
    /// Indentation of the lines following the first, in tabs. The first line
    /// is never indented: the caller places it.
    pub indent_level: usize,
    pub tab_size: usize,
    /// Placed around every wrapped line of a text leaf.
    pub edges: (String, String),
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            width: 100,
            indent_level: 0,
            tab_size: 4,
            edges: ("'".to_string(), "'".to_string()),
        }
    }
}

pub fn render(layer: &Layer, config: &LayerConfig) -> String {
    let indent = config.indent_level * config.tab_size;
    Renderer { config }.layer(layer, indent, indent, 0)
}

struct Renderer<'a> {
    config: &'a LayerConfig,
}

impl Renderer<'_> {
    /// `indent`: column of continuation lines; `col`: column the layer starts
    /// at; `tail`: characters that will follow the layer on its last line.
    fn layer(&self, layer: &Layer, indent: usize, col: usize, tail: usize) -> String {
        match layer {
            Layer::Text(text) => self.text(text, indent, col, tail),
            Layer::Group(group) if group.items.is_empty() => {
                format!("{}{}", group.left, group.right)
            }
            Layer::Group(group) if group.newline => self.block(group, indent),
            Layer::Group(group) => self.inline(group, col, tail),
        }
    }

    fn text(&self, text: &str, indent: usize, col: usize, tail: usize) -> String {
        let (left, right) = &self.config.edges;
        if text.is_empty() {
            return format!("{}{}", left, right);
        }
        wrap::wrap(
            text,
            &WrapConfig {
                width: self.config.width.saturating_sub(tail),
                indent_level: 0,
                tab_size: self.config.tab_size,
                edges: self.config.edges.clone(),
                added_indent: AddedIndent::Split {
                    initial: " ".repeat(col),
                    subsequent: " ".repeat(indent),
                },
                remove_initial_indent: true,
                drop_whitespace: None,
            },
        )
    }

    fn block(&self, group: &Group, indent: usize) -> String {
        let inner = indent + self.config.tab_size;
        let pad = " ".repeat(inner);
        let last = group.items.len() - 1;
        let children: Vec<String> = group
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let tail = if i == last { 0 } else { 1 };
                format!("{}{}", pad, self.layer(item, inner, inner, tail))
            })
            .collect();
        format!(
            "{}\n{}\n{}{}",
            group.left,
            children.join(",\n"),
            " ".repeat(indent),
            group.right
        )
    }

    fn inline(&self, group: &Group, col: usize, tail: usize) -> String {
        let cont = col + char_len(&group.left);
        let pad = " ".repeat(cont);
        let last = group.items.len() - 1;

        let mut out = group.left.clone();
        let mut column = cont;
        for (i, item) in group.items.iter().enumerate() {
            let child_tail = if i == last {
                tail + char_len(&group.right)
            } else {
                1
            };
            if i > 0 {
                let overflows = self
                    .flat_len(item)
                    .is_some_and(|len| column + 2 + len + child_tail > self.config.width);
                if overflows && column > cont {
                    out.push_str(",\n");
                    out.push_str(&pad);
                    column = cont;
                } else {
                    out.push_str(", ");
                    column += 2;
                }
            }
            let rendered = self.layer(item, cont, column, child_tail);
            column = end_column(column, &rendered);
            out.push_str(&rendered);
        }
        out.push_str(&group.right);
        out
    }

    /// Length of `layer` on a single line, `None` if it always spans lines.
    fn flat_len(&self, layer: &Layer) -> Option<usize> {
        match layer {
            Layer::Text(text) => {
                let (left, right) = &self.config.edges;
                Some(char_len(left) + char_len(text) + char_len(right))
            }
            Layer::Group(group) if group.items.is_empty() => {
                Some(char_len(&group.left) + char_len(&group.right))
            }
            Layer::Group(group) if group.newline => None,
            Layer::Group(group) => {
                let mut len = char_len(&group.left) + char_len(&group.right);
                len += 2 * (group.items.len() - 1);
                for item in &group.items {
                    len += self.flat_len(item)?;
                }
                Some(len)
            }
        }
    }
}

fn end_column(start: usize, rendered: &str) -> usize {
    match rendered.rsplit_once('\n') {
        Some((_, last)) => char_len(last),
        None => start + char_len(rendered),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: &[&str]) -> Vec<Layer> {
        items.iter().map(|s| Layer::text(*s)).collect()
    }

    fn cfg(width: usize) -> LayerConfig {
        LayerConfig {
            width,
            ..Default::default()
        }
    }

    #[test]
    fn inline_group() {
        let group = Group::new("[", "]", false).with_items(texts(&["a", "b"]));
        assert_eq!(render(&group.into(), &cfg(100)), "['a', 'b']");
    }

    #[test]
    fn newline_group() {
        let group = Group::new("{", "}", true).with_items(texts(&["a", "b"]));
        assert_eq!(render(&group.into(), &cfg(100)), "{\n    'a',\n    'b'\n}");
    }

    #[test]
    fn empty_group_and_leaf() {
        assert_eq!(render(&Group::new("[", "]", true).into(), &cfg(100)), "[]");
        assert_eq!(render(&Layer::text(""), &cfg(100)), "''");
    }

    #[test]
    fn leaf_wraps_after_its_prefix() {
        let group = Group::new("x = (", ")", false).with_items(texts(&["hello my name is"]));
        assert_eq!(
            render(&group.into(), &cfg(20)),
            "x = ('hello my '\n     'name is')"
        );
    }

    #[test]
    fn overflowing_children_move_to_continuation_lines() {
        let group = Group::new("[", "]", false).with_items(texts(&["aaaa", "bbbb", "cccc"]));
        assert_eq!(
            render(&group.clone().into(), &cfg(14)),
            "['aaaa',\n 'bbbb',\n 'cccc']"
        );
        assert_eq!(
            render(&group.into(), &cfg(16)),
            "['aaaa', 'bbbb',\n 'cccc']"
        );
    }

    #[test]
    fn nested_layouts_indent_by_depth() {
        let pair = |key: &str, value: Layer| {
            Layer::from(Group::new(format!("'{}': ", key), "", false).with_items(vec![value]))
        };
        let entry = Group::new("{", "}", false).with_items(vec![
            pair("name", Layer::text("a")),
            pair(
                "types",
                Group::new("[", "]", false).with_items(texts(&["str"])).into(),
            ),
        ]);
        let root = Group::new("Docstring(**{", "})", true).with_items(vec![
            pair("summary", Layer::text("Summary.")),
            Group::new("'parameters': [", "]", true)
                .with_items(vec![entry.into()])
                .into(),
        ]);
        assert_eq!(
            render(&root.into(), &cfg(100)),
            "Docstring(**{\n    'summary': 'Summary.',\n    'parameters': [\n        {'name': 'a', 'types': ['str']}\n    ]\n})"
        );
    }

    #[test]
    fn indent_level_shifts_following_lines() {
        let group = Group::new("{", "}", true).with_items(texts(&["a"]));
        let config = LayerConfig {
            indent_level: 1,
            ..Default::default()
        };
        assert_eq!(render(&group.into(), &config), "{\n        'a'\n    }");
    }
}
