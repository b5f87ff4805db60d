//! Numpy-style docstring parser.
//!
//! Produces section data: `summary` (text), `extended` (paragraphs), then
//! one key per titled section in document order. Entry sections hold raw
//! entries (`name`, `signature`, `types`, `descriptions`), free-text
//! sections hold paragraphs.

use crate::error::{Error, Result};
use crate::math::{split_math, Block};
use crate::model::{
    normalize_signature, EntryInput, RawEntry, SectionMap, SectionValue, ENTRY_SECTIONS,
    EXTENDED, REFERENCES, SUMMARY,
};
use crate::wrap::{char_len, collapse_lines, remove_indent};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use textwrap::dedent;

// -- Regex patterns -----------------------------------------------------------

static RE_SUMMARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\n?(.*?)\n\n+").unwrap());

static RE_SUMMARY_ONLY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\n?(.*?)\n*$").unwrap());

static RE_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^(\S.*)\n(-+)[ \t]*$").unwrap());

static RE_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[^(:\s][^(:]*?)[ \t]*(?P<signature>\(.*?\))?[ \t]*(?::[ \t]*(?P<types>.*?))?[ \t]*$",
    )
    .unwrap()
});

static RE_PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n\s*").unwrap());

static RE_CLAUSE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.\n\s*").unwrap());

static RE_REFERENCE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.\.[ \t]+\[[^\]]*\][ \t]*").unwrap());

const QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// True if `text` is enclosed in triple quotes (optionally raw-prefixed).
pub fn has_delimiters(text: &str) -> bool {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix(['r', 'R']).unwrap_or(trimmed);
    QUOTES
        .iter()
        .any(|&q| body.len() >= 2 * q.len() && body.starts_with(q) && body.ends_with(q))
}

/// Parse a numpy-style docstring into section data.
///
/// With `contains_delimiters`, surrounding triple quotes are stripped first;
/// raw-string quotes (`r"""`) are refused.
pub fn parse(text: &str, contains_delimiters: bool) -> Result<SectionMap> {
    let mut text = text.trim_start_matches([' ', '\t']);
    if contains_delimiters {
        text = strip_delimiters(text)?;
    }
    // The first line followed the opening quotes and carries no margin.
    let text = remove_indent(text.trim_end(), false);

    let (summary, rest) = split_summary(&text)?;
    log::trace!("summary: {:?}", summary);

    let mut sections = SectionMap::new();
    sections.insert(SUMMARY.to_string(), SectionValue::Text(summary.to_string()));

    let headers: Vec<_> = RE_HEADER.captures_iter(rest).collect();
    let extended_end = headers
        .first()
        .and_then(|c| c.get(0))
        .map_or(rest.len(), |m| m.start());
    let extended = paragraphs(&rest[..extended_end]);
    if !extended.is_empty() {
        sections.insert(EXTENDED.to_string(), SectionValue::Paragraphs(extended));
    }

    for (i, caps) in headers.iter().enumerate() {
        let title = caps[1].trim_end();
        let dashes = caps[2].len();
        if dashes != char_len(title) {
            return Err(Error::HeaderUnderline {
                header: title.to_string(),
                expected: char_len(title),
                found: dashes,
            });
        }

        let start = caps.get(0).map_or(0, |m| m.end());
        let end = headers
            .get(i + 1)
            .and_then(|c| c.get(0))
            .map_or(rest.len(), |m| m.start());
        let body = &rest[start..end];
        let key = title.to_lowercase();
        log::trace!("section `{}`", key);

        let value = if ENTRY_SECTIONS.contains(&key.as_str()) {
            SectionValue::Entries(entries(body)?)
        } else if key == REFERENCES {
            SectionValue::Paragraphs(paragraphs(body).iter().map(|p| reference(p)).collect())
        } else {
            SectionValue::Paragraphs(paragraphs(body))
        };
        sections.insert(key, value);
    }

    log::debug!("parsed {} sections", sections.len());
    Ok(sections)
}

fn strip_delimiters(text: &str) -> Result<&str> {
    if let Some(rest) = text.strip_prefix(['r', 'R']) {
        if QUOTES.iter().any(|&q| rest.starts_with(q)) {
            return Err(Error::RawString);
        }
    }
    let mut text = text;
    for quote in QUOTES {
        if let Some(inner) = text.strip_prefix(quote) {
            text = inner;
            let trimmed = text.trim_end();
            text = trimmed.strip_suffix(quote).unwrap_or(trimmed);
            break;
        }
    }
    Ok(text)
}

/// Summary line and the remaining text.
fn split_summary(text: &str) -> Result<(&str, &str)> {
    if let Some(caps) = RE_SUMMARY.captures(text) {
        let summary = caps.get(1).map_or("", |m| m.as_str());
        let end = caps.get(0).map_or(0, |m| m.end());
        return Ok((summary.trim(), &text[end..]));
    }
    if let Some(caps) = RE_SUMMARY_ONLY.captures(text) {
        let summary = caps.get(1).map_or("", |m| m.as_str());
        return Ok((summary.trim(), ""));
    }
    Err(Error::Summary(text.to_string()))
}

/// Blank-line separated paragraphs; math blocks are kept whole.
fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    for block in split_math(&dedent(text)) {
        match block {
            Block::Text(text) => {
                out.extend(
                    RE_PARAGRAPH_BREAK
                        .split(&text)
                        .map(trim_blank_lines)
                        .filter(|p| !p.is_empty()),
                );
            }
            Block::Math(math) => out.push(math),
        }
    }
    out
}

fn trim_blank_lines(text: &str) -> String {
    let lines: Vec<&str> = text
        .split('\n')
        .skip_while(|l| l.trim().is_empty())
        .collect();
    lines.join("\n").trim_end().to_string()
}

/// Drop the `.. [N]` marker; the text itself is one flowing paragraph.
fn reference(paragraph: &str) -> String {
    collapse_lines(&RE_REFERENCE_MARKER.replace(paragraph, ""))
}

struct Chunk<'a> {
    header: String,
    depth: i32,
    body: Vec<&'a str>,
}

/// Entries of a structured section: every non-indented line starts one.
fn entries(body: &str) -> Result<Vec<EntryInput>> {
    let body = dedent(body);
    let mut chunks: Vec<Chunk> = Vec::new();

    for line in body.split('\n') {
        if let Some(chunk) = chunks.last_mut().filter(|c| c.depth > 0) {
            // A signature or type set continues on indented lines only.
            if line.trim().is_empty() || !line.starts_with([' ', '\t']) {
                return Err(Error::Entry(chunk.header.clone()));
            }
            chunk.header.push(' ');
            chunk.header.push_str(line.trim());
            chunk.depth += bracket_depth(line);
            continue;
        }
        if !line.trim().is_empty() && !line.starts_with([' ', '\t']) {
            chunks.push(Chunk {
                header: line.trim_end().to_string(),
                depth: bracket_depth(line),
                body: Vec::new(),
            });
        } else if let Some(chunk) = chunks.last_mut() {
            chunk.body.push(line);
        } else if !line.trim().is_empty() {
            return Err(Error::Entry(line.to_string()));
        }
    }

    if let Some(open) = chunks.last().filter(|c| c.depth > 0) {
        return Err(Error::Entry(open.header.clone()));
    }
    chunks.iter().map(entry).collect()
}

fn bracket_depth(line: &str) -> i32 {
    line.chars()
        .map(|c| match c {
            '(' | '{' => 1,
            ')' | '}' => -1,
            _ => 0,
        })
        .sum()
}

fn entry(chunk: &Chunk) -> Result<EntryInput> {
    let caps = RE_ENTRY.captures(&chunk.header).ok_or_else(|| {
        let mut text = chunk.header.clone();
        for line in &chunk.body {
            text.push('\n');
            text.push_str(line);
        }
        Error::Entry(text.trim_end().to_string())
    })?;

    let mut raw = RawEntry::new();
    raw.insert("name".to_string(), Value::String(caps["name"].trim().to_string()));
    if let Some(signature) = caps.name("signature") {
        raw.insert(
            "signature".to_string(),
            Value::String(normalize_signature(signature.as_str())),
        );
    }
    let types = caps.name("types").map_or_else(Vec::new, |t| parse_types(t.as_str()));
    if !types.is_empty() {
        raw.insert("types".to_string(), strings(types));
    }
    let descriptions = parse_descriptions(&chunk.body.join("\n"));
    if !descriptions.is_empty() {
        raw.insert("descriptions".to_string(), strings(descriptions));
    }
    Ok(EntryInput::Raw(raw))
}

/// `{T1, T2}` is a set of types, anything else a single one.
fn parse_types(text: &str) -> Vec<String> {
    let text = text.trim();
    match text.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
        Some(inner) => inner
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        None if text.is_empty() => Vec::new(),
        None => vec![text.to_string()],
    }
}

/// Description clauses end with a period at the end of a line. Math blocks
/// are clauses of their own and stay verbatim.
fn parse_descriptions(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    for block in split_math(&dedent(body)) {
        match block {
            Block::Text(text) => {
                let clauses: Vec<&str> = RE_CLAUSE_BREAK.split(text.trim()).collect();
                let last = clauses.len() - 1;
                for (i, clause) in clauses.into_iter().enumerate() {
                    let mut clause = collapse_lines(clause);
                    if clause.is_empty() {
                        continue;
                    }
                    if i != last {
                        clause.push('.');
                    }
                    out.push(clause);
                }
            }
            Block::Math(math) => out.push(math),
        }
    }
    out
}

fn strings(items: Vec<String>) -> Value {
    Value::Array(items.into_iter().map(Value::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parsed(text: &str, contains_delimiters: bool) -> Value {
        serde_json::to_value(parse(text, contains_delimiters).unwrap()).unwrap()
    }

    #[test]
    fn summary_and_parameters() {
        let text = "summary\n\nParameters\n----------\na : str\n    description1.\n    description2.\n";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "summary",
                "parameters": [
                    {"name": "a", "types": ["str"], "descriptions": ["description1.", "description2."]}
                ]
            })
        );
    }

    #[test]
    fn summary_only() {
        assert_eq!(parsed("Summary.", false), json!({"summary": "Summary."}));
        assert_eq!(parsed("\nSummary.\n\n", false), json!({"summary": "Summary."}));
    }

    #[test]
    fn summary_must_be_followed_by_blank_line() {
        assert!(matches!(
            parse("line one\nline two", false),
            Err(Error::Summary(_))
        ));
    }

    #[test]
    fn double_leading_blank_line_gives_empty_summary() {
        assert_eq!(
            parsed("\n\nsummary", false),
            json!({"summary": "", "extended": ["summary"]})
        );
    }

    #[test]
    fn delimiters_stripped() {
        let text = "    \"\"\"Summary.\n\n    Extended\n    text.\n    \"\"\"";
        assert_eq!(
            parsed(text, true),
            json!({"summary": "Summary.", "extended": ["Extended\ntext."]})
        );
        assert_eq!(parsed("'''Summary.'''", true), json!({"summary": "Summary."}));
    }

    #[test]
    fn raw_delimiters_refused() {
        assert!(matches!(parse("r\"\"\"Summary.\"\"\"", true), Err(Error::RawString)));
        assert!(matches!(parse("R'''Summary.'''", true), Err(Error::RawString)));
    }

    #[test]
    fn delimiter_detection() {
        assert!(has_delimiters("\"\"\"Summary.\"\"\""));
        assert!(has_delimiters("  r'''x\n'''  "));
        assert!(!has_delimiters("Summary."));
        assert!(!has_delimiters("\"\"\""));
    }

    #[test]
    fn header_underline_length_checked() {
        match parse("summary\n\nHeader\n--\n", false) {
            Err(Error::HeaderUnderline {
                header,
                expected,
                found,
            }) => {
                assert_eq!(header, "Header");
                assert_eq!(expected, 6);
                assert_eq!(found, 2);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn extended_paragraphs_and_math() {
        let text = "Summary.\n\nFirst paragraph\ncontinues.\n\n\nSecond.\n\n.. math::\n\n    e^{i\\pi} + 1 = 0\n\nAfter.";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "Summary.",
                "extended": [
                    "First paragraph\ncontinues.",
                    "Second.",
                    ".. math::\n\n    e^{i\\pi} + 1 = 0",
                    "After."
                ]
            })
        );
    }

    #[test]
    fn extended_before_headers() {
        let text = "Summary.\n\nMore.\n\nNotes\n-----\nA note.\n\nAnother.";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "Summary.",
                "extended": ["More."],
                "notes": ["A note.", "Another."]
            })
        );
    }

    #[test]
    fn entry_forms() {
        let text = "S.\n\nMethods\n-------\nrun(a,b)\n    Run it.\nstop()\nf(x: int) : bool\n\nParameters\n----------\nx : {int, float}\n    The x.\n*args\n";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "S.",
                "methods": [
                    {"name": "run", "signature": "(a, b)", "descriptions": ["Run it."]},
                    {"name": "stop", "signature": "()"},
                    {"name": "f", "signature": "(x: int)", "types": ["bool"]}
                ],
                "parameters": [
                    {"name": "x", "types": ["int", "float"], "descriptions": ["The x."]},
                    {"name": "*args"}
                ]
            })
        );
    }

    #[test]
    fn wrapped_entry_headers_are_joined() {
        let text = "S.\n\nMethods\n-------\nrun(first, second,\n    third)\n    Runs.\n\nParameters\n----------\nmode : {'a', 'b',\n        'c'}\n";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "S.",
                "methods": [
                    {"name": "run", "signature": "(first, second, third)", "descriptions": ["Runs."]}
                ],
                "parameters": [
                    {"name": "mode", "types": ["'a'", "'b'", "'c'"]}
                ]
            })
        );
    }

    #[test]
    fn description_clauses_and_math() {
        let text = "S.\n\nParameters\n----------\nx : float\n    Some float.\n    .. math::\n\n        \\frac{1}{2}\n\n    Spread over\n    two lines.\n";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "S.",
                "parameters": [{
                    "name": "x",
                    "types": ["float"],
                    "descriptions": [
                        "Some float.",
                        ".. math::\n\n    \\frac{1}{2}",
                        "Spread over two lines."
                    ]
                }]
            })
        );
    }

    #[test]
    fn references_lose_their_markers() {
        let text = "S.\n\nReferences\n----------\n.. [1] First reference that was\n       wrapped.\n\n.. [2] Second.";
        assert_eq!(
            parsed(text, false),
            json!({
                "summary": "S.",
                "references": ["First reference that was wrapped.", "Second."]
            })
        );
    }

    #[test]
    fn malformed_entry_rejected() {
        let text = "S.\n\nParameters\n----------\n: int\n    what\n";
        match parse(text, false) {
            Err(Error::Entry(chunk)) => assert_eq!(chunk, ": int\n    what"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn unbalanced_entry_header_rejected() {
        let text = "S.\n\nParameters\n----------\nx : int (default 0\n    The x.\ny : str\n    The y.\n";
        match parse(text, false) {
            Err(Error::Entry(chunk)) => assert_eq!(chunk, "x : int (default 0 The x."),
            other => panic!("unexpected result: {:?}", other),
        }

        let text = "S.\n\nParameters\n----------\nx : {int,\n";
        assert!(matches!(parse(text, false), Err(Error::Entry(_))));
    }

    #[test]
    fn unknown_headers_become_paragraph_sections() {
        let text = "S.\n\nWarnings\n--------\nCareful.";
        assert_eq!(
            parsed(text, false),
            json!({"summary": "S.", "warnings": ["Careful."]})
        );
    }
}
