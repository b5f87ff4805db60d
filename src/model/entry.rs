//! One structured item of a section: a parameter, attribute, method,
//! raised error, see-also target, ...

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Unvalidated entry data, keyed by `name`, `signature`, `types` and
/// `descriptions` (`descs` is accepted as an alias).
pub type RawEntry = Map<String, Value>;

/// A validated entry.
///
/// `signature` is either empty or parenthesized, with a single space after
/// each comma. An entry may carry both a signature and types; it is then
/// rendered as `name(signature) : types`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    signature: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    descriptions: Vec<String>,
}

/// Either an already validated [`Entry`] or raw key/value data that still
/// has to go through [`Entry::from_raw`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntryInput {
    #[serde(skip_deserializing)]
    Explicit(Entry),
    Raw(RawEntry),
}

/// A field given as one string or as a list of strings.
/// A lone empty string stands for an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringList(pub Vec<String>);

impl From<&str> for StringList {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            StringList(Vec::new())
        } else {
            StringList(vec![s.to_string()])
        }
    }
}

impl From<String> for StringList {
    fn from(s: String) -> Self {
        StringList::from(s.as_str())
    }
}

impl From<Vec<String>> for StringList {
    fn from(v: Vec<String>) -> Self {
        StringList(v)
    }
}

impl From<Vec<&str>> for StringList {
    fn from(v: Vec<&str>) -> Self {
        StringList(v.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for StringList {
    fn from(v: [&str; N]) -> Self {
        StringList(v.iter().map(|s| s.to_string()).collect())
    }
}

impl Entry {
    /// Entry with only a name. Fails if the name is empty or blank.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::Field {
                field: "name",
                expected: "a non-empty string",
                found: format!("{:?}", name),
            });
        }
        Ok(Entry {
            name,
            signature: String::new(),
            types: Vec::new(),
            descriptions: Vec::new(),
        })
    }

    pub fn with_signature(mut self, signature: &str) -> Self {
        self.signature = normalize_signature(signature);
        self
    }

    pub fn with_types(mut self, types: impl Into<StringList>) -> Self {
        self.types = types.into().0;
        self
    }

    pub fn with_descriptions(mut self, descriptions: impl Into<StringList>) -> Self {
        self.descriptions = descriptions.into().0;
        self
    }

    /// Validate raw key/value data.
    pub fn from_raw(raw: &RawEntry) -> Result<Self> {
        if let Some(key) = raw
            .keys()
            .find(|k| !matches!(k.as_str(), "name" | "signature" | "types" | "descriptions" | "descs"))
        {
            return Err(Error::Field {
                field: "entry",
                expected: "made of name, signature, types and descriptions",
                found: format!("unexpected key `{}`", key),
            });
        }

        let name = match raw.get("name") {
            Some(Value::String(name)) => name.clone(),
            Some(other) => {
                return Err(Error::Field {
                    field: "name",
                    expected: "a non-empty string",
                    found: describe(other),
                })
            }
            None => {
                return Err(Error::Field {
                    field: "name",
                    expected: "a non-empty string",
                    found: "nothing".to_string(),
                })
            }
        };

        let signature = match raw.get("signature") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(Error::Field {
                    field: "signature",
                    expected: "a string",
                    found: describe(other),
                })
            }
        };

        let types = string_list(raw.get("types"), "types")?;
        let descriptions = match raw.get("descriptions") {
            Some(value) => string_list(Some(value), "descriptions")?,
            None => string_list(raw.get("descs"), "descriptions")?,
        };

        Ok(Entry::new(name)?
            .with_signature(&signature)
            .with_types(types)
            .with_descriptions(descriptions))
    }

    /// The same data as [`RawEntry`], leaving out empty fields.
    pub fn to_raw(&self) -> RawEntry {
        let mut raw = Map::new();
        raw.insert("name".to_string(), Value::String(self.name.clone()));
        if !self.signature.is_empty() {
            raw.insert("signature".to_string(), Value::String(self.signature.clone()));
        }
        if !self.types.is_empty() {
            raw.insert("types".to_string(), strings_value(&self.types));
        }
        if !self.descriptions.is_empty() {
            raw.insert("descriptions".to_string(), strings_value(&self.descriptions));
        }
        raw
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }
}

impl EntryInput {
    pub fn into_entry(self) -> Result<Entry> {
        match self {
            EntryInput::Explicit(entry) => Ok(entry),
            EntryInput::Raw(raw) => Entry::from_raw(&raw),
        }
    }
}

impl From<Entry> for EntryInput {
    fn from(entry: Entry) -> Self {
        EntryInput::Explicit(entry)
    }
}

/// Trim, wrap in parentheses if needed, and put one space after each comma.
pub fn normalize_signature(signature: &str) -> String {
    let trimmed = signature.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(trimmed);
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    format!("({})", parts.join(", "))
}

fn string_list(value: Option<&Value>, field: &'static str) -> Result<Vec<String>> {
    let invalid = |value: &Value| Error::Field {
        field,
        expected: "a string or a list of strings",
        found: describe(value),
    };
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(StringList::from(s.as_str()).0),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(invalid(other)),
            })
            .collect(),
        Some(other) => Err(invalid(other)),
    }
}

fn strings_value(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

fn describe(value: &Value) -> String {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    };
    format!("{} ({})", kind, value)
}
