//! File parsing for JSON, YAML and TOML formats.
//!
//! This module parses structured data into [`Node`] trees so that documents
//! can be compared with the deep comparison engine. The format is detected
//! from the file extension; unknown extensions fall back to trying JSON, then
//! YAML, then TOML.
//!
//! # Examples
//!
//! ```no_run
//! use deepdiff::parser::parse_file;
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let node = parse_file(Path::new("data.json"))?;
//! let node = parse_file(Path::new("config.yaml"))?;
//! # Ok(())
//! # }
//! ```

use crate::error::ParseError;
use crate::tree::Node;
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Source format of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatHint {
    Json,
    Yaml,
    Toml,
    /// Try JSON, then YAML, then TOML
    Auto,
}

impl FormatHint {
    /// Detects the format from a path's extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase());

        match extension.as_deref() {
            Some("json") => FormatHint::Json,
            Some("yaml") | Some("yml") => FormatHint::Yaml,
            Some("toml") => FormatHint::Toml,
            _ => FormatHint::Auto,
        }
    }
}

/// Parses a file into a Node.
///
/// # Errors
///
/// - `ParseError::FileNotFound` if the file does not exist
/// - `ParseError::ReadError` if the file cannot be read
/// - `ParseError::JsonError`, `YamlError` or `TomlError` for invalid content
/// - `ParseError::UnknownFormat` if no format accepts the content
pub fn parse_file(path: &Path) -> Result<Node, ParseError> {
    let name = path.to_string_lossy().to_string();

    if !path.exists() {
        return Err(ParseError::file_not_found(name));
    }

    let content = fs::read_to_string(path).map_err(|e| ParseError::read_error(name.clone(), e))?;

    parse_content(&content, FormatHint::from_path(path), &name)
}

/// Reads standard input and parses it, detecting the format from content.
pub fn parse_stdin() -> Result<Node, ParseError> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .map_err(|e| ParseError::read_error("<stdin>", e))?;

    parse_content(&content, FormatHint::Auto, "<stdin>")
}

/// Parses content in the given format. `name` is only used in errors.
pub fn parse_content(content: &str, hint: FormatHint, name: &str) -> Result<Node, ParseError> {
    match hint {
        FormatHint::Json => parse_json(content).map_err(|e| ParseError::json_error(name, e)),
        FormatHint::Yaml => parse_yaml(content).map_err(|e| ParseError::yaml_error(name, e)),
        FormatHint::Toml => parse_toml(content).map_err(|e| ParseError::toml_error(name, e)),
        FormatHint::Auto => parse_json(content)
            .ok()
            .or_else(|| parse_yaml(content).ok())
            .or_else(|| parse_toml(content).ok())
            .ok_or_else(|| ParseError::unknown_format(name)),
    }
}

/// Parses a JSON string into a Node.
///
/// ```
/// use deepdiff::parser::parse_json;
///
/// let node = parse_json(r#"{"name": "Alice", "age": 30}"#).unwrap();
/// ```
pub fn parse_json(content: &str) -> Result<Node, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    Ok(json_to_node(value))
}

/// Parses a YAML string into a Node.
///
/// ```
/// use deepdiff::parser::parse_yaml;
///
/// let node = parse_yaml("name: Alice\nage: 30").unwrap();
/// ```
pub fn parse_yaml(content: &str) -> Result<Node, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(content)?;
    Ok(yaml_to_node(value))
}

/// Parses a TOML document into a Node.
///
/// ```
/// use deepdiff::parser::parse_toml;
///
/// let node = parse_toml("name = \"Alice\"\nage = 30").unwrap();
/// ```
pub fn parse_toml(content: &str) -> Result<Node, toml::de::Error> {
    let table: toml::Table = toml::from_str(content)?;
    Ok(toml_to_node(toml::Value::Table(table)))
}

fn json_to_node(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Null => Node::Null,
        serde_json::Value::Bool(b) => Node::Bool(b),
        // Numbers without an f64 form do not occur without arbitrary_precision
        serde_json::Value::Number(n) => Node::Number(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Node::String(s),
        serde_json::Value::Array(arr) => Node::Array(arr.into_iter().map(json_to_node).collect()),
        serde_json::Value::Object(obj) => {
            let map: BTreeMap<String, Node> =
                obj.into_iter().map(|(k, v)| (k, json_to_node(v))).collect();
            Node::Object(map)
        }
    }
}

/// YAML anchors and tags are evaluated during parsing; tags are dropped.
/// Non-string keys are converted to strings.
fn yaml_to_node(value: serde_yaml::Value) -> Node {
    match value {
        serde_yaml::Value::Null => Node::Null,
        serde_yaml::Value::Bool(b) => Node::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(f) = n.as_f64() {
                Node::Number(f)
            } else if let Some(i) = n.as_i64() {
                Node::Number(i as f64)
            } else if let Some(u) = n.as_u64() {
                Node::Number(u as f64)
            } else {
                Node::Number(0.0)
            }
        }
        serde_yaml::Value::String(s) => Node::String(s),
        serde_yaml::Value::Sequence(seq) => {
            Node::Array(seq.into_iter().map(yaml_to_node).collect())
        }
        serde_yaml::Value::Mapping(map) => {
            let map: BTreeMap<String, Node> = map
                .into_iter()
                .map(|(k, v)| {
                    let key = match k {
                        serde_yaml::Value::String(s) => s,
                        serde_yaml::Value::Number(n) => n.to_string(),
                        serde_yaml::Value::Bool(b) => b.to_string(),
                        serde_yaml::Value::Null => "null".to_string(),
                        other => format!("{:?}", other),
                    };
                    (key, yaml_to_node(v))
                })
                .collect();
            Node::Object(map)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_node(tagged.value),
    }
}

/// Datetimes have no JSON counterpart and become their string form.
fn toml_to_node(value: toml::Value) -> Node {
    match value {
        toml::Value::String(s) => Node::String(s),
        toml::Value::Integer(i) => Node::Number(i as f64),
        toml::Value::Float(f) => Node::Number(f),
        toml::Value::Boolean(b) => Node::Bool(b),
        toml::Value::Datetime(dt) => Node::String(dt.to_string()),
        toml::Value::Array(arr) => Node::Array(arr.into_iter().map(toml_to_node).collect()),
        toml::Value::Table(table) => Node::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_node(v)))
                .collect(),
        ),
    }
}
