//! Destinations for difference records.
//!
//! The engine calls [`DiffSink::save`] once per difference and never looks at
//! what the sink does with it. Two sinks are provided: [`ListSink`] formats
//! each record as `path: old != new`, [`MapSink`] keeps the raw operands
//! keyed by dotted path.

use crate::reflect::{short_type_name, Kind, Reflect};
use crate::render::render;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Marker for an unset reference or dynamic wrapper.
pub const NIL_MARKER: &str = "<nil pointer>";

/// Marker for a missing map entry, sequence element or absent collection.
pub const EMPTY_MARKER: &str = "[empty value]";

/// Map key used when the two top-level values differ directly.
pub const ROOT_KEY: &str = "result";

/// One side of a difference.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Text(String),
    /// Full type name; displayed without module paths.
    Type(&'static str),
    /// Rendering of a composite value.
    Value(String),
    Nil,
    Empty,
}

impl Operand {
    /// Captures a value, keeping scalars raw and rendering anything else.
    /// Dynamic wrappers are seen through.
    pub fn of(value: &dyn Reflect) -> Self {
        match value.reflect() {
            Kind::Bool(b) => Operand::Bool(b),
            Kind::Int(i) => Operand::Int(i),
            Kind::Uint(u) => Operand::Uint(u),
            Kind::Float(f) => Operand::Float(f),
            Kind::Str(s) => Operand::Text(s.into_owned()),
            Kind::Dyn(Some(inner)) => Operand::of(inner),
            _ => Operand::Value(render(value)),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Bool(b) => write!(f, "{}", b),
            Operand::Int(i) => write!(f, "{}", i),
            Operand::Uint(u) => write!(f, "{}", u),
            Operand::Float(x) => write!(f, "{}", x),
            Operand::Text(s) | Operand::Value(s) => f.write_str(s),
            Operand::Type(name) => f.write_str(&short_type_name(name)),
            Operand::Nil => f.write_str(NIL_MARKER),
            Operand::Empty => f.write_str(EMPTY_MARKER),
        }
    }
}

impl Serialize for Operand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Operand::Bool(b) => serializer.serialize_bool(*b),
            Operand::Int(i) => serializer.serialize_i64(*i),
            Operand::Uint(u) => serializer.serialize_u64(*u),
            Operand::Float(x) => serializer.serialize_f64(*x),
            other => serializer.collect_str(other),
        }
    }
}

/// A map-form difference.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffResult {
    pub old_value: Operand,
    pub new_value: Operand,
}

/// Receives difference records from the engine.
pub trait DiffSink {
    fn save(&mut self, path: &[String], old: Operand, new: Operand);

    /// Number of records saved so far, used to enforce the diff limit.
    fn count(&self) -> usize;
}

/// Joins path segments into the dotted form used in output.
pub fn join_path(path: &[String]) -> String {
    path.join(".")
}

/// Collects differences as `"<path>: <old> != <new>"` lines.
#[derive(Debug, Default)]
pub struct ListSink {
    diffs: Vec<String>,
}

impl ListSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> Vec<String> {
        self.diffs
    }
}

impl DiffSink for ListSink {
    fn save(&mut self, path: &[String], old: Operand, new: Operand) {
        let line = if path.is_empty() {
            format!("{} != {}", old, new)
        } else {
            format!("{}: {} != {}", join_path(path), old, new)
        };
        self.diffs.push(line);
    }

    fn count(&self) -> usize {
        self.diffs.len()
    }
}

/// Collects differences keyed by dotted path.
///
/// A later record at the same path overwrites the earlier one but still
/// counts toward the limit.
#[derive(Debug, Default)]
pub struct MapSink {
    diffs: BTreeMap<String, DiffResult>,
    saved: usize,
}

impl MapSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_inner(self) -> BTreeMap<String, DiffResult> {
        self.diffs
    }
}

impl DiffSink for MapSink {
    fn save(&mut self, path: &[String], old: Operand, new: Operand) {
        let key = if path.is_empty() {
            ROOT_KEY.to_string()
        } else {
            join_path(path)
        };
        self.diffs.insert(
            key,
            DiffResult {
                old_value: old,
                new_value: new,
            },
        );
        self.saved += 1;
    }

    fn count(&self) -> usize {
        self.saved
    }
}
