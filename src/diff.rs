//! Core deep comparison algorithm.
//!
//! This module walks two values in lock-step and reports every leaf-level or
//! structural mismatch it finds, qualified by the path where it occurred.
//! Composite values are decomposed through [`Reflect`]; paths are built from
//! field names, `#<index>` segments and rendered map keys.
//!
//! The walk is bounded by [`DiffConfig::max_depth`] and
//! [`DiffConfig::max_diff`]. Neither limit is an error: a truncated branch
//! simply stops producing differences.
//!
//! # Examples
//!
//! ```
//! use deepdiff::compare_as_list;
//!
//! let (diffs, found) = compare_as_list(&vec![1, 2, 3], &vec![1, 2, 333]);
//! assert!(found);
//! assert_eq!(diffs, vec!["#2: 3 != 333"]);
//! ```

use crate::error::{Anomaly, DeepDiffError};
use crate::reflect::{Field, Kind, MapView, Reflect, SeqView};
use crate::sink::{join_path, DiffResult, DiffSink, ListSink, MapSink, Operand};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Largest precision that still distinguishes adjacent `f64` values.
const MAX_FLOAT_PRECISION: usize = 17;

/// Largest precision `format!` accepts.
const FORMAT_PRECISION_LIMIT: usize = u16::MAX as usize;

/// Configuration for the comparison.
///
/// Immutable for the duration of a comparison. Override individual fields
/// with struct update syntax:
///
/// ```
/// use deepdiff::DiffConfig;
///
/// let config = DiffConfig {
///     max_depth: 4,
///     ..Default::default()
/// };
/// assert_eq!(config.max_diff, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffConfig {
    /// Decimal places floats are rounded to before comparing
    pub float_precision: usize,
    /// Maximum number of differences to collect
    pub max_diff: usize,
    /// Maximum levels to recurse into
    pub max_depth: usize,
    /// Emit a warning event for each anomaly met during the walk
    pub log_errors: bool,
    /// Compare record fields marked unexported
    pub compare_unexported_fields: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            float_precision: 10,
            max_diff: 10,
            max_depth: 10,
            log_errors: false,
            compare_unexported_fields: false,
        }
    }
}

impl DiffConfig {
    /// Rejects configurations that cannot produce a useful comparison.
    pub fn validate(&self) -> Result<(), DeepDiffError> {
        if self.max_diff == 0 {
            return Err(DeepDiffError::config("max_diff must be at least 1"));
        }
        if self.float_precision > MAX_FLOAT_PRECISION {
            return Err(DeepDiffError::config(format!(
                "float_precision must be at most {}",
                MAX_FLOAT_PRECISION
            )));
        }
        Ok(())
    }
}

/// Compares `a` and `b` with the default configuration and returns the
/// differences as formatted lines.
///
/// Returns an empty list and `false` when the values are equal.
pub fn compare_as_list(a: &dyn Reflect, b: &dyn Reflect) -> (Vec<String>, bool) {
    compare_as_list_with(a, b, &DiffConfig::default())
}

/// Like [`compare_as_list`] with an explicit configuration.
pub fn compare_as_list_with(
    a: &dyn Reflect,
    b: &dyn Reflect,
    config: &DiffConfig,
) -> (Vec<String>, bool) {
    let diffs = compare_into(a, b, config, ListSink::new()).into_inner();
    let found = !diffs.is_empty();
    (diffs, found)
}

/// Compares `a` and `b` with the default configuration and returns the
/// differences keyed by dotted path.
///
/// ```
/// use deepdiff::{compare_as_map, Operand};
///
/// let (diffs, found) = compare_as_map(&"foo", &"bar");
/// assert!(found);
/// assert_eq!(diffs["result"].new_value, Operand::Text("bar".to_string()));
/// ```
pub fn compare_as_map(a: &dyn Reflect, b: &dyn Reflect) -> (BTreeMap<String, DiffResult>, bool) {
    compare_as_map_with(a, b, &DiffConfig::default())
}

/// Like [`compare_as_map`] with an explicit configuration.
pub fn compare_as_map_with(
    a: &dyn Reflect,
    b: &dyn Reflect,
    config: &DiffConfig,
) -> (BTreeMap<String, DiffResult>, bool) {
    let diffs = compare_into(a, b, config, MapSink::new()).into_inner();
    let found = !diffs.is_empty();
    (diffs, found)
}

/// Runs a comparison into any sink and hands the sink back.
pub fn compare_into<S: DiffSink>(
    a: &dyn Reflect,
    b: &dyn Reflect,
    config: &DiffConfig,
    sink: S,
) -> S {
    let mut comparison = Comparison {
        config,
        path: Vec::new(),
        sink,
    };
    comparison.equals(Some(a), Some(b), 0, true);
    comparison.sink
}

/// Per-call state: the path stack, the active configuration and the sink.
struct Comparison<'c, S> {
    config: &'c DiffConfig,
    path: Vec<String>,
    sink: S,
}

impl<S: DiffSink> Comparison<'_, S> {
    /// Compares one pair of values at `level`.
    ///
    /// `None` is an absent value (an unset reference or wrapper). `exported`
    /// is false once the walk has passed through an unexported field; custom
    /// equality is not invoked below such a field.
    fn equals(
        &mut self,
        a: Option<&dyn Reflect>,
        b: Option<&dyn Reflect>,
        level: usize,
        exported: bool,
    ) {
        let (a, b) = match (a, b) {
            (None, None) => return,
            (Some(a), None) => {
                self.save(Operand::Type(a.type_name()), Operand::Nil);
                return;
            }
            (None, Some(b)) => {
                self.save(Operand::Nil, Operand::Type(b.type_name()));
                return;
            }
            (Some(a), Some(b)) => (a, b),
        };

        if level > self.config.max_depth {
            self.log(Anomaly::MaxRecursion);
            return;
        }

        if a.type_name() != b.type_name() {
            self.save(Operand::Type(a.type_name()), Operand::Type(b.type_name()));
            self.log(Anomaly::TypeMismatch);
            return;
        }

        if exported {
            if let Some(equal) = a.custom_eq(b) {
                if !equal {
                    self.save(Operand::of(a), Operand::of(b));
                }
                return;
            }
        }

        // Checked before unwrapping: the capability usually sits on the
        // indirection itself.
        if let (Some(a_desc), Some(b_desc)) = (a.error_description(), b.error_description()) {
            if a_desc != b_desc {
                self.save(Operand::Text(a_desc), Operand::Text(b_desc));
            }
            return;
        }

        let a_kind = a.reflect();
        let b_kind = b.reflect();

        if a_kind.is_indirect() || b_kind.is_indirect() {
            let a_target = indirect_target(a_kind, a);
            let b_target = indirect_target(b_kind, b);
            self.equals(a_target, b_target, level + 1, exported);
            return;
        }

        match (a_kind, b_kind) {
            (Kind::Record(a_fields), Kind::Record(b_fields)) => {
                if same_layout(&a_fields, &b_fields) {
                    self.compare_fields(&a_fields, &b_fields, level, exported);
                } else {
                    // Variants of one enum reflected with their own fields.
                    self.save(Operand::of(a), Operand::of(b));
                    self.log(Anomaly::TypeMismatch);
                }
            }
            (Kind::Map(a_map), Kind::Map(b_map)) => {
                self.compare_maps(a, b, a_map, b_map, level, exported);
            }
            (Kind::Array(a_items), Kind::Array(b_items)) => {
                self.compare_arrays(&a_items, &b_items, level, exported);
            }
            (Kind::Seq(a_seq), Kind::Seq(b_seq)) => {
                self.compare_seqs(a, b, a_seq, b_seq, level, exported);
            }
            (Kind::Float(x), Kind::Float(y)) => {
                // Avoid 0.04147685731961082 != 0.041476857319611
                let precision = self.config.float_precision.min(FORMAT_PRECISION_LIMIT);
                if format!("{:.*}", precision, x) != format!("{:.*}", precision, y) {
                    self.save(Operand::Float(x), Operand::Float(y));
                }
            }
            (Kind::Bool(x), Kind::Bool(y)) => {
                if x != y {
                    self.save(Operand::Bool(x), Operand::Bool(y));
                }
            }
            (Kind::Int(x), Kind::Int(y)) => {
                if x != y {
                    self.save(Operand::Int(x), Operand::Int(y));
                }
            }
            (Kind::Uint(x), Kind::Uint(y)) => {
                if x != y {
                    self.save(Operand::Uint(x), Operand::Uint(y));
                }
            }
            (Kind::Str(x), Kind::Str(y)) => {
                if x != y {
                    self.save(Operand::Text(x.into_owned()), Operand::Text(y.into_owned()));
                }
            }
            (Kind::Opaque(_), Kind::Opaque(_)) => self.log(Anomaly::NotHandled),
            // One type reporting two kinds, e.g. a hand-written enum adapter.
            (a_kind, b_kind) => {
                tracing::trace!(a = a_kind.label(), b = b_kind.label(), "kind mismatch");
                self.save(Operand::of(a), Operand::of(b));
                self.log(Anomaly::TypeMismatch);
            }
        }
    }

    fn compare_fields(
        &mut self,
        a_fields: &[Field<'_>],
        b_fields: &[Field<'_>],
        level: usize,
        exported: bool,
    ) {
        for (a_field, b_field) in a_fields.iter().zip(b_fields) {
            if !a_field.exported && !self.config.compare_unexported_fields {
                continue;
            }
            if a_field.directive.skip {
                continue;
            }

            self.path.push(a_field.display_name().to_string());
            self.equals(
                Some(a_field.value),
                Some(b_field.value),
                level + 1,
                exported && a_field.exported,
            );
            self.path.pop();

            if self.limit_reached() {
                break;
            }
        }
    }

    fn compare_maps(
        &mut self,
        a: &dyn Reflect,
        b: &dyn Reflect,
        a_map: Option<MapView<'_>>,
        b_map: Option<MapView<'_>>,
        level: usize,
        exported: bool,
    ) {
        let (a_map, b_map) = match (a_map, b_map) {
            (None, None) => return,
            (None, Some(_)) => {
                self.save(Operand::Empty, Operand::of(b));
                return;
            }
            (Some(_), None) => {
                self.save(Operand::of(a), Operand::Empty);
                return;
            }
            (Some(a_map), Some(b_map)) => (a_map, b_map),
        };

        if a_map.identity == b_map.identity {
            return;
        }

        let b_index: HashMap<&str, &dyn Reflect> = b_map
            .entries
            .iter()
            .map(|(key, value)| (key.as_str(), *value))
            .collect();

        for (key, a_value) in &a_map.entries {
            self.path.push(key.clone());
            match b_index.get(key.as_str()) {
                Some(b_value) => self.equals(Some(*a_value), Some(*b_value), level + 1, exported),
                None => self.save(Operand::of(*a_value), Operand::Empty),
            }
            self.path.pop();

            if self.limit_reached() {
                return;
            }
        }

        let a_keys: HashSet<&str> = a_map.entries.iter().map(|(key, _)| key.as_str()).collect();
        for (key, b_value) in &b_map.entries {
            if a_keys.contains(key.as_str()) {
                continue;
            }

            self.path.push(key.clone());
            self.save(Operand::Empty, Operand::of(*b_value));
            self.path.pop();

            if self.limit_reached() {
                return;
            }
        }
    }

    fn compare_arrays(
        &mut self,
        a_items: &[&dyn Reflect],
        b_items: &[&dyn Reflect],
        level: usize,
        exported: bool,
    ) {
        for (i, (a_item, b_item)) in a_items.iter().zip(b_items).enumerate() {
            self.path.push(format!("#{}", i));
            self.equals(Some(*a_item), Some(*b_item), level + 1, exported);
            self.path.pop();

            if self.limit_reached() {
                break;
            }
        }
    }

    fn compare_seqs(
        &mut self,
        a: &dyn Reflect,
        b: &dyn Reflect,
        a_seq: Option<SeqView<'_>>,
        b_seq: Option<SeqView<'_>>,
        level: usize,
        exported: bool,
    ) {
        let (a_seq, b_seq) = match (a_seq, b_seq) {
            (None, None) => return,
            (None, Some(_)) => {
                self.save(Operand::Empty, Operand::of(b));
                return;
            }
            (Some(_), None) => {
                self.save(Operand::of(a), Operand::Empty);
                return;
            }
            (Some(a_seq), Some(b_seq)) => (a_seq, b_seq),
        };

        if a_seq.identity == b_seq.identity {
            return;
        }

        let len = a_seq.items.len().max(b_seq.items.len());
        for i in 0..len {
            self.path.push(format!("#{}", i));
            match (a_seq.items.get(i), b_seq.items.get(i)) {
                (Some(a_item), Some(b_item)) => {
                    self.equals(Some(*a_item), Some(*b_item), level + 1, exported)
                }
                (Some(a_item), None) => self.save(Operand::of(*a_item), Operand::Empty),
                (None, Some(b_item)) => self.save(Operand::Empty, Operand::of(*b_item)),
                (None, None) => {}
            }
            self.path.pop();

            if self.limit_reached() {
                break;
            }
        }
    }

    fn save(&mut self, old: Operand, new: Operand) {
        if self.limit_reached() {
            return;
        }
        self.sink.save(&self.path, old, new);
    }

    fn limit_reached(&self) -> bool {
        self.sink.count() >= self.config.max_diff
    }

    fn log(&self, anomaly: Anomaly) {
        if self.config.log_errors {
            tracing::warn!(path = %join_path(&self.path), "{}", anomaly);
        }
    }
}

/// Records share a layout when they list the same field names in order.
fn same_layout(a_fields: &[Field<'_>], b_fields: &[Field<'_>]) -> bool {
    a_fields.len() == b_fields.len()
        && a_fields
            .iter()
            .zip(b_fields)
            .all(|(a_field, b_field)| a_field.name == b_field.name)
}

/// The value an indirection points at; non-indirect values stand for
/// themselves.
fn indirect_target<'v>(kind: Kind<'v>, value: &'v dyn Reflect) -> Option<&'v dyn Reflect> {
    match kind {
        Kind::Ref(target) | Kind::Dyn(target) => target,
        _ => Some(value),
    }
}
