//! Human-readable rendering of reflected values.
//!
//! Renderings are for display only and carry no round-trip guarantee.
//! Records print as `{a b}`, sequences and arrays as `[1 2 3]`, mappings as
//! `map[k:v ...]` with keys sorted, references as `&<value>` and unset
//! indirections as `<nil>`.

use crate::reflect::{short_type_name, Kind, Reflect};
use std::fmt::Write;

/// Nesting beyond this depth renders as `...`.
const MAX_RENDER_DEPTH: usize = 32;

/// Renders a value for display.
///
/// ```
/// use deepdiff::render::render;
/// use std::collections::BTreeMap;
///
/// assert_eq!(render(&vec![1, 2, 3]), "[1 2 3]");
///
/// let mut map = BTreeMap::new();
/// map.insert("foo", 1);
/// map.insert("bar", 2);
/// assert_eq!(render(&map), "map[bar:2 foo:1]");
/// ```
pub fn render(value: &dyn Reflect) -> String {
    let mut out = String::new();
    write_value(&mut out, value, 0);
    out
}

fn write_value(out: &mut String, value: &dyn Reflect, depth: usize) {
    if depth > MAX_RENDER_DEPTH {
        out.push_str("...");
        return;
    }

    match value.reflect() {
        Kind::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        Kind::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Kind::Uint(u) => {
            let _ = write!(out, "{}", u);
        }
        Kind::Float(f) => {
            let _ = write!(out, "{}", f);
        }
        Kind::Str(s) => out.push_str(&s),
        Kind::Record(fields) => {
            out.push('{');
            write_items(out, fields.iter().map(|field| field.value), depth);
            out.push('}');
        }
        Kind::Map(None) => out.push_str("map[]"),
        Kind::Map(Some(view)) => {
            let mut entries = view.entries;
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            out.push_str("map[");
            for (i, (key, value)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                out.push_str(key);
                out.push(':');
                write_value(out, *value, depth + 1);
            }
            out.push(']');
        }
        Kind::Seq(None) => out.push_str("[]"),
        Kind::Seq(Some(view)) => {
            out.push('[');
            write_items(out, view.items.into_iter(), depth);
            out.push(']');
        }
        Kind::Array(items) => {
            out.push('[');
            write_items(out, items.into_iter(), depth);
            out.push(']');
        }
        Kind::Ref(Some(target)) => {
            out.push('&');
            write_value(out, target, depth + 1);
        }
        Kind::Dyn(Some(target)) => write_value(out, target, depth + 1),
        Kind::Ref(None) | Kind::Dyn(None) => out.push_str("<nil>"),
        Kind::Opaque(Some(text)) => out.push_str(&text),
        Kind::Opaque(None) => out.push_str(&short_type_name(value.type_name())),
    }
}

fn write_items<'v>(out: &mut String, items: impl Iterator<Item = &'v dyn Reflect>, depth: usize) {
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write_value(out, item, depth + 1);
    }
}
