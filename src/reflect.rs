//! Value introspection for the comparison engine.
//!
//! Rust has no runtime reflection, so every comparable value describes itself
//! through the [`Reflect`] trait: a concrete type identity, one structural
//! [`Kind`] drawn from a closed set, and two optional capabilities (custom
//! equality and error description). The engine pattern-matches over `Kind`
//! and never inspects values any other way.
//!
//! # Examples
//!
//! ```
//! use deepdiff::reflect::{Field, Kind, Reflect};
//!
//! struct User {
//!     name: String,
//!     age: u32,
//!     token: String,
//! }
//!
//! impl Reflect for User {
//!     fn reflect(&self) -> Kind<'_> {
//!         Kind::Record(vec![
//!             Field::new("Name", &self.name),
//!             Field::new("Age", &self.age).tag("years"),
//!             Field::new("token", &self.token).unexported(),
//!         ])
//!     }
//! }
//! ```

use crate::render::render;
use std::any::Any;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A value the comparison engine can walk.
///
/// Only [`reflect`](Reflect::reflect) is required. The remaining methods are
/// capabilities with conservative defaults.
pub trait Reflect {
    /// Concrete type identity. Two values are only ever equal when their
    /// type names match exactly.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Structural view of this value.
    fn reflect(&self) -> Kind<'_>;

    /// Custom equality override.
    ///
    /// Returns `None` when the type has no override or `other` is not of the
    /// same concrete type; the engine then falls back to structural
    /// comparison. See [`eq_by_partial_eq`].
    fn custom_eq(&self, _other: &dyn Reflect) -> Option<bool> {
        None
    }

    /// Error capability: the description of a present error.
    fn error_description(&self) -> Option<String> {
        None
    }

    /// Downcasting hook for `'static` types that implement `custom_eq`.
    fn as_any(&self) -> Option<&dyn Any> {
        None
    }

    /// The kind an absent (`None`) instance of this type reports when wrapped
    /// in an `Option`. Collections override this so that `Option<Vec<T>>`
    /// behaves as a nullable sequence rather than a reference.
    fn absent_kind() -> Option<Kind<'static>>
    where
        Self: Sized,
    {
        None
    }
}

/// Structural category of a value.
pub enum Kind<'a> {
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(Cow<'a, str>),
    /// Named fields in declaration order.
    Record(Vec<Field<'a>>),
    /// `None` is an absent mapping, distinct from an empty one.
    Map(Option<MapView<'a>>),
    /// `None` is an absent sequence, distinct from an empty one.
    Seq(Option<SeqView<'a>>),
    /// Fixed-length array; the length is part of the type.
    Array(Vec<&'a dyn Reflect>),
    /// Optional single-slot indirection.
    Ref(Option<&'a dyn Reflect>),
    /// Container whose concrete type is only known once unwrapped.
    Dyn(Option<&'a dyn Reflect>),
    /// Anything the engine does not compare, with optional display text.
    Opaque(Option<String>),
}

impl Kind<'_> {
    /// Short label used in log events.
    pub fn label(&self) -> &'static str {
        match self {
            Kind::Bool(_) => "bool",
            Kind::Int(_) => "int",
            Kind::Uint(_) => "uint",
            Kind::Float(_) => "float",
            Kind::Str(_) => "string",
            Kind::Record(_) => "record",
            Kind::Map(_) => "map",
            Kind::Seq(_) => "sequence",
            Kind::Array(_) => "array",
            Kind::Ref(_) => "reference",
            Kind::Dyn(_) => "dynamic",
            Kind::Opaque(_) => "opaque",
        }
    }

    pub fn is_indirect(&self) -> bool {
        matches!(self, Kind::Ref(_) | Kind::Dyn(_))
    }
}

/// One field of a record.
pub struct Field<'a> {
    pub name: Cow<'a, str>,
    pub value: &'a dyn Reflect,
    /// Unexported fields only participate when the configuration asks for it.
    pub exported: bool,
    pub directive: FieldDirective,
}

impl<'a> Field<'a> {
    pub fn new(name: impl Into<Cow<'a, str>>, value: &'a dyn Reflect) -> Self {
        Self {
            name: name.into(),
            value,
            exported: true,
            directive: FieldDirective::default(),
        }
    }

    pub fn unexported(mut self) -> Self {
        self.exported = false;
        self
    }

    /// Attaches a directive in tag syntax, see [`FieldDirective::parse`].
    pub fn tag(mut self, tag: &str) -> Self {
        self.directive = FieldDirective::parse(tag);
        self
    }

    /// The name used in difference paths.
    pub fn display_name(&self) -> &str {
        self.directive.rename.as_deref().unwrap_or(&self.name)
    }
}

/// Per-field comparison directive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirective {
    /// Label used in place of the field name.
    pub rename: Option<String>,
    /// Exclude the field from comparison entirely.
    pub skip: bool,
}

impl FieldDirective {
    /// Parses tag syntax.
    ///
    /// - `""` carries no directive
    /// - `"nickname"` relabels the field
    /// - `"nickname,skip"` (anything after a comma) skips the field
    ///
    /// ```
    /// use deepdiff::reflect::FieldDirective;
    ///
    /// assert_eq!(FieldDirective::parse("nick").rename.as_deref(), Some("nick"));
    /// assert!(FieldDirective::parse("nick,-").skip);
    /// ```
    pub fn parse(tag: &str) -> Self {
        if tag.is_empty() {
            return Self::default();
        }
        match tag.split_once(',') {
            Some((name, _)) => Self {
                rename: Some(name.to_string()),
                skip: true,
            },
            None => Self {
                rename: Some(tag.to_string()),
                skip: false,
            },
        }
    }
}

/// A present mapping.
pub struct MapView<'a> {
    /// Address of the backing storage; equal identities alias.
    pub identity: usize,
    /// Entries keyed by the textual rendering of each key.
    pub entries: Vec<(String, &'a dyn Reflect)>,
}

impl<'a> MapView<'a> {
    /// Collects entries sorted by rendered key, so hash maps walk in a
    /// stable order.
    pub fn from_entries<K, V, I>(identity: usize, entries: I) -> Self
    where
        K: Reflect + 'a,
        V: Reflect + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        let mut entries: Vec<(String, &'a dyn Reflect)> = entries
            .into_iter()
            .map(|(key, value)| (render(key), value as &dyn Reflect))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Self { identity, entries }
    }
}

/// A present sequence.
pub struct SeqView<'a> {
    /// Data pointer and length; equal identities alias.
    pub identity: (usize, usize),
    pub items: Vec<&'a dyn Reflect>,
}

impl<'a> SeqView<'a> {
    pub fn from_slice<T: Reflect>(items: &'a [T]) -> Self {
        Self {
            identity: (items.as_ptr() as usize, items.len()),
            items: items.iter().map(|item| item as &dyn Reflect).collect(),
        }
    }
}

/// Builds a [`Reflect::custom_eq`] implementation from `PartialEq`.
///
/// ```
/// use deepdiff::reflect::{eq_by_partial_eq, Kind, Reflect};
/// use std::any::Any;
///
/// #[derive(PartialEq)]
/// struct Millis(u64);
///
/// impl Reflect for Millis {
///     fn reflect(&self) -> Kind<'_> {
///         Kind::Opaque(Some(format!("{}ms", self.0)))
///     }
///     fn custom_eq(&self, other: &dyn Reflect) -> Option<bool> {
///         eq_by_partial_eq(self, other)
///     }
///     fn as_any(&self) -> Option<&dyn Any> {
///         Some(self)
///     }
/// }
///
/// assert_eq!(Millis(1).custom_eq(&Millis(1)), Some(true));
/// ```
pub fn eq_by_partial_eq<T: PartialEq + 'static>(this: &T, other: &dyn Reflect) -> Option<bool> {
    other
        .as_any()?
        .downcast_ref::<T>()
        .map(|other| this == other)
}

/// Strips module paths from a full type name for display.
///
/// ```
/// use deepdiff::reflect::short_type_name;
///
/// assert_eq!(
///     short_type_name("alloc::vec::Vec<alloc::string::String>"),
///     "Vec<String>"
/// );
/// ```
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }
    out
}

macro_rules! reflect_scalar {
    ($variant:ident as $repr:ty: $($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Kind<'_> {
                    Kind::$variant(*self as $repr)
                }
            }
        )*
    };
}

reflect_scalar!(Int as i64: i8, i16, i32, i64, isize);
reflect_scalar!(Uint as u64: u8, u16, u32, u64, usize);
reflect_scalar!(Float as f64: f32, f64);

impl Reflect for bool {
    fn reflect(&self) -> Kind<'_> {
        Kind::Bool(*self)
    }
}

impl Reflect for char {
    fn reflect(&self) -> Kind<'_> {
        Kind::Str(Cow::Owned(self.to_string()))
    }
}

impl Reflect for str {
    fn reflect(&self) -> Kind<'_> {
        Kind::Str(Cow::Borrowed(self))
    }
}

impl Reflect for String {
    fn reflect(&self) -> Kind<'_> {
        Kind::Str(Cow::Borrowed(self.as_str()))
    }
}

impl Reflect for () {
    fn reflect(&self) -> Kind<'_> {
        Kind::Record(Vec::new())
    }
}

// Shared references are transparent: `&T` compares exactly like `T`.
impl<T: Reflect + ?Sized> Reflect for &T {
    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn reflect(&self) -> Kind<'_> {
        (**self).reflect()
    }

    fn custom_eq(&self, other: &dyn Reflect) -> Option<bool> {
        (**self).custom_eq(other)
    }

    fn error_description(&self) -> Option<String> {
        (**self).error_description()
    }

    fn as_any(&self) -> Option<&dyn Any> {
        (**self).as_any()
    }
}

macro_rules! reflect_pointer {
    ($($p:ident),*) => {
        $(
            impl<T: Reflect> Reflect for $p<T> {
                fn reflect(&self) -> Kind<'_> {
                    Kind::Ref(Some(&**self))
                }

                fn error_description(&self) -> Option<String> {
                    (**self).error_description()
                }
            }

            // A boxed trait object is a dynamic wrapper around its concrete value.
            impl Reflect for $p<dyn Reflect> {
                fn reflect(&self) -> Kind<'_> {
                    Kind::Dyn(Some(&**self))
                }

                fn error_description(&self) -> Option<String> {
                    (**self).error_description()
                }
            }
        )*
    };
}

reflect_pointer!(Box, Rc, Arc);

impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Kind<'_> {
        match (self, T::absent_kind()) {
            (Some(value), Some(_)) => value.reflect(),
            (Some(value), None) => Kind::Ref(Some(value)),
            (None, Some(absent)) => absent,
            (None, None) => Kind::Ref(None),
        }
    }

    fn error_description(&self) -> Option<String> {
        self.as_ref().and_then(|value| value.error_description())
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Kind<'_> {
        Kind::Seq(Some(SeqView::from_slice(self)))
    }

    fn absent_kind() -> Option<Kind<'static>> {
        Some(Kind::Seq(None))
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Kind<'_> {
        Kind::Seq(Some(SeqView::from_slice(self)))
    }
}

impl<T: Reflect> Reflect for VecDeque<T> {
    fn reflect(&self) -> Kind<'_> {
        Kind::Seq(Some(SeqView {
            identity: (self as *const Self as usize, self.len()),
            items: self.iter().map(|item| item as &dyn Reflect).collect(),
        }))
    }

    fn absent_kind() -> Option<Kind<'static>> {
        Some(Kind::Seq(None))
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Kind<'_> {
        Kind::Array(self.iter().map(|item| item as &dyn Reflect).collect())
    }
}

impl<K: Reflect, V: Reflect, S> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> Kind<'_> {
        Kind::Map(Some(MapView::from_entries(
            self as *const Self as usize,
            self.iter(),
        )))
    }

    fn absent_kind() -> Option<Kind<'static>> {
        Some(Kind::Map(None))
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Kind<'_> {
        Kind::Map(Some(MapView::from_entries(
            self as *const Self as usize,
            self.iter(),
        )))
    }

    fn absent_kind() -> Option<Kind<'static>> {
        Some(Kind::Map(None))
    }
}

// Time values compare through `PartialEq` when reached on an exported path.
// Below an unexported field the engine falls back to their text form, which
// spells out every component.
macro_rules! reflect_with_partial_eq {
    ($($t:ty => $components:path),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Kind<'_> {
                    Kind::Str(Cow::Owned($components(self)))
                }

                fn custom_eq(&self, other: &dyn Reflect) -> Option<bool> {
                    eq_by_partial_eq(self, other)
                }

                fn as_any(&self) -> Option<&dyn Any> {
                    Some(self)
                }
            }
        )*
    };
}

fn duration_components(duration: &Duration) -> String {
    format!("{:?}", duration)
}

/// Offset from `UNIX_EPOCH`, e.g. `UNIX_EPOCH + 1.5s`.
fn epoch_offset(time: &SystemTime) -> String {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => format!("UNIX_EPOCH + {:?}", after),
        Err(before) => format!("UNIX_EPOCH - {:?}", before.duration()),
    }
}

reflect_with_partial_eq!(Duration => duration_components, SystemTime => epoch_offset);

macro_rules! reflect_error_object {
    ($($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Kind<'_> {
                    Kind::Opaque(Some(self.to_string()))
                }

                fn error_description(&self) -> Option<String> {
                    Some(self.to_string())
                }
            }
        )*
    };
}

reflect_error_object!(
    Box<dyn std::error::Error>,
    Box<dyn std::error::Error + Send>,
    Box<dyn std::error::Error + Send + Sync>,
    Arc<dyn std::error::Error + Send + Sync>
);

impl<R> Reflect for fn() -> R {
    fn reflect(&self) -> Kind<'_> {
        Kind::Opaque(None)
    }
}

impl<A, R> Reflect for fn(A) -> R {
    fn reflect(&self) -> Kind<'_> {
        Kind::Opaque(None)
    }
}
