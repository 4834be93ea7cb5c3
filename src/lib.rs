//! deepdiff - Deep structural comparison of values.
//!
//! This library walks two values of arbitrary shape in lock-step and reports
//! every point where they differ, qualified by the path to the difference
//! (`Alias.Nickname`, `#2`, `Mapping.foo`). Values describe themselves through
//! the [`Reflect`] trait; structured documents (JSON, YAML, TOML) are parsed
//! into [`Node`] trees that take part in the same comparison.
//!
//! # Example
//!
//! ```
//! use deepdiff::{compare_as_list, Field, Kind, Reflect};
//!
//! struct User {
//!     name: String,
//!     number: i32,
//! }
//!
//! impl Reflect for User {
//!     fn reflect(&self) -> Kind<'_> {
//!         Kind::Record(vec![
//!             Field::new("Name", &self.name),
//!             Field::new("Number", &self.number),
//!         ])
//!     }
//! }
//!
//! let a = User { name: "foo".into(), number: 2 };
//! let b = User { name: "bar".into(), number: 22 };
//!
//! let (diffs, found) = compare_as_list(&a, &b);
//! assert!(found);
//! assert_eq!(diffs, vec!["Name: foo != bar", "Number: 2 != 22"]);
//! ```
//!
//! Comparing documents:
//!
//! ```no_run
//! use deepdiff::{compare_as_list, format_list, parse_file, OutputFormat, OutputOptions};
//! use std::path::Path;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let old = parse_file(Path::new("old.json"))?;
//! let new = parse_file(Path::new("new.json"))?;
//!
//! let (diffs, _) = compare_as_list(&old, &new);
//! let output = format_list(&diffs, &OutputFormat::Terminal, &OutputOptions::default())?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod diff;
pub mod error;
pub mod output;
pub mod parser;
pub mod reflect;
pub mod render;
pub mod sink;
pub mod tree;

// Re-export commonly used types for convenience
pub use diff::{
    compare_as_list, compare_as_list_with, compare_as_map, compare_as_map_with, compare_into,
    DiffConfig,
};
pub use error::{Anomaly, DeepDiffError, OutputError, ParseError};
pub use output::{format_list, format_map, OutputFormat, OutputOptions};
pub use parser::{
    parse_content, parse_file, parse_json, parse_stdin, parse_toml, parse_yaml, FormatHint,
};
pub use reflect::{Field, FieldDirective, Kind, Reflect};
pub use sink::{DiffResult, DiffSink, ListSink, MapSink, Operand};
pub use tree::Node;
