//! Polyglot Core
//!
//! Best-effort, line-oriented source-to-source conversion between ten
//! programming languages. There is no real grammar here: each line is
//! classified with per-language pattern tables, collected into a shallow
//! tree, re-emitted in the target language's surface syntax, and run
//! through a textual reformatter. Lines that cannot be decomposed pass
//! through verbatim.
//!
//! # Example
//!
//! ```
//! use polyglot_core::{convert, Language};
//!
//! let result = convert(
//!     "function add(a, b) {\n  return a + b;\n}",
//!     Language::JavaScript,
//!     Language::Python,
//! )
//! .unwrap();
//!
//! assert!(result.code.contains("def add(a, b):"));
//! ```

pub mod builder;
pub mod classify;
pub mod comment;
pub mod convert;
pub mod diagnostics;
pub mod emit;
pub mod language;
pub mod profile;
pub mod reformat;
pub mod tree;

pub use convert::{Conversion, ConvertError, convert, convert_tagged};
pub use diagnostics::Warning;
pub use language::{Language, LanguageInfo, is_supported_pair, registry, supported_pairs};
