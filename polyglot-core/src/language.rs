//! Language registry - the fixed set of supported languages
//!
//! Ten languages, each with an identifier, a display name, and a file
//! extension. The conversion pipeline only needs the identifier to pick a
//! classifier/emitter pair; the rest of the metadata exists for front-ends
//! that populate selection controls or infer a language from a file name.

use std::fmt;

use serde::Serialize;

/// Unknown language tag passed to a lookup
#[derive(Debug, Clone, thiserror::Error)]
#[error("unsupported language: {0}")]
pub struct UnknownLanguageError(pub String);

/// A supported source/target language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    C,
    Cpp,
    CSharp,
    Go,
    Rust,
    Ruby,
}

impl Language {
    /// All supported languages, in registry order
    pub const ALL: [Language; 10] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
        Language::C,
        Language::Cpp,
        Language::CSharp,
        Language::Go,
        Language::Rust,
        Language::Ruby,
    ];

    /// Stable identifier used in the public API
    pub fn identifier(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Ruby => "ruby",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Python => "Python",
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
            Language::Java => "Java",
            Language::C => "C",
            Language::Cpp => "C++",
            Language::CSharp => "C#",
            Language::Go => "Go",
            Language::Rust => "Rust",
            Language::Ruby => "Ruby",
        }
    }

    /// Conventional file extension (without the dot)
    pub fn extension(&self) -> &'static str {
        match self {
            Language::Python => "py",
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "cs",
            Language::Go => "go",
            Language::Rust => "rs",
            Language::Ruby => "rb",
        }
    }

    /// Parse an identifier tag (e.g., "python", "cpp")
    pub fn parse(tag: &str) -> Result<Language, UnknownLanguageError> {
        let normalized = tag.trim().to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.identifier() == normalized)
            .ok_or_else(|| UnknownLanguageError(tag.to_string()))
    }

    /// Infer a language from a file extension (e.g., "py", "rs")
    pub fn from_extension(ext: &str) -> Option<Language> {
        let normalized = ext.trim_start_matches('.').to_ascii_lowercase();
        Language::ALL
            .iter()
            .copied()
            .find(|l| l.extension() == normalized)
    }

    pub fn info(&self) -> LanguageInfo {
        LanguageInfo {
            identifier: self.identifier(),
            display_name: self.display_name(),
            extension: self.extension(),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Display metadata for one registry entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub identifier: &'static str,
    pub display_name: &'static str,
    pub extension: &'static str,
}

/// The full registry, in fixed order
pub fn registry() -> Vec<LanguageInfo> {
    Language::ALL.iter().map(Language::info).collect()
}

/// Every supported (from, to) pair; from != to
pub fn supported_pairs() -> Vec<(Language, Language)> {
    let mut pairs = Vec::new();
    for from in Language::ALL {
        for to in Language::ALL {
            if from != to {
                pairs.push((from, to));
            }
        }
    }
    pairs
}

/// Whether a (from, to) pair is convertible
pub fn is_supported_pair(from: Language, to: Language) -> bool {
    from != to
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_ten_entries() {
        let entries = registry();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].identifier, "python");
    }

    #[test]
    fn parse_known_and_unknown_tags() {
        assert_eq!(Language::parse("cpp").unwrap(), Language::Cpp);
        assert_eq!(Language::parse(" Rust ").unwrap(), Language::Rust);
        assert!(Language::parse("cobol").is_err());
    }

    #[test]
    fn infer_from_extension() {
        assert_eq!(Language::from_extension("py"), Some(Language::Python));
        assert_eq!(Language::from_extension(".rs"), Some(Language::Rust));
        assert_eq!(Language::from_extension("txt"), None);
    }

    #[test]
    fn pairs_exclude_identity() {
        let pairs = supported_pairs();
        assert_eq!(pairs.len(), 90);
        assert!(pairs.iter().all(|(a, b)| a != b));
        assert!(is_supported_pair(Language::Python, Language::Go));
        assert!(!is_supported_pair(Language::Go, Language::Go));
    }
}
