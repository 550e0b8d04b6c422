//! Language profiles - per-language conversion configuration
//!
//! A [`LanguageProfile`] is an immutable capability record: the classifier
//! regex tables, comment syntax, block style, indentation convention and
//! statement terminator for one language. Profiles are built fresh per
//! conversion via [`LanguageProfile::for_language`]; nothing here is shared
//! or mutated between calls.
//!
//! The patterns are deliberately heuristic. They classify a single trimmed
//! line, never a multi-line construct, and a line no pattern matches simply
//! falls through to a verbatim expression.

use regex::Regex;

use crate::language::Language;

/// How a language delimits blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    /// `{ ... }`
    Braces,
    /// Colon header plus indentation (Python)
    Indent,
    /// Keyword header closed by `end` (Ruby)
    KeywordEnd,
}

/// Indentation convention for emitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    pub width: usize,
    pub use_tabs: bool,
}

impl IndentStyle {
    pub const fn spaces(width: usize) -> Self {
        Self {
            width,
            use_tabs: false,
        }
    }

    pub const fn tabs() -> Self {
        Self {
            width: 1,
            use_tabs: true,
        }
    }

    /// One level of indentation
    pub fn unit(&self) -> String {
        if self.use_tabs {
            "\t".to_string()
        } else {
            " ".repeat(self.width)
        }
    }
}

/// Comment markers for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentSyntax {
    /// Prefixes that make a trimmed line a full-line comment
    pub line_markers: &'static [&'static str],
    /// Marker that starts an inline comment outside string literals
    pub inline_marker: &'static str,
}

const HASH_COMMENTS: CommentSyntax = CommentSyntax {
    line_markers: &["#"],
    inline_marker: "#",
};

const SLASH_COMMENTS: CommentSyntax = CommentSyntax {
    line_markers: &["//", "/*", "*/", "*"],
    inline_marker: "//",
};

/// Per-language capability record driving the whole pipeline
#[derive(Debug)]
pub struct LanguageProfile {
    pub language: Language,
    /// Function-definition patterns, tried in order; named groups:
    /// `name`, `params`, `ret`
    pub function: Vec<Regex>,
    /// Class/type-definition patterns; named groups: `name`, `parent`
    pub class: Vec<Regex>,
    /// Assignment patterns; named groups: `name`, `type`, `value`
    pub variable: Vec<Regex>,
    /// Control-flow keyword pattern; named group: `kw`
    pub control: Regex,
    pub import: Regex,
    pub comment: CommentSyntax,
    pub block_style: BlockStyle,
    pub indent: IndentStyle,
    /// Statement terminator appended by the emitter, if the language has one
    pub terminator: Option<&'static str>,
    /// Keywords that veto a function-pattern match (e.g. `return foo(x)`)
    pub control_keywords: &'static [&'static str],
}

impl LanguageProfile {
    pub fn for_language(language: Language) -> LanguageProfile {
        match language {
            Language::Python => python(),
            Language::JavaScript => javascript(),
            Language::TypeScript => typescript(),
            Language::Java => java(),
            Language::C => c(),
            Language::Cpp => cpp(),
            Language::CSharp => csharp(),
            Language::Go => go(),
            Language::Rust => rust(),
            Language::Ruby => ruby(),
        }
    }

    /// Whether a trimmed line is a full-line comment in this language
    pub fn is_comment_line(&self, trimmed: &str) -> bool {
        self.comment.line_markers.iter().any(|m| {
            if *m == "*" {
                // Block-comment continuation; a bare `*` prefix would also
                // match pointer statements like `*ptr = 5;`
                trimmed == "*" || trimmed.starts_with("* ")
            } else {
                trimmed.starts_with(m)
            }
        })
    }
}

fn rx(pattern: &str) -> Regex {
    // Patterns are compile-time literals; a failure here is a programming
    // error in this module, not an input condition.
    Regex::new(pattern).expect("invalid classifier pattern")
}

const C_FAMILY_CONTROL: &[&str] = &[
    "if", "else", "for", "while", "do", "switch", "case", "default", "return", "break", "continue",
    "throw", "try", "catch", "finally", "goto", "new", "delete",
];

fn python() -> LanguageProfile {
    LanguageProfile {
        language: Language::Python,
        function: vec![rx(
            r"^(?:async\s+)?def\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?:->\s*(?P<ret>[^:]+?)\s*)?:",
        )],
        class: vec![rx(r"^class\s+(?P<name>\w+)(?:\s*\(\s*(?P<parent>[^)]*)\))?\s*:")],
        variable: vec![rx(
            r"^(?P<name>\w+)\s*(?::\s*(?P<type>[^=]+?)\s*)?=(?P<value>[^=].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|elif|else|for|while|try|except|finally|with|return|break|continue|pass|raise|yield)\b",
        ),
        import: rx(r"^(?:import|from)\s+"),
        comment: HASH_COMMENTS,
        block_style: BlockStyle::Indent,
        indent: IndentStyle::spaces(4),
        terminator: None,
        control_keywords: &[
            "if", "elif", "else", "for", "while", "try", "except", "finally", "with", "return",
            "raise", "yield", "not", "and", "or",
        ],
    }
}

fn javascript() -> LanguageProfile {
    LanguageProfile {
        language: Language::JavaScript,
        function: vec![
            rx(r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>\w*)\s*\((?P<params>[^)]*)\)"),
            rx(r"^(?:export\s+)?(?:const|let|var)\s+(?P<name>\w+)\s*=\s*(?:async\s+)?\((?P<params>[^)]*)\)\s*=>"),
        ],
        class: vec![rx(
            r"^(?:export\s+)?(?:default\s+)?class\s+(?P<name>\w+)(?:\s+extends\s+(?P<parent>[\w.]+))?",
        )],
        variable: vec![rx(
            r"^(?:const|let|var)\s+(?P<name>\w+)\s*=(?P<value>[^=>].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|while|do|switch|case|default|return|break|continue|throw|try|catch|finally)\b",
        ),
        import: rx(r"^(?:import\s|export\s+\{|export\s+\*|module\.exports|.*=\s*require\s*\()"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(2),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn typescript() -> LanguageProfile {
    LanguageProfile {
        language: Language::TypeScript,
        function: vec![
            rx(r"^(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>\w*)\s*\((?P<params>[^)]*)\)\s*(?::\s*(?P<ret>[\w<>\[\]. |,]+))?"),
            rx(r"^(?:export\s+)?(?:const|let|var)\s+(?P<name>\w+)\s*=\s*(?:async\s+)?\((?P<params>[^)]*)\)(?:\s*:\s*(?P<ret>[\w<>\[\]. |,]+))?\s*=>"),
        ],
        class: vec![rx(
            r"^(?:export\s+)?(?:default\s+)?(?:abstract\s+)?(?:class|interface|enum)\s+(?P<name>\w+)(?:\s+extends\s+(?P<parent>[\w.<>]+))?",
        )],
        variable: vec![rx(
            r"^(?:const|let|var)\s+(?P<name>\w+)\s*(?::\s*(?P<type>[^=]+?)\s*)?=(?P<value>[^=>].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|while|do|switch|case|default|return|break|continue|throw|try|catch|finally)\b",
        ),
        import: rx(r"^(?:import\s|export\s+\{|export\s+\*|export\s+type\s)"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(2),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn java() -> LanguageProfile {
    LanguageProfile {
        language: Language::Java,
        function: vec![rx(
            r"^(?:(?:public|private|protected|static|final|synchronized|abstract|native)\s+)+(?P<ret>[\w<>\[\],. ]+?)\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        )],
        class: vec![rx(
            r"^(?:(?:public|private|protected|final|abstract|static)\s+)*(?:class|interface|enum|record)\s+(?P<name>\w+)(?:\s+extends\s+(?P<parent>[\w.<>]+))?",
        )],
        variable: vec![rx(
            r"^(?:(?:public|private|protected|static|final)\s+)*(?P<type>[\w<>\[\],.]+)\s+(?P<name>\w+)\s*=(?P<value>[^=].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|while|do|switch|case|default|return|break|continue|throw|try|catch|finally)\b",
        ),
        import: rx(r"^(?:import|package)\s+"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(4),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn c() -> LanguageProfile {
    LanguageProfile {
        language: Language::C,
        function: vec![rx(
            r"^(?:(?:static|inline|extern|const|unsigned|signed|struct)\s+)*(?P<ret>\w+(?:\s*\*+)?)\s+\*?(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*\{?\s*$",
        )],
        class: vec![rx(
            r"^(?:typedef\s+)?(?:struct|union|enum)\s+(?P<name>\w+)?",
        )],
        variable: vec![rx(
            r"^(?:(?:static|const|unsigned|signed|register|volatile)\s+)*(?P<type>\w+(?:\s*\*+)?)\s+(?P<name>\w+)(?:\[[^\]]*\])?\s*=(?P<value>[^=].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|while|do|switch|case|default|return|break|continue|goto)\b",
        ),
        import: rx(r"^#\s*(?:include|define|ifdef|ifndef|if|else|elif|endif|pragma|undef)\b"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(4),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn cpp() -> LanguageProfile {
    LanguageProfile {
        language: Language::Cpp,
        function: vec![
            rx(r"^(?:(?:static|inline|virtual|constexpr|extern|const|unsigned|signed)\s+)*(?P<ret>[\w:<>]+(?:\s*[*&]+)?)\s+(?P<name>[\w:~]+)\s*\((?P<params>[^)]*)\)\s*(?:const\s*)?(?:override\s*)?\{?\s*$",
        )],
        class: vec![rx(
            r"^(?:template\s*<[^>]*>\s*)?(?:class|struct)\s+(?P<name>\w+)(?:\s*(?:final\s*)?:\s*(?:public|private|protected)\s+(?P<parent>[\w:<>]+))?",
        )],
        variable: vec![rx(
            r"^(?:(?:static|const|constexpr|auto|unsigned|signed)\s+)*(?P<type>[\w:<>]+(?:\s*[*&]+)?)\s+(?P<name>\w+)\s*=(?P<value>[^=].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|while|do|switch|case|default|return|break|continue|throw|try|catch|goto)\b",
        ),
        import: rx(r"^(?:#\s*(?:include|define|ifdef|ifndef|if|else|elif|endif|pragma)\b|using\s+)"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(4),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn csharp() -> LanguageProfile {
    LanguageProfile {
        language: Language::CSharp,
        function: vec![rx(
            r"^(?:(?:public|private|protected|internal|static|virtual|override|sealed|async|abstract)\s+)+(?P<ret>[\w<>\[\],. ?]+?)\s+(?P<name>\w+)\s*\((?P<params>[^)]*)\)",
        )],
        class: vec![rx(
            r"^(?:(?:public|private|protected|internal|sealed|static|abstract|partial)\s+)*(?:class|interface|struct|record|enum)\s+(?P<name>\w+)(?:\s*:\s*(?P<parent>[\w<>,. ]+))?",
        )],
        variable: vec![rx(
            r"^(?:(?:public|private|protected|internal|static|readonly|const)\s+)*(?P<type>[\w<>\[\],.?]+)\s+(?P<name>\w+)\s*=(?P<value>[^=].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|else|for|foreach|while|do|switch|case|default|return|break|continue|throw|try|catch|finally)\b",
        ),
        import: rx(r"^(?:using|namespace)\s+"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(4),
        terminator: Some(";"),
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn go() -> LanguageProfile {
    LanguageProfile {
        language: Language::Go,
        function: vec![rx(
            r"^func\s+(?:\([^)]*\)\s+)?(?P<name>\w+)\s*\((?P<params>[^)]*)\)\s*(?P<ret>[^{]*?)\s*\{?\s*$",
        )],
        class: vec![rx(r"^type\s+(?P<name>\w+)\s+(?:struct|interface)\b")],
        variable: vec![
            rx(r"^(?P<name>\w+)\s*:=\s*(?P<value>.+)$"),
            rx(r"^var\s+(?P<name>\w+)(?:\s+(?P<type>[\w\[\]*.]+))?\s*=(?P<value>[^=].*)$"),
        ],
        control: rx(
            r"^(?P<kw>if|else|for|switch|case|default|select|return|break|continue|defer|go|fallthrough)\b",
        ),
        import: rx(r"^(?:import|package)\b"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::tabs(),
        terminator: None,
        control_keywords: C_FAMILY_CONTROL,
    }
}

fn rust() -> LanguageProfile {
    LanguageProfile {
        language: Language::Rust,
        function: vec![rx(
            r"^(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:unsafe\s+)?(?:extern\s+\S+\s+)?fn\s+(?P<name>\w+)\s*(?:<[^>]*>)?\s*\((?P<params>[^)]*)\)\s*(?:->\s*(?P<ret>[^{]+?)\s*)?\{?\s*$",
        )],
        class: vec![
            rx(r"^(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|union)\s+(?P<name>\w+)"),
            rx(r"^impl(?:\s*<[^>]*>)?\s+(?P<name>[\w:<>, ]+)"),
        ],
        variable: vec![
            rx(r"^let\s+(?:mut\s+)?(?P<name>\w+)\s*(?::\s*(?P<type>[^=]+?)\s*)?=(?P<value>[^=].*)$"),
            rx(r"^(?:pub\s+)?(?:const|static)\s+(?P<name>\w+)\s*:\s*(?P<type>[^=]+?)\s*=(?P<value>[^=].*)$"),
        ],
        control: rx(
            r"^(?P<kw>if|else|for|while|loop|match|return|break|continue)\b",
        ),
        import: rx(r"^(?:pub\s+)?(?:use|mod|extern\s+crate)\b"),
        comment: SLASH_COMMENTS,
        block_style: BlockStyle::Braces,
        indent: IndentStyle::spaces(4),
        terminator: Some(";"),
        control_keywords: &[
            "if", "else", "for", "while", "loop", "match", "return", "break", "continue",
        ],
    }
}

fn ruby() -> LanguageProfile {
    LanguageProfile {
        language: Language::Ruby,
        function: vec![rx(
            r"^def\s+(?:self\.)?(?P<name>[\w?!]+)(?:\s*\((?P<params>[^)]*)\))?",
        )],
        class: vec![rx(
            r"^(?:class|module)\s+(?P<name>\w+)(?:\s*<\s*(?P<parent>[\w:]+))?",
        )],
        variable: vec![rx(
            r"^(?P<name>[@$]{0,2}\w+)\s*=(?P<value>[^=~>].*)$",
        )],
        control: rx(
            r"^(?P<kw>if|elsif|else|unless|while|until|for|case|when|begin|rescue|ensure|end|return|break|next|redo|retry|yield)\b",
        ),
        import: rx(r"^(?:require|require_relative|include|extend|load)\b"),
        comment: HASH_COMMENTS,
        block_style: BlockStyle::KeywordEnd,
        indent: IndentStyle::spaces(2),
        terminator: None,
        control_keywords: &[
            "if", "elsif", "else", "unless", "while", "until", "for", "case", "when", "begin",
            "return", "yield", "not",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_language_has_a_profile() {
        for lang in Language::ALL {
            let profile = LanguageProfile::for_language(lang);
            assert_eq!(profile.language, lang);
            assert!(!profile.function.is_empty());
        }
    }

    #[test]
    fn python_function_pattern_captures_signature() {
        let profile = LanguageProfile::for_language(Language::Python);
        let caps = profile.function[0]
            .captures("def add(a, b) -> int:")
            .expect("should match");
        assert_eq!(&caps["name"], "add");
        assert_eq!(&caps["params"], "a, b");
        assert_eq!(caps.name("ret").map(|m| m.as_str()), Some("int"));
    }

    #[test]
    fn javascript_arrow_function_matches() {
        let profile = LanguageProfile::for_language(Language::JavaScript);
        let caps = profile.function[1]
            .captures("const add = (a, b) =>")
            .expect("should match");
        assert_eq!(&caps["name"], "add");
    }

    #[test]
    fn variable_pattern_rejects_equality() {
        let profile = LanguageProfile::for_language(Language::Python);
        assert!(!profile.variable[0].is_match("x == y"));
        assert!(profile.variable[0].is_match("x = y"));
    }

    #[test]
    fn go_short_declaration_matches() {
        let profile = LanguageProfile::for_language(Language::Go);
        let caps = profile.variable[0]
            .captures("count := 0")
            .expect("should match");
        assert_eq!(&caps["name"], "count");
        assert_eq!(&caps["value"], "0");
    }

    #[test]
    fn comment_line_detection() {
        let python = LanguageProfile::for_language(Language::Python);
        assert!(python.is_comment_line("# hello"));
        assert!(!python.is_comment_line("x = 1"));

        let rust = LanguageProfile::for_language(Language::Rust);
        assert!(rust.is_comment_line("// hello"));
        assert!(rust.is_comment_line("/* block */"));
    }
}
