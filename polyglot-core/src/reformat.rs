//! Reformatter - purely textual whitespace normalization
//!
//! Runs after emission and never consults the node tree. Brace-delimited
//! output is split so every statement and brace sits on its own line, then
//! re-indented by tracking brace depth; indentation-block output keeps the
//! indentation the emitter produced and only has its blank lines
//! normalized. Fragile syntax (`::` scoping, `{}`-style format
//! placeholders, `${...}` interpolation spans) is swapped for sentinel
//! tokens before splitting and restored afterwards.
//!
//! Because the pass is textual, literal content that looks like unbalanced
//! braces or terminators can still mis-indent a line. That is an accepted
//! limitation of this tier, not something to fix with deeper parsing.

use regex::Regex;

use crate::profile::{BlockStyle, IndentStyle, LanguageProfile};

/// Options for the textual pass; indentation defaults mirror the common
/// four-space convention and are normally taken from the language profile
#[derive(Debug, Clone)]
pub struct ReformatConfig {
    pub indent: IndentStyle,
    /// Maximum consecutive blank lines kept in the output
    pub max_blank_lines: usize,
}

impl Default for ReformatConfig {
    fn default() -> Self {
        Self {
            indent: IndentStyle::spaces(4),
            max_blank_lines: 1,
        }
    }
}

/// Reformat emitted text using the target language's conventions
pub fn reformat(text: &str, profile: &LanguageProfile) -> String {
    let config = ReformatConfig {
        indent: profile.indent,
        ..Default::default()
    };
    Reformatter::new(config, profile.block_style).run(text)
}

/// Whether a reformatting pass would change the text
pub fn needs_reformat(text: &str, profile: &LanguageProfile) -> bool {
    reformat(text, profile) != text
}

struct Reformatter {
    config: ReformatConfig,
    block_style: BlockStyle,
}

// Private-use markers; source text never contains them
const SENTINEL_OPEN: char = '\u{e000}';
const SENTINEL_CLOSE: char = '\u{e001}';

impl Reformatter {
    fn new(config: ReformatConfig, block_style: BlockStyle) -> Reformatter {
        Reformatter {
            config,
            block_style,
        }
    }

    fn run(&self, text: &str) -> String {
        let (protected, saved) = protect(text);

        let normalized = match self.block_style {
            BlockStyle::Braces => {
                let split = self.split_statements(&protected);
                self.reindent(&split)
            }
            BlockStyle::Indent | BlockStyle::KeywordEnd => protected,
        };

        let collapsed = self.normalize_blank_lines(&normalized);
        restore(&collapsed, &saved)
    }

    /// Insert newlines after statement terminators and around braces.
    /// Terminators inside parentheses (a `for` header) stay put.
    fn split_statements(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut paren_depth = 0usize;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '(' => {
                    paren_depth += 1;
                    out.push(c);
                }
                ')' => {
                    paren_depth = paren_depth.saturating_sub(1);
                    out.push(c);
                }
                ';' if paren_depth == 0 => {
                    out.push(c);
                    if chars.peek() != Some(&'\n') {
                        out.push('\n');
                    }
                }
                '{' => {
                    out.push(c);
                    if chars.peek() != Some(&'\n') {
                        out.push('\n');
                    }
                }
                '}' => {
                    while out.ends_with(' ') || out.ends_with('\t') {
                        out.pop();
                    }
                    if !out.ends_with('\n') && !out.is_empty() {
                        out.push('\n');
                    }
                    out.push(c);
                    match chars.peek() {
                        // Keep `};` and `},` together with their closer
                        Some(&';') | Some(&',') | Some(&'\n') => {}
                        _ => out.push('\n'),
                    }
                }
                _ => out.push(c),
            }
        }
        out
    }

    /// Re-indent by brace depth; depth never goes negative
    fn reindent(&self, text: &str) -> String {
        let unit = self.config.indent.unit();
        let mut out = String::with_capacity(text.len());
        let mut level = 0usize;

        for line in text.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                out.push('\n');
                continue;
            }

            if is_closing_line(trimmed) {
                level = level.saturating_sub(1);
            }
            for _ in 0..level {
                out.push_str(&unit);
            }
            out.push_str(trimmed);
            out.push('\n');
            if opens_block(trimmed) {
                level += 1;
            }
        }
        out
    }

    /// Collapse runs of blank lines, strip leading blanks, end with exactly
    /// one newline
    fn normalize_blank_lines(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut blanks = 0usize;
        let mut seen_content = false;

        for line in text.lines() {
            if line.trim().is_empty() {
                blanks += 1;
                continue;
            }
            if seen_content {
                for _ in 0..blanks.min(self.config.max_blank_lines) {
                    out.push('\n');
                }
            }
            blanks = 0;
            seen_content = true;
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }
}

fn is_closing_line(trimmed: &str) -> bool {
    trimmed.starts_with('}') || matches!(trimmed, "]" | "];" | "],")
}

fn opens_block(trimmed: &str) -> bool {
    trimmed.ends_with('{')
        || trimmed.ends_with('[')
        || trimmed.ends_with("=>")
        || (trimmed.ends_with(':') && starts_with_header_keyword(trimmed))
}

fn starts_with_header_keyword(trimmed: &str) -> bool {
    let first = trimmed.split_whitespace().next().unwrap_or("");
    let first = first.trim_end_matches(':');
    matches!(
        first,
        "if" | "elif" | "else" | "for" | "while" | "try" | "except" | "finally" | "with" | "def"
            | "class" | "case" | "switch" | "match"
    )
}

/// Replace fragile sequences with numbered sentinels so the splitting pass
/// cannot corrupt them
fn protect(text: &str) -> (String, Vec<String>) {
    // `::` scoping, `{}` / `{:spec}` format placeholders, `${...}`
    // interpolation spans (a bare `${` only when the span never closes)
    let pattern =
        Regex::new(r"::|\{:[^{}\n]*\}|\{\}|\$\{[^{}\n]*\}|\$\{").expect("invalid protect pattern");
    let mut saved = Vec::new();
    let replaced = pattern
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let token = format!("{}{}{}", SENTINEL_OPEN, saved.len(), SENTINEL_CLOSE);
            saved.push(caps[0].to_string());
            token
        })
        .into_owned();
    (replaced, saved)
}

fn restore(text: &str, saved: &[String]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(SENTINEL_OPEN) {
        out.push_str(&rest[..start]);
        let after = &rest[start + SENTINEL_OPEN.len_utf8()..];
        match after.find(SENTINEL_CLOSE) {
            Some(end) => {
                let index: usize = after[..end].parse().unwrap_or(usize::MAX);
                match saved.get(index) {
                    Some(original) => out.push_str(original),
                    None => out.push_str(&rest[start..start + SENTINEL_OPEN.len_utf8()]),
                }
                rest = &after[end + SENTINEL_CLOSE.len_utf8()..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::Language;

    fn reformat_for(lang: Language, text: &str) -> String {
        let profile = LanguageProfile::for_language(lang);
        reformat(text, &profile)
    }

    #[test]
    fn packed_statements_split_onto_lines() {
        let out = reformat_for(Language::JavaScript, "let a = 1; let b = 2;");
        assert_eq!(out, "let a = 1;\nlet b = 2;\n");
    }

    #[test]
    fn braces_get_their_own_lines_and_indent() {
        let out = reformat_for(Language::JavaScript, "if (x) { y(); }");
        assert_eq!(out, "if (x) {\n  y();\n}\n");
    }

    #[test]
    fn depth_never_negative_and_balanced_input_ends_at_zero() {
        let out = reformat_for(Language::Java, "}\n}\nclass A {\nint x = 1;\n}");
        for line in out.lines() {
            assert!(!line.starts_with("    }"), "negative-looking indent: {line}");
        }
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn for_header_semicolons_not_split() {
        let out = reformat_for(Language::C, "for (i = 0; i < n; i++) {\nbody();\n}");
        assert!(out.contains("for (i = 0; i < n; i++) {"), "got: {out}");
    }

    #[test]
    fn scope_marker_protected_from_splitting() {
        let out = reformat_for(Language::Rust, "let x = std::cmp::max(a, b);");
        assert!(out.contains("std::cmp::max"), "got: {out}");
    }

    #[test]
    fn format_placeholder_braces_not_isolated() {
        let out = reformat_for(Language::Rust, "println!(\"{} and {:?}\", a, b);");
        assert!(out.contains("\"{} and {:?}\""), "got: {out}");
    }

    #[test]
    fn template_interpolation_protected() {
        let out = reformat_for(Language::JavaScript, "let s = `a${b}c`;");
        assert!(out.contains("`a${b}c`"), "got: {out}");
    }

    #[test]
    fn multiple_interpolations_survive_on_one_line() {
        let out = reformat_for(Language::JavaScript, "let s = `${a}-${b}`;");
        assert!(out.contains("`${a}-${b}`"), "got: {out}");
    }

    #[test]
    fn blank_runs_collapse_to_one() {
        let out = reformat_for(Language::Python, "x = 1\n\n\n\n\ny = 2\n");
        assert_eq!(out, "x = 1\n\ny = 2\n");
    }

    #[test]
    fn leading_blanks_stripped_and_single_trailing_newline() {
        let out = reformat_for(Language::Python, "\n\nx = 1\n\n\n");
        assert_eq!(out, "x = 1\n");
    }

    #[test]
    fn indent_target_keeps_emitted_indentation() {
        let out = reformat_for(Language::Python, "def f():\n    return 1\n");
        assert_eq!(out, "def f():\n    return 1\n");
    }

    #[test]
    fn close_open_split_keeps_depth_consistent() {
        // Braces not already isolated get their own lines, so `} else {`
        // becomes a closer plus a reopener at the same depth
        let out = reformat_for(Language::JavaScript, "if (a) {\nx();\n} else {\ny();\n}");
        assert_eq!(out, "if (a) {\n  x();\n}\nelse {\n  y();\n}\n");
    }

    #[test]
    fn needs_reformat_detects_packed_input() {
        let profile = LanguageProfile::for_language(Language::JavaScript);
        assert!(needs_reformat("let a = 1; let b = 2;", &profile));
        assert!(!needs_reformat("let a = 1;\n", &profile));
    }
}
