//! Soft diagnostics - non-fatal warnings accumulated during a conversion
//!
//! Warnings never abort a conversion; they ride alongside a successful
//! result. The accumulator is created fresh per conversion and threaded
//! through the stages explicitly, so a call's output is fully determined by
//! its inputs.

use std::fmt;

use regex::Regex;
use serde::Serialize;

use crate::language::Language;
use crate::profile::LanguageProfile;

/// Inputs beyond this many lines skip the validation sub-passes to keep a
/// single synchronous conversion bounded in cost
pub const VALIDATION_LINE_LIMIT: usize = 2000;

/// One non-fatal observation about the code under conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub message: String,
    /// Zero-based source line, when the observation is line-specific
    pub line: Option<usize>,
    /// Language whose conventions produced the observation
    pub language: String,
    pub timestamp: String,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "[{}] line {}: {}", self.language, line + 1, self.message),
            None => write!(f, "[{}] {}", self.language, self.message),
        }
    }
}

/// Per-conversion warning accumulator for one language's pass
#[derive(Debug)]
pub struct Diagnostics {
    language: Language,
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new(language: Language) -> Diagnostics {
        Diagnostics {
            language,
            warnings: Vec::new(),
        }
    }

    pub fn warn(&mut self, message: impl Into<String>, line: Option<usize>) {
        self.warnings.push(Warning {
            message: message.into(),
            line,
            language: self.language.identifier().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// Examine source text under one language's conventions and record
/// suspicious patterns. Purely informational; never fails.
pub fn validate(source: &str, profile: &LanguageProfile, diags: &mut Diagnostics) {
    let line_count = source.lines().count();
    if line_count > VALIDATION_LINE_LIMIT {
        diags.warn(
            format!(
                "input has {} lines (limit {}); validation skipped",
                line_count, VALIDATION_LINE_LIMIT
            ),
            None,
        );
        return;
    }

    check_bracket_balance(source, profile, diags);
    check_bare_declarations(source, profile, diags);
}

fn check_bracket_balance(source: &str, profile: &LanguageProfile, diags: &mut Diagnostics) {
    let mut round = 0i64;
    let mut square = 0i64;
    let mut curly = 0i64;

    for line in source.lines() {
        let trimmed = line.trim();
        if profile.is_comment_line(trimmed) {
            continue;
        }
        let mut in_single = false;
        let mut in_double = false;
        let mut prev_escape = false;
        for c in trimmed.chars() {
            if prev_escape {
                prev_escape = false;
                continue;
            }
            match c {
                '\\' if in_single || in_double => prev_escape = true,
                '\'' if !in_double => in_single = !in_single,
                '"' if !in_single => in_double = !in_double,
                '(' if !in_single && !in_double => round += 1,
                ')' if !in_single && !in_double => round -= 1,
                '[' if !in_single && !in_double => square += 1,
                ']' if !in_single && !in_double => square -= 1,
                '{' if !in_single && !in_double => curly += 1,
                '}' if !in_single && !in_double => curly -= 1,
                _ => {}
            }
        }
    }

    for (count, name) in [(round, "parentheses"), (square, "brackets"), (curly, "braces")] {
        if count != 0 {
            let side = if count > 0 { "opening" } else { "closing" };
            diags.warn(
                format!("mismatched {}: {} extra {}", name, count.abs(), side),
                None,
            );
        }
    }
}

fn check_bare_declarations(source: &str, profile: &LanguageProfile, diags: &mut Diagnostics) {
    // `let x;` and friends: legal in several languages, but usually a sign
    // the line lost its initializer somewhere
    let bare = Regex::new(
        r"^(?:let|var|const|int|long|short|float|double|bool|boolean|char|string|String)\s+\w+\s*;?\s*$",
    )
    .expect("invalid declaration pattern");

    for (line_no, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if profile.is_comment_line(trimmed) {
            continue;
        }
        if bare.is_match(trimmed) {
            diags.warn("declaration without an initializer", Some(line_no));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_validate(lang: Language, source: &str) -> Vec<Warning> {
        let profile = LanguageProfile::for_language(lang);
        let mut diags = Diagnostics::new(lang);
        validate(source, &profile, &mut diags);
        diags.into_warnings()
    }

    #[test]
    fn balanced_source_produces_no_warnings() {
        let warnings = run_validate(Language::JavaScript, "if (x > 0) {\n  f(x);\n}\n");
        assert!(warnings.is_empty());
    }

    #[test]
    fn unmatched_brace_is_reported() {
        let warnings = run_validate(Language::JavaScript, "if (x > 0) {\n  doSomething();");
        assert!(
            warnings.iter().any(|w| w.message.contains("braces")),
            "got: {warnings:?}"
        );
    }

    #[test]
    fn brackets_inside_strings_ignored() {
        let warnings = run_validate(Language::Python, "s = \"(((\"\n");
        assert!(warnings.is_empty(), "got: {warnings:?}");
    }

    #[test]
    fn bare_declaration_reported_with_line() {
        let warnings = run_validate(Language::JavaScript, "let x = 1;\nlet y;\n");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line, Some(1));
        assert!(warnings[0].message.contains("initializer"));
    }

    #[test]
    fn oversized_input_skips_validation_with_one_warning() {
        let big = "x = 1\n".repeat(VALIDATION_LINE_LIMIT + 1);
        let warnings = run_validate(Language::Python, &big);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("validation skipped"));
    }

    #[test]
    fn warning_display_is_human_readable() {
        let mut diags = Diagnostics::new(Language::Go);
        diags.warn("something odd", Some(4));
        let rendered = diags.into_warnings()[0].to_string();
        assert!(rendered.contains("[go] line 5: something odd"));
    }
}
