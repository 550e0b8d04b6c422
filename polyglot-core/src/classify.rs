//! Line classifier - ordered predicates over a single trimmed line
//!
//! Classification is order-dependent by design: function before class before
//! variable before control flow before import. The predicates are not
//! mutually exclusive; the first that matches wins, and a line matching
//! nothing becomes a generic expression. The classifier never fails and
//! never looks beyond the current line.

use regex::Captures;

use crate::profile::LanguageProfile;
use crate::tree::NodeKind;

pub struct Classifier<'a> {
    profile: &'a LanguageProfile,
}

impl<'a> Classifier<'a> {
    pub fn new(profile: &'a LanguageProfile) -> Classifier<'a> {
        Classifier { profile }
    }

    /// Classify one trimmed line into a node kind, extracting structured
    /// fields where the language's patterns decompose it
    pub fn classify(&self, trimmed: &str) -> NodeKind {
        if trimmed.is_empty() {
            return NodeKind::EmptyLine;
        }
        if let Some(kind) = self.match_function(trimmed) {
            return kind;
        }
        if let Some(kind) = self.match_class(trimmed) {
            return kind;
        }
        if let Some(kind) = self.match_variable(trimmed) {
            return kind;
        }
        if let Some(caps) = self.profile.control.captures(trimmed) {
            return NodeKind::Control {
                keyword: caps.name("kw").map(|m| m.as_str().to_string()),
            };
        }
        if self.profile.import.is_match(trimmed) {
            return NodeKind::Import;
        }
        if self.profile.is_comment_line(trimmed) {
            return NodeKind::Comment {
                text: trimmed.to_string(),
            };
        }
        NodeKind::Expression
    }

    fn match_function(&self, trimmed: &str) -> Option<NodeKind> {
        if self.starts_with_control_keyword(trimmed) {
            return None;
        }
        for pattern in &self.profile.function {
            if let Some(caps) = pattern.captures(trimmed) {
                return Some(NodeKind::Function {
                    name: named(&caps, "name"),
                    parameters: split_parameters(caps.name("params").map(|m| m.as_str())),
                    return_type: named(&caps, "ret"),
                });
            }
        }
        None
    }

    fn match_class(&self, trimmed: &str) -> Option<NodeKind> {
        for pattern in &self.profile.class {
            if let Some(caps) = pattern.captures(trimmed) {
                return Some(NodeKind::Class {
                    name: named(&caps, "name"),
                    parent: named(&caps, "parent"),
                });
            }
        }
        None
    }

    fn match_variable(&self, trimmed: &str) -> Option<NodeKind> {
        if self.starts_with_control_keyword(trimmed) {
            return None;
        }
        for pattern in &self.profile.variable {
            if let Some(caps) = pattern.captures(trimmed) {
                return Some(NodeKind::Variable {
                    name: named(&caps, "name"),
                    type_hint: named(&caps, "type"),
                    value: named(&caps, "value"),
                });
            }
        }
        None
    }

    /// The heuristic patterns can read `return foo(x)` as a definition;
    /// a leading control keyword vetoes the function and variable matchers
    fn starts_with_control_keyword(&self, trimmed: &str) -> bool {
        let first = trimmed.split_whitespace().next().unwrap_or("");
        let first = first.trim_end_matches(['(', ':', '{']);
        self.profile.control_keywords.contains(&first)
    }
}

fn named(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group).and_then(|m| {
        let text = m.as_str().trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    })
}

fn split_parameters(params: Option<&str>) -> Vec<String> {
    params
        .unwrap_or("")
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
