//! Shallow tree model - one typed node per source line
//!
//! Nodes are intentionally flat and coarse. A node carries structured fields
//! only when the source-language matcher decomposed its line; otherwise it
//! keeps the verbatim text and is re-emitted unchanged (pass-through
//! fidelity). `enclosing_context` is an index into the tree's node list,
//! never a pointer, so a node can name its nearest enclosing block without
//! owning it.

use serde::Serialize;

use crate::language::Language;

/// Classified content of one source line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NodeKind {
    EmptyLine,
    Comment {
        text: String,
    },
    Function {
        name: Option<String>,
        parameters: Vec<String>,
        return_type: Option<String>,
    },
    Class {
        name: Option<String>,
        parent: Option<String>,
    },
    Variable {
        name: Option<String>,
        type_hint: Option<String>,
        value: Option<String>,
    },
    Control {
        keyword: Option<String>,
    },
    Import,
    Expression,
}

impl NodeKind {
    /// Whether this kind carries any structured fields
    pub fn is_structured(&self) -> bool {
        match self {
            NodeKind::Function { name, .. } => name.is_some(),
            NodeKind::Class { name, .. } => name.is_some(),
            NodeKind::Variable { name, .. } => name.is_some(),
            NodeKind::EmptyLine
            | NodeKind::Comment { .. }
            | NodeKind::Control { .. }
            | NodeKind::Import
            | NodeKind::Expression => false,
        }
    }
}

/// One classified source line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Zero-based line number in the original source
    pub source_line: usize,
    /// Indentation depth of the original line, in levels
    pub indent_level: usize,
    /// Index of the nearest enclosing block node in the tree's flat node
    /// list. Populated only for brace-delimited sources, whose node list
    /// stays flat; indentation and keyword-end sources convey nesting
    /// through `body` and leave this `None`
    pub enclosing_context: Option<usize>,
    /// Verbatim trimmed text of the line; the pass-through fallback
    pub original_text: String,
    /// Inline comment that followed the code on this line, verbatim
    pub trailing_comment: Option<String>,
    /// Nested lines, populated only for indentation-block source languages
    pub body: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, source_line: usize, indent_level: usize, text: &str) -> Node {
        Node {
            kind,
            source_line,
            indent_level,
            enclosing_context: None,
            original_text: text.to_string(),
            trailing_comment: None,
            body: Vec::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self.kind, NodeKind::EmptyLine)
    }

    /// Pass-through nodes are re-emitted verbatim
    pub fn is_pass_through(&self) -> bool {
        !self.kind.is_structured()
    }
}

/// Ordered node sequence for one source file
#[derive(Debug, Serialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub language: Language,
    pub total_lines: usize,
    /// Count of function and class nodes; a coarse proxy, not a real metric
    pub complexity_count: usize,
}

impl Tree {
    pub fn new(language: Language) -> Tree {
        Tree {
            nodes: Vec::new(),
            language,
            total_lines: 0,
            complexity_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_detection() {
        let decomposed = NodeKind::Function {
            name: Some("add".to_string()),
            parameters: vec!["a".to_string(), "b".to_string()],
            return_type: None,
        };
        assert!(decomposed.is_structured());

        let opaque = NodeKind::Function {
            name: None,
            parameters: Vec::new(),
            return_type: None,
        };
        assert!(!opaque.is_structured());
        assert!(!NodeKind::Expression.is_structured());
    }

    #[test]
    fn pass_through_when_unstructured() {
        let node = Node::new(NodeKind::Expression, 3, 1, "x + y");
        assert!(node.is_pass_through());
        assert_eq!(node.original_text, "x + y");
        assert_eq!(node.enclosing_context, None);
    }
}
