//! Shallow tree builder - one node per clean line
//!
//! Brace-delimited languages build a flat node sequence; block membership
//! is tracked with an explicit stack only to record each node's enclosing
//! context (an index into the flat list). Indentation-block languages
//! (Python, Ruby) instead recurse: every line at a strictly greater raw
//! indentation column than a block opener becomes part of that node's body,
//! stopping at the first line at or below the opener's column, so sibling
//! blocks are never consumed. Columns are compared raw so sources indented
//! narrower than the language's conventional width still nest correctly;
//! the quantized level on each node exists for emission only.

use crate::classify::Classifier;
use crate::profile::{BlockStyle, LanguageProfile};
use crate::tree::{Node, NodeKind, Tree};

pub struct TreeBuilder<'a> {
    profile: &'a LanguageProfile,
    classifier: &'a Classifier<'a>,
}

struct Line<'s> {
    trimmed: &'s str,
    /// Raw leading-whitespace column, for block attachment
    column: usize,
    /// Quantized indentation level, for emission
    indent: usize,
    number: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(profile: &'a LanguageProfile, classifier: &'a Classifier<'a>) -> TreeBuilder<'a> {
        TreeBuilder {
            profile,
            classifier,
        }
    }

    pub fn build(&self, clean_lines: &[String]) -> Tree {
        let lines: Vec<Line<'_>> = clean_lines
            .iter()
            .enumerate()
            .map(|(number, raw)| Line {
                trimmed: raw.trim(),
                column: self.indent_column(raw),
                indent: self.indent_level(raw),
                number,
            })
            .collect();

        let mut tree = Tree::new(self.profile.language);
        tree.total_lines = clean_lines.len();

        match self.profile.block_style {
            BlockStyle::Braces => self.build_flat(&lines, &mut tree),
            BlockStyle::Indent | BlockStyle::KeywordEnd => {
                let mut pos = 0;
                tree.nodes = self.parse_level(&lines, &mut pos, 0, 0);
            }
        }

        tree.complexity_count = count_definitions(&tree.nodes);
        tree
    }

    /// Indentation depth in levels: each tab is one level, runs of spaces
    /// divide by the language's indent width
    fn indent_level(&self, raw: &str) -> usize {
        let mut tabs = 0;
        let mut spaces = 0;
        for c in raw.chars() {
            match c {
                '\t' => tabs += 1,
                ' ' => spaces += 1,
                _ => break,
            }
        }
        let width = self.profile.indent.width.max(1);
        tabs + spaces / width
    }

    /// Raw indentation column: a space is one column, a tab a full indent
    /// width. Not quantized, so two-space bodies under a four-space
    /// convention still compare deeper than their opener.
    fn indent_column(&self, raw: &str) -> usize {
        let width = self.profile.indent.width.max(1);
        let mut column = 0;
        for c in raw.chars() {
            match c {
                '\t' => column += width,
                ' ' => column += 1,
                _ => break,
            }
        }
        column
    }

    fn make_node(&self, line: &Line<'_>) -> Node {
        let kind = self.classifier.classify(line.trimmed);
        Node::new(kind, line.number, line.indent, line.trimmed)
    }

    /// Linear walk for brace languages; the stack only records context
    fn build_flat(&self, lines: &[Line<'_>], tree: &mut Tree) {
        let mut stack: Vec<usize> = Vec::new();

        for line in lines {
            // A closing brace ends the block opened most recently; pops
            // never go below the number of open block starts
            if line.trimmed.starts_with('}') {
                stack.pop();
            }

            let mut node = self.make_node(line);
            node.enclosing_context = stack.last().copied();
            let index = tree.nodes.len();
            tree.nodes.push(node);

            if line.trimmed.ends_with('{') {
                stack.push(index);
            }
        }
    }

    /// Recursive descent by indentation column: collect nodes at or beyond
    /// `min_column`, attaching strictly deeper lines to block openers.
    /// Emitted depth comes from the recursion, not the source columns.
    fn parse_level(
        &self,
        lines: &[Line<'_>],
        pos: &mut usize,
        min_column: usize,
        depth: usize,
    ) -> Vec<Node> {
        let mut nodes = Vec::new();

        while *pos < lines.len() {
            let line = &lines[*pos];

            if line.trimmed.is_empty() {
                // A blank belongs here only if the block continues past it;
                // otherwise it is left for the enclosing level
                let continues = match next_nonblank_column(lines, *pos) {
                    Some(column) => column >= min_column,
                    None => min_column == 0,
                };
                if !continues {
                    break;
                }
                let mut node = self.make_node(line);
                node.indent_level = depth;
                nodes.push(node);
                *pos += 1;
                continue;
            }
            if line.column < min_column {
                break;
            }

            let mut node = self.make_node(line);
            node.indent_level = depth;
            *pos += 1;

            if self.opens_indent_block(line.trimmed, &node.kind) {
                node.body = self.parse_level(lines, pos, line.column + 1, depth + 1);
            }
            nodes.push(node);
        }

        nodes
    }

    fn opens_indent_block(&self, trimmed: &str, kind: &NodeKind) -> bool {
        match self.profile.block_style {
            BlockStyle::Indent => trimmed.ends_with(':'),
            BlockStyle::KeywordEnd => match kind {
                NodeKind::Function { .. } | NodeKind::Class { .. } => true,
                NodeKind::Control { keyword: Some(kw) } => matches!(
                    kw.as_str(),
                    "if" | "unless" | "while" | "until" | "for" | "case" | "begin"
                ),
                _ => trimmed.ends_with(" do") || trimmed.contains(" do |"),
            },
            BlockStyle::Braces => false,
        }
    }
}

fn next_nonblank_column(lines: &[Line<'_>], from: usize) -> Option<usize> {
    lines[from..]
        .iter()
        .find(|l| !l.trimmed.is_empty())
        .map(|l| l.column)
}

fn count_definitions(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .map(|n| {
            let own = match n.kind {
                NodeKind::Function { .. } | NodeKind::Class { .. } => 1,
                _ => 0,
            };
            own + count_definitions(&n.body)
        })
        .sum()
}
