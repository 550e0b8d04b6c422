//! Comment extraction and re-insertion
//!
//! Comments are pulled out before classification so the classifier and tree
//! builder never see comment syntax mixed into code. A full-line comment
//! leaves an empty placeholder line behind to keep line numbers aligned; an
//! inline comment leaves the code portion. Extracted comments are merged
//! back into the tree at their original positions after it is built.
//!
//! Inline detection tracks single- and double-quote string spans so a
//! marker inside a literal (e.g. `url = "http://x"`) is not split on.

use crate::profile::LanguageProfile;
use crate::tree::{Node, NodeKind, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    FullLine,
    Inline,
}

/// One extracted comment, positioned by its original line number
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    pub kind: CommentKind,
    /// Comment text including its marker, verbatim
    pub text: String,
    /// Zero-based original line index
    pub line: usize,
    /// Leading whitespace of the original line
    pub indent: String,
    /// For inline comments, the code that preceded the marker
    pub attached_code: Option<String>,
}

/// Result of splitting a source file into code and comments
#[derive(Debug)]
pub struct ExtractedSource {
    /// Code lines, aligned one-to-one with the original lines
    pub clean_lines: Vec<String>,
    pub comments: Vec<Comment>,
}

/// Split source text into clean code lines plus a side list of comments
pub fn extract(source: &str, profile: &LanguageProfile) -> ExtractedSource {
    let mut clean_lines = Vec::new();
    let mut comments = Vec::new();

    for (line_no, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        let indent: String = line.chars().take_while(|c| c.is_whitespace()).collect();

        if profile.is_comment_line(trimmed) {
            comments.push(Comment {
                kind: CommentKind::FullLine,
                text: trimmed.to_string(),
                line: line_no,
                indent,
                attached_code: None,
            });
            // Placeholder keeps line numbers aligned
            clean_lines.push(String::new());
            continue;
        }

        match find_inline_marker(line, profile.comment.inline_marker) {
            Some(pos) => {
                let code = line[..pos].trim_end();
                comments.push(Comment {
                    kind: CommentKind::Inline,
                    text: line[pos..].trim_end().to_string(),
                    line: line_no,
                    indent,
                    attached_code: Some(code.trim().to_string()),
                });
                clean_lines.push(code.to_string());
            }
            None => clean_lines.push(line.to_string()),
        }
    }

    ExtractedSource {
        clean_lines,
        comments,
    }
}

/// Find the byte offset of an inline comment marker outside any string
/// literal, or None
fn find_inline_marker(line: &str, marker: &str) -> Option<usize> {
    let bytes = line.as_bytes();
    let marker_bytes = marker.as_bytes();
    let mut in_single = false;
    let mut in_double = false;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'\\' if in_single || in_double => {
                // Skip the escaped character
                i += 2;
                continue;
            }
            b'\'' if !in_double => in_single = !in_single,
            b'"' if !in_single => in_double = !in_double,
            _ => {
                if !in_single && !in_double && bytes[i..].starts_with(marker_bytes) {
                    return Some(i);
                }
            }
        }
        i += 1;
    }
    None
}

/// Merge extracted comments back into a built tree
///
/// Full-line comments replace the empty placeholder node at their line;
/// inline comments attach to the node at their line. A full-line comment
/// whose placeholder line became part of a nested body is attached to the
/// matching node wherever it lives.
pub fn reinsert(tree: &mut Tree, comments: &[Comment]) {
    for comment in comments {
        match comment.kind {
            CommentKind::FullLine => {
                if let Some(node) = find_node_at_line(&mut tree.nodes, comment.line) {
                    node.kind = NodeKind::Comment {
                        text: comment.text.clone(),
                    };
                    node.original_text = comment.text.clone();
                }
            }
            CommentKind::Inline => {
                if let Some(node) = find_node_at_line(&mut tree.nodes, comment.line) {
                    node.trailing_comment = Some(comment.text.clone());
                }
            }
        }
    }
}

fn find_node_at_line(nodes: &mut [Node], line: usize) -> Option<&mut Node> {
    for node in nodes {
        if node.source_line == line {
            return Some(node);
        }
        if let Some(found) = find_node_at_line(&mut node.body, line) {
            return Some(found);
        }
    }
    None
}
