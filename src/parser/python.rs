use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use tree_sitter::{Node, Parser, Tree};

/// Python parsing front end. Holds the tree-sitter parser behind a mutex so
/// the wrapper stays `Sync`.
pub struct PythonParser {
    parser: Mutex<Parser>,
}

impl PythonParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let language = tree_sitter_python::language();
        // This expect is safe: tree-sitter-python grammar is always valid
        parser.set_language(language).expect("Failed to load Python grammar");
        Self { parser: Mutex::new(parser) }
    }

    /// Parse Python source into a syntax tree.
    ///
    /// tree-sitter is error-tolerant and never refuses input, so a tree whose
    /// root contains ERROR nodes is rejected here; that is the syntax-error
    /// condition for the whole run.
    pub fn parse(&self, source: &str) -> Result<Tree> {
        let mut guard = self
            .parser
            .lock()
            .map_err(|_| anyhow!("Python parser lock poisoned"))?;
        let tree = guard
            .parse(source, None)
            .ok_or_else(|| anyhow!("Python parser produced no tree"))?;
        if tree.root_node().has_error() {
            bail!("syntax error in source");
        }
        Ok(tree)
    }
}

impl Default for PythonParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Raw source text covered by a node.
pub fn node_text<'a>(node: Node<'a>, source: &'a str) -> &'a str {
    node.utf8_text(source.as_bytes()).unwrap_or("")
}

/// Render a node's source text as a single display line. Multi-line spans are
/// collapsed with their indentation stripped. The result is opaque display
/// text and is never parsed again.
pub fn render_source(node: Node, source: &str) -> String {
    let text = node_text(node, source);
    if text.contains('\n') {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    } else {
        text.to_string()
    }
}
