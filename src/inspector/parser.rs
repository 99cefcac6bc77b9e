use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{InspectorError, Result};
use crate::inspector::node::SyntaxNode;
use crate::languages::python::PythonGrammar;
use crate::languages::LanguageGrammar;

pub struct Parser {
    grammar: Arc<dyn LanguageGrammar>,
}

impl Parser {
    pub fn new(grammar: Arc<dyn LanguageGrammar>) -> Self {
        Self { grammar }
    }

    pub fn python() -> Self {
        Self::new(Arc::new(PythonGrammar))
    }

    pub fn parse_file(&self, path: &Path) -> Result<ParsedFile> {
        if !path.exists() {
            return Err(InspectorError::NotFound(path.to_path_buf()));
        }

        let display = path.display().to_string();
        let bytes = std::fs::read(path)?;
        let source = String::from_utf8(bytes).map_err(|e| {
            let valid = &e.as_bytes()[..e.utf8_error().valid_up_to()];
            InspectorError::Parse {
                path: display.clone(),
                line: valid.iter().filter(|&&b| b == b'\n').count() + 1,
                message: "source is not valid UTF-8".to_string(),
            }
        })?;

        self.parse_source(&display, source)
    }

    pub fn parse_source(&self, path: &str, source: String) -> Result<ParsedFile> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&self.grammar.language())
            .map_err(|e| InspectorError::Language(e.to_string()))?;

        let tree = parser.parse(&source, None).ok_or_else(|| InspectorError::Parse {
            path: path.to_string(),
            line: 0,
            message: "Failed to parse source".to_string(),
        })?;

        let root = tree.root_node();
        if root.has_error() {
            let (line, message) = match first_error(root) {
                Some(node) if node.is_missing() => {
                    (node.start_position().row + 1, format!("missing {}", node.kind()))
                }
                Some(node) => (node.start_position().row + 1, "invalid syntax".to_string()),
                None => (1, "invalid syntax".to_string()),
            };
            return Err(InspectorError::Parse {
                path: path.to_string(),
                line,
                message,
            });
        }

        let total_lines = source.split('\n').count();
        tracing::debug!(
            "Parsed {} as {} ({} lines)",
            path,
            self.grammar.name(),
            total_lines
        );

        Ok(ParsedFile {
            tree,
            source,
            path: path.to_string(),
            total_lines,
        })
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::python()
    }
}

/// Depth-first search for the first `ERROR` or missing node.
fn first_error(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error())
        .find_map(first_error)
}

pub struct ParsedFile {
    pub tree: tree_sitter::Tree,
    pub source: String,
    pub path: String,
    total_lines: usize,
}

impl ParsedFile {
    pub fn root_node(&self) -> tree_sitter::Node<'_> {
        self.tree.root_node()
    }

    /// The module node wrapped for inspection.
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode::new(self.root_node(), self)
    }

    pub fn source_bytes(&self) -> &[u8] {
        self.source.as_bytes()
    }

    /// Physical line count: one more than the number of newlines.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }
}

impl fmt::Debug for ParsedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedFile")
            .field("path", &self.path)
            .field("total_lines", &self.total_lines)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(source: &str) -> Result<ParsedFile> {
        Parser::python().parse_source("test.py", source.to_string())
    }

    #[test]
    fn test_parse_source_python() {
        let parsed = parse("import os\n\ndef main():\n    pass\n").unwrap();
        assert_eq!(parsed.root_node().kind(), "module");
        assert_eq!(parsed.root_node().named_child_count(), 2);
    }

    #[test]
    fn test_parse_source_empty() {
        let parsed = parse("").unwrap();
        assert_eq!(parsed.source, "");
        assert_eq!(parsed.total_lines(), 1);
    }

    #[test]
    fn test_total_lines_counts_trailing_newline() {
        assert_eq!(parse("x = 1").unwrap().total_lines(), 1);
        assert_eq!(parse("x = 1\n").unwrap().total_lines(), 2);
        assert_eq!(parse("x = 1\ny = 2\n\n").unwrap().total_lines(), 4);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = parse("import os\n\ndef broken(:\n    pass\n").unwrap_err();
        match err {
            InspectorError::Parse { path, line, .. } => {
                assert_eq!(path, "test.py");
                assert_eq!(line, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parsed_file_debug() {
        let parsed = parse("class Foo:\n    pass\n").unwrap();
        assert_eq!(
            format!("{parsed:?}"),
            "ParsedFile { path: \"test.py\", total_lines: 3, .. }"
        );
    }

    #[test]
    fn test_parse_file_not_found() {
        let err = Parser::python()
            .parse_file(Path::new("/nonexistent/module.py"))
            .unwrap_err();
        assert!(matches!(err, InspectorError::NotFound(_)));
    }

    #[test]
    fn test_parse_file_invalid_utf8() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"x = 1\ny = '\xff'\n").unwrap();

        let err = Parser::python().parse_file(file.path()).unwrap_err();
        match err {
            InspectorError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_file_reads_source() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"import sys\n").unwrap();

        let parsed = Parser::python().parse_file(file.path()).unwrap();
        assert_eq!(parsed.source, "import sys\n");
        assert_eq!(parsed.path, file.path().display().to_string());
    }
}
