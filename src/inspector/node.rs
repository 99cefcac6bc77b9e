//! Generic view over a parsed tree-sitter node.
//!
//! A [`SyntaxNode`] borrows both the node and the [`ParsedFile`] it came from,
//! so it can resolve text and the source path without copying anything.
//! Missing attributes always resolve to `None`; nothing here fails.

use std::fmt;

use crate::inspector::parser::ParsedFile;

#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    node: tree_sitter::Node<'a>,
    file: &'a ParsedFile,
}

/// A child attached under a grammar field name.
#[derive(Clone, Copy)]
pub struct NodeField<'a> {
    pub name: &'static str,
    pub node: SyntaxNode<'a>,
}

/// How a node kind exposes its identifier.
enum IdentifierSource {
    /// The node's own text is the identifier.
    OwnText,
    /// The identifier lives under this grammar field.
    Field(&'static str),
    /// The identifier belongs to the wrapped definition.
    Definition,
    /// The name bound by `except E as name`.
    ExceptAlias,
    None,
}

fn identifier_source(kind: &str) -> IdentifierSource {
    match kind {
        "identifier" => IdentifierSource::OwnText,
        "function_definition" | "class_definition" | "aliased_import" => {
            IdentifierSource::Field("name")
        }
        "except_clause" => IdentifierSource::ExceptAlias,
        "decorated_definition" => IdentifierSource::Definition,
        _ => IdentifierSource::None,
    }
}

impl<'a> SyntaxNode<'a> {
    pub fn new(node: tree_sitter::Node<'a>, file: &'a ParsedFile) -> Self {
        Self { node, file }
    }

    pub fn file(&self) -> &'a ParsedFile {
        self.file
    }

    /// Grammar production name as produced by tree-sitter (`class_definition`).
    pub fn raw_kind(&self) -> &'static str {
        self.node.kind()
    }

    /// Uppercased production name (`CLASS_DEFINITION`).
    pub fn kind(&self) -> String {
        self.node.kind().to_ascii_uppercase()
    }

    pub fn text(&self) -> &'a str {
        self.node.utf8_text(self.file.source_bytes()).unwrap_or("")
    }

    pub fn identifier(&self) -> Option<&'a str> {
        match identifier_source(self.raw_kind()) {
            IdentifierSource::OwnText => Some(self.text()),
            IdentifierSource::Field(field) => self.field(field).map(|n| n.text()),
            IdentifierSource::Definition => self.field("definition").and_then(|n| n.identifier()),
            IdentifierSource::ExceptAlias => self.except_alias(),
            IdentifierSource::None => None,
        }
    }

    fn except_alias(&self) -> Option<&'a str> {
        if let Some(alias) = self.field("alias") {
            return Some(alias.text());
        }
        let mut cursor = self.node.walk();
        let children: Vec<_> = self.node.children(&mut cursor).collect();
        for (i, child) in children.iter().enumerate() {
            match child.kind() {
                "as_pattern" => {
                    return SyntaxNode::new(*child, self.file)
                        .field("alias")
                        .map(|n| n.text());
                }
                "as" => {
                    return children[i + 1..]
                        .iter()
                        .find(|n| n.is_named())
                        .map(|n| SyntaxNode::new(*n, self.file).text());
                }
                _ => {}
            }
        }
        None
    }

    /// 1-based line of the node's first byte.
    pub fn line(&self) -> Option<usize> {
        Some(self.node.start_position().row + 1)
    }

    pub fn column(&self) -> usize {
        self.node.start_position().column
    }

    pub fn field(&self, name: &str) -> Option<SyntaxNode<'a>> {
        self.node
            .child_by_field_name(name)
            .map(|n| SyntaxNode::new(n, self.file))
    }

    /// Every child under `name`, in source order.
    pub fn fields_named(&self, name: &str) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        let nodes: Vec<_> = self
            .node
            .children_by_field_name(name, &mut cursor)
            .map(|n| SyntaxNode::new(n, self.file))
            .collect();
        nodes
    }

    /// Children attached under a field name, in grammar/source order.
    pub fn fields(&self) -> Vec<NodeField<'a>> {
        let mut fields = Vec::new();
        let mut cursor = self.node.walk();
        if !cursor.goto_first_child() {
            return fields;
        }
        loop {
            if let Some(name) = cursor.field_name() {
                fields.push(NodeField {
                    name,
                    node: SyntaxNode::new(cursor.node(), self.file),
                });
            }
            if !cursor.goto_next_sibling() {
                break;
            }
        }
        fields
    }

    /// Named children, skipping extras such as comments.
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        let nodes: Vec<_> = self
            .node
            .named_children(&mut cursor)
            .filter(|n| !n.is_extra())
            .map(|n| SyntaxNode::new(n, self.file))
            .collect();
        nodes
    }

    /// Short positional tag, e.g. `<IDENTIFIER 3:4>`.
    pub fn describe(&self) -> String {
        match self.line() {
            Some(line) => format!("<{} {}:{}>", self.kind(), line, self.column()),
            None => format!("<{}>", self.kind()),
        }
    }
}

impl fmt::Display for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.file.path)?;
        if let Some(line) = self.line() {
            write!(f, "[{}] ", line)?;
        }
        write!(f, "{}", self.kind())?;
        if let Some(name) = self.identifier() {
            write!(f, ", {}", name)?;
        }
        Ok(())
    }
}

impl fmt::Display for NodeField<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.node.kind())
    }
}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.raw_kind())
            .field("line", &self.line())
            .field("identifier", &self.identifier())
            .finish()
    }
}
