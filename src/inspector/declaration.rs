//! Classification of top-level nodes into declarations, plus the
//! attribute extraction specific to imports and classes.

use std::fmt;

use serde::Serialize;

use crate::config::InspectorConfig;
use crate::inspector::node::SyntaxNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Import,
    Class,
    Function,
    Other,
}

/// Maps a grammar production name to its declaration variant.
pub fn classify(kind: &str) -> Variant {
    match kind {
        "import_statement" | "import_from_statement" | "future_import_statement" => Variant::Import,
        "class_definition" => Variant::Class,
        "function_definition" => Variant::Function,
        _ => Variant::Other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    pub class_keywords: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            class_keywords: true,
        }
    }
}

impl From<&InspectorConfig> for ExtractOptions {
    fn from(config: &InspectorConfig) -> Self {
        Self {
            class_keywords: config.class_keywords,
        }
    }
}

/// Splits a `decorated_definition` into its definition and decorators.
fn unwrap_decorated(node: SyntaxNode<'_>) -> (SyntaxNode<'_>, Vec<SyntaxNode<'_>>) {
    if node.raw_kind() != "decorated_definition" {
        return (node, Vec::new());
    }
    match node.field("definition") {
        Some(definition) => {
            let decorators = node
                .children()
                .into_iter()
                .filter(|c| c.raw_kind() == "decorator")
                .collect();
            (definition, decorators)
        }
        None => (node, Vec::new()),
    }
}

/// Renders `a.b.c` from a `dotted_name`, otherwise the node text.
fn dotted(node: SyntaxNode<'_>) -> String {
    if node.raw_kind() == "dotted_name" {
        node.children()
            .iter()
            .map(|part| part.text())
            .collect::<Vec<_>>()
            .join(".")
    } else {
        node.text().to_string()
    }
}

pub enum Declaration<'a> {
    Import(ImportDeclaration<'a>),
    Class(ClassDeclaration<'a>),
    Function(FunctionDeclaration<'a>),
    Other(SyntaxNode<'a>),
}

impl<'a> Declaration<'a> {
    pub fn from_node(node: SyntaxNode<'a>, options: &ExtractOptions) -> Self {
        let (definition, decorators) = unwrap_decorated(node);
        match classify(definition.raw_kind()) {
            Variant::Import => Declaration::Import(ImportDeclaration::extract(definition)),
            Variant::Class => {
                Declaration::Class(ClassDeclaration::extract(definition, decorators, options))
            }
            Variant::Function => {
                Declaration::Function(FunctionDeclaration::new(definition, decorators))
            }
            Variant::Other => Declaration::Other(node),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            Declaration::Import(_) => Variant::Import,
            Declaration::Class(_) => Variant::Class,
            Declaration::Function(_) => Variant::Function,
            Declaration::Other(_) => Variant::Other,
        }
    }

    /// The node carrying the declaration's name, kind, fields and children.
    pub fn node(&self) -> SyntaxNode<'a> {
        match self {
            Declaration::Import(import) => import.node,
            Declaration::Class(class) => class.node,
            Declaration::Function(function) => function.node,
            Declaration::Other(node) => *node,
        }
    }

    /// Line where the declaration starts, decorators included.
    pub fn line(&self) -> Option<usize> {
        let decorators: &[SyntaxNode<'a>] = match self {
            Declaration::Class(class) => class.decorators.as_slice(),
            Declaration::Function(function) => function.decorators.as_slice(),
            _ => &[],
        };
        decorators
            .first()
            .and_then(|d| d.line())
            .or_else(|| self.node().line())
    }
}

impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::Import(import) => fmt::Display::fmt(import, f),
            Declaration::Function(function) => fmt::Display::fmt(function, f),
            Declaration::Class(class) => fmt::Display::fmt(&class.node, f),
            Declaration::Other(node) => fmt::Display::fmt(node, f),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportedSymbol {
    pub name: String,
    #[serde(rename = "asname")]
    pub alias: Option<String>,
}

impl ImportedSymbol {
    fn from_node(node: SyntaxNode<'_>) -> Self {
        if node.raw_kind() == "aliased_import" {
            return Self {
                name: node.field("name").map(dotted).unwrap_or_default(),
                alias: node.field("alias").map(|a| a.text().to_string()),
            };
        }
        Self {
            name: dotted(node),
            alias: None,
        }
    }
}

pub struct ImportDeclaration<'a> {
    pub node: SyntaxNode<'a>,
    /// Dotted module path; relative imports are prefixed with one `.` per level.
    /// Empty for a plain `import x`.
    pub module_path: String,
    pub symbols: Vec<ImportedSymbol>,
}

impl<'a> ImportDeclaration<'a> {
    pub fn extract(node: SyntaxNode<'a>) -> Self {
        let module_path = match node.raw_kind() {
            "future_import_statement" => "__future__".to_string(),
            "import_from_statement" => node
                .field("module_name")
                .map(render_module_path)
                .unwrap_or_default(),
            _ => String::new(),
        };

        let mut symbols: Vec<ImportedSymbol> = node
            .fields_named("name")
            .into_iter()
            .map(ImportedSymbol::from_node)
            .collect();

        let wildcard = node
            .children()
            .iter()
            .any(|c| c.raw_kind() == "wildcard_import");
        if symbols.is_empty() && wildcard {
            symbols.push(ImportedSymbol {
                name: "*".to_string(),
                alias: None,
            });
        }

        Self {
            node,
            module_path,
            symbols,
        }
    }
}

fn render_module_path(module: SyntaxNode<'_>) -> String {
    if module.raw_kind() != "relative_import" {
        return dotted(module);
    }

    let parts = module.children();
    let level: usize = parts
        .iter()
        .filter(|p| p.raw_kind() == "import_prefix")
        .map(|p| p.text().matches('.').count())
        .sum();
    let name = parts
        .iter()
        .find(|p| p.raw_kind() == "dotted_name")
        .map(|p| dotted(*p))
        .unwrap_or_default();

    format!("{}{}", ".".repeat(level), name)
}

/// Only the first imported symbol is rendered, even when a statement
/// imports several.
impl fmt::Display for ImportDeclaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.module_path.is_empty() {
            write!(f, "import")?;
        } else {
            write!(f, "from {} import", self.module_path)?;
        }
        if let Some(symbol) = self.symbols.first() {
            write!(f, " {}", symbol.name)?;
            if let Some(alias) = &symbol.alias {
                write!(f, " as {}", alias)?;
            }
        }
        Ok(())
    }
}

pub struct FunctionDeclaration<'a> {
    pub node: SyntaxNode<'a>,
    pub decorators: Vec<SyntaxNode<'a>>,
}

impl<'a> FunctionDeclaration<'a> {
    pub fn new(node: SyntaxNode<'a>, decorators: Vec<SyntaxNode<'a>>) -> Self {
        Self { node, decorators }
    }

    pub fn name(&self) -> &'a str {
        self.node.identifier().unwrap_or("")
    }
}

impl fmt::Display for FunctionDeclaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.name())
    }
}

pub struct ClassDeclaration<'a> {
    pub node: SyntaxNode<'a>,
    pub bases: Vec<String>,
    /// Keyword arguments such as `metaclass=Meta`; empty when the grammar
    /// is configured without class keywords.
    pub keywords: Vec<SyntaxNode<'a>>,
    pub statements: Vec<SyntaxNode<'a>>,
    pub methods: Vec<FunctionDeclaration<'a>>,
    pub decorators: Vec<SyntaxNode<'a>>,
}

impl<'a> ClassDeclaration<'a> {
    pub fn extract(
        node: SyntaxNode<'a>,
        decorators: Vec<SyntaxNode<'a>>,
        options: &ExtractOptions,
    ) -> Self {
        let mut bases = Vec::new();
        let mut keywords = Vec::new();

        if let Some(arguments) = node.field("superclasses") {
            for argument in arguments.children() {
                match argument.raw_kind() {
                    "keyword_argument" | "dictionary_splat" => {
                        if options.class_keywords {
                            keywords.push(argument);
                        }
                    }
                    _ => bases.push(base_reference(argument)),
                }
            }
        }

        let statements = node
            .field("body")
            .map(|body| body.children())
            .unwrap_or_default();

        let methods = statements
            .iter()
            .filter_map(|statement| {
                let (definition, decorators) = unwrap_decorated(*statement);
                (classify(definition.raw_kind()) == Variant::Function)
                    .then(|| FunctionDeclaration::new(definition, decorators))
            })
            .collect();

        Self {
            node,
            bases,
            keywords,
            statements,
            methods,
            decorators,
        }
    }
}

fn base_reference(base: SyntaxNode<'_>) -> String {
    dotted_reference(base)
        .or_else(|| base.identifier().map(str::to_string))
        .unwrap_or_else(|| base.kind())
}

/// `name` or `object.attribute` chains built only from identifiers.
fn dotted_reference(node: SyntaxNode<'_>) -> Option<String> {
    match node.raw_kind() {
        "identifier" => Some(node.text().to_string()),
        "attribute" => {
            let object = dotted_reference(node.field("object")?)?;
            let attribute = node.field("attribute")?;
            Some(format!("{}.{}", object, attribute.text()))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspector::parser::{ParsedFile, Parser};

    fn parse(source: &str) -> ParsedFile {
        Parser::python()
            .parse_source("test.py", source.to_string())
            .unwrap()
    }

    fn first<'a>(parsed: &'a ParsedFile, options: &ExtractOptions) -> Declaration<'a> {
        Declaration::from_node(parsed.root().children()[0], options)
    }

    fn import(parsed: &ParsedFile) -> ImportDeclaration<'_> {
        match first(parsed, &ExtractOptions::default()) {
            Declaration::Import(import) => import,
            _ => panic!("expected an import"),
        }
    }

    fn class(parsed: &ParsedFile) -> ClassDeclaration<'_> {
        match first(parsed, &ExtractOptions::default()) {
            Declaration::Class(class) => class,
            _ => panic!("expected a class"),
        }
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify("import_statement"), Variant::Import);
        assert_eq!(classify("import_from_statement"), Variant::Import);
        assert_eq!(classify("future_import_statement"), Variant::Import);
        assert_eq!(classify("class_definition"), Variant::Class);
        assert_eq!(classify("function_definition"), Variant::Function);
        assert_eq!(classify("expression_statement"), Variant::Other);
        assert_eq!(classify("if_statement"), Variant::Other);
    }

    #[test]
    fn test_plain_import() {
        let parsed = parse("import os\n");
        let import = import(&parsed);
        assert_eq!(import.module_path, "");
        assert_eq!(
            import.symbols,
            vec![ImportedSymbol {
                name: "os".to_string(),
                alias: None
            }]
        );
        assert_eq!(import.to_string(), "import os");
    }

    #[test]
    fn test_aliased_import() {
        let parsed = parse("import os as o\n");
        let import = import(&parsed);
        assert_eq!(import.symbols[0].alias.as_deref(), Some("o"));
        assert_eq!(import.to_string(), "import os as o");
    }

    #[test]
    fn test_dotted_import() {
        let parsed = parse("import os.path\n");
        assert_eq!(import(&parsed).to_string(), "import os.path");
    }

    #[test]
    fn test_from_import() {
        let parsed = parse("from pkg.sub import name\n");
        let import = import(&parsed);
        assert_eq!(import.module_path, "pkg.sub");
        assert_eq!(import.to_string(), "from pkg.sub import name");
    }

    #[test]
    fn test_from_import_alias() {
        let parsed = parse("from pkg import name as alias\n");
        assert_eq!(import(&parsed).to_string(), "from pkg import name as alias");
    }

    #[test]
    fn test_relative_import_levels() {
        let parsed = parse("from ..pkg import name\n");
        let import = import(&parsed);
        assert!(import.module_path.starts_with(".."));
        assert_eq!(import.module_path, "..pkg");

        let parsed = parse("from . import sibling\n");
        let import = self::import(&parsed);
        assert_eq!(import.module_path, ".");
        assert_eq!(import.to_string(), "from . import sibling");
    }

    #[test]
    fn test_future_import() {
        let parsed = parse("from __future__ import annotations\n");
        let import = import(&parsed);
        assert_eq!(import.module_path, "__future__");
        assert_eq!(import.symbols[0].name, "annotations");
    }

    #[test]
    fn test_wildcard_import() {
        let parsed = parse("from pkg import *\n");
        let import = import(&parsed);
        assert_eq!(import.symbols.len(), 1);
        assert_eq!(import.symbols[0].name, "*");
    }

    #[test]
    fn test_multi_symbol_import_renders_first_only() {
        let parsed = parse("from x import a, b as c\n");
        let import = import(&parsed);
        assert_eq!(import.symbols.len(), 2);
        assert_eq!(import.symbols[1].name, "b");
        assert_eq!(import.symbols[1].alias.as_deref(), Some("c"));
        assert_eq!(import.to_string(), "from x import a");
    }

    #[test]
    fn test_class_bases() {
        let parsed = parse("class Foo(Base1, mod.Base2):\n    pass\n");
        let class = class(&parsed);
        assert_eq!(class.bases, vec!["Base1", "mod.Base2"]);
    }

    #[test]
    fn test_class_nested_attribute_base() {
        let parsed = parse("class Foo(a.b.Base):\n    pass\n");
        assert_eq!(class(&parsed).bases, vec!["a.b.Base"]);
    }

    #[test]
    fn test_class_unresolvable_base_uses_kind() {
        let parsed = parse("class Foo(Generic[T], make_base().Mixin):\n    pass\n");
        assert_eq!(class(&parsed).bases, vec!["SUBSCRIPT", "ATTRIBUTE"]);
    }

    #[test]
    fn test_class_without_bases() {
        let parsed = parse("class Foo:\n    pass\n");
        let class = class(&parsed);
        assert!(class.bases.is_empty());
        assert!(class.keywords.is_empty());
    }

    #[test]
    fn test_class_keywords() {
        let parsed = parse("class Foo(Base, metaclass=Meta):\n    pass\n");
        let class = class(&parsed);
        assert_eq!(class.bases, vec!["Base"]);
        assert_eq!(class.keywords.len(), 1);
        assert_eq!(class.keywords[0].text(), "metaclass=Meta");
    }

    #[test]
    fn test_class_keywords_disabled() {
        let parsed = parse("class Foo(Base, metaclass=Meta):\n    pass\n");
        let options = ExtractOptions {
            class_keywords: false,
        };
        match first(&parsed, &options) {
            Declaration::Class(class) => {
                assert_eq!(class.bases, vec!["Base"]);
                assert!(class.keywords.is_empty());
            }
            _ => panic!("expected a class"),
        }
    }

    #[test]
    fn test_class_methods_and_statements() {
        let source = r#"class Service:
    timeout = 30

    def start(self):
        pass

    def stop(self):
        pass
"#;
        let parsed = parse(source);
        let class = class(&parsed);
        assert_eq!(class.statements.len(), 3);
        assert_eq!(class.methods.len(), 2);
        assert_eq!(class.methods[0].to_string(), "start()");
        assert_eq!(class.methods[1].to_string(), "stop()");
    }

    #[test]
    fn test_class_nested_class_is_not_a_method() {
        let source = r#"class Outer:
    class Inner:
        pass

    @property
    def value(self):
        return 1
"#;
        let parsed = parse(source);
        let class = class(&parsed);
        assert_eq!(class.statements.len(), 2);
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name(), "value");
        assert_eq!(class.methods[0].decorators.len(), 1);
    }

    #[test]
    fn test_decorated_class() {
        let parsed = parse("\n@dataclass\n@total_ordering\nclass Point:\n    x: int\n");
        let declaration = first(&parsed, &ExtractOptions::default());
        assert_eq!(declaration.variant(), Variant::Class);
        assert_eq!(declaration.line(), Some(2));
        assert_eq!(declaration.node().line(), Some(4));
        match declaration {
            Declaration::Class(class) => assert_eq!(class.decorators.len(), 2),
            _ => panic!("expected a class"),
        }
    }

    #[test]
    fn test_function_declaration() {
        let parsed = parse("async def fetch(url):\n    pass\n");
        let declaration = first(&parsed, &ExtractOptions::default());
        assert_eq!(declaration.variant(), Variant::Function);
        assert_eq!(declaration.to_string(), "fetch()");
        assert_eq!(declaration.line(), Some(1));
    }

    #[test]
    fn test_other_declaration() {
        let parsed = parse("VERSION = '1.0'\n");
        let declaration = first(&parsed, &ExtractOptions::default());
        assert_eq!(declaration.variant(), Variant::Other);
        assert_eq!(declaration.to_string(), "test.py [1] EXPRESSION_STATEMENT");
    }
}
