use serde::Serialize;

use crate::inspector::declaration::{Declaration, ImportedSymbol};

/// Flat, serialization-ready description of one top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopLevelRecord {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub lineno: Option<usize>,
    pub fields: Vec<String>,
    pub children: Vec<String>,
    pub offset: usize,
    #[serde(flatten)]
    pub extension: Option<RecordExtension>,
    /// Human-readable rendering of the declaration, used by text output.
    #[serde(skip)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecordExtension {
    Import {
        module: String,
        aliases: Vec<ImportedSymbol>,
    },
    Class {
        bases: Vec<String>,
        keywords: Vec<String>,
        statements: Vec<String>,
        methods: Vec<String>,
    },
}

impl TopLevelRecord {
    pub fn new(declaration: &Declaration<'_>, lineno: usize, offset: usize) -> Self {
        let node = declaration.node();

        let extension = match declaration {
            Declaration::Import(import) => Some(RecordExtension::Import {
                module: import.module_path.clone(),
                aliases: import.symbols.clone(),
            }),
            Declaration::Class(class) => Some(RecordExtension::Class {
                bases: class.bases.clone(),
                keywords: class.keywords.iter().map(|k| k.text().to_string()).collect(),
                statements: class.statements.iter().map(|s| s.to_string()).collect(),
                methods: class.methods.iter().map(|m| m.to_string()).collect(),
            }),
            Declaration::Function(_) | Declaration::Other(_) => None,
        };

        Self {
            name: node.identifier().map(str::to_string),
            kind: node.kind(),
            source: node.file().path.clone(),
            lineno: Some(lineno),
            fields: node.fields().iter().map(|f| f.to_string()).collect(),
            children: node.children().iter().map(|c| c.describe()).collect(),
            offset,
            extension,
            summary: declaration.to_string(),
        }
    }
}
