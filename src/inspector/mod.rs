pub mod declaration;
pub mod inspect;
pub mod node;
pub mod parser;
pub mod record;
pub mod sink;
pub mod span;
pub mod walker;

pub use declaration::{
    classify, ClassDeclaration, Declaration, ExtractOptions, FunctionDeclaration,
    ImportDeclaration, ImportedSymbol, Variant,
};
pub use inspect::{run_paths, Inspector, RunSummary};
pub use node::{NodeField, SyntaxNode};
pub use parser::{ParsedFile, Parser};
pub use record::{RecordExtension, TopLevelRecord};
pub use sink::{JsonLinesSink, RecordSink, TextSink};
pub use span::{walk, Span, SpanWalk, Spanned};
pub use walker::FileWalker;
