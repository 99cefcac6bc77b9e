pub mod config;
pub mod error;
pub mod inspector;
pub mod languages;

pub use config::{InspectorConfig, OutputFormat};
pub use error::{InspectorError, Result};
pub use inspector::{
    run_paths, Declaration, FileWalker, Inspector, JsonLinesSink, Parser, RecordSink, RunSummary,
    TextSink, TopLevelRecord, Variant,
};
pub use languages::{LanguageGrammar, LanguageRegistry};
