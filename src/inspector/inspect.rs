use std::path::Path;

use crate::config::InspectorConfig;
use crate::error::Result;
use crate::inspector::declaration::{Declaration, ExtractOptions};
use crate::inspector::parser::{ParsedFile, Parser};
use crate::inspector::record::TopLevelRecord;
use crate::inspector::sink::RecordSink;
use crate::inspector::span;
use crate::inspector::walker::FileWalker;
use crate::languages::LanguageRegistry;

/// Inventories the top-level declarations of one source file.
pub struct Inspector {
    parsed: ParsedFile,
    options: ExtractOptions,
}

impl Inspector {
    /// Reads and parses `path`. Fails with `NotFound` before any parsing
    /// when the path does not exist.
    pub fn open(path: &Path, config: &InspectorConfig) -> Result<Self> {
        let parsed = Parser::python().parse_file(path)?;
        Ok(Self {
            parsed,
            options: ExtractOptions::from(config),
        })
    }

    pub fn from_source(
        path: &str,
        source: impl Into<String>,
        config: &InspectorConfig,
    ) -> Result<Self> {
        let parsed = Parser::python().parse_source(path, source.into())?;
        Ok(Self {
            parsed,
            options: ExtractOptions::from(config),
        })
    }

    pub fn path(&self) -> &str {
        &self.parsed.path
    }

    pub fn total_lines(&self) -> usize {
        self.parsed.total_lines()
    }

    /// Top-level declarations in source order, before span filtering.
    pub fn declarations(&self) -> Vec<Declaration<'_>> {
        self.parsed
            .root()
            .children()
            .into_iter()
            .map(|node| Declaration::from_node(node, &self.options))
            .collect()
    }

    /// Records for every declaration that survives the span walk.
    pub fn records(&self) -> impl Iterator<Item = TopLevelRecord> + '_ {
        span::walk(self.declarations(), self.total_lines())
            .map(|span| TopLevelRecord::new(&span.node, span.line, span.offset))
    }

    pub fn run(&self, sink: &mut dyn RecordSink) -> Result<usize> {
        let mut emitted = 0;
        for record in self.records() {
            sink.emit(&record)?;
            emitted += 1;
        }
        tracing::debug!("Emitted {} records for {}", emitted, self.path());
        Ok(emitted)
    }
}

/// Totals for one run over a list of paths.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub files: usize,
    pub records: usize,
    pub failures: usize,
}

/// Inspects every file reachable from `paths`, feeding records into `sink`.
///
/// With `fail_fast` the first failing file aborts the run after the sink is
/// finished; otherwise the failure is logged and counted and the run moves
/// on to the next file.
pub fn run_paths<P: AsRef<Path>>(
    paths: &[P],
    config: &InspectorConfig,
    sink: &mut dyn RecordSink,
) -> Result<RunSummary> {
    let walker = FileWalker::new(LanguageRegistry::new()).respect_ignore(config.respect_ignore);
    let mut summary = RunSummary::default();

    for file in walker.expand(paths) {
        let outcome = Inspector::open(&file, config).and_then(|inspector| inspector.run(sink));
        match outcome {
            Ok(count) => {
                summary.files += 1;
                summary.records += count;
            }
            Err(e) if config.fail_fast => {
                if let Err(finish_err) = sink.finish() {
                    tracing::warn!("Failed to finish output: {}", finish_err);
                }
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", file.display(), e);
                summary.failures += 1;
            }
        }
    }

    sink.finish()?;
    tracing::info!(
        "Inspected {} files, emitted {} records, {} failures",
        summary.files,
        summary.records,
        summary.failures
    );
    Ok(summary)
}
