use std::io::{self, BufWriter};
use std::path::PathBuf;

use clap::Parser;

use code_inspector::config::{InspectorConfig, OutputFormat};
use code_inspector::error::Result;
use code_inspector::inspector::{run_paths, JsonLinesSink, RecordSink, RunSummary, TextSink};

#[derive(Parser)]
#[command(name = "code-inspector")]
#[command(about = "Inventory the top-level declarations of Python source files")]
#[command(version)]
#[command(after_long_help = r#"
EXAMPLES:
    # One JSON record per top-level declaration
    code-inspector app.py

    # Walk a package recursively, human-readable output
    code-inspector src/ --format text

    # Report broken files and continue with the rest
    code-inspector src/ tests/ --keep-going
"#)]
pub struct Cli {
    /// Files or directories to inspect (directories are searched for .py/.pyi files)
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// TOML file with inspector settings
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Log and skip files that fail instead of aborting the run
    #[arg(long)]
    pub keep_going: bool,

    /// Treat class keyword arguments (metaclass=...) as unsupported
    #[arg(long)]
    pub no_class_keywords: bool,

    /// Include hidden and ignored files when walking directories
    #[arg(long)]
    pub no_ignore: bool,
}

impl Cli {
    /// Config file first, then command-line overrides.
    pub fn resolve_config(&self) -> Result<InspectorConfig> {
        let mut config = match &self.config {
            Some(path) => InspectorConfig::load(path)?,
            None => InspectorConfig::default(),
        };

        if let Some(format) = self.format {
            config.format = format;
        }
        if self.keep_going {
            config.fail_fast = false;
        }
        if self.no_class_keywords {
            config.class_keywords = false;
        }
        if self.no_ignore {
            config.respect_ignore = false;
        }

        Ok(config)
    }
}

pub fn inspect(cli: &Cli) -> Result<RunSummary> {
    let config = cli.resolve_config()?;
    tracing::debug!("Resolved config: {:?}", config);

    let stdout = io::stdout();
    let writer = BufWriter::new(stdout.lock());
    let mut sink: Box<dyn RecordSink> = match config.format {
        OutputFormat::Json => Box::new(JsonLinesSink::new(writer)),
        OutputFormat::Text => Box::new(TextSink::new(writer)),
    };

    run_paths(cli.paths.as_slice(), &config, sink.as_mut())
}
