pub mod cli;
pub mod config;
pub mod decoder;
pub mod error;
pub mod extractor;
pub mod machine_config;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, MatchMode, OutputConfig};
pub use error::{DecodeError, McFilesError, Result, UserFriendlyError};

// Core functionality re-exports
pub use decoder::{decode_data, Charset, DataUrl, PayloadKind};
pub use extractor::{ConfigExtractor, ExtractionReport, Renderer};
pub use machine_config::MachineConfig;
pub use scanner::{classify, collect_machine_configs, NameFilter};
pub use ui::{Diagnostics, OutputMode};

use std::io::{Read, Write};
use std::path::Path;

/// Main library interface: one configured extraction run.
pub struct McFiles {
    config: Config,
    diagnostics: Diagnostics,
}

impl McFiles {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        Self {
            config,
            diagnostics: Diagnostics::new(output_mode, verbose, quiet),
        }
    }

    /// Create an instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Read YAML from `input` and write the report to `out`.
    pub fn extract<R: Read, W: Write>(&self, input: R, out: W) -> Result<ExtractionReport> {
        let entries = collect_machine_configs(input)?;
        self.diagnostics
            .debug(&format!("Found {} MachineConfig entries", entries.len()));

        let extractor = self.extractor()?;
        extractor.extract(entries, out, &self.diagnostics)
    }

    /// Like [`McFiles::extract`], reading from a file.
    pub fn extract_file<P: AsRef<Path>, W: Write>(&self, path: P, out: W) -> Result<ExtractionReport> {
        let file = std::fs::File::open(path.as_ref())?;
        self.extract(std::io::BufReader::new(file), out)
    }

    fn extractor(&self) -> Result<ConfigExtractor> {
        let filter = NameFilter::new(&self.config.filters)?;
        if filter.is_active() {
            self.diagnostics.debug(&format!(
                "Filtering on {} pattern(s) ({:?} mode)",
                self.config.filters.patterns.len(),
                filter.mode()
            ));
        }
        Ok(ConfigExtractor::new(filter).with_names_only(self.config.output.names_only))
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &McFilesError) {
        self.diagnostics.print_user_friendly_error(error);
    }
}
