use crate::config::{CliOverrides, Config, MatchMode, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mcfiles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extracts files and systemd units from MachineConfig yaml")]
#[command(
    long_about = "mcfiles reads a MachineConfig (or a List of them) from stdin, decodes the \
                  embedded file and systemd unit payloads, and prints them."
)]
#[command(after_help = "EXAMPLES:\n  \
    oc get machineconfig 01-master-container-runtime -o yaml | mcfiles\n  \
    oc get machineconfig -o yaml | mcfiles --list\n  \
    oc get machineconfig -o yaml | mcfiles '*.service' '/etc/crio/*'\n  \
    mcfiles --input rendered-worker.yaml --match-mode substring crio")]
pub struct Cli {
    /// File paths or unit names to show (glob by default)
    #[arg(value_name = "PATTERN")]
    pub patterns: Vec<String>,

    /// Show only file and unit names
    #[arg(short = 'l', long = "list")]
    pub names_only: bool,

    /// How patterns are matched against names
    #[arg(short, long, value_enum)]
    pub match_mode: Option<MatchMode>,

    /// Read YAML from a file instead of stdin ("-" for stdin)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Format of diagnostics written to stderr
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress warnings and payload traces)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// One JSON object per line
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_patterns(Some(self.patterns.clone()))
            .with_match_mode(self.match_mode)
            .with_names_only(self.names_only)
    }

    /// Input path, or `None` for stdin.
    pub fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }

    pub fn config_output_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_patterns_and_list() {
        let cli = Cli::try_parse_from(["mcfiles", "-l", "*.service", "/etc/crio/*"]).unwrap();
        assert!(cli.names_only);
        assert_eq!(cli.patterns, vec!["*.service", "/etc/crio/*"]);
        assert!(cli.match_mode.is_none());
    }

    #[test]
    fn test_parse_match_mode() {
        let cli = Cli::try_parse_from(["mcfiles", "--match-mode", "substring", "crio"]).unwrap();
        assert_eq!(cli.match_mode, Some(MatchMode::Substring));

        assert!(Cli::try_parse_from(["mcfiles", "--match-mode", "fuzzy"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["mcfiles", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_input_dash_means_stdin() {
        let cli = Cli::try_parse_from(["mcfiles", "--input", "-"]).unwrap();
        assert!(cli.input_path().is_none());

        let cli = Cli::try_parse_from(["mcfiles", "-i", "mc.yaml"]).unwrap();
        assert_eq!(cli.input_path(), Some(&PathBuf::from("mc.yaml")));
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::try_parse_from(["mcfiles", "-l", "-m", "regex", "^crio"]).unwrap();
        let mut config = Config::default();
        config.merge_with_cli_args(&cli.create_cli_overrides());

        assert!(config.output.names_only);
        assert_eq!(config.filters.match_mode, MatchMode::Regex);
        assert_eq!(config.filters.patterns, vec!["^crio"]);
    }

    #[test]
    fn test_config_output_path() {
        let cli = Cli::try_parse_from(["mcfiles", "--generate-config"]).unwrap();
        assert_eq!(cli.config_output_path(), PathBuf::from("mcfiles.toml"));
    }
}
