use crate::error::{McFilesError, Result};
use crate::scanner::NameFilter;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "mcfiles.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub filters: FilterConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FilterConfig {
    /// File paths / unit names to keep. Empty keeps everything.
    pub patterns: Vec<String>,
    pub match_mode: MatchMode,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub names_only: bool,
}

/// How filter patterns are compared against file paths and unit names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Shell-style wildcards matched against the whole name
    #[default]
    Glob,
    /// Plain substring containment
    Substring,
    /// Regular expression search
    Regex,
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(McFilesError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| McFilesError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| McFilesError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = [DEFAULT_CONFIG_FILE, ".mcfiles.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref patterns) = cli_args.patterns {
            if !patterns.is_empty() {
                self.filters.patterns = patterns.clone();
            }
        }

        if let Some(match_mode) = cli_args.match_mode {
            self.filters.match_mode = match_mode;
        }

        if cli_args.names_only {
            self.output.names_only = true;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| McFilesError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| McFilesError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.patterns.iter().any(|p| p.is_empty()) {
            return Err(McFilesError::Config {
                message: "Filter patterns must not be empty".to_string(),
            });
        }

        // Regex patterns are only checked by compiling them
        NameFilter::new(&self.filters)?;

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub patterns: Option<Vec<String>>,
    pub match_mode: Option<MatchMode>,
    pub names_only: bool,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(mut self, patterns: Option<Vec<String>>) -> Self {
        self.patterns = patterns;
        self
    }

    pub fn with_match_mode(mut self, match_mode: Option<MatchMode>) -> Self {
        self.match_mode = match_mode;
        self
    }

    pub fn with_names_only(mut self, names_only: bool) -> Self {
        self.names_only = names_only;
        self
    }
}
