use crate::error::{McFilesError, UserFriendlyError};
use crate::extractor::ExtractionReport;
use console::{style, Emoji, Term};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CROSS: Emoji = Emoji("❌ ", "x ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");

/// Writes everything that is not part of the extraction report to stderr,
/// so stdout stays a clean copy of the decoded files.
pub struct Diagnostics {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl Diagnostics {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stderr().features().colors_supported(),
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn error(&self, message: &str) {
        self.emit(MessageType::Error, message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            self.emit(MessageType::Warning, message);
        }
    }

    /// Payload classification traces; on unless `--quiet`.
    pub fn info(&self, message: &str) {
        if self.should_show_message(0) {
            self.emit(MessageType::Info, message);
        }
    }

    pub fn debug(&self, message: &str) {
        if self.should_show_message(1) {
            self.emit(MessageType::Debug, message);
        }
    }

    pub fn print_user_friendly_error(&self, error: &McFilesError) {
        self.error(&error.user_message());

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan());
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => eprintln!("SUGGESTION: {}", suggestion),
            }
        }
    }

    pub fn print_summary(&self, report: &ExtractionReport) {
        match self.mode {
            OutputMode::Json => {
                let mut summary = serde_json::to_value(report).unwrap_or_default();
                if let Some(object) = summary.as_object_mut() {
                    object.insert("type".to_string(), "summary".into());
                    object.insert(
                        "timestamp".to_string(),
                        chrono::Utc::now().to_rfc3339().into(),
                    );
                }
                print_json_object(&summary);
            }
            OutputMode::Human | OutputMode::Plain => {
                if !self.should_show_message(1) {
                    return;
                }
                self.debug(&format!(
                    "{} machineconfig(s) extracted, {} skipped",
                    report.configs_rendered, report.configs_skipped
                ));
                self.debug(&format!(
                    "{} file(s), {} unit(s) rendered, {} filtered out",
                    report.files_rendered, report.units_rendered, report.entries_filtered
                ));
                if !report.decode_errors.is_empty() {
                    self.debug(&format!("{} payload(s) failed to decode", report.decode_errors.len()));
                }
            }
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn emit(&self, msg_type: MessageType, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(msg_type, message),
            OutputMode::Json => print_json_object(&serde_json::json!({
                "type": "message",
                "level": msg_type.label(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339()
            })),
            OutputMode::Plain => {
                eprintln!("{}: {}", msg_type.label().to_uppercase(), message)
            }
        }
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        if !self.use_colors {
            eprintln!("{}", message);
            return;
        }

        match msg_type {
            MessageType::Error => eprintln!("{}{}", CROSS, style(message).red().bold()),
            MessageType::Warning => eprintln!("{}{}", WARNING, style(message).yellow().bold()),
            MessageType::Info => eprintln!("{}", style(message).cyan()),
            MessageType::Debug => eprintln!("{}", style(message).dim()),
        }
    }
}

fn print_json_object(obj: &serde_json::Value) {
    eprintln!(
        "{}",
        serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
    );
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Error,
    Warning,
    Info,
    Debug,
}

impl MessageType {
    fn label(self) -> &'static str {
        match self {
            MessageType::Error => "error",
            MessageType::Warning => "warning",
            MessageType::Info => "info",
            MessageType::Debug => "debug",
        }
    }
}
