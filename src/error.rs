use thiserror::Error;

#[derive(Error, Debug)]
pub enum McFilesError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML input: {message}")]
    Yaml { message: String },

    #[error("Input was not a YAML mapping, detected {detected}")]
    NotAMapping { detected: String },

    #[error("List items must be a sequence, detected {detected}")]
    InvalidItems { detected: String },

    #[error("Unsupported kind: {kind}")]
    UnsupportedKind { kind: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Failure to turn one embedded payload into text.
///
/// These never abort a run; the renderer reports them inline and moves on
/// to the next file or unit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("data URL has no comma separating header and payload")]
    MissingComma,

    #[error("unsupported charset: {label}")]
    UnsupportedCharset { label: String },

    #[error("malformed base64 payload: {message}")]
    Base64 { message: String },

    #[error("payload is not valid {charset}")]
    InvalidText { charset: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for McFilesError {
    fn user_message(&self) -> String {
        match self {
            McFilesError::Io(e) => {
                format!("Failed to read input: {}", e)
            }
            McFilesError::Yaml { message } => {
                format!("Input is not valid YAML: {}", message)
            }
            McFilesError::NotAMapping { detected } => {
                format!("Input was not yaml, detected {}", detected)
            }
            McFilesError::InvalidItems { detected } => {
                format!("List has malformed items, detected {}", detected)
            }
            McFilesError::UnsupportedKind { kind } => {
                format!("Unsupported kind: {}", kind)
            }
            McFilesError::Config { message } => {
                format!("Configuration error: {}", message)
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            McFilesError::Yaml { .. } | McFilesError::NotAMapping { .. } => Some(
                "Pipe in YAML on stdin, e.g. oc get machineconfig 01-master-container-runtime -o yaml | mcfiles".to_string()
            ),
            McFilesError::UnsupportedKind { .. } => Some(
                "Only MachineConfig objects (or a List of them) can be extracted. Narrow the oc query to machineconfigs.".to_string()
            ),
            McFilesError::Config { .. } => Some(
                "Check your configuration file syntax and the patterns passed on the command line.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for McFilesError {
    fn from(error: serde_yaml::Error) -> Self {
        McFilesError::Yaml {
            message: error.to_string(),
        }
    }
}

impl From<toml::de::Error> for McFilesError {
    fn from(error: toml::de::Error) -> Self {
        McFilesError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, McFilesError>;
