//! Typed view of the parts of a `MachineConfig` object that carry files
//! and systemd units. Every field the extractor reads is optional here;
//! the renderer decides how an absent value is shown.

use serde::Deserialize;
use serde_yaml::Value;

pub const MACHINE_CONFIG_KIND: &str = "MachineConfig";
pub const LIST_KIND: &str = "List";

#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
    #[serde(default)]
    pub spec: Option<MachineConfigSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub generation: Option<i64>,
    #[serde(default)]
    pub creation_timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MachineConfigSpec {
    #[serde(default)]
    pub config: Option<IgnitionConfig>,
}

/// The Ignition document embedded under `spec.config`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IgnitionConfig {
    #[serde(default)]
    pub storage: Option<Storage>,
    #[serde(default)]
    pub systemd: Option<Systemd>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    #[serde(default)]
    pub path: Option<String>,
    /// POSIX permission bits, as a plain integer (420 for 0644).
    #[serde(default)]
    pub mode: Option<u32>,
    #[serde(default)]
    pub overwrite: Option<bool>,
    #[serde(default)]
    pub contents: Option<FileContents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileContents {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Systemd {
    #[serde(default)]
    pub units: Vec<UnitEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UnitEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Raw unit text or a data URL.
    #[serde(default)]
    pub contents: Option<String>,
    #[serde(default)]
    pub dropins: Vec<Dropin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Dropin {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub contents: Option<String>,
}

impl MachineConfig {
    pub fn from_value(value: Value) -> serde_yaml::Result<Self> {
        serde_yaml::from_value(value)
    }

    pub fn is_machine_config(&self) -> bool {
        self.kind.as_deref() == Some(MACHINE_CONFIG_KIND)
    }

    fn ignition(&self) -> Option<&IgnitionConfig> {
        self.spec.as_ref().and_then(|spec| spec.config.as_ref())
    }

    pub fn files(&self) -> &[FileEntry] {
        self.ignition()
            .and_then(|config| config.storage.as_ref())
            .map(|storage| storage.files.as_slice())
            .unwrap_or(&[])
    }

    pub fn units(&self) -> &[UnitEntry] {
        self.ignition()
            .and_then(|config| config.systemd.as_ref())
            .map(|systemd| systemd.units.as_slice())
            .unwrap_or(&[])
    }
}

impl FileEntry {
    pub fn source(&self) -> Option<&str> {
        self.contents
            .as_ref()
            .and_then(|contents| contents.source.as_deref())
            .filter(|source| !source.is_empty())
    }
}

/// Octal text of a permission value without a `0`/`0o` marker.
pub fn format_mode(mode: u32) -> String {
    format!("{:o}", mode)
}
