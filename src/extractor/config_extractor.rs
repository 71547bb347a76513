use crate::decoder::DataUrl;
use crate::error::{McFilesError, Result};
use crate::extractor::{ExtractionReport, Renderer};
use crate::machine_config::{MachineConfig, Metadata, MACHINE_CONFIG_KIND};
use crate::scanner::document_classifier::describe_value;
use crate::scanner::NameFilter;
use crate::ui::Diagnostics;
use serde_yaml::Value;
use std::io::Write;

const NONE: &str = "<none>";

/// Walks classified MachineConfig entries and renders their files and
/// units.
#[derive(Debug, Clone, Default)]
pub struct ConfigExtractor {
    filter: NameFilter,
    names_only: bool,
}

impl ConfigExtractor {
    pub fn new(filter: NameFilter) -> Self {
        Self {
            filter,
            names_only: false,
        }
    }

    pub fn with_names_only(mut self, names_only: bool) -> Self {
        self.names_only = names_only;
        self
    }

    /// Render every entry to `out`.
    ///
    /// Malformed entries are skipped and undecodable payloads reported
    /// inline; an entry whose kind is not `MachineConfig` ends the run with
    /// [`McFilesError::UnsupportedKind`] right after its header is written.
    pub fn extract<W: Write>(
        &self,
        entries: Vec<Value>,
        out: W,
        diagnostics: &Diagnostics,
    ) -> Result<ExtractionReport> {
        let mut renderer = Renderer::new(out, self.names_only);
        let mut report = ExtractionReport::new();

        for (index, entry) in entries.into_iter().enumerate() {
            let Some(metadata) = self.entry_metadata(index, &entry, diagnostics, &mut report) else {
                continue;
            };

            renderer.config_header(&metadata)?;

            let kind = entry.get("kind").and_then(Value::as_str);
            if kind != Some(MACHINE_CONFIG_KIND) {
                renderer.flush()?;
                return Err(McFilesError::UnsupportedKind {
                    kind: kind.unwrap_or(NONE).to_string(),
                });
            }

            let config_name = metadata.name.as_deref().unwrap_or(NONE);
            let machine_config = match MachineConfig::from_value(entry) {
                Ok(mc) => mc,
                Err(e) => {
                    let warning = format!("Malformed MachineConfig {}: {}", config_name, e);
                    diagnostics.warning(&warning);
                    report.skip_config(warning);
                    continue;
                }
            };

            diagnostics.debug(&format!(
                "{}: {} file(s), {} unit(s)",
                config_name,
                machine_config.files().len(),
                machine_config.units().len()
            ));

            self.extract_files(config_name, &machine_config, &mut renderer, diagnostics, &mut report)?;
            self.extract_units(&machine_config, &mut renderer, diagnostics, &mut report)?;
            report.configs_rendered += 1;
        }

        renderer.flush()?;
        Ok(report)
    }

    fn entry_metadata(
        &self,
        index: usize,
        entry: &Value,
        diagnostics: &Diagnostics,
        report: &mut ExtractionReport,
    ) -> Option<Metadata> {
        let warning = match entry.get("metadata") {
            _ if !entry.is_mapping() => format!(
                "Malformed document: entry {} is a {}, not a mapping",
                index,
                describe_value(entry)
            ),
            None | Some(Value::Null) => "Malformed document: entry has no metadata".to_string(),
            Some(metadata) => match serde_yaml::from_value::<Metadata>(metadata.clone()) {
                Ok(metadata) => return Some(metadata),
                Err(e) => format!("Malformed document: entry {} has bad metadata: {}", index, e),
            },
        };

        diagnostics.warning(&warning);
        report.skip_config(warning);
        None
    }

    fn extract_files<W: Write>(
        &self,
        config_name: &str,
        machine_config: &MachineConfig,
        renderer: &mut Renderer<W>,
        diagnostics: &Diagnostics,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        for file in machine_config.files() {
            let path = file.path.as_deref();
            if !self.filter.keeps(path) {
                report.entries_filtered += 1;
                continue;
            }

            renderer.file_header(config_name, file)?;
            report.files_rendered += 1;

            if self.names_only {
                continue;
            }

            if let Some(source) = file.source() {
                let what = format!("file {}", path.unwrap_or(NONE));
                render_payload(&what, source, renderer, diagnostics, report)?;
            }
        }
        Ok(())
    }

    fn extract_units<W: Write>(
        &self,
        machine_config: &MachineConfig,
        renderer: &mut Renderer<W>,
        diagnostics: &Diagnostics,
        report: &mut ExtractionReport,
    ) -> Result<()> {
        for unit in machine_config.units() {
            let name = unit.name.as_deref();
            if !self.filter.keeps(name) {
                report.entries_filtered += 1;
                continue;
            }

            renderer.unit_header(unit)?;
            report.units_rendered += 1;

            if self.names_only {
                continue;
            }

            if let Some(contents) = unit.contents.as_deref().filter(|c| !c.is_empty()) {
                let what = format!("unit {}", name.unwrap_or(NONE));
                render_payload(&what, contents, renderer, diagnostics, report)?;
            }

            for dropin in &unit.dropins {
                renderer.dropin(unit, dropin)?;
            }
        }
        Ok(())
    }
}

fn render_payload<W: Write>(
    what: &str,
    payload: &str,
    renderer: &mut Renderer<W>,
    diagnostics: &Diagnostics,
    report: &mut ExtractionReport,
) -> Result<()> {
    let decoded = DataUrl::parse(payload).and_then(|url| {
        if let Some(classification) = url.classification() {
            diagnostics.info(&classification);
        }
        url.decode()
    });

    match decoded {
        Ok(text) => renderer.body(&text)?,
        Err(e) => {
            diagnostics.error(&format!("Failed to decode {}: {}", what, e));
            renderer.decode_failure(what, &e)?;
            report.add_decode_error(format!("{}: {}", what, e));
        }
    }
    Ok(())
}
