use crate::error::DecodeError;
use crate::machine_config::{format_mode, Dropin, FileEntry, Metadata, UnitEntry};
use std::fmt::Display;
use std::io::{self, Write};

const NONE: &str = "<none>";

/// Line-oriented report writer. Every decoded body is flushed as soon as
/// it is written.
pub struct Renderer<W: Write> {
    out: W,
    names_only: bool,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, names_only: bool) -> Self {
        Self { out, names_only }
    }

    pub fn config_header(&mut self, metadata: &Metadata) -> io::Result<()> {
        let prefix = if self.names_only { "" } else { "### " };
        writeln!(
            self.out,
            "{}{} #{}   created={}",
            prefix,
            or_none(metadata.name.as_deref()),
            or_none(metadata.generation),
            or_none(metadata.creation_timestamp.as_deref()),
        )
    }

    pub fn file_header(&mut self, config_name: &str, file: &FileEntry) -> io::Result<()> {
        let attributes = format!(
            "[{}, overwrite={}]",
            mode_text(file.mode),
            flag(file.overwrite)
        );

        let path = or_none(file.path.as_deref());

        if self.names_only {
            writeln!(self.out, "    {}   {}", path, attributes)
        } else {
            writeln!(self.out, "---")?;
            writeln!(self.out, "### [{}] {}   {}", config_name, path, attributes)
        }
    }

    pub fn unit_header(&mut self, unit: &UnitEntry) -> io::Result<()> {
        let name = or_none(unit.name.as_deref());

        if self.names_only {
            writeln!(self.out, "    {}   [enabled={}]", name, flag(unit.enabled))
        } else {
            writeln!(
                self.out,
                "### Systemd Unit {}   [enabled={}]",
                name,
                flag(unit.enabled)
            )
        }
    }

    pub fn dropin(&mut self, unit: &UnitEntry, dropin: &Dropin) -> io::Result<()> {
        writeln!(
            self.out,
            "### {}.d/{}",
            or_none(unit.name.as_deref()),
            or_none(dropin.name.as_deref())
        )?;
        self.body(dropin.contents.as_deref().unwrap_or_default())
    }

    pub fn body(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)?;
        self.out.flush()
    }

    pub fn decode_failure(&mut self, what: &str, error: &DecodeError) -> io::Result<()> {
        writeln!(self.out, "!!! failed to decode {}: {}", what, error)?;
        self.out.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

fn or_none<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NONE.to_string())
}

fn mode_text(mode: Option<u32>) -> String {
    match mode {
        Some(mode) => format!("mode={} ({})", mode, format_mode(mode)),
        None => format!("mode={}", NONE),
    }
}

fn flag(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "True",
        Some(false) => "False",
        None => NONE,
    }
}
