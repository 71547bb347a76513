use serde::{Deserialize, Serialize};

/// Tally of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub configs_rendered: usize,
    pub configs_skipped: usize,
    pub files_rendered: usize,
    pub units_rendered: usize,
    pub entries_filtered: usize,
    pub warnings: Vec<String>,
    pub decode_errors: Vec<String>,
}

impl ExtractionReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_config<S: Into<String>>(&mut self, warning: S) {
        self.configs_skipped += 1;
        self.warnings.push(warning.into());
    }

    pub fn add_decode_error<S: Into<String>>(&mut self, error: S) {
        self.decode_errors.push(error.into());
    }

    /// Nothing skipped and every payload decoded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.decode_errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tracking() {
        let mut report = ExtractionReport::new();
        assert!(report.is_clean());

        report.skip_config("Malformed document: entry has no metadata");
        assert_eq!(report.configs_skipped, 1);
        assert!(!report.is_clean());

        report.add_decode_error("file /etc/foo: unsupported charset: klingon");
        assert_eq!(report.decode_errors.len(), 1);
    }

    #[test]
    fn test_report_serializes_counts() {
        let report = ExtractionReport {
            configs_rendered: 2,
            files_rendered: 5,
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["configs_rendered"], 2);
        assert_eq!(json["files_rendered"], 5);
        assert_eq!(json["decode_errors"].as_array().unwrap().len(), 0);
    }
}
