pub mod document_classifier;
pub mod name_filter;

pub use document_classifier::{classify, collect_machine_configs, read_documents};
pub use name_filter::NameFilter;
