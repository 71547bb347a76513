pub mod config_extractor;
pub mod renderer;
pub mod report;

pub use config_extractor::ConfigExtractor;
pub use renderer::Renderer;
pub use report::ExtractionReport;
