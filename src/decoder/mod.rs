pub mod charset;
pub mod data_url;

pub use charset::Charset;
pub use data_url::{decode_data, DataUrl, PayloadKind};
