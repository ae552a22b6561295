pub mod config;
pub mod stream;

pub use config::ParserConfig;
pub use stream::{ParseSummary, StreamingXmlParser};
