pub mod dataset;
pub mod errors;
pub mod filter;
pub mod logging;
pub mod root;

pub use dataset::DatasetConfig;
pub use errors::ConfigError;
pub use filter::FilterConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use root::{CliOverrides, Config};
