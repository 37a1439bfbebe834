pub mod data;
pub mod logging;
pub mod report;
pub mod util;

pub use data::{DataConfig, DataDirectory, StorageError};
pub use logging::init_logging;
