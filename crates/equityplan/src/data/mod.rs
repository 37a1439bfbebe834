pub mod sample;
pub mod storage;

pub use storage::{DataConfig, DataDirectory, StorageError};
