//! Dataset loading, summary statistics and train/test splitting

pub mod dataset;
pub mod loader;
pub mod processor;

pub use dataset::{DatasetSummary, HeartDataset};
pub use loader::{DatasetError, DatasetLoader, N_COLUMNS};
pub use processor::StandardScaler;
