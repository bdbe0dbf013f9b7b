//! Data module - CSV loading, reshaping, joining and filtering

mod cache;
mod loader;
mod processor;
mod table;

pub use cache::DatasetCache;
pub use loader::{DatasetPaths, Metric};
pub use processor::ProcessorError;
pub use table::{Selection, SelectionOutcome, UnifiedRow, UnifiedTable};
