//! Dataset Cache Module
//! Memoizes the load → reshape → join pipeline per set of input files.

use crate::data::loader::{DataLoader, DatasetPaths, LoaderError};
use crate::data::processor::{DataProcessor, ProcessorError};
use crate::data::table::UnifiedTable;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Process(#[from] ProcessorError),
}

/// Run the whole pipeline once, without caching.
pub fn load_unified(paths: &DatasetPaths) -> Result<UnifiedTable, PipelineError> {
    let raw = DataLoader::load_all(paths)?;
    Ok(DataProcessor::build_unified(&raw)?)
}

/// Process-lifetime cache of unified tables keyed by their three source paths.
#[derive(Default)]
pub struct DatasetCache {
    entries: HashMap<DatasetPaths, Arc<UnifiedTable>>,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `paths`, building it on first use.
    pub fn get_or_load(&mut self, paths: &DatasetPaths) -> Result<Arc<UnifiedTable>, PipelineError> {
        if let Some(table) = self.entries.get(paths) {
            tracing::debug!("unified table served from cache");
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(load_unified(paths)?);
        self.entries.insert(paths.clone(), Arc::clone(&table));
        Ok(table)
    }

    /// Number of distinct path sets loaded so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
