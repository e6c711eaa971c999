use std::{collections::HashMap, path::PathBuf, sync::RwLock};

use crate::SourceId;

/// Maps file paths to compact [SourceId]s and back.
///
/// All state sits behind `RwLock`s so the engine can be shared by reference
/// between every pass that needs to name a file.
#[derive(Debug, Default)]
pub struct SourceEngine {
    next_id: RwLock<u32>,
    source_map: RwLock<HashMap<PathBuf, SourceId>>,
    path_map: RwLock<HashMap<SourceId, PathBuf>>,
}

impl SourceEngine {
    /// Returns the id already assigned to `path`, or assigns a fresh one.
    pub fn get_source_id(&self, path: &PathBuf) -> SourceId {
        if let Some(source_id) = self.source_map.read().unwrap().get(path) {
            return *source_id;
        }

        let mut next_id = self.next_id.write().unwrap();
        let mut source_map = self.source_map.write().unwrap();
        // Another writer may have registered the path between the two locks.
        if let Some(source_id) = source_map.get(path) {
            return *source_id;
        }
        let source_id = SourceId::new(*next_id);
        *next_id += 1;
        source_map.insert(path.clone(), source_id);
        self.path_map
            .write()
            .unwrap()
            .insert(source_id, path.clone());
        source_id
    }

    pub fn get_path(&self, source_id: &SourceId) -> Option<PathBuf> {
        self.path_map.read().unwrap().get(source_id).cloned()
    }
}
