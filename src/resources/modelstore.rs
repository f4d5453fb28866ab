//! Loaded raylib models keyed by name.
//!
//! Inserted as a non-send resource; models are unloaded when the store drops.

use raylib::ffi;
use raylib::prelude::Model;
use rustc_hash::FxHashMap;

pub struct ModelStore {
    pub map: FxHashMap<String, Model>,
}

impl Default for ModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore {
    pub fn new() -> Self {
        ModelStore {
            map: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, model: Model) {
        self.map.insert(key.into(), model);
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&Model> {
        self.map.get(key.as_ref())
    }

    /// Load a unit cube mesh as a model. Scale comes from the entity transform.
    ///
    /// Needs an open window (GPU upload).
    pub fn load_unit_cube(&mut self, key: impl Into<String>) {
        let model = unsafe {
            let mesh = ffi::GenMeshCube(1.0, 1.0, 1.0);
            Model::from_raw(ffi::LoadModelFromMesh(mesh))
        };
        self.insert(key, model);
    }
}
