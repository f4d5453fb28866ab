//! Reference from an entity to a loaded model.
//!
//! raylib models are not `Send`, so they live in the non-send
//! [`ModelStore`](crate::resources::modelstore::ModelStore) and entities only
//! keep the key.

use bevy_ecs::prelude::Component;

#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct ModelRef {
    pub key: String,
}

impl ModelRef {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}
