//! Pending request to throw dynamic bodies back into the air.

use bevy_ecs::prelude::Resource;

/// Set by input handling, consumed by the respawn system in the logic phase.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct RespawnRequest {
    pending: bool,
}

impl RespawnRequest {
    pub fn request(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the request, returning whether one was pending.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}
