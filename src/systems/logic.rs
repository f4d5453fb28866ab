//! Game logic hook for the logic phase.

use bevy_ecs::prelude::*;
use log::trace;

use crate::resources::worldcontext::WorldContext;
use crate::resources::worldtime::WorldTime;
use crate::schedule::system::FrameSystem;

pub const LOGIC_UPDATE: &str = "logic_update";

/// Per-frame logic entry point. Scene logic is driven by physics for now.
pub fn logic_update_system(world: &mut World, _ctx: &mut WorldContext) {
    if let Some(time) = world.get_resource::<WorldTime>() {
        trace!("logic frame {} at {:.3}s", time.frame_count, time.elapsed);
    }
}

pub fn logic_update() -> FrameSystem {
    FrameSystem::unconditional(LOGIC_UPDATE, logic_update_system)
}
