//! Frame scheduler.
//!
//! Holds the resolved phase order and the systems registered to each phase.
//! [`FrameScheduler::run_frame`] walks the phases in order and runs every
//! system of each phase in registration order, one at a time, on the calling
//! thread. Each system is invoked exactly once per frame, so a system in a
//! later phase always observes the effects of every system before it.

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::resources::worldcontext::WorldContext;
use crate::schedule::phase::{PhaseError, PhaseGraph, PhaseId};
use crate::schedule::system::FrameSystem;

struct PhaseSlot {
    id: PhaseId,
    systems: Vec<FrameSystem>,
}

pub struct FrameScheduler {
    phases: Vec<PhaseSlot>,
    frame_count: u64,
}

impl FrameScheduler {
    /// Resolve the graph once. Cycles and missing predecessors are fatal.
    pub fn new(graph: &PhaseGraph) -> Result<Self, PhaseError> {
        let order = graph.resolve()?;
        info!(
            "Phase order: {}",
            order
                .iter()
                .map(PhaseId::as_str)
                .collect::<Vec<_>>()
                .join(" -> ")
        );
        Ok(Self {
            phases: order
                .into_iter()
                .map(|id| PhaseSlot {
                    id,
                    systems: Vec::new(),
                })
                .collect(),
            frame_count: 0,
        })
    }

    /// Append a system to a phase. Systems within a phase run in the order added.
    pub fn add_system(
        &mut self,
        phase: PhaseId,
        system: FrameSystem,
    ) -> Result<&mut Self, PhaseError> {
        let Some(slot) = self.phases.iter_mut().find(|slot| slot.id == phase) else {
            return Err(PhaseError::UnknownPhase(phase.as_str()));
        };
        debug!("Registered system '{}' in phase '{}'", system.name(), phase);
        slot.systems.push(system);
        Ok(self)
    }

    /// Run one frame: every phase in order, every system once.
    pub fn run_frame(&mut self, world: &mut World, ctx: &mut WorldContext) {
        for slot in &mut self.phases {
            trace!("phase {}", slot.id);
            for system in &mut slot.systems {
                trace!("  system {}", system.name());
                system.run(world, ctx);
            }
        }
        self.frame_count += 1;
    }

    pub fn phase_order(&self) -> Vec<PhaseId> {
        self.phases.iter().map(|slot| slot.id).collect()
    }

    /// System names in execution order.
    pub fn system_names(&self) -> Vec<&'static str> {
        self.phases
            .iter()
            .flat_map(|slot| slot.systems.iter().map(FrameSystem::name))
            .collect()
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
