//! Frame systems.
//!
//! A [`FrameSystem`] is one unit of per-frame work. It comes in two kinds:
//!
//! - **Unconditional** – no data requirements; invoked once per frame.
//!   Render brackets are of this kind.
//! - **Per-entity** – declares a set of required component types; invoked once
//!   per frame with the batch of entities carrying all of them.
//!
//! Both kinds receive the ECS [`World`] and the frame's
//! [`WorldContext`] explicitly.

use bevy_ecs::component::ComponentId;
use bevy_ecs::prelude::*;
use bevy_ecs::query::{QueryBuilder, QueryState};

use crate::resources::worldcontext::WorldContext;

/// Callback of an unconditional system.
pub type UnconditionalFn = Box<dyn FnMut(&mut World, &mut WorldContext)>;

/// Callback of a per-entity system; receives the matching entities.
pub type PerEntityFn = Box<dyn FnMut(&mut World, &mut WorldContext, &[Entity])>;

/// Component types an entity must carry to be handed to a per-entity system.
#[derive(Debug, Clone, Default)]
pub struct Requirements {
    ids: Vec<ComponentId>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require component `T`, registering it with the world if needed.
    pub fn with<T: Component>(mut self, world: &mut World) -> Self {
        let id = world.register_component::<T>();
        if !self.ids.contains(&id) {
            self.ids.push(id);
        }
        self
    }

    pub fn ids(&self) -> &[ComponentId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub enum SystemKind {
    Unconditional(UnconditionalFn),
    PerEntity {
        requirements: Requirements,
        query: QueryState<Entity>,
        run: PerEntityFn,
        // Reused between frames to avoid reallocating the batch.
        batch: Vec<Entity>,
    },
}

pub struct FrameSystem {
    name: &'static str,
    kind: SystemKind,
}

impl FrameSystem {
    pub fn unconditional(
        name: &'static str,
        run: impl FnMut(&mut World, &mut WorldContext) + 'static,
    ) -> Self {
        Self {
            name,
            kind: SystemKind::Unconditional(Box::new(run)),
        }
    }

    /// Build a per-entity system. The entity query is created once here.
    ///
    /// Empty requirements match every entity.
    pub fn per_entity(
        name: &'static str,
        requirements: Requirements,
        world: &mut World,
        run: impl FnMut(&mut World, &mut WorldContext, &[Entity]) + 'static,
    ) -> Self {
        let mut builder = QueryBuilder::<Entity>::new(world);
        for id in requirements.ids() {
            builder.with_id(*id);
        }
        let query = builder.build();
        Self {
            name,
            kind: SystemKind::PerEntity {
                requirements,
                query,
                run: Box::new(run),
                batch: Vec::new(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &SystemKind {
        &self.kind
    }

    /// Declared requirements; empty for unconditional systems.
    pub fn requirements(&self) -> &[ComponentId] {
        match &self.kind {
            SystemKind::Unconditional(_) => &[],
            SystemKind::PerEntity { requirements, .. } => requirements.ids(),
        }
    }

    /// Invoke the system exactly once.
    pub fn run(&mut self, world: &mut World, ctx: &mut WorldContext) {
        match &mut self.kind {
            SystemKind::Unconditional(run) => run(world, ctx),
            SystemKind::PerEntity {
                query, run, batch, ..
            } => {
                batch.clear();
                batch.extend(query.iter(world));
                run(world, ctx, batch);
            }
        }
    }
}
