//! Rigid-body physics world.
//!
//! [`PhysicsWorld`] owns every rapier structure needed to step a simulation
//! (body and collider sets, pipeline, broad/narrow phase, solvers) and exposes
//! the narrow interface the frame loop needs: advance the clock, read and
//! write body poses by handle, create and destroy bodies.
//!
//! Bodies are addressed through [`BodyHandle`], a copy of rapier's
//! index/generation handle. A handle whose body was destroyed keeps its old
//! generation, so every accessor returns `None` (or `false`) for it instead
//! of touching a recycled slot.
//!
//! # Stepping
//!
//! [`PhysicsWorld::advance_frame`] applies the configured [`StepPolicy`]:
//! - `PerFrame` advances exactly one fixed step per call, whatever the frame
//!   delta was. Simulation speed follows the frame rate.
//! - `Accumulated` feeds the frame delta into an accumulator and runs zero or
//!   more fixed steps, capped at `max_steps`; the backlog above the cap is
//!   dropped.

use log::{debug, info};
use rapier3d::na::{Quaternion as NaQuaternion, Translation3, UnitQuaternion};
use rapier3d::prelude::*;
use raylib::math::{Quaternion, Vector3};
use thiserror::Error;

/// Default fixed simulation step (60 Hz).
pub const DEFAULT_FIXED_STEP: f32 = 1.0 / 60.0;
const DEFAULT_GRAVITY_Y: f32 = -9.81;
const DEFAULT_MAX_STEPS: u32 = 5;

/// Errors raised while creating the physics world. Fatal at startup.
#[derive(Debug, Error, PartialEq)]
pub enum PhysicsError {
    #[error("Invalid fixed step: {0} (must be finite and > 0)")]
    InvalidFixedStep(f32),

    #[error("Invalid substep count: {0} (must be >= 1)")]
    InvalidSubsteps(u32),

    #[error("Invalid max steps per frame: {0} (must be >= 1)")]
    InvalidMaxSteps(u32),

    #[error("Invalid gravity: {0}")]
    InvalidGravity(f32),
}

/// How frame time is converted into fixed physics steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StepPolicy {
    /// One fixed step per rendered frame.
    #[default]
    PerFrame,
    /// Zero or more fixed steps per frame driven by elapsed frame time.
    Accumulated { max_steps: u32 },
}

/// Creation parameters for a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsSettings {
    /// Fixed simulation step in seconds.
    pub fixed_step: f32,
    /// Collision substeps per fixed step.
    pub substeps: u32,
    /// Vertical gravity in m/s².
    pub gravity_y: f32,
    pub policy: StepPolicy,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            fixed_step: DEFAULT_FIXED_STEP,
            substeps: 1,
            gravity_y: DEFAULT_GRAVITY_Y,
            policy: StepPolicy::PerFrame,
        }
    }
}

impl PhysicsSettings {
    /// Accumulator policy with the default step cap.
    pub fn accumulated() -> Self {
        Self {
            policy: StepPolicy::Accumulated {
                max_steps: DEFAULT_MAX_STEPS,
            },
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<(), PhysicsError> {
        if !self.fixed_step.is_finite() || self.fixed_step <= 0.0 {
            return Err(PhysicsError::InvalidFixedStep(self.fixed_step));
        }
        if self.substeps == 0 {
            return Err(PhysicsError::InvalidSubsteps(self.substeps));
        }
        if let StepPolicy::Accumulated { max_steps } = self.policy {
            if max_steps == 0 {
                return Err(PhysicsError::InvalidMaxSteps(max_steps));
            }
        }
        if !self.gravity_y.is_finite() {
            return Err(PhysicsError::InvalidGravity(self.gravity_y));
        }
        Ok(())
    }
}

/// Generation-tagged reference to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// Motion type of a created body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    Static,
    Dynamic,
}

/// Description of a box-shaped body.
#[derive(Debug, Clone, Copy)]
pub struct BoxBody {
    pub half_extents: Vector3,
    pub position: Vector3,
    pub rotation: Quaternion,
    pub motion: Motion,
}

/// Counts fixed steps taken since the world was created.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhysicsClock {
    pub steps: u64,
    pub simulated: f64,
}

pub struct PhysicsWorld {
    settings: PhysicsSettings,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    clock: PhysicsClock,
    accumulator: f32,
}

fn to_na_vector(v: Vector3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

fn to_na_rotation(q: Quaternion) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(NaQuaternion::new(q.w, q.x, q.y, q.z))
}

fn from_na_rotation(q: &UnitQuaternion<Real>) -> Quaternion {
    let c = q.coords;
    Quaternion {
        x: c.x,
        y: c.y,
        z: c.z,
        w: c.w,
    }
}

impl PhysicsWorld {
    /// Create an empty world. Invalid settings abort creation.
    pub fn new(settings: PhysicsSettings) -> Result<Self, PhysicsError> {
        settings.validate()?;
        info!(
            "Physics world: step={:.5}s substeps={} gravity={:.2} policy={:?}",
            settings.fixed_step, settings.substeps, settings.gravity_y, settings.policy
        );
        Ok(Self {
            settings,
            gravity: vector![0.0, settings.gravity_y, 0.0],
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            clock: PhysicsClock::default(),
            accumulator: 0.0,
        })
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    pub fn clock(&self) -> PhysicsClock {
        self.clock
    }

    pub fn gravity(&self) -> Vector3 {
        Vector3 {
            x: self.gravity.x,
            y: self.gravity.y,
            z: self.gravity.z,
        }
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Advance the simulation by `dt` seconds split into `substeps` collision steps.
    ///
    /// Blocks until the step is complete.
    pub fn advance(&mut self, dt: f32, substeps: u32) {
        let substeps = substeps.max(1);
        self.integration_parameters.dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.pipeline.step(
                &self.gravity,
                &self.integration_parameters,
                &mut self.islands,
                &mut self.broad_phase,
                &mut self.narrow_phase,
                &mut self.bodies,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                &mut self.ccd_solver,
                Some(&mut self.query_pipeline),
                &(),
                &(),
            );
        }
        self.clock.steps += 1;
        self.clock.simulated += f64::from(dt);
    }

    /// Advance according to the step policy. Returns the number of fixed steps taken.
    pub fn advance_frame(&mut self, frame_delta: f32) -> u32 {
        let step = self.settings.fixed_step;
        let substeps = self.settings.substeps;
        match self.settings.policy {
            StepPolicy::PerFrame => {
                self.advance(step, substeps);
                1
            }
            StepPolicy::Accumulated { max_steps } => {
                self.accumulator += frame_delta.max(0.0);
                let mut taken = 0;
                while self.accumulator >= step && taken < max_steps {
                    self.advance(step, substeps);
                    self.accumulator -= step;
                    taken += 1;
                }
                if self.accumulator >= step {
                    debug!(
                        "Physics backlog of {:.4}s dropped after {} steps",
                        self.accumulator, taken
                    );
                    self.accumulator %= step;
                }
                taken
            }
        }
    }

    /// Create a box body with a cuboid collider and return its handle.
    pub fn create_box(&mut self, desc: BoxBody) -> BodyHandle {
        let builder = match desc.motion {
            Motion::Static => RigidBodyBuilder::fixed(),
            Motion::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let isometry = Isometry::from_parts(
            Translation3::from(to_na_vector(desc.position)),
            to_na_rotation(desc.rotation),
        );
        let handle = self.bodies.insert(builder.position(isometry).build());
        let collider = ColliderBuilder::cuboid(
            desc.half_extents.x,
            desc.half_extents.y,
            desc.half_extents.z,
        )
        .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        debug!("Created {:?} box body {:?}", desc.motion, handle);
        BodyHandle(handle)
    }

    /// Remove a body and its colliders. Returns false for an already stale handle.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.islands,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    pub fn is_valid(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    pub fn is_dynamic(&self, handle: BodyHandle) -> bool {
        self.bodies
            .get(handle.0)
            .is_some_and(|body| body.is_dynamic())
    }

    /// World-space center of mass.
    pub fn body_position(&self, handle: BodyHandle) -> Option<Vector3> {
        let com = self.bodies.get(handle.0)?.center_of_mass();
        Some(Vector3 {
            x: com.x,
            y: com.y,
            z: com.z,
        })
    }

    pub fn body_orientation(&self, handle: BodyHandle) -> Option<Quaternion> {
        let body = self.bodies.get(handle.0)?;
        Some(from_na_rotation(body.rotation()))
    }

    pub fn body_linear_velocity(&self, handle: BodyHandle) -> Option<Vector3> {
        let v = self.bodies.get(handle.0)?.linvel();
        Some(Vector3 {
            x: v.x,
            y: v.y,
            z: v.z,
        })
    }

    /// Teleport a body. Wakes it up.
    pub fn set_body_position(&mut self, handle: BodyHandle, position: Vector3) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        body.set_translation(to_na_vector(position), true);
        true
    }

    pub fn set_body_orientation(&mut self, handle: BodyHandle, rotation: Quaternion) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        body.set_rotation(to_na_rotation(rotation), true);
        true
    }

    pub fn set_body_linear_velocity(&mut self, handle: BodyHandle, velocity: Vector3) -> bool {
        let Some(body) = self.bodies.get_mut(handle.0) else {
            return false;
        };
        body.set_linvel(to_na_vector(velocity), true);
        true
    }
}
