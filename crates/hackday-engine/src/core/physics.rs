use glam::Vec2;
use rapier2d::prelude::*;

use crate::core::kinematics::{Kinematics, Rect};

// ---------------------------------------------------------------------------
// glam <-> nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Rapier2D-backed top-down world: fixed cuboids for blockers and one
/// rotation-locked dynamic body driven purely by velocity (no gravity).
pub struct PhysicsWorld {
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    body: Option<RigidBodyHandle>,
    bounds: Option<Rect>,
    half_extents: Vec2,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            body: None,
            bounds: None,
            half_extents: Vec2::ZERO,
        }
    }

    /// Number of rigid bodies (blockers plus the mover).
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    fn remove_mover(&mut self) {
        if let Some(handle) = self.body.take() {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    fn clamp_to_bounds(&mut self) {
        let (Some(handle), Some(b)) = (self.body, self.bounds) else {
            return;
        };
        let Some(rb) = self.bodies.get_mut(handle) else {
            return;
        };
        let pos = na_to_vec2(rb.translation());
        let min = Vec2::new(b.x, b.y) + self.half_extents;
        let max = (Vec2::new(b.right(), b.bottom()) - self.half_extents).max(min);
        let clamped = pos.clamp(min, max);
        if clamped != pos {
            let mut vel = na_to_vec2(rb.linvel());
            if clamped.x != pos.x {
                vel.x = 0.0;
            }
            if clamped.y != pos.y {
                vel.y = 0.0;
            }
            rb.set_translation(vec2_to_na(clamped), true);
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl Kinematics for PhysicsWorld {
    fn add_static(&mut self, rect: Rect) {
        let rb = RigidBodyBuilder::fixed()
            .translation(vec2_to_na(rect.center()))
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(rect.w * 0.5, rect.h * 0.5)
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
    }

    fn spawn_body(&mut self, pos: Vec2, half_extents: Vec2) {
        self.remove_mover();
        let rb = RigidBodyBuilder::dynamic()
            .translation(vec2_to_na(pos))
            .gravity_scale(0.0)
            .locked_axes(LockedAxes::ROTATION_LOCKED)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(rb);
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        self.body = Some(handle);
        self.half_extents = half_extents;
    }

    fn set_bounds(&mut self, bounds: Rect) {
        self.bounds = Some(bounds);
    }

    fn set_velocity(&mut self, vel: Vec2) {
        if let Some(rb) = self.body.and_then(|h| self.bodies.get_mut(h)) {
            rb.set_linvel(vec2_to_na(vel), true);
        }
    }

    fn velocity(&self) -> Vec2 {
        self.body
            .and_then(|h| self.bodies.get(h))
            .map(|rb| na_to_vec2(rb.linvel()))
            .unwrap_or(Vec2::ZERO)
    }

    fn position(&self) -> Vec2 {
        self.body
            .and_then(|h| self.bodies.get(h))
            .map(|rb| na_to_vec2(rb.translation()))
            .unwrap_or(Vec2::ZERO)
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &nalgebra::Vector2::zeros(),
            &self.integration_parameters,
            &mut self.island_manager,
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
        self.clamp_to_bounds();
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
