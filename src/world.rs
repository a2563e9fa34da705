use glam::{Mat3, Vec3};
use log::{debug, warn};

use crate::{
    collision::{contact::CollisionResult, narrowphase::NarrowPhase},
    config::DEFAULT_GRAVITY,
    core::{
        collider::{Collider, ColliderShape},
        rigidbody::RigidBody,
    },
    dynamics::{integrator::Integrator, solver::CollisionSolver},
    utils::{
        allocator::{Arena, EntityId},
        logging::ScopedTimer,
    },
};

/// Read-only wireframe description handed to a debug renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShape {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    Box {
        center: Vec3,
        orientation: Mat3,
        half_size: Vec3,
    },
}

/// A scene's physics manager: owns every rigid body and collider.
///
/// Bodies and colliders live in generational arenas; separate order lists keep
/// registration order, which is the order integration and collision testing
/// walk them in.
pub struct PhysicsWorld {
    bodies: Arena<RigidBody>,
    colliders: Arena<Collider>,
    body_order: Vec<EntityId>,
    collider_order: Vec<EntityId>,
    pub gravity: Vec3,
    pub integrator: Integrator,
    pub solver: CollisionSolver,
    contacts: Vec<CollisionResult>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self::with_gravity(Vec3::from_array(DEFAULT_GRAVITY))
    }

    pub fn with_gravity(gravity: Vec3) -> Self {
        Self {
            bodies: Arena::new(),
            colliders: Arena::new(),
            body_order: Vec::new(),
            collider_order: Vec::new(),
            gravity,
            integrator: Integrator::default(),
            solver: CollisionSolver::default(),
            contacts: Vec::new(),
        }
    }

    /// Registers a body. Gravity for its first tick is queued immediately.
    pub fn add_body(&mut self, mut body: RigidBody) -> EntityId {
        body.recompute_inv_mass();
        body.apply_force(self.gravity * body.mass);
        let id = self.bodies.insert(body);
        self.body_order.push(id);
        debug!("registered rigid body {id:?}");
        id
    }

    /// Removes a body and unbinds any collider that pointed at it.
    pub fn remove_body(&mut self, id: EntityId) -> Option<RigidBody> {
        let body = self.bodies.remove(id)?;
        self.body_order.retain(|other| *other != id);
        if let Some(collider) = body.collider.and_then(|c| self.colliders.get_mut(c)) {
            if collider.body == Some(id) {
                collider.body = None;
            }
        }
        debug!("removed rigid body {id:?}");
        Some(body)
    }

    pub fn add_collider(&mut self, collider: Collider) -> EntityId {
        let body = collider.body;
        let id = self.colliders.insert(collider);
        self.collider_order.push(id);
        if let Some(body) = body {
            self.bind(id, body);
        }
        debug!("registered collider {id:?}");
        id
    }

    /// Removes a collider and clears the back-reference of the body it was bound to.
    pub fn remove_collider(&mut self, id: EntityId) -> Option<Collider> {
        let collider = self.colliders.remove(id)?;
        self.collider_order.retain(|other| *other != id);
        if let Some(body) = collider.body.and_then(|b| self.bodies.get_mut(b)) {
            if body.collider == Some(id) {
                body.collider = None;
            }
        }
        debug!("removed collider {id:?}");
        Some(collider)
    }

    /// Binds `collider` and `body` to each other. Returns `false` for stale handles.
    pub fn bind(&mut self, collider: EntityId, body: EntityId) -> bool {
        if !self.bodies.contains(body) {
            return false;
        }
        let Some(stored) = self.colliders.get_mut(collider) else {
            return false;
        };
        stored.body = Some(body);
        if let Some(stored) = self.bodies.get_mut(body) {
            stored.collider = Some(collider);
        }
        true
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn collider(&self, id: EntityId) -> Option<&Collider> {
        self.colliders.get(id)
    }

    pub fn collider_mut(&mut self, id: EntityId) -> Option<&mut Collider> {
        self.colliders.get_mut(id)
    }

    /// Bodies in registration order.
    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> + '_ {
        self.body_order
            .iter()
            .filter_map(|id| self.bodies.get(*id).map(|body| (*id, body)))
    }

    /// Colliders in registration order.
    pub fn colliders(&self) -> impl Iterator<Item = (EntityId, &Collider)> + '_ {
        self.collider_order
            .iter()
            .filter_map(|id| self.colliders.get(*id).map(|collider| (*id, collider)))
    }

    pub fn body_count(&self) -> usize {
        self.body_order.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_order.len()
    }

    /// Collisions resolved during the most recent [`PhysicsWorld::update`].
    pub fn contacts(&self) -> &[CollisionResult] {
        &self.contacts
    }

    /// Wireframes for every collider bound to a live body.
    pub fn debug_shapes(&self) -> Vec<DebugShape> {
        self.colliders()
            .filter_map(|(_, collider)| {
                let body = self.bodies.get(collider.body?)?;
                Some(match collider.shape {
                    ColliderShape::Sphere { radius } => DebugShape::Sphere {
                        center: body.position,
                        radius,
                    },
                    ColliderShape::Box { .. } => DebugShape::Box {
                        center: body.position,
                        orientation: body.orientation_matrix(),
                        half_size: collider.half_size()?,
                    },
                })
            })
            .collect()
    }

    /// Advances the simulation by one frame.
    ///
    /// Integrates every body, then for each collider (in registration order)
    /// finds the *first* other collider it overlaps and resolves only that
    /// contact. The first hit wins, not the deepest.
    pub fn update(&mut self, dt: f32) {
        {
            let _timer = ScopedTimer::new("physics::integrate");
            self.integrate(dt);
        }
        let _timer = ScopedTimer::new("physics::collide");
        self.contacts.clear();

        let order = self.collider_order.clone();
        for &main in &order {
            let Some(result) = self.first_collision(main, &order) else {
                continue;
            };

            if self.has_nan_position(&result) {
                warn!("skipping collision {main:?} with NaN body position");
                continue;
            }

            self.resolve_collision(&result);
            self.contacts.push(result);
        }
    }

    /// Tests two registered colliders against each other without resolving.
    pub fn check_collision(&self, main: EntityId, other: EntityId) -> CollisionResult {
        let pair = self
            .collider_with_body(main)
            .zip(self.collider_with_body(other));
        match pair {
            Some(((collider_a, body_a), (collider_b, body_b))) => {
                NarrowPhase::collide(collider_a, body_a, collider_b, body_b).between(main, other)
            }
            None => CollisionResult::none(),
        }
    }

    /// Applies collision response for `result`, dispatching on the concrete
    /// shape pair. Mixed pairs always resolve with the sphere first.
    pub fn resolve_collision(&mut self, result: &CollisionResult) {
        let (Some(main), Some(other)) = (result.main, result.other) else {
            return;
        };
        let Some((main_shape, main_body)) = self.bound_shape(main) else {
            return;
        };
        let Some((other_shape, other_body)) = self.bound_shape(other) else {
            return;
        };

        let solver = self.solver;
        match (main_shape, other_shape) {
            (ColliderShape::Box { .. }, ColliderShape::Box { .. }) => {
                if let Some((a, b)) = self.bodies.get2_mut(main_body, other_body) {
                    solver.resolve_box_box(a, b, result);
                }
            }
            (ColliderShape::Sphere { .. }, ColliderShape::Sphere { .. }) => {
                if let Some((a, b)) = self.bodies.get2_mut(main_body, other_body) {
                    solver.resolve_sphere_sphere(a, b, result);
                }
            }
            (ColliderShape::Sphere { .. }, ColliderShape::Box { .. }) => {
                if let Some((sphere, cuboid)) = self.bodies.get2_mut(main_body, other_body) {
                    solver.resolve_sphere_box(sphere, cuboid, result);
                }
            }
            (ColliderShape::Box { .. }, ColliderShape::Sphere { .. }) => {
                if let Some((sphere, cuboid)) = self.bodies.get2_mut(other_body, main_body) {
                    solver.resolve_sphere_box(sphere, cuboid, result);
                }
            }
        }
    }

    fn integrate(&mut self, dt: f32) {
        for &id in &self.body_order {
            let shape = self
                .bodies
                .get(id)
                .and_then(|body| body.collider)
                .and_then(|collider| self.colliders.get(collider))
                .map(|collider| collider.shape);
            if let Some(body) = self.bodies.get_mut(id) {
                self.integrator
                    .integrate(body, shape.as_ref(), self.gravity, dt);
            }
        }
    }

    fn first_collision(&self, main: EntityId, order: &[EntityId]) -> Option<CollisionResult> {
        self.collider_with_body(main)?;
        order
            .iter()
            .filter(|&&other| other != main)
            .filter(|&&other| self.collider_with_body(other).is_some())
            .map(|&other| self.check_collision(main, other))
            .find(|result| result.is_colliding)
    }

    fn has_nan_position(&self, result: &CollisionResult) -> bool {
        [result.main, result.other]
            .into_iter()
            .flatten()
            .filter_map(|id| self.collider_with_body(id))
            .any(|(_, body)| body.has_nan_position())
    }

    fn collider_with_body(&self, id: EntityId) -> Option<(&Collider, &RigidBody)> {
        let collider = self.colliders.get(id)?;
        let body = self.bodies.get(collider.body?)?;
        Some((collider, body))
    }

    fn bound_shape(&self, id: EntityId) -> Option<(ColliderShape, EntityId)> {
        let collider = self.colliders.get(id)?;
        let body = collider.body.filter(|body| self.bodies.contains(*body))?;
        Some((collider.shape, body))
    }
}
