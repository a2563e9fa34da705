use glam::{Mat3, Vec3};

use crate::{
    collision::contact::CollisionResult,
    config::AXIS_EPSILON,
    core::{
        collider::{Collider, ColliderShape},
        rigidbody::RigidBody,
    },
};

/// Separating Axis Theorem test for oriented boxes.
pub struct SATAlgorithm;

impl SATAlgorithm {
    /// Tests two boxes (full extents `size_a`/`size_b`) oriented by their bodies.
    ///
    /// Checks the 3 face normals of each box and the 9 edge cross products,
    /// skipping degenerate cross axes. Any axis without positive overlap ends
    /// the test; otherwise the axis of least overlap is reported, oriented from
    /// box A toward box B.
    pub fn intersect_boxes(
        size_a: Vec3,
        body_a: &RigidBody,
        size_b: Vec3,
        body_b: &RigidBody,
    ) -> CollisionResult {
        let orientation_a = body_a.orientation_matrix();
        let orientation_b = body_b.orientation_matrix();
        let axes_a = [orientation_a.x_axis, orientation_a.y_axis, orientation_a.z_axis];
        let axes_b = [orientation_b.x_axis, orientation_b.y_axis, orientation_b.z_axis];

        let mut test_axes = Vec::with_capacity(15);
        test_axes.extend_from_slice(&axes_a);
        test_axes.extend_from_slice(&axes_b);
        for axis_a in &axes_a {
            for axis_b in &axes_b {
                test_axes.push(axis_a.cross(*axis_b));
            }
        }

        let half_a = size_a * 0.5;
        let half_b = size_b * 0.5;
        let relative_pos = body_b.position - body_a.position;

        let mut min_overlap = f32::MAX;
        let mut min_axis = Vec3::ZERO;

        for axis in test_axes {
            if axis.length() <= AXIS_EPSILON {
                continue;
            }
            let axis = axis.normalize();

            let extent_a = Self::projected_extent(&orientation_a, half_a, axis);
            let extent_b = Self::projected_extent(&orientation_b, half_b, axis);
            let projection = relative_pos.dot(axis);
            let overlap = extent_a + extent_b - projection.abs();

            if overlap <= 0.0 {
                return CollisionResult::none();
            }

            if overlap < min_overlap {
                min_overlap = overlap;
                min_axis = if projection < 0.0 { -axis } else { axis };
            }
        }

        if min_axis == Vec3::ZERO {
            return CollisionResult::none();
        }

        CollisionResult::contact(min_axis, min_overlap)
    }

    fn projected_extent(orientation: &Mat3, half: Vec3, axis: Vec3) -> f32 {
        (orientation.x_axis * half.x).dot(axis).abs()
            + (orientation.y_axis * half.y).dot(axis).abs()
            + (orientation.z_axis * half.z).dot(axis).abs()
    }
}

/// Pairwise narrow-phase dispatcher.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Tests `collider_a` (bound to `body_a`) against `collider_b` (bound to `body_b`).
    ///
    /// The result carries no collider handles; the caller fills `main`/`other`.
    pub fn collide(
        collider_a: &Collider,
        body_a: &RigidBody,
        collider_b: &Collider,
        body_b: &RigidBody,
    ) -> CollisionResult {
        match (collider_a.shape, collider_b.shape) {
            (ColliderShape::Sphere { radius: ra }, ColliderShape::Sphere { radius: rb }) => {
                Self::sphere_sphere(ra, body_a, rb, body_b)
            }
            (ColliderShape::Sphere { radius }, ColliderShape::Box { size }) => {
                Self::sphere_box(radius, body_a, size, body_b)
            }
            (ColliderShape::Box { size }, ColliderShape::Sphere { radius }) => {
                Self::sphere_box(radius, body_b, size, body_a)
            }
            (ColliderShape::Box { size: sa }, ColliderShape::Box { size: sb }) => {
                SATAlgorithm::intersect_boxes(sa, body_a, sb, body_b)
            }
        }
    }

    /// Colliding when the center distance is strictly below the radius sum.
    pub fn sphere_sphere(
        radius_a: f32,
        body_a: &RigidBody,
        radius_b: f32,
        body_b: &RigidBody,
    ) -> CollisionResult {
        let offset = body_b.position - body_a.position;
        let distance = offset.length();
        let radius_sum = radius_a + radius_b;

        if distance < radius_sum {
            CollisionResult::contact(offset.normalize_or(Vec3::Y), radius_sum - distance)
        } else {
            CollisionResult::none()
        }
    }

    /// Closest-point test in the box's local frame. Colliding when the closest
    /// point on the box lies within (or exactly on) the sphere.
    pub fn sphere_box(
        radius: f32,
        sphere: &RigidBody,
        size: Vec3,
        cuboid: &RigidBody,
    ) -> CollisionResult {
        let orientation = cuboid.orientation_matrix();
        let half = size * 0.5;

        let local_center = orientation.transpose() * (sphere.position - cuboid.position);
        let closest_local = local_center.clamp(-half, half);
        let closest = cuboid.position + orientation * closest_local;

        let distance = sphere.position.distance(closest);
        if distance > radius {
            return CollisionResult::none();
        }

        // Center inside the box: there is no surface direction, push along the
        // center line instead.
        let normal = if distance > f32::EPSILON {
            (closest - sphere.position) / distance
        } else {
            (cuboid.position - sphere.position).normalize_or(Vec3::Y)
        };

        CollisionResult::contact(normal, radius - distance)
    }
}
