use glam::{Mat3, Vec3};

/// Helper methods for inertia calculations.
pub trait InertiaTensorExt {
    /// Solid cuboid; `size` holds the full edge lengths.
    fn for_solid_box(size: Vec3, mass: f32) -> Mat3;
    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3;
}

impl InertiaTensorExt for Mat3 {
    fn for_solid_box(size: Vec3, mass: f32) -> Mat3 {
        let (w, h, d) = (size.x, size.y, size.z);
        let factor = mass / 12.0;
        Mat3::from_diagonal(Vec3::new(
            factor * (h * h + d * d),
            factor * (w * w + d * d),
            factor * (w * w + h * h),
        ))
    }

    fn for_solid_sphere(radius: f32, mass: f32) -> Mat3 {
        let value = 2.0 / 5.0 * mass * radius * radius;
        Mat3::from_diagonal(Vec3::splat(value))
    }
}
