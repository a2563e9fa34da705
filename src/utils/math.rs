//! Euler-angle helpers layered on top of `glam`.

use glam::{EulerRot, Mat3, Quat, Vec3};

/// Quaternion from Euler angles in radians, applied X then Y then Z (q = qz * qy * qx).
pub fn quat_from_euler(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::ZYX, angles.z, angles.y, angles.x)
}

/// Quaternion from Euler angles given in degrees.
pub fn quat_from_euler_degrees(degrees: Vec3) -> Quat {
    quat_from_euler(to_radians(degrees))
}

/// Extracts Euler angles in degrees matching [`quat_from_euler_degrees`].
pub fn euler_degrees_from_quat(rotation: Quat) -> Vec3 {
    let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
    to_degrees(Vec3::new(x, y, z))
}

/// Yaw (Y), pitch (X), roll (Z) rotation matrix, `R = Ry * Rx * Rz`. Angles in radians.
pub fn yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat3 {
    Mat3::from_euler(EulerRot::YXZ, yaw, pitch, roll)
}

pub fn to_radians(degrees: Vec3) -> Vec3 {
    degrees * (std::f32::consts::PI / 180.0)
}

pub fn to_degrees(radians: Vec3) -> Vec3 {
    radians * (180.0 / std::f32::consts::PI)
}

/// Replaces a vector containing any NaN component with zero.
pub fn zero_if_nan(v: Vec3) -> Vec3 {
    if v.is_nan() {
        Vec3::ZERO
    } else {
        v
    }
}

/// Inverse that degrades to zero for singular matrices instead of producing NaN/inf.
pub fn inverse_or_zero(m: Mat3) -> Mat3 {
    if m.determinant().abs() < f32::EPSILON {
        Mat3::ZERO
    } else {
        m.inverse()
    }
}
