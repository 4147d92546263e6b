// Transform utilities for Mat4
//
// glam::Mat4 already provides transform_point3(), transform_vector3() and inverse().

use glam::{Mat4, Vec3};

/// Extension trait for Mat4 to provide model placement helpers
pub trait Mat4Ext {
    /// Model matrix applying translation first, then the Y rotation, then the scale.
    fn placement(scale: Vec3, rotate_y_degrees: f32, translation: Vec3) -> Mat4;

    /// Transform a surface normal by the inverse transpose and renormalize.
    ///
    /// Unlike `transform_vector3`, this stays perpendicular to transformed
    /// surfaces under non-uniform scale. Degenerate normals map to zero.
    fn transform_normal(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn placement(scale: Vec3, rotate_y_degrees: f32, translation: Vec3) -> Mat4 {
        Mat4::from_scale(scale)
            * Mat4::from_rotation_y(rotate_y_degrees.to_radians())
            * Mat4::from_translation(translation)
    }

    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.inverse()
            .transpose()
            .transform_vector3(normal)
            .normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placement_identity() {
        let mat = Mat4::placement(Vec3::ONE, 0.0, Vec3::ZERO);
        let point = Vec3::new(1.0, 2.0, 3.0);

        assert!((mat.transform_point3(point) - point).length() < 1e-6);
    }

    #[test]
    fn test_placement_order() {
        // Translate, then rotate, then scale.
        let mat = Mat4::placement(Vec3::new(2.0, 1.0, 1.0), 90.0, Vec3::new(1.0, 0.0, 0.0));
        let transformed = mat.transform_point3(Vec3::ZERO);

        // (1,0,0) rotated 90 degrees about Y is (0,0,-1); scale leaves z alone.
        assert!((transformed - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        let p = mat.transform_point3(Vec3::new(0.0, 0.0, 1.0));
        // (1,0,1) rotated is (1,0,-1); x is doubled.
        assert!((p - Vec3::new(2.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_transform_normal_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let normal = mat.transform_normal(Vec3::Y);

        assert!((normal - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_transform_normal_non_uniform_scale() {
        // Plane x = y, normal (1, -1, 0) / sqrt(2). Stretch x by 2.
        let mat = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = mat.transform_normal(Vec3::new(1.0, -1.0, 0.0).normalize());

        // A tangent of the plane stays perpendicular to the transformed normal.
        let tangent = mat.transform_vector3(Vec3::new(1.0, 1.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-5);
        assert!((n.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_transform_normal_rotation() {
        let mat = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let n = mat.transform_normal(Vec3::X);

        assert!((n - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn test_mat4_rotation_inverse() {
        let mat = Mat4::placement(Vec3::new(1.6, 1.0, 1.0), 8.0, Vec3::new(0.0, -1.0, 0.75));
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = inv.transform_point3(mat.transform_point3(point));

        assert!((back - point).length() < 1e-4);
    }
}
