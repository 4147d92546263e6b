use glam::{Mat4, Vec3};

use crate::Ray;

/// Pinhole camera for offline rendering.
///
/// `fov_y` is the vertical field of view in degrees.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

/// Per-pixel ray generation basis on the far plane.
///
/// `origin` is the top-left corner of pixel (0, 0); `dx` and `dy` step one
/// pixel right and one pixel down. Row 0 is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub eye: Vec3,
    pub origin: Vec3,
    pub dx: Vec3,
    pub dy: Vec3,
}

impl Frame {
    /// Point on the far plane at continuous pixel coordinates.
    pub fn point(&self, x: f32, y: f32) -> Vec3 {
        self.origin + self.dx * x + self.dy * y
    }

    /// Point-to-point ray from the eye through the center of pixel (x, y).
    pub fn ray(&self, x: u32, y: u32) -> Ray {
        Ray::between(self.eye, self.point(x as f32 + 0.5, y as f32 + 0.5))
    }
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 60.0,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Camera on the +Z axis looking at `center` from `distance` away.
    ///
    /// Anything within `distance` of the center lies in front of the far plane.
    pub fn orbit(center: Vec3, distance: f32) -> Self {
        Self {
            near: distance * 0.025,
            far: distance * 2.0,
            ..Self::new(center + Vec3::Z * distance, center)
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Get the view matrix (world → camera space)
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get the projection matrix (camera → clip space) for an image size and a fov in degrees.
    pub fn projection(&self, width: f32, height: f32, fov: f32) -> Mat4 {
        Mat4::perspective_rh(fov.to_radians(), width / height, self.near, self.far)
    }

    /// Get the combined view-projection matrix
    pub fn view_projection(&self, width: u32, height: u32) -> Mat4 {
        self.projection(width as f32, height as f32, self.fov_y) * self.view()
    }

    /// Build the far-plane ray generation basis for a `width` x `height` image.
    pub fn frame(&self, width: u32, height: u32) -> Frame {
        let inv = self.view_projection(width, height).inverse();

        // NDC depth 1 is the far plane; NDC +y is the top row.
        let top_left = inv.project_point3(Vec3::new(-1.0, 1.0, 1.0));
        let top_right = inv.project_point3(Vec3::new(1.0, 1.0, 1.0));
        let bottom_left = inv.project_point3(Vec3::new(-1.0, -1.0, 1.0));

        Frame {
            eye: self.position,
            origin: top_left,
            dx: (top_right - top_left) / width as f32,
            dy: (bottom_left - top_left) / height as f32,
        }
    }

    /// Ray from the near plane to the far plane through continuous pixel
    /// coordinates, by inverting the view-projection directly.
    pub fn unproject_ray(&self, x: f32, y: f32, width: u32, height: u32) -> Ray {
        let inv = self.view_projection(width, height).inverse();
        let ndc_x = 2.0 * x / width as f32 - 1.0;
        let ndc_y = 1.0 - 2.0 * y / height as f32;

        let near = inv.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
        Ray::between(near, far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: Vec3, b: Vec3, eps: f32) -> bool {
        (a - b).abs().max_element() < eps
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert_eq!(camera.fov_y, 60.0);
    }

    #[test]
    fn test_orbit_camera() {
        let camera = Camera::orbit(Vec3::new(1.0, 0.0, 0.0), 4.0);

        assert_eq!(camera.position, Vec3::new(1.0, 0.0, 4.0));
        assert_eq!(camera.target, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(camera.far, 8.0);
        assert!(camera.near > 0.0 && camera.near < camera.far);
    }

    #[test]
    fn test_view_matrix() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);

        let view = camera.view();
        // View matrix should translate camera to origin
        assert!(view.w_axis.z < 0.0);
        assert!(approx_eq(view.transform_point3(camera.position), Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_projection_matrix() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let square = camera.projection(512.0, 512.0, 60.0);
        let wide = camera.projection(1024.0, 512.0, 60.0);
        assert!((square.x_axis.x - square.y_axis.y).abs() < 1e-6);
        assert!((wide.x_axis.x * 2.0 - wide.y_axis.y).abs() < 1e-5);
    }

    #[test]
    fn test_frame_center_pixel_looks_at_target() {
        let camera = Camera::orbit(Vec3::ZERO, 4.0);
        let frame = camera.frame(3, 3);
        let ray = frame.ray(1, 1);

        assert_eq!(ray.origin(), camera.position);
        assert_eq!(ray.t_max, 1.0);
        assert!(approx_eq(ray.direction().normalize(), -Vec3::Z, 1e-4));
        // The ray ends on the far plane.
        assert!((ray.at(1.0).z - (4.0 - camera.far)).abs() < 1e-2);
    }

    #[test]
    fn test_frame_orientation() {
        let camera = Camera::orbit(Vec3::ZERO, 4.0);
        let frame = camera.frame(64, 32);

        // Row 0 is the top of the image, column 0 the left.
        assert!(frame.dx.x > 0.0);
        assert!(frame.dy.y < 0.0);
        assert!(frame.ray(0, 0).direction().y > 0.0);
        assert!(frame.ray(0, 0).direction().x < 0.0);
        assert!(frame.ray(63, 31).direction().y < 0.0);

        // Square pixels for a non-square image.
        assert!((frame.dx.length() - frame.dy.length()).abs() < 1e-4);
    }

    #[test]
    fn test_frame_vertical_fov() {
        let camera = Camera::orbit(Vec3::ZERO, 4.0);
        let frame = camera.frame(100, 100);

        let top = (frame.point(50.0, 0.0) - camera.position).normalize();
        let bottom = (frame.point(50.0, 100.0) - camera.position).normalize();
        let angle = top.dot(bottom).acos().to_degrees();
        assert!((angle - 60.0).abs() < 0.05);
    }

    #[test]
    fn test_unproject_ray_matches_frame() {
        let camera = Camera::orbit(Vec3::new(0.0, 0.5, 0.0), 4.0);
        let frame = camera.frame(40, 30);

        for &(x, y) in &[(0u32, 0u32), (13, 7), (39, 29)] {
            let via_frame = frame.ray(x, y);
            let via_unproject = camera.unproject_ray(x as f32 + 0.5, y as f32 + 0.5, 40, 30);

            assert!(approx_eq(
                via_frame.direction().normalize(),
                via_unproject.direction().normalize(),
                1e-3
            ));
            assert!(approx_eq(via_frame.at(1.0), via_unproject.at(1.0), 1e-2));
        }
    }
}
