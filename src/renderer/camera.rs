use glam::{Mat4, Vec2, Vec3};

/// Orbit camera driven by mouse drag. Looks at `target` from `distance`,
/// positioned by yaw/pitch.
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,

    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    /// Radius of the framed content; clip planes and zoom limits follow it.
    pub radius: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    pub rotate_sensitivity: f32,
    pub zoom_factor: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 10.0,
            yaw: 90.0_f32.to_radians(),
            pitch: 0.0,

            fov: 22.5_f32.to_radians(),
            aspect: 16.0 / 10.0,
            near: 0.01,
            far: 1000.0,

            radius: 1.0,
            min_distance: 0.1,
            max_distance: 500.0,

            rotate_sensitivity: 0.008,
            zoom_factor: 0.1,
        }
    }
}

impl Camera {
    pub fn position(&self) -> Vec3 {
        self.target
            + Vec3::new(
                self.distance * self.yaw.cos() * self.pitch.cos(),
                self.distance * self.pitch.sin(),
                self.distance * self.yaw.sin() * self.pitch.cos(),
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Mouse drag in pixels rotates the eye around the target.
    pub fn process_drag(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.rotate_sensitivity;
        self.pitch += delta.y * self.rotate_sensitivity;

        let max_pitch = 89.0_f32.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);
    }

    pub fn process_scroll(&mut self, delta: f32) {
        let scale = (1.0 - delta * self.zoom_factor).clamp(0.5, 1.5);
        self.distance = (self.distance * scale).clamp(self.min_distance, self.max_distance);
        self.update_clip_planes();
    }

    /// Centre on the box and back off until it fills the vertical field of view.
    pub fn frame_bounds(&mut self, min: Vec3, max: Vec3) {
        let radius = ((max - min).length() * 0.5).max(1e-3);
        self.target = (min + max) * 0.5;
        self.radius = radius;
        self.distance = radius / (self.fov * 0.5).sin() * 1.1;
        self.min_distance = radius * 0.25;
        self.max_distance = self.distance * 20.0;
        self.update_clip_planes();
    }

    /// Tight planes around the framed sphere, never collapsing when the eye is inside it.
    fn update_clip_planes(&mut self) {
        self.near = (self.distance - self.radius).max(self.radius * 0.01);
        self.far = self.distance + self.radius * 4.0;
    }

    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
        }
    }
}

/// Fixed tilt applied to the surface before the camera sees it.
pub fn model_matrix() -> Mat4 {
    Mat4::from_axis_angle(Vec3::new(0.707, 0.707, 0.0).normalize(), 0.7)
}

#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub _padding: f32,
}

impl CameraUniform {
    pub fn new(camera: &Camera, model: Mat4) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            normal_matrix: model.inverse().transpose().to_cols_array_2d(),
            camera_pos: camera.position().to_array(),
            _padding: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::default();
        camera.process_drag(Vec2::new(0.0, 1.0e6));
        assert!(camera.pitch <= 89.0_f32.to_radians());
    }

    #[test]
    fn framing_keeps_box_in_front() {
        let mut camera = Camera::default();
        camera.frame_bounds(Vec3::splat(-1.0), Vec3::splat(1.0));

        assert_eq!(camera.target, Vec3::ZERO);
        let radius = 3.0_f32.sqrt();
        assert!(camera.distance > radius);
        assert!(camera.near < camera.distance - radius + 1e-4);
        assert!(camera.far > camera.distance + radius);
    }

    #[test]
    fn scroll_zooms_in() {
        let mut camera = Camera::default();
        let before = camera.distance;
        camera.process_scroll(1.0);
        assert!(camera.distance < before);
    }

    #[test]
    fn scroll_after_framing_stays_within_limits() {
        let mut camera = Camera::default();
        camera.frame_bounds(Vec3::new(-1.5, -1.5, -0.4), Vec3::new(1.5, 1.5, 0.4));
        let framed = camera.distance;

        camera.process_scroll(1.0);
        assert!(camera.distance < framed);
        camera.process_scroll(-1.0);
        camera.process_scroll(-1.0);
        assert!(camera.distance > framed * 0.9);

        for _ in 0..200 {
            camera.process_scroll(1.0);
        }
        assert_eq!(camera.distance, camera.min_distance);
        assert!(camera.near > 0.0 && camera.near < camera.far);

        for _ in 0..200 {
            camera.process_scroll(-1.0);
        }
        assert_eq!(camera.distance, camera.max_distance);
        assert!(camera.far > camera.distance + camera.radius);
    }

    #[test]
    fn rotation_normal_matrix_is_rotation() {
        let uniform = CameraUniform::new(&Camera::default(), model_matrix());
        assert_eq!(std::mem::size_of::<CameraUniform>(), 208);
        let n = Mat4::from_cols_array_2d(&uniform.normal_matrix);
        assert!(n.abs_diff_eq(model_matrix(), 1e-5));
    }
}
