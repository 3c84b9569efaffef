use crate::app::Vec3;

const CHASE_DISTANCE_UNITS: f32 = 12.0;
const CHASE_HEIGHT_UNITS: f32 = 7.0;
const CHASE_PITCH_LIFT_UNITS: f32 = 2.0;
const LOOK_AT_HEIGHT_UNITS: f32 = 3.0;
const DEFAULT_FOV_Y_DEGREES: f32 = 75.0;
const NEAR_PLANE_UNITS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn aspect(self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// Third-person camera that trails the subject along its yaw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub fov_y_radians: f32,
}

impl Default for ChaseCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 8.0, 16.0),
            target: Vec3::ZERO,
            fov_y_radians: DEFAULT_FOV_Y_DEGREES.to_radians(),
        }
    }
}

impl ChaseCamera {
    pub fn follow(&mut self, subject: Vec3, yaw: f32, pitch: f32) {
        self.position = Vec3::new(
            subject.x - yaw.sin() * CHASE_DISTANCE_UNITS,
            subject.y + CHASE_HEIGHT_UNITS + pitch.sin() * CHASE_PITCH_LIFT_UNITS,
            subject.z - yaw.cos() * CHASE_DISTANCE_UNITS,
        );
        self.target = subject + Vec3::UP * LOOK_AT_HEIGHT_UNITS;
    }

    /// Pixel position of `world`, or `None` when the point is behind the near plane.
    pub fn world_to_screen(&self, world: Vec3, viewport: Viewport) -> Option<(f32, f32)> {
        let forward = (self.target - self.position).normalized();
        let right = forward.cross(Vec3::UP).normalized();
        if forward == Vec3::ZERO || right == Vec3::ZERO {
            return None;
        }
        let up = right.cross(forward);

        let relative = world - self.position;
        let depth = relative.dot(forward);
        if depth <= NEAR_PLANE_UNITS {
            return None;
        }

        let half_height = (self.fov_y_radians * 0.5).tan() * depth;
        let half_width = half_height * viewport.aspect();
        let ndc_x = relative.dot(right) / half_width;
        let ndc_y = relative.dot(up) / half_height;

        let x = (ndc_x * 0.5 + 0.5) * viewport.width as f32;
        let y = (-ndc_y * 0.5 + 0.5) * viewport.height as f32;
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport {
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn look_target_maps_to_viewport_center() {
        let mut camera = ChaseCamera::default();
        camera.follow(Vec3::new(5.0, 2.0, -3.0), 0.7, 0.0);

        let (x, y) = camera
            .world_to_screen(camera.target, viewport())
            .expect("target is in front of camera");
        assert!((x - 400.0).abs() < 0.01);
        assert!((y - 300.0).abs() < 0.01);
    }

    #[test]
    fn camera_trails_behind_subject_along_yaw() {
        let mut camera = ChaseCamera::default();
        camera.follow(Vec3::ZERO, 0.0, 0.0);

        assert!((camera.position.z + 12.0).abs() < 1e-5);
        assert!((camera.position.y - 7.0).abs() < 1e-5);
        assert_eq!(camera.target, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn points_behind_camera_are_not_projected() {
        let mut camera = ChaseCamera::default();
        camera.follow(Vec3::ZERO, 0.0, 0.0);

        assert!(camera
            .world_to_screen(Vec3::new(0.0, 3.0, -40.0), viewport())
            .is_none());
    }

    #[test]
    fn higher_points_project_higher_on_screen() {
        let mut camera = ChaseCamera::default();
        camera.follow(Vec3::ZERO, 0.0, 0.0);

        let (_, low) = camera
            .world_to_screen(Vec3::new(0.0, 0.0, 10.0), viewport())
            .expect("low point");
        let (_, high) = camera
            .world_to_screen(Vec3::new(0.0, 7.0, 10.0), viewport())
            .expect("high point");
        assert!(high < low);
    }
}
