//! Orbital camera around the globe, plus its mouse controller.

use glam::{Mat4, Vec3, Vec4Swizzles};
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Zoom limits in globe units (globe radius is 5).
pub const MIN_ORBIT_RADIUS: f32 = 7.0;
pub const MAX_ORBIT_RADIUS: f32 = 20.0;

#[derive(Debug, Clone)]
pub struct Camera {
    /// Angle around the +Y axis (radians).
    pub azimuth_rad: f32,
    /// Angle above the equatorial plane (radians).
    pub elevation_rad: f32,
    /// Distance from the globe center.
    pub radius: f32,
    pub proj: Mat4,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            azimuth_rad: 0.0,
            elevation_rad: 20.0f32.to_radians(),
            radius: 10.0,
            proj: Self::projection(aspect),
        }
    }

    /// Perspective projection; glam's `perspective_rh` writes depth to the
    /// [0, 1] range wgpu expects.
    fn projection(aspect: f32) -> Mat4 {
        Mat4::perspective_rh(75.0f32.to_radians(), aspect.max(1e-3), 0.1, 1000.0)
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.proj = Self::projection(aspect);
    }

    /// Camera position in world space.
    pub fn eye(&self) -> Vec3 {
        let (sin_az, cos_az) = self.azimuth_rad.sin_cos();
        let (sin_el, cos_el) = self.elevation_rad.sin_cos();
        Vec3::new(
            self.radius * cos_el * sin_az,
            self.radius * sin_el,
            self.radius * cos_el * cos_az,
        )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }

    /// World-space camera basis used for billboarding sprites. The view
    /// matrix is rotation+translation, so its rotation rows are the basis.
    pub fn right_up(&self) -> (Vec3, Vec3) {
        let view = self.view();
        let right = Vec3::new(view.x_axis.x, view.y_axis.x, view.z_axis.x);
        let up = Vec3::new(view.x_axis.y, view.y_axis.y, view.z_axis.y);
        (right, up)
    }

    /// Unprojects a cursor position into a world-space ray through the scene.
    pub fn cursor_ray(&self, cursor: (f32, f32), viewport: (f32, f32)) -> crate::picking::Ray {
        let ndc_x = (cursor.0 / viewport.0.max(1.0)) * 2.0 - 1.0;
        let ndc_y = -((cursor.1 / viewport.1.max(1.0)) * 2.0 - 1.0);

        let inv = self.view_proj().inverse();
        let near = inv * glam::Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv * glam::Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;

        crate::picking::Ray {
            origin: near,
            dir: (far - near).normalize(),
        }
    }
}

pub struct CameraController {
    mouse_down: bool,
    last_mouse: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            mouse_down: false,
            last_mouse: None,
        }
    }

    /// Handles window events and updates the camera.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) {
        match event {
            WindowEvent::MouseInput { button, state, .. } => {
                if *button == MouseButton::Left {
                    self.mouse_down = *state == ElementState::Pressed;
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.handle_cursor_orbit((position.x, position.y), camera);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
                };
                self.handle_scroll(scroll, camera);
            }
            _ => {}
        }
    }

    /// Positive delta = scroll up = zoom in = decrease radius.
    fn handle_scroll(&mut self, delta: f32, camera: &mut Camera) {
        let zoom = 1.1f32.powf(-delta);
        camera.radius = (camera.radius * zoom).clamp(MIN_ORBIT_RADIUS, MAX_ORBIT_RADIUS);
    }

    /// Orbits while the left button is held.
    fn handle_cursor_orbit(&mut self, xy: (f64, f64), camera: &mut Camera) {
        if let Some(last) = self.last_mouse {
            if self.mouse_down {
                let dx = ((xy.0 - last.0) * 0.005) as f32;
                let dy = ((xy.1 - last.1) * 0.005) as f32;

                camera.azimuth_rad -= dx;
                camera.elevation_rad += dy;

                // Clamp elevation short of the poles to prevent flipping.
                camera.elevation_rad = camera
                    .elevation_rad
                    .clamp(-85.0f32.to_radians(), 85.0f32.to_radians());
            }
        }
        self.last_mouse = Some(xy);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_distance_matches_radius() {
        let camera = Camera::new(16.0 / 9.0);
        assert!((camera.eye().length() - camera.radius).abs() < 1e-4);
    }

    #[test]
    fn centered_cursor_ray_points_at_the_globe() {
        let camera = Camera::new(1.0);
        let ray = camera.cursor_ray((400.0, 300.0), (800.0, 600.0));

        // A ray through the viewport center must pass near the origin.
        let closest = ray.origin - ray.dir * ray.origin.dot(ray.dir);
        assert!(closest.length() < 1e-2);
    }
}
