use glam::{Mat4, Vec3};
use winit::event::{DeviceEvent, ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveMask(u8);

impl MoveMask {
    const NONE: Self = Self(0);
    const FORWARD: Self = Self(1 << 0);
    const LEFT: Self = Self(1 << 1);
    const BACKWARD: Self = Self(1 << 2);
    const RIGHT: Self = Self(1 << 3);

    fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW => Some(Self::FORWARD),
            KeyCode::KeyA => Some(Self::LEFT),
            KeyCode::KeyS => Some(Self::BACKWARD),
            KeyCode::KeyD => Some(Self::RIGHT),
            _ => None,
        }
    }

    fn set(&mut self, mask: Self, pressed: bool) {
        if pressed {
            self.0 |= mask.0;
        } else {
            self.0 &= !mask.0;
        }
    }

    fn contains(self, mask: Self) -> bool {
        (self.0 & mask.0) != 0
    }
}

/// First-person camera with a fixed 90° vertical FOV perspective projection
/// (near 0.1, far 1000); only the view state changes at runtime.
pub struct FlyCamera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl FlyCamera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            fov_y_radians: std::f32::consts::FRAC_PI_2,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        Vec3::Y.cross(self.forward()).normalize()
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        let view = Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y);
        let projection = Mat4::perspective_rh(self.fov_y_radians, aspect, self.near, self.far);
        projection * view
    }
}

/// Integrates keyboard movement and mouse look into a `FlyCamera`. The
/// controller mutates the camera, never the other way around.
pub struct CameraController {
    movement: MoveMask,
    move_up: bool,
    move_down: bool,
    mouse_delta: (f64, f64),
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

impl CameraController {
    pub fn new(move_speed: f32, look_sensitivity: f32) -> Self {
        Self {
            movement: MoveMask::NONE,
            move_up: false,
            move_down: false,
            mouse_delta: (0.0, 0.0),
            move_speed,
            look_sensitivity,
        }
    }

    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        let WindowEvent::KeyboardInput { event, .. } = event else {
            return false;
        };

        let pressed = event.state == ElementState::Pressed;
        let PhysicalKey::Code(code) = event.physical_key else {
            return false;
        };

        if let Some(mask) = MoveMask::from_key(code) {
            self.movement.set(mask, pressed);
            return true;
        }

        match code {
            KeyCode::Space => self.move_up = pressed,
            KeyCode::ShiftLeft => self.move_down = pressed,
            _ => return false,
        }

        true
    }

    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse_delta.0 += delta.0;
            self.mouse_delta.1 += delta.1;
        }
    }

    pub fn reset_inputs(&mut self) {
        self.movement = MoveMask::NONE;
        self.move_up = false;
        self.move_down = false;
        self.mouse_delta = (0.0, 0.0);
    }

    pub fn update_camera(&mut self, dt_seconds: f32, camera: &mut FlyCamera, look_active: bool) {
        if look_active {
            camera.yaw -= self.mouse_delta.0 as f32 * self.look_sensitivity;
            camera.pitch -= self.mouse_delta.1 as f32 * self.look_sensitivity;
            camera.pitch = camera.pitch.clamp(-1.54, 1.54);
        }
        self.mouse_delta = (0.0, 0.0);

        let mut direction = Vec3::ZERO;
        let forward = camera.forward();
        let flat_forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or_zero();
        let right = camera.right();

        if self.movement.contains(MoveMask::FORWARD) {
            direction += flat_forward;
        }
        if self.movement.contains(MoveMask::BACKWARD) {
            direction -= flat_forward;
        }
        if self.movement.contains(MoveMask::RIGHT) {
            direction += right;
        }
        if self.movement.contains(MoveMask::LEFT) {
            direction -= right;
        }
        if self.move_up {
            direction += Vec3::Y;
        }
        if self.move_down {
            direction -= Vec3::Y;
        }

        camera.position += direction.normalize_or_zero() * self.move_speed * dt_seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraController, FlyCamera, MoveMask};
    use glam::Vec3;

    #[test]
    fn projection_parameters_are_fixed_at_construction() {
        let camera = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        assert_eq!(camera.fov_y_radians, std::f32::consts::FRAC_PI_2);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn movement_mask_moves_camera_and_reset_clears_it() {
        let mut controller = CameraController::new(10.0, 0.0);
        let mut camera = FlyCamera::new(Vec3::ZERO, -std::f32::consts::FRAC_PI_2, 0.0);

        controller.movement.set(MoveMask::FORWARD, true);
        controller.update_camera(1.0, &mut camera, false);
        assert!(camera.position.length() > 0.0);

        controller.reset_inputs();
        let before = camera.position;
        controller.update_camera(1.0, &mut camera, false);
        assert!((camera.position - before).length() < 1e-6);
    }

    #[test]
    fn look_pitch_is_clamped() {
        let mut controller = CameraController::new(0.0, 1.0);
        let mut camera = FlyCamera::new(Vec3::ZERO, 0.0, 0.0);
        controller.mouse_delta = (0.0, -10_000.0);
        controller.update_camera(0.016, &mut camera, true);
        assert!(camera.pitch <= 1.54);
    }
}
