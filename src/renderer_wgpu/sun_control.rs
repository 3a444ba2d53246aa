use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::scene_core::sun::{SunAngles, SunInput};

/// Steers the sun from held keys: I/K raise and lower the pitch, L/J swing
/// the yaw. Applied once per frame before drawing.
pub struct SunController {
    input: SunInput,
    pub yaw_rate: f32,
    pub pitch_rate: f32,
}

impl SunController {
    pub fn new(yaw_rate: f32, pitch_rate: f32) -> Self {
        Self {
            input: SunInput::default(),
            yaw_rate,
            pitch_rate,
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

        match code {
            KeyCode::KeyI => self.input.pitch_up = pressed,
            KeyCode::KeyK => self.input.pitch_down = pressed,
            KeyCode::KeyL => self.input.yaw_right = pressed,
            KeyCode::KeyJ => self.input.yaw_left = pressed,
            _ => return false,
        }

        true
    }

    pub fn set_input(&mut self, input: SunInput) {
        self.input = input;
    }

    pub fn reset_inputs(&mut self) {
        self.input = SunInput::default();
    }

    /// Composes the held inputs additively and steers the angles. The clamp
    /// and wrap live in `SunAngles`; this never fails.
    pub fn update(&self, dt_seconds: f32, sun: &mut SunAngles) {
        let mut yaw_delta = 0.0;
        let mut pitch_delta = 0.0;
        if self.input.yaw_right {
            yaw_delta += self.yaw_rate * dt_seconds;
        }
        if self.input.yaw_left {
            yaw_delta -= self.yaw_rate * dt_seconds;
        }
        if self.input.pitch_up {
            pitch_delta += self.pitch_rate * dt_seconds;
        }
        if self.input.pitch_down {
            pitch_delta -= self.pitch_rate * dt_seconds;
        }
        sun.steer(yaw_delta, pitch_delta);
    }
}

#[cfg(test)]
mod tests {
    use super::SunController;
    use crate::scene_core::sun::{SunAngles, SunInput};
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn opposite_keys_cancel() {
        let mut controller = SunController::new(1.0, 1.0);
        controller.set_input(SunInput {
            pitch_up: true,
            pitch_down: true,
            yaw_left: true,
            yaw_right: true,
        });

        let mut sun = SunAngles::default();
        let before = sun;
        controller.update(0.25, &mut sun);
        assert_eq!(sun, before);
    }

    #[test]
    fn held_keys_accumulate_at_rate_times_dt() {
        let mut controller = SunController::new(1.0, 1.0);
        controller.set_input(SunInput {
            pitch_down: true,
            yaw_right: true,
            ..Default::default()
        });

        let mut sun = SunAngles::new(0.0, 0.0);
        controller.update(0.5, &mut sun);
        assert_relative_eq!(sun.yaw(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(sun.pitch(), -0.5, epsilon = 1e-6);
    }

    #[test]
    fn long_press_saturates_pitch_and_keeps_yaw_wrapped() {
        let mut controller = SunController::new(1.0, 1.0);
        controller.set_input(SunInput {
            pitch_up: true,
            yaw_right: true,
            ..Default::default()
        });

        let mut sun = SunAngles::default();
        for _ in 0..10_000 {
            controller.update(0.016, &mut sun);
            assert!(sun.pitch() >= -FRAC_PI_2 && sun.pitch() <= FRAC_PI_2);
            assert!(sun.yaw() >= 0.0 && sun.yaw() < TAU);
        }
        assert_relative_eq!(sun.pitch(), FRAC_PI_2);
    }
}
