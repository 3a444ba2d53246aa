use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use glam::Vec3;

pub const DEFAULT_YAW: f32 = FRAC_PI_4;
pub const DEFAULT_PITCH: f32 = FRAC_PI_4;

/// Directional steering inputs for one frame. Opposite inputs cancel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SunInput {
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub yaw_left: bool,
    pub yaw_right: bool,
}

/// Orientation of the sun. Pitch saturates at the zenith/nadir, yaw wraps —
/// every reachable state is valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunAngles {
    yaw: f32,
    pitch: f32,
}

impl Default for SunAngles {
    fn default() -> Self {
        Self::new(DEFAULT_YAW, DEFAULT_PITCH)
    }
}

impl SunAngles {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        let mut angles = Self { yaw, pitch };
        angles.normalize();
        angles
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Applies the angle deltas accumulated over one frame, then re-establishes
    /// the pitch clamp and yaw wrap.
    pub fn steer(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.pitch += pitch_delta;
        self.normalize();
    }

    fn normalize(&mut self) {
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
        self.yaw = wrap_angle(self.yaw);
    }

    /// Unit vector pointing from the origin toward the sun. Unit length falls
    /// out of the cos²+sin² identity; no renormalization.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin()) * self.pitch.cos()
            + Vec3::new(0.0, self.pitch.sin(), 0.0)
    }
}

/// Wraps an angle into the canonical `[0, TAU)` range.
pub fn wrap_angle(angle: f32) -> f32 {
    angle.rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::{wrap_angle, SunAngles, SunInput};
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, TAU};

    #[test]
    fn pitch_saturates_and_yaw_wraps_under_arbitrary_steering() {
        let mut sun = SunAngles::default();
        let deltas = [4.0_f32, -11.5, 0.3, 100.0, -0.01, -57.0, 8.25];
        for (i, d) in deltas.iter().cycle().take(200).enumerate() {
            let sign = if i % 3 == 0 { -1.0 } else { 1.0 };
            sun.steer(*d, sign * d);
            assert!(sun.pitch() >= -FRAC_PI_2 && sun.pitch() <= FRAC_PI_2);
            assert!(sun.yaw() >= 0.0 && sun.yaw() < TAU);
        }
    }

    #[test]
    fn pitch_clamp_saturates_instead_of_reflecting() {
        let mut sun = SunAngles::new(0.0, 0.0);
        sun.steer(0.0, 100.0);
        assert_relative_eq!(sun.pitch(), FRAC_PI_2);
        sun.steer(0.0, -100.0);
        assert_relative_eq!(sun.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn direction_is_unit_length_across_the_domain() {
        for yaw_step in 0..32 {
            for pitch_step in -8..=8 {
                let yaw = yaw_step as f32 * TAU / 32.0;
                let pitch = pitch_step as f32 * FRAC_PI_2 / 8.0;
                let dir = SunAngles::new(yaw, pitch).direction();
                assert_relative_eq!(dir.length(), 1.0, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn zero_angles_point_along_positive_x() {
        let dir = SunAngles::new(0.0, 0.0).direction();
        assert_relative_eq!(dir.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(dir.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(dir.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn wrap_angle_is_canonical() {
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-6);
        assert_relative_eq!(wrap_angle(-0.5), TAU - 0.5, epsilon = 1e-6);
        assert_relative_eq!(wrap_angle(0.0), 0.0);
    }

    #[test]
    fn opposite_inputs_have_no_net_effect() {
        // SunInput itself carries no arithmetic; the controller sums the
        // deltas. This mirrors that composition with unit rates.
        let input = SunInput {
            pitch_up: true,
            pitch_down: true,
            yaw_left: true,
            yaw_right: true,
        };
        let mut pitch_delta = 0.0;
        let mut yaw_delta = 0.0;
        if input.pitch_up {
            pitch_delta += 1.0;
        }
        if input.pitch_down {
            pitch_delta -= 1.0;
        }
        if input.yaw_right {
            yaw_delta += 1.0;
        }
        if input.yaw_left {
            yaw_delta -= 1.0;
        }
        let mut sun = SunAngles::default();
        let before = sun;
        sun.steer(yaw_delta, pitch_delta);
        assert_eq!(sun, before);
    }
}
