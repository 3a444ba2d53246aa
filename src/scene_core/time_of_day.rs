use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::sun::SunAngles;

/// Blend weights over the three time-of-day stops. Derived from pitch alone,
/// recomputed every evaluation; `noon` and `dusk` are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeOfDayMix {
    pub noon: f32,
    pub sunset: f32,
    pub dusk: f32,
}

/// Fixed color stops for one scene attribute (sky or sun).
pub struct Palette {
    pub noon: Vec3,
    pub sunset: Vec3,
    pub dusk: Vec3,
}

impl Palette {
    pub fn blend(&self, mix: TimeOfDayMix) -> Vec3 {
        mix.noon * self.noon + mix.sunset * self.sunset + mix.dusk * self.dusk
    }
}

pub const SKY_PALETTE: Palette = Palette {
    noon: Vec3::new(0.53, 0.81, 0.98),
    sunset: Vec3::new(0.99, 0.37, 0.33),
    dusk: Vec3::new(0.04, 0.05, 0.19),
};

pub const SUN_PALETTE: Palette = Palette {
    noon: Vec3::new(0.9, 0.8, 0.6),
    sunset: Vec3::new(0.8, 0.6, 0.4),
    dusk: Vec3::new(0.0, 0.0, 0.0),
};

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Maps sun pitch to blend weights. Above the horizon the mix slides from
/// sunset to noon over the first half of the climb; below it slides to dusk
/// over the first quarter of the descent. Both branches agree at pitch 0.
pub fn mix_for_pitch(pitch: f32) -> TimeOfDayMix {
    let p = pitch / FRAC_PI_2;
    if p > 0.0 {
        let noon = smoothstep(0.0, 0.5, p);
        TimeOfDayMix {
            noon,
            sunset: 1.0 - noon,
            dusk: 0.0,
        }
    } else {
        let dusk = smoothstep(0.0, 0.25, -p);
        TimeOfDayMix {
            noon: 0.0,
            sunset: 1.0 - dusk,
            dusk,
        }
    }
}

/// One frame's worth of lighting inputs, derived from the sun orientation.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    /// Unit vector pointing toward the sun; what the sky pass wants.
    pub sun_direction: Vec3,
    /// Negated sun direction: surface toward the light source. What the
    /// lit pass wants.
    pub light_direction: Vec3,
    pub sun_color: Vec3,
    pub sky_color: Vec3,
    pub ambient: Vec3,
}

impl Lighting {
    pub fn from_sun(sun: &SunAngles) -> Self {
        let mix = mix_for_pitch(sun.pitch());
        let sky_color = SKY_PALETTE.blend(mix);
        let sun_color = SUN_PALETTE.blend(mix);
        let sun_direction = sun.direction();
        Self {
            sun_direction,
            light_direction: -sun_direction,
            sun_color,
            sky_color,
            ambient: 0.5 * sky_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{mix_for_pitch, Lighting, SKY_PALETTE, SUN_PALETTE};
    use crate::scene_core::sun::SunAngles;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn mix_components_stay_in_unit_range_and_regimes_are_exclusive() {
        for step in -64..=64 {
            let pitch = step as f32 * FRAC_PI_2 / 64.0;
            let mix = mix_for_pitch(pitch);
            for w in [mix.noon, mix.sunset, mix.dusk] {
                assert!((0.0..=1.0).contains(&w), "weight {w} out of range");
            }
            assert!(
                mix.noon == 0.0 || mix.dusk == 0.0,
                "noon and dusk both nonzero at pitch {pitch}"
            );
        }
    }

    #[test]
    fn mix_is_continuous_at_the_horizon() {
        let above = mix_for_pitch(f32::EPSILON);
        let below = mix_for_pitch(-f32::EPSILON);
        let at = mix_for_pitch(0.0);
        for mix in [above, below, at] {
            assert_relative_eq!(mix.noon, 0.0, epsilon = 1e-6);
            assert_relative_eq!(mix.sunset, 1.0, epsilon = 1e-6);
            assert_relative_eq!(mix.dusk, 0.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn straight_up_is_pure_noon() {
        let mix = mix_for_pitch(FRAC_PI_2);
        assert_relative_eq!(mix.noon, 1.0);
        assert_relative_eq!(mix.sunset, 0.0);
        assert_relative_eq!(mix.dusk, 0.0);

        let sky = SKY_PALETTE.blend(mix);
        assert_relative_eq!(sky.x, 0.53);
        assert_relative_eq!(sky.y, 0.81);
        assert_relative_eq!(sky.z, 0.98);
    }

    #[test]
    fn straight_down_is_pure_dusk_with_a_dark_sun() {
        let mix = mix_for_pitch(-FRAC_PI_2);
        assert_relative_eq!(mix.noon, 0.0);
        assert_relative_eq!(mix.sunset, 0.0);
        assert_relative_eq!(mix.dusk, 1.0);

        let sky = SKY_PALETTE.blend(mix);
        assert_relative_eq!(sky.x, 0.04);
        assert_relative_eq!(sky.y, 0.05);
        assert_relative_eq!(sky.z, 0.19);

        let sun = SUN_PALETTE.blend(mix);
        assert_relative_eq!(sun.length(), 0.0);
    }

    #[test]
    fn lighting_negates_the_sun_direction_and_halves_the_sky_for_ambient() {
        let sun = SunAngles::new(0.7, 0.4);
        let lighting = Lighting::from_sun(&sun);
        assert_relative_eq!(
            (lighting.sun_direction + lighting.light_direction).length(),
            0.0,
            epsilon = 1e-6
        );
        assert_relative_eq!(
            (lighting.ambient - 0.5 * lighting.sky_color).length(),
            0.0,
            epsilon = 1e-6
        );
    }
}
