use serde::{Deserialize, Serialize};

use super::sun::{DEFAULT_PITCH, DEFAULT_YAW};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub sun: SunConfig,
    pub assets: AssetsConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            sun: SunConfig::default(),
            assets: AssetsConfig::default(),
        }
    }
}

impl SceneConfig {
    pub fn load() -> Self {
        let path = std::path::Path::new("config.json");
        if !path.exists() {
            log::info!("no config.json found, using defaults");
            return Self::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("loaded config.json");
                    config
                }
                Err(e) => {
                    log::warn!("failed to parse config.json: {e}, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("failed to read config.json: {e}, using defaults");
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 900,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub move_speed: f32,
    pub look_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 2.0, 5.0],
            yaw: -std::f32::consts::FRAC_PI_2,
            pitch: -std::f32::consts::FRAC_PI_4,
            move_speed: 6.0,
            look_sensitivity: 0.0022,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SunConfig {
    pub yaw: f32,
    pub pitch: f32,
    pub yaw_rate: f32,
    pub pitch_rate: f32,
}

impl Default for SunConfig {
    fn default() -> Self {
        Self {
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            yaw_rate: 1.0,
            pitch_rate: 1.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub texture_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            texture_dir: "assets/textures".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SceneConfig;

    #[test]
    fn partial_json_falls_back_to_field_defaults() {
        let config: SceneConfig =
            serde_json::from_str(r#"{ "sun": { "yaw_rate": 2.5 } }"#).unwrap();
        assert_eq!(config.sun.yaw_rate, 2.5);
        assert_eq!(config.sun.pitch_rate, 1.0);
        assert_eq!(config.window.width, 1600);
    }
}
