//! Simulation configuration resource.
//!
//! Settings loaded from an INI file. Every value has a safe default, so a
//! missing file or missing key never blocks startup.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 800
//! height = 600
//! target_fps = 60
//! title = Rigidframe
//!
//! [physics]
//! fixed_step = 0.0166667
//! substeps = 1
//! gravity_y = -9.81
//! step_policy = per_frame   ; or "accumulated"
//! max_steps_per_frame = 5
//!
//! [camera]
//! eye_x = 10
//! eye_y = 10
//! eye_z = 10
//! fovy = 45
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use raylib::math::Vector3;
use std::path::PathBuf;

use crate::resources::camera3d::SceneCamera;
use crate::resources::physics::{DEFAULT_FIXED_STEP, PhysicsSettings, StepPolicy};

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 800;
const DEFAULT_WINDOW_HEIGHT: u32 = 600;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_TITLE: &str = "Rigidframe";
const DEFAULT_SUBSTEPS: u32 = 1;
const DEFAULT_GRAVITY_Y: f32 = -9.81;
const DEFAULT_MAX_STEPS: u32 = 5;
const DEFAULT_EYE: f32 = 10.0;
const DEFAULT_FOVY: f32 = 45.0;
pub const DEFAULT_CONFIG_PATH: &str = "./config.ini";

#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    pub title: String,
    /// Fixed physics step in seconds.
    pub fixed_step: f32,
    pub substeps: u32,
    pub gravity_y: f32,
    /// Use a time accumulator instead of one step per frame.
    pub accumulate_steps: bool,
    pub max_steps_per_frame: u32,
    pub camera_eye: Vector3,
    pub camera_fovy: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            title: DEFAULT_TITLE.to_string(),
            fixed_step: DEFAULT_FIXED_STEP,
            substeps: DEFAULT_SUBSTEPS,
            gravity_y: DEFAULT_GRAVITY_Y,
            accumulate_steps: false,
            max_steps_per_frame: DEFAULT_MAX_STEPS,
            camera_eye: Vector3::new(DEFAULT_EYE, DEFAULT_EYE, DEFAULT_EYE),
            camera_fovy: DEFAULT_FOVY,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply(&config);

        info!(
            "Loaded config: {}x{} window, fps={}, step={:.5}s x{}, gravity={:.2}, accumulate={}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.fixed_step,
            self.substeps,
            self.gravity_y,
            self.accumulate_steps
        );

        Ok(())
    }

    fn apply(&mut self, config: &Ini) {
        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }
        if let Some(title) = config.get("window", "title") {
            self.title = title;
        }

        // [physics] section
        if let Some(step) = config.getfloat("physics", "fixed_step").ok().flatten() {
            self.fixed_step = step as f32;
        }
        if let Some(substeps) = config.getuint("physics", "substeps").ok().flatten() {
            self.substeps = substeps as u32;
        }
        if let Some(gravity) = config.getfloat("physics", "gravity_y").ok().flatten() {
            self.gravity_y = gravity as f32;
        }
        if let Some(policy) = config.get("physics", "step_policy") {
            match policy.trim() {
                "per_frame" => self.accumulate_steps = false,
                "accumulated" => self.accumulate_steps = true,
                other => warn!("Unknown step_policy '{}', keeping current", other),
            }
        }
        if let Some(max) = config.getuint("physics", "max_steps_per_frame").ok().flatten() {
            self.max_steps_per_frame = max as u32;
        }

        // [camera] section
        if let Some(x) = config.getfloat("camera", "eye_x").ok().flatten() {
            self.camera_eye.x = x as f32;
        }
        if let Some(y) = config.getfloat("camera", "eye_y").ok().flatten() {
            self.camera_eye.y = y as f32;
        }
        if let Some(z) = config.getfloat("camera", "eye_z").ok().flatten() {
            self.camera_eye.z = z as f32;
        }
        if let Some(fovy) = config.getfloat("camera", "fovy").ok().flatten() {
            self.camera_fovy = fovy as f32;
        }
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));
        config.set("window", "title", Some(self.title.clone()));

        config.set("physics", "fixed_step", Some(self.fixed_step.to_string()));
        config.set("physics", "substeps", Some(self.substeps.to_string()));
        config.set("physics", "gravity_y", Some(self.gravity_y.to_string()));
        let policy = if self.accumulate_steps {
            "accumulated"
        } else {
            "per_frame"
        };
        config.set("physics", "step_policy", Some(policy.to_string()));
        config.set(
            "physics",
            "max_steps_per_frame",
            Some(self.max_steps_per_frame.to_string()),
        );

        config.set("camera", "eye_x", Some(self.camera_eye.x.to_string()));
        config.set("camera", "eye_y", Some(self.camera_eye.y.to_string()));
        config.set("camera", "eye_z", Some(self.camera_eye.z.to_string()));
        config.set("camera", "fovy", Some(self.camera_fovy.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Physics world parameters described by this configuration.
    pub fn physics_settings(&self) -> PhysicsSettings {
        let policy = if self.accumulate_steps {
            StepPolicy::Accumulated {
                max_steps: self.max_steps_per_frame,
            }
        } else {
            StepPolicy::PerFrame
        };
        PhysicsSettings {
            fixed_step: self.fixed_step,
            substeps: self.substeps,
            gravity_y: self.gravity_y,
            policy,
        }
    }

    pub fn camera(&self) -> SceneCamera {
        SceneCamera::looking_at_origin(self.camera_eye, self.camera_fovy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("rigidframe-{}-{}.ini", name, std::process::id()))
    }

    #[test]
    fn test_defaults_give_per_frame_policy() {
        let config = SimConfig::new();
        let settings = config.physics_settings();
        assert_eq!(settings.policy, StepPolicy::PerFrame);
        assert_eq!(settings.substeps, 1);
        assert!((settings.fixed_step - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn test_missing_file_is_an_error_and_keeps_defaults() {
        let mut config = SimConfig::with_path(temp_config_path("missing"));
        assert!(config.load_from_file().is_err());
        assert_eq!(config.window_width, DEFAULT_WINDOW_WIDTH);
    }

    #[test]
    fn test_partial_file_overrides_only_present_keys() {
        let path = temp_config_path("partial");
        std::fs::write(
            &path,
            "[physics]\nsubsteps = 4\nstep_policy = accumulated\n\n[camera]\nfovy = 60\n",
        )
        .unwrap();

        let mut config = SimConfig::with_path(&path);
        config.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.substeps, 4);
        assert!(config.accumulate_steps);
        assert!((config.camera_fovy - 60.0).abs() < 1e-6);
        assert_eq!(config.target_fps, DEFAULT_TARGET_FPS);
        assert_eq!(
            config.physics_settings().policy,
            StepPolicy::Accumulated {
                max_steps: DEFAULT_MAX_STEPS
            }
        );
    }

    #[test]
    fn test_save_then_load_preserves_values() {
        let path = temp_config_path("saved");
        let mut original = SimConfig::with_path(&path);
        original.window_width = 1024;
        original.gravity_y = -3.5;
        original.save_to_file().unwrap();

        let mut loaded = SimConfig::with_path(&path);
        loaded.load_from_file().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.window_width, 1024);
        assert!((loaded.gravity_y + 3.5).abs() < 1e-6);
        assert!(!loaded.accumulate_steps);
    }
}
