use std::{
    f64::consts::FRAC_PI_2,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    animation::ease::Ease,
    catalog::TreeCatalog,
    foundation::{
        core::{Color, Euler, Fps, Vec3},
        error::{ReplayError, ReplayResult},
    },
};

/// Everything a replay session needs besides the trace contents.
///
/// Every field has a default, so a JSON config only has to name what it overrides.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Newline-delimited JSON trace, loaded lazily by the first take.
    pub trace_path: PathBuf,
    /// Mesh bundle holding every vegetation template.
    pub trees_path: PathBuf,
    /// Rigged robot model.
    pub robot_path: PathBuf,
    /// Simulator units to scene units.
    pub scale: f64,
    pub fps: u32,
    pub robot: RobotConfig,
    pub camera: CameraConfig,
    pub sun: LightConfig,
    pub fill_light: LightConfig,
    pub floor: FloorConfig,
    pub path: PathStyle,
    /// When set, fresh vegetation clones fade in: hidden at frame 0, shown at this frame.
    pub vegetation_reveal_frames: Option<u64>,
    pub catalog: TreeCatalog,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    pub name: String,
    /// Height of the rig origin above the floor.
    pub height: f64,
    /// Fixed pitch; the rig is modelled lying on its side.
    pub pitch: f64,
    pub rotation_frames: u64,
    pub translation_frames: u64,
    /// Pose used at import time, in scene units.
    pub start: [f64; 2],
    pub start_heading: f64,
    pub ease: Ease,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub name: String,
    pub location: Vec3,
    pub rotation: Euler,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightConfig {
    pub name: String,
    pub energy: f64,
    pub location: Vec3,
    #[serde(default)]
    pub rotation: Euler,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FloorConfig {
    pub name: String,
    pub size: f64,
}

/// Look of the lane ribbon drawn under the robot's planned path.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PathStyle {
    /// Every lane piece is named with this prefix; stale pieces are swept by it.
    pub prefix: String,
    pub width: f64,
    pub thickness: f64,
    pub color: Color,
}

const CAMERA_LOCATION: Vec3 = Vec3::new(35.0, -10.0, 250.0);

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            trace_path: PathBuf::from("coordinates.json"),
            trees_path: PathBuf::from("Trees").join("trees9.obj"),
            robot_path: PathBuf::from("DRON 001.fbx"),
            scale: 10.0,
            fps: 10,
            robot: RobotConfig::default(),
            camera: CameraConfig::default(),
            sun: LightConfig {
                name: "Sun".to_string(),
                energy: 1.0,
                location: Vec3::new(0.0, 0.0, 5000.0),
                rotation: Euler::new(0.0, 0.9, 0.9),
            },
            fill_light: LightConfig {
                name: "Diffuse".to_string(),
                energy: 1_000_000.0,
                location: CAMERA_LOCATION,
                rotation: Euler::IDENTITY,
            },
            floor: FloorConfig::default(),
            path: PathStyle::default(),
            vegetation_reveal_frames: None,
            catalog: TreeCatalog::default(),
        }
    }
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            name: "Robot".to_string(),
            height: 3.2,
            pitch: FRAC_PI_2,
            rotation_frames: 3,
            translation_frames: 10,
            start: [20.0, -10.0],
            start_heading: (-30.0f64).to_radians(),
            ease: Ease::InOutCubic,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            name: "Camera".to_string(),
            location: CAMERA_LOCATION,
            rotation: Euler::IDENTITY,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            name: "Light".to_string(),
            energy: 100_000.0,
            location: Vec3::ZERO,
            rotation: Euler::IDENTITY,
        }
    }
}

impl Default for FloorConfig {
    fn default() -> Self {
        Self {
            name: "Floor".to_string(),
            size: 250.0,
        }
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            prefix: "Path_".to_string(),
            width: 3.0,
            thickness: 0.1,
            color: Color::rgba(0.8, 0.04, 0.04, 1.0),
        }
    }
}

impl RobotConfig {
    /// Length of one take-to-take transition: rotate first, then translate.
    pub fn total_frames(&self) -> u64 {
        self.rotation_frames.saturating_add(self.translation_frames)
    }
}

impl ReplayConfig {
    pub fn from_json_file(path: &Path) -> ReplayResult<Self> {
        let f = File::open(path).with_context(|| format!("open config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_reader(BufReader::new(f))
            .with_context(|| format!("parse config JSON '{}'", path.display()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn fps(&self) -> ReplayResult<Fps> {
        Fps::new(self.fps, 1)
    }

    pub fn validate(&self) -> ReplayResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ReplayError::validation("scale must be finite and > 0"));
        }
        self.fps()?;
        if self.robot.rotation_frames == 0 || self.robot.translation_frames == 0 {
            return Err(ReplayError::validation(
                "robot rotation_frames and translation_frames must be > 0",
            ));
        }
        if self
            .robot
            .rotation_frames
            .checked_add(self.robot.translation_frames)
            .is_none()
        {
            return Err(ReplayError::validation(
                "robot rotation_frames + translation_frames overflows",
            ));
        }
        if self.floor.size <= 0.0 {
            return Err(ReplayError::validation("floor size must be > 0"));
        }
        if self.path.prefix.is_empty() {
            return Err(ReplayError::validation("path prefix must be non-empty"));
        }
        if self.path.width <= 0.0 || self.path.thickness <= 0.0 {
            return Err(ReplayError::validation(
                "path width and thickness must be > 0",
            ));
        }
        if !self.path.color.is_valid() {
            return Err(ReplayError::validation(
                "path color channels must lie in 0..=1",
            ));
        }
        if self.vegetation_reveal_frames == Some(0) {
            return Err(ReplayError::validation(
                "vegetation_reveal_frames must be > 0 when set",
            ));
        }

        let names = [
            &self.robot.name,
            &self.camera.name,
            &self.sun.name,
            &self.fill_light.name,
            &self.floor.name,
        ];
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ReplayError::validation("cast object names must be non-empty"));
            }
            if names[..i].contains(name) {
                return Err(ReplayError::validation(format!(
                    "cast object name '{name}' is used twice"
                )));
            }
            if name.starts_with(&self.path.prefix) {
                return Err(ReplayError::validation(format!(
                    "cast object name '{name}' collides with the path prefix"
                )));
            }
        }

        self.catalog.validate()
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
