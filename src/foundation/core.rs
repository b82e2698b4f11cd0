use crate::foundation::error::{ReplayError, ReplayResult};

pub use kurbo::Point;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ReplayResult<Self> {
        if den == 0 {
            return Err(ReplayError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(ReplayError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }
}

/// Scene timeline: first and last frame (both inclusive) plus playback rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    pub start: FrameIndex,
    pub end: FrameIndex, // inclusive
    pub fps: Fps,
}

impl Timeline {
    pub fn new(start: FrameIndex, end: FrameIndex, fps: Fps) -> ReplayResult<Self> {
        if start.0 > end.0 {
            return Err(ReplayError::validation("Timeline start must be <= end"));
        }
        Ok(Self { start, end, fps })
    }
}

/// World-space position in scene units.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Lift a ground-plane point to a world position at height `z`.
    pub fn on_ground(p: Point, z: f64) -> Self {
        Self::new(p.x, p.y, z)
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

/// XYZ Euler rotation in radians. `z` is the yaw / heading.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Euler {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn yaw(heading: f64) -> Self {
        Self::new(0.0, 0.0, heading)
    }
}

/// Viewport and render visibility flags of a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Visibility {
    pub viewport: bool,
    pub render: bool,
}

impl Visibility {
    pub const SHOWN: Self = Self {
        viewport: true,
        render: true,
    };
    pub const HIDDEN: Self = Self {
        viewport: false,
        render: false,
    };
}

/// Straight (non-premultiplied) linear RGBA, each channel in 0..=1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn is_valid(self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
