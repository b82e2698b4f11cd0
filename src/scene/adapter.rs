use std::path::Path;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Color, Euler, FrameIndex, Timeline, Vec3, Visibility},
        error::ReplayResult,
    },
};

/// Handle to a placed object, returned by every create, import and clone call.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectId(pub(crate) u64);

impl ObjectId {
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct MaterialId(pub(crate) u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Point,
    Sun,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshFormat {
    /// Rigid meshes, possibly many objects per file.
    Obj,
    /// Rigged / deformable models.
    Fbx,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Camera,
    Light(LightKind),
    Plane,
    Box,
    Cylinder,
    Mesh,
}

/// The closed set of per-object state changes the replay issues.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutation {
    SetLocation(Vec3),
    SetRotation(Euler),
    SetVisibility(Visibility),
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ObjectInfo {
    pub name: String,
    pub kind: ObjectKind,
    pub location: Vec3,
    pub rotation: Euler,
    pub visibility: Visibility,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraSpec {
    pub name: String,
    pub location: Vec3,
    pub rotation: Euler,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightSpec {
    pub name: String,
    pub kind: LightKind,
    pub energy: f64,
    pub location: Vec3,
    pub rotation: Euler,
}

/// Axis-aligned box in local space, then rotated and placed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BoxSpec {
    pub name: String,
    pub dimensions: Vec3,
    pub location: Vec3,
    pub rotation: Euler,
}

/// Upright cylinder (axis along z).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CylinderSpec {
    pub name: String,
    pub radius: f64,
    pub depth: f64,
    pub location: Vec3,
}

/// Everything the replay needs from the external 3D engine.
///
/// Names passed to create calls are requests: an engine may suffix them to keep names
/// unique, so callers keep the returned [`ObjectId`] rather than the name. Lookups by name
/// exist for create-if-absent checks and for recovering state left by an earlier process.
pub trait SceneAdapter {
    /// Object with exactly this name.
    fn find(&self, name: &str) -> Option<ObjectId>;

    /// Objects whose names start with `prefix`, in creation order.
    fn find_prefixed(&self, prefix: &str) -> Vec<ObjectId>;

    fn info(&self, id: ObjectId) -> ReplayResult<ObjectInfo>;

    /// Every object in creation order.
    fn objects(&self) -> Vec<ObjectId>;

    /// Create a camera and make it the active scene camera.
    fn create_camera(&mut self, spec: &CameraSpec) -> ReplayResult<ObjectId>;

    fn create_light(&mut self, spec: &LightSpec) -> ReplayResult<ObjectId>;

    /// Square ground plane centred on the origin.
    fn create_plane(&mut self, name: &str, size: f64) -> ReplayResult<ObjectId>;

    fn create_box(&mut self, spec: &BoxSpec) -> ReplayResult<ObjectId>;

    fn create_cylinder(&mut self, spec: &CylinderSpec) -> ReplayResult<ObjectId>;

    /// Import every object in a mesh file, in file order.
    fn import_mesh(&mut self, path: &Path, format: MeshFormat) -> ReplayResult<Vec<ObjectId>>;

    /// Copy an object (with its own copy of the geometry) to `location`.
    fn clone_object(&mut self, source: ObjectId, location: Vec3) -> ReplayResult<ObjectId>;

    fn rename(&mut self, id: ObjectId, name: &str) -> ReplayResult<()>;

    fn apply(&mut self, id: ObjectId, mutation: Mutation) -> ReplayResult<()>;

    /// Move the object's geometry relative to its origin.
    fn translate_geometry(&mut self, id: ObjectId, offset: Vec3) -> ReplayResult<()>;

    fn create_material(&mut self, name: &str, color: Color) -> ReplayResult<MaterialId>;

    fn append_material(&mut self, id: ObjectId, material: MaterialId) -> ReplayResult<()>;

    /// Boolean difference: carve `cutter` out of `target`.
    fn subtract(&mut self, target: ObjectId, cutter: ObjectId) -> ReplayResult<()>;

    fn delete(&mut self, ids: &[ObjectId]) -> ReplayResult<()>;

    /// Remove every object.
    fn clear(&mut self) -> ReplayResult<()>;

    fn setup_timeline(&mut self, timeline: Timeline) -> ReplayResult<()>;

    /// Apply `mutation` and key that channel at `frame`, easing toward the next key.
    fn insert_keyframe(
        &mut self,
        id: ObjectId,
        frame: FrameIndex,
        mutation: Mutation,
        ease: Ease,
    ) -> ReplayResult<()>;

    /// Drop every keyframe on the object.
    fn clear_animation(&mut self, id: ObjectId) -> ReplayResult<()>;

    /// Render the configured timeline to `output`.
    fn render_animation(&mut self, output: &Path) -> ReplayResult<()>;
}
