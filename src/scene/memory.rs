use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    animation::{ease::Ease, keyframes::Track},
    foundation::{
        core::{Color, Euler, FrameIndex, Timeline, Vec3, Visibility},
        error::{ReplayError, ReplayResult},
    },
    scene::adapter::{
        BoxSpec, CameraSpec, CylinderSpec, LightSpec, MaterialId, MeshFormat, Mutation, ObjectId,
        ObjectInfo, ObjectKind, SceneAdapter,
    },
};

/// Keyed channels of one object.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ObjectAnimation {
    pub location: Track<Vec3>,
    pub rotation: Track<Euler>,
    pub visibility: Track<Visibility>,
}

impl ObjectAnimation {
    pub fn is_empty(&self) -> bool {
        self.location.is_empty() && self.rotation.is_empty() && self.visibility.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub name: String,
    pub kind: ObjectKind,
    pub location: Vec3,
    pub rotation: Euler,
    pub visibility: Visibility,
    /// Box dimensions, or (2r, 2r, depth) for cylinders, or (size, size, 0) for planes.
    pub dimensions: Vec3,
    /// Accumulated geometry translation relative to the object origin.
    pub geometry_offset: Vec3,
    pub materials: Vec<MaterialId>,
    /// Boolean-difference cutters, in the order they were added.
    pub subtractions: Vec<ObjectId>,
    pub cloned_from: Option<ObjectId>,
    pub animation: ObjectAnimation,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Material {
    pub id: MaterialId,
    pub name: String,
    pub color: Color,
}

/// Serializable view of a [`MemoryScene`].
#[derive(Debug, serde::Serialize)]
pub struct SceneSnapshot<'a> {
    pub objects: Vec<&'a SceneObject>,
    pub materials: &'a [Material],
    pub active_camera: Option<ObjectId>,
    pub timeline: Option<Timeline>,
    pub renders: &'a [PathBuf],
}

/// In-process scene graph implementing [`SceneAdapter`].
///
/// It mirrors the engine's observable behaviour the replay relies on: names are kept
/// unique by appending `.001`, `.002`, ...; importing a mesh file yields one object per
/// named object in the file; keyframes are sampled with the same easing the engine applies.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    objects: BTreeMap<ObjectId, SceneObject>,
    materials: Vec<Material>,
    bundles: BTreeMap<PathBuf, Vec<String>>,
    active_camera: Option<ObjectId>,
    timeline: Option<Timeline>,
    renders: Vec<PathBuf>,
    fail_renders: bool,
    next_id: u64,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the object names a mesh file contains, instead of reading the file.
    pub fn with_bundle<I, S>(mut self, path: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bundles
            .insert(path.into(), names.into_iter().map(Into::into).collect());
        self
    }

    /// Make every subsequent render fail, as a broken engine render would.
    pub fn set_fail_renders(&mut self, fail: bool) {
        self.fail_renders = fail;
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.values()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count_named(&self, name: &str) -> usize {
        self.iter().filter(|o| o.name == name).count()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn active_camera(&self) -> Option<ObjectId> {
        self.active_camera
    }

    pub fn timeline(&self) -> Option<Timeline> {
        self.timeline
    }

    pub fn renders(&self) -> &[PathBuf] {
        &self.renders
    }

    pub fn snapshot(&self) -> SceneSnapshot<'_> {
        SceneSnapshot {
            objects: self.objects.values().collect(),
            materials: &self.materials,
            active_camera: self.active_camera,
            timeline: self.timeline,
            renders: &self.renders,
        }
    }

    fn get_mut(&mut self, id: ObjectId) -> ReplayResult<&mut SceneObject> {
        self.objects
            .get_mut(&id)
            .ok_or_else(|| ReplayError::scene(format!("no object with id {}", id.0)))
    }

    fn is_name_taken(&self, name: &str) -> bool {
        self.objects.values().any(|o| o.name == name)
    }

    fn unique_name(&self, requested: &str) -> String {
        if !self.is_name_taken(requested) {
            return requested.to_string();
        }
        let base = strip_numeric_suffix(requested);
        (1u32..)
            .map(|n| format!("{base}.{n:03}"))
            .find(|candidate| !self.is_name_taken(candidate))
            .unwrap_or_else(|| requested.to_string())
    }

    fn spawn(&mut self, name: &str, kind: ObjectKind) -> ReplayResult<ObjectId> {
        if name.trim().is_empty() {
            return Err(ReplayError::scene("object names must be non-empty"));
        }
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        let object = SceneObject {
            id,
            name: self.unique_name(name),
            kind,
            location: Vec3::ZERO,
            rotation: Euler::IDENTITY,
            visibility: Visibility::SHOWN,
            dimensions: Vec3::ZERO,
            geometry_offset: Vec3::ZERO,
            materials: Vec::new(),
            subtractions: Vec::new(),
            cloned_from: None,
            animation: ObjectAnimation::default(),
        };
        self.objects.insert(id, object);
        Ok(id)
    }

    fn bundle_names(&self, path: &Path, format: MeshFormat) -> ReplayResult<Vec<String>> {
        if let Some(names) = self.bundles.get(path) {
            return Ok(names.clone());
        }
        match format {
            MeshFormat::Obj => read_obj_object_names(path),
            // A rig imports as a single armature-rooted object named after the file.
            MeshFormat::Fbx => {
                File::open(path).with_context(|| format!("open mesh '{}'", path.display()))?;
                let stem = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "Imported".to_string());
                Ok(vec![stem])
            }
        }
    }
}

/// `Name.004` -> `Name`; names without a numeric suffix are returned unchanged.
fn strip_numeric_suffix(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((base, digits))
            if !base.is_empty()
                && !digits.is_empty()
                && digits.bytes().all(|b| b.is_ascii_digit()) =>
        {
            base
        }
        _ => name,
    }
}

/// Object names declared by `o` statements in a Wavefront OBJ file.
fn read_obj_object_names(path: &Path) -> ReplayResult<Vec<String>> {
    let f = File::open(path).with_context(|| format!("open mesh '{}'", path.display()))?;
    let mut names = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line.with_context(|| format!("read mesh '{}'", path.display()))?;
        if let Some(name) = line.strip_prefix("o ") {
            let name = name.trim();
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    if names.is_empty() {
        return Err(ReplayError::scene(format!(
            "mesh '{}' declares no objects",
            path.display()
        )));
    }
    Ok(names)
}

impl SceneAdapter for MemoryScene {
    fn find(&self, name: &str) -> Option<ObjectId> {
        self.objects.values().find(|o| o.name == name).map(|o| o.id)
    }

    fn find_prefixed(&self, prefix: &str) -> Vec<ObjectId> {
        self.objects
            .values()
            .filter(|o| o.name.starts_with(prefix))
            .map(|o| o.id)
            .collect()
    }

    fn info(&self, id: ObjectId) -> ReplayResult<ObjectInfo> {
        let o = self
            .objects
            .get(&id)
            .ok_or_else(|| ReplayError::scene(format!("no object with id {}", id.0)))?;
        Ok(ObjectInfo {
            name: o.name.clone(),
            kind: o.kind,
            location: o.location,
            rotation: o.rotation,
            visibility: o.visibility,
        })
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.objects.keys().copied().collect()
    }

    fn create_camera(&mut self, spec: &CameraSpec) -> ReplayResult<ObjectId> {
        let id = self.spawn(&spec.name, ObjectKind::Camera)?;
        let o = self.get_mut(id)?;
        o.location = spec.location;
        o.rotation = spec.rotation;
        self.active_camera = Some(id);
        Ok(id)
    }

    fn create_light(&mut self, spec: &LightSpec) -> ReplayResult<ObjectId> {
        let id = self.spawn(&spec.name, ObjectKind::Light(spec.kind))?;
        let o = self.get_mut(id)?;
        o.location = spec.location;
        o.rotation = spec.rotation;
        Ok(id)
    }

    fn create_plane(&mut self, name: &str, size: f64) -> ReplayResult<ObjectId> {
        let id = self.spawn(name, ObjectKind::Plane)?;
        self.get_mut(id)?.dimensions = Vec3::new(size, size, 0.0);
        Ok(id)
    }

    fn create_box(&mut self, spec: &BoxSpec) -> ReplayResult<ObjectId> {
        let id = self.spawn(&spec.name, ObjectKind::Box)?;
        let o = self.get_mut(id)?;
        o.dimensions = spec.dimensions;
        o.location = spec.location;
        o.rotation = spec.rotation;
        Ok(id)
    }

    fn create_cylinder(&mut self, spec: &CylinderSpec) -> ReplayResult<ObjectId> {
        let id = self.spawn(&spec.name, ObjectKind::Cylinder)?;
        let o = self.get_mut(id)?;
        o.dimensions = Vec3::new(2.0 * spec.radius, 2.0 * spec.radius, spec.depth);
        o.location = spec.location;
        Ok(id)
    }

    fn import_mesh(&mut self, path: &Path, format: MeshFormat) -> ReplayResult<Vec<ObjectId>> {
        let names = self.bundle_names(path, format)?;
        names
            .iter()
            .map(|name| self.spawn(name, ObjectKind::Mesh))
            .collect()
    }

    fn clone_object(&mut self, source: ObjectId, location: Vec3) -> ReplayResult<ObjectId> {
        let original = self
            .objects
            .get(&source)
            .cloned()
            .ok_or_else(|| ReplayError::scene(format!("no object with id {}", source.0)))?;
        let id = self.spawn(&original.name, original.kind)?;
        let o = self.get_mut(id)?;
        let name = std::mem::take(&mut o.name);
        *o = SceneObject {
            id,
            name,
            location,
            cloned_from: Some(source),
            animation: ObjectAnimation::default(),
            ..original
        };
        Ok(id)
    }

    fn rename(&mut self, id: ObjectId, name: &str) -> ReplayResult<()> {
        let current = self.info(id)?.name;
        if current == name {
            return Ok(());
        }
        let unique = self.unique_name(name);
        self.get_mut(id)?.name = unique;
        Ok(())
    }

    fn apply(&mut self, id: ObjectId, mutation: Mutation) -> ReplayResult<()> {
        let o = self.get_mut(id)?;
        match mutation {
            Mutation::SetLocation(v) => o.location = v,
            Mutation::SetRotation(r) => o.rotation = r,
            Mutation::SetVisibility(v) => o.visibility = v,
        }
        Ok(())
    }

    fn translate_geometry(&mut self, id: ObjectId, offset: Vec3) -> ReplayResult<()> {
        let o = self.get_mut(id)?;
        o.geometry_offset = o.geometry_offset + offset;
        Ok(())
    }

    fn create_material(&mut self, name: &str, color: Color) -> ReplayResult<MaterialId> {
        let id = MaterialId(self.materials.len() as u64);
        self.materials.push(Material {
            id,
            name: name.to_string(),
            color,
        });
        Ok(id)
    }

    fn append_material(&mut self, id: ObjectId, material: MaterialId) -> ReplayResult<()> {
        if self.material(material).is_none() {
            return Err(ReplayError::scene(format!(
                "no material with id {}",
                material.0
            )));
        }
        self.get_mut(id)?.materials.push(material);
        Ok(())
    }

    fn subtract(&mut self, target: ObjectId, cutter: ObjectId) -> ReplayResult<()> {
        if target == cutter {
            return Err(ReplayError::scene("an object cannot subtract itself"));
        }
        if !self.objects.contains_key(&cutter) {
            return Err(ReplayError::scene(format!("no object with id {}", cutter.0)));
        }
        self.get_mut(target)?.subtractions.push(cutter);
        Ok(())
    }

    fn delete(&mut self, ids: &[ObjectId]) -> ReplayResult<()> {
        for id in ids {
            if self.objects.remove(id).is_none() {
                return Err(ReplayError::scene(format!("no object with id {}", id.0)));
            }
            if self.active_camera == Some(*id) {
                self.active_camera = None;
            }
        }
        // Booleans lose their operand when it is deleted.
        for o in self.objects.values_mut() {
            o.subtractions.retain(|c| !ids.contains(c));
        }
        Ok(())
    }

    fn clear(&mut self) -> ReplayResult<()> {
        self.objects.clear();
        self.active_camera = None;
        Ok(())
    }

    fn setup_timeline(&mut self, timeline: Timeline) -> ReplayResult<()> {
        self.timeline = Some(timeline);
        Ok(())
    }

    fn insert_keyframe(
        &mut self,
        id: ObjectId,
        frame: FrameIndex,
        mutation: Mutation,
        ease: Ease,
    ) -> ReplayResult<()> {
        self.apply(id, mutation)?;
        let anim = &mut self.get_mut(id)?.animation;
        match mutation {
            Mutation::SetLocation(v) => anim.location.insert(frame, v, ease),
            Mutation::SetRotation(r) => anim.rotation.insert(frame, r, ease),
            Mutation::SetVisibility(v) => anim.visibility.insert(frame, v, ease),
        }
        Ok(())
    }

    fn clear_animation(&mut self, id: ObjectId) -> ReplayResult<()> {
        self.get_mut(id)?.animation = ObjectAnimation::default();
        Ok(())
    }

    fn render_animation(&mut self, output: &Path) -> ReplayResult<()> {
        if self.fail_renders {
            return Err(ReplayError::scene(format!(
                "render to '{}' failed",
                output.display()
            )));
        }
        self.renders.push(output.to_path_buf());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/memory.rs"]
mod tests;
