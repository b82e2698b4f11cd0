use std::{io::Write, path::Path};

use anyhow::Context;

use crate::{
    animation::ease::Ease,
    foundation::{
        core::{Color, FrameIndex, Timeline, Vec3},
        error::ReplayResult,
    },
    scene::{
        adapter::{
            BoxSpec, CameraSpec, CylinderSpec, LightSpec, MaterialId, MeshFormat, Mutation,
            ObjectId, ObjectInfo, SceneAdapter,
        },
        memory::MemoryScene,
    },
};

/// One engine instruction. Ids are the journal's own handles; the engine-side shim keeps
/// the mapping from them to its objects.
#[derive(Debug, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SceneCommand<'a> {
    CreateCamera {
        id: ObjectId,
        spec: &'a CameraSpec,
    },
    CreateLight {
        id: ObjectId,
        spec: &'a LightSpec,
    },
    CreatePlane {
        id: ObjectId,
        name: &'a str,
        size: f64,
    },
    CreateBox {
        id: ObjectId,
        spec: &'a BoxSpec,
    },
    CreateCylinder {
        id: ObjectId,
        spec: &'a CylinderSpec,
    },
    /// `ids[i]` is the i-th object the file yields.
    ImportMesh {
        path: &'a Path,
        format: MeshFormat,
        ids: &'a [ObjectId],
    },
    CloneObject {
        id: ObjectId,
        source: ObjectId,
        location: Vec3,
    },
    Rename {
        id: ObjectId,
        name: &'a str,
    },
    Apply {
        id: ObjectId,
        mutation: Mutation,
    },
    TranslateGeometry {
        id: ObjectId,
        offset: Vec3,
    },
    CreateMaterial {
        material: MaterialId,
        name: &'a str,
        color: Color,
    },
    AppendMaterial {
        id: ObjectId,
        material: MaterialId,
    },
    Subtract {
        target: ObjectId,
        cutter: ObjectId,
    },
    Delete {
        ids: &'a [ObjectId],
    },
    Clear,
    SetupTimeline {
        timeline: Timeline,
    },
    InsertKeyframe {
        id: ObjectId,
        frame: FrameIndex,
        mutation: Mutation,
        ease: Ease,
    },
    ClearAnimation {
        id: ObjectId,
    },
    RenderAnimation {
        output: &'a Path,
    },
}

/// Adapter that streams every scene call as newline-delimited JSON for an engine-side
/// shim to execute, while a [`MemoryScene`] mirror answers lookups locally.
///
/// A call is written only after the mirror accepted it, so the stream never contains a
/// command the mirror rejected.
pub struct JournalScene<W: Write> {
    mirror: MemoryScene,
    out: W,
    written: usize,
}

impl<W: Write> JournalScene<W> {
    pub fn new(mirror: MemoryScene, out: W) -> Self {
        Self {
            mirror,
            out,
            written: 0,
        }
    }

    pub fn mirror(&self) -> &MemoryScene {
        &self.mirror
    }

    /// Number of commands written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the mirror and the writer.
    pub fn finish(mut self) -> ReplayResult<(MemoryScene, W)> {
        self.out.flush().context("flush scene journal")?;
        Ok((self.mirror, self.out))
    }

    fn emit(&mut self, cmd: &SceneCommand<'_>) -> ReplayResult<()> {
        serde_json::to_writer(&mut self.out, cmd).context("write scene command")?;
        self.out.write_all(b"\n").context("write scene command")?;
        self.written += 1;
        Ok(())
    }
}

impl<W: Write> SceneAdapter for JournalScene<W> {
    fn find(&self, name: &str) -> Option<ObjectId> {
        self.mirror.find(name)
    }

    fn find_prefixed(&self, prefix: &str) -> Vec<ObjectId> {
        self.mirror.find_prefixed(prefix)
    }

    fn info(&self, id: ObjectId) -> ReplayResult<ObjectInfo> {
        self.mirror.info(id)
    }

    fn objects(&self) -> Vec<ObjectId> {
        self.mirror.objects()
    }

    fn create_camera(&mut self, spec: &CameraSpec) -> ReplayResult<ObjectId> {
        let id = self.mirror.create_camera(spec)?;
        self.emit(&SceneCommand::CreateCamera { id, spec })?;
        Ok(id)
    }

    fn create_light(&mut self, spec: &LightSpec) -> ReplayResult<ObjectId> {
        let id = self.mirror.create_light(spec)?;
        self.emit(&SceneCommand::CreateLight { id, spec })?;
        Ok(id)
    }

    fn create_plane(&mut self, name: &str, size: f64) -> ReplayResult<ObjectId> {
        let id = self.mirror.create_plane(name, size)?;
        self.emit(&SceneCommand::CreatePlane { id, name, size })?;
        Ok(id)
    }

    fn create_box(&mut self, spec: &BoxSpec) -> ReplayResult<ObjectId> {
        let id = self.mirror.create_box(spec)?;
        self.emit(&SceneCommand::CreateBox { id, spec })?;
        Ok(id)
    }

    fn create_cylinder(&mut self, spec: &CylinderSpec) -> ReplayResult<ObjectId> {
        let id = self.mirror.create_cylinder(spec)?;
        self.emit(&SceneCommand::CreateCylinder { id, spec })?;
        Ok(id)
    }

    fn import_mesh(&mut self, path: &Path, format: MeshFormat) -> ReplayResult<Vec<ObjectId>> {
        let ids = self.mirror.import_mesh(path, format)?;
        self.emit(&SceneCommand::ImportMesh {
            path,
            format,
            ids: &ids,
        })?;
        Ok(ids)
    }

    fn clone_object(&mut self, source: ObjectId, location: Vec3) -> ReplayResult<ObjectId> {
        let id = self.mirror.clone_object(source, location)?;
        self.emit(&SceneCommand::CloneObject {
            id,
            source,
            location,
        })?;
        Ok(id)
    }

    fn rename(&mut self, id: ObjectId, name: &str) -> ReplayResult<()> {
        self.mirror.rename(id, name)?;
        let assigned = self.mirror.info(id)?.name;
        self.emit(&SceneCommand::Rename {
            id,
            name: &assigned,
        })
    }

    fn apply(&mut self, id: ObjectId, mutation: Mutation) -> ReplayResult<()> {
        self.mirror.apply(id, mutation)?;
        self.emit(&SceneCommand::Apply { id, mutation })
    }

    fn translate_geometry(&mut self, id: ObjectId, offset: Vec3) -> ReplayResult<()> {
        self.mirror.translate_geometry(id, offset)?;
        self.emit(&SceneCommand::TranslateGeometry { id, offset })
    }

    fn create_material(&mut self, name: &str, color: Color) -> ReplayResult<MaterialId> {
        let material = self.mirror.create_material(name, color)?;
        self.emit(&SceneCommand::CreateMaterial {
            material,
            name,
            color,
        })?;
        Ok(material)
    }

    fn append_material(&mut self, id: ObjectId, material: MaterialId) -> ReplayResult<()> {
        self.mirror.append_material(id, material)?;
        self.emit(&SceneCommand::AppendMaterial { id, material })
    }

    fn subtract(&mut self, target: ObjectId, cutter: ObjectId) -> ReplayResult<()> {
        self.mirror.subtract(target, cutter)?;
        self.emit(&SceneCommand::Subtract { target, cutter })
    }

    fn delete(&mut self, ids: &[ObjectId]) -> ReplayResult<()> {
        self.mirror.delete(ids)?;
        self.emit(&SceneCommand::Delete { ids })
    }

    fn clear(&mut self) -> ReplayResult<()> {
        self.mirror.clear()?;
        self.emit(&SceneCommand::Clear)
    }

    fn setup_timeline(&mut self, timeline: Timeline) -> ReplayResult<()> {
        self.mirror.setup_timeline(timeline)?;
        self.emit(&SceneCommand::SetupTimeline { timeline })
    }

    fn insert_keyframe(
        &mut self,
        id: ObjectId,
        frame: FrameIndex,
        mutation: Mutation,
        ease: Ease,
    ) -> ReplayResult<()> {
        self.mirror.insert_keyframe(id, frame, mutation, ease)?;
        self.emit(&SceneCommand::InsertKeyframe {
            id,
            frame,
            mutation,
            ease,
        })
    }

    fn clear_animation(&mut self, id: ObjectId) -> ReplayResult<()> {
        self.mirror.clear_animation(id)?;
        self.emit(&SceneCommand::ClearAnimation { id })
    }

    fn render_animation(&mut self, output: &Path) -> ReplayResult<()> {
        self.mirror.render_animation(output)?;
        self.emit(&SceneCommand::RenderAnimation { output })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/journal.rs"]
mod tests;
